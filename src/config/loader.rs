//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! settings and grading systems from YAML files.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::GradingSystem;

use super::types::{EngineSettings, GradingConfig};

/// Loads and provides access to grading configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides methods to look up grading systems and engine settings.
/// The built-in CBC 8-level scheme (`cbc_8_level`) is always available,
/// unless a file defines a system with the same id.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── settings.yaml          # Engine-wide defaults
/// └── grading/
///     └── kcse_12_point.yaml # One grading system per file
/// ```
///
/// # Example
///
/// ```no_run
/// use grade_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config").unwrap();
///
/// let system = loader.get_grading_system("kcse_12_point").unwrap();
/// println!("Grading system: {} ({} rules)", system.name, system.rules.len());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: GradingConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - `settings.yaml` is missing
    /// - Any file contains invalid YAML
    /// - Any grading system fails validation
    /// - The default grading system named in the settings does not exist
    ///
    /// A missing `grading/` directory is not an error: only the built-in
    /// scheme is registered.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use grade_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config")?;
    /// # Ok::<(), grade_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<EngineSettings>(&path.join("settings.yaml"))?;
        let systems = Self::load_grading_systems(&path.join("grading"))?;

        for system in &systems {
            validate_grading_system(system)?;
        }

        let loader = Self {
            config: GradingConfig::new(settings, systems),
        };

        loader.default_grading_system()?;

        info!(
            path = %path.display(),
            grading_systems = loader.config.systems().len(),
            default_grading_system = %loader.settings().default_grading_system,
            "Configuration loaded"
        );

        Ok(loader)
    }

    /// Creates a loader from an already-built configuration.
    pub fn from_config(config: GradingConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all grading system files, in file name order.
    fn load_grading_systems(grading_dir: &Path) -> EngineResult<Vec<GradingSystem>> {
        if !grading_dir.exists() {
            return Ok(Vec::new());
        }

        let grading_dir_str = grading_dir.display().to_string();
        let entries = fs::read_dir(grading_dir).map_err(|_| EngineError::ConfigNotFound {
            path: grading_dir_str.clone(),
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: grading_dir_str.clone(),
            })?;
            let path = entry.path();
            if path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml")
            {
                paths.push(path);
            }
        }
        paths.sort();

        paths
            .iter()
            .map(|path| Self::load_yaml::<GradingSystem>(path))
            .collect()
    }

    /// Returns the underlying configuration.
    pub fn config(&self) -> &GradingConfig {
        &self.config
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        self.config.settings()
    }

    /// Gets a grading system by its id.
    ///
    /// # Returns
    ///
    /// Returns the grading system if found, or `GradingSystemNotFound` error.
    ///
    /// # Example
    ///
    /// ```
    /// use grade_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::default();
    /// let cbc = loader.get_grading_system("cbc_8_level")?;
    /// assert_eq!(cbc.rules.len(), 8);
    /// # Ok::<(), grade_engine::error::EngineError>(())
    /// ```
    pub fn get_grading_system(&self, id: &str) -> EngineResult<&GradingSystem> {
        self.config
            .systems()
            .get(id)
            .ok_or_else(|| EngineError::GradingSystemNotFound { id: id.to_string() })
    }

    /// Returns the grading system named in the settings.
    pub fn default_grading_system(&self) -> EngineResult<&GradingSystem> {
        self.get_grading_system(&self.settings().default_grading_system)
    }

    /// Returns the requested grading system, or the default when `id` is
    /// `None`.
    pub fn resolve_grading_system(&self, id: Option<&str>) -> EngineResult<&GradingSystem> {
        match id {
            Some(id) => self.get_grading_system(id),
            None => self.default_grading_system(),
        }
    }

    /// Iterates over all grading systems in id order.
    pub fn grading_systems(&self) -> impl Iterator<Item = &GradingSystem> {
        self.config.systems().values()
    }
}

/// Checks a configured grading system.
///
/// Rejects a system without rules and rules with an empty label,
/// non-finite bounds or `min_score > max_score`. Duplicate points among
/// non-sentinel rules are only logged: the classifier resolves them.
fn validate_grading_system(system: &GradingSystem) -> EngineResult<()> {
    let invalid = |grade: &str, message: String| EngineError::InvalidGradingRule {
        system_id: system.id.clone(),
        grade: grade.to_string(),
        message,
    };

    if system.rules.is_empty() {
        return Err(invalid("", "grading system has no rules".to_string()));
    }

    for rule in &system.rules {
        if rule.grade.trim().is_empty() {
            return Err(invalid(&rule.grade, "grade label is empty".to_string()));
        }
        if !rule.min_score.is_finite() || !rule.max_score.is_finite() {
            return Err(invalid(&rule.grade, "score bounds must be finite".to_string()));
        }
        if rule.min_score > rule.max_score {
            return Err(invalid(
                &rule.grade,
                format!(
                    "min_score {} is greater than max_score {}",
                    rule.min_score, rule.max_score
                ),
            ));
        }
    }

    let mut seen: HashMap<u32, &str> = HashMap::new();
    for rule in system.graded_rules() {
        if let Some(first) = seen.insert(rule.points, &rule.grade) {
            warn!(
                system_id = %system.id,
                points = rule.points,
                first = first,
                second = %rule.grade,
                "Duplicate points in grading system"
            );
        }
    }

    Ok(())
}
