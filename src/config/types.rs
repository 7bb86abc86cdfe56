//! Configuration types for the grading engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::calculation::{
    DEFAULT_COMPULSORY_CAP, DEFAULT_ELECTIVE_CAP, DEFAULT_MIN_SUBJECTS, SelectionPolicy,
};
use crate::models::{CBC_EIGHT_LEVEL_ID, GradingSystem};

/// Engine-wide defaults from `settings.yaml`.
///
/// Every field is optional in the file; missing fields take the values of
/// [`EngineSettings::default`].
///
/// # Example
///
/// ```
/// use grade_engine::config::EngineSettings;
///
/// let settings: EngineSettings = serde_yaml::from_str("default_min_subjects: 8").unwrap();
/// assert_eq!(settings.default_min_subjects, 8);
/// assert_eq!(settings.compulsory_cap, 5);
/// assert_eq!(settings.default_grading_system, "cbc_8_level");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Minimum subject count for exams that do not set one.
    pub default_min_subjects: u32,
    /// Compulsory subjects counted in paper-based exams.
    pub compulsory_cap: usize,
    /// Elective subjects counted in paper-based exams.
    pub elective_cap: usize,
    /// Grading system used when a request names none.
    pub default_grading_system: String,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_min_subjects: DEFAULT_MIN_SUBJECTS,
            compulsory_cap: DEFAULT_COMPULSORY_CAP,
            elective_cap: DEFAULT_ELECTIVE_CAP,
            default_grading_system: CBC_EIGHT_LEVEL_ID.to_string(),
        }
    }
}

impl EngineSettings {
    /// Returns the subject-selection caps.
    pub fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy {
            compulsory_cap: self.compulsory_cap,
            elective_cap: self.elective_cap,
        }
    }
}

/// The complete loaded configuration.
#[derive(Debug, Clone)]
pub struct GradingConfig {
    /// Engine settings.
    settings: EngineSettings,
    /// Grading systems keyed by id.
    systems: BTreeMap<String, GradingSystem>,
}

impl GradingConfig {
    /// Creates a configuration, registering the built-in CBC scheme unless
    /// one of `systems` already uses its id.
    pub fn new(settings: EngineSettings, systems: Vec<GradingSystem>) -> Self {
        let mut by_id: BTreeMap<String, GradingSystem> = systems
            .into_iter()
            .map(|system| (system.id.clone(), system))
            .collect();
        by_id
            .entry(CBC_EIGHT_LEVEL_ID.to_string())
            .or_insert_with(GradingSystem::cbc_eight_level);

        Self {
            settings,
            systems: by_id,
        }
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns all grading systems keyed by id.
    pub fn systems(&self) -> &BTreeMap<String, GradingSystem> {
        &self.systems
    }
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self::new(EngineSettings::default(), Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_settings_file_uses_defaults() {
        let settings: EngineSettings = serde_yaml::from_str("{}").unwrap();
        assert_eq!(settings, EngineSettings::default());
    }

    #[test]
    fn test_selection_policy_from_settings() {
        let settings = EngineSettings {
            compulsory_cap: 4,
            elective_cap: 3,
            ..EngineSettings::default()
        };
        let policy = settings.selection_policy();
        assert_eq!(policy.compulsory_cap, 4);
        assert_eq!(policy.elective_cap, 3);
    }

    #[test]
    fn test_builtin_cbc_always_registered() {
        let config = GradingConfig::default();
        assert!(config.systems().contains_key(CBC_EIGHT_LEVEL_ID));
    }

    #[test]
    fn test_configured_system_overrides_builtin() {
        let mut custom = GradingSystem::cbc_eight_level();
        custom.name = "School CBC".to_string();
        let config = GradingConfig::new(EngineSettings::default(), vec![custom]);

        assert_eq!(config.systems()[CBC_EIGHT_LEVEL_ID].name, "School CBC");
    }
}
