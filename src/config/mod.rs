//! Configuration loading and management for the Grade Engine.
//!
//! This module provides functionality to load engine settings and grading
//! systems from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use grade_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Default grading system: {}", config.settings().default_grading_system);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EngineSettings, GradingConfig};
