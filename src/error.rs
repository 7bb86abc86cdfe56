//! Error types for the Grade Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate.
//! Errors only arise at the edges of the engine (configuration loading,
//! request validation, lookups); grade computation itself never fails.

use thiserror::Error;

/// The main error type for the Grade Engine.
///
/// # Example
///
/// ```
/// use grade_engine::error::EngineError;
///
/// let error = EngineError::GradingSystemNotFound {
///     id: "kcse_12_point".to_string(),
/// };
/// assert_eq!(error.to_string(), "Grading system not found: kcse_12_point");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No grading system is registered under the requested id.
    #[error("Grading system not found: {id}")]
    GradingSystemNotFound {
        /// The grading system id that was not found.
        id: String,
    },

    /// A grading rule in a configured system is malformed.
    #[error("Invalid grading rule '{grade}' in system '{system_id}': {message}")]
    InvalidGradingRule {
        /// The grading system containing the rule.
        system_id: String,
        /// The grade label of the rule.
        grade: String,
        /// A description of what made the rule invalid.
        message: String,
    },

    /// An exam snapshot was inconsistent.
    #[error("Invalid exam field '{field}': {message}")]
    InvalidExam {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A subject was requested that is not part of the exam.
    #[error("Subject not found: {subject_id}")]
    SubjectNotFound {
        /// The subject id that was not found.
        subject_id: u64,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
