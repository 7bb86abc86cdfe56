//! Response types for the Grade Engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API, plus the grading system listing entry.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{Curriculum, GradingSystem};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates a grading system not found error response.
    pub fn grading_system_not_found(id: &str) -> Self {
        Self::with_details(
            "GRADING_SYSTEM_NOT_FOUND",
            format!("Grading system not found: {}", id),
            format!("No grading system with id '{}' is configured", id),
        )
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Creates an error response.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidGradingRule {
                system_id,
                grade,
                message,
            } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    format!("Invalid grading system '{}'", system_id),
                    format!("Rule '{}': {}", grade, message),
                ),
            },
            EngineError::GradingSystemNotFound { id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::grading_system_not_found(&id),
            },
            EngineError::InvalidExam { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_EXAM",
                    format!("Invalid exam field '{}': {}", field, message),
                    "The exam data is inconsistent",
                ),
            },
            EngineError::SubjectNotFound { subject_id } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "SUBJECT_NOT_FOUND",
                    format!("Subject not found: {}", subject_id),
                    "The requested subject is not part of the exam",
                ),
            },
        }
    }
}

/// One entry of the `/grading-systems` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradingSystemSummary {
    /// The grading system id.
    pub id: String,
    /// Human readable name.
    pub name: String,
    /// The curriculum it grades.
    pub curriculum: Curriculum,
}

impl From<&GradingSystem> for GradingSystemSummary {
    fn from(system: &GradingSystem) -> Self {
        Self {
            id: system.id.clone(),
            name: system.name.clone(),
            curriculum: system.curriculum,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_grading_system_not_found_maps_to_404() {
        let engine_error = EngineError::GradingSystemNotFound {
            id: "missing".to_string(),
        };
        let api_error: ApiErrorResponse = engine_error.into();
        assert_eq!(api_error.status, StatusCode::NOT_FOUND);
        assert_eq!(api_error.error.code, "GRADING_SYSTEM_NOT_FOUND");
        assert!(api_error.error.message.contains("missing"));
    }

    #[test]
    fn test_invalid_exam_maps_to_400() {
        let engine_error = EngineError::InvalidExam {
            field: "exam.min_subjects".to_string(),
            message: "must be at least 1".to_string(),
        };
        let api_error: ApiErrorResponse = engine_error.into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "INVALID_EXAM");
        assert!(api_error.error.message.contains("exam.min_subjects"));
    }

    #[test]
    fn test_config_errors_map_to_500() {
        let engine_error = EngineError::ConfigNotFound {
            path: "settings.yaml".to_string(),
        };
        let api_error: ApiErrorResponse = engine_error.into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CONFIG_ERROR");
    }

    #[test]
    fn test_grading_system_summary_from_system() {
        let summary = GradingSystemSummary::from(&GradingSystem::cbc_eight_level());
        assert_eq!(summary.id, "cbc_8_level");
        assert_eq!(summary.curriculum, Curriculum::Cbc);
    }
}
