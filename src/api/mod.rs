//! HTTP API module for the Grade Engine.
//!
//! This module provides the JSON endpoints for computing exam reports,
//! ranking subjects and classifying single values.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{ClassifyRequest, ExamReportRequest, SubjectRankingRequest};
pub use response::{ApiError, ApiErrorResponse, GradingSystemSummary};
pub use state::AppState;
