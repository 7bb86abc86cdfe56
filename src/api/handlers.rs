//! HTTP request handlers for the Grade Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{classify, compute_exam_report, subject_ranking};
use crate::config::ConfigLoader;
use crate::error::EngineResult;
use crate::models::{ExamReport, ExamSnapshot};

use super::request::{ClassifyRequest, ExamReportRequest, SubjectRankingRequest};
use super::response::{ApiError, ApiErrorResponse, GradingSystemSummary};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/reports/exam", post(exam_report_handler))
        .route("/reports/subject-ranking", post(subject_ranking_handler))
        .route("/classify", post(classify_handler))
        .route("/grading-systems", get(list_grading_systems_handler))
        .route("/grading-systems/:id", get(get_grading_system_handler))
        .with_state(state)
}

/// Handler for POST /reports/exam.
///
/// Computes the full report of one exam snapshot.
async fn exam_report_handler(
    State(state): State<AppState>,
    payload: Result<Json<ExamReportRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing exam report request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match build_report(state.config(), request) {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                exam_id = report.exam_id,
                grading_system = %report.grading_system_id,
                students_count = report.students.len(),
                warnings_count = report.warnings.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Exam report completed successfully"
            );
            json_response(StatusCode::OK, &report)
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Exam report failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /reports/subject-ranking.
///
/// Computes the exam report, then ranks one subject within an optional
/// custom group.
async fn subject_ranking_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubjectRankingRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing subject ranking request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let subject_id = request.subject_id;
    let group = request.group;
    let result = build_report(state.config(), request.report)
        .and_then(|report| subject_ranking(&report, subject_id, group.as_deref()));

    match result {
        Ok(placements) => {
            info!(
                correlation_id = %correlation_id,
                subject_id,
                group = group.as_deref().unwrap_or("*"),
                ranked_count = placements.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Subject ranking completed successfully"
            );
            json_response(StatusCode::OK, &placements)
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Subject ranking failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /classify.
///
/// Classifies a single score or mean-points value.
async fn classify_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let system = match state
        .config()
        .resolve_grading_system(request.grading_system_id.as_deref())
    {
        Ok(system) => system,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Grading system not found");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let grade = classify(request.value, request.mode, system);
    info!(
        correlation_id = %correlation_id,
        grading_system = %system.id,
        value = request.value,
        mode = ?request.mode,
        grade = %grade.grade,
        "Value classified"
    );
    json_response(StatusCode::OK, &grade)
}

/// Handler for GET /grading-systems.
async fn list_grading_systems_handler(State(state): State<AppState>) -> Response {
    let systems: Vec<GradingSystemSummary> = state
        .config()
        .grading_systems()
        .map(GradingSystemSummary::from)
        .collect();
    json_response(StatusCode::OK, &systems)
}

/// Handler for GET /grading-systems/:id.
async fn get_grading_system_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.config().get_grading_system(&id) {
        Ok(system) => json_response(StatusCode::OK, system),
        Err(err) => ApiErrorResponse::from(err).into_response(),
    }
}

/// Validates the request and computes its exam report.
fn build_report(config: &ConfigLoader, request: ExamReportRequest) -> EngineResult<ExamReport> {
    let system = config.resolve_grading_system(request.grading_system_id.as_deref())?;
    let snapshot: ExamSnapshot = request.into();
    snapshot.validate()?;
    Ok(compute_exam_report(&snapshot, system, config.settings()))
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's description of the problem
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    ApiErrorResponse::new(StatusCode::BAD_REQUEST, error).into_response()
}
