//! Request types for the Grade Engine API.
//!
//! This module defines the JSON request structures for the report and
//! classification endpoints.

use serde::{Deserialize, Serialize};

use crate::calculation::ClassificationMode;
use crate::models::{Exam, ExamSnapshot, Paper, RawResult, Student, Subject};

/// Request body for the `/reports/exam` endpoint.
///
/// Carries the rows an external data source fetched for one exam, plus the
/// grading system to apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamReportRequest {
    /// The grading system to use; the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grading_system_id: Option<String>,
    /// Exam metadata.
    pub exam: Exam,
    /// The exam's subjects, in display order.
    pub subjects: Vec<Subject>,
    /// Paper definitions of paper-based subjects.
    #[serde(default)]
    pub papers: Vec<Paper>,
    /// The cohort being reported.
    pub students: Vec<Student>,
    /// Raw per-paper results.
    #[serde(default)]
    pub results: Vec<RawResult>,
}

impl From<ExamReportRequest> for ExamSnapshot {
    fn from(req: ExamReportRequest) -> Self {
        ExamSnapshot {
            exam: req.exam,
            subjects: req.subjects,
            papers: req.papers,
            students: req.students,
            results: req.results,
        }
    }
}

/// Request body for the `/reports/subject-ranking` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectRankingRequest {
    /// The subject to rank on.
    pub subject_id: u64,
    /// Restricts the ranking to one custom group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// The exam to compute.
    #[serde(flatten)]
    pub report: ExamReportRequest,
}

/// Request body for the `/classify` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    /// The grading system to use; the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grading_system_id: Option<String>,
    /// The value to classify.
    pub value: f64,
    /// Whether `value` is a subject score or mean points.
    pub mode: ClassificationMode,
}
