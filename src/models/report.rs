//! Report models produced by the engine.
//!
//! This module contains the derived, per-request records: scored subjects,
//! student results, group and subject summaries, and the [`ExamReport`] that
//! bundles them for a presentation layer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Gender, GradeResult, SubjectType};

/// A subject score for one student on one exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSubject {
    /// The subject.
    pub subject_id: u64,
    /// Compulsory or elective.
    pub subject_type: SubjectType,
    /// Composite 0–100 score.
    pub score: f64,
    /// Grade label from score-mode classification.
    pub grade: String,
    /// Points of the grade.
    pub points: u32,
}

/// A student's computed result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentResult {
    /// The student.
    pub student_id: u64,
    /// Student name, carried for display.
    pub name: String,
    /// Gender.
    pub gender: Gender,
    /// Class id.
    pub class_id: u64,
    /// Stream id.
    pub stream_id: u64,
    /// Custom groups.
    pub groups: Vec<String>,
    /// Every subject the student has a score for, in exam order.
    pub subjects: Vec<ScoredSubject>,
    /// Ids of the subjects counted toward totals.
    pub selected_subjects: Vec<u64>,
    /// Sum of selected subject scores.
    pub total_score: f64,
    /// Sum of selected subject points.
    pub total_points: u32,
    /// Total points divided by the exam minimum; `None` when not qualified.
    pub mean_points: Option<f64>,
    /// Mean points rounded to 2 decimal places.
    pub mean_points_display: Option<Decimal>,
    /// Overall grade (points mode) or the insufficient-subjects sentinel.
    pub overall_grade: GradeResult,
    /// Whether the student holds at least the exam minimum of subjects.
    pub qualified: bool,
    /// Position on the class merit list.
    pub class_rank: Option<u32>,
    /// Position within the stream.
    pub stream_rank: Option<u32>,
}

impl StudentResult {
    /// Returns the scored subject with the given id, if the student sat it.
    pub fn subject(&self, subject_id: u64) -> Option<&ScoredSubject> {
        self.subjects.iter().find(|s| s.subject_id == subject_id)
    }

    /// Returns true if the student belongs to the named custom group.
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}

/// The dimension a [`GroupSummary`] aggregates over.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GroupKey {
    /// A stream within a class.
    Stream {
        /// The class the stream belongs to.
        class_id: u64,
        /// The stream.
        stream_id: u64,
    },
    /// A whole class (roll-up of its streams).
    Class(u64),
    /// A gender group.
    Gender(Gender),
    /// A named custom group.
    Custom(String),
}

/// One bucket of a grade histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeCount {
    /// The grade label.
    pub grade: String,
    /// Number of students with that grade.
    pub count: u32,
}

/// Aggregated results of one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    /// The group.
    pub key: GroupKey,
    /// Number of students, including those with insufficient subjects.
    pub entry: u32,
    /// Number of students counted in the mean.
    pub qualified: u32,
    /// Unrounded sum of the qualified students' mean points.
    pub points_total: f64,
    /// Histogram over the grade-label universe.
    pub grades: Vec<GradeCount>,
    /// Mean of the qualified students' mean points, rounded to 2 dp.
    pub mean_score: Decimal,
    /// Points-mode grade of `mean_score`.
    pub overall_grade: GradeResult,
}

impl GroupSummary {
    /// Returns the histogram count for a grade label.
    pub fn count_for(&self, grade: &str) -> u32 {
        self.grades
            .iter()
            .find(|g| g.grade == grade)
            .map(|g| g.count)
            .unwrap_or(0)
    }
}

/// Aggregated results of one subject across the cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectSummary {
    /// The subject.
    pub subject_id: u64,
    /// Subject name, carried for display.
    pub name: String,
    /// Number of students with a score above zero.
    pub entry: u32,
    /// Mean subject score, rounded to 2 dp.
    pub mean_score: Decimal,
    /// Score-mode grade of the mean score.
    pub mean_grade: GradeResult,
    /// Histogram of subject grades.
    pub grades: Vec<GradeCount>,
}

/// A student's position on one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectPlacement {
    /// The student.
    pub student_id: u64,
    /// Student name, carried for display.
    pub name: String,
    /// The subject score.
    pub score: f64,
    /// The subject grade.
    pub grade: String,
    /// Standard competition rank.
    pub rank: u32,
}

/// Severity of a report warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational.
    Low,
    /// Likely a configuration mistake.
    Medium,
    /// Numbers in the report may be misleading.
    High,
}

/// A configuration anomaly the engine repaired while building a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWarning {
    /// A code identifying the anomaly.
    pub code: String,
    /// Human readable description.
    pub message: String,
    /// Severity.
    pub severity: Severity,
}

/// The complete computed report for one exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamReport {
    /// Unique identifier of this report computation.
    pub report_id: Uuid,
    /// When the report was computed.
    pub generated_at: DateTime<Utc>,
    /// Version of the engine that produced the report.
    pub engine_version: String,
    /// The exam.
    pub exam_id: u64,
    /// The grading system used.
    pub grading_system_id: String,
    /// The effective minimum subject count.
    pub min_subjects: u32,
    /// Whether any subject of the exam uses papers.
    pub uses_papers: bool,
    /// Student results in merit order (class, then class rank).
    pub students: Vec<StudentResult>,
    /// Per-stream summaries.
    pub streams: Vec<GroupSummary>,
    /// Per-class summaries, rolled up from the streams.
    pub classes: Vec<GroupSummary>,
    /// Per-gender summaries.
    pub genders: Vec<GroupSummary>,
    /// Per-custom-group summaries.
    pub groups: Vec<GroupSummary>,
    /// Per-subject summaries in exam order.
    pub subjects: Vec<SubjectSummary>,
    /// Repaired configuration anomalies.
    pub warnings: Vec<ReportWarning>,
}
