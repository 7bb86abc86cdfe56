//! Subject, paper and raw result models.
//!
//! These are the inputs fetched from storage for one exam: the subject list,
//! the paper definitions of paper-based subjects, and the per-paper scores.

use serde::{Deserialize, Serialize};

/// Whether a subject is always counted or competes for an elective slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectType {
    /// Counted up to the compulsory cap, in subject-list order.
    Compulsory,
    /// Ranked by points; only the best few are counted.
    Elective,
}

/// A subject sat in an exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Unique identifier of the subject.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// Optional short code (e.g. "ENG").
    #[serde(default)]
    pub code: Option<String>,
    /// Compulsory or elective.
    #[serde(rename = "type")]
    pub subject_type: SubjectType,
    /// Whether the subject score is composed from weighted papers.
    #[serde(default)]
    pub uses_papers: bool,
}

/// A paper of a paper-based subject.
///
/// `contribution_percentage` is the raw configured weight; it may be missing,
/// zero, or not sum to 100 across the subject and is normalized before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    /// Unique identifier of the paper.
    pub id: u64,
    /// The subject this paper belongs to.
    pub subject_id: u64,
    /// Display name (e.g. "Paper 1").
    #[serde(default)]
    pub name: String,
    /// Maximum attainable score.
    pub max_score: f64,
    /// Raw contribution weight.
    #[serde(default)]
    pub contribution_percentage: Option<f64>,
}

/// A paper after weight normalization.
///
/// Subjects without papers are represented by a single pseudo-paper with no
/// id, a maximum of 100 and a weight of 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPaper {
    /// The paper id, or `None` for the pseudo-paper.
    pub paper_id: Option<u64>,
    /// The subject this paper belongs to.
    pub subject_id: u64,
    /// Maximum attainable score.
    pub max_score: f64,
    /// Normalized weight; the weights of one subject sum to 100.
    pub weight: f64,
}

impl NormalizedPaper {
    /// The pseudo-paper of a subject that does not use papers.
    pub fn pseudo(subject_id: u64) -> Self {
        Self {
            paper_id: None,
            subject_id,
            max_score: 100.0,
            weight: 100.0,
        }
    }
}

/// Moderation state of a raw result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    /// Entered and approved; the only state the engine reads.
    #[default]
    Confirmed,
    /// Entered but awaiting approval.
    Pending,
    /// Rejected during moderation.
    Rejected,
}

/// One stored score for a (student, subject, paper) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResult {
    /// The student the score belongs to.
    pub student_id: u64,
    /// The subject the score belongs to.
    pub subject_id: u64,
    /// The paper, or `None` for subjects without papers.
    #[serde(default)]
    pub paper_id: Option<u64>,
    /// The score, if one was entered.
    #[serde(default)]
    pub score: Option<f64>,
    /// Moderation state.
    #[serde(default)]
    pub status: ResultStatus,
}

impl RawResult {
    /// Returns the score if this result is confirmed and carries one.
    ///
    /// # Example
    ///
    /// ```
    /// use grade_engine::models::{RawResult, ResultStatus};
    ///
    /// let mut result = RawResult {
    ///     student_id: 1,
    ///     subject_id: 101,
    ///     paper_id: None,
    ///     score: Some(64.0),
    ///     status: ResultStatus::Confirmed,
    /// };
    /// assert_eq!(result.usable_score(), Some(64.0));
    ///
    /// result.status = ResultStatus::Pending;
    /// assert_eq!(result.usable_score(), None);
    /// ```
    pub fn usable_score(&self) -> Option<f64> {
        match self.status {
            ResultStatus::Confirmed => self.score,
            ResultStatus::Pending | ResultStatus::Rejected => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_subject_with_type_field() {
        let json = r#"{"id": 7, "name": "Chemistry", "type": "elective", "uses_papers": true}"#;
        let subject: Subject = serde_json::from_str(json).unwrap();
        assert_eq!(subject.subject_type, SubjectType::Elective);
        assert!(subject.uses_papers);
        assert!(subject.code.is_none());
    }

    #[test]
    fn test_deserialize_raw_result_defaults() {
        let json = r#"{"student_id": 1, "subject_id": 2, "score": 55.5}"#;
        let result: RawResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.paper_id, None);
        assert_eq!(result.status, ResultStatus::Confirmed);
        assert_eq!(result.usable_score(), Some(55.5));
    }

    #[test]
    fn test_null_score_is_not_usable() {
        let result = RawResult {
            student_id: 1,
            subject_id: 2,
            paper_id: Some(3),
            score: None,
            status: ResultStatus::Confirmed,
        };
        assert_eq!(result.usable_score(), None);
    }

    #[test]
    fn test_pseudo_paper() {
        let paper = NormalizedPaper::pseudo(9);
        assert_eq!(paper.paper_id, None);
        assert_eq!(paper.max_score, 100.0);
        assert_eq!(paper.weight, 100.0);
    }
}
