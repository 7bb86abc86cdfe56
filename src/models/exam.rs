//! Exam snapshot model.
//!
//! An [`ExamSnapshot`] is the immutable set of rows an external collaborator
//! fetched for one report request. The engine never reads storage itself.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{Paper, RawResult, Student, Subject};

/// Exam-level metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    /// Unique identifier of the exam.
    pub id: u64,
    /// Display name (e.g. "Term 2 Opener").
    pub name: String,
    /// Minimum number of subjects a student must hold to be graded.
    #[serde(default)]
    pub min_subjects: Option<u32>,
}

/// Everything the engine needs to compute one exam report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamSnapshot {
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

impl ExamSnapshot {
    /// Returns true if any subject in the exam uses papers.
    pub fn uses_papers(&self) -> bool {
        self.subjects.iter().any(|s| s.uses_papers)
    }

    /// Returns the papers of one subject.
    pub fn papers_for(&self, subject_id: u64) -> impl Iterator<Item = &Paper> {
        self.papers.iter().filter(move |p| p.subject_id == subject_id)
    }

    /// Checks that the snapshot is internally consistent.
    ///
    /// Results pointing at unknown students or subjects are not errors; the
    /// engine simply never reads them.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidExam`] if the minimum subject count is
    /// zero, if subject or student ids are duplicated, or if a paper refers to
    /// a subject that is not part of the exam.
    pub fn validate(&self) -> EngineResult<()> {
        if self.exam.min_subjects == Some(0) {
            return Err(EngineError::InvalidExam {
                field: "exam.min_subjects".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let mut subject_ids = HashSet::new();
        for subject in &self.subjects {
            if !subject_ids.insert(subject.id) {
                return Err(EngineError::InvalidExam {
                    field: "subjects".to_string(),
                    message: format!("duplicate subject id {}", subject.id),
                });
            }
        }

        let mut student_ids = HashSet::new();
        for student in &self.students {
            if !student_ids.insert(student.id) {
                return Err(EngineError::InvalidExam {
                    field: "students".to_string(),
                    message: format!("duplicate student id {}", student.id),
                });
            }
        }

        if let Some(paper) = self
            .papers
            .iter()
            .find(|p| !subject_ids.contains(&p.subject_id))
        {
            return Err(EngineError::InvalidExam {
                field: "papers".to_string(),
                message: format!(
                    "paper {} refers to unknown subject {}",
                    paper.id, paper.subject_id
                ),
            });
        }

        Ok(())
    }
}
