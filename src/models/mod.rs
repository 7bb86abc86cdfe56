//! Core data models for the Grade Engine.
//!
//! This module contains the input rows (grading systems, subjects, papers,
//! students, raw results) and the derived report records.

mod exam;
mod grading;
mod report;
mod student;
mod subject;

pub use exam::{Exam, ExamSnapshot};
pub use grading::{
    CBC_EIGHT_LEVEL_ID, Curriculum, GradeResult, GradeSource, GradingRule, GradingSystem,
    INSUFFICIENT_SUBJECTS_GRADE, MINIMAL_PASS_GRADE, MINIMAL_PASS_POINTS, NO_GRADE,
};
pub use report::{
    ExamReport, GradeCount, GroupKey, GroupSummary, ReportWarning, ScoredSubject, Severity,
    StudentResult, SubjectPlacement, SubjectSummary,
};
pub use student::{Gender, Student};
pub use subject::{NormalizedPaper, Paper, RawResult, ResultStatus, Subject, SubjectType};
