//! Calculation logic for the Grade Engine.
//!
//! This module contains the grading pipeline: paper weight normalization,
//! subject scoring, score- and points-mode grade classification, subject
//! selection, student aggregation, group roll-ups, ranking with explicit
//! tie policies, and the end-to-end exam report built from them.

mod exam_report;
mod grade_classifier;
mod group_aggregator;
mod paper_normalizer;
mod ranker;
mod rounding;
mod student_aggregator;
mod subject_scorer;
mod subject_selector;

pub use exam_report::{compute_exam_report, subject_ranking};
pub use grade_classifier::{
    ClassificationMode, classify, classify_points, classify_score, fallback_grade,
};
pub use group_aggregator::{empty_histogram, roll_up, summarize_group, summarize_subject};
pub use paper_normalizer::{
    PaperNormalization, WEIGHT_TOLERANCE, WeightAdjustment, normalize_papers,
};
pub use ranker::{Placement, RankingPolicy, rank, ranks_in_input_order};
pub use rounding::{DISPLAY_DECIMAL_PLACES, display_to_f64, round_for_display};
pub use student_aggregator::{DEFAULT_MIN_SUBJECTS, StudentAggregate, aggregate_student};
pub use subject_scorer::{SubjectScore, score_subject};
pub use subject_selector::{
    DEFAULT_COMPULSORY_CAP, DEFAULT_ELECTIVE_CAP, SelectionPolicy, SubjectSelection,
    select_subjects,
};
