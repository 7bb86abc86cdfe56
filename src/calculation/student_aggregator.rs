//! Student aggregation.
//!
//! Turns a student's selected subjects into totals, mean points and an
//! overall grade.

use crate::models::{GradeResult, GradingSystem, ScoredSubject};

use super::classify_points;

/// Minimum subject count used when an exam does not configure one.
pub const DEFAULT_MIN_SUBJECTS: u32 = 7;

/// A student's aggregated totals.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentAggregate {
    /// Sum of the selected subject scores.
    pub total_score: f64,
    /// Sum of the selected subject points, saturating at `u32::MAX`.
    pub total_points: u32,
    /// `total_points / min_subjects`; `None` for students below the minimum.
    pub mean_points: Option<f64>,
    /// Points-mode grade of the mean, or the insufficient-subjects sentinel.
    pub overall_grade: GradeResult,
    /// Whether the student holds at least `min_subjects` selected subjects.
    pub qualified: bool,
}

/// Aggregates a student's selected subjects.
///
/// A student with fewer selected subjects than `min_subjects` receives the
/// "X" sentinel grade and no mean. Otherwise mean points are the total points
/// divided by `min_subjects` (not by the number selected), and the overall
/// grade is the points-mode classification of that mean. A `min_subjects` of
/// zero is treated as one.
///
/// # Examples
///
/// ```
/// use grade_engine::calculation::aggregate_student;
/// use grade_engine::models::{GradingSystem, ScoredSubject, SubjectType};
///
/// let subject = |id: u64, points: u32| ScoredSubject {
///     subject_id: id,
///     subject_type: SubjectType::Compulsory,
///     score: 70.0,
///     grade: "ME1".into(),
///     points,
/// };
/// let selected = vec![subject(1, 6), subject(2, 6), subject(3, 7)];
///
/// let aggregate = aggregate_student(&selected, 3, &GradingSystem::cbc_eight_level());
/// assert_eq!(aggregate.total_points, 19);
/// assert_eq!(aggregate.overall_grade.grade, "ME1");
///
/// let short = aggregate_student(&selected, 7, &GradingSystem::cbc_eight_level());
/// assert_eq!(short.overall_grade.grade, "X");
/// assert!(short.mean_points.is_none());
/// ```
pub fn aggregate_student(
    selected: &[ScoredSubject],
    min_subjects: u32,
    system: &GradingSystem,
) -> StudentAggregate {
    let min_subjects = min_subjects.max(1);
    let total_score: f64 = selected.iter().map(|s| s.score).sum();
    let total_points = selected
        .iter()
        .fold(0u32, |total, s| total.saturating_add(s.points));

    if selected.len() < min_subjects as usize {
        return StudentAggregate {
            total_score,
            total_points,
            mean_points: None,
            overall_grade: GradeResult::insufficient_subjects(),
            qualified: false,
        };
    }

    let mean_points = f64::from(total_points) / f64::from(min_subjects);

    StudentAggregate {
        total_score,
        total_points,
        mean_points: Some(mean_points),
        overall_grade: classify_points(mean_points, system),
        qualified: true,
    }
}
