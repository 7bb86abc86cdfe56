//! Grade classification.
//!
//! Maps a numeric value to a (grade, points) pair using a [`GradingSystem`].
//! Score mode matches a 0–100 value against each rule's score range and is
//! used per subject. Points mode matches the floored value against each
//! rule's points and is used once per student (and per group) on mean
//! points. Both modes share the same fallback policy, and neither ever fails.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{GradeResult, GradeSource, GradingRule, GradingSystem};

/// Which field of the grading rules a value is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    /// Match against the `[min_score, max_score]` range.
    Score,
    /// Match the floored value against `points`.
    Points,
}

/// Classifies a value in the given mode.
pub fn classify(value: f64, mode: ClassificationMode, system: &GradingSystem) -> GradeResult {
    match mode {
        ClassificationMode::Score => classify_score(value, system),
        ClassificationMode::Points => classify_points(value, system),
    }
}

/// Classifies a 0–100 subject score.
///
/// Non-finite and negative values yield the "no grade" result. Otherwise the
/// rule whose range contains the value is chosen; when ranges overlap, the
/// rule whose midpoint is closest wins (the first configured on a tie). A
/// positive value that no rule covers falls back (see [`fallback_grade`]);
/// an uncovered zero yields "no grade".
///
/// # Examples
///
/// ```
/// use grade_engine::calculation::classify_score;
/// use grade_engine::models::{GradeSource, GradingSystem};
///
/// let cbc = GradingSystem::cbc_eight_level();
///
/// let grade = classify_score(76.0, &cbc);
/// assert_eq!(grade.grade, "EE2");
/// assert_eq!(grade.points, 7);
///
/// assert_eq!(classify_score(-3.0, &cbc).source, GradeSource::NoGrade);
/// ```
pub fn classify_score(value: f64, system: &GradingSystem) -> GradeResult {
    if !value.is_finite() || value < 0.0 {
        return GradeResult::no_grade();
    }

    let matched = system
        .graded_rules()
        .filter(|rule| rule.contains(value))
        .min_by(|a, b| {
            let da = (value - a.midpoint()).abs();
            let db = (value - b.midpoint()).abs();
            da.total_cmp(&db)
        });

    match matched {
        Some(rule) => GradeResult::from_rule(rule, GradeSource::Rule),
        None if value > 0.0 => {
            debug!(
                grading_system = %system.id,
                value,
                "No score range matched, using fallback grade"
            );
            fallback_grade(system)
        }
        None => GradeResult::no_grade(),
    }
}

/// Classifies a mean-points value.
///
/// The value is floored first. The rule whose `points` equals the floored
/// value is chosen; among duplicates the rule with the higher score band
/// wins. A positive floored value with no exact match falls back as in score
/// mode; an unmatched zero, a negative or a non-finite value yields
/// "no grade".
///
/// # Examples
///
/// ```
/// use grade_engine::calculation::classify_points;
/// use grade_engine::models::GradingSystem;
///
/// let cbc = GradingSystem::cbc_eight_level();
///
/// // 6.9 floors to 6
/// let grade = classify_points(6.9, &cbc);
/// assert_eq!(grade.grade, "ME1");
/// assert_eq!(grade.points, 6);
/// ```
pub fn classify_points(value: f64, system: &GradingSystem) -> GradeResult {
    if !value.is_finite() || value < 0.0 {
        return GradeResult::no_grade();
    }

    let floored = value.floor();
    let target = floored as u32;

    let matched = system
        .graded_rules()
        .filter(|rule| rule.points == target && f64::from(rule.points) == floored)
        .fold(None, |best: Option<&GradingRule>, rule| match best {
            Some(current) if current.max_score >= rule.max_score => Some(current),
            _ => Some(rule),
        });

    match matched {
        Some(rule) => GradeResult::from_rule(rule, GradeSource::Rule),
        None if floored > 0.0 => {
            debug!(
                grading_system = %system.id,
                points = floored,
                "No points value matched, using fallback grade"
            );
            fallback_grade(system)
        }
        None => GradeResult::no_grade(),
    }
}

/// Returns the grade used when no rule matches a positive value.
///
/// This is the system's lowest-scoring non-sentinel rule (lowest
/// `min_score`, then lowest points, then first configured). A system with no
/// such rule falls back to the hard-coded minimal pass grade worth 1 point.
///
/// # Examples
///
/// ```
/// use grade_engine::calculation::fallback_grade;
/// use grade_engine::models::{GradeSource, GradingSystem};
///
/// let grade = fallback_grade(&GradingSystem::cbc_eight_level());
/// assert_eq!(grade.grade, "BE2");
/// assert_eq!(grade.source, GradeSource::FallbackRule);
///
/// let empty = GradingSystem::new("empty", "Empty", vec![]);
/// let grade = fallback_grade(&empty);
/// assert_eq!((grade.grade.as_str(), grade.points), ("E", 1));
/// ```
pub fn fallback_grade(system: &GradingSystem) -> GradeResult {
    system
        .graded_rules()
        .min_by(|a, b| {
            a.min_score
                .total_cmp(&b.min_score)
                .then_with(|| a.points.cmp(&b.points))
        })
        .map(|rule| GradeResult::from_rule(rule, GradeSource::FallbackRule))
        .unwrap_or_else(GradeResult::minimal_pass)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Curriculum;

    fn rule(grade: &str, min: f64, max: f64, points: u32) -> GradingRule {
        GradingRule {
            grade: grade.to_string(),
            min_score: min,
            max_score: max,
            points,
            description: None,
            curriculum: Curriculum::Conventional,
        }
    }

    /// A(80–100,12), B(60–79,9), E(0–59,1) plus sentinels.
    fn simple_system() -> GradingSystem {
        GradingSystem::new(
            "simple",
            "Simple",
            vec![
                rule("A", 80.0, 100.0, 12),
                rule("B", 60.0, 79.0, 9),
                rule("E", 0.0, 59.0, 1),
                rule("X", 0.0, 0.0, 0),
                rule("Y", 0.0, 0.0, 0),
            ],
        )
    }

    // ==========================================================================
    // Score mode
    // ==========================================================================

    #[test]
    fn test_score_matches_containing_range() {
        let system = simple_system();
        assert_eq!(classify_score(85.0, &system).grade, "A");
        assert_eq!(classify_score(70.0, &system).grade, "B");
        assert_eq!(classify_score(40.0, &system).grade, "E");
    }

    #[test]
    fn test_score_range_bounds_are_inclusive() {
        let system = simple_system();
        assert_eq!(classify_score(80.0, &system).grade, "A");
        assert_eq!(classify_score(79.0, &system).grade, "B");
        assert_eq!(classify_score(100.0, &system).grade, "A");
    }

    #[test]
    fn test_negative_and_non_finite_scores_are_ungraded() {
        let system = simple_system();
        for value in [-0.01, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let grade = classify_score(value, &system);
            assert_eq!(grade.source, GradeSource::NoGrade);
            assert_eq!(grade.points, 0);
        }
    }

    #[test]
    fn test_score_in_gap_falls_back_to_lowest_rule() {
        let system = simple_system();
        let grade = classify_score(79.5, &system);
        assert_eq!(grade.grade, "E");
        assert_eq!(grade.points, 1);
        assert_eq!(grade.source, GradeSource::FallbackRule);
    }

    #[test]
    fn test_score_above_all_ranges_falls_back() {
        let grade = classify_score(104.0, &simple_system());
        assert_eq!(grade.grade, "E");
        assert!(grade.is_fallback());
    }

    #[test]
    fn test_uncovered_zero_is_ungraded() {
        let system = GradingSystem::new("s", "S", vec![rule("A", 50.0, 100.0, 12)]);
        assert_eq!(classify_score(0.0, &system).source, GradeSource::NoGrade);
    }

    #[test]
    fn test_sentinel_rules_never_match() {
        let system = GradingSystem::new(
            "s",
            "S",
            vec![rule("X", 0.0, 100.0, 0), rule("A", 50.0, 100.0, 12)],
        );
        assert_eq!(classify_score(75.0, &system).grade, "A");
        assert_eq!(classify_score(0.0, &system).source, GradeSource::NoGrade);
    }

    #[test]
    fn test_overlapping_ranges_prefer_closest_midpoint() {
        let system = GradingSystem::new(
            "overlap",
            "Overlap",
            vec![rule("Wide", 0.0, 100.0, 1), rule("Narrow", 60.0, 70.0, 5)],
        );
        // Wide midpoint 50, Narrow midpoint 65
        assert_eq!(classify_score(64.0, &system).grade, "Narrow");
        assert_eq!(classify_score(30.0, &system).grade, "Wide");
    }

    #[test]
    fn test_equidistant_midpoints_keep_first_rule() {
        let system = GradingSystem::new(
            "tie",
            "Tie",
            vec![rule("First", 40.0, 60.0, 2), rule("Second", 50.0, 50.0, 3)],
        );
        assert_eq!(classify_score(50.0, &system).grade, "First");
    }

    #[test]
    fn test_cbc_thresholds() {
        let cbc = GradingSystem::cbc_eight_level();
        let cases = [
            (100.0, "EE1"),
            (90.0, "EE1"),
            (89.99, "EE2"),
            (75.0, "EE2"),
            (74.5, "ME1"),
            (58.0, "ME1"),
            (41.0, "ME2"),
            (40.999, "AE1"),
            (31.0, "AE1"),
            (21.0, "AE2"),
            (11.0, "BE1"),
            (10.99, "BE2"),
            (0.5, "BE2"),
        ];
        for (value, expected) in cases {
            assert_eq!(classify_score(value, &cbc).grade, expected, "value {}", value);
        }
    }

    #[test]
    fn test_cbc_zero_score_is_lowest_band() {
        let cbc = GradingSystem::cbc_eight_level();

        let zero = classify_score(0.0, &cbc);
        assert_eq!(zero.grade, "BE2");
        assert_eq!(zero.points, 1);
        assert_eq!(zero.source, GradeSource::Rule);

        let below_eleven = classify_score(10.99, &cbc);
        assert_eq!(below_eleven.grade, "BE2");
        assert_eq!(below_eleven.source, GradeSource::Rule);
    }

    // ==========================================================================
    // Points mode
    // ==========================================================================

    #[test]
    fn test_points_exact_match() {
        let grade = classify_points(9.0, &simple_system());
        assert_eq!(grade.grade, "B");
        assert_eq!(grade.source, GradeSource::Rule);
    }

    #[test]
    fn test_points_value_is_floored() {
        assert_eq!(classify_points(12.99, &simple_system()).grade, "A");
        assert_eq!(classify_points(9.5, &simple_system()).grade, "B");
    }

    #[test]
    fn test_points_without_exact_match_fall_back() {
        // 22 / 3 = 7.33 floors to 7; no rule is worth 7 points
        let grade = classify_points(22.0 / 3.0, &simple_system());
        assert_eq!(grade.grade, "E");
        assert_eq!(grade.source, GradeSource::FallbackRule);
    }

    #[test]
    fn test_points_below_one_are_ungraded_without_zero_rule() {
        let grade = classify_points(0.75, &simple_system());
        assert_eq!(grade.source, GradeSource::NoGrade);
    }

    #[test]
    fn test_points_ignore_sentinel_rules() {
        // X and Y are worth 0 points but are never selected
        let grade = classify_points(0.0, &simple_system());
        assert_eq!(grade.grade, "-");
    }

    #[test]
    fn test_duplicate_points_prefer_higher_band() {
        let system = GradingSystem::new(
            "dup",
            "Dup",
            vec![rule("C-", 45.0, 49.0, 5), rule("C", 50.0, 54.0, 5)],
        );
        assert_eq!(classify_points(5.2, &system).grade, "C");
    }

    #[test]
    fn test_negative_points_are_ungraded() {
        assert_eq!(
            classify_points(-1.0, &simple_system()).source,
            GradeSource::NoGrade
        );
    }

    #[test]
    fn test_huge_points_value_falls_back() {
        let grade = classify_points(1e12, &simple_system());
        assert_eq!(grade.grade, "E");
    }

    // ==========================================================================
    // Fallback
    // ==========================================================================

    #[test]
    fn test_fallback_excludes_sentinels() {
        let grade = fallback_grade(&simple_system());
        assert_eq!(grade.grade, "E");
    }

    #[test]
    fn test_fallback_without_usable_rules_is_minimal_pass() {
        let system = GradingSystem::new("sentinels", "Sentinels", vec![rule("X", 0.0, 0.0, 0)]);
        let grade = fallback_grade(&system);
        assert_eq!(grade, GradeResult::minimal_pass());
        assert_eq!(classify_score(50.0, &system).points, 1);
    }

    #[test]
    fn test_classify_dispatches_on_mode() {
        let system = simple_system();
        assert_eq!(classify(12.0, ClassificationMode::Points, &system).grade, "A");
        assert_eq!(classify(12.0, ClassificationMode::Score, &system).grade, "E");
    }
}
