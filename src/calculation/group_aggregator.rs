//! Group aggregation.
//!
//! Rolls student results up into stream, class, gender and custom-group
//! summaries, and subject results up into per-subject summaries. Histograms
//! always start from the grading system's full label universe so that every
//! grade appears, even with a count of zero.

use crate::models::{
    GradeCount, GradeResult, GradingSystem, GroupKey, GroupSummary, StudentResult, Subject,
    SubjectSummary,
};

use super::rounding::{display_to_f64, round_for_display};
use super::{classify_points, classify_score};

/// Returns a zeroed histogram over the system's grade labels.
pub fn empty_histogram(system: &GradingSystem) -> Vec<GradeCount> {
    system
        .grade_labels()
        .into_iter()
        .map(|grade| GradeCount { grade, count: 0 })
        .collect()
}

/// Adds `count` to a grade's bucket, appending the label if it is outside
/// the universe (e.g. the "no grade" label) so bucket totals match entries.
fn add_to_histogram(histogram: &mut Vec<GradeCount>, grade: &str, count: u32) {
    match histogram.iter_mut().find(|g| g.grade == grade) {
        Some(bucket) => bucket.count += count,
        None => histogram.push(GradeCount {
            grade: grade.to_string(),
            count,
        }),
    }
}

/// Summarizes a group of students.
///
/// Every student counts toward `entry` and increments the bucket of their
/// overall grade ("X" for students below the subject minimum). Only
/// qualified students contribute to the mean, which is rounded to 2 dp
/// before the points-mode grade is looked up.
///
/// # Examples
///
/// ```
/// use grade_engine::calculation::summarize_group;
/// use grade_engine::models::{GradingSystem, GroupKey};
///
/// let key = GroupKey::Stream { class_id: 1, stream_id: 1 };
/// let summary = summarize_group(key, [], &GradingSystem::cbc_eight_level());
/// assert_eq!(summary.entry, 0);
/// assert_eq!(summary.grades.len(), 10);
/// assert!(summary.grades.iter().all(|g| g.count == 0));
/// ```
pub fn summarize_group<'a, I>(key: GroupKey, students: I, system: &GradingSystem) -> GroupSummary
where
    I: IntoIterator<Item = &'a StudentResult>,
{
    let mut grades = empty_histogram(system);
    let mut entry = 0;
    let mut qualified = 0;
    let mut points_total = 0.0;

    for student in students {
        entry += 1;
        add_to_histogram(&mut grades, &student.overall_grade.grade, 1);

        if let (true, Some(mean)) = (student.qualified, student.mean_points) {
            qualified += 1;
            points_total += mean;
        }
    }

    finish_group(key, entry, qualified, points_total, grades, system)
}

/// Rolls several group summaries up into one (e.g. streams into a class).
///
/// Entries, qualified counts, point totals and histogram buckets are summed,
/// and the mean is recomputed from the summed totals, so the roll-up is
/// additive by construction.
pub fn roll_up<'a, I>(key: GroupKey, parts: I, system: &GradingSystem) -> GroupSummary
where
    I: IntoIterator<Item = &'a GroupSummary>,
{
    let mut grades = empty_histogram(system);
    let mut entry = 0;
    let mut qualified = 0;
    let mut points_total = 0.0;

    for part in parts {
        entry += part.entry;
        qualified += part.qualified;
        points_total += part.points_total;
        for bucket in &part.grades {
            add_to_histogram(&mut grades, &bucket.grade, bucket.count);
        }
    }

    finish_group(key, entry, qualified, points_total, grades, system)
}

fn finish_group(
    key: GroupKey,
    entry: u32,
    qualified: u32,
    points_total: f64,
    grades: Vec<GradeCount>,
    system: &GradingSystem,
) -> GroupSummary {
    let (mean_score, overall_grade) = if qualified == 0 {
        (round_for_display(0.0), GradeResult::no_grade())
    } else {
        let mean = round_for_display(points_total / f64::from(qualified));
        (mean, classify_points(display_to_f64(mean), system))
    };

    GroupSummary {
        key,
        entry,
        qualified,
        points_total,
        grades,
        mean_score,
        overall_grade,
    }
}

/// Summarizes one subject across a cohort.
///
/// Students who sat the subject with a score above zero are counted; the
/// mean subject score is rounded to 2 dp and graded in score mode.
pub fn summarize_subject<'a, I>(
    subject: &Subject,
    students: I,
    system: &GradingSystem,
) -> SubjectSummary
where
    I: IntoIterator<Item = &'a StudentResult>,
{
    let mut grades = empty_histogram(system);
    let mut entry: u32 = 0;
    let mut score_total = 0.0;

    for scored in students
        .into_iter()
        .filter_map(|student| student.subject(subject.id))
        .filter(|scored| scored.score > 0.0)
    {
        entry += 1;
        score_total += scored.score;
        add_to_histogram(&mut grades, &scored.grade, 1);
    }

    let (mean_score, mean_grade) = if entry == 0 {
        (round_for_display(0.0), GradeResult::no_grade())
    } else {
        let mean = round_for_display(score_total / f64::from(entry));
        (mean, classify_score(display_to_f64(mean), system))
    };

    SubjectSummary {
        subject_id: subject.id,
        name: subject.name.clone(),
        entry,
        mean_score,
        mean_grade,
        grades,
    }
}
