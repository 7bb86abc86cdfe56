//! Subject selection.
//!
//! Chooses which of a student's scored subjects count toward the overall
//! result. In exams with paper-based subjects the composite follows the
//! "5 compulsory + 2 best electives" rule; otherwise every graded subject
//! counts.

use serde::{Deserialize, Serialize};

use crate::models::{ScoredSubject, SubjectType};

/// Default number of compulsory subjects counted.
pub const DEFAULT_COMPULSORY_CAP: usize = 5;

/// Default number of elective subjects counted.
pub const DEFAULT_ELECTIVE_CAP: usize = 2;

/// Caps applied when an exam uses papers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPolicy {
    /// Maximum number of compulsory subjects counted.
    pub compulsory_cap: usize,
    /// Maximum number of elective subjects counted.
    pub elective_cap: usize,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            compulsory_cap: DEFAULT_COMPULSORY_CAP,
            elective_cap: DEFAULT_ELECTIVE_CAP,
        }
    }
}

/// The outcome of subject selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectSelection {
    /// The counted subjects: capped compulsory subjects in original order,
    /// then the best electives by points.
    pub selected: Vec<ScoredSubject>,
    /// Subjects discarded for a score of zero or less.
    pub ungraded: Vec<u64>,
    /// Graded subjects left out by the caps.
    pub capped_out: Vec<u64>,
}

/// Selects the subjects that count toward a student's totals.
///
/// Subjects with a score of zero or less are discarded first. If
/// `exam_uses_papers` is false every remaining subject is selected. Otherwise
/// at most `compulsory_cap` compulsory subjects are taken in their original
/// order, and electives are stably sorted by points descending before the
/// first `elective_cap` are taken.
///
/// # Examples
///
/// ```
/// use grade_engine::calculation::{select_subjects, SelectionPolicy};
/// use grade_engine::models::{ScoredSubject, SubjectType};
///
/// let elective = |id: u64, points: u32| ScoredSubject {
///     subject_id: id,
///     subject_type: SubjectType::Elective,
///     score: 50.0,
///     grade: "C".into(),
///     points,
/// };
/// let subjects = vec![elective(1, 4), elective(2, 9), elective(3, 7)];
///
/// let selection = select_subjects(&subjects, true, &SelectionPolicy::default());
/// let ids: Vec<u64> = selection.selected.iter().map(|s| s.subject_id).collect();
/// assert_eq!(ids, vec![2, 3]);
/// assert_eq!(selection.capped_out, vec![1]);
/// ```
pub fn select_subjects(
    subjects: &[ScoredSubject],
    exam_uses_papers: bool,
    policy: &SelectionPolicy,
) -> SubjectSelection {
    let (graded, ungraded): (Vec<&ScoredSubject>, Vec<&ScoredSubject>) =
        subjects.iter().partition(|s| s.score > 0.0);
    let ungraded = ungraded.iter().map(|s| s.subject_id).collect();

    if !exam_uses_papers {
        return SubjectSelection {
            selected: graded.into_iter().cloned().collect(),
            ungraded,
            capped_out: Vec::new(),
        };
    }

    let (compulsory, mut electives): (Vec<&ScoredSubject>, Vec<&ScoredSubject>) = graded
        .into_iter()
        .partition(|s| s.subject_type == SubjectType::Compulsory);

    // Stable: electives with equal points keep their original order.
    electives.sort_by(|a, b| b.points.cmp(&a.points));

    let compulsory_take = compulsory.len().min(policy.compulsory_cap);
    let elective_take = electives.len().min(policy.elective_cap);

    let capped_out = compulsory[compulsory_take..]
        .iter()
        .chain(&electives[elective_take..])
        .map(|s| s.subject_id)
        .collect();

    let selected = compulsory[..compulsory_take]
        .iter()
        .chain(&electives[..elective_take])
        .map(|s| (*s).clone())
        .collect();

    SubjectSelection {
        selected,
        ungraded,
        capped_out,
    }
}
