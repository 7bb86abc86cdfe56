//! Subject score calculation.
//!
//! Combines a student's per-paper scores into one 0–100 subject score using
//! the normalized paper weights.

use crate::models::{NormalizedPaper, RawResult, Subject};

/// The composite score of one subject for one student.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectScore {
    /// The composite score. Not clamped: out-of-range paper scores flow through.
    pub score: f64,
    /// Number of papers that contributed.
    pub papers_scored: usize,
    /// Number of papers with no usable score for the student.
    pub papers_missing: usize,
    /// Number of papers skipped because their `max_score` is not positive.
    pub papers_invalid: usize,
}

/// Computes a student's subject score.
///
/// `results` are the student's raw results for this subject; only confirmed
/// results carrying a score are read. For a subject without papers the score
/// is the pseudo-paper result (`paper_id = None`), or 0 if absent. For a
/// paper-based subject each paper adds
/// `(paper_score / max_score) * (weight / 100) * 100`; a missing paper score
/// contributes nothing. `papers` should come from
/// [`normalize_papers`](super::normalize_papers) so iteration order is stable.
///
/// # Examples
///
/// ```
/// use grade_engine::calculation::score_subject;
/// use grade_engine::models::{NormalizedPaper, RawResult, ResultStatus, Subject, SubjectType};
///
/// let subject = Subject {
///     id: 1,
///     name: "Chemistry".into(),
///     code: None,
///     subject_type: SubjectType::Elective,
///     uses_papers: true,
/// };
/// let papers = vec![
///     NormalizedPaper { paper_id: Some(1), subject_id: 1, max_score: 80.0, weight: 50.0 },
///     NormalizedPaper { paper_id: Some(2), subject_id: 1, max_score: 40.0, weight: 50.0 },
/// ];
/// let results = vec![
///     RawResult { student_id: 7, subject_id: 1, paper_id: Some(1), score: Some(60.0), status: ResultStatus::Confirmed },
///     RawResult { student_id: 7, subject_id: 1, paper_id: Some(2), score: Some(30.0), status: ResultStatus::Confirmed },
/// ];
///
/// let score = score_subject(&subject, &papers, &results);
/// assert_eq!(score.score, 75.0);
/// ```
pub fn score_subject(
    subject: &Subject,
    papers: &[NormalizedPaper],
    results: &[RawResult],
) -> SubjectScore {
    if !subject.uses_papers {
        let score = results
            .iter()
            .filter(|r| r.paper_id.is_none())
            .find_map(RawResult::usable_score);
        return SubjectScore {
            score: score.unwrap_or(0.0),
            papers_scored: usize::from(score.is_some()),
            papers_missing: usize::from(score.is_none()),
            papers_invalid: 0,
        };
    }

    let mut total = 0.0;
    let mut papers_scored = 0;
    let mut papers_missing = 0;
    let mut papers_invalid = 0;

    for paper in papers {
        let Some(paper_id) = paper.paper_id else {
            continue;
        };

        let paper_score = results
            .iter()
            .filter(|r| r.paper_id == Some(paper_id))
            .find_map(RawResult::usable_score);

        match paper_score {
            None => papers_missing += 1,
            Some(_) if paper.max_score <= 0.0 => papers_invalid += 1,
            Some(value) => {
                total += (value / paper.max_score) * (paper.weight / 100.0) * 100.0;
                papers_scored += 1;
            }
        }
    }

    SubjectScore {
        score: total,
        papers_scored,
        papers_missing,
        papers_invalid,
    }
}
