//! Paper weight normalization.
//!
//! A paper-based subject's contribution percentages are configured per paper
//! and are frequently missing, all zero, or not summing to 100. This module
//! rescales them so they always sum to 100 before scoring.

use serde::{Deserialize, Serialize};

use crate::models::{NormalizedPaper, Paper};

/// Weights closer to 100 than this are treated as already normalized.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// What the normalizer had to do to the configured weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeightAdjustment {
    /// The weights already summed to 100 (or there were no papers).
    Unchanged,
    /// The weights summed to zero or were missing; each paper got `100 / N`.
    EqualSplit,
    /// The weights were rescaled by `100 / original_sum`.
    Rescaled {
        /// The sum of the configured weights.
        original_sum: f64,
    },
}

/// The normalized papers of one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperNormalization {
    /// The papers ordered by id ascending, with weights summing to 100.
    pub papers: Vec<NormalizedPaper>,
    /// How the configured weights were adjusted.
    pub adjustment: WeightAdjustment,
}

/// Normalizes the contribution percentages of one subject's papers.
///
/// Missing or non-finite percentages count as zero. If the weights sum to
/// zero every paper receives an equal share; otherwise, if they do not sum
/// to 100, each weight is scaled by `100 / sum`. The output is ordered by
/// paper id so that later floating-point sums are reproducible.
///
/// # Examples
///
/// ```
/// use grade_engine::calculation::{normalize_papers, WeightAdjustment};
/// use grade_engine::models::Paper;
///
/// let papers = vec![
///     Paper { id: 2, subject_id: 1, name: "P2".into(), max_score: 80.0, contribution_percentage: Some(30.0) },
///     Paper { id: 1, subject_id: 1, name: "P1".into(), max_score: 80.0, contribution_percentage: Some(30.0) },
/// ];
/// let result = normalize_papers(&papers);
///
/// assert_eq!(result.adjustment, WeightAdjustment::Rescaled { original_sum: 60.0 });
/// assert_eq!(result.papers[0].paper_id, Some(1));
/// assert_eq!(result.papers[0].weight, 50.0);
/// assert_eq!(result.papers[1].weight, 50.0);
/// ```
pub fn normalize_papers<'a, I>(papers: I) -> PaperNormalization
where
    I: IntoIterator<Item = &'a Paper>,
{
    let mut ordered: Vec<&Paper> = papers.into_iter().collect();
    ordered.sort_by_key(|p| p.id);

    if ordered.is_empty() {
        return PaperNormalization {
            papers: Vec::new(),
            adjustment: WeightAdjustment::Unchanged,
        };
    }

    let raw: Vec<f64> = ordered.iter().map(|p| raw_weight(p)).collect();
    let sum: f64 = raw.iter().sum();

    let (weights, adjustment) = if sum == 0.0 {
        let share = 100.0 / ordered.len() as f64;
        (vec![share; ordered.len()], WeightAdjustment::EqualSplit)
    } else if (sum - 100.0).abs() > WEIGHT_TOLERANCE {
        let factor = 100.0 / sum;
        (
            raw.iter().map(|w| w * factor).collect(),
            WeightAdjustment::Rescaled { original_sum: sum },
        )
    } else {
        (raw, WeightAdjustment::Unchanged)
    };

    let papers = ordered
        .iter()
        .zip(weights)
        .map(|(paper, weight)| NormalizedPaper {
            paper_id: Some(paper.id),
            subject_id: paper.subject_id,
            max_score: paper.max_score,
            weight,
        })
        .collect();

    PaperNormalization { papers, adjustment }
}

fn raw_weight(paper: &Paper) -> f64 {
    paper
        .contribution_percentage
        .filter(|w| w.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paper(id: u64, weight: Option<f64>) -> Paper {
        Paper {
            id,
            subject_id: 1,
            name: format!("Paper {}", id),
            max_score: 100.0,
            contribution_percentage: weight,
        }
    }

    fn weight_sum(result: &PaperNormalization) -> f64 {
        result.papers.iter().map(|p| p.weight).sum()
    }

    #[test]
    fn test_empty_list_is_noop() {
        let result = normalize_papers(&Vec::<Paper>::new());
        assert!(result.papers.is_empty());
        assert_eq!(result.adjustment, WeightAdjustment::Unchanged);
    }

    #[test]
    fn test_weights_summing_to_100_are_not_rescaled() {
        let papers = vec![paper(1, Some(60.0)), paper(2, Some(40.0))];
        let result = normalize_papers(&papers);

        assert_eq!(result.adjustment, WeightAdjustment::Unchanged);
        assert_eq!(result.papers[0].weight, 60.0);
        assert_eq!(result.papers[1].weight, 40.0);
    }

    #[test]
    fn test_all_zero_weights_split_equally() {
        let papers = vec![paper(1, Some(0.0)), paper(2, Some(0.0)), paper(3, Some(0.0))];
        let result = normalize_papers(&papers);

        assert_eq!(result.adjustment, WeightAdjustment::EqualSplit);
        for p in &result.papers {
            assert!((p.weight - 100.0 / 3.0).abs() < 1e-12);
        }
        assert!((weight_sum(&result) - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_weights_split_equally() {
        let papers = vec![paper(1, None), paper(2, None)];
        let result = normalize_papers(&papers);

        assert_eq!(result.adjustment, WeightAdjustment::EqualSplit);
        assert_eq!(result.papers[0].weight, 50.0);
        assert_eq!(result.papers[1].weight, 50.0);
    }

    #[test]
    fn test_unequal_weights_rescaled_proportionally() {
        let papers = vec![paper(1, Some(40.0)), paper(2, Some(40.0)), paper(3, Some(80.0))];
        let result = normalize_papers(&papers);

        assert_eq!(
            result.adjustment,
            WeightAdjustment::Rescaled {
                original_sum: 160.0
            }
        );
        assert_eq!(result.papers[0].weight, 25.0);
        assert_eq!(result.papers[1].weight, 25.0);
        assert_eq!(result.papers[2].weight, 50.0);
    }

    #[test]
    fn test_partially_missing_weight_counts_as_zero() {
        let papers = vec![paper(1, Some(50.0)), paper(2, None)];
        let result = normalize_papers(&papers);

        assert_eq!(result.papers[0].weight, 100.0);
        assert_eq!(result.papers[1].weight, 0.0);
    }

    #[test]
    fn test_output_ordered_by_paper_id() {
        let papers = vec![paper(9, Some(50.0)), paper(3, Some(50.0))];
        let result = normalize_papers(&papers);

        let ids: Vec<Option<u64>> = result.papers.iter().map(|p| p.paper_id).collect();
        assert_eq!(ids, vec![Some(3), Some(9)]);
    }

    #[test]
    fn test_non_finite_weight_ignored() {
        let papers = vec![paper(1, Some(f64::NAN)), paper(2, Some(25.0))];
        let result = normalize_papers(&papers);

        assert_eq!(result.papers[0].weight, 0.0);
        assert_eq!(result.papers[1].weight, 100.0);
    }
}
