//! Ranking with explicit tie policies.
//!
//! Two policies exist because different reports expect different positions
//! for tied students: merit lists use [`RankingPolicy::Dense`], per-subject
//! rankings within a group use [`RankingPolicy::Competition`]. Callers must
//! pick one explicitly.

use serde::{Deserialize, Serialize};

/// How tied values are positioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Ties share a rank and the next distinct value is ranked one higher
    /// (`[10, 10, 8]` → `[1, 1, 2]`). Used for class merit lists.
    Dense,
    /// Ties share the position of the first tied entry and the next distinct
    /// value takes its 1-based position (`[10, 10, 8]` → `[1, 1, 3]`). Used
    /// for subject ranking within a group.
    Competition,
}

/// One entry of a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Index of the value in the input slice.
    pub index: usize,
    /// The ranked value.
    pub value: f64,
    /// The 1-based rank.
    pub rank: u32,
}

/// Ranks values in descending order under the given policy.
///
/// The result is ordered by rank. Equal values keep their input order; no
/// secondary key is applied. NaN ranks below every number.
///
/// # Examples
///
/// ```
/// use grade_engine::calculation::{rank, RankingPolicy};
///
/// let totals = [10.0, 10.0, 8.0, 8.0, 6.0];
///
/// let dense: Vec<u32> = rank(&totals, RankingPolicy::Dense).iter().map(|p| p.rank).collect();
/// assert_eq!(dense, vec![1, 1, 2, 2, 3]);
///
/// let competition: Vec<u32> = rank(&totals, RankingPolicy::Competition)
///     .iter()
///     .map(|p| p.rank)
///     .collect();
/// assert_eq!(competition, vec![1, 1, 3, 3, 5]);
/// ```
pub fn rank(values: &[f64], policy: RankingPolicy) -> Vec<Placement> {
    let keys: Vec<f64> = values.iter().copied().map(ranking_key).collect();

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| keys[b].total_cmp(&keys[a]));

    let mut placements = Vec::with_capacity(order.len());
    let mut current_rank: u32 = 0;
    let mut previous: Option<f64> = None;

    for (position, &index) in order.iter().enumerate() {
        let key = keys[index];
        let starts_new_block = previous.is_none_or(|p| key < p);

        if starts_new_block {
            current_rank = match policy {
                RankingPolicy::Dense => current_rank + 1,
                RankingPolicy::Competition => position as u32 + 1,
            };
        }
        previous = Some(key);

        placements.push(Placement {
            index,
            value: values[index],
            rank: current_rank,
        });
    }

    placements
}

/// Returns ranks aligned with the input order.
///
/// # Examples
///
/// ```
/// use grade_engine::calculation::{ranks_in_input_order, RankingPolicy};
///
/// let ranks = ranks_in_input_order(&[55.0, 71.0, 55.0], RankingPolicy::Competition);
/// assert_eq!(ranks, vec![2, 1, 2]);
/// ```
pub fn ranks_in_input_order(values: &[f64], policy: RankingPolicy) -> Vec<u32> {
    let mut ranks = vec![0; values.len()];
    for placement in rank(values, policy) {
        ranks[placement.index] = placement.rank;
    }
    ranks
}

/// NaN sorts last and negative zero ties with zero.
fn ranking_key(value: f64) -> f64 {
    if value.is_nan() {
        f64::NEG_INFINITY
    } else if value == 0.0 {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranks(values: &[f64], policy: RankingPolicy) -> Vec<u32> {
        rank(values, policy).iter().map(|p| p.rank).collect()
    }

    fn indices(values: &[f64], policy: RankingPolicy) -> Vec<usize> {
        rank(values, policy).iter().map(|p| p.index).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(&[], RankingPolicy::Dense).is_empty());
        assert!(ranks_in_input_order(&[], RankingPolicy::Competition).is_empty());
    }

    #[test]
    fn test_dense_advances_by_one_after_ties() {
        assert_eq!(
            ranks(&[10.0, 10.0, 8.0, 8.0, 6.0], RankingPolicy::Dense),
            vec![1, 1, 2, 2, 3]
        );
    }

    #[test]
    fn test_competition_skips_after_ties() {
        assert_eq!(
            ranks(&[10.0, 10.0, 8.0, 8.0, 6.0], RankingPolicy::Competition),
            vec![1, 1, 3, 3, 5]
        );
    }

    #[test]
    fn test_unsorted_input_is_sorted_descending() {
        let values = [6.0, 10.0, 8.0];
        assert_eq!(indices(&values, RankingPolicy::Dense), vec![1, 2, 0]);
        assert_eq!(ranks(&values, RankingPolicy::Dense), vec![1, 2, 3]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let values = [5.0, 9.0, 5.0, 9.0, 5.0];
        assert_eq!(
            indices(&values, RankingPolicy::Competition),
            vec![1, 3, 0, 2, 4]
        );
    }

    #[test]
    fn test_all_equal_values_share_rank_one() {
        assert_eq!(ranks(&[7.0; 4], RankingPolicy::Dense), vec![1, 1, 1, 1]);
        assert_eq!(ranks(&[7.0; 4], RankingPolicy::Competition), vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_nan_ranks_last() {
        let values = [f64::NAN, 3.0, 4.0];
        assert_eq!(indices(&values, RankingPolicy::Dense), vec![2, 1, 0]);
        assert_eq!(ranks(&values, RankingPolicy::Competition), vec![1, 2, 3]);
    }

    #[test]
    fn test_negative_zero_ties_with_zero() {
        assert_eq!(ranks(&[0.0, -0.0], RankingPolicy::Dense), vec![1, 1]);
    }

    #[test]
    fn test_reranking_ranked_values_is_idempotent() {
        let values = [3.0, 9.0, 9.0, 1.0, 3.0, 7.0];
        for policy in [RankingPolicy::Dense, RankingPolicy::Competition] {
            let first = rank(&values, policy);
            let sorted: Vec<f64> = first.iter().map(|p| p.value).collect();
            let second = rank(&sorted, policy);

            let first_ranks: Vec<u32> = first.iter().map(|p| p.rank).collect();
            let second_ranks: Vec<u32> = second.iter().map(|p| p.rank).collect();
            assert_eq!(first_ranks, second_ranks);
        }
    }

    #[test]
    fn test_ranks_in_input_order() {
        assert_eq!(
            ranks_in_input_order(&[8.0, 10.0, 8.0, 6.0], RankingPolicy::Dense),
            vec![2, 1, 2, 3]
        );
    }
}
