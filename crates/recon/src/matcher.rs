use crate::config::MatchStrategy;
use crate::model::{Balance, SimilarPair};

/// Find Advance/Outstanding balances that cancel each other, per strategy.
///
/// Both inputs are expected in ascending `result` order (as produced by
/// [`crate::classify::split_by_sign`]) and taken before carry-forward.
pub fn find_similar_pairs(
    advance: &[Balance],
    outstanding: &[Balance],
    strategy: MatchStrategy,
) -> Vec<SimilarPair> {
    match strategy {
        MatchStrategy::GreedyFirstFit => match_greedy_first_fit(advance, outstanding),
    }
}

/// Walk Advance in order and pair each with the first Outstanding balance of
/// equal magnitude. Each Advance balance yields at most one pair. Outstanding
/// balances are not consumed, so one can appear in several pairs.
pub fn match_greedy_first_fit(advance: &[Balance], outstanding: &[Balance]) -> Vec<SimilarPair> {
    let mut pairs: Vec<SimilarPair> = advance
        .iter()
        .filter_map(|pos| {
            outstanding
                .iter()
                .find(|neg| neg.result.abs() == pos.result.abs())
                .map(|neg| SimilarPair {
                    positive_id: pos.id.clone(),
                    positive_result: pos.result,
                    negative_id: neg.id.clone(),
                    negative_result: neg.result,
                })
        })
        .collect();

    pairs.sort_by(|a, b| a.positive_result.cmp(&b.positive_result));
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn bal(id: &str, result: &str) -> Balance {
        Balance {
            id: id.into(),
            result: Decimal::from_str(result).unwrap(),
        }
    }

    #[test]
    fn pairs_equal_magnitudes() {
        let advance = vec![bal("789", "50")];
        let outstanding = vec![bal("456", "-50")];
        let pairs = match_greedy_first_fit(&advance, &outstanding);
        assert_eq!(
            pairs,
            vec![SimilarPair {
                positive_id: "789".into(),
                positive_result: Decimal::from(50),
                negative_id: "456".into(),
                negative_result: Decimal::from(-50),
            }]
        );
    }

    #[test]
    fn first_outstanding_hit_wins() {
        let advance = vec![bal("p", "30")];
        let outstanding = vec![bal("n1", "-40"), bal("n2", "-30"), bal("n3", "-30")];
        let pairs = match_greedy_first_fit(&advance, &outstanding);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].negative_id, "n2");
    }

    #[test]
    fn outstanding_is_reused_across_advances() {
        let advance = vec![bal("p1", "30"), bal("p2", "30")];
        let outstanding = vec![bal("n", "-30")];
        let pairs = match_greedy_first_fit(&advance, &outstanding);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| p.negative_id == "n"));
        assert_eq!(pairs[0].positive_id, "p1");
        assert_eq!(pairs[1].positive_id, "p2");
    }

    #[test]
    fn pairs_always_cancel() {
        let advance = vec![bal("a", "0.1"), bal("b", "12.5"), bal("c", "99")];
        let outstanding = vec![bal("x", "-99"), bal("y", "-12.50"), bal("z", "-7")];
        let pairs = match_greedy_first_fit(&advance, &outstanding);
        assert_eq!(pairs.len(), 2);
        for p in &pairs {
            assert_eq!(p.positive_result, -p.negative_result);
        }
        assert_eq!(pairs[0].positive_id, "b");
        assert_eq!(pairs[1].positive_id, "c");
    }

    #[test]
    fn no_pairs_without_match() {
        let pairs = match_greedy_first_fit(&[bal("a", "1")], &[bal("b", "-2")]);
        assert!(pairs.is_empty());
        assert!(find_similar_pairs(&[], &[bal("b", "-2")], MatchStrategy::GreedyFirstFit).is_empty());
    }
}
