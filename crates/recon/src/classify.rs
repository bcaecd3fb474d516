use std::collections::{BTreeSet, HashSet};

use rust_decimal::Decimal;

use crate::config::HistCodes;
use crate::model::{Balance, Dispositions, ResolvedEntry, SignSplit, SimilarPair};

/// Split balances by sign. Advance and Outstanding are sorted ascending by
/// result; ties fall back to identifier order.
pub fn split_by_sign(balances: &[Balance]) -> SignSplit {
    let mut split = SignSplit::default();

    for b in balances {
        if b.result.is_zero() {
            split.settled.push(b.clone());
        } else if b.result.is_sign_positive() {
            split.advance.push(b.clone());
        } else {
            split.outstanding.push(b.clone());
        }
    }

    let by_result = |a: &Balance, b: &Balance| a.result.cmp(&b.result).then_with(|| a.id.cmp(&b.id));
    split.advance.sort_by(by_result);
    split.outstanding.sort_by(by_result);
    split
}

/// Move Outstanding balances that look like next-period payments into Deferred.
///
/// A balance qualifies when its result equals the signed value of some debit
/// entry and it is not the negative side of any similar pair. Evaluated per
/// identifier; order inside both buckets is preserved.
pub fn apply_carry_forward(
    split: SignSplit,
    recognized: &[ResolvedEntry],
    pairs: &[SimilarPair],
    codes: &HistCodes,
) -> Dispositions {
    let debit_values: BTreeSet<Decimal> = recognized
        .iter()
        .filter(|e| e.entry.type_code == codes.debit)
        .map(|e| e.signed_value)
        .collect();

    let paired: HashSet<&str> = pairs.iter().map(|p| p.negative_id.as_str()).collect();

    let (deferred, outstanding): (Vec<Balance>, Vec<Balance>) =
        split.outstanding.into_iter().partition(|b| {
            debit_values.contains(&b.result) && !paired.contains(b.id.as_str())
        });

    Dispositions {
        settled: split.settled,
        advance: split.advance,
        outstanding,
        deferred,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::IdRule;
    use crate::model::Entry;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn bal(id: &str, result: &str) -> Balance {
        Balance { id: id.into(), result: dec(result) }
    }

    fn debit(id: &str, amount: &str) -> ResolvedEntry {
        ResolvedEntry {
            entry: Entry::new(dec(amount), 20, id),
            id: id.into(),
            id_rule: IdRule::DigitRun,
            signed_value: -dec(amount),
        }
    }

    fn credit(id: &str, amount: &str) -> ResolvedEntry {
        ResolvedEntry {
            entry: Entry::new(dec(amount), 133, id),
            id: id.into(),
            id_rule: IdRule::DigitRun,
            signed_value: dec(amount),
        }
    }

    fn pair(pos: &str, neg: &str, value: &str) -> SimilarPair {
        SimilarPair {
            positive_id: pos.into(),
            positive_result: dec(value),
            negative_id: neg.into(),
            negative_result: -dec(value),
        }
    }

    #[test]
    fn sign_split_orders_buckets() {
        let balances = vec![
            bal("a", "5"),
            bal("b", "-1"),
            bal("c", "0"),
            bal("d", "2"),
            bal("e", "-10"),
        ];
        let split = split_by_sign(&balances);
        assert_eq!(split.settled, vec![bal("c", "0")]);
        assert_eq!(split.advance, vec![bal("d", "2"), bal("a", "5")]);
        assert_eq!(split.outstanding, vec![bal("e", "-10"), bal("b", "-1")]);
    }

    #[test]
    fn ties_broken_by_id() {
        let split = split_by_sign(&[bal("z", "3"), bal("a", "3")]);
        assert_eq!(split.advance[0].id, "a");
        assert_eq!(split.advance[1].id, "z");
    }

    #[test]
    fn lone_debit_is_deferred() {
        let split = split_by_sign(&[bal("999", "-30")]);
        let out = apply_carry_forward(split, &[debit("999", "30")], &[], &HistCodes::default());
        assert!(out.outstanding.is_empty());
        assert_eq!(out.deferred, vec![bal("999", "-30")]);
    }

    #[test]
    fn paired_balance_stays_outstanding() {
        let split = split_by_sign(&[bal("456", "-50"), bal("789", "50")]);
        let recognized = vec![debit("456", "50"), credit("789", "50")];
        let pairs = vec![pair("789", "456", "50")];
        let out = apply_carry_forward(split, &recognized, &pairs, &HistCodes::default());
        assert_eq!(out.outstanding, vec![bal("456", "-50")]);
        assert!(out.deferred.is_empty());
        assert_eq!(out.advance, vec![bal("789", "50")]);
    }

    #[test]
    fn value_must_match_a_debit_entry() {
        // -70 is the net of two debits, no single debit is 70.
        let split = split_by_sign(&[bal("1", "-70")]);
        let recognized = vec![debit("1", "30"), debit("1", "40")];
        let out = apply_carry_forward(split, &recognized, &[], &HistCodes::default());
        assert_eq!(out.outstanding, vec![bal("1", "-70")]);
        assert!(out.deferred.is_empty());
    }

    #[test]
    fn debit_from_other_id_qualifies() {
        let split = split_by_sign(&[bal("1", "-30")]);
        let recognized = vec![debit("1", "50"), credit("1", "20"), debit("2", "30"), credit("2", "30")];
        let out = apply_carry_forward(split, &recognized, &[], &HistCodes::default());
        assert_eq!(out.deferred, vec![bal("1", "-30")]);
    }

    #[test]
    fn evaluated_per_id() {
        let split = split_by_sign(&[bal("a", "-30"), bal("b", "-30"), bal("c", "-5")]);
        let recognized = vec![debit("a", "30"), debit("b", "30"), debit("c", "6"), credit("c", "1")];
        let pairs = vec![pair("p", "a", "30")];
        let out = apply_carry_forward(split, &recognized, &pairs, &HistCodes::default());
        assert_eq!(out.deferred, vec![bal("b", "-30")]);
        assert_eq!(out.outstanding, vec![bal("a", "-30"), bal("c", "-5")]);
    }

    #[test]
    fn only_configured_debit_code_counts() {
        // entry carries code 20, debit is 21 here
        let split = split_by_sign(&[bal("1", "-30")]);
        let codes = HistCodes { debit: 21, credit: 133 };
        let out = apply_carry_forward(split, &[debit("1", "30")], &[], &codes);
        assert!(out.deferred.is_empty());
    }

    #[test]
    fn decimal_scale_does_not_matter() {
        let split = split_by_sign(&[bal("1", "-30")]);
        let out = apply_carry_forward(split, &[debit("1", "30.00")], &[], &HistCodes::default());
        assert_eq!(out.deferred.len(), 1);
    }
}
