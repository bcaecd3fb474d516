use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::ReconError;
use crate::model::{Balance, ResolvedEntry};

/// Snap near-zero values to exactly zero, round the rest to `scale` places.
pub fn snap_and_round(value: Decimal, scale: u32, zero_threshold: Decimal) -> Decimal {
    if value.abs() < zero_threshold {
        Decimal::ZERO
    } else {
        value.round_dp(scale).normalize()
    }
}

/// Group recognized entries by identifier and net their signed values.
///
/// Decimal addition is exact, so a balance does not depend on the order of
/// its contributing entries. Output is sorted by identifier.
pub fn aggregate_balances(
    recognized: &[ResolvedEntry],
    scale: u32,
    zero_threshold: Decimal,
) -> Result<Vec<Balance>, ReconError> {
    let mut groups: BTreeMap<&str, Decimal> = BTreeMap::new();

    for e in recognized {
        let total = groups.entry(e.id.as_str()).or_insert(Decimal::ZERO);
        *total = total
            .checked_add(e.signed_value)
            .ok_or_else(|| ReconError::AmountOverflow { id: e.id.clone() })?;
    }

    Ok(groups
        .into_iter()
        .map(|(id, total)| Balance {
            id: id.to_string(),
            result: snap_and_round(total, scale, zero_threshold),
        })
        .collect())
}
