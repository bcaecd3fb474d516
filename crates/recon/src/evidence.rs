use rust_decimal::Decimal;

use crate::error::ReconError;
use crate::model::{Balance, Dispositions, HistPartition, ReconSummary, ResolvedEntry, SimilarPair};

fn total(balances: &[Balance]) -> Result<Decimal, ReconError> {
    balances.iter().try_fold(Decimal::ZERO, |acc, b| {
        acc.checked_add(b.result)
            .ok_or_else(|| ReconError::AmountOverflow { id: b.id.clone() })
    })
}

/// Compute summary statistics for one run.
pub fn compute_summary(
    entries: &[ResolvedEntry],
    partition: &HistPartition,
    dispositions: &Dispositions,
    pairs: &[SimilarPair],
) -> Result<ReconSummary, ReconError> {
    Ok(ReconSummary {
        total_entries: entries.len(),
        recognized_entries: partition.recognized.len(),
        unrecognized_entries: partition.unrecognized.len(),
        balances: dispositions.len(),
        settled: dispositions.settled.len(),
        advance: dispositions.advance.len(),
        outstanding: dispositions.outstanding.len(),
        deferred: dispositions.deferred.len(),
        similar_pairs: pairs.len(),
        advance_total: total(&dispositions.advance)?,
        outstanding_total: total(&dispositions.outstanding)?,
        deferred_total: total(&dispositions.deferred)?,
    })
}
