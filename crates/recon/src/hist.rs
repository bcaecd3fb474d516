use crate::config::HistCodes;
use crate::model::{HistPartition, ResolvedEntry};

/// Split entries into those whose type code takes part in netting and the rest.
/// Input order is kept inside each side.
pub fn partition_by_hist(entries: &[ResolvedEntry], codes: &HistCodes) -> HistPartition {
    let (recognized, unrecognized): (Vec<_>, Vec<_>) = entries
        .iter()
        .cloned()
        .partition(|e| codes.is_recognized(e.entry.type_code));

    HistPartition {
        recognized,
        unrecognized,
    }
}
