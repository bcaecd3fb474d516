use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::aggregate::aggregate_balances;
use crate::classify::{apply_carry_forward, split_by_sign};
use crate::config::{HistCodes, InputConfig, ReconConfig};
use crate::error::ReconError;
use crate::evidence::compute_summary;
use crate::hist::partition_by_hist;
use crate::identifier::{resolve_id, IdRule};
use crate::matcher::find_similar_pairs;
use crate::model::{Entry, ReconMeta, ReconResult, ResolvedEntry};

/// Run reconciliation over one batch of entries.
///
/// Similar pairs are computed from the sign split first; the carry-forward
/// rule then runs against those pairs. No stage mutates its input.
pub fn run(config: &ReconConfig, entries: Vec<Entry>) -> Result<ReconResult, ReconError> {
    let threshold = config.rounding.threshold()?;

    let resolved = resolve_entries(entries, &config.codes)?;
    let partition = partition_by_hist(&resolved, &config.codes);
    log::debug!(
        "hist filter: {} recognized, {} unrecognized",
        partition.recognized.len(),
        partition.unrecognized.len()
    );

    let balances = aggregate_balances(&partition.recognized, config.rounding.scale, threshold)?;
    log::debug!("aggregated {} balances", balances.len());

    // Phase 1: sign split + matching on pre-deferral buckets
    let split = split_by_sign(&balances);
    let similar_pairs =
        find_similar_pairs(&split.advance, &split.outstanding, config.matching.strategy);
    log::debug!(
        "{} similar pairs ({} advance x {} outstanding)",
        similar_pairs.len(),
        split.advance.len(),
        split.outstanding.len()
    );

    // Phase 2: carry-forward
    let dispositions =
        apply_carry_forward(split, &partition.recognized, &similar_pairs, &config.codes);
    log::debug!("{} balances deferred", dispositions.deferred.len());

    let summary = compute_summary(&resolved, &partition, &dispositions, &similar_pairs)?;

    Ok(ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            strategy: config.matching.strategy,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        dispositions,
        similar_pairs,
        unrecognized: partition.unrecognized,
        entries: resolved,
    })
}

/// Load a delimited batch and reconcile it.
pub fn run_csv(config: &ReconConfig, csv_data: &str) -> Result<ReconResult, ReconError> {
    let entries = load_csv_entries(csv_data, config)?;
    run(config, entries)
}

/// Signed contribution of an entry: debits negate, credits keep, others pass through.
pub fn signed_value(amount: Decimal, type_code: i32, codes: &HistCodes) -> Decimal {
    if type_code == codes.debit {
        -amount
    } else {
        amount
    }
}

/// Derive identifier and signed value for every entry. Same order, same count.
pub fn resolve_entries(
    entries: Vec<Entry>,
    codes: &HistCodes,
) -> Result<Vec<ResolvedEntry>, ReconError> {
    let mut verbatim = 0usize;

    let resolved = entries
        .into_iter()
        .map(|entry| {
            let (id, id_rule) = resolve_id(&entry.reference)
                .ok_or(ReconError::EmptyReference { line: entry.line })?;
            if id_rule == IdRule::Verbatim {
                verbatim += 1;
            }
            let signed_value = signed_value(entry.amount, entry.type_code, codes);
            Ok(ResolvedEntry {
                entry,
                id,
                id_rule,
                signed_value,
            })
        })
        .collect::<Result<Vec<_>, ReconError>>()?;

    if verbatim > 0 {
        log::warn!("{verbatim} entries have no numeric identifier; using reference text as-is");
    }

    Ok(resolved)
}

/// Load delimited rows into entries, locating the configured columns by header name.
pub fn load_csv_entries(csv_data: &str, config: &ReconConfig) -> Result<Vec<Entry>, ReconError> {
    let input = &config.input;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(input.delimiter as u8)
        .trim(csv::Trim::Headers)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let col = &config.columns;

    let idx = |name: &str| -> Result<usize, ReconError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ReconError::MissingColumn { column: name.into() })
    };

    let amount_idx = idx(&col.amount)?;
    let type_code_idx = idx(&col.type_code)?;
    let reference_idx = idx(&col.reference)?;

    let mut entries = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Csv(e.to_string()))?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        let amount_str = record.get(amount_idx).unwrap_or("");
        let amount = parse_amount(amount_str, input).ok_or_else(|| ReconError::AmountParse {
            line,
            value: amount_str.into(),
        })?;

        let code_str = record.get(type_code_idx).unwrap_or("");
        let type_code = parse_type_code(code_str).ok_or_else(|| ReconError::TypeCodeParse {
            line,
            value: code_str.into(),
        })?;

        let reference = record.get(reference_idx).unwrap_or("").to_string();
        if reference.is_empty() {
            return Err(ReconError::EmptyReference { line });
        }

        entries.push(Entry {
            line,
            amount,
            type_code,
            reference,
        });
    }

    log::debug!("loaded {} entries", entries.len());
    Ok(entries)
}

/// Parse an amount honouring the configured separators.
/// Accepts `1234.5`, `1.234,5` (with `,` decimal and `.` thousands) and `1e3`.
pub fn parse_amount(raw: &str, input: &InputConfig) -> Option<Decimal> {
    let mut s = raw.trim().to_string();
    if s.is_empty() {
        return None;
    }
    if let Some(sep) = input.thousands_separator {
        s.retain(|c| c != sep);
    }
    if input.decimal_separator != '.' {
        s = s.replace(input.decimal_separator, ".");
    }
    Decimal::from_str(&s)
        .or_else(|_| Decimal::from_scientific(&s))
        .ok()
}

/// Parse a type code. Integral floats (`20.0`) from spreadsheet exports are accepted.
pub fn parse_type_code(raw: &str) -> Option<i32> {
    let s = raw.trim();
    if let Ok(code) = s.parse::<i32>() {
        return Some(code);
    }
    let d = Decimal::from_str(s).ok()?;
    if d.fract().is_zero() {
        d.to_i32()
    } else {
        None
    }
}
