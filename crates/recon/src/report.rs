//! Report assembly: the six tables handed to an exporter.
//!
//! Tables are plain rows of typed cells so exporters never need engine types.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::{Balance, ReconResult, ResolvedEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Advance,
    Outstanding,
    Deferred,
    Unrecognized,
    Settled,
    Cleaned,
}

impl TableKind {
    /// Sheet order in the exported workbook.
    pub const ORDER: [TableKind; 6] = [
        TableKind::Advance,
        TableKind::Outstanding,
        TableKind::Deferred,
        TableKind::Unrecognized,
        TableKind::Settled,
        TableKind::Cleaned,
    ];

    pub fn sheet_name(&self) -> &'static str {
        match self {
            Self::Advance => "Advance",
            Self::Outstanding => "Outstanding",
            Self::Deferred => "Deferred",
            Self::Unrecognized => "Unrecognized",
            Self::Settled => "Settled",
            Self::Cleaned => "Cleaned",
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Advance | Self::Outstanding | Self::Deferred | Self::Settled => &["Id", "Result"],
            Self::Unrecognized => &["Amount", "TypeCode", "Reference"],
            Self::Cleaned => &["Id", "TypeCode", "Amount"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(Decimal),
    Integer(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub cells: Vec<Cell>,
    /// Row belongs to a similar pair; exporters render it emphasised.
    pub highlight: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTable {
    pub kind: TableKind,
    pub rows: Vec<ReportRow>,
}

impl ReportTable {
    pub fn name(&self) -> &'static str {
        self.kind.sheet_name()
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.kind.columns()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub tables: Vec<ReportTable>,
}

impl Report {
    pub fn table(&self, kind: TableKind) -> Option<&ReportTable> {
        self.tables.iter().find(|t| t.kind == kind)
    }
}

fn balance_rows(balances: &[Balance], highlighted: &HashSet<&str>) -> Vec<ReportRow> {
    balances
        .iter()
        .map(|b| ReportRow {
            cells: vec![Cell::Text(b.id.clone()), Cell::Number(b.result)],
            highlight: highlighted.contains(b.id.as_str()),
        })
        .collect()
}

fn highlighted_first(balances: &[Balance], highlighted: &HashSet<&str>, descending: bool) -> Vec<Balance> {
    let mut sorted = balances.to_vec();
    sorted.sort_by(|a, b| {
        let ha = highlighted.contains(a.id.as_str());
        let hb = highlighted.contains(b.id.as_str());
        let by_result = if descending {
            b.result.cmp(&a.result)
        } else {
            a.result.cmp(&b.result)
        };
        hb.cmp(&ha).then(by_result)
    });
    sorted
}

fn unrecognized_row(e: &ResolvedEntry) -> ReportRow {
    ReportRow {
        cells: vec![
            Cell::Number(e.entry.amount),
            Cell::Integer(e.entry.type_code as i64),
            Cell::Text(e.entry.reference.clone()),
        ],
        highlight: false,
    }
}

fn cleaned_row(e: &ResolvedEntry) -> ReportRow {
    ReportRow {
        cells: vec![
            Cell::Text(e.id.clone()),
            Cell::Integer(e.entry.type_code as i64),
            Cell::Number(e.entry.amount),
        ],
        highlight: false,
    }
}

/// Build the six report tables from a finished run.
///
/// Advance is ordered highlighted-first then by result ascending; Outstanding
/// highlighted-first then by result descending. Cleaned holds every entry,
/// sorted by identifier with input order kept among equal identifiers.
pub fn assemble_report(result: &ReconResult) -> Report {
    let d = &result.dispositions;
    let positive: HashSet<&str> = result.similar_pairs.iter().map(|p| p.positive_id.as_str()).collect();
    let negative: HashSet<&str> = result.similar_pairs.iter().map(|p| p.negative_id.as_str()).collect();
    let none = HashSet::new();

    let mut cleaned: Vec<&ResolvedEntry> = result.entries.iter().collect();
    cleaned.sort_by(|a, b| a.id.cmp(&b.id));

    let tables = TableKind::ORDER
        .iter()
        .map(|kind| {
            let rows = match kind {
                TableKind::Advance => {
                    balance_rows(&highlighted_first(&d.advance, &positive, false), &positive)
                }
                TableKind::Outstanding => {
                    balance_rows(&highlighted_first(&d.outstanding, &negative, true), &negative)
                }
                TableKind::Deferred => balance_rows(&d.deferred, &none),
                TableKind::Unrecognized => result.unrecognized.iter().map(unrecognized_row).collect(),
                TableKind::Settled => balance_rows(&d.settled, &none),
                TableKind::Cleaned => cleaned.iter().map(|e| cleaned_row(e)).collect(),
            };
            ReportTable { kind: *kind, rows }
        })
        .collect();

    Report { tables }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReconConfig;
    use crate::engine::run;
    use crate::model::Entry;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn entry(amount: &str, code: i32, reference: &str) -> Entry {
        Entry::new(dec(amount), code, reference)
    }

    fn ids(table: &ReportTable) -> Vec<String> {
        table
            .rows
            .iter()
            .map(|r| match &r.cells[0] {
                Cell::Text(s) => s.clone(),
                other => panic!("expected text id, got {other:?}"),
            })
            .collect()
    }

    fn report() -> Report {
        let entries = vec![
            // advance: 10 (paired), 20, 5
            entry("10", 133, "11"),
            entry("20", 133, "12"),
            entry("5", 133, "13"),
            // outstanding: -10 (paired), -3, -8; none equals a single debit
            entry("12", 20, "21"),
            entry("2", 133, "21"),
            entry("4", 20, "22"),
            entry("1", 133, "22"),
            entry("9", 20, "23"),
            entry("1", 133, "23"),
            // deferred
            entry("7", 20, "31"),
            // settled
            entry("1", 20, "41"),
            entry("1", 133, "41"),
            // unrecognized
            entry("2", 99, "51"),
        ];
        let result = run(&ReconConfig::default(), entries).unwrap();
        assemble_report(&result)
    }

    #[test]
    fn six_tables_in_sheet_order() {
        let r = report();
        let names: Vec<&str> = r.tables.iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            vec!["Advance", "Outstanding", "Deferred", "Unrecognized", "Settled", "Cleaned"]
        );
    }

    #[test]
    fn advance_highlighted_first_then_ascending() {
        let r = report();
        let t = r.table(TableKind::Advance).unwrap();
        assert_eq!(ids(t), vec!["11", "13", "12"]);
        assert!(t.rows[0].highlight);
        assert!(!t.rows[1].highlight);
        assert!(!t.rows[2].highlight);
    }

    #[test]
    fn outstanding_highlighted_first_then_descending() {
        let r = report();
        let t = r.table(TableKind::Outstanding).unwrap();
        assert_eq!(t.rows[0].cells[1], Cell::Number(dec("-10")));
        assert!(t.rows[0].highlight);
        assert_eq!(t.rows[1].cells[1], Cell::Number(dec("-3")));
        assert_eq!(t.rows[2].cells[1], Cell::Number(dec("-8")));
    }

    #[test]
    fn other_tables() {
        let r = report();
        let deferred = r.table(TableKind::Deferred).unwrap();
        assert_eq!(deferred.rows.len(), 1);
        assert_eq!(deferred.rows[0].cells[1], Cell::Number(dec("-7")));

        let unrec = r.table(TableKind::Unrecognized).unwrap();
        assert_eq!(
            unrec.rows[0].cells,
            vec![Cell::Number(dec("2")), Cell::Integer(99), Cell::Text("51".into())]
        );

        let settled = r.table(TableKind::Settled).unwrap();
        assert_eq!(settled.rows.len(), 1);

        let cleaned = r.table(TableKind::Cleaned).unwrap();
        assert_eq!(cleaned.rows.len(), 13);
        let cleaned_ids = ids(cleaned);
        let mut sorted = cleaned_ids.clone();
        sorted.sort();
        assert_eq!(cleaned_ids, sorted);
        assert_eq!(cleaned.columns(), &["Id", "TypeCode", "Amount"]);
    }
}
