use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::MatchStrategy;
use crate::identifier::IdRule;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One raw transaction line as read from the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    /// 1-based line in the source file, header included. Zero when built in memory.
    pub line: usize,
    pub amount: Decimal,
    pub type_code: i32,
    pub reference: String,
}

impl Entry {
    pub fn new(amount: Decimal, type_code: i32, reference: impl Into<String>) -> Self {
        Self {
            line: 0,
            amount,
            type_code,
            reference: reference.into(),
        }
    }
}

/// An entry with its identifier and signed value derived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedEntry {
    #[serde(flatten)]
    pub entry: Entry,
    pub id: String,
    pub id_rule: IdRule,
    pub signed_value: Decimal,
}

/// Entries split by whether their type code takes part in netting.
#[derive(Debug, Clone, Default)]
pub struct HistPartition {
    pub recognized: Vec<ResolvedEntry>,
    pub unrecognized: Vec<ResolvedEntry>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Net signed value for one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub id: String,
    pub result: Decimal,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Settled,
    Advance,
    Outstanding,
    Deferred,
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Settled => write!(f, "settled"),
            Self::Advance => write!(f, "advance"),
            Self::Outstanding => write!(f, "outstanding"),
            Self::Deferred => write!(f, "deferred"),
        }
    }
}

/// Sign split before the carry-forward rule runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SignSplit {
    pub settled: Vec<Balance>,
    pub advance: Vec<Balance>,
    pub outstanding: Vec<Balance>,
}

/// Final partition of the balance set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dispositions {
    pub settled: Vec<Balance>,
    pub advance: Vec<Balance>,
    pub outstanding: Vec<Balance>,
    pub deferred: Vec<Balance>,
}

impl Dispositions {
    pub fn bucket(&self, disposition: Disposition) -> &[Balance] {
        match disposition {
            Disposition::Settled => &self.settled,
            Disposition::Advance => &self.advance,
            Disposition::Outstanding => &self.outstanding,
            Disposition::Deferred => &self.deferred,
        }
    }

    /// Which bucket an identifier landed in, if any.
    pub fn disposition_of(&self, id: &str) -> Option<Disposition> {
        [
            Disposition::Settled,
            Disposition::Advance,
            Disposition::Outstanding,
            Disposition::Deferred,
        ]
        .into_iter()
        .find(|d| self.bucket(*d).iter().any(|b| b.id == id))
    }

    pub fn len(&self) -> usize {
        self.settled.len() + self.advance.len() + self.outstanding.len() + self.deferred.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// An Advance balance and an Outstanding balance that cancel each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimilarPair {
    pub positive_id: String,
    pub positive_result: Decimal,
    pub negative_id: String,
    pub negative_result: Decimal,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconSummary {
    pub total_entries: usize,
    pub recognized_entries: usize,
    pub unrecognized_entries: usize,
    pub balances: usize,
    pub settled: usize,
    pub advance: usize,
    pub outstanding: usize,
    pub deferred: usize,
    pub similar_pairs: usize,
    pub advance_total: Decimal,
    pub outstanding_total: Decimal,
    pub deferred_total: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub strategy: MatchStrategy,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub dispositions: Dispositions,
    pub similar_pairs: Vec<SimilarPair>,
    pub unrecognized: Vec<ResolvedEntry>,
    /// Every loaded entry, in input order.
    #[serde(skip)]
    pub entries: Vec<ResolvedEntry>,
}
