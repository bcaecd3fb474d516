//! Identifier recovery from free-text references.
//!
//! Rules are tried in priority order and the first one that yields a value
//! wins. Adding a rule means adding a variant and placing it in [`IdRule::PRIORITY`].

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

static DOCUMENT_NUMBER: OnceLock<Regex> = OnceLock::new();
static DIGIT_RUN: OnceLock<Regex> = OnceLock::new();

fn document_number() -> &'static Regex {
    DOCUMENT_NUMBER.get_or_init(|| {
        Regex::new(r"\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}").expect("document-number pattern is valid")
    })
}

fn digit_run() -> &'static Regex {
    DIGIT_RUN.get_or_init(|| Regex::new(r"\d+").expect("digit-run pattern is valid"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdRule {
    /// `NN.NNN.NNN/NNNN-NN` document number (first occurrence).
    DocumentNumber,
    /// First run of digits.
    DigitRun,
    /// The whole reference text, untouched.
    Verbatim,
}

impl IdRule {
    pub const PRIORITY: [IdRule; 3] = [IdRule::DocumentNumber, IdRule::DigitRun, IdRule::Verbatim];

    pub fn extract<'a>(&self, reference: &'a str) -> Option<&'a str> {
        match self {
            Self::DocumentNumber => document_number().find(reference).map(|m| m.as_str()),
            Self::DigitRun => digit_run().find(reference).map(|m| m.as_str()),
            Self::Verbatim => {
                if reference.is_empty() {
                    None
                } else {
                    Some(reference)
                }
            }
        }
    }
}

impl std::fmt::Display for IdRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DocumentNumber => write!(f, "document_number"),
            Self::DigitRun => write!(f, "digit_run"),
            Self::Verbatim => write!(f, "verbatim"),
        }
    }
}

/// Resolve the identifier a reference points at. `None` only for empty text.
pub fn resolve_id(reference: &str) -> Option<(String, IdRule)> {
    IdRule::PRIORITY
        .iter()
        .find_map(|rule| rule.extract(reference).map(|id| (id.to_string(), *rule)))
}
