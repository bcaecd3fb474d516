use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReconConfig {
    pub name: String,
    pub input: InputConfig,
    pub columns: ColumnMapping,
    pub codes: HistCodes,
    pub rounding: RoundingConfig,
    pub matching: MatchingConfig,
    pub output: OutputConfig,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            name: "default".into(),
            input: InputConfig::default(),
            columns: ColumnMapping::default(),
            codes: HistCodes::default(),
            rounding: RoundingConfig::default(),
            matching: MatchingConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Input format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub delimiter: char,
    pub decimal_separator: char,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thousands_separator: Option<char>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: '.',
            thousands_separator: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub amount: String,
    pub type_code: String,
    pub reference: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            amount: "Valor".into(),
            type_code: "Hist".into(),
            reference: "Complemento".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Hist codes
// ---------------------------------------------------------------------------

/// The two transaction-type codes that take part in netting.
///
/// `debit` entries are negated; they are also the candidates the
/// carry-forward rule compares Outstanding balances against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct HistCodes {
    pub debit: i32,
    pub credit: i32,
}

impl Default for HistCodes {
    fn default() -> Self {
        Self { debit: 20, credit: 133 }
    }
}

impl HistCodes {
    pub fn is_recognized(&self, code: i32) -> bool {
        code == self.debit || code == self.credit
    }
}

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoundingConfig {
    /// Decimal places kept on each balance.
    pub scale: u32,
    /// Balances with an absolute value below this snap to zero.
    /// Accepts plain (`"0.0000000001"`) or scientific (`"1e-10"`) notation.
    pub zero_threshold: String,
}

impl Default for RoundingConfig {
    fn default() -> Self {
        Self {
            scale: 10,
            zero_threshold: "1e-10".into(),
        }
    }
}

impl RoundingConfig {
    pub fn threshold(&self) -> Result<Decimal, ReconError> {
        let raw = self.zero_threshold.trim();
        Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .map_err(|_| {
                ReconError::ConfigValidation(format!(
                    "rounding.zero_threshold is not a decimal: '{raw}'"
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub strategy: MatchStrategy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Advance ascending, first Outstanding hit wins, Outstanding rows reusable.
    #[default]
    GreedyFirstFit,
}

impl std::fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GreedyFirstFit => write!(f, "greedy_first_fit"),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { dir: PathBuf::from("result") }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.codes.debit == self.codes.credit {
            return Err(ReconError::ConfigValidation(format!(
                "codes.debit and codes.credit must differ, both are {}",
                self.codes.debit
            )));
        }

        let input = &self.input;
        if !input.delimiter.is_ascii() {
            return Err(ReconError::ConfigValidation(format!(
                "input.delimiter must be a single ASCII character, got '{}'",
                input.delimiter
            )));
        }
        if input.delimiter == input.decimal_separator {
            return Err(ReconError::ConfigValidation(
                "input.delimiter and input.decimal_separator must differ".into(),
            ));
        }
        if input.decimal_separator != '.' && input.decimal_separator != ',' {
            return Err(ReconError::ConfigValidation(format!(
                "input.decimal_separator must be '.' or ',', got '{}'",
                input.decimal_separator
            )));
        }
        if input.thousands_separator == Some(input.decimal_separator) {
            return Err(ReconError::ConfigValidation(
                "input.thousands_separator and input.decimal_separator must differ".into(),
            ));
        }

        let cols = [
            ("amount", &self.columns.amount),
            ("type_code", &self.columns.type_code),
            ("reference", &self.columns.reference),
        ];
        for (key, name) in &cols {
            if name.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "columns.{key} must not be empty"
                )));
            }
        }
        if cols[0].1 == cols[1].1 || cols[0].1 == cols[2].1 || cols[1].1 == cols[2].1 {
            return Err(ReconError::ConfigValidation(
                "columns.amount, columns.type_code and columns.reference must be distinct".into(),
            ));
        }

        if self.rounding.scale > 28 {
            return Err(ReconError::ConfigValidation(format!(
                "rounding.scale must be at most 28, got {}",
                self.rounding.scale
            )));
        }
        if self.rounding.threshold()?.is_sign_negative() {
            return Err(ReconError::ConfigValidation(
                "rounding.zero_threshold must not be negative".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
