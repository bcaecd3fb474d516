use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (duplicate codes, bad separators, etc.).
    ConfigValidation(String),
    /// Missing required column in the input header.
    MissingColumn { column: String },
    /// Amount cell is empty or not a decimal number.
    AmountParse { line: usize, value: String },
    /// Type-code cell is empty or not an integer.
    TypeCodeParse { line: usize, value: String },
    /// Reference cell is empty, so no identifier can be derived.
    EmptyReference { line: usize },
    /// Malformed delimited input (ragged rows, bad quoting, etc.).
    Csv(String),
    /// Netting amounts for this identifier exceeds the decimal range.
    AmountOverflow { id: String },
}

impl ReconError {
    /// True for errors caused by the shape or content of the input batch.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::MissingColumn { .. }
                | Self::AmountParse { .. }
                | Self::TypeCodeParse { .. }
                | Self::EmptyReference { .. }
                | Self::Csv(_)
                | Self::AmountOverflow { .. }
        )
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { column } => write!(f, "schema error: missing column '{column}'"),
            Self::AmountParse { line, value } => {
                write!(f, "schema error: line {line}: cannot parse amount '{value}'")
            }
            Self::TypeCodeParse { line, value } => {
                write!(f, "schema error: line {line}: cannot parse type code '{value}'")
            }
            Self::EmptyReference { line } => {
                write!(f, "schema error: line {line}: empty reference")
            }
            Self::Csv(msg) => write!(f, "schema error: {msg}"),
            Self::AmountOverflow { id } => {
                write!(f, "schema error: amounts for '{id}' overflow the decimal range")
            }
        }
    }
}

impl std::error::Error for ReconError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_errors_are_flagged() {
        assert!(ReconError::MissingColumn { column: "Valor".into() }.is_schema_error());
        assert!(ReconError::EmptyReference { line: 3 }.is_schema_error());
        assert!(ReconError::AmountOverflow { id: "1".into() }.is_schema_error());
        assert!(!ReconError::ConfigParse("x".into()).is_schema_error());
    }

    #[test]
    fn display_includes_line_and_value() {
        let err = ReconError::AmountParse { line: 7, value: "abc".into() };
        assert_eq!(err.to_string(), "schema error: line 7: cannot parse amount 'abc'");
    }
}
