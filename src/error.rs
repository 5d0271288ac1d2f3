use thiserror::Error;

/// Invalid tick-clock parameters or tick values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("tick frequency must be positive, got {0}")]
    NonPositiveHz(f64),

    #[error("invalid tick value {0:?}: expected a non-negative integer")]
    InvalidTick(String),

    #[error("tick {tick} at {hz} Hz cannot be represented as a timestamp")]
    OutOfRange { tick: u64, hz: f64 },
}

/// Failure to turn one table row into a record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("malformed row, cannot locate `{field}`: {line:?}")]
    MalformedRow { field: &'static str, line: String },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ParseError {
    pub fn malformed(field: &'static str, line: &str) -> Self {
        ParseError::MalformedRow {
            field,
            line: line.trim_end().to_string(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, ParseError::MalformedRow { .. })
    }
}

/// A datetime format string chrono cannot render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid datetime format {0:?}")]
pub struct FormatError(pub String);
