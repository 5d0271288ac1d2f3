//! Text and CSV renderings of a parsed table.

use crate::error::FormatError;
use crate::parser::{Record, Table};
use chrono::NaiveDateTime;
use chrono::format::{Item, StrftimeItems};

pub mod deltas;

#[cfg(test)]
mod tests;

pub use deltas::DeltaSummary;

pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const CSV_SEPARATOR: &str = ";";
pub const CSV_HEADER: [&str; 5] = [
    "ip_src",
    "last_seen",
    "connections",
    "deltas_mean",
    "delta_seconds",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputMode {
    /// One human readable line per source
    #[default]
    Text,
    /// Semicolon separated table with inter-connection deltas
    Csv,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reporter {
    datetime_format: String,
}

impl Default for Reporter {
    fn default() -> Self {
        Self {
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
        }
    }
}

impl Reporter {
    pub fn new(datetime_format: impl Into<String>) -> Result<Self, FormatError> {
        let datetime_format = datetime_format.into();
        if StrftimeItems::new(&datetime_format).any(|item| matches!(item, Item::Error)) {
            return Err(FormatError(datetime_format));
        }
        Ok(Self { datetime_format })
    }

    pub fn datetime_format(&self) -> &str {
        &self.datetime_format
    }

    pub fn format_timestamp(&self, timestamp: &NaiveDateTime) -> String {
        timestamp.format(&self.datetime_format).to_string()
    }

    pub fn text_line(&self, record: &Record) -> String {
        format!(
            "{}, last seen: {} after {} connections",
            record.source,
            self.format_timestamp(&record.last_seen),
            record.connections()
        )
    }

    pub fn csv_row(&self, record: &Record) -> String {
        let summary = DeltaSummary::from_history(&record.history);
        [
            record.source.clone(),
            self.format_timestamp(&record.last_seen),
            record.connections().to_string(),
            summary.mean.to_string(),
            summary.joined(),
        ]
        .join(CSV_SEPARATOR)
    }

    pub fn to_text(&self, table: &Table) -> Vec<String> {
        table.iter().map(|record| self.text_line(record)).collect()
    }

    /// Header row first, then one row per record.
    pub fn to_csv(&self, table: &Table) -> Vec<String> {
        std::iter::once(CSV_HEADER.join(CSV_SEPARATOR))
            .chain(table.iter().map(|record| self.csv_row(record)))
            .collect()
    }

    pub fn render(&self, mode: OutputMode, table: &Table) -> Vec<String> {
        match mode {
            OutputMode::Text => self.to_text(table),
            OutputMode::Csv => self.to_csv(table),
        }
    }
}
