use super::record::Record;
use super::row::parse_row;
use crate::clock::TickClock;
use crate::error::ParseError;
use chrono::NaiveDateTime;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// What a pass does with a row that fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// First failure aborts the pass; no rows are returned.
    #[default]
    Abort,
    /// Failing rows are logged, collected and left out of the table.
    SkipMalformed,
}

/// Records of one parse pass, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    records: Vec<Record>,
}

impl Table {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Table {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl From<Vec<Record>> for Table {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

/// A row left out of the table under [`FailurePolicy::SkipMalformed`].
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    /// 1-based position in the input.
    pub line_number: usize,
    pub error: ParseError,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub table: Table,
    pub rejected: Vec<RejectedRow>,
}

/// Parses a whole table dump against one clock snapshot.
#[derive(Debug, Clone)]
pub struct TableParser {
    clock: TickClock,
    reference_now: NaiveDateTime,
    policy: FailurePolicy,
}

impl TableParser {
    pub fn new(clock: TickClock, reference_now: NaiveDateTime) -> Self {
        Self {
            clock,
            reference_now,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn clock(&self) -> &TickClock {
        &self.clock
    }

    pub fn reference_now(&self) -> NaiveDateTime {
        self.reference_now
    }

    pub fn parse_line(&self, line: &str) -> Result<Record, ParseError> {
        let raw = parse_row(line)?;
        let record = raw.convert(&self.clock, self.reference_now)?;
        debug!(
            source = %record.source,
            last_seen = %record.last_seen,
            history = ?record.history,
            "Converted row"
        );
        Ok(record)
    }

    /// Parses every non-blank line under the [`FailurePolicy::Abort`] contract,
    /// whatever policy this parser carries.
    pub fn parse_all<I, S>(&self, lines: I) -> Result<Table, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.clone()
            .with_policy(FailurePolicy::Abort)
            .parse(lines)
            .map(|outcome| outcome.table)
    }

    pub fn parse<I, S>(&self, lines: I) -> Result<ParseOutcome, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let start_time = Instant::now();
        let mut outcome = ParseOutcome::default();

        for (index, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            let line_number = index + 1;
            debug!(line_number, line = line.trim_end(), "Parsing row");

            match self.parse_line(line) {
                Ok(record) => outcome.table.records.push(record),
                Err(err) => match self.policy {
                    FailurePolicy::Abort => {
                        error!(line_number, error = %err, "Aborting table parse");
                        return Err(err);
                    }
                    FailurePolicy::SkipMalformed => {
                        warn!(line_number, error = %err, "Skipping row");
                        outcome.rejected.push(RejectedRow {
                            line_number,
                            error: err,
                        });
                    }
                },
            }
        }

        info!(
            records = outcome.table.len(),
            rejected = outcome.rejected.len(),
            elapsed_ms = start_time.elapsed().as_millis(),
            "Completed table parse"
        );
        Ok(outcome)
    }
}
