use crate::clock::TickClock;
use crate::error::DomainError;
use chrono::NaiveDateTime;

/// One table row as the kernel prints it, all times still in jiffies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub source: String,
    pub ttl: u32,
    pub last_seen_ticks: u64,
    pub oldest_packet_ticks: u64,
    /// Oldest to newest, in the order the kernel printed them.
    pub history_ticks: Vec<u64>,
}

/// A row with every tick field converted to local wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub source: String,
    pub ttl: u32,
    pub last_seen: NaiveDateTime,
    pub oldest_packet: NaiveDateTime,
    pub history: Vec<NaiveDateTime>,
}

impl RawRow {
    /// Converts every tick field against one clock snapshot. History keeps its
    /// length and order.
    pub fn convert(
        &self,
        clock: &TickClock,
        reference_now: NaiveDateTime,
    ) -> Result<Record, DomainError> {
        let at = |tick| clock.to_absolute_time(tick, reference_now);

        Ok(Record {
            source: self.source.clone(),
            ttl: self.ttl,
            last_seen: at(self.last_seen_ticks)?,
            oldest_packet: at(self.oldest_packet_ticks)?,
            history: self
                .history_ticks
                .iter()
                .map(|&tick| at(tick))
                .collect::<Result<Vec<_>, DomainError>>()?,
        })
    }
}

impl Record {
    pub fn connections(&self) -> usize {
        self.history.len()
    }
}
