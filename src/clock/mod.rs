//! Jiffies to wall-clock conversion.
//!
//! The kernel only records tick counts. Every timestamp produced here is an
//! approximation anchored to a single `(hz, current_ticks, reference_now)`
//! snapshot, which must be shared by every conversion in one table pass.

use crate::error::DomainError;
use chrono::{NaiveDateTime, TimeDelta};

pub mod probe;

#[cfg(test)]
mod tests;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Where the reference "now" of a conversion pass comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Anchor {
    /// Local wall clock when the pass starts.
    #[default]
    Now,
    /// Boot time from `/proc/stat` plus `/proc/uptime`.
    Boot,
}

/// Tick frequency plus a snapshot of the tick counter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickClock {
    hz: f64,
    current_ticks: u64,
}

impl TickClock {
    pub fn new(hz: f64, current_ticks: u64) -> Result<Self, DomainError> {
        if !hz.is_finite() || hz <= 0.0 {
            return Err(DomainError::NonPositiveHz(hz));
        }
        Ok(Self { hz, current_ticks })
    }

    pub fn hz(&self) -> f64 {
        self.hz
    }

    pub fn current_ticks(&self) -> u64 {
        self.current_ticks
    }

    /// Seconds elapsed between `tick` and the snapshot. Negative when `tick`
    /// lies after the snapshot, which means the snapshot is stale.
    pub fn seconds_since(&self, tick: u64) -> f64 {
        let elapsed = i128::from(self.current_ticks) - i128::from(tick);
        elapsed as f64 / self.hz
    }

    /// Absolute time of `tick`, measured back from `reference_now`.
    pub fn to_absolute_time(
        &self,
        tick: u64,
        reference_now: NaiveDateTime,
    ) -> Result<NaiveDateTime, DomainError> {
        let out_of_range = || DomainError::OutOfRange { tick, hz: self.hz };

        let nanos = (self.seconds_since(tick) * NANOS_PER_SEC).round();
        if !nanos.is_finite() || nanos.abs() >= i64::MAX as f64 {
            return Err(out_of_range());
        }

        reference_now
            .checked_sub_signed(TimeDelta::nanoseconds(nanos as i64))
            .ok_or_else(out_of_range)
    }

    /// Parses a textual tick value as found in the table or in `/proc`.
    pub fn parse_tick(text: &str) -> Result<u64, DomainError> {
        let text = text.trim();
        text.parse::<u64>()
            .map_err(|_| DomainError::InvalidTick(text.to_string()))
    }
}
