use crate::clock::TickClock;
use crate::clock::probe;
use crate::config::Settings;
use crate::parser::{ParseOutcome, TableParser};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Reads the table pseudo-file in one go so the whole pass sees one snapshot.
pub fn read_table_lines(path: &Path) -> Result<Vec<String>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read table {path:?}"))?;
    let lines: Vec<String> = text.lines().map(str::to_string).collect();
    debug!(path = ?path, lines = lines.len(), "Read table");
    Ok(lines)
}

/// Builds the tick clock, taking overrides before kernel probes.
pub fn tick_clock(settings: &Settings) -> Result<TickClock> {
    let hz = match settings.hz {
        Some(hz) => hz,
        None => probe::system_hz(&settings.kernel_config_path)?,
    };
    let jiffies = match settings.jiffies {
        Some(jiffies) => jiffies,
        None => probe::system_jiffies(&settings.timer_list_path)?,
    };
    let clock = TickClock::new(hz, jiffies).context("Invalid tick clock")?;
    info!(hz, jiffies, "Captured tick clock snapshot");
    Ok(clock)
}

/// Reads the table, snapshots the clock and parses every row.
pub fn load_table(settings: &Settings) -> Result<ParseOutcome> {
    info!(path = ?settings.table_path, "Parsing table");
    let lines = read_table_lines(&settings.table_path)?;
    let clock = tick_clock(settings)?;
    let reference_now = probe::reference_now(settings.anchor, &settings.kernel_sources())?;

    let outcome = TableParser::new(clock, reference_now)
        .with_policy(settings.policy)
        .parse(&lines)
        .with_context(|| format!("Failed to parse {:?}", settings.table_path))?;
    Ok(outcome)
}
