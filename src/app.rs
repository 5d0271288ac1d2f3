use crate::clock::probe;
use crate::config::Settings;
use crate::loader::load_table;
use crate::report::Reporter;
use anyhow::{Context, Result};
use std::io::Write;
use std::time::Duration;
use tracing::warn;

/// Parses the table and writes the selected report to `out`.
pub fn run_report<W: Write>(settings: &Settings, out: &mut W) -> Result<()> {
    let reporter = Reporter::new(settings.datetime_format.as_str())?;
    let outcome = load_table(settings)?;

    for rejected in &outcome.rejected {
        warn!(
            line_number = rejected.line_number,
            error = %rejected.error,
            "Row left out of the report"
        );
    }

    for line in reporter.render(settings.output, &outcome.table) {
        writeln!(out, "{line}").context("Failed to write report")?;
    }
    Ok(())
}

/// Prints the measured tick rate once per sample.
pub fn run_measure_hz<W: Write>(settings: &Settings, samples: u64, out: &mut W) -> Result<()> {
    let rates = probe::measure_hz(&settings.timer_list_path, samples, Duration::from_secs(1))?;
    for rate in rates {
        writeln!(out, "{rate}").context("Failed to write sample")?;
    }
    Ok(())
}
