//! Command line of the `xtrecent` binary.

use crate::clock::Anchor;
use clap::{ArgGroup, Parser, ValueEnum};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// One sample per second, so an hour at most.
pub const MAX_HZ_SAMPLES: u64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "xtrecent")]
#[command(version)]
#[command(about = "Parses the xt_recent netfilter table into per-source connection history", long_about = None)]
#[command(group(ArgGroup::new("mode").args(["txt", "csv", "measure_hz"])))]
pub struct Cli {
    /// Table to parse
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Print one human readable line per source
    #[arg(long = "txt")]
    pub txt: bool,

    /// Print a semicolon separated report with connection deltas
    #[arg(long = "csv")]
    pub csv: bool,

    /// Kernel tick rate, skips reading the kernel config
    #[arg(long = "hz", value_name = "HZ")]
    pub hz: Option<f64>,

    /// Current jiffies, skips reading the timer list
    #[arg(long = "jiffies", value_name = "TICKS")]
    pub jiffies: Option<u64>,

    /// Kernel build configuration holding CONFIG_HZ (default: /boot/config-<release>)
    #[arg(long = "kernel-config", value_name = "PATH")]
    pub kernel_config: Option<PathBuf>,

    /// Timer list dump holding the jiffies counter
    #[arg(long = "timer-list", value_name = "PATH")]
    pub timer_list: Option<PathBuf>,

    /// strftime pattern for printed timestamps
    #[arg(long = "datetime-format", value_name = "FMT")]
    pub datetime_format: Option<String>,

    /// Skip rows that fail to parse instead of aborting
    #[arg(long = "skip-malformed")]
    pub skip_malformed: bool,

    /// Reference point for converting jiffies to wall-clock time
    #[arg(long = "anchor", value_enum, default_value = "now")]
    pub anchor: Anchor,

    /// Sample the jiffies counter once per second SAMPLES times and print the rate
    #[arg(
        long = "measure-hz",
        value_name = "SAMPLES",
        value_parser = clap::value_parser!(u64).range(1..=MAX_HZ_SAMPLES)
    )]
    pub measure_hz: Option<u64>,

    /// Shorthand for --log-level debug
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Log verbosity (RUST_LOG overrides it)
    #[arg(long = "log-level", value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Write logs to a file instead of stderr
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::DEBUG
        } else {
            self.log_level.into()
        }
    }

    /// True when no action was requested.
    pub fn nothing_to_do(&self) -> bool {
        !self.txt && !self.csv && self.measure_hz.is_none()
    }
}
