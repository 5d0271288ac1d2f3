use crate::cli::Cli;
use crate::clock::Anchor;
use crate::clock::probe::{self, KernelSources};
use crate::logging::LogTarget;
use crate::parser::FailurePolicy;
use crate::report::{DEFAULT_DATETIME_FORMAT, OutputMode};
use anyhow::Result;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

pub const DEFAULT_TABLE_PATH: &str = "/proc/net/xt_recent/BLACKLIST";
pub const DEFAULT_TIMER_LIST_PATH: &str = "/proc/timer_list";
pub const DEFAULT_STAT_PATH: &str = "/proc/stat";
pub const DEFAULT_UPTIME_PATH: &str = "/proc/uptime";

/// Everything one invocation needs, resolved up front.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub table_path: PathBuf,
    pub kernel_config_path: PathBuf,
    pub timer_list_path: PathBuf,
    pub stat_path: PathBuf,
    pub uptime_path: PathBuf,
    pub datetime_format: String,
    pub output: OutputMode,
    pub policy: FailurePolicy,
    pub hz: Option<f64>,
    pub jiffies: Option<u64>,
    pub anchor: Anchor,
    pub log_target: LogTarget,
    pub log_level: LevelFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            table_path: PathBuf::from(DEFAULT_TABLE_PATH),
            kernel_config_path: PathBuf::new(),
            timer_list_path: PathBuf::from(DEFAULT_TIMER_LIST_PATH),
            stat_path: PathBuf::from(DEFAULT_STAT_PATH),
            uptime_path: PathBuf::from(DEFAULT_UPTIME_PATH),
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
            output: OutputMode::Text,
            policy: FailurePolicy::Abort,
            hz: None,
            jiffies: None,
            anchor: Anchor::Now,
            log_target: LogTarget::Stderr,
            log_level: LevelFilter::WARN,
        }
    }
}

/// `/boot/config-<release>` for the running kernel.
pub fn default_kernel_config_path() -> Result<PathBuf> {
    Ok(PathBuf::from(format!("/boot/config-{}", probe::kernel_release()?)))
}

impl Settings {
    /// The kernel config path is only resolved when the tick rate must be read
    /// from it, which neither `--hz` nor `--measure-hz` needs.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let defaults = Self::default();

        let needs_kernel_config = cli.hz.is_none() && cli.measure_hz.is_none();
        let kernel_config_path = match &cli.kernel_config {
            Some(path) => path.clone(),
            None if needs_kernel_config => default_kernel_config_path()?,
            None => defaults.kernel_config_path.clone(),
        };

        Ok(Self {
            table_path: cli.file.clone().unwrap_or(defaults.table_path),
            kernel_config_path,
            timer_list_path: cli.timer_list.clone().unwrap_or(defaults.timer_list_path),
            datetime_format: cli
                .datetime_format
                .clone()
                .unwrap_or(defaults.datetime_format),
            output: if cli.csv {
                OutputMode::Csv
            } else {
                OutputMode::Text
            },
            policy: if cli.skip_malformed {
                FailurePolicy::SkipMalformed
            } else {
                FailurePolicy::Abort
            },
            hz: cli.hz,
            jiffies: cli.jiffies,
            anchor: cli.anchor,
            log_target: cli
                .log_file
                .clone()
                .map(LogTarget::File)
                .unwrap_or(LogTarget::Stderr),
            log_level: cli.level(),
            ..defaults
        })
    }

    pub fn kernel_sources(&self) -> KernelSources<'_> {
        KernelSources {
            kernel_config: &self.kernel_config_path,
            timer_list: &self.timer_list_path,
            stat: &self.stat_path,
            uptime: &self.uptime_path,
        }
    }
}
