//! Reads the tick rate, tick counter and boot time from the running kernel.

use super::Anchor;
use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Local, NaiveDateTime};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

pub const HZ_PATTERN: &str = r"CONFIG_HZ[ =:]*?([0-9]+)";
pub const JIFFIES_PATTERN: &str = r"jiffies[ =:]*?([0-9]+)";
pub const BTIME_PATTERN: &str = r"btime[ =:]*?([0-9]+)";

static HZ_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(HZ_PATTERN).expect("CONFIG_HZ pattern compiles"));
static JIFFIES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(JIFFIES_PATTERN).expect("jiffies pattern compiles"));
static BTIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(BTIME_PATTERN).expect("btime pattern compiles"));

/// Paths of the kernel files the probes read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelSources<'a> {
    pub kernel_config: &'a Path,
    pub timer_list: &'a Path,
    pub stat: &'a Path,
    pub uptime: &'a Path,
}

fn first_number(re: &Regex, text: &str) -> Option<u64> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

/// `CONFIG_HZ` from a kernel build configuration.
pub fn parse_hz(text: &str) -> Option<f64> {
    first_number(&HZ_RE, text).map(|hz| hz as f64)
}

/// Current jiffies from a `/proc/timer_list` dump.
pub fn parse_jiffies(text: &str) -> Option<u64> {
    first_number(&JIFFIES_RE, text)
}

/// Boot time in seconds since the Unix epoch from `/proc/stat`.
pub fn parse_btime(text: &str) -> Option<u64> {
    first_number(&BTIME_RE, text)
}

/// System uptime in seconds, the first field of `/proc/uptime`.
pub fn parse_uptime(text: &str) -> Option<f64> {
    text.split_whitespace().next()?.parse().ok()
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {path:?}"))
}

pub fn system_hz(kernel_config: &Path) -> Result<f64> {
    let hz = parse_hz(&read(kernel_config)?).ok_or_else(|| {
        anyhow!("Cannot determine kernel HZ in {kernel_config:?} (pattern {HZ_PATTERN})")
    })?;
    debug!(path = ?kernel_config, hz, "Read kernel tick rate");
    Ok(hz)
}

pub fn system_jiffies(timer_list: &Path) -> Result<u64> {
    parse_jiffies(&read(timer_list)?).ok_or_else(|| {
        anyhow!("Cannot determine jiffies in {timer_list:?} (pattern {JIFFIES_PATTERN})")
    })
}

pub fn system_btime(stat: &Path) -> Result<u64> {
    parse_btime(&read(stat)?)
        .ok_or_else(|| anyhow!("Cannot determine btime in {stat:?} (pattern {BTIME_PATTERN})"))
}

pub fn system_uptime(uptime: &Path) -> Result<f64> {
    parse_uptime(&read(uptime)?).ok_or_else(|| anyhow!("Cannot determine uptime in {uptime:?}"))
}

/// Kernel release used to locate `/boot/config-<release>`.
pub fn kernel_release() -> Result<String> {
    let release = read(Path::new("/proc/sys/kernel/osrelease"))?;
    Ok(release.trim().to_string())
}

/// Local time of `btime + uptime`.
pub fn boot_reference(btime: u64, uptime: f64) -> Option<NaiveDateTime> {
    if !uptime.is_finite() || uptime < 0.0 {
        return None;
    }
    let whole = uptime.trunc() as i64;
    let nanos = ((uptime - uptime.trunc()) * 1e9) as u32;
    let secs = i64::try_from(btime).ok()?.checked_add(whole)?;
    DateTime::from_timestamp(secs, nanos).map(|utc| utc.with_timezone(&Local).naive_local())
}

/// Captures the reference "now" for one conversion pass.
pub fn reference_now(anchor: Anchor, sources: &KernelSources<'_>) -> Result<NaiveDateTime> {
    match anchor {
        Anchor::Now => Ok(Local::now().naive_local()),
        Anchor::Boot => {
            let btime = system_btime(sources.stat)?;
            let uptime = system_uptime(sources.uptime)?;
            boot_reference(btime, uptime)
                .ok_or_else(|| anyhow!("Boot time {btime} + uptime {uptime} is out of range"))
        }
    }
}

/// Samples the jiffies counter `samples` times, `interval` apart, and returns
/// the observed increments scaled to ticks per second.
pub fn measure_hz(timer_list: &Path, samples: u64, interval: Duration) -> Result<Vec<f64>> {
    if interval.is_zero() {
        bail!("Sampling interval must be positive");
    }

    let mut rates = Vec::new();
    let mut last = system_jiffies(timer_list)?;
    for sample in 0..samples {
        thread::sleep(interval);
        let current = system_jiffies(timer_list)?;
        let rate = current.saturating_sub(last) as f64 / interval.as_secs_f64();
        info!(sample, jiffies = current, rate, "Sampled jiffies");
        rates.push(rate);
        last = current;
    }
    Ok(rates)
}
