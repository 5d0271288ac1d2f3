use super::probe::{boot_reference, parse_btime, parse_hz, parse_jiffies, parse_uptime};
use super::*;
use crate::error::DomainError;
use chrono::NaiveDate;

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2017, 3, 14)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid date")
}

#[test]
fn rejects_non_positive_hz() {
    assert_eq!(TickClock::new(0.0, 10), Err(DomainError::NonPositiveHz(0.0)));
    assert_eq!(TickClock::new(-250.0, 10), Err(DomainError::NonPositiveHz(-250.0)));
    assert!(TickClock::new(f64::NAN, 10).is_err());
}

#[test]
fn seconds_since_divides_elapsed_ticks_by_hz() {
    let clock = TickClock::new(250.0, 5_610_057_758).expect("clock");
    assert_eq!(clock.seconds_since(5_610_057_758), 0.0);
    assert!((clock.seconds_since(5_610_048_214) - 38.176).abs() < 1e-9);
}

#[test]
fn future_ticks_give_negative_elapsed_time() {
    let clock = TickClock::new(100.0, 1_000).expect("clock");
    assert_eq!(clock.seconds_since(1_500), -5.0);

    let later = clock.to_absolute_time(1_500, t0()).expect("convert");
    assert_eq!(later - t0(), TimeDelta::seconds(5));
}

#[test]
fn absolute_time_is_measured_back_from_reference() {
    let clock = TickClock::new(1000.0, 60_000).expect("clock");
    let ts = clock.to_absolute_time(0, t0()).expect("convert");
    assert_eq!(t0() - ts, TimeDelta::seconds(60));

    let ts = clock.to_absolute_time(59_750, t0()).expect("convert");
    assert_eq!(t0() - ts, TimeDelta::milliseconds(250));
}

#[test]
fn out_of_range_conversion_is_a_domain_error() {
    let clock = TickClock::new(1e-9, u64::MAX).expect("clock");
    assert!(matches!(
        clock.to_absolute_time(0, t0()),
        Err(DomainError::OutOfRange { tick: 0, .. })
    ));
}

#[test]
fn parse_tick_rejects_non_numeric_text() {
    assert_eq!(TickClock::parse_tick(" 5610048214 "), Ok(5_610_048_214));
    assert_eq!(
        TickClock::parse_tick("12a"),
        Err(DomainError::InvalidTick("12a".to_string()))
    );
    assert!(TickClock::parse_tick("").is_err());
    assert!(TickClock::parse_tick("-3").is_err());
}

#[test]
fn hz_probe_skips_config_hz_choice_options() {
    let config = "\
CONFIG_HZ_PERIODIC=n
# CONFIG_HZ_100 is not set
CONFIG_HZ_250=y
# CONFIG_HZ_1000 is not set
CONFIG_HZ=250
";
    assert_eq!(parse_hz(config), Some(250.0));
    assert_eq!(parse_hz("CONFIG_SMP=y\n"), None);
}

#[test]
fn jiffies_probe_reads_timer_list_dump() {
    let timer_list = "\
Timer List Version: v0.8
HRTIMER_MAX_CLOCK_BASES: 8
now at 1234567890123 nsecs

jiffies: 4295123456
";
    assert_eq!(parse_jiffies(timer_list), Some(4_295_123_456));
    assert_eq!(parse_jiffies("now at 1 nsecs"), None);
}

#[test]
fn btime_and_uptime_probes() {
    let stat = "cpu  1 2 3 4\nintr 0\nctxt 42\nbtime 1489492800\nprocesses 7\n";
    assert_eq!(parse_btime(stat), Some(1_489_492_800));
    assert_eq!(parse_uptime("3600.25 7200.00\n"), Some(3600.25));
    assert_eq!(parse_uptime(""), None);
}

#[test]
fn boot_reference_adds_uptime_to_boot_time() {
    let a = boot_reference(1_489_492_800, 10.0).expect("reference");
    let b = boot_reference(1_489_492_800, 70.5).expect("reference");
    assert_eq!(b - a, TimeDelta::milliseconds(60_500));
    assert_eq!(boot_reference(1_489_492_800, -1.0), None);
}

mod kernel_files {
    use super::super::Anchor;
    use super::super::probe::{KernelSources, boot_reference, measure_hz, reference_now};
    use std::io::Write;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn file_with(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    fn sources<'a>(stat: &'a Path, uptime: &'a Path) -> KernelSources<'a> {
        KernelSources {
            kernel_config: Path::new("/unused/config"),
            timer_list: Path::new("/unused/timer_list"),
            stat,
            uptime,
        }
    }

    #[test]
    fn boot_anchor_reads_stat_and_uptime() {
        let stat = file_with("cpu  1 2 3 4\nbtime 1489492800\nprocesses 7\n");
        let uptime = file_with("3600.25 7200.00\n");

        let reference = reference_now(Anchor::Boot, &sources(stat.path(), uptime.path()))
            .expect("boot reference");
        assert_eq!(Some(reference), boot_reference(1_489_492_800, 3600.25));
    }

    #[test]
    fn boot_anchor_without_btime_names_the_file() {
        let stat = file_with("cpu  1 2 3 4\nprocesses 7\n");
        let uptime = file_with("10.0 20.0\n");

        let err = reference_now(Anchor::Boot, &sources(stat.path(), uptime.path()))
            .expect_err("missing btime");
        let message = err.to_string();
        assert!(message.contains("btime"), "{message}");
        assert!(message.contains(&stat.path().display().to_string()), "{message}");
    }

    #[test]
    fn measure_hz_returns_one_rate_per_sample() {
        let timers = file_with("jiffies: 4295000000\n");

        let rates = measure_hz(timers.path(), 2, Duration::from_millis(1)).expect("measure");
        assert_eq!(rates, vec![0.0, 0.0]);
    }

    #[test]
    fn measure_hz_with_no_samples_is_empty() {
        let timers = file_with("jiffies: 4295000000\n");

        let rates = measure_hz(timers.path(), 0, Duration::from_millis(1)).expect("measure");
        assert!(rates.is_empty());
    }

    #[test]
    fn measure_hz_rejects_zero_interval() {
        let timers = file_with("jiffies: 4295000000\n");
        assert!(measure_hz(timers.path(), 2, Duration::ZERO).is_err());
    }

    #[test]
    fn huge_sample_count_does_not_preallocate() {
        let timers = file_with("jiffies: 4295000000\n");
        let path = timers.path().to_path_buf();

        let remover = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            timers.close().expect("remove timer list");
        });

        let result = measure_hz(&path, u64::MAX, Duration::from_millis(1));
        remover.join().expect("remover thread");
        assert!(result.is_err(), "sampling stops once the timer list is gone");
    }
}
