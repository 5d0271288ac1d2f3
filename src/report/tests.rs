use super::*;
use crate::clock::TickClock;
use crate::parser::TableParser;
use chrono::{NaiveDate, TimeDelta};

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2017, 3, 14)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid date")
}

fn record(source: &str, offsets_secs: &[i64]) -> Record {
    Record {
        source: source.to_string(),
        ttl: 64,
        last_seen: t0(),
        oldest_packet: t0(),
        history: offsets_secs
            .iter()
            .map(|&s| t0() + TimeDelta::seconds(s))
            .collect(),
    }
}

#[test]
fn reference_row_has_two_zero_deltas() {
    let clock = TickClock::new(250.0, 5_610_057_758).expect("clock");
    let table = TableParser::new(clock, t0())
        .parse_all(["src=151.54.175.212 ttl: 49 last_seen: 5610057758 oldest_pkt: 11 5610048214, 5610048235, 5610048281"])
        .expect("parse");

    let rows = Reporter::default().to_csv(&table);
    assert_eq!(
        rows,
        [
            "ip_src;last_seen;connections;deltas_mean;delta_seconds",
            "151.54.175.212;2017-03-14 12:00:00;3;0;0,0",
        ]
    );
}

#[test]
fn text_line_reports_last_seen_and_connection_count() {
    let table = Table::from(vec![record("10.0.0.1", &[-30, -20, -10]), record("10.0.0.2", &[])]);
    let lines = Reporter::default().to_text(&table);

    assert_eq!(
        lines,
        [
            "10.0.0.1, last seen: 2017-03-14 12:00:00 after 3 connections",
            "10.0.0.2, last seen: 2017-03-14 12:00:00 after 0 connections",
        ]
    );
}

#[test]
fn deltas_truncate_fractional_seconds() {
    let history = [
        t0(),
        t0() + TimeDelta::milliseconds(1_900),
        t0() + TimeDelta::milliseconds(4_000),
        t0() + TimeDelta::milliseconds(9_999),
    ];
    let summary = DeltaSummary::from_history(&history);

    assert_eq!(summary.deltas, vec![1, 2, 5]);
    assert_eq!(summary.mean, 2);
    assert_eq!(summary.joined(), "1,2,5");
}

#[test]
fn negative_deltas_truncate_toward_zero() {
    let history = [t0(), t0() - TimeDelta::milliseconds(1_500)];
    let summary = DeltaSummary::from_history(&history);
    assert_eq!(summary.deltas, vec![-1]);
    assert_eq!(summary.mean, -1);
}

#[test]
fn short_history_has_no_deltas() {
    assert_eq!(DeltaSummary::from_history(&[]), DeltaSummary::default());

    let single = DeltaSummary::from_history(&[t0()]);
    assert!(single.deltas.is_empty());
    assert_eq!(single.mean, 0);
    assert_eq!(single.joined(), "");
}

#[test]
fn csv_row_for_single_connection_has_empty_delta_column() {
    let row = Reporter::default().csv_row(&record("10.0.0.9", &[-5]));
    assert_eq!(row, "10.0.0.9;2017-03-14 12:00:00;1;0;");
}

#[test]
fn csv_mean_is_truncated_average_of_deltas() {
    let row = Reporter::default().csv_row(&record("10.0.0.1", &[0, 10, 15, 31]));
    assert_eq!(row, "10.0.0.1;2017-03-14 12:00:00;4;10;10,5,16");
}

#[test]
fn custom_datetime_format_applies_to_both_modes() {
    let reporter = Reporter::new("%d/%m/%Y %H:%M").expect("format");
    let table = Table::from(vec![record("10.0.0.1", &[0])]);

    assert_eq!(
        reporter.render(OutputMode::Text, &table),
        ["10.0.0.1, last seen: 14/03/2017 12:00 after 1 connections"]
    );
    assert_eq!(
        reporter.render(OutputMode::Csv, &table)[1],
        "10.0.0.1;14/03/2017 12:00;1;0;"
    );
}

#[test]
fn invalid_datetime_format_is_rejected() {
    assert_eq!(
        Reporter::new("%Y %!"),
        Err(FormatError("%Y %!".to_string()))
    );
}

#[test]
fn empty_table_renders_only_the_csv_header() {
    let table = Table::default();
    let reporter = Reporter::default();

    assert!(reporter.to_text(&table).is_empty());
    assert_eq!(reporter.to_csv(&table).len(), 1);
}
