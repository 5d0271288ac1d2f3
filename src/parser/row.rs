use super::record::RawRow;
use crate::clock::TickClock;
use crate::error::ParseError;
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::trace;

// src=151.54.175.212 ttl: 49 last_seen: 5610057758 oldest_pkt: 11 5610048214, 5610048235
const ROW_PATTERN: &str = concat!(
    r"^\s*src=(?P<src>[0-9]{1,3}(?:\.[0-9]{1,3}){3})",
    r"\s+ttl:\s*(?P<ttl>[0-9]+)",
    r"\s+last_seen:\s*(?P<last_seen>[0-9]+)",
    r"\s+oldest_pkt:\s*(?P<oldest_pkt>[0-9]+)",
    r"(?P<history>(?:\s.*)?)$",
);

static ROW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ROW_PATTERN).expect("row pattern compiles"));

// Checked one by one only after the full pattern failed, to name the culprit.
static FIELD_RES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("src", r"src=[0-9]{1,3}(?:\.[0-9]{1,3}){3}"),
        ("ttl", r"ttl:\s*[0-9]+"),
        ("last_seen", r"last_seen:\s*[0-9]+"),
        ("oldest_pkt", r"oldest_pkt:\s*[0-9]+"),
    ]
    .into_iter()
    .map(|(field, pattern)| (field, Regex::new(pattern).expect("field pattern compiles")))
    .collect()
});

fn missing_field(line: &str) -> &'static str {
    FIELD_RES
        .iter()
        .find(|(_, re)| !re.is_match(line))
        .map(|(field, _)| *field)
        .unwrap_or("row layout")
}

/// Splits the comma separated tick list that trails `oldest_pkt`. A blank
/// segment is an empty history.
fn parse_history(segment: &str) -> Result<Vec<u64>, ParseError> {
    if segment.trim().is_empty() {
        return Ok(Vec::new());
    }
    segment
        .split(',')
        .map(|piece| TickClock::parse_tick(piece).map_err(ParseError::from))
        .collect()
}

pub fn parse_row(line: &str) -> Result<RawRow, ParseError> {
    let text = line.trim_end();
    let Some(caps) = ROW_RE.captures(text) else {
        return Err(ParseError::malformed(missing_field(text), line));
    };

    let source = caps["src"].to_string();
    let ttl = caps["ttl"]
        .parse::<u32>()
        .map_err(|_| ParseError::malformed("ttl", line))?;
    let last_seen_ticks = TickClock::parse_tick(&caps["last_seen"])?;
    let oldest_packet_ticks = TickClock::parse_tick(&caps["oldest_pkt"])?;
    let history_ticks = parse_history(&caps["history"])?;

    trace!(%source, ttl, history = history_ticks.len(), "Parsed row");

    Ok(RawRow {
        source,
        ttl,
        last_seen_ticks,
        oldest_packet_ticks,
        history_ticks,
    })
}

impl FromStr for RawRow {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_row(s)
    }
}
