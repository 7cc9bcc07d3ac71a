//! Turns raw ping output into a [`PingResult`].
//!
//! There is no single grammar for ping output: field order, units and
//! labels differ across every OS and vendor. Instead of one parser per
//! platform, each field has an ordered list of pattern rules that are
//! tried against the relevant section of the output. A rule list that
//! finds nothing leaves the field as `None`; only an entirely blank
//! capture fails the parse.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ParseError;
use crate::result::{PingResult, RoundTrip};

macro_rules! regex {
    ($pattern:literal) => {{
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new($pattern).unwrap())
    }};
}

/// Parse captured ping output into a structured result.
///
/// `system_name` is carried through for reporting only; parsing never
/// branches on it. The only error is [`ParseError::EmptyInput`] — any
/// field that cannot be located in the output is reported as `None`.
pub fn parse(lines: &[String], system_name: &str) -> Result<PingResult, ParseError> {
    let sanitized = trim_blank_edges(lines);
    if sanitized.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let (upper, lower) = split_sections(sanitized);
    let upper = trim_blank_edges(upper);
    let lower = trim_blank_edges(lower);

    let transmitted = extract_transmitted(lower);
    let bytes_per_request = extract_bytes_per_request(upper);
    let bytes_total = match (transmitted, bytes_per_request) {
        (Some(t), Some(b)) => Some(u64::from(t) * u64::from(b)),
        _ => None,
    };

    Ok(PingResult {
        target_ip: extract_target_ip(upper),
        bytes_per_request,
        bytes_total,
        ttl: extract_ttl(upper),
        icmp_sequence: extract_icmp_sequence(upper),
        round_trip: extract_round_trip(lower),
        transmitted,
        received: extract_received(lower),
        loss: extract_loss(lower),
        system_name: system_name.to_string(),
        raw_data: lines.to_vec(),
    })
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Drops blank lines from both ends of the slice.
fn trim_blank_edges(lines: &[String]) -> &[String] {
    let start = match lines.iter().position(|l| !is_blank(l)) {
        Some(i) => i,
        None => return &[],
    };
    // A non-blank line exists, so rposition is guaranteed to find one.
    let end = lines.iter().rposition(|l| !is_blank(l)).unwrap_or(start);
    &lines[start..=end]
}

/// Separates the per-packet echo lines ("upper") from the trailing
/// statistics block ("lower") at the last blank line.
///
/// Some platforms never print a blank divider, and truncated output may
/// lose it. In that case every extractor gets a shot at the whole
/// capture: both sections are the entire input.
fn split_sections(lines: &[String]) -> (&[String], &[String]) {
    match lines.iter().rposition(|l| is_blank(l)) {
        Some(divider) => (&lines[..divider], &lines[divider + 1..]),
        None => {
            log::debug!("no blank divider in ping output, using whole capture for both sections");
            (lines, lines)
        }
    }
}

/// Payload size rules, most specific first. The echo lines report the
/// reply packet size directly; banner-only rules see just the payload
/// size and add 8 bytes for the ICMP header.
const BYTES_PER_REQUEST_RULES: [fn(&[String]) -> Option<u32>; 4] = [
    bytes_rule_echo_prefix,
    bytes_rule_assignment,
    bytes_rule_banner_pair,
    bytes_rule_banner_trailing,
];

fn extract_bytes_per_request(upper: &[String]) -> Option<u32> {
    BYTES_PER_REQUEST_RULES.iter().find_map(|rule| rule(upper))
}

/// "64 bytes from ..." at the front of any echo line.
fn bytes_rule_echo_prefix(upper: &[String]) -> Option<u32> {
    let re = regex!(r"(?i)^\s*(\d+)\s*bytes");
    upper
        .iter()
        .skip(1)
        .find_map(|line| re.captures(line))
        .and_then(|caps| caps[1].parse().ok())
}

/// Windows style "bytes=64" anywhere in a line.
fn bytes_rule_assignment(upper: &[String]) -> Option<u32> {
    let re = regex!(r"(?i)bytes=(\d+)");
    upper
        .iter()
        .find_map(|line| re.captures(line))
        .and_then(|caps| caps[1].parse().ok())
}

/// Banner reporting "56(84) bytes": payload plus whole-packet size.
fn bytes_rule_banner_pair(upper: &[String]) -> Option<u32> {
    let re = regex!(r"(\d+)\(\d+\)\D+$");
    let caps = re.captures(upper.first()?)?;
    caps[1].parse::<u32>().ok().map(|n| n + 8)
}

/// Rightmost number on the banner line. Usually the payload size, so
/// the header compensation applies here too.
fn bytes_rule_banner_trailing(upper: &[String]) -> Option<u32> {
    let re = regex!(r"(\d+)\D+$");
    let caps = re.captures(upper.first()?)?;
    caps[1].parse::<u32>().ok().map(|n| n + 8)
}

/// First "ttl=n" with n > 0 on an echo line. Some platforms print
/// ttl=0 when nothing came back, which is no TTL at all.
fn extract_ttl(upper: &[String]) -> Option<u32> {
    let re = regex!(r"(?i)ttl=(\d+)");
    upper
        .iter()
        .skip(1)
        .filter_map(|line| re.captures(line))
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .find(|&ttl| ttl > 0)
}

/// Round-trip time per echo, keyed by sequence number.
///
/// The labels in front of the time vary by language and vendor (time=,
/// rtt=, zeit=), so a success line is recognized purely by `=<number> ms`.
/// When a line has no obvious sequence number the 1-based position of
/// the line stands in for it.
fn extract_icmp_sequence(upper: &[String]) -> BTreeMap<u32, f64> {
    let rtt_re = regex!(r"(?i)=\s*([\d.]+)\s*ms");
    let seq_re = regex!(r"(?i)icmp_seq\s*=\s*(\d+)");

    let mut results = BTreeMap::new();
    for (i, line) in upper.iter().enumerate().skip(1) {
        // not a success line if there is no time on it
        let Some(caps) = rtt_re.captures(line) else {
            continue;
        };
        let Ok(rtt) = caps[1].parse::<f64>() else {
            continue;
        };
        let seq = seq_re
            .captures(line)
            .and_then(|caps| caps[1].parse::<u32>().ok())
            .unwrap_or((i - 1) as u32);
        results.insert(seq, rtt);
    }
    results
}

fn extract_round_trip(lower: &[String]) -> RoundTrip {
    round_trip_slash_summary(lower)
        .or_else(|| round_trip_assignment_summary(lower))
        .unwrap_or_default()
}

/// Tier 1: a slash-delimited label group zipped positionally against a
/// slash-delimited number group, e.g.
/// `round-trip min/avg/max/stddev = 172.543/215.709/385.571/94.957 ms`.
/// Label order is not assumed, and "mdev"/"stddev" both land on stddev.
fn round_trip_slash_summary(lower: &[String]) -> Option<RoundTrip> {
    let re = regex!(r"(?i)([a-z]+/[a-z]+/[a-z]+/?[a-z]*)[^0-9]+([0-9.]+/[0-9.]+/[0-9.]+/?[0-9.]*)");

    let caps = lower.iter().rev().find_map(|line| re.captures(line))?;
    let mut round_trip = RoundTrip::default();
    for (label, value) in caps[1].split('/').zip(caps[2].split('/')) {
        let Ok(value) = value.parse::<f64>() else {
            continue;
        };
        let label = label.to_ascii_lowercase();
        if label.contains("min") {
            round_trip.min = Some(value);
        } else if label.contains("max") {
            round_trip.max = Some(value);
        } else if label.contains("avg") {
            round_trip.avg = Some(value);
        } else if label.contains("dev") {
            round_trip.stddev = Some(value);
        }
    }
    Some(round_trip)
}

/// Tier 2: `label=number` layout, e.g. the Windows summary
/// `Minimum = 96ms, Maximum = 101ms, Average = 98ms`. The first three
/// assignments are taken as min, max and avg in that order. Scanning
/// stops at the first candidate line whether or not it yields values.
fn round_trip_assignment_summary(lower: &[String]) -> Option<RoundTrip> {
    let line_re = regex!(r"(?i)min.*max");
    let pair_re = regex!(r"(?i)[a-z]+\s*=\s*([0-9.]+)");

    let line = lower.iter().rev().find(|line| line_re.is_match(line))?;
    let values: Vec<f64> = pair_re
        .captures_iter(line)
        .filter_map(|caps| caps[1].parse().ok())
        .take(3)
        .collect();

    let mut round_trip = RoundTrip::default();
    if let [min, max, avg] = values[..] {
        round_trip.min = Some(min);
        round_trip.max = Some(max);
        round_trip.avg = Some(avg);
    }
    Some(round_trip)
}

/// First number on a summary line, e.g. "5 packets transmitted, ...".
fn extract_transmitted(lower: &[String]) -> Option<u32> {
    let re = regex!(r"^\D*(\d+)");
    lower
        .iter()
        .skip(1)
        .find_map(|line| re.captures(line))
        .and_then(|caps| caps[1].parse().ok())
}

/// Second number on a summary line.
fn extract_received(lower: &[String]) -> Option<u32> {
    let re = regex!(r"^\D*\d+\D+(\d+)");
    lower
        .iter()
        .skip(1)
        .find_map(|line| re.captures(line))
        .and_then(|caps| caps[1].parse().ok())
}

fn extract_loss(lower: &[String]) -> Option<u32> {
    let re = regex!(r"(\d+)%");
    lower
        .iter()
        .skip(1)
        .find_map(|line| re.captures(line))
        .and_then(|caps| caps[1].parse().ok())
}

/// First IPv4 dotted quad anywhere in the upper section. Most flavors
/// put the target on the banner, some only on reply lines. IPv6 is not
/// recognized.
fn extract_target_ip(upper: &[String]) -> Option<String> {
    let re = regex!(r"\d+\.\d+\.\d+\.\d+");
    upper
        .iter()
        .find_map(|line| re.find(line))
        .map(|m| m.as_str().to_string())
}
