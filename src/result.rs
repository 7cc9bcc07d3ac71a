use std::collections::BTreeMap;

use serde::Serialize;

/// Round-trip time summary from the statistics block, in milliseconds.
///
/// `stddev` stays `None` on platforms that do not report a deviation
/// column (Darwin without `-q`, HP-UX, AIX, Windows).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RoundTrip {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub stddev: Option<f64>,
}

/// Structured view of one ping run.
///
/// Every field is optional: no two ping flavors print the same set of
/// fields, so anything the parser cannot locate is reported as `None`
/// rather than failing the whole parse. A result is built once from the
/// captured output and never modified afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct PingResult {
    pub(crate) target_ip: Option<String>,
    pub(crate) bytes_per_request: Option<u32>,
    pub(crate) bytes_total: Option<u64>,
    pub(crate) ttl: Option<u32>,
    pub(crate) icmp_sequence: BTreeMap<u32, f64>,
    pub(crate) round_trip: RoundTrip,
    pub(crate) transmitted: Option<u32>,
    pub(crate) received: Option<u32>,
    pub(crate) loss: Option<u32>,
    pub(crate) system_name: String,
    #[serde(skip)]
    pub(crate) raw_data: Vec<String>,
}

impl PingResult {
    /// IP address the replies came from, if any line carried one.
    pub fn target_ip(&self) -> Option<&str> {
        self.target_ip.as_deref()
    }

    /// Payload size of each ICMP echo request in bytes.
    pub fn bytes_per_request(&self) -> Option<u32> {
        self.bytes_per_request
    }

    /// Total bytes sent over the whole run; only known when both the
    /// per-request size and the transmitted count were found.
    pub fn bytes_total(&self) -> Option<u64> {
        self.bytes_total
    }

    /// TTL of the echo replies. A reported TTL of 0 counts as unknown.
    pub fn ttl(&self) -> Option<u32> {
        self.ttl
    }

    /// Round-trip time per ICMP sequence number, in milliseconds.
    ///
    /// The map is sparse: a sequence number with no entry was never seen
    /// in a success line, usually because the packet was lost.
    pub fn icmp_sequence(&self) -> &BTreeMap<u32, f64> {
        &self.icmp_sequence
    }

    pub fn round_trip(&self) -> RoundTrip {
        self.round_trip
    }

    pub fn min(&self) -> Option<f64> {
        self.round_trip.min
    }

    pub fn max(&self) -> Option<f64> {
        self.round_trip.max
    }

    pub fn avg(&self) -> Option<f64> {
        self.round_trip.avg
    }

    pub fn stddev(&self) -> Option<f64> {
        self.round_trip.stddev
    }

    pub fn transmitted(&self) -> Option<u32> {
        self.transmitted
    }

    pub fn received(&self) -> Option<u32> {
        self.received
    }

    /// Packet loss percentage, 0 to 100.
    pub fn loss(&self) -> Option<u32> {
        self.loss
    }

    /// Platform name the caller passed in. Kept for reporting only; the
    /// parser never branches on it.
    pub fn system_name(&self) -> &str {
        &self.system_name
    }

    /// The unmodified output lines this result was parsed from.
    pub fn raw_data(&self) -> &[String] {
        &self.raw_data
    }
}
