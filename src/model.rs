// src/model.rs
use serde::Deserialize;

use crate::error::ResultsResult;

/// Half-open `[start, stop)` index range of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: u64,
    pub stop: u64,
}

impl Window {
    pub fn new(start: u64, stop: u64) -> Self {
        Self { start, stop }
    }

    pub fn width(&self) -> u64 {
        self.stop.saturating_sub(self.start)
    }
}

/// One speedtest sample as the agent reports it.
///
/// Values are kept as the element text. Missing elements read as empty
/// text; interpretation happens in the numeric accessors so that odd values
/// reach the display unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub timestamp: String,
    pub internal_address: String,
    pub real_address: String,
    pub remote_address: String,
    pub connect_time: String,
    pub latency: String,
    pub download_speed: String,
    pub upload_speed: String,
}

// A collect element as it appears on the wire. The agent keeps some of the
// measurements as lists, so any child may repeat; the texts of repeated
// children are concatenated.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WireRecord {
    timestamp: Vec<String>,
    internal_address: Vec<String>,
    real_address: Vec<String>,
    remote_address: Vec<String>,
    connect_time: Vec<String>,
    latency: Vec<String>,
    download_speed: Vec<String>,
    upload_speed: Vec<String>,
}

impl From<WireRecord> for Record {
    fn from(wire: WireRecord) -> Self {
        Self {
            timestamp: wire.timestamp.concat(),
            internal_address: wire.internal_address.concat(),
            real_address: wire.real_address.concat(),
            remote_address: wire.remote_address.concat(),
            connect_time: wire.connect_time.concat(),
            latency: wire.latency.concat(),
            download_speed: wire.download_speed.concat(),
            upload_speed: wire.upload_speed.concat(),
        }
    }
}

impl Record {
    /// Seconds since the epoch.
    pub fn timestamp_secs(&self) -> f64 {
        number(&self.timestamp)
    }

    /// Seconds.
    pub fn connect_time_secs(&self) -> f64 {
        number(&self.connect_time)
    }

    /// Seconds.
    pub fn latency_secs(&self) -> f64 {
        number(&self.latency)
    }

    /// Bytes per second.
    pub fn download_bps(&self) -> f64 {
        number(&self.download_speed)
    }

    /// Bytes per second.
    pub fn upload_bps(&self) -> f64 {
        number(&self.upload_speed)
    }
}

// Blank text counts as zero, anything unparsable as NaN. Only the spelled
// out `Infinity` is infinite; `inf` and `nan` are not numbers here.
fn number(text: &str) -> f64 {
    let text = text.trim();
    match text {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if text.bytes().any(|b| b.is_ascii_alphabetic() && b != b'e' && b != b'E') => f64::NAN,
        _ => text.parse().unwrap_or(f64::NAN),
    }
}

/// Records returned for one requested window, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub window: Window,
    pub records: Vec<Record>,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index one past the last record actually returned.
    pub fn returned_upper(&self) -> u64 {
        self.window.start.saturating_add(self.records.len() as u64)
    }
}

// Other elements may sit between the collects; `overlapped-lists` lets
// quick-xml gather them anyway.
#[derive(Debug, Default, Deserialize)]
struct ResultsDocument {
    #[serde(rename = "SpeedtestCollect", default)]
    collects: Vec<WireRecord>,
}

/// Parses a results document into the page for `window`.
pub fn parse_page(xml: &str, window: Window) -> ResultsResult<Page> {
    let doc: ResultsDocument = quick_xml::de::from_str(xml)?;
    Ok(Page {
        window,
        records: doc.collects.into_iter().map(Record::from).collect(),
    })
}
