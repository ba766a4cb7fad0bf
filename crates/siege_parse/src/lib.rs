//! Access-log line parser.
//!
//! Log lines are ASCII record-separator (`\x1e`) delimited field lists in
//! one of two layouts: v1, or v2 with a literal `v2` version marker in the
//! fifth field. A lone `-` marks an absent value.

use chrono::NaiveDateTime;
use thiserror::Error;

const FIELD_SEPARATOR: char = '\x1e';
const TIMESTAMP_FORMAT: &str = "[%Y-%m-%d %H:%M:%S]";

const V1_FIELD_COUNT: usize = 22;
const V2_FIELD_COUNT: usize = 25;

const METHODS: [&str; 8] = [
    "CONNECT", "DELETE", "GET", "HEAD", "OPTIONS", "POST", "PUT", "TRACE",
];

/// One decoded access-log line.
///
/// Only the fields the replay tooling consumes are kept; the remaining
/// columns are validated for presence and dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    /// Request arrival time, unix seconds.
    pub timestamp: f64,
    /// Per-source sequence number.
    pub serial: Option<u64>,
    /// Source host tag.
    pub tag: String,
    /// Uppercased request method, if it is one the logger knows.
    pub method: Option<String>,
    /// Response status code.
    pub status: Option<u16>,
    /// Request path, query string excluded.
    pub request_url: Option<String>,
    /// Host header as logged (v2 lines only).
    pub host: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected at least {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("unparseable timestamp field {0:?}")]
    Timestamp(String),
}

/// Log layout a line was parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    V1,
    V2,
}

impl LogLine {
    /// Parses one raw log line, picking the layout from the version field.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let fields: Vec<&str> = raw.split(FIELD_SEPARATOR).collect();
        if fields.get(4).copied() == Some("v2") {
            Self::from_fields(&fields, Layout::V2)
        } else {
            Self::from_fields(&fields, Layout::V1)
        }
    }

    fn from_fields(fields: &[&str], layout: Layout) -> Result<Self, ParseError> {
        // Field offsets shift by the v2 version marker and, later in the
        // line, by the v2-only host and content-type columns.
        let (expected, method_at, url_at, host_at) = match layout {
            Layout::V1 => (V1_FIELD_COUNT, 4, 11, None),
            Layout::V2 => (V2_FIELD_COUNT, 5, 12, Some(15)),
        };
        if fields.len() < expected {
            return Err(ParseError::FieldCount {
                expected,
                found: fields.len(),
            });
        }
        Ok(Self {
            timestamp: parse_timestamp(fields[0])?,
            serial: numeric_field(fields[2]),
            tag: fields[3].to_string(),
            method: method_field(fields[method_at]),
            status: numeric_field(fields[method_at + 1]),
            request_url: optional_field(fields[url_at]),
            host: host_at.and_then(|at| optional_field(fields[at])),
        })
    }
}

fn parse_timestamp(field: &str) -> Result<f64, ParseError> {
    // The recorded timeline is only ever compared against itself, so the
    // zone-less log datetime can be pinned to UTC without skewing pacing.
    let parsed = NaiveDateTime::parse_from_str(field, TIMESTAMP_FORMAT)
        .map_err(|_| ParseError::Timestamp(field.to_string()))?;
    Ok(parsed.and_utc().timestamp() as f64)
}

fn optional_field(field: &str) -> Option<String> {
    (field != "-").then(|| field.to_string())
}

fn numeric_field<T: std::str::FromStr>(field: &str) -> Option<T> {
    field.parse().ok()
}

fn method_field(field: &str) -> Option<String> {
    let upper = field.to_ascii_uppercase();
    METHODS.contains(&upper.as_str()).then_some(upper)
}
