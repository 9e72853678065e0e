//! # Date Parsing Module
//!
//! ## Purpose
//! Tolerant parsing of the date strings actually found in the corpora. The
//! collections store dates in half a dozen encodings (`2019-03-04`,
//! `4 March, 2019`, `04-03-2019`, ...), sometimes wrapped in a singleton
//! array. Both the predicate builder and the result normalizer resolve these
//! through one shared parser that never errors.
//!
//! ## Input/Output Specification
//! - **Input**: A date string of unknown format, or a JSON value that may be
//!   a string or an array of strings
//! - **Output**: `Option<NaiveDate>`; `None` on total failure

use chrono::NaiveDate;
use serde_json::Value;

/// Explicit formats tried in order before the ISO-prefix fallback.
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d %B, %Y",
    "%d %B %Y",
    "%d %b, %Y",
    "%d-%m-%Y",
    "%d/%m/%Y",
];

/// Store-evaluated date encodings. The store adapter parses a field against
/// exactly one of these when filtering or building sort keys, mirroring the
/// formats the ingestion batches produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `YYYY-MM-DD`
    Iso,
    /// `DD-MM-YYYY`
    DayFirst,
}

impl DateFormat {
    pub fn chrono_format(&self) -> &'static str {
        match self {
            DateFormat::Iso => "%Y-%m-%d",
            DateFormat::DayFirst => "%d-%m-%Y",
        }
    }

    /// Strict parse against this single format. Used store-side; the loose
    /// multi-format parse below is for normalization only.
    pub fn parse(&self, text: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(text.trim(), self.chrono_format()).ok()
    }
}

/// Parse a date string of unknown format. Tries every explicit format in
/// order, then interprets the first 10 characters as an ISO date. Returns
/// `None` on total failure; never errors.
pub fn parse_loose(text: &str) -> Option<NaiveDate> {
    let s = text.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    // ISO prefix fallback, e.g. "2019-03-04T00:00:00"
    let head: String = s.chars().take(10).collect();
    NaiveDate::parse_from_str(&head, "%Y-%m-%d").ok()
}

/// Extract the scalar string behind a value that may be a string or an
/// array of strings. Sources sometimes store a date as a singleton list;
/// only the first element is considered.
pub fn first_scalar(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s.as_str()),
        Value::Array(items) => items.first().and_then(|v| v.as_str()),
        _ => None,
    }
}

/// Parse a JSON value (scalar or array-wrapped) with the loose parser.
pub fn parse_value(value: &Value) -> Option<NaiveDate> {
    first_scalar(value).and_then(parse_loose)
}
