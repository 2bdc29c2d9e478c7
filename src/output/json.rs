//! JSON export of the report.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "generated_at": "2026-01-01T12:00:00+00:00",
//!   "version": "0.2.0",
//!   "total_latency_ms": 30,
//!   "report": {
//!     "meta": { "project": "PROJECT POLARIS", ... },
//!     "sections": [{ "id": "philosophy", "label": "Philosophy" }, ...],
//!     "latency_budget": [{ "phase": "L1", "latency_ms": 3, ... }, ...],
//!     ...
//!   }
//! }
//! ```

use std::io::Write;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::report::Report;

/// Envelope around the serialized report.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    pub generated_at: DateTime<Local>,
    pub version: &'static str,
    pub total_latency_ms: u32,
    pub report: &'a Report,
}

impl<'a> JsonOutput<'a> {
    /// Wrap `report` for export.
    #[must_use]
    pub fn new(report: &'a Report) -> Self {
        Self {
            generated_at: Local::now(),
            version: env!("CARGO_PKG_VERSION"),
            total_latency_ms: report.total_latency_ms(),
            report,
        }
    }

    /// Compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty-printed JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), serde_json::Error> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer).map_err(serde_json::Error::io)
    }
}
