//! Report export.
//!
//! - HTML: self-contained document for sharing
//! - JSON: the report content for other tools
//!
//! Export is gated by the same [`CredentialVerifier`] as the viewer, checked
//! synchronously; there is no session to wait on.
//!
//! # Example
//!
//! ```no_run
//! use polaris::cli::ExportFormat;
//! use polaris::gate::Credential;
//! use polaris::output::export_report;
//! use polaris::report::Report;
//!
//! let credential = Credential::default();
//! let mut out = std::io::stdout();
//! export_report(
//!     &Report::polaris(),
//!     ExportFormat::Json,
//!     &credential,
//!     ("digital-era", "digital_era@sina.com"),
//!     &mut out,
//! )
//! .unwrap();
//! ```

pub mod html;
pub mod json;

use std::io::Write;

use thiserror::Error;

pub use html::{HtmlOutput, HtmlOutputError};
pub use json::JsonOutput;

use crate::cli::ExportFormat;
use crate::gate::{CredentialVerifier, GateError};
use crate::report::Report;

/// Errors from exporting the report.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The credentials were rejected.
    #[error(transparent)]
    Denied(#[from] GateError),

    /// HTML rendering or writing failed.
    #[error(transparent)]
    Html(#[from] HtmlOutputError),

    /// JSON serialization or writing failed.
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Check `credentials` and write `report` to `writer` in `format`.
///
/// Nothing is written when the check fails.
///
/// # Errors
///
/// Returns [`OutputError::Denied`] for rejected credentials, otherwise any
/// rendering or I/O failure.
pub fn export_report<W: Write>(
    report: &Report,
    format: ExportFormat,
    verifier: &dyn CredentialVerifier,
    credentials: (&str, &str),
    writer: &mut W,
) -> Result<(), OutputError> {
    let (identifier, secret) = credentials;
    if !verifier.verify(identifier, secret) {
        return Err(GateError::InvalidCredentials.into());
    }

    log::debug!("Exporting report as {}", format);
    match format {
        ExportFormat::Html => HtmlOutput::new(report).write_to(writer)?,
        ExportFormat::Json => JsonOutput::new(report).write_to(writer)?,
    }
    writer
        .flush()
        .map_err(|e| OutputError::Html(HtmlOutputError::Io(e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Credential;

    #[test]
    fn test_export_denied_writes_nothing() {
        let mut buf = Vec::new();
        let result = export_report(
            &Report::polaris(),
            ExportFormat::Html,
            &Credential::default(),
            ("digital-era", "DIGITAL_ERA@SINA.COM"),
            &mut buf,
        );
        assert!(matches!(result, Err(OutputError::Denied(_))));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_export_json_accepted() {
        let mut buf = Vec::new();
        export_report(
            &Report::polaris(),
            ExportFormat::Json,
            &Credential::default(),
            ("digital-era", "digital_era@sina.com"),
            &mut buf,
        )
        .unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("\"report\""));
    }
}
