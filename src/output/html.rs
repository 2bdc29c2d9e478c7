//! Self-contained HTML export using the `askama` template engine.
//!
//! All CSS is embedded so the file can be shared on its own. Text is escaped
//! by askama; the latency chart is drawn with plain CSS widths.
//!
//! ```rust,no_run
//! use polaris::output::html::HtmlOutput;
//! use polaris::report::Report;
//!
//! let report = Report::polaris();
//! let html = HtmlOutput::new(&report).to_html().unwrap();
//! ```

use std::io::Write;

use askama::Template;
use chrono::Local;

use crate::report::{Report, LATENCY_AXIS_MAX_MS};

/// Template context for `templates/report.html`.
#[derive(Template)]
#[template(path = "report.html")]
pub struct HtmlOutput<'a> {
    pub report: &'a Report,
    pub generated: String,
    pub version: &'static str,
    pub sections: Vec<HtmlSection>,
    pub bars: Vec<HtmlBar>,
    /// Left offset of the reference line, in percent of the axis.
    pub threshold_pct: u32,
    pub total_latency_ms: u32,
}

/// A section heading with its anchor.
pub struct HtmlSection {
    pub id: &'static str,
    pub label: &'static str,
    pub heading: &'static str,
}

/// One latency bar with its width precomputed.
pub struct HtmlBar {
    pub phase: &'static str,
    pub function: &'static str,
    pub latency_ms: u32,
    pub description: &'static str,
    pub color: &'static str,
    pub width_pct: u32,
}

fn percent_of_axis(ms: u32) -> u32 {
    (ms.min(LATENCY_AXIS_MAX_MS) * 100) / LATENCY_AXIS_MAX_MS
}

impl<'a> HtmlOutput<'a> {
    /// Prepare the template context for `report`.
    #[must_use]
    pub fn new(report: &'a Report) -> Self {
        let sections = report
            .sections
            .iter()
            .map(|s| HtmlSection {
                id: s.id,
                label: s.label,
                heading: report.heading(s.id).unwrap_or(s.label),
            })
            .collect();
        let bars = report
            .latency_budget
            .iter()
            .map(|stage| HtmlBar {
                phase: stage.phase,
                function: stage.function,
                latency_ms: stage.latency_ms,
                description: stage.description,
                color: stage.color,
                width_pct: percent_of_axis(stage.latency_ms),
            })
            .collect();

        Self {
            report,
            generated: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            version: env!("CARGO_PKG_VERSION"),
            sections,
            bars,
            threshold_pct: percent_of_axis(report.latency_threshold_ms),
            total_latency_ms: report.total_latency_ms(),
        }
    }

    /// Render the document.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn to_html(&self) -> Result<String, askama::Error> {
        self.render()
    }

    /// Render the document into `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), HtmlOutputError> {
        let html = self.to_html()?;
        writer.write_all(html.as_bytes())?;
        Ok(())
    }
}

/// Errors from HTML export.
#[derive(thiserror::Error, Debug)]
pub enum HtmlOutputError {
    /// Template rendering error
    #[error("HTML template error: {0}")]
    Template(#[from] askama::Error),

    /// I/O error during writing
    #[error("I/O error during HTML export: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bars_scaled_to_axis() {
        let report = Report::polaris();
        let output = HtmlOutput::new(&report);
        assert_eq!(output.bars.len(), 5);
        assert_eq!(output.threshold_pct, 75);
        for (bar, stage) in output.bars.iter().zip(&report.latency_budget) {
            assert_eq!(bar.width_pct, stage.latency_ms * 100 / 40);
        }
    }

    #[test]
    fn test_percent_of_axis_clamps() {
        assert_eq!(percent_of_axis(0), 0);
        assert_eq!(percent_of_axis(40), 100);
        assert_eq!(percent_of_axis(400), 100);
    }

    #[test]
    fn test_to_html_contains_sections_in_order() {
        let report = Report::polaris();
        let html = HtmlOutput::new(&report).to_html().unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));

        let positions: Vec<usize> = report
            .sections
            .iter()
            .map(|s| html.find(&format!("id=\"{}\"", s.id)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_to_html_escapes_content() {
        let mut report = Report::polaris();
        report.meta.title = "<script>alert(1)</script>";
        let html = HtmlOutput::new(&report).to_html().unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_write_to() {
        let report = Report::polaris();
        let mut buf = Vec::new();
        HtmlOutput::new(&report).write_to(&mut buf).unwrap();
        let html = String::from_utf8(buf).unwrap();
        assert!(html.contains("PROJECT POLARIS"));
        assert!(html.contains("</html>"));
    }
}
