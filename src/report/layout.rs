//! Line layout of the report for a given text width.
//!
//! The layout is the viewer's notion of geometry: every section starts at a
//! known line, so a section's offset from the viewport top is simply
//! `start_line - scroll`. Changing the width re-wraps the text and moves the
//! section starts, so the layout is rebuilt on resize.

use super::content::{Report, LATENCY_AXIS_MAX_MS};

/// Narrowest width the layout wraps to.
pub const MIN_WIDTH: usize = 20;

/// Width of the label column in front of each chart bar.
const BAR_LABEL_WIDTH: usize = 6;

/// Visual role of a laid-out line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Title,
    Meta,
    Heading,
    Subheading,
    Body,
    Muted,
    Accent,
    Bar(BarSpec),
    Rule,
    Blank,
}

/// One bar of the latency chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarSpec {
    pub label: String,
    pub value: u32,
    pub axis_max: u32,
    pub threshold: u32,
    pub caption: String,
    /// Bar color as `#rrggbb`.
    pub color: &'static str,
}

impl BarSpec {
    /// Plain-text rendition: label, filled cells, threshold marker, caption.
    #[must_use]
    pub fn to_plain(&self) -> String {
        let mut cells = String::with_capacity(self.axis_max as usize);
        for col in 0..self.axis_max {
            let c = if col < self.value {
                '#'
            } else if col == self.threshold {
                '|'
            } else {
                '.'
            };
            cells.push(c);
        }
        format!(
            "{:<width$}{} {}ms  {}",
            self.label,
            cells,
            self.value,
            self.caption,
            width = BAR_LABEL_WIDTH
        )
    }
}

/// A laid-out line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocLine {
    pub kind: LineKind,
    pub text: String,
}

impl DocLine {
    fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    fn blank() -> Self {
        Self::new(LineKind::Blank, "")
    }
}

/// The report laid out as lines, with the starting line of each section.
#[derive(Debug, Clone)]
pub struct ReportLayout {
    lines: Vec<DocLine>,
    section_starts: Vec<(&'static str, usize)>,
    width: usize,
}

impl ReportLayout {
    /// Lay out `report` for a text area `width` columns wide.
    #[must_use]
    pub fn build(report: &Report, width: usize) -> Self {
        let width = width.max(MIN_WIDTH);
        let mut builder = Builder {
            lines: Vec::new(),
            width,
        };

        builder.wrapped(LineKind::Title, report.meta.title);
        builder.push(LineKind::Meta, report.meta.classification);
        builder.push(LineKind::Meta, report.meta.tenet);
        builder.rule();
        builder.blank();

        let mut section_starts = Vec::with_capacity(report.sections.len());
        for section in &report.sections {
            section_starts.push((section.id, builder.lines.len()));
            let heading = report.heading(section.id).unwrap_or(section.label);
            builder.wrapped(LineKind::Heading, heading);
            builder.blank();
            match section.id {
                "philosophy" => builder.philosophy(report),
                "physics" => builder.physics(report),
                "logic" => builder.logic(report),
                "aesthetics" => builder.aesthetics(report),
                "references" => builder.references(report),
                other => log::warn!("No layout for section '{}'", other),
            }
        }

        builder.rule();
        builder.push(LineKind::Muted, report.meta.status);
        builder.wrapped(LineKind::Muted, report.meta.copyright);
        builder.wrapped(LineKind::Muted, report.meta.clearance);

        Self {
            lines: builder.lines,
            section_starts,
            width,
        }
    }

    /// Get all lines.
    #[must_use]
    pub fn lines(&self) -> &[DocLine] {
        &self.lines
    }

    /// Get the number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the layout has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the width the layout was wrapped to.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the first line of a section.
    #[must_use]
    pub fn section_start(&self, id: &str) -> Option<usize> {
        self.section_starts
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, line)| *line)
    }

    /// Get every section's first line in declaration order.
    #[must_use]
    pub fn section_starts(&self) -> &[(&'static str, usize)] {
        &self.section_starts
    }

    /// Largest scroll position for a viewport `rows` tall.
    ///
    /// The last section can always be scrolled to the top of the viewport,
    /// even when it is shorter than the viewport.
    #[must_use]
    pub fn max_scroll(&self, rows: usize) -> usize {
        let last_start = self.section_starts.last().map_or(0, |(_, l)| *l);
        last_start.max(self.lines.len().saturating_sub(rows))
    }
}

struct Builder {
    lines: Vec<DocLine>,
    width: usize,
}

impl Builder {
    fn push(&mut self, kind: LineKind, text: &str) {
        self.lines.push(DocLine::new(kind, text));
    }

    fn wrapped(&mut self, kind: LineKind, text: &str) {
        self.wrapped_indent(kind, text, "");
    }

    fn wrapped_indent(&mut self, kind: LineKind, text: &str, indent: &str) {
        let avail = self.width.saturating_sub(indent.len()).max(1);
        for line in wrap_text(text, avail) {
            self.lines
                .push(DocLine::new(kind.clone(), format!("{indent}{line}")));
        }
    }

    fn blank(&mut self) {
        self.lines.push(DocLine::blank());
    }

    fn rule(&mut self) {
        self.lines.push(DocLine::new(LineKind::Rule, "-".repeat(self.width)));
    }

    fn philosophy(&mut self, report: &Report) {
        for principle in &report.principles {
            self.push(LineKind::Subheading, principle.title);
            self.wrapped_indent(LineKind::Body, principle.body, "  ");
            self.blank();
        }
    }

    fn physics(&mut self, report: &Report) {
        self.wrapped(LineKind::Body, report.latency_intro);
        self.blank();
        self.push(
            LineKind::Muted,
            &format!(
                "Dual-Track Budget (ms)  TTFR THRESHOLD: {}ms",
                report.latency_threshold_ms
            ),
        );
        for stage in &report.latency_budget {
            let bar = BarSpec {
                label: stage.phase.to_string(),
                value: stage.latency_ms,
                axis_max: LATENCY_AXIS_MAX_MS,
                threshold: report.latency_threshold_ms,
                caption: format!("{} - {}", stage.function, stage.description),
                color: stage.color,
            };
            let plain = bar.to_plain();
            self.lines.push(DocLine::new(LineKind::Bar(bar), plain));
        }
        self.push(
            LineKind::Muted,
            &format!(
                "{:<width$}0{:>axis$}",
                "",
                LATENCY_AXIS_MAX_MS,
                width = BAR_LABEL_WIDTH,
                axis = LATENCY_AXIS_MAX_MS as usize - 1
            ),
        );
        self.push(
            LineKind::Muted,
            &format!(
                "Total: {}ms of {}ms budget",
                report.total_latency_ms(),
                report.latency_threshold_ms
            ),
        );
        self.blank();
        for note in &report.pipeline_notes {
            self.push(LineKind::Accent, note.title);
            self.wrapped_indent(LineKind::Body, note.body, "  ");
        }
        self.blank();
    }

    fn logic(&mut self, report: &Report) {
        for module in &report.modules {
            let tag = if module.checker { "  [CHECKER]" } else { "" };
            self.push(
                LineKind::Muted,
                &format!("MODULE {:02}{}", module.number, tag),
            );
            self.push(LineKind::Subheading, module.name);
            self.push(LineKind::Accent, module.stack);
            self.wrapped_indent(LineKind::Body, module.summary, "  ");
            self.blank();
        }
    }

    fn aesthetics(&mut self, report: &Report) {
        for row in &report.emotions {
            self.push(LineKind::Subheading, row.state);
            self.wrapped_indent(LineKind::Body, &format!("Visual: {}", row.visual), "  ");
            self.wrapped_indent(LineKind::Body, &format!("Auditory: {}", row.auditory), "  ");
            self.wrapped_indent(LineKind::Body, &format!("Behavior: {}", row.behavior), "  ");
            self.blank();
        }
    }

    fn references(&mut self, report: &Report) {
        for reference in &report.references {
            self.push(
                LineKind::Accent,
                &format!("{} {}", reference.id, reference.title),
            );
            self.push(LineKind::Muted, &format!("  {}", reference.source));
            self.wrapped_indent(
                LineKind::Body,
                &format!("\"{}\"", reference.summary),
                "  ",
            );
            self.blank();
        }
    }
}

/// Greedy word wrap. Words longer than `width` are split.
#[must_use]
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let current_len = current.chars().count();
        if current_len > 0 && current_len + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::SECTIONS;

    #[test]
    fn test_wrap_text_basic() {
        assert_eq!(wrap_text("aa bb cc", 5), vec!["aa bb", "cc"]);
    }

    #[test]
    fn test_wrap_text_splits_long_words() {
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_wrap_text_empty() {
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_sections_start_in_order() {
        let layout = ReportLayout::build(&Report::polaris(), 80);
        let starts: Vec<_> = layout.section_starts().iter().map(|(_, l)| *l).collect();
        assert_eq!(starts.len(), SECTIONS.len());
        assert!(starts.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(layout.section_start("philosophy"), Some(starts[0]));
        assert!(layout.section_start("nonexistent").is_none());
    }

    #[test]
    fn test_section_start_is_heading() {
        let layout = ReportLayout::build(&Report::polaris(), 80);
        for (_, line) in layout.section_starts() {
            assert_eq!(layout.lines()[*line].kind, LineKind::Heading);
        }
    }

    #[test]
    fn test_narrow_width_moves_sections_down() {
        let report = Report::polaris();
        let wide = ReportLayout::build(&report, 120);
        let narrow = ReportLayout::build(&report, 30);
        assert!(narrow.len() > wide.len());
        assert!(narrow.section_start("references") > wide.section_start("references"));
    }

    #[test]
    fn test_width_clamped_to_minimum() {
        let layout = ReportLayout::build(&Report::polaris(), 1);
        assert_eq!(layout.width(), MIN_WIDTH);
    }

    #[test]
    fn test_chart_has_one_bar_per_stage() {
        let report = Report::polaris();
        let layout = ReportLayout::build(&report, 100);
        let bars: Vec<_> = layout
            .lines()
            .iter()
            .filter_map(|l| match &l.kind {
                LineKind::Bar(bar) => Some(bar),
                _ => None,
            })
            .collect();
        assert_eq!(bars.len(), report.latency_budget.len());
        for (bar, stage) in bars.iter().zip(&report.latency_budget) {
            assert_eq!(bar.label, stage.phase);
            assert_eq!(bar.value, stage.latency_ms);
            assert_eq!(bar.color, stage.color);
        }
    }

    #[test]
    fn test_bar_plain_marks_threshold() {
        let bar = BarSpec {
            label: "L1".to_string(),
            value: 3,
            axis_max: 40,
            threshold: 30,
            caption: "Sensor".to_string(),
            color: "#94a3b8",
        };
        let plain = bar.to_plain();
        assert!(plain.starts_with("L1    ###...."));
        assert_eq!(plain.chars().nth(6 + 30), Some('|'));
        assert!(plain.ends_with("3ms  Sensor"));
    }

    #[test]
    fn test_max_scroll_reaches_last_section() {
        let layout = ReportLayout::build(&Report::polaris(), 80);
        let last = layout.section_start("references").unwrap();
        assert!(layout.max_scroll(10_000) >= last);
        assert!(layout.max_scroll(5) >= layout.len() - 5);
    }
}
