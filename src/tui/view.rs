//! The mounted report view: scroll position, smooth jumps and the spy.
//!
//! A [`ReportView`] exists only while the session is authenticated. Creating
//! one attaches its scroll spy; dropping it (sign-out, quit, or an error
//! unwinding the viewer) detaches it again.

use crate::nav::{ActivationWindow, JumpRequest, NavError, ScrollSpy, SectionGeometry};
use crate::report::{Report, ReportLayout};

/// Section offsets relative to the current viewport top, in rows.
struct ViewportGeometry<'a> {
    layout: &'a ReportLayout,
    scroll: usize,
}

impl SectionGeometry for ViewportGeometry<'_> {
    fn offset_of(&self, id: &str) -> Option<i64> {
        let start = self.layout.section_start(id)?;
        Some(start as i64 - self.scroll as i64)
    }
}

/// The scrollable report with scroll-spy navigation.
#[derive(Debug)]
pub struct ReportView {
    report: Report,
    layout: ReportLayout,
    scroll: usize,
    viewport_rows: usize,
    spy: ScrollSpy,
    /// Section being smooth-scrolled to.
    target: Option<&'static str>,
    step: usize,
    smooth: bool,
}

impl ReportView {
    /// Lay out `report` for a `width` x `rows` viewport and attach the spy.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::NoSections`] if the report has no sections.
    pub fn mount(
        report: Report,
        width: u16,
        rows: u16,
        window: ActivationWindow,
        step: u16,
    ) -> Result<Self, NavError> {
        let spy = ScrollSpy::new(&report.sections, window)?;
        let layout = ReportLayout::build(&report, usize::from(width));
        let mut view = Self {
            report,
            layout,
            scroll: 0,
            viewport_rows: usize::from(rows.max(1)),
            spy,
            target: None,
            step: usize::from(step.max(1)),
            smooth: true,
        };
        view.spy.attach();
        view.refresh_active();
        log::debug!(
            "Report mounted: {} lines, {} rows visible",
            view.layout.len(),
            view.viewport_rows
        );
        Ok(view)
    }

    /// Jump instantly instead of animating.
    pub fn set_smooth(&mut self, smooth: bool) {
        self.smooth = smooth;
    }

    /// Get the report being shown.
    #[must_use]
    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Get the current layout.
    #[must_use]
    pub fn layout(&self) -> &ReportLayout {
        &self.layout
    }

    /// First visible line.
    #[must_use]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// Number of visible rows.
    #[must_use]
    pub fn viewport_rows(&self) -> usize {
        self.viewport_rows
    }

    /// Largest valid scroll position for the current viewport.
    #[must_use]
    pub fn max_scroll(&self) -> usize {
        self.layout.max_scroll(self.viewport_rows)
    }

    /// Active section id.
    #[must_use]
    pub fn active_section(&self) -> &'static str {
        self.spy.active()
    }

    /// Index of the active section.
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.spy.active_index()
    }

    /// Check whether the scroll listener is attached.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.spy.is_attached()
    }

    /// Check whether a smooth jump is in progress.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.target.is_some()
    }

    /// Scroll by `delta` rows. Cancels any jump in progress.
    pub fn scroll_by(&mut self, delta: i64) {
        self.target = None;
        let next = (self.scroll as i64).saturating_add(delta).max(0);
        self.set_scroll(usize::try_from(next).unwrap_or(0));
    }

    /// Scroll to an absolute line. Cancels any jump in progress.
    pub fn scroll_to(&mut self, line: usize) {
        self.target = None;
        self.set_scroll(line);
    }

    /// Scroll down by one page, keeping one line of overlap.
    pub fn page_down(&mut self) {
        self.scroll_by(self.page_rows() as i64);
    }

    /// Scroll up by one page, keeping one line of overlap.
    pub fn page_up(&mut self) {
        self.scroll_by(-(self.page_rows() as i64));
    }

    /// Scroll to the first line.
    pub fn to_top(&mut self) {
        self.scroll_to(0);
    }

    /// Scroll to the last page.
    pub fn to_bottom(&mut self) {
        self.scroll_to(self.max_scroll());
    }

    /// Start a jump to section `id`.
    ///
    /// Returns `None` and leaves everything unchanged for unknown ids. The
    /// active section updates as the resulting scroll passes through.
    pub fn jump(&mut self, id: &str) -> Option<JumpRequest> {
        let request = self.spy.jump_to(id)?;
        self.start_jump(request);
        Some(request)
    }

    /// Start a jump to the section at `index`.
    pub fn jump_to_index(&mut self, index: usize) -> Option<JumpRequest> {
        let request = self.spy.jump_to_index(index)?;
        self.start_jump(request);
        Some(request)
    }

    /// Jump to the section after the active one.
    pub fn next_section(&mut self) -> Option<JumpRequest> {
        self.jump_to_index(self.active_index() + 1)
    }

    /// Jump to the section before the active one.
    ///
    /// When the reader is partway into a section, this returns to its top
    /// first.
    pub fn previous_section(&mut self) -> Option<JumpRequest> {
        let index = self.active_index();
        let at_top = self
            .spy
            .sections()
            .get(index)
            .and_then(|s| self.target_line(s.id))
            .is_some_and(|line| line >= self.scroll);
        if at_top {
            self.jump_to_index(index.checked_sub(1)?)
        } else {
            self.jump_to_index(index)
        }
    }

    /// Advance a smooth jump by one frame.
    ///
    /// Returns `true` if the scroll position moved.
    pub fn tick(&mut self) -> bool {
        let Some(id) = self.target else {
            return false;
        };
        let Some(goal) = self.target_line(id) else {
            self.target = None;
            return false;
        };

        let next = if goal > self.scroll {
            (self.scroll + self.step).min(goal)
        } else {
            self.scroll.saturating_sub(self.step).max(goal)
        };
        if next == goal {
            self.target = None;
        }
        let moved = next != self.scroll;
        self.set_scroll(next);
        moved
    }

    /// Run the current jump to completion.
    pub fn finish_jump(&mut self) {
        while self.target.is_some() {
            self.tick();
        }
    }

    /// Re-lay out for a new viewport size.
    ///
    /// A pending jump keeps its section as target; otherwise the reader stays
    /// at the same relative position in the document.
    pub fn resize(&mut self, width: u16, rows: u16) {
        let rows = usize::from(rows.max(1));
        let width = usize::from(width);
        if width.max(crate::report::layout::MIN_WIDTH) != self.layout.width() {
            let fraction = if self.layout.is_empty() {
                0.0
            } else {
                self.scroll as f64 / self.layout.len() as f64
            };
            self.layout = ReportLayout::build(&self.report, width);
            self.scroll = (fraction * self.layout.len() as f64) as usize;
        }
        self.viewport_rows = rows;
        let scroll = self.scroll;
        self.set_scroll(scroll);
    }

    /// Detach the scroll listener.
    pub fn unmount(&mut self) {
        self.target = None;
        self.spy.detach();
    }

    fn start_jump(&mut self, request: JumpRequest) {
        log::debug!("Jump to section '{}'", request.id);
        self.target = Some(request.id);
        if !self.smooth {
            self.finish_jump();
        }
    }

    fn target_line(&self, id: &str) -> Option<usize> {
        let start = self.layout.section_start(id)?;
        Some(start.min(self.max_scroll()))
    }

    fn page_rows(&self) -> usize {
        self.viewport_rows.saturating_sub(1).max(1)
    }

    fn set_scroll(&mut self, line: usize) {
        self.scroll = line.min(self.max_scroll());
        self.refresh_active();
    }

    fn refresh_active(&mut self) {
        let geometry = ViewportGeometry {
            layout: &self.layout,
            scroll: self.scroll,
        };
        self.spy.on_scroll(&geometry);
    }
}

impl Drop for ReportView {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mounted() -> ReportView {
        ReportView::mount(Report::polaris(), 80, 20, ActivationWindow::new(0, 8), 3).unwrap()
    }

    #[test]
    fn test_mount_attaches_and_starts_on_first_section() {
        let view = mounted();
        assert!(view.is_listening());
        assert_eq!(view.scroll(), 0);
        assert_eq!(view.active_section(), "philosophy");
    }

    #[test]
    fn test_unmount_detaches() {
        let mut view = mounted();
        view.unmount();
        assert!(!view.is_listening());
        let before = view.active_section();
        view.scroll_to(view.max_scroll());
        assert_eq!(view.active_section(), before);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut view = mounted();
        view.scroll_by(-5);
        assert_eq!(view.scroll(), 0);
        view.scroll_by(1_000_000);
        assert_eq!(view.scroll(), view.max_scroll());
    }

    #[test]
    fn test_jump_converges_on_every_section() {
        let mut view = mounted();
        let ids: Vec<&str> = view.report().sections.iter().map(|s| s.id).collect();
        for id in ids.iter().rev().chain(ids.iter()) {
            assert!(view.jump(id).is_some());
            view.finish_jump();
            assert_eq!(view.active_section(), *id);
            assert!(!view.is_animating());
        }
    }

    #[test]
    fn test_jump_unknown_id_is_noop() {
        let mut view = mounted();
        view.scroll_to(12);
        let before = (view.scroll(), view.active_section());
        assert!(view.jump("nonexistent").is_none());
        assert!(!view.is_animating());
        assert_eq!((view.scroll(), view.active_section()), before);
    }

    #[test]
    fn test_jump_does_not_activate_before_scrolling() {
        let mut view = mounted();
        view.jump("references");
        assert_eq!(view.active_section(), "philosophy");
        assert!(view.is_animating());
    }

    #[test]
    fn test_tick_moves_by_step() {
        let mut view = mounted();
        view.jump("logic");
        assert!(view.tick());
        assert_eq!(view.scroll(), 3);
    }

    #[test]
    fn test_manual_scroll_cancels_jump() {
        let mut view = mounted();
        view.jump("references");
        view.tick();
        view.scroll_by(1);
        assert!(!view.is_animating());
    }

    #[test]
    fn test_instant_jump_when_not_smooth() {
        let mut view = mounted();
        view.set_smooth(false);
        view.jump("aesthetics");
        assert!(!view.is_animating());
        assert_eq!(view.active_section(), "aesthetics");
    }

    #[test]
    fn test_next_and_previous_section() {
        let mut view = mounted();
        view.set_smooth(false);
        assert_eq!(view.next_section().map(|r| r.id), Some("physics"));
        assert_eq!(view.active_section(), "physics");
        assert_eq!(view.previous_section().map(|r| r.id), Some("philosophy"));
        assert_eq!(view.active_section(), "philosophy");
    }

    #[test]
    fn test_previous_section_returns_to_top_of_current_first() {
        let mut view = mounted();
        view.set_smooth(false);
        view.jump("logic");
        view.scroll_by(2);
        assert_eq!(view.active_section(), "logic");
        assert_eq!(view.previous_section().map(|r| r.id), Some("logic"));
        assert_eq!(view.previous_section().map(|r| r.id), Some("physics"));
    }

    #[test]
    fn test_resize_keeps_scroll_valid_and_jumps_converge() {
        let mut view = mounted();
        view.to_bottom();
        view.resize(40, 10);
        assert!(view.scroll() <= view.max_scroll());
        view.set_smooth(false);
        view.jump("physics");
        assert_eq!(view.active_section(), "physics");
    }
}
