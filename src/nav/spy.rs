//! Active-section tracking.
//!
//! The selection rule is a linear scan in declaration order: the first
//! section whose top offset (relative to the viewport top) falls inside the
//! activation window wins. When no section qualifies the previous value is
//! kept. Scroll direction never affects the scan order.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

/// A navigable region of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Stable identifier used for navigation.
    pub id: &'static str,
    /// Label shown in the navigation bar.
    pub label: &'static str,
}

impl Section {
    /// Create a section descriptor.
    #[must_use]
    pub const fn new(id: &'static str, label: &'static str) -> Self {
        Self { id, label }
    }
}

/// Half-open offset range `[start, end)` in which a section becomes active.
///
/// Offsets are measured from the viewport top in whatever unit the geometry
/// source reports (pixels in a browser, rows in a terminal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationWindow {
    /// Inclusive lower bound.
    pub start: i64,
    /// Exclusive upper bound.
    pub end: i64,
}

impl ActivationWindow {
    /// Create a window `[start, end)`.
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Check if an offset lies in the window.
    #[must_use]
    pub fn contains(&self, offset: i64) -> bool {
        offset >= self.start && offset < self.end
    }
}

impl Default for ActivationWindow {
    fn default() -> Self {
        Self::new(0, 300)
    }
}

/// Source of current section offsets.
pub trait SectionGeometry {
    /// Current offset of the section's top edge from the viewport top, or
    /// `None` if the section is not laid out.
    fn offset_of(&self, id: &str) -> Option<i64>;
}

impl SectionGeometry for HashMap<&str, i64> {
    fn offset_of(&self, id: &str) -> Option<i64> {
        self.get(id).copied()
    }
}

impl SectionGeometry for [(&str, i64)] {
    fn offset_of(&self, id: &str) -> Option<i64> {
        self.iter().find(|(sid, _)| *sid == id).map(|(_, off)| *off)
    }
}

/// Select the active section for a set of offsets.
///
/// Scans `offsets` in order and returns the first id whose offset lies in
/// `window`. If none does, `previous` is returned unchanged.
#[must_use]
pub fn compute_active_section<'a>(
    offsets: &[(&'a str, i64)],
    previous: &'a str,
    window: ActivationWindow,
) -> &'a str {
    offsets
        .iter()
        .find(|(_, offset)| window.contains(*offset))
        .map_or(previous, |(id, _)| *id)
}

/// Errors from constructing a [`ScrollSpy`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    /// The section list was empty.
    #[error("scroll spy needs at least one section")]
    NoSections,
}

/// A request to bring a section's top edge into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpRequest {
    /// Target section id.
    pub id: &'static str,
    /// Position of the target in the section list.
    pub index: usize,
}

/// Tracks which section the reader is most likely looking at.
///
/// The spy only reacts to scroll events while attached. The owning view
/// attaches it on mount and detaches it on every exit path.
#[derive(Debug, Clone)]
pub struct ScrollSpy {
    sections: Vec<Section>,
    active: &'static str,
    window: ActivationWindow,
    attached: bool,
}

impl ScrollSpy {
    /// Create a detached spy whose active section is the first one.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::NoSections`] if `sections` is empty.
    pub fn new(sections: &[Section], window: ActivationWindow) -> Result<Self, NavError> {
        let first = sections.first().ok_or(NavError::NoSections)?;
        Ok(Self {
            active: first.id,
            sections: sections.to_vec(),
            window,
            attached: false,
        })
    }

    /// Get the active section id.
    #[must_use]
    pub fn active(&self) -> &'static str {
        self.active
    }

    /// Get the index of the active section.
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.index_of(self.active).unwrap_or(0)
    }

    /// Get the tracked sections in declaration order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Get the activation window.
    #[must_use]
    pub fn window(&self) -> ActivationWindow {
        self.window
    }

    /// Check if the scroll listener is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Start reacting to scroll events.
    pub fn attach(&mut self) {
        if !self.attached {
            log::debug!("Scroll listener attached");
            self.attached = true;
        }
    }

    /// Stop reacting to scroll events.
    pub fn detach(&mut self) {
        if self.attached {
            log::debug!("Scroll listener detached");
            self.attached = false;
        }
    }

    /// Recompute the active section from current geometry.
    ///
    /// Sections the geometry cannot place are skipped. Returns `true` if the
    /// active section changed. Does nothing while detached.
    pub fn on_scroll<G: SectionGeometry + ?Sized>(&mut self, geometry: &G) -> bool {
        if !self.attached {
            return false;
        }

        let offsets: Vec<(&'static str, i64)> = self
            .sections
            .iter()
            .filter_map(|s| geometry.offset_of(s.id).map(|off| (s.id, off)))
            .collect();

        let next = compute_active_section(&offsets, self.active, self.window);
        if next == self.active {
            return false;
        }

        log::trace!("Active section: {} -> {}", self.active, next);
        self.active = next;
        true
    }

    /// Resolve a jump target.
    ///
    /// Unknown ids yield `None`. The active section is not changed here; it
    /// follows from the scroll events the jump produces.
    #[must_use]
    pub fn jump_to(&self, id: &str) -> Option<JumpRequest> {
        let index = self.index_of(id)?;
        Some(JumpRequest {
            id: self.sections[index].id,
            index,
        })
    }

    /// Resolve a jump target by position.
    #[must_use]
    pub fn jump_to_index(&self, index: usize) -> Option<JumpRequest> {
        self.sections
            .get(index)
            .map(|s| JumpRequest { id: s.id, index })
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTIONS: [Section; 3] = [
        Section::new("a", "A"),
        Section::new("b", "B"),
        Section::new("c", "C"),
    ];

    fn spy() -> ScrollSpy {
        let mut spy = ScrollSpy::new(&SECTIONS, ActivationWindow::new(0, 10)).unwrap();
        spy.attach();
        spy
    }

    #[test]
    fn test_window_is_half_open() {
        let window = ActivationWindow::new(0, 300);
        assert!(window.contains(0));
        assert!(window.contains(299));
        assert!(!window.contains(300));
        assert!(!window.contains(-1));
    }

    #[test]
    fn test_compute_first_match_wins() {
        let offsets = [("a", 5), ("b", 3)];
        assert_eq!(
            compute_active_section(&offsets, "c", ActivationWindow::new(0, 10)),
            "a"
        );
    }

    #[test]
    fn test_compute_duplicate_ids_earlier_wins() {
        let offsets = [("x", 20), ("dup", 4), ("dup", 2)];
        assert_eq!(
            compute_active_section(&offsets, "x", ActivationWindow::new(0, 10)),
            "dup"
        );
    }

    #[test]
    fn test_compute_sticky_when_empty() {
        assert_eq!(
            compute_active_section(&[], "b", ActivationWindow::default()),
            "b"
        );
    }

    #[test]
    fn test_new_rejects_empty_sections() {
        assert_eq!(
            ScrollSpy::new(&[], ActivationWindow::default()).unwrap_err(),
            NavError::NoSections
        );
    }

    #[test]
    fn test_new_starts_detached_on_first_section() {
        let spy = ScrollSpy::new(&SECTIONS, ActivationWindow::default()).unwrap();
        assert_eq!(spy.active(), "a");
        assert!(!spy.is_attached());
    }

    #[test]
    fn test_on_scroll_updates_active() {
        let mut spy = spy();
        let geometry: &[(&str, i64)] = &[("a", -30), ("b", 4), ("c", 25)];
        assert!(spy.on_scroll(geometry));
        assert_eq!(spy.active(), "b");
        assert_eq!(spy.active_index(), 1);
    }

    #[test]
    fn test_on_scroll_skips_unplaced_sections() {
        let mut spy = spy();
        let geometry: HashMap<&str, i64> = [("c", 0)].into_iter().collect();
        assert!(spy.on_scroll(&geometry));
        assert_eq!(spy.active(), "c");
    }

    #[test]
    fn test_on_scroll_detached_is_ignored() {
        let mut spy = spy();
        spy.detach();
        let geometry: &[(&str, i64)] = &[("a", -30), ("b", 4)];
        assert!(!spy.on_scroll(geometry));
        assert_eq!(spy.active(), "a");
    }

    #[test]
    fn test_jump_to_known_and_unknown() {
        let spy = spy();
        assert_eq!(spy.jump_to("c"), Some(JumpRequest { id: "c", index: 2 }));
        assert_eq!(spy.jump_to("nonexistent"), None);
        assert_eq!(spy.active(), "a");
    }

    #[test]
    fn test_jump_to_index_out_of_range() {
        let spy = spy();
        assert_eq!(spy.jump_to_index(1).map(|j| j.id), Some("b"));
        assert!(spy.jump_to_index(3).is_none());
    }
}
