//! Scroll-spy navigation over the report sections.
//!
//! # Overview
//!
//! - [`compute_active_section`]: pure selection rule, no viewport needed
//! - [`ScrollSpy`]: holds the active section id and applies the rule on scroll
//! - [`SectionGeometry`]: where the spy reads section offsets from
//!
//! # Example
//!
//! ```
//! use polaris::nav::{compute_active_section, ActivationWindow};
//!
//! let offsets = [("philosophy", -50), ("physics", 10), ("logic", 290)];
//! let active = compute_active_section(&offsets, "philosophy", ActivationWindow::default());
//! assert_eq!(active, "physics");
//! ```

pub mod spy;

pub use spy::{
    compute_active_section, ActivationWindow, JumpRequest, NavError, ScrollSpy, Section,
    SectionGeometry,
};
