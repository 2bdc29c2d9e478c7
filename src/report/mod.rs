//! The Polaris design report.
//!
//! * [`content`]: compiled-in report data (sections, latency budget, tables)
//! * [`layout`]: width-dependent line layout used by the terminal viewer

pub mod content;
pub mod layout;

pub use content::{
    ArchitectureModule, EmotionMapping, LatencyStage, Report, TechReference,
    LATENCY_AXIS_MAX_MS, LATENCY_THRESHOLD_MS, SECTIONS,
};
pub use layout::{BarSpec, DocLine, LineKind, ReportLayout};
