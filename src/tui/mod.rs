//! Terminal viewer.
//!
//! Built on ratatui with the crossterm backend.
//!
//! - [`app`]: viewer state, modes and key handling
//! - [`view`]: the mounted report with scroll position and scroll spy
//! - [`events`]: crossterm event polling
//! - [`keybindings`]: profiles and custom key overrides
//! - [`ui`]: rendering
//! - [`run`]: terminal setup and the main loop
//!
//! # Architecture
//!
//! Data flows one way:
//! 1. Events are read from the terminal
//! 2. Keys become text input (sign-in) or [`Action`]s (report)
//! 3. Input and the frame tick update [`App`]
//! 4. The UI renders from [`App`]

pub mod app;
pub mod events;
pub mod keybindings;
pub mod run;
pub mod theme;
pub mod ui;
pub mod view;

pub use app::{Action, App, AppMode, LoginField};
pub use events::{AppEvent, EventError, EventHandler};
pub use keybindings::{KeyBindings, KeybindingError, KeybindingProfile};
pub use run::{run_tui, TuiError, TuiResult};
pub use theme::Theme;
pub use ui::{render, report_viewport, truncate_string};
pub use view::ReportView;
