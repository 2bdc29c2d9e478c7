//! Viewer application state.
//!
//! # Overview
//!
//! [`App`] owns the [`SessionGate`] and, while the session is open, the
//! mounted [`ReportView`]. It moves between modes:
//!
//! - `Login`: text input for identifier and verifier, Enter submits
//! - `Report`: keys resolve to [`Action`]s through the keybindings
//! - `Help`: overlay listing the bindings, any key closes it
//! - `Quitting`: the loop exits on the next frame
//!
//! Time is passed in explicitly (`now`) so the credential delay resolves on
//! the frame tick and tests can step it without sleeping.
//!
//! # Example
//!
//! ```
//! use polaris::tui::app::{App, AppMode};
//! use polaris::gate::{Credential, SessionGate};
//! use std::time::{Duration, Instant};
//!
//! let gate = SessionGate::new(Box::new(Credential::default()), Duration::from_millis(1500));
//! let mut app = App::new(gate);
//!
//! let start = Instant::now();
//! app.set_identifier("digital-era");
//! app.set_verifier_input("digital_era@sina.com");
//! app.submit(start);
//! app.tick(start + Duration::from_millis(1500));
//!
//! assert_eq!(app.mode(), AppMode::Report);
//! assert_eq!(app.active_section(), Some("philosophy"));
//! ```

use std::str::FromStr;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::keybindings::{KeyBindings, KeybindingError};
use super::theme::Theme;
use super::view::ReportView;
use crate::config::Config;
use crate::gate::{SessionGate, SessionState, SubmitOutcome};
use crate::nav::ActivationWindow;
use crate::report::Report;

/// Viewer mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    /// Sign-in screen.
    #[default]
    Login,
    /// The report is showing.
    Report,
    /// Help overlay on top of the report.
    Help,
    /// The viewer is exiting.
    Quitting,
}

impl AppMode {
    /// Check if the viewer is done.
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Quitting)
    }
}

/// Which sign-in field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Identifier,
    Verifier,
}

impl LoginField {
    fn other(self) -> Self {
        match self {
            Self::Identifier => Self::Verifier,
            Self::Verifier => Self::Identifier,
        }
    }
}

/// A user intent resolved from a key press in report mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    NextSection,
    PreviousSection,
    /// Jump to the n-th section, counting from 1.
    JumpToSection(u8),
    ToggleTheme,
    ShowHelp,
    Logout,
    Cancel,
    Quit,
}

const ACTION_NAMES: &[&str] = &[
    "scroll_up",
    "scroll_down",
    "page_up",
    "page_down",
    "go_to_top",
    "go_to_bottom",
    "next_section",
    "previous_section",
    "jump_to_section_1",
    "jump_to_section_2",
    "jump_to_section_3",
    "jump_to_section_4",
    "jump_to_section_5",
    "toggle_theme",
    "show_help",
    "logout",
    "cancel",
    "quit",
];

impl Action {
    /// Names accepted in `custom_keybindings`.
    #[must_use]
    pub fn all_names() -> &'static [&'static str] {
        ACTION_NAMES
    }

    /// Closest known action name, if any is reasonably close.
    #[must_use]
    pub fn suggest(name: &str) -> Option<&'static str> {
        let normalized = normalize_action_name(name);
        ACTION_NAMES
            .iter()
            .map(|candidate| (*candidate, strsim::jaro_winkler(&normalized, candidate)))
            .filter(|(_, score)| *score >= 0.8)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(candidate, _)| candidate)
    }

    /// Short label for hints and the help overlay.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::ScrollUp => "Scroll up".to_string(),
            Self::ScrollDown => "Scroll down".to_string(),
            Self::PageUp => "Page up".to_string(),
            Self::PageDown => "Page down".to_string(),
            Self::GoToTop => "Go to top".to_string(),
            Self::GoToBottom => "Go to bottom".to_string(),
            Self::NextSection => "Next section".to_string(),
            Self::PreviousSection => "Previous section".to_string(),
            Self::JumpToSection(n) => format!("Jump to section {n}"),
            Self::ToggleTheme => "Toggle theme".to_string(),
            Self::ShowHelp => "Show help".to_string(),
            Self::Logout => "Sign out".to_string(),
            Self::Cancel => "Close overlay".to_string(),
            Self::Quit => "Quit".to_string(),
        }
    }
}

fn normalize_action_name(name: &str) -> String {
    name.trim().to_lowercase().replace(['-', ' '], "_")
}

impl FromStr for Action {
    type Err = KeybindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_action_name(s);
        let action = match normalized.as_str() {
            "scroll_up" | "up" => Self::ScrollUp,
            "scroll_down" | "down" => Self::ScrollDown,
            "page_up" => Self::PageUp,
            "page_down" => Self::PageDown,
            "go_to_top" | "top" => Self::GoToTop,
            "go_to_bottom" | "bottom" => Self::GoToBottom,
            "next_section" => Self::NextSection,
            "previous_section" | "prev_section" => Self::PreviousSection,
            "toggle_theme" => Self::ToggleTheme,
            "show_help" | "help" => Self::ShowHelp,
            "logout" | "sign_out" => Self::Logout,
            "cancel" => Self::Cancel,
            "quit" => Self::Quit,
            other => {
                let n = other
                    .strip_prefix("jump_to_section_")
                    .and_then(|n| n.parse::<u8>().ok())
                    .filter(|n| (1..=9).contains(n));
                match n {
                    Some(n) => Self::JumpToSection(n),
                    None => {
                        return Err(KeybindingError::InvalidAction {
                            name: s.to_string(),
                            suggestion: Self::suggest(s),
                        })
                    }
                }
            }
        };
        Ok(action)
    }
}

/// Viewer state.
///
/// Not thread-safe; only the main loop touches it.
#[derive(Debug)]
pub struct App {
    mode: AppMode,
    gate: SessionGate,
    identifier: String,
    verifier_input: String,
    focus: LoginField,
    /// Identifier of the open session.
    user: Option<String>,
    report: Report,
    view: Option<ReportView>,
    keybindings: KeyBindings,
    theme: Theme,
    accessible: bool,
    ascii_borders: bool,
    spy_window: ActivationWindow,
    scroll_step: u16,
    viewport: (u16, u16),
}

impl App {
    /// Create a viewer in front of `gate` with default presentation settings.
    #[must_use]
    pub fn new(gate: SessionGate) -> Self {
        Self {
            mode: AppMode::Login,
            gate,
            identifier: String::new(),
            verifier_input: String::new(),
            focus: LoginField::Identifier,
            user: None,
            report: Report::polaris(),
            view: None,
            keybindings: KeyBindings::default(),
            theme: Theme::default(),
            accessible: false,
            ascii_borders: false,
            spy_window: ActivationWindow::new(0, 8),
            scroll_step: 3,
            // Updated from the real terminal on the first frame
            viewport: (80, 20),
        }
    }

    /// Build the viewer from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `custom_keybindings` names an unknown action or
    /// an unparseable key.
    pub fn from_config(config: &Config) -> Result<Self, KeybindingError> {
        let gate = SessionGate::new(Box::new(config.credential.clone()), config.login_delay());
        let keybindings =
            KeyBindings::from_profile_with_custom(config.keybinding_profile, &config.custom_keybindings)?;

        Ok(Self::new(gate)
            .with_keybindings(keybindings)
            .with_theme(Theme::from_arg(config.theme))
            .with_accessibility(
                config.accessibility.enabled,
                config.accessibility.use_ascii_borders,
            )
            .with_navigation(config.spy_window(), config.scroll_step_rows))
    }

    /// Use these keybindings.
    #[must_use]
    pub fn with_keybindings(mut self, keybindings: KeyBindings) -> Self {
        self.keybindings = keybindings;
        self
    }

    /// Use this palette.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Accessible mode jumps instantly and marks the active tab in text.
    #[must_use]
    pub fn with_accessibility(mut self, enabled: bool, ascii_borders: bool) -> Self {
        self.accessible = enabled;
        self.ascii_borders = ascii_borders;
        self
    }

    /// Scroll-spy window and smooth-scroll step, both in rows.
    #[must_use]
    pub fn with_navigation(mut self, window: ActivationWindow, step: u16) -> Self {
        self.spy_window = window;
        self.scroll_step = step.max(1);
        self
    }

    /// Show a different report.
    #[must_use]
    pub fn with_report(mut self, report: Report) -> Self {
        self.report = report;
        self
    }

    // ==================== Accessors ====================

    /// Get the current mode.
    #[must_use]
    pub fn mode(&self) -> AppMode {
        self.mode
    }

    /// Check if the viewer should exit.
    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.mode.is_done()
    }

    /// Get the session state.
    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.gate.state()
    }

    /// Get the gate.
    #[must_use]
    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    /// Error text for the sign-in screen, if the last attempt failed.
    #[must_use]
    pub fn login_error(&self) -> Option<String> {
        self.gate.last_error().map(ToString::to_string)
    }

    /// Identifier typed so far.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Verifier typed so far.
    #[must_use]
    pub fn verifier_input(&self) -> &str {
        &self.verifier_input
    }

    /// Replace the identifier field.
    pub fn set_identifier(&mut self, value: &str) {
        self.identifier = value.to_string();
    }

    /// Replace the verifier field.
    pub fn set_verifier_input(&mut self, value: &str) {
        self.verifier_input = value.to_string();
    }

    /// Focused sign-in field.
    #[must_use]
    pub fn focus(&self) -> LoginField {
        self.focus
    }

    /// Identifier of the open session.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// The report (also available before sign-in, for export).
    #[must_use]
    pub fn report(&self) -> &Report {
        &self.report
    }

    /// The mounted report view, while the session is open.
    #[must_use]
    pub fn view(&self) -> Option<&ReportView> {
        self.view.as_ref()
    }

    /// Active section id, while the session is open.
    #[must_use]
    pub fn active_section(&self) -> Option<&'static str> {
        self.view.as_ref().map(ReportView::active_section)
    }

    /// Get the keybindings.
    #[must_use]
    pub fn keybindings(&self) -> &KeyBindings {
        &self.keybindings
    }

    /// Get the palette.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Check if accessible mode is on.
    #[must_use]
    pub fn is_accessible(&self) -> bool {
        self.accessible
    }

    /// Check if ASCII borders are requested.
    #[must_use]
    pub fn ascii_borders(&self) -> bool {
        self.ascii_borders
    }

    // ==================== Frame updates ====================

    /// Report the size of the report text area.
    pub fn set_viewport(&mut self, width: u16, rows: u16) {
        if self.viewport == (width, rows) {
            return;
        }
        self.viewport = (width, rows);
        if let Some(view) = self.view.as_mut() {
            view.resize(width, rows);
        }
    }

    /// Per-frame update: resolve a due credential check, advance a jump.
    pub fn tick(&mut self, now: Instant) {
        if let Some(result) = self.gate.poll(now) {
            match result {
                Ok(()) => self.open_report(),
                Err(_) => self.verifier_input.clear(),
            }
        }
        if let Some(view) = self.view.as_mut() {
            view.tick();
        }
    }

    /// Submit the sign-in fields.
    pub fn submit(&mut self, now: Instant) -> SubmitOutcome {
        self.gate
            .submit(&self.identifier, &self.verifier_input, now)
    }

    /// Close the session and return to the sign-in screen.
    ///
    /// Unmounting the view detaches its scroll listener.
    pub fn logout(&mut self) {
        self.gate.logout();
        if let Some(mut view) = self.view.take() {
            view.unmount();
        }
        self.user = None;
        self.identifier.clear();
        self.verifier_input.clear();
        self.focus = LoginField::Identifier;
        self.mode = AppMode::Login;
    }

    /// Exit the viewer.
    pub fn quit(&mut self) {
        if let Some(mut view) = self.view.take() {
            view.unmount();
        }
        self.mode = AppMode::Quitting;
    }

    fn open_report(&mut self) {
        let (width, rows) = self.viewport;
        match ReportView::mount(
            self.report.clone(),
            width,
            rows,
            self.spy_window,
            self.scroll_step,
        ) {
            Ok(mut view) => {
                view.set_smooth(!self.accessible);
                self.view = Some(view);
                self.user = Some(self.identifier.clone());
                self.verifier_input.clear();
                self.mode = AppMode::Report;
            }
            Err(e) => {
                log::error!("Cannot show report: {}", e);
                self.gate.logout();
            }
        }
    }

    // ==================== Input ====================

    /// Handle a key press for the current mode.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match self.mode {
            AppMode::Login => self.handle_login_key(key, now),
            AppMode::Report => {
                if let Some(action) = self.keybindings.resolve(&key) {
                    self.handle_action(action);
                }
            }
            AppMode::Help => match self.keybindings.resolve(&key) {
                Some(Action::Quit) => self.quit(),
                _ => self.mode = AppMode::Report,
            },
            AppMode::Quitting => {}
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => self.quit(),
            KeyCode::Esc => self.quit(),
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = self.focus.other();
            }
            KeyCode::Enter => {
                self.submit(now);
            }
            // Fields are read-only while a check is pending
            _ if self.gate.state().is_pending() => {}
            KeyCode::Backspace => {
                self.focused_field_mut().pop();
            }
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                self.focused_field_mut().push(c);
            }
            _ => {}
        }
    }

    fn focused_field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Identifier => &mut self.identifier,
            LoginField::Verifier => &mut self.verifier_input,
        }
    }

    /// Mouse wheel or other row-wise scrolling.
    pub fn scroll_rows(&mut self, delta: i64) {
        if self.mode != AppMode::Report {
            return;
        }
        if let Some(view) = self.view.as_mut() {
            view.scroll_by(delta);
        }
    }

    /// Apply a report-mode action. Returns `true` if it was handled.
    pub fn handle_action(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => {
                self.quit();
                return true;
            }
            Action::Logout => {
                self.logout();
                return true;
            }
            Action::ShowHelp => {
                self.mode = AppMode::Help;
                return true;
            }
            Action::Cancel => {
                if self.mode == AppMode::Help {
                    self.mode = AppMode::Report;
                    return true;
                }
                return false;
            }
            Action::ToggleTheme => {
                self.theme = self.theme.toggled();
                return true;
            }
            _ => {}
        }

        let Some(view) = self.view.as_mut() else {
            return false;
        };
        match action {
            Action::ScrollUp => view.scroll_by(-1),
            Action::ScrollDown => view.scroll_by(1),
            Action::PageUp => view.page_up(),
            Action::PageDown => view.page_down(),
            Action::GoToTop => view.to_top(),
            Action::GoToBottom => view.to_bottom(),
            Action::NextSection => return view.next_section().is_some(),
            Action::PreviousSection => return view.previous_section().is_some(),
            Action::JumpToSection(n) => {
                let index = usize::from(n.saturating_sub(1));
                return view.jump_to_index(index).is_some();
            }
            _ => return false,
        }
        true
    }
}
