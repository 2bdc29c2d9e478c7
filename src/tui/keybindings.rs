//! Keybinding configuration for the viewer.
//!
//! Keys are looked up through a profile preset, optionally extended with
//! custom bindings from the configuration file. The default profile
//! (Universal) accepts vim-style keys and arrow keys at the same time.
//!
//! # Profiles
//!
//! - [`KeybindingProfile::Universal`]: vim-style AND arrow keys (default)
//! - [`KeybindingProfile::Vim`]: vim-style keys only
//! - [`KeybindingProfile::Standard`]: arrow keys and common shortcuts only
//!
//! Bindings only apply once the report is showing. The sign-in screen reads
//! raw keystrokes for its text fields.
//!
//! # Example
//!
//! ```
//! use polaris::tui::keybindings::{KeyBindings, KeybindingProfile};
//! use polaris::tui::Action;
//! use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
//!
//! let bindings = KeyBindings::from_profile(KeybindingProfile::Universal);
//!
//! let j_key = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
//! let down_key = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
//!
//! assert_eq!(bindings.resolve(&j_key), Some(Action::ScrollDown));
//! assert_eq!(bindings.resolve(&down_key), Some(Action::ScrollDown));
//! ```

use std::collections::HashMap;

use clap::ValueEnum;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::Action;

/// Keybinding profile presets.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Hash,
    ValueEnum,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum KeybindingProfile {
    /// Vim-style AND arrow keys.
    #[default]
    Universal,

    /// Vim-style keys (hjkl, g/G, Ctrl-d/u) only.
    Vim,

    /// Arrow keys, Page Up/Down, Home/End and Tab only.
    Standard,
}

impl KeybindingProfile {
    /// Get the display name for the profile.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Universal => "Universal (Vim + Arrow keys)",
            Self::Vim => "Vim (hjkl)",
            Self::Standard => "Standard (Arrow keys)",
        }
    }

    /// Get all available profiles.
    #[must_use]
    pub fn all() -> &'static [KeybindingProfile] {
        &[Self::Universal, Self::Vim, Self::Standard]
    }
}

impl std::fmt::Display for KeybindingProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Universal => "universal",
            Self::Vim => "vim",
            Self::Standard => "standard",
        };
        write!(f, "{name}")
    }
}

impl std::str::FromStr for KeybindingProfile {
    type Err = KeybindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "universal" => Ok(Self::Universal),
            "vim" => Ok(Self::Vim),
            "standard" | "arrows" | "arrow" => Ok(Self::Standard),
            _ => Err(KeybindingError::InvalidProfile(s.to_string())),
        }
    }
}

/// Error type for keybinding operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KeybindingError {
    /// Invalid profile name.
    #[error("Unknown keybinding profile: '{0}'. Valid profiles: universal, vim, standard")]
    InvalidProfile(String),

    /// Invalid key specification.
    #[error("Invalid key specification: '{0}'. Examples: 'j', 'Ctrl+c', 'Down', 'Space', 'F1'")]
    InvalidKeySpec(String),

    /// Invalid action name, with the closest known name when there is one.
    #[error("Unknown action: '{name}'.{}", suggestion_text(.suggestion))]
    InvalidAction {
        /// The name as written in the configuration.
        name: String,
        /// Closest valid action name.
        suggestion: Option<&'static str>,
    },
}

fn suggestion_text(suggestion: &Option<&'static str>) -> String {
    match suggestion {
        Some(name) => format!(" Did you mean '{name}'?"),
        None => format!(" Valid actions: {}", Action::all_names().join(", ")),
    }
}

/// Maps each [`Action`] to the key events that trigger it.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    profile: KeybindingProfile,
    action_keys: HashMap<Action, Vec<KeyEvent>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_profile(KeybindingProfile::Universal)
    }
}

impl KeyBindings {
    /// Create keybindings from a specific profile.
    #[must_use]
    pub fn from_profile(profile: KeybindingProfile) -> Self {
        let action_keys = match profile {
            KeybindingProfile::Universal => Self::universal_bindings(),
            KeybindingProfile::Vim => Self::vim_bindings(),
            KeybindingProfile::Standard => Self::standard_bindings(),
        };

        Self {
            profile,
            action_keys,
        }
    }

    /// Get the keybinding profile.
    #[must_use]
    pub fn profile(&self) -> KeybindingProfile {
        self.profile
    }

    /// Resolve a key event to an action.
    ///
    /// Only key presses are matched; release and repeat events some
    /// terminals send are ignored.
    #[must_use]
    pub fn resolve(&self, key: &KeyEvent) -> Option<Action> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        self.action_keys
            .iter()
            .find(|(_, keys)| keys.iter().any(|k| Self::key_matches(k, key)))
            .map(|(action, _)| *action)
    }

    /// Match code and modifiers, ignoring kind and state.
    ///
    /// SHIFT is ignored for characters: `G` already encodes it, and
    /// terminals disagree on whether they also report the modifier.
    fn key_matches(target: &KeyEvent, actual: &KeyEvent) -> bool {
        if target.code != actual.code {
            return false;
        }
        match target.code {
            KeyCode::Char(_) | KeyCode::BackTab => {
                target.modifiers.difference(KeyModifiers::SHIFT)
                    == actual.modifiers.difference(KeyModifiers::SHIFT)
            }
            _ => target.modifiers == actual.modifiers,
        }
    }

    /// Get the keys bound to a specific action.
    #[must_use]
    pub fn keys_for_action(&self, action: &Action) -> &[KeyEvent] {
        self.action_keys
            .get(action)
            .map_or(&[], |keys| keys.as_slice())
    }

    /// Get all actions and their bound keys.
    #[must_use]
    pub fn all_bindings(&self) -> &HashMap<Action, Vec<KeyEvent>> {
        &self.action_keys
    }

    /// Human-readable form of the first key bound to an action, for hints.
    #[must_use]
    pub fn key_hint(&self, action: &Action) -> String {
        self.keys_for_action(action)
            .first()
            .map_or_else(String::new, Self::format_key)
    }

    /// Format a key event as a human-readable string.
    #[must_use]
    pub fn format_key(key: &KeyEvent) -> String {
        let mut parts = Vec::new();

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl");
        }
        if key.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt");
        }
        if key.modifiers.contains(KeyModifiers::SHIFT) && !matches!(key.code, KeyCode::BackTab) {
            parts.push("Shift");
        }

        let key_name = match key.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::PageUp => "PgUp".to_string(),
            KeyCode::PageDown => "PgDn".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "Shift+Tab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::F(n) => format!("F{n}"),
            _ => "?".to_string(),
        };

        if parts.is_empty() {
            key_name
        } else {
            parts.push(&key_name);
            parts.join("+")
        }
    }

    /// Parse a key specification such as `j`, `Space`, `PgDn`, `F1` or
    /// `Ctrl+Shift+a`.
    ///
    /// # Errors
    ///
    /// Returns [`KeybindingError::InvalidKeySpec`] if the specification
    /// cannot be parsed.
    ///
    /// # Example
    ///
    /// ```
    /// use polaris::tui::keybindings::KeyBindings;
    /// use crossterm::event::{KeyCode, KeyModifiers};
    ///
    /// let key = KeyBindings::parse_key("Ctrl+d").unwrap();
    /// assert_eq!(key.code, KeyCode::Char('d'));
    /// assert_eq!(key.modifiers, KeyModifiers::CONTROL);
    /// ```
    pub fn parse_key(spec: &str) -> Result<KeyEvent, KeybindingError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(KeybindingError::InvalidKeySpec(spec.to_string()));
        }

        // '+' on its own is the plus key, not a separator
        let parts: Vec<&str> = if spec == "+" {
            vec!["+"]
        } else {
            spec.split('+').map(str::trim).collect()
        };

        let mut modifiers = KeyModifiers::NONE;
        let mut key_part = None;

        for (i, part) in parts.iter().enumerate() {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "alt" | "meta" | "option" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => {
                    if i != parts.len() - 1 {
                        return Err(KeybindingError::InvalidKeySpec(format!(
                            "'{spec}' - unexpected modifier position for '{part}'"
                        )));
                    }
                    key_part = Some(*part);
                }
            }
        }

        let key_str = key_part.ok_or_else(|| {
            KeybindingError::InvalidKeySpec(format!("'{spec}' - missing key after modifiers"))
        })?;

        let code = Self::parse_key_code(key_str)
            .ok_or_else(|| KeybindingError::InvalidKeySpec(spec.to_string()))?;

        Ok(KeyEvent::new(code, modifiers))
    }

    fn parse_key_code(s: &str) -> Option<KeyCode> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return c.is_ascii().then_some(KeyCode::Char(c));
        }

        let lower = s.to_lowercase();
        if let Some(n) = lower.strip_prefix('f').and_then(|r| r.parse::<u8>().ok()) {
            return (1..=12).contains(&n).then_some(KeyCode::F(n));
        }

        match lower.as_str() {
            "space" | "spc" => Some(KeyCode::Char(' ')),
            "enter" | "return" | "ret" | "cr" => Some(KeyCode::Enter),
            "esc" | "escape" => Some(KeyCode::Esc),
            "tab" => Some(KeyCode::Tab),
            "backtab" | "shifttab" => Some(KeyCode::BackTab),
            "backspace" | "bs" => Some(KeyCode::Backspace),
            "delete" | "del" => Some(KeyCode::Delete),
            "insert" | "ins" => Some(KeyCode::Insert),
            "up" | "uparrow" => Some(KeyCode::Up),
            "down" | "downarrow" => Some(KeyCode::Down),
            "left" | "leftarrow" => Some(KeyCode::Left),
            "right" | "rightarrow" => Some(KeyCode::Right),
            "pageup" | "pgup" | "page_up" => Some(KeyCode::PageUp),
            "pagedown" | "pgdn" | "pgdown" | "page_down" => Some(KeyCode::PageDown),
            "home" => Some(KeyCode::Home),
            "end" => Some(KeyCode::End),
            _ => None,
        }
    }

    /// Parse an action name such as `next_section` or `jump-to-section-3`.
    ///
    /// # Errors
    ///
    /// Returns [`KeybindingError::InvalidAction`] with the closest known name
    /// when the name is not recognized.
    pub fn parse_action(name: &str) -> Result<Action, KeybindingError> {
        name.parse::<Action>()
            .map_err(|_| KeybindingError::InvalidAction {
                name: name.to_string(),
                suggestion: Action::suggest(name),
            })
    }

    /// Add custom bindings on top of the profile.
    ///
    /// Keys are added to the action's existing keys. A key that was bound to
    /// a different action is taken away from it so the custom binding wins.
    ///
    /// # Errors
    ///
    /// Returns an error for the first invalid action name or key spec.
    ///
    /// # Example
    ///
    /// ```
    /// use polaris::tui::keybindings::{KeyBindings, KeybindingProfile};
    /// use std::collections::HashMap;
    ///
    /// let mut custom = HashMap::new();
    /// custom.insert("next_section".to_string(), vec!["Enter".to_string()]);
    ///
    /// let bindings = KeyBindings::from_profile(KeybindingProfile::Standard)
    ///     .with_custom_overrides(&custom)
    ///     .unwrap();
    /// ```
    pub fn with_custom_overrides(
        mut self,
        custom: &HashMap<String, Vec<String>>,
    ) -> Result<Self, KeybindingError> {
        for (action_name, key_specs) in custom {
            let action = Self::parse_action(action_name)?;

            for key_spec in key_specs {
                let key_event = Self::parse_key(key_spec)?;

                for (other_action, other_keys) in &mut self.action_keys {
                    if *other_action != action {
                        other_keys.retain(|k| !Self::key_matches(k, &key_event));
                    }
                }

                self.action_keys.entry(action).or_default().push(key_event);
            }
        }

        Ok(self)
    }

    /// `from_profile` followed by `with_custom_overrides`.
    ///
    /// # Errors
    ///
    /// Returns an error if any custom binding is invalid.
    pub fn from_profile_with_custom(
        profile: KeybindingProfile,
        custom: &HashMap<String, Vec<String>>,
    ) -> Result<Self, KeybindingError> {
        Self::from_profile(profile).with_custom_overrides(custom)
    }

    // =========================================================================
    // Profile Binding Definitions
    // =========================================================================

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn plain(c: char) -> KeyEvent {
        Self::key(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        Self::key(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Keys shared by every profile: digits for sections, help, sign-out,
    /// theme toggle, cancel and quit.
    fn common_bindings() -> HashMap<Action, Vec<KeyEvent>> {
        let mut bindings = HashMap::new();

        for n in 1..=9u8 {
            let digit = char::from(b'0' + n);
            bindings.insert(Action::JumpToSection(n), vec![Self::plain(digit)]);
        }

        bindings.insert(
            Action::ShowHelp,
            vec![Self::plain('?'), Self::key(KeyCode::F(1), KeyModifiers::NONE)],
        );
        bindings.insert(Action::ToggleTheme, vec![Self::plain('t')]);
        bindings.insert(Action::Logout, vec![Self::plain('o')]);
        bindings.insert(
            Action::Cancel,
            vec![Self::key(KeyCode::Esc, KeyModifiers::NONE)],
        );
        bindings.insert(Action::Quit, vec![Self::plain('q'), Self::ctrl('c')]);

        bindings
    }

    /// Universal bindings: vim-style AND arrow keys.
    fn universal_bindings() -> HashMap<Action, Vec<KeyEvent>> {
        let mut bindings = Self::common_bindings();

        bindings.insert(
            Action::ScrollDown,
            vec![
                Self::plain('j'),
                Self::key(KeyCode::Down, KeyModifiers::NONE),
            ],
        );
        bindings.insert(
            Action::ScrollUp,
            vec![Self::plain('k'), Self::key(KeyCode::Up, KeyModifiers::NONE)],
        );
        bindings.insert(
            Action::PageDown,
            vec![
                Self::key(KeyCode::PageDown, KeyModifiers::NONE),
                Self::ctrl('d'),
                Self::plain(' '),
            ],
        );
        bindings.insert(
            Action::PageUp,
            vec![
                Self::key(KeyCode::PageUp, KeyModifiers::NONE),
                Self::ctrl('u'),
            ],
        );
        bindings.insert(
            Action::GoToTop,
            vec![
                Self::plain('g'),
                Self::key(KeyCode::Home, KeyModifiers::NONE),
            ],
        );
        bindings.insert(
            Action::GoToBottom,
            vec![
                Self::plain('G'),
                Self::key(KeyCode::End, KeyModifiers::NONE),
            ],
        );
        bindings.insert(
            Action::NextSection,
            vec![
                Self::plain('l'),
                Self::plain('n'),
                Self::key(KeyCode::Right, KeyModifiers::NONE),
                Self::key(KeyCode::Tab, KeyModifiers::NONE),
            ],
        );
        bindings.insert(
            Action::PreviousSection,
            vec![
                Self::plain('h'),
                Self::plain('N'),
                Self::key(KeyCode::Left, KeyModifiers::NONE),
                Self::key(KeyCode::BackTab, KeyModifiers::SHIFT),
            ],
        );

        bindings
    }

    /// Vim bindings: no arrow or paging keys.
    fn vim_bindings() -> HashMap<Action, Vec<KeyEvent>> {
        let mut bindings = Self::common_bindings();

        bindings.insert(Action::ScrollDown, vec![Self::plain('j'), Self::ctrl('e')]);
        bindings.insert(Action::ScrollUp, vec![Self::plain('k'), Self::ctrl('y')]);
        bindings.insert(Action::PageDown, vec![Self::ctrl('d'), Self::ctrl('f')]);
        bindings.insert(Action::PageUp, vec![Self::ctrl('u'), Self::ctrl('b')]);
        bindings.insert(Action::GoToTop, vec![Self::plain('g')]);
        bindings.insert(Action::GoToBottom, vec![Self::plain('G')]);
        bindings.insert(Action::NextSection, vec![Self::plain('l'), Self::plain('n')]);
        bindings.insert(
            Action::PreviousSection,
            vec![Self::plain('h'), Self::plain('N')],
        );

        bindings
    }

    /// Standard bindings: arrows, paging keys and Tab.
    fn standard_bindings() -> HashMap<Action, Vec<KeyEvent>> {
        let mut bindings = Self::common_bindings();

        bindings.insert(
            Action::ScrollDown,
            vec![Self::key(KeyCode::Down, KeyModifiers::NONE)],
        );
        bindings.insert(
            Action::ScrollUp,
            vec![Self::key(KeyCode::Up, KeyModifiers::NONE)],
        );
        bindings.insert(
            Action::PageDown,
            vec![
                Self::key(KeyCode::PageDown, KeyModifiers::NONE),
                Self::plain(' '),
            ],
        );
        bindings.insert(
            Action::PageUp,
            vec![Self::key(KeyCode::PageUp, KeyModifiers::NONE)],
        );
        bindings.insert(
            Action::GoToTop,
            vec![
                Self::key(KeyCode::Home, KeyModifiers::NONE),
                Self::key(KeyCode::Home, KeyModifiers::CONTROL),
            ],
        );
        bindings.insert(
            Action::GoToBottom,
            vec![
                Self::key(KeyCode::End, KeyModifiers::NONE),
                Self::key(KeyCode::End, KeyModifiers::CONTROL),
            ],
        );
        bindings.insert(
            Action::NextSection,
            vec![
                Self::key(KeyCode::Tab, KeyModifiers::NONE),
                Self::key(KeyCode::Right, KeyModifiers::NONE),
            ],
        );
        bindings.insert(
            Action::PreviousSection,
            vec![
                Self::key(KeyCode::BackTab, KeyModifiers::SHIFT),
                Self::key(KeyCode::Left, KeyModifiers::NONE),
            ],
        );
        if let Some(quit) = bindings.get_mut(&Action::Quit) {
            quit.push(Self::ctrl('q'));
        }

        bindings
    }
}
