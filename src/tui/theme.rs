//! Viewer color palettes.
//!
//! Dark and light palettes plus automatic detection from the terminal
//! environment. Chart bars carry their own `#rrggbb` colors, converted with
//! [`Theme::chart_color`].

use std::str::FromStr;

use ratatui::style::Color;

use crate::cli::ThemeArg;

/// Colors used by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Borders, headings, the active nav tab.
    pub accent: Color,
    /// Badges and highlighted values.
    pub highlight: Color,
    /// Errors and the classification banner.
    pub danger: Color,
    /// Success and the checker module.
    pub success: Color,
    /// Secondary text.
    pub muted: Color,
    /// Body text.
    pub text: Color,
    /// Text on a colored background.
    pub inverted_fg: Color,
}

impl Theme {
    /// High-contrast dark palette (default).
    pub fn dark() -> Self {
        Self {
            accent: Color::Cyan,
            highlight: Color::Yellow,
            danger: Color::Red,
            success: Color::Green,
            muted: Color::DarkGray,
            text: Color::White,
            inverted_fg: Color::Black,
        }
    }

    /// High-contrast light palette.
    pub fn light() -> Self {
        Self {
            accent: Color::Blue,
            highlight: Color::Magenta,
            danger: Color::Red,
            success: Color::Green,
            muted: Color::Gray,
            text: Color::Black,
            inverted_fg: Color::White,
        }
    }

    /// Detect the terminal background, falling back to dark.
    pub fn auto() -> Self {
        if is_light_terminal() {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Palette for a CLI/config theme choice.
    pub fn from_arg(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Auto => Self::auto(),
            ThemeArg::Dark => Self::dark(),
            ThemeArg::Light => Self::light(),
        }
    }

    /// Check if this is the light palette.
    pub fn is_light(&self) -> bool {
        self.text == Color::Black
    }

    /// The other palette.
    pub fn toggled(&self) -> Self {
        if self.is_light() {
            Self::dark()
        } else {
            Self::light()
        }
    }

    /// Convert a chart color such as `#3b82f6`, falling back to the accent.
    pub fn chart_color(&self, hex: &str) -> Color {
        Color::from_str(hex).unwrap_or(self.accent)
    }
}

/// `COLORFGBG` is "fg;bg" on rxvt, xterm and konsole; 7 and 15 are light
/// backgrounds, 8 is dark gray.
fn is_light_terminal() -> bool {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|v| v.rsplit(';').next().and_then(|bg| bg.parse::<u32>().ok()))
        .is_some_and(|bg| bg >= 7 && bg != 8)
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_arg() {
        assert_eq!(Theme::from_arg(ThemeArg::Dark), Theme::dark());
        assert_eq!(Theme::from_arg(ThemeArg::Light), Theme::light());
    }

    #[test]
    fn test_toggle() {
        assert!(Theme::dark().toggled().is_light());
        assert!(!Theme::light().toggled().is_light());
    }

    #[test]
    fn test_chart_color() {
        let theme = Theme::dark();
        assert_eq!(theme.chart_color("#ff0000"), Color::Rgb(255, 0, 0));
        assert_eq!(theme.chart_color("not-a-color"), theme.accent);
    }
}
