//! Command-line interface definitions for Polaris.
//!
//! Global options (verbosity, color, config, theme) apply to every
//! subcommand. Running without a subcommand opens the interactive viewer.
//!
//! # Example
//!
//! ```bash
//! # Open the viewer (default)
//! polaris
//!
//! # Vim-only keys and the light theme
//! polaris --keybinding-profile vim --theme light view
//!
//! # Export the report as HTML
//! POLARIS_EXPORT_IDENTIFIER=digital-era POLARIS_EXPORT_VERIFIER=... \
//!     polaris export --format html --output report.html
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::tui::keybindings::KeybindingProfile;

/// Terminal viewer for the Polaris immersive-mode design report.
#[derive(Debug, Parser)]
#[command(name = "polaris")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Color theme for the viewer
    #[arg(long, value_enum, global = true)]
    pub theme: Option<ThemeArg>,

    /// Keybinding profile for the viewer
    #[arg(long, value_enum, global = true)]
    pub keybinding_profile: Option<KeybindingProfile>,

    /// Use ASCII borders and plain markers for screen readers
    #[arg(long, global = true)]
    pub accessible: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute (defaults to `view`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Open the interactive report viewer
    View,
    /// Write the report to a file or stdout
    Export(ExportArgs),
}

/// Arguments for the export subcommand.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Export format
    #[arg(short, long, value_enum, default_value = "html")]
    pub format: ExportFormat,

    /// Destination file (stdout if omitted)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Identifier to authenticate the export with
    #[arg(long, env = "POLARIS_EXPORT_IDENTIFIER", default_value = "")]
    pub identifier: String,

    /// Verifier to authenticate the export with
    #[arg(long, env = "POLARIS_EXPORT_VERIFIER", default_value = "", hide_env_values = true)]
    pub verifier: String,
}

/// Export format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Self-contained HTML document
    Html,
    /// JSON document of the report content
    Json,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Html => write!(f, "html"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// Theme selection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ThemeArg {
    /// Detect from the terminal environment
    #[default]
    Auto,
    /// High-contrast dark palette
    Dark,
    /// High-contrast light palette
    Light,
}
