//! Polaris - terminal viewer for the Polaris design report
//!
//! A sign-in gate in front of a long, sectioned report. The gate resolves
//! credentials after a simulated delay; the report view highlights the
//! section being read with a scroll spy and supports jumping between
//! sections.
//!
//! - [`gate`]: session state machine and credential verification
//! - [`nav`]: scroll-spy section tracking
//! - [`report`]: report content and line layout
//! - [`tui`]: the interactive viewer
//! - [`output`]: HTML and JSON export

use std::fs;
use std::io::{self, Write};

use anyhow::Context;
use yansi::Paint;

pub mod cli;
pub mod config;
pub mod error;
pub mod gate;
pub mod logging;
pub mod nav;
pub mod output;
pub mod report;
pub mod signal;
pub mod tui;

use cli::{Cli, Commands, ExportArgs};
use config::Config;
use error::ExitCode;
use output::OutputError;
use report::Report;
use tui::{run_tui, App, TuiError};

/// Run the command described by `cli`.
///
/// # Errors
///
/// Returns an error for failures that should exit with code 1. Rejected
/// export credentials and Ctrl+C are reported through the returned
/// [`ExitCode`] instead.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        yansi::disable();
    }

    let mut config = Config::load(cli.config.as_deref());
    config.merge_cli(&cli);
    log::debug!(
        "Theme {:?}, keybindings {}, login delay {}ms",
        config.theme,
        config.keybinding_profile,
        config.login_delay_ms
    );

    match &cli.command {
        None | Some(Commands::View) => run_viewer(&config),
        Some(Commands::Export(args)) => run_export(&config, args),
    }
}

fn run_viewer(config: &Config) -> anyhow::Result<ExitCode> {
    let handler = signal::install_handler().context("failed to set up Ctrl+C handling")?;
    let mut app = App::from_config(config).context("invalid keybinding configuration")?;

    match run_tui(&mut app, Some(handler.get_flag())) {
        Ok(()) => Ok(ExitCode::Success),
        Err(TuiError::Interrupted) => {
            eprintln!("{}", "Interrupted".yellow());
            Ok(ExitCode::Interrupted)
        }
        Err(e) => Err(e).context("viewer failed"),
    }
}

fn run_export(config: &Config, args: &ExportArgs) -> anyhow::Result<ExitCode> {
    let report = Report::polaris();
    let mut buffer = Vec::new();

    match output::export_report(
        &report,
        args.format,
        &config.credential,
        (args.identifier.as_str(), args.verifier.as_str()),
        &mut buffer,
    ) {
        Ok(()) => {}
        Err(OutputError::Denied(e)) => {
            eprintln!("{} {}", "Access denied:".red().bold(), e);
            return Ok(ExitCode::AccessDenied);
        }
        Err(e) => return Err(e).context("export failed"),
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &buffer)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("Wrote {} export to {}", args.format, path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(&buffer)
                .and_then(|()| stdout.flush())
                .context("failed to write to stdout")?;
        }
    }
    Ok(ExitCode::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_export_denied_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.html");
        let cli = Cli::try_parse_from([
            "polaris",
            "-q",
            "export",
            "--identifier",
            "digital-era",
            "--verifier",
            "nope",
            "--output",
            out.to_str().unwrap(),
        ])
        .unwrap();
        let Some(Commands::Export(args)) = &cli.command else {
            panic!("expected export");
        };

        let code = run_export(&Config::default(), args).unwrap();
        assert_eq!(code, ExitCode::AccessDenied);
        assert!(!out.exists());
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("report.json");
        let cli = Cli::try_parse_from([
            "polaris",
            "export",
            "--format",
            "json",
            "--identifier",
            "digital-era",
            "--verifier",
            "digital_era@sina.com",
            "--output",
            out.to_str().unwrap(),
        ])
        .unwrap();
        let Some(Commands::Export(args)) = &cli.command else {
            panic!("expected export");
        };

        let code = run_export(&Config::default(), args).unwrap();
        assert_eq!(code, ExitCode::Success);
        let written = fs::read_to_string(&out).unwrap();
        assert!(written.contains("PROJECT POLARIS"));
    }
}
