//! `cleanup` -- keeps a minimum amount of free space on a recording disk.
//!
//! Deletes the oldest files below the given directories until enough space
//! is available. See `cleanup --help` for usage.
//!
//! # Environment variables
//!
//! | Variable                   | Required | Default            | Description                         |
//! |----------------------------|----------|--------------------|-------------------------------------|
//! | `SPACEKEEPER_MIN_AVAIL_MB` | no       | `51200`            | Default for `-s MIN_AVAIL_SPACE`    |
//! | `SPACEKEEPER_DEFAULT_DIR`  | no       | `/media/hdd/movie` | Directory used when none is given   |
//! | `RUST_LOG`                 | no       | `info`             | Log filter                          |

use std::process::ExitCode;

use clap::Parser;
use spacekeeper_cli::app;
use spacekeeper_cli::cli::{parse_error_exit_code, Cli};
use spacekeeper_cli::config::{RunConfig, Settings};

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = parse_error_exit_code(&e);
            // Help and version text go to stdout, parse errors to stderr.
            let _ = e.print();
            if code != 0 {
                eprintln!("Run `cleanup --help` for help.");
            }
            return ExitCode::from(code);
        }
    };

    // Keep stdout clean for the report when `--json` is given.
    let writer = if cli.json {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        BoxMakeWriter::new(std::io::stdout)
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spacekeeper_core=info,spacekeeper_cli=info,cleanup=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(writer),
        )
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            eprintln!("Run `cleanup --help` for help.");
            return ExitCode::from(1);
        }
    };

    let run = RunConfig::resolve(cli, settings);

    tracing::info!(
        threshold_mb = run.reclaim.threshold_mb,
        directories = ?run.directories,
        dry_run = run.reclaim.dry_run,
        "Starting cleanup",
    );

    match app::execute(&run) {
        Ok(report) => {
            if run.json {
                match app::report_json(&report) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to print report");
                        return ExitCode::from(1);
                    }
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if !app::already_reported(&e) {
                tracing::error!(error = %format!("{e:#}"), "Cleanup failed");
            }
            ExitCode::from(1)
        }
    }
}
