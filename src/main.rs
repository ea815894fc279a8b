//! wall-builder - Day-by-Day Wall Construction Simulator
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wall_builder::builder::{build_history_observed, DayObserver};
use wall_builder::config::{BuildConfig, CliArgs};
use wall_builder::input::read_profiles;
use wall_builder::progress::{print_header, print_summary, ProgressReporter};
use wall_builder::report::answer;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    let config = BuildConfig::from_args(&args).context("Invalid configuration")?;

    setup_logging(config.verbose)?;

    let profiles = read_profiles(&config.profiles_path).context("Failed to load wall profiles")?;

    // Queries print JSON only, so keep stdout clean for them
    let interactive = config.show_progress && args.command.is_none();

    if interactive {
        print_header(&config, profiles.len(), profiles.section_count());
    }

    let progress = interactive.then(ProgressReporter::new);
    if let Some(ref p) = progress {
        p.set_status("Building the wall...");
    }

    let observer: &dyn DayObserver = match progress {
        Some(ref p) => p,
        None => &(),
    };
    let result = build_history_observed(&config, &profiles, observer).context("Build failed")?;

    if let Some(ref p) = progress {
        p.finish("Wall built");
    }

    match args.command {
        Some(ref query) => {
            let response = answer(&result.ledger, query);
            println!("{}", response.to_json().context("Failed to encode response")?);
        }
        None => {
            if interactive {
                print_summary(&result);
            } else {
                info!(
                    days = result.days,
                    cost = result.ledger.total_cost(),
                    "Build finished"
                );
            }
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("wall_builder=debug,warn")
    } else {
        EnvFilter::new("wall_builder=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
