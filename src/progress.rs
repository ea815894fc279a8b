//! Progress reporting for the wall builder
//!
//! Provides a spinner that follows the simulated days, plus the header and
//! summary printed around a build.

use crate::builder::{BuildResult, DayObserver, DayStats};
use crate::config::{BuildConfig, Strategy};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter that displays build status
pub struct ProgressReporter {
    /// Progress bar
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("Invalid progress template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Update the progress display after a day of work
    pub fn update(&self, stats: &DayStats) {
        let msg = format!(
            "Day: {} | Sections raised: {} | Finished: {}",
            format_number(u64::from(stats.day)),
            format_number(stats.sections_raised as u64),
            format_number(stats.sections_completed as u64),
        );

        self.bar.set_message(msg);
    }

    /// Set a status message
    pub fn set_status(&self, status: &str) {
        self.bar.set_message(status.to_string());
    }

    /// Finish the progress display with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl DayObserver for ProgressReporter {
    fn day_finished(&self, stats: &DayStats) {
        self.update(stats);
    }
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

fn strategy_label(strategy: Strategy) -> String {
    match strategy {
        Strategy::Sequential => "sequential (every section, every day)".to_string(),
        Strategy::Parallel { workers } => format!("parallel ({} workers)", workers),
    }
}

/// Print a header at the start of the build
pub fn print_header(config: &BuildConfig, profiles: usize, sections: usize) {
    println!();
    println!(
        "{} {}",
        style("wall-builder").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {}",
        style("Profiles:").bold(),
        config.profiles_path.display()
    );
    println!(
        "  {} {} profiles, {} sections",
        style("Wall:").bold(),
        format_number(profiles as u64),
        format_number(sections as u64)
    );
    println!("  {} {} feet", style("Height:").bold(), config.wall_height);
    println!(
        "  {} {}",
        style("Strategy:").bold(),
        strategy_label(config.strategy)
    );
    println!();
}

/// Print a summary of the build results
pub fn print_summary(result: &BuildResult) {
    let ledger = &result.ledger;
    let feet = ledger.total_feet();

    println!();
    println!("{}", style("Wall Complete").green().bold());
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {}",
        style("Started:").bold(),
        result.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!(
        "  {} {}",
        style("Days:").bold(),
        format_number(u64::from(result.days))
    );
    println!("  {} {}", style("Feet built:").bold(), format_number(feet));
    println!(
        "  {} {}",
        style("Ice used:").bold(),
        format_number(ledger.costs().volume(feet))
    );
    println!(
        "  {} {}",
        style("Total cost:").bold(),
        format_number(ledger.total_cost())
    );
    if let Some(busiest) = result.timeline.iter().max_by_key(|d| d.sections_raised) {
        println!(
            "  {} day {} ({} sections)",
            style("Busiest:").bold(),
            busiest.day,
            busiest.sections_raised
        );
    }
    println!(
        "  {} {:.3}s",
        style("Duration:").bold(),
        result.duration.as_secs_f64()
    );
    println!();
}
