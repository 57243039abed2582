//! Command-line argument definitions for the Weekplan CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the feed and output paths, the date
//! range, the canvas profile, configuration file selection, and logging
//! verbosity.

use chrono::NaiveDate;
use clap::Parser;

use weekplan::layout::CanvasProfile;

/// Command-line arguments for the Weekplan export tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the JSON event feed
    #[arg(help = "Path to the input feed")]
    pub input: String,

    /// Path to the output HTML file, `weekly_planner_<start>.html` if omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Directory to additionally write one SVG file per page into
    #[arg(long)]
    pub svg_dir: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Canvas profile (print, screen), overriding the configuration
    #[arg(short, long)]
    pub profile: Option<CanvasProfile>,

    /// First day of the range, defaults to the feed's week start
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last day of the range, defaults to the feed's week end
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Arguments for exporting `input` with every other option left unset.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            output: None,
            svg_dir: None,
            config: None,
            profile: None,
            start: None,
            end: None,
            log_level: "info".to_string(),
        }
    }
}
