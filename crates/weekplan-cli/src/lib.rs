//! Weekplan CLI library
//!
//! This module contains the core CLI logic for the Weekplan export tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use log::{info, warn};

use weekplan::{PlannerBuilder, PlannerError, export::Document, feed::Feed, pages::PageAssembler};

/// Run the Weekplan CLI application
///
/// Reads the feed, lays out and links every page of the range, and writes
/// the paginated HTML document (plus per-page SVG files when asked).
/// Returns the path of the written HTML file.
///
/// # Errors
///
/// Returns `PlannerError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Unreadable feeds
/// - Empty feeds and invalid date ranges
/// - Rendering errors
pub fn run(args: &Args) -> Result<PathBuf, PlannerError> {
    info!(input_path = args.input; "Processing event feed");

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(profile) = args.profile {
        app_config.set_profile(profile);
    }
    let profile = app_config.layout().profile();

    let source = fs::read_to_string(&args.input)?;

    let builder = PlannerBuilder::new(app_config);
    let feed = builder.parse_feed(&source)?;
    for warning in feed.warnings() {
        warn!(warning:% = warning; "Feed warning");
    }

    let (start, end) = resolve_range(args, &feed)?;
    let document = builder.export(feed.events(), start, end, profile)?;

    let output = args
        .output
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(Document::default_file_name(start)));
    document.write_html(&output)?;

    if let Some(dir) = &args.svg_dir {
        document.write_svg_pages(Path::new(dir))?;
    }

    info!(
        output_file = output.display().to_string(),
        pages = document.page_count(),
        warnings = document.warnings().len() + feed.warnings().len();
        "Planner exported successfully"
    );

    Ok(output)
}

/// Range given on the command line, falling back to the feed's week bounds.
///
/// A start date that differs from the feed's own runs for a full week.
fn resolve_range(args: &Args, feed: &Feed) -> Result<(NaiveDate, NaiveDate), PlannerError> {
    let feed_range = feed.range();
    let start = args
        .start
        .or(feed_range.map(|(start, _)| start))
        .ok_or(PlannerError::NoEvents)?;
    let end = args
        .end
        .or_else(|| feed_range.filter(|(s, _)| *s == start).map(|(_, end)| end))
        .unwrap_or_else(|| PageAssembler::default_end(start));
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use weekplan::feed::parse_feed;

    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    const FEED: &str = r#"{
        "weekStart": "2025-07-14",
        "weekEnd": "2025-07-18",
        "events": [{"id": "a", "title": "Intake", "startTime": "2025-07-14T09:00:00"}]
    }"#;

    #[test]
    fn test_range_from_feed() {
        let feed = parse_feed(FEED).unwrap();
        let args = Args::new("week.json");
        assert_eq!(resolve_range(&args, &feed).unwrap(), (date(14), date(18)));
    }

    #[test]
    fn test_range_overrides() {
        let feed = parse_feed(FEED).unwrap();

        let mut args = Args::new("week.json");
        args.end = Some(date(16));
        assert_eq!(resolve_range(&args, &feed).unwrap(), (date(14), date(16)));

        let mut args = Args::new("week.json");
        args.start = Some(date(21));
        assert_eq!(resolve_range(&args, &feed).unwrap(), (date(21), date(27)));
    }

    #[test]
    fn test_start_near_end_of_calendar() {
        let feed = parse_feed(FEED).unwrap();
        let mut args = Args::new("week.json");
        args.start = Some(NaiveDate::MAX);
        assert_eq!(
            resolve_range(&args, &feed).unwrap(),
            (NaiveDate::MAX, NaiveDate::MAX)
        );
    }

    #[test]
    fn test_empty_feed_without_dates_fails() {
        let feed = parse_feed(r#"{"events": []}"#).unwrap();
        let args = Args::new("week.json");
        assert!(matches!(resolve_range(&args, &feed), Err(PlannerError::NoEvents)));
    }
}
