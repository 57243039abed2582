//! Weekplan - temporal layout and multi-page export for weekly planners.
//!
//! Calendar events are placed on a fixed half-hour grid, overlapping events
//! are split into side-by-side columns, boxes grow to fit their notes and
//! action items, and the result is exported as one weekly overview page plus
//! one page per day, cross-linked for navigation.

pub mod config;
pub mod export;
pub mod feed;
pub mod layout;
pub mod pages;

mod cancel;
mod error;

pub use weekplan_core::{color, draw, event, geometry, style, timeslot};

pub use cancel::CancellationToken;
pub use error::{PlannerError, Warning};

use chrono::NaiveDate;
use log::{debug, info, warn};

use config::AppConfig;
use event::Event;
use export::{Document, DocumentExporter};
use feed::{Feed, FeedParser};
use layout::CanvasProfile;
use pages::{PageAssembler, PageNode};
use timeslot::TimeSlotGrid;

/// Builder for laying out and exporting planner documents.
///
/// # Examples
///
/// ```rust,no_run
/// use chrono::NaiveDate;
/// use weekplan::{PlannerBuilder, config::AppConfig, layout::CanvasProfile};
///
/// let source = std::fs::read_to_string("week.json").expect("Failed to read feed");
/// let builder = PlannerBuilder::new(AppConfig::default());
///
/// let feed = builder.parse_feed(&source).expect("Failed to parse feed");
/// let start = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 7, 20).unwrap();
///
/// let document = builder
///     .export(feed.events(), start, end, CanvasProfile::Print)
///     .expect("Failed to export");
/// println!("{}", document.to_html());
/// ```
#[derive(Debug, Default)]
pub struct PlannerBuilder {
    config: AppConfig,
}

impl PlannerBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parses a JSON event feed, converting timestamps into the configured
    /// zone if one is set.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Feed`] for unreadable JSON and
    /// [`PlannerError::Config`] for an unknown configured zone.
    pub fn parse_feed(&self, source: &str) -> Result<Feed, PlannerError> {
        let zone = self.config.feed().zone().map_err(PlannerError::Config)?;
        let parser = match zone {
            Some(zone) => FeedParser::new().with_zone(zone),
            None => FeedParser::new(),
        };
        parser.parse(source)
    }

    /// Lays out the daily page for `date`.
    ///
    /// Events dated elsewhere are ignored. The page is returned laid out but
    /// not linked.
    pub fn layout_day(&self, events: &[Event], date: NaiveDate) -> Result<PageNode, PlannerError> {
        let grid = self.grid()?;
        let mut warnings = Vec::new();
        let page = self
            .assembler(&grid, self.config.layout().profile())
            .layout_day(events, date, &mut warnings)?;
        log_warnings(&warnings);
        Ok(page)
    }

    /// Lays out the weekly overview for `range_start..=range_end`.
    pub fn layout_week(
        &self,
        events: &[Event],
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> Result<PageNode, PlannerError> {
        let grid = self.grid()?;
        let mut warnings = Vec::new();
        let page = self
            .assembler(&grid, self.config.layout().profile())
            .layout_week(events, range_start, range_end, &mut warnings)?;
        log_warnings(&warnings);
        Ok(page)
    }

    /// Lays out, links and serializes every page of the range.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::NoEvents`] for an empty event list,
    /// [`PlannerError::NoValidEvents`] when every event ends before it
    /// starts, and [`PlannerError::InvalidRange`] for a reversed or over-long
    /// range.
    pub fn export(
        &self,
        events: &[Event],
        range_start: NaiveDate,
        range_end: NaiveDate,
        profile: CanvasProfile,
    ) -> Result<Document, PlannerError> {
        self.export_with_cancel(events, range_start, range_end, profile, &CancellationToken::new())
    }

    /// [`PlannerBuilder::export`] that stops early, returning
    /// [`PlannerError::Cancelled`], once `cancel` is triggered.
    pub fn export_with_cancel(
        &self,
        events: &[Event],
        range_start: NaiveDate,
        range_end: NaiveDate,
        profile: CanvasProfile,
        cancel: &CancellationToken,
    ) -> Result<Document, PlannerError> {
        info!(
            events = events.len(),
            start:% = range_start,
            end:% = range_end,
            profile:% = profile;
            "Exporting planner document"
        );

        if events.is_empty() {
            return Err(PlannerError::NoEvents);
        }
        if events.iter().all(Event::is_inverted) {
            return Err(PlannerError::NoValidEvents(events.len()));
        }

        let grid = self.grid()?;
        let styles = self.config.style().style_table().map_err(PlannerError::Config)?;

        let (graph, warnings) =
            self.assembler(&grid, profile)
                .assemble(events, range_start, range_end, cancel)?;
        debug!(pages = graph.len(); "Link graph validated");

        log_warnings(&warnings);
        let document = DocumentExporter::new(styles).export(graph, profile, warnings, cancel)?;

        info!(pages = document.page_count(), warnings = document.warnings().len(); "Document exported");
        Ok(document)
    }

    fn grid(&self) -> Result<TimeSlotGrid, PlannerError> {
        self.config.layout().grid().map_err(PlannerError::Config)
    }

    fn assembler<'g>(&self, grid: &'g TimeSlotGrid, profile: CanvasProfile) -> PageAssembler<'g> {
        PageAssembler::new(grid, profile, self.config.layout().sizing_rules())
    }
}

fn log_warnings(warnings: &[Warning]) {
    for warning in warnings {
        warn!(warning:% = warning; "Layout warning");
    }
}
