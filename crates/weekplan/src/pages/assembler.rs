//! Page construction.
//!
//! Every page runs the full layout pipeline on its own events; no page reads
//! another page's layout.

use chrono::{Days, NaiveDate, TimeDelta};
use log::{debug, info};

use weekplan_core::{event::Event, timeslot::TimeSlotGrid};

use super::{
    graph::DocumentLinkGraph,
    node::{AllDayItem, PageKind, PageLayout, PageNode},
    stats::DailyStats,
};
use crate::{
    cancel::CancellationToken,
    error::{PlannerError, Warning},
    layout::{
        CanvasProfile, ContentSizer, CoordinateRenderer, OverlapResolver, PageGeometry,
        PositionedBox, SizingMode, SizingRules, is_all_day,
    },
};

/// Longest range one document may cover.
pub const MAX_RANGE_DAYS: i64 = 7;

/// Builds weekly and daily pages from a flat event list.
#[derive(Debug, Clone, Copy)]
pub struct PageAssembler<'g> {
    grid: &'g TimeSlotGrid,
    profile: CanvasProfile,
    rules: SizingRules,
}

impl<'g> PageAssembler<'g> {
    pub fn new(grid: &'g TimeSlotGrid, profile: CanvasProfile, rules: SizingRules) -> Self {
        Self {
            grid,
            profile,
            rules,
        }
    }

    /// Validates a range and returns its dates in order.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidRange`] if `end` precedes `start` or the
    /// range spans more than [`MAX_RANGE_DAYS`] dates.
    pub fn range_dates(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>, PlannerError> {
        if end < start {
            return Err(PlannerError::InvalidRange {
                start,
                end,
                reason: "end precedes start",
            });
        }
        if (end - start).num_days() >= MAX_RANGE_DAYS {
            return Err(PlannerError::InvalidRange {
                start,
                end,
                reason: "range covers more than 7 days",
            });
        }
        Ok(std::iter::successors(Some(start), NaiveDate::succ_opt)
            .take_while(|date| *date <= end)
            .collect())
    }

    /// Last date of a full-length range starting at `start`, or the last
    /// representable date when the range would run past it.
    pub fn default_end(start: NaiveDate) -> NaiveDate {
        start
            .checked_add_days(Days::new(MAX_RANGE_DAYS as u64 - 1))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Lays out the daily page for `date`.
    pub fn layout_day(
        &self,
        events: &[Event],
        date: NaiveDate,
        warnings: &mut Vec<Warning>,
    ) -> Result<PageNode, PlannerError> {
        let geometry = PageGeometry::new(self.profile, PageKind::Daily, self.grid.len());
        let page = PageNode::new(PageKind::Daily, date, date, geometry);
        let sizer = ContentSizer::new(self.rules, SizingMode::Detailed);

        let mut layout = PageLayout {
            grid_lines: CoordinateRenderer::new(geometry).grid_lines(self.grid),
            ..PageLayout::default()
        };
        self.lay_out_lane(&page, events, date, 0, sizer, &mut layout, warnings);

        debug!(page = page.id().as_str(), cells = layout.boxes.len(); "Daily page laid out");
        Ok(page.lay_out(layout)?)
    }

    /// Lays out the weekly overview for `start..=end`, one lane per date.
    pub fn layout_week(
        &self,
        events: &[Event],
        start: NaiveDate,
        end: NaiveDate,
        warnings: &mut Vec<Warning>,
    ) -> Result<PageNode, PlannerError> {
        let dates = Self::range_dates(start, end)?;
        let geometry = PageGeometry::new(self.profile, PageKind::Weekly, self.grid.len());
        let page = PageNode::new(PageKind::Weekly, start, end, geometry);
        let sizer = ContentSizer::new(self.rules, SizingMode::Compact);

        let mut layout = PageLayout {
            grid_lines: CoordinateRenderer::new(geometry).grid_lines(self.grid),
            ..PageLayout::default()
        };
        for (lane, date) in dates.into_iter().enumerate() {
            self.lay_out_lane(&page, events, date, lane, sizer, &mut layout, warnings);
        }

        debug!(page = page.id().as_str(), cells = layout.boxes.len(); "Weekly page laid out");
        Ok(page.lay_out(layout)?)
    }

    /// Builds, links and validates the full page set for a range.
    ///
    /// `cancel` is checked before each page and before linking. A cancelled
    /// run returns [`PlannerError::Cancelled`] and discards all pages.
    pub fn assemble(
        &self,
        events: &[Event],
        start: NaiveDate,
        end: NaiveDate,
        cancel: &CancellationToken,
    ) -> Result<(DocumentLinkGraph, Vec<Warning>), PlannerError> {
        let dates = Self::range_dates(start, end)?;
        let mut warnings = Vec::new();

        check_cancel(cancel)?;
        let weekly = self.layout_week(events, start, end, &mut warnings)?;

        let mut dailies = Vec::with_capacity(dates.len());
        for date in dates {
            check_cancel(cancel)?;
            dailies.push(self.layout_day(events, date, &mut warnings)?);
        }

        check_cancel(cancel)?;
        let (graph, link_warnings) = DocumentLinkGraph::new(weekly, dailies)?.link()?;
        graph.validate()?;
        warnings.extend(link_warnings);

        info!(pages = graph.len(), warnings = warnings.len(); "Pages assembled");
        Ok((graph, warnings))
    }

    #[allow(clippy::too_many_arguments)]
    fn lay_out_lane(
        &self,
        page: &PageNode,
        events: &[Event],
        date: NaiveDate,
        lane: usize,
        sizer: ContentSizer,
        layout: &mut PageLayout,
        warnings: &mut Vec<Warning>,
    ) {
        let day_events: Vec<&Event> = events.iter().filter(|e| e.date() == date).collect();
        let (all_day, timed): (Vec<&Event>, Vec<&Event>) =
            day_events.into_iter().partition(|e| is_all_day(e));

        layout.all_day.extend(all_day.iter().map(|event| AllDayItem {
            event_id: event.id().clone(),
            title: event.title().to_string(),
            source: event.source(),
            lane,
        }));

        let renderer = CoordinateRenderer::new(*page.geometry());
        let placed = OverlapResolver::new(self.grid)
            .resolve_events(&timed, date, |event, span| sizer.footprint(event, span));
        layout.stats.push(DailyStats::compute(date, &placed, self.grid));

        for (event, mut cell) in placed {
            cell.set_lane(lane);

            let size = sizer.size(event, cell.span(), cell.column_count());
            let positioned = renderer.place(&cell, &size);
            report(page, event, &positioned, warnings);

            layout.boxes.push(positioned);
            layout.drawn.push(event.clone());
        }
    }
}

fn report(page: &PageNode, event: &Event, placed: &PositionedBox, warnings: &mut Vec<Warning>) {
    let flags = placed.cell().flags();
    if flags.degenerate {
        let reason = if flags.invalid {
            format!("ends {} before it starts", humanize(event.start() - event.end()))
        } else {
            "missing or zero-length end".to_string()
        };
        push_unique(
            warnings,
            Warning::MalformedEvent {
                event: event.id().clone(),
                reason,
            },
        );
    }

    let truncated = placed.size().truncated_lines();
    if truncated > 0 {
        push_unique(
            warnings,
            Warning::ContentTruncated {
                event: event.id().clone(),
                lines: truncated,
            },
        );
    }

    if placed.overflow() {
        warnings.push(Warning::CanvasOverflow {
            page: page.id().to_string(),
            event: event.id().clone(),
        });
    }
}

fn humanize(delta: TimeDelta) -> String {
    let minutes = delta.num_minutes();
    if minutes >= 60 && minutes % 60 == 0 {
        format!("{}h", minutes / 60)
    } else {
        format!("{minutes}m")
    }
}

fn push_unique(warnings: &mut Vec<Warning>, warning: Warning) {
    if !warnings.contains(&warning) {
        warnings.push(warning);
    }
}

fn check_cancel(cancel: &CancellationToken) -> Result<(), PlannerError> {
    if cancel.is_cancelled() {
        info!("Export cancelled");
        return Err(PlannerError::Cancelled);
    }
    Ok(())
}
