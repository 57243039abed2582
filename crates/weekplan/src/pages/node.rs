//! Renderable pages and their lifecycle.

use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

use weekplan_core::event::{Event, EventId, SourceTag};

use super::stats::DailyStats;
use crate::layout::{GridLines, LayoutCell, PageGeometry, PositionedBox};

/// Whether a page shows the whole week or a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Weekly,
    Daily,
}

/// Stable page identifier, also used as the HTML anchor.
///
/// Weekly pages are `week-YYYY-MM-DD` keyed by the first date of the range;
/// daily pages are `day-YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageId(String);

impl PageId {
    pub fn weekly(start: NaiveDate) -> Self {
        Self(format!("week-{}", start.format("%Y-%m-%d")))
    }

    pub fn daily(date: NaiveDate) -> Self {
        Self(format!("day-{}", date.format("%Y-%m-%d")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle of a page. Each export walks every page through all four
/// states in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PageState {
    Constructing,
    LaidOut,
    Linked,
    Serialized,
}

impl PageState {
    fn next(self) -> Option<Self> {
        match self {
            Self::Constructing => Some(Self::LaidOut),
            Self::LaidOut => Some(Self::Linked),
            Self::Linked => Some(Self::Serialized),
            Self::Serialized => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("page `{page}` cannot move from {from:?} to {to:?}")]
pub struct PageStateError {
    page: String,
    from: PageState,
    to: PageState,
}

/// The kind of a cross-page navigation link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    PreviousDay,
    NextDay,
    BackToWeek,
    /// From a weekly day header to that day's page.
    DayCell,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PreviousDay => "previous day",
            Self::NextDay => "next day",
            Self::BackToWeek => "weekly overview",
            Self::DayCell => "day",
        };
        f.write_str(name)
    }
}

/// A resolved outbound link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    kind: LinkKind,
    target: PageId,
    date: NaiveDate,
}

impl PageLink {
    pub fn new(kind: LinkKind, target: PageId, date: NaiveDate) -> Self {
        Self { kind, target, date }
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }

    pub fn target(&self) -> &PageId {
        &self.target
    }

    /// The date the link leads to.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Button label.
    pub fn label(&self) -> String {
        match self.kind {
            LinkKind::PreviousDay => format!("← {}", self.date.format("%a %-m/%-d")),
            LinkKind::NextDay => format!("{} →", self.date.format("%a %-m/%-d")),
            LinkKind::BackToWeek => "Weekly Overview".to_string(),
            LinkKind::DayCell => self.date.format("%a %-m/%-d").to_string(),
        }
    }
}

/// An event drawn in a page's all-day strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllDayItem {
    pub event_id: EventId,
    pub title: String,
    pub source: SourceTag,
    pub lane: usize,
}

/// Everything produced by laying out one page.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    pub(crate) boxes: Vec<PositionedBox>,
    pub(crate) all_day: Vec<AllDayItem>,
    /// Source event of each entry in `boxes`, at the same index.
    pub(crate) drawn: Vec<Event>,
    pub(crate) grid_lines: GridLines,
    pub(crate) stats: Vec<DailyStats>,
}

/// One laid-out, linkable page.
#[derive(Debug, Clone)]
pub struct PageNode {
    id: PageId,
    kind: PageKind,
    start: NaiveDate,
    end: NaiveDate,
    geometry: PageGeometry,
    state: PageState,
    layout: PageLayout,
    links: Vec<PageLink>,
}

impl PageNode {
    pub(crate) fn new(kind: PageKind, start: NaiveDate, end: NaiveDate, geometry: PageGeometry) -> Self {
        let id = match kind {
            PageKind::Weekly => PageId::weekly(start),
            PageKind::Daily => PageId::daily(start),
        };
        Self {
            id,
            kind,
            start,
            end,
            geometry,
            state: PageState::Constructing,
            layout: PageLayout::default(),
            links: Vec::new(),
        }
    }

    fn advance(&mut self, to: PageState) -> Result<(), PageStateError> {
        if self.state.next() != Some(to) {
            return Err(PageStateError {
                page: self.id.to_string(),
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }

    pub(crate) fn lay_out(mut self, layout: PageLayout) -> Result<Self, PageStateError> {
        self.advance(PageState::LaidOut)?;
        self.layout = layout;
        Ok(self)
    }

    pub(crate) fn link(mut self, links: Vec<PageLink>) -> Result<Self, PageStateError> {
        self.advance(PageState::Linked)?;
        self.links = links;
        Ok(self)
    }

    pub(crate) fn mark_serialized(&mut self) -> Result<(), PageStateError> {
        self.advance(PageState::Serialized)
    }

    pub fn id(&self) -> &PageId {
        &self.id
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    /// First date covered; the page's own date for daily pages.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last date covered; equal to `start` for daily pages.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Every date covered by the page, in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        std::iter::successors(Some(self.start), NaiveDate::succ_opt).take_while(move |date| *date <= end)
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn cells(&self) -> impl Iterator<Item = &LayoutCell> {
        self.layout.boxes.iter().map(PositionedBox::cell)
    }

    pub fn cell_count(&self) -> usize {
        self.layout.boxes.len()
    }

    pub fn boxes(&self) -> &[PositionedBox] {
        &self.layout.boxes
    }

    pub fn all_day(&self) -> &[AllDayItem] {
        &self.layout.all_day
    }

    /// Each positioned box with the event it was laid out from.
    pub fn placed(&self) -> impl Iterator<Item = (&PositionedBox, &Event)> {
        self.layout.boxes.iter().zip(&self.layout.drawn)
    }

    /// Sources of every event on the page, all-day events first.
    pub fn sources(&self) -> impl Iterator<Item = SourceTag> {
        self.layout
            .all_day
            .iter()
            .map(|item| item.source)
            .chain(self.layout.drawn.iter().map(Event::source))
    }

    pub fn grid_lines(&self) -> &GridLines {
        &self.layout.grid_lines
    }

    /// Per-day statistics; one entry on daily pages, one per date on the
    /// weekly page.
    pub fn stats(&self) -> &[DailyStats] {
        &self.layout.stats
    }

    pub fn links(&self) -> &[PageLink] {
        &self.links
    }

    pub fn link_of(&self, kind: LinkKind) -> Option<&PageLink> {
        self.links.iter().find(|link| link.kind == kind)
    }
}
