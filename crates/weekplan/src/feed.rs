//! Event feed normalization.
//!
//! The sync collaborator hands over a JSON document of the shape
//!
//! ```json
//! {
//!   "weekStart": "2025-07-14T00:00:00Z",
//!   "weekEnd": "2025-07-20T23:59:59Z",
//!   "events": [
//!     { "id": "a1", "title": "Intake", "startTime": "2025-07-14T09:00:00",
//!       "endTime": "2025-07-14T10:00:00", "source": "SimplePractice",
//!       "eventNotes": ["Bring forms"], "actionItems": "Send invoice" }
//!   ]
//! }
//! ```
//!
//! Record fields come under more than one name (`eventNotes` or `notes`,
//! `actionItems` or `actions`, `startTime` or `start`, `endTime` or `end`) and
//! notes may be a list or a newline-separated string. Everything is mapped onto
//! [`Event`] here so nothing downstream sees the raw shape.
//!
//! A record that cannot be read is skipped with
//! [`Warning::SkippedFeedRecord`]; only malformed JSON fails the whole feed.
//! A record whose id repeats an earlier one is kept under a suffixed id and
//! reported with [`Warning::DuplicateEventId`].

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;
use log::{debug, info, warn};
use serde::Deserialize;
use thiserror::Error;

use weekplan_core::event::{Event, EventId, EventStatus, SourceTag};

use crate::{
    error::{PlannerError, Warning},
    pages::PageAssembler,
};

/// Feed-level parse failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedError {
    #[error("malformed event feed: {message}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("feed field `{field}` is not a timestamp: `{value}`")]
    Timestamp { field: &'static str, value: String },
}

impl FeedError {
    fn syntax(err: &serde_json::Error) -> Self {
        Self::Syntax {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }

    /// Byte offset of the error within `src`, if it has a position.
    pub fn offset_in(&self, src: &str) -> Option<usize> {
        let Self::Syntax { line, column, .. } = self else {
            return None;
        };
        let line_start: usize = src
            .split_inclusive('\n')
            .take(line.saturating_sub(1))
            .map(str::len)
            .sum();
        Some((line_start + column.saturating_sub(1)).min(src.len()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFeed {
    week_start: Option<String>,
    week_end: Option<String>,
    #[serde(default)]
    events: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLines {
    Text(String),
    Lines(Vec<String>),
}

impl RawLines {
    fn into_lines(self) -> Vec<String> {
        match self {
            Self::Text(text) => text.lines().map(str::to_string).collect(),
            Self::Lines(lines) => lines,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    id: Option<RawId>,
    #[serde(default)]
    title: String,
    #[serde(alias = "start")]
    start_time: Option<String>,
    #[serde(alias = "end")]
    end_time: Option<String>,
    source: Option<String>,
    #[serde(alias = "notes")]
    event_notes: Option<RawLines>,
    #[serde(alias = "actions")]
    action_items: Option<RawLines>,
    status: Option<String>,
    location: Option<String>,
}

/// A normalized feed.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    week_start: Option<NaiveDate>,
    week_end: Option<NaiveDate>,
    events: Vec<Event>,
    warnings: Vec<Warning>,
}

impl Feed {
    pub fn week_start(&self) -> Option<NaiveDate> {
        self.week_start
    }

    pub fn week_end(&self) -> Option<NaiveDate> {
        self.week_end
    }

    /// The range the feed was generated for.
    ///
    /// A feed with only `weekStart` covers seven days from it; a feed
    /// without `weekStart` falls back to seven days from its earliest event.
    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let start = self
            .week_start
            .or_else(|| self.events.iter().map(Event::date).min())?;
        let end = self
            .week_end
            .unwrap_or_else(|| PageAssembler::default_end(start));
        Some((start, end))
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Records skipped during normalization.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

}

/// Reads feeds, optionally moving every timestamp into one zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedParser {
    zone: Option<Tz>,
}

impl FeedParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts zoned timestamps to wall-clock time in `zone`. Timestamps
    /// without an offset are taken as already local.
    pub fn with_zone(mut self, zone: Tz) -> Self {
        self.zone = Some(zone);
        self
    }

    /// Parses and normalizes `src`.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Feed`] if `src` is not valid JSON of the feed
    /// shape or its `weekStart`/`weekEnd` cannot be read.
    pub fn parse(&self, src: &str) -> Result<Feed, PlannerError> {
        let raw: RawFeed = serde_json::from_str(src)
            .map_err(|err| PlannerError::new_feed_error(FeedError::syntax(&err), src))?;

        let week_start = self
            .bound("weekStart", raw.week_start.as_deref())
            .map_err(|err| PlannerError::new_feed_error(err, src))?;
        let week_end = self
            .bound("weekEnd", raw.week_end.as_deref())
            .map_err(|err| PlannerError::new_feed_error(err, src))?;

        let mut events = Vec::with_capacity(raw.events.len());
        let mut warnings = Vec::new();
        let mut seen: HashSet<EventId> = HashSet::with_capacity(raw.events.len());

        for (index, value) in raw.events.into_iter().enumerate() {
            match self.normalize(index, value) {
                Ok(event) => events.push(unique_id(event, &mut seen, &mut warnings)),
                Err(reason) => {
                    debug!(index = index, reason = reason.as_str(); "Skipping feed record");
                    warnings.push(Warning::SkippedFeedRecord { index, reason });
                }
            }
        }

        info!(events = events.len(), warnings = warnings.len(); "Event feed normalized");
        Ok(Feed {
            week_start,
            week_end,
            events,
            warnings,
        })
    }

    fn bound(&self, field: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>, FeedError> {
        let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
            return Ok(None);
        };
        // Range bounds keep the date as written, even when events are
        // converted to another zone.
        parse_timestamp(value, None)
            .map(|ts| Some(ts.date()))
            .ok_or_else(|| FeedError::Timestamp {
                field,
                value: value.to_string(),
            })
    }

    fn normalize(&self, index: usize, value: serde_json::Value) -> Result<Event, String> {
        let raw: RawEvent = serde_json::from_value(value).map_err(|err| err.to_string())?;

        let start_raw = raw.start_time.ok_or("missing start time")?;
        let start = self
            .timestamp(&start_raw)
            .ok_or_else(|| format!("unreadable start time `{start_raw}`"))?;

        // A missing or unreadable end leaves a zero-length event, which layout
        // draws as a one-slot box and reports.
        let end = raw
            .end_time
            .as_deref()
            .and_then(|end| self.timestamp(end))
            .unwrap_or(start);

        let id = match raw.id {
            Some(RawId::Text(id)) if !id.trim().is_empty() => id,
            Some(RawId::Number(id)) => id.to_string(),
            _ => format!("event-{index}"),
        };

        let mut event = Event::new(id, raw.title.trim(), start, end)
            .with_source(raw.source.as_deref().map_or(SourceTag::Other, SourceTag::from_label))
            .with_notes(raw.event_notes.map(RawLines::into_lines).unwrap_or_default())
            .with_action_items(raw.action_items.map(RawLines::into_lines).unwrap_or_default());

        if let Some(Ok(status)) = raw
            .status
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<EventStatus>())
        {
            event = event.with_status(status);
        }
        if let Some(location) = raw.location.filter(|l| !l.trim().is_empty()) {
            event = event.with_location(location);
        }

        Ok(event)
    }

    fn timestamp(&self, value: &str) -> Option<NaiveDateTime> {
        parse_timestamp(value, self.zone)
    }
}

/// Renames `event` to `{id}-2`, `{id}-3`, ... if its id was already taken.
fn unique_id(event: Event, seen: &mut HashSet<EventId>, warnings: &mut Vec<Warning>) -> Event {
    if seen.insert(event.id().clone()) {
        return event;
    }

    let original = event.id().clone();
    let renamed = (2..)
        .map(|n| EventId::new(format!("{original}-{n}")))
        .find(|candidate| !seen.contains(candidate))
        .unwrap_or_else(|| original.clone());
    seen.insert(renamed.clone());

    warn!(event = original.as_str(), renamed = renamed.as_str(); "Duplicate event id in feed");
    warnings.push(Warning::DuplicateEventId {
        original,
        renamed: renamed.clone(),
    });
    event.with_id(renamed)
}

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// RFC 3339 timestamps, zone-less ISO timestamps, or bare dates (midnight).
fn parse_timestamp(value: &str, zone: Option<Tz>) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(zoned) = DateTime::parse_from_rfc3339(value) {
        return Some(match zone {
            Some(zone) => zoned.with_timezone(&zone).naive_local(),
            None => zoned.naive_local(),
        });
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Parses `src` without zone conversion.
pub fn parse_feed(src: &str) -> Result<Feed, PlannerError> {
    FeedParser::new().parse(src)
}
