//! Canonical calendar event model.
//!
//! Every event that reaches the layout engine has this one shape. Feed
//! records with alternate field names are normalized before they get here,
//! so nothing downstream needs to know where an event came from beyond its
//! [`SourceTag`].

use std::{fmt, str::FromStr};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use log::debug;
use serde::Serialize;

/// Stable identifier of an event, used as the layout tie-break.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EventId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The calendar an event was synced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    SimplePractice,
    Google,
    Outlook,
    Apple,
    Holiday,
    Manual,
    #[default]
    Other,
}

impl SourceTag {
    /// All tags in legend order.
    pub const ALL: [SourceTag; 7] = [
        Self::SimplePractice,
        Self::Google,
        Self::Outlook,
        Self::Apple,
        Self::Holiday,
        Self::Manual,
        Self::Other,
    ];

    /// Maps a free-form feed label to a tag.
    ///
    /// Matching ignores case, spaces, dashes and underscores, and accepts the
    /// display labels used by the sync collaborators (`"GOOGLE CALENDAR"`,
    /// `"Holidays in United States"`, ...). Unknown labels become
    /// [`SourceTag::Other`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use weekplan_core::event::SourceTag;
    /// assert_eq!(SourceTag::from_label("GOOGLE CALENDAR"), SourceTag::Google);
    /// assert_eq!(SourceTag::from_label("simple_practice"), SourceTag::SimplePractice);
    /// assert_eq!(SourceTag::from_label("carrier pigeon"), SourceTag::Other);
    /// ```
    pub fn from_label(label: &str) -> Self {
        let key: String = label
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "simplepractice" => Self::SimplePractice,
            "google" | "googlecalendar" | "gcal" => Self::Google,
            "outlook" | "outlookcalendar" | "microsoft" => Self::Outlook,
            "apple" | "applecalendar" | "icloud" => Self::Apple,
            "manual" => Self::Manual,
            "other" | "" => Self::Other,
            _ if key.starts_with("holiday") => Self::Holiday,
            _ => {
                debug!(label; "Unrecognized event source label");
                Self::Other
            }
        }
    }

    /// Human readable label used in legends.
    pub fn label(self) -> &'static str {
        match self {
            Self::SimplePractice => "SimplePractice",
            Self::Google => "Google Calendar",
            Self::Outlook => "Outlook",
            Self::Apple => "Apple Calendar",
            Self::Holiday => "Holidays in United States",
            Self::Manual => "Manual",
            Self::Other => "Other",
        }
    }

    /// Short machine key, used for CSS classes and config tables.
    pub fn key(self) -> &'static str {
        match self {
            Self::SimplePractice => "simple_practice",
            Self::Google => "google",
            Self::Outlook => "outlook",
            Self::Apple => "apple",
            Self::Holiday => "holiday",
            Self::Manual => "manual",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Booking status attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum EventStatus {
    Scheduled,
    Canceled,
    Other(String),
}

impl EventStatus {
    /// Returns `true` for canceled bookings, which do not count as scheduled time.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Canceled => "Canceled",
            Self::Other(label) => label,
        }
    }
}

impl FromStr for EventStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s.trim().to_ascii_lowercase().as_str() {
            "scheduled" | "confirmed" => Self::Scheduled,
            "canceled" | "cancelled" => Self::Canceled,
            _ => Self::Other(s.trim().to_string()),
        };
        Ok(status)
    }
}

/// A calendar event as consumed by the layout engine.
///
/// `start` and `end` are wall-clock times in the planner's single time zone.
/// The engine treats events as immutable inputs to one layout pass. An event
/// whose end is not after its start is still accepted; the layout marks it as
/// degenerate instead of rejecting it.
///
/// # Examples
///
/// ```
/// # use chrono::NaiveDate;
/// # use weekplan_core::event::{Event, SourceTag};
/// let day = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
/// let event = Event::new(
///     "evt_001",
///     "Coffee with Nora",
///     day.and_hms_opt(8, 0, 0).unwrap(),
///     day.and_hms_opt(9, 0, 0).unwrap(),
/// )
/// .with_source(SourceTag::Google)
/// .with_notes(["Revenue update"]);
///
/// assert_eq!(event.duration().num_minutes(), 60);
/// assert!(!event.is_degenerate());
/// assert!(event.has_details());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    id: EventId,
    title: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
    source: SourceTag,
    notes: Vec<String>,
    action_items: Vec<String>,
    status: Option<EventStatus>,
    location: Option<String>,
}

impl Event {
    pub fn new(
        id: impl Into<EventId>,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start,
            end,
            source: SourceTag::default(),
            notes: Vec::new(),
            action_items: Vec::new(),
            status: None,
            location: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<EventId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_source(mut self, source: SourceTag) -> Self {
        self.source = source;
        self
    }

    /// Replaces the note lines. Blank lines are dropped.
    pub fn with_notes<I, S>(mut self, notes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.notes = non_blank(notes);
        self
    }

    /// Replaces the action-item lines. Blank lines are dropped.
    pub fn with_action_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.action_items = non_blank(items);
        self
    }

    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn source(&self) -> SourceTag {
        self.source
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn action_items(&self) -> &[String] {
        &self.action_items
    }

    pub fn status(&self) -> Option<&EventStatus> {
        self.status.as_ref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// The calendar date the event belongs to, which is its start date.
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Signed duration; negative for inverted events.
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// `true` when the end is not after the start.
    pub fn is_degenerate(&self) -> bool {
        self.end <= self.start
    }

    /// `true` when the end lies strictly before the start.
    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }

    /// `true` if the event carries notes or action items.
    pub fn has_details(&self) -> bool {
        !self.notes.is_empty() || !self.action_items.is_empty()
    }

    /// `true` if the booking was canceled.
    pub fn is_canceled(&self) -> bool {
        self.status.as_ref().is_some_and(EventStatus::is_canceled)
    }
}

fn non_blank<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    lines
        .into_iter()
        .map(Into::<String>::into)
        .filter(|line| !line.trim().is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 14)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_event_defaults() {
        let event = Event::new("a", "Session", at(9, 0), at(10, 0));
        assert_eq!(event.source(), SourceTag::Other);
        assert!(event.notes().is_empty());
        assert!(event.action_items().is_empty());
        assert!(event.status().is_none());
        assert!(event.location().is_none());
        assert!(!event.has_details());
        assert_eq!(event.date(), NaiveDate::from_ymd_opt(2025, 7, 14).unwrap());
    }

    #[test]
    fn test_event_degenerate_and_inverted() {
        let zero = Event::new("z", "Zero", at(9, 0), at(9, 0));
        assert!(zero.is_degenerate());
        assert!(!zero.is_inverted());

        let inverted = Event::new("i", "Inverted", at(10, 0), at(9, 0));
        assert!(inverted.is_degenerate());
        assert!(inverted.is_inverted());
        assert_eq!(inverted.duration().num_minutes(), -60);
    }

    #[test]
    fn test_blank_detail_lines_are_dropped() {
        let event = Event::new("a", "Session", at(9, 0), at(10, 0))
            .with_notes(["first", "  ", ""])
            .with_action_items(Vec::<String>::new());

        assert_eq!(event.notes(), ["first".to_string()]);
        assert!(event.has_details());
    }

    #[test]
    fn test_canceled_status() {
        let event =
            Event::new("a", "Session", at(9, 0), at(10, 0)).with_status(EventStatus::Canceled);
        assert!(event.is_canceled());

        let status: EventStatus = "Cancelled".parse().unwrap();
        assert_eq!(status, EventStatus::Canceled);

        let other: EventStatus = "no-show".parse().unwrap();
        assert_eq!(other.label(), "no-show");
    }

    #[test]
    fn test_source_tag_from_label() {
        assert_eq!(SourceTag::from_label("SIMPLEPRACTICE"), SourceTag::SimplePractice);
        assert_eq!(SourceTag::from_label("Google Calendar"), SourceTag::Google);
        assert_eq!(SourceTag::from_label("OUTLOOK"), SourceTag::Outlook);
        assert_eq!(SourceTag::from_label("APPLE CALENDAR"), SourceTag::Apple);
        assert_eq!(
            SourceTag::from_label("Holidays in United States"),
            SourceTag::Holiday
        );
        assert_eq!(SourceTag::from_label("manual"), SourceTag::Manual);
        assert_eq!(SourceTag::from_label(""), SourceTag::Other);
    }

    #[test]
    fn test_source_tag_keys_are_unique() {
        use std::collections::HashSet;

        let keys: HashSet<_> = SourceTag::ALL.iter().map(|tag| tag.key()).collect();
        assert_eq!(keys.len(), SourceTag::ALL.len());
    }
}
