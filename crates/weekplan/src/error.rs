//! Error and warning types for weekplan operations.
//!
//! [`PlannerError`] is returned only when no document can be produced at all.
//! Everything the engine can recover from locally is reported as a
//! [`Warning`] collected alongside the result.

use std::{fmt, io};

use chrono::NaiveDate;
use thiserror::Error;

use weekplan_core::event::EventId;

use crate::{feed::FeedError, pages::LinkKind};

/// The main error type for weekplan operations.
///
/// # Diagnostic Variants
///
/// The `Feed` variant keeps the raw feed text next to the parse error so a
/// front end can point at the offending line and column.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Feed { err: FeedError, src: String },

    #[error("Invalid date range {start} to {end}: {reason}")]
    InvalidRange {
        start: NaiveDate,
        end: NaiveDate,
        reason: &'static str,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No events supplied for export")]
    NoEvents,

    #[error("None of the {0} supplied events could be laid out")]
    NoValidEvents(usize),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),

    #[error("Export cancelled")]
    Cancelled,
}

impl From<crate::pages::PageStateError> for PlannerError {
    fn from(error: crate::pages::PageStateError) -> Self {
        Self::Layout(error.to_string())
    }
}

impl From<crate::pages::GraphError> for PlannerError {
    fn from(error: crate::pages::GraphError) -> Self {
        Self::Graph(error.to_string())
    }
}

impl From<crate::export::Error> for PlannerError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl PlannerError {
    /// Create a new `Feed` error with the associated feed text.
    pub fn new_feed_error(err: FeedError, src: impl Into<String>) -> Self {
        Self::Feed {
            err,
            src: src.into(),
        }
    }
}

/// A recoverable condition reported alongside a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// The event has an inverted or missing end and was drawn with a minimum
    /// one-slot box.
    MalformedEvent { event: EventId, reason: String },

    /// Note or action lines were cut at the character budget.
    ContentTruncated { event: EventId, lines: usize },

    /// A navigation link pointed outside the assembled range and was omitted.
    /// `target` is `None` when the neighbouring date is past the end of the
    /// calendar.
    DanglingLink {
        page: String,
        kind: LinkKind,
        target: Option<NaiveDate>,
    },

    /// An event box ran past the bottom of the grid and was clipped.
    CanvasOverflow { page: String, event: EventId },

    /// A feed record could not be turned into an event.
    SkippedFeedRecord { index: usize, reason: String },

    /// A feed record reused an id seen earlier in the same feed and was
    /// given a fresh one.
    DuplicateEventId { original: EventId, renamed: EventId },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedEvent { event, reason } => {
                write!(f, "event `{event}` is malformed: {reason}")
            }
            Self::ContentTruncated { event, lines } => {
                write!(f, "event `{event}` had {lines} line(s) truncated")
            }
            Self::DanglingLink {
                page,
                kind,
                target: Some(target),
            } => {
                write!(f, "page `{page}` has no {kind} page for {target}; link omitted")
            }
            Self::DanglingLink {
                page,
                kind,
                target: None,
            } => {
                write!(f, "page `{page}` has no {kind} date in the calendar; link omitted")
            }
            Self::CanvasOverflow { page, event } => {
                write!(f, "event `{event}` overflows the grid on page `{page}` and was clipped")
            }
            Self::SkippedFeedRecord { index, reason } => {
                write!(f, "feed record #{index} skipped: {reason}")
            }
            Self::DuplicateEventId { original, renamed } => {
                write!(f, "duplicate event id `{original}` renamed to `{renamed}`")
            }
        }
    }
}
