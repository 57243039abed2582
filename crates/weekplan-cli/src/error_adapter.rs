//! Error adapter for converting PlannerError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI. Feed syntax errors
//! carry the raw feed text, so they are rendered with a snippet pointing at
//! the offending position.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use weekplan::{PlannerError, feed::FeedError};

/// Adapter giving a [`PlannerError`] miette diagnostic output.
pub struct ErrorAdapter<'a>(pub &'a PlannerError);

impl ErrorAdapter<'_> {
    /// Span of a feed syntax error within the feed text.
    fn feed_span(&self) -> Option<SourceSpan> {
        let PlannerError::Feed { err, src } = self.0 else {
            return None;
        };
        let offset = err.offset_in(src)?;
        let len = usize::from(offset < src.len());
        Some(SourceSpan::new(offset.into(), len))
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            PlannerError::Io(_) => "weekplan::io",
            PlannerError::Feed { .. } => "weekplan::feed",
            PlannerError::InvalidRange { .. } => "weekplan::range",
            PlannerError::Config(_) => "weekplan::config",
            PlannerError::NoEvents | PlannerError::NoValidEvents(_) => "weekplan::events",
            PlannerError::Graph(_) => "weekplan::graph",
            PlannerError::Layout(_) => "weekplan::layout",
            PlannerError::Export(_) => "weekplan::export",
            PlannerError::Cancelled => "weekplan::cancelled",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            PlannerError::InvalidRange { .. } => {
                "pass --start and --end spanning one to seven days"
            }
            PlannerError::NoEvents => "the feed has no events in its `events` list",
            PlannerError::NoValidEvents(_) => "every event ends before it starts",
            PlannerError::Feed {
                err: FeedError::Timestamp { .. },
                ..
            } => "timestamps are RFC 3339, `YYYY-MM-DDTHH:MM:SS` or `YYYY-MM-DD`",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match &self.0 {
            PlannerError::Feed { src, .. } if self.feed_span().is_some() => {
                Some(src as &dyn miette::SourceCode)
            }
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.feed_span()?;
        let label = LabeledSpan::new_primary_with_span(Some("here".to_string()), span);
        Some(Box::new(std::iter::once(label)))
    }
}
