//! Page assembly and the cross-page link graph.
//!
//! A document is one weekly overview page followed by one daily page per
//! date. [`PageAssembler`] lays each page out independently;
//! [`DocumentLinkGraph`] then attaches previous-day, next-day and
//! back-to-week links and validates them before anything is serialized.

mod assembler;
mod graph;
mod node;
mod stats;

pub use assembler::{MAX_RANGE_DAYS, PageAssembler};
pub use graph::{DocumentLinkGraph, GraphError};
pub use node::{
    AllDayItem, LinkKind, PageId, PageKind, PageLayout, PageLink, PageNode, PageState,
    PageStateError,
};
pub use stats::{DailyStats, FreeSlot};
