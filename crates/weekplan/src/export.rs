//! Export of assembled pages.
//!
//! This is the final stage of the weekplan pipeline:
//!
//! ```text
//! Event feed
//!     ↓ normalize
//! Events
//!     ↓ overlap, sizing, coordinates
//! Laid-out pages
//!     ↓ link + validate
//! DocumentLinkGraph
//!     ↓ export (this module)
//! Document (one SVG canvas per page, paginated HTML)
//! ```
//!
//! # Available Backends
//!
//! - [`svg`]: one [`::svg::Document`] per page via [`svg::Svg`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`PlannerError::Export`] at the crate
//! boundary.
//!
//! [`PlannerError::Export`]: crate::PlannerError::Export

mod document;
pub mod svg;

use log::{debug, info};

use weekplan_core::style::StyleTable;

use crate::{
    cancel::CancellationToken,
    error::{PlannerError, Warning},
    layout::CanvasProfile,
    pages::DocumentLinkGraph,
};

pub use document::{Document, RenderedPage};

/// Serializes a validated link graph into a [`Document`].
///
/// Either every page is serialized or none is: a cancelled or failed export
/// returns an error and drops the partial output.
#[derive(Debug, Clone)]
pub struct DocumentExporter {
    renderer: svg::Svg,
}

impl DocumentExporter {
    pub fn new(styles: StyleTable) -> Self {
        Self {
            renderer: svg::Svg::new(styles),
        }
    }

    pub fn export(
        &self,
        graph: DocumentLinkGraph,
        profile: CanvasProfile,
        warnings: Vec<Warning>,
        cancel: &CancellationToken,
    ) -> Result<Document, PlannerError> {
        let mut pages = Vec::with_capacity(graph.len());

        for mut page in graph.into_pages() {
            if cancel.is_cancelled() {
                info!("Export cancelled during serialization");
                return Err(PlannerError::Cancelled);
            }

            let canvas = self.renderer.render_page(&page);
            page.mark_serialized()?;
            debug!(page = page.id().as_str(); "Page serialized");

            pages.push(RenderedPage::new(page, canvas));
        }

        Ok(Document::new(pages, warnings, profile))
    }
}

/// Errors that can occur during export.
///
/// This type is converted into [`PlannerError::Export`] at the crate
/// boundary.
///
/// [`PlannerError::Export`]: crate::PlannerError::Export
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error encountered while writing output.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),
}
