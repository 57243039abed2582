//! The serialized multi-page document.

use std::{
    fmt::Write as _,
    fs::{self, File},
    io::Write,
    path::Path,
};

use chrono::NaiveDate;
use log::{error, info};

use super::Error;
use crate::{
    error::Warning,
    layout::CanvasProfile,
    pages::{PageId, PageKind, PageNode, PageState},
};

const PAGE_CSS: &str = "\
body { margin: 0; background: #e5e7eb; }
section.page { display: block; margin: 0 auto 16px; background: #ffffff; page-break-after: always; break-after: page; }
section.page:last-of-type { page-break-after: auto; break-after: auto; }
section.page > svg { display: block; }
@page weekly { size: 11in 8.5in; margin: 0; }
@page daily { size: 8.5in 11in; margin: 0; }
section.weekly { page: weekly; }
section.daily { page: daily; }
@media print { body { background: none; } section.page { margin: 0; } }
";

/// One serialized page and the node it was drawn from.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    node: PageNode,
    canvas: svg::Document,
}

impl RenderedPage {
    pub(crate) fn new(node: PageNode, canvas: svg::Document) -> Self {
        Self { node, canvas }
    }

    pub fn id(&self) -> &PageId {
        self.node.id()
    }

    pub fn kind(&self) -> PageKind {
        self.node.kind()
    }

    pub fn node(&self) -> &PageNode {
        &self.node
    }

    pub fn canvas(&self) -> &svg::Document {
        &self.canvas
    }

    /// Standalone SVG markup for this page.
    pub fn to_svg(&self) -> String {
        self.canvas.to_string()
    }
}

/// An exported document: one weekly page, then the daily pages in date order.
#[derive(Debug, Clone)]
pub struct Document {
    pages: Vec<RenderedPage>,
    warnings: Vec<Warning>,
    profile: CanvasProfile,
}

impl Document {
    pub(crate) fn new(pages: Vec<RenderedPage>, warnings: Vec<Warning>, profile: CanvasProfile) -> Self {
        debug_assert!(pages.iter().all(|p| p.node.state() == PageState::Serialized));
        Self {
            pages,
            warnings,
            profile,
        }
    }

    /// Output file name for a document starting on `start`, e.g.
    /// `weekly_planner_2025-07-14.html`.
    pub fn default_file_name(start: NaiveDate) -> String {
        format!("weekly_planner_{}.html", start.format("%Y-%m-%d"))
    }

    pub fn pages(&self) -> &[RenderedPage] {
        &self.pages
    }

    pub fn page(&self, id: &str) -> Option<&RenderedPage> {
        self.pages.iter().find(|page| page.id().as_str() == id)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Everything noticed while building the document, in discovery order.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn profile(&self) -> CanvasProfile {
        self.profile
    }

    /// First and last date covered, taken from the weekly page.
    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.pages
            .iter()
            .find(|page| page.kind() == PageKind::Weekly)
            .map(|page| (page.node.start(), page.node.end()))
    }

    /// Self-contained paginated HTML. Each page is a `<section>` whose id is
    /// the page id, so in-document links resolve as fragment anchors.
    pub fn to_html(&self) -> String {
        let title = match self.range() {
            Some((start, end)) => format!(
                "Weekly Planner {} to {}",
                start.format("%Y-%m-%d"),
                end.format("%Y-%m-%d")
            ),
            None => "Weekly Planner".to_string(),
        };

        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        let _ = writeln!(html, "<title>{title}</title>");
        let _ = writeln!(html, "<style>\n{PAGE_CSS}</style>");
        let _ = writeln!(html, "</head>\n<body data-profile=\"{}\">", self.profile);

        for page in &self.pages {
            let class = match page.kind() {
                PageKind::Weekly => "weekly",
                PageKind::Daily => "daily",
            };
            let _ = writeln!(
                html,
                "<section class=\"page {class}\" id=\"{}\">\n{}\n</section>",
                page.id(),
                page.canvas
            );
        }

        html.push_str("</body>\n</html>\n");
        html
    }

    /// Writes [`Document::to_html`] to `path`.
    pub fn write_html(&self, path: &Path) -> Result<(), Error> {
        info!(path:? = path, pages = self.pages.len(); "Writing HTML document");
        let mut file = File::create(path).map_err(|err| {
            error!(path:? = path, err:err; "Failed to create HTML file");
            Error::Io(err)
        })?;

        file.write_all(self.to_html().as_bytes()).map_err(|err| {
            error!(path:? = path, err:err; "Failed to write HTML content");
            Error::Io(err)
        })
    }

    /// Writes one `<page id>.svg` file per page into `dir`, creating it if
    /// needed. Returns the written paths in document order.
    pub fn write_svg_pages(&self, dir: &Path) -> Result<Vec<std::path::PathBuf>, Error> {
        fs::create_dir_all(dir).map_err(Error::Io)?;

        let mut written = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let path = dir.join(format!("{}.svg", page.id()));
            svg::save(&path, &page.canvas).map_err(|err| {
                error!(path:? = path, err:err; "Failed to write SVG page");
                Error::Io(err)
            })?;
            written.push(path);
        }

        info!(dir:? = dir, pages = written.len(); "SVG pages written");
        Ok(written)
    }
}
