use chrono::Datelike;

use weekplan_core::{
    apply_stroke,
    draw::{LayeredOutput, RenderLayer},
    geometry::{Bounds, Point, Size},
};

use super::{Svg, rect, text, text_width};
use crate::pages::{PageKind, PageNode};

/// Vertical bands of the header panel, as fractions of its height.
#[derive(Debug, Clone, Copy)]
pub(super) struct HeaderRows {
    pub left: f32,
    pub width: f32,
    pub title_baseline: f32,
    pub title_size: f32,
    pub subtitle_baseline: f32,
    pub subtitle_size: f32,
    pub legend_top: f32,
    pub strip_top: f32,
    pub nav_top: f32,
    pub row_height: f32,
}

impl HeaderRows {
    pub fn new(header: Bounds) -> Self {
        let h = header.height();
        let padding = (h * 0.06).max(4.0);
        Self {
            left: header.min_x() + padding,
            width: header.width() - 2.0 * padding,
            title_baseline: header.min_y() + h * 0.22,
            title_size: (h * 0.17).min(20.0),
            subtitle_baseline: header.min_y() + h * 0.37,
            subtitle_size: (h * 0.1).min(12.0),
            legend_top: header.min_y() + h * 0.44,
            strip_top: header.min_y() + h * 0.61,
            nav_top: header.min_y() + h * 0.79,
            row_height: h * 0.15,
        }
    }
}

impl Svg {
    /// Title, statistics and source legend.
    pub(super) fn render_header(&self, page: &PageNode) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let rows = HeaderRows::new(page.geometry().header_bounds());

        let (title, subtitle) = match page.kind() {
            PageKind::Daily => {
                let title = page.start().format("%A, %B %-d, %Y").to_string();
                let subtitle = page.stats().first().map(|s| s.summary()).unwrap_or_default();
                (title, subtitle)
            }
            PageKind::Weekly => {
                let appointments: usize = page.stats().iter().map(|s| s.appointments()).sum();
                let subtitle = format!(
                    "Week {} — {}-{} · {} appointments",
                    page.start().iso_week().week(),
                    page.start().format("%-m/%-d"),
                    page.end().format("%-m/%-d"),
                    appointments
                );
                ("WEEKLY PLANNER".to_string(), subtitle)
            }
        };

        let title = text(
            rows.left,
            rows.title_baseline,
            rows.title_size,
            self.palette.text,
            &title,
        )
        .set("font-weight", "bold");
        output.add_to_layer(RenderLayer::Text, Box::new(title));

        let subtitle = text(
            rows.left,
            rows.subtitle_baseline,
            rows.subtitle_size,
            self.palette.muted,
            &subtitle,
        );
        output.add_to_layer(RenderLayer::Text, Box::new(subtitle));

        output.merge(self.render_legend(page, &rows));
        output
    }

    /// One swatch per source that appears on the page.
    fn render_legend(&self, page: &PageNode, rows: &HeaderRows) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let swatch = Size::new(rows.row_height * 1.2, rows.row_height * 0.8);
        let font_size = rows.row_height * 0.75;
        let right = rows.left + rows.width;
        let mut x = rows.left;

        for (tag, style) in self.styles.legend(page.sources()) {
            let label = tag.label();
            let advance = swatch.width() + 4.0 + text_width(label, font_size) + 10.0;
            if x + advance > right {
                break;
            }

            let bounds = Bounds::new_from_top_left(Point::new(x, rows.legend_top), swatch);
            let sample = rect(bounds).set("fill", style.fill().to_string());
            let sample = apply_stroke!(sample, style.border()).set("data-legend", tag.key());
            output.add_to_layer(RenderLayer::Event, Box::new(sample));

            if let Some(edge) = style.left_edge() {
                let edge = Bounds::new_from_top_left(
                    bounds.min_point(),
                    Size::new(edge.min(swatch.width() / 3.0), swatch.height()),
                );
                let edge = rect(edge).set("fill", style.accent().to_string());
                output.add_to_layer(RenderLayer::Accent, Box::new(edge));
            }

            let caption = text(
                bounds.max_x() + 4.0,
                bounds.max_y(),
                font_size,
                self.palette.text,
                label,
            );
            output.add_to_layer(RenderLayer::Text, Box::new(caption));

            x += advance;
        }

        output
    }
}
