use svg::node::element as svg_element;

use weekplan_core::{
    apply_stroke,
    draw::{LayeredOutput, RenderLayer},
    geometry::{Bounds, Point, Size},
};

use super::{Svg, header::HeaderRows, rect, text, text_width};
use crate::pages::{LinkKind, PageKind, PageLink, PageNode};

impl Svg {
    /// Cross-page links.
    ///
    /// Daily pages get previous, weekly and next buttons along the bottom of
    /// the header. The weekly page gets a linked day label above each lane;
    /// days without a page keep a plain label.
    pub(super) fn render_navigation(&self, page: &PageNode) -> LayeredOutput {
        match page.kind() {
            PageKind::Daily => self.render_day_buttons(page),
            PageKind::Weekly => self.render_day_cells(page),
        }
    }

    fn render_day_buttons(&self, page: &PageNode) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let rows = HeaderRows::new(page.geometry().header_bounds());
        let width = (rows.width / 4.0).min(140.0);
        let size = Size::new(width, rows.row_height);

        let slots = [
            (LinkKind::PreviousDay, rows.left),
            (LinkKind::BackToWeek, rows.left + (rows.width - width) / 2.0),
            (LinkKind::NextDay, rows.left + rows.width - width),
        ];
        for (kind, x) in slots {
            let Some(link) = page.link_of(kind) else {
                continue;
            };
            let bounds = Bounds::new_from_top_left(Point::new(x, rows.nav_top), size);
            output.add_to_layer(RenderLayer::Navigation, self.button(link, bounds, true));
        }

        output
    }

    fn render_day_cells(&self, page: &PageNode) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let geometry = page.geometry();
        let rows = HeaderRows::new(geometry.header_bounds());

        for (lane, date) in page.dates().enumerate() {
            let lane_bounds = geometry.lane_bounds(lane);
            let bounds = Bounds::new_from_top_left(
                Point::new(lane_bounds.min_x() + geometry.gutter() / 2.0, rows.nav_top),
                Size::new(lane_bounds.width() - geometry.gutter(), rows.row_height),
            );

            match page.links().iter().find(|l| l.kind() == LinkKind::DayCell && l.date() == date) {
                Some(link) => {
                    output.add_to_layer(RenderLayer::Navigation, self.button(link, bounds, false));
                }
                None => {
                    let font_size = rows.row_height * 0.7;
                    let label = date.format("%a %-m/%-d").to_string();
                    let x = bounds.center().x() - text_width(&label, font_size) / 2.0;
                    let plain = text(
                        x,
                        bounds.max_y() - rows.row_height * 0.25,
                        font_size,
                        self.palette.muted,
                        &label,
                    );
                    output.add_to_layer(RenderLayer::Text, Box::new(plain));
                }
            }
        }

        output
    }

    /// A labelled rectangle wrapped in an internal anchor to the link target.
    fn button(&self, link: &PageLink, bounds: Bounds, framed: bool) -> Box<dyn svg::Node> {
        let font_size = bounds.height() * 0.7;
        let label = link.label();

        let mut face = rect(bounds)
            .set("fill", self.palette.button.to_string())
            .set("rx", bounds.height() / 4.0);
        if framed {
            face = apply_stroke!(face, &self.palette.button_border);
        }

        let caption = text(
            bounds.center().x() - text_width(&label, font_size) / 2.0,
            bounds.max_y() - bounds.height() * 0.25,
            font_size,
            self.palette.text,
            &label,
        );

        let anchor = svg_element::Anchor::new()
            .set("href", format!("#{}", link.target()))
            .set("data-link", link.kind().to_string())
            .add(face)
            .add(caption);
        Box::new(anchor)
    }
}
