use weekplan_core::{
    apply_stroke,
    draw::{LayeredOutput, RenderLayer},
    geometry::{Bounds, Point, Size},
};

use super::{Svg, line, rect, text};
use crate::pages::{FreeSlot, PageKind, PageNode};

impl Svg {
    /// Page fill and the header panel.
    pub(super) fn render_background(&self, page: &PageNode) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let geometry = page.geometry();
        let canvas = geometry.canvas();

        let sheet = rect(Bounds::new_from_top_left(Point::default(), canvas))
            .set("fill", self.palette.page.to_string());
        output.add_to_layer(RenderLayer::Background, Box::new(sheet));

        let panel = rect(geometry.header_bounds())
            .set("fill", self.palette.header.to_string())
            .set("rx", 4);
        output.add_to_layer(RenderLayer::Background, Box::new(panel));

        output
    }

    /// Hour shading, slot rules, time labels and lane separators.
    ///
    /// Everything here comes from the page's precomputed grid lines, so the
    /// grid is identical whether or not the page has events. Daily pages also
    /// tint the time-column cell of every slot no event covers.
    pub(super) fn render_grid(&self, page: &PageNode) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let lines = page.grid_lines();
        let Some(&lanes_left) = lines.lane_edges().first() else {
            return output;
        };
        let lanes_right = lines.right();
        let slot_height = lines.slot_height();
        let label_size = (slot_height * 0.45).clamp(5.0, 10.0);
        let day_stats = match page.kind() {
            PageKind::Daily => page.stats().first(),
            PageKind::Weekly => None,
        };

        for (index, row) in lines.rows().iter().enumerate() {
            if let Some(free) = day_stats.and_then(|stats| stats.free_slot(index)) {
                let fill = match free {
                    FreeSlot::EarlyMorning => self.palette.early_morning,
                    FreeSlot::Open => self.palette.free_time,
                };
                let tint = rect(Bounds::new_from_top_left(
                    Point::new(lines.left(), row.y),
                    Size::new(lanes_left - lines.left(), slot_height),
                ))
                .set("fill", fill.to_string())
                .set("data-free-slot", free.as_str());
                output.add_to_layer(RenderLayer::Grid, Box::new(tint));
            }

            if row.is_hour {
                let shade = rect(Bounds::new_from_top_left(
                    Point::new(lanes_left, row.y),
                    Size::new(lanes_right - lanes_left, slot_height),
                ))
                .set("fill", self.palette.hour_shade.to_string());
                output.add_to_layer(RenderLayer::Grid, Box::new(shade));

                let label = text(
                    lines.left() + 2.0,
                    row.y + label_size,
                    label_size,
                    self.palette.muted,
                    &row.label,
                );
                output.add_to_layer(RenderLayer::Text, Box::new(label));
            }

            let stroke = if row.is_hour {
                &self.palette.hour_rule
            } else {
                &self.palette.half_rule
            };
            let rule = apply_stroke!(line(lanes_left, row.y, lanes_right, row.y), stroke);
            output.add_to_layer(RenderLayer::Grid, Box::new(rule));
        }

        let bottom = apply_stroke!(
            line(lanes_left, lines.bottom(), lanes_right, lines.bottom()),
            &self.palette.hour_rule
        );
        output.add_to_layer(RenderLayer::Grid, Box::new(bottom));

        let top = lines.rows().first().map_or(lines.bottom(), |row| row.y);
        for &x in lines.lane_edges() {
            let edge = apply_stroke!(line(x, top, x, lines.bottom()), &self.palette.lane_rule);
            output.add_to_layer(RenderLayer::Grid, Box::new(edge));
        }

        output
    }
}
