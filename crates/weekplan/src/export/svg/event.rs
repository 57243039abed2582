use svg::node::element as svg_element;

use weekplan_core::{
    apply_stroke,
    draw::{LayeredOutput, RenderLayer, StrokeDefinition},
    event::{Event, EventStatus},
    geometry::{Bounds, Point, Size},
};

use super::{Svg, body_font_size, fit_to_width, header::HeaderRows, line, rect, text, text_width};
use crate::{
    layout::{ELLIPSIS, PositionedBox, SectionKind},
    pages::{PageKind, PageNode},
};

impl Svg {
    /// One event box: fill and border, source accent, internal columns and
    /// clipped text.
    pub(super) fn render_event_box(
        &self,
        page: &PageNode,
        index: usize,
        placed: &PositionedBox,
        event: &Event,
    ) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let bounds = placed.bounds();
        let flags = placed.cell().flags();
        let style = self.styles.get(event.source());
        let canceled = event.is_canceled();

        let mut border = style.border().clone();
        if canceled {
            border.set_color(self.styles.canceled_accent());
        }
        if flags.invalid {
            border = StrokeDefinition::dashed(self.palette.invalid, border.width());
        }

        let mut frame = rect(bounds)
            .set("fill", style.fill().to_string())
            .set("rx", 2)
            .set("data-event", event.id().as_str());
        if canceled {
            frame = frame.set("opacity", self.styles.canceled_opacity());
        }
        if flags.degenerate {
            frame = frame.set("data-degenerate", "true");
        }
        let frame = apply_stroke!(frame, &border);
        output.add_to_layer(RenderLayer::Event, Box::new(frame));

        let accent = if canceled {
            self.styles.canceled_accent()
        } else {
            style.accent()
        };
        let edge_width = style.left_edge().unwrap_or(0.0).min(bounds.width() / 4.0);
        if edge_width > 0.0 {
            let edge = rect(Bounds::new_from_top_left(
                bounds.min_point(),
                Size::new(edge_width, bounds.height()),
            ))
            .set("fill", accent.to_string());
            output.add_to_layer(RenderLayer::Accent, Box::new(edge));
        }

        let columns = placed.size().internal_columns();
        let column_width = bounds.width() / columns as f32;
        for n in 1..columns {
            let x = bounds.min_x() + column_width * n as f32;
            let separator = apply_stroke!(
                line(x, bounds.min_y() + 2.0, x, bounds.max_y() - 2.0),
                &self.palette.separator
            );
            output.add_to_layer(RenderLayer::Accent, Box::new(separator));
        }

        // Each column clips its own text so long lines stop at the separator.
        let column_bounds = |n: usize| {
            Bounds::new_from_top_left(
                Point::new(bounds.min_x() + column_width * n as f32, bounds.min_y()),
                Size::new(column_width, bounds.height()),
            )
        };
        let clip_id = |n: usize| format!("{}-clip-{index}-{n}", page.id());
        let clips = (0..columns).fold(svg_element::Definitions::new(), |defs, n| {
            defs.add(
                svg_element::ClipPath::new()
                    .set("id", clip_id(n))
                    .add(rect(column_bounds(n))),
            )
        });
        output.add_to_layer(RenderLayer::Event, Box::new(clips));

        let column_group = |n: usize| {
            let group = svg_element::Group::new()
                .set("clip-path", format!("url(#{})", clip_id(n)))
                .set("data-event-text", event.id().as_str())
                .set("data-column", n);
            if canceled {
                group.set("opacity", self.styles.canceled_opacity())
            } else {
                group
            }
        };

        let slot_height = page.geometry().slot_height();
        let font_size = body_font_size(slot_height);
        let small = font_size * 0.85;
        let pitch = font_size * 1.2;
        let padding = (slot_height * 0.15).clamp(1.5, 4.0);

        let left = bounds.min_x() + edge_width + padding;
        let title_room = column_width - edge_width - 2.0 * padding;
        let mut baseline = bounds.min_y() + padding + font_size;
        let mut title_column = column_group(0).add(
            text(
                left,
                baseline,
                font_size,
                self.palette.text,
                &fit_to_width(event.title(), title_room, font_size),
            )
            .set("font-weight", "bold"),
        );

        baseline += pitch;
        if baseline <= bounds.max_y() {
            title_column = title_column.add(text(
                left,
                baseline,
                small,
                self.palette.muted,
                &fit_to_width(&time_label(event), title_room, small),
            ));
        }

        if page.kind() == PageKind::Daily {
            if let Some(location) = event.location() {
                baseline += pitch;
                if baseline <= bounds.max_y() {
                    title_column = title_column.add(text(
                        left,
                        baseline,
                        small,
                        self.palette.muted,
                        &fit_to_width(location, title_room, small),
                    ));
                }
            }

            let badge_top = baseline + pitch * 0.35;
            if badge_top + pitch <= bounds.max_y() {
                title_column = title_column.add(self.status_badge(event, left, badge_top, small));
            }
        }
        output.add_to_layer(RenderLayer::Text, Box::new(title_column));

        for (n, section) in placed.size().sections().iter().enumerate() {
            let column = n + 1;
            let x = column_bounds(column).min_x() + padding;
            let room = column_width - 2.0 * padding;
            let mut baseline = bounds.min_y() + padding + font_size;
            let mut group = column_group(column).add(
                text(x, baseline, font_size * 0.9, accent, section.header()).set("font-weight", "bold"),
            );

            let bullet = match section.kind() {
                SectionKind::Notes => "•",
                SectionKind::ActionItems => "☐",
            };
            for entry in section.lines() {
                baseline += pitch;
                group = group.add(text(
                    x,
                    baseline,
                    small,
                    self.palette.text,
                    &fit_to_width(&format!("{bullet} {entry}"), room, small),
                ));
            }
            output.add_to_layer(RenderLayer::Text, Box::new(group));
        }

        if placed.overflow() {
            let marker = text(
                bounds.max_x() - font_size,
                bounds.max_y() - 1.0,
                font_size,
                self.palette.muted,
                &ELLIPSIS.to_string(),
            )
            .set("data-truncated", event.id().as_str());
            output.add_to_layer(RenderLayer::Accent, Box::new(marker));
        }

        output
    }

    /// Rounded status pill, `Scheduled` unless the event says otherwise.
    fn status_badge(&self, event: &Event, x: f32, top: f32, font_size: f32) -> svg_element::Group {
        let status = event.status().cloned().unwrap_or(EventStatus::Scheduled);
        let label = status.label();
        let height = font_size * 1.5;
        let bounds = Bounds::new_from_top_left(
            Point::new(x, top),
            Size::new(text_width(label, font_size) + font_size, height),
        );
        let color = if status.is_canceled() {
            self.palette.invalid
        } else {
            self.palette.muted
        };

        let pill = rect(bounds)
            .set("fill", self.palette.button.to_string())
            .set("rx", height / 2.0);
        let pill = apply_stroke!(pill, &self.palette.button_border);
        svg_element::Group::new()
            .set("data-status", label.to_lowercase())
            .add(pill)
            .add(text(
                x + font_size / 2.0,
                bounds.max_y() - height * 0.3,
                font_size,
                color,
                label,
            ))
    }

    /// All-day events as labelled pills above the grid, one row per lane.
    pub(super) fn render_all_day(&self, page: &PageNode) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let geometry = page.geometry();
        let rows = HeaderRows::new(geometry.header_bounds());
        let font_size = rows.row_height * 0.7;

        for lane in 0..geometry.lane_count() {
            let items: Vec<_> = page.all_day().iter().filter(|item| item.lane == lane).collect();
            if items.is_empty() {
                continue;
            }

            let lane_bounds = geometry.lane_bounds(lane);
            let share = (lane_bounds.width() - geometry.gutter()) / items.len() as f32;
            let mut x = lane_bounds.min_x() + geometry.gutter() / 2.0;

            for item in items {
                let style = self.styles.get(item.source);
                let width = share.min(text_width(&item.title, font_size) + 2.0 * font_size).max(1.0);
                let bounds = Bounds::new_from_top_left(
                    Point::new(x, rows.strip_top),
                    Size::new(width, rows.row_height),
                );

                let pill = rect(bounds)
                    .set("fill", style.fill().to_string())
                    .set("rx", rows.row_height / 2.0)
                    .set("data-all-day", item.event_id.as_str());
                let pill = apply_stroke!(pill, style.border());
                output.add_to_layer(RenderLayer::Event, Box::new(pill));

                let label = text(
                    bounds.min_x() + font_size * 0.6,
                    bounds.max_y() - rows.row_height * 0.25,
                    font_size,
                    self.palette.text,
                    &item.title,
                );
                output.add_to_layer(RenderLayer::Text, Box::new(label));

                x += share;
            }
        }

        output
    }
}

/// `HH:MM - HH:MM • N min`, or the start time alone for a degenerate event.
fn time_label(event: &Event) -> String {
    if event.is_degenerate() {
        return event.start().format("%H:%M").to_string();
    }
    format!(
        "{} - {} • {} min",
        event.start().format("%H:%M"),
        event.end().format("%H:%M"),
        event.duration().num_minutes()
    )
}
