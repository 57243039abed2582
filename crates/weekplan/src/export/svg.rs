//! SVG rendering of laid-out pages.
//!
//! [`Svg`] draws one [`PageNode`] into one [`svg::Document`]. Every drawing
//! pass returns a [`LayeredOutput`]; the passes are merged and flattened in
//! layer order at the end, so the order of the `render_*` calls below does not
//! decide what paints over what.

mod event;
mod grid;
mod header;
mod navigation;

use log::debug;
use svg::{Document, node::Text as SvgText, node::element as svg_element};

use weekplan_core::{
    color::Color,
    draw::{LayeredOutput, StrokeDefinition},
    geometry::Bounds,
    style::StyleTable,
};

use crate::{
    layout::{CanvasProfile, truncate_chars},
    pages::PageNode,
};

const FONT_FAMILY: &str = "Helvetica, Arial, sans-serif";

/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH: f32 = 0.55;

/// Fixed colors for page furniture. Event colors come from the [`StyleTable`].
#[derive(Debug, Clone)]
struct Palette {
    page: Color,
    header: Color,
    hour_shade: Color,
    free_time: Color,
    early_morning: Color,
    hour_rule: StrokeDefinition,
    half_rule: StrokeDefinition,
    lane_rule: StrokeDefinition,
    separator: StrokeDefinition,
    text: Color,
    muted: Color,
    button: Color,
    button_border: StrokeDefinition,
    invalid: Color,
}

impl Default for Palette {
    fn default() -> Self {
        let css = |literal: &str| Color::new(literal).expect("palette colors are valid CSS literals");
        Self {
            page: css("#ffffff"),
            header: css("#f7f8fa"),
            hour_shade: css("#f3f4f6"),
            free_time: css("#e6f4ea"),
            early_morning: css("#fdf3e1"),
            hour_rule: StrokeDefinition::solid(css("#c8ccd2"), 0.75),
            half_rule: StrokeDefinition::solid(css("#e8e9ea"), 0.5),
            lane_rule: StrokeDefinition::solid(css("#c8ccd2"), 0.75),
            separator: StrokeDefinition::solid(css("#d5dae0"), 0.5),
            text: css("#1f2933"),
            muted: css("#66788a"),
            button: css("#eef2f7"),
            button_border: StrokeDefinition::solid(css("#9aa5b1"), 0.75),
            invalid: css("#d64545"),
        }
    }
}

/// SVG page renderer.
#[derive(Debug, Clone)]
pub struct Svg {
    styles: StyleTable,
    palette: Palette,
}

impl Svg {
    pub fn new(styles: StyleTable) -> Self {
        Self {
            styles,
            palette: Palette::default(),
        }
    }

    pub fn styles(&self) -> &StyleTable {
        &self.styles
    }

    /// Renders one page at its fixed canvas size.
    ///
    /// The root element carries the page id in `data-page`; event boxes carry
    /// their event id in `data-event`.
    pub fn render_page(&self, page: &PageNode) -> Document {
        let geometry = page.geometry();
        let canvas = geometry.canvas();

        let mut output = LayeredOutput::new();
        output.merge(self.render_background(page));
        output.merge(self.render_header(page));
        output.merge(self.render_grid(page));

        for (index, (placed, event)) in page.placed().enumerate() {
            output.merge(self.render_event_box(page, index, placed, event));
        }

        output.merge(self.render_all_day(page));
        output.merge(self.render_navigation(page));

        let doc = Document::new()
            .set("viewBox", format!("0 0 {} {}", canvas.width(), canvas.height()))
            .set("width", dimension(canvas.width(), geometry.profile()))
            .set("height", dimension(canvas.height(), geometry.profile()))
            .set("data-page", page.id().as_str())
            .set("font-family", FONT_FAMILY);

        debug!(page = page.id().as_str(), boxes = page.boxes().len(); "SVG page rendered");

        output
            .render()
            .into_iter()
            .fold(doc, |doc, node| doc.add(node))
    }
}

/// Absolute size attribute: points on print canvases, pixels on screen.
fn dimension(value: f32, profile: CanvasProfile) -> String {
    match profile {
        CanvasProfile::Print => format!("{value}pt"),
        CanvasProfile::Screen => format!("{value}px"),
    }
}

fn rect(bounds: Bounds) -> svg_element::Rectangle {
    svg_element::Rectangle::new()
        .set("x", bounds.min_x())
        .set("y", bounds.min_y())
        .set("width", bounds.width())
        .set("height", bounds.height())
}

fn line(x1: f32, y1: f32, x2: f32, y2: f32) -> svg_element::Line {
    svg_element::Line::new()
        .set("x1", x1)
        .set("y1", y1)
        .set("x2", x2)
        .set("y2", y2)
}

/// Single-line text with its baseline at `y`.
fn text(x: f32, y: f32, font_size: f32, color: Color, content: &str) -> svg_element::Text {
    svg_element::Text::new("")
        .set("x", x)
        .set("y", y)
        .set("font-size", font_size)
        .set("fill", color.to_string())
        .add(SvgText::new(content))
}

/// Rough advance width of `content`, used to pack legend and all-day items.
fn text_width(content: &str, font_size: f32) -> f32 {
    content.chars().count() as f32 * font_size * CHAR_WIDTH
}

/// Cuts `content` to the characters that fit in `room` at `font_size`.
fn fit_to_width(content: &str, room: f32, font_size: f32) -> String {
    let budget = (room / (font_size * CHAR_WIDTH)).floor().max(1.0) as usize;
    truncate_chars(content, budget).0
}

/// Body font size for a grid with rows `slot_height` tall.
fn body_font_size(slot_height: f32) -> f32 {
    (slot_height * 0.42).clamp(5.0, 11.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use weekplan_core::{
        event::{Event, EventStatus, SourceTag},
        timeslot::TimeSlotGrid,
    };

    use crate::{CancellationToken, layout::SizingRules, pages::PageAssembler};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn events() -> Vec<Event> {
        let at = |day: u32, h: u32, m: u32| date(day).and_hms_opt(h, m, 0).unwrap();
        vec![
            Event::new("sp", "Intake & review", at(14, 9, 0), at(14, 10, 0))
                .with_source(SourceTag::SimplePractice)
                .with_notes(["Bring forms"])
                .with_action_items(["Send invoice"]),
            Event::new("g", "Coffee", at(14, 9, 30), at(14, 10, 30)).with_source(SourceTag::Google),
            Event::new("x", "Dropped", at(15, 11, 0), at(15, 12, 0))
                .with_status(EventStatus::Canceled),
            Event::new("h", "Independence Day", at(16, 0, 0), at(17, 0, 0))
                .with_source(SourceTag::Holiday),
        ]
    }

    fn render_all(profile: CanvasProfile) -> Vec<(String, String)> {
        let grid = TimeSlotGrid::standard();
        let (graph, _) = PageAssembler::new(grid, profile, SizingRules::default())
            .assemble(&events(), date(14), date(20), &CancellationToken::new())
            .unwrap();
        let svg = Svg::new(StyleTable::default());
        graph
            .pages()
            .map(|page| (page.id().to_string(), svg.render_page(page).to_string()))
            .collect()
    }

    #[test]
    fn test_print_canvas_size() {
        let pages = render_all(CanvasProfile::Print);
        let (id, weekly) = &pages[0];
        assert_eq!(id, "week-2025-07-14");
        assert!(weekly.contains("viewBox=\"0 0 792 612\""));
        assert!(weekly.contains("width=\"792pt\""));

        let (_, daily) = &pages[1];
        assert!(daily.contains("viewBox=\"0 0 612 792\""));
    }

    #[test]
    fn test_screen_canvas_uses_pixels() {
        let pages = render_all(CanvasProfile::Screen);
        assert!(pages[1].1.contains("width=\"816px\""));
    }

    #[test]
    fn test_daily_page_content() {
        let pages = render_all(CanvasProfile::Print);
        let (_, monday) = &pages[1];

        assert!(monday.contains("data-page=\"day-2025-07-14\""));
        assert!(monday.contains("Monday, July 14, 2025"));
        assert!(monday.contains("data-event=\"sp\""));
        assert!(monday.contains("data-event=\"g\""));
        assert!(monday.contains("stroke-dasharray=\"8,4\""));
        assert!(monday.contains("Event Notes"));
        assert!(monday.contains("Action Items"));
        assert!(monday.contains("href=\"#week-2025-07-14\""));
        assert!(monday.contains("href=\"#day-2025-07-15\""));
        assert!(!monday.contains("href=\"#day-2025-07-13\""));
    }

    #[test]
    fn test_weekly_page_links_every_day() {
        let pages = render_all(CanvasProfile::Print);
        let (_, weekly) = &pages[0];
        assert!(weekly.contains("WEEKLY PLANNER"));
        assert!(weekly.contains("Week 29"));
        for day in 14..=20 {
            assert!(weekly.contains(&format!("href=\"#day-2025-07-{day}\"")));
        }
        assert!(!weekly.contains("Event Notes"));
    }

    #[test]
    fn test_canceled_event_is_faded() {
        let pages = render_all(CanvasProfile::Print);
        let (_, tuesday) = &pages[2];
        assert!(tuesday.contains("data-event=\"x\""));
        assert!(tuesday.contains("opacity=\"0.7\""));
    }

    #[test]
    fn test_all_day_strip() {
        let pages = render_all(CanvasProfile::Print);
        let (_, wednesday) = &pages[3];
        assert!(wednesday.contains("data-all-day=\"h\""));
        assert!(!wednesday.contains("data-event=\"h\""));
    }

    fn render_day(events: &[Event], day: u32) -> String {
        let mut warnings = Vec::new();
        let page = PageAssembler::new(TimeSlotGrid::standard(), CanvasProfile::Print, SizingRules::default())
            .layout_day(events, date(day), &mut warnings)
            .unwrap();
        Svg::new(StyleTable::default()).render_page(&page).to_string()
    }

    #[test]
    fn test_fit_to_width() {
        assert_eq!(fit_to_width("Short", 100.0, 10.0), "Short");
        // 5.5 units per glyph leaves room for 4 characters
        assert_eq!(fit_to_width("Overflowing", 23.0, 10.0), "Ove…");
        assert_eq!(fit_to_width("Overflowing", 0.0, 10.0), "…");
    }

    #[test]
    fn test_columns_clip_separately() {
        let at = |h: u32| date(14).and_hms_opt(h, 0, 0).unwrap();
        let long_note = "Discuss the revised treatment plan with guardian";
        assert_eq!(long_note.chars().count(), 48);
        let events = vec![
            Event::new("a", "Intake", at(9), at(10))
                .with_notes([long_note])
                .with_action_items(["Send invoice"]),
            Event::new("b", "Review", at(9), at(10)).with_notes([long_note]),
        ];
        let svg = render_day(&events, 14);

        for column in 0..3 {
            assert!(svg.contains(&format!("id=\"day-2025-07-14-clip-0-{column}\"")));
            assert!(svg.contains(&format!("clip-path=\"url(#day-2025-07-14-clip-0-{column})\"")));
        }
        assert!(svg.contains("id=\"day-2025-07-14-clip-1-1\""));
        assert!(!svg.contains("id=\"day-2025-07-14-clip-1-2\""));

        assert!(!svg.contains(long_note));
        assert!(svg.contains("• Discuss"));
        assert!(svg.contains('…'));
    }

    #[test]
    fn test_title_column_shows_duration_and_status() {
        let pages = render_all(CanvasProfile::Print);
        let (_, monday) = &pages[1];
        assert!(monday.contains("09:30 - 10:30 • 60 min"));
        assert!(monday.contains("data-status=\"scheduled\""));

        let (_, tuesday) = &pages[2];
        assert!(tuesday.contains("data-status=\"canceled\""));
        assert!(tuesday.contains(">Canceled<"));
    }

    #[test]
    fn test_free_slots_are_tinted() {
        let pages = render_all(CanvasProfile::Print);
        let (_, monday) = &pages[1];
        // 36 slots, 09:00 to 10:30 covered
        assert_eq!(monday.matches("data-free-slot=").count(), 33);
        assert_eq!(monday.matches("data-free-slot=\"early-morning\"").count(), 3);

        let (_, weekly) = &pages[0];
        assert!(!weekly.contains("data-free-slot"));
    }

    #[test]
    fn test_malformed_events_are_marked() {
        let at = |h: u32, m: u32| date(14).and_hms_opt(h, m, 0).unwrap();
        let events = vec![
            Event::new("inverted", "Broken sync", at(10, 0), at(9, 0)),
            Event::new("instant", "Reminder", at(13, 0), at(13, 0)),
        ];
        let svg = render_day(&events, 14);
        let invalid = Palette::default().invalid.to_string();

        let frame_of = |id: &str| {
            let marker = format!("data-event=\"{id}\"");
            let at = svg.find(&marker).unwrap();
            let open = svg[..at].rfind('<').unwrap();
            let close = at + svg[at..].find('>').unwrap();
            svg[open..=close].to_string()
        };

        let inverted = frame_of("inverted");
        assert!(inverted.contains("data-degenerate=\"true\""));
        assert!(inverted.contains(&format!("stroke=\"{invalid}\"")));
        assert!(inverted.contains("stroke-dasharray=\"8,4\""));

        let instant = frame_of("instant");
        assert!(instant.contains("data-degenerate=\"true\""));
        assert!(!instant.contains(&format!("stroke=\"{invalid}\"")));
        assert!(!instant.contains("stroke-dasharray"));
    }

    #[test]
    fn test_layers_are_grouped() {
        let pages = render_all(CanvasProfile::Print);
        let (_, monday) = &pages[1];
        let grid = monday.find("data-layer=\"grid\"").unwrap();
        let event = monday.find("data-layer=\"event\"").unwrap();
        let nav = monday.find("data-layer=\"navigation\"").unwrap();
        assert!(grid < event);
        assert!(event < nav);
    }
}
