//! Mapping from grid cells to absolute canvas coordinates.
//!
//! Print canvases are measured in PDF points at [`PRINT_DPI`]; screen
//! canvases in CSS pixels at [`SCREEN_DPI`]. Grid lines are derived from the
//! page geometry alone and never from event positions.

use std::{fmt, str::FromStr};

use serde::Deserialize;

use weekplan_core::{
    geometry::{Bounds, Insets, Point, Size},
    timeslot::TimeSlotGrid,
};

use super::{cell::LayoutCell, sizing::BoxSize};
use crate::pages::PageKind;

/// Points per inch on print canvases.
pub const PRINT_DPI: f32 = 72.0;

/// Pixels per inch on screen canvases.
pub const SCREEN_DPI: f32 = 96.0;

/// Target surface for a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasProfile {
    /// Fixed page sizes in points: US Letter portrait per day, landscape per week.
    #[default]
    Print,
    /// Fixed widths in pixels with a fixed slot height; height follows the grid.
    Screen,
}

impl CanvasProfile {
    pub fn dpi(self) -> f32 {
        match self {
            Self::Print => PRINT_DPI,
            Self::Screen => SCREEN_DPI,
        }
    }
}

impl fmt::Display for CanvasProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Print => f.write_str("print"),
            Self::Screen => f.write_str("screen"),
        }
    }
}

impl FromStr for CanvasProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "print" => Ok(Self::Print),
            "screen" => Ok(Self::Screen),
            _ => Err(format!("unknown canvas profile `{s}`, expected `print` or `screen`")),
        }
    }
}

/// Fixed measurements of one page canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    profile: CanvasProfile,
    canvas: Size,
    margins: Insets,
    header_height: f32,
    time_column_width: f32,
    slot_height: f32,
    lane_count: usize,
    gutter: f32,
}

impl PageGeometry {
    /// Geometry for a page of `kind` on `profile` with `slot_count` grid rows.
    ///
    /// # Examples
    ///
    /// ```
    /// # use weekplan::layout::{CanvasProfile, PageGeometry};
    /// # use weekplan::pages::PageKind;
    /// let daily = PageGeometry::new(CanvasProfile::Print, PageKind::Daily, 36);
    /// assert_eq!(daily.canvas().width(), 612.0);
    /// assert_eq!(daily.canvas().height(), 792.0);
    ///
    /// let weekly = PageGeometry::new(CanvasProfile::Print, PageKind::Weekly, 36);
    /// assert_eq!(weekly.canvas().width(), 792.0);
    /// assert_eq!(weekly.lane_count(), 7);
    /// ```
    pub fn new(profile: CanvasProfile, kind: PageKind, slot_count: usize) -> Self {
        let rows = slot_count.max(1) as f32;
        let dpi = profile.dpi();
        match (profile, kind) {
            (CanvasProfile::Print, PageKind::Daily) => {
                let canvas = Size::new(8.5 * dpi, 11.0 * dpi);
                let margins = Insets::uniform(0.5 * dpi);
                let header_height = 90.0;
                let grid_height = canvas.height() - margins.vertical_sum() - header_height;
                Self {
                    profile,
                    canvas,
                    margins,
                    header_height,
                    time_column_width: 48.0,
                    slot_height: grid_height / rows,
                    lane_count: 1,
                    gutter: 2.0,
                }
            }
            (CanvasProfile::Print, PageKind::Weekly) => {
                let canvas = Size::new(11.0 * dpi, 8.5 * dpi);
                let margins = Insets::uniform(dpi / 3.0);
                let header_height = 84.0;
                let grid_height = canvas.height() - margins.vertical_sum() - header_height;
                Self {
                    profile,
                    canvas,
                    margins,
                    header_height,
                    time_column_width: 40.0,
                    slot_height: grid_height / rows,
                    lane_count: 7,
                    gutter: 2.0,
                }
            }
            (CanvasProfile::Screen, PageKind::Daily) => {
                Self::screen(8.5 * dpi, 120.0, 64.0, 30.0, 1, rows)
            }
            (CanvasProfile::Screen, PageKind::Weekly) => {
                Self::screen(14.0 * dpi, 96.0, 56.0, 20.0, 7, rows)
            }
        }
    }

    fn screen(
        width: f32,
        header_height: f32,
        time_column_width: f32,
        slot_height: f32,
        lane_count: usize,
        rows: f32,
    ) -> Self {
        let margins = Insets::uniform(16.0);
        let height = margins.vertical_sum() + header_height + slot_height * rows;
        Self {
            profile: CanvasProfile::Screen,
            canvas: Size::new(width, height),
            margins,
            header_height,
            time_column_width,
            slot_height,
            lane_count,
            gutter: 4.0,
        }
    }

    pub fn profile(&self) -> CanvasProfile {
        self.profile
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn margins(&self) -> Insets {
        self.margins
    }

    pub fn slot_height(&self) -> f32 {
        self.slot_height
    }

    pub fn lane_count(&self) -> usize {
        self.lane_count
    }

    pub fn gutter(&self) -> f32 {
        self.gutter
    }

    pub fn time_column_width(&self) -> f32 {
        self.time_column_width
    }

    /// Area above the grid reserved for titles, statistics, legend and
    /// navigation.
    pub fn header_bounds(&self) -> Bounds {
        Bounds::new_from_top_left(
            Point::new(self.margins.left(), self.margins.top()),
            Size::new(
                self.canvas.width() - self.margins.horizontal_sum(),
                self.header_height,
            ),
        )
    }

    /// Area covered by the time labels and all lanes.
    pub fn grid_bounds(&self) -> Bounds {
        let top = self.margins.top() + self.header_height;
        let bottom = self.canvas.height() - self.margins.bottom();
        Bounds::new_from_top_left(
            Point::new(self.margins.left(), top),
            Size::new(self.canvas.width() - self.margins.horizontal_sum(), bottom - top),
        )
    }

    /// Area covered by the lanes only, excluding the time label column.
    pub fn lanes_bounds(&self) -> Bounds {
        self.grid_bounds()
            .inset(Insets::new(0.0, 0.0, 0.0, self.time_column_width))
    }

    pub fn lane_width(&self) -> f32 {
        self.lanes_bounds().width() / self.lane_count.max(1) as f32
    }

    /// Bounds of one day lane.
    pub fn lane_bounds(&self, lane: usize) -> Bounds {
        let lanes = self.lanes_bounds();
        let width = self.lane_width();
        Bounds::new_from_top_left(
            Point::new(lanes.min_x() + width * lane as f32, lanes.min_y()),
            Size::new(width, lanes.height()),
        )
    }
}

/// One horizontal rule of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridRow {
    pub y: f32,
    pub label: String,
    pub is_hour: bool,
}

/// Grid rule positions for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridLines {
    rows: Vec<GridRow>,
    bottom: f32,
    lane_edges: Vec<f32>,
    left: f32,
    right: f32,
    slot_height: f32,
}

impl GridLines {
    /// One row per slot, top edge of the slot.
    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    /// y of the closing rule below the last slot.
    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    /// x of every lane boundary, left to right, including both outer edges.
    pub fn lane_edges(&self) -> &[f32] {
        &self.lane_edges
    }

    /// x where the time label column begins.
    pub fn left(&self) -> f32 {
        self.left
    }

    pub fn right(&self) -> f32 {
        self.right
    }

    pub fn slot_height(&self) -> f32 {
        self.slot_height
    }
}

/// An event box at absolute coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedBox {
    cell: LayoutCell,
    size: BoxSize,
    bounds: Bounds,
    overflow: bool,
}

impl PositionedBox {
    pub fn cell(&self) -> &LayoutCell {
        &self.cell
    }

    pub fn size(&self) -> &BoxSize {
        &self.size
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// `true` if the box was cut at the grid bottom and needs a truncation
    /// marker.
    pub fn overflow(&self) -> bool {
        self.overflow
    }
}

/// Pure arithmetic from cells to canvas coordinates.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateRenderer {
    geometry: PageGeometry,
}

impl CoordinateRenderer {
    pub fn new(geometry: PageGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Positions one sized cell.
    ///
    /// The box is clamped to the grid bottom; a clamped box reports
    /// [`PositionedBox::overflow`].
    pub fn place(&self, cell: &LayoutCell, size: &BoxSize) -> PositionedBox {
        let slot_height = self.geometry.slot_height;
        let gutter = self.geometry.gutter;
        let lane = self.geometry.lane_bounds(cell.lane());

        let column_width = lane.width() * size.width_fraction();
        let left = lane.min_x() + column_width * cell.column() as f32 + gutter / 2.0;
        let width = (column_width - gutter).max(1.0);
        let top = lane.min_y() + cell.start_slot() as f32 * slot_height;
        let height = size.height_slots() * slot_height;

        let mut bounds = Bounds::new_from_top_left(Point::new(left, top), Size::new(width, height));
        let overflow = bounds.max_y() > lane.max_y() + f32::EPSILON * lane.max_y();
        if overflow {
            bounds = bounds.with_max_y(lane.max_y());
        }

        PositionedBox {
            cell: cell.clone(),
            size: size.clone(),
            bounds,
            overflow,
        }
    }

    /// Grid rule positions for `grid`.
    pub fn grid_lines(&self, grid: &TimeSlotGrid) -> GridLines {
        let bounds = self.geometry.grid_bounds();
        let lanes = self.geometry.lanes_bounds();
        let slot_height = self.geometry.slot_height;
        let lane_width = self.geometry.lane_width();

        let rows = grid
            .slots()
            .iter()
            .map(|slot| GridRow {
                y: bounds.min_y() + slot.index() as f32 * slot_height,
                label: slot.label().to_string(),
                is_hour: slot.is_hour_boundary(),
            })
            .collect();

        let lane_edges = (0..=self.geometry.lane_count)
            .map(|i| lanes.min_x() + lane_width * i as f32)
            .collect();

        GridLines {
            rows,
            bottom: bounds.min_y() + grid.len() as f32 * slot_height,
            lane_edges,
            left: bounds.min_x(),
            right: bounds.max_x(),
            slot_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    use weekplan_core::event::EventId;

    use crate::layout::cell::CellFlags;
    use crate::layout::sizing::ContentSizer;

    fn cell(start_slot: usize, span: usize, column: usize, count: usize) -> LayoutCell {
        let mut cell = LayoutCell::new(EventId::new("a"), start_slot, span, CellFlags::default());
        cell.set_column(column);
        cell.set_column_count(count);
        cell
    }

    fn size_for(span: usize, count: usize) -> BoxSize {
        let day = chrono::NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
        let event = weekplan_core::event::Event::new(
            "a",
            "Session",
            day.and_hms_opt(9, 0, 0).unwrap(),
            day.and_hms_opt(10, 0, 0).unwrap(),
        );
        ContentSizer::default().size(&event, span, count)
    }

    #[test]
    fn test_print_geometry() {
        let daily = PageGeometry::new(CanvasProfile::Print, PageKind::Daily, 36);
        assert!(approx_eq!(f32, daily.canvas().width(), 612.0));
        assert!(approx_eq!(f32, daily.canvas().height(), 792.0));
        assert!(approx_eq!(f32, daily.slot_height(), 17.5));

        let weekly = PageGeometry::new(CanvasProfile::Print, PageKind::Weekly, 36);
        assert!(weekly.canvas().width() > weekly.canvas().height());
        assert!(approx_eq!(f32, weekly.canvas().height(), 612.0));
        assert!(approx_eq!(f32, weekly.grid_bounds().max_y(), 612.0 - 24.0, epsilon = 0.001));
    }

    #[test]
    fn test_screen_geometry() {
        let daily = PageGeometry::new(CanvasProfile::Screen, PageKind::Daily, 36);
        assert!(approx_eq!(f32, daily.slot_height(), 30.0));
        assert!(approx_eq!(f32, daily.canvas().height(), 32.0 + 120.0 + 1080.0));
        assert_eq!(daily.profile().dpi(), SCREEN_DPI);
    }

    #[test]
    fn test_place_single_slot_box() {
        let geometry = PageGeometry::new(CanvasProfile::Screen, PageKind::Daily, 36);
        let renderer = CoordinateRenderer::new(geometry);
        let placed = renderer.place(&cell(2, 1, 0, 1), &size_for(1, 1));

        let grid = geometry.grid_bounds();
        assert!(approx_eq!(f32, placed.bounds().min_y(), grid.min_y() + 60.0));
        assert!(approx_eq!(f32, placed.bounds().height(), 30.0));
        assert!(approx_eq!(f32, placed.bounds().width(), geometry.lane_width() - 4.0));
        assert!(!placed.overflow());
    }

    #[test]
    fn test_columns_split_lane_evenly() {
        let geometry = PageGeometry::new(CanvasProfile::Print, PageKind::Daily, 36);
        let renderer = CoordinateRenderer::new(geometry);
        let left = renderer.place(&cell(6, 2, 0, 2), &size_for(2, 2));
        let right = renderer.place(&cell(6, 2, 1, 2), &size_for(2, 2));

        assert!(approx_eq!(f32, left.bounds().width(), right.bounds().width()));
        assert!(left.bounds().max_x() <= right.bounds().min_x());
    }

    #[test]
    fn test_box_clamped_at_grid_bottom() {
        let geometry = PageGeometry::new(CanvasProfile::Print, PageKind::Daily, 36);
        let renderer = CoordinateRenderer::new(geometry);
        let placed = renderer.place(&cell(34, 2, 0, 1), &size_for(4, 1));

        assert!(placed.overflow());
        assert!(approx_eq!(f32, placed.bounds().max_y(), geometry.grid_bounds().max_y()));
    }

    #[test]
    fn test_grid_lines_independent_of_events() {
        let geometry = PageGeometry::new(CanvasProfile::Print, PageKind::Weekly, 36);
        let renderer = CoordinateRenderer::new(geometry);
        let lines = renderer.grid_lines(TimeSlotGrid::standard());

        assert_eq!(lines.rows().len(), 36);
        assert_eq!(lines.lane_edges().len(), 8);
        assert!(approx_eq!(f32, lines.bottom(), geometry.grid_bounds().max_y(), epsilon = 0.01));
        assert!(lines.rows()[0].is_hour);
        assert_eq!(lines.rows()[0].label, "06:00");
        for pair in lines.rows().windows(2) {
            assert!(approx_eq!(f32, pair[1].y - pair[0].y, geometry.slot_height(), epsilon = 0.001));
        }
    }
}
