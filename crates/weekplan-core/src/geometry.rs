//! Geometric primitives for page layout and positioning.
//!
//! This module provides the geometric types used to place grid rows, event
//! boxes and navigation buttons on a canvas.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in canvas space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular box defined by minimum and maximum coordinates
//! - [`Insets`] - Margin values for four sides
//!
//! # Coordinate System
//!
//! Coordinates follow the SVG convention:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! All values are in canvas units: CSS pixels for the screen profile and
//! points for the print profile.

/// A 2D point in canvas coordinate space.
///
/// # Examples
///
/// ```
/// # use weekplan_core::geometry::Point;
/// let origin = Point::new(36.0, 120.0);
/// assert_eq!(origin.x(), 36.0);
/// assert_eq!(origin.y(), 120.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Sets the maximum y-coordinate of the bounds and returns the modified bounds
    pub fn with_max_y(mut self, max_y: f32) -> Self {
        self.max_y = max_y;
        self
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Shrinks the bounds by the insets on every side.
    ///
    /// The result never inverts: an inset larger than the box collapses it
    /// onto its center line.
    pub fn inset(&self, insets: Insets) -> Self {
        let min_x = self.min_x + insets.left;
        let max_x = (self.max_x - insets.right).max(min_x);
        let min_y = self.min_y + insets.top;
        let max_y = (self.max_y - insets.bottom).max(min_y);
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

/// Represents spacing around an element (margins, padding)
/// with potentially different values for each side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates new insets with specified values for each side
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value for all sides
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Returns the top inset value
    pub fn top(self) -> f32 {
        self.top
    }

    /// Returns the right inset value
    pub fn right(self) -> f32 {
        self.right
    }

    /// Returns the bottom inset value
    pub fn bottom(self) -> f32 {
        self.bottom
    }

    /// Returns the left inset value
    pub fn left(self) -> f32 {
        self.left
    }

    /// Returns the sum of left and right insets
    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    /// Returns the sum of top and bottom insets
    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            1.0f32..500.0,
            1.0f32..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)))
    }

    fn insets_strategy() -> impl Strategy<Value = Insets> {
        (0.0f32..600.0, 0.0f32..600.0, 0.0f32..600.0, 0.0f32..600.0)
            .prop_map(|(top, right, bottom, left)| Insets::new(top, right, bottom, left))
    }

    /// Insetting moves the top-left corner by the insets and never yields a
    /// negative extent.
    fn check_inset_stays_valid(b: Bounds, insets: Insets) -> Result<(), TestCaseError> {
        let inner = b.inset(insets);
        prop_assert!(inner.width() >= 0.0);
        prop_assert!(inner.height() >= 0.0);
        prop_assert!(approx_eq!(f32, inner.min_x(), b.min_x() + insets.left(), epsilon = 0.001));
        prop_assert!(approx_eq!(f32, inner.min_y(), b.min_y() + insets.top(), epsilon = 0.001));
        Ok(())
    }

    proptest! {
        #[test]
        fn inset_stays_valid(b in bounds_strategy(), insets in insets_strategy()) {
            check_inset_stays_valid(b, insets)?;
        }
    }
}
