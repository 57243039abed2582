//! Color handling for planner canvases
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate. Source accents, status accents and grid shading are
//! all expressed as CSS color strings and parsed through this type.

use std::str::FromStr;

use color::DynamicColor;

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a CSS color string such as `"#6495ed"`,
    /// `"rgb(34, 139, 34)"` or `"orange"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use weekplan_core::color::Color;
    ///
    /// let cornflower = Color::new("#6495ed").unwrap();
    /// let green = Color::new("forestgreen").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns the alpha component, between 0.0 (transparent) and 1.0 (opaque).
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        assert!(Color::new("#6495ed").is_ok());
        assert!(Color::new("not-a-color").is_err());
    }

    #[test]
    fn test_color_alpha() {
        assert_eq!(Color::new("orange").unwrap().alpha(), 1.0);
        assert!((Color::new("rgba(0, 0, 0, 0.25)").unwrap().alpha() - 0.25).abs() < 0.001);
    }

    #[test]
    fn test_color_eq() {
        assert_eq!(Color::new("red").unwrap(), Color::new("red").unwrap());
        assert_ne!(Color::new("red").unwrap(), Color::new("blue").unwrap());
    }
}
