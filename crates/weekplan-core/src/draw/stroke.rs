//! Line styles for event borders and grid rules.
//!
//! The legend decides per calendar source whether an event border is solid,
//! dashed or dotted. Grid rules and column separators are always solid.
//! [`apply_stroke!`](crate::apply_stroke) writes a [`StrokeDefinition`] onto
//! any SVG element as `stroke`, `stroke-opacity`, `stroke-width` and, for
//! broken lines, `stroke-dasharray`.

use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::color::Color;

/// Dash pattern of a line.
///
/// Parsed from config as `"solid"`, `"dashed"`, `"dotted"` or a raw
/// dasharray such as `"6,2,1,2"`.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum StrokeStyle {
    #[default]
    Solid,
    /// `8,4`, the Google Calendar border.
    Dashed,
    /// `2,3`
    Dotted,
    Custom(String),
}

impl FromStr for StrokeStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err("empty border style".to_string()),
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            pattern => Ok(Self::Custom(pattern.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for StrokeStyle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

impl StrokeStyle {
    /// The `stroke-dasharray` value, or `None` for a continuous line.
    pub fn dasharray(&self) -> Option<&str> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some("8,4"),
            Self::Dotted => Some("2,3"),
            Self::Custom(pattern) => Some(pattern.as_str()),
        }
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, Self::Solid)
    }
}

/// Color, width and dash pattern of one line.
///
/// # Examples
///
/// ```
/// use weekplan_core::color::Color;
/// use weekplan_core::draw::{StrokeDefinition, StrokeStyle};
///
/// let border = StrokeDefinition::dashed(Color::new("#228b22").unwrap(), 1.0);
/// assert_eq!(*border.style(), StrokeStyle::Dashed);
///
/// let rule = StrokeDefinition::solid(Color::new("#e8e9ea").unwrap(), 0.5);
/// assert!(rule.style().is_solid());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    pub fn dashed(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Dashed,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }
}

/// Writes a [`StrokeDefinition`] onto an SVG element.
///
/// # Examples
///
/// ```
/// use svg::node::element as svg_element;
/// use weekplan_core::color::Color;
/// use weekplan_core::draw::StrokeDefinition;
///
/// let border = StrokeDefinition::dashed(Color::new("#228b22").unwrap(), 1.0);
/// let frame = svg_element::Rectangle::new().set("width", 100).set("height", 50);
///
/// let frame = weekplan_core::apply_stroke!(frame, &border);
/// assert!(frame.to_string().contains("stroke-dasharray=\"8,4\""));
/// ```
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let stroke = $stroke;
        let elem = $element
            .set("stroke", stroke.color().to_string())
            .set("stroke-opacity", stroke.color().alpha())
            .set("stroke-width", stroke.width());

        match stroke.style().dasharray() {
            Some(pattern) => elem.set("stroke-dasharray", pattern),
            None => elem,
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use svg::node::element::Line;

    fn green() -> Color {
        Color::new("#228b22").unwrap()
    }

    #[test]
    fn test_constructors() {
        let rule = StrokeDefinition::solid(green(), 0.5);
        assert_eq!(rule.width(), 0.5);
        assert!(rule.style().is_solid());

        let border = StrokeDefinition::dashed(green(), 1.0);
        assert_eq!(border.style().dasharray(), Some("8,4"));
    }

    #[test]
    fn test_recolor_and_restyle() {
        let mut border = StrokeDefinition::solid(green(), 1.0);
        border.set_color(Color::new("#d64545").unwrap());
        border.set_style(StrokeStyle::Dotted);

        assert_eq!(border.color(), Color::new("#d64545").unwrap());
        assert_eq!(border.style().dasharray(), Some("2,3"));
        assert_eq!(border.width(), 1.0);
    }

    #[test]
    fn test_parse_styles() {
        assert_eq!("dashed".parse::<StrokeStyle>().unwrap(), StrokeStyle::Dashed);
        assert_eq!(" dotted ".parse::<StrokeStyle>().unwrap(), StrokeStyle::Dotted);
        assert_eq!(
            "6,2,1,2".parse::<StrokeStyle>().unwrap().dasharray(),
            Some("6,2,1,2")
        );
        assert!("  ".parse::<StrokeStyle>().is_err());
    }

    #[test]
    fn test_apply_stroke_omits_dasharray_for_solid() {
        let rule = StrokeDefinition::solid(green(), 0.75);
        let line = apply_stroke!(Line::new(), &rule).to_string();
        assert!(line.contains("stroke-width=\"0.75\""));
        assert!(!line.contains("stroke-dasharray"));
    }
}
