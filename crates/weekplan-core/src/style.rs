//! Source legend: how each calendar origin is drawn.
//!
//! The table is static configuration. The engine never derives styles from
//! event content; it only looks up the event's [`SourceTag`].

use std::collections::BTreeMap;

use crate::{
    color::Color,
    draw::{StrokeDefinition, StrokeStyle},
    event::SourceTag,
};

/// Visual attributes for one calendar source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceStyle {
    border: StrokeDefinition,
    fill: Color,
    accent: Color,
    left_edge: Option<f32>,
}

impl SourceStyle {
    pub fn new(border: StrokeDefinition, fill: Color, accent: Color) -> Self {
        Self {
            border,
            fill,
            accent,
            left_edge: None,
        }
    }

    /// Adds a thick accent bar of the given width along the left edge.
    pub fn with_left_edge(mut self, width: f32) -> Self {
        self.left_edge = Some(width);
        self
    }

    pub fn border(&self) -> &StrokeDefinition {
        &self.border
    }

    pub fn fill(&self) -> Color {
        self.fill
    }

    pub fn accent(&self) -> Color {
        self.accent
    }

    /// Width of the left-edge emphasis bar, if the source has one.
    pub fn left_edge(&self) -> Option<f32> {
        self.left_edge
    }

    pub fn set_border_style(&mut self, style: StrokeStyle) {
        self.border.set_style(style);
    }

    pub fn set_accent(&mut self, accent: Color) {
        self.accent = accent;
        self.border.set_color(accent);
    }

    pub fn set_fill(&mut self, fill: Color) {
        self.fill = fill;
    }

    pub fn set_left_edge(&mut self, width: Option<f32>) {
        self.left_edge = width;
    }
}

/// Lookup from [`SourceTag`] to [`SourceStyle`].
///
/// # Examples
///
/// ```
/// # use weekplan_core::event::SourceTag;
/// # use weekplan_core::style::StyleTable;
/// let table = StyleTable::default();
/// assert!(!table.get(SourceTag::Google).border().style().is_solid());
/// assert!(table.get(SourceTag::SimplePractice).left_edge().is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StyleTable {
    styles: BTreeMap<SourceTag, SourceStyle>,
    canceled_accent: Color,
    canceled_opacity: f32,
}

impl StyleTable {
    /// Returns the style for `tag`, falling back to the `Other` entry.
    pub fn get(&self, tag: SourceTag) -> &SourceStyle {
        self.styles
            .get(&tag)
            .or_else(|| self.styles.get(&SourceTag::Other))
            .unwrap_or_else(|| fallback_style())
    }

    /// Mutable access for configuration overrides.
    pub fn get_mut(&mut self, tag: SourceTag) -> &mut SourceStyle {
        self.styles.entry(tag).or_insert_with(|| fallback_style().clone())
    }

    pub fn set(&mut self, tag: SourceTag, style: SourceStyle) {
        self.styles.insert(tag, style);
    }

    /// Accent used for canceled bookings regardless of source.
    pub fn canceled_accent(&self) -> Color {
        self.canceled_accent
    }

    /// Opacity applied to canceled bookings.
    pub fn canceled_opacity(&self) -> f32 {
        self.canceled_opacity
    }

    pub fn set_canceled_accent(&mut self, accent: Color) {
        self.canceled_accent = accent;
    }

    /// Legend entries for the given tags, in legend order and without
    /// duplicates.
    pub fn legend<I>(&self, tags: I) -> Vec<(SourceTag, &SourceStyle)>
    where
        I: IntoIterator<Item = SourceTag>,
    {
        let present: std::collections::BTreeSet<SourceTag> = tags.into_iter().collect();
        SourceTag::ALL
            .iter()
            .filter(|tag| present.contains(tag))
            .map(|&tag| (tag, self.get(tag)))
            .collect()
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        let white = css("#ffffff");
        let mut styles = BTreeMap::new();

        styles.insert(
            SourceTag::SimplePractice,
            SourceStyle::new(
                StrokeDefinition::solid(css("#6495ed"), 1.0),
                white,
                css("#6495ed"),
            )
            .with_left_edge(4.0),
        );
        styles.insert(
            SourceTag::Google,
            SourceStyle::new(
                StrokeDefinition::dashed(css("#228b22"), 1.0),
                white,
                css("#228b22"),
            ),
        );
        styles.insert(
            SourceTag::Holiday,
            SourceStyle::new(
                StrokeDefinition::solid(css("#ffa500"), 1.0),
                css("#ffe8b3"),
                css("#ffa500"),
            ),
        );
        for (tag, accent) in [
            (SourceTag::Outlook, "#0078d4"),
            (SourceTag::Apple, "#a2aaad"),
            (SourceTag::Manual, "#243b53"),
            (SourceTag::Other, "#aab8c2"),
        ] {
            let accent = css(accent);
            styles.insert(
                tag,
                SourceStyle::new(StrokeDefinition::solid(accent, 1.0), white, accent),
            );
        }

        Self {
            styles,
            canceled_accent: css("#f6a99a"),
            canceled_opacity: 0.7,
        }
    }
}

fn fallback_style() -> &'static SourceStyle {
    static FALLBACK: std::sync::OnceLock<SourceStyle> = std::sync::OnceLock::new();
    FALLBACK.get_or_init(|| {
        let grey = css("#aab8c2");
        SourceStyle::new(StrokeDefinition::solid(grey, 1.0), css("#ffffff"), grey)
    })
}

fn css(literal: &str) -> Color {
    Color::new(literal).expect("legend colors are valid CSS literals")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_covers_every_source() {
        let table = StyleTable::default();
        for tag in SourceTag::ALL {
            assert_eq!(table.get(tag).border().width(), 1.0);
        }
    }

    #[test]
    fn test_default_source_styles() {
        let table = StyleTable::default();

        let practice = table.get(SourceTag::SimplePractice);
        assert!(practice.border().style().is_solid());
        assert_eq!(practice.left_edge(), Some(4.0));
        assert_eq!(practice.accent(), Color::new("#6495ed").unwrap());

        let google = table.get(SourceTag::Google);
        assert_eq!(*google.border().style(), StrokeStyle::Dashed);
        assert_eq!(google.left_edge(), None);

        let holiday = table.get(SourceTag::Holiday);
        assert_eq!(holiday.accent(), Color::new("#ffa500").unwrap());
    }

    #[test]
    fn test_override_source_style() {
        let mut table = StyleTable::default();
        let style = table.get_mut(SourceTag::Outlook);
        style.set_border_style(StrokeStyle::Dotted);
        style.set_accent(Color::new("purple").unwrap());

        let outlook = table.get(SourceTag::Outlook);
        assert_eq!(*outlook.border().style(), StrokeStyle::Dotted);
        assert_eq!(outlook.border().color(), Color::new("purple").unwrap());
    }

    #[test]
    fn test_legend_order_and_dedup() {
        let table = StyleTable::default();
        let legend = table.legend([
            SourceTag::Holiday,
            SourceTag::Google,
            SourceTag::Holiday,
            SourceTag::SimplePractice,
        ]);
        let tags: Vec<_> = legend.iter().map(|(tag, _)| *tag).collect();
        assert_eq!(
            tags,
            [SourceTag::SimplePractice, SourceTag::Google, SourceTag::Holiday]
        );
    }

    #[test]
    fn test_canceled_accent() {
        let table = StyleTable::default();
        assert_eq!(table.canceled_accent(), Color::new("#f6a99a").unwrap());
        assert!((table.canceled_opacity() - 0.7).abs() < f32::EPSILON);
    }
}
