//! Configuration types for planner layout and export.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file by a front end. Every field has a default; an empty file yields
//! the standard 06:00-24:00 grid, print canvases and the default legend.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration root.
//! - [`LayoutConfig`] - Canvas profile, grid window and sizing allowances.
//! - [`StyleConfig`] - Per-source overrides of the legend table.
//! - [`FeedConfig`] - Time zone normalization for the event feed.
//!
//! # Example
//!
//! ```
//! # use weekplan::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().grid().unwrap().len(), 36);
//! assert!(config.style().style_table().is_ok());
//! ```

use std::collections::BTreeMap;

use chrono_tz::Tz;
use serde::Deserialize;

use weekplan_core::{
    color::Color,
    draw::StrokeStyle,
    event::SourceTag,
    style::StyleTable,
    timeslot::{STANDARD_END_MINUTE, STANDARD_START_MINUTE, TimeSlotGrid},
};

use crate::layout::{CanvasProfile, SizingRules};

/// Top-level configuration combining layout, style and feed settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    feed: FeedConfig,
}

impl AppConfig {
    pub fn new(layout: LayoutConfig, style: StyleConfig, feed: FeedConfig) -> Self {
        Self {
            layout,
            style,
            feed,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn feed(&self) -> &FeedConfig {
        &self.feed
    }

    /// Replaces the canvas profile, e.g. from a command-line flag.
    pub fn set_profile(&mut self, profile: CanvasProfile) {
        self.layout.profile = profile;
    }
}

/// Canvas, grid window and content sizing settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Target surface, `print` or `screen`.
    profile: CanvasProfile,

    /// First grid slot as `HH:MM`.
    window_start: String,

    /// End of the last grid slot as `HH:MM`; `24:00` is midnight.
    window_end: String,

    /// Height added for a section header, in slots.
    header_allowance: f32,

    /// Height added per note or action line, in slots.
    line_allowance: f32,

    /// Characters kept per line before truncation.
    max_line_chars: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let rules = SizingRules::default();
        Self {
            profile: CanvasProfile::default(),
            window_start: clock(STANDARD_START_MINUTE),
            window_end: clock(STANDARD_END_MINUTE),
            header_allowance: rules.header_allowance(),
            line_allowance: rules.line_allowance(),
            max_line_chars: rules.max_line_chars(),
        }
    }
}

impl LayoutConfig {
    pub fn profile(&self) -> CanvasProfile {
        self.profile
    }

    pub fn sizing_rules(&self) -> SizingRules {
        SizingRules::new(self.header_allowance, self.line_allowance, self.max_line_chars)
    }

    /// Builds the slot grid for the configured window.
    ///
    /// # Errors
    ///
    /// Returns an error if either bound is not `HH:MM` or the window is not a
    /// valid run of half-hour slots.
    pub fn grid(&self) -> Result<TimeSlotGrid, String> {
        let start = minutes(&self.window_start)?;
        let end = minutes(&self.window_end)?;
        TimeSlotGrid::new(start, end).map_err(|err| format!("Invalid grid window in config: {err}"))
    }
}

/// Overrides for one calendar source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceOverride {
    #[serde(default)]
    border: Option<StrokeStyle>,

    #[serde(default)]
    accent: Option<String>,

    #[serde(default)]
    fill: Option<String>,

    /// Width of the emphasized left edge; `0` removes it.
    #[serde(default)]
    left_edge: Option<f32>,
}

/// Legend overrides keyed by source label, e.g. `[style.sources.google]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    sources: BTreeMap<String, SourceOverride>,

    /// Accent for canceled events, as a color string.
    #[serde(default)]
    canceled_accent: Option<String>,
}

impl StyleConfig {
    /// The default legend with every configured override applied.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured color cannot be parsed.
    pub fn style_table(&self) -> Result<StyleTable, String> {
        let mut table = StyleTable::default();

        for (label, entry) in &self.sources {
            let style = table.get_mut(SourceTag::from_label(label));
            if let Some(border) = &entry.border {
                style.set_border_style(border.clone());
            }
            if let Some(accent) = &entry.accent {
                style.set_accent(parse_color(label, accent)?);
            }
            if let Some(fill) = &entry.fill {
                style.set_fill(parse_color(label, fill)?);
            }
            if let Some(width) = entry.left_edge {
                style.set_left_edge((width > 0.0).then_some(width));
            }
        }

        if let Some(accent) = &self.canceled_accent {
            table.set_canceled_accent(parse_color("canceled", accent)?);
        }

        Ok(table)
    }
}

/// Event feed settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedConfig {
    /// IANA zone zoned feed timestamps are converted into.
    #[serde(default)]
    timezone: Option<String>,
}

impl FeedConfig {
    /// # Errors
    ///
    /// Returns an error if the configured name is not an IANA zone.
    pub fn zone(&self) -> Result<Option<Tz>, String> {
        self.timezone
            .as_deref()
            .map(|name| {
                name.parse::<Tz>()
                    .map_err(|err| format!("Invalid time zone `{name}` in config: {err}"))
            })
            .transpose()
    }
}

fn parse_color(label: &str, value: &str) -> Result<Color, String> {
    Color::new(value).map_err(|err| format!("Invalid color for `{label}` in config: {err}"))
}

fn clock(minute: u32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

fn minutes(value: &str) -> Result<u32, String> {
    let invalid = || format!("Invalid time `{value}` in config, expected HH:MM");
    let (hours, mins) = value.trim().split_once(':').ok_or_else(invalid)?;
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let mins: u32 = mins.parse().map_err(|_| invalid())?;
    if hours > 24 || mins >= 60 || (hours == 24 && mins != 0) {
        return Err(invalid());
    }
    Ok(hours * 60 + mins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.layout().profile(), CanvasProfile::Print);
        assert_eq!(config.layout().sizing_rules(), SizingRules::default());
        assert_eq!(config.layout().grid().unwrap().len(), 36);
        assert_eq!(config.feed().zone().unwrap(), None);
    }

    #[test]
    fn test_parse_toml() {
        let config: AppConfig = toml::from_str(
            r##"
            [layout]
            profile = "screen"
            window_start = "08:00"
            window_end = "18:00"
            max_line_chars = 30

            [style]
            canceled_accent = "#ff0000"

            [style.sources.google]
            border = "dotted"
            accent = "#00aa00"

            [style.sources.simplepractice]
            left_edge = 0.0

            [feed]
            timezone = "America/New_York"
            "##,
        )
        .unwrap();

        assert_eq!(config.layout().profile(), CanvasProfile::Screen);
        assert_eq!(config.layout().grid().unwrap().len(), 20);
        assert_eq!(config.layout().sizing_rules().max_line_chars(), 30);
        assert_eq!(config.layout().sizing_rules().line_allowance(), 0.5);
        assert_eq!(config.feed().zone().unwrap(), Some(chrono_tz::America::New_York));

        let table = config.style().style_table().unwrap();
        assert_eq!(*table.get(SourceTag::Google).border().style(), StrokeStyle::Dotted);
        assert_eq!(table.get(SourceTag::SimplePractice).left_edge(), None);
        assert_eq!(table.canceled_accent(), Color::new("#ff0000").unwrap());
    }

    #[test]
    fn test_invalid_values() {
        let config: AppConfig = toml::from_str(
            r#"
            [layout]
            window_start = "6am"
            [style.sources.google]
            accent = "not-a-color"
            [feed]
            timezone = "Mars/Olympus"
            "#,
        )
        .unwrap();

        assert!(config.layout().grid().is_err());
        assert!(config.style().style_table().is_err());
        assert!(config.feed().zone().is_err());
    }

    #[test]
    fn test_clock_round_trip() {
        assert_eq!(clock(360), "06:00");
        assert_eq!(clock(1440), "24:00");
        assert_eq!(minutes("24:00").unwrap(), 1440);
        assert!(minutes("24:30").is_err());
    }
}
