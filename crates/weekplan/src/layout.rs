//! Temporal layout: overlap resolution, content sizing and coordinates.
//!
//! The stages run in order for every page:
//!
//! 1. [`OverlapResolver`] places events on the slot grid and assigns columns.
//! 2. [`ContentSizer`] computes each box's height and internal columns.
//! 3. [`CoordinateRenderer`] turns cells and sizes into canvas coordinates.
//!
//! The sizer's footprint is fed back into the resolver so boxes expanded by
//! notes or action items still never share a column with a neighbour they
//! visually overlap.

mod cell;
mod coords;
mod overlap;
mod sizing;

use chrono::TimeDelta;

use weekplan_core::event::Event;

pub use cell::{CellFlags, LayoutCell};
pub use coords::{
    CanvasProfile, CoordinateRenderer, GridLines, GridRow, PRINT_DPI, PageGeometry,
    PositionedBox, SCREEN_DPI,
};
pub use overlap::OverlapResolver;
pub use sizing::{
    BoxSection, BoxSize, ContentSizer, ELLIPSIS, SectionKind, SizingMode, SizingRules,
    truncate_chars,
};

/// Events lasting at least this many hours are shown in the all-day strip
/// rather than on the time grid.
pub const ALL_DAY_THRESHOLD_HOURS: i64 = 20;

/// Returns `true` if `event` belongs in the all-day strip.
///
/// # Examples
///
/// ```
/// # use chrono::NaiveDate;
/// # use weekplan::layout::is_all_day;
/// # use weekplan_core::event::Event;
/// let day = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
/// let holiday = Event::new(
///     "h",
///     "Independence Day",
///     day.and_hms_opt(0, 0, 0).unwrap(),
///     day.succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap(),
/// );
/// assert!(is_all_day(&holiday));
/// ```
pub fn is_all_day(event: &Event) -> bool {
    event.duration() >= TimeDelta::hours(ALL_DAY_THRESHOLD_HOURS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_all_day_threshold() {
        let day = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
        let start = day.and_hms_opt(6, 0, 0).unwrap();

        let long = Event::new("a", "Retreat", start, start + TimeDelta::hours(20));
        assert!(is_all_day(&long));

        let short = Event::new("b", "Shift", start, start + TimeDelta::minutes(19 * 60 + 59));
        assert!(!is_all_day(&short));

        let inverted = Event::new("c", "Broken", start, start - TimeDelta::hours(30));
        assert!(!is_all_day(&inverted));
    }
}
