//! The shared time axis.
//!
//! Every planner view lays events against the same sequence of half-hour
//! slots. The standard window runs from 06:00 to midnight, which gives 36
//! slots labelled `06:00` through `23:30`.
//!
//! Times are handled as minutes since midnight so the exclusive window end
//! (24:00) is representable.

use std::sync::OnceLock;

use chrono::{NaiveTime, Timelike};
use thiserror::Error;

/// Length of one slot in minutes.
pub const SLOT_MINUTES: u32 = 30;

/// Number of slots in the standard window.
pub const SLOT_COUNT: usize = 36;

/// First minute of the standard window (06:00).
pub const STANDARD_START_MINUTE: u32 = 6 * 60;

/// Exclusive end minute of the standard window (24:00).
pub const STANDARD_END_MINUTE: u32 = 24 * 60;

const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("time window is empty or decreasing: {start} to {end}")]
    EmptyWindow { start: u32, end: u32 },

    #[error("time window bound {0} is not aligned to 30 minutes")]
    Misaligned(u32),

    #[error("time window end {0} lies past midnight")]
    PastMidnight(u32),
}

/// One half-hour interval of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlot {
    index: usize,
    start_minute: u32,
    label: String,
}

impl TimeSlot {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Minutes since midnight at which the slot begins.
    pub fn start_minute(&self) -> u32 {
        self.start_minute
    }

    /// Clock label in `HH:MM` form.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// `true` for slots that begin on the hour. Renderers give these rows more
    /// visual weight.
    pub fn is_hour_boundary(&self) -> bool {
        self.start_minute % 60 == 0
    }
}

/// Where a wall-clock time falls relative to the grid window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPosition {
    BeforeWindow,
    Within(usize),
    AfterWindow,
}

/// An ordered, gap-free run of half-hour slots.
///
/// # Examples
///
/// ```
/// # use chrono::NaiveTime;
/// # use weekplan_core::timeslot::{SlotPosition, TimeSlotGrid};
/// let grid = TimeSlotGrid::standard();
/// assert_eq!(grid.len(), 36);
/// assert_eq!(grid.slots()[0].label(), "06:00");
/// assert_eq!(grid.slots()[35].label(), "23:30");
///
/// let nine = NaiveTime::from_hms_opt(9, 15, 0).unwrap();
/// assert_eq!(grid.slot_at(nine), SlotPosition::Within(6));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSlotGrid {
    start_minute: u32,
    slots: Vec<TimeSlot>,
}

impl TimeSlotGrid {
    /// The process-wide 06:00-24:00 grid.
    pub fn standard() -> &'static TimeSlotGrid {
        static STANDARD: OnceLock<TimeSlotGrid> = OnceLock::new();
        STANDARD.get_or_init(|| Self::build(STANDARD_START_MINUTE, STANDARD_END_MINUTE))
    }

    /// Creates a grid covering `[start_minute, end_minute)`.
    ///
    /// Both bounds are minutes since midnight and must be multiples of
    /// [`SLOT_MINUTES`]; `end_minute` may be 1440 (midnight).
    ///
    /// # Errors
    ///
    /// Returns [`GridError`] when the window would be empty, decreasing,
    /// misaligned, or extend past midnight.
    pub fn new(start_minute: u32, end_minute: u32) -> Result<Self, GridError> {
        if end_minute > MINUTES_PER_DAY {
            return Err(GridError::PastMidnight(end_minute));
        }
        if end_minute <= start_minute {
            return Err(GridError::EmptyWindow {
                start: start_minute,
                end: end_minute,
            });
        }
        for bound in [start_minute, end_minute] {
            if bound % SLOT_MINUTES != 0 {
                return Err(GridError::Misaligned(bound));
            }
        }

        Ok(Self::build(start_minute, end_minute))
    }

    fn build(start_minute: u32, end_minute: u32) -> Self {
        let slots = (start_minute..end_minute)
            .step_by(SLOT_MINUTES as usize)
            .enumerate()
            .map(|(index, minute)| TimeSlot {
                index,
                start_minute: minute,
                label: format!("{:02}:{:02}", minute / 60, minute % 60),
            })
            .collect();

        Self {
            start_minute,
            slots,
        }
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&TimeSlot> {
        self.slots.get(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn start_minute(&self) -> u32 {
        self.start_minute
    }

    /// Exclusive end of the window in minutes since midnight.
    pub fn end_minute(&self) -> u32 {
        self.start_minute + self.window_minutes()
    }

    /// Total length of the window in minutes.
    pub fn window_minutes(&self) -> u32 {
        self.slots.len() as u32 * SLOT_MINUTES
    }

    /// Locates the slot containing `time`.
    pub fn slot_at(&self, time: NaiveTime) -> SlotPosition {
        let minute = minute_of(time) as i64;
        match self.floor_offset(minute) {
            offset if offset < 0 => SlotPosition::BeforeWindow,
            offset if offset as usize >= self.len() => SlotPosition::AfterWindow,
            offset => SlotPosition::Within(offset as usize),
        }
    }

    /// Exclusive slot index at which an interval ending at `time` stops,
    /// rounded up and clamped to `0..=len()`.
    pub fn end_slot(&self, time: NaiveTime) -> usize {
        let offset = self.ceil_offset(minute_of(time) as i64);
        offset.clamp(0, self.len() as i64) as usize
    }

    /// Slot offset of `minute` from the window start, rounded down. Negative
    /// before the window and `>= len()` after it.
    pub fn floor_offset(&self, minute: i64) -> i64 {
        (minute - self.start_minute as i64).div_euclid(SLOT_MINUTES as i64)
    }

    /// Slot offset of `minute` from the window start, rounded up.
    pub fn ceil_offset(&self, minute: i64) -> i64 {
        let relative = minute - self.start_minute as i64;
        let slot = SLOT_MINUTES as i64;
        relative.div_euclid(slot) + i64::from(relative.rem_euclid(slot) != 0)
    }
}

fn minute_of(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_standard_grid_shape() {
        let grid = TimeSlotGrid::standard();
        assert_eq!(grid.len(), SLOT_COUNT);
        assert_eq!(grid.start_minute(), 360);
        assert_eq!(grid.end_minute(), 1440);
        assert_eq!(grid.window_minutes(), 18 * 60);

        let labels: Vec<_> = grid.slots().iter().map(TimeSlot::label).collect();
        assert_eq!(labels.first(), Some(&"06:00"));
        assert_eq!(labels.get(1), Some(&"06:30"));
        assert_eq!(labels.last(), Some(&"23:30"));
    }

    #[test]
    fn test_standard_grid_is_shared() {
        assert!(std::ptr::eq(
            TimeSlotGrid::standard(),
            TimeSlotGrid::standard()
        ));
    }

    #[test]
    fn test_slots_are_gap_free_and_increasing() {
        let grid = TimeSlotGrid::standard();
        for pair in grid.slots().windows(2) {
            assert_eq!(pair[1].start_minute() - pair[0].start_minute(), SLOT_MINUTES);
            assert_eq!(pair[1].index(), pair[0].index() + 1);
        }
    }

    #[test]
    fn test_hour_boundaries_alternate() {
        let grid = TimeSlotGrid::standard();
        assert!(grid.slots()[0].is_hour_boundary());
        assert!(!grid.slots()[1].is_hour_boundary());
        let hours = grid.slots().iter().filter(|s| s.is_hour_boundary()).count();
        assert_eq!(hours, 18);
    }

    #[test]
    fn test_slot_at() {
        let grid = TimeSlotGrid::standard();
        assert_eq!(grid.slot_at(time(5, 59)), SlotPosition::BeforeWindow);
        assert_eq!(grid.slot_at(time(6, 0)), SlotPosition::Within(0));
        assert_eq!(grid.slot_at(time(6, 29)), SlotPosition::Within(0));
        assert_eq!(grid.slot_at(time(23, 30)), SlotPosition::Within(35));
        assert_eq!(grid.slot_at(time(23, 59)), SlotPosition::Within(35));
    }

    #[test]
    fn test_end_slot_rounds_up() {
        let grid = TimeSlotGrid::standard();
        assert_eq!(grid.end_slot(time(10, 0)), 8);
        assert_eq!(grid.end_slot(time(10, 1)), 9);
        assert_eq!(grid.end_slot(time(4, 0)), 0);
    }

    #[test]
    fn test_offsets_outside_window() {
        let grid = TimeSlotGrid::standard();
        assert_eq!(grid.floor_offset(300), -2);
        assert_eq!(grid.ceil_offset(1500), 38);
        assert_eq!(grid.ceil_offset(345), 0);
    }

    #[test]
    fn test_custom_grid() {
        let grid = TimeSlotGrid::new(8 * 60, 12 * 60).unwrap();
        assert_eq!(grid.len(), 8);
        assert_eq!(grid.slots()[0].label(), "08:00");
        assert_eq!(grid.slot_at(time(12, 0)), SlotPosition::AfterWindow);
    }

    #[test]
    fn test_invalid_windows() {
        assert_eq!(
            TimeSlotGrid::new(600, 600),
            Err(GridError::EmptyWindow { start: 600, end: 600 })
        );
        assert_eq!(
            TimeSlotGrid::new(700, 600),
            Err(GridError::EmptyWindow { start: 700, end: 600 })
        );
        assert_eq!(TimeSlotGrid::new(365, 600), Err(GridError::Misaligned(365)));
        assert_eq!(
            TimeSlotGrid::new(360, 1470),
            Err(GridError::PastMidnight(1470))
        );
    }
}
