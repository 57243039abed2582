//! Per-day appointment statistics shown in page headers.

use chrono::{NaiveDate, NaiveTime};

use weekplan_core::{event::Event, timeslot::TimeSlotGrid};

use crate::layout::LayoutCell;

/// Slots that start before this minute of the day are early-morning time.
const EARLY_MORNING_END: u32 = 7 * 60 + 30;

/// How an unoccupied slot is shaded in the time column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreeSlot {
    EarlyMorning,
    Open,
}

impl FreeSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EarlyMorning => "early-morning",
            Self::Open => "free",
        }
    }
}

/// Appointment totals for one day, measured against the grid window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyStats {
    date: NaiveDate,
    appointments: usize,
    scheduled_minutes: i64,
    window_minutes: i64,
    free: Vec<Option<FreeSlot>>,
}

impl DailyStats {
    /// Computes statistics for the laid-out timed events of `date`.
    ///
    /// Every event counts as an appointment. Scheduled time is the part of
    /// each event that falls inside the grid window; canceled and degenerate
    /// events add none. A slot is free when no cell's time span covers it.
    /// Canceled events still occupy their slots; cells pushed to the grid
    /// edge because they lie outside the window do not.
    pub fn compute(date: NaiveDate, placed: &[(&Event, LayoutCell)], grid: &TimeSlotGrid) -> Self {
        let midnight = date.and_time(NaiveTime::MIN);
        let window_start = grid.start_minute() as i64;
        let window_end = grid.end_minute() as i64;

        let scheduled_minutes = placed
            .iter()
            .map(|(event, _)| *event)
            .filter(|event| !event.is_canceled() && !event.is_degenerate())
            .map(|event| {
                let start = (event.start() - midnight).num_minutes().max(window_start);
                let end = (event.end() - midnight).num_minutes().min(window_end);
                (end - start).max(0)
            })
            .sum::<i64>();

        let mut occupied = vec![false; grid.len()];
        for (_, cell) in placed.iter().filter(|(_, cell)| !cell.flags().out_of_window) {
            let end = (cell.start_slot() + cell.span()).min(occupied.len());
            for slot in occupied.iter_mut().take(end).skip(cell.start_slot()) {
                *slot = true;
            }
        }
        let free = occupied
            .iter()
            .enumerate()
            .map(|(index, &taken)| {
                if taken {
                    None
                } else if grid
                    .slot(index)
                    .is_some_and(|slot| slot.start_minute() < EARLY_MORNING_END)
                {
                    Some(FreeSlot::EarlyMorning)
                } else {
                    Some(FreeSlot::Open)
                }
            })
            .collect();

        Self {
            date,
            appointments: placed.len(),
            scheduled_minutes: scheduled_minutes.min(grid.window_minutes() as i64),
            window_minutes: grid.window_minutes() as i64,
            free,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn appointments(&self) -> usize {
        self.appointments
    }

    pub fn scheduled_hours(&self) -> f32 {
        self.scheduled_minutes as f32 / 60.0
    }

    pub fn available_hours(&self) -> f32 {
        (self.window_minutes - self.scheduled_minutes) as f32 / 60.0
    }

    /// Share of the window left unscheduled, 0 to 100.
    pub fn free_percent(&self) -> f32 {
        if self.window_minutes == 0 {
            return 0.0;
        }
        (self.window_minutes - self.scheduled_minutes) as f32 * 100.0 / self.window_minutes as f32
    }

    /// Shading of slot `index`, or `None` if an event covers it.
    pub fn free_slot(&self, index: usize) -> Option<FreeSlot> {
        self.free.get(index).copied().flatten()
    }

    /// Indices of every unoccupied slot.
    pub fn free_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.free
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|_| index))
    }

    /// One-line header summary, e.g. `3 appointments · 2.5h scheduled · 15.5h free (86%)`.
    pub fn summary(&self) -> String {
        let noun = if self.appointments == 1 {
            "appointment"
        } else {
            "appointments"
        };
        format!(
            "{} {noun} · {:.1}h scheduled · {:.1}h free ({:.0}%)",
            self.appointments,
            self.scheduled_hours(),
            self.available_hours(),
            self.free_percent()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use weekplan_core::event::EventStatus;

    use crate::layout::OverlapResolver;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
    }

    fn event(id: &str, from: (u32, u32), to: (u32, u32)) -> Event {
        Event::new(
            id,
            "Session",
            day().and_hms_opt(from.0, from.1, 0).unwrap(),
            day().and_hms_opt(to.0, to.1, 0).unwrap(),
        )
    }

    fn stats_for(events: &[Event]) -> DailyStats {
        let grid = TimeSlotGrid::standard();
        let refs: Vec<&Event> = events.iter().collect();
        let placed = OverlapResolver::new(grid).resolve_events(&refs, day(), |_, span| span);
        DailyStats::compute(day(), &placed, grid)
    }

    #[test]
    fn test_empty_day_is_fully_free() {
        let stats = stats_for(&[]);
        assert_eq!(stats.appointments(), 0);
        assert!(approx_eq!(f32, stats.available_hours(), 18.0));
        assert!(approx_eq!(f32, stats.free_percent(), 100.0));
        assert_eq!(stats.free_slots().count(), 36);
    }

    #[test]
    fn test_canceled_time_is_not_scheduled() {
        let stats = stats_for(&[
            event("a", (9, 0), (10, 30)),
            event("b", (11, 0), (12, 0)).with_status(EventStatus::Canceled),
        ]);

        assert_eq!(stats.appointments(), 2);
        assert!(approx_eq!(f32, stats.scheduled_hours(), 1.5));
        assert!(approx_eq!(f32, stats.available_hours(), 16.5));
    }

    #[test]
    fn test_time_outside_window_is_ignored() {
        let stats = stats_for(&[event("a", (5, 0), (7, 0)), event("b", (10, 0), (9, 0))]);
        assert!(approx_eq!(f32, stats.scheduled_hours(), 1.0));
    }

    #[test]
    fn test_free_slots_follow_cells() {
        let stats = stats_for(&[
            event("a", (9, 0), (10, 0)),
            event("b", (11, 0), (11, 30)).with_status(EventStatus::Canceled),
            event("c", (3, 0), (4, 0)),
        ]);

        // slots before 07:30 are early morning
        assert_eq!(stats.free_slot(0), Some(FreeSlot::EarlyMorning));
        assert_eq!(stats.free_slot(2), Some(FreeSlot::EarlyMorning));
        assert_eq!(stats.free_slot(3), Some(FreeSlot::Open));

        assert_eq!(stats.free_slot(6), None);
        assert_eq!(stats.free_slot(7), None);
        assert_eq!(stats.free_slot(8), Some(FreeSlot::Open));
        assert_eq!(stats.free_slot(10), None);
        assert_eq!(stats.free_slots().count(), 33);
        assert_eq!(stats.free_slot(36), None);
    }

    #[test]
    fn test_summary() {
        let stats = stats_for(&[event("a", (9, 0), (10, 0))]);
        assert_eq!(
            stats.summary(),
            "1 appointment · 1.0h scheduled · 17.0h free (94%)"
        );
    }
}
