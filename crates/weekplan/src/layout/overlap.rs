//! Side-by-side placement of overlapping events.
//!
//! Events are swept in start order. Each event takes the lowest column not
//! held by an event that is still open when it starts. A group closes when
//! the set of open events drains; at that point every member is stamped with
//! the group's column count so renderers can divide the lane evenly.

use chrono::{NaiveDate, NaiveTime};
use log::{debug, trace};

use weekplan_core::{
    event::Event,
    timeslot::{SLOT_MINUTES, TimeSlotGrid},
};

use super::cell::{CellFlags, LayoutCell};

/// Assigns a `(column, column_count)` pair to each event of one page.
///
/// The resolver never fails. Malformed timestamps are absorbed by a one-slot
/// floor and reported through [`CellFlags`].
///
/// # Examples
///
/// ```
/// # use chrono::NaiveDate;
/// # use weekplan::layout::OverlapResolver;
/// # use weekplan_core::{event::Event, timeslot::TimeSlotGrid};
/// let day = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
/// let at = |h| day.and_hms_opt(h, 0, 0).unwrap();
/// let a = Event::new("a", "Intake", at(9), at(10));
/// let b = Event::new("b", "Review", at(9), at(10));
///
/// let cells = OverlapResolver::new(TimeSlotGrid::standard()).resolve(&[&a, &b], day);
/// assert_eq!(cells[0].column(), 0);
/// assert_eq!(cells[1].column(), 1);
/// assert!(cells.iter().all(|c| c.column_count() == 2));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OverlapResolver<'g> {
    grid: &'g TimeSlotGrid,
}

impl<'g> OverlapResolver<'g> {
    pub fn new(grid: &'g TimeSlotGrid) -> Self {
        Self { grid }
    }

    /// Resolves columns using the time-derived span of each event.
    pub fn resolve(&self, events: &[&Event], date: NaiveDate) -> Vec<LayoutCell> {
        self.resolve_with(events, date, |_, span| span)
    }

    /// Resolves columns using a caller-supplied footprint.
    ///
    /// `footprint` receives the event and its time-derived span and returns
    /// the number of rows its rendered box will occupy. Values below the span
    /// are ignored. Cells are returned in sweep order: start instant, then
    /// event id.
    pub fn resolve_with<F>(&self, events: &[&Event], date: NaiveDate, footprint: F) -> Vec<LayoutCell>
    where
        F: Fn(&Event, usize) -> usize,
    {
        self.resolve_events(events, date, footprint)
            .into_iter()
            .map(|(_, cell)| cell)
            .collect()
    }

    /// Like [`resolve_with`](Self::resolve_with), but keeps each event next
    /// to its cell so callers never look events up by id.
    ///
    /// Events with equal start and id are ordered by end and then title.
    pub fn resolve_events<'e, F>(
        &self,
        events: &[&'e Event],
        date: NaiveDate,
        footprint: F,
    ) -> Vec<(&'e Event, LayoutCell)>
    where
        F: Fn(&Event, usize) -> usize,
    {
        let mut ordered: Vec<&'e Event> = events.to_vec();
        ordered.sort_by(|a, b| {
            a.start()
                .cmp(&b.start())
                .then_with(|| a.id().cmp(b.id()))
                .then_with(|| a.end().cmp(&b.end()))
                .then_with(|| a.title().cmp(b.title()))
        });

        let mut cells: Vec<LayoutCell> = ordered
            .iter()
            .map(|event| {
                let mut cell = self.place(event, date);
                let rows = footprint(event, cell.span());
                let room = self.grid.len().saturating_sub(cell.start_slot()).max(1);
                cell.set_footprint(rows.min(room));
                cell
            })
            .collect();

        let mut open: Vec<usize> = Vec::new();
        let mut group: Vec<usize> = Vec::new();
        let mut max_column = 0;

        for idx in 0..cells.len() {
            let start = cells[idx].start_slot();
            open.retain(|&other| cells[other].rows().end > start);

            if open.is_empty() && !group.is_empty() {
                close_group(&mut cells, &group, max_column);
                group.clear();
                max_column = 0;
            }

            let column = (0..)
                .find(|column| open.iter().all(|&other| cells[other].column() != *column))
                .unwrap_or_default();
            cells[idx].set_column(column);
            trace!(event = cells[idx].event_id().as_str(), column; "Assigned column");

            max_column = max_column.max(column);
            open.push(idx);
            group.push(idx);
        }

        if !group.is_empty() {
            close_group(&mut cells, &group, max_column);
        }

        debug!(date:% = date, cells = cells.len(); "Overlap resolved");
        ordered.into_iter().zip(cells).collect()
    }

    /// Places a single event on the grid without assigning a column.
    pub fn place(&self, event: &Event, date: NaiveDate) -> LayoutCell {
        let midnight = date.and_time(NaiveTime::MIN);
        let start_minute = (event.start() - midnight).num_minutes();
        let mut end_minute = (event.end() - midnight).num_minutes();

        let mut flags = CellFlags {
            degenerate: event.is_degenerate(),
            invalid: event.is_inverted(),
            ..CellFlags::default()
        };
        if flags.degenerate {
            end_minute = start_minute + SLOT_MINUTES as i64;
        }

        let len = self.grid.len() as i64;
        let start = self.grid.floor_offset(start_minute);
        let end = self.grid.ceil_offset(end_minute);

        let (start_slot, span) = if end <= 0 {
            flags.out_of_window = true;
            (0, 1)
        } else if start >= len {
            flags.out_of_window = true;
            (len - 1, 1)
        } else {
            flags.clipped = start < 0 || end > len;
            let first = start.max(0);
            (first, (end.min(len) - first).max(1))
        };

        LayoutCell::new(event.id().clone(), start_slot as usize, span as usize, flags)
    }
}

fn close_group(cells: &mut [LayoutCell], group: &[usize], max_column: usize) {
    for &idx in group {
        cells[idx].set_column_count(max_column + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, TimeDelta};
    use proptest::prelude::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
    }

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        day().and_hms_opt(hour, minute, 0).unwrap()
    }

    fn resolve(events: &[Event]) -> Vec<LayoutCell> {
        let refs: Vec<&Event> = events.iter().collect();
        OverlapResolver::new(TimeSlotGrid::standard()).resolve(&refs, day())
    }

    fn cell<'a>(cells: &'a [LayoutCell], id: &str) -> &'a LayoutCell {
        cells.iter().find(|c| c.event_id().as_str() == id).unwrap()
    }

    #[test]
    fn test_identical_events_get_distinct_columns() {
        let cells = resolve(&[
            Event::new("b", "Second", at(9, 0), at(10, 0)),
            Event::new("a", "First", at(9, 0), at(10, 0)),
        ]);

        assert_eq!(cell(&cells, "a").column(), 0);
        assert_eq!(cell(&cells, "b").column(), 1);
        assert!(cells.iter().all(|c| c.column_count() == 2));
        assert!(cells.iter().all(|c| c.start_slot() == 6 && c.span() == 2));
    }

    #[test]
    fn test_shared_id_keeps_each_event() {
        let morning = Event::new("42", "Morning intake", at(9, 0), at(10, 0));
        let afternoon = Event::new("42", "Afternoon call", at(14, 0), at(15, 0));
        let pairs = OverlapResolver::new(TimeSlotGrid::standard()).resolve_events(
            &[&afternoon, &morning],
            day(),
            |_, span| span,
        );

        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0.title(), "Morning intake");
        assert_eq!(pairs[0].1.start_slot(), 6);
        assert_eq!(pairs[1].0.title(), "Afternoon call");
        assert_eq!(pairs[1].1.start_slot(), 16);
    }

    #[test]
    fn test_transitive_group_shares_column_count() {
        // a overlaps b, b overlaps c, a and c are disjoint
        let cells = resolve(&[
            Event::new("a", "A", at(9, 0), at(10, 0)),
            Event::new("b", "B", at(9, 30), at(11, 0)),
            Event::new("c", "C", at(10, 0), at(11, 0)),
            Event::new("d", "D", at(14, 0), at(15, 0)),
        ]);

        assert_eq!(cell(&cells, "a").column(), 0);
        assert_eq!(cell(&cells, "b").column(), 1);
        // a has closed by 10:00, so c reuses column 0
        assert_eq!(cell(&cells, "c").column(), 0);
        for id in ["a", "b", "c"] {
            assert_eq!(cell(&cells, id).column_count(), 2);
        }
        assert_eq!(cell(&cells, "d").column(), 0);
        assert_eq!(cell(&cells, "d").column_count(), 1);
    }

    #[test]
    fn test_back_to_back_events_do_not_overlap() {
        let cells = resolve(&[
            Event::new("a", "A", at(9, 0), at(10, 0)),
            Event::new("b", "B", at(10, 0), at(11, 0)),
        ]);
        assert!(cells.iter().all(|c| c.column() == 0 && c.column_count() == 1));
    }

    #[test]
    fn test_inverted_event_is_flagged_and_floored() {
        let cells = resolve(&[
            Event::new("bad", "Bad", at(10, 0), at(9, 0)),
            Event::new("ok", "Ok", at(10, 0), at(11, 0)),
        ]);

        let bad = cell(&cells, "bad");
        assert!(bad.flags().invalid);
        assert!(bad.flags().degenerate);
        assert_eq!(bad.span(), 1);
        assert_eq!(bad.start_slot(), 8);

        let ok = cell(&cells, "ok");
        assert!(!ok.flags().any());
        assert_eq!(ok.span(), 2);
        assert_ne!(bad.column(), ok.column());
    }

    #[test]
    fn test_zero_duration_event() {
        let cells = resolve(&[Event::new("z", "Zero", at(12, 0), at(12, 0))]);
        let zero = cell(&cells, "z");
        assert!(zero.flags().degenerate);
        assert!(!zero.flags().invalid);
        assert_eq!(zero.span(), 1);
    }

    #[test]
    fn test_window_clamping() {
        let cells = resolve(&[
            Event::new("early", "Early", at(4, 0), at(5, 0)),
            Event::new("dawn", "Dawn", at(5, 0), at(7, 0)),
            Event::new(
                "late",
                "Late",
                at(23, 0),
                day().succ_opt().unwrap().and_hms_opt(1, 0, 0).unwrap(),
            ),
        ]);

        let early = cell(&cells, "early");
        assert!(early.flags().out_of_window);
        assert_eq!((early.start_slot(), early.span()), (0, 1));

        let dawn = cell(&cells, "dawn");
        assert!(dawn.flags().clipped);
        assert_eq!((dawn.start_slot(), dawn.span()), (0, 2));

        let late = cell(&cells, "late");
        assert!(late.flags().clipped);
        assert_eq!((late.start_slot(), late.span()), (34, 2));
    }

    #[test]
    fn test_footprint_widens_overlap() {
        let a = Event::new("a", "A", at(9, 0), at(9, 30));
        let b = Event::new("b", "B", at(9, 30), at(10, 0));
        let resolver = OverlapResolver::new(TimeSlotGrid::standard());

        let plain = resolver.resolve(&[&a, &b], day());
        assert!(plain.iter().all(|c| c.column_count() == 1));

        let expanded = resolver.resolve_with(&[&a, &b], day(), |event, span| {
            if event.id().as_str() == "a" { 3 } else { span }
        });
        assert_eq!(expanded[0].footprint(), 3);
        assert_eq!(expanded[1].column(), 1);
        assert!(expanded.iter().all(|c| c.column_count() == 2));
    }

    fn event_strategy() -> impl Strategy<Value = (u32, i64, u8)> {
        (0u32..24 * 4, -60i64..300, 0u8..4)
    }

    fn build(specs: &[(u32, i64, u8)]) -> Vec<Event> {
        specs
            .iter()
            .enumerate()
            .map(|(i, &(quarter, minutes, _))| {
                let start =
                    day().and_hms_opt(0, 0, 0).unwrap() + TimeDelta::minutes(quarter as i64 * 15);
                Event::new(format!("e{i:03}"), "Event", start, start + TimeDelta::minutes(minutes))
            })
            .collect()
    }

    fn check_no_collision(cells: &[LayoutCell]) {
        for (i, a) in cells.iter().enumerate() {
            for b in &cells[i + 1..] {
                let rows_overlap = a.rows().start < b.rows().end && b.rows().start < a.rows().end;
                if rows_overlap {
                    assert_ne!(a.column(), b.column(), "{a:?} collides with {b:?}");
                    assert_eq!(a.column_count(), b.column_count());
                }
                assert!(a.column() < a.column_count());
            }
        }
    }

    proptest! {
        #[test]
        fn prop_no_collision(specs in prop::collection::vec(event_strategy(), 0..24)) {
            let events = build(&specs);
            let refs: Vec<&Event> = events.iter().collect();
            let sizes: Vec<usize> = specs.iter().map(|s| s.2 as usize).collect();
            let cells = OverlapResolver::new(TimeSlotGrid::standard()).resolve_with(&refs, day(), |event, span| {
                let idx: usize = event.id().as_str()[1..].parse().unwrap();
                span + sizes[idx]
            });
            prop_assert_eq!(cells.len(), events.len());
            check_no_collision(&cells);
        }

        #[test]
        fn prop_resolution_is_deterministic(specs in prop::collection::vec(event_strategy(), 0..24)) {
            let events = build(&specs);
            let forward: Vec<&Event> = events.iter().collect();
            let reversed: Vec<&Event> = events.iter().rev().collect();
            let resolver = OverlapResolver::new(TimeSlotGrid::standard());
            prop_assert_eq!(resolver.resolve(&forward, day()), resolver.resolve(&reversed, day()));
        }
    }
}
