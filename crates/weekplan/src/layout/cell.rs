//! Result of resolving one event against the time grid.

use std::ops::Range;

use weekplan_core::event::EventId;

/// Anomalies detected while placing an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CellFlags {
    /// End is not after start.
    pub degenerate: bool,
    /// End lies before start.
    pub invalid: bool,
    /// The event extends past one edge of the grid window.
    pub clipped: bool,
    /// The event lies entirely outside the grid window.
    pub out_of_window: bool,
}

impl CellFlags {
    /// `true` if any flag is set.
    pub fn any(&self) -> bool {
        self.degenerate || self.invalid || self.clipped || self.out_of_window
    }
}

/// An event placed on the slot grid.
///
/// `span` is derived from the event's duration only. `footprint` is the
/// number of rows the rendered box occupies once content sizing is taken into
/// account; overlap is resolved on the footprint so two boxes that share a
/// row never share a column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LayoutCell {
    event_id: EventId,
    start_slot: usize,
    span: usize,
    footprint: usize,
    column: usize,
    column_count: usize,
    lane: usize,
    flags: CellFlags,
}

impl LayoutCell {
    pub(crate) fn new(event_id: EventId, start_slot: usize, span: usize, flags: CellFlags) -> Self {
        let span = span.max(1);
        Self {
            event_id,
            start_slot,
            span,
            footprint: span,
            column: 0,
            column_count: 1,
            lane: 0,
            flags,
        }
    }

    pub(crate) fn set_footprint(&mut self, footprint: usize) {
        self.footprint = footprint.max(self.span);
    }

    pub(crate) fn set_column(&mut self, column: usize) {
        self.column = column;
    }

    pub(crate) fn set_column_count(&mut self, count: usize) {
        self.column_count = count.max(1);
    }

    pub(crate) fn set_lane(&mut self, lane: usize) {
        self.lane = lane;
    }

    pub fn event_id(&self) -> &EventId {
        &self.event_id
    }

    pub fn start_slot(&self) -> usize {
        self.start_slot
    }

    /// Slot span derived from the duration, never less than one.
    pub fn span(&self) -> usize {
        self.span
    }

    /// Rows occupied by the rendered box, never less than `span`.
    pub fn footprint(&self) -> usize {
        self.footprint
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Number of concurrent columns in this cell's overlap group.
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Day lane on the weekly page; always 0 on daily pages.
    pub fn lane(&self) -> usize {
        self.lane
    }

    pub fn flags(&self) -> CellFlags {
        self.flags
    }

    /// Rows covered by the rendered box.
    pub fn rows(&self) -> Range<usize> {
        self.start_slot..self.start_slot + self.footprint
    }

    /// Columns covered by the rendered box.
    pub fn columns(&self) -> Range<usize> {
        self.column..self.column + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_floor() {
        let cell = LayoutCell::new(EventId::new("a"), 4, 0, CellFlags::default());
        assert_eq!(cell.span(), 1);
        assert_eq!(cell.footprint(), 1);
        assert_eq!(cell.rows(), 4..5);
    }

    #[test]
    fn test_footprint_never_below_span() {
        let mut cell = LayoutCell::new(EventId::new("a"), 0, 3, CellFlags::default());
        cell.set_footprint(1);
        assert_eq!(cell.footprint(), 3);
        cell.set_footprint(5);
        assert_eq!(cell.rows(), 0..5);
    }

    #[test]
    fn test_flags_any() {
        assert!(!CellFlags::default().any());
        let flags = CellFlags {
            clipped: true,
            ..CellFlags::default()
        };
        assert!(flags.any());
    }
}
