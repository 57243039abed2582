//! Content-driven event box sizing.
//!
//! Heights are measured in slot units so the same rules apply to every
//! canvas. A box is never shorter than its time-derived span; notes and
//! action items only ever add height.

use log::trace;

use weekplan_core::event::Event;

/// Truncation marker appended to cut lines.
pub const ELLIPSIS: char = '…';

/// How much content a box shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SizingMode {
    /// Title column plus notes and action-item columns.
    #[default]
    Detailed,
    /// Time-derived height and a single column; used by the weekly overview.
    Compact,
}

/// Tunable allowances, in slot units and characters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingRules {
    header_allowance: f32,
    line_allowance: f32,
    max_line_chars: usize,
}

impl SizingRules {
    pub fn new(header_allowance: f32, line_allowance: f32, max_line_chars: usize) -> Self {
        Self {
            header_allowance: header_allowance.max(0.0),
            line_allowance: line_allowance.max(0.0),
            max_line_chars: max_line_chars.max(1),
        }
    }

    pub fn header_allowance(&self) -> f32 {
        self.header_allowance
    }

    pub fn line_allowance(&self) -> f32 {
        self.line_allowance
    }

    pub fn max_line_chars(&self) -> usize {
        self.max_line_chars
    }
}

impl Default for SizingRules {
    fn default() -> Self {
        Self::new(0.5, 0.5, 48)
    }
}

/// Which optional section a content column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Notes,
    ActionItems,
}

impl SectionKind {
    pub fn header(self) -> &'static str {
        match self {
            Self::Notes => "Event Notes",
            Self::ActionItems => "Action Items",
        }
    }
}

/// One optional content column of an event box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxSection {
    kind: SectionKind,
    lines: Vec<String>,
}

impl BoxSection {
    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    pub fn header(&self) -> &'static str {
        self.kind.header()
    }

    /// Lines already cut to the character budget.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Computed size and content of one event box.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSize {
    base_slots: usize,
    height_slots: f32,
    width_fraction: f32,
    sections: Vec<BoxSection>,
    truncated_lines: usize,
}

impl BoxSize {
    /// Time-derived height in slots.
    pub fn base_slots(&self) -> usize {
        self.base_slots
    }

    /// Total height in slots including content allowances.
    pub fn height_slots(&self) -> f32 {
        self.height_slots
    }

    /// Whole rows the box occupies.
    pub fn footprint(&self) -> usize {
        (self.height_slots.ceil() as usize).max(self.base_slots)
    }

    /// Share of the lane given to this box before the gutter is removed.
    pub fn width_fraction(&self) -> f32 {
        self.width_fraction
    }

    /// Internal columns: 1, 2 or 3.
    pub fn internal_columns(&self) -> usize {
        1 + self.sections.len()
    }

    pub fn sections(&self) -> &[BoxSection] {
        &self.sections
    }

    /// Number of content lines cut at the character budget.
    pub fn truncated_lines(&self) -> usize {
        self.truncated_lines
    }
}

/// Computes box dimensions from duration and content.
///
/// # Examples
///
/// ```
/// # use chrono::NaiveDate;
/// # use weekplan::layout::ContentSizer;
/// # use weekplan_core::event::Event;
/// let day = NaiveDate::from_ymd_opt(2025, 7, 14).unwrap();
/// let event = Event::new(
///     "a",
///     "Session",
///     day.and_hms_opt(9, 0, 0).unwrap(),
///     day.and_hms_opt(10, 0, 0).unwrap(),
/// )
/// .with_notes(["Bring intake form"]);
///
/// let size = ContentSizer::default().size(&event, 2, 1);
/// assert_eq!(size.base_slots(), 2);
/// assert_eq!(size.height_slots(), 3.0);
/// assert_eq!(size.internal_columns(), 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentSizer {
    rules: SizingRules,
    mode: SizingMode,
}

impl ContentSizer {
    pub fn new(rules: SizingRules, mode: SizingMode) -> Self {
        Self { rules, mode }
    }

    pub fn rules(&self) -> &SizingRules {
        &self.rules
    }

    pub fn mode(&self) -> SizingMode {
        self.mode
    }

    /// Sizes `event` given its slot span and the column count of its group.
    pub fn size(&self, event: &Event, span: usize, column_count: usize) -> BoxSize {
        let base_slots = span.max(1);
        let width_fraction = 1.0 / column_count.max(1) as f32;

        let mut sections = Vec::new();
        let mut truncated_lines = 0;
        let mut height_slots = base_slots as f32;

        if self.mode == SizingMode::Detailed {
            for (kind, lines) in [
                (SectionKind::Notes, event.notes()),
                (SectionKind::ActionItems, event.action_items()),
            ] {
                if lines.is_empty() {
                    continue;
                }
                height_slots += self.rules.header_allowance
                    + self.rules.line_allowance * lines.len() as f32;

                let lines = lines
                    .iter()
                    .map(|line| {
                        let (line, cut) = self.truncate(line);
                        truncated_lines += usize::from(cut);
                        line
                    })
                    .collect();
                sections.push(BoxSection { kind, lines });
            }
        }

        trace!(
            event = event.id().as_str(),
            base_slots,
            height_slots,
            columns = 1 + sections.len();
            "Sized event box"
        );

        BoxSize {
            base_slots,
            height_slots,
            width_fraction,
            sections,
            truncated_lines,
        }
    }

    /// Rows the box for `event` will occupy, for overlap resolution.
    pub fn footprint(&self, event: &Event, span: usize) -> usize {
        self.size(event, span, 1).footprint()
    }

    /// Cuts `line` to the character budget, appending an ellipsis when cut.
    ///
    /// Returns the line and whether it was cut.
    pub fn truncate(&self, line: &str) -> (String, bool) {
        truncate_chars(line, self.rules.max_line_chars)
    }
}

/// Cuts `text` to at most `max_chars` characters including the ellipsis.
pub fn truncate_chars(text: &str, max_chars: usize) -> (String, bool) {
    if text.chars().count() <= max_chars {
        return (text.to_string(), false);
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push(ELLIPSIS);
    (cut, true)
}
