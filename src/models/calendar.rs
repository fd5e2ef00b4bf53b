//! Weekly timetable grid.
//!
//! A week is a fixed list of teaching days, each split into the same
//! ordered list of one-hour slots. Some slots are tagged non-schedulable
//! (the lunch break): they are never a candidate start and never count
//! toward a session's duration.
//!
//! # Slot indexing
//! Slot indices refer to positions in [`WeekGrid::slots`], break included.
//! With the standard grid, `09:00` is index 0, the `12:00` break is index 3
//! and `16:00` is index 7.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A teaching day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    /// All days in declared (scan) order.
    pub const ALL: [Day; 6] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    /// Weekday index, Monday = 0.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Day name as used on the wire.
    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One slot of the daily grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Start label, e.g. `"09:00"`.
    pub start: String,
    /// End label, e.g. `"10:00"`.
    pub end: String,
    /// Display label.
    pub label: String,
    /// `false` for the break: never scheduled, skipped by windows.
    pub schedulable: bool,
}

impl TimeSlot {
    /// Creates a teaching slot.
    pub fn teaching(start: impl Into<String>, end: impl Into<String>) -> Self {
        let start = start.into();
        let end = end.into();
        Self {
            label: format!("{start}-{end}"),
            start,
            end,
            schedulable: true,
        }
    }

    /// Creates a non-schedulable break slot.
    pub fn break_slot(start: impl Into<String>, end: impl Into<String>) -> Self {
        let start = start.into();
        let end = end.into();
        Self {
            label: format!("{start}-{end} (Break)"),
            start,
            end,
            schedulable: false,
        }
    }
}

/// The week grid: days × slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekGrid {
    /// Teaching days in scan order.
    pub days: Vec<Day>,
    /// Daily slots in chronological order.
    pub slots: Vec<TimeSlot>,
}

impl Default for WeekGrid {
    fn default() -> Self {
        Self::standard()
    }
}

impl WeekGrid {
    /// Monday to Saturday, 09:00-17:00, with the 12:00 lunch break.
    pub fn standard() -> Self {
        Self {
            days: Day::ALL.to_vec(),
            slots: vec![
                TimeSlot::teaching("09:00", "10:00"),
                TimeSlot::teaching("10:00", "11:00"),
                TimeSlot::teaching("11:00", "12:00"),
                TimeSlot::break_slot("12:00", "13:00"),
                TimeSlot::teaching("13:00", "14:00"),
                TimeSlot::teaching("14:00", "15:00"),
                TimeSlot::teaching("15:00", "16:00"),
                TimeSlot::teaching("16:00", "17:00"),
            ],
        }
    }

    /// Returns the slot at `index`.
    pub fn slot(&self, index: usize) -> Option<&TimeSlot> {
        self.slots.get(index)
    }

    /// Index of the slot starting at `start`.
    pub fn slot_index(&self, start: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.start == start)
    }

    /// Whether `index` is a schedulable slot.
    pub fn is_teaching_slot(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|s| s.schedulable)
    }

    /// Schedulable slot indices in chronological order.
    pub fn teaching_slots(&self) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.schedulable)
            .map(|(i, _)| i)
    }

    /// Number of teaching slots per week.
    pub fn teaching_slot_count(&self) -> usize {
        self.days.len() * self.teaching_slots().count()
    }

    /// Position of `day` in the grid's scan order.
    pub fn day_position(&self, day: Day) -> Option<usize> {
        self.days.iter().position(|&d| d == day)
    }

    /// Enumerates the teaching slots covered by a session of `len` slots
    /// starting at `start`.
    ///
    /// Returns `None` when `start` is not a teaching slot, when the window
    /// runs past the end of the day, or when it would cross a break while
    /// `span_break` is `false`. With `span_break` the break is skipped and
    /// the window continues after it.
    pub fn window(&self, start: usize, len: usize, span_break: bool) -> Option<Vec<usize>> {
        if len == 0 || !self.is_teaching_slot(start) {
            return None;
        }

        let mut covered = Vec::with_capacity(len);
        let mut index = start;
        while covered.len() < len {
            let slot = self.slots.get(index)?;
            if slot.schedulable {
                covered.push(index);
            } else if !span_break {
                return None;
            }
            index += 1;
        }
        Some(covered)
    }

    /// Teaching slots between a start label and an end label, inclusive.
    ///
    /// `None` when either label is not on the grid or the end precedes
    /// the start.
    pub fn span(&self, start: &str, end: &str) -> Option<Vec<usize>> {
        let first = self.slot_index(start)?;
        let last = first + self.slots[first..].iter().position(|s| s.end == end)?;
        let covered: Vec<usize> = (first..=last).filter(|&i| self.is_teaching_slot(i)).collect();
        (!covered.is_empty()).then_some(covered)
    }

    /// Start label of a covered window.
    pub fn start_label(&self, window: &[usize]) -> Option<&str> {
        let first = *window.first()?;
        self.slots.get(first).map(|s| s.start.as_str())
    }

    /// End label of a covered window.
    pub fn end_label(&self, window: &[usize]) -> Option<&str> {
        let last = *window.last()?;
        self.slots.get(last).map(|s| s.end.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_grid_shape() {
        let grid = WeekGrid::standard();
        assert_eq!(grid.days.len(), 6);
        assert_eq!(grid.slots.len(), 8);
        assert_eq!(grid.teaching_slots().count(), 7);
        assert_eq!(grid.teaching_slot_count(), 42);
        assert_eq!(grid.slot_index("12:00"), Some(3));
        assert!(!grid.is_teaching_slot(3));
        assert!(grid.is_teaching_slot(0));
        assert!(!grid.is_teaching_slot(8));
    }

    #[test]
    fn test_window_single_slot() {
        let grid = WeekGrid::standard();
        assert_eq!(grid.window(0, 1, false), Some(vec![0]));
        assert_eq!(grid.window(3, 1, false), None);
    }

    #[test]
    fn test_window_crossing_break() {
        let grid = WeekGrid::standard();
        // 11:00 + 2 slots hits the break
        assert_eq!(grid.window(2, 2, false), None);
        assert_eq!(grid.window(2, 2, true), Some(vec![2, 4]));
    }

    #[test]
    fn test_window_past_end_of_day() {
        let grid = WeekGrid::standard();
        assert_eq!(grid.window(7, 2, false), None);
        assert_eq!(grid.window(7, 2, true), None);
        assert_eq!(grid.window(6, 2, false), Some(vec![6, 7]));
    }

    #[test]
    fn test_window_labels() {
        let grid = WeekGrid::standard();
        let w = grid.window(2, 2, true).unwrap();
        assert_eq!(grid.start_label(&w), Some("11:00"));
        assert_eq!(grid.end_label(&w), Some("14:00"));
        assert_eq!(grid.end_label(&[]), None);
    }

    #[test]
    fn test_span_from_labels() {
        let grid = WeekGrid::standard();
        assert_eq!(grid.span("09:00", "10:00"), Some(vec![0]));
        assert_eq!(grid.span("14:00", "16:00"), Some(vec![5, 6]));
        // The break inside a span is not covered
        assert_eq!(grid.span("11:00", "14:00"), Some(vec![2, 4]));
        assert_eq!(grid.span("12:00", "13:00"), None);
        assert_eq!(grid.span("10:00", "10:00"), None);
        assert_eq!(grid.span("08:00", "09:00"), None);
    }

    #[test]
    fn test_day_order() {
        assert_eq!(Day::Monday.index(), 0);
        assert_eq!(Day::Saturday.index(), 5);
        assert!(Day::Tuesday < Day::Friday);
        assert_eq!(Day::Wednesday.to_string(), "Wednesday");
    }
}
