//! Resource occupancy tracking.
//!
//! For each resource kind, a map from resource id to the set of
//! (day, slot) cells where it is busy. Pure set bookkeeping: occupying a
//! busy cell or releasing a free one is a no-op.
//!
//! A single tracker serves both the bulk generator and the incremental
//! scheduler. Seed it from committed entries to generate onto an existing
//! timetable, or start empty for a full rebuild.

use std::collections::{HashMap, HashSet};
use std::fmt;

use log::warn;
use serde::Serialize;

use crate::models::{Audience, Day, TimetableEntry, WeekGrid};

/// Kind of resource whose time is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceKind {
    Faculty,
    Room,
    Division,
    Batch,
}

/// A (day, slot index) cell of the week grid.
pub type Cell = (Day, usize);

/// Busy cells per resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccupancyTracker {
    busy: HashMap<ResourceKind, HashMap<String, HashSet<Cell>>>,
}

impl OccupancyTracker {
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracker with every committed entry's resources occupied.
    ///
    /// Cells come from [`TimetableEntry::covered_slots`], so entries whose
    /// slot indices disagree with their labels are occupied by label.
    pub fn seeded<'a>(grid: &WeekGrid, entries: impl IntoIterator<Item = &'a TimetableEntry>) -> Self {
        let mut tracker = Self::new();
        for entry in entries {
            let slots = entry.covered_slots(grid);
            if slots != entry.slots {
                warn!(
                    "Entry {} covers {:?} by its labels {}-{} but records {:?}",
                    entry.id, slots, entry.start_time, entry.end_time, entry.slots
                );
            }
            if slots.is_empty() {
                warn!("Entry {} occupies no slot on the grid", entry.id);
            }
            tracker.occupy_window(&entry.faculty.id, &entry.room.id, entry.audience(), entry.day, &slots);
        }
        tracker
    }

    /// Whether the resource is free at (day, slot).
    pub fn is_free(&self, kind: ResourceKind, id: &str, day: Day, slot: usize) -> bool {
        !self
            .busy
            .get(&kind)
            .and_then(|by_id| by_id.get(id))
            .is_some_and(|cells| cells.contains(&(day, slot)))
    }

    /// Marks the resource busy at (day, slot).
    pub fn occupy(&mut self, kind: ResourceKind, id: &str, day: Day, slot: usize) {
        self.busy
            .entry(kind)
            .or_default()
            .entry(id.to_string())
            .or_default()
            .insert((day, slot));
    }

    /// Marks the resource free at (day, slot).
    pub fn release(&mut self, kind: ResourceKind, id: &str, day: Day, slot: usize) {
        let Some(by_id) = self.busy.get_mut(&kind) else {
            return;
        };
        if let Some(cells) = by_id.get_mut(id) {
            cells.remove(&(day, slot));
            if cells.is_empty() {
                by_id.remove(id);
            }
        }
        // Empty maps would break equality with a never-touched tracker
        if by_id.is_empty() {
            self.busy.remove(&kind);
        }
    }

    /// Whether faculty, room and audience are all free on every slot.
    pub fn is_window_free(
        &self,
        faculty_id: &str,
        room_id: &str,
        audience: Audience<'_>,
        day: Day,
        slots: &[usize],
    ) -> bool {
        let (audience_kind, audience_id) = split(audience);
        slots.iter().all(|&slot| {
            self.is_free(ResourceKind::Faculty, faculty_id, day, slot)
                && self.is_free(ResourceKind::Room, room_id, day, slot)
                && self.is_free(audience_kind, audience_id, day, slot)
        })
    }

    /// Occupies faculty, room and audience on every slot.
    pub fn occupy_window(
        &mut self,
        faculty_id: &str,
        room_id: &str,
        audience: Audience<'_>,
        day: Day,
        slots: &[usize],
    ) {
        let (audience_kind, audience_id) = split(audience);
        for &slot in slots {
            self.occupy(ResourceKind::Faculty, faculty_id, day, slot);
            self.occupy(ResourceKind::Room, room_id, day, slot);
            self.occupy(audience_kind, audience_id, day, slot);
        }
    }

    /// Occupies everything an entry uses.
    pub fn occupy_entry(&mut self, entry: &TimetableEntry) {
        self.occupy_window(
            &entry.faculty.id,
            &entry.room.id,
            entry.audience(),
            entry.day,
            &entry.slots,
        );
    }

    /// Releases faculty, room and audience on every slot.
    pub fn release_window(
        &mut self,
        faculty_id: &str,
        room_id: &str,
        audience: Audience<'_>,
        day: Day,
        slots: &[usize],
    ) {
        let (audience_kind, audience_id) = split(audience);
        for &slot in slots {
            self.release(ResourceKind::Faculty, faculty_id, day, slot);
            self.release(ResourceKind::Room, room_id, day, slot);
            self.release(audience_kind, audience_id, day, slot);
        }
    }

    /// Busy cells of one resource.
    pub fn busy_cells(&self, kind: ResourceKind, id: &str) -> Vec<Cell> {
        let mut cells: Vec<Cell> = self
            .busy
            .get(&kind)
            .and_then(|by_id| by_id.get(id))
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default();
        cells.sort();
        cells
    }

    /// Removes every busy mark.
    pub fn clear(&mut self) {
        self.busy.clear();
    }

    /// Whether nothing is busy.
    pub fn is_empty(&self) -> bool {
        self.busy.is_empty()
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceKind::Faculty => "Faculty",
            ResourceKind::Room => "Room",
            ResourceKind::Division => "Division",
            ResourceKind::Batch => "Batch",
        };
        f.write_str(s)
    }
}

fn split(audience: Audience<'_>) -> (ResourceKind, &str) {
    match audience {
        Audience::Division(id) => (ResourceKind::Division, id),
        Audience::Batch(id) => (ResourceKind::Batch, id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupy_and_is_free() {
        let mut t = OccupancyTracker::new();
        assert!(t.is_free(ResourceKind::Room, "R1", Day::Monday, 0));
        t.occupy(ResourceKind::Room, "R1", Day::Monday, 0);
        assert!(!t.is_free(ResourceKind::Room, "R1", Day::Monday, 0));
        // Other kinds with the same id are independent
        assert!(t.is_free(ResourceKind::Faculty, "R1", Day::Monday, 0));
        assert!(t.is_free(ResourceKind::Room, "R1", Day::Tuesday, 0));
    }

    #[test]
    fn test_occupy_is_idempotent() {
        let mut once = OccupancyTracker::new();
        once.occupy(ResourceKind::Batch, "B1", Day::Friday, 4);

        let mut twice = once.clone();
        twice.occupy(ResourceKind::Batch, "B1", Day::Friday, 4);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_release_then_occupy_restores_state() {
        let mut t = OccupancyTracker::new();
        t.occupy(ResourceKind::Faculty, "F1", Day::Monday, 1);
        t.occupy(ResourceKind::Faculty, "F1", Day::Monday, 2);
        let before = t.clone();

        t.release(ResourceKind::Faculty, "F1", Day::Monday, 1);
        assert!(t.is_free(ResourceKind::Faculty, "F1", Day::Monday, 1));
        t.occupy(ResourceKind::Faculty, "F1", Day::Monday, 1);
        assert_eq!(t, before);
    }

    #[test]
    fn test_release_free_cell_is_noop() {
        let mut t = OccupancyTracker::new();
        t.release(ResourceKind::Division, "D1", Day::Monday, 0);
        assert!(t.is_empty());

        t.occupy(ResourceKind::Division, "D1", Day::Monday, 0);
        t.release(ResourceKind::Division, "D1", Day::Monday, 0);
        assert_eq!(t, OccupancyTracker::new());
    }

    #[test]
    fn test_window_uses_exclusive_audience() {
        let mut t = OccupancyTracker::new();
        t.occupy_window("F1", "R1", Audience::Batch("B1"), Day::Monday, &[4, 5]);

        assert!(!t.is_free(ResourceKind::Batch, "B1", Day::Monday, 5));
        // Batch placement does not mark the division
        assert!(t.is_free(ResourceKind::Division, "B1", Day::Monday, 5));

        assert!(!t.is_window_free("F2", "R2", Audience::Batch("B1"), Day::Monday, &[5, 6]));
        assert!(t.is_window_free("F2", "R2", Audience::Batch("B2"), Day::Monday, &[5, 6]));
        assert!(!t.is_window_free("F1", "R2", Audience::Division("D1"), Day::Monday, &[4]));
    }

    #[test]
    fn test_busy_cells_sorted() {
        let mut t = OccupancyTracker::new();
        t.occupy(ResourceKind::Room, "R1", Day::Tuesday, 0);
        t.occupy(ResourceKind::Room, "R1", Day::Monday, 6);
        t.occupy(ResourceKind::Room, "R1", Day::Monday, 1);
        assert_eq!(
            t.busy_cells(ResourceKind::Room, "R1"),
            vec![(Day::Monday, 1), (Day::Monday, 6), (Day::Tuesday, 0)]
        );
        assert!(t.busy_cells(ResourceKind::Room, "R9").is_empty());
    }

    #[test]
    fn test_seeded_trusts_labels_over_slots() {
        use crate::models::{Division, Faculty, Room, Session, SessionType, Subject, SubjectType, Year};

        let grid = WeekGrid::standard();
        let subject = Subject::new("S", "COMP", Year::SE, SubjectType::Core);
        let faculty = Faculty::new("F", "Asha Rao", 10);
        let room = Room::classroom("R1");
        let division = Division::new("D", "COMP", Year::SE, "A");
        let mut stale = Session::new(&subject, &faculty, &room, &division, SessionType::Theory)
            .to_entry("E1", &grid, Day::Monday, vec![0]);
        stale.slots.clear();

        let t = OccupancyTracker::seeded(&grid, [&stale]);
        assert!(!t.is_free(ResourceKind::Faculty, "F", Day::Monday, 0));
        assert!(!t.is_free(ResourceKind::Room, "R1", Day::Monday, 0));
        assert!(!t.is_free(ResourceKind::Division, "D", Day::Monday, 0));
    }
}
