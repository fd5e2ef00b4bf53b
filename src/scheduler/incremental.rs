//! Incremental (manual) scheduling.
//!
//! Places one allocation at a time against an already committed set of
//! entries. The tracker is seeded from the store once and then kept in
//! step with every commit and removal, so checks never rescan the store.
//!
//! Checks run in a fixed order and the first failure is reported:
//! 1. the allocation is not yet scheduled
//! 2. the start time is a teaching slot of the grid
//! 3. the faculty is free
//! 4. the room is free
//! 5. the room has the category the session needs
//! 6. the batch is free (batch allocations) or the division has no other
//!    whole-division session (division allocations)
//!
//! Workload is never touched here. Hours are reserved when the allocation
//! is registered, so unscheduling an entry frees its cells but not its
//! hours.
//!
//! Callers sharing a store between requests must serialize `schedule_one`
//! calls; the checks are evaluated against the scheduler's own snapshot.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::error::{Rejection, SchedulerError};
use crate::models::{Catalog, Day, Room, Session, SubjectAllocation, TimetableEntry};
use crate::occupancy::{OccupancyTracker, ResourceKind};

/// Port for the committed entry set.
pub trait EntryStore {
    /// All committed entries.
    fn entries(&self) -> &[TimetableEntry];

    /// Persists a new entry.
    fn insert(&mut self, entry: TimetableEntry) -> Result<(), SchedulerError>;

    /// Removes an entry by id, returning it.
    fn remove(&mut self, entry_id: &str) -> Option<TimetableEntry>;

    /// A fresh, unused entry id.
    fn next_entry_id(&mut self) -> String;

    /// The entry fulfilling an allocation, if any.
    fn find_by_allocation(&self, allocation_id: &str) -> Option<&TimetableEntry> {
        self.entries()
            .iter()
            .find(|e| e.allocation_id.as_deref() == Some(allocation_id))
    }
}

/// Vec-backed entry store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEntryStore {
    entries: Vec<TimetableEntry>,
    next_id: usize,
}

impl InMemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding already committed entries.
    pub fn from_entries(entries: Vec<TimetableEntry>) -> Self {
        Self {
            entries,
            next_id: 0,
        }
    }

    pub fn into_entries(self) -> Vec<TimetableEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EntryStore for InMemoryEntryStore {
    fn entries(&self) -> &[TimetableEntry] {
        &self.entries
    }

    fn insert(&mut self, entry: TimetableEntry) -> Result<(), SchedulerError> {
        self.entries.push(entry);
        Ok(())
    }

    fn remove(&mut self, entry_id: &str) -> Option<TimetableEntry> {
        let pos = self.entries.iter().position(|e| e.id == entry_id)?;
        Some(self.entries.remove(pos))
    }

    fn next_entry_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let id = format!("entry-{}", self.next_id);
            if !self.entries.iter().any(|e| e.id == id) {
                return id;
            }
        }
    }
}

/// A request to place one allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementRequest {
    pub allocation_id: String,
    pub day: Day,
    /// Start label of the slot, e.g. `"10:00"`.
    pub start_time: String,
    pub room_id: String,
}

impl PlacementRequest {
    pub fn new(
        allocation_id: impl Into<String>,
        day: Day,
        start_time: impl Into<String>,
        room_id: impl Into<String>,
    ) -> Self {
        Self {
            allocation_id: allocation_id.into(),
            day,
            start_time: start_time.into(),
            room_id: room_id.into(),
        }
    }
}

/// Outcome of [`IncrementalScheduler::auto_schedule_division`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoScheduleReport {
    /// Entries committed, in allocation order.
    pub scheduled: Vec<TimetableEntry>,
    /// Allocations for which no slot was accepted.
    pub unplaced: Vec<String>,
}

/// Commits placements one at a time.
#[derive(Debug)]
pub struct IncrementalScheduler<'a, S> {
    catalog: &'a Catalog,
    store: S,
    tracker: OccupancyTracker,
    config: SchedulerConfig,
}

impl<'a, S: EntryStore> IncrementalScheduler<'a, S> {
    /// Creates a scheduler over `store`, seeding the tracker from it.
    pub fn new(catalog: &'a Catalog, store: S, config: SchedulerConfig) -> Self {
        let tracker = OccupancyTracker::seeded(&config.grid, store.entries());
        Self {
            catalog,
            store,
            tracker,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn tracker(&self) -> &OccupancyTracker {
        &self.tracker
    }

    pub fn entries(&self) -> &[TimetableEntry] {
        self.store.entries()
    }

    /// Validates and commits one placement.
    ///
    /// # Errors
    /// - [`SchedulerError::Rejected`] with the first failed check
    /// - lookup errors for unknown allocation, room or references
    /// - [`SchedulerError::InvalidSlot`] for a break or unknown start time
    pub fn schedule_one(&mut self, request: &PlacementRequest) -> Result<TimetableEntry, SchedulerError> {
        match self.try_schedule(request) {
            Ok(entry) => {
                info!(
                    "Scheduled {} on {} {} in {} as {}",
                    request.allocation_id, entry.day, entry.start_time, entry.room.room_number, entry.id
                );
                Ok(entry)
            }
            Err(err) => {
                debug!("Rejected {}: {}", request.allocation_id, err);
                Err(err)
            }
        }
    }

    fn try_schedule(&mut self, request: &PlacementRequest) -> Result<TimetableEntry, SchedulerError> {
        if self.store.find_by_allocation(&request.allocation_id).is_some() {
            return Err(Rejection::AlreadyScheduled {
                allocation_id: request.allocation_id.clone(),
            }
            .into());
        }

        let catalog = self.catalog;
        let allocation = catalog
            .allocation(&request.allocation_id)
            .ok_or_else(|| SchedulerError::UnknownAllocation(request.allocation_id.clone()))?;
        let resolved = catalog.resolve(allocation)?;
        let room = catalog
            .room(&request.room_id)
            .ok_or_else(|| SchedulerError::UnknownRoom(request.room_id.clone()))?;

        let grid = &self.config.grid;
        if !grid.days.contains(&request.day) {
            return Err(SchedulerError::InvalidSlot(format!("{} {}", request.day, request.start_time)));
        }
        let slot = grid
            .slot_index(&request.start_time)
            .filter(|&i| grid.is_teaching_slot(i))
            .ok_or_else(|| SchedulerError::InvalidSlot(request.start_time.clone()))?;
        let day = request.day;

        let faculty = resolved.faculty;
        if !self.tracker.is_free(ResourceKind::Faculty, &faculty.id, day, slot) {
            return Err(Rejection::FacultyBusy {
                faculty_id: faculty.id.clone(),
                initials: faculty.initials.clone(),
            }
            .into());
        }
        if !self.tracker.is_free(ResourceKind::Room, &room.id, day, slot) {
            return Err(Rejection::RoomBusy {
                room_id: room.id.clone(),
                room_number: room.room_number.clone(),
            }
            .into());
        }
        check_category(room, allocation)?;
        match resolved.batch {
            Some(batch) => {
                if !self.tracker.is_free(ResourceKind::Batch, &batch.id, day, slot) {
                    return Err(Rejection::BatchBusy {
                        batch_id: batch.id.clone(),
                        name: batch.name.clone(),
                    }
                    .into());
                }
            }
            None => {
                let division = resolved.division;
                if !self.tracker.is_free(ResourceKind::Division, &division.id, day, slot) {
                    return Err(Rejection::DivisionBusy {
                        division_id: division.id.clone(),
                        name: division.name.clone(),
                    }
                    .into());
                }
            }
        }

        let elective = resolved
            .batch
            .and_then(|b| b.choice_for(&resolved.subject.id));
        let id = self.store.next_entry_id();
        let entry = Session::new(
            resolved.subject,
            faculty,
            room,
            resolved.division,
            allocation.session_type,
        )
        .with_batch(resolved.batch)
        .with_elective(elective)
        .to_entry(id, grid, day, vec![slot])
        .with_allocation(&allocation.id);

        self.store.insert(entry.clone())?;
        self.tracker.occupy_entry(&entry);
        Ok(entry)
    }

    /// Removes an entry and frees its cells.
    ///
    /// Faculty workload is left as is.
    pub fn unschedule(&mut self, entry_id: &str) -> Result<TimetableEntry, SchedulerError> {
        let entry = self
            .store
            .remove(entry_id)
            .ok_or_else(|| SchedulerError::UnknownEntry(entry_id.to_string()))?;
        let slots = entry.covered_slots(&self.config.grid);
        self.tracker
            .release_window(&entry.faculty.id, &entry.room.id, entry.audience(), entry.day, &slots);
        info!("Unscheduled {} ({} {} {})", entry.id, entry.subject.id, entry.day, entry.start_time);
        Ok(entry)
    }

    /// Allocations without an entry, optionally of one division only.
    pub fn unscheduled_allocations(&self, division_id: Option<&str>) -> Vec<&'a SubjectAllocation> {
        let catalog = self.catalog;
        catalog
            .allocations
            .iter()
            .filter(|a| division_id.map_or(true, |d| a.division_id == d))
            .filter(|a| self.store.find_by_allocation(&a.id).is_none())
            .collect()
    }

    /// Places every unscheduled allocation of a division.
    ///
    /// Cells are scanned in grid order. At each cell the first room of the
    /// needed category that is free there is tried through
    /// [`schedule_one`](Self::schedule_one); a rejection moves on to the
    /// next cell.
    ///
    /// # Errors
    /// [`SchedulerError::UnknownDivision`], or any non-rejection error
    /// raised while placing.
    pub fn auto_schedule_division(&mut self, division_id: &str) -> Result<AutoScheduleReport, SchedulerError> {
        let catalog = self.catalog;
        let division = catalog
            .division(division_id)
            .ok_or_else(|| SchedulerError::UnknownDivision(division_id.to_string()))?;

        let mut report = AutoScheduleReport::default();
        for allocation in self.unscheduled_allocations(Some(division_id)) {
            match self.auto_place(allocation, &division.department)? {
                Some(entry) => report.scheduled.push(entry),
                None => report.unplaced.push(allocation.id.clone()),
            }
        }
        info!(
            "Auto-scheduled division {}: {} placed, {} unplaced",
            division.key(),
            report.scheduled.len(),
            report.unplaced.len()
        );
        Ok(report)
    }

    fn auto_place(
        &mut self,
        allocation: &SubjectAllocation,
        department: &str,
    ) -> Result<Option<TimetableEntry>, SchedulerError> {
        let catalog = self.catalog;
        let category = allocation.session_type.room_category();
        let rooms: Vec<&Room> = catalog
            .rooms
            .iter()
            .filter(|r| r.category == category && r.is_usable_by(department))
            .collect();

        let grid = self.config.grid.clone();
        for &day in &grid.days {
            for slot in grid.teaching_slots() {
                let Some(room) = rooms
                    .iter()
                    .find(|r| self.tracker.is_free(ResourceKind::Room, &r.id, day, slot))
                else {
                    continue;
                };
                let Some(start) = grid.slot(slot) else {
                    continue;
                };
                let request = PlacementRequest::new(&allocation.id, day, &start.start, &room.id);
                match self.schedule_one(&request) {
                    Ok(entry) => return Ok(Some(entry)),
                    Err(SchedulerError::Rejected(_)) => continue,
                    Err(err) => return Err(err),
                }
            }
        }
        Ok(None)
    }
}

fn check_category(room: &Room, allocation: &SubjectAllocation) -> Result<(), Rejection> {
    let expected = allocation.session_type.room_category();
    if room.category == expected {
        Ok(())
    } else {
        Err(Rejection::RoomCategoryMismatch {
            room_id: room.id.clone(),
            room_number: room.room_number.clone(),
            expected: format!("{expected:?}").to_uppercase(),
        })
    }
}
