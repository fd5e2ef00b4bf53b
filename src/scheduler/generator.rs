//! Greedy bulk timetable generator.
//!
//! # Algorithm
//! For each division in declared order:
//! 1. Core and lab subjects of the division's department and year.
//!    Theory goes to the whole division one slot at a time; practicals go
//!    to each batch in blocks of up to `practical_block` slots.
//! 2. Elective and minor subjects. Batches are grouped by their recorded
//!    choice (batches without one are skipped) and every batch gets its
//!    own theory and practical sessions. Minor theory prefers the edges
//!    of the day.
//!
//! Faculty and rooms are picked first-fit in declared order: the first
//! qualified faculty with spare capacity, and the first eligible room of
//! the needed category for which the slot finder succeeds. Every
//! placement reserves capacity on the ledger and occupies faculty, room
//! and audience on the tracker.
//!
//! A combination that cannot be fully placed is left short. Shortfalls
//! are logged and show up in the department load report; they are never
//! errors.
//!
//! # Complexity
//! O(h * r * d * s) for h required hours, r rooms, d days, s slots/day.

use std::collections::{BTreeMap, HashSet};

use log::{debug, info, warn};
use serde::Serialize;

use crate::capacity::CapacityLedger;
use crate::config::SchedulerConfig;
use crate::error::SchedulerError;
use crate::models::{
    AudienceGranularity, Batch, Catalog, Division, Faculty, Room, Session, SessionType,
    SlotPreference, Subject, TimetableEntry,
};
use crate::occupancy::OccupancyTracker;
use crate::validation::{unknown_qualifications, validate_input};

use super::report::{department_loads, vacant_rooms, DepartmentLoad, VacantRoom};
use super::slots::{SlotFinder, SlotRequest};

/// Result of a generation run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedTimetable {
    /// Committed entries followed by the newly placed ones.
    #[serde(skip)]
    pub entries: Vec<TimetableEntry>,
    /// Entries keyed by `department-year-name`.
    pub division_wise: BTreeMap<String, Vec<TimetableEntry>>,
    /// Entries keyed by faculty id.
    pub faculty_wise: BTreeMap<String, Vec<TimetableEntry>>,
    /// Entries keyed by room id.
    pub room_wise: BTreeMap<String, Vec<TimetableEntry>>,
    pub department_loads: Vec<DepartmentLoad>,
    /// Faculty with spare capacity, workload as recorded on the ledger.
    pub remaining_faculty: Vec<Faculty>,
    pub vacant_rooms: Vec<VacantRoom>,
    /// Number of entries placed by this run.
    pub placed: usize,
}

impl GeneratedTimetable {
    /// Entries of one subject.
    pub fn entries_for_subject<'a>(
        &'a self,
        subject_id: &'a str,
    ) -> impl Iterator<Item = &'a TimetableEntry> + 'a {
        self.entries.iter().filter(move |e| e.subject.id == subject_id)
    }

    /// Whether every department load is complete.
    pub fn is_complete(&self) -> bool {
        self.department_loads.iter().all(DepartmentLoad::is_complete)
    }
}

/// Builds timetables from a catalog.
#[derive(Debug, Clone, Default)]
pub struct BulkGenerator {
    config: SchedulerConfig,
}

impl BulkGenerator {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Generates a timetable from an empty grid.
    ///
    /// With `reset_workloads` (the default) every faculty starts the run at
    /// zero hours.
    ///
    /// # Errors
    /// [`SchedulerError::InvalidInput`] when the catalog fails validation.
    pub fn generate<L>(&self, catalog: &Catalog, ledger: &mut L) -> Result<GeneratedTimetable, SchedulerError>
    where
        L: CapacityLedger + ?Sized,
    {
        self.generate_onto(catalog, &[], ledger)
    }

    /// Generates around already committed entries.
    ///
    /// The tracker is seeded from `committed`, so new sessions never clash
    /// with them. Set `reset_workloads` to `false` when the ledger already
    /// accounts for the committed hours.
    ///
    /// # Errors
    /// [`SchedulerError::InvalidInput`] when the catalog fails validation.
    pub fn generate_onto<L>(
        &self,
        catalog: &Catalog,
        committed: &[TimetableEntry],
        ledger: &mut L,
    ) -> Result<GeneratedTimetable, SchedulerError>
    where
        L: CapacityLedger + ?Sized,
    {
        validate_input(catalog).map_err(SchedulerError::InvalidInput)?;
        for (faculty_id, subject_id) in unknown_qualifications(catalog) {
            warn!("Faculty {faculty_id} lists unknown subject {subject_id}; ignored");
        }

        info!(
            "Generating timetable: {} divisions, {} subjects, {} faculty, {} rooms, {} committed entries",
            catalog.divisions.len(),
            catalog.subjects.len(),
            catalog.faculty.len(),
            catalog.rooms.len(),
            committed.len()
        );

        if self.config.reset_workloads {
            ledger.reset();
        }

        let mut run = Run {
            catalog,
            config: &self.config,
            ledger,
            tracker: OccupancyTracker::seeded(&self.config.grid, committed),
            entries: committed.to_vec(),
            committed: committed.len(),
            taken_ids: committed.iter().map(|e| e.id.clone()).collect(),
            next_id: 1,
        };
        for division in &catalog.divisions {
            run.schedule_division(division);
        }

        let placed = run.entries.len() - committed.len();
        info!("Generated {} entries ({} total)", placed, run.entries.len());
        Ok(run.finish(placed))
    }
}

/// Mutable state of one generation run.
struct Run<'a, L: ?Sized> {
    catalog: &'a Catalog,
    config: &'a SchedulerConfig,
    ledger: &'a mut L,
    tracker: OccupancyTracker,
    entries: Vec<TimetableEntry>,
    /// Leading entries of `entries` that were committed before the run.
    committed: usize,
    taken_ids: HashSet<String>,
    next_id: usize,
}

impl<'a, L: CapacityLedger + ?Sized> Run<'a, L> {
    fn schedule_division(&mut self, division: &'a Division) {
        let catalog = self.catalog;
        let subjects: Vec<&'a Subject> = catalog
            .subjects
            .iter()
            .filter(|s| s.is_offered_to(&division.department, division.year))
            .collect();

        for subject in subjects
            .iter()
            .copied()
            .filter(|s| s.profile().audience == AudienceGranularity::WholeDivision)
        {
            if subject.theory_hours > 0 {
                self.place_hours(subject, division, None, SessionType::Theory, None);
            }
            if subject.practical_hours > 0 {
                for batch in &division.batches {
                    self.place_hours(subject, division, Some(batch), SessionType::Practical, None);
                }
            }
        }

        for subject in subjects
            .iter()
            .copied()
            .filter(|s| s.profile().audience == AudienceGranularity::PerBatch)
        {
            for (choice, batches) in division.batches_by_choice(&subject.id) {
                for &batch in &batches {
                    if subject.theory_hours > 0 {
                        self.place_hours(subject, division, Some(batch), SessionType::Theory, Some(choice));
                    }
                }
                for &batch in &batches {
                    if subject.practical_hours > 0 {
                        self.place_hours(
                            subject,
                            division,
                            Some(batch),
                            SessionType::Practical,
                            Some(choice),
                        );
                    }
                }
            }
        }
    }

    /// Places the subject's theory or practical hours for one audience.
    ///
    /// Returns the hours placed.
    fn place_hours(
        &mut self,
        subject: &'a Subject,
        division: &'a Division,
        batch: Option<&'a Batch>,
        session_type: SessionType,
        elective: Option<&'a str>,
    ) -> u32 {
        let owed = match session_type {
            SessionType::Theory => subject.theory_hours,
            SessionType::Practical => subject.practical_hours,
        };
        let audience = batch.map_or(division.key(), |b| format!("{}/{}", division.key(), b.name));

        let covered = self.committed_hours(subject, division, batch, session_type);
        let required = owed.saturating_sub(covered);
        if covered > 0 {
            debug!(
                "{} ({:?}) for {}: {} of {} hours already committed",
                subject.id, session_type, audience, covered, owed
            );
        }
        if required == 0 {
            return 0;
        }

        let Some(faculty) = self.pick_faculty(subject) else {
            warn!(
                "No qualified faculty with spare capacity for {} ({:?}) of {}",
                subject.id, session_type, audience
            );
            return 0;
        };
        let rooms = self.eligible_rooms(division, session_type);
        if rooms.is_empty() {
            warn!(
                "No {:?} room available to {} for {}",
                session_type.room_category(),
                division.department,
                subject.id
            );
            return 0;
        }

        let preference = match session_type {
            SessionType::Theory => subject.profile().slot_preference,
            SessionType::Practical => SlotPreference::Normal,
        };

        let mut placed = 0;
        while placed < required {
            let capacity = self.ledger.remaining(&faculty.id);
            let duration = match session_type {
                SessionType::Theory => 1,
                SessionType::Practical => (self.config.practical_block as u32).min(required - placed),
            }
            .min(capacity);
            if duration == 0 {
                break;
            }

            let session = Session::new(subject, faculty, rooms[0], division, session_type)
                .with_batch(batch)
                .with_elective(elective);
            let found = {
                let finder = SlotFinder::new(self.config, &self.tracker);
                rooms.iter().find_map(|room| {
                    let request =
                        SlotRequest::new(&faculty.id, &room.id, session.audience(), duration as usize)
                            .with_preference(preference);
                    finder.find(&request).map(|p| (*room, p))
                })
            };
            let Some((room, placement)) = found else {
                break;
            };

            if let Err(err) = self.ledger.reserve(&faculty.id, duration) {
                warn!("{err}");
                break;
            }
            let id = self.next_entry_id();
            let entry = Session { room, ..session }.to_entry(
                id,
                &self.config.grid,
                placement.day,
                placement.slots,
            );
            debug!(
                "Placed {} {:?} for {} with {} in {} on {} {}-{}",
                subject.id,
                session_type,
                audience,
                faculty.initials,
                room.room_number,
                entry.day,
                entry.start_time,
                entry.end_time
            );
            self.tracker.occupy_entry(&entry);
            self.entries.push(entry);
            placed += duration;
        }

        if placed < required {
            warn!(
                "{} ({:?}) for {}: placed {} of {} hours",
                subject.id, session_type, audience, placed, required
            );
        }
        placed
    }

    /// Hours committed before the run for this subject, audience and session type.
    fn committed_hours(
        &self,
        subject: &Subject,
        division: &Division,
        batch: Option<&Batch>,
        session_type: SessionType,
    ) -> u32 {
        let batch_id = batch.map(|b| b.id.as_str());
        self.entries[..self.committed]
            .iter()
            .filter(|e| {
                e.subject.id == subject.id
                    && e.division.id == division.id
                    && e.batch_id() == batch_id
                    && e.session_type == session_type
            })
            .map(TimetableEntry::duration)
            .sum()
    }

    fn pick_faculty(&self, subject: &Subject) -> Option<&'a Faculty> {
        self.catalog
            .faculty
            .iter()
            .find(|f| f.is_qualified_for(&subject.id) && self.ledger.has_spare(&f.id))
    }

    fn eligible_rooms(&self, division: &Division, session_type: SessionType) -> Vec<&'a Room> {
        let category = session_type.room_category();
        self.catalog
            .rooms
            .iter()
            .filter(|r| r.category == category && r.is_usable_by(&division.department))
            .collect()
    }

    fn next_entry_id(&mut self) -> String {
        loop {
            let id = format!("entry-{}", self.next_id);
            self.next_id += 1;
            if self.taken_ids.insert(id.clone()) {
                return id;
            }
        }
    }

    fn finish(self, placed: usize) -> GeneratedTimetable {
        let mut division_wise: BTreeMap<String, Vec<TimetableEntry>> = BTreeMap::new();
        let mut faculty_wise: BTreeMap<String, Vec<TimetableEntry>> = BTreeMap::new();
        let mut room_wise: BTreeMap<String, Vec<TimetableEntry>> = BTreeMap::new();
        for entry in &self.entries {
            division_wise
                .entry(entry.division.key())
                .or_default()
                .push(entry.clone());
            faculty_wise
                .entry(entry.faculty.id.clone())
                .or_default()
                .push(entry.clone());
            room_wise
                .entry(entry.room.id.clone())
                .or_default()
                .push(entry.clone());
        }

        let remaining_faculty = self
            .catalog
            .faculty
            .iter()
            .filter(|f| self.ledger.has_spare(&f.id))
            .map(|f| {
                let mut f = f.clone();
                f.current_workload = f.max_workload.saturating_sub(self.ledger.remaining(&f.id));
                f
            })
            .collect();

        GeneratedTimetable {
            department_loads: department_loads(
                &self.catalog.subjects,
                &self.catalog.divisions,
                &self.entries,
            ),
            vacant_rooms: vacant_rooms(&self.catalog.rooms, &self.config.grid, &self.tracker),
            remaining_faculty,
            division_wise,
            faculty_wise,
            room_wise,
            entries: self.entries,
            placed,
        }
    }
}
