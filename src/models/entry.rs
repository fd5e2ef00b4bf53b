//! Timetable entry (placed session) model.
//!
//! An entry freezes the descriptive data of everything it references at
//! scheduling time. Later edits to a subject or room do not touch
//! entries already placed.

use serde::{Deserialize, Serialize};

use super::{Batch, Day, Division, Faculty, Room, SessionType, Subject, WeekGrid};

/// A session placed on the week grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    /// Unique entry identifier.
    pub id: String,
    /// Day of the session.
    pub day: Day,
    /// Start label of the first covered slot.
    pub start_time: String,
    /// End label of the last covered slot.
    pub end_time: String,
    /// Grid slot indices covered, in order. Never contains a break slot.
    pub slots: Vec<usize>,
    pub subject: Subject,
    pub faculty: Faculty,
    pub room: Room,
    pub division: Division,
    /// Present for practicals and batch-scoped theory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<Batch>,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    /// Allocation this entry fulfils, when placed incrementally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation_id: Option<String>,
    /// Elective option label, for elective and minor sessions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elective: Option<String>,
}

/// The student group an entry occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Audience<'a> {
    /// The whole division (core theory).
    Division(&'a str),
    /// One batch.
    Batch(&'a str),
}

/// A session to be placed: who teaches what to whom, where.
#[derive(Debug, Clone, Copy)]
pub struct Session<'a> {
    pub subject: &'a Subject,
    pub faculty: &'a Faculty,
    pub room: &'a Room,
    pub division: &'a Division,
    pub batch: Option<&'a Batch>,
    pub session_type: SessionType,
    pub elective: Option<&'a str>,
}

impl<'a> Session<'a> {
    /// Creates a whole-division session.
    pub fn new(
        subject: &'a Subject,
        faculty: &'a Faculty,
        room: &'a Room,
        division: &'a Division,
        session_type: SessionType,
    ) -> Self {
        Self {
            subject,
            faculty,
            room,
            division,
            batch: None,
            session_type,
            elective: None,
        }
    }

    /// Scopes the session to a batch.
    pub fn with_batch(mut self, batch: Option<&'a Batch>) -> Self {
        self.batch = batch;
        self
    }

    /// Tags the session with an elective option.
    pub fn with_elective(mut self, label: Option<&'a str>) -> Self {
        self.elective = label;
        self
    }

    /// Who the session occupies.
    pub fn audience(&self) -> Audience<'a> {
        match self.batch {
            Some(batch) => Audience::Batch(&batch.id),
            None => Audience::Division(&self.division.id),
        }
    }

    /// Freezes the session into an entry covering `slots` on `day`.
    pub fn to_entry(
        &self,
        id: impl Into<String>,
        grid: &WeekGrid,
        day: Day,
        slots: Vec<usize>,
    ) -> TimetableEntry {
        TimetableEntry {
            id: id.into(),
            day,
            start_time: grid.start_label(&slots).unwrap_or_default().to_string(),
            end_time: grid.end_label(&slots).unwrap_or_default().to_string(),
            slots,
            subject: self.subject.clone(),
            faculty: self.faculty.clone(),
            room: self.room.clone(),
            division: self.division.clone(),
            batch: self.batch.cloned(),
            session_type: self.session_type,
            allocation_id: None,
            elective: self.elective.map(str::to_string),
        }
    }
}

impl TimetableEntry {
    /// Links the entry to the allocation it fulfils.
    pub fn with_allocation(mut self, allocation_id: impl Into<String>) -> Self {
        self.allocation_id = Some(allocation_id.into());
        self
    }

    /// Number of teaching slots covered.
    #[inline]
    pub fn duration(&self) -> u32 {
        self.slots.len() as u32
    }

    /// First covered slot index.
    pub fn start_slot(&self) -> Option<usize> {
        self.slots.first().copied()
    }

    /// Slots the entry occupies on `grid`.
    ///
    /// The start and end labels win over `slots` when they resolve on the
    /// grid, so an entry persisted with stale or missing slot indices still
    /// blocks the cells it was booked for.
    pub fn covered_slots(&self, grid: &WeekGrid) -> Vec<usize> {
        grid.span(&self.start_time, &self.end_time)
            .unwrap_or_else(|| self.slots.clone())
    }

    /// Who is occupied by this entry.
    pub fn audience(&self) -> Audience<'_> {
        match &self.batch {
            Some(batch) => Audience::Batch(&batch.id),
            None => Audience::Division(&self.division.id),
        }
    }

    /// Whether the entry has no batch.
    #[inline]
    pub fn is_whole_division(&self) -> bool {
        self.batch.is_none()
    }

    /// Whether the entry covers `slot` on `day`.
    pub fn covers(&self, day: Day, slot: usize) -> bool {
        self.day == day && self.slots.contains(&slot)
    }

    /// Whether two entries share at least one (day, slot).
    pub fn overlaps(&self, other: &TimetableEntry) -> bool {
        self.day == other.day && self.slots.iter().any(|s| other.slots.contains(s))
    }

    /// Batch id, if any.
    pub fn batch_id(&self) -> Option<&str> {
        self.batch.as_ref().map(|b| b.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Room, SubjectType, Year};

    fn entry(id: &str, day: Day, slots: Vec<usize>, batch: Option<Batch>) -> TimetableEntry {
        TimetableEntry {
            id: id.into(),
            day,
            start_time: String::new(),
            end_time: String::new(),
            slots,
            subject: Subject::new("S1", "COMP", Year::SE, SubjectType::Core),
            faculty: Faculty::new("F1", "A B", 10),
            room: Room::classroom("R1"),
            division: Division::new("D1", "COMP", Year::SE, "A"),
            batch,
            session_type: SessionType::Theory,
            allocation_id: None,
            elective: None,
        }
    }

    #[test]
    fn test_duration_and_start() {
        let e = entry("E1", Day::Monday, vec![4, 5], None);
        assert_eq!(e.duration(), 2);
        assert_eq!(e.start_slot(), Some(4));
        assert!(e.covers(Day::Monday, 5));
        assert!(!e.covers(Day::Tuesday, 5));
    }

    #[test]
    fn test_audience() {
        let whole = entry("E1", Day::Monday, vec![0], None);
        assert_eq!(whole.audience(), Audience::Division("D1"));
        assert!(whole.is_whole_division());

        let batch = entry("E2", Day::Monday, vec![0], Some(Batch::new("B1", "A1")));
        assert_eq!(batch.audience(), Audience::Batch("B1"));
        assert_eq!(batch.batch_id(), Some("B1"));
    }

    #[test]
    fn test_session_to_entry() {
        let subject = Subject::new("S1", "COMP", Year::SE, SubjectType::Dlo);
        let faculty = Faculty::new("F1", "A B", 10);
        let room = Room::lab("L1");
        let division = Division::new("D1", "COMP", Year::SE, "A");
        let batch = Batch::new("B1", "A1");
        let grid = WeekGrid::standard();

        let e = Session::new(&subject, &faculty, &room, &division, SessionType::Practical)
            .with_batch(Some(&batch))
            .with_elective(Some("NLP"))
            .to_entry("E1", &grid, Day::Thursday, vec![4, 5])
            .with_allocation("AL1");

        assert_eq!(e.start_time, "13:00");
        assert_eq!(e.end_time, "15:00");
        assert_eq!(e.batch_id(), Some("B1"));
        assert_eq!(e.elective.as_deref(), Some("NLP"));
        assert_eq!(e.allocation_id.as_deref(), Some("AL1"));
        assert_eq!(e.duration(), 2);
    }

    #[test]
    fn test_overlap() {
        let a = entry("E1", Day::Monday, vec![4, 5], None);
        let b = entry("E2", Day::Monday, vec![5], None);
        let c = entry("E3", Day::Monday, vec![6], None);
        let d = entry("E4", Day::Tuesday, vec![5], None);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(!a.overlaps(&d));
    }

    #[test]
    fn test_covered_slots_follow_labels() {
        let grid = WeekGrid::standard();
        let mut e = entry("E1", Day::Monday, vec![], None);
        // No labels: the stored indices are all there is
        assert!(e.covered_slots(&grid).is_empty());

        e.start_time = "09:00".into();
        e.end_time = "10:00".into();
        assert_eq!(e.covered_slots(&grid), vec![0]);

        e.slots = vec![6];
        assert_eq!(e.covered_slots(&grid), vec![0]);
    }
}
