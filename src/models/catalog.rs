//! Input collections consumed by the scheduler.

use serde::{Deserialize, Serialize};

use super::{Batch, Division, Faculty, Room, SessionType, Subject, SubjectAllocation};
use crate::capacity::CapacityLedger;
use crate::error::SchedulerError;

/// Subjects, divisions, faculty, rooms and allocations, in declared order.
///
/// Declared order matters: faculty and rooms are picked first-fit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub divisions: Vec<Division>,
    #[serde(default)]
    pub faculty: Vec<Faculty>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub allocations: Vec<SubjectAllocation>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    pub fn with_division(mut self, division: Division) -> Self {
        self.divisions.push(division);
        self
    }

    pub fn with_faculty(mut self, faculty: Faculty) -> Self {
        self.faculty.push(faculty);
        self
    }

    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    pub fn with_allocation(mut self, allocation: SubjectAllocation) -> Self {
        self.allocations.push(allocation);
        self
    }

    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn division(&self, id: &str) -> Option<&Division> {
        self.divisions.iter().find(|d| d.id == id)
    }

    pub fn faculty_member(&self, id: &str) -> Option<&Faculty> {
        self.faculty.iter().find(|f| f.id == id)
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn allocation(&self, id: &str) -> Option<&SubjectAllocation> {
        self.allocations.iter().find(|a| a.id == id)
    }

    /// Resolves every reference of an allocation.
    pub fn resolve(&self, allocation: &SubjectAllocation) -> Result<Resolved<'_>, SchedulerError> {
        let subject = self
            .subject(&allocation.subject_id)
            .ok_or_else(|| SchedulerError::UnknownSubject(allocation.subject_id.clone()))?;
        let faculty = self
            .faculty_member(&allocation.faculty_id)
            .ok_or_else(|| SchedulerError::UnknownFaculty(allocation.faculty_id.clone()))?;
        let division = self
            .division(&allocation.division_id)
            .ok_or_else(|| SchedulerError::UnknownDivision(allocation.division_id.clone()))?;
        let batch = match &allocation.batch_id {
            Some(batch_id) => Some(division.batch(batch_id).ok_or_else(|| {
                SchedulerError::UnknownBatch {
                    division_id: division.id.clone(),
                    batch_id: batch_id.clone(),
                }
            })?),
            None => None,
        };
        Ok(Resolved {
            subject,
            faculty,
            division,
            batch,
        })
    }

    /// Adds an allocation, committing its hours to the faculty's workload.
    ///
    /// The hours must equal the subject's theory or practical hours (per
    /// division or batch unit), and the reservation must fit under the
    /// faculty's ceiling. Nothing changes on failure.
    pub fn register_allocation(
        &mut self,
        allocation: SubjectAllocation,
        ledger: &mut impl CapacityLedger,
    ) -> Result<(), SchedulerError> {
        let resolved = self.resolve(&allocation)?;
        let expected = match allocation.session_type {
            SessionType::Theory => resolved.subject.theory_hours,
            SessionType::Practical => resolved.subject.practical_hours,
        };
        if allocation.hours != expected {
            return Err(SchedulerError::HoursMismatch {
                allocation_id: allocation.id,
                hours: allocation.hours,
                expected,
            });
        }

        ledger.reserve(&allocation.faculty_id, allocation.hours)?;
        self.allocations.push(allocation);
        Ok(())
    }
}

/// The entities an allocation refers to.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub subject: &'a Subject,
    pub faculty: &'a Faculty,
    pub division: &'a Division,
    pub batch: Option<&'a Batch>,
}
