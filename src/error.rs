//! Error types.
//!
//! "Could not fit" is not an error anywhere in this crate: the slot finder
//! returns `None` and the bulk generator reports shortfalls in its load
//! summary. Errors are reserved for rejected incremental placements,
//! unknown references and malformed input.

use thiserror::Error;

use crate::validation::ValidationError;

/// Why an incremental placement was refused.
///
/// Each reason is user-facing and recoverable: the caller may retry with
/// a different day, slot or room.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("This allocation is already scheduled.")]
    AlreadyScheduled { allocation_id: String },
    #[error("Faculty {initials} is already busy at this time.")]
    FacultyBusy { faculty_id: String, initials: String },
    #[error("Room {room_number} is already booked at this time.")]
    RoomBusy { room_id: String, room_number: String },
    #[error("Room {room_number} is not a {expected} room.")]
    RoomCategoryMismatch {
        room_id: String,
        room_number: String,
        expected: String,
    },
    #[error("Batch {name} is already busy at this time.")]
    BatchBusy { batch_id: String, name: String },
    #[error("Division {name} already has a theory class at this time.")]
    DivisionBusy { division_id: String, name: String },
}

/// Errors returned by the scheduling core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error("Allocation not found: {0}")]
    UnknownAllocation(String),
    #[error("Subject not found: {0}")]
    UnknownSubject(String),
    #[error("Faculty not found: {0}")]
    UnknownFaculty(String),
    #[error("Division not found: {0}")]
    UnknownDivision(String),
    #[error("Batch {batch_id} not found in division {division_id}")]
    UnknownBatch {
        division_id: String,
        batch_id: String,
    },
    #[error("Room not found: {0}")]
    UnknownRoom(String),
    #[error("Timetable entry not found: {0}")]
    UnknownEntry(String),
    #[error("Not a schedulable start time: {0}")]
    InvalidSlot(String),
    #[error("Faculty workload limit exceeded ({requested}h > {max}h) for {faculty_id}")]
    WorkloadExceeded {
        faculty_id: String,
        requested: u32,
        max: u32,
    },
    #[error("Allocation {allocation_id} has {hours}h, subject requires {expected}h")]
    HoursMismatch {
        allocation_id: String,
        hours: u32,
        expected: u32,
    },
    #[error("Invalid input: {} problem(s)", .0.len())]
    InvalidInput(Vec<ValidationError>),
}

impl SchedulerError {
    /// The rejection reason, if this is a refused placement.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            SchedulerError::Rejected(r) => Some(r),
            _ => None,
        }
    }
}
