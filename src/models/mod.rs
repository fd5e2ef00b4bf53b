//! Timetabling domain models.
//!
//! Input entities (subjects, divisions with batches, faculty, rooms,
//! allocations), the week grid they are placed on, and the placed
//! sessions (timetable entries) the scheduler produces.
//!
//! # Domain Mappings
//!
//! | u-timetable | General scheduling |
//! |-------------|--------------------|
//! | Subject + audience | Task |
//! | TimetableEntry | Assignment |
//! | Faculty, Room, Division, Batch | Resources |
//! | WeekGrid | Calendar |

mod allocation;
mod calendar;
mod catalog;
mod division;
mod entry;
mod faculty;
mod room;
mod subject;

pub use allocation::{SessionType, SubjectAllocation};
pub use calendar::{Day, TimeSlot, WeekGrid};
pub use catalog::{Catalog, Resolved};
pub use division::{Batch, Division};
pub use entry::{Audience, Session, TimetableEntry};
pub use faculty::{Faculty, FacultyPreferences};
pub use room::{Room, RoomCategory};
pub use subject::{AudienceGranularity, SlotPreference, Subject, SubjectProfile, SubjectType, Year};
