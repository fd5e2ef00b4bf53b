//! Academic timetable scheduling engine.
//!
//! Places subjects onto a weekly grid of days and time slots, assigning
//! faculty and rooms, without double-booking any faculty member, room,
//! division or batch.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Subject`, `Division`, `Batch`, `Faculty`,
//!   `Room`, `SubjectAllocation`, `TimetableEntry`, `WeekGrid`, `Catalog`
//! - **`occupancy`**: Busy (day, slot) cells per faculty, room, division and batch
//! - **`capacity`**: Faculty workload ledger port and in-memory ledger
//! - **`scheduler`**: Slot finder, constraint scorer, bulk generator,
//!   incremental scheduler and reports
//! - **`audit`**: Whole-timetable conflict and workload audits
//! - **`validation`**: Input integrity checks (duplicate IDs, references, batches)
//!
//! # Example
//!
//! ```
//! use u_timetable::models::{Catalog, Division, Faculty, Room, Subject, SubjectType, Year};
//! use u_timetable::{BulkGenerator, WorkloadLedger};
//!
//! let catalog = Catalog::new()
//!     .with_subject(Subject::new("DS", "COMP", Year::SE, SubjectType::Core).with_theory_hours(2))
//!     .with_division(Division::new("D1", "COMP", Year::SE, "A"))
//!     .with_faculty(Faculty::new("F1", "Asha Rao", 10).with_subject("DS"))
//!     .with_room(Room::classroom("R1"));
//!
//! let mut ledger = WorkloadLedger::from_faculty(&catalog.faculty);
//! let timetable = BulkGenerator::default().generate(&catalog, &mut ledger).unwrap();
//! assert_eq!(timetable.entries.len(), 2);
//! ```
//!
//! # Logging
//!
//! The crate logs through the `log` facade and never installs a logger.

pub mod audit;
pub mod capacity;
pub mod config;
pub mod error;
pub mod models;
pub mod occupancy;
pub mod scheduler;
pub mod validation;

pub use capacity::{CapacityLedger, WorkloadLedger};
pub use config::SchedulerConfig;
pub use error::{Rejection, SchedulerError};
pub use scheduler::{BulkGenerator, ConstraintScorer, IncrementalScheduler};
