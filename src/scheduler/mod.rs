//! Placement engines and their building blocks.
//!
//! Two engines share one slot finder and one occupancy tracker:
//!
//! - `BulkGenerator` builds a whole timetable greedily, division by
//!   division, and reports what it could not place.
//! - `IncrementalScheduler` validates and commits one allocation at a time
//!   against an existing entry set.
//!
//! # Algorithm
//!
//! Both are first-fit in declared order: days, then slots, then rooms and
//! faculty as listed in the catalog. Neither is optimal; output is
//! reproducible for a given input order.
//!
//! # Scoring
//!
//! `ConstraintScorer` rates any entry against a fixed list of hard and
//! soft rules. It ranks and suggests placements but never moves entries.

mod constraints;
mod generator;
mod incremental;
mod report;
mod slots;

pub use constraints::{BestSlot, ConstraintScorer, Rule, RuleKind, ScoreCard};
pub use generator::{BulkGenerator, GeneratedTimetable};
pub use incremental::{
    AutoScheduleReport, EntryStore, InMemoryEntryStore, IncrementalScheduler, PlacementRequest,
};
pub use report::{department_loads, vacant_rooms, DepartmentLoad, VacantRoom, VacantSlot};
pub use slots::{Placement, SlotFinder, SlotRequest};
