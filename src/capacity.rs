//! Faculty capacity tracking.
//!
//! The generator never mutates `Faculty::current_workload` directly.
//! It reserves hours through a [`CapacityLedger`], so the workload store
//! can live wherever the caller keeps it (in memory, behind a database
//! transaction) and be tested in isolation.

use std::collections::HashMap;

use crate::error::SchedulerError;
use crate::models::Faculty;

/// Port for reading and adjusting faculty workload.
pub trait CapacityLedger {
    /// Hours the faculty can still take. Unknown faculty have none.
    fn remaining(&self, faculty_id: &str) -> u32;

    /// Commits `hours` to the faculty.
    ///
    /// Fails without changing anything if the ceiling would be exceeded.
    fn reserve(&mut self, faculty_id: &str, hours: u32) -> Result<(), SchedulerError>;

    /// Returns `hours` to the faculty (saturating at zero).
    fn release(&mut self, faculty_id: &str, hours: u32);

    /// Sets every faculty's committed hours to zero.
    fn reset(&mut self);

    /// Whether the faculty has at least one spare hour.
    fn has_spare(&self, faculty_id: &str) -> bool {
        self.remaining(faculty_id) > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Load {
    max: u32,
    current: u32,
}

/// In-memory ledger seeded from faculty records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkloadLedger {
    loads: HashMap<String, Load>,
}

impl WorkloadLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the ledger with each faculty's ceiling and current hours.
    pub fn from_faculty(faculty: &[Faculty]) -> Self {
        let loads = faculty
            .iter()
            .map(|f| {
                (
                    f.id.clone(),
                    Load {
                        max: f.max_workload,
                        current: f.current_workload,
                    },
                )
            })
            .collect();
        Self { loads }
    }

    /// Hours currently committed, if the faculty is known.
    pub fn current(&self, faculty_id: &str) -> Option<u32> {
        self.loads.get(faculty_id).map(|l| l.current)
    }

    /// Ceiling, if the faculty is known.
    pub fn max(&self, faculty_id: &str) -> Option<u32> {
        self.loads.get(faculty_id).map(|l| l.max)
    }

    /// Copies committed hours back into faculty records.
    pub fn apply_to(&self, faculty: &mut [Faculty]) {
        for f in faculty {
            if let Some(load) = self.loads.get(&f.id) {
                f.current_workload = load.current;
            }
        }
    }
}

impl CapacityLedger for WorkloadLedger {
    fn remaining(&self, faculty_id: &str) -> u32 {
        self.loads
            .get(faculty_id)
            .map(|l| l.max.saturating_sub(l.current))
            .unwrap_or(0)
    }

    fn reserve(&mut self, faculty_id: &str, hours: u32) -> Result<(), SchedulerError> {
        let load = self
            .loads
            .get_mut(faculty_id)
            .ok_or_else(|| SchedulerError::UnknownFaculty(faculty_id.to_string()))?;
        let requested = load.current + hours;
        if requested > load.max {
            return Err(SchedulerError::WorkloadExceeded {
                faculty_id: faculty_id.to_string(),
                requested,
                max: load.max,
            });
        }
        load.current = requested;
        Ok(())
    }

    fn release(&mut self, faculty_id: &str, hours: u32) {
        if let Some(load) = self.loads.get_mut(faculty_id) {
            load.current = load.current.saturating_sub(hours);
        }
    }

    fn reset(&mut self) {
        for load in self.loads.values_mut() {
            load.current = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> WorkloadLedger {
        WorkloadLedger::from_faculty(&[
            Faculty::new("F1", "Asha Rao", 20).with_current_workload(18),
            Faculty::new("F2", "Vik Menon", 10),
        ])
    }

    #[test]
    fn test_reserve_within_ceiling() {
        let mut l = ledger();
        assert_eq!(l.remaining("F1"), 2);
        l.reserve("F1", 2).unwrap();
        assert_eq!(l.current("F1"), Some(20));
        assert!(!l.has_spare("F1"));
    }

    #[test]
    fn test_reserve_over_ceiling_is_atomic() {
        let mut l = ledger();
        let err = l.reserve("F1", 3).unwrap_err();
        assert_eq!(
            err,
            SchedulerError::WorkloadExceeded {
                faculty_id: "F1".into(),
                requested: 21,
                max: 20
            }
        );
        assert_eq!(l.current("F1"), Some(18));
    }

    #[test]
    fn test_unknown_faculty() {
        let mut l = ledger();
        assert_eq!(l.remaining("F9"), 0);
        assert!(matches!(
            l.reserve("F9", 1),
            Err(SchedulerError::UnknownFaculty(_))
        ));
    }

    #[test]
    fn test_release_and_reset() {
        let mut l = ledger();
        l.release("F1", 5);
        assert_eq!(l.current("F1"), Some(13));
        l.release("F2", 5);
        assert_eq!(l.current("F2"), Some(0));
        l.reset();
        assert_eq!(l.current("F1"), Some(0));
        assert_eq!(l.max("F1"), Some(20));
    }

    #[test]
    fn test_apply_to() {
        let mut faculty = vec![Faculty::new("F1", "Asha Rao", 20), Faculty::new("F3", "X", 5)];
        let mut l = WorkloadLedger::from_faculty(&faculty);
        l.reserve("F1", 4).unwrap();
        l.apply_to(&mut faculty);
        assert_eq!(faculty[0].current_workload, 4);
        assert_eq!(faculty[1].current_workload, 0);
    }
}
