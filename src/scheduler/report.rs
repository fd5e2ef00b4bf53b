//! Post-generation reports.
//!
//! Derived from the finished entry list and the tracker, never from
//! intermediate generator state.
//!
//! # Metrics
//!
//! | Report | Definition |
//! |--------|-----------|
//! | Total hours | Hours the catalog requires per (department, year) |
//! | Allocated hours | Sum of placed entry durations |
//! | Remaining hours | max(0, total - allocated) |
//! | Unassigned subjects | Subjects with no entry at all |
//! | Vacant cells | Teaching (day, slot) cells where a room is free |
//!
//! Minor subjects draw students from several departments and are left
//! out of department loads.

use serde::Serialize;

use crate::models::{
    Day, Division, Room, SessionType, Subject, SubjectType, TimetableEntry, WeekGrid, Year,
};
use crate::occupancy::{OccupancyTracker, ResourceKind};

/// Required versus placed hours for one department and year.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentLoad {
    pub department: String,
    pub year: Year,
    pub total_theory_hours: u32,
    pub total_practical_hours: u32,
    pub allocated_theory_hours: u32,
    pub allocated_practical_hours: u32,
    pub remaining_theory_hours: u32,
    pub remaining_practical_hours: u32,
    /// Subjects with no placed entry.
    pub unassigned_subjects: Vec<Subject>,
}

impl DepartmentLoad {
    /// Computes the load of one department and year.
    ///
    /// Core and lab theory is owed once per division, practicals once per
    /// batch. Elective theory and practicals are owed once per batch that
    /// recorded a choice for the subject.
    pub fn calculate(
        department: &str,
        year: Year,
        subjects: &[Subject],
        divisions: &[Division],
        entries: &[TimetableEntry],
    ) -> Self {
        let relevant: Vec<&Subject> = subjects
            .iter()
            .filter(|s| s.is_offered_to(department, year) && s.subject_type != SubjectType::Minor)
            .collect();
        let divisions: Vec<&Division> = divisions
            .iter()
            .filter(|d| d.department == department && d.year == year)
            .collect();

        let mut total_theory = 0;
        let mut total_practical = 0;
        for subject in &relevant {
            if subject.subject_type.is_elective() {
                let choosing: u32 = divisions
                    .iter()
                    .map(|d| {
                        d.batches
                            .iter()
                            .filter(|b| b.choice_for(&subject.id).is_some())
                            .count() as u32
                    })
                    .sum();
                total_theory += subject.theory_hours * choosing;
                total_practical += subject.practical_hours * choosing;
            } else {
                let batches: u32 = divisions.iter().map(|d| d.batches.len() as u32).sum();
                total_theory += subject.theory_hours * divisions.len() as u32;
                total_practical += subject.practical_hours * batches;
            }
        }

        let placed: Vec<&TimetableEntry> = entries
            .iter()
            .filter(|e| {
                e.division.department == department
                    && e.division.year == year
                    && e.subject.subject_type != SubjectType::Minor
            })
            .collect();
        let hours = |session_type: SessionType| -> u32 {
            placed
                .iter()
                .filter(|e| e.session_type == session_type)
                .map(|e| e.duration())
                .sum()
        };
        let allocated_theory = hours(SessionType::Theory);
        let allocated_practical = hours(SessionType::Practical);

        let unassigned_subjects = relevant
            .iter()
            .filter(|s| !placed.iter().any(|e| e.subject.id == s.id))
            .map(|s| (*s).clone())
            .collect();

        Self {
            department: department.to_string(),
            year,
            total_theory_hours: total_theory,
            total_practical_hours: total_practical,
            allocated_theory_hours: allocated_theory,
            allocated_practical_hours: allocated_practical,
            remaining_theory_hours: total_theory.saturating_sub(allocated_theory),
            remaining_practical_hours: total_practical.saturating_sub(allocated_practical),
            unassigned_subjects,
        }
    }

    /// Whether every required hour was placed.
    pub fn is_complete(&self) -> bool {
        self.remaining_theory_hours == 0 && self.remaining_practical_hours == 0
    }
}

/// Loads for every (department, year) that has a division, in first-seen order.
pub fn department_loads(
    subjects: &[Subject],
    divisions: &[Division],
    entries: &[TimetableEntry],
) -> Vec<DepartmentLoad> {
    let mut seen: Vec<(&str, Year)> = Vec::new();
    for d in divisions {
        let key = (d.department.as_str(), d.year);
        if !seen.contains(&key) {
            seen.push(key);
        }
    }
    seen.into_iter()
        .map(|(department, year)| {
            DepartmentLoad::calculate(department, year, subjects, divisions, entries)
        })
        .collect()
}

/// A free teaching cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VacantSlot {
    pub day: Day,
    pub start_time: String,
    pub end_time: String,
}

/// A room with its free teaching cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VacantRoom {
    pub room: Room,
    pub vacant_slots: Vec<VacantSlot>,
}

/// Free cells per room; fully booked rooms are omitted.
pub fn vacant_rooms(rooms: &[Room], grid: &WeekGrid, tracker: &OccupancyTracker) -> Vec<VacantRoom> {
    rooms
        .iter()
        .filter_map(|room| {
            let vacant_slots: Vec<VacantSlot> = grid
                .days
                .iter()
                .flat_map(|&day| grid.teaching_slots().map(move |slot| (day, slot)))
                .filter(|&(day, slot)| tracker.is_free(ResourceKind::Room, &room.id, day, slot))
                .filter_map(|(day, slot)| {
                    grid.slot(slot).map(|s| VacantSlot {
                        day,
                        start_time: s.start.clone(),
                        end_time: s.end.clone(),
                    })
                })
                .collect();
            (!vacant_slots.is_empty()).then(|| VacantRoom {
                room: room.clone(),
                vacant_slots,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Batch, Faculty, Session};

    fn place(
        subject: &Subject,
        division: &Division,
        batch: Option<&Batch>,
        session_type: SessionType,
        id: &str,
        slots: Vec<usize>,
    ) -> TimetableEntry {
        let faculty = Faculty::new("F1", "Asha Rao", 20);
        let room = Room::classroom("R1");
        Session::new(subject, &faculty, &room, division, session_type)
            .with_batch(batch)
            .to_entry(id, &WeekGrid::standard(), Day::Monday, slots)
    }

    #[test]
    fn test_core_load() {
        let os = Subject::new("OS", "COMP", Year::TE, SubjectType::Core)
            .with_theory_hours(3)
            .with_practical_hours(2);
        let cn = Subject::new("CN", "COMP", Year::TE, SubjectType::Core).with_theory_hours(2);
        let div = Division::new("D1", "COMP", Year::TE, "A")
            .with_batch(Batch::new("B1", "A1"))
            .with_batch(Batch::new("B2", "A2"));

        let entries = vec![
            place(&os, &div, None, SessionType::Theory, "E1", vec![0]),
            place(&os, &div, None, SessionType::Theory, "E2", vec![1]),
            place(&os, &div, div.batches.first(), SessionType::Practical, "E3", vec![4, 5]),
        ];
        let load = DepartmentLoad::calculate(
            "COMP",
            Year::TE,
            &[os, cn],
            std::slice::from_ref(&div),
            &entries,
        );

        assert_eq!(load.total_theory_hours, 5);
        assert_eq!(load.total_practical_hours, 4);
        assert_eq!(load.allocated_theory_hours, 2);
        // Two-slot practical counts both hours
        assert_eq!(load.allocated_practical_hours, 2);
        assert_eq!(load.remaining_theory_hours, 3);
        assert_eq!(load.remaining_practical_hours, 2);
        assert_eq!(load.unassigned_subjects.len(), 1);
        assert_eq!(load.unassigned_subjects[0].id, "CN");
        assert!(!load.is_complete());
    }

    #[test]
    fn test_elective_totals_count_choosing_batches() {
        let dlo = Subject::new("ML", "COMP", Year::BE, SubjectType::Dlo)
            .with_theory_hours(3)
            .with_elective("ML")
            .with_elective("NLP");
        let minor = Subject::new("FIN", "COMP", Year::BE, SubjectType::Minor).with_theory_hours(4);
        let div = Division::new("D1", "COMP", Year::BE, "A")
            .with_batch(Batch::new("B1", "A1").with_choice("ML", "ML"))
            .with_batch(Batch::new("B2", "A2").with_choice("ML", "NLP"))
            .with_batch(Batch::new("B3", "A3"));

        let loads = department_loads(&[dlo, minor], std::slice::from_ref(&div), &[]);
        assert_eq!(loads.len(), 1);
        assert_eq!(loads[0].total_theory_hours, 6);
        // Minor is not part of the department load
        assert_eq!(loads[0].unassigned_subjects.len(), 1);
    }

    #[test]
    fn test_department_loads_first_seen_order() {
        let divisions = vec![
            Division::new("D1", "MECH", Year::SE, "A"),
            Division::new("D2", "COMP", Year::SE, "A"),
            Division::new("D3", "MECH", Year::SE, "B"),
        ];
        let loads = department_loads(&[], &divisions, &[]);
        let keys: Vec<_> = loads.iter().map(|l| l.department.as_str()).collect();
        assert_eq!(keys, vec!["MECH", "COMP"]);
        assert!(loads.iter().all(DepartmentLoad::is_complete));
    }

    #[test]
    fn test_vacant_rooms() {
        let grid = WeekGrid::standard();
        let rooms = vec![Room::classroom("R1"), Room::classroom("R2")];
        let mut tracker = OccupancyTracker::new();
        for day in Day::ALL {
            for slot in grid.teaching_slots() {
                tracker.occupy(ResourceKind::Room, "R1", day, slot);
            }
        }
        tracker.release(ResourceKind::Room, "R1", Day::Friday, 4);
        tracker.occupy(ResourceKind::Room, "R2", Day::Monday, 0);

        let vacant = vacant_rooms(&rooms, &grid, &tracker);
        assert_eq!(vacant.len(), 2);
        assert_eq!(
            vacant[0].vacant_slots,
            vec![VacantSlot {
                day: Day::Friday,
                start_time: "13:00".into(),
                end_time: "14:00".into(),
            }]
        );
        // 42 teaching cells, one taken; the break is never listed
        assert_eq!(vacant[1].vacant_slots.len(), 41);
        assert!(vacant[1].vacant_slots.iter().all(|s| s.start_time != "12:00"));
    }
}
