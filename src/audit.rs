//! Whole-timetable audits.
//!
//! Unlike the scheduler checks, which guard one placement at a time,
//! these inspect a finished entry set: an imported timetable, or one
//! edited outside the scheduler.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::models::{Day, Faculty, TimetableEntry};
use crate::occupancy::ResourceKind;

/// Two or more entries holding the same resource in one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub kind: ResourceKind,
    pub resource_id: String,
    /// Display name: faculty name, room number, division or batch name.
    pub resource_name: String,
    pub day: Day,
    pub slot: usize,
    /// Entries involved, in input order.
    pub entry_ids: Vec<String>,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} has {} classes at {} slot {}",
            self.kind,
            self.resource_name,
            self.entry_ids.len(),
            self.day,
            self.slot
        )
    }
}

/// Every double booking in `entries`.
///
/// Entries are compared on covered slots. Division conflicts only count
/// whole-division entries and batch conflicts only batch entries.
/// Output is ordered by cell, then resource kind, then resource id.
pub fn detect_conflicts(entries: &[TimetableEntry]) -> Vec<Conflict> {
    type Key<'a> = ((Day, usize), ResourceKind, &'a str);
    let mut holders: BTreeMap<Key<'_>, (&str, Vec<&str>)> = BTreeMap::new();

    for entry in entries {
        let mut held: Vec<(ResourceKind, &str, &str)> = vec![
            (ResourceKind::Faculty, entry.faculty.id.as_str(), entry.faculty.name.as_str()),
            (ResourceKind::Room, entry.room.id.as_str(), entry.room.room_number.as_str()),
        ];
        held.push(match &entry.batch {
            Some(batch) => (ResourceKind::Batch, batch.id.as_str(), batch.name.as_str()),
            None => (
                ResourceKind::Division,
                entry.division.id.as_str(),
                entry.division.name.as_str(),
            ),
        });
        for &slot in &entry.slots {
            for &(kind, id, name) in &held {
                holders
                    .entry(((entry.day, slot), kind, id))
                    .or_insert_with(|| (name, Vec::new()))
                    .1
                    .push(entry.id.as_str());
            }
        }
    }

    holders
        .into_iter()
        .filter(|(_, (_, ids))| ids.len() > 1)
        .map(|(((day, slot), kind, id), (name, ids))| Conflict {
            kind,
            resource_id: id.to_string(),
            resource_name: name.to_string(),
            day,
            slot,
            entry_ids: ids.into_iter().map(str::to_string).collect(),
        })
        .collect()
}

/// A faculty member scheduled beyond their ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overload {
    pub faculty_id: String,
    pub name: String,
    pub assigned: u32,
    pub max: u32,
}

impl fmt::Display for Overload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is overloaded: {}h assigned vs {}h max",
            self.name, self.assigned, self.max
        )
    }
}

/// Faculty whose summed entry durations exceed `max_workload`.
pub fn validate_faculty_workload(faculty: &[Faculty], entries: &[TimetableEntry]) -> Vec<Overload> {
    faculty
        .iter()
        .filter_map(|f| {
            let assigned: u32 = entries
                .iter()
                .filter(|e| e.faculty.id == f.id)
                .map(TimetableEntry::duration)
                .sum();
            (assigned > f.max_workload).then(|| Overload {
                faculty_id: f.id.clone(),
                name: f.name.clone(),
                assigned,
                max: f.max_workload,
            })
        })
        .collect()
}
