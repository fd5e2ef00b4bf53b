//! Division and batch models.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Year;

/// A whole class-group for theory instruction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Division {
    /// Unique division identifier.
    pub id: String,
    /// Owning department.
    pub department: String,
    /// Year of study.
    pub year: Year,
    /// Division letter, e.g. `"A"`.
    pub name: String,
    /// Practical/elective subgroups in declared order.
    #[serde(default)]
    pub batches: Vec<Batch>,
}

/// A subgroup of a division for labs and elective cohorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    /// Unique batch identifier.
    pub id: String,
    /// Batch name, e.g. `"A1"`.
    pub name: String,
    /// Number of students.
    #[serde(default)]
    pub student_count: u32,
    /// Elective choice per subject (subject id → option label).
    #[serde(default)]
    pub elective_choices: HashMap<String, String>,
    /// Students enrolled in a minor programme.
    #[serde(default)]
    pub minor_students: Vec<String>,
}

impl Division {
    /// Creates a division with no batches.
    pub fn new(
        id: impl Into<String>,
        department: impl Into<String>,
        year: Year,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            department: department.into(),
            year,
            name: name.into(),
            batches: Vec::new(),
        }
    }

    /// Adds a batch.
    pub fn with_batch(mut self, batch: Batch) -> Self {
        self.batches.push(batch);
        self
    }

    /// Grouping key `department-year-name`.
    pub fn key(&self) -> String {
        format!("{}-{}-{}", self.department, self.year, self.name)
    }

    /// Finds a batch by id.
    pub fn batch(&self, batch_id: &str) -> Option<&Batch> {
        self.batches.iter().find(|b| b.id == batch_id)
    }

    /// Groups batches by their recorded choice for `subject_id`.
    ///
    /// Groups keep the order in which each choice is first seen; batches
    /// without a choice are left out.
    pub fn batches_by_choice(&self, subject_id: &str) -> Vec<(&str, Vec<&Batch>)> {
        let mut groups: Vec<(&str, Vec<&Batch>)> = Vec::new();
        for batch in &self.batches {
            let Some(choice) = batch.choice_for(subject_id) else {
                continue;
            };
            match groups.iter_mut().find(|(c, _)| *c == choice) {
                Some((_, members)) => members.push(batch),
                None => groups.push((choice, vec![batch])),
            }
        }
        groups
    }
}

impl Batch {
    /// Creates a batch.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            student_count: 0,
            elective_choices: HashMap::new(),
            minor_students: Vec::new(),
        }
    }

    /// Sets the student count.
    pub fn with_students(mut self, count: u32) -> Self {
        self.student_count = count;
        self
    }

    /// Records an elective choice.
    pub fn with_choice(mut self, subject_id: impl Into<String>, label: impl Into<String>) -> Self {
        self.elective_choices.insert(subject_id.into(), label.into());
        self
    }

    /// Recorded choice for a subject.
    pub fn choice_for(&self, subject_id: &str) -> Option<&str> {
        self.elective_choices.get(subject_id).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_division() -> Division {
        Division::new("D1", "COMP", Year::BE, "A")
            .with_batch(Batch::new("A1", "A1").with_choice("ML", "Deep Learning"))
            .with_batch(Batch::new("A2", "A2").with_choice("ML", "NLP"))
            .with_batch(Batch::new("A3", "A3").with_choice("ML", "Deep Learning"))
            .with_batch(Batch::new("A4", "A4"))
    }

    #[test]
    fn test_division_key() {
        assert_eq!(sample_division().key(), "COMP-BE-A");
    }

    #[test]
    fn test_batch_lookup() {
        let d = sample_division();
        assert_eq!(d.batch("A2").map(|b| b.name.as_str()), Some("A2"));
        assert!(d.batch("Z9").is_none());
    }

    #[test]
    fn test_batches_by_choice() {
        let d = sample_division();
        let groups = d.batches_by_choice("ML");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Deep Learning");
        let ids: Vec<&str> = groups[0].1.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "A3"]);
        assert_eq!(groups[1].0, "NLP");

        // A4 recorded nothing, unrelated subjects have no groups
        assert!(d.batches_by_choice("OTHER").is_empty());
    }
}
