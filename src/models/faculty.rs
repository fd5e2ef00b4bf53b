//! Faculty model.

use serde::{Deserialize, Serialize};

/// A teaching faculty member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    /// Unique faculty identifier.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Initials shown on the grid.
    pub initials: String,
    /// Designation, e.g. `"Assistant Professor"`.
    #[serde(default)]
    pub designation: String,
    /// Weekly hour ceiling.
    pub max_workload: u32,
    /// Hours committed so far.
    #[serde(default)]
    pub current_workload: u32,
    /// Subject ids this faculty is qualified to teach.
    #[serde(default)]
    pub subjects: Vec<String>,
    /// Reserved for future soft constraints; not read by the scheduler.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<FacultyPreferences>,
}

/// Scheduling preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyPreferences {
    #[serde(default)]
    pub preferred_days: Vec<String>,
    #[serde(default)]
    pub preferred_slots: Vec<String>,
}

impl Faculty {
    /// Creates a faculty member with the given weekly ceiling.
    pub fn new(id: impl Into<String>, name: impl Into<String>, max_workload: u32) -> Self {
        let name = name.into();
        let initials = name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .collect();
        Self {
            id: id.into(),
            name,
            initials,
            designation: String::new(),
            max_workload,
            current_workload: 0,
            subjects: Vec::new(),
            preferences: None,
        }
    }

    /// Sets the initials.
    pub fn with_initials(mut self, initials: impl Into<String>) -> Self {
        self.initials = initials.into();
        self
    }

    /// Sets the designation.
    pub fn with_designation(mut self, designation: impl Into<String>) -> Self {
        self.designation = designation.into();
        self
    }

    /// Sets the hours already committed.
    pub fn with_current_workload(mut self, hours: u32) -> Self {
        self.current_workload = hours;
        self
    }

    /// Adds a subject this faculty can teach.
    pub fn with_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subjects.push(subject_id.into());
        self
    }

    /// Whether this faculty can teach `subject_id`.
    pub fn is_qualified_for(&self, subject_id: &str) -> bool {
        self.subjects.iter().any(|s| s == subject_id)
    }

    /// Hours left before the ceiling.
    pub fn spare_capacity(&self) -> u32 {
        self.max_workload.saturating_sub(self.current_workload)
    }
}
