//! Subject model.
//!
//! A subject carries its weekly theory/practical load and a type that
//! drives how the generator places it: core subjects are taught to the
//! whole division, electives and minors per batch, and minors prefer the
//! edges of the day.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Academic year of study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Year {
    /// First year.
    FE,
    /// Second year.
    SE,
    /// Third year.
    TE,
    /// Final year.
    BE,
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Year::FE => "FE",
            Year::SE => "SE",
            Year::TE => "TE",
            Year::BE => "BE",
        };
        f.write_str(s)
    }
}

/// Subject classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubjectType {
    /// Compulsory subject.
    Core,
    /// Lab-centred compulsory subject.
    Lab,
    /// Department-level optional (elective).
    Dlo,
    /// Institute-level optional (elective).
    Ilo,
    /// Minor programme subject.
    Minor,
}

/// Who attends a theory session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudienceGranularity {
    /// The whole division at once.
    WholeDivision,
    /// Each batch separately, grouped by elective choice.
    PerBatch,
}

/// Where in the day the slot finder looks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotPreference {
    /// Chronological first-fit.
    #[default]
    Normal,
    /// First slot of the day, then the late edge.
    Edges,
}

/// Placement behaviour derived from a [`SubjectType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubjectProfile {
    pub audience: AudienceGranularity,
    pub slot_preference: SlotPreference,
}

impl SubjectType {
    /// Placement behaviour for theory sessions of this type.
    pub fn profile(self) -> SubjectProfile {
        match self {
            SubjectType::Core | SubjectType::Lab => SubjectProfile {
                audience: AudienceGranularity::WholeDivision,
                slot_preference: SlotPreference::Normal,
            },
            SubjectType::Dlo | SubjectType::Ilo => SubjectProfile {
                audience: AudienceGranularity::PerBatch,
                slot_preference: SlotPreference::Normal,
            },
            SubjectType::Minor => SubjectProfile {
                audience: AudienceGranularity::PerBatch,
                slot_preference: SlotPreference::Edges,
            },
        }
    }

    /// Whether batches pick an option for this subject.
    pub fn is_elective(self) -> bool {
        self.profile().audience == AudienceGranularity::PerBatch
    }
}

/// A subject taught to a department's year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    /// Unique subject identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Short course code.
    pub code: String,
    /// Owning department.
    pub department: String,
    /// Year of study.
    pub year: Year,
    /// Semester number within the year.
    #[serde(default)]
    pub semester: u8,
    /// Theory hours per week.
    #[serde(default)]
    pub theory_hours: u32,
    /// Practical hours per week (per batch).
    #[serde(default)]
    pub practical_hours: u32,
    /// Tutorial hours per week (not placed by the generator).
    #[serde(default)]
    pub tutorial_hours: u32,
    /// Subject classification.
    #[serde(rename = "type")]
    pub subject_type: SubjectType,
    /// Option labels for electives and minors.
    #[serde(default)]
    pub electives: Vec<String>,
}

impl Subject {
    /// Creates a subject with no hours.
    pub fn new(
        id: impl Into<String>,
        department: impl Into<String>,
        year: Year,
        subject_type: SubjectType,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            code: id.clone(),
            id,
            department: department.into(),
            year,
            semester: 1,
            theory_hours: 0,
            practical_hours: 0,
            tutorial_hours: 0,
            subject_type,
            electives: Vec::new(),
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the course code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the semester.
    pub fn with_semester(mut self, semester: u8) -> Self {
        self.semester = semester;
        self
    }

    /// Sets weekly theory hours.
    pub fn with_theory_hours(mut self, hours: u32) -> Self {
        self.theory_hours = hours;
        self
    }

    /// Sets weekly practical hours.
    pub fn with_practical_hours(mut self, hours: u32) -> Self {
        self.practical_hours = hours;
        self
    }

    /// Sets weekly tutorial hours.
    pub fn with_tutorial_hours(mut self, hours: u32) -> Self {
        self.tutorial_hours = hours;
        self
    }

    /// Adds an elective option label.
    pub fn with_elective(mut self, label: impl Into<String>) -> Self {
        self.electives.push(label.into());
        self
    }

    /// Whether this subject belongs to the given department and year.
    pub fn is_offered_to(&self, department: &str, year: Year) -> bool {
        self.department == department && self.year == year
    }

    /// Placement behaviour for this subject's theory.
    pub fn profile(&self) -> SubjectProfile {
        self.subject_type.profile()
    }
}
