//! Teaching allocation model.
//!
//! An allocation binds a subject, a faculty member and an audience
//! (division, or one batch of it) before any time slot is chosen. It is
//! the unit the incremental scheduler places.

use serde::{Deserialize, Serialize};

use super::RoomCategory;

/// Kind of teaching session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionType {
    /// Lecture.
    Theory,
    /// Lab session.
    Practical,
}

impl SessionType {
    /// Room category the session needs.
    pub fn room_category(self) -> RoomCategory {
        match self {
            SessionType::Theory => RoomCategory::Classroom,
            SessionType::Practical => RoomCategory::Lab,
        }
    }
}

/// A pre-scheduling teaching assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAllocation {
    /// Unique allocation identifier.
    pub id: String,
    /// Subject taught.
    pub subject_id: String,
    /// Faculty teaching it.
    pub faculty_id: String,
    /// Division taught.
    pub division_id: String,
    /// Batch taught, for practicals and elective cohorts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_id: Option<String>,
    /// Theory or practical.
    #[serde(rename = "type")]
    pub session_type: SessionType,
    /// Weekly hours covered by this allocation.
    pub hours: u32,
}

impl SubjectAllocation {
    /// Creates a whole-division allocation.
    pub fn new(
        id: impl Into<String>,
        subject_id: impl Into<String>,
        faculty_id: impl Into<String>,
        division_id: impl Into<String>,
        session_type: SessionType,
        hours: u32,
    ) -> Self {
        Self {
            id: id.into(),
            subject_id: subject_id.into(),
            faculty_id: faculty_id.into(),
            division_id: division_id.into(),
            batch_id: None,
            session_type,
            hours,
        }
    }

    /// Scopes the allocation to one batch.
    pub fn with_batch(mut self, batch_id: impl Into<String>) -> Self {
        self.batch_id = Some(batch_id.into());
        self
    }
}
