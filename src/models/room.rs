//! Room model.

use serde::{Deserialize, Serialize};

/// A physical teaching room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Room number shown to users.
    pub room_number: String,
    /// Room classification.
    pub category: RoomCategory,
    /// Seats.
    #[serde(default)]
    pub capacity: u32,
    /// Owning department. `None` = shared pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Room classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoomCategory {
    /// Lecture room for theory.
    Classroom,
    /// Laboratory for practicals.
    Lab,
}

impl Room {
    /// Creates a room.
    pub fn new(id: impl Into<String>, category: RoomCategory) -> Self {
        let id = id.into();
        Self {
            room_number: id.clone(),
            id,
            category,
            capacity: 0,
            department: None,
        }
    }

    /// Creates a classroom.
    pub fn classroom(id: impl Into<String>) -> Self {
        Self::new(id, RoomCategory::Classroom)
    }

    /// Creates a lab.
    pub fn lab(id: impl Into<String>) -> Self {
        Self::new(id, RoomCategory::Lab)
    }

    /// Sets the room number.
    pub fn with_number(mut self, room_number: impl Into<String>) -> Self {
        self.room_number = room_number.into();
        self
    }

    /// Sets the seat count.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Restricts the room to one department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Whether a division of `department` may use this room.
    pub fn is_usable_by(&self, department: &str) -> bool {
        self.department.as_deref().map_or(true, |d| d == department)
    }
}
