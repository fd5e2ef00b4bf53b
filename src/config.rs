//! Scheduler configuration.

use serde::{Deserialize, Serialize};

use crate::models::WeekGrid;

/// Tunables shared by the slot finder, scorer and generators.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use u_timetable::SchedulerConfig;
///
/// let config: SchedulerConfig = serde_json::from_str(r#"{ "practicalBlock": 3 }"#).unwrap();
/// assert_eq!(config.practical_block, 3);
/// assert_eq!(config.edge_cutoff, "15:00");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    /// Days and slots to place sessions on.
    pub grid: WeekGrid,
    /// Maximum slots per practical placement.
    pub practical_block: usize,
    /// Earliest late-edge start for edge-preferring subjects.
    pub edge_cutoff: String,
    /// Slot indices at or after this are "late".
    pub late_slot_index: usize,
    /// Largest tolerated distance between consecutive division sessions.
    pub max_gap: usize,
    /// Whether a multi-slot window may continue across the break.
    pub span_break: bool,
    /// Whether bulk generation starts every faculty at zero hours.
    pub reset_workloads: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            grid: WeekGrid::standard(),
            practical_block: 2,
            edge_cutoff: "15:00".to_string(),
            late_slot_index: 6,
            max_gap: 2,
            span_break: false,
            reset_workloads: true,
        }
    }
}

impl SchedulerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the week grid.
    pub fn with_grid(mut self, grid: WeekGrid) -> Self {
        self.grid = grid;
        self
    }

    /// Sets the maximum practical block length (at least 1).
    pub fn with_practical_block(mut self, slots: usize) -> Self {
        self.practical_block = slots.max(1);
        self
    }

    /// Sets the late-edge cutoff label.
    pub fn with_edge_cutoff(mut self, start: impl Into<String>) -> Self {
        self.edge_cutoff = start.into();
        self
    }

    /// Sets the late-slot threshold.
    pub fn with_late_slot_index(mut self, index: usize) -> Self {
        self.late_slot_index = index;
        self
    }

    /// Sets the gap tolerance.
    pub fn with_max_gap(mut self, slots: usize) -> Self {
        self.max_gap = slots;
        self
    }

    /// Allows windows to span the break.
    pub fn with_span_break(mut self, span: bool) -> Self {
        self.span_break = span;
        self
    }

    /// Chooses full-rebuild (`true`) or additive (`false`) workloads.
    pub fn with_reset_workloads(mut self, reset: bool) -> Self {
        self.reset_workloads = reset;
        self
    }

    /// Grid index of the late-edge cutoff.
    ///
    /// Falls back to the first slot starting at or after the cutoff label,
    /// so a cutoff between slot boundaries still works.
    pub fn edge_cutoff_index(&self) -> Option<usize> {
        self.grid.slot_index(&self.edge_cutoff).or_else(|| {
            self.grid
                .slots
                .iter()
                .position(|s| s.start.as_str() >= self.edge_cutoff.as_str())
        })
    }
}
