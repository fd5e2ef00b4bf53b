//! First-fit slot finder.
//!
//! # Algorithm
//! Days in grid order; within a day, teaching slots in chronological
//! order. A start is accepted when every slot of its window is free for
//! the faculty, the room and the audience (division for whole-division
//! theory, batch otherwise). The first accepted start wins.
//!
//! Edge preference (minors): per day, try the first teaching slot, then
//! the teaching slots at or after the edge cutoff from latest to earliest.
//! If no day yields an edge slot, the normal scan runs.
//!
//! # Complexity
//! O(d * s * w) tracker lookups for d days, s slots/day, window length w.

use log::trace;

use crate::config::SchedulerConfig;
use crate::models::{Audience, Day, SlotPreference, WeekGrid};
use crate::occupancy::OccupancyTracker;

/// What to find a slot for.
#[derive(Debug, Clone, Copy)]
pub struct SlotRequest<'a> {
    pub faculty_id: &'a str,
    pub room_id: &'a str,
    pub audience: Audience<'a>,
    /// Window length in teaching slots.
    pub duration: usize,
    pub preference: SlotPreference,
}

impl<'a> SlotRequest<'a> {
    /// Creates a normal-preference request.
    pub fn new(faculty_id: &'a str, room_id: &'a str, audience: Audience<'a>, duration: usize) -> Self {
        Self {
            faculty_id,
            room_id,
            audience,
            duration,
            preference: SlotPreference::Normal,
        }
    }

    /// Sets the slot preference.
    pub fn with_preference(mut self, preference: SlotPreference) -> Self {
        self.preference = preference;
        self
    }
}

/// A found window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub day: Day,
    /// Covered teaching slot indices; the first is the start.
    pub slots: Vec<usize>,
}

impl Placement {
    /// Start slot index, `None` for an empty window.
    pub fn start(&self) -> Option<usize> {
        self.slots.first().copied()
    }
}

/// Finds free windows on a tracker.
#[derive(Debug, Clone, Copy)]
pub struct SlotFinder<'a> {
    grid: &'a WeekGrid,
    tracker: &'a OccupancyTracker,
    span_break: bool,
    edge_cutoff: Option<usize>,
}

impl<'a> SlotFinder<'a> {
    /// Creates a finder reading `tracker` under `config`.
    pub fn new(config: &'a SchedulerConfig, tracker: &'a OccupancyTracker) -> Self {
        Self {
            grid: &config.grid,
            tracker,
            span_break: config.span_break,
            edge_cutoff: config.edge_cutoff_index(),
        }
    }

    /// Returns the first window where all requested resources are free.
    ///
    /// `None` means "could not place", not an error.
    pub fn find(&self, request: &SlotRequest<'_>) -> Option<Placement> {
        if request.duration == 0 {
            return None;
        }
        let found = match request.preference {
            SlotPreference::Edges => self.find_edge(request).or_else(|| self.find_first(request)),
            SlotPreference::Normal => self.find_first(request),
        };
        trace!(
            "slot search faculty={} room={} audience={:?} duration={} -> {:?}",
            request.faculty_id,
            request.room_id,
            request.audience,
            request.duration,
            found
        );
        found
    }

    /// Whether the window starting at (day, start) is free.
    pub fn try_start(&self, request: &SlotRequest<'_>, day: Day, start: usize) -> Option<Placement> {
        let slots = self.grid.window(start, request.duration, self.span_break)?;
        self.tracker
            .is_window_free(request.faculty_id, request.room_id, request.audience, day, &slots)
            .then_some(Placement { day, slots })
    }

    fn find_first(&self, request: &SlotRequest<'_>) -> Option<Placement> {
        self.grid.days.iter().find_map(|&day| {
            self.grid
                .teaching_slots()
                .find_map(|start| self.try_start(request, day, start))
        })
    }

    fn find_edge(&self, request: &SlotRequest<'_>) -> Option<Placement> {
        let first = self.grid.teaching_slots().next()?;
        let cutoff = self.edge_cutoff?;
        self.grid.days.iter().find_map(|&day| {
            self.try_start(request, day, first).or_else(|| {
                self.grid
                    .teaching_slots()
                    .rev()
                    .take_while(|&s| s >= cutoff)
                    .find_map(|start| self.try_start(request, day, start))
            })
        })
    }
}
