//! Placement rules and scoring.
//!
//! Every entry is checked against a fixed rule list. Hard rules guard the
//! double-booking invariants; soft rules express preferences and only
//! contribute weight.
//!
//! | Rule | Kind | Weight |
//! |------|------|--------|
//! | NoFacultyConflict | hard | 100 |
//! | NoRoomConflict | hard | 100 |
//! | NoDivisionConflict | hard | 100 |
//! | NoBatchConflict | hard | 100 |
//! | FacultyWorkloadBalanced | soft | 50 |
//! | NoGapsInSchedule | soft | 30 |
//! | TheoryBeforePractical | soft | 20 |
//! | AvoidLateSlots | soft | 10 |
//!
//! A placement with any hard violation is invalid and scores 0. Otherwise
//! the score is the sum of the weights of satisfied rules (max 510).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::models::{Day, Session, SessionType, TimetableEntry, WeekGrid};

/// Whether a rule blocks placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleKind {
    Hard,
    Soft,
}

/// A placement rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    NoFacultyConflict,
    NoRoomConflict,
    /// Whole-division theory only.
    NoDivisionConflict,
    NoBatchConflict,
    /// The faculty's entries in the scored set number at most their ceiling.
    FacultyWorkloadBalanced,
    /// Same-day whole-division sessions are at most `max_gap` slots apart.
    NoGapsInSchedule,
    /// A practical does not precede the subject's first theory day.
    TheoryBeforePractical,
    AvoidLateSlots,
}

impl Rule {
    /// All rules in evaluation order.
    pub const ALL: [Rule; 8] = [
        Rule::NoFacultyConflict,
        Rule::NoRoomConflict,
        Rule::NoDivisionConflict,
        Rule::NoBatchConflict,
        Rule::FacultyWorkloadBalanced,
        Rule::NoGapsInSchedule,
        Rule::TheoryBeforePractical,
        Rule::AvoidLateSlots,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rule::NoFacultyConflict => "NoFacultyConflict",
            Rule::NoRoomConflict => "NoRoomConflict",
            Rule::NoDivisionConflict => "NoDivisionConflict",
            Rule::NoBatchConflict => "NoBatchConflict",
            Rule::FacultyWorkloadBalanced => "FacultyWorkloadBalanced",
            Rule::NoGapsInSchedule => "NoGapsInSchedule",
            Rule::TheoryBeforePractical => "TheoryBeforePractical",
            Rule::AvoidLateSlots => "AvoidLateSlots",
        }
    }

    pub fn kind(self) -> RuleKind {
        match self {
            Rule::NoFacultyConflict
            | Rule::NoRoomConflict
            | Rule::NoDivisionConflict
            | Rule::NoBatchConflict => RuleKind::Hard,
            _ => RuleKind::Soft,
        }
    }

    pub fn weight(self) -> u32 {
        match self {
            Rule::NoFacultyConflict
            | Rule::NoRoomConflict
            | Rule::NoDivisionConflict
            | Rule::NoBatchConflict => 100,
            Rule::FacultyWorkloadBalanced => 50,
            Rule::NoGapsInSchedule => 30,
            Rule::TheoryBeforePractical => 20,
            Rule::AvoidLateSlots => 10,
        }
    }

    #[inline]
    pub fn is_hard(self) -> bool {
        self.kind() == RuleKind::Hard
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of scoring one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreCard {
    pub valid: bool,
    pub score: u32,
    /// Every failed rule, hard and soft.
    pub violations: Vec<Rule>,
}

/// Best slot found by [`ConstraintScorer::find_best_slot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestSlot {
    pub day: Day,
    pub slot: usize,
    pub start_time: String,
    pub score: u32,
}

/// Scores entries against the rule list.
#[derive(Debug, Clone)]
pub struct ConstraintScorer {
    grid: WeekGrid,
    late_slot_index: usize,
    max_gap: usize,
}

impl ConstraintScorer {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            grid: config.grid.clone(),
            late_slot_index: config.late_slot_index,
            max_gap: config.max_gap,
        }
    }

    /// Scores `entry` against `all`.
    ///
    /// `all` may contain `entry` itself; it is matched by id and skipped
    /// in conflict checks.
    pub fn score(&self, entry: &TimetableEntry, all: &[TimetableEntry]) -> ScoreCard {
        let mut score = 0;
        let mut violations = Vec::new();
        for rule in Rule::ALL {
            if self.check(rule, entry, all) {
                score += rule.weight();
            } else {
                violations.push(rule);
            }
        }
        let valid = !violations.iter().any(|r| r.is_hard());
        ScoreCard {
            valid,
            score: if valid { score } else { 0 },
            violations,
        }
    }

    /// Whether `entry` satisfies `rule` given `all`.
    pub fn check(&self, rule: Rule, entry: &TimetableEntry, all: &[TimetableEntry]) -> bool {
        let mut others = all.iter().filter(|e| e.id != entry.id);
        match rule {
            Rule::NoFacultyConflict => {
                !others.any(|e| e.faculty.id == entry.faculty.id && e.overlaps(entry))
            }
            Rule::NoRoomConflict => !others.any(|e| e.room.id == entry.room.id && e.overlaps(entry)),
            Rule::NoDivisionConflict => {
                if !is_division_theory(entry) {
                    return true;
                }
                !others.any(|e| {
                    is_division_theory(e) && e.division.id == entry.division.id && e.overlaps(entry)
                })
            }
            Rule::NoBatchConflict => match entry.batch_id() {
                Some(batch_id) => !others.any(|e| e.batch_id() == Some(batch_id) && e.overlaps(entry)),
                None => true,
            },
            Rule::FacultyWorkloadBalanced => {
                let assigned = all.iter().filter(|e| e.faculty.id == entry.faculty.id).count();
                assigned as u32 <= entry.faculty.max_workload
            }
            Rule::NoGapsInSchedule => {
                let mut starts: Vec<usize> = others
                    .filter(|e| {
                        e.is_whole_division()
                            && e.division.id == entry.division.id
                            && e.day == entry.day
                    })
                    .filter_map(TimetableEntry::start_slot)
                    .collect();
                if entry.is_whole_division() {
                    starts.extend(entry.start_slot());
                }
                starts.sort_unstable();
                starts.windows(2).all(|w| w[1] - w[0] <= self.max_gap)
            }
            Rule::TheoryBeforePractical => {
                if entry.session_type != SessionType::Practical {
                    return true;
                }
                let first_theory = others
                    .filter(|e| {
                        e.session_type == SessionType::Theory
                            && e.subject.id == entry.subject.id
                            && e.division.id == entry.division.id
                    })
                    .map(|e| e.day.index())
                    .min();
                first_theory.map_or(true, |day| day <= entry.day.index())
            }
            Rule::AvoidLateSlots => entry
                .start_slot()
                .map_or(true, |slot| slot < self.late_slot_index),
        }
    }

    /// Entries ordered by descending score; ties keep input order.
    ///
    /// Each entry is scored against the full input set. Nothing is moved
    /// on the grid.
    pub fn optimize_schedule(&self, entries: Vec<TimetableEntry>) -> Vec<TimetableEntry> {
        let scores: Vec<u32> = entries.iter().map(|e| self.score(e, &entries).score).collect();
        let mut ranked: Vec<(u32, TimetableEntry)> = scores.into_iter().zip(entries).collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0));
        ranked.into_iter().map(|(_, e)| e).collect()
    }

    /// Exhaustive search for the highest-scoring valid one-slot placement.
    ///
    /// Every (day, teaching slot) is tried in grid order; the first of
    /// equally scored candidates wins.
    pub fn find_best_slot(
        &self,
        session: &Session<'_>,
        existing: &[TimetableEntry],
    ) -> Option<BestSlot> {
        let mut best: Option<BestSlot> = None;
        for &day in &self.grid.days {
            for slot in self.grid.teaching_slots() {
                let trial = session.to_entry("trial", &self.grid, day, vec![slot]);
                let card = self.score(&trial, existing);
                if !card.valid || best.as_ref().is_some_and(|b| b.score >= card.score) {
                    continue;
                }
                best = Some(BestSlot {
                    day,
                    slot,
                    start_time: trial.start_time,
                    score: card.score,
                });
            }
        }
        best
    }
}

fn is_division_theory(entry: &TimetableEntry) -> bool {
    entry.session_type == SessionType::Theory && entry.is_whole_division()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Batch, Division, Faculty, Room, Subject, SubjectType, Year};

    struct Fixture {
        subject: Subject,
        faculty: Faculty,
        room: Room,
        lab: Room,
        division: Division,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                subject: Subject::new("DS", "COMP", Year::SE, SubjectType::Core),
                faculty: Faculty::new("F1", "Asha Rao", 10),
                room: Room::classroom("R1"),
                lab: Room::lab("L1"),
                division: Division::new("D1", "COMP", Year::SE, "A")
                    .with_batch(Batch::new("B1", "A1"))
                    .with_batch(Batch::new("B2", "A2")),
            }
        }

        fn theory(&self, id: &str, day: Day, slot: usize) -> TimetableEntry {
            Session::new(&self.subject, &self.faculty, &self.room, &self.division, SessionType::Theory)
                .to_entry(id, &WeekGrid::standard(), day, vec![slot])
        }

        fn practical(&self, id: &str, batch: usize, day: Day, slots: Vec<usize>) -> TimetableEntry {
            Session::new(&self.subject, &self.faculty, &self.lab, &self.division, SessionType::Practical)
                .with_batch(self.division.batches.get(batch))
                .to_entry(id, &WeekGrid::standard(), day, slots)
        }
    }

    fn scorer() -> ConstraintScorer {
        ConstraintScorer::new(&SchedulerConfig::default())
    }

    #[test]
    fn test_rule_table() {
        let hard: Vec<_> = Rule::ALL.iter().filter(|r| r.is_hard()).collect();
        assert_eq!(hard.len(), 4);
        let total: u32 = Rule::ALL.iter().map(|r| r.weight()).sum();
        assert_eq!(total, 510);
        assert_eq!(Rule::AvoidLateSlots.to_string(), "AvoidLateSlots");
    }

    #[test]
    fn test_lone_entry_scores_full() {
        let fx = Fixture::new();
        let e = fx.theory("E1", Day::Monday, 0);
        let card = scorer().score(&e, std::slice::from_ref(&e));
        assert!(card.valid);
        assert_eq!(card.score, 510);
        assert!(card.violations.is_empty());
    }

    #[test]
    fn test_faculty_conflict_invalidates() {
        let fx = Fixture::new();
        let a = fx.theory("E1", Day::Monday, 0);
        let mut b = fx.theory("E2", Day::Monday, 0);
        b.room = Room::classroom("R2");
        b.division = Division::new("D2", "COMP", Year::SE, "B");

        let card = scorer().score(&b, &[a, b.clone()]);
        assert!(!card.valid);
        assert_eq!(card.score, 0);
        assert_eq!(card.violations, vec![Rule::NoFacultyConflict]);
    }

    #[test]
    fn test_division_conflict_only_for_whole_division_theory() {
        let fx = Fixture::new();
        let theory = fx.theory("E1", Day::Monday, 0);
        let mut other = fx.theory("E2", Day::Monday, 0);
        other.faculty = Faculty::new("F2", "Bina Shah", 10);
        other.room = Room::classroom("R2");
        let card = scorer().score(&other, &[theory.clone()]);
        assert!(card.violations.contains(&Rule::NoDivisionConflict));

        // A batch practical at the same time does not clash with division theory
        let mut practical = fx.practical("E3", 0, Day::Monday, vec![0]);
        practical.faculty = Faculty::new("F2", "Bina Shah", 10);
        let card = scorer().score(&practical, &[theory]);
        assert!(card.valid);
    }

    #[test]
    fn test_batch_conflict_uses_covered_slots() {
        let fx = Fixture::new();
        let a = fx.practical("E1", 0, Day::Monday, vec![4, 5]);
        let mut b = fx.practical("E2", 0, Day::Monday, vec![5, 6]);
        b.faculty = Faculty::new("F2", "Bina Shah", 10);
        b.room = Room::lab("L2");
        let card = scorer().score(&b, &[a.clone()]);
        assert_eq!(card.violations.first(), Some(&Rule::NoBatchConflict));

        let mut c = fx.practical("E3", 1, Day::Monday, vec![5, 6]);
        c.faculty = Faculty::new("F2", "Bina Shah", 10);
        c.room = Room::lab("L2");
        assert!(scorer().score(&c, &[a]).valid);
    }

    #[test]
    fn test_workload_soft() {
        let mut fx = Fixture::new();
        fx.faculty.max_workload = 2;
        let a = fx.theory("E1", Day::Monday, 0);
        let b = fx.theory("E2", Day::Tuesday, 0);
        let c = fx.theory("E3", Day::Wednesday, 0);
        let all = vec![a, b, c.clone()];

        let card = scorer().score(&c, &all);
        assert!(card.valid);
        assert_eq!(card.violations, vec![Rule::FacultyWorkloadBalanced]);
        assert_eq!(card.score, 460);
    }

    #[test]
    fn test_workload_counts_entries_in_scored_set() {
        let mut fx = Fixture::new();
        fx.faculty.max_workload = 2;
        let existing = vec![
            fx.theory("E1", Day::Monday, 0),
            fx.practical("E2", 0, Day::Tuesday, vec![4, 5]),
        ];
        let candidate = fx.theory("E3", Day::Wednesday, 0);
        let s = scorer();

        // Two entries against a ceiling of two, whatever their length
        assert!(s.check(Rule::FacultyWorkloadBalanced, &candidate, &existing));

        let mut all = existing;
        all.push(candidate.clone());
        assert!(!s.check(Rule::FacultyWorkloadBalanced, &candidate, &all));
    }

    #[test]
    fn test_gap_rule() {
        let fx = Fixture::new();
        let a = fx.theory("E1", Day::Monday, 0);
        let near = fx.theory("E2", Day::Monday, 2);
        let far = fx.theory("E3", Day::Monday, 4);
        let s = scorer();

        assert!(s.check(Rule::NoGapsInSchedule, &near, &[a.clone()]));
        assert!(!s.check(Rule::NoGapsInSchedule, &far, &[a.clone()]));
        // Bridging the gap fixes it
        assert!(s.check(Rule::NoGapsInSchedule, &far, &[a, near]));
    }

    #[test]
    fn test_theory_before_practical() {
        let fx = Fixture::new();
        let theory = fx.theory("E1", Day::Wednesday, 0);
        let early = fx.practical("E2", 0, Day::Tuesday, vec![4, 5]);
        let late = fx.practical("E3", 0, Day::Thursday, vec![4, 5]);
        let s = scorer();

        assert!(!s.check(Rule::TheoryBeforePractical, &early, &[theory.clone()]));
        assert!(s.check(Rule::TheoryBeforePractical, &late, &[theory]));
        // No theory yet: nothing to order against
        assert!(s.check(Rule::TheoryBeforePractical, &early, &[]));
    }

    #[test]
    fn test_avoid_late_slots() {
        let fx = Fixture::new();
        let s = scorer();
        assert!(s.check(Rule::AvoidLateSlots, &fx.theory("E1", Day::Monday, 5), &[]));
        assert!(!s.check(Rule::AvoidLateSlots, &fx.theory("E2", Day::Monday, 6), &[]));
    }

    #[test]
    fn test_optimize_schedule_is_stable() {
        let fx = Fixture::new();
        let late = fx.theory("E1", Day::Monday, 7);
        let early = fx.theory("E2", Day::Tuesday, 0);
        let also_early = fx.theory("E3", Day::Wednesday, 1);

        let ordered = scorer().optimize_schedule(vec![late, early, also_early]);
        let ids: Vec<_> = ordered.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["E2", "E3", "E1"]);
    }

    #[test]
    fn test_find_best_slot() {
        let fx = Fixture::new();
        let session =
            Session::new(&fx.subject, &fx.faculty, &fx.room, &fx.division, SessionType::Theory);
        let s = scorer();

        let best = s.find_best_slot(&session, &[]).unwrap();
        assert_eq!((best.day, best.slot), (Day::Monday, 0));
        assert_eq!(best.start_time, "09:00");
        assert_eq!(best.score, 510);

        // Faculty busy Monday 09:00: next slot keeps the day gap-free
        let busy = fx.theory("E1", Day::Monday, 0);
        let best = s.find_best_slot(&session, &[busy]).unwrap();
        assert_eq!((best.day, best.slot), (Day::Monday, 1));
    }

    #[test]
    fn test_find_best_slot_none_when_faculty_full() {
        let fx = Fixture::new();
        let grid = WeekGrid::standard();
        let mut existing = Vec::new();
        for day in Day::ALL {
            for slot in grid.teaching_slots() {
                existing.push(fx.theory(&format!("{day}-{slot}"), day, slot));
            }
        }
        let session =
            Session::new(&fx.subject, &fx.faculty, &fx.room, &fx.division, SessionType::Theory);
        assert!(scorer().find_best_slot(&session, &existing).is_none());
    }
}
