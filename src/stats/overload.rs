//! Progressive overload - best historical set and per-exercise history

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;

use crate::workout::{WorkoutSession, matching_sets};

/// Best (weight, reps) pair for an exercise
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestSet {
    pub weight: f64,
    pub reps: f64,
}

impl BestSet {
    /// Heavier wins; equal weight falls back to more reps
    pub fn beats(&self, other: &BestSet) -> bool {
        self.weight > other.weight || (self.weight == other.weight && self.reps > other.reps)
    }

    /// Hint shown next to an exercise while editing a draft
    pub fn format_hint(&self) -> String {
        format!("Last time: {} kg × {} reps", self.weight, self.reps)
    }
}

fn best_of(candidates: impl Iterator<Item = BestSet>) -> Option<BestSet> {
    let mut best: Option<BestSet> = None;
    for candidate in candidates {
        if best.is_none_or(|b| candidate.beats(&b)) {
            best = Some(candidate);
        }
    }
    best
}

/// Best set ever logged for `exercise`, matched case-insensitively
///
/// `None` when the exercise has no performed sets in the history.
pub fn best_effort(sessions: &[WorkoutSession], exercise: &str) -> Option<BestSet> {
    best_of(matching_sets(sessions, exercise).map(|(_, set)| BestSet {
        weight: set.weight,
        reps: set.reps,
    }))
}

/// One performed set in an exercise's history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub date: NaiveDate,
    pub weight: f64,
    pub reps: f64,
}

/// All performed sets of one exercise, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseHistory {
    pub exercise: String,
    entries: Vec<HistoryEntry>,
}

impl ExerciseHistory {
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Last `n` entries, oldest first
    pub fn recent(&self, n: usize) -> &[HistoryEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Personal record within this history (same ordering as [`best_effort`])
    pub fn record(&self) -> Option<BestSet> {
        best_of(self.entries.iter().map(|e| BestSet {
            weight: e.weight,
            reps: e.reps,
        }))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collect an exercise's history with dates taken in `tz`
pub fn exercise_history<Tz: TimeZone>(
    sessions: &[WorkoutSession],
    exercise: &str,
    tz: &Tz,
) -> ExerciseHistory {
    let mut entries: Vec<HistoryEntry> = matching_sets(sessions, exercise)
        .map(|(session, set)| HistoryEntry {
            date: session.created_at.with_timezone(tz).date_naive(),
            weight: set.weight,
            reps: set.reps,
        })
        .collect();

    // Stable: sets of one session keep their logged order
    entries.sort_by_key(|e| e.date);

    ExerciseHistory {
        exercise: exercise.to_string(),
        entries,
    }
}
