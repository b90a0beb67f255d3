//! Personal records - heaviest set per exercise

use std::collections::BTreeMap;

use serde::Serialize;

use crate::workout::{WorkoutSession, exercise_key, normalize};

/// Heaviest set logged for one exercise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalRecord {
    /// Exercise name as first seen in the history
    pub exercise: String,
    pub weight: f64,
    /// Reps of the set that set the record
    pub reps: f64,
}

/// Personal records keyed by case-folded exercise name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonalRecords {
    by_key: BTreeMap<String, PersonalRecord>,
}

impl PersonalRecords {
    /// Build records from a history, in the order given (newest first)
    ///
    /// Only weight is compared: the first set at the top weight keeps the
    /// record, even if a later set matched that weight with more reps.
    pub fn from_sessions(sessions: &[WorkoutSession]) -> Self {
        let mut by_key: BTreeMap<String, PersonalRecord> = BTreeMap::new();

        for entry in sessions.iter().flat_map(normalize) {
            if entry.exercise.is_empty() {
                continue;
            }

            for set in entry.sets.performed() {
                let record = by_key
                    .entry(exercise_key(&entry.exercise))
                    .or_insert_with(|| PersonalRecord {
                        exercise: entry.exercise.clone(),
                        weight: set.weight,
                        reps: set.reps,
                    });

                if set.weight > record.weight {
                    record.weight = set.weight;
                    record.reps = set.reps;
                }
            }
        }

        Self { by_key }
    }

    /// Record for an exercise, matched case-insensitively
    pub fn get(&self, exercise: &str) -> Option<&PersonalRecord> {
        self.by_key.get(&exercise_key(exercise))
    }

    /// Records sorted by exercise name
    pub fn iter(&self) -> impl Iterator<Item = &PersonalRecord> {
        self.by_key.values()
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

pub fn personal_records(sessions: &[WorkoutSession]) -> PersonalRecords {
    PersonalRecords::from_sessions(sessions)
}
