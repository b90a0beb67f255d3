//! Stats module - training statistics derived from session history
//!
//! Every calculator here is a pure function of an already user-scoped
//! session list:
//! - Aggregate counters for the dashboard
//! - Day streak with weekly rest allowance
//! - Best set per exercise (progressive overload hints)
//! - Personal records

pub mod overload;
pub mod records;
pub mod streak;

pub use overload::{BestSet, ExerciseHistory, HistoryEntry, best_effort, exercise_history};
pub use records::{PersonalRecord, PersonalRecords, personal_records};
pub use streak::{compute_streak, compute_streak_in, week_key};

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::workout::{WorkoutPayload, WorkoutSession};

/// Gross counters across a history
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WorkoutStats {
    pub total_exercises: u64,
    pub total_sets: u64,
    /// Sum of weight x reps over logged sets
    pub total_weight: f64,
}

/// Sum exercise, set and volume counters over all sessions
///
/// Generated plans contribute their declared set counts but no weight;
/// logged sessions contribute each performed set and its volume.
pub fn aggregate(sessions: &[WorkoutSession]) -> WorkoutStats {
    let mut stats = WorkoutStats::default();

    for session in sessions {
        match &session.workout {
            WorkoutPayload::Generated { exercises, .. } => {
                for entry in exercises {
                    stats.total_exercises += 1;
                    stats.total_sets += u64::from(entry.sets.declared_count());
                }
            }
            WorkoutPayload::Logged { exercises } => {
                for entry in exercises {
                    stats.total_exercises += 1;
                    for set in entry.sets.performed() {
                        stats.total_sets += 1;
                        stats.total_weight += set.volume();
                    }
                }
            }
            WorkoutPayload::Empty => {}
        }
    }

    stats
}

/// Training analytics over one user's history
pub struct Analytics {
    sessions: Vec<WorkoutSession>,
}

impl Analytics {
    pub fn new(sessions: Vec<WorkoutSession>) -> Self {
        Self { sessions }
    }

    pub fn sessions(&self) -> &[WorkoutSession] {
        &self.sessions
    }

    pub fn stats(&self) -> WorkoutStats {
        aggregate(&self.sessions)
    }

    /// Current streak in local time
    pub fn streak(&self, today: NaiveDate) -> u32 {
        compute_streak(&self.sessions, today)
    }

    pub fn best_effort(&self, exercise: &str) -> Option<BestSet> {
        best_effort(&self.sessions, exercise)
    }

    pub fn personal_records(&self) -> PersonalRecords {
        personal_records(&self.sessions)
    }

    /// Exercise history with local dates
    pub fn history(&self, exercise: &str) -> ExerciseHistory {
        exercise_history(&self.sessions, exercise, &Local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::{Value, json};

    fn create_session(workout: Value) -> WorkoutSession {
        WorkoutSession {
            id: None,
            user_id: "u1".to_string(),
            created_at: Utc::now(),
            workout: WorkoutPayload::from(workout),
        }
    }

    #[test]
    fn test_aggregate_empty() {
        assert_eq!(aggregate(&[]), WorkoutStats::default());
    }

    #[test]
    fn test_aggregate_generated_string_counts() {
        let sessions = vec![create_session(json!({
            "day": "push",
            "variant": "A",
            "workout": [
                { "exercise": "Push-up", "sets": "3", "reps": "10" },
                { "exercise": "Dips", "sets": "3", "reps": "8" }
            ]
        }))];

        let stats = aggregate(&sessions);
        assert_eq!(stats.total_exercises, 2);
        assert_eq!(stats.total_sets, 6);
        assert_eq!(stats.total_weight, 0.0);
    }

    #[test]
    fn test_aggregate_generated_ignores_weight() {
        let sessions = vec![create_session(json!({
            "workout": [{ "exercise": "Squat", "sets": [{ "reps": 5, "weight": 100 }, { "reps": 5, "weight": 100 }] }]
        }))];

        let stats = aggregate(&sessions);
        assert_eq!(stats.total_exercises, 1);
        assert_eq!(stats.total_sets, 2);
        assert_eq!(stats.total_weight, 0.0);
    }

    #[test]
    fn test_aggregate_logged_volume() {
        let sessions = vec![create_session(json!({
            "loggedWorkout": [
                { "exercise": "Bench", "sets": [{ "reps": 5, "weight": 80 }, { "reps": "5", "weight": "80" }] },
                { "exercise": "Row", "sets": [{ "reps": 10, "weight": "bad" }] }
            ]
        }))];

        let stats = aggregate(&sessions);
        assert_eq!(stats.total_exercises, 2);
        assert_eq!(stats.total_sets, 3);
        assert_eq!(stats.total_weight, 800.0);
    }

    #[test]
    fn test_aggregate_across_sessions_and_malformed() {
        let sessions = vec![
            create_session(json!({ "workout": [{ "exercise": "A", "sets": 4 }] })),
            create_session(json!({ "loggedWorkout": [{ "exercise": "B", "sets": [{ "reps": 2, "weight": 10 }] }] })),
            create_session(json!({ "loggedWorkout": [{ "exercise": "C", "sets": 3 }] })),
            create_session(json!({ "day": "legs" })),
            create_session(json!(null)),
        ];

        let stats = aggregate(&sessions);
        assert_eq!(stats.total_exercises, 3);
        assert_eq!(stats.total_sets, 5);
        assert_eq!(stats.total_weight, 20.0);
    }

    #[test]
    fn test_aggregate_idempotent() {
        let sessions = vec![create_session(json!({
            "loggedWorkout": [{ "exercise": "Bench", "sets": [{ "reps": 5, "weight": 80 }] }]
        }))];
        assert_eq!(aggregate(&sessions), aggregate(&sessions));
    }

    #[test]
    fn test_analytics_facade() {
        let analytics = Analytics::new(vec![create_session(json!({
            "loggedWorkout": [{ "exercise": "Bench", "sets": [{ "reps": 5, "weight": 80 }] }]
        }))]);

        assert_eq!(analytics.sessions().len(), 1);
        assert_eq!(analytics.stats().total_sets, 1);
        assert_eq!(analytics.best_effort("bench").map(|b| b.weight), Some(80.0));
        assert_eq!(analytics.personal_records().len(), 1);
        assert_eq!(analytics.history("Bench").entries().len(), 1);
        assert_eq!(analytics.streak(Local::now().date_naive()), 1);
    }
}
