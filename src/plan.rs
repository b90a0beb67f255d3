//! Workout plans - generator request/response and the editable draft
//!
//! The generator is an LLM behind HTTP that answers with free text holding
//! one JSON object. This module builds the request, pulls the plan out of the
//! answer and turns it into a draft the user edits before saving.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::workout::{
    ExerciseEntry, SetEntry, Sets, Variant, WorkoutPayload, WorkoutSession, coerce_number,
};

/// Generators are asked for at most this many exercises
pub const MAX_PLAN_EXERCISES: usize = 5;

/// Sets seeded when a plan gives no usable count
pub const DEFAULT_SET_COUNT: u32 = 3;

/// Upper bound on sets seeded per planned exercise
pub const MAX_PLAN_SETS: u32 = 10;

/// Reps for seeded and newly added sets
pub const DEFAULT_REPS: f64 = 10.0;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("generator returned no JSON object")]
    NoJson,

    #[error("generator returned invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("generator returned an empty workout")]
    EmptyPlan,
}

/// Request body for the workout generator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutRequest {
    pub user_id: String,
    #[serde(rename = "workoutType")]
    pub split: String,
    pub variant: Variant,
    pub level: String,
    pub equipment: String,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
}

impl WorkoutRequest {
    /// Beginner, no equipment, 30 minutes
    pub fn new(user_id: impl Into<String>, split: &str, variant: Variant) -> Self {
        Self {
            user_id: user_id.into(),
            split: split.trim().to_lowercase(),
            variant,
            level: "Beginner".to_string(),
            equipment: "None".to_string(),
            duration_minutes: 30,
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_equipment(mut self, equipment: impl Into<String>) -> Self {
        self.equipment = equipment.into();
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.user_id.trim().is_empty() {
            return Err(PlanError::MissingField("user_id"));
        }
        if self.split.is_empty() {
            return Err(PlanError::MissingField("workoutType"));
        }
        if self.level.trim().is_empty() {
            return Err(PlanError::MissingField("level"));
        }
        if self.equipment.trim().is_empty() {
            return Err(PlanError::MissingField("equipment"));
        }
        if self.duration_minutes == 0 {
            return Err(PlanError::MissingField("duration"));
        }
        Ok(())
    }
}

/// One suggested exercise as returned by the generator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedExercise {
    pub exercise: String,
    pub sets: u32,
    pub reps: f64,
    /// Rest between sets, seconds
    pub rest: f64,
}

impl PlannedExercise {
    fn from_value(value: &Value) -> Option<Self> {
        let exercise = value.get("exercise")?.as_str()?.trim();
        if exercise.is_empty() {
            return None;
        }

        let sets = value.get("sets").map(coerce_number).unwrap_or(0.0);
        Some(Self {
            exercise: exercise.to_string(),
            sets: if sets > 0.0 {
                sets.min(f64::from(MAX_PLAN_SETS)).floor() as u32
            } else {
                0
            },
            reps: value.get("reps").map(coerce_number).unwrap_or(0.0),
            rest: value.get("rest").map(coerce_number).unwrap_or(0.0),
        })
    }
}

/// Extract the plan from the generator's raw answer
///
/// Takes everything from the first `{` to the last `}` and expects a
/// non-empty `workout` array in it. Extra exercises beyond
/// [`MAX_PLAN_EXERCISES`] are dropped.
pub fn parse_plan_response(raw: &str) -> Result<Vec<PlannedExercise>, PlanError> {
    let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) else {
        return Err(PlanError::NoJson);
    };
    if end < start {
        return Err(PlanError::NoJson);
    }

    let value: Value = serde_json::from_str(&raw[start..=end])?;
    let items = value
        .get("workout")
        .and_then(Value::as_array)
        .ok_or(PlanError::EmptyPlan)?;

    let plan: Vec<PlannedExercise> = items
        .iter()
        .filter_map(PlannedExercise::from_value)
        .take(MAX_PLAN_EXERCISES)
        .collect();

    if plan.is_empty() {
        return Err(PlanError::EmptyPlan);
    }
    if items.len() > MAX_PLAN_EXERCISES {
        warn!("Generator returned {} exercises, keeping {}", items.len(), MAX_PLAN_EXERCISES);
    }
    debug!("Parsed plan with {} exercises", plan.len());

    Ok(plan)
}

/// Variant for the next generation of `split`
///
/// Alternates only when the previous session was the same split.
pub fn next_variant(last_session: Option<&WorkoutSession>, split: &str) -> Variant {
    let Some(last) = last_session else {
        return Variant::A;
    };
    if last.workout.day() != Some(split) {
        return Variant::A;
    }
    match last.workout.variant() {
        Some(Variant::A) => Variant::B,
        _ => Variant::A,
    }
}

/// Which value of a set to edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetField {
    Reps,
    Weight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DraftExercise {
    pub exercise: String,
    pub sets: Vec<SetEntry>,
}

fn default_set() -> SetEntry {
    SetEntry::new(DEFAULT_REPS, 0.0)
}

/// Workout being edited before it is saved
///
/// Edits take indices; out-of-range indices leave the draft untouched and
/// return `false`.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftWorkout {
    pub day: String,
    pub variant: Variant,
    pub exercises: Vec<DraftExercise>,
}

impl DraftWorkout {
    /// Seed a draft from a generated plan, every weight starting at 0
    ///
    /// Set counts are capped at [`MAX_PLAN_SETS`].
    pub fn from_plan(split: &str, variant: Variant, plan: &[PlannedExercise]) -> Self {
        let exercises = plan
            .iter()
            .map(|p| {
                let count = match p.sets {
                    0 => DEFAULT_SET_COUNT,
                    n => n.min(MAX_PLAN_SETS),
                };
                let reps = if p.reps > 0.0 { p.reps } else { DEFAULT_REPS };
                DraftExercise {
                    exercise: p.exercise.clone(),
                    sets: (0..count).map(|_| SetEntry::new(reps, 0.0)).collect(),
                }
            })
            .collect();

        Self {
            day: split.to_string(),
            variant,
            exercises,
        }
    }

    pub fn add_set(&mut self, exercise: usize) -> bool {
        match self.exercises.get_mut(exercise) {
            Some(ex) => {
                ex.sets.push(default_set());
                true
            }
            None => false,
        }
    }

    pub fn delete_set(&mut self, exercise: usize, set: usize) -> bool {
        match self.exercises.get_mut(exercise) {
            Some(ex) if set < ex.sets.len() => {
                ex.sets.remove(set);
                true
            }
            _ => false,
        }
    }

    pub fn update_set(&mut self, exercise: usize, set: usize, field: SetField, value: f64) -> bool {
        let Some(entry) = self
            .exercises
            .get_mut(exercise)
            .and_then(|ex| ex.sets.get_mut(set))
        else {
            return false;
        };

        let value = if value.is_finite() { value } else { 0.0 };
        match field {
            SetField::Reps => entry.reps = value,
            SetField::Weight => entry.weight = value,
        }
        true
    }

    /// Append a custom exercise with one default set; blank names are ignored
    pub fn add_exercise(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.exercises.push(DraftExercise {
            exercise: name.to_string(),
            sets: vec![default_set()],
        });
        true
    }

    pub fn remove_exercise(&mut self, exercise: usize) -> bool {
        if exercise >= self.exercises.len() {
            return false;
        }
        self.exercises.remove(exercise);
        true
    }

    /// Reorder: move the exercise at `from` so it ends up at `to`
    pub fn move_exercise(&mut self, from: usize, to: usize) -> bool {
        move_item(&mut self.exercises, from, to)
    }

    pub fn move_set(&mut self, exercise: usize, from: usize, to: usize) -> bool {
        match self.exercises.get_mut(exercise) {
            Some(ex) => move_item(&mut ex.sets, from, to),
            None => false,
        }
    }

    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    /// Payload in the generated shape, ready to store
    pub fn into_payload(self) -> WorkoutPayload {
        WorkoutPayload::Generated {
            day: Some(self.day),
            variant: Some(self.variant),
            exercises: self
                .exercises
                .into_iter()
                .map(|e| ExerciseEntry::new(e.exercise, Sets::Performed(e.sets)))
                .collect(),
        }
    }
}

fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn planned(exercise: &str, sets: u32, reps: f64) -> PlannedExercise {
        PlannedExercise {
            exercise: exercise.to_string(),
            sets,
            reps,
            rest: 60.0,
        }
    }

    fn last_session(workout: Value) -> WorkoutSession {
        WorkoutSession {
            id: Some(1),
            user_id: "u1".to_string(),
            created_at: Utc::now(),
            workout: WorkoutPayload::from(workout),
        }
    }

    #[test]
    fn test_parse_plan_with_surrounding_text() {
        let raw = r#"Here is your workout:
{
  "workout": [
    { "exercise": "Goblet Squat", "sets": "3", "reps": "12", "rest": "60" },
    { "exercise": "Lunge", "sets": "4", "reps": "10", "rest": "45" }
  ]
}
Enjoy!"#;

        let plan = parse_plan_response(raw).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0], PlannedExercise {
            exercise: "Goblet Squat".to_string(),
            sets: 3,
            reps: 12.0,
            rest: 60.0,
        });
        assert_eq!(plan[1].sets, 4);
    }

    #[test]
    fn test_parse_plan_no_json() {
        assert!(matches!(parse_plan_response("sorry, no"), Err(PlanError::NoJson)));
        assert!(matches!(parse_plan_response("} backwards {"), Err(PlanError::NoJson)));
    }

    #[test]
    fn test_parse_plan_invalid_json() {
        let result = parse_plan_response("{ workout: [ }");
        assert!(matches!(result, Err(PlanError::InvalidJson(_))));
    }

    #[test]
    fn test_parse_plan_empty() {
        assert!(matches!(parse_plan_response(r#"{"workout": []}"#), Err(PlanError::EmptyPlan)));
        assert!(matches!(parse_plan_response(r#"{"plan": [1]}"#), Err(PlanError::EmptyPlan)));
        assert!(matches!(
            parse_plan_response(r#"{"workout": [{"exercise": ""}, 3]}"#),
            Err(PlanError::EmptyPlan)
        ));
    }

    #[test]
    fn test_parse_plan_truncates() {
        let items: Vec<Value> = (0..8)
            .map(|i| json!({ "exercise": format!("Ex {}", i), "sets": 3, "reps": 10 }))
            .collect();
        let raw = json!({ "workout": items }).to_string();

        let plan = parse_plan_response(&raw).unwrap();
        assert_eq!(plan.len(), MAX_PLAN_EXERCISES);
        assert_eq!(plan[4].exercise, "Ex 4");
    }

    #[test]
    fn test_parse_plan_caps_set_count() {
        let raw = r#"{"workout": [
            { "exercise": "Squat", "sets": "1e12", "reps": 10 },
            { "exercise": "Lunge", "sets": 20000000, "reps": 8 },
            { "exercise": "Bridge", "sets": "4", "reps": 15 }
        ]}"#;

        let plan = parse_plan_response(raw).unwrap();
        assert_eq!(plan[0].sets, MAX_PLAN_SETS);
        assert_eq!(plan[1].sets, MAX_PLAN_SETS);
        assert_eq!(plan[2].sets, 4);

        let draft = DraftWorkout::from_plan("legs", Variant::A, &plan);
        assert_eq!(draft.exercises[0].sets.len(), MAX_PLAN_SETS as usize);
        assert_eq!(draft.total_sets(), 2 * MAX_PLAN_SETS as usize + 4);
    }

    #[test]
    fn test_draft_from_plan_caps_direct_counts() {
        let draft = DraftWorkout::from_plan("legs", Variant::A, &[planned("Squat", u32::MAX, 5.0)]);
        assert_eq!(draft.exercises[0].sets.len(), MAX_PLAN_SETS as usize);
    }

    #[test]
    fn test_request_validation() {
        let request = WorkoutRequest::new("u1", " Legs ", Variant::A);
        assert_eq!(request.split, "legs");
        assert!(request.validate().is_ok());

        let missing_user = WorkoutRequest::new("", "legs", Variant::A);
        assert!(matches!(missing_user.validate(), Err(PlanError::MissingField("user_id"))));

        let zero_duration = WorkoutRequest::new("u1", "legs", Variant::A).with_duration(0);
        assert!(matches!(zero_duration.validate(), Err(PlanError::MissingField("duration"))));

        let no_equipment = WorkoutRequest::new("u1", "legs", Variant::A).with_equipment(" ");
        assert!(matches!(no_equipment.validate(), Err(PlanError::MissingField("equipment"))));
    }

    #[test]
    fn test_request_body_shape() {
        let request = WorkoutRequest::new("u1", "push", Variant::B)
            .with_level("Intermediate")
            .with_equipment("Dumbbells")
            .with_duration(45);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["workoutType"], "push");
        assert_eq!(body["variant"], "B");
        assert_eq!(body["level"], "Intermediate");
        assert_eq!(body["equipment"], "Dumbbells");
        assert_eq!(body["duration"], 45);
    }

    #[test]
    fn test_next_variant() {
        assert_eq!(next_variant(None, "push"), Variant::A);

        let push_a = last_session(json!({ "day": "push", "variant": "A", "workout": [] }));
        assert_eq!(next_variant(Some(&push_a), "push"), Variant::B);
        assert_eq!(next_variant(Some(&push_a), "pull"), Variant::A);

        let push_b = last_session(json!({ "day": "push", "variant": "B", "workout": [] }));
        assert_eq!(next_variant(Some(&push_b), "push"), Variant::A);

        let logged = last_session(json!({ "loggedWorkout": [] }));
        assert_eq!(next_variant(Some(&logged), "push"), Variant::A);
    }

    #[test]
    fn test_draft_from_plan() {
        let plan = vec![planned("Squat", 4, 8.0), planned("Lunge", 0, 0.0)];
        let draft = DraftWorkout::from_plan("legs", Variant::B, &plan);

        assert_eq!(draft.exercises.len(), 2);
        assert_eq!(draft.exercises[0].sets, vec![SetEntry::new(8.0, 0.0); 4]);
        assert_eq!(draft.exercises[1].sets, vec![SetEntry::new(DEFAULT_REPS, 0.0); 3]);
        assert_eq!(draft.total_sets(), 7);
    }

    #[test]
    fn test_draft_set_edits() {
        let mut draft = DraftWorkout::from_plan("push", Variant::A, &[planned("Bench", 2, 10.0)]);

        assert!(draft.add_set(0));
        assert_eq!(draft.exercises[0].sets.len(), 3);

        assert!(draft.update_set(0, 1, SetField::Weight, 60.0));
        assert!(draft.update_set(0, 1, SetField::Reps, 8.0));
        assert_eq!(draft.exercises[0].sets[1], SetEntry::new(8.0, 60.0));

        assert!(draft.update_set(0, 2, SetField::Weight, f64::NAN));
        assert_eq!(draft.exercises[0].sets[2].weight, 0.0);

        assert!(draft.delete_set(0, 0));
        assert_eq!(draft.exercises[0].sets[0], SetEntry::new(8.0, 60.0));

        assert!(!draft.add_set(5));
        assert!(!draft.delete_set(0, 9));
        assert!(!draft.update_set(1, 0, SetField::Reps, 1.0));
    }

    #[test]
    fn test_draft_exercise_edits() {
        let mut draft = DraftWorkout::from_plan(
            "pull",
            Variant::A,
            &[planned("Row", 3, 10.0), planned("Curl", 3, 12.0)],
        );

        assert!(!draft.add_exercise("   "));
        assert!(draft.add_exercise("  Face Pull "));
        assert_eq!(draft.exercises[2].exercise, "Face Pull");
        assert_eq!(draft.exercises[2].sets, vec![SetEntry::new(DEFAULT_REPS, 0.0)]);

        assert!(draft.move_exercise(2, 0));
        let names: Vec<&str> = draft.exercises.iter().map(|e| e.exercise.as_str()).collect();
        assert_eq!(names, vec!["Face Pull", "Row", "Curl"]);
        assert!(!draft.move_exercise(0, 3));

        assert!(draft.remove_exercise(1));
        assert_eq!(draft.exercises.len(), 2);
        assert!(!draft.remove_exercise(2));
    }

    #[test]
    fn test_draft_move_set() {
        let mut draft = DraftWorkout::from_plan("push", Variant::A, &[planned("Dips", 3, 10.0)]);
        draft.update_set(0, 2, SetField::Reps, 6.0);

        assert!(draft.move_set(0, 2, 0));
        assert_eq!(draft.exercises[0].sets[0].reps, 6.0);
        assert!(!draft.move_set(1, 0, 0));
    }

    #[test]
    fn test_draft_into_payload() {
        let mut draft = DraftWorkout::from_plan("legs", Variant::B, &[planned("Squat", 1, 5.0)]);
        draft.update_set(0, 0, SetField::Weight, 100.0);

        let payload = draft.into_payload();
        assert_eq!(payload.day(), Some("legs"));
        assert_eq!(payload.variant(), Some(Variant::B));
        assert_eq!(payload.exercises()[0].sets.performed(), &[SetEntry::new(5.0, 100.0)]);
    }
}
