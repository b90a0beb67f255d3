//! Workout records - stored payload shapes and their normalization
//!
//! Two payload shapes live side by side in the store: generated plans
//! (`{day, variant, workout: [...]}`) and manually logged sessions
//! (`{loggedWorkout: [...]}`). Rows written before a schema change may match
//! neither, so every read here is lenient: bad data becomes empty or zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Coerce a loosely-typed JSON value to a number, `0` when it isn't one
pub fn coerce_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

/// Coerce a value to a non-negative whole count
fn coerce_count(value: &Value) -> u32 {
    let n = coerce_number(value);
    if n > 0.0 { n.floor() as u32 } else { 0 }
}

/// Case-folded identity of an exercise name
pub fn exercise_key(name: &str) -> String {
    name.to_lowercase()
}

/// Plan variant, alternated between consecutive sessions of one split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    A,
    B,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::A => "A",
            Variant::B => "B",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "A" => Some(Variant::A),
            "B" => Some(Variant::B),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Variant::A => Variant::B,
            Variant::B => Variant::A,
        }
    }
}

/// One performed set
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SetEntry {
    pub reps: f64,
    pub weight: f64,
}

impl SetEntry {
    pub fn new(reps: f64, weight: f64) -> Self {
        Self { reps, weight }
    }

    /// Weight moved in this set (weight x reps)
    pub fn volume(&self) -> f64 {
        self.weight * self.reps
    }

    fn from_value(value: &Value) -> Self {
        Self {
            reps: value.get("reps").map(coerce_number).unwrap_or(0.0),
            weight: value.get("weight").map(coerce_number).unwrap_or(0.0),
        }
    }

    fn to_value(self) -> Value {
        json!({ "reps": self.reps, "weight": self.weight })
    }
}

/// What an entry's `sets` field holds
///
/// Generated plans carry a set count; logged and edited sessions carry the
/// performed sets themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum Sets {
    Declared(u32),
    Performed(Vec<SetEntry>),
    Missing,
}

impl Sets {
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Array(items)) => {
                Sets::Performed(items.iter().map(SetEntry::from_value).collect())
            }
            Some(v @ (Value::Number(_) | Value::String(_))) => Sets::Declared(coerce_count(v)),
            _ => Sets::Missing,
        }
    }

    /// Performed sets, empty unless the entry holds a set array
    pub fn performed(&self) -> &[SetEntry] {
        match self {
            Sets::Performed(sets) => sets,
            _ => &[],
        }
    }

    /// Number of sets the entry accounts for
    pub fn declared_count(&self) -> u32 {
        match self {
            Sets::Declared(n) => *n,
            Sets::Performed(sets) => sets.len() as u32,
            Sets::Missing => 0,
        }
    }

    fn to_value(&self) -> Option<Value> {
        match self {
            Sets::Declared(n) => Some(Value::from(*n)),
            Sets::Performed(sets) => Some(Value::Array(
                sets.iter().map(|s| s.to_value()).collect(),
            )),
            Sets::Missing => None,
        }
    }
}

/// One exercise within a stored workout
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseEntry {
    pub exercise: String,
    pub sets: Sets,
}

impl ExerciseEntry {
    pub fn new(exercise: impl Into<String>, sets: Sets) -> Self {
        Self { exercise: exercise.into(), sets }
    }

    /// Case-insensitive exact match on the exercise name
    pub fn matches(&self, name: &str) -> bool {
        !self.exercise.is_empty() && exercise_key(&self.exercise) == exercise_key(name)
    }

    fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        Some(Self {
            exercise: map
                .get("exercise")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            sets: Sets::from_value(map.get("sets")),
        })
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("exercise".into(), Value::String(self.exercise.clone()));
        if let Some(sets) = self.sets.to_value() {
            map.insert("sets".into(), sets);
        }
        Value::Object(map)
    }
}

fn parse_entries(items: &[Value]) -> Vec<ExerciseEntry> {
    items.iter().filter_map(ExerciseEntry::from_value).collect()
}

/// Stored workout payload
///
/// Deserializing never fails: any JSON that has neither a `workout` nor a
/// `loggedWorkout` array reads as [`WorkoutPayload::Empty`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum WorkoutPayload {
    Generated {
        day: Option<String>,
        variant: Option<Variant>,
        exercises: Vec<ExerciseEntry>,
    },
    Logged {
        exercises: Vec<ExerciseEntry>,
    },
    #[default]
    Empty,
}

impl WorkoutPayload {
    /// Normalized exercise list, whichever shape the payload has
    pub fn exercises(&self) -> &[ExerciseEntry] {
        match self {
            WorkoutPayload::Generated { exercises, .. } | WorkoutPayload::Logged { exercises } => {
                exercises
            }
            WorkoutPayload::Empty => &[],
        }
    }

    /// Split name of a generated workout
    pub fn day(&self) -> Option<&str> {
        match self {
            WorkoutPayload::Generated { day, .. } => day.as_deref(),
            _ => None,
        }
    }

    pub fn variant(&self) -> Option<Variant> {
        match self {
            WorkoutPayload::Generated { variant, .. } => *variant,
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, WorkoutPayload::Empty)
    }
}

impl From<Value> for WorkoutPayload {
    fn from(value: Value) -> Self {
        let Value::Object(map) = value else {
            return WorkoutPayload::Empty;
        };

        if let Some(Value::Array(items)) = map.get("workout") {
            return WorkoutPayload::Generated {
                day: map.get("day").and_then(Value::as_str).map(str::to_string),
                variant: map.get("variant").and_then(Value::as_str).and_then(Variant::parse),
                exercises: parse_entries(items),
            };
        }

        if let Some(Value::Array(items)) = map.get("loggedWorkout") {
            return WorkoutPayload::Logged {
                exercises: parse_entries(items),
            };
        }

        WorkoutPayload::Empty
    }
}

impl From<WorkoutPayload> for Value {
    fn from(payload: WorkoutPayload) -> Self {
        let mut map = Map::new();
        match payload {
            WorkoutPayload::Generated { day, variant, exercises } => {
                if let Some(day) = day {
                    map.insert("day".into(), Value::String(day));
                }
                if let Some(variant) = variant {
                    map.insert("variant".into(), Value::String(variant.as_str().into()));
                }
                map.insert(
                    "workout".into(),
                    Value::Array(exercises.iter().map(ExerciseEntry::to_value).collect()),
                );
            }
            WorkoutPayload::Logged { exercises } => {
                map.insert(
                    "loggedWorkout".into(),
                    Value::Array(exercises.iter().map(ExerciseEntry::to_value).collect()),
                );
            }
            WorkoutPayload::Empty => {}
        }
        Value::Object(map)
    }
}

/// Completed workout as read from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
    pub id: Option<i64>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub workout: WorkoutPayload,
}

/// Exercise entries of a session, regardless of payload shape
pub fn normalize(session: &WorkoutSession) -> &[ExerciseEntry] {
    session.workout.exercises()
}

/// Every performed set of `exercise` across the history, with its session
pub fn matching_sets<'a>(
    sessions: &'a [WorkoutSession],
    exercise: &'a str,
) -> impl Iterator<Item = (&'a WorkoutSession, &'a SetEntry)> + 'a {
    sessions.iter().flat_map(move |session| {
        normalize(session)
            .iter()
            .filter(move |entry| entry.matches(exercise))
            .flat_map(move |entry| entry.sets.performed().iter().map(move |set| (session, set)))
    })
}
