//! History export and grouping

use std::collections::BTreeMap;

use chrono::TimeZone;

use crate::workout::{WorkoutSession, normalize};

/// CSV header row
pub const CSV_HEADER: [&str; 6] = ["Date", "Split", "Exercise", "Set", "Reps", "Weight (kg)"];

/// Group key used for sessions without a split
pub const OTHER_SPLIT: &str = "other";

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Export every performed set as CSV, dates (`d/m/yyyy`) taken in `tz`
///
/// Returns `None` for an empty history. Entries without performed sets
/// produce no rows.
pub fn export_csv<Tz: TimeZone>(sessions: &[WorkoutSession], tz: &Tz) -> Option<String> {
    if sessions.is_empty() {
        return None;
    }

    let mut lines = vec![CSV_HEADER.join(",")];

    for session in sessions {
        let date = session
            .created_at
            .with_timezone(tz)
            .date_naive()
            .format("%-d/%-m/%Y")
            .to_string();
        let split = session.workout.day().unwrap_or_default();

        for entry in normalize(session) {
            for (index, set) in entry.sets.performed().iter().enumerate() {
                let row = [
                    date.clone(),
                    csv_field(split),
                    csv_field(&entry.exercise),
                    (index + 1).to_string(),
                    set.reps.to_string(),
                    set.weight.to_string(),
                ];
                lines.push(row.join(","));
            }
        }
    }

    Some(lines.join("\n"))
}

/// Group sessions by lower-cased split, keeping input order within a group
pub fn group_by_split(sessions: &[WorkoutSession]) -> BTreeMap<String, Vec<&WorkoutSession>> {
    let mut groups: BTreeMap<String, Vec<&WorkoutSession>> = BTreeMap::new();

    for session in sessions {
        let key = match session.workout.day() {
            Some(day) if !day.is_empty() => day.to_lowercase(),
            _ => OTHER_SPLIT.to_string(),
        };
        groups.entry(key).or_default().push(session);
    }

    groups
}
