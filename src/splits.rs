//! Split definitions - muscle-group groupings used for generation and history

use serde::{Deserialize, Serialize};

/// Muscle groups a split can target
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MuscleGroup {
    Chest,
    Shoulders,
    Triceps,
    Back,
    Biceps,
    Forearms,
    Core,
    Glutes,
    Quads,
    Hamstrings,
    Calves,
    Cardio,
}

impl MuscleGroup {
    pub fn name(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "chest",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::Triceps => "triceps",
            MuscleGroup::Back => "back",
            MuscleGroup::Biceps => "biceps",
            MuscleGroup::Forearms => "forearms",
            MuscleGroup::Core => "core",
            MuscleGroup::Glutes => "glutes",
            MuscleGroup::Quads => "quads",
            MuscleGroup::Hamstrings => "hamstrings",
            MuscleGroup::Calves => "calves",
            MuscleGroup::Cardio => "cardio",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Split {
    Push,
    Pull,
    Legs,
    Chest,
    Back,
    Shoulders,
    Arms,
    Lower,
    Cardio,
    Abs,
}

impl Split {
    /// Key sent to the generator and stored as the workout `day`
    pub fn key(&self) -> &'static str {
        match self {
            Split::Push => "push",
            Split::Pull => "pull",
            Split::Legs => "legs",
            Split::Chest => "chest",
            Split::Back => "back",
            Split::Shoulders => "shoulders",
            Split::Arms => "arms",
            Split::Lower => "lower",
            Split::Cardio => "cardio",
            Split::Abs => "abs",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Split::Push => "Push",
            Split::Pull => "Pull",
            Split::Legs => "Legs",
            Split::Chest => "Chest",
            Split::Back => "Back",
            Split::Shoulders => "Shoulders",
            Split::Arms => "Arms",
            Split::Lower => "Lower Body",
            Split::Cardio => "Cardio",
            Split::Abs => "Abs",
        }
    }

    pub fn muscles(&self) -> &'static [MuscleGroup] {
        use MuscleGroup::*;
        match self {
            Split::Push => &[Chest, Shoulders, Triceps],
            Split::Pull => &[Back, Biceps],
            Split::Legs | Split::Lower => &[Quads, Hamstrings, Glutes, Calves],
            Split::Chest => &[Chest],
            Split::Back => &[Back],
            Split::Shoulders => &[Shoulders],
            Split::Arms => &[Biceps, Triceps, Forearms],
            Split::Cardio => &[Cardio],
            Split::Abs => &[Core],
        }
    }

    /// All splits in menu order
    pub fn all() -> &'static [Split] {
        &[
            Split::Push,
            Split::Pull,
            Split::Legs,
            Split::Chest,
            Split::Back,
            Split::Shoulders,
            Split::Arms,
            Split::Lower,
            Split::Cardio,
            Split::Abs,
        ]
    }

    /// Find split by key, ignoring case
    pub fn from_key(key: &str) -> Option<Split> {
        let key = key.trim().to_lowercase();
        Self::all().iter().copied().find(|s| s.key() == key)
    }
}
