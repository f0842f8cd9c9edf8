//! Workout request model.
//!
//! Every field a user can pick is a closed enumeration, and the two numeric
//! fields are range-checked at construction. A [`WorkoutRequest`] that
//! exists is therefore always complete and valid; the prompt builder and
//! the pipeline never re-validate it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Inclusive bounds for [`WorkoutRequest::age`].
pub const AGE_RANGE: (u32, u32) = (12, 90);
/// Inclusive bounds for [`WorkoutRequest::duration_minutes`].
pub const DURATION_RANGE: (u32, u32) = (10, 120);

/// Rejected user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("invalid {field} `{value}` (expected one of: {expected})")]
    InvalidChoice {
        field: &'static str,
        value: String,
        expected: String,
    },
    #[error("{field} {value} is out of range ({min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
}

/// Normalize free text for enum matching: lowercase, no separators.
fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Declares a closed choice enum with a display label per variant.
///
/// Generates `ALL`, `label()`, `Display`, and a lenient `FromStr` that
/// accepts the label or variant name in any case, with or without
/// spaces, dashes, or underscores.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every variant, in form order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Human-readable label used in prompts, documents, and the UI.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = RequestError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize(s);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| normalize(v.label()) == wanted)
                    .ok_or_else(|| RequestError::InvalidChoice {
                        field: $field,
                        value: s.to_string(),
                        expected: Self::ALL
                            .iter()
                            .map(|v| v.label())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

choice_enum! {
    /// Self-reported training experience.
    FitnessLevel, "fitness level" {
        Beginner => "Beginner",
        Intermediate => "Intermediate",
        Advanced => "Advanced",
    }
}

choice_enum! {
    /// What the plan should optimize for.
    Goal, "goal" {
        WeightLoss => "Weight Loss",
        MuscleGain => "Muscle Gain",
        Endurance => "Endurance",
        GeneralFitness => "General Fitness",
    }
}

choice_enum! {
    Gender, "gender" {
        Male => "Male",
        Female => "Female",
        Other => "Other",
    }
}

choice_enum! {
    /// Equipment the user has access to.
    Equipment, "equipment" {
        Bodyweight => "Bodyweight",
        Dumbbells => "Dumbbells",
        ResistanceBands => "Resistance Bands",
        FullGym => "Full Gym",
    }
}

fn check_range(field: &'static str, value: u32, (min, max): (u32, u32)) -> Result<u32, RequestError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(RequestError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

/// A complete, validated set of workout parameters.
///
/// Immutable once built: the fields are private and only readable through
/// accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWorkoutRequest")]
pub struct WorkoutRequest {
    fitness_level: FitnessLevel,
    goal: Goal,
    gender: Gender,
    age: u32,
    duration_minutes: u32,
    equipment: Equipment,
}

impl WorkoutRequest {
    /// Build a request, rejecting an age or duration outside its range.
    pub fn new(
        fitness_level: FitnessLevel,
        goal: Goal,
        gender: Gender,
        age: u32,
        duration_minutes: u32,
        equipment: Equipment,
    ) -> Result<Self, RequestError> {
        Ok(Self {
            fitness_level,
            goal,
            gender,
            age: check_range("age", age, AGE_RANGE)?,
            duration_minutes: check_range("duration", duration_minutes, DURATION_RANGE)?,
            equipment,
        })
    }

    pub fn fitness_level(&self) -> FitnessLevel {
        self.fitness_level
    }

    pub fn goal(&self) -> Goal {
        self.goal
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn equipment(&self) -> Equipment {
        self.equipment
    }

    /// The six parameters as `(label, value)` pairs, in form order.
    ///
    /// Shared by documents and the UI so they always list the same fields.
    pub fn parameters(&self) -> [(&'static str, String); 6] {
        [
            ("Fitness Level", self.fitness_level.to_string()),
            ("Goal", self.goal.to_string()),
            ("Gender", self.gender.to_string()),
            ("Age", self.age.to_string()),
            ("Duration", format!("{} minutes", self.duration_minutes)),
            ("Equipment", self.equipment.to_string()),
        ]
    }
}

impl Default for WorkoutRequest {
    /// The form's initial selection.
    fn default() -> Self {
        Self {
            fitness_level: FitnessLevel::Beginner,
            goal: Goal::WeightLoss,
            gender: Gender::Male,
            age: 25,
            duration_minutes: 30,
            equipment: Equipment::Bodyweight,
        }
    }
}

/// Unchecked deserialization target; converted through [`WorkoutRequest::new`].
#[derive(Deserialize)]
struct RawWorkoutRequest {
    fitness_level: FitnessLevel,
    goal: Goal,
    gender: Gender,
    age: u32,
    duration_minutes: u32,
    equipment: Equipment,
}

impl TryFrom<RawWorkoutRequest> for WorkoutRequest {
    type Error = RequestError;

    fn try_from(raw: RawWorkoutRequest) -> Result<Self, Self::Error> {
        WorkoutRequest::new(
            raw.fitness_level,
            raw.goal,
            raw.gender,
            raw.age,
            raw.duration_minutes,
            raw.equipment,
        )
    }
}
