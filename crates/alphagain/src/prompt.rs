//! Workout prompt template.

use crate::request::WorkoutRequest;

/// Section names the template always asks the model for.
pub const REQUIRED_SECTIONS: &[&str] = &[
    "warm-up",
    "main workout",
    "cooldown",
    "rest days",
    "recovery tips",
];

/// Fills the fixed coaching template from a [`WorkoutRequest`].
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render the prompt for `request`.
    ///
    /// Deterministic: the same request always yields the same bytes.
    pub fn build(request: &WorkoutRequest) -> String {
        format!(
            "\
You are an AI fitness coach. Create a personalized, workout plan for the following user:

- Fitness Level: {fitness_level}
- Goal: {goal}
- Gender: {gender}
- Age: {age}
- Time Available per Day: {duration}
- Available Equipment: {equipment}

Include warm-up, main workout, and cooldown. Ensure the intensity matches the user's fitness level.
Include rest days, recovery tips, and suggest alternatives if equipment is limited.
Output should be organized, easy to follow, and motivating.
",
            fitness_level = request.fitness_level(),
            goal = request.goal(),
            gender = request.gender(),
            age = request.age(),
            duration = request.duration_minutes(),
            equipment = request.equipment(),
        )
    }
}
