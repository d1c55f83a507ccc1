//! Exercise identity
//!
//! Free-text exercise names are the only identity the log carries, so typos
//! and formatting variants ("Bench Press", "bench  press ") must collapse to
//! one key. Normalized names are used for equality everywhere in the engine;
//! raw names are kept for display only.

use std::collections::HashMap;

use crate::models::Workout;

/// Canonical identity key for an exercise name: Unicode lowercase, all
/// punctuation stripped, whitespace collapsed to single spaces, trimmed.
///
/// Deterministic and pure. Never shown to the user.
pub fn normalize_name(name: &str) -> String {
  name
    .to_lowercase()
    .chars()
    .filter(|c| c.is_alphanumeric() || c.is_whitespace())
    .collect::<String>()
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
}

/// Map each normalized key to the raw spelling most recently seen in the
/// log. Same-day workouts resolve by log position, matching the ordering
/// rules of the ledger builder.
pub fn latest_display_names(workouts: &[Workout]) -> HashMap<String, String> {
  let mut ordered: Vec<&Workout> = workouts.iter().collect();
  ordered.sort_by_key(|w| w.date);

  let mut names = HashMap::new();
  for workout in ordered {
    for exercise in &workout.exercises {
      names.insert(
        normalize_name(&exercise.exercise_name),
        exercise.exercise_name.clone(),
      );
    }
  }
  names
}
