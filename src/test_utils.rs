//! Test fixtures
//!
//! Factories for building workout logs in tests without the field noise.
//! Every helper produces plain barbell sets unless stated otherwise; tests
//! that need bodyweight mechanics tweak the returned set directly.

use chrono::NaiveDate;

use crate::models::{Workout, WorkoutExercise, WorkoutSet};

/// Parse a `YYYY-MM-DD` literal.
pub fn day(date: &str) -> NaiveDate {
  NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("test date literal must be YYYY-MM-DD")
}

/// A plain barbell set.
pub fn set(weight: f64, reps: i64) -> WorkoutSet {
  WorkoutSet {
    weight,
    reps,
    is_bodyweight: false,
    extra_weight: None,
    set_number: 0,
  }
}

/// An exercise with its sets renumbered by position.
pub fn exercise(name: &str, sets: Vec<WorkoutSet>) -> WorkoutExercise {
  let sets = sets
    .into_iter()
    .enumerate()
    .map(|(index, mut s)| {
      s.set_number = index as i64;
      s
    })
    .collect();
  WorkoutExercise {
    exercise_name: name.to_string(),
    sets,
  }
}

/// A workout for the default test athlete.
pub fn workout(id: &str, date: NaiveDate, exercises: Vec<WorkoutExercise>) -> Workout {
  Workout {
    id: id.to_string(),
    user_id: "athlete".to_string(),
    date,
    exercises,
    duration_minutes: None,
    body_weight: None,
  }
}

/// A one-exercise, one-set workout; the common case in engine tests.
pub fn single_lift(id: &str, date: NaiveDate, name: &str, weight: f64, reps: i64) -> Workout {
  workout(id, date, vec![exercise(name, vec![set(weight, reps)])])
}
