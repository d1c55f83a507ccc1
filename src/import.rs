//! Workout history import
//!
//! Reads a strength log export (one CSV row per performed set) into the
//! nested `Workout` structure. Unlike the analytics engine, this is a
//! boundary: malformed rows are reported as errors instead of being
//! silently dropped.
//!
//! Expected header:
//! `date,workout_id,exercise,set_number,weight,reps,is_bodyweight,extra_weight`

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{Workout, WorkoutExercise, WorkoutSet};

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
  #[error("CSV error: {0}")]
  Csv(#[from] csv::Error),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Invalid date {value:?} on row {row}: {source}")]
  InvalidDate {
    row: usize,
    value: String,
    source: chrono::ParseError,
  },
}

/// ---------------------------------------------------------------------------
/// Row Format
/// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SetRow {
  /// Calendar day, `YYYY-MM-DD`.
  date: String,
  workout_id: String,
  exercise: String,
  set_number: Option<i64>,
  weight: f64,
  reps: i64,
  is_bodyweight: Option<bool>,
  extra_weight: Option<f64>,
}

/// ---------------------------------------------------------------------------
/// Import
/// ---------------------------------------------------------------------------

/// Parse a workout CSV from any reader. Rows group into workouts by
/// `workout_id` and into exercises by spelling, both in first-seen file
/// order; a workout's date comes from its first row.
pub fn read_workouts<R: Read>(reader: R, user_id: &str) -> Result<Vec<Workout>, ImportError> {
  let mut csv_reader = csv::ReaderBuilder::new()
    .trim(csv::Trim::All)
    .from_reader(reader);

  let mut workouts: Vec<Workout> = Vec::new();
  let mut workout_slots: HashMap<String, usize> = HashMap::new();
  // (workout slot, raw exercise spelling) -> exercise slot
  let mut exercise_slots: HashMap<(usize, String), usize> = HashMap::new();

  for (index, row) in csv_reader.deserialize().enumerate() {
    let row: SetRow = row?;
    let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|source| {
      ImportError::InvalidDate {
        // Header occupies the first line.
        row: index + 2,
        value: row.date.clone(),
        source,
      }
    })?;

    let workout_slot = *workout_slots.entry(row.workout_id.clone()).or_insert_with(|| {
      workouts.push(Workout {
        id: row.workout_id.clone(),
        user_id: user_id.to_string(),
        date,
        exercises: Vec::new(),
        duration_minutes: None,
        body_weight: None,
      });
      workouts.len() - 1
    });

    let exercise_slot = *exercise_slots
      .entry((workout_slot, row.exercise.clone()))
      .or_insert_with(|| {
        let exercises = &mut workouts[workout_slot].exercises;
        exercises.push(WorkoutExercise {
          exercise_name: row.exercise.clone(),
          sets: Vec::new(),
        });
        exercises.len() - 1
      });

    let sets = &mut workouts[workout_slot].exercises[exercise_slot].sets;
    let set_number = row.set_number.unwrap_or(sets.len() as i64);
    sets.push(WorkoutSet {
      weight: row.weight,
      reps: row.reps,
      is_bodyweight: row.is_bodyweight.unwrap_or(false),
      extra_weight: row.extra_weight,
      set_number,
    });
  }

  Ok(workouts)
}

/// Parse a workout CSV from disk.
pub fn read_workouts_from_path<P: AsRef<Path>>(
  path: P,
  user_id: &str,
) -> Result<Vec<Workout>, ImportError> {
  let file = std::fs::File::open(path)?;
  read_workouts(file, user_id)
}
