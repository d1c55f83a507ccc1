use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::exercise::normalize_name;

/// One performed set within an exercise. Immutable once logged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutSet {
  /// Bar/machine weight in kg. Zero for plain bodyweight work.
  pub weight: f64,
  pub reps: i64,
  pub is_bodyweight: bool,
  /// Weight added to (or removed from, negative) a bodyweight movement.
  pub extra_weight: Option<f64>,
  /// Position of the set within its exercise, 0-based.
  pub set_number: i64,
}

impl WorkoutSet {
  /// Effective load used for record detection: added weight for bodyweight
  /// movements, bar weight otherwise.
  pub fn load(&self) -> f64 {
    if self.is_bodyweight {
      self.extra_weight.unwrap_or(0.0)
    } else {
      self.weight
    }
  }

  /// Whether the set may produce a personal record. Non-bodyweight sets with
  /// zero or negative load are skipped, not treated as errors.
  pub fn is_record_candidate(&self) -> bool {
    self.is_bodyweight || self.load() > 0.0
  }
}

/// One exercise within a workout: a name as the user typed it, plus its sets
/// in performed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutExercise {
  pub exercise_name: String,
  pub sets: Vec<WorkoutSet>,
}

impl WorkoutExercise {
  /// Sum of weight x reps across the exercise's sets.
  pub fn total_volume(&self) -> f64 {
    self.sets.iter().map(|s| s.weight * s.reps as f64).sum()
  }
}

/// One logged workout. The date is a calendar day with no time component;
/// same-day workouts are ordered only by their position in the log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
  pub id: String,
  pub user_id: String,
  pub date: NaiveDate,
  pub exercises: Vec<WorkoutExercise>,
  pub duration_minutes: Option<i64>,
  /// Body weight logged on that day, if any.
  pub body_weight: Option<f64>,
}

impl Workout {
  pub fn total_sets(&self) -> usize {
    self.exercises.iter().map(|e| e.sets.len()).sum()
  }

  pub fn total_reps(&self) -> i64 {
    self
      .exercises
      .iter()
      .flat_map(|e| e.sets.iter())
      .map(|s| s.reps)
      .sum()
  }

  pub fn total_volume(&self) -> f64 {
    self.exercises.iter().map(|e| e.total_volume()).sum()
  }

  /// Number of distinct exercises, counted by normalized identity.
  pub fn unique_exercises(&self) -> usize {
    let mut keys: Vec<String> = self
      .exercises
      .iter()
      .map(|e| normalize_name(&e.exercise_name))
      .collect();
    keys.sort();
    keys.dedup();
    keys.len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn set(weight: f64, reps: i64) -> WorkoutSet {
    WorkoutSet {
      weight,
      reps,
      is_bodyweight: false,
      extra_weight: None,
      set_number: 0,
    }
  }

  #[test]
  fn test_load_uses_extra_weight_for_bodyweight_sets() {
    let dips = WorkoutSet {
      weight: 0.0,
      reps: 8,
      is_bodyweight: true,
      extra_weight: Some(20.0),
      set_number: 0,
    };
    assert_eq!(dips.load(), 20.0, "weighted dips should count added plates");

    let pullups = WorkoutSet {
      weight: 0.0,
      reps: 10,
      is_bodyweight: true,
      extra_weight: None,
      set_number: 1,
    };
    assert_eq!(pullups.load(), 0.0);
    assert!(
      pullups.is_record_candidate(),
      "plain bodyweight sets stay eligible"
    );
  }

  #[test]
  fn test_zero_load_barbell_set_is_not_a_candidate() {
    let empty = set(0.0, 10);
    assert!(!empty.is_record_candidate());
  }

  #[test]
  fn test_unique_exercises_counts_normalized_identity() {
    let workout = Workout {
      id: "w1".into(),
      user_id: "u1".into(),
      date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
      exercises: vec![
        WorkoutExercise {
          exercise_name: "Bench Press".into(),
          sets: vec![set(100.0, 5)],
        },
        WorkoutExercise {
          exercise_name: "bench press ".into(),
          sets: vec![set(90.0, 8)],
        },
        WorkoutExercise {
          exercise_name: "Squat".into(),
          sets: vec![set(140.0, 3)],
        },
      ],
      duration_minutes: None,
      body_weight: None,
    };
    assert_eq!(workout.unique_exercises(), 2);
    assert_eq!(workout.total_sets(), 3);
    assert_eq!(workout.total_reps(), 16);
    assert_eq!(
      workout.total_volume(),
      100.0 * 5.0 + 90.0 * 8.0 + 140.0 * 3.0
    );
  }
}
