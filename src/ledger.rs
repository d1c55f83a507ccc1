//! Personal record ledger
//!
//! Walks the full workout history once, in chronological order, and emits an
//! append-only list of record events. Each exercise is tracked on two
//! independent axes: heaviest effective load and best estimated 1RM. One set
//! can beat either axis or both, but always yields exactly one ledger entry.

use std::collections::HashMap;

use crate::e1rm::estimate_one_rep_max;
use crate::exercise::normalize_name;
use crate::models::{PersonalBest, Workout};

/// Spread between consecutive exercise slots in the intra-day tie-break
/// ordinal; supports up to 100 sets per exercise.
const ORDER_INDEX_STRIDE: i64 = 100;

/// Build the full personal record ledger from a workout log.
///
/// The input does not need to be sorted; ordering inside the builder is by
/// date ascending, stable with respect to log position for same-day
/// workouts. The returned ledger is sorted date-descending with same-day
/// entries in performed order (`order_index` ascending), which is the
/// ordering display and drill-down consumers rely on.
///
/// Re-running on an unchanged log reproduces the ledger exactly: the pass
/// reads nothing but its input.
pub fn build_ledger(workouts: &[Workout]) -> Vec<PersonalBest> {
  let mut ordered: Vec<&Workout> = workouts.iter().collect();
  ordered.sort_by_key(|w| w.date);

  // Running maxima per normalized exercise, scoped to this call.
  let mut best_weight: HashMap<String, f64> = HashMap::new();
  let mut best_e1rm: HashMap<String, f64> = HashMap::new();

  let mut ledger = Vec::new();

  for workout in ordered {
    for (exercise_index, exercise) in workout.exercises.iter().enumerate() {
      let key = normalize_name(&exercise.exercise_name);

      for (set_index, set) in exercise.sets.iter().enumerate() {
        if !set.is_record_candidate() {
          continue;
        }

        let load = set.load();
        let estimate = estimate_one_rep_max(load, set.reps);
        let top_weight = best_weight.get(&key).copied().unwrap_or(0.0);
        let top_e1rm = best_e1rm.get(&key).copied().unwrap_or(0.0);

        let beats_e1rm = estimate > top_e1rm;
        let beats_weight = load > top_weight;
        if !beats_e1rm && !beats_weight {
          continue;
        }

        ledger.push(PersonalBest {
          exercise_name: exercise.exercise_name.clone(),
          date: workout.date,
          workout_id: workout.id.clone(),
          weight: load,
          reps: set.reps,
          value: estimate,
          is_highest_weight: beats_weight,
          order_index: exercise_index as i64 * ORDER_INDEX_STRIDE + set_index as i64,
          previous_best: (top_e1rm > 0.0).then_some(top_e1rm),
        });

        if beats_e1rm {
          best_e1rm.insert(key.clone(), estimate);
        }
        if beats_weight {
          best_weight.insert(key.clone(), load);
        }
      }
    }
  }

  // Newest day first, oldest-within-day first.
  ledger.sort_by(|a, b| b.date.cmp(&a.date).then(a.order_index.cmp(&b.order_index)));
  ledger
}
