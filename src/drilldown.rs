//! Per-exercise drill-down
//!
//! Everything a consumer needs when the user opens one exercise: its record
//! history in performed order, the training that happened between each pair
//! of consecutive records, and a comparison of training habits in the run-up
//! to records against the baseline.

use serde::{Deserialize, Serialize};

use chrono::NaiveDate;

use crate::exercise::{latest_display_names, normalize_name};
use crate::models::{PersonalBest, Workout};
use crate::timeline::{exercise_sessions, interstitial_stats, RecordPoint, Session};

/// A workout counts as preparatory when a record for the exercise lands
/// within this many days after it.
const PREPARATION_WINDOW_DAYS: i64 = 14;

/// ---------------------------------------------------------------------------
/// Output Structures
/// ---------------------------------------------------------------------------

/// Training performed between two consecutive records of the exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordInterval {
  pub from_date: NaiveDate,
  pub to_date: NaiveDate,
  pub days: i64,
  pub sessions: usize,
  pub sets: usize,
  pub reps: i64,
  /// Sum of load x reps across the interval's sets.
  pub volume: f64,
  /// True when both records share a workout with no sets between them, and
  /// the figures describe the whole originating session instead.
  pub is_session_stat: bool,
}

/// Average training per session within one group of sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupAverages {
  pub sessions: usize,
  pub avg_sets: f64,
  pub avg_reps: f64,
  pub avg_volume: f64,
}

/// Training habits in the two weeks before records versus everywhere else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreparationProfile {
  pub preparatory: GroupAverages,
  pub baseline: GroupAverages,
}

/// Full drill-down snapshot for one exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseDrilldown {
  /// Most recent raw spelling of the exercise name.
  pub exercise_name: String,
  /// The exercise's ledger entries in performed order, oldest first.
  pub records: Vec<PersonalBest>,
  /// One entry per consecutive record pair, oldest pair first.
  pub intervals: Vec<RecordInterval>,
  pub preparation: PreparationProfile,
}

/// ---------------------------------------------------------------------------
/// Aggregation
/// ---------------------------------------------------------------------------

/// Drill into one exercise, resolved through the name normalizer so callers
/// may pass any spelling the log has seen. Returns None when the exercise
/// has no records.
pub fn drill_down(
  workouts: &[Workout],
  ledger: &[PersonalBest],
  exercise_name: &str,
) -> Option<ExerciseDrilldown> {
  let key = normalize_name(exercise_name);

  let mut records: Vec<PersonalBest> = ledger
    .iter()
    .filter(|pb| normalize_name(&pb.exercise_name) == key)
    .cloned()
    .collect();
  if records.is_empty() {
    return None;
  }
  records.sort_by(|a, b| a.date.cmp(&b.date).then(a.order_index.cmp(&b.order_index)));

  let sessions = exercise_sessions(workouts, &key);
  let intervals = record_intervals(&sessions, &records);
  let preparation = preparation_profile(&sessions, &records);

  let display_name = latest_display_names(workouts)
    .remove(&key)
    .unwrap_or_else(|| exercise_name.to_string());

  Some(ExerciseDrilldown {
    exercise_name: display_name,
    records,
    intervals,
    preparation,
  })
}

fn record_intervals(sessions: &[Session], records: &[PersonalBest]) -> Vec<RecordInterval> {
  records
    .windows(2)
    .map(|pair| {
      let prev = RecordPoint {
        date: pair[0].date,
        workout_id: pair[0].workout_id.clone(),
        order_index: pair[0].order_index,
      };
      let current = RecordPoint {
        date: pair[1].date,
        workout_id: pair[1].workout_id.clone(),
        order_index: pair[1].order_index,
      };
      let (stats, is_session_stat) = interstitial_stats(sessions, &prev, &current);
      RecordInterval {
        from_date: pair[0].date,
        to_date: pair[1].date,
        days: stats.days,
        sessions: stats.sessions,
        sets: stats.sets,
        reps: stats.reps,
        volume: stats.volume,
        is_session_stat,
      }
    })
    .collect()
}

fn preparation_profile(sessions: &[Session], records: &[PersonalBest]) -> PreparationProfile {
  let mut preparatory: Vec<&Session> = Vec::new();
  let mut baseline: Vec<&Session> = Vec::new();

  for session in sessions {
    let leads_into_record = records.iter().any(|pb| {
      let delta = (pb.date - session.date).num_days();
      (0..=PREPARATION_WINDOW_DAYS).contains(&delta)
    });
    if leads_into_record {
      preparatory.push(session);
    } else {
      baseline.push(session);
    }
  }

  PreparationProfile {
    preparatory: group_averages(&preparatory),
    baseline: group_averages(&baseline),
  }
}

fn group_averages(sessions: &[&Session]) -> GroupAverages {
  if sessions.is_empty() {
    return GroupAverages::default();
  }
  let count = sessions.len() as f64;
  GroupAverages {
    sessions: sessions.len(),
    avg_sets: sessions.iter().map(|s| s.total_sets() as f64).sum::<f64>() / count,
    avg_reps: sessions.iter().map(|s| s.total_reps() as f64).sum::<f64>() / count,
    avg_volume: sessions.iter().map(|s| s.total_volume()).sum::<f64>() / count,
  }
}
