//! Record timelines
//!
//! Builds the two monotonic record chains of one exercise (heaviest load and
//! best estimated 1RM) and accounts for the training that happened between
//! consecutive records in each chain. The interstitial accounting is shared
//! with the per-exercise drill-down.

use chrono::NaiveDate;

use crate::e1rm::estimate_one_rep_max;
use crate::exercise::normalize_name;
use crate::models::{ExerciseTimeline, GapStats, TimelineNode, Workout};

/// ---------------------------------------------------------------------------
/// Session reduction
/// ---------------------------------------------------------------------------

/// One set of the target exercise, flattened out of the workout structure.
#[derive(Debug, Clone)]
pub(crate) struct SessionSet {
  /// Document-order ordinal within the workout (exercise slot * 100 + set
  /// slot), matching the ledger's tie-break ordinal.
  pub order_index: i64,
  pub load: f64,
  pub reps: i64,
  pub e1rm: f64,
  pub candidate: bool,
}

/// All of one workout's training for the target exercise.
#[derive(Debug, Clone)]
pub(crate) struct Session {
  pub date: NaiveDate,
  pub workout_id: String,
  pub sets: Vec<SessionSet>,
}

impl Session {
  pub fn total_sets(&self) -> usize {
    self.sets.len()
  }

  pub fn total_reps(&self) -> i64 {
    self.sets.iter().map(|s| s.reps).sum()
  }

  pub fn total_volume(&self) -> f64 {
    self.sets.iter().map(|s| s.load * s.reps as f64).sum()
  }
}

/// Collapse the log into per-workout sessions for one normalized exercise,
/// in chronological order (stable for same-day workouts). Workouts without
/// the exercise are dropped.
pub(crate) fn exercise_sessions(workouts: &[Workout], key: &str) -> Vec<Session> {
  let mut ordered: Vec<&Workout> = workouts.iter().collect();
  ordered.sort_by_key(|w| w.date);

  let mut sessions = Vec::new();
  for workout in ordered {
    let mut sets = Vec::new();
    for (exercise_index, exercise) in workout.exercises.iter().enumerate() {
      if normalize_name(&exercise.exercise_name) != key {
        continue;
      }
      for (set_index, set) in exercise.sets.iter().enumerate() {
        let load = set.load();
        sets.push(SessionSet {
          order_index: exercise_index as i64 * 100 + set_index as i64,
          load,
          reps: set.reps,
          e1rm: estimate_one_rep_max(load, set.reps),
          candidate: set.is_record_candidate(),
        });
      }
    }
    if !sets.is_empty() {
      sessions.push(Session {
        date: workout.date,
        workout_id: workout.id.clone(),
        sets,
      });
    }
  }
  sessions
}

/// ---------------------------------------------------------------------------
/// Interstitial accounting
/// ---------------------------------------------------------------------------

/// Identifies one record-setting set for interval computation.
#[derive(Debug, Clone)]
pub(crate) struct RecordPoint {
  pub date: NaiveDate,
  pub workout_id: String,
  pub order_index: i64,
}

/// Training performed between two consecutive records of the same exercise.
///
/// Cross-workout intervals cover every session dated on or after the earlier
/// record's day and strictly before the later record's day: the session that
/// set the previous record counts toward the gap, the record-setting day
/// itself does not. When the two records fall on the same calendar day in
/// different workouts the date filter is vacuous, so the interval instead
/// covers same-day sessions by log position, from the earlier record's
/// workout up to but excluding the later record's workout.
///
/// When both records come from the same workout, only the sets lying
/// strictly between the two record-setting sets are counted; if none do
/// (back-to-back top sets), the whole session's sets are reported instead
/// and the second return value is true.
pub(crate) fn interstitial_stats(
  sessions: &[Session],
  prev: &RecordPoint,
  current: &RecordPoint,
) -> (GapStats, bool) {
  if prev.workout_id == current.workout_id {
    return within_workout_stats(sessions, prev, current);
  }
  if prev.date == current.date {
    return same_day_stats(sessions, prev, current);
  }

  let mut stats = GapStats {
    days: (current.date - prev.date).num_days(),
    sessions: 0,
    sets: 0,
    reps: 0,
    volume: 0.0,
  };
  for session in sessions {
    if session.date < prev.date || session.date >= current.date {
      continue;
    }
    stats.sessions += 1;
    stats.sets += session.total_sets();
    stats.reps += session.total_reps();
    stats.volume += session.total_volume();
  }
  (stats, false)
}

/// Same-day records from different workouts: `sessions` keeps log order for
/// equal dates, so the interval runs positionally from the earlier record's
/// session (inclusive) to the later record's session (exclusive).
fn same_day_stats(
  sessions: &[Session],
  prev: &RecordPoint,
  current: &RecordPoint,
) -> (GapStats, bool) {
  let mut stats = GapStats { days: 0, sessions: 0, sets: 0, reps: 0, volume: 0.0 };
  let mut in_range = false;
  for session in sessions {
    if session.workout_id == current.workout_id {
      break;
    }
    if session.workout_id == prev.workout_id {
      in_range = true;
    }
    if in_range {
      stats.sessions += 1;
      stats.sets += session.total_sets();
      stats.reps += session.total_reps();
      stats.volume += session.total_volume();
    }
  }
  (stats, false)
}

fn within_workout_stats(
  sessions: &[Session],
  prev: &RecordPoint,
  current: &RecordPoint,
) -> (GapStats, bool) {
  let Some(session) = sessions.iter().find(|s| s.workout_id == prev.workout_id) else {
    // Record points always originate from a session; degrade to zeros.
    return (
      GapStats { days: 0, sessions: 0, sets: 0, reps: 0, volume: 0.0 },
      false,
    );
  };

  let between: Vec<&SessionSet> = session
    .sets
    .iter()
    .filter(|s| s.order_index > prev.order_index && s.order_index < current.order_index)
    .collect();

  if between.is_empty() {
    // Back-to-back top sets: report the whole session instead.
    return (
      GapStats {
        days: 0,
        sessions: 1,
        sets: session.total_sets(),
        reps: session.total_reps(),
        volume: session.total_volume(),
      },
      true,
    );
  }

  (
    GapStats {
      days: 0,
      sessions: 0,
      sets: between.len(),
      reps: between.iter().map(|s| s.reps).sum(),
      volume: between.iter().map(|s| s.load * s.reps as f64).sum(),
    },
    false,
  )
}

/// ---------------------------------------------------------------------------
/// Chain extraction
/// ---------------------------------------------------------------------------

/// Build the weight chain and e1RM chain for one exercise, resolved through
/// the name normalizer. Chains are returned most recent record first; gap
/// statistics stay attached to the node that ends the gap, so the
/// chronologically first record (displayed last) carries none.
pub fn build_chains(workouts: &[Workout], exercise_name: &str) -> ExerciseTimeline {
  let key = normalize_name(exercise_name);
  let sessions = exercise_sessions(workouts, &key);

  ExerciseTimeline {
    weight_chain: extract_chain(&sessions, |set| set.load),
    e1rm_chain: extract_chain(&sessions, |set| set.e1rm),
  }
}

/// Scan sessions chronologically and keep every session whose best set beats
/// the running maximum of the chosen metric. Ties keep the earlier record.
fn extract_chain(sessions: &[Session], metric: impl Fn(&SessionSet) -> f64) -> Vec<TimelineNode> {
  let mut chain: Vec<TimelineNode> = Vec::new();
  let mut previous: Option<RecordPoint> = None;
  let mut running_max = 0.0;

  for session in sessions {
    // Session reduction: the one set with the best metric value this day.
    let mut top: Option<&SessionSet> = None;
    for set in session.sets.iter().filter(|s| s.candidate) {
      if top.map_or(true, |t| metric(set) > metric(t)) {
        top = Some(set);
      }
    }
    let Some(top) = top else { continue };

    let value = metric(top);
    if value <= running_max {
      continue;
    }
    running_max = value;

    let point = RecordPoint {
      date: session.date,
      workout_id: session.workout_id.clone(),
      order_index: top.order_index,
    };
    let gap = previous
      .as_ref()
      .map(|prev| interstitial_stats(sessions, prev, &point).0);

    chain.push(TimelineNode {
      date: session.date,
      workout_id: session.workout_id.clone(),
      weight: top.load,
      reps: top.reps,
      value,
      gap,
    });
    previous = Some(point);
  }

  chain.reverse();
  chain
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ledger::build_ledger;
  use crate::test_utils::{day, exercise, set, single_lift, workout};

  #[test]
  fn test_two_record_chain_carries_gap_from_first_session() {
    let workouts = vec![
      single_lift("w1", day("2024-01-01"), "Bench", 100.0, 5),
      single_lift("w2", day("2024-01-08"), "Bench", 105.0, 5),
      single_lift("w3", day("2024-01-08"), "Bench", 80.0, 12),
    ];

    let timeline = build_chains(&workouts, "Bench");
    assert_eq!(timeline.weight_chain.len(), 2);

    // Most recent record first.
    let newest = &timeline.weight_chain[0];
    assert_eq!(newest.value, 105.0);
    let gap = newest.gap.as_ref().expect("second record must carry gap stats");
    assert_eq!(gap.sessions, 1, "only the 2024-01-01 session lies in the gap");
    assert_eq!(gap.days, 7);
    assert_eq!(gap.sets, 1);
    assert_eq!(gap.reps, 5);
    assert_eq!(gap.volume, 500.0);

    let first = &timeline.weight_chain[1];
    assert_eq!(first.value, 100.0);
    assert!(first.gap.is_none(), "first-ever record has no gap");
  }

  #[test]
  fn test_chains_are_independent() {
    // 110x1 raises the weight chain only; 100x8 raises the e1RM chain only.
    let workouts = vec![
      single_lift("w1", day("2024-01-01"), "Squat", 100.0, 5),
      single_lift("w2", day("2024-01-08"), "Squat", 110.0, 1),
      single_lift("w3", day("2024-01-15"), "Squat", 100.0, 8),
    ];

    let timeline = build_chains(&workouts, "Squat");
    let weight_values: Vec<f64> = timeline.weight_chain.iter().map(|n| n.value).collect();
    let e1rm_values: Vec<f64> = timeline.e1rm_chain.iter().map(|n| n.value).collect();

    assert_eq!(weight_values, vec![110.0, 100.0]);
    // e1RM: 116.67 then 126.67 (newest first); the 110 single never charts.
    assert_eq!(e1rm_values.len(), 2);
    assert!((e1rm_values[0] - 126.666_66).abs() < 0.01);
    assert!((e1rm_values[1] - 116.666_66).abs() < 0.01);
  }

  #[test]
  fn test_gap_accumulates_non_record_sessions() {
    let workouts = vec![
      single_lift("w1", day("2024-01-01"), "Row", 60.0, 5),
      single_lift("w2", day("2024-01-04"), "Row", 55.0, 8),
      single_lift("w3", day("2024-01-07"), "Row", 50.0, 10),
      single_lift("w4", day("2024-01-10"), "Row", 62.5, 5),
    ];

    let timeline = build_chains(&workouts, "Row");
    assert_eq!(timeline.weight_chain.len(), 2);
    let gap = timeline.weight_chain[0].gap.as_ref().unwrap();
    assert_eq!(gap.sessions, 3, "record session plus two plateau sessions");
    assert_eq!(gap.days, 9);
    assert_eq!(gap.reps, 5 + 8 + 10);
    assert_eq!(gap.volume, 60.0 * 5.0 + 55.0 * 8.0 + 50.0 * 10.0);
  }

  #[test]
  fn test_session_reduction_keeps_one_node_per_day() {
    // Two record-beating sets in one workout still chart once.
    let workouts = vec![workout(
      "w1",
      day("2024-01-01"),
      vec![exercise("Bench", vec![set(100.0, 5), set(102.5, 3)])],
    )];

    let timeline = build_chains(&workouts, "Bench");
    assert_eq!(timeline.weight_chain.len(), 1);
    assert_eq!(timeline.weight_chain[0].value, 102.5);
  }

  #[test]
  fn test_display_name_resolves_through_normalizer() {
    let workouts = vec![
      single_lift("w1", day("2024-01-01"), "Bänkpress", 100.0, 5),
      single_lift("w2", day("2024-01-08"), "bänkpress ", 105.0, 5),
    ];

    let timeline = build_chains(&workouts, "Bänkpress");
    assert_eq!(
      timeline.weight_chain.len(),
      2,
      "alias spellings must merge into one chain"
    );
  }

  #[test]
  fn test_unknown_exercise_yields_empty_chains() {
    let workouts = vec![single_lift("w1", day("2024-01-01"), "Bench", 100.0, 5)];
    let timeline = build_chains(&workouts, "Deadlift");
    assert!(timeline.weight_chain.is_empty());
    assert!(timeline.e1rm_chain.is_empty());
  }

  #[test]
  fn test_every_chain_node_matches_one_ledger_entry() {
    // Mixed-axis history: w1 sets both records, w2 the bar weight only
    // (110x1 estimates 110), w3 the e1RM only (105x8 estimates 133).
    let workouts = vec![
      workout(
        "w1",
        day("2024-01-01"),
        vec![
          exercise("Bench", vec![set(100.0, 5)]),
          exercise("Squat", vec![set(140.0, 5)]),
        ],
      ),
      single_lift("w2", day("2024-01-08"), "Bench", 110.0, 1),
      single_lift("w3", day("2024-01-15"), "Bench", 105.0, 8),
    ];

    let timeline = build_chains(&workouts, "Bench");
    let ledger = build_ledger(&workouts);
    let bench: Vec<_> = ledger
      .iter()
      .filter(|pb| normalize_name(&pb.exercise_name) == "bench")
      .collect();
    assert_eq!(bench.len(), 3);
    assert!(timeline.weight_chain.len() <= bench.len());
    assert!(timeline.e1rm_chain.len() <= bench.len());

    for node in &timeline.weight_chain {
      let matches = bench
        .iter()
        .filter(|pb| pb.workout_id == node.workout_id && pb.weight == node.value)
        .count();
      assert_eq!(matches, 1, "weight node {} must match one entry", node.value);
      let entry = bench
        .iter()
        .find(|pb| pb.workout_id == node.workout_id && pb.weight == node.value)
        .unwrap();
      assert!(entry.is_highest_weight, "weight-chain entries raise the bar weight");
    }

    for node in &timeline.e1rm_chain {
      let matches = bench
        .iter()
        .filter(|pb| pb.workout_id == node.workout_id && (pb.value - node.value).abs() < 1e-9)
        .count();
      assert_eq!(matches, 1, "e1RM node {} must match one entry", node.value);
      let entry = bench
        .iter()
        .find(|pb| pb.workout_id == node.workout_id && (pb.value - node.value).abs() < 1e-9)
        .unwrap();
      assert!(
        entry.previous_best.map_or(true, |prior| entry.value > prior),
        "e1RM-chain entries raise the estimate"
      );
    }

    // The weight-only single never charts on the e1RM chain and vice versa.
    assert_eq!(timeline.weight_chain.len(), 2);
    assert_eq!(timeline.e1rm_chain.len(), 2);
    assert!(timeline.weight_chain.iter().all(|n| n.workout_id != "w3"));
    assert!(timeline.e1rm_chain.iter().all(|n| n.workout_id != "w2"));
  }

  #[test]
  fn test_same_day_records_in_different_workouts_keep_the_earlier_session() {
    // Morning and evening workout on the same day, both setting records.
    let workouts = vec![
      single_lift("w1", day("2024-01-01"), "Bench", 100.0, 5),
      single_lift("w2", day("2024-01-01"), "Bench", 105.0, 5),
    ];

    let timeline = build_chains(&workouts, "Bench");
    assert_eq!(timeline.weight_chain.len(), 2);

    let gap = timeline.weight_chain[0].gap.as_ref().unwrap();
    assert_eq!(gap.days, 0);
    assert_eq!(gap.sessions, 1, "the earlier same-day session belongs to the gap");
    assert_eq!(gap.sets, 1);
    assert_eq!(gap.reps, 5);
    assert_eq!(gap.volume, 500.0);
  }

  #[test]
  fn test_interstitial_same_workout_counts_sets_between() {
    let workouts = vec![workout(
      "w1",
      day("2024-01-01"),
      vec![exercise(
        "Bench",
        vec![set(100.0, 5), set(80.0, 10), set(90.0, 8), set(105.0, 2)],
      )],
    )];
    let sessions = exercise_sessions(&workouts, "bench");

    let prev = RecordPoint { date: day("2024-01-01"), workout_id: "w1".into(), order_index: 0 };
    let current = RecordPoint { date: day("2024-01-01"), workout_id: "w1".into(), order_index: 3 };

    let (stats, fell_back) = interstitial_stats(&sessions, &prev, &current);
    assert!(!fell_back);
    assert_eq!(stats.sets, 2, "only the sets between the two top sets count");
    assert_eq!(stats.reps, 18);
    assert_eq!(stats.volume, 80.0 * 10.0 + 90.0 * 8.0);
  }

  #[test]
  fn test_interstitial_back_to_back_sets_fall_back_to_session() {
    let workouts = vec![workout(
      "w1",
      day("2024-01-01"),
      vec![exercise("Bench", vec![set(100.0, 5), set(105.0, 2)])],
    )];
    let sessions = exercise_sessions(&workouts, "bench");

    let prev = RecordPoint { date: day("2024-01-01"), workout_id: "w1".into(), order_index: 0 };
    let current = RecordPoint { date: day("2024-01-01"), workout_id: "w1".into(), order_index: 1 };

    let (stats, fell_back) = interstitial_stats(&sessions, &prev, &current);
    assert!(fell_back, "no sets lie between back-to-back top sets");
    assert_eq!(stats.sets, 2, "falls back to the whole session");
    assert_eq!(stats.sessions, 1);
  }
}
