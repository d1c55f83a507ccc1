//! Global record analytics
//!
//! Cross-exercise statistics derived from the full record ledger plus the
//! raw workout log: stagnation, record cadence, co-occurrence between
//! exercises, volume-wave classification around records, all-time
//! progression ranking and rep-range profiling.
//!
//! Everything here is descriptive, not inferential, and follows one policy:
//! degrade, don't throw. Thin or empty inputs produce None/empty outputs and
//! every denominator is guarded.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::exercise::{latest_display_names, normalize_name};
use crate::models::{PersonalBest, Workout};

/// ---------------------------------------------------------------------------
/// Analysis Constants
/// ---------------------------------------------------------------------------

/// A record counts as "surged" when another record lands within this many
/// days after it.
const SURGE_WINDOW_DAYS: i64 = 7;

/// Length of the co-occurrence window ending on each record date.
const SYNERGY_WINDOW_DAYS: i64 = 7;

/// Short and long trailing windows for volume-wave classification.
const WAVE_SHORT_WINDOW_DAYS: i64 = 14;
const WAVE_LONG_WINDOW_DAYS: i64 = 90;

/// Short-window weekly volume above this multiple of the long-window
/// average classifies as a spike; below the deload ratio as a deload.
const WAVE_SPIKE_RATIO: f64 = 1.1;
const WAVE_DELOAD_RATIO: f64 = 0.9;

/// Rep-range archetype boundaries: low is 1-3, mid is 4-8, high is 9+.
const REP_LOW_MAX: i64 = 3;
const REP_MID_MAX: i64 = 8;

/// Leaderboard length for synergy and hierarchy rankings.
const TOP_RESULTS: usize = 5;

/// ---------------------------------------------------------------------------
/// Output Structures
/// ---------------------------------------------------------------------------

/// Longest stretch without a single record, across all exercises.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drought {
  pub days: i64,
  pub from: NaiveDate,
  pub to: NaiveDate,
}

/// An exercise that keeps showing up in the week leading into records of
/// other lifts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSynergy {
  pub exercise_name: String,
  /// Distinct ISO weeks in which the exercise appeared inside any record's
  /// trailing window.
  pub shared_weeks: usize,
  /// `shared_weeks` normalized by the number of distinct record weeks.
  pub ratio: f64,
}

/// Share of records set during each training-volume regime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeWaveBreakdown {
  pub spike_pct: f64,
  pub deload_pct: f64,
  pub linear_pct: f64,
}

/// All-time e1RM progression of one exercise, first record to latest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordProgression {
  pub exercise_name: String,
  pub first_value: f64,
  pub latest_value: f64,
  pub gain_pct: f64,
  pub records: usize,
}

/// How many records were set in each rep range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepArchetypes {
  /// 1-3 reps.
  pub low: usize,
  /// 4-8 reps.
  pub mid: usize,
  /// 9+ reps.
  pub high: usize,
}

/// The full cross-exercise analytics snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordInsights {
  /// Longest gap between two consecutive records. None below two entries.
  pub drought: Option<Drought>,
  /// Average number of workouts strictly between consecutive
  /// record-containing workouts. None below two record workouts.
  pub mean_workouts_between_records: Option<f64>,
  /// Workouts logged per elapsed ISO-week of the log (a zero-day span
  /// counts as one week).
  pub pr_density: f64,
  /// Share of records followed by another record within seven days.
  pub surge_probability: Option<f64>,
  /// Top co-occurring exercises across all record windows.
  pub synergies: Vec<ExerciseSynergy>,
  /// Volume regime distribution across records. None for an empty ledger.
  pub volume_waves: Option<VolumeWaveBreakdown>,
  /// Top exercises by all-time e1RM gain (needs two records each).
  pub hierarchy: Vec<RecordProgression>,
  pub archetypes: RepArchetypes,
}

/// ---------------------------------------------------------------------------
/// Aggregation
/// ---------------------------------------------------------------------------

/// Compute the full analytics snapshot. Each analytic is guarded on its own:
/// a ledger too thin for one of them still produces all the others.
pub fn compute_record_insights(
  workouts: &[Workout],
  ledger: &[PersonalBest],
) -> RecordInsights {
  // The ledger arrives in display order (newest first); analytics want
  // performed order.
  let mut records: Vec<&PersonalBest> = ledger.iter().collect();
  records.sort_by(|a, b| a.date.cmp(&b.date).then(a.order_index.cmp(&b.order_index)));

  RecordInsights {
    drought: longest_drought(&records),
    mean_workouts_between_records: mean_workouts_between(workouts, &records),
    pr_density: weekly_density(workouts),
    surge_probability: surge_probability(&records),
    synergies: exercise_synergies(workouts, &records),
    volume_waves: volume_waves(workouts, &records),
    hierarchy: record_hierarchy(workouts, &records),
    archetypes: rep_archetypes(&records),
  }
}

fn longest_drought(records: &[&PersonalBest]) -> Option<Drought> {
  let mut worst: Option<Drought> = None;
  for pair in records.windows(2) {
    let days = (pair[1].date - pair[0].date).num_days();
    if worst.as_ref().map_or(true, |w| days > w.days) {
      worst = Some(Drought {
        days,
        from: pair[0].date,
        to: pair[1].date,
      });
    }
  }
  worst
}

fn mean_workouts_between(workouts: &[Workout], records: &[&PersonalBest]) -> Option<f64> {
  let record_workouts: HashSet<&str> = records.iter().map(|pb| pb.workout_id.as_str()).collect();

  let mut ordered: Vec<&Workout> = workouts.iter().collect();
  ordered.sort_by_key(|w| w.date);

  let indices: Vec<usize> = ordered
    .iter()
    .enumerate()
    .filter(|(_, w)| record_workouts.contains(w.id.as_str()))
    .map(|(i, _)| i)
    .collect();

  if indices.len() < 2 {
    return None;
  }
  let total: usize = indices.windows(2).map(|pair| pair[1] - pair[0] - 1).sum();
  Some(total as f64 / (indices.len() - 1) as f64)
}

fn weekly_density(workouts: &[Workout]) -> f64 {
  if workouts.is_empty() {
    return 0.0;
  }
  let first = workouts.iter().map(|w| w.date).min().unwrap_or_default();
  let last = workouts.iter().map(|w| w.date).max().unwrap_or_default();
  let span_days = (last - first).num_days();
  let weeks = if span_days == 0 { 1.0 } else { span_days as f64 / 7.0 };
  workouts.len() as f64 / weeks
}

fn surge_probability(records: &[&PersonalBest]) -> Option<f64> {
  if records.is_empty() {
    return None;
  }
  let surged = records
    .iter()
    .filter(|pb| {
      records.iter().any(|other| {
        let delta = (other.date - pb.date).num_days();
        delta > 0 && delta <= SURGE_WINDOW_DAYS
      })
    })
    .count();
  Some(surged as f64 / records.len() as f64)
}

/// ISO week bucket of a date, explicit and timezone-free.
fn iso_week_key(date: NaiveDate) -> (i32, u32) {
  let week = date.iso_week();
  (week.year(), week.week())
}

fn exercise_synergies(workouts: &[Workout], records: &[&PersonalBest]) -> Vec<ExerciseSynergy> {
  let record_weeks: HashSet<(i32, u32)> =
    records.iter().map(|pb| iso_week_key(pb.date)).collect();
  if record_weeks.is_empty() {
    return Vec::new();
  }

  // Per other-exercise, the distinct ISO weeks in which it was trained
  // inside any record's trailing window. Week-level dedup keeps a burst of
  // same-week records from double-counting its neighbours.
  let mut weeks_by_exercise: HashMap<String, HashSet<(i32, u32)>> = HashMap::new();
  for pb in records {
    let record_key = normalize_name(&pb.exercise_name);
    let window_start = pb.date - Duration::days(SYNERGY_WINDOW_DAYS - 1);

    for workout in workouts {
      if workout.date < window_start || workout.date > pb.date {
        continue;
      }
      for exercise in &workout.exercises {
        let key = normalize_name(&exercise.exercise_name);
        if key != record_key {
          weeks_by_exercise
            .entry(key)
            .or_default()
            .insert(iso_week_key(workout.date));
        }
      }
    }
  }

  let names = latest_display_names(workouts);
  let mut synergies: Vec<ExerciseSynergy> = weeks_by_exercise
    .into_iter()
    .map(|(key, weeks)| ExerciseSynergy {
      exercise_name: names.get(&key).cloned().unwrap_or(key),
      shared_weeks: weeks.len(),
      ratio: weeks.len() as f64 / record_weeks.len() as f64,
    })
    .collect();

  synergies.sort_by(|a, b| {
    b.shared_weeks
      .cmp(&a.shared_weeks)
      .then_with(|| a.exercise_name.cmp(&b.exercise_name))
  });
  synergies.truncate(TOP_RESULTS);
  synergies
}

fn volume_waves(workouts: &[Workout], records: &[&PersonalBest]) -> Option<VolumeWaveBreakdown> {
  if records.is_empty() {
    return None;
  }

  let trailing_volume = |end: NaiveDate, days: i64| -> f64 {
    let start = end - Duration::days(days - 1);
    workouts
      .iter()
      .filter(|w| w.date >= start && w.date <= end)
      .map(|w| w.total_volume())
      .sum()
  };

  let mut spikes = 0usize;
  let mut deloads = 0usize;
  let mut linear = 0usize;
  for pb in records {
    let short_weekly = trailing_volume(pb.date, WAVE_SHORT_WINDOW_DAYS)
      / (WAVE_SHORT_WINDOW_DAYS as f64 / 7.0);
    let long_weekly = trailing_volume(pb.date, WAVE_LONG_WINDOW_DAYS)
      / (WAVE_LONG_WINDOW_DAYS as f64 / 7.0);

    if long_weekly <= 0.0 {
      linear += 1;
    } else if short_weekly > WAVE_SPIKE_RATIO * long_weekly {
      spikes += 1;
    } else if short_weekly < WAVE_DELOAD_RATIO * long_weekly {
      deloads += 1;
    } else {
      linear += 1;
    }
  }

  let total = records.len() as f64;
  Some(VolumeWaveBreakdown {
    spike_pct: spikes as f64 / total * 100.0,
    deload_pct: deloads as f64 / total * 100.0,
    linear_pct: linear as f64 / total * 100.0,
  })
}

fn record_hierarchy(workouts: &[Workout], records: &[&PersonalBest]) -> Vec<RecordProgression> {
  let mut by_exercise: HashMap<String, Vec<&PersonalBest>> = HashMap::new();
  for pb in records {
    by_exercise
      .entry(normalize_name(&pb.exercise_name))
      .or_default()
      .push(*pb);
  }

  let names = latest_display_names(workouts);
  let mut progressions: Vec<RecordProgression> = by_exercise
    .into_iter()
    .filter(|(_, entries)| entries.len() >= 2)
    .map(|(key, entries)| {
      let first = entries.first().map(|pb| pb.value).unwrap_or(0.0);
      let latest = entries.last().map(|pb| pb.value).unwrap_or(0.0);
      let base = if first > 0.0 { first } else { 1.0 };
      RecordProgression {
        exercise_name: names.get(&key).cloned().unwrap_or(key),
        first_value: first,
        latest_value: latest,
        gain_pct: (latest - first) / base * 100.0,
        records: entries.len(),
      }
    })
    .collect();

  progressions.sort_by(|a, b| {
    b.gain_pct
      .partial_cmp(&a.gain_pct)
      .unwrap_or(std::cmp::Ordering::Equal)
      .then_with(|| a.exercise_name.cmp(&b.exercise_name))
  });
  progressions.truncate(TOP_RESULTS);
  progressions
}

fn rep_archetypes(records: &[&PersonalBest]) -> RepArchetypes {
  let mut archetypes = RepArchetypes::default();
  for pb in records {
    if pb.reps <= REP_LOW_MAX {
      archetypes.low += 1;
    } else if pb.reps <= REP_MID_MAX {
      archetypes.mid += 1;
    } else {
      archetypes.high += 1;
    }
  }
  archetypes
}
