use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Personal Record Event
/// ---------------------------------------------------------------------------

/// A single personal record event: one set that beat everything seen before
/// it for its exercise, on raw weight, on estimated 1RM, or on both.
///
/// Produced once by the ledger builder and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalBest {
  /// Exercise name as the user typed it at the time of the record.
  pub exercise_name: String,
  pub date: NaiveDate,
  pub workout_id: String,
  /// Effective load of the record-setting set (added weight for bodyweight
  /// movements).
  pub weight: f64,
  pub reps: i64,
  /// Estimated one-rep max of the record-setting set.
  pub value: f64,
  /// True when this event also set a new raw-weight record.
  pub is_highest_weight: bool,
  /// Intra-day tie-break ordinal: exercise position * 100 + set position.
  pub order_index: i64,
  /// Estimated 1RM displaced by this record. None for a first-ever record.
  pub previous_best: Option<f64>,
}

/// ---------------------------------------------------------------------------
/// Record Timeline
/// ---------------------------------------------------------------------------

/// Training accumulated between a record and the one before it in the same
/// chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapStats {
  pub days: i64,
  pub sessions: usize,
  pub sets: usize,
  pub reps: i64,
  /// Sum of load x reps over the gap's sets.
  pub volume: f64,
}

/// One node in a per-exercise monotonic record chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineNode {
  pub date: NaiveDate,
  pub workout_id: String,
  /// Effective load of the set that produced the node.
  pub weight: f64,
  pub reps: i64,
  /// The chain's metric at this node: raw load for the weight chain,
  /// estimated 1RM for the e1RM chain.
  pub value: f64,
  /// Training between this node and the previous one in the same chain.
  /// None for the chronologically first node.
  pub gap: Option<GapStats>,
}

/// The two independent record chains of one exercise, most recent node
/// first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseTimeline {
  pub weight_chain: Vec<TimelineNode>,
  pub e1rm_chain: Vec<TimelineNode>,
}
