//! Strength-training record detection and analytics.
//!
//! The engine turns a chronological workout log into a deduplicated ledger
//! of personal records (tracked independently on heaviest load and best
//! estimated 1RM) and a set of descriptive analyses over it: record chains
//! with interstitial training load, droughts, record cadence, exercise
//! synergy, volume waves and rep-range profiles.
//!
//! Every analysis is a pure projection of the in-memory log: nothing here
//! mutates or persists derived state, and recomputation is the only update
//! mechanism. The `store` and `import` modules are the boundary
//! collaborators that produce the raw log.

pub mod drilldown;
pub mod e1rm;
pub mod exercise;
pub mod import;
pub mod insights;
pub mod ledger;
pub mod models;
pub mod store;
pub mod timeline;

#[cfg(test)]
pub mod test_utils;

pub use drilldown::{drill_down, ExerciseDrilldown};
pub use e1rm::estimate_one_rep_max;
pub use exercise::normalize_name;
pub use insights::{compute_record_insights, RecordInsights};
pub use ledger::build_ledger;
pub use models::{
  ExerciseTimeline, GapStats, PersonalBest, TimelineNode, Workout, WorkoutExercise, WorkoutSet,
};
pub use timeline::build_chains;
