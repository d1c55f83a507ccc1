//! One-rep-max estimation
//!
//! Uses the Epley formula: `1RM = load * (1 + reps / 30)`. A single rep is
//! reported as-is (it is an actual max, not an estimate). The formula is
//! strictly monotonic in both load and reps, which is what record detection
//! relies on.

/// Number of reps a full additional bodyweight of load is worth in the
/// Epley curve.
const EPLEY_REP_DIVISOR: f64 = 30.0;

/// Estimated maximal single-rep load for a (load, reps) pair.
///
/// Non-positive loads return 0.0: an unloaded bodyweight set is a valid log
/// entry but can never displace a record, because records require a strict
/// improvement over a best that starts at zero.
pub fn estimate_one_rep_max(load: f64, reps: i64) -> f64 {
  if load <= 0.0 {
    return 0.0;
  }
  if reps <= 1 {
    return load;
  }
  load * (1.0 + reps as f64 / EPLEY_REP_DIVISOR)
}
