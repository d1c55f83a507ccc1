pub mod records;
pub mod workout;

pub use records::{ExerciseTimeline, GapStats, PersonalBest, TimelineNode};
pub use workout::{Workout, WorkoutExercise, WorkoutSet};
