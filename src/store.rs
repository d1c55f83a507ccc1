//! Workout log persistence
//!
//! SQLite storage for the raw workout log, nothing else: the analytics
//! engine is a pure projection and recomputes from these rows on every
//! request, so no derived structure is ever written back. Dates are stored
//! as `YYYY-MM-DD` text, which keeps lexicographic and chronological order
//! identical; same-day workouts keep their insertion order via rowid.

use chrono::NaiveDate;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::collections::HashMap;

use crate::models::{Workout, WorkoutExercise, WorkoutSet};

pub type DbPool = SqlitePool;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),
}

/// ---------------------------------------------------------------------------
/// Connection Management
/// ---------------------------------------------------------------------------

/// Open (or create) the workout log database at the given path and bring
/// the schema up to date.
pub async fn open(db_path: &str) -> Result<DbPool, StoreError> {
  let db_url = format!("sqlite://{}?mode=rwc", db_path);

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  Ok(pool)
}

/// In-memory database for tests. A single connection keeps every query on
/// the same in-memory instance.
pub async fn open_in_memory() -> Result<DbPool, StoreError> {
  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  Ok(pool)
}

/// ---------------------------------------------------------------------------
/// Workout Log Access
/// ---------------------------------------------------------------------------

/// Insert a workout with its exercises and sets, replacing any previous
/// workout with the same id. Document order is preserved through position
/// columns.
pub async fn save_workout(pool: &DbPool, workout: &Workout) -> Result<(), StoreError> {
  let mut tx = pool.begin().await?;

  sqlx::query("DELETE FROM workouts WHERE id = ?1")
    .bind(&workout.id)
    .execute(&mut *tx)
    .await?;

  sqlx::query(
    r#"
    INSERT INTO workouts (id, user_id, date, duration_minutes, body_weight)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
  )
  .bind(&workout.id)
  .bind(&workout.user_id)
  .bind(workout.date)
  .bind(workout.duration_minutes)
  .bind(workout.body_weight)
  .execute(&mut *tx)
  .await?;

  for (position, exercise) in workout.exercises.iter().enumerate() {
    let inserted = sqlx::query(
      r#"
      INSERT INTO workout_exercises (workout_id, position, exercise_name)
      VALUES (?1, ?2, ?3)
      "#,
    )
    .bind(&workout.id)
    .bind(position as i64)
    .bind(&exercise.exercise_name)
    .execute(&mut *tx)
    .await?;
    let exercise_id = inserted.last_insert_rowid();

    for set in &exercise.sets {
      sqlx::query(
        r#"
        INSERT INTO workout_sets (exercise_id, set_number, weight, reps, is_bodyweight, extra_weight)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
      )
      .bind(exercise_id)
      .bind(set.set_number)
      .bind(set.weight)
      .bind(set.reps)
      .bind(set.is_bodyweight)
      .bind(set.extra_weight)
      .execute(&mut *tx)
      .await?;
    }
  }

  tx.commit().await?;
  Ok(())
}

/// Load one user's full workout log, ordered by date and then insertion
/// order, with the nested exercise/set structure rebuilt.
pub async fn load_workouts(pool: &DbPool, user_id: &str) -> Result<Vec<Workout>, StoreError> {
  let workout_rows = sqlx::query(
    r#"
    SELECT id, user_id, date, duration_minutes, body_weight
    FROM workouts
    WHERE user_id = ?1
    ORDER BY date, rowid
    "#,
  )
  .bind(user_id)
  .fetch_all(pool)
  .await?;

  let mut workouts: Vec<Workout> = Vec::with_capacity(workout_rows.len());
  let mut workout_index: HashMap<String, usize> = HashMap::new();
  for row in workout_rows {
    let id: String = row.get("id");
    workout_index.insert(id.clone(), workouts.len());
    workouts.push(Workout {
      id,
      user_id: row.get("user_id"),
      date: row.get::<NaiveDate, _>("date"),
      exercises: Vec::new(),
      duration_minutes: row.get("duration_minutes"),
      body_weight: row.get("body_weight"),
    });
  }

  let exercise_rows = sqlx::query(
    r#"
    SELECT we.id, we.workout_id, we.exercise_name
    FROM workout_exercises we
    JOIN workouts w ON w.id = we.workout_id
    WHERE w.user_id = ?1
    ORDER BY we.workout_id, we.position
    "#,
  )
  .bind(user_id)
  .fetch_all(pool)
  .await?;

  // exercise rowid -> (workout slot, exercise slot)
  let mut exercise_index: HashMap<i64, (usize, usize)> = HashMap::new();
  for row in exercise_rows {
    let workout_id: String = row.get("workout_id");
    let Some(&slot) = workout_index.get(&workout_id) else { continue };
    let exercises = &mut workouts[slot].exercises;
    exercise_index.insert(row.get("id"), (slot, exercises.len()));
    exercises.push(WorkoutExercise {
      exercise_name: row.get("exercise_name"),
      sets: Vec::new(),
    });
  }

  let set_rows = sqlx::query(
    r#"
    SELECT ws.exercise_id, ws.set_number, ws.weight, ws.reps, ws.is_bodyweight, ws.extra_weight
    FROM workout_sets ws
    JOIN workout_exercises we ON we.id = ws.exercise_id
    JOIN workouts w ON w.id = we.workout_id
    WHERE w.user_id = ?1
    ORDER BY ws.exercise_id, ws.rowid
    "#,
  )
  .bind(user_id)
  .fetch_all(pool)
  .await?;

  for row in set_rows {
    let exercise_id: i64 = row.get("exercise_id");
    let Some(&(workout_slot, exercise_slot)) = exercise_index.get(&exercise_id) else {
      continue;
    };
    workouts[workout_slot].exercises[exercise_slot].sets.push(WorkoutSet {
      weight: row.get("weight"),
      reps: row.get("reps"),
      is_bodyweight: row.get("is_bodyweight"),
      extra_weight: row.get("extra_weight"),
      set_number: row.get("set_number"),
    });
  }

  Ok(workouts)
}
