use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use sqlx::sqlite::{SqliteConnection, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;

use tracing::{debug, info};

use crate::catalog::{CatalogSnapshot, OneRepMaxTable};
use crate::error::{EngineError, Result};
use crate::models::{
  ChangeType, Exercise, ExerciseInstance, ModificationHistoryEntry, Protocol, Substitution,
  Workout, WorkoutRecord, WorkoutSet,
};
use crate::modifier::ModifyOutcome;

pub type DbPool = SqlitePool;

/// Open the connection pool and run migrations
pub async fn initialize_db(database_url: &str) -> Result<DbPool> {
  info!(url = database_url, "Initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(database_url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  info!("Database initialized successfully");
  Ok(pool)
}

/// ---------------------------------------------------------------------------
/// Column Helpers
/// ---------------------------------------------------------------------------

fn decode_error(message: String) -> EngineError {
  EngineError::Database(sqlx::Error::Decode(message.into()))
}

fn text_column<T>(row: &SqliteRow, column: &str) -> Result<T>
where
  T: FromStr<Err = String>,
{
  let raw: String = row.try_get(column)?;
  raw.parse().map_err(decode_error)
}

fn json_column<T: DeserializeOwned>(row: &SqliteRow, column: &str) -> Result<T> {
  let raw: String = row.try_get(column)?;
  Ok(serde_json::from_str(&raw)?)
}

fn timestamp_column(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>> {
  let raw: String = row.try_get(column)?;
  DateTime::parse_from_rfc3339(&raw)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| decode_error(format!("{}: {}", column, e)))
}

/// ---------------------------------------------------------------------------
/// Catalog
/// ---------------------------------------------------------------------------

pub async fn upsert_exercise(pool: &SqlitePool, exercise: &Exercise) -> Result<()> {
  let muscle_groups_json = serde_json::to_string(&exercise.muscle_groups)?;

  sqlx::query(
    r#"
    INSERT INTO exercises
        (id, name, muscle_groups_json, movement_pattern, equipment, exercise_type, base_exercise)
    VALUES (?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET
        name = excluded.name,
        muscle_groups_json = excluded.muscle_groups_json,
        movement_pattern = excluded.movement_pattern,
        equipment = excluded.equipment,
        exercise_type = excluded.exercise_type,
        base_exercise = excluded.base_exercise
    "#,
  )
  .bind(&exercise.id)
  .bind(&exercise.name)
  .bind(&muscle_groups_json)
  .bind(exercise.movement_pattern.map(|p| p.as_str()))
  .bind(exercise.equipment.as_str())
  .bind(exercise.exercise_type.as_str())
  .bind(&exercise.base_exercise)
  .execute(pool)
  .await?;

  Ok(())
}

pub async fn upsert_protocol(pool: &SqlitePool, protocol: &Protocol) -> Result<()> {
  let reps_json = serde_json::to_string(&protocol.reps)?;

  sqlx::query(
    r#"
    INSERT INTO protocols (id, name, reps_json, rest_seconds, tempo, rpe, intensity)
    VALUES (?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET
        name = excluded.name,
        reps_json = excluded.reps_json,
        rest_seconds = excluded.rest_seconds,
        tempo = excluded.tempo,
        rpe = excluded.rpe,
        intensity = excluded.intensity
    "#,
  )
  .bind(&protocol.id)
  .bind(&protocol.name)
  .bind(&reps_json)
  .bind(protocol.rest_seconds)
  .bind(&protocol.tempo)
  .bind(protocol.rpe)
  .bind(protocol.intensity)
  .execute(pool)
  .await?;

  Ok(())
}

/// Load every exercise and protocol into an in-memory snapshot
pub async fn load_catalog(pool: &SqlitePool) -> Result<CatalogSnapshot> {
  let exercise_rows = sqlx::query(
    r#"
    SELECT id, name, muscle_groups_json, movement_pattern, equipment, exercise_type, base_exercise
    FROM exercises
    ORDER BY id
    "#,
  )
  .fetch_all(pool)
  .await?;

  let mut exercises = Vec::with_capacity(exercise_rows.len());
  for row in &exercise_rows {
    let movement_pattern: Option<String> = row.try_get("movement_pattern")?;
    exercises.push(Exercise {
      id: row.try_get("id")?,
      name: row.try_get("name")?,
      muscle_groups: json_column(row, "muscle_groups_json")?,
      movement_pattern: movement_pattern
        .map(|p| p.parse())
        .transpose()
        .map_err(decode_error)?,
      equipment: text_column(row, "equipment")?,
      exercise_type: text_column(row, "exercise_type")?,
      base_exercise: row.try_get("base_exercise")?,
    });
  }

  let protocol_rows = sqlx::query(
    "SELECT id, name, reps_json, rest_seconds, tempo, rpe, intensity FROM protocols ORDER BY id",
  )
  .fetch_all(pool)
  .await?;

  let mut protocols = Vec::with_capacity(protocol_rows.len());
  for row in &protocol_rows {
    protocols.push(Protocol {
      id: row.try_get("id")?,
      name: row.try_get("name")?,
      reps: json_column(row, "reps_json")?,
      rest_seconds: row.try_get("rest_seconds")?,
      tempo: row.try_get("tempo")?,
      rpe: row.try_get("rpe")?,
      intensity: row.try_get("intensity")?,
    });
  }

  debug!(exercises = exercises.len(), protocols = protocols.len(), "Loaded catalog");
  Ok(CatalogSnapshot::new(exercises, protocols))
}

/// ---------------------------------------------------------------------------
/// One-Rep Maxes
/// ---------------------------------------------------------------------------

pub async fn save_one_rep_max(pool: &SqlitePool, user_id: &str, exercise_id: &str, weight: f64) -> Result<()> {
  sqlx::query(
    r#"
    INSERT INTO one_rep_maxes (user_id, exercise_id, weight, updated_at)
    VALUES (?, ?, ?, ?)
    ON CONFLICT(user_id, exercise_id) DO UPDATE SET
        weight = excluded.weight,
        updated_at = excluded.updated_at
    "#,
  )
  .bind(user_id)
  .bind(exercise_id)
  .bind(weight)
  .bind(Utc::now().to_rfc3339())
  .execute(pool)
  .await?;

  Ok(())
}

pub async fn load_one_rep_maxes(pool: &SqlitePool, user_id: &str) -> Result<OneRepMaxTable> {
  let rows: Vec<(String, f64)> =
    sqlx::query_as("SELECT exercise_id, weight FROM one_rep_maxes WHERE user_id = ?")
      .bind(user_id)
      .fetch_all(pool)
      .await?;

  let mut table = OneRepMaxTable::default();
  for (exercise_id, weight) in rows {
    table.insert(user_id, &exercise_id, weight);
  }
  Ok(table)
}

/// ---------------------------------------------------------------------------
/// Workouts
/// ---------------------------------------------------------------------------

async fn write_record(conn: &mut SqliteConnection, record: &WorkoutRecord) -> Result<()> {
  let w = &record.workout;
  let superset_groups_json = w
    .superset_groups
    .as_ref()
    .map(serde_json::to_string)
    .transpose()?;
  let customizations_json = if w.protocol_customizations.is_empty() {
    None
  } else {
    Some(serde_json::to_string(&w.protocol_customizations)?)
  };

  sqlx::query(
    r#"
    INSERT INTO workouts
        (id, user_id, name, scheduled_date, session_type, split_target, status,
         exercise_ids_json, protocol_variant_ids_json, superset_style, superset_groups_json,
         protocol_customizations_json, effort_level, target_duration_minutes,
         training_location, available_equipment_json, version, updated_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET
        name = excluded.name,
        scheduled_date = excluded.scheduled_date,
        session_type = excluded.session_type,
        split_target = excluded.split_target,
        status = excluded.status,
        exercise_ids_json = excluded.exercise_ids_json,
        protocol_variant_ids_json = excluded.protocol_variant_ids_json,
        superset_style = excluded.superset_style,
        superset_groups_json = excluded.superset_groups_json,
        protocol_customizations_json = excluded.protocol_customizations_json,
        effort_level = excluded.effort_level,
        target_duration_minutes = excluded.target_duration_minutes,
        training_location = excluded.training_location,
        available_equipment_json = excluded.available_equipment_json,
        version = excluded.version,
        updated_at = excluded.updated_at
    "#,
  )
  .bind(&w.id)
  .bind(&w.user_id)
  .bind(&w.name)
  .bind(w.scheduled_date)
  .bind(w.session_type.as_str())
  .bind(w.split_target.to_string())
  .bind(w.status.as_str())
  .bind(serde_json::to_string(&w.exercise_ids)?)
  .bind(serde_json::to_string(&w.protocol_variant_ids)?)
  .bind(w.superset_style.as_str())
  .bind(&superset_groups_json)
  .bind(&customizations_json)
  .bind(w.effort_level.as_str())
  .bind(w.target_duration_minutes)
  .bind(w.training_location.as_str())
  .bind(serde_json::to_string(&w.available_equipment)?)
  .bind(w.version)
  .bind(Utc::now().to_rfc3339())
  .execute(&mut *conn)
  .await?;

  for instance in &record.instances {
    let (original_exercise_id, substitution_reason) = match &instance.substitution {
      Some(s) => (Some(s.original_exercise_id.as_str()), s.reason.as_deref()),
      None => (None, None),
    };

    sqlx::query(
      r#"
      INSERT INTO exercise_instances
          (id, workout_id, exercise_id, protocol_id, position, target_weight,
           original_exercise_id, substitution_reason)
      VALUES (?, ?, ?, ?, ?, ?, ?, ?)
      ON CONFLICT(id) DO UPDATE SET
          exercise_id = excluded.exercise_id,
          protocol_id = excluded.protocol_id,
          position = excluded.position,
          target_weight = excluded.target_weight,
          original_exercise_id = excluded.original_exercise_id,
          substitution_reason = excluded.substitution_reason
      "#,
    )
    .bind(&instance.id)
    .bind(&w.id)
    .bind(&instance.exercise_id)
    .bind(&instance.protocol_id)
    .bind(instance.position as i64)
    .bind(instance.target_weight)
    .bind(original_exercise_id)
    .bind(substitution_reason)
    .execute(&mut *conn)
    .await?;

    // Sets are replaced wholesale
    sqlx::query("DELETE FROM sets WHERE instance_id = ?")
      .bind(&instance.id)
      .execute(&mut *conn)
      .await?;

    for set in &instance.sets {
      sqlx::query(
        "INSERT INTO sets (instance_id, set_number, target_reps, target_weight, completion) VALUES (?, ?, ?, ?, ?)",
      )
      .bind(&instance.id)
      .bind(set.set_number)
      .bind(set.target_reps)
      .bind(set.target_weight)
      .bind(set.completion.as_str())
      .execute(&mut *conn)
      .await?;
    }
  }

  Ok(())
}

async fn delete_instances(conn: &mut SqliteConnection, workout_id: &str) -> Result<()> {
  sqlx::query(
    "DELETE FROM sets WHERE instance_id IN (SELECT id FROM exercise_instances WHERE workout_id = ?)",
  )
  .bind(workout_id)
  .execute(&mut *conn)
  .await?;

  sqlx::query("DELETE FROM exercise_instances WHERE workout_id = ?")
    .bind(workout_id)
    .execute(&mut *conn)
    .await?;

  Ok(())
}

/// Insert or update a workout with its instances and sets
pub async fn save_workout_record(pool: &SqlitePool, record: &WorkoutRecord) -> Result<()> {
  let mut tx = pool.begin().await?;
  write_record(&mut tx, record).await?;
  tx.commit().await?;

  debug!(workout = %record.workout.id, instances = record.instances.len(), "Saved workout");
  Ok(())
}

pub async fn load_workout_record(pool: &SqlitePool, workout_id: &str) -> Result<WorkoutRecord> {
  let row = sqlx::query("SELECT * FROM workouts WHERE id = ?")
    .bind(workout_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| EngineError::WorkoutNotFound(workout_id.to_string()))?;

  let superset_groups_json: Option<String> = row.try_get("superset_groups_json")?;
  let customizations_json: Option<String> = row.try_get("protocol_customizations_json")?;
  let scheduled_date: NaiveDate = row.try_get("scheduled_date")?;

  let workout = Workout {
    id: row.try_get("id")?,
    user_id: row.try_get("user_id")?,
    name: row.try_get("name")?,
    scheduled_date,
    session_type: text_column(&row, "session_type")?,
    split_target: text_column(&row, "split_target")?,
    status: text_column(&row, "status")?,
    exercise_ids: json_column(&row, "exercise_ids_json")?,
    protocol_variant_ids: json_column(&row, "protocol_variant_ids_json")?,
    superset_style: text_column(&row, "superset_style")?,
    superset_groups: superset_groups_json
      .map(|json| serde_json::from_str(&json))
      .transpose()?,
    protocol_customizations: customizations_json
      .map(|json| serde_json::from_str(&json))
      .transpose()?
      .unwrap_or_default(),
    effort_level: text_column(&row, "effort_level")?,
    target_duration_minutes: row.try_get("target_duration_minutes")?,
    training_location: text_column(&row, "training_location")?,
    available_equipment: json_column(&row, "available_equipment_json")?,
    version: row.try_get("version")?,
  };

  let instance_rows = sqlx::query(
    r#"
    SELECT id, exercise_id, protocol_id, position, target_weight, original_exercise_id, substitution_reason
    FROM exercise_instances
    WHERE workout_id = ?
    ORDER BY position
    "#,
  )
  .bind(workout_id)
  .fetch_all(pool)
  .await?;

  let mut instances = Vec::with_capacity(instance_rows.len());
  for row in &instance_rows {
    let id: String = row.try_get("id")?;
    let position: i64 = row.try_get("position")?;
    let original_exercise_id: Option<String> = row.try_get("original_exercise_id")?;
    let substitution_reason: Option<String> = row.try_get("substitution_reason")?;

    let set_rows = sqlx::query(
      "SELECT set_number, target_reps, target_weight, completion FROM sets WHERE instance_id = ? ORDER BY set_number",
    )
    .bind(&id)
    .fetch_all(pool)
    .await?;

    let mut sets = Vec::with_capacity(set_rows.len());
    for set_row in &set_rows {
      sets.push(WorkoutSet {
        set_number: set_row.try_get("set_number")?,
        target_reps: set_row.try_get("target_reps")?,
        target_weight: set_row.try_get("target_weight")?,
        completion: text_column(set_row, "completion")?,
      });
    }

    instances.push(ExerciseInstance {
      id,
      workout_id: workout.id.clone(),
      exercise_id: row.try_get("exercise_id")?,
      protocol_id: row.try_get("protocol_id")?,
      position: position as usize,
      target_weight: row.try_get("target_weight")?,
      substitution: original_exercise_id.map(|original| Substitution {
        original_exercise_id: original,
        reason: substitution_reason,
      }),
      sets,
    });
  }

  Ok(WorkoutRecord { workout, instances })
}

/// ---------------------------------------------------------------------------
/// Modification History
/// ---------------------------------------------------------------------------

async fn insert_history(conn: &mut SqliteConnection, entry: &ModificationHistoryEntry) -> Result<()> {
  sqlx::query(
    r#"
    INSERT INTO modification_history
        (id, workout_id, version, change_type, diff_description, snapshot_json, recorded_at)
    VALUES (?, ?, ?, ?, ?, ?, ?)
    "#,
  )
  .bind(&entry.id)
  .bind(&entry.workout_id)
  .bind(entry.version)
  .bind(entry.change_type.as_str())
  .bind(&entry.diff_description)
  .bind(serde_json::to_string(&entry.snapshot)?)
  .bind(entry.recorded_at.to_rfc3339())
  .execute(&mut *conn)
  .await?;

  Ok(())
}

pub async fn append_history(pool: &SqlitePool, entry: &ModificationHistoryEntry) -> Result<()> {
  let mut conn = pool.acquire().await?;
  insert_history(&mut conn, entry).await
}

/// History for a workout, oldest version first
pub async fn load_history(pool: &SqlitePool, workout_id: &str) -> Result<Vec<ModificationHistoryEntry>> {
  let rows = sqlx::query(
    r#"
    SELECT id, workout_id, version, change_type, diff_description, snapshot_json, recorded_at
    FROM modification_history
    WHERE workout_id = ?
    ORDER BY version
    "#,
  )
  .bind(workout_id)
  .fetch_all(pool)
  .await?;

  rows
    .iter()
    .map(|row| -> Result<ModificationHistoryEntry> {
      let change_type: ChangeType = text_column(row, "change_type")?;
      Ok(ModificationHistoryEntry {
        id: row.try_get("id")?,
        workout_id: row.try_get("workout_id")?,
        version: row.try_get("version")?,
        change_type,
        diff_description: row.try_get("diff_description")?,
        snapshot: json_column(row, "snapshot_json")?,
        recorded_at: timestamp_column(row, "recorded_at")?,
      })
    })
    .collect()
}

/// History append, instance cleanup on rebuild, and the upsert, in one transaction
pub async fn persist_modification(pool: &SqlitePool, outcome: &ModifyOutcome) -> Result<()> {
  let mut tx = pool.begin().await?;

  insert_history(&mut tx, &outcome.history_entry).await?;
  if outcome.change_type == ChangeType::Structural {
    delete_instances(&mut tx, &outcome.record.workout.id).await?;
  }
  write_record(&mut tx, &outcome.record).await?;

  tx.commit().await?;

  info!(
    workout = %outcome.record.workout.id,
    version = outcome.record.workout.version,
    change = %outcome.change_type,
    "Persisted modification"
  );
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::{Catalog, OneRepMaxSource};
  use crate::config::EngineConfig;
  use crate::models::{SplitDay, SplitTarget};
  use crate::modifier::{ModifyIntent, SubstitutionRequest, WorkoutModifier};
  use crate::test_utils::{
    fixture_catalog, push_record, seed_test_catalog, setup_test_db, teardown_test_db, TEST_USER,
  };

  async fn built_record(pool: &SqlitePool) -> WorkoutRecord {
    let catalog = load_catalog(pool).await.expect("Failed to load catalog");
    let maxes = load_one_rep_maxes(pool, TEST_USER).await.expect("Failed to load maxes");
    push_record(&catalog, &maxes, None, &["barbell_bench_press"])
  }

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('exercises', 'protocols', 'workouts', 'exercise_instances', 'sets', 'modification_history', 'one_rep_maxes')",
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 7);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_catalog_roundtrip() {
    let pool = setup_test_db().await;
    seed_test_catalog(&pool).await;

    let loaded = load_catalog(&pool).await.expect("Failed to load catalog");
    let fixture = fixture_catalog();
    assert_eq!(loaded.exercise_count(), fixture.exercise_count());
    assert_eq!(loaded.protocol_count(), fixture.protocol_count());
    assert_eq!(loaded.get_exercise("plank"), fixture.get_exercise("plank"));
    assert_eq!(
      loaded.get_protocol("strength_5x5_straight"),
      fixture.get_protocol("strength_5x5_straight")
    );

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_one_rep_max_upsert() {
    let pool = setup_test_db().await;
    seed_test_catalog(&pool).await;

    save_one_rep_max(&pool, TEST_USER, "barbell_bench_press", 205.0)
      .await
      .expect("Failed to save one-rep max");
    let maxes = load_one_rep_maxes(&pool, TEST_USER).await.expect("Failed to load maxes");

    assert_eq!(maxes.len(), 1);
    assert_eq!(maxes.one_rep_max(TEST_USER, "barbell_bench_press"), Some(205.0));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_workout_record_roundtrip() {
    let pool = setup_test_db().await;
    seed_test_catalog(&pool).await;

    let record = built_record(&pool).await;
    save_workout_record(&pool, &record).await.expect("Failed to save workout");
    // Saving twice is harmless
    save_workout_record(&pool, &record).await.expect("Failed to save workout again");

    let loaded = load_workout_record(&pool, &record.workout.id)
      .await
      .expect("Failed to load workout");
    assert_eq!(loaded, record);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_missing_workout() {
    let pool = setup_test_db().await;

    let err = load_workout_record(&pool, "nope").await.unwrap_err();
    assert!(matches!(err, EngineError::WorkoutNotFound(_)));

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_structural_modification_replaces_instances() {
    let pool = setup_test_db().await;
    seed_test_catalog(&pool).await;

    let record = built_record(&pool).await;
    save_workout_record(&pool, &record).await.expect("Failed to save workout");

    let catalog = load_catalog(&pool).await.expect("Failed to load catalog");
    let maxes = load_one_rep_maxes(&pool, TEST_USER).await.expect("Failed to load maxes");
    let config = EngineConfig::default();
    let outcome = WorkoutModifier::new(&catalog, &maxes, &config)
      .modify(
        &record,
        &ModifyIntent {
          workout_id: record.workout.id.clone(),
          new_split_target: Some(SplitTarget::Split(SplitDay::Pull)),
          ..Default::default()
        },
      )
      .expect("Failed to modify workout");
    persist_modification(&pool, &outcome).await.expect("Failed to persist");

    let loaded = load_workout_record(&pool, &record.workout.id)
      .await
      .expect("Failed to load workout");
    assert_eq!(loaded, outcome.record);

    let instance_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercise_instances WHERE workout_id = ?")
      .bind(&record.workout.id)
      .fetch_one(&pool)
      .await
      .expect("Failed to count instances");
    assert_eq!(instance_count as usize, outcome.record.instances.len());

    let history = load_history(&pool, &record.workout.id).await.expect("Failed to load history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].version, 1);
    assert_eq!(history[0].snapshot, record);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_history_is_ordered_by_version() {
    let pool = setup_test_db().await;
    seed_test_catalog(&pool).await;

    let catalog = load_catalog(&pool).await.expect("Failed to load catalog");
    let maxes = load_one_rep_maxes(&pool, TEST_USER).await.expect("Failed to load maxes");
    let config = EngineConfig::default();
    let modifier = WorkoutModifier::new(&catalog, &maxes, &config);

    let mut record = built_record(&pool).await;
    save_workout_record(&pool, &record).await.expect("Failed to save workout");

    for (i, intent) in [
      ModifyIntent {
        new_name: Some("Renamed".to_string()),
        ..Default::default()
      },
      ModifyIntent {
        substitutions: vec![SubstitutionRequest {
          position: 0,
          new_exercise_id: "dumbbell_bench_press".to_string(),
          reason: Some("busy rack".to_string()),
        }],
        ..Default::default()
      },
    ]
    .into_iter()
    .enumerate()
    {
      let outcome = modifier.modify(&record, &intent).expect("Failed to modify workout");
      append_history(&pool, &outcome.history_entry).await.expect("Failed to append history");
      save_workout_record(&pool, &outcome.record).await.expect("Failed to save workout");
      record = outcome.record;
      assert_eq!(record.workout.version as usize, i + 2);
    }

    let history = load_history(&pool, &record.workout.id).await.expect("Failed to load history");
    let versions: Vec<u32> = history.iter().map(|h| h.version).collect();
    assert_eq!(versions, vec![1, 2]);
    assert_eq!(history[1].change_type, ChangeType::Substitution);

    let loaded = load_workout_record(&pool, &record.workout.id).await.expect("Failed to load workout");
    assert_eq!(
      loaded.instances[0].substitution.as_ref().map(|s| s.original_exercise_id.as_str()),
      Some("barbell_bench_press")
    );

    teardown_test_db(pool).await;
  }
}
