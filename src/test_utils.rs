//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Fixture catalog factory
//! - Database setup/teardown
//! - Workout record factories

use chrono::NaiveDate;

use crate::builder::{BuildIntent, WorkoutBuilder, WorkoutDetails};
use crate::catalog::{Catalog, CatalogSnapshot, OneRepMaxSource, OneRepMaxTable};
use crate::config::EngineConfig;
use crate::models::{
  EffortLevel, Equipment, Exercise, ExerciseType, MovementPattern, MuscleGroup, Protocol,
  SessionType, SplitDay, SplitTarget, TrainingLocation, WorkoutRecord,
};
use sqlx::SqlitePool;

/// ---------------------------------------------------------------------------
/// Fixture Catalog
/// ---------------------------------------------------------------------------

pub const TEST_USER: &str = "bobby";

pub fn exercise(
  id: &str,
  name: &str,
  muscles: &[MuscleGroup],
  pattern: Option<MovementPattern>,
  equipment: Equipment,
  exercise_type: ExerciseType,
  base: &str,
) -> Exercise {
  Exercise {
    id: id.to_string(),
    name: name.to_string(),
    muscle_groups: muscles.to_vec(),
    movement_pattern: pattern,
    equipment,
    exercise_type,
    base_exercise: base.to_string(),
  }
}

pub fn protocol(id: &str, reps: &[u32], rest_seconds: u32, intensity: f64) -> Protocol {
  Protocol {
    id: id.to_string(),
    name: None,
    reps: reps.to_vec(),
    rest_seconds,
    tempo: Some("2-0-1-0".to_string()),
    rpe: Some(7.5),
    intensity: Some(intensity),
  }
}

pub fn fixture_exercises() -> Vec<Exercise> {
  use Equipment as Gear;
  use ExerciseType::{Cardio, Compound, Isolation};
  use MovementPattern as P;
  use MuscleGroup::*;

  vec![
    exercise(
      "barbell_bench_press",
      "Barbell Bench Press",
      &[Chest, Triceps, Shoulders],
      Some(P::HorizontalPress),
      Gear::Barbell,
      Compound,
      "bench_press",
    ),
    exercise(
      "dumbbell_bench_press",
      "Dumbbell Bench Press",
      &[Chest, Triceps],
      Some(P::HorizontalPress),
      Gear::Dumbbell,
      Compound,
      "bench_press",
    ),
    exercise(
      "incline_dumbbell_press",
      "Incline Dumbbell Press",
      &[Chest, Shoulders],
      Some(P::HorizontalPress),
      Gear::Dumbbell,
      Compound,
      "incline_press",
    ),
    exercise(
      "push_up",
      "Push-Up",
      &[Chest, Triceps],
      Some(P::HorizontalPress),
      Gear::Bodyweight,
      Compound,
      "push_up",
    ),
    exercise(
      "barbell_row",
      "Barbell Row",
      &[Back, Lats, Biceps],
      Some(P::HorizontalPull),
      Gear::Barbell,
      Compound,
      "row",
    ),
    exercise(
      "dumbbell_row",
      "Dumbbell Row",
      &[Back, Lats],
      Some(P::HorizontalPull),
      Gear::Dumbbell,
      Compound,
      "row",
    ),
    exercise(
      "overhead_press",
      "Overhead Press",
      &[Shoulders, Triceps],
      Some(P::VerticalPress),
      Gear::Barbell,
      Compound,
      "overhead_press",
    ),
    exercise(
      "dumbbell_overhead_press",
      "Dumbbell Overhead Press",
      &[Shoulders, Triceps],
      Some(P::VerticalPress),
      Gear::Dumbbell,
      Compound,
      "overhead_press",
    ),
    exercise(
      "lat_pulldown",
      "Lat Pulldown",
      &[Lats, Biceps],
      Some(P::VerticalPull),
      Gear::Cable,
      Compound,
      "lat_pulldown",
    ),
    exercise(
      "pull_up",
      "Pull-Up",
      &[Lats, Biceps],
      Some(P::VerticalPull),
      Gear::Bodyweight,
      Compound,
      "pull_up",
    ),
    exercise(
      "tricep_pushdown",
      "Tricep Pushdown",
      &[Triceps],
      None,
      Gear::Cable,
      Isolation,
      "tricep_pushdown",
    ),
    exercise(
      "tricep_extension",
      "Overhead Tricep Extension",
      &[Triceps],
      None,
      Gear::Dumbbell,
      Isolation,
      "tricep_extension",
    ),
    exercise("barbell_curl", "Barbell Curl", &[Biceps], None, Gear::Barbell, Isolation, "curl"),
    exercise("dumbbell_curl", "Dumbbell Curl", &[Biceps], None, Gear::Dumbbell, Isolation, "curl"),
    exercise(
      "dumbbell_lateral_raise",
      "Dumbbell Lateral Raise",
      &[Shoulders],
      None,
      Gear::Dumbbell,
      Isolation,
      "lateral_raise",
    ),
    exercise("cable_fly", "Cable Fly", &[Chest], None, Gear::Cable, Isolation, "chest_fly"),
    exercise(
      "barbell_back_squat",
      "Barbell Back Squat",
      &[Quadriceps, Glutes],
      Some(P::Squat),
      Gear::Barbell,
      Compound,
      "squat",
    ),
    exercise(
      "goblet_squat",
      "Goblet Squat",
      &[Quadriceps, Glutes],
      Some(P::Squat),
      Gear::Kettlebell,
      Compound,
      "goblet_squat",
    ),
    exercise(
      "bodyweight_squat",
      "Bodyweight Squat",
      &[Quadriceps, Glutes],
      Some(P::Squat),
      Gear::Bodyweight,
      Compound,
      "air_squat",
    ),
    exercise(
      "conventional_deadlift",
      "Conventional Deadlift",
      &[Hamstrings, Glutes, Back],
      Some(P::Hinge),
      Gear::Barbell,
      Compound,
      "deadlift",
    ),
    exercise(
      "romanian_deadlift",
      "Romanian Deadlift",
      &[Hamstrings, Glutes],
      Some(P::Hinge),
      Gear::Barbell,
      Compound,
      "romanian_deadlift",
    ),
    exercise(
      "glute_bridge",
      "Glute Bridge",
      &[Glutes, Hamstrings],
      Some(P::Hinge),
      Gear::Bodyweight,
      Compound,
      "glute_bridge",
    ),
    exercise(
      "walking_lunge",
      "Walking Lunge",
      &[Quadriceps, Glutes],
      Some(P::Lunge),
      Gear::Bodyweight,
      Compound,
      "lunge",
    ),
    exercise(
      "leg_extension",
      "Leg Extension",
      &[Quadriceps],
      None,
      Gear::Machine,
      Isolation,
      "leg_extension",
    ),
    exercise(
      "leg_curl",
      "Lying Leg Curl",
      &[Hamstrings],
      None,
      Gear::Machine,
      Isolation,
      "leg_curl",
    ),
    exercise(
      "calf_raise",
      "Standing Calf Raise",
      &[Calves],
      None,
      Gear::Machine,
      Isolation,
      "calf_raise",
    ),
    exercise("plank", "Plank", &[Core], Some(P::Core), Gear::Bodyweight, Isolation, "plank"),
    exercise(
      "treadmill_run",
      "Treadmill Run",
      &[FullBody],
      Some(P::Cardio),
      Gear::CardioMachine,
      Cardio,
      "run",
    ),
    exercise(
      "rowing_machine",
      "Rowing Machine",
      &[FullBody, Back],
      Some(P::Cardio),
      Gear::CardioMachine,
      Cardio,
      "row_erg",
    ),
    exercise(
      "jump_rope",
      "Jump Rope",
      &[Calves, FullBody],
      Some(P::Cardio),
      Gear::None,
      Cardio,
      "jump_rope",
    ),
  ]
}

pub fn fixture_protocols() -> Vec<Protocol> {
  vec![
    protocol("strength_3x5_moderate", &[5, 5, 5], 180, 0.75),
    protocol("strength_5x5_straight", &[5, 5, 5, 5, 5], 180, 0.70),
    protocol("strength_3x8_moderate", &[8, 8, 8], 90, 0.65),
    protocol("strength_3x10_moderate", &[10, 10, 10], 90, 0.60),
    protocol("strength_3x12_light", &[12, 12, 12], 60, 0.55),
    protocol("endurance_2x15_light", &[15, 15], 45, 0.50),
    protocol("cardio_10min_easy", &[1], 0, 0.0),
    protocol("cardio_20min_steady", &[1], 0, 0.0),
    protocol("cardio_intervals_hiit", &[1, 1, 1, 1, 1, 1, 1, 1], 60, 0.0),
  ]
}

pub fn fixture_catalog() -> CatalogSnapshot {
  CatalogSnapshot::new(fixture_exercises(), fixture_protocols())
}

pub fn fixture_one_rep_maxes() -> OneRepMaxTable {
  let mut table = OneRepMaxTable::default();
  table.insert(TEST_USER, "barbell_back_squat", 195.0);
  table.insert(TEST_USER, "conventional_deadlift", 260.0);
  table.insert(TEST_USER, "barbell_bench_press", 195.0);
  table.insert(TEST_USER, "overhead_press", 100.0);
  table.insert(TEST_USER, "barbell_row", 130.0);
  table.insert(TEST_USER, "lat_pulldown", 145.0);
  table.insert(TEST_USER, "dumbbell_lateral_raise", 25.0);
  table
}

/// A gym build intent for a split day
pub fn gym_intent(split: SplitDay, minutes: u32) -> BuildIntent {
  BuildIntent {
    target_duration_minutes: minutes,
    split_target: SplitTarget::Split(split),
    effort_level: EffortLevel::Standard,
    session_type: SessionType::Strength,
    available_equipment: vec![
      Equipment::Barbell,
      Equipment::Dumbbell,
      Equipment::Cable,
      Equipment::Machine,
    ],
    training_location: TrainingLocation::Gym,
    ..Default::default()
  }
}

/// ---------------------------------------------------------------------------
/// Workout Record Factories
/// ---------------------------------------------------------------------------

pub fn test_date() -> NaiveDate {
  NaiveDate::from_ymd_opt(2026, 3, 2).expect("valid date")
}

/// Build a 45 minute push workout for `TEST_USER`, scheduled on `test_date()`
pub fn push_record(
  catalog: &dyn Catalog,
  maxes: &dyn OneRepMaxSource,
  name: Option<&str>,
  requested: &[&str],
) -> WorkoutRecord {
  let config = EngineConfig::default();
  let details = WorkoutDetails {
    user_id: TEST_USER.to_string(),
    name: name.map(str::to_string),
    scheduled_date: test_date(),
  };
  let intent = BuildIntent {
    requested_exercise_ids: requested.iter().map(|id| id.to_string()).collect(),
    ..gym_intent(SplitDay::Push, 45)
  };
  WorkoutBuilder::new(catalog, &config)
    .build(&intent, &details, maxes)
    .expect("Failed to build workout")
    .1
}

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Seed the database with the fixture catalog and one-rep maxes
pub async fn seed_test_catalog(pool: &SqlitePool) {
  for exercise in fixture_exercises() {
    crate::db::upsert_exercise(pool, &exercise)
      .await
      .expect("Failed to seed exercise");
  }
  for protocol in fixture_protocols() {
    crate::db::upsert_protocol(pool, &protocol)
      .await
      .expect("Failed to seed protocol");
  }
  crate::db::save_one_rep_max(pool, TEST_USER, "barbell_bench_press", 195.0)
    .await
    .expect("Failed to seed one-rep max");
}
