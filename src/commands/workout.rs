//! Commands for building and modifying stored workouts

use serde::Serialize;

use tracing::info;

use super::AppState;
use crate::builder::{AssembledWorkout, BuildIntent, WorkoutBuilder, WorkoutDetails};
use crate::db::{load_catalog, load_one_rep_maxes, load_workout_record, persist_modification, save_workout_record};
use crate::error::Result;
use crate::models::{ChangeType, WorkoutRecord};
use crate::modifier::{ModifyIntent, SkippedSubstitution, WorkoutModifier};

#[derive(Debug, Serialize)]
pub struct BuildResponse {
  pub assembled: AssembledWorkout,
  pub record: WorkoutRecord,
  pub saved: bool,
}

#[derive(Debug, Serialize)]
pub struct ModifyResponse {
  pub updated_workout: WorkoutRecord,
  pub change_type: ChangeType,
  pub history_entry_id: String,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub skipped_substitutions: Vec<SkippedSubstitution>,
}

/// Assemble a workout against the stored catalog, optionally saving it
pub async fn build_workout(
  state: &AppState,
  intent: &BuildIntent,
  details: &WorkoutDetails,
  save: bool,
) -> Result<BuildResponse> {
  let catalog = load_catalog(&state.db).await?;
  let maxes = load_one_rep_maxes(&state.db, &details.user_id).await?;

  let (assembled, record) = WorkoutBuilder::new(&catalog, &state.config).build(intent, details, &maxes)?;
  if save {
    save_workout_record(&state.db, &record).await?;
    info!(workout = %record.workout.id, "Saved new workout");
  }

  Ok(BuildResponse {
    assembled,
    record,
    saved: save,
  })
}

/// Apply a modify intent to a stored workout and persist the result
pub async fn modify_workout(state: &AppState, intent: &ModifyIntent) -> Result<ModifyResponse> {
  let record = load_workout_record(&state.db, &intent.workout_id).await?;
  let catalog = load_catalog(&state.db).await?;
  let maxes = load_one_rep_maxes(&state.db, &record.workout.user_id).await?;

  let outcome = WorkoutModifier::new(&catalog, &maxes, &state.config).modify(&record, intent)?;
  persist_modification(&state.db, &outcome).await?;

  Ok(ModifyResponse {
    history_entry_id: outcome.history_entry.id,
    change_type: outcome.change_type,
    updated_workout: outcome.record,
    skipped_substitutions: outcome.skipped_substitutions,
  })
}
