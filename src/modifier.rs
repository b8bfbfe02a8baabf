//! Workout modification
//!
//! A modify intent is classified into exactly one plan, highest priority first:
//! structural rebuild, then substitution, then metadata. Classification is pure and
//! deterministic. Before anything is applied the current workout is snapshotted
//! into an immutable history entry.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use tracing::{info, warn};
use uuid::Uuid;

use crate::builder::{materialize_instances, weight_for, BuildIntent, WorkoutBuilder};
use crate::catalog::{Catalog, OneRepMaxSource};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::models::{
  ChangeType, EffortLevel, Equipment, ModificationHistoryEntry, SessionType, SplitTarget,
  Substitution, TrainingLocation, Workout, WorkoutRecord,
};
use crate::resolver::ExerciseResolver;

/// ---------------------------------------------------------------------------
/// Intent
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifyIntent {
  pub workout_id: String,
  pub new_name: Option<String>,
  pub new_scheduled_date: Option<NaiveDate>,
  pub new_effort_level: Option<EffortLevel>,
  pub new_split_target: Option<SplitTarget>,
  pub new_duration_minutes: Option<u32>,
  pub new_session_type: Option<SessionType>,
  pub new_training_location: Option<TrainingLocation>,
  pub new_equipment: Option<Vec<Equipment>>,
  pub substitutions: Vec<SubstitutionRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionRequest {
  pub position: usize,
  pub new_exercise_id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "plan", content = "substitutions", rename_all = "snake_case")]
pub enum ModificationPlan {
  MetadataChange,
  Substitution(Vec<SubstitutionRequest>),
  StructuralRebuild,
}

impl ModificationPlan {
  pub fn change_type(&self) -> ChangeType {
    match self {
      ModificationPlan::MetadataChange => ChangeType::Metadata,
      ModificationPlan::Substitution(_) => ChangeType::Substitution,
      ModificationPlan::StructuralRebuild => ChangeType::Structural,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedSubstitution {
  pub position: usize,
  pub new_exercise_id: String,
  pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifyOutcome {
  pub record: WorkoutRecord,
  pub change_type: ChangeType,
  pub history_entry: ModificationHistoryEntry,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub skipped_substitutions: Vec<SkippedSubstitution>,
}

/// ---------------------------------------------------------------------------
/// Classification
/// ---------------------------------------------------------------------------

fn changed<T: PartialEq>(new: Option<&T>, current: &T) -> Option<T>
where
  T: Clone,
{
  new.filter(|v| *v != current).cloned()
}

fn equipment_changed(new: Option<&Vec<Equipment>>, current: &[Equipment]) -> bool {
  new.is_some_and(|n| {
    let a: BTreeSet<&Equipment> = n.iter().collect();
    let b: BTreeSet<&Equipment> = current.iter().collect();
    a != b
  })
}

pub fn is_structural(workout: &Workout, intent: &ModifyIntent, duration_threshold_minutes: u32) -> bool {
  let duration_jump = intent
    .new_duration_minutes
    .is_some_and(|d| d.abs_diff(workout.target_duration_minutes) > duration_threshold_minutes);

  changed(intent.new_split_target.as_ref(), &workout.split_target).is_some()
    || changed(intent.new_session_type.as_ref(), &workout.session_type).is_some()
    || changed(intent.new_training_location.as_ref(), &workout.training_location).is_some()
    || equipment_changed(intent.new_equipment.as_ref(), &workout.available_equipment)
    || duration_jump
}

pub fn classify_change(workout: &Workout, intent: &ModifyIntent, duration_threshold_minutes: u32) -> ModificationPlan {
  if is_structural(workout, intent, duration_threshold_minutes) {
    ModificationPlan::StructuralRebuild
  } else if !intent.substitutions.is_empty() {
    ModificationPlan::Substitution(intent.substitutions.clone())
  } else {
    ModificationPlan::MetadataChange
  }
}

/// Human-readable list of what the intent changes; empty when nothing does
pub fn describe_changes(workout: &Workout, intent: &ModifyIntent) -> Vec<String> {
  let mut changes = Vec::new();
  if let Some(name) = changed(intent.new_name.as_ref(), &workout.name) {
    changes.push(format!("name: '{}' -> '{}'", workout.name, name));
  }
  if let Some(date) = changed(intent.new_scheduled_date.as_ref(), &workout.scheduled_date) {
    changes.push(format!("date: {} -> {}", workout.scheduled_date, date));
  }
  if let Some(effort) = changed(intent.new_effort_level.as_ref(), &workout.effort_level) {
    changes.push(format!("effort: {} -> {}", workout.effort_level, effort));
  }
  if let Some(minutes) = changed(intent.new_duration_minutes.as_ref(), &workout.target_duration_minutes) {
    changes.push(format!("duration: {} -> {} min", workout.target_duration_minutes, minutes));
  }
  if let Some(target) = changed(intent.new_split_target.as_ref(), &workout.split_target) {
    changes.push(format!("target: {} -> {}", workout.split_target, target));
  }
  if let Some(session) = changed(intent.new_session_type.as_ref(), &workout.session_type) {
    changes.push(format!("session: {} -> {}", workout.session_type, session));
  }
  if let Some(location) = changed(intent.new_training_location.as_ref(), &workout.training_location) {
    changes.push(format!("location: {} -> {}", workout.training_location, location));
  }
  if let Some(equipment) = intent
    .new_equipment
    .as_ref()
    .filter(|_| equipment_changed(intent.new_equipment.as_ref(), &workout.available_equipment))
  {
    let names: Vec<&str> = equipment.iter().map(|e| e.as_str()).collect();
    changes.push(format!("equipment: [{}]", names.join(", ")));
  }
  for sub in &intent.substitutions {
    let current = workout
      .exercise_ids
      .get(sub.position)
      .map(String::as_str)
      .unwrap_or("?");
    changes.push(format!("position {}: {} -> {}", sub.position, current, sub.new_exercise_id));
  }
  changes
}

/// ---------------------------------------------------------------------------
/// Modifier
/// ---------------------------------------------------------------------------

pub struct WorkoutModifier<'a> {
  catalog: &'a dyn Catalog,
  one_rep_maxes: &'a dyn OneRepMaxSource,
  config: &'a EngineConfig,
}

impl<'a> WorkoutModifier<'a> {
  pub fn new(catalog: &'a dyn Catalog, one_rep_maxes: &'a dyn OneRepMaxSource, config: &'a EngineConfig) -> Self {
    Self {
      catalog,
      one_rep_maxes,
      config,
    }
  }

  pub fn modify(&self, record: &WorkoutRecord, intent: &ModifyIntent) -> Result<ModifyOutcome> {
    let current = &record.workout;
    if !intent.workout_id.is_empty() && intent.workout_id != current.id {
      return Err(EngineError::WorkoutNotFound(intent.workout_id.clone()));
    }
    if current.status.is_locked() {
      return Err(EngineError::InvalidModificationState {
        workout_id: current.id.clone(),
        status: current.status,
      });
    }

    let plan = classify_change(current, intent, self.config.structural_duration_threshold_minutes);
    let change_type = plan.change_type();
    let effort_changed = changed(intent.new_effort_level.as_ref(), &current.effort_level).is_some();

    let history_entry = ModificationHistoryEntry {
      id: Uuid::new_v4().to_string(),
      workout_id: current.id.clone(),
      version: current.version,
      change_type,
      diff_description: describe_changes(current, intent).join("; "),
      snapshot: record.clone(),
      recorded_at: Utc::now(),
    };

    let mut updated = record.clone();
    apply_scalars(&mut updated.workout, intent);

    let mut skipped_substitutions = Vec::new();
    match &plan {
      ModificationPlan::MetadataChange => {
        if effort_changed {
          self.recompute_weights(&mut updated);
        }
      }
      ModificationPlan::Substitution(requests) => {
        skipped_substitutions = self.apply_substitutions(&mut updated, requests);
        if effort_changed {
          self.recompute_weights(&mut updated);
        }
      }
      ModificationPlan::StructuralRebuild => self.rebuild(&mut updated)?,
    }
    updated.workout.version = current.version + 1;

    info!(
      workout = %updated.workout.id,
      change = %change_type,
      version = updated.workout.version,
      "Modified workout"
    );

    Ok(ModifyOutcome {
      record: updated,
      change_type,
      history_entry,
      skipped_substitutions,
    })
  }

  fn recompute_weights(&self, record: &mut WorkoutRecord) {
    let workout = &record.workout;
    for instance in &mut record.instances {
      let weight = weight_for(self.one_rep_maxes, &workout.user_id, &instance.exercise_id, workout.effort_level);
      instance.set_target_weight(weight);
    }
  }

  fn apply_substitutions(&self, record: &mut WorkoutRecord, requests: &[SubstitutionRequest]) -> Vec<SkippedSubstitution> {
    let resolver = ExerciseResolver::new(self.catalog);
    let mut skipped = Vec::new();

    for request in requests {
      let skip = |reason: &str| SkippedSubstitution {
        position: request.position,
        new_exercise_id: request.new_exercise_id.clone(),
        reason: reason.to_string(),
      };

      if request.position >= record.workout.exercise_ids.len() {
        warn!(position = request.position, "Substitution position out of range");
        skipped.push(skip("position out of range"));
        continue;
      }
      let Some(exercise_id) = resolver.resolve(&request.new_exercise_id) else {
        warn!(exercise = %request.new_exercise_id, "Substitution exercise not found");
        skipped.push(skip("unknown exercise"));
        continue;
      };

      let original = std::mem::replace(&mut record.workout.exercise_ids[request.position], exercise_id.clone());
      if let Some(instance) = record.instances.iter_mut().find(|i| i.position == request.position) {
        instance.exercise_id = exercise_id;
        instance.substitution = Some(Substitution {
          original_exercise_id: original,
          reason: request.reason.clone(),
        });
      }
    }
    skipped
  }

  /// New content for the same workout id
  fn rebuild(&self, record: &mut WorkoutRecord) -> Result<()> {
    let intent = BuildIntent::from_workout(&record.workout);
    let assembled = WorkoutBuilder::new(self.catalog, self.config).assemble(&intent)?;
    assembled.apply_to(&mut record.workout);
    record.instances = materialize_instances(self.catalog, &record.workout, self.one_rep_maxes)?;
    Ok(())
  }
}

fn apply_scalars(workout: &mut Workout, intent: &ModifyIntent) {
  if let Some(name) = &intent.new_name {
    workout.name = name.clone();
  }
  if let Some(date) = intent.new_scheduled_date {
    workout.scheduled_date = date;
  }
  if let Some(effort) = intent.new_effort_level {
    workout.effort_level = effort;
  }
  if let Some(minutes) = intent.new_duration_minutes {
    workout.target_duration_minutes = minutes;
  }
  if let Some(target) = &intent.new_split_target {
    workout.split_target = target.clone();
  }
  if let Some(session) = intent.new_session_type {
    workout.session_type = session;
  }
  if let Some(location) = intent.new_training_location {
    workout.training_location = location;
  }
  if let Some(equipment) = &intent.new_equipment {
    workout.available_equipment = equipment.clone();
  }
}
