//! Workout assembly
//!
//! Runs selection, duration convergence and superset pairing for a build intent,
//! then materializes the result into a persistable [`WorkoutRecord`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tracing::info;
use uuid::Uuid;

use crate::assigner::ProtocolAssigner;
use crate::catalog::{target_weight, Catalog, OneRepMaxSource};
use crate::config::EngineConfig;
use crate::convergence::{converge, ConvergenceOutcome};
use crate::error::{EngineError, Result};
use crate::models::{
  EffortLevel, Equipment, ExerciseInstance, SessionType, SetCompletion, SplitTarget,
  SupersetGroup, SupersetStyle, TrainingLocation, Workout, WorkoutRecord, WorkoutSet,
  WorkoutStatus,
};
use crate::selector::{select, EquipmentConstraint, SelectionRequest};
use crate::superset::{pair, ExplicitGroup};
use crate::tables::DEFAULT_PROTOCOL;

/// ---------------------------------------------------------------------------
/// Intent and Output
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildIntent {
  pub target_duration_minutes: u32,
  pub split_target: SplitTarget,
  pub effort_level: EffortLevel,
  pub session_type: SessionType,
  pub available_equipment: Vec<Equipment>,
  pub training_location: TrainingLocation,
  /// Ids from an assistant, possibly fuzzy
  pub requested_exercise_ids: Vec<String>,
  pub protocol_override: Option<String>,
  pub exercise_count_override: Option<usize>,
  pub superset_style: SupersetStyle,
  pub explicit_superset_groups: Vec<ExplicitGroup>,
}

impl BuildIntent {
  /// Intent that regenerates a workout's content from its stored parameters.
  /// Explicit groups refer to old positions and are not carried over.
  pub fn from_workout(workout: &Workout) -> Self {
    let superset_style = match workout.superset_style {
      SupersetStyle::Explicit => SupersetStyle::None,
      style => style,
    };
    Self {
      target_duration_minutes: workout.target_duration_minutes,
      split_target: workout.split_target.clone(),
      effort_level: workout.effort_level,
      session_type: workout.session_type,
      available_equipment: workout.available_equipment.clone(),
      training_location: workout.training_location,
      superset_style,
      ..Default::default()
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledWorkout {
  pub exercise_ids: Vec<String>,
  #[serde(rename = "position_to_protocol_id")]
  pub protocols: BTreeMap<usize, String>,
  pub superset_style: SupersetStyle,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub superset_groups: Option<Vec<SupersetGroup>>,
  pub actual_duration_minutes: f64,
  pub target_duration_minutes: u32,
  /// Caller-supplied exercises that made the cut
  pub ai_supplied_count: usize,
  /// Exercises added from the catalog
  pub supplemented_count: usize,
  pub iterations_used: u32,
  pub convergence: ConvergenceOutcome,
}

impl AssembledWorkout {
  /// Replace a workout's content with this assembly
  pub fn apply_to(&self, workout: &mut Workout) {
    workout.exercise_ids = self.exercise_ids.clone();
    workout.protocol_variant_ids = self.protocols.clone();
    workout.superset_style = self.superset_style;
    workout.superset_groups = self.superset_groups.clone();
    workout.protocol_customizations.clear();
  }
}

/// Who and when, for a freshly built workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDetails {
  pub user_id: String,
  pub name: Option<String>,
  pub scheduled_date: NaiveDate,
}

/// ---------------------------------------------------------------------------
/// Builder
/// ---------------------------------------------------------------------------

pub struct WorkoutBuilder<'a> {
  catalog: &'a dyn Catalog,
  config: &'a EngineConfig,
}

impl<'a> WorkoutBuilder<'a> {
  pub fn new(catalog: &'a dyn Catalog, config: &'a EngineConfig) -> Self {
    Self { catalog, config }
  }

  pub fn assemble(&self, intent: &BuildIntent) -> Result<AssembledWorkout> {
    if intent.exercise_count_override == Some(0) {
      return Err(EngineError::Config(
        "exercise count override must be at least 1".to_string(),
      ));
    }

    let equipment = EquipmentConstraint::for_location(intent.training_location, &intent.available_equipment);
    let pool = select(
      self.catalog,
      &SelectionRequest {
        target: &intent.split_target,
        session_type: intent.session_type,
        equipment: &equipment,
        requested_ids: &intent.requested_exercise_ids,
      },
    );
    if pool.is_empty() {
      return Err(EngineError::NoCandidates {
        target: intent.split_target.to_string(),
      });
    }

    let assigner = ProtocolAssigner::new(
      self.catalog,
      intent.effort_level,
      intent.protocol_override.as_deref(),
      &self.config.convergence,
    );
    let converged = converge(
      intent.target_duration_minutes,
      &pool.exercises,
      &assigner,
      equipment.primary(),
      intent.exercise_count_override,
      &self.config.convergence,
    );

    let ai_supplied_count = converged.selected.len().min(pool.requested_count);
    let pairing = pair(
      &converged.selected,
      intent.superset_style,
      &intent.explicit_superset_groups,
      &self.config.pairing,
    );
    let exercise_ids: Vec<String> = pairing
      .reorder(&converged.selected)
      .into_iter()
      .map(|e| e.id)
      .collect();
    let superset_style = if pairing.groups.is_some() {
      intent.superset_style
    } else {
      SupersetStyle::None
    };

    info!(
      target = %intent.split_target,
      exercises = exercise_ids.len(),
      minutes = converged.actual_minutes,
      iterations = converged.iterations_used,
      "Assembled workout"
    );

    Ok(AssembledWorkout {
      supplemented_count: exercise_ids.len() - ai_supplied_count,
      protocols: pairing.remap(&converged.assignment.protocols),
      superset_groups: pairing.groups,
      superset_style,
      exercise_ids,
      actual_duration_minutes: converged.actual_minutes,
      target_duration_minutes: intent.target_duration_minutes,
      ai_supplied_count,
      iterations_used: converged.iterations_used,
      convergence: converged.outcome,
    })
  }

  /// Assemble and materialize a new scheduled workout
  pub fn build(
    &self,
    intent: &BuildIntent,
    details: &WorkoutDetails,
    one_rep_maxes: &dyn OneRepMaxSource,
  ) -> Result<(AssembledWorkout, WorkoutRecord)> {
    let assembled = self.assemble(intent)?;

    let mut workout = Workout {
      id: Uuid::new_v4().to_string(),
      user_id: details.user_id.clone(),
      name: details
        .name
        .clone()
        .unwrap_or_else(|| default_name(&intent.split_target, intent.session_type)),
      scheduled_date: details.scheduled_date,
      session_type: intent.session_type,
      split_target: intent.split_target.clone(),
      status: WorkoutStatus::Scheduled,
      exercise_ids: Vec::new(),
      protocol_variant_ids: BTreeMap::new(),
      superset_style: SupersetStyle::None,
      superset_groups: None,
      protocol_customizations: BTreeMap::new(),
      effort_level: intent.effort_level,
      target_duration_minutes: intent.target_duration_minutes,
      training_location: intent.training_location,
      available_equipment: intent.available_equipment.clone(),
      version: 1,
    };
    assembled.apply_to(&mut workout);

    let instances = materialize_instances(self.catalog, &workout, one_rep_maxes)?;
    Ok((assembled, WorkoutRecord { workout, instances }))
  }
}

pub fn default_name(target: &SplitTarget, session_type: SessionType) -> String {
  let label = match target {
    SplitTarget::Split(day) => day.as_str().replace('_', " "),
    SplitTarget::Patterns(patterns) => patterns
      .iter()
      .map(|p| p.as_str().replace('_', " "))
      .collect::<Vec<_>>()
      .join(" + "),
  };
  format!("{} {}", label, session_type)
}

/// ---------------------------------------------------------------------------
/// Materialization
/// ---------------------------------------------------------------------------

/// 1RM at the effort's intensity, rounded to the nearest 5
pub fn weight_for(
  one_rep_maxes: &dyn OneRepMaxSource,
  user_id: &str,
  exercise_id: &str,
  effort: EffortLevel,
) -> Option<f64> {
  one_rep_maxes
    .one_rep_max(user_id, exercise_id)
    .map(|max| target_weight(max, effort.intensity()))
}

/// Fresh instances and sets for every position of the workout
pub fn materialize_instances(
  catalog: &dyn Catalog,
  workout: &Workout,
  one_rep_maxes: &dyn OneRepMaxSource,
) -> Result<Vec<ExerciseInstance>> {
  workout
    .exercise_ids
    .iter()
    .enumerate()
    .map(|(position, exercise_id)| {
      if catalog.get_exercise(exercise_id).is_none() {
        return Err(EngineError::exercise_not_found(exercise_id));
      }
      let protocol_id = workout
        .protocol_variant_ids
        .get(&position)
        .map(String::as_str)
        .unwrap_or(DEFAULT_PROTOCOL);
      let protocol = catalog
        .get_protocol(protocol_id)
        .ok_or_else(|| EngineError::protocol_not_found(protocol_id))?;

      let weight = weight_for(one_rep_maxes, &workout.user_id, exercise_id, workout.effort_level);
      let mut instance = ExerciseInstance {
        id: Uuid::new_v4().to_string(),
        workout_id: workout.id.clone(),
        exercise_id: exercise_id.clone(),
        protocol_id: protocol.id.clone(),
        position,
        target_weight: weight,
        substitution: None,
        sets: protocol
          .reps
          .iter()
          .enumerate()
          .map(|(i, reps)| WorkoutSet {
            set_number: i as u32 + 1,
            target_reps: *reps,
            target_weight: weight,
            completion: SetCompletion::Scheduled,
          })
          .collect(),
      };

      if let Some(customization) = workout.protocol_customizations.get(&position) {
        if customization.set_count_adjustment != 0 {
          instance.adjust_set_count(customization.set_count_adjustment);
        }
      }
      Ok(instance)
    })
    .collect()
}
