use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::catalog::{EffortLevel, Equipment, SessionType, SplitTarget, TrainingLocation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutStatus {
  #[default]
  Scheduled,
  InProgress,
  Completed,
  Skipped,
}

string_enum!(WorkoutStatus {
  Scheduled => "scheduled",
  InProgress => "in_progress",
  Completed => "completed",
  Skipped => "skipped",
});

impl WorkoutStatus {
  /// Workouts that have started or finished are frozen
  pub fn is_locked(&self) -> bool {
    matches!(self, WorkoutStatus::InProgress | WorkoutStatus::Completed)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SupersetStyle {
  #[default]
  None,
  Explicit,
  Circuit,
  Antagonist,
  Agonist,
  CompoundIsolation,
}

string_enum!(SupersetStyle {
  None => "none",
  Explicit => "explicit",
  Circuit => "circuit",
  Antagonist => "antagonist",
  Agonist => "agonist",
  CompoundIsolation => "compound_isolation",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SetCompletion {
  #[default]
  Scheduled,
  Completed,
  Skipped,
}

string_enum!(SetCompletion {
  Scheduled => "scheduled",
  Completed => "completed",
  Skipped => "skipped",
});

/// Exercises performed back-to-back. `rest_seconds[i]` is the rest after `positions[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupersetGroup {
  pub group_number: usize,
  pub positions: Vec<usize>,
  pub rest_seconds: Vec<u32>,
}

impl SupersetGroup {
  /// All but the last position rest `between`, the last rests `after`
  pub fn new(group_number: usize, positions: Vec<usize>, between: u32, after: u32) -> Self {
    let rest_seconds = (0..positions.len())
      .map(|i| if i + 1 == positions.len() { after } else { between })
      .collect();
    Self {
      group_number,
      positions,
      rest_seconds,
    }
  }
}

/// Per-position adjustments layered over the assigned protocol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtocolCustomization {
  #[serde(default)]
  pub set_count_adjustment: i32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rest_seconds_override: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rpe_override: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
  pub id: String,
  pub user_id: String,
  pub name: String,
  pub scheduled_date: NaiveDate,
  pub session_type: SessionType,
  pub split_target: SplitTarget,
  pub status: WorkoutStatus,
  pub exercise_ids: Vec<String>,
  /// Position in `exercise_ids` -> protocol id
  pub protocol_variant_ids: BTreeMap<usize, String>,
  #[serde(default)]
  pub superset_style: SupersetStyle,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub superset_groups: Option<Vec<SupersetGroup>>,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub protocol_customizations: BTreeMap<usize, ProtocolCustomization>,
  pub effort_level: EffortLevel,
  pub target_duration_minutes: u32,
  #[serde(default)]
  pub training_location: TrainingLocation,
  #[serde(default)]
  pub available_equipment: Vec<Equipment>,
  pub version: u32,
}

impl Workout {
  /// Every exercise has exactly one protocol assigned
  pub fn is_fully_assigned(&self) -> bool {
    self.exercise_ids.len() == self.protocol_variant_ids.len()
      && (0..self.exercise_ids.len()).all(|i| self.protocol_variant_ids.contains_key(&i))
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
  pub set_number: u32,
  pub target_reps: u32,
  pub target_weight: Option<f64>,
  #[serde(default)]
  pub completion: SetCompletion,
}

/// Provenance of an exercise swapped in after assembly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substitution {
  pub original_exercise_id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseInstance {
  pub id: String,
  pub workout_id: String,
  pub exercise_id: String,
  pub protocol_id: String,
  pub position: usize,
  pub target_weight: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub substitution: Option<Substitution>,
  pub sets: Vec<WorkoutSet>,
}

impl ExerciseInstance {
  /// Grow or shrink the planned sets, never dropping below one.
  /// New sets copy the last set's reps and weight.
  pub fn adjust_set_count(&mut self, delta: i32) {
    let current = self.sets.len() as i64;
    let target = (current + delta as i64).max(1) as usize;

    if target < self.sets.len() {
      self.sets.truncate(target);
      return;
    }

    let template = self.sets.last().cloned().unwrap_or(WorkoutSet {
      set_number: 0,
      target_reps: 1,
      target_weight: self.target_weight,
      completion: SetCompletion::Scheduled,
    });
    while self.sets.len() < target {
      self.sets.push(WorkoutSet {
        set_number: self.sets.len() as u32 + 1,
        target_reps: template.target_reps,
        target_weight: template.target_weight,
        completion: SetCompletion::Scheduled,
      });
    }
  }

  /// Apply a new target weight to the instance and all of its sets
  pub fn set_target_weight(&mut self, weight: Option<f64>) {
    self.target_weight = weight;
    for set in &mut self.sets {
      set.target_weight = weight;
    }
  }
}

/// A workout together with its exercise instances, the unit of persistence and history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
  pub workout: Workout,
  pub instances: Vec<ExerciseInstance>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn make_instance(set_count: u32) -> ExerciseInstance {
    ExerciseInstance {
      id: "i1".to_string(),
      workout_id: "w1".to_string(),
      exercise_id: "barbell_bench_press".to_string(),
      protocol_id: "strength_3x8_moderate".to_string(),
      position: 0,
      target_weight: Some(135.0),
      substitution: None,
      sets: (1..=set_count)
        .map(|n| WorkoutSet {
          set_number: n,
          target_reps: 8,
          target_weight: Some(135.0),
          completion: SetCompletion::Scheduled,
        })
        .collect(),
    }
  }

  #[test]
  fn test_superset_group_rest_layout() {
    let group = SupersetGroup::new(1, vec![0, 1, 2], 30, 90);
    assert_eq!(group.rest_seconds, vec![30, 30, 90]);
  }

  #[test]
  fn test_adjust_set_count_grows_from_last_set() {
    let mut instance = make_instance(3);
    instance.adjust_set_count(2);
    assert_eq!(instance.sets.len(), 5);
    assert_eq!(instance.sets[4].set_number, 5);
    assert_eq!(instance.sets[4].target_reps, 8);
  }

  #[test]
  fn test_adjust_set_count_never_below_one() {
    let mut instance = make_instance(3);
    instance.adjust_set_count(-10);
    assert_eq!(instance.sets.len(), 1);
    assert_eq!(instance.sets[0].set_number, 1);
  }

  #[test]
  fn test_set_target_weight_updates_sets() {
    let mut instance = make_instance(2);
    instance.set_target_weight(Some(155.0));
    assert!(instance.sets.iter().all(|s| s.target_weight == Some(155.0)));
  }

  #[test]
  fn test_locked_statuses() {
    assert!(WorkoutStatus::InProgress.is_locked());
    assert!(WorkoutStatus::Completed.is_locked());
    assert!(!WorkoutStatus::Scheduled.is_locked());
    assert!(!WorkoutStatus::Skipped.is_locked());
  }
}
