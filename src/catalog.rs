//! Read-only access to the exercise and protocol catalog
//!
//! The engine never owns catalog data. Callers hand it something implementing
//! [`Catalog`], normally a [`CatalogSnapshot`] loaded once per request so the data
//! cannot change underneath a single assembly call.

use std::collections::{BTreeMap, HashMap};

use crate::models::{Exercise, ExerciseType, MovementPattern, MuscleGroup, Protocol};

pub trait Catalog {
  fn get_exercise(&self, id: &str) -> Option<&Exercise>;
  fn get_protocol(&self, id: &str) -> Option<&Protocol>;

  /// All exercises in stable id order
  fn exercises(&self) -> Vec<&Exercise>;

  /// All protocols in stable id order
  fn protocols(&self) -> Vec<&Protocol>;

  fn exercises_by_type(&self, exercise_type: ExerciseType) -> Vec<&Exercise> {
    self
      .exercises()
      .into_iter()
      .filter(|e| e.exercise_type == exercise_type)
      .collect()
  }

  fn exercises_by_muscle(&self, muscle: MuscleGroup) -> Vec<&Exercise> {
    self
      .exercises()
      .into_iter()
      .filter(|e| e.muscle_groups.contains(&muscle))
      .collect()
  }

  fn exercises_by_pattern(&self, pattern: MovementPattern) -> Vec<&Exercise> {
    self
      .exercises()
      .into_iter()
      .filter(|e| e.movement_pattern == Some(pattern))
      .collect()
  }
}

/// In-memory catalog keyed by id
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
  exercises: BTreeMap<String, Exercise>,
  protocols: BTreeMap<String, Protocol>,
}

impl CatalogSnapshot {
  pub fn new(
    exercises: impl IntoIterator<Item = Exercise>,
    protocols: impl IntoIterator<Item = Protocol>,
  ) -> Self {
    Self {
      exercises: exercises.into_iter().map(|e| (e.id.clone(), e)).collect(),
      protocols: protocols.into_iter().map(|p| (p.id.clone(), p)).collect(),
    }
  }

  pub fn insert_exercise(&mut self, exercise: Exercise) {
    self.exercises.insert(exercise.id.clone(), exercise);
  }

  pub fn insert_protocol(&mut self, protocol: Protocol) {
    self.protocols.insert(protocol.id.clone(), protocol);
  }

  pub fn exercise_count(&self) -> usize {
    self.exercises.len()
  }

  pub fn protocol_count(&self) -> usize {
    self.protocols.len()
  }
}

impl Catalog for CatalogSnapshot {
  fn get_exercise(&self, id: &str) -> Option<&Exercise> {
    self.exercises.get(id)
  }

  fn get_protocol(&self, id: &str) -> Option<&Protocol> {
    self.protocols.get(id)
  }

  fn exercises(&self) -> Vec<&Exercise> {
    self.exercises.values().collect()
  }

  fn protocols(&self) -> Vec<&Protocol> {
    self.protocols.values().collect()
  }
}

/// ---------------------------------------------------------------------------
/// One-Rep-Max Access
/// ---------------------------------------------------------------------------

pub trait OneRepMaxSource {
  fn one_rep_max(&self, user_id: &str, exercise_id: &str) -> Option<f64>;
}

/// One-rep maxes keyed by (user, exercise)
#[derive(Debug, Clone, Default)]
pub struct OneRepMaxTable {
  entries: HashMap<(String, String), f64>,
}

impl OneRepMaxTable {
  pub fn insert(&mut self, user_id: &str, exercise_id: &str, weight: f64) {
    self
      .entries
      .insert((user_id.to_string(), exercise_id.to_string()), weight);
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

impl OneRepMaxSource for OneRepMaxTable {
  fn one_rep_max(&self, user_id: &str, exercise_id: &str) -> Option<f64> {
    self
      .entries
      .get(&(user_id.to_string(), exercise_id.to_string()))
      .copied()
  }
}

/// Target weight at a given intensity, rounded to the nearest 5 weight units
pub fn target_weight(one_rep_max: f64, intensity: f64) -> f64 {
  ((one_rep_max * intensity) / 5.0).round() * 5.0
}
