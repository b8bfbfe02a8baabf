//! Exercise selection
//!
//! Turns a split or movement-pattern target plus equipment constraints into an
//! ordered candidate pool. Caller-supplied ids come first; the catalog fills in the
//! rest by round-robin over muscle (or pattern) groups so one body part is not
//! exhausted before the next gets a turn. No two pool entries share a base exercise.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::catalog::Catalog;
use crate::models::{
  Equipment, Exercise, ExerciseType, MovementPattern, MuscleGroup, SessionType, SplitTarget,
  TrainingLocation,
};
use crate::resolver::ExerciseResolver;

/// ---------------------------------------------------------------------------
/// Equipment Constraint
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentConstraint {
  /// Ordered; the first entry is the primary equipment
  pub available: Vec<Equipment>,
  pub force_bodyweight_only: bool,
}

impl EquipmentConstraint {
  /// Training away from the gym with nothing configured means bodyweight only.
  /// An empty list at the gym means everything is available.
  pub fn for_location(location: TrainingLocation, available: &[Equipment]) -> Self {
    Self {
      available: available.to_vec(),
      force_bodyweight_only: location != TrainingLocation::Gym && available.is_empty(),
    }
  }

  pub fn allows(&self, equipment: Equipment) -> bool {
    if equipment.is_bodyweight() {
      return true;
    }
    if self.force_bodyweight_only {
      return false;
    }
    self.available.is_empty() || self.available.contains(&equipment)
  }

  pub fn primary(&self) -> Option<Equipment> {
    if self.force_bodyweight_only {
      Some(Equipment::Bodyweight)
    } else {
      self.available.first().copied()
    }
  }
}

/// ---------------------------------------------------------------------------
/// Candidate Pool
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
  pub exercises: Vec<Exercise>,
  /// The first `requested_count` entries came from the caller
  pub requested_count: usize,
}

impl CandidatePool {
  pub fn len(&self) -> usize {
    self.exercises.len()
  }

  pub fn is_empty(&self) -> bool {
    self.exercises.is_empty()
  }

  pub fn prefix(&self, count: usize) -> &[Exercise] {
    &self.exercises[..count.min(self.exercises.len())]
  }
}

pub struct SelectionRequest<'a> {
  pub target: &'a SplitTarget,
  pub session_type: SessionType,
  pub equipment: &'a EquipmentConstraint,
  pub requested_ids: &'a [String],
}

/// Grouping key used for round-robin supplementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum GroupKey {
  Muscle(MuscleGroup),
  Pattern(MovementPattern),
  Ungrouped,
}

/// ---------------------------------------------------------------------------
/// Selection
/// ---------------------------------------------------------------------------

pub fn is_eligible(exercise: &Exercise, request: &SelectionRequest<'_>) -> bool {
  let type_ok = match request.session_type {
    SessionType::Cardio => exercise.exercise_type == ExerciseType::Cardio,
    SessionType::Strength => exercise.exercise_type != ExerciseType::Cardio,
  };
  if !type_ok || !request.equipment.allows(exercise.equipment) {
    return false;
  }

  match request.target {
    // Pattern mode is the sole filter, with no muscle fallback
    SplitTarget::Patterns(patterns) => exercise
      .movement_pattern
      .is_some_and(|p| patterns.contains(&p)),
    // Cardio sessions are not tied to a split's muscles
    SplitTarget::Split(_) if request.session_type == SessionType::Cardio => true,
    SplitTarget::Split(day) => exercise
      .muscle_groups
      .iter()
      .any(|m| day.muscles().contains(m)),
  }
}

pub fn select(catalog: &dyn Catalog, request: &SelectionRequest<'_>) -> CandidatePool {
  let mut pool: Vec<Exercise> = Vec::new();
  let mut claimed_bases: HashSet<String> = HashSet::new();

  // Caller-supplied ids claim their base exercises first
  if !request.requested_ids.is_empty() {
    let resolver = ExerciseResolver::new(catalog);
    for id in resolver.resolve_all(request.requested_ids) {
      let Some(exercise) = catalog.get_exercise(&id) else {
        continue;
      };
      if !is_eligible(exercise, request) {
        debug!(exercise = %id, target = %request.target, "Requested exercise filtered out");
        continue;
      }
      if !claimed_bases.insert(exercise.base_exercise.clone()) {
        debug!(exercise = %id, base = %exercise.base_exercise, "Requested exercise duplicates a base lift");
        continue;
      }
      pool.push(exercise.clone());
    }
  }
  let requested_count = pool.len();

  // Group the remaining eligible catalog exercises
  let mut groups: BTreeMap<(usize, GroupKey), Vec<&Exercise>> = BTreeMap::new();
  for exercise in catalog.exercises() {
    if claimed_bases.contains(&exercise.base_exercise) || !is_eligible(exercise, request) {
      continue;
    }
    let key = group_key(exercise, request.target);
    groups
      .entry((group_rank(key, request.target), key))
      .or_default()
      .push(exercise);
  }
  for members in groups.values_mut() {
    members.sort_by(|a, b| {
      b.is_compound()
        .cmp(&a.is_compound())
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
    });
  }

  // Round-robin across groups, one exercise per group per pass
  let columns: Vec<Vec<&Exercise>> = groups.into_values().collect();
  let depth = columns.iter().map(Vec::len).max().unwrap_or(0);
  for round in 0..depth {
    for column in &columns {
      if let Some(exercise) = column.get(round) {
        if claimed_bases.insert(exercise.base_exercise.clone()) {
          pool.push((*exercise).clone());
        }
      }
    }
  }

  debug!(
    target = %request.target,
    requested = requested_count,
    total = pool.len(),
    "Built candidate pool"
  );

  CandidatePool {
    exercises: pool,
    requested_count,
  }
}

fn group_key(exercise: &Exercise, target: &SplitTarget) -> GroupKey {
  match target {
    SplitTarget::Patterns(_) => exercise
      .movement_pattern
      .map(GroupKey::Pattern)
      .unwrap_or(GroupKey::Ungrouped),
    SplitTarget::Split(_) => exercise
      .primary_muscle()
      .map(GroupKey::Muscle)
      .unwrap_or(GroupKey::Ungrouped),
  }
}

/// Groups the target names explicitly come first, in the target's own order
fn group_rank(key: GroupKey, target: &SplitTarget) -> usize {
  let position = match (key, target) {
    (GroupKey::Pattern(p), SplitTarget::Patterns(patterns)) => patterns.iter().position(|x| *x == p),
    (GroupKey::Muscle(m), SplitTarget::Split(day)) => day.muscles().iter().position(|x| *x == m),
    _ => None,
  };
  position.unwrap_or(usize::MAX)
}
