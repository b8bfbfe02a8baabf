use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use tracing::{debug, warn};

use crate::config::PairingConfig;
use crate::models::{Exercise, ExerciseType, SupersetGroup, SupersetStyle};
use crate::tables::{
  muscle_opposition, patterns_oppose, AGONIST_BASE, AGONIST_EQUIPMENT_BONUS,
  AGONIST_MIXED_TYPE_BONUS, COMPOUND_ISOLATION_BASE, COMPOUND_ISOLATION_EQUIPMENT_BONUS,
  COMPOUND_ISOLATION_OTHER_MUSCLE, COMPOUND_ISOLATION_SAME_MUSCLE,
};

/// Caller-defined group, in pre-reorder positions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplicitGroup {
  pub positions: Vec<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rest_between_seconds: Option<u32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rest_after_seconds: Option<u32>,
}

/// Rest between and after a group's exercises, per style
pub fn default_rest(style: SupersetStyle) -> (u32, u32) {
  match style {
    SupersetStyle::Agonist | SupersetStyle::Circuit => (15, 120),
    _ => (30, 90),
  }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairingResult {
  /// Groups in post-reorder positions
  pub groups: Option<Vec<SupersetGroup>>,
  /// `order[new_position] == old_position`
  pub order: Vec<usize>,
}

impl PairingResult {
  fn unpaired(len: usize) -> Self {
    Self {
      groups: None,
      order: (0..len).collect(),
    }
  }

  pub fn reorder<T: Clone>(&self, items: &[T]) -> Vec<T> {
    self.order.iter().map(|&old| items[old].clone()).collect()
  }

  /// Re-key a position map to post-reorder positions
  pub fn remap<V: Clone>(&self, by_position: &BTreeMap<usize, V>) -> BTreeMap<usize, V> {
    self
      .order
      .iter()
      .enumerate()
      .filter_map(|(new, old)| by_position.get(old).map(|v| (new, v.clone())))
      .collect()
  }
}

/// ---------------------------------------------------------------------------
/// Pair Scoring
/// ---------------------------------------------------------------------------

pub fn antagonist_score(a: &Exercise, b: &Exercise, config: &PairingConfig) -> Option<f64> {
  if a.base_exercise == b.base_exercise {
    return None;
  }
  let pattern = match (a.movement_pattern, b.movement_pattern) {
    (Some(x), Some(y)) if patterns_oppose(x, y) => 1.0,
    _ => 0.0,
  };
  let muscle = match (a.primary_muscle(), b.primary_muscle()) {
    (Some(x), Some(y)) => muscle_opposition(x, y),
    _ => 0.0,
  };
  let equipment = if a.equipment == b.equipment { 1.0 } else { 0.0 };

  let score = config.pattern_weight * pattern + config.muscle_weight * muscle + config.equipment_weight * equipment;
  (score >= config.score_floor).then_some(score)
}

pub fn agonist_score(a: &Exercise, b: &Exercise) -> Option<f64> {
  let involves_isolation =
    a.exercise_type == ExerciseType::Isolation || b.exercise_type == ExerciseType::Isolation;
  let same_muscle = matches!((a.primary_muscle(), b.primary_muscle()), (Some(x), Some(y)) if x == y);
  if a.base_exercise == b.base_exercise || !involves_isolation || !same_muscle {
    return None;
  }
  let mut score = AGONIST_BASE;
  if a.exercise_type != b.exercise_type {
    score += AGONIST_MIXED_TYPE_BONUS;
  }
  if a.equipment == b.equipment {
    score += AGONIST_EQUIPMENT_BONUS;
  }
  Some(score)
}

pub fn compound_isolation_score(a: &Exercise, b: &Exercise) -> Option<f64> {
  let mixed = matches!(
    (a.exercise_type, b.exercise_type),
    (ExerciseType::Compound, ExerciseType::Isolation) | (ExerciseType::Isolation, ExerciseType::Compound)
  );
  if !mixed || a.base_exercise == b.base_exercise {
    return None;
  }
  let same_muscle = matches!((a.primary_muscle(), b.primary_muscle()), (Some(x), Some(y)) if x == y);
  let mut score = COMPOUND_ISOLATION_BASE;
  score += if same_muscle {
    COMPOUND_ISOLATION_SAME_MUSCLE
  } else {
    COMPOUND_ISOLATION_OTHER_MUSCLE
  };
  if a.equipment == b.equipment {
    score += COMPOUND_ISOLATION_EQUIPMENT_BONUS;
  }
  Some(score)
}

fn score_pair(style: SupersetStyle, a: &Exercise, b: &Exercise, config: &PairingConfig) -> Option<f64> {
  match style {
    SupersetStyle::Antagonist => antagonist_score(a, b, config),
    SupersetStyle::Agonist => agonist_score(a, b),
    SupersetStyle::CompoundIsolation => compound_isolation_score(a, b),
    _ => None,
  }
}

/// ---------------------------------------------------------------------------
/// Grouping
/// ---------------------------------------------------------------------------

pub fn pair(
  exercises: &[Exercise],
  style: SupersetStyle,
  explicit_groups: &[ExplicitGroup],
  config: &PairingConfig,
) -> PairingResult {
  let len = exercises.len();
  let (between, after) = default_rest(style);

  // (positions, between, after) in pre-reorder positions
  let groups: Vec<(Vec<usize>, u32, u32)> = match style {
    SupersetStyle::None => Vec::new(),
    SupersetStyle::Explicit => validate_explicit(explicit_groups, len),
    SupersetStyle::Circuit if len >= 2 => vec![((0..len).collect(), between, after)],
    SupersetStyle::Circuit => Vec::new(),
    _ if len < config.min_exercises => {
      debug!(style = %style, exercises = len, "Too few exercises for automatic supersets");
      Vec::new()
    }
    _ => greedy_pairs(exercises, style, config)
      .into_iter()
      .map(|positions| (positions, between, after))
      .collect(),
  };

  if groups.is_empty() {
    return PairingResult::unpaired(len);
  }
  build_result(groups, len)
}

fn validate_explicit(requested: &[ExplicitGroup], len: usize) -> Vec<(Vec<usize>, u32, u32)> {
  let (default_between, default_after) = default_rest(SupersetStyle::Explicit);
  let mut used: HashSet<usize> = HashSet::new();
  let mut groups = Vec::new();

  for group in requested {
    let mut positions = Vec::new();
    for &position in &group.positions {
      if position >= len {
        warn!(position, exercises = len, "Superset position out of range");
      } else if !used.insert(position) {
        warn!(position, "Superset position already grouped");
      } else {
        positions.push(position);
      }
    }

    if positions.len() >= 2 {
      groups.push((
        positions,
        group.rest_between_seconds.unwrap_or(default_between),
        group.rest_after_seconds.unwrap_or(default_after),
      ));
    } else {
      // Release the lone position for later groups
      for position in positions {
        used.remove(&position);
      }
      warn!(positions = ?group.positions, "Dropping superset group with fewer than two valid positions");
    }
  }
  groups
}

/// Highest-scoring pairs first, no position reused, capped at `max_groups`
fn greedy_pairs(exercises: &[Exercise], style: SupersetStyle, config: &PairingConfig) -> Vec<Vec<usize>> {
  let mut candidates: Vec<(f64, usize, usize)> = Vec::new();
  for i in 0..exercises.len() {
    for j in (i + 1)..exercises.len() {
      if let Some(score) = score_pair(style, &exercises[i], &exercises[j], config) {
        candidates.push((score, i, j));
      }
    }
  }
  candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| (a.1, a.2).cmp(&(b.1, b.2))));

  let mut used: HashSet<usize> = HashSet::new();
  let mut pairs = Vec::new();
  for (score, i, j) in candidates {
    if pairs.len() >= config.max_groups {
      break;
    }
    if used.contains(&i) || used.contains(&j) {
      continue;
    }
    used.insert(i);
    used.insert(j);
    debug!(style = %style, first = %exercises[i].id, second = %exercises[j].id, score, "Paired exercises");

    // The compound leads a compound/isolation pair
    let lead_isolation = style == SupersetStyle::CompoundIsolation
      && exercises[i].exercise_type == ExerciseType::Isolation;
    pairs.push(if lead_isolation { vec![j, i] } else { vec![i, j] });
  }
  pairs
}

/// Lay groups out contiguously, followed by unpaired exercises in their original order
fn build_result(groups: Vec<(Vec<usize>, u32, u32)>, len: usize) -> PairingResult {
  let grouped: HashSet<usize> = groups.iter().flat_map(|(p, _, _)| p.iter().copied()).collect();
  let mut order: Vec<usize> = Vec::with_capacity(len);
  let mut superset_groups = Vec::with_capacity(groups.len());

  for (index, (positions, between, after)) in groups.into_iter().enumerate() {
    let start = order.len();
    order.extend(&positions);
    let new_positions = (start..order.len()).collect();
    superset_groups.push(SupersetGroup::new(index + 1, new_positions, between, after));
  }
  order.extend((0..len).filter(|p| !grouped.contains(p)));

  PairingResult {
    groups: Some(superset_groups),
    order,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::{Catalog, CatalogSnapshot};
  use crate::models::{Equipment, MuscleGroup};
  use crate::test_utils::{exercise, fixture_catalog};
  use proptest::prelude::*;

  fn pick(catalog: &CatalogSnapshot, ids: &[&str]) -> Vec<Exercise> {
    ids
      .iter()
      .filter_map(|id| catalog.get_exercise(id).cloned())
      .collect()
  }

  fn ids(exercises: &[Exercise]) -> Vec<&str> {
    exercises.iter().map(|e| e.id.as_str()).collect()
  }

  #[test]
  fn test_antagonist_pairs_push_with_pull() {
    let catalog = fixture_catalog();
    let exercises = pick(
      &catalog,
      &["barbell_bench_press", "overhead_press", "barbell_row", "lat_pulldown"],
    );
    let config = PairingConfig::default();
    let result = pair(&exercises, SupersetStyle::Antagonist, &[], &config);

    let groups = result.groups.clone().unwrap_or_default();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].positions, vec![0, 1]);
    assert_eq!(groups[1].positions, vec![2, 3]);
    assert_eq!(groups[0].rest_seconds, vec![30, 90]);
    assert_eq!(
      ids(&result.reorder(&exercises)),
      vec!["barbell_bench_press", "barbell_row", "overhead_press", "lat_pulldown"]
    );
  }

  #[test]
  fn test_antagonist_scores() {
    let catalog = fixture_catalog();
    let config = PairingConfig::default();
    let get = |id: &str| catalog.get_exercise(id).cloned().unwrap();

    let bench_row = antagonist_score(&get("barbell_bench_press"), &get("barbell_row"), &config).unwrap();
    assert!((bench_row - 1.0).abs() < 1e-9);
    let ohp_pulldown = antagonist_score(&get("overhead_press"), &get("lat_pulldown"), &config).unwrap();
    assert!((ohp_pulldown - 0.85).abs() < 1e-9);
    // 0.245 + 0.15 sits just under the floor
    assert_eq!(antagonist_score(&get("overhead_press"), &get("barbell_row"), &config), None);
    // Same base lift never pairs
    assert_eq!(
      antagonist_score(&get("barbell_bench_press"), &get("dumbbell_bench_press"), &config),
      None
    );
  }

  #[test]
  fn test_agonist_requires_shared_muscle_and_isolation() {
    let catalog = fixture_catalog();
    let get = |id: &str| catalog.get_exercise(id).cloned().unwrap();
    assert_eq!(agonist_score(&get("barbell_bench_press"), &get("incline_dumbbell_press")), None);
    let score = agonist_score(&get("barbell_bench_press"), &get("cable_fly")).unwrap();
    assert!((score - 0.85).abs() < 1e-9);
    let score = agonist_score(&get("dumbbell_curl"), &get("barbell_curl"));
    assert_eq!(score, None);
  }

  #[test]
  fn test_agonist_needs_a_known_primary_muscle() {
    let band = Equipment::ResistanceBand;
    let a = exercise("band_drill", "Band Drill", &[], None, band, ExerciseType::Isolation, "band_drill");
    let b = exercise("mobility_flow", "Mobility Flow", &[], None, band, ExerciseType::Isolation, "mobility");
    assert_eq!(agonist_score(&a, &b), None);
  }

  #[test]
  fn test_compound_isolation_skips_same_base() {
    let catalog = fixture_catalog();
    let dumbbell_curl = catalog.get_exercise("dumbbell_curl").cloned().unwrap();
    let heavy_curl = exercise(
      "heavy_barbell_curl",
      "Heavy Barbell Curl",
      &[MuscleGroup::Biceps],
      None,
      Equipment::Barbell,
      ExerciseType::Compound,
      "curl",
    );
    assert_eq!(compound_isolation_score(&heavy_curl, &dumbbell_curl), None);

    let bench = catalog.get_exercise("barbell_bench_press").cloned().unwrap();
    assert!(compound_isolation_score(&bench, &dumbbell_curl).is_some());
  }

  #[test]
  fn test_compound_isolation_leads_with_compound() {
    let catalog = fixture_catalog();
    let exercises = pick(
      &catalog,
      &["cable_fly", "tricep_pushdown", "barbell_bench_press", "overhead_press"],
    );
    let result = pair(&exercises, SupersetStyle::CompoundIsolation, &[], &PairingConfig::default());
    let reordered = result.reorder(&exercises);
    let groups = result.groups.unwrap_or_default();

    assert_eq!(groups.len(), 2);
    for group in &groups {
      assert_eq!(reordered[group.positions[0]].exercise_type, ExerciseType::Compound);
      assert_eq!(reordered[group.positions[1]].exercise_type, ExerciseType::Isolation);
    }
    // Bench and fly share chest, the highest score
    assert_eq!(reordered[0].id, "barbell_bench_press");
    assert_eq!(reordered[1].id, "cable_fly");
  }

  #[test]
  fn test_automatic_styles_need_four_exercises() {
    let catalog = fixture_catalog();
    let exercises = pick(&catalog, &["barbell_bench_press", "barbell_row", "overhead_press"]);
    let result = pair(&exercises, SupersetStyle::Antagonist, &[], &PairingConfig::default());
    assert_eq!(result.groups, None);
    assert_eq!(result.order, vec![0, 1, 2]);
  }

  #[test]
  fn test_circuit_groups_everything() {
    let catalog = fixture_catalog();
    let exercises = pick(&catalog, &["push_up", "bodyweight_squat", "plank"]);
    let result = pair(&exercises, SupersetStyle::Circuit, &[], &PairingConfig::default());
    let groups = result.groups.unwrap_or_default();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].positions, vec![0, 1, 2]);
    assert_eq!(groups[0].rest_seconds, vec![15, 15, 120]);
  }

  #[test]
  fn test_explicit_groups_validated() {
    let catalog = fixture_catalog();
    let exercises = pick(
      &catalog,
      &["barbell_bench_press", "barbell_row", "overhead_press", "lat_pulldown", "plank"],
    );
    let requested = vec![
      ExplicitGroup {
        positions: vec![2, 3],
        rest_between_seconds: Some(10),
        rest_after_seconds: Some(60),
      },
      // 3 is reused and 9 is out of range, leaving a single position
      ExplicitGroup {
        positions: vec![3, 9, 4],
        ..Default::default()
      },
      ExplicitGroup {
        positions: vec![0, 4],
        ..Default::default()
      },
    ];
    let result = pair(&exercises, SupersetStyle::Explicit, &requested, &PairingConfig::default());
    let groups = result.groups.clone().unwrap_or_default();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].rest_seconds, vec![10, 60]);
    assert_eq!(groups[1].rest_seconds, vec![30, 90]);
    assert_eq!(result.order, vec![2, 3, 0, 4, 1]);
  }

  #[test]
  fn test_remap_follows_reorder() {
    let result = PairingResult {
      groups: None,
      order: vec![2, 0, 1],
    };
    let protocols: BTreeMap<usize, &str> = [(0, "a"), (1, "b"), (2, "c")].into_iter().collect();
    let remapped = result.remap(&protocols);
    assert_eq!(remapped[&0], "c");
    assert_eq!(remapped[&1], "a");
    assert_eq!(remapped[&2], "b");
  }

  proptest! {
    #[test]
    fn prop_groups_are_disjoint_and_complete(
      mask in proptest::collection::vec(any::<bool>(), 30),
      style in prop_oneof![
        Just(SupersetStyle::Antagonist),
        Just(SupersetStyle::Agonist),
        Just(SupersetStyle::CompoundIsolation),
        Just(SupersetStyle::Circuit),
      ],
    ) {
      let catalog = fixture_catalog();
      let exercises: Vec<Exercise> = catalog
        .exercises()
        .into_iter()
        .zip(mask)
        .filter(|(_, keep)| *keep)
        .map(|(e, _)| e.clone())
        .collect();
      let config = PairingConfig::default();
      let result = pair(&exercises, style, &[], &config);

      let mut sorted = result.order.clone();
      sorted.sort_unstable();
      prop_assert_eq!(sorted, (0..exercises.len()).collect::<Vec<_>>());

      let mut seen = HashSet::new();
      for group in result.groups.unwrap_or_default() {
        prop_assert!(group.positions.len() >= 2);
        prop_assert_eq!(group.positions.len(), group.rest_seconds.len());
        for position in group.positions {
          prop_assert!(position < exercises.len());
          prop_assert!(seen.insert(position));
        }
      }
    }
  }
}
