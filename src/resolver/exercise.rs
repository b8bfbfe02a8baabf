use std::collections::BTreeSet;

use tracing::{debug, warn};

use super::{humanize, normalize, words, Strategy};
use crate::catalog::Catalog;
use crate::tables::{BODYWEIGHT_PREFIX, EQUIPMENT_TOKENS, POSITIONAL_MODIFIERS};

/// ---------------------------------------------------------------------------
/// Catalog Index
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct IndexedExercise {
  id: String,
  normalized_id: String,
  tokens: Vec<String>,
  token_set: BTreeSet<String>,
  /// Display name, normalized and humanized
  name: String,
  base: String,
  compound: bool,
}

/// Pre-normalized view of the catalog's exercises, sorted by id
#[derive(Debug, Clone, Default)]
pub struct ExerciseIndex {
  entries: Vec<IndexedExercise>,
}

impl ExerciseIndex {
  pub fn build(catalog: &dyn Catalog) -> Self {
    let entries = catalog
      .exercises()
      .into_iter()
      .map(|e| {
        let normalized_id = normalize(&e.id);
        let tokens: Vec<String> = words(&normalized_id).into_iter().map(String::from).collect();
        IndexedExercise {
          id: e.id.clone(),
          token_set: tokens.iter().cloned().collect(),
          tokens,
          normalized_id,
          name: humanize(&normalize(&e.name)),
          base: normalize(&e.base_exercise),
          compound: e.is_compound(),
        }
      })
      .collect();
    Self { entries }
  }

  fn by_normalized(&self, normalized: &str) -> Option<&IndexedExercise> {
    self.entries.iter().find(|e| e.normalized_id == normalized)
  }

  fn by_word_set(&self, normalized: &str) -> Option<&IndexedExercise> {
    let wanted: BTreeSet<String> = words(normalized).into_iter().map(String::from).collect();
    if wanted.is_empty() {
      return None;
    }
    self.entries.iter().find(|e| e.token_set == wanted)
  }
}

/// ---------------------------------------------------------------------------
/// Strategies
/// ---------------------------------------------------------------------------

pub const EXERCISE_STRATEGIES: &[(&str, Strategy<ExerciseIndex>)] = &[
  ("exact", exact_match),
  ("normalized", normalized_match),
  ("word_order", word_order_match),
  ("equipment_insertion", equipment_insertion_match),
  ("display_name", display_name_match),
  ("partial_words", partial_word_match),
];

pub fn exact_match(candidate: &str, index: &ExerciseIndex) -> Option<String> {
  index
    .entries
    .binary_search_by(|e| e.id.as_str().cmp(candidate))
    .ok()
    .map(|i| index.entries[i].id.clone())
}

/// Case, separators, plurals, and a redundant "bodyweight_" prefix
pub fn normalized_match(candidate: &str, index: &ExerciseIndex) -> Option<String> {
  let normalized = normalize(candidate);
  if let Some(e) = index.by_normalized(&normalized) {
    return Some(e.id.clone());
  }
  normalized
    .strip_prefix(BODYWEIGHT_PREFIX)
    .filter(|rest| !rest.is_empty())
    .and_then(|rest| index.by_normalized(rest))
    .map(|e| e.id.clone())
}

/// Same words in a different order
pub fn word_order_match(candidate: &str, index: &ExerciseIndex) -> Option<String> {
  index.by_word_set(&normalize(candidate)).map(|e| e.id.clone())
}

/// "incline_press" -> "incline_dumbbell_press" or "dumbbell_incline_press"
pub fn equipment_insertion_match(candidate: &str, index: &ExerciseIndex) -> Option<String> {
  let normalized = normalize(candidate);
  let tokens = words(&normalized);
  let (first, rest) = match tokens.split_first() {
    Some((first, rest)) if !rest.is_empty() => (*first, rest.join("_")),
    _ => return None,
  };
  if !POSITIONAL_MODIFIERS.contains(&first) {
    return None;
  }

  for equipment in EQUIPMENT_TOKENS {
    if tokens.contains(equipment) {
      continue;
    }
    let variants = [
      format!("{}_{}_{}", first, equipment, rest),
      format!("{}_{}", equipment, normalized),
    ];
    for variant in &variants {
      if let Some(e) = index.by_normalized(variant).or_else(|| index.by_word_set(variant)) {
        return Some(e.id.clone());
      }
    }
  }
  None
}

/// Compare against display names: exact, then word-aligned substring in either
/// direction, then base-exercise key
pub fn display_name_match(candidate: &str, index: &ExerciseIndex) -> Option<String> {
  let normalized = normalize(candidate);
  if normalized.is_empty() {
    return None;
  }
  let human = humanize(&normalized);

  if let Some(e) = index.entries.iter().find(|e| e.name == human) {
    return Some(e.id.clone());
  }

  let padded = format!(" {} ", human);
  if human.len() >= 3 {
    // Candidate inside a name: the shortest name is the closest
    if let Some(e) = index
      .entries
      .iter()
      .filter(|e| format!(" {} ", e.name).contains(&padded))
      .min_by(|a, b| a.name.len().cmp(&b.name.len()).then_with(|| a.id.cmp(&b.id)))
    {
      return Some(e.id.clone());
    }
  }

  // Name inside the candidate: the longest name is the most specific
  if let Some(e) = index
    .entries
    .iter()
    .filter(|e| !e.name.is_empty() && padded.contains(&format!(" {} ", e.name)))
    .max_by(|a, b| a.name.len().cmp(&b.name.len()).then_with(|| b.id.cmp(&a.id)))
  {
    return Some(e.id.clone());
  }

  index
    .entries
    .iter()
    .filter(|e| e.base == normalized)
    .min_by(|a, b| b.compound.cmp(&a.compound).then_with(|| a.id.cmp(&b.id)))
    .map(|e| e.id.clone())
}

/// Single word: ids starting or ending with it. Several words: ids containing all of
/// them, fewest extra words first.
pub fn partial_word_match(candidate: &str, index: &ExerciseIndex) -> Option<String> {
  let normalized = normalize(candidate);
  let wanted = words(&normalized);

  match wanted.as_slice() {
    [] => None,
    [word] => index
      .entries
      .iter()
      .filter(|e| {
        e.tokens.first().map(String::as_str) == Some(*word)
          || e.tokens.last().map(String::as_str) == Some(*word)
      })
      .min_by(|a, b| a.tokens.len().cmp(&b.tokens.len()).then_with(|| a.id.cmp(&b.id)))
      .map(|e| e.id.clone()),
    _ => index
      .entries
      .iter()
      .filter(|e| wanted.iter().all(|w| e.token_set.contains(*w)))
      .min_by(|a, b| a.token_set.len().cmp(&b.token_set.len()).then_with(|| a.id.cmp(&b.id)))
      .map(|e| e.id.clone()),
  }
}

/// ---------------------------------------------------------------------------
/// Resolver
/// ---------------------------------------------------------------------------

pub struct ExerciseResolver {
  index: ExerciseIndex,
}

impl ExerciseResolver {
  pub fn new(catalog: &dyn Catalog) -> Self {
    Self {
      index: ExerciseIndex::build(catalog),
    }
  }

  /// Resolve a candidate, reporting which strategy matched
  pub fn resolve_with_strategy(&self, candidate: &str) -> Option<(String, &'static str)> {
    EXERCISE_STRATEGIES.iter().find_map(|(name, strategy)| {
      strategy(candidate, &self.index).map(|id| {
        debug!(candidate, resolved = %id, strategy = *name, "Resolved exercise id");
        (id, *name)
      })
    })
  }

  pub fn resolve(&self, candidate: &str) -> Option<String> {
    self.resolve_with_strategy(candidate).map(|(id, _)| id)
  }

  /// Resolve a list, dropping misses and duplicates while keeping first-seen order
  pub fn resolve_all<S: AsRef<str>>(&self, candidates: &[S]) -> Vec<String> {
    let mut resolved: Vec<String> = Vec::new();
    for candidate in candidates {
      let candidate = candidate.as_ref();
      match self.resolve(candidate) {
        Some(id) if !resolved.contains(&id) => resolved.push(id),
        Some(id) => debug!(candidate, resolved = %id, "Dropping duplicate exercise"),
        None => warn!(candidate, "Dropping unresolvable exercise id"),
      }
    }
    resolved
  }
}
