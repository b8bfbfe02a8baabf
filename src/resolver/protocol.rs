use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use tracing::debug;

use super::{canonical_form, words, Strategy};
use crate::catalog::Catalog;
use crate::tables::PROTOCOL_SYNONYMS;

/// Word-overlap matches need at least this many shared tokens
const MIN_SHARED_TOKENS: usize = 2;

#[derive(Debug, Clone)]
struct IndexedProtocol {
  id: String,
  canonical_id: String,
  tokens: BTreeSet<String>,
  set_count: usize,
  /// Reps when every set uses the same count
  uniform_reps: Option<u32>,
}

/// Pre-normalized view of the catalog's protocols, sorted by id
#[derive(Debug, Clone, Default)]
pub struct ProtocolIndex {
  entries: Vec<IndexedProtocol>,
}

impl ProtocolIndex {
  pub fn build(catalog: &dyn Catalog) -> Self {
    let entries = catalog
      .protocols()
      .into_iter()
      .map(|p| {
        let canonical_id = canonical_form(&p.id);
        let uniform_reps = match p.reps.first() {
          Some(first) if p.reps.iter().all(|r| r == first) => Some(*first),
          _ => None,
        };
        IndexedProtocol {
          id: p.id.clone(),
          tokens: words(&canonical_id).into_iter().map(String::from).collect(),
          canonical_id,
          set_count: p.reps.len(),
          uniform_reps,
        }
      })
      .collect();
    Self { entries }
  }

  fn contains(&self, id: &str) -> bool {
    self.entries.iter().any(|e| e.id == id)
  }

  fn shared_tokens(entry: &IndexedProtocol, tokens: &BTreeSet<&str>) -> usize {
    tokens.iter().filter(|t| entry.tokens.contains(**t)).count()
  }
}

fn sets_by_reps() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"(\d+)[\s_]*x[\s_]*(\d+)").expect("valid sets-by-reps regex"))
}

/// ---------------------------------------------------------------------------
/// Strategies
/// ---------------------------------------------------------------------------

pub const PROTOCOL_STRATEGIES: &[(&str, Strategy<ProtocolIndex>)] = &[
  ("exact", exact_match),
  ("normalized", normalized_match),
  ("synonym", synonym_match),
  ("sets_by_reps", sets_by_reps_match),
  ("word_overlap", word_overlap_match),
];

pub fn exact_match(candidate: &str, index: &ProtocolIndex) -> Option<String> {
  index
    .entries
    .binary_search_by(|e| e.id.as_str().cmp(candidate))
    .ok()
    .map(|i| index.entries[i].id.clone())
}

pub fn normalized_match(candidate: &str, index: &ProtocolIndex) -> Option<String> {
  let canonical = canonical_form(candidate);
  index
    .entries
    .iter()
    .find(|e| e.canonical_id == canonical)
    .map(|e| e.id.clone())
}

/// Domain terminology ("hypertrophy_3x8") mapped through the synonym table
pub fn synonym_match(candidate: &str, index: &ProtocolIndex) -> Option<String> {
  let canonical = canonical_form(candidate);
  PROTOCOL_SYNONYMS
    .iter()
    .find(|(synonym, _)| *synonym == canonical)
    .map(|(_, target)| *target)
    .filter(|target| index.contains(target))
    .map(String::from)
}

/// Pull an "NxM" out of the candidate and find a protocol with that shape
pub fn sets_by_reps_match(candidate: &str, index: &ProtocolIndex) -> Option<String> {
  let canonical = canonical_form(candidate);
  let caps = sets_by_reps().captures(&canonical)?;
  let sets: usize = caps[1].parse().ok()?;
  let reps: u32 = caps[2].parse().ok()?;
  let shape = format!("{}x{}", sets, reps);
  let tokens: BTreeSet<&str> = words(&canonical).into_iter().collect();

  // Prefer ids that spell the shape out, then the protocol's actual sets and reps.
  // Ties go to the id sharing the most words with the candidate.
  let by_id = index.entries.iter().filter(|e| e.tokens.contains(&shape));
  let best = by_id
    .max_by(|a, b| {
      ProtocolIndex::shared_tokens(a, &tokens)
        .cmp(&ProtocolIndex::shared_tokens(b, &tokens))
        .then_with(|| b.id.cmp(&a.id))
    })
    .or_else(|| {
      index
        .entries
        .iter()
        .filter(|e| e.set_count == sets && e.uniform_reps == Some(reps))
        .max_by(|a, b| {
          ProtocolIndex::shared_tokens(a, &tokens)
            .cmp(&ProtocolIndex::shared_tokens(b, &tokens))
            .then_with(|| b.id.cmp(&a.id))
        })
    })?;
  Some(best.id.clone())
}

/// Most shared words, requiring at least two
pub fn word_overlap_match(candidate: &str, index: &ProtocolIndex) -> Option<String> {
  let canonical = canonical_form(candidate);
  let tokens: BTreeSet<&str> = words(&canonical).into_iter().collect();
  index
    .entries
    .iter()
    .map(|e| (e, ProtocolIndex::shared_tokens(e, &tokens)))
    .filter(|(_, shared)| *shared >= MIN_SHARED_TOKENS)
    .max_by(|(a, sa), (b, sb)| sa.cmp(sb).then_with(|| b.id.cmp(&a.id)))
    .map(|(e, _)| e.id.clone())
}

/// ---------------------------------------------------------------------------
/// Resolver
/// ---------------------------------------------------------------------------

pub struct ProtocolResolver {
  index: ProtocolIndex,
}

impl ProtocolResolver {
  pub fn new(catalog: &dyn Catalog) -> Self {
    Self {
      index: ProtocolIndex::build(catalog),
    }
  }

  pub fn resolve_with_strategy(&self, candidate: &str) -> Option<(String, &'static str)> {
    PROTOCOL_STRATEGIES.iter().find_map(|(name, strategy)| {
      strategy(candidate, &self.index).map(|id| {
        debug!(candidate, resolved = %id, strategy = *name, "Resolved protocol id");
        (id, *name)
      })
    })
  }

  pub fn resolve(&self, candidate: &str) -> Option<String> {
    self.resolve_with_strategy(candidate).map(|(id, _)| id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::fixture_catalog;

  fn resolver() -> ProtocolResolver {
    ProtocolResolver::new(&fixture_catalog())
  }

  #[test]
  fn test_canonical_ids_resolve_to_themselves() {
    let catalog = fixture_catalog();
    let r = ProtocolResolver::new(&catalog);
    for p in catalog.protocols() {
      assert_eq!(r.resolve_with_strategy(&p.id), Some((p.id.clone(), "exact")));
    }
  }

  #[test]
  fn test_normalized_match() {
    assert_eq!(
      resolver().resolve_with_strategy("Strength 3x8 Moderate"),
      Some(("strength_3x8_moderate".to_string(), "normalized"))
    );
  }

  #[test]
  fn test_semantic_synonym() {
    assert_eq!(
      resolver().resolve_with_strategy("hypertrophy_3x8"),
      Some(("strength_3x8_moderate".to_string(), "synonym"))
    );
  }

  #[test]
  fn test_sets_by_reps_extraction() {
    let r = resolver();
    assert_eq!(
      r.resolve_with_strategy("volume_3x12"),
      Some(("strength_3x12_light".to_string(), "sets_by_reps"))
    );
    assert_eq!(r.resolve("heavy 5 x 5 work"), Some("strength_5x5_straight".to_string()));
  }

  #[test]
  fn test_word_overlap_needs_two_tokens() {
    let r = resolver();
    assert_eq!(
      r.resolve_with_strategy("light_endurance_circuit"),
      Some(("endurance_2x15_light".to_string(), "word_overlap"))
    );
    // Only one shared token ("strength")
    assert_eq!(r.resolve("strength_ladder"), None);
  }

  #[test]
  fn test_unknown_protocol() {
    assert_eq!(resolver().resolve("mystery_protocol"), None);
  }
}
