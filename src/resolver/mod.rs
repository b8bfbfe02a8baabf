//! Identifier resolution
//!
//! Assistants hand us exercise and protocol ids that are close to, but not quite,
//! catalog ids: plurals, reordered words, a missing equipment token, a display name
//! instead of an id. Each resolver is an ordered list of pure strategies; the first
//! strategy that produces a catalog id wins. A miss is `None`, and callers drop the
//! candidate instead of failing the whole request.

pub mod exercise;
pub mod protocol;

pub use exercise::ExerciseResolver;
pub use protocol::ProtocolResolver;

use std::collections::BTreeSet;

use crate::tables::{IRREGULAR_PLURALS, PROTECTED_WORDS};

/// A single resolution strategy: candidate in, canonical id out
pub type Strategy<C> = fn(&str, &C) -> Option<String>;

/// Lower-case, collapse separators to single underscores and drop punctuation
pub fn canonical_form(candidate: &str) -> String {
  let mut out = String::with_capacity(candidate.len());
  for ch in candidate.trim().chars() {
    if ch.is_ascii_alphanumeric() {
      out.push(ch.to_ascii_lowercase());
    } else if (ch == '_' || ch == ' ' || ch == '-' || ch == '/') && !out.ends_with('_') {
      out.push('_');
    }
  }
  out.trim_matches('_').to_string()
}

/// Singularize one word: irregular table first, then strip a trailing "s"
pub fn singularize(word: &str) -> String {
  if let Some((_, singular)) = IRREGULAR_PLURALS.iter().find(|(plural, _)| *plural == word) {
    return singular.to_string();
  }
  if word.len() > 1
    && word.ends_with('s')
    && !word.ends_with("ss")
    && !PROTECTED_WORDS.contains(&word)
  {
    return word[..word.len() - 1].to_string();
  }
  word.to_string()
}

/// Canonical form with every underscore-delimited word singularized
pub fn normalize(candidate: &str) -> String {
  canonical_form(candidate)
    .split('_')
    .filter(|w| !w.is_empty())
    .map(singularize)
    .collect::<Vec<_>>()
    .join("_")
}

pub fn words(normalized: &str) -> Vec<&str> {
  normalized.split('_').filter(|w| !w.is_empty()).collect()
}

pub fn word_set(normalized: &str) -> BTreeSet<&str> {
  words(normalized).into_iter().collect()
}

/// Underscores to spaces, for comparing against display names
pub fn humanize(normalized: &str) -> String {
  normalized.replace('_', " ")
}
