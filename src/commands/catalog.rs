//! Catalog maintenance and resolver debugging

use serde::{Deserialize, Serialize};

use super::AppState;
use crate::db::{load_catalog, save_one_rep_max, upsert_exercise, upsert_protocol};
use crate::error::Result;
use crate::models::{Exercise, Protocol};
use crate::resolver::{ExerciseResolver, ProtocolResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
  Exercise,
  Protocol,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OneRepMaxEntry {
  pub user_id: String,
  pub exercise_id: String,
  pub weight: f64,
}

/// JSON catalog file accepted by `seed`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogFile {
  pub exercises: Vec<Exercise>,
  pub protocols: Vec<Protocol>,
  pub one_rep_maxes: Vec<OneRepMaxEntry>,
}

#[derive(Debug, Serialize)]
pub struct SeedSummary {
  pub exercises: usize,
  pub protocols: usize,
  pub one_rep_maxes: usize,
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
  pub kind: IdentifierKind,
  pub candidate: String,
  pub resolved: Option<String>,
  pub strategy: Option<&'static str>,
}

pub async fn seed_catalog(state: &AppState, file: &CatalogFile) -> Result<SeedSummary> {
  for exercise in &file.exercises {
    upsert_exercise(&state.db, exercise).await?;
  }
  for protocol in &file.protocols {
    upsert_protocol(&state.db, protocol).await?;
  }
  for entry in &file.one_rep_maxes {
    save_one_rep_max(&state.db, &entry.user_id, &entry.exercise_id, entry.weight).await?;
  }

  Ok(SeedSummary {
    exercises: file.exercises.len(),
    protocols: file.protocols.len(),
    one_rep_maxes: file.one_rep_maxes.len(),
  })
}

/// Show which catalog id a candidate resolves to, and how
pub async fn resolve_identifier(state: &AppState, kind: IdentifierKind, candidate: &str) -> Result<ResolveResponse> {
  let catalog = load_catalog(&state.db).await?;
  let hit = match kind {
    IdentifierKind::Exercise => ExerciseResolver::new(&catalog).resolve_with_strategy(candidate),
    IdentifierKind::Protocol => ProtocolResolver::new(&catalog).resolve_with_strategy(candidate),
  };

  Ok(ResolveResponse {
    kind,
    candidate: candidate.to_string(),
    strategy: hit.as_ref().map(|(_, strategy)| *strategy),
    resolved: hit.map(|(id, _)| id),
  })
}
