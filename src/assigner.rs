use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use tracing::warn;

use crate::catalog::Catalog;
use crate::config::ConvergenceConfig;
use crate::models::{EffortLevel, Exercise};
use crate::resolver::ProtocolResolver;
use crate::tables::{protocol_for, protocol_minutes, DEFAULT_PROTOCOL};

/// Protocol per position plus the estimated session length
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProtocolAssignment {
  pub protocols: BTreeMap<usize, String>,
  pub minutes: f64,
}

/// Resolves an optional protocol override once, then assigns protocols to any
/// prefix of the candidate pool.
pub struct ProtocolAssigner<'a> {
  catalog: &'a dyn Catalog,
  effort: EffortLevel,
  override_id: Option<String>,
  transition_minutes: f64,
}

impl<'a> ProtocolAssigner<'a> {
  pub fn new(
    catalog: &'a dyn Catalog,
    effort: EffortLevel,
    protocol_override: Option<&str>,
    config: &ConvergenceConfig,
  ) -> Self {
    let override_id = protocol_override.and_then(|candidate| {
      let resolved = ProtocolResolver::new(catalog).resolve(candidate);
      if resolved.is_none() {
        warn!(
          protocol = candidate,
          "Protocol override not found, using the effort table"
        );
      }
      resolved
    });

    Self {
      catalog,
      effort,
      override_id,
      transition_minutes: config.transition_minutes(),
    }
  }

  pub fn override_id(&self) -> Option<&str> {
    self.override_id.as_deref()
  }

  /// Protocol for a single exercise, ignoring any override
  pub fn table_protocol(&self, exercise: &Exercise) -> String {
    let id = protocol_for(self.effort, exercise.exercise_type);
    if self.catalog.get_protocol(id).is_some() {
      id.to_string()
    } else {
      DEFAULT_PROTOCOL.to_string()
    }
  }

  pub fn assign(&self, exercises: &[Exercise]) -> ProtocolAssignment {
    let protocols: BTreeMap<usize, String> = exercises
      .iter()
      .enumerate()
      .map(|(position, exercise)| {
        let id = match &self.override_id {
          Some(id) => id.clone(),
          None => self.table_protocol(exercise),
        };
        (position, id)
      })
      .collect();

    let minutes = estimate_minutes(protocols.values().map(String::as_str), self.transition_minutes);
    ProtocolAssignment { protocols, minutes }
  }
}

/// Fixed minutes per protocol plus one transition per exercise
pub fn estimate_minutes<'p>(protocol_ids: impl IntoIterator<Item = &'p str>, transition_minutes: f64) -> f64 {
  protocol_ids
    .into_iter()
    .map(|id| protocol_minutes(id) + transition_minutes)
    .sum()
}
