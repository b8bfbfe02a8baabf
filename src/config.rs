//! Engine tunables
//!
//! Every threshold the assembly engine applies lives here so hosts can adjust them
//! without touching control flow. Values load from `WORKOUT_ENGINE_*` environment
//! variables (a `.env` file is honored) and fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::error::{EngineError, Result};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const ENV_PREFIX: &str = "WORKOUT_ENGINE_";
const DEFAULT_DATABASE_URL: &str = "sqlite://workout-engine.db?mode=rwc";

/// ---------------------------------------------------------------------------
/// Config Sections
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvergenceConfig {
  /// Accepted distance between target and estimated duration
  pub tolerance_minutes: f64,
  pub max_iterations: u32,
  pub min_exercises: usize,
  /// Setup/equipment-change overhead, added once per exercise
  pub transition_seconds: u32,
}

impl Default for ConvergenceConfig {
  fn default() -> Self {
    Self {
      tolerance_minutes: 5.0,
      max_iterations: 10,
      min_exercises: 3,
      transition_seconds: 90,
    }
  }
}

impl ConvergenceConfig {
  pub fn transition_minutes(&self) -> f64 {
    self.transition_seconds as f64 / 60.0
  }
}

/// Weights and thresholds for automatic superset pairing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairingConfig {
  pub pattern_weight: f64,
  pub muscle_weight: f64,
  pub equipment_weight: f64,
  /// Antagonist pairs scoring below this are discarded
  pub score_floor: f64,
  pub max_groups: usize,
  /// Automatic styles need at least this many exercises
  pub min_exercises: usize,
}

impl Default for PairingConfig {
  fn default() -> Self {
    Self {
      pattern_weight: 0.5,
      muscle_weight: 0.35,
      equipment_weight: 0.15,
      score_floor: 0.4,
      max_groups: 2,
      min_exercises: 4,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
  pub convergence: ConvergenceConfig,
  pub pairing: PairingConfig,
  /// Duration changes larger than this force a structural rebuild
  pub structural_duration_threshold_minutes: u32,
  pub database_url: String,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      convergence: ConvergenceConfig::default(),
      pairing: PairingConfig::default(),
      structural_duration_threshold_minutes: 15,
      database_url: DEFAULT_DATABASE_URL.to_string(),
    }
  }
}

impl EngineConfig {
  /// Load configuration from the environment, reading `.env` first if present
  pub fn from_env() -> Result<Self> {
    dotenvy::dotenv().ok();

    let defaults = Self::default();
    let config = Self {
      convergence: ConvergenceConfig {
        tolerance_minutes: env_or("TOLERANCE_MINUTES", defaults.convergence.tolerance_minutes)?,
        max_iterations: env_or("MAX_ITERATIONS", defaults.convergence.max_iterations)?,
        min_exercises: env_or("MIN_EXERCISES", defaults.convergence.min_exercises)?,
        transition_seconds: env_or("TRANSITION_SECONDS", defaults.convergence.transition_seconds)?,
      },
      pairing: PairingConfig {
        score_floor: env_or("PAIRING_FLOOR", defaults.pairing.score_floor)?,
        max_groups: env_or("MAX_SUPERSET_GROUPS", defaults.pairing.max_groups)?,
        ..defaults.pairing
      },
      structural_duration_threshold_minutes: env_or(
        "STRUCTURAL_DURATION_THRESHOLD",
        defaults.structural_duration_threshold_minutes,
      )?,
      database_url: env::var("WORKOUT_ENGINE_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .unwrap_or(defaults.database_url),
    };

    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<()> {
    if self.convergence.max_iterations == 0 {
      return Err(EngineError::Config("MAX_ITERATIONS must be at least 1".into()));
    }
    if self.convergence.min_exercises == 0 {
      return Err(EngineError::Config("MIN_EXERCISES must be at least 1".into()));
    }
    if self.convergence.tolerance_minutes < 0.0 {
      return Err(EngineError::Config("TOLERANCE_MINUTES must not be negative".into()));
    }
    if !(0.0..=1.0).contains(&self.pairing.score_floor) {
      return Err(EngineError::Config("PAIRING_FLOOR must be between 0 and 1".into()));
    }
    Ok(())
  }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: std::fmt::Display,
{
  let name = format!("{}{}", ENV_PREFIX, key);
  match env::var(&name) {
    Ok(raw) => raw
      .trim()
      .parse()
      .map_err(|e| EngineError::Config(format!("{}={:?}: {}", name, raw, e))),
    Err(_) => Ok(default),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  #[serial]
  fn test_from_env_defaults() {
    temp_env::with_vars_unset(
      [
        "WORKOUT_ENGINE_TOLERANCE_MINUTES",
        "WORKOUT_ENGINE_MAX_ITERATIONS",
        "WORKOUT_ENGINE_PAIRING_FLOOR",
      ],
      || {
        let config = EngineConfig::from_env().expect("defaults should load");
        assert_eq!(config.convergence.tolerance_minutes, 5.0);
        assert_eq!(config.convergence.max_iterations, 10);
        assert_eq!(config.pairing.score_floor, 0.4);
      },
    );
  }

  #[test]
  #[serial]
  fn test_from_env_overrides() {
    temp_env::with_vars(
      [
        ("WORKOUT_ENGINE_TOLERANCE_MINUTES", Some("3.5")),
        ("WORKOUT_ENGINE_MAX_SUPERSET_GROUPS", Some("3")),
      ],
      || {
        let config = EngineConfig::from_env().expect("overrides should load");
        assert_eq!(config.convergence.tolerance_minutes, 3.5);
        assert_eq!(config.pairing.max_groups, 3);
        // Untouched weights keep their defaults
        assert_eq!(config.pairing.pattern_weight, 0.5);
      },
    );
  }

  #[test]
  #[serial]
  fn test_from_env_rejects_garbage() {
    temp_env::with_var("WORKOUT_ENGINE_MAX_ITERATIONS", Some("lots"), || {
      let err = EngineConfig::from_env().unwrap_err();
      assert!(err.to_string().contains("WORKOUT_ENGINE_MAX_ITERATIONS"));
    });
  }

  #[test]
  #[serial]
  fn test_from_env_rejects_zero_iterations() {
    temp_env::with_var("WORKOUT_ENGINE_MAX_ITERATIONS", Some("0"), || {
      assert!(EngineConfig::from_env().is_err());
    });
  }
}
