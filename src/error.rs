use serde::Serialize;

use crate::models::WorkoutStatus;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
  #[error("Unknown {kind}: {id}")]
  NotFound { kind: &'static str, id: String },

  #[error("No eligible exercises for {target}")]
  NoCandidates { target: String },

  #[error("Workout {workout_id} cannot be modified while {status}")]
  InvalidModificationState {
    workout_id: String,
    status: WorkoutStatus,
  },

  #[error("Workout not found: {0}")]
  WorkoutNotFound(String),

  #[error("Invalid configuration: {0}")]
  Config(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl EngineError {
  pub fn exercise_not_found(id: impl Into<String>) -> Self {
    Self::NotFound {
      kind: "exercise",
      id: id.into(),
    }
  }

  pub fn protocol_not_found(id: impl Into<String>) -> Self {
    Self::NotFound {
      kind: "protocol",
      id: id.into(),
    }
  }
}

impl Serialize for EngineError {
  fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_error_serializes_as_message() {
    let err = EngineError::InvalidModificationState {
      workout_id: "w1".to_string(),
      status: WorkoutStatus::Completed,
    };
    let json = serde_json::to_string(&err).unwrap();
    assert_eq!(json, "\"Workout w1 cannot be modified while completed\"");
  }

  #[test]
  fn test_not_found_message() {
    let err = EngineError::protocol_not_found("mystery_4x4");
    assert_eq!(err.to_string(), "Unknown protocol: mystery_4x4");
  }
}
