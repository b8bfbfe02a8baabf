use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::workout::WorkoutRecord;

/// How a modification request touches a workout, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
  Metadata,
  Substitution,
  Structural,
}

string_enum!(ChangeType {
  Metadata => "metadata",
  Substitution => "substitution",
  Structural => "structural",
});

/// Snapshot of a workout taken immediately before a change was applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModificationHistoryEntry {
  pub id: String,
  pub workout_id: String,
  /// Version of the workout captured in `snapshot`
  pub version: u32,
  pub change_type: ChangeType,
  pub diff_description: String,
  pub snapshot: WorkoutRecord,
  pub recorded_at: DateTime<Utc>,
}
