/// Generates `as_str`, `Display` and `FromStr` for enums stored as text columns.
macro_rules! string_enum {
  ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
    impl $name {
      pub fn as_str(&self) -> &'static str {
        match self {
          $(Self::$variant => $text),+
        }
      }
    }

    impl std::fmt::Display for $name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
      }
    }

    impl std::str::FromStr for $name {
      type Err = String;
      fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
          $($text => Ok(Self::$variant),)+
          _ => Err(format!("Unknown {}: {}", stringify!($name), s)),
        }
      }
    }
  };
}

pub mod catalog;
pub mod history;
pub mod workout;

pub use catalog::{
  EffortLevel, Equipment, Exercise, ExerciseType, MovementPattern, MuscleGroup, Protocol,
  SessionType, SplitDay, SplitTarget, TrainingLocation,
};
pub use history::{ChangeType, ModificationHistoryEntry};
pub use workout::{
  ExerciseInstance, ProtocolCustomization, SetCompletion, Substitution, SupersetGroup,
  SupersetStyle, Workout, WorkoutRecord, WorkoutSet, WorkoutStatus,
};
