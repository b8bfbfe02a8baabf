//! Named lookup tables used by the resolvers, the protocol assigner and the
//! superset scorer. Tables are plain data so they can be extended without touching
//! control flow; bump [`TABLES_VERSION`] whenever an entry changes meaning.

use crate::models::{EffortLevel, Equipment, ExerciseType, MovementPattern, MuscleGroup};

pub const TABLES_VERSION: u32 = 3;

/// ---------------------------------------------------------------------------
/// Identifier Normalization
/// ---------------------------------------------------------------------------

/// Plurals that generic "strip the trailing s" gets wrong
pub const IRREGULAR_PLURALS: &[(&str, &str)] = &[
  ("triceps", "tricep"),
  ("biceps", "bicep"),
  ("calves", "calf"),
  ("flies", "fly"),
  ("flyes", "fly"),
  ("presses", "press"),
  ("crosses", "cross"),
  ("crunches", "crunch"),
  ("lunges", "lunge"),
  ("raises", "raise"),
  ("pushes", "push"),
  ("stretches", "stretch"),
];

/// Words that end in "s" in their singular form
pub const PROTECTED_WORDS: &[&str] = &["press", "cross", "abs", "plus", "series"];

/// Leading words that usually sit in front of an equipment token
pub const POSITIONAL_MODIFIERS: &[&str] = &[
  "incline", "decline", "flat", "seated", "standing", "lying", "bent", "reverse", "single",
];

/// Equipment tokens tried, in order, by the equipment-insertion strategy
pub const EQUIPMENT_TOKENS: &[&str] = &["barbell", "dumbbell", "cable", "machine", "kettlebell", "smith"];

pub const BODYWEIGHT_PREFIX: &str = "bodyweight_";

/// Domain terminology an assistant tends to use, mapped to canonical protocol ids
pub const PROTOCOL_SYNONYMS: &[(&str, &str)] = &[
  ("hypertrophy_3x8", "strength_3x8_moderate"),
  ("hypertrophy_3x10", "strength_3x10_moderate"),
  ("hypertrophy_3x12", "strength_3x12_light"),
  ("hypertrophy", "strength_3x10_moderate"),
  ("muscle_building", "strength_3x10_moderate"),
  ("strength_5x5", "strength_5x5_straight"),
  ("stronglifts_5x5", "strength_5x5_straight"),
  ("power_5x5", "strength_5x5_straight"),
  ("heavy_3x5", "strength_3x5_moderate"),
  ("max_strength", "strength_3x5_moderate"),
  ("endurance", "strength_3x12_light"),
  ("muscular_endurance", "strength_3x12_light"),
  ("light_pump", "strength_3x12_light"),
  ("steady_state", "cardio_20min_steady"),
  ("steady_state_cardio", "cardio_20min_steady"),
  ("zone_2", "cardio_20min_steady"),
  ("liss", "cardio_20min_steady"),
  ("hiit", "cardio_intervals_hiit"),
  ("interval_training", "cardio_intervals_hiit"),
  ("tabata", "cardio_intervals_hiit"),
  ("warm_up", "cardio_10min_easy"),
  ("cool_down", "cardio_10min_easy"),
];

/// ---------------------------------------------------------------------------
/// Protocol Assignment
/// ---------------------------------------------------------------------------

/// Compound-moderate fallback for combinations the table does not cover
pub const DEFAULT_PROTOCOL: &str = "strength_3x8_moderate";

pub fn protocol_for(effort: EffortLevel, exercise_type: ExerciseType) -> &'static str {
  use EffortLevel::*;
  use ExerciseType::*;
  match (effort, exercise_type) {
    (Recovery, Compound) => "strength_3x10_moderate",
    (Recovery, Isolation) => "strength_3x12_light",
    (Recovery, Cardio) => "cardio_10min_easy",
    (Standard, Compound) => "strength_3x8_moderate",
    (Standard, Isolation) => "strength_3x10_moderate",
    (Standard, Cardio) => "cardio_20min_steady",
    (Push, Compound) => "strength_5x5_straight",
    (Push, Isolation) => "strength_3x8_moderate",
    (Push, Cardio) => "cardio_intervals_hiit",
  }
}

/// Estimated working minutes per protocol (sets plus rest), excluding transitions
pub const PROTOCOL_MINUTES: &[(&str, f64)] = &[
  ("strength_3x5_moderate", 10.0),
  ("strength_5x5_straight", 14.0),
  ("strength_3x8_moderate", 7.5),
  ("strength_3x10_moderate", 7.0),
  ("strength_3x12_light", 6.0),
  ("endurance_2x15_light", 5.0),
  ("cardio_10min_easy", 10.0),
  ("cardio_20min_steady", 20.0),
  ("cardio_intervals_hiit", 15.0),
];

pub const DEFAULT_PROTOCOL_MINUTES: f64 = 8.0;

pub fn protocol_minutes(protocol_id: &str) -> f64 {
  PROTOCOL_MINUTES
    .iter()
    .find(|(id, _)| *id == protocol_id)
    .map(|(_, minutes)| *minutes)
    .unwrap_or(DEFAULT_PROTOCOL_MINUTES)
}

/// Average minutes per exercise (including transition) for the primary equipment,
/// used to seed the convergence loop
pub fn average_minutes_per_exercise(equipment: Option<Equipment>) -> f64 {
  match equipment {
    Some(Equipment::Barbell) | Some(Equipment::SmithMachine) => 9.5,
    Some(Equipment::Dumbbell) => 8.0,
    Some(Equipment::Kettlebell) => 7.5,
    Some(Equipment::Cable) | Some(Equipment::Machine) => 7.0,
    Some(Equipment::ResistanceBand) | Some(Equipment::Bodyweight) | Some(Equipment::None) => 6.5,
    Some(Equipment::CardioMachine) => 15.0,
    None => 8.0,
  }
}

/// ---------------------------------------------------------------------------
/// Superset Scoring
/// ---------------------------------------------------------------------------

pub const ANTAGONIST_PATTERNS: &[(MovementPattern, MovementPattern)] = &[
  (MovementPattern::HorizontalPress, MovementPattern::HorizontalPull),
  (MovementPattern::VerticalPress, MovementPattern::VerticalPull),
  (MovementPattern::Squat, MovementPattern::Hinge),
  (MovementPattern::Lunge, MovementPattern::Hinge),
];

/// Opposing muscles that score 1.0
pub const PERFECT_ANTAGONIST_MUSCLES: &[(MuscleGroup, MuscleGroup)] = &[
  (MuscleGroup::Chest, MuscleGroup::Back),
  (MuscleGroup::Biceps, MuscleGroup::Triceps),
  (MuscleGroup::Quadriceps, MuscleGroup::Hamstrings),
  (MuscleGroup::Shoulders, MuscleGroup::Lats),
];

/// Loosely opposing muscles that score 0.7
pub const COMPLEMENTARY_MUSCLES: &[(MuscleGroup, MuscleGroup)] = &[
  (MuscleGroup::Chest, MuscleGroup::Lats),
  (MuscleGroup::Shoulders, MuscleGroup::Back),
  (MuscleGroup::Chest, MuscleGroup::Biceps),
  (MuscleGroup::Back, MuscleGroup::Triceps),
  (MuscleGroup::Quadriceps, MuscleGroup::Glutes),
  (MuscleGroup::Core, MuscleGroup::Back),
];

pub const PERFECT_MUSCLE_SCORE: f64 = 1.0;
pub const COMPLEMENTARY_MUSCLE_SCORE: f64 = 0.7;

fn pair_matches<T: PartialEq>(table: &[(T, T)], a: &T, b: &T) -> bool {
  table
    .iter()
    .any(|(x, y)| (x == a && y == b) || (x == b && y == a))
}

pub fn patterns_oppose(a: MovementPattern, b: MovementPattern) -> bool {
  pair_matches(ANTAGONIST_PATTERNS, &a, &b)
}

/// Muscle-opposition score: perfect 1.0, complementary 0.7, otherwise 0.0
pub fn muscle_opposition(a: MuscleGroup, b: MuscleGroup) -> f64 {
  if a == b {
    0.0
  } else if pair_matches(PERFECT_ANTAGONIST_MUSCLES, &a, &b) {
    PERFECT_MUSCLE_SCORE
  } else if pair_matches(COMPLEMENTARY_MUSCLES, &a, &b) {
    COMPLEMENTARY_MUSCLE_SCORE
  } else {
    0.0
  }
}

/// Agonist scoring components
pub const AGONIST_BASE: f64 = 0.6;
pub const AGONIST_MIXED_TYPE_BONUS: f64 = 0.25;
pub const AGONIST_EQUIPMENT_BONUS: f64 = 0.1;

/// Compound/isolation scoring components
pub const COMPOUND_ISOLATION_BASE: f64 = 0.5;
pub const COMPOUND_ISOLATION_SAME_MUSCLE: f64 = 0.3;
pub const COMPOUND_ISOLATION_OTHER_MUSCLE: f64 = 0.15;
pub const COMPOUND_ISOLATION_EQUIPMENT_BONUS: f64 = 0.1;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_every_effort_and_type_has_a_protocol_with_minutes() {
    for effort in [EffortLevel::Recovery, EffortLevel::Standard, EffortLevel::Push] {
      for exercise_type in [ExerciseType::Compound, ExerciseType::Isolation, ExerciseType::Cardio] {
        let id = protocol_for(effort, exercise_type);
        assert!(
          PROTOCOL_MINUTES.iter().any(|(p, _)| *p == id),
          "{} has no minutes entry",
          id
        );
      }
    }
  }

  #[test]
  fn test_muscle_opposition_is_symmetric() {
    assert_eq!(muscle_opposition(MuscleGroup::Chest, MuscleGroup::Back), 1.0);
    assert_eq!(muscle_opposition(MuscleGroup::Back, MuscleGroup::Chest), 1.0);
    assert_eq!(muscle_opposition(MuscleGroup::Lats, MuscleGroup::Chest), 0.7);
    assert_eq!(muscle_opposition(MuscleGroup::Chest, MuscleGroup::Chest), 0.0);
    assert_eq!(muscle_opposition(MuscleGroup::Calves, MuscleGroup::Chest), 0.0);
  }

  #[test]
  fn test_pattern_opposition() {
    assert!(patterns_oppose(MovementPattern::HorizontalPull, MovementPattern::HorizontalPress));
    assert!(!patterns_oppose(MovementPattern::HorizontalPress, MovementPattern::VerticalPull));
  }

  #[test]
  fn test_unknown_protocol_minutes_fall_back() {
    assert_eq!(protocol_minutes("mystery_protocol"), DEFAULT_PROTOCOL_MINUTES);
    assert_eq!(protocol_minutes("strength_3x8_moderate"), 7.5);
  }
}
