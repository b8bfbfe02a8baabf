use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Exercise Attributes
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseType {
  Compound,
  Isolation,
  Cardio,
}

string_enum!(ExerciseType {
  Compound => "compound",
  Isolation => "isolation",
  Cardio => "cardio",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
  Barbell,
  Dumbbell,
  Kettlebell,
  Cable,
  Machine,
  SmithMachine,
  ResistanceBand,
  CardioMachine,
  Bodyweight,
  None,
}

string_enum!(Equipment {
  Barbell => "barbell",
  Dumbbell => "dumbbell",
  Kettlebell => "kettlebell",
  Cable => "cable",
  Machine => "machine",
  SmithMachine => "smith_machine",
  ResistanceBand => "resistance_band",
  CardioMachine => "cardio_machine",
  Bodyweight => "bodyweight",
  None => "none",
});

impl Equipment {
  /// Bodyweight and equipment-free movements pass every equipment filter
  pub fn is_bodyweight(&self) -> bool {
    matches!(self, Equipment::Bodyweight | Equipment::None)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
  Chest,
  Back,
  Lats,
  Traps,
  Shoulders,
  Biceps,
  Triceps,
  Forearms,
  Quadriceps,
  Hamstrings,
  Glutes,
  Calves,
  Core,
  FullBody,
}

string_enum!(MuscleGroup {
  Chest => "chest",
  Back => "back",
  Lats => "lats",
  Traps => "traps",
  Shoulders => "shoulders",
  Biceps => "biceps",
  Triceps => "triceps",
  Forearms => "forearms",
  Quadriceps => "quadriceps",
  Hamstrings => "hamstrings",
  Glutes => "glutes",
  Calves => "calves",
  Core => "core",
  FullBody => "full_body",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementPattern {
  HorizontalPress,
  HorizontalPull,
  VerticalPress,
  VerticalPull,
  Squat,
  Hinge,
  Lunge,
  Carry,
  Core,
  Cardio,
}

string_enum!(MovementPattern {
  HorizontalPress => "horizontal_press",
  HorizontalPull => "horizontal_pull",
  VerticalPress => "vertical_press",
  VerticalPull => "vertical_pull",
  Squat => "squat",
  Hinge => "hinge",
  Lunge => "lunge",
  Carry => "carry",
  Core => "core",
  Cardio => "cardio",
});

impl MovementPattern {
  /// Expand a pattern name or family alias ("push", "pull", "legs") into concrete patterns
  pub fn expand(name: &str) -> Vec<MovementPattern> {
    use MovementPattern::*;
    match name.trim().to_lowercase().as_str() {
      "push" | "press" => vec![HorizontalPress, VerticalPress],
      "pull" | "row" => vec![HorizontalPull, VerticalPull],
      "legs" | "lower" => vec![Squat, Hinge, Lunge],
      "upper" => vec![HorizontalPress, HorizontalPull, VerticalPress, VerticalPull],
      "horizontal" => vec![HorizontalPress, HorizontalPull],
      "vertical" => vec![VerticalPress, VerticalPull],
      other => other.parse().map(|p| vec![p]).unwrap_or_default(),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Workout-level Attributes
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EffortLevel {
  Recovery,
  #[default]
  Standard,
  Push,
}

string_enum!(EffortLevel {
  Recovery => "recovery",
  Standard => "standard",
  Push => "push",
});

impl EffortLevel {
  /// Fraction of one-rep max used for target weights at this effort
  pub fn intensity(&self) -> f64 {
    match self {
      EffortLevel::Recovery => 0.60,
      EffortLevel::Standard => 0.70,
      EffortLevel::Push => 0.80,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
  #[default]
  Strength,
  Cardio,
}

string_enum!(SessionType {
  Strength => "strength",
  Cardio => "cardio",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrainingLocation {
  #[default]
  Gym,
  Home,
  Outdoor,
}

string_enum!(TrainingLocation {
  Gym => "gym",
  Home => "home",
  Outdoor => "outdoor",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitDay {
  Upper,
  Lower,
  Push,
  Pull,
  Legs,
  FullBody,
  Chest,
  Back,
  Shoulders,
  Arms,
}

string_enum!(SplitDay {
  Upper => "upper",
  Lower => "lower",
  Push => "push",
  Pull => "pull",
  Legs => "legs",
  FullBody => "full_body",
  Chest => "chest",
  Back => "back",
  Shoulders => "shoulders",
  Arms => "arms",
});

impl SplitDay {
  /// Muscle groups a split day trains
  pub fn muscles(&self) -> &'static [MuscleGroup] {
    use MuscleGroup::*;
    match self {
      SplitDay::Upper => &[Chest, Back, Lats, Shoulders, Biceps, Triceps, Traps],
      SplitDay::Lower => &[Quadriceps, Hamstrings, Glutes, Calves],
      SplitDay::Push => &[Chest, Shoulders, Triceps],
      SplitDay::Pull => &[Back, Lats, Biceps, Traps, Forearms],
      SplitDay::Legs => &[Quadriceps, Hamstrings, Glutes, Calves],
      SplitDay::FullBody => &[
        Chest, Back, Lats, Shoulders, Quadriceps, Hamstrings, Glutes, Core, FullBody,
      ],
      SplitDay::Chest => &[Chest],
      SplitDay::Back => &[Back, Lats],
      SplitDay::Shoulders => &[Shoulders],
      SplitDay::Arms => &[Biceps, Triceps, Forearms],
    }
  }
}

/// What a workout is built against: a split day's muscles or a set of movement patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SplitTarget {
  Split(SplitDay),
  Patterns(Vec<MovementPattern>),
}

impl Default for SplitTarget {
  fn default() -> Self {
    SplitTarget::Split(SplitDay::FullBody)
  }
}

impl SplitTarget {
  /// Build a pattern target, expanding family aliases and dropping duplicates
  pub fn patterns<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
    let mut patterns = Vec::new();
    for name in names {
      for pattern in MovementPattern::expand(name) {
        if !patterns.contains(&pattern) {
          patterns.push(pattern);
        }
      }
    }
    SplitTarget::Patterns(patterns)
  }
}

impl std::fmt::Display for SplitTarget {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      SplitTarget::Split(day) => write!(f, "{}", day),
      SplitTarget::Patterns(patterns) => {
        let names: Vec<&str> = patterns.iter().map(|p| p.as_str()).collect();
        write!(f, "pattern:{}", names.join(","))
      }
    }
  }
}

/// Accepts "push", "full_body" or "pattern:squat,hinge"
impl std::str::FromStr for SplitTarget {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.trim().to_lowercase();
    if let Some(rest) = trimmed.strip_prefix("pattern:") {
      let target = SplitTarget::patterns(rest.split(','));
      return match &target {
        SplitTarget::Patterns(p) if p.is_empty() => {
          Err(format!("Unknown movement pattern: {}", rest))
        }
        _ => Ok(target),
      };
    }
    trimmed.parse::<SplitDay>().map(SplitTarget::Split)
  }
}

/// ---------------------------------------------------------------------------
/// Catalog Entities
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
  pub id: String,
  pub name: String,
  /// Ordered; the first entry is the primary muscle
  pub muscle_groups: Vec<MuscleGroup>,
  pub movement_pattern: Option<MovementPattern>,
  pub equipment: Equipment,
  pub exercise_type: ExerciseType,
  /// Shared by equipment variants of the same lift
  pub base_exercise: String,
}

impl Exercise {
  pub fn primary_muscle(&self) -> Option<MuscleGroup> {
    self.muscle_groups.first().copied()
  }

  pub fn is_compound(&self) -> bool {
    self.exercise_type == ExerciseType::Compound
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Protocol {
  pub id: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  /// Target reps for each set, in order
  pub reps: Vec<u32>,
  pub rest_seconds: u32,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub tempo: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub rpe: Option<f32>,
  /// Default fraction of one-rep max
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub intensity: Option<f64>,
}

impl Protocol {
  pub fn set_count(&self) -> usize {
    self.reps.len()
  }
}
