//! Command-line surface for the engine

use chrono::{Local, NaiveDate, Weekday};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use crate::builder::{BuildIntent, WorkoutDetails};
use crate::commands::catalog::{resolve_identifier, seed_catalog, CatalogFile, IdentifierKind};
use crate::commands::workout::{build_workout, modify_workout};
use crate::commands::AppState;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::models::{EffortLevel, Equipment, SessionType, SplitTarget, SupersetStyle, TrainingLocation};
use crate::modifier::ModifyIntent;
use crate::scheduler::{schedule, ScheduleRequest};

#[derive(Parser, Debug)]
#[command(name = "workout-engine", version, about = "Assemble, modify and schedule workouts")]
pub struct Cli {
  /// SQLite database URL (overrides WORKOUT_ENGINE_DATABASE_URL)
  #[arg(long, global = true)]
  pub database_url: Option<String>,

  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Assemble a workout and print it as JSON
  Build(BuildArgs),
  /// Apply a modify intent (JSON) to a stored workout
  Modify(ModifyArgs),
  /// Print session dates for a date range
  Schedule(ScheduleArgs),
  /// Show how a fuzzy identifier resolves against the catalog
  Resolve(ResolveArgs),
  /// Load a JSON catalog file into the database
  Seed(SeedArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
  /// Split day ("push", "full_body") or patterns ("pattern:squat,hinge")
  #[arg(short, long, default_value = "full_body")]
  pub target: SplitTarget,
  /// Target duration in minutes
  #[arg(short, long, default_value_t = 45)]
  pub minutes: u32,
  #[arg(short, long, default_value = "standard")]
  pub effort: EffortLevel,
  #[arg(long, default_value = "strength")]
  pub session: SessionType,
  #[arg(long, default_value = "gym")]
  pub location: TrainingLocation,
  /// Available equipment, comma separated; empty at the gym means everything
  #[arg(long, value_delimiter = ',')]
  pub equipment: Vec<Equipment>,
  /// Requested exercise ids, comma separated
  #[arg(long = "exercise", value_delimiter = ',')]
  pub exercises: Vec<String>,
  /// Protocol applied to every exercise
  #[arg(long)]
  pub protocol: Option<String>,
  /// Fixed exercise count, skipping duration convergence
  #[arg(long)]
  pub count: Option<usize>,
  #[arg(long, default_value = "none")]
  pub superset: SupersetStyle,
  #[arg(short, long, default_value = "default")]
  pub user: String,
  #[arg(long)]
  pub name: Option<String>,
  /// Scheduled date (YYYY-MM-DD), defaults to today
  #[arg(long)]
  pub date: Option<NaiveDate>,
  /// Persist the workout
  #[arg(long)]
  pub save: bool,
}

#[derive(Args, Debug)]
pub struct ModifyArgs {
  /// Modify intent as inline JSON
  #[arg(conflicts_with = "file")]
  pub intent: Option<String>,
  /// Read the modify intent from a file
  #[arg(short, long)]
  pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ScheduleArgs {
  #[arg(long)]
  pub start: NaiveDate,
  #[arg(long)]
  pub end: NaiveDate,
  #[arg(long, default_value_t = 3)]
  pub primary: usize,
  #[arg(long, default_value_t = 1)]
  pub secondary: usize,
  /// Preferred weekdays, comma separated ("mon,wed,fri")
  #[arg(long, value_delimiter = ',', default_values_t = vec![Weekday::Mon, Weekday::Wed, Weekday::Fri])]
  pub days: Vec<Weekday>,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
  #[arg(value_enum)]
  pub kind: IdentifierKind,
  pub candidate: String,
}

#[derive(Args, Debug)]
pub struct SeedArgs {
  /// Path to a JSON catalog file
  pub path: PathBuf,
}

impl BuildArgs {
  fn intent(&self) -> BuildIntent {
    BuildIntent {
      target_duration_minutes: self.minutes,
      split_target: self.target.clone(),
      effort_level: self.effort,
      session_type: self.session,
      available_equipment: self.equipment.clone(),
      training_location: self.location,
      requested_exercise_ids: self.exercises.clone(),
      protocol_override: self.protocol.clone(),
      exercise_count_override: self.count,
      superset_style: self.superset,
      explicit_superset_groups: Vec::new(),
    }
  }

  fn details(&self) -> WorkoutDetails {
    WorkoutDetails {
      user_id: self.user.clone(),
      name: self.name.clone(),
      scheduled_date: self.date.unwrap_or_else(|| Local::now().date_naive()),
    }
  }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

pub async fn run(cli: Cli) -> Result<()> {
  let mut config = EngineConfig::from_env()?;
  if let Some(url) = cli.database_url {
    config.database_url = url;
  }

  match cli.command {
    Commands::Build(args) => {
      let state = AppState::connect(config).await?;
      let response = build_workout(&state, &args.intent(), &args.details(), args.save).await?;
      print_json(&response)
    }
    Commands::Modify(args) => {
      let raw = match (&args.intent, &args.file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
          .map_err(|e| EngineError::Config(format!("{}: {}", path.display(), e)))?,
        (None, None) => {
          return Err(EngineError::Config(
            "modify needs an inline intent or --file".to_string(),
          ))
        }
      };
      let intent: ModifyIntent = serde_json::from_str(&raw)?;
      let state = AppState::connect(config).await?;
      print_json(&modify_workout(&state, &intent).await?)
    }
    Commands::Schedule(args) => {
      let request = ScheduleRequest {
        primary_per_week: args.primary,
        secondary_per_week: args.secondary,
        preferred_days: args.days,
        day_assignments: Vec::new(),
      };
      print_json(&schedule(args.start, args.end, &request))
    }
    Commands::Resolve(args) => {
      let state = AppState::connect(config).await?;
      print_json(&resolve_identifier(&state, args.kind, &args.candidate).await?)
    }
    Commands::Seed(args) => {
      let raw = std::fs::read_to_string(&args.path)
        .map_err(|e| EngineError::Config(format!("{}: {}", args.path.display(), e)))?;
      let file: CatalogFile = serde_json::from_str(&raw)?;
      let state = AppState::connect(config).await?;
      print_json(&seed_catalog(&state, &file).await?)
    }
  }
}
