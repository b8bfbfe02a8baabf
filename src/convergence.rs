//! Duration convergence
//!
//! Picks how many pool candidates to take so the estimated session length lands
//! within tolerance of the target. The loop is an explicit state machine: it starts
//! from an equipment-based estimate, then adds or removes one exercise per step. A
//! step may not undo the previous one, so the count never oscillates, and the
//! iteration cap bounds the search.

use serde::{Deserialize, Serialize};

use tracing::{debug, warn};

use crate::assigner::{ProtocolAssigner, ProtocolAssignment};
use crate::config::ConvergenceConfig;
use crate::models::{Equipment, Exercise};
use crate::tables::average_minutes_per_exercise;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
  Add,
  Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
  Searching { count: usize, last_move: Option<Move> },
  Converged,
  GaveUp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConvergenceOutcome {
  Converged,
  /// Positive when the session runs long, negative when it falls short
  GaveUp { delta_minutes: f64 },
  /// Fixed count requested by the caller; `selected` may be smaller than `requested`
  Overridden { requested: usize, selected: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceResult {
  pub selected: Vec<Exercise>,
  pub assignment: ProtocolAssignment,
  pub actual_minutes: f64,
  pub iterations_used: u32,
  pub outcome: ConvergenceOutcome,
}

impl ConvergenceResult {
  fn empty(target_minutes: u32) -> Self {
    Self {
      selected: Vec::new(),
      assignment: ProtocolAssignment::default(),
      actual_minutes: 0.0,
      iterations_used: 0,
      outcome: ConvergenceOutcome::GaveUp {
        delta_minutes: -(target_minutes as f64),
      },
    }
  }
}

pub fn initial_count(target_minutes: u32, primary_equipment: Option<Equipment>, config: &ConvergenceConfig) -> usize {
  let estimate = (target_minutes as f64 / average_minutes_per_exercise(primary_equipment)).floor() as usize;
  estimate.max(config.min_exercises)
}

pub fn converge(
  target_minutes: u32,
  pool: &[Exercise],
  assigner: &ProtocolAssigner<'_>,
  primary_equipment: Option<Equipment>,
  count_override: Option<usize>,
  config: &ConvergenceConfig,
) -> ConvergenceResult {
  if pool.is_empty() {
    return ConvergenceResult::empty(target_minutes);
  }

  if let Some(requested) = count_override {
    let selected = requested.min(pool.len());
    if selected < requested {
      warn!(requested, available = pool.len(), "Exercise count override exceeds the candidate pool");
    }
    let assignment = assigner.assign(&pool[..selected]);
    return ConvergenceResult {
      selected: pool[..selected].to_vec(),
      actual_minutes: assignment.minutes,
      assignment,
      iterations_used: 0,
      outcome: ConvergenceOutcome::Overridden { requested, selected },
    };
  }

  let target = target_minutes as f64;
  let start = initial_count(target_minutes, primary_equipment, config).min(pool.len());
  let mut state = LoopState::Searching {
    count: start,
    last_move: None,
  };
  let mut iterations: u32 = 0;
  let mut evaluated_count = start;
  let mut assignment = ProtocolAssignment::default();

  while let LoopState::Searching { count, last_move } = state {
    if iterations >= config.max_iterations {
      state = LoopState::GaveUp;
      break;
    }
    iterations += 1;

    assignment = assigner.assign(&pool[..count]);
    evaluated_count = count;
    let delta = assignment.minutes - target;
    debug!(iteration = iterations, count, minutes = assignment.minutes, target, "Convergence step");

    state = if delta.abs() <= config.tolerance_minutes {
      LoopState::Converged
    } else if delta < 0.0 && count < pool.len() && last_move != Some(Move::Remove) {
      LoopState::Searching {
        count: count + 1,
        last_move: Some(Move::Add),
      }
    } else if delta > 0.0 && count > config.min_exercises && last_move != Some(Move::Add) {
      LoopState::Searching {
        count: count - 1,
        last_move: Some(Move::Remove),
      }
    } else {
      LoopState::GaveUp
    };
  }

  let actual_minutes = assignment.minutes;
  let outcome = match state {
    LoopState::Converged => ConvergenceOutcome::Converged,
    _ => {
      let delta_minutes = actual_minutes - target;
      warn!(
        target = target_minutes,
        actual = actual_minutes,
        iterations,
        "Duration did not converge"
      );
      ConvergenceOutcome::GaveUp { delta_minutes }
    }
  };

  ConvergenceResult {
    selected: pool[..evaluated_count].to_vec(),
    assignment,
    actual_minutes,
    iterations_used: iterations,
    outcome,
  }
}
