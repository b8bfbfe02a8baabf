//! Workout assembly engine
//!
//! Turns a loosely specified training intent into a concrete, time-bounded workout:
//! fuzzy identifier resolution, constraint-based exercise selection, protocol
//! assignment with duration convergence, superset pairing, change-classified
//! modification with history, and weekly date scheduling. The engine itself is
//! synchronous and works against an injected [`catalog::Catalog`]; the SQLite
//! adapter in [`db`] loads a snapshot up front and persists results afterwards.

pub mod assigner;
pub mod builder;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod convergence;
pub mod db;
pub mod error;
pub mod models;
pub mod modifier;
pub mod resolver;
pub mod scheduler;
pub mod selector;
pub mod superset;
pub mod tables;

#[cfg(test)]
pub mod test_utils;

pub use builder::{AssembledWorkout, BuildIntent, WorkoutBuilder, WorkoutDetails};
pub use catalog::{Catalog, CatalogSnapshot, OneRepMaxSource, OneRepMaxTable};
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use modifier::{ModifyIntent, ModifyOutcome, WorkoutModifier};
pub use scheduler::{schedule, Schedule, ScheduleRequest};
