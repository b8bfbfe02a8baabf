pub mod catalog;
pub mod workout;

use crate::config::EngineConfig;
use crate::db::{initialize_db, DbPool};
use crate::error::Result;

/// Shared state for commands that touch the database
pub struct AppState {
  pub db: DbPool,
  pub config: EngineConfig,
}

impl AppState {
  pub async fn connect(config: EngineConfig) -> Result<Self> {
    let db = initialize_db(&config.database_url).await?;
    Ok(Self { db, config })
  }
}
