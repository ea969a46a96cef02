//! Database migration command.
//!
//! Applies the SQL files in `crates/collector/migrations/`. The collector
//! never migrates on startup, so run this before the first deploy and after
//! every schema change.
//!
//! # Environment Variables
//!
//! - `FINGERPRINT_DATABASE_URL` - `PostgreSQL` connection string (or `DATABASE_URL`)

use super::{CliError, connect};

/// Run collector database migrations.
///
/// # Errors
///
/// Returns `CliError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CliError> {
    let pool = connect().await?;

    tracing::info!("Running fingerprint migrations...");
    sqlx::migrate!("../collector/migrations").run(&pool).await?;

    tracing::info!("Fingerprint migrations complete!");
    Ok(())
}
