//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use ld_core::{Config, DatabaseConfig, DbType};
use ld_db::{Database, DuckDbBackend};
use ld_migrate::MigrationEngine;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors run before the process ends.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only, never shown to the user
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Install the `env_logger` backend: `info` by default, `debug` with
/// `--verbose`. `RUST_LOG` still applies on top.
pub(crate) fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_secs()
        .format_target(false)
        .init();
}

/// Load `ladder.yml` from `--config`, or from the project directory.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    match &global.config {
        Some(path) => Config::load(Path::new(path))
            .with_context(|| format!("Failed to load config from {path}")),
        None => Config::load_from_dir(Path::new(&global.project_dir))
            .context("Failed to load ladder.yml"),
    }
}

/// DuckDB file paths are relative to the project directory.
pub(crate) fn resolve_duckdb_path(project_dir: &Path, path: &str) -> String {
    if path == ":memory:" || Path::new(path).is_absolute() {
        return path.to_string();
    }
    let resolved: PathBuf = project_dir.join(path);
    resolved.display().to_string()
}

/// Open the database of the selected target.
pub(crate) async fn create_database_connection(
    config: &Config,
    global: &GlobalArgs,
) -> Result<Arc<dyn Database>> {
    let db_config = config
        .get_database_config(global.target.as_deref())
        .context("Failed to get database configuration")?;
    log::debug!("Opening {} database", db_config.db_type);
    open_database(&db_config, Path::new(&global.project_dir)).await
}

async fn open_database(
    db_config: &DatabaseConfig,
    project_dir: &Path,
) -> Result<Arc<dyn Database>> {
    match db_config.db_type {
        DbType::DuckDb => {
            let path = resolve_duckdb_path(project_dir, &db_config.path);
            let db = DuckDbBackend::new(&path)
                .with_context(|| format!("Failed to open DuckDB database at {path}"))?;
            Ok(Arc::new(db))
        }
        DbType::Postgres => open_postgres(db_config).await,
    }
}

#[cfg(feature = "postgres")]
async fn open_postgres(db_config: &DatabaseConfig) -> Result<Arc<dyn Database>> {
    let url = db_config
        .url
        .as_deref()
        .context("database.url is required for postgres")?;
    let db = ld_db::PostgresBackend::connect(url)
        .await
        .context("Failed to connect to PostgreSQL")?;
    Ok(Arc::new(db))
}

#[cfg(not(feature = "postgres"))]
async fn open_postgres(_db_config: &DatabaseConfig) -> Result<Arc<dyn Database>> {
    Err(ld_db::DbError::NotCompiled {
        backend: "postgres",
        feature: "postgres",
    }
    .into())
}

/// Config, database and engine for the selected target
pub(crate) async fn create_engine(global: &GlobalArgs) -> Result<MigrationEngine> {
    let config = load_config(global)?;
    let db = create_database_connection(&config, global).await?;
    MigrationEngine::new(db, config.migration).context("Invalid migration step catalogue")
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
