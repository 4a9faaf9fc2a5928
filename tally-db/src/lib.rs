//! Database layer for Tally
//!
//! Provides persistence for tracked projects, mirrored issues, and
//! registered users.

pub mod error;
pub mod models;
pub mod repos;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

pub use error::{Error, Result};
pub use models::{CreateIssue, CreateProject, CreateUser, Issue, Project, UpdateIssue, User};
pub use repos::{IssueRepository, ProjectRepository, UserRepository};

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection from a file path
    pub async fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Io(format!("Failed to create database directory: {}", e)))?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| Error::Migration(e.to_string()))?;

        info!(path = %db_path.display(), "Opened database");

        Ok(Self { pool })
    }

    /// Create an in-memory database
    ///
    /// Each in-memory connection is its own database, so the pool is pinned
    /// to a single connection that is never reaped.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| Error::Migration(e.to_string()))?;

        debug!("Opened in-memory database");

        Ok(Self { pool })
    }

    /// Get the default database path (~/.local/share/tally/tally.db)
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| Error::Io("Could not determine data directory".to_string()))?;
        Ok(data_dir.join("tally").join("tally.db"))
    }

    /// Get the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Get the projects repository
    pub fn projects(&self) -> ProjectRepository<'_> {
        ProjectRepository::new(&self.pool)
    }

    /// Get the issues repository
    pub fn issues(&self) -> IssueRepository<'_> {
        IssueRepository::new(&self.pool)
    }

    /// Get the users repository
    pub fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.pool)
    }
}
