//! Project repository for tracked repositories

use crate::error::{Error, Result};
use crate::models::{CreateProject, Project};
use chrono::Utc;
use sqlx::SqlitePool;

/// Repository for managing tracked projects
pub struct ProjectRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProjectRepository<'a> {
    /// Create a new project repository
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new project record
    pub async fn create(&self, project: CreateProject) -> Result<Project> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO projects (name, api_url, html_url, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&project.name)
        .bind(&project.api_url)
        .bind(&project.html_url)
        .bind(now)
        .execute(self.pool)
        .await?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    /// Get a project by its internal ID
    pub async fn get_by_id(&self, id: i64) -> Result<Project> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
            .bind(id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => Error::NotFound(format!("project {}", id)),
                e => e.into(),
            })
    }

    /// Find a project by name
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Project>> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE name = ?")
            .bind(name)
            .fetch_optional(self.pool)
            .await
            .map_err(Into::into)
    }

    /// List all tracked projects
    pub async fn list_all(&self) -> Result<Vec<Project>> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY name ASC")
            .fetch_all(self.pool)
            .await
            .map_err(Into::into)
    }

    /// Count tracked projects
    pub async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
            .fetch_one(self.pool)
            .await?;
        Ok(row.0)
    }
}
