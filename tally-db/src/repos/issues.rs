//! Issue repository for mirrored GitHub issues

use crate::error::{Error, Result};
use crate::models::{CreateIssue, Issue, UpdateIssue};
use chrono::Utc;
use sqlx::SqlitePool;

/// Repository for managing mirrored issues
pub struct IssueRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> IssueRepository<'a> {
    /// Create a new issue repository
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new issue record
    pub async fn create(&self, issue: CreateIssue) -> Result<Issue> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO issues (
                number, project_id, title, api_url, html_url,
                level, points, is_restricted, mentor_id,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(issue.number)
        .bind(issue.project_id)
        .bind(&issue.title)
        .bind(&issue.api_url)
        .bind(&issue.html_url)
        .bind(&issue.level)
        .bind(issue.points)
        .bind(issue.is_restricted)
        .bind(issue.mentor_id)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    /// Get an issue by its internal ID
    pub async fn get_by_id(&self, id: i64) -> Result<Issue> {
        sqlx::query_as::<_, Issue>("SELECT * FROM issues WHERE id = ?")
            .bind(id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => Error::NotFound(format!("issue {}", id)),
                e => e.into(),
            })
    }

    /// Find an issue by project and issue number
    pub async fn find_by_number(&self, project_id: i64, number: i64) -> Result<Option<Issue>> {
        sqlx::query_as::<_, Issue>("SELECT * FROM issues WHERE project_id = ? AND number = ?")
            .bind(project_id)
            .bind(number)
            .fetch_optional(self.pool)
            .await
            .map_err(Into::into)
    }

    /// Refresh an issue from its upstream state
    ///
    /// Never touches `number`, `project_id`, or the URLs. The stored mentor
    /// is only rewritten when the update carries one.
    pub async fn update(&self, id: i64, update: UpdateIssue) -> Result<Issue> {
        let now = Utc::now();

        match update.mentor_id {
            Some(mentor_id) => {
                sqlx::query(
                    r#"
                    UPDATE issues
                    SET title = ?, level = ?, points = ?, is_restricted = ?,
                        mentor_id = ?, updated_at = ?
                    WHERE id = ?
                    "#,
                )
                .bind(&update.title)
                .bind(&update.level)
                .bind(update.points)
                .bind(update.is_restricted)
                .bind(mentor_id)
                .bind(now)
                .bind(id)
                .execute(self.pool)
                .await?;
            }
            None => {
                sqlx::query(
                    r#"
                    UPDATE issues
                    SET title = ?, level = ?, points = ?, is_restricted = ?,
                        updated_at = ?
                    WHERE id = ?
                    "#,
                )
                .bind(&update.title)
                .bind(&update.level)
                .bind(update.points)
                .bind(update.is_restricted)
                .bind(now)
                .bind(id)
                .execute(self.pool)
                .await?;
            }
        }

        self.get_by_id(id).await
    }

    /// List all issues for a project
    pub async fn list_by_project(&self, project_id: i64) -> Result<Vec<Issue>> {
        sqlx::query_as::<_, Issue>(
            "SELECT * FROM issues WHERE project_id = ? ORDER BY number DESC",
        )
        .bind(project_id)
        .fetch_all(self.pool)
        .await
        .map_err(Into::into)
    }

    /// Count mirrored issues
    pub async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM issues")
            .fetch_one(self.pool)
            .await?;
        Ok(row.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreateProject, CreateUser};
    use crate::Database;

    async fn setup_project(db: &Database) -> i64 {
        db.projects()
            .create(CreateProject {
                name: "website".to_string(),
                api_url: "https://api.github.com/repos/contrihub/website".to_string(),
                html_url: "https://github.com/contrihub/website".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    fn navbar_issue(project_id: i64) -> CreateIssue {
        CreateIssue {
            number: 42,
            project_id,
            title: "Fix the navbar".to_string(),
            api_url: "https://api.github.com/repos/contrihub/website/issues/42".to_string(),
            html_url: "https://github.com/contrihub/website/issues/42".to_string(),
            level: "easy".to_string(),
            points: 10,
            is_restricted: false,
            mentor_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_issue() {
        let db = Database::in_memory().await.unwrap();
        let project_id = setup_project(&db).await;
        let repo = IssueRepository::new(db.pool());

        let issue = repo.create(navbar_issue(project_id)).await.unwrap();
        assert_eq!(issue.number, 42);
        assert_eq!(issue.level, "easy");
        assert_eq!(issue.points, 10);
        assert!(!issue.is_restricted);
        assert!(issue.mentor_id.is_none());

        let found = repo.find_by_number(project_id, 42).await.unwrap().unwrap();
        assert_eq!(found.id, issue.id);

        assert!(repo.find_by_number(project_id, 7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_number_rejected() {
        let db = Database::in_memory().await.unwrap();
        let project_id = setup_project(&db).await;
        let repo = IssueRepository::new(db.pool());

        repo.create(navbar_issue(project_id)).await.unwrap();
        assert!(repo.create(navbar_issue(project_id)).await.is_err());
    }

    #[tokio::test]
    async fn test_update_preserves_urls() {
        let db = Database::in_memory().await.unwrap();
        let project_id = setup_project(&db).await;
        let repo = IssueRepository::new(db.pool());

        let issue = repo.create(navbar_issue(project_id)).await.unwrap();

        let updated = repo
            .update(
                issue.id,
                UpdateIssue {
                    title: "Fix the navbar on mobile".to_string(),
                    level: "medium".to_string(),
                    points: 20,
                    is_restricted: true,
                    mentor_id: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Fix the navbar on mobile");
        assert_eq!(updated.level, "medium");
        assert_eq!(updated.points, 20);
        assert!(updated.is_restricted);
        assert_eq!(updated.api_url, issue.api_url);
        assert_eq!(updated.html_url, issue.html_url);
        assert_eq!(updated.number, issue.number);
    }

    #[tokio::test]
    async fn test_update_without_mentor_keeps_stored_mentor() {
        let db = Database::in_memory().await.unwrap();
        let project_id = setup_project(&db).await;

        let mentor = db
            .users()
            .create(CreateUser {
                username: "alice".to_string(),
                role: "mentor".to_string(),
                email: Some("alice@example.com".to_string()),
            })
            .await
            .unwrap();

        let repo = IssueRepository::new(db.pool());
        let mut create = navbar_issue(project_id);
        create.mentor_id = Some(mentor.id);
        let issue = repo.create(create).await.unwrap();
        assert_eq!(issue.mentor_id, Some(mentor.id));

        let updated = repo
            .update(
                issue.id,
                UpdateIssue {
                    title: issue.title.clone(),
                    level: issue.level.clone(),
                    points: issue.points,
                    is_restricted: issue.is_restricted,
                    mentor_id: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.mentor_id, Some(mentor.id));
    }

    #[tokio::test]
    async fn test_list_by_project() {
        let db = Database::in_memory().await.unwrap();
        let project_id = setup_project(&db).await;
        let repo = IssueRepository::new(db.pool());

        for number in [3, 1, 2] {
            let mut create = navbar_issue(project_id);
            create.number = number;
            create.title = format!("Issue {}", number);
            repo.create(create).await.unwrap();
        }

        let issues = repo.list_by_project(project_id).await.unwrap();
        let numbers: Vec<i64> = issues.iter().map(|i| i.number).collect();
        assert_eq!(numbers, vec![3, 2, 1]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }
}
