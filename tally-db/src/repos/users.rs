//! User repository for registered contributors

use crate::error::{Error, Result};
use crate::models::{CreateUser, User};
use chrono::Utc;
use sqlx::SqlitePool;

/// Repository for managing registered users
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user record
    ///
    /// The username is stored lowercased. GitHub logins are
    /// case-insensitive and mentor labels arrive lowercased, so the stored
    /// form has to match.
    pub async fn create(&self, user: CreateUser) -> Result<User> {
        let now = Utc::now();
        let username = user.username.to_lowercase();

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, role, email, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&username)
        .bind(&user.role)
        .bind(&user.email)
        .bind(now)
        .execute(self.pool)
        .await?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    /// Get a user by their internal ID
    pub async fn get_by_id(&self, id: i64) -> Result<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => Error::NotFound(format!("user {}", id)),
                e => e.into(),
            })
    }

    /// Find a user by username
    ///
    /// Matching is exact; stored usernames are lowercase.
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(self.pool)
            .await
            .map_err(Into::into)
    }

    /// Count registered users
    pub async fn count(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(row.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    #[tokio::test]
    async fn test_create_and_find_user() {
        let db = Database::in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let user = repo
            .create(CreateUser {
                username: "alice".to_string(),
                role: "mentor".to_string(),
                email: Some("alice@example.com".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(user.username, "alice");
        assert!(!user.is_admin());
        assert!(user.has_complete_profile());

        let found = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        assert!(repo.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_username_stored_lowercased() {
        let db = Database::in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let user = repo
            .create(CreateUser {
                username: "AliceDev".to_string(),
                role: "mentor".to_string(),
                email: Some("alice@example.com".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(user.username, "alicedev");
        assert!(repo.find_by_username("alicedev").await.unwrap().is_some());
        // Lookups stay exact; the lowercased form is the only stored one
        assert!(repo.find_by_username("AliceDev").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let db = Database::in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool());

        let alice = CreateUser {
            username: "alice".to_string(),
            role: "contributor".to_string(),
            email: None,
        };

        repo.create(alice.clone()).await.unwrap();
        assert!(repo.create(alice).await.is_err());

        // Case variants collapse to the same stored row
        let shouting = CreateUser {
            username: "ALICE".to_string(),
            role: "contributor".to_string(),
            email: None,
        };
        assert!(repo.create(shouting).await.is_err());
    }
}
