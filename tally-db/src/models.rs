//! Data models for database records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tracked project mirroring a GitHub repository
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique identifier for this project
    pub id: i64,

    /// Repository name, unique among tracked projects
    pub name: String,

    /// API URL of the repository; written once at creation
    pub api_url: String,

    /// Web URL of the repository; written once at creation
    pub html_url: String,

    /// When this record was created
    pub created_at: DateTime<Utc>,
}

/// Registered user record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique identifier for this user
    pub id: i64,

    /// GitHub login, stored lowercased
    pub username: String,

    /// Role (e.g., "admin", "mentor", "contributor")
    pub role: String,

    /// Contact email; empty or missing means the profile is incomplete
    pub email: Option<String>,

    /// When this record was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Check whether this user has the admin role
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// Check whether the profile is complete (non-empty email)
    pub fn has_complete_profile(&self) -> bool {
        self.email.as_deref().is_some_and(|email| !email.is_empty())
    }
}

/// Mirrored issue record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Issue {
    /// Unique identifier for this issue record
    pub id: i64,

    /// Issue number within its repository
    pub number: i64,

    /// Project this issue belongs to
    pub project_id: i64,

    /// Issue title, refreshed on every sync
    pub title: String,

    /// API URL of the issue; written once at creation
    pub api_url: String,

    /// Web URL of the issue; written once at creation
    pub html_url: String,

    /// Difficulty level token (e.g., "easy", "very_easy")
    pub level: String,

    /// Points awarded for completing the issue
    pub points: i64,

    /// Whether the issue is restricted to selected contributors
    pub is_restricted: bool,

    /// Assigned mentor, if one resolved to a registered user
    pub mentor_id: Option<i64>,

    /// When this record was created
    pub created_at: DateTime<Utc>,

    /// When this record was last refreshed
    pub updated_at: DateTime<Utc>,
}

/// Fields for inserting a project
#[derive(Debug, Clone)]
pub struct CreateProject {
    /// Repository name
    pub name: String,

    /// API URL of the repository
    pub api_url: String,

    /// Web URL of the repository
    pub html_url: String,
}

/// Fields for inserting a user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// GitHub login
    pub username: String,

    /// Role (e.g., "admin", "mentor", "contributor")
    pub role: String,

    /// Contact email
    pub email: Option<String>,
}

/// Fields for inserting an issue
#[derive(Debug, Clone)]
pub struct CreateIssue {
    /// Issue number within its repository
    pub number: i64,

    /// Project this issue belongs to
    pub project_id: i64,

    /// Issue title
    pub title: String,

    /// API URL of the issue
    pub api_url: String,

    /// Web URL of the issue
    pub html_url: String,

    /// Difficulty level token
    pub level: String,

    /// Points awarded for completing the issue
    pub points: i64,

    /// Whether the issue is restricted
    pub is_restricted: bool,

    /// Resolved mentor, if any
    pub mentor_id: Option<i64>,
}

/// Fields applied when refreshing an issue from its upstream state
///
/// URLs and the issue number are never rewritten; `mentor_id` of `None`
/// leaves the stored mentor unchanged.
#[derive(Debug, Clone)]
pub struct UpdateIssue {
    /// Issue title
    pub title: String,

    /// Difficulty level token
    pub level: String,

    /// Points awarded for completing the issue
    pub points: i64,

    /// Whether the issue is restricted
    pub is_restricted: bool,

    /// Resolved mentor; `None` leaves the stored mentor unchanged
    pub mentor_id: Option<i64>,
}
