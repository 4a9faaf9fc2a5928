//! Shared application state

use std::sync::Arc;

use tally_core::Config;
use tally_db::Database;
use tally_github::GitHubClient;

/// Shared application state, cheap to clone
#[derive(Clone)]
pub struct AppContext {
    /// Loaded configuration
    pub config: Arc<Config>,

    /// Database handle
    pub db: Database,

    /// GitHub API client
    pub github: GitHubClient,
}

impl AppContext {
    /// Create a new application context
    pub fn new(config: Config, db: Database, github: GitHubClient) -> Self {
        Self {
            config: Arc::new(config),
            db,
            github,
        }
    }
}
