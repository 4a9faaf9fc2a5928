//! GitHub API client using octocrab

use crate::{Error, Result};
use octocrab::Octocrab;
use tracing::info;

/// GitHub API client scoped to the owner of the tracked repositories
///
/// One client serves every tracked repository under the configured owner;
/// per-repository calls take the repository name as an argument.
#[derive(Clone)]
pub struct GitHubClient {
    client: Octocrab,
    owner: String,
}

impl GitHubClient {
    /// Create a new GitHub client for the given owner
    ///
    /// The token comes from the caller so the client itself never touches
    /// the environment or the secrets file.
    pub fn new(owner: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let owner = owner.into();

        let client = Octocrab::builder()
            .personal_token(token.into())
            .build()
            .map_err(|e| Error::Auth(format!("Failed to create GitHub client: {}", e)))?;

        info!(owner = %owner, "Created GitHub client");

        Ok(Self { client, owner })
    }

    /// Get the owner of the tracked repositories
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Get the underlying octocrab client
    pub fn client(&self) -> &Octocrab {
        &self.client
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_construction() {
        let client = GitHubClient::new("contrihub", "ghp_test").unwrap();
        assert_eq!(client.owner(), "contrihub");
    }
}
