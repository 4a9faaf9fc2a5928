//! Issue fetching from tracked repositories

use crate::{Error, GitHubClient, Result};
use octocrab::models::issues::Issue as OctocrabIssue;
use serde::{Deserialize, Serialize};
use tally_core::labels::LabelDescriptor;
use tracing::{debug, info};

/// Issue as fetched from GitHub, reduced to what the sync needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteIssue {
    /// Issue number within its repository
    pub number: u64,
    /// Issue title
    pub title: String,
    /// Login of the user who opened the issue
    pub author: String,
    /// API URL of the issue
    pub api_url: String,
    /// Web URL of the issue
    pub html_url: String,
    /// Whether this issue is actually a pull request
    pub is_pull_request: bool,
    /// Labels attached to the issue
    #[serde(default)]
    pub labels: Vec<LabelDescriptor>,
}

/// Build a label descriptor from GitHub label fields
///
/// GitHub reports a missing description as null; it carries no category
/// marker either way, so it maps to the empty string.
fn label_from_parts(name: String, description: Option<String>) -> LabelDescriptor {
    LabelDescriptor {
        name,
        description: description.unwrap_or_default(),
    }
}

impl From<OctocrabIssue> for RemoteIssue {
    fn from(issue: OctocrabIssue) -> Self {
        RemoteIssue {
            number: issue.number,
            title: issue.title,
            author: issue.user.login,
            api_url: issue.url.to_string(),
            html_url: issue.html_url.to_string(),
            is_pull_request: issue.pull_request.is_some(),
            labels: issue
                .labels
                .into_iter()
                .map(|l| label_from_parts(l.name, l.description))
                .collect(),
        }
    }
}

impl GitHubClient {
    /// List all issues of a repository (paginating through all pages)
    ///
    /// Fetches every state; pull requests are included because the issues
    /// endpoint reports them too, flagged via `is_pull_request`.
    pub async fn list_all_issues(&self, repo: &str) -> Result<Vec<RemoteIssue>> {
        debug!(repo, "Listing all issues with pagination");

        let mut all_issues = Vec::new();

        let mut page_num = 1u32;
        loop {
            let issues = self
                .client()
                .issues(self.owner(), repo)
                .list()
                .state(octocrab::params::State::All)
                .per_page(100)
                .page(page_num)
                .send()
                .await
                .map_err(Error::Api)?;

            let items: Vec<RemoteIssue> = issues.items.into_iter().map(RemoteIssue::from).collect();

            if items.is_empty() {
                break;
            }

            all_issues.extend(items);
            page_num += 1;
        }

        info!(repo, count = all_issues.len(), "Fetched all issues");

        Ok(all_issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_without_description_maps_to_empty() {
        let label = label_from_parts("easy".to_string(), None);
        assert_eq!(label.name, "easy");
        assert_eq!(label.description, "");
    }

    #[test]
    fn test_label_with_description() {
        let label = label_from_parts("alice".to_string(), Some("mentor".to_string()));
        assert_eq!(label.description, "mentor");
    }

    #[test]
    fn test_remote_issue_labels_default() {
        let json = r#"{
            "number": 12,
            "title": "Fix the navbar",
            "author": "alice",
            "api_url": "https://api.github.com/repos/contrihub/website/issues/12",
            "html_url": "https://github.com/contrihub/website/issues/12",
            "is_pull_request": false
        }"#;
        let issue: RemoteIssue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.number, 12);
        assert!(issue.labels.is_empty());
    }
}
