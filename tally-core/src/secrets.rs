//! GitHub token storage
//!
//! The issue sync needs one service-owned GitHub token to read the tracked
//! repositories. It comes from the `GITHUB_TOKEN` environment variable when
//! set, otherwise from `~/.config/tally/secrets.toml`. The file lives
//! outside the main config so the rest of the configuration can be shared
//! freely, and it must be unreadable to group and world (0600 on Unix).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Contents of the secrets file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Secrets {
    /// GitHub token section
    pub github: GitHubSecrets,
}

/// GitHub credentials
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GitHubSecrets {
    /// Personal access token used to read issues
    pub token: Option<String>,
}

/// Reject a secrets file readable by group or world
#[cfg(unix)]
fn reject_lax_permissions(path: &std::path::Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = std::fs::metadata(path).map_err(Error::Io)?;
    let mode = metadata.permissions().mode();

    if mode & 0o077 != 0 {
        return Err(Error::Config(format!(
            "Secrets file {} has insecure permissions {:o}. \
             Please run: chmod 600 {}",
            path.display(),
            mode & 0o777,
            path.display()
        )));
    }

    debug!(path = %path.display(), mode = format!("{:o}", mode & 0o777), "Secrets file permissions OK");
    Ok(())
}

impl Secrets {
    /// Load secrets from the default location
    ///
    /// A missing file is not an error; it yields empty secrets and the
    /// token may still arrive through the environment.
    pub fn load() -> Result<Self> {
        let secrets_path = Self::default_secrets_path();

        if let Some(path) = secrets_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load secrets from a specific file, checking its permissions first
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        #[cfg(unix)]
        reject_lax_permissions(path)?;

        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        let mut secrets: Secrets = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse secrets: {}", e)))?;

        if let Some(ref mut token) = secrets.github.token {
            *token = token.trim().to_string();
        }

        Ok(secrets)
    }

    /// Default secrets file path (`~/.config/tally/secrets.toml`)
    pub fn default_secrets_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tally").join("secrets.toml"))
    }

    /// GitHub token for the issue sync
    ///
    /// `GITHUB_TOKEN` wins over the file; blank values count as unset.
    pub fn github_token(&self) -> Option<String> {
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            let token = token.trim().to_string();
            if !token.is_empty() {
                debug!("GitHub token taken from the environment");
                return Some(token);
            }
        }

        if let Some(ref token) = self.github.token {
            if !token.is_empty() {
                debug!("GitHub token taken from the secrets file");
                return Some(token.clone());
            }
        }

        None
    }

    /// Write a starter secrets file at the default location
    ///
    /// Refuses to overwrite an existing file. On Unix the new file is
    /// chmodded to 0600 so a later load passes the permission gate.
    pub fn create_template() -> Result<PathBuf> {
        let path = Self::default_secrets_path()
            .ok_or_else(|| Error::Config("Could not determine secrets path".to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(Error::Io)?;
        }

        if path.exists() {
            return Err(Error::Config(format!(
                "Secrets file already exists at {}",
                path.display()
            )));
        }

        let template = r#"# Tally Secrets
# This file contains sensitive credentials - do not share or commit to version control
#
# IMPORTANT: This file must have restrictive permissions (chmod 600)

[github]
# GitHub Personal Access Token used to read issues from tracked repositories
# Create at: https://github.com/settings/tokens
# Required permissions: repo read (or fine-grained: Issues read)
token = ""
"#;

        std::fs::write(&path, template).map_err(Error::Io)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&path, perms).map_err(Error::Io)?;
        }

        warn!(path = %path.display(), "Wrote a secrets template, add a GitHub token before starting the sync");

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_secrets() {
        let secrets = Secrets::default();
        assert!(secrets.github.token.is_none());
    }

    #[test]
    fn test_parse_secrets() {
        let toml = r#"
[github]
token = "ghp_xxxxxxxxxxxx"
"#;
        let secrets: Secrets = toml::from_str(toml).unwrap();
        assert_eq!(secrets.github.token, Some("ghp_xxxxxxxxxxxx".to_string()));
    }

    #[test]
    fn test_token_with_whitespace() {
        let toml = r#"
[github]
token = "  ghp_xxxxxxxxxxxx  "
"#;
        let secrets: Secrets = toml::from_str(toml).unwrap();
        // toml preserves whitespace, load_from_file trims it
        assert!(secrets.github.token.as_ref().unwrap().contains("ghp_"));
    }

    #[cfg(unix)]
    #[test]
    fn test_insecure_permissions_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[github]\ntoken = \"test\"").unwrap();

        // World-readable must be rejected
        let perms = std::fs::Permissions::from_mode(0o644);
        std::fs::set_permissions(file.path(), perms).unwrap();

        let result = Secrets::load_from_file(&file.path().to_path_buf());
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("insecure permissions"));
    }

    #[cfg(unix)]
    #[test]
    fn test_secure_permissions_accepted() {
        use std::os::unix::fs::PermissionsExt;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[github]\ntoken = \"ghp_test\"").unwrap();

        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(file.path(), perms).unwrap();

        let result = Secrets::load_from_file(&file.path().to_path_buf());
        assert!(result.is_ok());
        assert_eq!(result.unwrap().github.token, Some("ghp_test".to_string()));
    }
}
