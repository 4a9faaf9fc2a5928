//! Configuration management for Tally
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (TALLY_*)
//! 3. Config file (~/.config/tally/config.toml)
//! 4. Default values

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::labels::Level;
use crate::{Error, Result};

/// GitHub-related configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Organization or user owning the tracked repositories
    pub owner: String,

    /// Repository names to track
    pub projects: Vec<String>,

    /// Login whose issues are ignored during sync
    pub bot_login: String,

    /// Base URL for issue API endpoints; derived from `owner` when unset
    pub api_base_url: Option<String>,

    /// Base URL for issue web pages; derived from `owner` when unset
    pub html_base_url: Option<String>,
}

impl GithubConfig {
    /// API base URL, including the trailing slash
    pub fn api_base(&self) -> String {
        self.api_base_url
            .clone()
            .unwrap_or_else(|| format!("https://api.github.com/repos/{}/", self.owner))
    }

    /// Web base URL, including the trailing slash
    pub fn html_base(&self) -> String {
        self.html_base_url
            .clone()
            .unwrap_or_else(|| format!("https://github.com/{}/", self.owner))
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            owner: "tally-hub".to_string(),
            projects: Vec::new(),
            bot_login: "dependabot[bot]".to_string(),
            api_base_url: None,
            html_base_url: None,
        }
    }
}

/// Label parsing configuration
///
/// Marker strings are matched against label descriptions (against the label
/// name for `restricted`). The per-level point values apply when no points
/// label overrides them.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Description marking a mentor label
    pub mentor: String,

    /// Description marking a level label
    pub level: String,

    /// Description marking a points label
    pub points: String,

    /// Name marking an issue as restricted
    pub restricted: String,

    /// Default points for free issues
    pub free_points: i64,

    /// Default points for very easy issues
    pub very_easy_points: i64,

    /// Default points for easy issues
    pub easy_points: i64,

    /// Default points for medium issues
    pub medium_points: i64,

    /// Default points for hard issues
    pub hard_points: i64,
}

impl LabelConfig {
    /// Default points awarded for the given level
    pub fn default_points(&self, level: Level) -> i64 {
        match level {
            Level::Free => self.free_points,
            Level::VeryEasy => self.very_easy_points,
            Level::Easy => self.easy_points,
            Level::Medium => self.medium_points,
            Level::Hard => self.hard_points,
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            mentor: "mentor".to_string(),
            level: "level".to_string(),
            points: "points".to_string(),
            restricted: "restricted".to_string(),
            free_points: 0,
            very_easy_points: 5,
            easy_points: 10,
            medium_points: 20,
            hard_points: 40,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the server listens on
    pub bind_addr: String,

    /// Where the populate actions redirect after finishing
    pub redirect_to: String,

    /// Database file path; platform data dir when unset
    pub db_path: Option<PathBuf>,

    /// Admin user created at startup if missing
    pub admin_user: Option<String>,

    /// Email for the bootstrapped admin user
    pub admin_email: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            redirect_to: "/".to_string(),
            db_path: None,
            admin_user: None,
            admin_email: None,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// GitHub configuration
    pub github: GithubConfig,

    /// Label parsing configuration
    pub labels: LabelConfig,

    /// Server configuration
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/tally/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tally").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - TALLY_OWNER: owner of the tracked repositories
    /// - TALLY_BIND_ADDR: server bind address
    /// - TALLY_DB_PATH: database file path
    /// - TALLY_REDIRECT_TO: redirect target for the populate actions
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(owner) = std::env::var("TALLY_OWNER") {
            self.github.owner = owner;
        }

        if let Ok(bind_addr) = std::env::var("TALLY_BIND_ADDR") {
            self.server.bind_addr = bind_addr;
        }

        if let Ok(db_path) = std::env::var("TALLY_DB_PATH") {
            self.server.db_path = Some(PathBuf::from(db_path));
        }

        if let Ok(redirect_to) = std::env::var("TALLY_REDIRECT_TO") {
            self.server.redirect_to = redirect_to;
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(
        mut self,
        bind_addr: Option<String>,
        db_path: Option<PathBuf>,
    ) -> Self {
        if let Some(addr) = bind_addr {
            self.server.bind_addr = addr;
        }

        if let Some(path) = db_path {
            self.server.db_path = Some(path);
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(
        config_path: Option<PathBuf>,
        bind_addr: Option<String>,
        db_path: Option<PathBuf>,
    ) -> Result<Self> {
        let config = match config_path {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::load()?,
        };

        Ok(config
            .with_env_overrides()
            .with_cli_overrides(bind_addr, db_path))
    }
}
