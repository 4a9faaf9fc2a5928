//! Tally server - admin actions for the contribution mirror
//!
//! Mirrors GitHub issues from the tracked repositories into the local
//! database, on demand through authenticated admin endpoints.

mod auth;
mod routes;
mod state;
mod sync;

use std::path::PathBuf;

use clap::Parser;
use tally_core::{Config, Secrets};
use tally_db::{CreateUser, Database};
use tally_github::GitHubClient;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use state::AppContext;

/// Tally: GitHub issue mirror for contribution tracking
#[derive(Parser, Debug)]
#[command(name = "tally")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the config file (defaults to ~/.config/tally/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bind address (overrides config and env)
    #[arg(long, env = "TALLY_BIND_ADDR")]
    bind_addr: Option<String>,

    /// Database path (overrides config and env)
    #[arg(long, env = "TALLY_DB_PATH")]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load configuration with overrides
    let config =
        Config::load_with_overrides(cli.config.clone(), cli.bind_addr.clone(), cli.db_path.clone())?;

    let secrets = Secrets::load()?;
    let token = match secrets.github_token() {
        Some(token) => token,
        None => {
            if let Some(path) = Secrets::default_secrets_path() {
                if !path.exists() {
                    let created = Secrets::create_template()?;
                    anyhow::bail!(
                        "No GitHub token configured. A secrets template was written to {}",
                        created.display()
                    );
                }
            }
            anyhow::bail!(
                "No GitHub token configured. Set GITHUB_TOKEN or add it to the secrets file"
            );
        }
    };

    let db_path = match &config.server.db_path {
        Some(path) => path.clone(),
        None => Database::default_path()?,
    };
    let db = Database::new(&db_path).await?;

    bootstrap_admin(&db, &config).await?;

    let github = GitHubClient::new(config.github.owner.clone(), token)?;

    let bind_addr = config.server.bind_addr.clone();
    let app = routes::build_router(AppContext::new(config, db, github));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Tally server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the configured admin user if it doesn't exist yet
///
/// An existing row is never touched, whatever its role or email.
async fn bootstrap_admin(db: &Database, config: &Config) -> anyhow::Result<()> {
    let Some(username) = config.server.admin_user.as_deref() else {
        return Ok(());
    };
    let username = username.to_lowercase();

    if db.users().find_by_username(&username).await?.is_none() {
        db.users()
            .create(CreateUser {
                username: username.clone(),
                role: "admin".to_string(),
                email: config.server.admin_email.clone(),
            })
            .await?;
        tracing::info!(username = %username, "Bootstrapped admin user");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_config(username: &str, email: Option<&str>) -> Config {
        let mut config = Config::default();
        config.server.admin_user = Some(username.to_string());
        config.server.admin_email = email.map(String::from);
        config
    }

    #[tokio::test]
    async fn test_bootstrap_admin_creates_missing_user() {
        let db = Database::in_memory().await.unwrap();

        bootstrap_admin(&db, &admin_config("root", Some("root@example.com")))
            .await
            .unwrap();

        let user = db.users().find_by_username("root").await.unwrap().unwrap();
        assert!(user.is_admin());
        assert_eq!(user.email, Some("root@example.com".to_string()));
    }

    #[tokio::test]
    async fn test_bootstrap_admin_never_overwrites_existing_user() {
        let db = Database::in_memory().await.unwrap();
        db.users()
            .create(CreateUser {
                username: "boss".to_string(),
                role: "contributor".to_string(),
                email: None,
            })
            .await
            .unwrap();

        let config = admin_config("boss", Some("boss@example.com"));
        bootstrap_admin(&db, &config).await.unwrap();
        bootstrap_admin(&db, &config).await.unwrap();

        let user = db.users().find_by_username("boss").await.unwrap().unwrap();
        assert_eq!(user.role, "contributor");
        assert_eq!(user.email, None);
        assert_eq!(db.users().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_bootstrap_admin_normalizes_configured_name() {
        let db = Database::in_memory().await.unwrap();
        let config = admin_config("Root", None);

        bootstrap_admin(&db, &config).await.unwrap();
        // A second run finds the lowercased row instead of re-inserting
        bootstrap_admin(&db, &config).await.unwrap();

        assert!(db.users().find_by_username("root").await.unwrap().is_some());
        assert_eq!(db.users().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_bootstrap_admin_without_configured_user_is_noop() {
        let db = Database::in_memory().await.unwrap();

        bootstrap_admin(&db, &Config::default()).await.unwrap();

        assert_eq!(db.users().count().await.unwrap(), 0);
    }
}
