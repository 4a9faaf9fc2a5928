//! Tally GitHub - GitHub integration for the Tally contribution tracker
//!
//! This crate provides GitHub API access for reading issues and their
//! labels from the tracked repositories.

mod client;
mod error;
mod issues;

pub use client::GitHubClient;
pub use error::{Error, Result};
pub use issues::RemoteIssue;
