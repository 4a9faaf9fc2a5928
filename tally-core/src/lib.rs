//! Tally Core - Core library for the Tally contribution tracker
//!
//! This crate provides the configuration layer, secrets handling, and the
//! label parsing rules shared by the Tally services.

pub mod config;
pub mod error;
pub mod labels;
pub mod secrets;

pub use config::{Config, GithubConfig, LabelConfig, ServerConfig};
pub use error::{Error, Result};
pub use labels::{parse_labels, LabelDescriptor, Level, ParsedLabels};
pub use secrets::Secrets;
