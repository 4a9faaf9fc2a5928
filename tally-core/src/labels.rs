//! Label parsing for issue categorization
//!
//! Tracked repositories annotate issues through their labels: the label
//! *description* names the category and the label *name* carries the value.
//! A label described as "mentor" names the mentor, one described as "level"
//! names the difficulty, one described as "points" overrides the point
//! value, and a label *named* "restricted" marks the issue as restricted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::LabelConfig;
use crate::{Error, Result};

/// A label as it appears on a tracked issue
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelDescriptor {
    /// Label name (the visible text)
    pub name: String,

    /// Label description (the category marker, if any)
    #[serde(default)]
    pub description: String,
}

impl LabelDescriptor {
    /// Create a label descriptor
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Difficulty level assigned to an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Free,
    VeryEasy,
    Easy,
    Medium,
    Hard,
}

/// Label spellings recognized for each level
const LEVEL_NAMES: [(&str, Level); 5] = [
    ("free", Level::Free),
    ("very easy", Level::VeryEasy),
    ("easy", Level::Easy),
    ("medium", Level::Medium),
    ("hard", Level::Hard),
];

impl Level {
    /// Storage token for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Free => "free",
            Level::VeryEasy => "very_easy",
            Level::Easy => "easy",
            Level::Medium => "medium",
            Level::Hard => "hard",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "free" => Ok(Level::Free),
            "very_easy" => Ok(Level::VeryEasy),
            "easy" => Ok(Level::Easy),
            "medium" => Ok(Level::Medium),
            "hard" => Ok(Level::Hard),
            other => Err(Error::Parse(format!("Unknown level token: {}", other))),
        }
    }
}

/// Categorization extracted from one issue's labels
///
/// Later labels overwrite earlier matches of the same category; the
/// restricted flag is sticky once set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLabels {
    /// Mentor username, lowercased; empty when the label name was empty
    #[serde(default)]
    pub mentor: Option<String>,

    /// Difficulty level
    #[serde(default)]
    pub level: Option<Level>,

    /// Points awarded for completing the issue
    #[serde(default)]
    pub points: i64,

    /// Whether the issue is restricted to selected contributors
    #[serde(default)]
    pub restricted: bool,
}

/// Parse an issue's labels into its categorization
///
/// Each label is checked against all four categories in a single pass.
/// Marker comparison is case-insensitive.
pub fn parse_labels(labels: &[LabelDescriptor], config: &LabelConfig) -> ParsedLabels {
    let mut parsed = ParsedLabels::default();

    for label in labels {
        if label.description.eq_ignore_ascii_case(&config.mentor) {
            parsed.mentor = Some(label.name.to_lowercase());
        }

        if label.description.eq_ignore_ascii_case(&config.level) {
            let (level, points) = parse_level(&label.name, config);
            parsed.level = Some(level);
            parsed.points = points;
        }

        if label.description.eq_ignore_ascii_case(&config.points) {
            parsed.points = parse_points(&label.name);
        }

        if label.name.eq_ignore_ascii_case(&config.restricted) {
            parsed.restricted = true;
        }
    }

    debug!(?parsed, "Parsed issue labels");
    parsed
}

/// Match a level label name against the known spellings
///
/// Unrecognized names fall back to easy with its default points.
fn parse_level(name: &str, config: &LabelConfig) -> (Level, i64) {
    for (spelling, level) in LEVEL_NAMES {
        if name.eq_ignore_ascii_case(spelling) {
            return (level, config.default_points(level));
        }
    }

    warn!(name, "Unrecognized level label, falling back to easy");
    (Level::Easy, config.default_points(Level::Easy))
}

/// Parse a points label name into a point value
///
/// Only unsigned digit strings count; anything else is worth zero.
fn parse_points(name: &str) -> i64 {
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        warn!(name, "Non-numeric points label, treating as zero");
        return 0;
    }

    name.parse().unwrap_or_else(|_| {
        warn!(name, "Points label out of range, treating as zero");
        0
    })
}
