//! Writer configuration
//!
//! This module contains the settings a [`Writer`](crate::Writer) applies
//! when it opens a trace: the timescale and the free-text metadata records
//! written at the top of the header.
//!
//! # Main Types
//!
//! - [`WriterConfig`] - Header metadata and timescale for a new trace
//! - [`Timescale`] - Validated `$timescale` value (1/10/100 × s..fs)
//!
//! # Persistence
//!
//! Configs are stored as pretty-printed JSON. All fields are optional in the
//! file; missing fields take their defaults so hand-written configs can stay
//! short.

pub mod timescale;

pub use timescale::{TimeUnit, Timescale};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, VcdError};

/// Date format used when no fixed date is configured
pub const DEFAULT_DATE_FORMAT: &str = "%m-%d-%Y %H:%M:%S";

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_true() -> bool {
    true
}

/// Header settings for a new trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Timescale written to `$timescale`
    #[serde(default)]
    pub timescale: Timescale,

    /// Text of the `$version` record, omitted when `None`
    #[serde(default)]
    pub version: Option<String>,

    /// One `$comment` record per entry
    #[serde(default)]
    pub comments: Vec<String>,

    /// Fixed `$date` text; the current local time is used when `None`
    #[serde(default)]
    pub date: Option<String>,

    /// chrono format string for the generated date
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Whether to write a `$date` record at all
    #[serde(default = "default_true")]
    pub include_date: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            timescale: Timescale::default(),
            version: None,
            comments: Vec::new(),
            date: None,
            date_format: default_date_format(),
            include_date: true,
        }
    }
}

impl WriterConfig {
    /// Create a config with the given timescale and default metadata
    pub fn new(timescale: Timescale) -> Self {
        Self {
            timescale,
            ..Default::default()
        }
    }

    /// Set the timescale
    pub fn with_timescale(mut self, timescale: Timescale) -> Self {
        self.timescale = timescale;
        self
    }

    /// Set the version record
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Append a comment record
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.push(comment.into());
        self
    }

    /// Use a fixed date instead of the current time
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Skip the `$date` record
    pub fn without_date(mut self) -> Self {
        self.include_date = false;
        self
    }

    /// Text for the `$date` record, or `None` when disabled
    pub fn date_text(&self) -> Option<String> {
        if !self.include_date {
            return None;
        }
        if let Some(date) = &self.date {
            return Some(date.clone());
        }

        use std::fmt::Write;
        let now = chrono::Local::now();
        let mut text = String::new();
        if write!(text, "{}", now.format(&self.date_format)).is_err() {
            tracing::warn!(
                "Invalid date format {:?}, falling back to {:?}",
                self.date_format,
                DEFAULT_DATE_FORMAT
            );
            text = now.format(DEFAULT_DATE_FORMAT).to_string();
        }
        Some(text)
    }

    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            VcdError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            VcdError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })
    }

    /// Load a config file, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load writer config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save config to disk as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                VcdError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| VcdError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            VcdError::Config(format!("Failed to write config file {:?}: {}", path, e))
        })
    }
}
