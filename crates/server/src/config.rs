//! Pipeline configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use video_sources::{DEFAULT_SEARCH_LIMIT, DEFAULT_VIDEO_TIMEOUT};
use vision_client::DEFAULT_VISION_TIMEOUT;

/// Largest page the video search endpoint serves
pub const MAX_SEARCH_LIMIT: usize = 50;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        name: String,
        value: usize,
        min: usize,
        max: usize,
    },
}

/// Timeouts and limits of the recommendation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Bound on the vision model call; elapsing it fails the request
    pub vision_timeout: Duration,
    /// Bound on each video platform call; elapsing it empties that recipe's videos
    pub video_timeout: Duration,
    /// Candidate ids requested per video search
    pub search_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            vision_timeout: DEFAULT_VISION_TIMEOUT,
            video_timeout: DEFAULT_VIDEO_TIMEOUT,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `SNAPCOOK_VISION_TIMEOUT_SECS` (default: 60)
    /// - `SNAPCOOK_VIDEO_TIMEOUT_SECS` (default: 10)
    /// - `SNAPCOOK_VIDEO_SEARCH_LIMIT` (default: 10, allowed 1..=50)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            vision_timeout: parse_var::<u64>("SNAPCOOK_VISION_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.vision_timeout),
            video_timeout: parse_var::<u64>("SNAPCOOK_VIDEO_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.video_timeout),
            search_limit: parse_var::<usize>("SNAPCOOK_VIDEO_SEARCH_LIMIT")?
                .map(|limit| check_search_limit("SNAPCOOK_VIDEO_SEARCH_LIMIT", limit))
                .transpose()?
                .unwrap_or(defaults.search_limit),
        })
    }
}

/// Read and parse an optional variable; unset means `None`, garbage is an error
fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(value) => parse_value(name, &value).map(Some),
        Err(_) => Ok(None),
    }
}

fn check_search_limit(name: &str, limit: usize) -> Result<usize, ConfigError> {
    if (1..=MAX_SEARCH_LIMIT).contains(&limit) {
        Ok(limit)
    } else {
        Err(ConfigError::OutOfRange {
            name: name.to_string(),
            value: limit,
            min: 1,
            max: MAX_SEARCH_LIMIT,
        })
    }
}

fn parse_value<T: FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    })
}
