//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (dir mode, log level)
//! - Reject paths and prefixes that would produce surprising annotation
//!   names or cache locations
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ControllerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::path::Path;

use thiserror::Error;

use crate::config::schema::ControllerConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("cache.root {0:?} must be an absolute path")]
    RelativeCacheRoot(String),

    #[error("cache.dir_mode {0:#o} exceeds 0o7777")]
    InvalidDirMode(u32),

    #[error("observability.log_level {0:?} is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),

    #[error("annotations.prefix {0:?} must not contain whitespace or end with '/'")]
    InvalidPrefix(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ControllerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !Path::new(&config.cache.root).is_absolute() {
        errors.push(ValidationError::RelativeCacheRoot(config.cache.root.clone()));
    }

    if config.cache.dir_mode > 0o7777 {
        errors.push(ValidationError::InvalidDirMode(config.cache.dir_mode));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    let prefix = &config.annotations.prefix;
    if prefix.ends_with('/') || prefix.chars().any(char::is_whitespace) {
        errors.push(ValidationError::InvalidPrefix(prefix.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
