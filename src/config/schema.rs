//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::annotations::cache::DEFAULT_CACHE_ROOT;
use crate::annotations::resolver::DEFAULT_ANNOTATION_PREFIX;
use crate::storage::DEFAULT_DIR_MODE;

/// Root configuration for the annotation translator.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ControllerConfig {
    /// Annotation lookup settings.
    pub annotations: AnnotationsConfig,

    /// Cache zone storage settings.
    pub cache: CacheStorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Annotation lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnnotationsConfig {
    /// Prefix of every annotation name, without the trailing slash.
    pub prefix: String,
}

impl Default for AnnotationsConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_ANNOTATION_PREFIX.to_string(),
        }
    }
}

/// Cache zone storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheStorageConfig {
    /// Absolute directory holding one sub-directory per resource.
    pub root: String,

    /// Permission bits for created directories (e.g. 0o777).
    pub dir_mode: u32,

    /// Create cache zone directories while building configs.
    pub create_dirs: bool,
}

impl Default for CacheStorageConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_CACHE_ROOT.to_string(),
            dir_mode: DEFAULT_DIR_MODE,
            create_dirs: true,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of human readable text.
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}
