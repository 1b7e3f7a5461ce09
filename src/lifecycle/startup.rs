//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Wire the resolver and directory capabilities into a parser
//!
//! # Design Decisions
//! - Fail fast: a bad config file is fatal, a bad annotation never is

use std::path::Path;

use crate::annotations::{CacheParser, PrefixedResolver};
use crate::config::{load_config, ConfigError, ControllerConfig};
use crate::storage::{CacheDirectories, FsDirectories, NoopDirectories};

/// Directory capability chosen at startup.
pub type DynDirectories = Box<dyn CacheDirectories + Send + Sync>;

/// Parser type used by the binary.
pub type ConfiguredCacheParser = CacheParser<PrefixedResolver, DynDirectories>;

/// Load the config file if one was given, defaults otherwise.
pub fn load_or_default(path: Option<&Path>) -> Result<ControllerConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(ControllerConfig::default()),
    }
}

/// Build a cache parser from configuration.
///
/// `dry_run` disables directory creation regardless of `cache.create_dirs`.
pub fn build_cache_parser(config: &ControllerConfig, dry_run: bool) -> ConfiguredCacheParser {
    let directories: DynDirectories = if config.cache.create_dirs && !dry_run {
        Box::new(FsDirectories::new(config.cache.dir_mode))
    } else {
        Box::new(NoopDirectories)
    };

    tracing::debug!(
        prefix = %config.annotations.prefix,
        root = %config.cache.root,
        create_dirs = config.cache.create_dirs && !dry_run,
        "Cache parser configured"
    );

    CacheParser::new(PrefixedResolver::new(config.annotations.prefix.clone()), directories)
        .with_root(config.cache.root.clone())
}
