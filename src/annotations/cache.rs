//! Cache annotations.
//!
//! # Responsibilities
//! - Translate `cache-*` annotations into a `CacheConfig`
//! - Make sure the cache zone directory exists
//! - Detect configuration changes between reconciliation passes
//!
//! # Design Decisions
//! - Every field has a literal default; a bad or absent annotation never
//!   fails the parse
//! - Fields are resolved independently, no cross-field checks
//! - Directory creation is best-effort: errors are logged, not returned

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::annotations::resolver::{resolve_or, AnnotationResolver};
use crate::annotations::resource::Resource;
use crate::annotations::AnnotationParser;
use crate::nginx::{OnOff, Size, Time};
use crate::storage::CacheDirectories;

pub const ENABLE_CACHE: &str = "enable-cache";
pub const CACHE_LEVELS: &str = "cache-levels";
pub const CACHE_MAX_SIZE: &str = "cache-max-size";
pub const CACHE_METHODS: &str = "cache-methods";
pub const CACHE_INACTIVE_TIMEOUT: &str = "cache-inactive-timeout";
pub const CACHE_USE_STALE: &str = "cache-use-stale";
pub const CACHE_REVALIDATE: &str = "cache-revalidate";
pub const CACHE_MIN_USES: &str = "cache-min-uses";
pub const CACHE_ADD_STATUS_HEADER: &str = "cache-add-status-header";
pub const CACHE_VALID_FOR: &str = "cache-valid-for";

pub const DEFAULT_ENABLED: bool = false;
pub const DEFAULT_LEVELS: &str = "1:2";
pub const DEFAULT_MAX_SIZE: &str = "100m";
pub const DEFAULT_METHODS: &str = "GET HEAD";
pub const DEFAULT_INACTIVE_TIMEOUT: &str = "60m";
pub const DEFAULT_USE_STALE: &str = "error timeout updating http_500 http_502 http_503 http_504";
pub const DEFAULT_REVALIDATE: &str = "on";
pub const DEFAULT_MIN_USES: i64 = 3;
pub const DEFAULT_ADD_STATUS_HEADER: bool = true;
pub const DEFAULT_TTL: &str = "10m";

/// Directory under which cache zones are created.
pub const DEFAULT_CACHE_ROOT: &str = "/cache";

/// Cache configuration for one routing resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    pub enabled: bool,
    /// Cache zone name, `{namespace}-{name}`.
    pub name: String,
    pub add_status_header: bool,
    pub inactive_timeout: Time,
    /// Directory hashing scheme, e.g. `1:2`.
    pub levels: String,
    pub max_size: Size,
    /// Space separated HTTP methods eligible for caching.
    pub methods: String,
    pub min_uses: i64,
    /// Cache zone directory, `{root}/{namespace}/{name}`.
    pub path: String,
    /// `on` or `off`; kept as text so unexpected values survive to validation.
    pub revalidate: String,
    pub ttl: Time,
    /// Space separated conditions under which stale content is served.
    pub use_stale: String,
}

impl CacheConfig {
    /// Compare two optional configurations.
    ///
    /// Two absent configurations are equal; one absent is not.
    pub fn equal(lhs: Option<&CacheConfig>, rhs: Option<&CacheConfig>) -> bool {
        match (lhs, rhs) {
            (None, None) => true,
            (Some(a), Some(b)) => std::ptr::eq(a, b) || a == b,
            _ => false,
        }
    }

    /// The `revalidate` value as a flag, `None` if it is neither `on` nor `off`.
    pub fn revalidate_flag(&self) -> Option<OnOff> {
        self.revalidate.parse().ok()
    }

    /// Check every value against what nginx will accept.
    ///
    /// Returns all problems found, not just the first.
    pub fn validate(&self) -> Result<(), Vec<CacheConfigIssue>> {
        let mut issues = Vec::new();

        if !self.max_size.validate() {
            issues.push(CacheConfigIssue::InvalidSize {
                field: "maxSize",
                value: self.max_size.to_string(),
            });
        }

        for (field, time) in [("inactiveTimeout", &self.inactive_timeout), ("ttl", &self.ttl)] {
            if !time.validate() {
                issues.push(CacheConfigIssue::InvalidTime {
                    field,
                    value: time.to_string(),
                });
            }
        }

        if self.revalidate_flag().is_none() {
            issues.push(CacheConfigIssue::InvalidRevalidate(self.revalidate.clone()));
        }

        if self.min_uses < 0 {
            issues.push(CacheConfigIssue::NegativeMinUses(self.min_uses));
        }

        if !valid_levels(&self.levels) {
            issues.push(CacheConfigIssue::InvalidLevels(self.levels.clone()));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

/// A value nginx would reject.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheConfigIssue {
    #[error("{field} {value:?} is not a valid size")]
    InvalidSize { field: &'static str, value: String },

    #[error("{field} {value:?} is not a valid time interval")]
    InvalidTime { field: &'static str, value: String },

    #[error("revalidate {0:?} must be \"on\" or \"off\"")]
    InvalidRevalidate(String),

    #[error("minUses {0} must not be negative")]
    NegativeMinUses(i64),

    #[error("levels {0:?} must be one to three colon separated values of 1 or 2")]
    InvalidLevels(String),
}

fn valid_levels(levels: &str) -> bool {
    let parts: Vec<&str> = levels.split(':').collect();
    (1..=3).contains(&parts.len()) && parts.iter().all(|p| *p == "1" || *p == "2")
}

/// Builds `CacheConfig` values from resource annotations.
#[derive(Debug, Clone)]
pub struct CacheParser<R, D> {
    resolver: R,
    directories: D,
    root: String,
}

impl<R, D> CacheParser<R, D>
where
    R: AnnotationResolver,
    D: CacheDirectories,
{
    pub fn new(resolver: R, directories: D) -> Self {
        Self {
            resolver,
            directories,
            root: DEFAULT_CACHE_ROOT.to_string(),
        }
    }

    /// Use a different directory for cache zones.
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Cache zone directory for a resource.
    pub fn zone_path(&self, resource: &Resource) -> String {
        format!(
            "{}/{}/{}",
            self.root.trim_end_matches('/'),
            resource.namespace,
            resource.name
        )
    }
}

impl<R, D> AnnotationParser for CacheParser<R, D>
where
    R: AnnotationResolver,
    D: CacheDirectories,
{
    type Output = CacheConfig;

    fn parse(&self, resource: &Resource) -> CacheConfig {
        let r = &self.resolver;

        let enabled = resolve_or(ENABLE_CACHE, DEFAULT_ENABLED, |k| r.get_bool(k, resource));
        let levels = resolve_or(CACHE_LEVELS, DEFAULT_LEVELS.to_string(), |k| {
            r.get_string(k, resource)
        });
        let max_size = resolve_or(CACHE_MAX_SIZE, DEFAULT_MAX_SIZE.to_string(), |k| {
            r.get_string(k, resource)
        });
        let methods = resolve_or(CACHE_METHODS, DEFAULT_METHODS.to_string(), |k| {
            r.get_string(k, resource)
        });
        let inactive_timeout = resolve_or(
            CACHE_INACTIVE_TIMEOUT,
            DEFAULT_INACTIVE_TIMEOUT.to_string(),
            |k| r.get_string(k, resource),
        );
        let use_stale = resolve_or(CACHE_USE_STALE, DEFAULT_USE_STALE.to_string(), |k| {
            r.get_string(k, resource)
        });
        let revalidate = resolve_or(CACHE_REVALIDATE, DEFAULT_REVALIDATE.to_string(), |k| {
            r.get_string(k, resource)
        });
        let min_uses = resolve_or(CACHE_MIN_USES, DEFAULT_MIN_USES, |k| r.get_int(k, resource));
        let add_status_header = resolve_or(CACHE_ADD_STATUS_HEADER, DEFAULT_ADD_STATUS_HEADER, |k| {
            r.get_bool(k, resource)
        });
        let ttl = resolve_or(CACHE_VALID_FOR, DEFAULT_TTL.to_string(), |k| {
            r.get_string(k, resource)
        });

        let name = format!("{}-{}", resource.namespace, resource.name);
        let path = self.zone_path(resource);

        if let Err(e) = self.directories.ensure_dir(Path::new(&path)) {
            tracing::error!(
                resource = %resource.key(),
                path = %path,
                error = %e,
                "Unexpected error creating cache directory"
            );
        }

        CacheConfig {
            enabled,
            name,
            add_status_header,
            inactive_timeout: Time::from(inactive_timeout),
            levels,
            max_size: Size::from(max_size),
            methods,
            min_uses,
            path,
            revalidate,
            ttl: Time::from(ttl),
            use_stale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::resolver::PrefixedResolver;
    use crate::storage::NoopDirectories;

    fn parser() -> CacheParser<PrefixedResolver, NoopDirectories> {
        CacheParser::new(PrefixedResolver::default(), NoopDirectories)
    }

    fn annotated(key: &str, value: &str) -> Resource {
        Resource::new("default", "web")
            .with_annotation(format!("nginx.ingress.kubernetes.io/{key}"), value)
    }

    #[test]
    fn test_defaults() {
        let config = parser().parse(&Resource::new("default", "web"));

        assert!(!config.enabled);
        assert_eq!(config.name, "default-web");
        assert_eq!(config.path, "/cache/default/web");
        assert_eq!(config.levels, DEFAULT_LEVELS);
        assert_eq!(config.max_size.as_str(), DEFAULT_MAX_SIZE);
        assert_eq!(config.methods, DEFAULT_METHODS);
        assert_eq!(config.inactive_timeout.as_str(), DEFAULT_INACTIVE_TIMEOUT);
        assert_eq!(config.use_stale, DEFAULT_USE_STALE);
        assert_eq!(config.revalidate, "on");
        assert_eq!(config.min_uses, 3);
        assert!(config.add_status_header);
        assert_eq!(config.ttl.as_str(), DEFAULT_TTL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_each_annotation_overrides_its_field() {
        let p = parser();

        assert!(p.parse(&annotated(ENABLE_CACHE, "true")).enabled);
        assert_eq!(p.parse(&annotated(CACHE_LEVELS, "2")).levels, "2");
        assert_eq!(p.parse(&annotated(CACHE_MAX_SIZE, "1k")).max_size.as_str(), "1k");
        assert_eq!(p.parse(&annotated(CACHE_METHODS, "GET")).methods, "GET");
        assert_eq!(
            p.parse(&annotated(CACHE_INACTIVE_TIMEOUT, "1h")).inactive_timeout.as_str(),
            "1h"
        );
        assert_eq!(p.parse(&annotated(CACHE_USE_STALE, "off")).use_stale, "off");
        assert_eq!(p.parse(&annotated(CACHE_REVALIDATE, "off")).revalidate, "off");
        assert_eq!(p.parse(&annotated(CACHE_MIN_USES, "1")).min_uses, 1);
        assert!(!p.parse(&annotated(CACHE_ADD_STATUS_HEADER, "false")).add_status_header);
        assert_eq!(p.parse(&annotated(CACHE_VALID_FOR, "5m")).ttl.as_str(), "5m");
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let p = parser();

        assert!(!p.parse(&annotated(ENABLE_CACHE, "maybe")).enabled);
        assert_eq!(p.parse(&annotated(CACHE_MIN_USES, "many")).min_uses, DEFAULT_MIN_USES);
        assert!(p.parse(&annotated(CACHE_ADD_STATUS_HEADER, "")).add_status_header);
        assert_eq!(p.parse(&annotated(CACHE_LEVELS, "")).levels, DEFAULT_LEVELS);
    }

    #[test]
    fn test_custom_root() {
        let p = parser().with_root("/var/cache/nginx/");
        let config = p.parse(&Resource::new("ns", "app"));
        assert_eq!(config.path, "/var/cache/nginx/ns/app");
        assert_eq!(p.root(), "/var/cache/nginx/");
    }

    #[test]
    fn test_equal_handles_absence() {
        let config = parser().parse(&Resource::new("default", "web"));

        assert!(CacheConfig::equal(None, None));
        assert!(CacheConfig::equal(Some(&config), Some(&config)));
        assert!(!CacheConfig::equal(Some(&config), None));
        assert!(!CacheConfig::equal(None, Some(&config)));
    }

    #[test]
    fn test_validate_collects_all_issues() {
        let mut config = parser().parse(&Resource::new("default", "web"));
        config.max_size = Size::from("lots");
        config.ttl = Time::from("soon");
        config.revalidate = "maybe".into();
        config.min_uses = -1;
        config.levels = "1:3".into();

        let issues = config.validate().unwrap_err();
        assert_eq!(issues.len(), 5);
        assert!(issues.contains(&CacheConfigIssue::NegativeMinUses(-1)));
        assert!(issues.contains(&CacheConfigIssue::InvalidTime {
            field: "ttl",
            value: "soon".into(),
        }));
    }

    #[test]
    fn test_valid_levels() {
        assert!(valid_levels("1"));
        assert!(valid_levels("1:2"));
        assert!(valid_levels("2:2:1"));
        assert!(!valid_levels(""));
        assert!(!valid_levels("1:2:1:1"));
        assert!(!valid_levels("3"));
        assert!(!valid_levels("1:"));
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let config = parser().parse(&Resource::new("default", "web"));
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["addStatusHeader"], true);
        assert_eq!(json["inactiveTimeout"], "60m");
        assert_eq!(json["maxSize"], "100m");
        assert_eq!(json["minUses"], 3);
        assert_eq!(json["useStale"], DEFAULT_USE_STALE);
        assert_eq!(json.as_object().unwrap().len(), 12);
    }
}
