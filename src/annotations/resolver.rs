//! Annotation lookup and type coercion.
//!
//! # Responsibilities
//! - Look up an annotation by key on a resource
//! - Coerce the raw string into bool / string / int
//! - Turn lookup failures into per-field defaults (`resolve_or`)
//!
//! # Design Decisions
//! - Resolution is a trait so parsers can run against fakes in tests
//! - Every failure is a typed `AnnotationError`; callers decide whether it matters

use thiserror::Error;

use crate::annotations::resource::Resource;

/// Prefix used by the ingress controller for its annotations.
pub const DEFAULT_ANNOTATION_PREFIX: &str = "nginx.ingress.kubernetes.io";

/// Errors that can occur while resolving an annotation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    /// The resource does not carry the annotation.
    #[error("annotation {0} is missing")]
    Missing(String),

    /// The annotation is present but empty.
    #[error("annotation {0} has an empty value")]
    Empty(String),

    /// The value is not a boolean.
    #[error("annotation {key} is not a valid boolean: {value:?}")]
    InvalidBool { key: String, value: String },

    /// The value is not an integer.
    #[error("annotation {key} is not a valid integer: {value:?}")]
    InvalidInt { key: String, value: String },
}

/// Capability to read typed annotation values from a resource.
pub trait AnnotationResolver {
    /// Resolve `key` as a string.
    fn get_string(&self, key: &str, resource: &Resource) -> Result<String, AnnotationError>;

    /// Resolve `key` as a boolean.
    fn get_bool(&self, key: &str, resource: &Resource) -> Result<bool, AnnotationError>;

    /// Resolve `key` as an integer.
    fn get_int(&self, key: &str, resource: &Resource) -> Result<i64, AnnotationError>;
}

impl<T: AnnotationResolver + ?Sized> AnnotationResolver for &T {
    fn get_string(&self, key: &str, resource: &Resource) -> Result<String, AnnotationError> {
        (**self).get_string(key, resource)
    }

    fn get_bool(&self, key: &str, resource: &Resource) -> Result<bool, AnnotationError> {
        (**self).get_bool(key, resource)
    }

    fn get_int(&self, key: &str, resource: &Resource) -> Result<i64, AnnotationError> {
        (**self).get_int(key, resource)
    }
}

/// Resolver reading `{prefix}/{key}` from the resource's own annotations.
#[derive(Debug, Clone)]
pub struct PrefixedResolver {
    prefix: String,
}

impl PrefixedResolver {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Full annotation name for `key`.
    pub fn annotation_name(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}/{}", self.prefix, key)
        }
    }

    fn raw<'a>(&self, key: &str, resource: &'a Resource) -> Result<&'a str, AnnotationError> {
        let name = self.annotation_name(key);
        match resource.annotations.get(&name) {
            None => Err(AnnotationError::Missing(name)),
            Some(value) if value.is_empty() => Err(AnnotationError::Empty(name)),
            Some(value) => Ok(value.as_str()),
        }
    }
}

impl Default for PrefixedResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ANNOTATION_PREFIX)
    }
}

impl AnnotationResolver for PrefixedResolver {
    fn get_string(&self, key: &str, resource: &Resource) -> Result<String, AnnotationError> {
        self.raw(key, resource).map(str::to_string)
    }

    fn get_bool(&self, key: &str, resource: &Resource) -> Result<bool, AnnotationError> {
        let value = self.raw(key, resource)?;
        parse_bool(value).ok_or_else(|| AnnotationError::InvalidBool {
            key: self.annotation_name(key),
            value: value.to_string(),
        })
    }

    fn get_int(&self, key: &str, resource: &Resource) -> Result<i64, AnnotationError> {
        let value = self.raw(key, resource)?;
        value.parse::<i64>().map_err(|_| AnnotationError::InvalidInt {
            key: self.annotation_name(key),
            value: value.to_string(),
        })
    }
}

/// Boolean spellings accepted in annotations.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Resolve `key` with `resolve`, falling back to `default` on any failure.
///
/// The failure is logged at debug level and never returned, so the result is
/// always a usable value.
pub fn resolve_or<T, F>(key: &str, default: T, resolve: F) -> T
where
    F: FnOnce(&str) -> Result<T, AnnotationError>,
{
    match resolve(key) {
        Ok(value) => value,
        Err(AnnotationError::Missing(_)) => {
            tracing::trace!(annotation = key, "Annotation not set, using default");
            default
        }
        Err(e) => {
            tracing::debug!(annotation = key, error = %e, "Invalid annotation, using default");
            default
        }
    }
}
