//! Annotation translation subsystem.
//!
//! # Data Flow
//! ```text
//! Resource (namespace, name, annotations)
//!     → resolver.rs (lookup + type coercion, or AnnotationError)
//!     → cache.rs (per-field resolve-or-default)
//!     → CacheConfig (immutable, fully populated)
//!     → template rendering / change detection (callers)
//! ```
//!
//! # Design Decisions
//! - Parsers never fail: a missing or malformed annotation means "default"
//! - The resolver and the filesystem are injected, so parsers are pure
//!   functions of their inputs in tests
//! - A fresh config is built on every reconciliation pass

pub mod cache;
pub mod resolver;
pub mod resource;

pub use cache::{CacheConfig, CacheConfigIssue, CacheParser};
pub use resolver::{resolve_or, AnnotationError, AnnotationResolver, PrefixedResolver};
pub use resource::{load_resource, Resource, ResourceError};

/// Translates the annotations of a resource into a typed configuration.
pub trait AnnotationParser {
    type Output;

    fn parse(&self, resource: &Resource) -> Self::Output;
}
