//! Ingress cache annotation translation library.

pub mod annotations;
pub mod config;
pub mod lifecycle;
pub mod nginx;
pub mod observability;
pub mod storage;

pub use annotations::{AnnotationParser, CacheConfig, CacheParser, Resource};
pub use config::ControllerConfig;
