//! Cache storage subsystem.
//!
//! # Data Flow
//! ```text
//! CacheParser computes {root}/{namespace}/{name}
//!     → CacheDirectories::ensure_dir (create with parents)
//!     → failure is logged by the caller, never propagated
//! ```
//!
//! # Design Decisions
//! - Directory creation is a trait so it can be swapped for fakes or dry runs
//! - Paths are derived from resource identity, so distinct resources never
//!   share a directory and no locking is needed

pub mod directories;

pub use directories::{CacheDirectories, FsDirectories, NoopDirectories, DEFAULT_DIR_MODE};
