//! Process lifecycle.
//!
//! # Data Flow
//! ```text
//! CLI flags
//!     → startup.rs (load config, wire capabilities)
//!     → ready-to-use parsers
//! ```

pub mod startup;

pub use startup::{build_cache_parser, load_or_default, ConfiguredCacheParser};
