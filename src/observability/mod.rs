//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields (resource, path, annotation)
//!
//! Consumers:
//!     → stderr, human readable or JSON lines
//! ```

pub mod logging;

pub use logging::init_logging;
