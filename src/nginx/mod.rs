//! nginx value types.
//!
//! Annotations are plain strings; the types here describe which strings the
//! rendered directives will accept.

pub mod types;

pub use types::{OnOff, ParseOnOffError, Size, Time};
