//! Shared value types and build-time configuration.
//!
//! # Invariants
//! - Configuration constants are fixed at build time; `ViewerConfig::default()`
//!   is the only source of tuning values for the kernel and renderers.
//! - Angles are radians everywhere.

pub mod config;
pub mod types;

pub use config::ViewerConfig;
pub use types::{CameraSnapshot, Orientation};
