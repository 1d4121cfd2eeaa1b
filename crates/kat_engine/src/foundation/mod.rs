//! Foundation module - Core utilities and types
//!
//! - Logging setup
//! - Version numbers shared by the engine and applications

pub mod logging;
pub mod version;

pub use version::Version;
