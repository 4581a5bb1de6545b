//! # SceneKit Common
//!
//! Shared plumbing for SceneKit tools.
//!
//! ## Features
//!
//! - Logging configuration and setup
//! - Render configuration loaded from JSON

pub mod config;
pub mod logging;

pub use config::{ConfigError, ConfigResult, RenderConfig};
pub use logging::{init_logging, LogConfig, LogFormat};
