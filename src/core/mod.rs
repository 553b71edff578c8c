//! Core utilities: configuration and logging

pub mod config;
pub mod logging;

// Re-exports for convenience
pub use config::{Config, DeployEnv};
pub use logging::init_logger;
