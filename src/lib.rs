//! RoboEyes Library
//!
//! Loads a declarative screen configuration for small SPI/I2C panels and
//! animates a pair of expressive eyes on it.

pub mod config;
pub mod eyes;
pub mod render;
pub mod shutdown;

pub use config::{AppConfig, ConfigError, ConfigManager, ScreenConfig};
pub use eyes::Animator;
pub use render::Renderer;
pub use shutdown::ShutdownCoordinator;

/// Common error type for the application
pub type Result<T> = anyhow::Result<T>;
