//! Configuration Module
//!
//! Handles loading and validation of the screen and eye configuration files.

pub mod error;
pub mod eyes;
pub mod manager;
pub mod types;

pub use error::{ConfigError, ConfigErrorKind};
pub use eyes::{EyeConfig, EyeShape, EyesConfig, RenderConfig};
pub use manager::ConfigManager;
pub use types::*;
