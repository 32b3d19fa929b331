//! Configuration loading and management.
//!
//! - [`types`]: config structs and file loading
//! - [`defaults`]: serde default values
//! - [`validation`]: startup checks collecting every problem at once

mod defaults;
mod types;
mod validation;

pub use types::{Config, ConfigError, PresenceConfig, ServerConfig};
pub use validation::{ValidationError, validate};
