// Library root — the binary entry point is src/main.rs.

//! Validated, process-wide configuration for the indoor garden controller.
//!
//! ```no_run
//! let config = garden_config::provider::get()?;
//! println!("connecting to {}", config.mqtt.broker_url());
//! # Ok::<(), garden_config::error::ConfigError>(())
//! ```

pub mod config;
pub mod error;
pub mod logger;
pub mod provider;

pub use config::Configuration;
pub use error::{AppError, ConfigError};
