//! Process-wide configuration provider.
//!
//! The configuration moves from uninitialized to initialized exactly once and
//! is read-only afterwards. Startup code normally calls [`install`] with a
//! value it loaded itself; [`get`] falls back to loading from the process
//! environment on first use. Either way, every reader sees the same
//! `&'static Configuration`.

use std::sync::OnceLock;

use tracing::{debug, info};

use crate::config::{self, Configuration};
use crate::error::ConfigError;

/// A write-once slot for a [`Configuration`].
///
/// `const`-constructible so it can live in a `static`.
#[derive(Debug, Default)]
pub struct ConfigProvider {
    slot: OnceLock<Configuration>,
}

impl ConfigProvider {
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Publish `config`. Fails if a value is already present; the first one
    /// stays in place.
    pub fn install(&self, config: Configuration) -> Result<&Configuration, ConfigError> {
        let mut won = false;
        let stored = self.slot.get_or_init(|| {
            won = true;
            config
        });
        if !won {
            return Err(ConfigError::AlreadyInitialized);
        }
        Ok(stored)
    }

    /// Return the published value, running `loader` first if there is none.
    ///
    /// Concurrent first callers may each run `loader`, but only one result is
    /// stored and all of them get it back. A failed load stores nothing, so a
    /// later call can retry.
    pub fn get_or_load<F>(&self, loader: F) -> Result<&Configuration, ConfigError>
    where
        F: FnOnce() -> Result<Configuration, ConfigError>,
    {
        if let Some(config) = self.slot.get() {
            return Ok(config);
        }
        let loaded = loader()?;
        Ok(self.slot.get_or_init(|| loaded))
    }

    pub fn try_get(&self) -> Option<&Configuration> {
        self.slot.get()
    }
}

static PROVIDER: ConfigProvider = ConfigProvider::new();

/// Publish the process-wide configuration. Call once during startup.
pub fn install(config: Configuration) -> Result<&'static Configuration, ConfigError> {
    let stored = PROVIDER.install(config)?;
    info!(client_id = %stored.mqtt.client_id, "configuration installed");
    Ok(stored)
}

/// The process-wide configuration.
///
/// Loads from the environment and the default config file on first use if
/// nothing was installed. Once initialized this never fails and always
/// returns the same reference.
pub fn get() -> Result<&'static Configuration, ConfigError> {
    PROVIDER.get_or_load(|| {
        debug!("configuration not installed, loading on first use");
        config::load(None)
    })
}

/// The process-wide configuration, if it has been initialized.
pub fn try_get() -> Option<&'static Configuration> {
    PROVIDER.try_get()
}
