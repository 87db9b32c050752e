//! Controller configuration: loading, validation and resolved types.
//!
//! Values come from three layers, highest precedence first:
//!
//! 1. environment variables (`WIFI_SSID`, `MQTT_BROKER`, …; see [`keys`]),
//! 2. an optional TOML file (`config/default.toml` unless overridden),
//! 3. built-in defaults for the port, client id, TLS flag and topics.
//!
//! Credentials have no defaults and should never be committed to the TOML
//! file; supply them through the environment or a `.env` file.
//!
//! # Module layout
//!
//! - **types** — `Configuration` and its sections, plus the `Secret` wrapper.
//! - **raw** — TOML deserialization shapes; kept private.
//! - **load** — `load`, `load_from`, `EnvOverrides`, base-file merging.
//! - **validate** — per-field rules; the first violation aborts loading.
//! - **keys** — environment variable names.

pub mod keys;
mod load;
mod raw;
mod types;
mod validate;

pub use load::{DEFAULT_CONFIG_PATH, EnvOverrides, expand_home, load, load_from};
pub use types::*;
pub use validate::MAX_PORTABLE_CLIENT_ID_LEN;

#[cfg(test)]
impl Configuration {
    /// Valid `Configuration` for unit tests — no real credentials.
    pub fn test_default() -> Self {
        Self {
            wifi: WifiConfig {
                ssid: "test-ssid".into(),
                password: Secret::new("test-passphrase"),
            },
            mqtt: MqttConfig {
                broker_host: "localhost".into(),
                broker_port: raw::default_port(),
                tls: raw::default_tls(),
                username: "test".into(),
                password: Secret::new("test-password"),
                client_id: raw::default_client_id(),
                topics: TopicConfig {
                    sensor: "indoor-garden/sensors".into(),
                    command: "indoor-garden/commands".into(),
                    device: "indoor-garden/devices".into(),
                },
            },
        }
    }
}
