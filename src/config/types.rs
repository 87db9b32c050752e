//! Public configuration types.
//!
//! These are the resolved, validated structs handed to the rest of the
//! controller. Raw TOML deserialization types live in `raw.rs`.

use std::fmt;
use std::net::Ipv6Addr;

use serde::{Serialize, Serializer};

/// Placeholder written wherever a [`Secret`] would otherwise be shown.
pub const REDACTED: &str = "<redacted>";

// ── Secret ───────────────────────────────────────────────────────────────────

/// A credential that must never reach logs or printed output.
///
/// `Debug`, `Display` and `Serialize` all emit [`REDACTED`]; the plaintext is
/// only reachable through [`Secret::expose`].
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The plaintext credential. Hand it straight to the consumer.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Length in bytes.
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({REDACTED})")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(REDACTED)
    }
}

// ── WiFi ─────────────────────────────────────────────────────────────────────

/// Credentials for joining the wireless network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WifiConfig {
    pub ssid: String,
    /// WPA2 passphrase.
    pub password: Secret,
}

// ── MQTT ─────────────────────────────────────────────────────────────────────

/// Topics the controller publishes to and subscribes on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicConfig {
    /// Sensor readings are published here.
    pub sensor: String,
    /// Commands from the backend arrive here.
    pub command: String,
    /// Actuator state reports are published here.
    pub device: String,
}

impl TopicConfig {
    /// All topics in declaration order.
    pub fn all(&self) -> [&str; 3] {
        [&self.sensor, &self.command, &self.device]
    }
}

/// Broker session parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MqttConfig {
    /// Bare hostname or IP address, no scheme or port.
    #[serde(rename = "broker")]
    pub broker_host: String,
    #[serde(rename = "port")]
    pub broker_port: u16,
    /// Whether the session runs over TLS (`mqtts`).
    pub tls: bool,
    pub username: String,
    pub password: Secret,
    /// Must be unique per broker, a duplicate evicts the older session.
    pub client_id: String,
    pub topics: TopicConfig,
}

impl MqttConfig {
    /// `mqtts://host:port` or `mqtt://host:port` depending on [`Self::tls`].
    /// A bare IPv6 host is bracketed.
    pub fn broker_url(&self) -> String {
        let scheme = if self.tls { "mqtts" } else { "mqtt" };
        if self.broker_host.parse::<Ipv6Addr>().is_ok() {
            format!("{scheme}://[{}]:{}", self.broker_host, self.broker_port)
        } else {
            format!("{scheme}://{}:{}", self.broker_host, self.broker_port)
        }
    }
}

// ── Top-level ────────────────────────────────────────────────────────────────

/// Fully-resolved controller configuration.
///
/// Built once at startup and never mutated. Secrets are wrapped in [`Secret`],
/// so the `Debug` output of this struct is safe to log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    pub wifi: WifiConfig,
    pub mqtt: MqttConfig,
}

impl Configuration {
    /// Render as TOML with every secret replaced by [`REDACTED`].
    pub fn to_redacted_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mqtt(tls: bool) -> MqttConfig {
        MqttConfig {
            broker_host: "broker.example.com".into(),
            broker_port: 8883,
            tls,
            username: "garden".into(),
            password: Secret::new("hunter22"),
            client_id: "esp32_garden_controller".into(),
            topics: TopicConfig {
                sensor: "indoor-garden/sensors".into(),
                command: "indoor-garden/commands".into(),
                device: "indoor-garden/devices".into(),
            },
        }
    }

    #[test]
    fn secret_is_redacted_in_debug_and_display() {
        let s = Secret::new("hunter22");
        assert_eq!(format!("{s}"), REDACTED);
        assert!(!format!("{s:?}").contains("hunter22"));
        assert_eq!(s.expose(), "hunter22");
        assert_eq!(s.len(), 8);
    }

    #[test]
    fn broker_url_follows_tls_flag() {
        assert_eq!(mqtt(true).broker_url(), "mqtts://broker.example.com:8883");
        assert_eq!(mqtt(false).broker_url(), "mqtt://broker.example.com:8883");
    }

    #[test]
    fn broker_url_brackets_ipv6() {
        let mut m = mqtt(true);
        m.broker_host = "fd00::2".into();
        assert_eq!(m.broker_url(), "mqtts://[fd00::2]:8883");

        m.broker_host = "[fd00::2]".into();
        m.tls = false;
        m.broker_port = 1883;
        assert_eq!(m.broker_url(), "mqtt://[fd00::2]:1883");
    }

    #[test]
    fn redacted_toml_hides_passwords() {
        let cfg = Configuration {
            wifi: WifiConfig {
                ssid: "greenhouse".into(),
                password: Secret::new("wifi-secret-1"),
            },
            mqtt: mqtt(true),
        };
        let out = cfg.to_redacted_toml().unwrap();
        assert!(out.contains("greenhouse"));
        assert!(out.contains("indoor-garden/sensors"));
        assert!(!out.contains("wifi-secret-1"));
        assert!(!out.contains("hunter22"));
        assert!(out.contains(REDACTED));
    }

    #[test]
    fn debug_of_configuration_is_safe_to_log() {
        let cfg = Configuration {
            wifi: WifiConfig {
                ssid: "greenhouse".into(),
                password: Secret::new("wifi-secret-1"),
            },
            mqtt: mqtt(true),
        };
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("wifi-secret-1"));
        assert!(!dbg.contains("hunter22"));
    }
}
