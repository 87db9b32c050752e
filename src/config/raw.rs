//! Raw TOML deserialization types.
//!
//! These structs mirror the file shape. Every field is optional because the
//! environment may supply it instead; `load` merges both and `validate`
//! decides what is missing.

use serde::Deserialize;

// ── Top-level ────────────────────────────────────────────────────────────────

/// Raw TOML shape — serde target before resolution.
///
/// `[meta]` is consumed by the loader before this point and ignored here.
#[derive(Deserialize, Default)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub wifi: RawWifi,
    #[serde(default)]
    pub mqtt: RawMqtt,
}

// ── WiFi ─────────────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub(super) struct RawWifi {
    pub ssid: Option<String>,
    pub password: Option<String>,
}

// ── MQTT ─────────────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub(super) struct RawMqtt {
    pub broker: Option<String>,
    pub port: Option<RawPort>,
    pub tls: Option<bool>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: Option<String>,
    pub topic_prefix: Option<String>,
    #[serde(default)]
    pub topics: RawTopics,
}

/// Ports are accepted as integers or strings so an out-of-range or
/// non-numeric value surfaces as an invalid port rather than a parse error.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub(super) enum RawPort {
    Number(i64),
    Text(String),
}

#[derive(Deserialize, Default)]
pub(super) struct RawTopics {
    pub sensor: Option<String>,
    pub command: Option<String>,
    pub device: Option<String>,
}

pub(super) fn default_port() -> u16 {
    8883
}

pub(super) fn default_tls() -> bool {
    true
}

pub(super) fn default_client_id() -> String {
    "esp32_garden_controller".to_string()
}

pub(super) fn default_topic_prefix() -> String {
    "indoor-garden".to_string()
}
