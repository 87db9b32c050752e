//! Configuration loading with env-var overrides.
//!
//! Reads an optional TOML file, follows `[meta] base = "..."` inheritance
//! chains, then lets environment variables override individual fields.

use std::collections::{HashMap, HashSet};
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ConfigError;

use super::keys;
use super::raw::{self, RawConfig, RawPort};
use super::types::*;
use super::validate;

/// File loaded when no explicit path is given and `GARDEN_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

// ── EnvOverrides ─────────────────────────────────────────────────────────────

/// Environment values that take precedence over the TOML file.
///
/// [`EnvOverrides::from_env`] snapshots the process environment; tests build
/// one by hand instead of mutating env vars. Empty values count as unset.
#[derive(Clone, Default)]
pub struct EnvOverrides {
    values: HashMap<String, String>,
}

impl EnvOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every key in [`keys::ALL`] from the process environment.
    pub fn from_env() -> Self {
        let mut values = HashMap::new();
        for &key in keys::ALL {
            match env::var(key) {
                Ok(v) => {
                    values.insert(key.to_string(), v);
                }
                Err(env::VarError::NotUnicode(_)) => {
                    warn!(key, "ignoring non-UTF-8 environment value");
                }
                Err(env::VarError::NotPresent) => {}
            }
        }
        Self { values }
    }

    /// Builder-style setter.
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.values.values().all(String::is_empty)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvOverrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

// Values may hold credentials, only keys are shown.
impl fmt::Debug for EnvOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set: Vec<&str> = self.values.keys().map(String::as_str).collect();
        set.sort_unstable();
        f.debug_struct("EnvOverrides").field("keys", &set).finish()
    }
}

// ── TOML layering ────────────────────────────────────────────────────────────

/// Deep-merge two TOML values.
/// Tables are merged recursively — the overlay only needs to specify keys that
/// differ from the base. For every other type the overlay value replaces the
/// base value wholesale.
fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_tbl), toml::Value::Table(overlay_tbl)) => {
            for (key, ov_val) in overlay_tbl {
                let merged = match base_tbl.remove(&key) {
                    Some(base_val) => merge_toml(base_val, ov_val),
                    None => ov_val,
                };
                base_tbl.insert(key, merged);
            }
            toml::Value::Table(base_tbl)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file, follow any `[meta] base = "..."` chain, and return the
/// fully merged `toml::Value`. `visited` carries canonicalized paths already
/// seen in this chain so circular references are caught early.
fn load_raw_merged(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<toml::Value, ConfigError> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical) {
        return Err(ConfigError::File(format!(
            "circular base reference detected at: {}",
            path.display()
        )));
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| ConfigError::File(format!("cannot read {}: {e}", path.display())))?;

    let overlay_val: toml::Value = toml::from_str(&raw)
        .map_err(|e| ConfigError::File(format!("parse error in {}: {e}", path.display())))?;

    if let Some(base_str) = overlay_val
        .get("meta")
        .and_then(|m| m.get("base"))
        .and_then(|b| b.as_str())
    {
        let base_path = expand_home(base_str);
        let base_path = if base_path.is_absolute() {
            base_path
        } else {
            path.parent().unwrap_or(Path::new(".")).join(base_path)
        };
        debug!(file = %path.display(), base = %base_path.display(), "following config base");
        let base_val = load_raw_merged(&base_path, visited)?;
        Ok(merge_toml(base_val, overlay_val))
    } else {
        Ok(overlay_val)
    }
}

// ── Entry points ─────────────────────────────────────────────────────────────

/// Load the configuration from the process environment and the config file.
///
/// File lookup order: `config_path`, then `GARDEN_CONFIG`, then
/// `config/default.toml` if it exists. An explicitly named file must exist;
/// with none of them the environment alone must supply every required value.
pub fn load(config_path: Option<&str>) -> Result<Configuration, ConfigError> {
    let overrides = EnvOverrides::from_env();
    let explicit = config_path
        .map(str::to_string)
        .or_else(|| env::var(keys::GARDEN_CONFIG).ok().filter(|p| !p.is_empty()));

    match explicit {
        Some(path) => load_from(Some(&expand_home(&path)), &overrides),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                load_from(Some(default_path), &overrides)
            } else {
                debug!("no config file, using environment only");
                load_from(None, &overrides)
            }
        }
    }
}

/// Internal loader — accepts an explicit path and overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(path: Option<&Path>, overrides: &EnvOverrides) -> Result<Configuration, ConfigError> {
    let parsed = match path {
        Some(path) => {
            let merged_val = load_raw_merged(path, &mut HashSet::new())?;
            RawConfig::deserialize(merged_val).map_err(|e: toml::de::Error| {
                ConfigError::File(format!("invalid config in {}: {e}", path.display()))
            })?
        }
        None => RawConfig::default(),
    };
    resolve(parsed, overrides)
}

/// Pick the env value over the file value, logging which source won.
fn pick(overrides: &EnvOverrides, key: &'static str, file: Option<String>) -> Option<String> {
    match overrides.get(key) {
        Some(v) => {
            debug!(key, source = "env", "value resolved");
            Some(v.to_string())
        }
        None => {
            if file.is_some() {
                debug!(key, source = "file", "value resolved");
            }
            file
        }
    }
}

/// Merge file values with overrides, apply defaults and validate every field.
fn resolve(parsed: RawConfig, overrides: &EnvOverrides) -> Result<Configuration, ConfigError> {
    let RawConfig { wifi, mqtt } = parsed;

    // WiFi
    let ssid = validate::require(keys::WIFI_SSID, pick(overrides, keys::WIFI_SSID, wifi.ssid))?;
    validate::ssid(keys::WIFI_SSID, &ssid)?;
    let wifi_password = Secret::from(validate::require(
        keys::WIFI_PASSWORD,
        pick(overrides, keys::WIFI_PASSWORD, wifi.password),
    )?);
    validate::passphrase(keys::WIFI_PASSWORD, &wifi_password)?;

    // Broker
    let broker_host = validate::require(
        keys::MQTT_BROKER,
        pick(overrides, keys::MQTT_BROKER, mqtt.broker),
    )?;
    validate::broker_host(keys::MQTT_BROKER, &broker_host)?;

    let broker_port = match overrides.get(keys::MQTT_PORT) {
        Some(v) => validate::port_str(keys::MQTT_PORT, v)?,
        None => match mqtt.port {
            Some(RawPort::Number(n)) => validate::port_int(keys::MQTT_PORT, n)?,
            Some(RawPort::Text(s)) => validate::port_str(keys::MQTT_PORT, &s)?,
            None => raw::default_port(),
        },
    };

    let tls = match overrides.get(keys::MQTT_TLS) {
        Some(v) => validate::flag(keys::MQTT_TLS, v)?,
        None => mqtt.tls.unwrap_or_else(raw::default_tls),
    };
    if !tls && broker_port == raw::default_port() {
        warn!(port = broker_port, "TLS disabled on the conventional MQTT-over-TLS port");
    }

    // Credentials
    let username = validate::require(
        keys::MQTT_USERNAME,
        pick(overrides, keys::MQTT_USERNAME, mqtt.username),
    )?;
    let mqtt_password = Secret::from(validate::require(
        keys::MQTT_PASSWORD,
        pick(overrides, keys::MQTT_PASSWORD, mqtt.password),
    )?);

    let client_id = pick(overrides, keys::MQTT_CLIENT_ID, mqtt.client_id)
        .unwrap_or_else(raw::default_client_id);
    let client_id = validate::require(keys::MQTT_CLIENT_ID, Some(client_id))?;
    validate::client_id(keys::MQTT_CLIENT_ID, &client_id)?;

    // Topics
    let prefix = pick(overrides, keys::MQTT_TOPIC_PREFIX, mqtt.topic_prefix)
        .unwrap_or_else(raw::default_topic_prefix);
    let prefix = prefix.trim_end_matches('/');
    let topic_or = |key: &'static str, file: Option<String>, leaf: &str| {
        pick(overrides, key, file).unwrap_or_else(|| format!("{prefix}/{leaf}"))
    };
    let topics = TopicConfig {
        sensor: topic_or(keys::MQTT_SENSOR_TOPIC, mqtt.topics.sensor, "sensors"),
        command: topic_or(keys::MQTT_COMMAND_TOPIC, mqtt.topics.command, "commands"),
        device: topic_or(keys::MQTT_DEVICE_TOPIC, mqtt.topics.device, "devices"),
    };
    let named = [
        (keys::MQTT_SENSOR_TOPIC, topics.sensor.as_str()),
        (keys::MQTT_COMMAND_TOPIC, topics.command.as_str()),
        (keys::MQTT_DEVICE_TOPIC, topics.device.as_str()),
    ];
    for (key, topic) in named {
        validate::topic(key, topic)?;
    }
    validate::distinct_topics(&named)?;

    Ok(Configuration {
        wifi: WifiConfig {
            ssid,
            password: wifi_password,
        },
        mqtt: MqttConfig {
            broker_host,
            broker_port,
            tls,
            username,
            password: mqtt_password,
            client_id,
            topics,
        },
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_base_and_overlay_wins() {
        let base: toml::Value = toml::from_str("[mqtt]\nbroker = \"a\"\nport = 1883\n").unwrap();
        let overlay: toml::Value = toml::from_str("[mqtt]\nport = 8883\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["mqtt"]["broker"].as_str(), Some("a"));
        assert_eq!(merged["mqtt"]["port"].as_integer(), Some(8883));
    }

    #[test]
    fn empty_override_counts_as_unset() {
        let o = EnvOverrides::new().with(keys::MQTT_PORT, "");
        assert_eq!(o.get(keys::MQTT_PORT), None);
        assert!(o.is_empty());
    }

    #[test]
    fn overrides_debug_hides_values() {
        let o = EnvOverrides::new().with(keys::MQTT_PASSWORD, "hunter22");
        let dbg = format!("{o:?}");
        assert!(dbg.contains("MQTT_PASSWORD"));
        assert!(!dbg.contains("hunter22"));
    }

    #[test]
    fn overrides_collect_from_pairs() {
        let o: EnvOverrides = [(keys::WIFI_SSID, "greenhouse")].into_iter().collect();
        assert_eq!(o.get(keys::WIFI_SSID), Some("greenhouse"));
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = dirs::home_dir().expect("home dir must exist in test env");
        let expanded = expand_home("~/.garden/secrets.toml");
        assert!(expanded.starts_with(&home));
        assert!(expanded.ends_with("secrets.toml"));
    }

    #[test]
    fn absolute_path_unchanged() {
        assert_eq!(expand_home("/etc/garden.toml"), PathBuf::from("/etc/garden.toml"));
    }
}
