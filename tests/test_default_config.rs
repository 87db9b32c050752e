//! Checks on the shipped config/default.toml

use std::fs;
use std::path::Path;

use garden_config::config::{self, DEFAULT_CONFIG_PATH, EnvOverrides, keys};
use garden_config::ConfigError;

#[test]
fn default_config_file_exists() {
    assert!(
        fs::metadata(DEFAULT_CONFIG_PATH).is_ok(),
        "config/default.toml missing"
    );
}

#[test]
fn default_config_holds_no_credentials() {
    let text = fs::read_to_string(DEFAULT_CONFIG_PATH).unwrap();
    let value: toml::Value = toml::from_str(&text).unwrap();
    assert!(value.get("wifi").is_none(), "wifi credentials must come from the environment");
    assert!(value["mqtt"].get("password").is_none());
    assert!(value["mqtt"].get("username").is_none());
}

#[test]
fn default_config_alone_reports_first_missing_secret() {
    let err = config::load_from(Some(Path::new(DEFAULT_CONFIG_PATH)), &EnvOverrides::new())
        .unwrap_err();
    assert_eq!(err, ConfigError::MissingValue { key: keys::WIFI_SSID });
}

#[test]
fn default_config_with_secrets_matches_firmware_defaults() {
    let env = EnvOverrides::new()
        .with(keys::WIFI_SSID, "greenhouse")
        .with(keys::WIFI_PASSWORD, "wifi-passphrase")
        .with(keys::MQTT_USERNAME, "garden")
        .with(keys::MQTT_PASSWORD, "mqtt-password");
    let cfg = config::load_from(Some(Path::new(DEFAULT_CONFIG_PATH)), &env).unwrap();
    assert_eq!(cfg.mqtt.broker_url(), "mqtts://broker.example.com:8883");
    assert_eq!(cfg.mqtt.client_id, "esp32_garden_controller");
    assert_eq!(cfg.mqtt.topics.sensor, "indoor-garden/sensors");
    assert_eq!(cfg.mqtt.topics.command, "indoor-garden/commands");
    assert_eq!(cfg.mqtt.topics.device, "indoor-garden/devices");
}
