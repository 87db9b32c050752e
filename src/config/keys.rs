//! Environment variable names understood by the loader.
//!
//! Errors report fields by these names, whichever source supplied the value.

pub const WIFI_SSID: &str = "WIFI_SSID";
pub const WIFI_PASSWORD: &str = "WIFI_PASSWORD";

pub const MQTT_BROKER: &str = "MQTT_BROKER";
pub const MQTT_PORT: &str = "MQTT_PORT";
pub const MQTT_TLS: &str = "MQTT_TLS";
pub const MQTT_USERNAME: &str = "MQTT_USERNAME";
pub const MQTT_PASSWORD: &str = "MQTT_PASSWORD";
pub const MQTT_CLIENT_ID: &str = "MQTT_CLIENT_ID";

pub const MQTT_TOPIC_PREFIX: &str = "MQTT_TOPIC_PREFIX";
pub const MQTT_SENSOR_TOPIC: &str = "MQTT_SENSOR_TOPIC";
pub const MQTT_COMMAND_TOPIC: &str = "MQTT_COMMAND_TOPIC";
pub const MQTT_DEVICE_TOPIC: &str = "MQTT_DEVICE_TOPIC";

/// Path of the TOML file to load instead of `config/default.toml`.
pub const GARDEN_CONFIG: &str = "GARDEN_CONFIG";

/// Every key that can override a configuration field.
pub const ALL: &[&str] = &[
    WIFI_SSID,
    WIFI_PASSWORD,
    MQTT_BROKER,
    MQTT_PORT,
    MQTT_TLS,
    MQTT_USERNAME,
    MQTT_PASSWORD,
    MQTT_CLIENT_ID,
    MQTT_TOPIC_PREFIX,
    MQTT_SENSOR_TOPIC,
    MQTT_COMMAND_TOPIC,
    MQTT_DEVICE_TOPIC,
];
