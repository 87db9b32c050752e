//! Field-level validation rules.
//!
//! Each check returns the first violation it finds. Keys are passed in so the
//! error names the environment variable, not the TOML path.

use std::net::Ipv6Addr;

use tracing::warn;

use crate::error::ConfigError;

use super::types::Secret;

/// Longest client id an MQTT 3.1.1 broker is required to accept.
pub const MAX_PORTABLE_CLIENT_ID_LEN: usize = 23;

const MAX_SSID_LEN: usize = 32;
const WPA_PASSPHRASE_LEN: std::ops::RangeInclusive<usize> = 8..=64;
const MAX_TOPIC_LEN: usize = u16::MAX as usize;

/// Unwrap a required value. Absent and blank are both missing.
pub fn require(key: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingValue { key }),
    }
}

pub fn ssid(key: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.len() > MAX_SSID_LEN {
        return Err(ConfigError::InvalidValue {
            key,
            reason: format!("SSID is {} bytes, at most {MAX_SSID_LEN} allowed", value.len()),
        });
    }
    Ok(())
}

pub fn passphrase(key: &'static str, value: &Secret) -> Result<(), ConfigError> {
    if !WPA_PASSPHRASE_LEN.contains(&value.len()) {
        return Err(ConfigError::InvalidValue {
            key,
            reason: format!(
                "passphrase must be {}-{} bytes",
                WPA_PASSPHRASE_LEN.start(),
                WPA_PASSPHRASE_LEN.end()
            ),
        });
    }
    Ok(())
}

/// Hostname or IP literal only. A scheme or a port suffix is rejected.
/// IPv6 literals may be bare (`fd00::2`) or bracketed (`[fd00::2]`).
pub fn broker_host(key: &'static str, value: &str) -> Result<(), ConfigError> {
    let reason = if value.contains("://") {
        Some("must not include a scheme, set MQTT_TLS instead")
    } else if value.chars().any(char::is_whitespace) {
        Some("must not contain whitespace")
    } else if let Some(rest) = value.strip_prefix('[') {
        match rest.split_once(']') {
            Some((inner, "")) if inner.parse::<Ipv6Addr>().is_ok() => None,
            Some((inner, _)) if inner.parse::<Ipv6Addr>().is_ok() => {
                Some("must not include a port, set MQTT_PORT instead")
            }
            _ => Some("bracketed host must be an IPv6 address"),
        }
    } else if value.contains(':') && value.parse::<Ipv6Addr>().is_err() {
        Some("must not include a port, set MQTT_PORT instead")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(ConfigError::InvalidValue {
            key,
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Parse a port from text. Zero and anything outside `u16` are invalid.
pub fn port_str(key: &'static str, raw: &str) -> Result<u16, ConfigError> {
    match raw.trim().parse::<u16>() {
        Ok(p) if p != 0 => Ok(p),
        _ => Err(ConfigError::InvalidPort {
            key,
            value: raw.to_string(),
        }),
    }
}

pub fn port_int(key: &'static str, raw: i64) -> Result<u16, ConfigError> {
    match u16::try_from(raw) {
        Ok(p) if p != 0 => Ok(p),
        _ => Err(ConfigError::InvalidPort {
            key,
            value: raw.to_string(),
        }),
    }
}

pub fn flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            reason: format!("'{raw}' is not a boolean"),
        }),
    }
}

pub fn client_id(key: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidValue {
            key,
            reason: "must not contain whitespace".to_string(),
        });
    }
    let len = value.chars().count();
    if len > MAX_PORTABLE_CLIENT_ID_LEN {
        warn!(
            key,
            len,
            max = MAX_PORTABLE_CLIENT_ID_LEN,
            "client id is longer than MQTT 3.1.1 brokers must accept"
        );
    }
    Ok(())
}

/// A topic the controller publishes or subscribes to by exact name.
pub fn topic(key: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::EmptyTopic { key });
    }
    let reason = if value.contains(['+', '#']) {
        Some("wildcards '+' and '#' are not allowed".to_string())
    } else if value.contains('\0') {
        Some("must not contain NUL".to_string())
    } else if value.starts_with('$') {
        Some("topics starting with '$' are reserved for the broker".to_string())
    } else if value.len() > MAX_TOPIC_LEN {
        Some(format!("longer than {MAX_TOPIC_LEN} bytes"))
    } else {
        None
    };
    match reason {
        Some(reason) => Err(ConfigError::InvalidTopic { key, reason }),
        None => Ok(()),
    }
}

/// Reject the first pair of keys that resolve to the same topic.
pub fn distinct_topics(topics: &[(&'static str, &str)]) -> Result<(), ConfigError> {
    for (i, &(first, a)) in topics.iter().enumerate() {
        if let Some(&(second, _)) = topics[i + 1..].iter().find(|&&(_, b)| a == b) {
            return Err(ConfigError::DuplicateTopic {
                first,
                second,
                topic: a.to_string(),
            });
        }
    }
    Ok(())
}
