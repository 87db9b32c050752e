//! Logging for the garden-config binary.
//!
//! The level comes from, in order: `-v` flags on the command line, the
//! `GARDEN_LOG_LEVEL` variable, then `RUST_LOG`, then `info`. Call
//! [`init_from`] once at startup, before the configuration is loaded, so
//! loader warnings reach the operator.

use tracing::level_filters::LevelFilter;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Env var consulted for the log level when no CLI verbosity is given.
pub const LOG_LEVEL_ENV: &str = "GARDEN_LOG_LEVEL";

const DEFAULT_LEVEL: &str = "info";

/// Where the effective log level came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelSource {
    Cli,
    Env,
    /// Neither was given; `RUST_LOG` may still override `info`.
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelChoice<'a> {
    pub level: &'a str,
    pub source: LevelSource,
    /// A `GARDEN_LOG_LEVEL` value that was set but not understood.
    pub rejected_env: Option<&'a str>,
}

/// Level for a count of `-v` flags. No flags leaves the choice to the
/// environment; each flag is one step above the `info` default.
pub fn level_for_verbosity(count: u8) -> Option<&'static str> {
    match count {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Pick the level without touching the process environment.
pub fn resolve_level<'a>(cli: Option<&'a str>, env: Option<&'a str>) -> LevelChoice<'a> {
    let env = env.map(str::trim).filter(|v| !v.is_empty());
    if let Some(level) = cli {
        return LevelChoice {
            level,
            source: LevelSource::Cli,
            rejected_env: None,
        };
    }
    match env {
        Some(level) if parse_level(level).is_ok() => LevelChoice {
            level,
            source: LevelSource::Env,
            rejected_env: None,
        },
        rejected => LevelChoice {
            level: DEFAULT_LEVEL,
            source: LevelSource::Default,
            rejected_env: rejected,
        },
    }
}

/// Resolve the level against `GARDEN_LOG_LEVEL` and install the subscriber.
pub fn init_from(cli: Option<&str>) -> Result<LevelSource, AppError> {
    let env = std::env::var(LOG_LEVEL_ENV).ok();
    let choice = resolve_level(cli, env.as_deref());
    init(choice.level, choice.source != LevelSource::Default)?;
    if let Some(bad) = choice.rejected_env {
        warn!(var = LOG_LEVEL_ENV, value = bad, "unrecognised log level, using default");
    }
    Ok(choice.source)
}

/// Install the global subscriber, writing to stderr.
///
/// With `prefer_level` set, `level` wins over `RUST_LOG`. Otherwise
/// `RUST_LOG` wins and `level` is the fallback.
pub fn init(level: &str, prefer_level: bool) -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter_for(level, prefer_level)?)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::Logger(format!("failed to set subscriber: {e}")))
}

fn filter_for(level: &str, prefer_level: bool) -> Result<EnvFilter, AppError> {
    let from_level = || {
        EnvFilter::try_new(level)
            .map_err(|e| AppError::Logger(format!("invalid log level '{level}': {e}")))
    };
    if prefer_level {
        from_level()
    } else {
        EnvFilter::try_from_default_env().or_else(|_| from_level())
    }
}

/// Parse a single level name (`error` through `trace`, or `off`).
pub fn parse_level(level: &str) -> Result<LevelFilter, AppError> {
    if level.is_empty() {
        return Err(AppError::Logger("log level must not be empty".into()));
    }
    level
        .parse::<LevelFilter>()
        .map_err(|_| AppError::Logger(format!("unrecognised log level: '{level}'")))
}
