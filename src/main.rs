//! garden-config — startup check for the controller configuration.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI args
//!   3. Init logger (CLI `-v` flags > `GARDEN_LOG_LEVEL` > `RUST_LOG` > info)
//!   4. Load and validate config
//!   5. Install it as the process-wide configuration
//!   6. Report and exit; any error exits 1 before anything touches the network

use tracing::{debug, info};

use garden_config::config::{self, Configuration};
use garden_config::error::AppError;
use garden_config::{logger, provider};

const USAGE: &str = "\
Usage: garden-config [OPTIONS]

Options:
  -h, --help                 Print help
  -f, --config <PATH>        Path to configuration file (default: config/default.toml)
      --print                Print the resolved configuration as TOML, secrets redacted
  -v, -vv                    Increase logging verbosity (debug, trace)

Environment:
  GARDEN_CONFIG              Configuration file used when -f is not given
  GARDEN_LOG_LEVEL           Log level when no -v flag is given (default: info)";

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    // .env is optional.
    let _ = dotenvy::dotenv();

    let args = match parse_cli_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("error: {msg}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let level_source = logger::init_from(args.log_level)?;
    debug!(?level_source, "logger ready");

    let loaded = config::load(args.config_path.as_deref())?;
    let cfg = provider::install(loaded)?;
    log_summary(cfg);

    if args.print {
        let rendered = cfg
            .to_redacted_toml()
            .map_err(|e| AppError::Io(std::io::Error::other(e)))?;
        print!("{rendered}");
    } else {
        println!(
            "✓ configuration valid: client_id={} broker={}",
            cfg.mqtt.client_id,
            cfg.mqtt.broker_url()
        );
    }

    Ok(())
}

fn log_summary(cfg: &Configuration) {
    info!(
        ssid = %cfg.wifi.ssid,
        broker = %cfg.mqtt.broker_url(),
        username = %cfg.mqtt.username,
        client_id = %cfg.mqtt.client_id,
        sensor_topic = %cfg.mqtt.topics.sensor,
        command_topic = %cfg.mqtt.topics.command,
        device_topic = %cfg.mqtt.topics.device,
        "config loaded"
    );
}

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    log_level: Option<&'static str>,
    config_path: Option<String>,
    print: bool,
    help: bool,
}

fn parse_cli_args<I: Iterator<Item = String>>(mut iter: I) -> Result<CliArgs, String> {
    let mut verbosity = 0u8;
    let mut args = CliArgs::default();

    while let Some(arg) = iter.next() {
        if arg == "--" {
            break;
        }

        match arg.as_str() {
            "-h" | "--help" => args.help = true,
            "--print" => args.print = true,
            "-f" | "--config" => match iter.next() {
                Some(path) => args.config_path = Some(path),
                None => return Err("-f/--config requires a path argument".into()),
            },
            "--verbose" => verbosity = verbosity.saturating_add(1),
            a if a.starts_with('-') && a.len() > 1 && a.chars().skip(1).all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((a.len() - 1) as u8);
            }
            other => return Err(format!("unexpected argument '{other}'")),
        }
    }

    args.log_level = logger::level_for_verbosity(verbosity);

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, String> {
        parse_cli_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_args_defaults() {
        assert_eq!(parse(&[]).unwrap(), CliArgs::default());
    }

    #[test]
    fn verbosity_tiers() {
        assert_eq!(parse(&[]).unwrap().log_level, None);
        assert_eq!(parse(&["-v"]).unwrap().log_level, Some("debug"));
        assert_eq!(parse(&["--verbose"]).unwrap().log_level, Some("debug"));
        assert_eq!(parse(&["-vv"]).unwrap().log_level, Some("trace"));
        assert_eq!(parse(&["-v", "--verbose", "-vvv"]).unwrap().log_level, Some("trace"));
    }

    #[test]
    fn config_path_and_print() {
        let args = parse(&["-f", "/etc/garden.toml", "--print"]).unwrap();
        assert_eq!(args.config_path.as_deref(), Some("/etc/garden.toml"));
        assert!(args.print);
    }

    #[test]
    fn config_flag_without_path_errors() {
        assert!(parse(&["--config"]).is_err());
    }

    #[test]
    fn unknown_argument_errors() {
        let err = parse(&["--frobnicate"]).unwrap_err();
        assert!(err.contains("--frobnicate"));
    }

    #[test]
    fn double_dash_stops_parsing() {
        let args = parse(&["--", "--frobnicate"]).unwrap();
        assert!(!args.print);
    }
}
