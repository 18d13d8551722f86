//! Runtime configuration resolved from the command line and environment.

use std::path::PathBuf;

use clap::Parser;
use reqwest::Url;
use tracing::Level;

use crate::auth::env::{API_TOKEN_VAR, BASIC_PASSWORD_VAR, BASIC_USER_VAR};
use crate::error::CliError;

pub const DEFAULT_LOG_FILE: &str = "dashboards.log";

/// Command-line interface. Every option can also be set through the
/// environment variable named in its help.
#[derive(Parser, Debug)]
#[command(
    name = "grafana-dashboards",
    version,
    about = "Search Grafana dashboards and print Alfred script filter JSON"
)]
pub struct Cli {
    /// Search term; blank lists every dashboard. Terms may start with `-`;
    /// pass them after `--` to search for `--help` or a flag name.
    #[arg(allow_hyphen_values = true)]
    pub query: Option<String>,

    /// Grafana base URL, e.g. https://grafana.example.com
    #[arg(long, env = "GRAFANA_HOST")]
    pub host: String,

    /// API / service account token sent as a bearer token
    #[arg(long, env = API_TOKEN_VAR, hide_env_values = true)]
    pub api_token: Option<String>,

    /// Basic auth user
    #[arg(long, env = BASIC_USER_VAR)]
    pub user: Option<String>,

    /// Basic auth password
    #[arg(long, env = BASIC_PASSWORD_VAR, hide_env_values = true)]
    pub password: Option<String>,

    /// netrc file consulted when no explicit credentials are set [default: ~/.netrc]
    #[arg(long, env = "NETRC")]
    pub netrc: Option<PathBuf>,

    /// Log file, opened in append mode
    #[arg(long, env = "LOG_FILE", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// DEBUG or INFO
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub file: PathBuf,
    pub level: Level,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_LOG_FILE),
            level: Level::INFO,
        }
    }
}

/// `DEBUG` turns on debug output; anything else means info.
pub fn parse_level(value: Option<&str>) -> Level {
    match value.map(str::trim) {
        Some("DEBUG") => Level::DEBUG,
        _ => Level::INFO,
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub host: String,
    pub api_token: Option<String>,
    pub basic_user: Option<String>,
    pub basic_password: Option<String>,
    pub netrc: Option<PathBuf>,
    pub log: LogConfig,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Config {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    pub fn from_cli(cli: &Cli) -> Self {
        let log_file = if cli.log_file.as_os_str().is_empty() {
            PathBuf::from(DEFAULT_LOG_FILE)
        } else {
            cli.log_file.clone()
        };
        Self {
            host: cli.host.trim().to_string(),
            api_token: non_empty(cli.api_token.clone()),
            basic_user: non_empty(cli.user.clone()),
            basic_password: non_empty(cli.password.clone()),
            netrc: cli.netrc.clone().filter(|p| !p.as_os_str().is_empty()),
            log: LogConfig {
                file: log_file,
                level: parse_level(cli.log_level.as_deref()),
            },
        }
    }

    pub fn host_url(&self) -> Result<Url, CliError> {
        if self.host.is_empty() {
            return Err(CliError::config("GRAFANA_HOST is not set"));
        }
        Url::parse(&self.host)
            .map_err(|e| CliError::config(format!("parse GRAFANA_HOST {:?}: {e}", self.host)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("grafana-dashboards").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn level_selection() {
        assert_eq!(parse_level(Some("DEBUG")), Level::DEBUG);
        assert_eq!(parse_level(Some("INFO")), Level::INFO);
        assert_eq!(parse_level(Some("debug")), Level::INFO);
        assert_eq!(parse_level(Some("TRACE")), Level::INFO);
        assert_eq!(parse_level(None), Level::INFO);
    }

    #[test]
    fn flags_map_into_config() {
        let cli = parse(&[
            "--host",
            " https://g.example.com ",
            "--user",
            "alice",
            "--password",
            "",
            "--log-file",
            "/tmp/x.log",
            "--log-level",
            "DEBUG",
            "cpu",
        ]);
        let config = Config::from_cli(&cli);
        assert_eq!(config.host, "https://g.example.com");
        assert_eq!(config.basic_user.as_deref(), Some("alice"));
        assert_eq!(config.basic_password, None);
        assert_eq!(config.log.file, PathBuf::from("/tmp/x.log"));
        assert_eq!(config.log.level, Level::DEBUG);
        assert_eq!(cli.query.as_deref(), Some("cpu"));
    }

    #[test]
    fn hyphenated_query_is_a_search_term() {
        let cli = parse(&["--host", "https://g.example.com", "-cpu"]);
        assert_eq!(cli.query.as_deref(), Some("-cpu"));
        assert_eq!(cli.host, "https://g.example.com");

        let cli = parse(&["--host", "https://g.example.com", "--", "--help"]);
        assert_eq!(cli.query.as_deref(), Some("--help"));

        let cli = parse(&["--host", "https://g.example.com", "-"]);
        assert_eq!(cli.query.as_deref(), Some("-"));
    }

    #[test]
    fn host_url_errors_are_config_errors() {
        let err = Config::new("").host_url().unwrap_err();
        assert_eq!(err.kind, "config");
        let err = Config::new("not a url").host_url().unwrap_err();
        assert_eq!(err.code, 2);
        assert!(Config::new("https://g.example.com/grafana").host_url().is_ok());
    }
}
