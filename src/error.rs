//! Process-boundary error reported by `main` as a JSON payload on stderr.

use std::fmt;

/// Terminal failure of a single invocation.
///
/// `code` doubles as the process exit status.
#[derive(Debug, Clone)]
pub struct CliError {
    pub code: i32,
    pub kind: &'static str,
    pub message: String,
    pub hint: Option<String>,
    pub retryable: bool,
}

impl CliError {
    pub fn config(message: impl Into<String>) -> Self {
        Self {
            code: 2,
            kind: "config",
            message: message.into(),
            hint: Some("set GRAFANA_HOST to the base URL, e.g. https://grafana.example.com".into()),
            retryable: false,
        }
    }

    pub fn logging(message: impl Into<String>) -> Self {
        Self {
            code: 3,
            kind: "logging",
            message: message.into(),
            hint: Some("check that LOG_FILE points to a writable location".into()),
            retryable: false,
        }
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self {
            code: 4,
            kind: "request",
            message: message.into(),
            hint: None,
            retryable: false,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self {
            code: 5,
            kind: "network",
            message: message.into(),
            hint: Some("check GRAFANA_HOST and network connectivity".into()),
            retryable: true,
        }
    }

    pub fn http_status(status: u16) -> Self {
        let hint = match status {
            401 | 403 => Some(
                "set GRAFANA_API_TOKEN, or GRAFANA_BASIC_AUTH_USER and GRAFANA_BASIC_AUTH_PASSWORD, or add the host to ~/.netrc"
                    .into(),
            ),
            _ => None,
        };
        Self {
            code: 6,
            kind: "http-status",
            message: format!("HTTP Response: {status}"),
            hint,
            retryable: status >= 500,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            code: 7,
            kind: "decode",
            message: message.into(),
            hint: None,
            retryable: false,
        }
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self {
            code: 8,
            kind: "output",
            message: message.into(),
            hint: None,
            retryable: false,
        }
    }

    /// JSON payload printed on stderr.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.code,
                "kind": self.kind,
                "message": self.message,
                "hint": self.hint,
                "retryable": self.retryable,
            }
        })
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for CliError {}
