use reqwest::Url;

use super::{AuthError, CredentialProvider, Credentials};

pub const API_TOKEN_VAR: &str = "GRAFANA_API_TOKEN";
pub const BASIC_USER_VAR: &str = "GRAFANA_BASIC_AUTH_USER";
pub const BASIC_PASSWORD_VAR: &str = "GRAFANA_BASIC_AUTH_PASSWORD";

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Service account / API token sent as `Authorization: Bearer <token>`.
pub struct BearerTokenProvider {
    token: Option<String>,
}

impl BearerTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

impl CredentialProvider for BearerTokenProvider {
    fn name(&self) -> &'static str {
        "api-token"
    }

    fn credentials(&self, _url: &Url) -> Result<Option<Credentials>, AuthError> {
        Ok(non_empty(&self.token).map(|t| Credentials::Bearer(t.to_string())))
    }
}

/// Explicit basic-auth pair. Only yields when both halves are present.
pub struct EnvBasicAuthProvider {
    user: Option<String>,
    password: Option<String>,
}

impl EnvBasicAuthProvider {
    pub fn new(user: Option<String>, password: Option<String>) -> Self {
        Self { user, password }
    }
}

impl CredentialProvider for EnvBasicAuthProvider {
    fn name(&self) -> &'static str {
        "basic-auth-env"
    }

    fn credentials(&self, _url: &Url) -> Result<Option<Credentials>, AuthError> {
        match (non_empty(&self.user), non_empty(&self.password)) {
            (Some(user), Some(password)) => Ok(Some(Credentials::basic(user, password))),
            (user, password) => {
                let mut missing = Vec::new();
                if user.is_none() {
                    missing.push(BASIC_USER_VAR);
                }
                if password.is_none() {
                    missing.push(BASIC_PASSWORD_VAR);
                }
                Err(AuthError::MissingEnv(missing))
            }
        }
    }
}
