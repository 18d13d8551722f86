//! Minimal `.netrc` reader used as the last credential source.
//!
//! Supports `machine`, `default`, `login`, `password`, `account`, `port`,
//! `macdef` (body skipped up to the next blank line) and `#` comments.

use std::fs;
use std::path::{Path, PathBuf};

use reqwest::Url;
use tracing::info;

use super::{AuthError, CredentialProvider, Credentials};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Machine {
    pub login: String,
    pub password: String,
    pub account: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Netrc {
    pub hosts: Vec<(String, Machine)>,
    pub default: Option<Machine>,
}

enum Entry {
    Host(String),
    Default,
}

impl Netrc {
    /// Parses netrc text. Errors carry a 1-based line number and reason.
    pub fn parse(text: &str) -> Result<Self, (usize, String)> {
        let mut tokens: Vec<(usize, &str)> = Vec::new();
        let mut in_macdef = false;
        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            if in_macdef {
                if line.trim().is_empty() {
                    in_macdef = false;
                }
                continue;
            }
            let mut words = line.split_whitespace();
            while let Some(word) = words.next() {
                if word.starts_with('#') {
                    break;
                }
                if word == "macdef" {
                    if words.next().is_none() {
                        return Err((line_no, "macdef without a name".into()));
                    }
                    in_macdef = true;
                    break;
                }
                tokens.push((line_no, word));
            }
        }

        let mut netrc = Netrc::default();
        let mut current: Option<(Entry, Machine)> = None;
        let mut iter = tokens.into_iter();

        while let Some((line_no, token)) = iter.next() {
            match token {
                "machine" | "default" => {
                    if let Some(done) = current.take() {
                        netrc.push(done);
                    }
                    let entry = if token == "machine" {
                        let (_, name) = iter
                            .next()
                            .ok_or((line_no, "machine without a name".to_string()))?;
                        Entry::Host(name.to_string())
                    } else {
                        Entry::Default
                    };
                    current = Some((entry, Machine::default()));
                }
                "login" | "password" | "account" | "port" => {
                    let (_, value) = iter
                        .next()
                        .ok_or((line_no, format!("{token} without a value")))?;
                    let Some((_, machine)) = current.as_mut() else {
                        return Err((line_no, format!("{token} outside of a machine entry")));
                    };
                    match token {
                        "login" => machine.login = value.to_string(),
                        "password" => machine.password = value.to_string(),
                        "account" => machine.account = Some(value.to_string()),
                        _ => {
                            let port = value
                                .parse()
                                .map_err(|_| (line_no, format!("invalid port {value:?}")))?;
                            machine.port = Some(port);
                        }
                    }
                }
                other => return Err((line_no, format!("unexpected token {other:?}"))),
            }
        }
        if let Some(done) = current.take() {
            netrc.push(done);
        }
        Ok(netrc)
    }

    fn push(&mut self, (entry, machine): (Entry, Machine)) {
        match entry {
            Entry::Host(name) => self.hosts.push((name, machine)),
            // Only the first default counts.
            Entry::Default => {
                if self.default.is_none() {
                    self.default = Some(machine);
                }
            }
        }
    }

    /// Entry for `url`: `host:port` when the URL names a port, then the bare
    /// host, then `default`. Entries declaring a `port` must match it.
    pub fn find(&self, url: &Url) -> Option<&Machine> {
        let host = url.host_str()?;
        let port = url.port_or_known_default();
        let port_ok = |m: &Machine| m.port.is_none() || m.port == port;

        let with_port = url.port().map(|p| format!("{host}:{p}"));
        with_port
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(host))
            .find_map(|candidate| {
                self.hosts
                    .iter()
                    .find(|(name, m)| name.eq_ignore_ascii_case(candidate) && port_ok(m))
                    .map(|(_, m)| m)
            })
            .or(self.default.as_ref())
    }

    pub fn load(path: &Path) -> Result<Self, AuthError> {
        let text = fs::read_to_string(path).map_err(|source| AuthError::NetrcRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|(line, reason)| AuthError::NetrcParse {
            path: path.to_path_buf(),
            line,
            reason,
        })
    }
}

/// Looks up the request host in a netrc file (`~/.netrc` unless overridden).
pub struct NetrcProvider {
    path: Option<PathBuf>,
}

impl NetrcProvider {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    fn path(&self) -> Result<PathBuf, AuthError> {
        match &self.path {
            Some(p) => Ok(p.clone()),
            None => dirs::home_dir()
                .map(|h| h.join(".netrc"))
                .ok_or(AuthError::NoHome),
        }
    }
}

impl CredentialProvider for NetrcProvider {
    fn name(&self) -> &'static str {
        "netrc"
    }

    fn credentials(&self, url: &Url) -> Result<Option<Credentials>, AuthError> {
        let host = url.host_str().ok_or(AuthError::NoHost)?;
        let path = self.path()?;
        let netrc = Netrc::load(&path)?;
        let machine = netrc.find(url).ok_or_else(|| AuthError::NetrcNoMachine {
            host: host.to_string(),
            path: path.clone(),
        })?;
        if machine.login.is_empty() {
            return Ok(None);
        }
        info!("load credentials: found credentials in netrc");
        Ok(Some(Credentials::basic(
            machine.login.clone(),
            machine.password.clone(),
        )))
    }
}
