//! The single outbound call against Grafana's search API.

use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::Client;
use thiserror::Error;
use tracing::debug;

use crate::auth::Credentials;
use crate::model::Dashboard;

const SEARCH_PATH: &str = "api/search";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("build http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("request {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP Response: {}", .0.as_u16())]
    Status(StatusCode),
    #[error("read response body: {0}")]
    Body(#[source] reqwest::Error),
    #[error("decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Joins `rel` onto the path of `base`, cleaning the result the way
/// slash-separated paths are usually normalized: empty and `.` segments
/// dropped, `..` consuming its parent, never climbing above the root.
pub fn join_path(base: &Url, rel: &str) -> Url {
    let mut segments: Vec<&str> = Vec::new();
    for seg in base.path().split('/').chain(rel.split('/')) {
        match seg {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    let mut joined = base.clone();
    joined.set_path(&format!("/{}", segments.join("/")));
    joined
}

/// `<host>/api/search`, plus `query=<term>` when the trimmed term is non-empty.
/// Query pairs already present on the host are kept.
pub fn search_url(host: &Url, query: &str) -> Url {
    let mut url = join_path(host, SEARCH_PATH);
    let term = query.trim();
    if !term.is_empty() {
        url.query_pairs_mut().append_pair("query", term);
    }
    url
}

/// Blocking client for the search endpoint. TLS certificates are not verified.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: Client,
}

impl SearchClient {
    pub fn new() -> Result<Self, ClientError> {
        let http = Client::builder()
            .user_agent(concat!("grafana-dashboards/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self { http })
    }

    pub fn search(
        &self,
        url: &Url,
        credentials: &Credentials,
    ) -> Result<Vec<Dashboard>, ClientError> {
        debug!("Requesting: {url}");
        let request = credentials.apply(self.http.get(url.clone()));
        let resp = request.send().map_err(|source| ClientError::Network {
            url: url.to_string(),
            source,
        })?;

        let status = resp.status();
        debug!("Response Status: {status}");
        if status != StatusCode::OK {
            return Err(ClientError::Status(status));
        }

        let body = resp.bytes().map_err(ClientError::Body)?;
        let dashboards: Vec<Dashboard> = serde_json::from_slice(&body)?;
        debug!(count = dashboards.len(), "decoded search response");
        Ok(dashboards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn search_url_without_query() {
        let u = search_url(&url("https://g.example.com"), "");
        assert_eq!(u.as_str(), "https://g.example.com/api/search");
    }

    #[test]
    fn search_url_trims_and_encodes_query() {
        let u = search_url(&url("https://g.example.com"), "  cpu load & mem ");
        assert_eq!(
            u.as_str(),
            "https://g.example.com/api/search?query=cpu+load+%26+mem"
        );
    }

    #[test]
    fn blank_query_adds_no_parameter() {
        let u = search_url(&url("https://g.example.com"), "   \t");
        assert_eq!(u.query(), None);
    }

    #[test]
    fn search_url_keeps_path_prefix_and_existing_query() {
        let u = search_url(&url("https://g.example.com/grafana/?orgId=2"), "net");
        assert_eq!(
            u.as_str(),
            "https://g.example.com/grafana/api/search?orgId=2&query=net"
        );
    }

    #[test]
    fn join_path_cleans_segments() {
        let base = url("https://g.example.com/a//b/");
        assert_eq!(
            join_path(&base, "./c/../d/x").as_str(),
            "https://g.example.com/a/b/d/x"
        );
        assert_eq!(
            join_path(&url("https://g.example.com"), "/../../d/abc").as_str(),
            "https://g.example.com/d/abc"
        );
    }

    #[test]
    fn status_error_message() {
        let err = ClientError::Status(StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "HTTP Response: 401");
    }
}
