use grafana_dashboards::config::Config;
use grafana_dashboards::search_dashboards;
use mockito::{Matcher, Server};
use tempfile::TempDir;

fn config(host: &str, tmp: &TempDir) -> Config {
    let mut config = Config::new(host);
    config.netrc = Some(tmp.path().join("netrc"));
    config
}

#[test]
fn bearer_token_only_sends_bearer_header() {
    let mut server = Server::new();
    let bearer = server
        .mock("GET", "/api/search")
        .match_header("authorization", Matcher::Exact("Bearer svc-token".into()))
        .with_status(200)
        .with_body(r#"[{"uid":"a","title":"A","url":"/d/a/a","type":"dash-db"}]"#)
        .create();

    let tmp = TempDir::new().unwrap();
    let mut cfg = config(&server.url(), &tmp);
    cfg.api_token = Some("svc-token".into());
    // Basic credentials are ignored once a token is present.
    cfg.basic_user = Some("alice".into());
    cfg.basic_password = Some("pw".into());

    let out = search_dashboards(&cfg, "").unwrap();
    bearer.assert();
    assert_eq!(out.items.len(), 1);
    assert_eq!(out.items[0].arg, format!("{}/d/a/a", server.url()));
}

#[test]
fn host_path_prefix_is_kept_for_request_and_links() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/grafana/api/search")
        .match_query(Matcher::UrlEncoded("query".into(), "latency".into()))
        .with_status(200)
        .with_body(r#"[{"uid":"l","title":"Latency (p99)","url":"/d/l/latency","type":"dash-db","isStarred":true}]"#)
        .create();

    let tmp = TempDir::new().unwrap();
    let cfg = config(&format!("{}/grafana", server.url()), &tmp);

    let out = search_dashboards(&cfg, "latency").unwrap();
    mock.assert();
    let item = &out.items[0];
    assert_eq!(item.arg, format!("{}/grafana/d/l/latency", server.url()));
    assert_eq!(item.match_text, "Latency p99");
    assert_eq!(item.icon.path, "icons/star.svg");
}

#[test]
fn not_found_is_reported_with_status() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::Any)
        .with_status(404)
        .create();

    let tmp = TempDir::new().unwrap();
    let err = search_dashboards(&config(&server.url(), &tmp), "x").unwrap_err();
    mock.assert();
    assert_eq!(err.kind, "http-status");
    assert_eq!(err.code, 6);
    assert_eq!(err.message, "HTTP Response: 404");
    assert!(err.hint.is_none());
}

#[test]
fn unauthorized_carries_credentials_hint() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::Any)
        .with_status(401)
        .create();

    let tmp = TempDir::new().unwrap();
    let err = search_dashboards(&config(&server.url(), &tmp), "cpu").unwrap_err();
    mock.assert();
    assert_eq!(err.message, "HTTP Response: 401");
    assert!(err.hint.as_deref().unwrap_or_default().contains("GRAFANA_API_TOKEN"));
}

#[test]
fn order_and_count_follow_the_response() {
    let body: Vec<serde_json::Value> = (0..25)
        .map(|i| serde_json::json!({"uid": format!("u{i}"), "title": format!("T{i}"), "url": format!("/d/u{i}")}))
        .collect();
    let mut server = Server::new();
    server
        .mock("GET", "/api/search")
        .with_status(200)
        .with_body(serde_json::to_string(&body).unwrap())
        .create();

    let tmp = TempDir::new().unwrap();
    let out = search_dashboards(&config(&server.url(), &tmp), "").unwrap();
    let uids: Vec<String> = out.items.iter().map(|i| i.uid.clone()).collect();
    let expected: Vec<String> = (0..25).map(|i| format!("u{i}")).collect();
    assert_eq!(uids, expected);
}
