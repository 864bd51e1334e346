//! 共享测试工具和辅助函数

#![allow(dead_code)]

use pihole_provider::{DomainFilter, Endpoint, PiholeConfig};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping test: {} is not set", $var);
                return;
            }
        )+
    };
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Err`，并返回错误值。
#[macro_export]
macro_rules! require_err {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        let Err(err) = res else {
            panic!("expected Err(..), got Ok");
        };
        err
    }};
}

pub const SID: &str = "vjKVh4qE0d7fWnHRMWXcfA=";

/// Body of a successful `POST /api/auth`.
pub fn session_body(sid: &str) -> Value {
    json!({
        "session": {
            "valid": true,
            "totp": false,
            "sid": sid,
            "csrf": "Ux9Dwwa2vWeIxjuHvyKZTQ=",
            "validity": 1800,
            "message": "password correct"
        },
        "took": 0.031
    })
}

/// Pi-hole error body.
pub fn error_body(key: &str, message: &str) -> Value {
    json!({
        "error": {"key": key, "message": message, "hint": null},
        "took": 0.002
    })
}

/// Body of `GET /api/config/dns/hosts`.
pub fn hosts_body(lines: &[&str]) -> Value {
    json!({"config": {"dns": {"hosts": lines}}, "took": 0.123})
}

/// Body of `GET /api/config/dns/cnameRecords`.
pub fn cnames_body(lines: &[&str]) -> Value {
    json!({"config": {"dns": {"cnameRecords": lines}}, "took": 0.123})
}

/// Success body of a PUT / DELETE on a DNS entry.
pub fn ok_body() -> Value {
    json!({"took": 0.004})
}

/// Starts a mock Pi-hole that accepts any login with [`SID`].
pub async fn authed_server() -> MockServer {
    let server = MockServer::start().await;
    mount_auth(&server, SID).await;
    server
}

/// Mounts a login endpoint answering with the given session id.
pub async fn mount_auth(server: &MockServer, sid: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body(sid)))
        .mount(server)
        .await;
}

/// Mounts both record collections with the given lines.
pub async fn mount_records(server: &MockServer, hosts: &[&str], cnames: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/api/config/dns/hosts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hosts_body(hosts)))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/config/dns/cnameRecords"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cnames_body(cnames)))
        .mount(server)
        .await;
}

/// Configuration pointing at the mock server.
pub fn config(server: &MockServer) -> PiholeConfig {
    PiholeConfig::builder(server.uri())
        .password("correct")
        .build()
}

/// Configuration pointing at the mock server with a domain filter.
pub fn filtered_config(server: &MockServer, domains: &[&str]) -> PiholeConfig {
    PiholeConfig::builder(server.uri())
        .password("correct")
        .domain_filter(DomainFilter::new(domains.iter().copied(), [""; 0]))
        .build()
}

pub fn endpoint(name: &str, record_type: &str, targets: &[&str]) -> Endpoint {
    Endpoint::new(
        name,
        record_type,
        targets.iter().map(|t| (*t).to_string()).collect(),
    )
}

/// Method and path of every request the server saw, excluding logins.
pub async fn api_calls(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() != "/api/auth")
        .map(|r| format!("{} {}", r.method, r.url.path()))
        .collect()
}
