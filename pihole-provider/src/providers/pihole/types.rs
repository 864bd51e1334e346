//! Pi-hole API 类型定义

use serde::{Deserialize, Serialize};

/// `POST /api/auth` body
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub password: &'a str,
}

/// `POST /api/auth` response
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub session: Session,
    #[allow(dead_code)]
    #[serde(default)]
    pub took: f64,
}

/// Pi-hole session as returned by the login endpoint.
///
/// `sid` is `null` when the server has no password set.
#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub valid: bool,
    #[serde(default)]
    pub sid: Option<String>,
    /// Seconds until the session expires without activity.
    #[allow(dead_code)]
    #[serde(default)]
    pub validity: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /api/config/dns/{hosts,cnameRecords}` response
#[derive(Debug, Deserialize)]
pub struct RecordsResponse {
    pub config: RecordsConfig,
    #[allow(dead_code)]
    #[serde(default)]
    pub took: f64,
}

#[derive(Debug, Deserialize)]
pub struct RecordsConfig {
    pub dns: DnsConfig,
}

/// Only the requested array is present in a filtered config response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsConfig {
    #[serde(default)]
    pub hosts: Vec<String>,
    #[serde(default)]
    pub cname_records: Vec<String>,
}

/// Error body: `{"error": {"key": "...", "message": "...", "hint": ...}, "took": ...}`
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub key: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub hint: Option<String>,
}

impl ErrorDetail {
    /// Message with the hint appended, when Pi-hole sends one.
    pub fn full_message(&self) -> String {
        match self.hint.as_deref() {
            Some(hint) if !hint.is_empty() => format!("{} ({hint})", self.message),
            _ => self.message.clone(),
        }
    }
}

/// One parsed local DNS entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub name: String,
    pub target: String,
    /// Per-entry TTL, only CNAME entries carry one.
    pub ttl: Option<i64>,
}

impl Host {
    /// Parses a `dns.hosts` line: `<ip> <name> [<name>...]`. Only the first name is used.
    pub fn from_hosts_line(line: &str) -> Option<Self> {
        let mut fields = line.split_whitespace();
        let target = fields.next()?;
        let name = fields.next()?;
        Some(Self {
            name: name.to_string(),
            target: target.to_string(),
            ttl: None,
        })
    }

    /// Parses a `dns.cnameRecords` line: `<name>,<target>[,<ttl>]`.
    ///
    /// The TTL is kept: Pi-hole only matches a stored entry on delete when the
    /// path repeats it. A TTL that is not a number rejects the line.
    pub fn from_cname_line(line: &str) -> Option<Self> {
        let mut fields = line.split(',').map(str::trim);
        let name = fields.next().filter(|s| !s.is_empty())?;
        let target = fields.next().filter(|s| !s.is_empty())?;
        let ttl = match fields.next() {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<i64>().ok()?),
        };
        Some(Self {
            name: name.to_string(),
            target: target.to_string(),
            ttl,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosts_line_tolerates_extra_whitespace() {
        let host = Host::from_hosts_line("1.1.1.1 test-one.example.io ").unwrap();
        assert_eq!(host.name, "test-one.example.io");
        assert_eq!(host.target, "1.1.1.1");
    }

    #[test]
    fn hosts_line_without_name_is_rejected() {
        assert_eq!(Host::from_hosts_line("1.1.1.1"), None);
        assert_eq!(Host::from_hosts_line(""), None);
    }

    #[test]
    fn cname_line_keeps_ttl() {
        let host = Host::from_cname_line("a.example.io,b.example.io,300").unwrap();
        assert_eq!(host.name, "a.example.io");
        assert_eq!(host.target, "b.example.io");
        assert_eq!(host.ttl, Some(300));
        assert_eq!(Host::from_cname_line("a.example.io,b.example.io").unwrap().ttl, None);
        assert_eq!(Host::from_cname_line("a.example.io,b.example.io,soon"), None);
        assert_eq!(Host::from_cname_line("a.example.io"), None);
        assert_eq!(Host::from_cname_line("a.example.io,"), None);
    }

    #[test]
    fn login_response_with_null_sid() {
        let resp: LoginResponse = serde_json::from_str(
            r#"{"session":{"valid":true,"totp":false,"sid":null,"validity":-1,"message":"no password set"},"took":0.001}"#,
        )
        .unwrap();
        assert!(resp.session.valid);
        assert_eq!(resp.session.sid, None);
    }

    #[test]
    fn error_detail_appends_hint() {
        let err: ErrorResponse = serde_json::from_str(
            r#"{"error":{"key":"bad_request","message":"Item already present","hint":"Uniqueness of items is enforced"},"took":0.0}"#,
        )
        .unwrap();
        assert_eq!(err.error.key, "bad_request");
        assert_eq!(
            err.error.full_message(),
            "Item already present (Uniqueness of items is enforced)"
        );
    }
}
