//! Provider configuration
//!
//! Built either programmatically through [`PiholeConfig::builder`] or from the
//! process environment with [`PiholeConfig::from_env`]:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `PIHOLE_SERVER` | `http://pi.hole:80` |
//! | `PIHOLE_PASSWORD` | *(empty)* |
//! | `PIHOLE_TLS_INSECURE` | `false` |
//! | `PIHOLE_DRY_RUN` | `false` |
//! | `PIHOLE_REQUEST_TIMEOUT` | `30` (seconds) |
//! | `DOMAIN_FILTER` | *(empty, comma separated)* |
//! | `EXCLUDE_DOMAIN_FILTER` | *(empty, comma separated)* |
//! | `REGEXP_DOMAIN_FILTER` | *(empty)* |
//! | `REGEXP_DOMAIN_FILTER_EXCLUSION` | *(empty)* |

use std::time::Duration;

use regex::Regex;
use thiserror::Error;

use crate::domain_filter::DomainFilter;

/// Default Pi-hole address when `PIHOLE_SERVER` is unset.
pub const DEFAULT_SERVER: &str = "http://pi.hole:80";
/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Boolean variable with an unrecognised value
    #[error("{var}: expected a boolean, got '{value}'")]
    InvalidBool { var: &'static str, value: String },

    /// Numeric variable with an unparsable value
    #[error("{var}: expected a number of seconds, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },

    /// Regex variable that does not compile
    #[error("{var}: invalid regular expression: {source}")]
    InvalidRegex {
        var: &'static str,
        #[source]
        source: regex::Error,
    },
}

impl ConfigError {
    /// Name of the offending environment variable.
    pub fn var(&self) -> &'static str {
        match self {
            Self::InvalidBool { var, .. }
            | Self::InvalidNumber { var, .. }
            | Self::InvalidRegex { var, .. } => var,
        }
    }
}

/// Everything needed to talk to one Pi-hole server.
#[derive(Clone)]
pub struct PiholeConfig {
    /// Base URL, e.g. `http://pi.hole:80`, without trailing slash.
    pub server: String,
    /// Web interface / app password. May be empty for unprotected servers.
    pub password: String,
    /// Accept invalid TLS certificates (self-signed Pi-hole installs).
    pub tls_insecure_skip_verify: bool,
    /// Log mutations instead of sending them.
    pub dry_run: bool,
    pub domain_filter: DomainFilter,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for PiholeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiholeConfig")
            .field("server", &self.server)
            .field("password", &"<redacted>")
            .field("tls_insecure_skip_verify", &self.tls_insecure_skip_verify)
            .field("dry_run", &self.dry_run)
            .field("domain_filter", &self.domain_filter.to_string())
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Default for PiholeConfig {
    fn default() -> Self {
        Self::builder(DEFAULT_SERVER).build()
    }
}

impl PiholeConfig {
    /// Returns a builder for the given server URL.
    pub fn builder(server: impl Into<String>) -> PiholeConfigBuilder {
        PiholeConfigBuilder::new(server.into())
    }

    /// Loads the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = lookup("PIHOLE_SERVER").unwrap_or_else(|| DEFAULT_SERVER.to_string());
        let password = lookup("PIHOLE_PASSWORD").unwrap_or_default();
        let tls_insecure = parse_bool("PIHOLE_TLS_INSECURE", lookup("PIHOLE_TLS_INSECURE"))?;
        let dry_run = parse_bool("PIHOLE_DRY_RUN", lookup("PIHOLE_DRY_RUN"))?;
        let request_timeout = parse_secs(
            "PIHOLE_REQUEST_TIMEOUT",
            lookup("PIHOLE_REQUEST_TIMEOUT"),
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;

        let regex_filter = lookup("REGEXP_DOMAIN_FILTER").unwrap_or_default();
        let domain_filter = if regex_filter.is_empty() {
            DomainFilter::new(
                split_list(lookup("DOMAIN_FILTER")),
                split_list(lookup("EXCLUDE_DOMAIN_FILTER")),
            )
        } else {
            let regex = compile("REGEXP_DOMAIN_FILTER", &regex_filter)?;
            let exclusion = match lookup("REGEXP_DOMAIN_FILTER_EXCLUSION") {
                Some(pattern) if !pattern.is_empty() => {
                    Some(compile("REGEXP_DOMAIN_FILTER_EXCLUSION", &pattern)?)
                }
                _ => None,
            };
            DomainFilter::with_regex(regex, exclusion)
        };

        Ok(Self::builder(server)
            .password(password)
            .tls_insecure_skip_verify(tls_insecure)
            .dry_run(dry_run)
            .domain_filter(domain_filter)
            .request_timeout(request_timeout)
            .build())
    }
}

/// Builder for [`PiholeConfig`].
pub struct PiholeConfigBuilder {
    config: PiholeConfig,
}

impl PiholeConfigBuilder {
    fn new(server: String) -> Self {
        Self {
            config: PiholeConfig {
                server: server.trim().trim_end_matches('/').to_string(),
                password: String::new(),
                tls_insecure_skip_verify: false,
                dry_run: false,
                domain_filter: DomainFilter::allow_all(),
                connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
                request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            },
        }
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    pub fn tls_insecure_skip_verify(mut self, skip: bool) -> Self {
        self.config.tls_insecure_skip_verify = skip;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    pub fn domain_filter(mut self, filter: DomainFilter) -> Self {
        self.config.domain_filter = filter;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn build(self) -> PiholeConfig {
        self.config
    }
}

fn parse_bool(var: &'static str, value: Option<String>) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_lowercase().as_str() {
        "" | "false" | "0" | "no" => Ok(false),
        "true" | "1" | "yes" => Ok(true),
        _ => Err(ConfigError::InvalidBool { var, value }),
    }
}

fn parse_secs(var: &'static str, value: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(Duration::from_secs(default)),
        Some(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidNumber {
                var,
                value: raw.to_string(),
            }),
    }
}

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .map(|v| v.split(',').map(str::to_string).collect())
        .unwrap_or_default()
}

fn compile(var: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidRegex { var, source })
}
