//! Pi-hole DNS Provider
//!
//! Talks to the Pi-hole v6 REST API (`/api`). Local DNS entries live in two
//! configuration arrays: `dns.hosts` (`"<ip> <name>"`, A and AAAA) and
//! `dns.cnameRecords` (`"<name>,<target>"`).

mod error;
mod http;
mod provider;
mod records;
mod types;

use reqwest::Client;
use tokio::sync::RwLock;

use crate::PROVIDER_NAME;
use crate::config::PiholeConfig;
use crate::domain_filter::DomainFilter;
use crate::error::{ProviderError, Result};
use crate::providers::common::create_http_client;

pub use provider::PiholeProvider;
pub(crate) use types::Session;

/// Prefix of every Pi-hole API path.
pub(crate) const API_PREFIX: &str = "/api";
/// Session endpoint (login / logout).
pub(crate) const AUTH_PATH: &str = "/auth";
/// A / AAAA entries.
pub(crate) const HOSTS_PATH: &str = "/config/dns/hosts";
/// CNAME entries.
pub(crate) const CNAME_PATH: &str = "/config/dns/cnameRecords";
/// Header carrying the session id.
pub(crate) const SID_HEADER: &str = "sid";

/// Session-holding client for one Pi-hole server.
///
/// # Construction
///
/// ```rust,no_run
/// use pihole_provider::{PiholeClient, PiholeConfig};
///
/// # async fn example() -> pihole_provider::Result<()> {
/// let config = PiholeConfig::builder("http://pi.hole")
///     .password("app-password")
///     .build();
/// let client = PiholeClient::connect(&config).await?;
/// # Ok(())
/// # }
/// ```
pub struct PiholeClient {
    pub(crate) client: Client,
    pub(crate) server: String,
    pub(crate) password: String,
    pub(crate) dry_run: bool,
    pub(crate) domain_filter: DomainFilter,
    pub(crate) session: RwLock<Option<Session>>,
}

impl std::fmt::Debug for PiholeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiholeClient")
            .field("server", &self.server)
            .field("dry_run", &self.dry_run)
            .field("domain_filter", &self.domain_filter.to_string())
            .finish_non_exhaustive()
    }
}

impl PiholeClient {
    /// Builds the HTTP client and logs in once.
    pub async fn connect(config: &PiholeConfig) -> Result<Self> {
        if config.server.is_empty() {
            return Err(ProviderError::InvalidParameter {
                provider: PROVIDER_NAME.to_string(),
                param: "server".to_string(),
                detail: "no Pi-hole server URL configured".to_string(),
            });
        }

        let client = Self {
            client: create_http_client(config)?,
            server: config.server.clone(),
            password: config.password.clone(),
            dry_run: config.dry_run,
            domain_filter: config.domain_filter.clone(),
            session: RwLock::new(None),
        };
        client.authenticate().await?;
        Ok(client)
    }

    /// Current session id, if the server issued one.
    pub async fn session_id(&self) -> Option<String> {
        self.session
            .read()
            .await
            .as_ref()
            .and_then(|s| s.sid.clone())
    }

    /// Domain filter applied to listed and modified names.
    pub fn domain_filter(&self) -> &DomainFilter {
        &self.domain_filter
    }
}
