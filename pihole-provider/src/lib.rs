//! # pihole-provider
//!
//! An [external-dns](https://github.com/kubernetes-sigs/external-dns) provider that
//! manages local DNS records on a [Pi-hole](https://pi-hole.net/) server through its
//! v6 REST API.
//!
//! ## Supported Records
//!
//! | Type | Pi-hole setting | Entry format |
//! |------|-----------------|--------------|
//! | `A` | `dns.hosts` | `<ipv4> <name>` |
//! | `AAAA` | `dns.hosts` | `<ipv6> <name>` |
//! | `CNAME` | `dns.cnameRecords` | `<name>,<target>` |
//!
//! Every other record type is dropped by [`Provider::adjust_endpoints`].
//!
//! ## Feature Flags
//!
//! ### TLS Backend
//!
//! - **`native-tls`** *(default)*: use the platform's native TLS implementation.
//! - **`rustls`**: use rustls. Recommended for static and cross-compiled builds.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pihole_provider::{create_provider, Changes, Endpoint, PiholeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1. Connect and log in
//!     let config = PiholeConfig::builder("http://pi.hole")
//!         .password("app-password")
//!         .build();
//!     let provider = create_provider(config).await?;
//!
//!     // 2. List current local DNS records
//!     for ep in provider.records().await? {
//!         println!("{} {} -> {:?}", ep.dns_name, ep.record_type, ep.targets);
//!     }
//!
//!     // 3. Apply a change-set
//!     let changes = Changes {
//!         create: vec![Endpoint::new("nas.home.lan", "A", vec!["192.168.1.20".into()])],
//!         ..Default::default()
//!     };
//!     provider.apply_changes(&changes).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! Configuration can also be read from the environment, see
//! [`PiholeConfig::from_env`] and [`create_provider_from_env`].
//!
//! ## Error Handling
//!
//! All provider operations return [`Result<T, ProviderError>`](ProviderError).
//! The error enum provides structured variants for common failure modes:
//!
//! - [`ProviderError::InvalidCredentials`]: login failed, or the session was
//!   rejected twice in a row
//! - [`ProviderError::RecordExists`]: Pi-hole already holds the entry
//! - [`ProviderError::QuotaExceeded`]: every API seat is taken
//! - [`ProviderError::NetworkError`]: network connectivity issue
//!
//! An expired session is renewed once transparently. Nothing else is retried.

mod config;
mod domain_filter;
mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

/// Identifier of this provider, used as log prefix and in errors.
pub const PROVIDER_NAME: &str = "pihole";

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export configuration
pub use config::{ConfigError, DEFAULT_SERVER, PiholeConfig, PiholeConfigBuilder};
pub use domain_filter::DomainFilter;

// Re-export factory functions
pub use factory::{create_provider, create_provider_from_env};

// Re-export core trait only (internal traits are not exported)
pub use traits::Provider;

// Re-export types
pub use types::{Changes, Endpoint, ProviderSpecificProperty, RecordType};

// Re-export concrete provider
pub use providers::{PiholeClient, PiholeProvider};
