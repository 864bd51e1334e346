//! Pi-hole local DNS entries: listing, creation and deletion per record type

use std::net::{Ipv4Addr, Ipv6Addr};

use async_trait::async_trait;
use reqwest::Method;

use crate::PROVIDER_NAME;
use crate::error::{ProviderError, Result};
use crate::providers::common::normalize_domain_name;
use crate::traits::{ErrorContext, PiholeApi};
use crate::types::{Endpoint, RecordType};

use super::types::{Host, RecordsResponse};
use super::{CNAME_PATH, HOSTS_PATH, PiholeClient};

/// Collection path holding entries of the given type.
pub(crate) fn collection_path(record_type: RecordType) -> &'static str {
    match record_type {
        RecordType::A | RecordType::Aaaa => HOSTS_PATH,
        RecordType::Cname => CNAME_PATH,
    }
}

/// The entry string as Pi-hole stores it. A positive TTL is appended to CNAME entries.
pub(crate) fn entry(record_type: RecordType, name: &str, target: &str, ttl: Option<i64>) -> String {
    match (record_type, ttl) {
        (RecordType::A | RecordType::Aaaa, _) => format!("{target} {name}"),
        (RecordType::Cname, Some(ttl)) if ttl > 0 => format!("{name},{target},{ttl}"),
        (RecordType::Cname, _) => format!("{name},{target}"),
    }
}

/// Path addressing a single entry, e.g. `/config/dns/hosts/1.1.1.1%20a.example.io`.
pub(crate) fn entry_path(
    record_type: RecordType,
    name: &str,
    target: &str,
    ttl: Option<i64>,
) -> String {
    format!(
        "{}/{}",
        collection_path(record_type),
        urlencoding::encode(&entry(record_type, name, target, ttl))
    )
}

/// Whether a hosts-file target belongs to the requested address family.
fn target_matches_type(record_type: RecordType, target: &str) -> bool {
    match record_type {
        RecordType::A => target.parse::<Ipv4Addr>().is_ok(),
        RecordType::Aaaa => target.parse::<Ipv6Addr>().is_ok(),
        RecordType::Cname => true,
    }
}

impl RecordsResponse {
    /// Parses the entries of the requested type, skipping malformed lines.
    pub(crate) fn hosts(&self, record_type: RecordType) -> Vec<Host> {
        let lines = match record_type {
            RecordType::A | RecordType::Aaaa => &self.config.dns.hosts,
            RecordType::Cname => &self.config.dns.cname_records,
        };

        lines
            .iter()
            .filter_map(|line| {
                let host = match record_type {
                    RecordType::A | RecordType::Aaaa => Host::from_hosts_line(line),
                    RecordType::Cname => Host::from_cname_line(line),
                };
                if host.is_none() {
                    log::debug!("[{PROVIDER_NAME}] Skipping malformed {record_type} entry '{line}'");
                }
                host
            })
            .collect()
    }
}

impl PiholeClient {
    /// Creates or deletes one entry per target of the endpoint.
    async fn manage_record(&self, method: Method, endpoint: &Endpoint) -> Result<()> {
        let record_type = RecordType::parse(&endpoint.record_type)?;
        let name = normalize_domain_name(&endpoint.dns_name);

        if !self.domain_filter.matches(name) {
            log::debug!("[{PROVIDER_NAME}] Skipping record {name} that does not match domain filter");
            return Ok(());
        }

        if endpoint.targets.is_empty() {
            return Err(ProviderError::InvalidParameter {
                provider: PROVIDER_NAME.to_string(),
                param: "targets".to_string(),
                detail: format!("endpoint {name} ({record_type}) has no targets"),
            });
        }

        for target in &endpoint.targets {
            if self.dry_run {
                log::info!("[{PROVIDER_NAME}] DRY RUN: {method} {name} IN {record_type} -> {target}");
                continue;
            }

            log::info!("[{PROVIDER_NAME}] {method} {name} IN {record_type} -> {target}");
            let ttl = endpoint.record_ttl;
            let path = entry_path(record_type, name, target, ttl);
            let ctx = ErrorContext::for_record(entry(record_type, name, target, ttl));
            if method == Method::PUT {
                self.put(&path, ctx).await?;
            } else {
                self.delete(&path, ctx).await?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl PiholeApi for PiholeClient {
    async fn list_records(&self, record_type: RecordType) -> Result<Vec<Endpoint>> {
        let response: RecordsResponse = self
            .get(collection_path(record_type), ErrorContext::default())
            .await?;

        let endpoints = response
            .hosts(record_type)
            .into_iter()
            .filter(|host| {
                if !self.domain_filter.matches(&host.name) {
                    log::debug!(
                        "[{PROVIDER_NAME}] Skipping record {} that does not match domain filter",
                        host.name
                    );
                    return false;
                }
                target_matches_type(record_type, &host.target)
            })
            .map(|host| {
                let mut endpoint =
                    Endpoint::new(host.name, record_type.as_str(), vec![host.target]);
                endpoint.record_ttl = host.ttl;
                endpoint
            })
            .collect();

        Ok(endpoints)
    }

    async fn create_record(&self, endpoint: &Endpoint) -> Result<()> {
        self.manage_record(Method::PUT, endpoint).await
    }

    async fn delete_record(&self, endpoint: &Endpoint) -> Result<()> {
        self.manage_record(Method::DELETE, endpoint).await
    }
}
