//! Pi-hole Provider trait 实现：把 external-dns 的变更集落到 Pi-hole 条目上

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::PROVIDER_NAME;
use crate::config::PiholeConfig;
use crate::domain_filter::DomainFilter;
use crate::error::{ProviderError, Result};
use crate::traits::{PiholeApi, Provider};
use crate::types::{Changes, Endpoint, RecordType};

use super::PiholeClient;

/// external-dns provider backed by a Pi-hole server.
pub struct PiholeProvider {
    api: Arc<dyn PiholeApi>,
    domain_filter: DomainFilter,
}

impl std::fmt::Debug for PiholeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiholeProvider")
            .field("domain_filter", &self.domain_filter.to_string())
            .finish_non_exhaustive()
    }
}

impl PiholeProvider {
    /// Connects to the configured Pi-hole and wraps the client.
    pub async fn new(config: &PiholeConfig) -> Result<Self> {
        let client = PiholeClient::connect(config).await?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Wraps an already connected client, e.g. one the caller keeps to call
    /// [`PiholeClient::logout`] on shutdown.
    pub fn with_client(client: Arc<PiholeClient>) -> Self {
        let domain_filter = client.domain_filter().clone();
        Self {
            api: client,
            domain_filter,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_api(api: Arc<dyn PiholeApi>, domain_filter: DomainFilter) -> Self {
        Self { api, domain_filter }
    }

    async fn delete(&self, endpoint: &Endpoint) -> Result<()> {
        self.api.delete_record(endpoint).await.inspect_err(|e| {
            log::log!(
                failure_level(e),
                "[{PROVIDER_NAME}] error deleting record {}: {e}",
                endpoint.dns_name
            );
        })
    }

    async fn create(&self, endpoint: &Endpoint) -> Result<()> {
        self.api.create_record(endpoint).await.inspect_err(|e| {
            log::log!(
                failure_level(e),
                "[{PROVIDER_NAME}] error creating record {}: {e}",
                endpoint.dns_name
            );
        })
    }
}

/// Expected errors (conflicts, missing entries, bad input) are warnings; the rest are errors.
fn failure_level(err: &ProviderError) -> log::Level {
    if err.is_expected() {
        log::Level::Warn
    } else {
        log::Level::Error
    }
}

/// Calls needed to move `update_old` to `update_new`.
#[derive(Debug, Default, PartialEq, Eq)]
struct UpdatePlan {
    /// Old targets that are no longer wanted.
    deletes: Vec<Endpoint>,
    /// New targets not present before, in `update_new` order.
    creates: Vec<Endpoint>,
}

impl UpdatePlan {
    /// Pairs old and new endpoints by (name, record type) and diffs their targets.
    ///
    /// A name/type listed twice in `update_new` keeps its last occurrence. Old
    /// endpoints without a new counterpart are deleted whole; new endpoints without
    /// an old counterpart are created whole.
    fn new(update_old: &[Endpoint], update_new: &[Endpoint]) -> Self {
        let key = |ep: &Endpoint| (ep.dns_name.clone(), ep.record_type.clone());

        let mut index: HashMap<(String, String), usize> = HashMap::new();
        for (i, ep) in update_new.iter().enumerate() {
            index.insert(key(ep), i);
        }

        // targets already present on the server, per update_new slot
        let mut existing: Vec<Vec<&String>> = vec![Vec::new(); update_new.len()];
        let mut deletes = Vec::new();

        for old in update_old {
            let Some(&i) = index.get(&key(old)) else {
                deletes.push(old.clone());
                continue;
            };
            let new = &update_new[i];

            let stale: Vec<String> = old
                .targets
                .iter()
                .filter(|t| !new.targets.contains(t))
                .cloned()
                .collect();
            if !stale.is_empty() {
                deletes.push(old.with_targets(stale));
            }
            existing[i].extend(old.targets.iter());
        }

        let creates = update_new
            .iter()
            .enumerate()
            .filter(|(i, ep)| index.get(&key(ep)) == Some(i))
            .filter_map(|(i, ep)| {
                let fresh: Vec<String> = ep
                    .targets
                    .iter()
                    .filter(|t| !existing[i].contains(t))
                    .cloned()
                    .collect();
                (!fresh.is_empty()).then(|| ep.with_targets(fresh))
            })
            .collect();

        Self { deletes, creates }
    }
}

#[async_trait]
impl Provider for PiholeProvider {
    fn id(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn domain_filter(&self) -> &DomainFilter {
        &self.domain_filter
    }

    async fn records(&self) -> Result<Vec<Endpoint>> {
        let mut endpoints = Vec::new();
        for record_type in RecordType::ALL {
            endpoints.extend(self.api.list_records(record_type).await?);
        }
        Ok(endpoints)
    }

    async fn apply_changes(&self, changes: &Changes) -> Result<()> {
        if changes.is_empty() {
            log::debug!("[{PROVIDER_NAME}] No changes to apply");
            return Ok(());
        }

        for endpoint in &changes.delete {
            self.delete(endpoint).await?;
        }

        let plan = UpdatePlan::new(&changes.update_old, &changes.update_new);
        for endpoint in &plan.deletes {
            self.delete(endpoint).await?;
        }

        for endpoint in &changes.create {
            self.create(endpoint).await?;
        }
        for endpoint in &plan.creates {
            self.create(endpoint).await?;
        }

        Ok(())
    }

    async fn adjust_endpoints(&self, endpoints: Vec<Endpoint>) -> Result<Vec<Endpoint>> {
        Ok(endpoints
            .into_iter()
            .filter(|ep| {
                let supported = RecordType::parse(&ep.record_type).is_ok();
                if !supported {
                    log::warn!(
                        "[{PROVIDER_NAME}] Dropping {} record {}: not supported by Pi-hole",
                        ep.record_type,
                        ep.dns_name
                    );
                }
                supported
            })
            .collect())
    }
}
