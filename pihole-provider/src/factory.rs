//! Provider factory functions.

use std::sync::Arc;

use crate::PROVIDER_NAME;
use crate::config::PiholeConfig;
use crate::error::{ProviderError, Result};
use crate::providers::PiholeProvider;
use crate::traits::Provider;

/// Connects to Pi-hole and returns a ready [`Provider`].
///
/// The returned provider is wrapped in `Arc<dyn Provider>` for easy sharing
/// across async tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use pihole_provider::{create_provider, PiholeConfig};
///
/// # async fn example() -> pihole_provider::Result<()> {
/// let provider = create_provider(PiholeConfig::builder("https://pihole.lan").build()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn create_provider(config: PiholeConfig) -> Result<Arc<dyn Provider>> {
    log::info!(
        "[{PROVIDER_NAME}] Creating provider for {} with {}",
        config.server,
        config.domain_filter
    );
    if config.dry_run {
        log::info!("[{PROVIDER_NAME}] Dry run enabled, no changes will be sent");
    }

    Ok(Arc::new(PiholeProvider::new(&config).await?))
}

/// Same as [`create_provider`], reading the configuration from the environment.
///
/// A malformed variable is reported as [`ProviderError::InvalidParameter`] naming it.
pub async fn create_provider_from_env() -> Result<Arc<dyn Provider>> {
    let config = PiholeConfig::from_env().map_err(|e| ProviderError::InvalidParameter {
        provider: PROVIDER_NAME.to_string(),
        param: e.var().to_string(),
        detail: e.to_string(),
    })?;
    create_provider(config).await
}
