//! CLI command implementations.

pub mod products;
pub mod seed;

use lustre_storefront::backend::RestBackend;
use lustre_storefront::config::RestBackendConfig;

/// Connect to the remote service configured in the environment.
fn connect() -> Result<RestBackend, Box<dyn std::error::Error>> {
    let config = RestBackendConfig::from_env()?;
    tracing::info!(url = %config.base_url, "Using remote service");
    Ok(RestBackend::new(&config))
}
