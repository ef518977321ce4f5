// HTTP client construction
use crate::domain::error::ParcelError;
use crate::infrastructure::config::Config;
use reqwest::Client;
use std::time::Duration;

/// Create the shared HTTP client from configuration
pub fn create_client(config: &Config) -> Result<Client, ParcelError> {
    let mut builder = Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(30))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(config.user_agent.as_str());

    if let Some(proxy) = config.http_proxy.as_deref().filter(|p| !p.is_empty()) {
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }

    Ok(builder.build()?)
}
