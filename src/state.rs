use crate::domain::error::ParcelError;
use crate::domain::traits::QueryTransport;
use crate::infrastructure::config::Config;
use crate::infrastructure::network::client::HttpTransport;
use crate::infrastructure::network::http::create_client;
use crate::infrastructure::storage::cache::ResultCache;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<ResultCache>,
    pub config: Arc<Config>,
    pub transport: Arc<dyn QueryTransport>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ParcelError> {
        let http_client = create_client(&config)?;

        Ok(Self::with_transport(
            config,
            Arc::new(HttpTransport::new(http_client)),
            Arc::new(ResultCache::new()),
        ))
    }

    pub fn with_transport(
        config: Config,
        transport: Arc<dyn QueryTransport>,
        cache: Arc<ResultCache>,
    ) -> Self {
        Self {
            cache,
            config: Arc::new(config),
            transport,
        }
    }
}
