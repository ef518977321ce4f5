use crate::domain::error::ParcelError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Ordered `key=value` pairs for one remote query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &'static str, value: impl Into<String>) {
        self.pairs.push((key, value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }
}

/// Transport for FeatureServer queries.
///
/// Implementations issue one GET of `url` with `params` and return the decoded
/// JSON body. Non-success statuses and bodies that are not JSON must surface as
/// [`ParcelError::RemoteQuery`]; connection failures as [`ParcelError::Network`].
#[async_trait]
pub trait QueryTransport: Send + Sync {
    async fn get_json(
        &self,
        url: &str,
        params: &QueryParams,
    ) -> Result<serde_json::Value, ParcelError>;
}

/// Time source for cache expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
