use crate::domain::error::ParcelError;
use crate::domain::traits::{QueryParams, QueryTransport};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// `QueryTransport` over a shared reqwest client.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QueryTransport for HttpTransport {
    async fn get_json(
        &self,
        url: &str,
        params: &QueryParams,
    ) -> Result<serde_json::Value, ParcelError> {
        debug!(url, "GET");
        let response = self.client.get(url).query(params.pairs()).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ParcelError::remote(status.as_u16(), &body));
        }

        let json: serde_json::Value =
            serde_json::from_str(&body).map_err(|_| ParcelError::remote(status.as_u16(), &body))?;

        // FeatureServer reports query errors as HTTP 200 with an `error` object
        if let Some(error) = json.get("error") {
            let code = error
                .get("code")
                .and_then(serde_json::Value::as_u64)
                .and_then(|c| u16::try_from(c).ok())
                .filter(|c| (100..600).contains(c))
                .unwrap_or_else(|| status.as_u16());
            let message = error
                .get("message")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown error");
            let details = error
                .get("details")
                .and_then(serde_json::Value::as_array)
                .map(|d| {
                    d.iter()
                        .filter_map(serde_json::Value::as_str)
                        .collect::<Vec<_>>()
                        .join("; ")
                })
                .filter(|d| !d.is_empty());
            let body = match details {
                Some(details) => format!("{} ({})", message, details),
                None => message.to_string(),
            };
            return Err(ParcelError::remote(code, &body));
        }

        Ok(json)
    }
}
