// Count-then-paginate retrieval; pages run in sequence, any failure aborts the fetch

use crate::domain::cancel::CancelSignal;
use crate::domain::error::ParcelError;
use crate::domain::model::{BoundingBox, Feature, FeatureCollection, QuerySpec};
use crate::domain::traits::QueryTransport;
use crate::infrastructure::network::query_builder::{count_params, page_params, query_url};
use chrono::Utc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Count-only request used to plan pagination.
pub struct CountProbe<'a> {
    transport: &'a dyn QueryTransport,
}

impl<'a> CountProbe<'a> {
    pub fn new(transport: &'a dyn QueryTransport) -> Self {
        Self { transport }
    }

    /// Number of features matching `filter` inside `bbox`.
    ///
    /// A response without a `count` field counts as zero.
    pub async fn count(
        &self,
        service_url: &str,
        filter: &str,
        bbox: Option<&BoundingBox>,
    ) -> Result<u64, ParcelError> {
        let params = count_params(filter, bbox)?;
        let body = self
            .transport
            .get_json(&query_url(service_url), &params)
            .await?;
        parse_count(&body)
    }
}

fn parse_count(body: &serde_json::Value) -> Result<u64, ParcelError> {
    let Some(obj) = body.as_object() else {
        return Err(ParcelError::remote(200, &body.to_string()));
    };
    match obj.get("count") {
        None | Some(serde_json::Value::Null) => Ok(0),
        Some(value) => {
            if let Some(n) = value.as_u64() {
                Ok(n)
            } else if value.as_i64().is_some() {
                // negative counts mean nothing matched
                Ok(0)
            } else {
                match value.as_f64() {
                    // some servers send `12.0`; truncate like an int() cast
                    Some(f) if f.is_finite() && f >= 0.0 => Ok(f.trunc() as u64),
                    Some(f) if f.is_finite() => Ok(0),
                    _ => Err(ParcelError::remote(200, &body.to_string())),
                }
            }
        }
    }
}

/// Drives page requests up to the feature cap.
pub struct PaginatedFetcher<'a> {
    transport: &'a dyn QueryTransport,
}

impl<'a> PaginatedFetcher<'a> {
    pub fn new(transport: &'a dyn QueryTransport) -> Self {
        Self { transport }
    }

    /// Fetch at most `spec.max_features` features, `spec.page_size` per request.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a zero page size, `Cancelled` when `cancel` is
    /// raised between requests, and whatever the transport reports for a
    /// failed count or page request.
    pub async fn fetch(
        &self,
        spec: &QuerySpec,
        cancel: &CancelSignal,
    ) -> Result<FeatureCollection, ParcelError> {
        if spec.max_features == 0 {
            return Ok(FeatureCollection::empty());
        }
        if spec.page_size == 0 {
            return Err(ParcelError::invalid("page size must be positive"));
        }

        let started = Instant::now();
        let bbox = spec.bbox.as_ref();

        check_cancelled(cancel)?;
        let total = CountProbe::new(self.transport)
            .count(&spec.service_url, &spec.filter, bbox)
            .await?;
        if total == 0 {
            debug!(service_url = %spec.service_url, "no matching features");
            return Ok(FeatureCollection::empty());
        }

        let target = usize::try_from(total)
            .unwrap_or(usize::MAX)
            .min(spec.max_features);
        let pages = target.div_ceil(spec.page_size);
        let url = query_url(&spec.service_url);
        let out_fields = spec.out_fields_param();

        debug!(total, target, pages, "planned pagination");

        let mut features: Vec<Feature> = Vec::with_capacity(target);
        for page in 0..pages {
            check_cancelled(cancel)?;

            let offset = page * spec.page_size;
            let record_count = spec.page_size.min(target - offset);
            debug!(page, offset, record_count, "requesting page");

            let params = page_params(&spec.filter, &out_fields, bbox, record_count, offset)?;
            let body = self.transport.get_json(&url, &params).await?;
            let chunk = parse_features(body)?;

            if chunk.len() > record_count {
                warn!(
                    requested = record_count,
                    returned = chunk.len(),
                    "remote returned more features than requested"
                );
            }
            features.extend(chunk);

            if features.len() >= target {
                break;
            }
        }

        features.truncate(target);

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            features = features.len(),
            total,
            elapsed_ms,
            "fetched features"
        );

        let mut collection = FeatureCollection::new(features);
        collection.fetched_at = Some(Utc::now());
        Ok(collection)
    }
}

fn check_cancelled(cancel: &CancelSignal) -> Result<(), ParcelError> {
    if cancel.is_cancelled() {
        Err(ParcelError::Cancelled)
    } else {
        Ok(())
    }
}

fn parse_features(mut body: serde_json::Value) -> Result<Vec<Feature>, ParcelError> {
    let Some(raw) = body.get_mut("features").map(serde_json::Value::take) else {
        return Err(ParcelError::remote(
            200,
            &format!("response has no features array: {}", body),
        ));
    };
    serde_json::from_value::<Vec<Feature>>(raw)
        .map_err(|e| ParcelError::remote(200, &format!("malformed features: {}", e)))
}
