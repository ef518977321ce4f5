//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parcelmap::domain::error::ParcelError;
use parcelmap::domain::traits::{QueryParams, QueryTransport};
use serde_json::json;
use std::sync::Mutex;

pub const LAYER_URL: &str = "https://example.test/arcgis/rest/services/Parcels/FeatureServer/0";

/// In-memory FeatureServer that records every request it receives.
pub struct FakeLayer {
    /// Value returned by count requests; `None` omits the field.
    pub count: Option<i64>,
    /// Features served by page requests, in remote order.
    pub rows: usize,
    /// Extra rows appended to every page beyond what was asked for.
    pub overshoot: usize,
    /// Zero-based page index that answers with HTTP 500.
    pub fail_page: Option<usize>,
    requests: Mutex<Vec<(String, QueryParams)>>,
}

impl FakeLayer {
    pub fn new(count: i64) -> Self {
        Self {
            count: Some(count),
            rows: usize::try_from(count).unwrap_or(0),
            overshoot: 0,
            fail_page: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(String, QueryParams)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count_requests(&self) -> Vec<QueryParams> {
        self.requests()
            .into_iter()
            .map(|(_, p)| p)
            .filter(|p| p.get("returnCountOnly") == Some("true"))
            .collect()
    }

    pub fn page_requests(&self) -> Vec<QueryParams> {
        self.requests()
            .into_iter()
            .map(|(_, p)| p)
            .filter(|p| !p.contains("returnCountOnly"))
            .collect()
    }
}

pub fn feature(i: usize) -> serde_json::Value {
    json!({
        "type": "Feature",
        "id": i,
        "geometry": { "type": "Point", "coordinates": [-73.94, 42.81] },
        "properties": {
            "PRINT_KEY": format!("{}.00-1-1", i),
            "PARCEL_ADDR": format!("{} State St", i),
        }
    })
}

pub fn print_key(f: &parcelmap::Feature) -> String {
    f.property_text("PRINT_KEY").unwrap()
}

#[async_trait]
impl QueryTransport for FakeLayer {
    async fn get_json(
        &self,
        url: &str,
        params: &QueryParams,
    ) -> Result<serde_json::Value, ParcelError> {
        let page_index = self.page_requests().len();
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), params.clone()));

        if params.get("returnCountOnly") == Some("true") {
            return Ok(match self.count {
                Some(n) => json!({ "count": n }),
                None => json!({}),
            });
        }

        if self.fail_page == Some(page_index) {
            return Err(ParcelError::remote(500, "Internal Server Error"));
        }

        let offset: usize = params.get("resultOffset").unwrap().parse().unwrap();
        let record_count: usize = params.get("resultRecordCount").unwrap().parse().unwrap();
        let end = (offset + record_count + self.overshoot).min(self.rows);
        let features: Vec<_> = (offset.min(end)..end).map(feature).collect();
        Ok(json!({ "type": "FeatureCollection", "features": features }))
    }
}

/// Wraps a [`FakeLayer`] and raises a cancel handle once the first page arrives.
pub struct CancelAfterFirstPage {
    pub layer: FakeLayer,
    handle: parcelmap::CancelHandle,
}

impl CancelAfterFirstPage {
    pub fn new(layer: FakeLayer) -> (Self, parcelmap::CancelSignal) {
        let (handle, cancel) = parcelmap::CancelSignal::pair();
        (Self { layer, handle }, cancel)
    }
}

#[async_trait]
impl QueryTransport for CancelAfterFirstPage {
    async fn get_json(
        &self,
        url: &str,
        params: &QueryParams,
    ) -> Result<serde_json::Value, ParcelError> {
        let body = self.layer.get_json(url, params).await?;
        if !params.contains("returnCountOnly") {
            self.handle.cancel();
        }
        Ok(body)
    }
}
