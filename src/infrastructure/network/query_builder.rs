// FeatureServer `/query` parameter construction
use crate::domain::error::ParcelError;
use crate::domain::model::{BoundingBox, WGS84_WKID};
use crate::domain::traits::QueryParams;

const GEOMETRY_ENVELOPE: &str = "esriGeometryEnvelope";
const SPATIAL_REL_INTERSECTS: &str = "esriSpatialRelIntersects";

/// `<service_url>/query`, tolerating a trailing slash on the layer URL.
pub fn query_url(service_url: &str) -> String {
    format!("{}/query", service_url.trim_end_matches('/'))
}

/// Parameters for one GeoJSON page of features.
pub fn page_params(
    filter: &str,
    out_fields: &str,
    bbox: Option<&BoundingBox>,
    record_count: usize,
    offset: usize,
) -> Result<QueryParams, ParcelError> {
    let mut params = QueryParams::new();
    params.push("f", "geojson");
    params.push("where", filter);
    params.push("outFields", out_fields);
    params.push("returnGeometry", "true");
    params.push("outSR", WGS84_WKID.to_string());
    params.push("resultRecordCount", record_count.to_string());
    params.push("resultOffset", offset.to_string());
    push_spatial(&mut params, bbox)?;
    Ok(params)
}

/// Parameters for a count-only request with the same filter and envelope.
pub fn count_params(filter: &str, bbox: Option<&BoundingBox>) -> Result<QueryParams, ParcelError> {
    let mut params = QueryParams::new();
    params.push("f", "json");
    params.push("where", filter);
    params.push("returnCountOnly", "true");
    push_spatial(&mut params, bbox)?;
    Ok(params)
}

fn push_spatial(params: &mut QueryParams, bbox: Option<&BoundingBox>) -> Result<(), ParcelError> {
    if let Some(bbox) = bbox {
        let envelope = bbox.canonical().to_envelope();
        params.push("geometry", serde_json::to_string(&envelope)?);
        params.push("geometryType", GEOMETRY_ENVELOPE);
        params.push("inSR", WGS84_WKID.to_string());
        params.push("spatialRel", SPATIAL_REL_INTERSECTS);
    }
    Ok(())
}
