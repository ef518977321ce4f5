//! FeatureServer query parameter tests

use parcelmap::domain::model::{BoundingBox, QuerySpec};
use parcelmap::infrastructure::network::query_builder::{count_params, page_params, query_url};

#[test]
fn test_query_url() {
    assert_eq!(
        query_url("https://host/arcgis/rest/services/X/FeatureServer/0"),
        "https://host/arcgis/rest/services/X/FeatureServer/0/query"
    );
    assert_eq!(
        query_url("https://host/FeatureServer/0/"),
        "https://host/FeatureServer/0/query"
    );
}

#[test]
fn test_page_params_without_bbox() {
    let params = page_params("COUNTY_NAME = 'X'", "PARCEL_ADDR,SBL", None, 250, 1000).unwrap();
    assert_eq!(params.get("f"), Some("geojson"));
    assert_eq!(params.get("where"), Some("COUNTY_NAME = 'X'"));
    assert_eq!(params.get("outFields"), Some("PARCEL_ADDR,SBL"));
    assert_eq!(params.get("returnGeometry"), Some("true"));
    assert_eq!(params.get("outSR"), Some("4326"));
    assert_eq!(params.get("resultRecordCount"), Some("250"));
    assert_eq!(params.get("resultOffset"), Some("1000"));
    for key in ["geometry", "geometryType", "inSR", "spatialRel"] {
        assert!(!params.contains(key), "unexpected {key}");
    }
}

#[test]
fn test_page_params_with_bbox_uses_canonical_envelope() {
    let bbox = BoundingBox::new(-73.9, 95.0, -74.0, 42.8);
    let params = page_params("1=1", "*", Some(&bbox), 1000, 0).unwrap();

    assert_eq!(params.get("geometryType"), Some("esriGeometryEnvelope"));
    assert_eq!(params.get("inSR"), Some("4326"));
    assert_eq!(params.get("spatialRel"), Some("esriSpatialRelIntersects"));

    let env: serde_json::Value = serde_json::from_str(params.get("geometry").unwrap()).unwrap();
    assert_eq!(env["xmin"], -74.0);
    assert_eq!(env["xmax"], -73.9);
    assert_eq!(env["ymin"], 42.8);
    assert_eq!(env["ymax"], 90.0);
}

#[test]
fn test_count_params() {
    let bbox = BoundingBox::new(-74.0, 42.8, -73.9, 42.9);
    let params = count_params("1=1", Some(&bbox)).unwrap();
    assert_eq!(params.get("f"), Some("json"));
    assert_eq!(params.get("returnCountOnly"), Some("true"));
    assert_eq!(params.get("where"), Some("1=1"));
    assert!(params.contains("geometry"));
    assert!(!params.contains("outFields"));
    assert!(!params.contains("returnGeometry"));
    assert!(!params.contains("resultOffset"));
}

#[test]
fn test_out_fields_param() {
    let spec = QuerySpec::new("https://host/FeatureServer/0", "1=1");
    assert_eq!(spec.out_fields_param(), "*");

    let spec = spec.with_fields(["SBL", "PARCEL_ADDR", "PRINT_KEY"]);
    assert_eq!(spec.out_fields_param(), "PARCEL_ADDR,PRINT_KEY,SBL");
}
