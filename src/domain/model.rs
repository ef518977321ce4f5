use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Spatial reference used for every envelope and every returned geometry.
pub const WGS84_WKID: u32 = 4326;

/// Coordinates are rounded to this many decimals when forming cache keys.
pub const CACHE_KEY_DECIMALS: i32 = 5;

/// Geographic rectangle in degrees (longitude/latitude).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Swaps west/east and south/north where they are out of order.
    pub fn normalized(&self) -> Self {
        Self {
            west: self.west.min(self.east),
            south: self.south.min(self.north),
            east: self.west.max(self.east),
            north: self.south.max(self.north),
        }
    }

    /// Clips each coordinate to its valid range. Does not renormalize.
    pub fn clamp(&self) -> Self {
        Self {
            west: self.west.clamp(-180.0, 180.0),
            south: self.south.clamp(-90.0, 90.0),
            east: self.east.clamp(-180.0, 180.0),
            north: self.north.clamp(-90.0, 90.0),
        }
    }

    /// Normalize then clamp. Every query and cache key goes through this.
    pub fn canonical(&self) -> Self {
        self.normalized().clamp()
    }

    /// Coarse viewport size in squared degrees; not a geodesic area.
    pub fn approx_area_deg2(&self) -> f64 {
        let b = self.canonical();
        ((b.east - b.west) * (b.north - b.south)).max(0.0)
    }

    pub fn to_envelope(&self) -> Envelope {
        Envelope {
            xmin: self.west,
            ymin: self.south,
            xmax: self.east,
            ymax: self.north,
            spatial_reference: SpatialReference { wkid: WGS84_WKID },
        }
    }

    fn rounded_key(&self) -> [i64; 4] {
        let b = self.canonical();
        let scale = 10f64.powi(CACHE_KEY_DECIMALS);
        // Rounded degrees fit comfortably in i64 after scaling.
        let r = |v: f64| (v * scale).round() as i64;
        [r(b.west), r(b.south), r(b.east), r(b.north)]
    }
}

impl std::str::FromStr for BoundingBox {
    type Err = String;

    /// Parses `W,S,E,N`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|e| format!("invalid coordinate in '{}': {}", s, e))?;
        match parts.as_slice() {
            [w, so, e, n] if parts.iter().all(|v| v.is_finite()) => {
                Ok(BoundingBox::new(*w, *so, *e, *n))
            }
            [_, _, _, _] => Err(format!("non-finite coordinate in '{}'", s)),
            _ => Err(format!("expected W,S,E,N but got '{}'", s)),
        }
    }
}

/// Envelope geometry in the shape the FeatureServer `geometry` parameter expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
    #[serde(rename = "spatialReference")]
    pub spatial_reference: SpatialReference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialReference {
    pub wkid: u32,
}

/// One parcel record as returned by a GeoJSON feature query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub geometry: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

fn feature_type() -> String {
    "Feature".to_string()
}

fn null_as_empty<'de, D>(
    deserializer: D,
) -> Result<serde_json::Map<String, serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<serde_json::Map<String, serde_json::Value>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

impl Feature {
    /// Property rendered as display text; `None` for missing, null or empty values.
    pub fn property_text(&self, field: &str) -> Option<String> {
        match self.properties.get(field)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Bounded, ordered result of one fetch. Empty is a valid result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: "FeatureCollection".to_string(),
            features,
            fetched_at: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Resolved parameters for one fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub service_url: String,
    pub filter: String,
    pub out_fields: BTreeSet<String>,
    pub bbox: Option<BoundingBox>,
    pub max_features: usize,
    pub page_size: usize,
}

impl QuerySpec {
    pub fn new(service_url: impl Into<String>, filter: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            filter: filter.into(),
            out_fields: BTreeSet::new(),
            bbox: None,
            max_features: 2000,
            page_size: 1000,
        }
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.out_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_bbox(mut self, bbox: Option<BoundingBox>) -> Self {
        self.bbox = bbox;
        self
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Comma-joined field list, `*` when no fields are selected.
    pub fn out_fields_param(&self) -> String {
        if self.out_fields.is_empty() {
            "*".to_string()
        } else {
            self.out_fields
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(",")
        }
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            service_url: self.service_url.clone(),
            filter: self.filter.clone(),
            out_fields: self.out_fields.iter().cloned().collect(),
            bbox: self.bbox.as_ref().map(BoundingBox::rounded_key),
            max_features: self.max_features,
        }
    }
}

/// Canonical form of a [`QuerySpec`] used as the result cache key.
///
/// The filter is kept byte-exact. Fields are sorted. The bounding box is
/// normalized, clamped and rounded to [`CACHE_KEY_DECIMALS`] places so that
/// sub-precision panning noise maps onto the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub service_url: String,
    pub filter: String,
    pub out_fields: Vec<String>,
    pub bbox: Option<[i64; 4]>,
    pub max_features: usize,
}

/// Map state supplied by the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: u8,
    pub bbox: Option<BoundingBox>,
}
