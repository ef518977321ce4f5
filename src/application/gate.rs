use crate::domain::model::BoundingBox;
use crate::infrastructure::config::{Config, DEFAULT_MAX_AREA_DEG2};
use serde::Serialize;

/// Outcome of the pre-fetch viewport check. Only `Proceed` leads to a fetch;
/// the other two are advice for the user, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GateDecision {
    Proceed,
    TooFarZoomedOut,
    ViewportTooLarge,
}

impl GateDecision {
    pub fn is_proceed(self) -> bool {
        self == GateDecision::Proceed
    }

    pub fn advice(self) -> Option<&'static str> {
        match self {
            GateDecision::Proceed => None,
            GateDecision::TooFarZoomedOut => Some("Zoom in to load parcels for the current view."),
            GateDecision::ViewportTooLarge => {
                Some("Your view is very large; zoom in more to avoid hitting record limits.")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGate {
    pub min_zoom: u8,
    pub max_area_deg2: f64,
}

impl ViewportGate {
    pub fn new(min_zoom: u8) -> Self {
        Self {
            min_zoom,
            max_area_deg2: DEFAULT_MAX_AREA_DEG2,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            min_zoom: config.min_zoom,
            max_area_deg2: config.max_area_deg2,
        }
    }

    pub fn should_fetch(&self, current_zoom: u8, bbox: Option<&BoundingBox>) -> GateDecision {
        should_fetch(current_zoom, self.min_zoom, bbox, self.max_area_deg2)
    }
}

/// Zoom is checked first; the area limit only applies when a box is known.
pub fn should_fetch(
    current_zoom: u8,
    min_zoom: u8,
    bbox: Option<&BoundingBox>,
    max_area_deg2: f64,
) -> GateDecision {
    if current_zoom < min_zoom {
        return GateDecision::TooFarZoomedOut;
    }
    match bbox {
        Some(b) if b.approx_area_deg2() > max_area_deg2 => GateDecision::ViewportTooLarge,
        _ => GateDecision::Proceed,
    }
}
