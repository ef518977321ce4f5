// Viewport-bounded parcel loading from ArcGIS FeatureServer layers

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod presentation;
pub mod state;

pub use application::gate::{GateDecision, ViewportGate};
pub use application::query::{fetch_features, load_viewport, ViewportLoad};
pub use domain::cancel::{CancelHandle, CancelSignal};
pub use domain::error::ParcelError;
pub use domain::model::{BoundingBox, Feature, FeatureCollection, QuerySpec, Viewport};
pub use state::AppState;
