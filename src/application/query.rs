use crate::application::fetch::PaginatedFetcher;
use crate::application::gate::{GateDecision, ViewportGate};
use crate::domain::cancel::CancelSignal;
use crate::domain::error::ParcelError;
use crate::domain::model::{FeatureCollection, QuerySpec, Viewport};
use crate::state::AppState;
use reqwest::Url;
use std::sync::Arc;

/// Result of a viewport-driven load.
#[derive(Debug, Clone)]
pub enum ViewportLoad {
    Skipped(GateDecision),
    Loaded(Arc<FeatureCollection>),
}

/// Gate, then fetch. Nothing touches the cache or the network unless the
/// gate says `Proceed`.
pub async fn load_viewport(
    state: &AppState,
    gate: &ViewportGate,
    view: &Viewport,
    spec: &QuerySpec,
    cancel: &CancelSignal,
) -> Result<ViewportLoad, ParcelError> {
    let decision = gate.should_fetch(view.zoom, view.bbox.as_ref());
    if !decision.is_proceed() {
        tracing::debug!(?decision, zoom = view.zoom, "viewport gate declined fetch");
        return Ok(ViewportLoad::Skipped(decision));
    }

    let collection = fetch_features(state, spec, cancel).await?;
    Ok(ViewportLoad::Loaded(collection))
}

/// Cached, paginated feature retrieval for one query.
pub async fn fetch_features(
    state: &AppState,
    spec: &QuerySpec,
    cancel: &CancelSignal,
) -> Result<Arc<FeatureCollection>, ParcelError> {
    validate(spec)?;

    // 1. Nothing requested
    if spec.max_features == 0 {
        return Ok(Arc::new(FeatureCollection::empty()));
    }

    // 2. Cache, then remote
    let fetcher = PaginatedFetcher::new(state.transport.as_ref());
    state
        .cache
        .get_or_fetch(spec.cache_key(), state.config.cache_ttl(), || {
            fetcher.fetch(spec, cancel)
        })
        .await
}

fn validate(spec: &QuerySpec) -> Result<(), ParcelError> {
    if spec.page_size == 0 {
        return Err(ParcelError::invalid("page size must be positive"));
    }

    let url = Url::parse(&spec.service_url).map_err(|e| {
        ParcelError::invalid(format!("malformed service URL '{}': {}", spec.service_url, e))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ParcelError::invalid(format!(
            "service URL must be http or https, got '{}'",
            url.scheme()
        )));
    }

    Ok(())
}
