//! Request handlers.
//!
//! Decoding and scanning are CPU-bound, so both run on the blocking pool.

use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use scan_core::filter::filter as run_filter;
use scan_core::{CatalogSummary, FilterRequest, FilterResponse};
use tokio::task;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/load`: stack names and the first stack's metadata.
pub async fn load(State(state): State<AppState>) -> Result<Json<CatalogSummary>, ApiError> {
    let catalog = Arc::clone(&state.catalog);
    let summary = task::spawn_blocking(move || catalog.summary()).await??;
    debug!(stacks = summary.files.len(), "catalog loaded");
    Ok(Json(summary))
}

/// `POST /api`: threshold filter over one stack.
pub async fn filter(
    State(state): State<AppState>,
    body: Result<Json<FilterRequest>, JsonRejection>,
) -> Result<Json<FilterResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let query = request.into_query()?;
    let path = state.catalog.path_of(&query.image)?;
    let cache = Arc::clone(&state.cache);

    let started = Instant::now();
    let (query, result) = task::spawn_blocking(move || {
        let stack = cache.get_or_decode(&path, &query.image)?;
        let result = run_filter(&stack.info, &stack.buffer, query.band());
        Ok::<_, ApiError>((query, result))
    })
    .await??;

    let stats = state.cache.stats();
    debug!(
        entries = stats.entries,
        bytes = stats.bytes,
        hit_rate = stats.hit_rate(),
        "decode cache"
    );
    info!(
        image = %query.image,
        center = query.center,
        distance = query.distance,
        matched = result.offsets.len(),
        truncated = result.truncated,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "filter"
    );
    Ok(Json(FilterResponse { message: result }))
}
