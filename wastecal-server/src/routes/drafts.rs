//! Draft status, commit and revert endpoints (edit mode only)

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use wastecal_core::{StoreError, StoreStatus};

use crate::routes::{AppError, StatusResponse, blocking};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/calendar/status", get(status))
        .route("/api/calendar/commit", post(commit))
        .route("/api/calendar/revert", post(revert))
}

#[derive(Serialize)]
pub struct DraftStatus {
    pub has_changes: bool,
    #[serde(flatten)]
    pub store: StoreStatus,
}

/// GET /api/calendar/status - Whether there are unsaved changes
async fn status(State(state): State<AppState>) -> Json<DraftStatus> {
    let store = state.store().status();
    Json(DraftStatus {
        has_changes: !store.pending_years.is_empty(),
        store,
    })
}

/// Selects one year; every pending year when absent
#[derive(Deserialize, Default)]
pub struct YearSelection {
    pub year: Option<i32>,
}

impl YearSelection {
    /// The year from a `{"year": Y}` body, falling back to `?year=Y`.
    fn resolve(query: YearSelection, body: &[u8]) -> Result<Option<i32>, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(query.year);
        }

        let selection: YearSelection = serde_json::from_slice(body)
            .map_err(|e| StoreError::InvalidInput(format!("invalid request body: {e}")))?;
        match (selection.year, query.year) {
            (Some(a), Some(b)) if a != b => Err(StoreError::InvalidInput(format!(
                "conflicting years {a} and {b}"
            ))
            .into()),
            (body_year, query_year) => Ok(body_year.or(query_year)),
        }
    }
}

/// POST /api/calendar/commit - Promote drafts to committed files
async fn commit(
    State(state): State<AppState>,
    Query(query): Query<YearSelection>,
    body: Bytes,
) -> Result<Json<StatusResponse>, AppError> {
    match YearSelection::resolve(query, &body)? {
        Some(year) => blocking(&state, move |store| store.commit(year)).await?,
        None => {
            blocking(&state, |store| store.commit_all()).await?;
        }
    }
    Ok(StatusResponse::ok())
}

/// POST /api/calendar/revert - Discard drafts
async fn revert(
    State(state): State<AppState>,
    Query(query): Query<YearSelection>,
    body: Bytes,
) -> Result<Json<StatusResponse>, AppError> {
    match YearSelection::resolve(query, &body)? {
        Some(year) => blocking(&state, move |store| store.revert(year)).await?,
        None => {
            blocking(&state, |store| store.revert_all()).await?;
        }
    }
    Ok(StatusResponse::ok())
}
