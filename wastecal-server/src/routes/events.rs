//! Event editing endpoints (edit mode only)

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use wastecal_core::{EditOutcome, Event, WasteType, parse_date};

use crate::routes::{AppError, blocking};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/events/add", post(add_event))
        .route("/api/events/delete", post(delete_event))
        .route("/api/events/move", post(move_event))
}

#[derive(Serialize)]
pub struct EditResponse {
    pub status: &'static str,
}

impl From<EditOutcome> for EditResponse {
    fn from(outcome: EditOutcome) -> Self {
        let status = match outcome {
            EditOutcome::Applied => "ok",
            EditOutcome::AlreadyExists => "exists",
            EditOutcome::NotFound => "not_found",
        };
        EditResponse { status }
    }
}

#[derive(Deserialize)]
pub struct AddEventRequest {
    pub district: String,
    pub date: String,
    #[serde(rename = "type")]
    pub waste_type: String,
    pub description: Option<String>,
}

/// POST /api/events/add
async fn add_event(
    State(state): State<AppState>,
    Json(req): Json<AddEventRequest>,
) -> Result<Json<EditResponse>, AppError> {
    let date = parse_date(&req.date)?;
    let waste_type: WasteType = req.waste_type.parse()?;
    let event = match req.description {
        Some(description) => Event::new(date, waste_type, description),
        None => Event::labelled(date, waste_type),
    };

    let outcome = blocking(&state, move |store| store.add_event(&req.district, event)).await?;
    Ok(Json(outcome.into()))
}

#[derive(Deserialize)]
pub struct DeleteEventRequest {
    pub district: String,
    pub date: String,
    #[serde(rename = "type")]
    pub waste_type: String,
}

/// POST /api/events/delete
async fn delete_event(
    State(state): State<AppState>,
    Json(req): Json<DeleteEventRequest>,
) -> Result<Json<EditResponse>, AppError> {
    let date = parse_date(&req.date)?;
    let waste_type: WasteType = req.waste_type.parse()?;

    let outcome = blocking(&state, move |store| {
        store.delete_event(&req.district, date, waste_type)
    })
    .await?;
    Ok(Json(outcome.into()))
}

#[derive(Deserialize)]
pub struct MoveEventRequest {
    pub district: String,
    pub old_date: String,
    pub new_date: String,
    #[serde(rename = "type")]
    pub waste_type: String,
}

/// POST /api/events/move
async fn move_event(
    State(state): State<AppState>,
    Json(req): Json<MoveEventRequest>,
) -> Result<Json<EditResponse>, AppError> {
    let old_date = parse_date(&req.old_date)?;
    let new_date = parse_date(&req.new_date)?;
    let waste_type: WasteType = req.waste_type.parse()?;

    let outcome = blocking(&state, move |store| {
        store.move_event(&req.district, old_date, new_date, waste_type)
    })
    .await?;
    Ok(Json(outcome.into()))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use tempfile::TempDir;
    use wastecal_core::{Mode, YearData};

    use crate::routes::test_support::{app_with, send};

    #[tokio::test]
    async fn test_add_twice_reports_exists() {
        let dir = TempDir::new().unwrap();
        let (app, state) = app_with(&dir, Mode::Edit, &[YearData::new(2025)]);
        let body = json!({"district": "Silbach", "date": "2025-04-01", "type": "papiertonne"});

        let (status, first) = send(&app, "POST", "/api/events/add", Some(body.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["status"], "ok");

        let (_, second) = send(&app, "POST", "/api/events/add", Some(body)).await;
        assert_eq!(second["status"], "exists");

        let events = state.store().district_events(2025, "Silbach").unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].description, "Papiertonne");
        assert!(state.store().has_draft(2025));
    }

    #[tokio::test]
    async fn test_invalid_input_is_bad_request() {
        let dir = TempDir::new().unwrap();
        let (app, _) = app_with(&dir, Mode::Edit, &[YearData::new(2025)]);

        let (status, _) = send(
            &app,
            "POST",
            "/api/events/add",
            Some(json!({"district": "Silbach", "date": "01.04.2025", "type": "papiertonne"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            "POST",
            "/api/events/add",
            Some(json!({"district": "Silbach", "date": "2025-04-01", "type": "glas"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_move_and_delete() {
        let dir = TempDir::new().unwrap();
        let (app, state) = app_with(&dir, Mode::Edit, &[YearData::new(2025)]);
        send(
            &app,
            "POST",
            "/api/events/add",
            Some(json!({"district": "Silbach", "date": "2025-12-31", "type": "restmuell"})),
        )
        .await;

        let (_, moved) = send(
            &app,
            "POST",
            "/api/events/move",
            Some(json!({
                "district": "Silbach",
                "old_date": "2025-12-31",
                "new_date": "2026-01-02",
                "type": "restmuell"
            })),
        )
        .await;
        assert_eq!(moved["status"], "ok");
        assert_eq!(state.store().pending_years(), vec![2025, 2026]);

        let (_, deleted) = send(
            &app,
            "POST",
            "/api/events/delete",
            Some(json!({"district": "Silbach", "date": "2026-01-02", "type": "restmuell"})),
        )
        .await;
        assert_eq!(deleted["status"], "ok");

        let (status, _) = send(
            &app,
            "POST",
            "/api/events/delete",
            Some(json!({"district": "Silbach", "date": "1990-01-02", "type": "restmuell"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
