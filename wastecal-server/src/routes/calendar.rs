//! Read-only calendar endpoints

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use std::collections::BTreeMap;

use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use wastecal_core::{District, Event, WasteType, YearData};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/config", get(get_config))
        .route("/api/years", get(list_years))
        .route("/api/calendar/{year}", get(get_year))
        .route("/api/calendar/{year}/{district}", get(get_district))
        .route("/api/subscribe/{district}", get(subscribe))
}

#[derive(Serialize)]
pub struct ConfigResponse {
    /// Waste type key to display name
    pub waste_types: BTreeMap<&'static str, &'static str>,
    pub current_year: i32,
}

/// GET /api/config - Valid waste types and the default year
async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        waste_types: WasteType::ALL.iter().map(|t| (t.key(), t.label())).collect(),
        current_year: state.store().current_year(),
    })
}

#[derive(Serialize)]
pub struct YearsResponse {
    pub years: Vec<i32>,
    pub current_year: i32,
}

/// GET /api/years - Loaded years and the default one to show
async fn list_years(State(state): State<AppState>) -> Json<YearsResponse> {
    let store = state.store();
    Json(YearsResponse {
        years: store.available_years(),
        current_year: store.current_year(),
    })
}

/// GET /api/calendar/:year - Every district of one year
async fn get_year(
    State(state): State<AppState>,
    Path(year): Path<i32>,
) -> Result<Json<YearData>, AppError> {
    Ok(Json(state.store().year(year)?))
}

/// GET /api/calendar/:year/:district - One district's events
async fn get_district(
    State(state): State<AppState>,
    Path((year, district)): Path<(i32, String)>,
) -> Result<Json<District>, AppError> {
    let events = state.store().district_events(year, &district)?;
    Ok(Json(District { events }))
}

#[derive(Deserialize)]
pub struct SubscribeQuery {
    /// Comma-separated waste type keys; all types if absent
    pub waste_types: Option<String>,
}

/// GET /api/subscribe/:district - Events from last year onwards, for feeds
async fn subscribe(
    State(state): State<AppState>,
    Path(district): Path<String>,
    Query(query): Query<SubscribeQuery>,
) -> Result<Json<Vec<Event>>, AppError> {
    let types = match query.waste_types.as_deref() {
        Some(list) if !list.is_empty() => Some(
            list.split(',')
                .map(|s| s.trim().parse::<WasteType>())
                .collect::<Result<Vec<_>, _>>()?,
        ),
        _ => None,
    };
    let min_year = Local::now().year() - 1;

    // Snapshot first; filtering happens without the store lock
    let events = state
        .store()
        .all_events(&district)
        .into_iter()
        .filter(|e| e.year() >= min_year)
        .filter(|e| types.as_ref().is_none_or(|t| t.contains(&e.waste_type)))
        .collect();

    Ok(Json(events))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::NaiveDate;
    use tempfile::TempDir;
    use wastecal_core::{Event, Mode, WasteType, YearData};

    use crate::routes::test_support::{app_with, send};

    fn year(y: i32) -> YearData {
        let mut data = YearData::new(y);
        let district = data.district_mut("Winterberg");
        district.add(Event::labelled(
            NaiveDate::from_ymd_opt(y, 1, 8).unwrap(),
            WasteType::Restmuell,
        ));
        district.add(Event::labelled(
            NaiveDate::from_ymd_opt(y, 1, 9).unwrap(),
            WasteType::Biotonne,
        ));
        data
    }

    #[tokio::test]
    async fn test_years_and_year_lookup() {
        let dir = TempDir::new().unwrap();
        let (app, _) = app_with(&dir, Mode::Serve, &[year(2025), year(2026)]);

        let (status, body) = send(&app, "GET", "/api/years", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["years"], serde_json::json!([2025, 2026]));

        let (status, body) = send(&app, "GET", "/api/calendar/2025", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["year"], 2025);

        let (status, _) = send(&app, "GET", "/api/calendar/1999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_config_lists_waste_types() {
        let dir = TempDir::new().unwrap();
        let (app, state) = app_with(&dir, Mode::Serve, &[year(2025)]);

        let (status, body) = send(&app, "GET", "/api/config", None).await;

        assert_eq!(status, StatusCode::OK);
        let types = body["waste_types"].as_object().unwrap();
        assert_eq!(types.len(), WasteType::ALL.len());
        assert_eq!(types["restmuell"], WasteType::Restmuell.label());
        assert_eq!(types["gelber_sack"], WasteType::GelberSack.label());
        assert_eq!(body["current_year"], state.store().current_year());
    }

    #[tokio::test]
    async fn test_district_events() {
        let dir = TempDir::new().unwrap();
        let (app, _) = app_with(&dir, Mode::Serve, &[year(2025)]);

        let (status, body) = send(&app, "GET", "/api/calendar/2025/Winterberg", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["events"].as_array().unwrap().len(), 2);
        assert_eq!(body["events"][0]["type"], "restmuell");

        let (_, body) = send(&app, "GET", "/api/calendar/2025/Elsewhere", None).await;
        assert_eq!(body["events"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_subscribe_filters_types() {
        let dir = TempDir::new().unwrap();
        let this_year = chrono::Datelike::year(&chrono::Local::now());
        let (app, _) = app_with(&dir, Mode::Serve, &[year(this_year - 3), year(this_year)]);

        let (status, body) = send(&app, "GET", "/api/subscribe/Winterberg?waste_types=biotonne", None).await;
        assert_eq!(status, StatusCode::OK);
        let events = body.as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["type"], "biotonne");

        let (status, _) = send(&app, "GET", "/api/subscribe/Winterberg?waste_types=glas", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_serve_mode_has_no_edit_routes() {
        let dir = TempDir::new().unwrap();
        let (app, _) = app_with(&dir, Mode::Serve, &[year(2025)]);

        let (status, _) = send(&app, "POST", "/api/calendar/commit", None).await;
        assert_ne!(status, StatusCode::OK);
        let (status, _) = send(
            &app,
            "POST",
            "/api/events/add",
            Some(serde_json::json!({"district": "Winterberg", "date": "2025-02-02", "type": "restmuell"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
