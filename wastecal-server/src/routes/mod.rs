pub mod calendar;
pub mod drafts;
pub mod events;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use wastecal_core::{Mode, Store, StoreError, StoreResult};

use crate::state::AppState;

/// All routes for the given mode. Editing routes only exist in edit mode.
pub fn router(mode: Mode) -> Router<AppState> {
    let router = Router::new().merge(calendar::router());

    match mode {
        Mode::Edit => router.merge(events::router()).merge(drafts::router()),
        Mode::Serve => router,
    }
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Years a batch commit/revert finished before failing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<Vec<i32>>,
}

/// Convert errors to HTTP responses
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<StoreError>() {
            Some(StoreError::NoDraft(_)) => StatusCode::CONFLICT,
            Some(StoreError::YearNotFound(_)) => StatusCode::NOT_FOUND,
            Some(StoreError::ReadOnly) => StatusCode::FORBIDDEN,
            Some(StoreError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let completed = match self.0.downcast_ref::<StoreError>() {
            Some(StoreError::Batch { completed, .. }) => Some(completed.clone()),
            _ => None,
        };
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
            completed,
        });
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Run a store call on the blocking pool.
///
/// Writes fsync and hold the store's write lock, which must not stall the
/// async workers.
pub async fn blocking<T, F>(state: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&Store) -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    let result = tokio::task::spawn_blocking(move || f(state.store())).await?;
    Ok(result?)
}

/// Body of edit and commit responses
#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub fn ok() -> Json<Self> {
        Json(StatusResponse { status: "ok" })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::ServiceExt;
    use wastecal_core::{DataLayout, Mode, Store, YearData, codec};

    use crate::state::AppState;

    pub fn app_with(dir: &TempDir, mode: Mode, years: &[YearData]) -> (Router, AppState) {
        let layout = DataLayout::new(dir.path().join("data"), dir.path().join("backup"));
        std::fs::create_dir_all(layout.data_dir()).unwrap();
        for year in years {
            std::fs::write(layout.committed_path(year.year), codec::encode(year).unwrap())
                .unwrap();
        }
        let state = AppState::from_store(Store::open(layout, mode).unwrap());
        let app = super::router(mode).with_state(state.clone());
        (app, state)
    }

    pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}
