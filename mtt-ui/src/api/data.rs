//! Document API: read, wholesale replace, backup download
//!
//! The store is schema-agnostic at this layer: saves accept any JSON value
//! and persist it verbatim (last writer wins). Stricter validation is the
//! client's responsibility.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::error;

use crate::AppState;

/// GET /api/data
///
/// Current training document as JSON. Requires authorization.
pub async fn get_data(State(state): State<AppState>) -> Result<Json<Value>, DataError> {
    let doc = state.store.load_raw().map_err(DataError::read)?;
    Ok(Json(doc))
}

/// POST/PUT /api/data
///
/// Replace the training document wholesale. No merge, no version check.
pub async fn save_data(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, DataError> {
    state.store.save_raw(&payload).map_err(DataError::write)?;
    Ok(Json(json!({
        "success": true,
        "message": "Data saved successfully",
    })))
}

/// GET /api/backup
///
/// Raw current file bytes with a timestamped download filename. Does not
/// mutate the stored document.
pub async fn download_backup(State(state): State<AppState>) -> Result<Response, DataError> {
    let backup = state.store.backup().map_err(DataError::read)?;
    let disposition = format!("attachment; filename=\"{}\"", backup.filename);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        backup.bytes,
    )
        .into_response())
}

/// Document API errors: the store being unavailable is the only failure
/// mode, surfaced as a server error with no partial data.
#[derive(Debug)]
pub enum DataError {
    ReadFailed(String),
    WriteFailed(String),
}

impl DataError {
    fn read(err: mtt_common::Error) -> Self {
        error!("Error reading data: {}", err);
        DataError::ReadFailed(err.to_string())
    }

    fn write(err: mtt_common::Error) -> Self {
        error!("Error saving data: {}", err);
        DataError::WriteFailed(err.to_string())
    }
}

impl IntoResponse for DataError {
    fn into_response(self) -> Response {
        let message = match self {
            DataError::ReadFailed(_) => "Failed to read data",
            DataError::WriteFailed(_) => "Failed to save data",
        };
        let body = Json(json!({
            "error": message,
        }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
