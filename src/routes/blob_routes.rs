use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_blob_router() -> Router<AppState> {
    Router::new().route("/*path", get(get_blob))
}

/// Servir un blob subido (anuncios de audio de paradas). La URL que se
/// persiste en la parada apunta aquí; para el resto del sistema es opaca.
async fn get_blob(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    match state.store.fetch_blob(&path).await? {
        Some(bytes) => Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/octet-stream")],
            bytes,
        )
            .into_response()),
        None => Err(AppError::NotFound(format!("blob '{}' not found", path))),
    }
}
