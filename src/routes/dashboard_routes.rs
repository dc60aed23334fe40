use axum::{extract::State, routing::get, Json, Router};

use crate::dto::dashboard_dto::DashboardResponse;
use crate::state::AppState;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

/// Vista actual de la flota. Lectura pura del último valor publicado por
/// el watcher; ninguna recomputación ocurre en el request path.
async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    Json(DashboardResponse::from_view(state.fleet.view()))
}
