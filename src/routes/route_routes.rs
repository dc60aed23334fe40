use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::route_controller::RouteController;
use crate::dto::route_dto::{CreateRouteRequest, RouteResponse, UpdateRouteRequest};
use crate::dto::stop_dto::{CreateStopRequest, MoveStopRequest, UpdateStopRequest};
use crate::dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_route))
        .route("/", get(list_routes))
        .route("/:id", get(get_route))
        .route("/:id", put(update_route))
        .route("/:id", delete(delete_route))
        .route("/:id/stops", post(add_stop))
        .route("/:id/stops/:stop_id", put(update_stop))
        .route("/:id/stops/:stop_id", delete(delete_stop))
        .route("/:id/stops/:stop_id/move", post(move_stop))
}

async fn create_route(
    State(state): State<AppState>,
    Json(request): Json<CreateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.store.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn list_routes(
    State(state): State<AppState>,
) -> Result<Json<Vec<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.store.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RouteResponse>, AppError> {
    let controller = RouteController::new(state.store.clone());
    let response = controller.get_by_id(&id).await?;
    Ok(Json(response))
}

async fn update_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.store.clone());
    let response = controller.update(&id, request).await?;
    Ok(Json(response))
}

async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = RouteController::new(state.store.clone());
    controller.delete(&id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Route deleted successfully"
    })))
}

async fn add_stop(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CreateStopRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.store.clone());
    let response = controller.add_stop(&id, request).await?;
    Ok(Json(response))
}

async fn update_stop(
    State(state): State<AppState>,
    Path((id, stop_id)): Path<(String, String)>,
    Json(request): Json<UpdateStopRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.store.clone());
    let response = controller.update_stop(&id, &stop_id, request).await?;
    Ok(Json(response))
}

async fn delete_stop(
    State(state): State<AppState>,
    Path((id, stop_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.store.clone());
    let response = controller.delete_stop(&id, &stop_id).await?;
    Ok(Json(response))
}

async fn move_stop(
    State(state): State<AppState>,
    Path((id, stop_id)): Path<(String, String)>,
    Json(request): Json<MoveStopRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(state.store.clone());
    let response = controller.move_stop(&id, &stop_id, request).await?;
    Ok(Json(response))
}
