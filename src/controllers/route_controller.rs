//! Controlador de rutas y sus paradas
//!
//! Las paradas viven embebidas en el documento de la ruta, así que toda
//! operación sobre paradas es un read-modify-write del documento completo.
//! Ese read-modify-write no es transaccional: dos reordenamientos
//! concurrentes sobre la misma ruta resuelven en last-write-wins a
//! granularidad de documento.
//!
//! Operar sobre una parada que ya no existe en el último snapshot degrada
//! a no-op: la respuesta indica que nada cambió y ningún error se propaga
//! al agregador.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::dto::route_dto::{CreateRouteRequest, RouteResponse, UpdateRouteRequest};
use crate::dto::stop_dto::{CreateStopRequest, MoveStopRequest, UpdateStopRequest};
use crate::dto::ApiResponse;
use crate::models::{collections, Route, Stop};
use crate::services::stop_sequencer;
use crate::store::{decode_snapshot, encode_fields, DocumentStore};
use crate::utils::errors::{bad_request_error, not_found_error, AppError, AppResult};
use crate::utils::validation::{validate_coordinates, validate_not_empty};

pub struct RouteController {
    store: Arc<dyn DocumentStore>,
}

impl RouteController {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<RouteResponse>> {
        let snapshot = self.store.fetch(collections::ROUTES).await?;
        let routes: Vec<Route> = decode_snapshot(&snapshot);
        Ok(routes.into_iter().map(RouteResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<RouteResponse> {
        let route = self.find_route(id).await?;
        Ok(RouteResponse::from(route))
    }

    pub async fn create(
        &self,
        request: CreateRouteRequest,
    ) -> AppResult<ApiResponse<RouteResponse>> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_not_empty(&request.name) {
            errors.add("name", e);
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let now = Utc::now();
        let mut route = Route {
            id: String::new(),
            name: request.name,
            description: request.description,
            color: request.color,
            stops: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let id = self
            .store
            .create(collections::ROUTES, encode_fields(&route)?)
            .await?;
        route.id = id;

        tracing::info!("route '{}' created", route.id);
        Ok(ApiResponse::success_with_message(
            RouteResponse::from(route),
            "Route created successfully".to_string(),
        ))
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateRouteRequest,
    ) -> AppResult<ApiResponse<RouteResponse>> {
        let mut route = self.find_route(id).await?;

        if let Some(name) = request.name {
            validate_not_empty(&name).map_err(single_error("name"))?;
            route.name = name;
        }
        if let Some(description) = request.description {
            route.description = Some(description);
        }
        if let Some(color) = request.color {
            route.color = Some(color);
        }
        route.updated_at = Utc::now();

        self.store
            .update(collections::ROUTES, id, encode_fields(&route)?)
            .await?;

        Ok(ApiResponse::success_with_message(
            RouteResponse::from(route),
            "Route updated successfully".to_string(),
        ))
    }

    /// Borrar la ruta arrastra sus paradas embebidas. No hay cascada a
    /// los buses que la referencien: sus routeId quedan colgantes y los
    /// lectores los tratan como "sin ruta asignada".
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete(collections::ROUTES, id).await?;
        tracing::info!("route '{}' deleted with its stops", id);
        Ok(())
    }

    pub async fn add_stop(
        &self,
        route_id: &str,
        request: CreateStopRequest,
    ) -> AppResult<ApiResponse<RouteResponse>> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_not_empty(&request.name) {
            errors.add("name", e);
        }
        if let Err(e) = validate_coordinates(request.latitude, request.longitude) {
            errors.add("coordinates", e);
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let mut route = self.find_route(route_id).await?;

        let audio_url = self
            .upload_audio(route_id, &request.audio_file_name, &request.audio_base64)
            .await?;

        let stop = Stop {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            latitude: request.latitude,
            longitude: request.longitude,
            order: stop_sequencer::next_order(&route.stops),
            description: request.description,
            audio_url,
            created_at: Utc::now(),
        };
        route.stops.push(stop);

        self.persist_stops(&mut route).await?;
        Ok(ApiResponse::success_with_message(
            RouteResponse::from(route),
            "Stop added successfully".to_string(),
        ))
    }

    pub async fn update_stop(
        &self,
        route_id: &str,
        stop_id: &str,
        request: UpdateStopRequest,
    ) -> AppResult<ApiResponse<RouteResponse>> {
        let mut route = self.find_route(route_id).await?;

        let Some(index) = route.stops.iter().position(|stop| stop.id == stop_id) else {
            return Ok(ApiResponse::unchanged(
                "Stop no longer exists; nothing to update".to_string(),
            ));
        };

        if let Some(name) = &request.name {
            validate_not_empty(name).map_err(single_error("name"))?;
        }
        let latitude = request.latitude.unwrap_or(route.stops[index].latitude);
        let longitude = request.longitude.unwrap_or(route.stops[index].longitude);
        validate_coordinates(latitude, longitude).map_err(single_error("coordinates"))?;

        if let Some(order) = request.order {
            if order < 1 {
                return Err(crate::utils::errors::validation_error(
                    "order",
                    "order must be >= 1",
                ));
            }
            // order único dentro de la ruta
            let duplicated = route
                .stops
                .iter()
                .any(|stop| stop.id != stop_id && stop.order == order);
            if duplicated {
                return Err(crate::utils::errors::validation_error(
                    "order",
                    "order already used by another stop in this route",
                ));
            }
        }

        let audio_url = self
            .upload_audio(route_id, &request.audio_file_name, &request.audio_base64)
            .await?;

        let stop = &mut route.stops[index];
        if let Some(name) = request.name {
            stop.name = name;
        }
        stop.latitude = latitude;
        stop.longitude = longitude;
        if let Some(order) = request.order {
            stop.order = order;
        }
        if let Some(description) = request.description {
            stop.description = Some(description);
        }
        if let Some(url) = audio_url {
            stop.audio_url = Some(url);
        }

        self.persist_stops(&mut route).await?;
        Ok(ApiResponse::success_with_message(
            RouteResponse::from(route),
            "Stop updated successfully".to_string(),
        ))
    }

    pub async fn move_stop(
        &self,
        route_id: &str,
        stop_id: &str,
        request: MoveStopRequest,
    ) -> AppResult<ApiResponse<RouteResponse>> {
        let mut route = self.find_route(route_id).await?;

        match stop_sequencer::move_adjacent(&route.stops, stop_id, request.direction) {
            Some(reordered) => {
                route.stops = reordered;
                self.persist_stops(&mut route).await?;
                Ok(ApiResponse::success_with_message(
                    RouteResponse::from(route),
                    "Stop moved successfully".to_string(),
                ))
            }
            // Borde de la secuencia o parada inexistente
            None => Ok(ApiResponse::unchanged("Stop was not moved".to_string())),
        }
    }

    pub async fn delete_stop(
        &self,
        route_id: &str,
        stop_id: &str,
    ) -> AppResult<ApiResponse<RouteResponse>> {
        let mut route = self.find_route(route_id).await?;

        let remaining = stop_sequencer::remove(&route.stops, stop_id);
        if remaining.len() == route.stops.len() {
            return Ok(ApiResponse::unchanged(
                "Stop no longer exists; nothing to delete".to_string(),
            ));
        }

        route.stops = remaining;
        self.persist_stops(&mut route).await?;
        Ok(ApiResponse::success_with_message(
            RouteResponse::from(route),
            "Stop deleted successfully".to_string(),
        ))
    }

    async fn find_route(&self, id: &str) -> AppResult<Route> {
        let snapshot = self.store.fetch(collections::ROUTES).await?;
        snapshot
            .iter()
            .find(|doc| doc.id == id)
            .map(|doc| doc.decode::<Route>())
            .transpose()?
            .ok_or_else(|| not_found_error("route", id))
    }

    /// Persistir el array de paradas con su timestamp de modificación
    async fn persist_stops(&self, route: &mut Route) -> AppResult<()> {
        route.updated_at = Utc::now();
        let stops = serde_json::to_value(&route.stops)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        self.store
            .update(
                collections::ROUTES,
                &route.id,
                json!({
                    "stops": stops,
                    "updatedAt": route.updated_at,
                }),
            )
            .await
    }

    async fn upload_audio(
        &self,
        route_id: &str,
        file_name: &Option<String>,
        audio_base64: &Option<String>,
    ) -> AppResult<Option<String>> {
        let Some(encoded) = audio_base64 else {
            return Ok(None);
        };

        let bytes = BASE64
            .decode(encoded.as_bytes())
            .map_err(|_| bad_request_error("audio payload is not valid base64"))?;

        let file_name = file_name.as_deref().unwrap_or("announcement.mp3");
        let path = format!(
            "audio/{}/{}_{}",
            route_id,
            Utc::now().timestamp_millis(),
            file_name
        );
        let url = self.store.upload_blob(&path, bytes).await?;
        Ok(Some(url))
    }
}

fn single_error(field: &'static str) -> impl Fn(validator::ValidationError) -> AppError {
    move |e| {
        let mut errors = ValidationErrors::new();
        errors.add(field, e);
        AppError::Validation(errors)
    }
}
