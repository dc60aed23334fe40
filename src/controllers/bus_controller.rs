//! Controlador de buses
//!
//! CRUD de la flota sobre la colección `buses`. Al crear un bus se crea
//! también su documento companion en `busLocations` (inactivo, en el
//! origen); al borrarlo se eliminan sus snapshots de posición.

use std::sync::Arc;

use chrono::Utc;
use validator::ValidationErrors;

use crate::dto::bus_dto::{BusResponse, CreateBusRequest, UpdateBusRequest};
use crate::dto::ApiResponse;
use crate::models::{collections, Bus, BusLocation, DEFAULT_CAPACITY};
use crate::store::{decode_snapshot, encode_fields, DocumentStore};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::{validate_not_empty, validate_positive};

pub struct BusController {
    store: Arc<dyn DocumentStore>,
}

impl BusController {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> AppResult<Vec<BusResponse>> {
        let snapshot = self.store.fetch(collections::BUSES).await?;
        let buses: Vec<Bus> = decode_snapshot(&snapshot);
        Ok(buses.into_iter().map(BusResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<BusResponse> {
        let bus = self.find_bus(id).await?;
        Ok(BusResponse::from(bus))
    }

    pub async fn create(&self, request: CreateBusRequest) -> AppResult<ApiResponse<BusResponse>> {
        let capacity = request.capacity.unwrap_or(DEFAULT_CAPACITY);

        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_not_empty(&request.bus_id) {
            errors.add("busId", e);
        }
        if let Err(e) = validate_not_empty(&request.name) {
            errors.add("name", e);
        }
        if let Err(e) = validate_positive(capacity as i64) {
            errors.add("capacity", e);
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let now = Utc::now();
        let mut bus = Bus {
            id: String::new(),
            bus_id: request.bus_id,
            name: request.name,
            route_id: request.route_id,
            capacity,
            status: request.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        let id = self
            .store
            .create(collections::BUSES, encode_fields(&bus)?)
            .await?;
        bus.id = id;

        // Documento companion de posición, referenciando el id del bus
        let location = BusLocation::initial(&bus.id);
        self.store
            .create(collections::BUS_LOCATIONS, encode_fields(&location)?)
            .await?;

        tracing::info!("bus '{}' created with initial location", bus.id);
        Ok(ApiResponse::success_with_message(
            BusResponse::from(bus),
            "Bus created successfully".to_string(),
        ))
    }

    pub async fn update(
        &self,
        id: &str,
        request: UpdateBusRequest,
    ) -> AppResult<ApiResponse<BusResponse>> {
        let mut bus = self.find_bus(id).await?;

        if let Some(bus_id) = request.bus_id {
            validate_not_empty(&bus_id).map_err(single_error("busId"))?;
            bus.bus_id = bus_id;
        }
        if let Some(name) = request.name {
            validate_not_empty(&name).map_err(single_error("name"))?;
            bus.name = name;
        }
        if let Some(route_id) = request.route_id {
            // null explícito desasigna la ruta
            bus.route_id = route_id;
        }
        if let Some(capacity) = request.capacity {
            validate_positive(capacity as i64).map_err(single_error("capacity"))?;
            bus.capacity = capacity;
        }
        if let Some(status) = request.status {
            bus.status = status;
        }
        bus.updated_at = Utc::now();

        self.store
            .update(collections::BUSES, id, encode_fields(&bus)?)
            .await?;

        Ok(ApiResponse::success_with_message(
            BusResponse::from(bus),
            "Bus updated successfully".to_string(),
        ))
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.store.delete(collections::BUSES, id).await?;

        // Limpiar los snapshots de posición del bus. Un fallo aquí no
        // revierte el borrado del bus; el siguiente snapshot es la fuente
        // de verdad y los lectores toleran locations huérfanas.
        let snapshot = self.store.fetch(collections::BUS_LOCATIONS).await?;
        let locations: Vec<BusLocation> = decode_snapshot(&snapshot);
        for location in locations.iter().filter(|loc| loc.bus_id == id) {
            if let Err(e) = self
                .store
                .delete(collections::BUS_LOCATIONS, &location.id)
                .await
            {
                tracing::warn!("could not delete location '{}': {}", location.id, e);
            }
        }

        tracing::info!("bus '{}' deleted", id);
        Ok(())
    }

    async fn find_bus(&self, id: &str) -> AppResult<Bus> {
        let snapshot = self.store.fetch(collections::BUSES).await?;
        snapshot
            .iter()
            .find(|doc| doc.id == id)
            .map(|doc| doc.decode::<Bus>())
            .transpose()?
            .ok_or_else(|| not_found_error("bus", id))
    }
}

fn single_error(field: &'static str) -> impl Fn(validator::ValidationError) -> AppError {
    move |e| {
        let mut errors = ValidationErrors::new();
        errors.add(field, e);
        AppError::Validation(errors)
    }
}
