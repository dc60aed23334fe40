use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Bus, BusStatus};

// Request para crear un bus
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusRequest {
    pub bus_id: String,
    pub name: String,
    #[serde(default)]
    pub route_id: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub status: Option<BusStatus>,
}

// Request para actualizar un bus
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusRequest {
    pub bus_id: Option<String>,
    pub name: Option<String>,
    // Doble Option: ausente = sin cambio, null = desasignar ruta
    #[serde(default, with = "serde_optional_field")]
    pub route_id: Option<Option<String>>,
    pub capacity: Option<u32>,
    pub status: Option<BusStatus>,
}

// Response de bus
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusResponse {
    pub id: String,
    pub bus_id: String,
    pub name: String,
    pub route_id: Option<String>,
    pub capacity: u32,
    pub status: BusStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Bus> for BusResponse {
    fn from(bus: Bus) -> Self {
        Self {
            id: bus.id,
            bus_id: bus.bus_id,
            name: bus.name,
            route_id: bus.route_id,
            capacity: bus.capacity,
            status: bus.status,
            created_at: bus.created_at,
            updated_at: bus.updated_at,
        }
    }
}

/// Deserializa `Option<Option<T>>` distinguiendo campo ausente de null
mod serde_optional_field {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
