//! Modelo de Bus
//!
//! Representa un autobús de la flota tal como se almacena en la
//! colección `buses` del document store. Los nombres de campo camelCase
//! corresponden al shape del documento persistido.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CAPACITY: u32 = 40;

fn default_capacity() -> u32 {
    DEFAULT_CAPACITY
}

/// Estado operativo del autobús
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BusStatus {
    #[default]
    Active,
    Maintenance,
    Inactive,
}

impl BusStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusStatus::Active => "active",
            BusStatus::Maintenance => "maintenance",
            BusStatus::Inactive => "inactive",
        }
    }
}

/// Bus principal - documento de la colección `buses`
///
/// `route_id` puede apuntar a una ruta que ya no existe; los lectores
/// tratan esa referencia colgante como "sin ruta asignada", nunca como error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    #[serde(default)]
    pub id: String,
    pub bus_id: String,
    pub name: String,
    #[serde(default)]
    pub route_id: Option<String>,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    #[serde(default)]
    pub status: BusStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_defaults_on_sparse_document() {
        let bus: Bus = serde_json::from_value(serde_json::json!({
            "busId": "TN-01-1234",
            "name": "Morning Express",
            "createdAt": "2025-01-10T08:00:00Z",
            "updatedAt": "2025-01-10T08:00:00Z"
        }))
        .unwrap();

        assert_eq!(bus.capacity, DEFAULT_CAPACITY);
        assert_eq!(bus.status, BusStatus::Active);
        assert!(bus.route_id.is_none());
    }

    #[test]
    fn test_bus_status_round_trip() {
        let json = serde_json::to_string(&BusStatus::Maintenance).unwrap();
        assert_eq!(json, "\"maintenance\"");
        let status: BusStatus = serde_json::from_str("\"inactive\"").unwrap();
        assert_eq!(status, BusStatus::Inactive);
    }
}
