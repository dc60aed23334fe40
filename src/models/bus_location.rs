//! Modelo de BusLocation
//!
//! Snapshot puntual de la posición de un autobús, almacenado en la
//! colección `busLocations`. Este servicio lo crea junto con el bus
//! (inactivo, en el origen) y a partir de ahí solo lo lee: la mutación
//! corresponde al proceso externo de reporte de posiciones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusLocation {
    #[serde(default)]
    pub id: String,
    /// Id del documento del bus asociado
    pub bus_id: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    /// Mayor valor de `order` que el bus ya pasó, 0 si ninguno
    #[serde(default)]
    pub last_passed_stop_order: u32,
    pub updated_at: DateTime<Utc>,
}

impl BusLocation {
    /// Snapshot inicial creado junto con un bus nuevo
    pub fn initial(bus_id: &str) -> Self {
        Self {
            id: String::new(),
            bus_id: bus_id.to_string(),
            active: false,
            latitude: 0.0,
            longitude: 0.0,
            last_passed_stop_order: 0,
            updated_at: Utc::now(),
        }
    }
}
