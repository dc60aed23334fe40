//! Modelos de Route y Stop
//!
//! Una ruta es dueña de sus paradas: el array `stops` vive embebido en el
//! documento de la colección `routes`, por lo que borrar la ruta elimina
//! también sus paradas. El campo `order` de cada parada es un entero >= 1,
//! único dentro de la ruta pero sin contigüidad garantizada: los lectores
//! deben ordenar por `order` en lugar de asumir que la posición en el array
//! coincide con la secuencia de navegación.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Parada de una ruta
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Route principal - documento de la colección `routes`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub stops: Vec<Stop>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
