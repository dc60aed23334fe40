use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Route, Stop};

// Request para crear una ruta (nace sin paradas)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRouteRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

// Request para actualizar los metadatos de una ruta
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRouteRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

// Response de ruta con sus paradas ordenadas por `order`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub stops: Vec<Stop>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Route> for RouteResponse {
    fn from(route: Route) -> Self {
        let mut stops = route.stops;
        stops.sort_by_key(|stop| stop.order);
        Self {
            id: route.id,
            name: route.name,
            description: route.description,
            color: route.color,
            stops,
            created_at: route.created_at,
            updated_at: route.updated_at,
        }
    }
}
