use serde::Deserialize;

use crate::services::stop_sequencer::MoveDirection;

// Request para agregar una parada a una ruta. El `order` se asigna
// automáticamente como el siguiente de la secuencia; el audio viene
// codificado en base64 y se sube al blob store.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStopRequest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub audio_file_name: Option<String>,
    #[serde(default)]
    pub audio_base64: Option<String>,
}

// Request para actualizar una parada existente
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStopRequest {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub order: Option<u32>,
    pub description: Option<String>,
    pub audio_file_name: Option<String>,
    pub audio_base64: Option<String>,
}

// Request para mover una parada un lugar hacia arriba o abajo
#[derive(Debug, Deserialize)]
pub struct MoveStopRequest {
    pub direction: MoveDirection,
}
