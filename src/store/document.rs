//! Documento genérico del store
//!
//! Un documento es un id más un objeto JSON de campos, el mismo shape
//! `{id, ...fields}` que entrega la suscripción de snapshots.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::utils::errors::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: Value,
}

impl Document {
    pub fn new(id: String, fields: Value) -> Self {
        Self { id, fields }
    }

    /// Deserializar el documento a un modelo de dominio, inyectando el id
    /// dentro del objeto de campos.
    pub fn decode<T: DeserializeOwned>(&self) -> AppResult<T> {
        let mut fields = self.fields.clone();
        match fields.as_object_mut() {
            Some(map) => {
                map.insert("id".to_string(), Value::String(self.id.clone()));
            }
            None => {
                return Err(AppError::Persistence(format!(
                    "document '{}' fields is not a JSON object",
                    self.id
                )));
            }
        }
        serde_json::from_value(fields).map_err(|e| {
            AppError::Persistence(format!("cannot decode document '{}': {}", self.id, e))
        })
    }
}

/// Serializar un modelo a los campos de un documento, descartando el id
/// (el id es la clave del documento, no un campo).
pub fn encode_fields<T: Serialize>(value: &T) -> AppResult<Value> {
    let mut fields = serde_json::to_value(value)
        .map_err(|e| AppError::Internal(format!("cannot encode document fields: {}", e)))?;
    if let Some(map) = fields.as_object_mut() {
        map.remove("id");
    }
    Ok(fields)
}

/// Decodificar un snapshot completo, descartando con un warning los
/// documentos que no correspondan al modelo esperado. Un documento
/// malformado nunca bloquea el resto del snapshot.
pub fn decode_snapshot<T: DeserializeOwned>(snapshot: &[Document]) -> Vec<T> {
    snapshot
        .iter()
        .filter_map(|doc| match doc.decode::<T>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("skipping undecodable document: {}", e);
                None
            }
        })
        .collect()
}
