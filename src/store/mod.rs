//! Contrato con el document store
//!
//! Este módulo define la interfaz hacia el colaborador de persistencia:
//! colecciones de documentos con suscripción a snapshots completos, más
//! almacenamiento de blobs para los anuncios de audio. Cada cambio en una
//! colección entrega un snapshot completo (sin contrato de diffing); las
//! escrituras son fire-and-forget respecto al estado derivado, que se
//! refresca con el siguiente snapshot.

pub mod document;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;

use crate::utils::errors::AppResult;

pub use document::{decode_snapshot, encode_fields, Document};
pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

/// Stream de snapshots completos de una colección. El primer elemento es
/// el estado actual; cada escritura posterior produce un snapshot nuevo.
/// Soltar el stream cancela la suscripción.
pub type SnapshotStream = BoxStream<'static, Vec<Document>>;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Suscribirse a los snapshots de una colección
    async fn subscribe(&self, collection: &str) -> AppResult<SnapshotStream>;

    /// Leer el snapshot actual de una colección
    async fn fetch(&self, collection: &str) -> AppResult<Vec<Document>>;

    /// Crear un documento; devuelve el id generado
    async fn create(&self, collection: &str, fields: Value) -> AppResult<String>;

    /// Actualizar parcialmente un documento (merge superficial de campos)
    async fn update(&self, collection: &str, id: &str, fields: Value) -> AppResult<()>;

    /// Eliminar un documento
    async fn delete(&self, collection: &str, id: &str) -> AppResult<()>;

    /// Subir un blob (audio de parada); devuelve la URL opaca a persistir
    async fn upload_blob(&self, path: &str, bytes: Vec<u8>) -> AppResult<String>;

    /// Leer un blob previamente subido
    async fn fetch_blob(&self, path: &str) -> AppResult<Option<Vec<u8>>>;
}
