//! Implementación en memoria del document store
//!
//! Se usa en tests y en desarrollo local sin base de datos. Mantiene las
//! colecciones en un HashMap y reparte snapshots completos por canales
//! broadcast, con la misma semántica snapshot-por-cambio que el backend
//! de Postgres.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use super::{Document, DocumentStore, SnapshotStream};
use crate::utils::errors::{not_found_error, AppError, AppResult};

const SNAPSHOT_CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    blobs: RwLock<HashMap<String, Vec<u8>>>,
    channels: RwLock<HashMap<String, broadcast::Sender<Vec<Document>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn sender(&self, collection: &str) -> broadcast::Sender<Vec<Document>> {
        let mut channels = self.channels.write().await;
        channels
            .entry(collection.to_string())
            .or_insert_with(|| broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY).0)
            .clone()
    }

    /// Emitir el snapshot completo actual a los suscriptores
    async fn publish(&self, collection: &str) {
        let snapshot = {
            let collections = self.collections.read().await;
            collections.get(collection).cloned().unwrap_or_default()
        };
        let sender = self.sender(collection).await;
        // Sin suscriptores el send falla; no es un error
        let _ = sender.send(snapshot);
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn subscribe(&self, collection: &str) -> AppResult<SnapshotStream> {
        let initial = self.fetch(collection).await?;
        let receiver = self.sender(collection).await.subscribe();

        let updates = futures::stream::unfold(receiver, |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(snapshot) => return Some((snapshot, receiver)),
                    // Con lag saltamos a los snapshots más recientes;
                    // cada snapshot es completo, no se pierde estado
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        });

        Ok(futures::stream::once(async move { initial })
            .chain(updates)
            .boxed())
    }

    async fn fetch(&self, collection: &str) -> AppResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn create(&self, collection: &str, fields: Value) -> AppResult<String> {
        if !fields.is_object() {
            return Err(AppError::BadRequest(
                "document fields must be a JSON object".to_string(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        {
            let mut collections = self.collections.write().await;
            collections
                .entry(collection.to_string())
                .or_default()
                .push(Document::new(id.clone(), fields));
        }
        self.publish(collection).await;
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> AppResult<()> {
        {
            let mut collections = self.collections.write().await;
            let documents = collections
                .get_mut(collection)
                .ok_or_else(|| not_found_error(collection, id))?;
            let document = documents
                .iter_mut()
                .find(|doc| doc.id == id)
                .ok_or_else(|| not_found_error(collection, id))?;
            merge_fields(&mut document.fields, fields);
        }
        self.publish(collection).await;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        {
            let mut collections = self.collections.write().await;
            let documents = collections
                .get_mut(collection)
                .ok_or_else(|| not_found_error(collection, id))?;
            let before = documents.len();
            documents.retain(|doc| doc.id != id);
            if documents.len() == before {
                return Err(not_found_error(collection, id));
            }
        }
        self.publish(collection).await;
        Ok(())
    }

    async fn upload_blob(&self, path: &str, bytes: Vec<u8>) -> AppResult<String> {
        let mut blobs = self.blobs.write().await;
        blobs.insert(path.to_string(), bytes);
        Ok(format!("/api/blob/{}", path))
    }

    async fn fetch_blob(&self, path: &str) -> AppResult<Option<Vec<u8>>> {
        let blobs = self.blobs.read().await;
        Ok(blobs.get(path).cloned())
    }
}

/// Merge superficial: cada campo del parcial reemplaza al existente
fn merge_fields(existing: &mut Value, partial: Value) {
    if let (Some(target), Value::Object(updates)) = (existing.as_object_mut(), partial) {
        for (key, value) in updates {
            target.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_and_fetch() {
        let store = MemoryStore::new();
        let id = store
            .create("buses", json!({ "name": "Express" }))
            .await
            .unwrap();

        let docs = store.fetch("buses").await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);
        assert_eq!(docs[0].fields["name"], "Express");
    }

    #[tokio::test]
    async fn test_update_merges_partial_fields() {
        let store = MemoryStore::new();
        let id = store
            .create("buses", json!({ "name": "Express", "capacity": 40 }))
            .await
            .unwrap();

        store
            .update("buses", &id, json!({ "capacity": 52 }))
            .await
            .unwrap();

        let docs = store.fetch("buses").await.unwrap();
        assert_eq!(docs[0].fields["name"], "Express");
        assert_eq!(docs[0].fields["capacity"], 52);
    }

    #[tokio::test]
    async fn test_update_missing_document_is_not_found() {
        let store = MemoryStore::new();
        store.create("buses", json!({ "name": "x" })).await.unwrap();

        let result = store.update("buses", "missing", json!({})).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_document() {
        let store = MemoryStore::new();
        let id = store.create("buses", json!({ "name": "x" })).await.unwrap();

        store.delete("buses", &id).await.unwrap();
        assert!(store.fetch("buses").await.unwrap().is_empty());
        assert!(store.delete("buses", &id).await.is_err());
    }

    #[tokio::test]
    async fn test_subscribe_delivers_initial_and_updated_snapshots() {
        let store = MemoryStore::new();
        store.create("buses", json!({ "name": "A" })).await.unwrap();

        let mut stream = store.subscribe("buses").await.unwrap();
        let initial = stream.next().await.unwrap();
        assert_eq!(initial.len(), 1);

        store.create("buses", json!({ "name": "B" })).await.unwrap();
        let updated = stream.next().await.unwrap();
        assert_eq!(updated.len(), 2);
    }

    #[tokio::test]
    async fn test_blob_round_trip() {
        let store = MemoryStore::new();
        let url = store
            .upload_blob("audio/r1/stop.mp3", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(url, "/api/blob/audio/r1/stop.mp3");

        let bytes = store.fetch_blob("audio/r1/stop.mp3").await.unwrap();
        assert_eq!(bytes, Some(vec![1, 2, 3]));
        assert_eq!(store.fetch_blob("missing").await.unwrap(), None);
    }
}
