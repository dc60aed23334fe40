//! Implementación del document store sobre Postgres
//!
//! Cada documento es una fila JSONB en la tabla `documents`. Tras cada
//! escritura exitosa se relee la colección completa y se emite el snapshot
//! a los suscriptores, cumpliendo el contrato snapshot-por-cambio.
//!
//! Límite conocido: el read-modify-write de una colección (p. ej. reordenar
//! paradas dentro del documento de una ruta) no es transaccional a nivel de
//! aplicación; dos escritores concurrentes sobre la misma ruta terminan en
//! last-write-wins a granularidad de documento.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;
use sqlx::PgPool;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use super::{Document, DocumentStore, SnapshotStream};
use crate::utils::errors::{not_found_error, AppResult};

const SNAPSHOT_CHANNEL_CAPACITY: usize = 64;

pub struct PgDocumentStore {
    pool: PgPool,
    channels: RwLock<HashMap<String, broadcast::Sender<Vec<Document>>>>,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            channels: RwLock::new(HashMap::new()),
        }
    }

    async fn sender(&self, collection: &str) -> broadcast::Sender<Vec<Document>> {
        let mut channels = self.channels.write().await;
        channels
            .entry(collection.to_string())
            .or_insert_with(|| broadcast::channel(SNAPSHOT_CHANNEL_CAPACITY).0)
            .clone()
    }

    async fn publish(&self, collection: &str) {
        match self.fetch(collection).await {
            Ok(snapshot) => {
                let sender = self.sender(collection).await;
                let _ = sender.send(snapshot);
            }
            Err(e) => {
                // El snapshot fallido no corrompe el estado ya publicado;
                // la siguiente escritura vuelve a intentar
                tracing::error!("cannot publish snapshot for '{}': {}", collection, e);
            }
        }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn subscribe(&self, collection: &str) -> AppResult<SnapshotStream> {
        let initial = self.fetch(collection).await?;
        let receiver = self.sender(collection).await.subscribe();

        let updates = futures::stream::unfold(receiver, |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(snapshot) => return Some((snapshot, receiver)),
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
        let rows: Vec<(String, Value)> = sqlx::query_as(
            "SELECT id, fields FROM documents WHERE collection = $1 ORDER BY created_at",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, fields)| Document::new(id, fields))
            .collect())
    }

    async fn create(&self, collection: &str, fields: Value) -> AppResult<String> {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO documents (collection, id, fields) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(&fields)
            .execute(&self.pool)
            .await?;

        self.publish(collection).await;
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: Value) -> AppResult<()> {
        // `||` hace el merge superficial de campos directamente en JSONB
        let result = sqlx::query(
            "UPDATE documents SET fields = fields || $3, updated_at = now() \
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(&fields)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error(collection, id));
        }

        self.publish(collection).await;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error(collection, id));
        }

        self.publish(collection).await;
        Ok(())
    }

    async fn upload_blob(&self, path: &str, bytes: Vec<u8>) -> AppResult<String> {
        sqlx::query(
            "INSERT INTO blobs (path, content) VALUES ($1, $2) \
             ON CONFLICT (path) DO UPDATE SET content = EXCLUDED.content",
        )
        .bind(path)
        .bind(&bytes)
        .execute(&self.pool)
        .await?;

        Ok(format!("/api/blob/{}", path))
    }

    async fn fetch_blob(&self, path: &str) -> AppResult<Option<Vec<u8>>> {
        let row: Option<(Vec<u8>,)> = sqlx::query_as("SELECT content FROM blobs WHERE path = $1")
            .bind(path)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(content,)| content))
    }
}
