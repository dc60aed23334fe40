//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum: el handle al document store, el watcher
//! de la flota y la configuración.

use std::sync::Arc;

use crate::config::EnvironmentConfig;
use crate::services::fleet_watcher::FleetWatcher;
use crate::store::DocumentStore;
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub config: EnvironmentConfig,
    pub fleet: Arc<FleetWatcher>,
}

impl AppState {
    /// Construir el estado y dejar corriendo las suscripciones del watcher
    pub async fn new(store: Arc<dyn DocumentStore>, config: EnvironmentConfig) -> AppResult<Self> {
        let fleet = Arc::new(FleetWatcher::spawn(store.clone()).await?);
        Ok(Self {
            store,
            config,
            fleet,
        })
    }
}
