//! Watcher de la flota
//!
//! Sostiene el estado derivado del dashboard: una tarea por colección
//! consume el stream de snapshots del store, deposita el snapshot más
//! reciente en el estado compartido y dispara la recomputación pura del
//! agregador. El resultado se publica por un canal watch; los handlers
//! HTTP solamente leen el último valor.
//!
//! La vista no se computa hasta que las tres colecciones tengan datos
//! (estado de carga). Una vez publicada, un snapshot que vuelva a quedar
//! vacío no la recomputa: se conserva la última vista completa, igual
//! que hacía el dashboard original.

use std::sync::Arc;

use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::models::{collections, Bus, BusLocation, Route};
use crate::services::fleet_aggregator::{aggregate, FleetView};
use crate::store::{decode_snapshot, DocumentStore, SnapshotStream};
use crate::utils::errors::AppResult;

#[derive(Default)]
struct FleetInputs {
    buses: Vec<Bus>,
    routes: Vec<Route>,
    locations: Vec<BusLocation>,
}

impl FleetInputs {
    fn recompute(&self) -> Option<FleetView> {
        if self.buses.is_empty() || self.routes.is_empty() || self.locations.is_empty() {
            return None;
        }
        Some(aggregate(&self.buses, &self.routes, &self.locations))
    }
}

pub struct FleetWatcher {
    view: watch::Receiver<Option<FleetView>>,
    tasks: Vec<JoinHandle<()>>,
}

impl FleetWatcher {
    /// Suscribirse a las tres colecciones y lanzar las tareas de consumo
    pub async fn spawn(store: Arc<dyn DocumentStore>) -> AppResult<Self> {
        let inputs = Arc::new(Mutex::new(FleetInputs::default()));
        let (tx, view) = watch::channel(None);
        let tx = Arc::new(tx);

        let tasks = vec![
            feed::<Bus>(
                store.subscribe(collections::BUSES).await?,
                inputs.clone(),
                tx.clone(),
                |state, items| state.buses = items,
            ),
            feed::<Route>(
                store.subscribe(collections::ROUTES).await?,
                inputs.clone(),
                tx.clone(),
                |state, items| state.routes = items,
            ),
            feed::<BusLocation>(
                store.subscribe(collections::BUS_LOCATIONS).await?,
                inputs.clone(),
                tx.clone(),
                |state, items| state.locations = items,
            ),
        ];

        Ok(Self { view, tasks })
    }

    /// Última vista computada, None mientras falten colecciones
    pub fn view(&self) -> Option<FleetView> {
        self.view.borrow().clone()
    }

    pub fn subscribe_view(&self) -> watch::Receiver<Option<FleetView>> {
        self.view.clone()
    }
}

impl Drop for FleetWatcher {
    fn drop(&mut self) {
        // Abortar las tareas cancela las suscripciones: ninguna fuente
        // vuelve a disparar recomputaciones
        for task in &self.tasks {
            task.abort();
        }
    }
}

fn feed<T>(
    mut stream: SnapshotStream,
    inputs: Arc<Mutex<FleetInputs>>,
    tx: Arc<watch::Sender<Option<FleetView>>>,
    apply: impl Fn(&mut FleetInputs, Vec<T>) + Send + 'static,
) -> JoinHandle<()>
where
    T: DeserializeOwned + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(snapshot) = stream.next().await {
            let items = decode_snapshot::<T>(&snapshot);
            let mut state = inputs.lock().await;
            apply(&mut state, items);
            if let Some(view) = state.recompute() {
                let _ = tx.send(Some(view));
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{encode_fields, MemoryStore};
    use crate::models::BusStatus;
    use chrono::Utc;
    use std::time::Duration;

    async fn seed_bus(store: &MemoryStore, name: &str, route_id: Option<&str>) -> String {
        let bus = Bus {
            id: String::new(),
            bus_id: format!("EXT-{}", name),
            name: name.to_string(),
            route_id: route_id.map(|r| r.to_string()),
            capacity: 40,
            status: BusStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store
            .create(collections::BUSES, encode_fields(&bus).unwrap())
            .await
            .unwrap()
    }

    async fn seed_route(store: &MemoryStore, name: &str) -> String {
        let route = Route {
            id: String::new(),
            name: name.to_string(),
            description: None,
            color: None,
            stops: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store
            .create(collections::ROUTES, encode_fields(&route).unwrap())
            .await
            .unwrap()
    }

    async fn seed_location(store: &MemoryStore, bus_id: &str, active: bool) {
        let mut location = BusLocation::initial(bus_id);
        location.active = active;
        store
            .create(collections::BUS_LOCATIONS, encode_fields(&location).unwrap())
            .await
            .unwrap();
    }

    async fn wait_for_view(watcher: &FleetWatcher) -> FleetView {
        for _ in 0..100 {
            if let Some(view) = watcher.view() {
                return view;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("fleet view was never computed");
    }

    #[tokio::test]
    async fn test_no_view_until_all_collections_have_data() {
        let store = Arc::new(MemoryStore::new());
        let watcher = FleetWatcher::spawn(store.clone()).await.unwrap();

        seed_bus(&store, "Bus 1", None).await;
        seed_route(&store, "Route 1").await;
        // Sin posiciones la vista sigue en carga
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(watcher.view().is_none());

        seed_location(&store, "whatever", false).await;
        let view = wait_for_view(&watcher).await;
        assert_eq!(view.buses.len(), 1);
    }

    #[tokio::test]
    async fn test_view_recomputes_on_new_snapshots() {
        let store = Arc::new(MemoryStore::new());
        let watcher = FleetWatcher::spawn(store.clone()).await.unwrap();

        let bus_id = seed_bus(&store, "Bus 1", None).await;
        seed_route(&store, "Route 1").await;
        seed_location(&store, &bus_id, true).await;

        let view = wait_for_view(&watcher).await;
        assert_eq!(view.active_count, 1);
        assert_eq!(view.fleet_active_percent, 100);

        seed_bus(&store, "Bus 2", None).await;
        for _ in 0..100 {
            if watcher.view().map_or(false, |v| v.buses.len() == 2) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let view = watcher.view().unwrap();
        assert_eq!(view.buses.len(), 2);
        assert_eq!(view.fleet_active_percent, 50);
    }
}
