use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing::{error, info};

use transit_dashboard::config::{EnvironmentConfig, StoreBackend};
use transit_dashboard::state::AppState;
use transit_dashboard::store::{DocumentStore, MemoryStore, PgDocumentStore};
use transit_dashboard::build_app;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("🚌 Bus Transit System - Management Dashboard API");
    info!("================================================");

    let config = EnvironmentConfig::from_env();

    // Inicializar el document store
    let store: Arc<dyn DocumentStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = match config.database_url.clone() {
                Some(url) => url,
                None => {
                    error!("❌ DATABASE_URL is required with STORE_BACKEND=postgres");
                    return Err(anyhow::anyhow!("missing DATABASE_URL"));
                }
            };

            let pool = match PgPoolOptions::new()
                .max_connections(10)
                .connect(&database_url)
                .await
            {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("database error: {}", e));
                }
            };

            sqlx::migrate!().run(&pool).await?;
            info!("✅ Postgres document store listo");
            Arc::new(PgDocumentStore::new(pool))
        }
        StoreBackend::Memory => {
            info!("✅ Document store en memoria (desarrollo)");
            Arc::new(MemoryStore::new())
        }
    };

    // Estado compartido + suscripciones del watcher de flota
    let state = AppState::new(store, config.clone()).await?;
    let app = build_app(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚌 Endpoints - Bus:");
    info!("   POST   /api/bus - Crear bus (crea también su busLocation)");
    info!("   GET    /api/bus - Listar buses");
    info!("   GET    /api/bus/:id - Obtener bus");
    info!("   PUT    /api/bus/:id - Actualizar bus");
    info!("   DELETE /api/bus/:id - Eliminar bus");
    info!("🗺️  Endpoints - Route:");
    info!("   POST   /api/route - Crear ruta");
    info!("   GET    /api/route - Listar rutas");
    info!("   GET    /api/route/:id - Obtener ruta");
    info!("   PUT    /api/route/:id - Actualizar ruta");
    info!("   DELETE /api/route/:id - Eliminar ruta (y sus paradas)");
    info!("   POST   /api/route/:id/stops - Agregar parada");
    info!("   PUT    /api/route/:id/stops/:stop_id - Actualizar parada");
    info!("   DELETE /api/route/:id/stops/:stop_id - Eliminar parada");
    info!("   POST   /api/route/:id/stops/:stop_id/move - Mover parada");
    info!("📊 Endpoints - Dashboard:");
    info!("   GET    /api/dashboard - Vista derivada de la flota");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("cannot install Ctrl+C handler: {}", e);
        return;
    }
    info!("👋 Señal de apagado recibida");
}
