//! Lógica de derivación del sistema
//!
//! Secuenciador de paradas, resolución de posición por bus, agregación
//! de flota y el watcher que mantiene viva la vista del dashboard.

pub mod fleet_aggregator;
pub mod fleet_watcher;
pub mod position_resolver;
pub mod stop_sequencer;
