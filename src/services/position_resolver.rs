//! Resolución de posición por bus
//!
//! Deriva el estado de navegación de un bus a partir de su snapshot de
//! posición y las paradas de su ruta. El ETA es una heurística fija de
//! 5 minutos por índice de parada, no una medida de distancia: el campo
//! `order` actúa a la vez como clave de orden y como proxy de distancia,
//! un atajo de modelado heredado de los consumidores existentes.

use serde::Serialize;

use crate::models::{BusLocation, Route, Stop};

/// Minutos estimados por diferencia de índice de parada
pub const MINUTES_PER_STOP: u32 = 5;

/// Estado de navegación derivado para un bus
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NavigationStatus {
    pub next_stop: Option<Stop>,
    pub eta_minutes: u32,
    pub progress_percent: u32,
}

impl NavigationStatus {
    fn idle() -> Self {
        Self {
            next_stop: None,
            eta_minutes: 0,
            progress_percent: 0,
        }
    }

    fn completed() -> Self {
        Self {
            next_stop: None,
            eta_minutes: 0,
            progress_percent: 100,
        }
    }
}

/// Función pura: mismos inputs producen siempre el mismo output.
///
/// Sin snapshot, sin ruta o con ruta vacía el bus queda en (none, 0, 0).
/// Si el bus ya pasó la última parada, (none, 0, 100). El progreso se
/// calcula contra la CANTIDAD de paradas, no contra el máximo `order`;
/// con huecos en la numeración puede llegar a 100 antes de la última
/// parada. Comportamiento preservado tal cual por compatibilidad.
pub fn resolve(location: Option<&BusLocation>, route: Option<&Route>) -> NavigationStatus {
    let (location, route) = match (location, route) {
        (Some(location), Some(route)) => (location, route),
        _ => return NavigationStatus::idle(),
    };

    if route.stops.is_empty() {
        return NavigationStatus::idle();
    }

    // Orden defensivo: el documento no garantiza el array ya ordenado
    let mut stops = route.stops.clone();
    stops.sort_by_key(|stop| stop.order);

    let last_passed = location.last_passed_stop_order;
    let next_stop = match stops.iter().find(|stop| stop.order > last_passed) {
        Some(stop) => stop.clone(),
        None => return NavigationStatus::completed(),
    };

    let eta_minutes = (next_stop.order - last_passed) * MINUTES_PER_STOP;
    let progress = (last_passed as f64 / stops.len() as f64 * 100.0).round() as u32;

    NavigationStatus {
        next_stop: Some(next_stop),
        eta_minutes,
        progress_percent: progress.min(100),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stop(id: &str, order: u32) -> Stop {
        Stop {
            id: id.to_string(),
            name: format!("Stop {}", order),
            latitude: 13.08,
            longitude: 80.27,
            order,
            description: None,
            audio_url: None,
            created_at: Utc::now(),
        }
    }

    fn route(orders: &[u32]) -> Route {
        Route {
            id: "r1".to_string(),
            name: "Blue Line".to_string(),
            description: None,
            color: None,
            stops: orders
                .iter()
                .map(|&o| stop(&format!("s{}", o), o))
                .collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn location(last_passed: u32) -> BusLocation {
        BusLocation {
            id: "l1".to_string(),
            bus_id: "b1".to_string(),
            active: true,
            latitude: 13.08,
            longitude: 80.27,
            last_passed_stop_order: last_passed,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_snapshot_or_route_is_idle() {
        let idle = NavigationStatus {
            next_stop: None,
            eta_minutes: 0,
            progress_percent: 0,
        };
        assert_eq!(resolve(None, Some(&route(&[1, 2]))), idle);
        assert_eq!(resolve(Some(&location(1)), None), idle);
        assert_eq!(resolve(None, None), idle);
    }

    #[test]
    fn test_empty_route_is_idle() {
        let status = resolve(Some(&location(0)), Some(&route(&[])));
        assert_eq!(status.eta_minutes, 0);
        assert_eq!(status.progress_percent, 0);
        assert!(status.next_stop.is_none());
    }

    #[test]
    fn test_fresh_bus_targets_first_stop() {
        let status = resolve(Some(&location(0)), Some(&route(&[1, 2, 3])));
        assert_eq!(status.next_stop.as_ref().unwrap().order, 1);
        assert_eq!(status.eta_minutes, 5);
        assert_eq!(status.progress_percent, 0);
    }

    #[test]
    fn test_mid_route_eta_and_progress() {
        let status = resolve(Some(&location(1)), Some(&route(&[1, 2, 3, 4])));
        assert_eq!(status.next_stop.as_ref().unwrap().order, 2);
        assert_eq!(status.eta_minutes, 5);
        assert_eq!(status.progress_percent, 25);
    }

    #[test]
    fn test_gapped_orders_scenario() {
        // Paradas 1,3,5 con lastPassed=3: el ETA salta el hueco y el
        // progreso (contra cantidad, no contra max order) ya marca 100
        let status = resolve(Some(&location(3)), Some(&route(&[1, 3, 5])));
        assert_eq!(status.next_stop.as_ref().unwrap().order, 5);
        assert_eq!(status.eta_minutes, 10);
        assert_eq!(status.progress_percent, 100);
    }

    #[test]
    fn test_past_final_stop_is_completed() {
        for last_passed in [3, 4, 99] {
            let status = resolve(Some(&location(last_passed)), Some(&route(&[1, 2, 3])));
            assert!(status.next_stop.is_none());
            assert_eq!(status.eta_minutes, 0);
            assert_eq!(status.progress_percent, 100);
        }
    }

    #[test]
    fn test_unsorted_stop_array_is_sorted_first() {
        let mut unsorted = route(&[5, 1, 3]);
        unsorted.stops.swap(0, 1);
        let status = resolve(Some(&location(1)), Some(&unsorted));
        assert_eq!(status.next_stop.as_ref().unwrap().order, 3);
    }

    #[test]
    fn test_resolver_is_idempotent() {
        let loc = location(2);
        let r = route(&[1, 2, 3, 4, 5]);
        assert_eq!(resolve(Some(&loc), Some(&r)), resolve(Some(&loc), Some(&r)));
    }
}
