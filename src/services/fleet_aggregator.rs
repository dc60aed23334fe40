//! Agregador de flota
//!
//! Combina los snapshots de buses, rutas y posiciones en el view model
//! del dashboard. Es una función pura sobre los tres snapshots completos:
//! no hay merge incremental ni estado oculto, cada recomputación parte
//! de cero.

use serde::Serialize;

use crate::models::{Bus, BusLocation, BusStatus, Route, Stop};
use crate::services::position_resolver;

/// View model completo del dashboard
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FleetView {
    pub active_count: usize,
    pub fleet_active_percent: u32,
    pub total_routes: usize,
    pub total_stops: usize,
    pub buses: Vec<BusOverview>,
    pub activity: Vec<ActivityEntry>,
}

/// Estado derivado de un bus individual
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BusOverview {
    pub id: String,
    pub bus_id: String,
    pub name: String,
    pub status: BusStatus,
    pub capacity: u32,
    /// None cuando el bus no tiene ruta o su routeId quedó colgante
    pub route_name: Option<String>,
    pub active: bool,
    pub last_passed_stop_order: Option<u32>,
    pub next_stop: Option<Stop>,
    pub eta_minutes: u32,
    pub progress_percent: u32,
}

/// Entrada del feed de actividad (los primeros cinco buses en orden de
/// join, sin ordenar por recencia)
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub bus_id: String,
    pub name: String,
    pub detail: String,
}

const ACTIVITY_FEED_SIZE: usize = 5;

/// Recomputar el view model a partir de los tres snapshots
pub fn aggregate(buses: &[Bus], routes: &[Route], locations: &[BusLocation]) -> FleetView {
    let overviews: Vec<BusOverview> = buses
        .iter()
        .map(|bus| {
            let location = locations.iter().find(|loc| loc.bus_id == bus.id);
            // routeId colgante => "sin ruta asignada", nunca un error
            let route = bus
                .route_id
                .as_deref()
                .and_then(|route_id| routes.iter().find(|r| r.id == route_id));

            let navigation = position_resolver::resolve(location, route);

            BusOverview {
                id: bus.id.clone(),
                bus_id: bus.bus_id.clone(),
                name: bus.name.clone(),
                status: bus.status,
                capacity: bus.capacity,
                route_name: route.map(|r| r.name.clone()),
                active: location.map_or(false, |loc| loc.active),
                last_passed_stop_order: location.map(|loc| loc.last_passed_stop_order),
                next_stop: navigation.next_stop,
                eta_minutes: navigation.eta_minutes,
                progress_percent: navigation.progress_percent,
            }
        })
        .collect();

    let active_count = overviews.iter().filter(|bus| bus.active).count();
    let fleet_active_percent = if overviews.is_empty() {
        0
    } else {
        (active_count as f64 / overviews.len() as f64 * 100.0).round() as u32
    };

    let activity = overviews
        .iter()
        .take(ACTIVITY_FEED_SIZE)
        .map(|bus| ActivityEntry {
            bus_id: bus.id.clone(),
            name: bus.name.clone(),
            detail: if bus.active {
                format!(
                    "Passed stop #{} on route {}",
                    bus.last_passed_stop_order.unwrap_or(0),
                    bus.route_name.as_deref().unwrap_or("Unknown")
                )
            } else {
                "Currently inactive".to_string()
            },
        })
        .collect();

    FleetView {
        active_count,
        fleet_active_percent,
        total_routes: routes.len(),
        total_stops: routes.iter().map(|route| route.stops.len()).sum(),
        buses: overviews,
        activity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn bus(id: &str, route_id: Option<&str>) -> Bus {
        Bus {
            id: id.to_string(),
            bus_id: format!("EXT-{}", id),
            name: format!("Bus {}", id),
            route_id: route_id.map(|r| r.to_string()),
            capacity: 40,
            status: BusStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn route(id: &str, stop_orders: &[u32]) -> Route {
        Route {
            id: id.to_string(),
            name: format!("Route {}", id),
            description: None,
            color: None,
            stops: stop_orders
                .iter()
                .map(|&order| Stop {
                    id: format!("{}-s{}", id, order),
                    name: format!("Stop {}", order),
                    latitude: 9.92,
                    longitude: 78.11,
                    order,
                    description: None,
                    audio_url: None,
                    created_at: Utc::now(),
                })
                .collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn active_location(bus_id: &str, last_passed: u32) -> BusLocation {
        BusLocation {
            id: format!("loc-{}", bus_id),
            bus_id: bus_id.to_string(),
            active: true,
            latitude: 9.92,
            longitude: 78.11,
            last_passed_stop_order: last_passed,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_one_of_four_active_is_25_percent() {
        let buses = vec![bus("a", None), bus("b", None), bus("c", None), bus("d", None)];
        let mut inactive = BusLocation::initial("b");
        inactive.id = "loc-b".to_string();
        let locations = vec![active_location("a", 0), inactive];

        let view = aggregate(&buses, &[], &locations);
        assert_eq!(view.active_count, 1);
        assert_eq!(view.fleet_active_percent, 25);
    }

    #[test]
    fn test_empty_fleet_has_zero_percent_without_division_fault() {
        let view = aggregate(&[], &[route("r1", &[1, 2])], &[]);
        assert_eq!(view.active_count, 0);
        assert_eq!(view.fleet_active_percent, 0);
        assert!(view.buses.is_empty());
        assert!(view.activity.is_empty());
    }

    #[test]
    fn test_total_stops_sums_across_routes() {
        let routes = vec![route("r1", &[1, 2, 3]), route("r2", &[1, 2])];
        let view = aggregate(&[], &routes, &[]);
        assert_eq!(view.total_routes, 2);
        assert_eq!(view.total_stops, 5);
    }

    #[test]
    fn test_dangling_route_reference_reads_as_unassigned() {
        let buses = vec![bus("a", Some("deleted-route"))];
        let locations = vec![active_location("a", 2)];

        let view = aggregate(&buses, &[route("r1", &[1, 2])], &locations);
        let overview = &view.buses[0];
        assert!(overview.route_name.is_none());
        assert_eq!(overview.eta_minutes, 0);
        assert_eq!(overview.progress_percent, 0);
    }

    #[test]
    fn test_bus_without_snapshot_is_inactive_without_location() {
        let buses = vec![bus("a", Some("r1"))];
        let view = aggregate(&buses, &[route("r1", &[1, 2])], &[]);

        let overview = &view.buses[0];
        assert!(!overview.active);
        assert!(overview.last_passed_stop_order.is_none());
        assert_eq!(overview.eta_minutes, 0);
    }

    #[test]
    fn test_navigation_status_flows_into_overview() {
        let buses = vec![bus("a", Some("r1"))];
        let locations = vec![active_location("a", 1)];

        let view = aggregate(&buses, &[route("r1", &[1, 2, 3, 4])], &locations);
        let overview = &view.buses[0];
        assert_eq!(overview.next_stop.as_ref().unwrap().order, 2);
        assert_eq!(overview.eta_minutes, 5);
        assert_eq!(overview.progress_percent, 25);
    }

    #[test]
    fn test_activity_feed_takes_first_five_in_join_order() {
        let buses: Vec<Bus> = (0..7).map(|i| bus(&format!("b{}", i), None)).collect();
        let locations = vec![active_location("b2", 4)];

        let view = aggregate(&buses, &[], &locations);
        assert_eq!(view.activity.len(), 5);
        assert_eq!(view.activity[0].name, "Bus b0");
        assert_eq!(view.activity[2].detail, "Passed stop #4 on route Unknown");
        assert_eq!(view.activity[1].detail, "Currently inactive");
    }
}
