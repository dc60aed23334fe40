//! Secuenciador de paradas
//!
//! Mantiene los valores de `order` de las paradas dentro de una ruta.
//! El invariante es orden estrictamente creciente y único dentro de la
//! ruta; los huecos están permitidos y nunca se renumera al borrar, así
//! que todo consumidor debe ordenar por `order` en vez de confiar en la
//! posición dentro del array.

use serde::Deserialize;

use crate::models::Stop;

/// Dirección de un movimiento adyacente
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Siguiente valor de `order` para una parada nueva: estrictamente mayor
/// que todos los existentes, 1 si la ruta no tiene paradas.
pub fn next_order(stops: &[Stop]) -> u32 {
    stops.iter().map(|stop| stop.order).max().map_or(1, |max| max + 1)
}

/// Intercambia el `order` de la parada con su vecina inmediata en la
/// dirección pedida. Devuelve `None` si no hubo cambio: parada inexistente
/// o ya en el borde. El resultado viene re-ordenado ascendente por `order`,
/// listo para persistir o mostrar.
pub fn move_adjacent(stops: &[Stop], stop_id: &str, direction: MoveDirection) -> Option<Vec<Stop>> {
    let mut sorted = stops.to_vec();
    sorted.sort_by_key(|stop| stop.order);

    let index = sorted.iter().position(|stop| stop.id == stop_id)?;

    let neighbor = match direction {
        MoveDirection::Up if index > 0 => index - 1,
        MoveDirection::Down if index + 1 < sorted.len() => index + 1,
        _ => return None,
    };

    let order = sorted[index].order;
    sorted[index].order = sorted[neighbor].order;
    sorted[neighbor].order = order;

    sorted.sort_by_key(|stop| stop.order);
    Some(sorted)
}

/// Excluye la parada indicada sin renumerar las restantes
pub fn remove(stops: &[Stop], stop_id: &str) -> Vec<Stop> {
    stops
        .iter()
        .filter(|stop| stop.id != stop_id)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stop(id: &str, order: u32) -> Stop {
        Stop {
            id: id.to_string(),
            name: format!("Stop {}", id),
            latitude: 8.71,
            longitude: 77.75,
            order,
            description: None,
            audio_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_next_order_empty_list() {
        assert_eq!(next_order(&[]), 1);
    }

    #[test]
    fn test_next_order_dominates_existing_orders() {
        let stops = vec![stop("a", 1), stop("b", 7), stop("c", 3)];
        let next = next_order(&stops);
        assert_eq!(next, 8);
        assert!(stops.iter().all(|s| s.order < next));
    }

    #[test]
    fn test_move_up_swaps_with_previous_by_order() {
        // Posición en el array distinta del orden de navegación a propósito
        let stops = vec![stop("c", 5), stop("a", 1), stop("b", 3)];
        let moved = move_adjacent(&stops, "b", MoveDirection::Up).unwrap();

        let ids: Vec<&str> = moved.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        let orders: Vec<u32> = moved.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 3, 5]);
    }

    #[test]
    fn test_move_down_swaps_with_next_by_order() {
        let stops = vec![stop("a", 1), stop("b", 3), stop("c", 5)];
        let moved = move_adjacent(&stops, "b", MoveDirection::Down).unwrap();

        let ids: Vec<&str> = moved.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_move_swaps_exactly_two_stops() {
        let stops = vec![stop("a", 1), stop("b", 3), stop("c", 5), stop("d", 9)];
        let moved = move_adjacent(&stops, "c", MoveDirection::Up).unwrap();

        // "a" y "d" conservan su order; "b" y "c" intercambian
        let find = |list: &[Stop], id: &str| list.iter().find(|s| s.id == id).unwrap().order;
        assert_eq!(find(&moved, "a"), 1);
        assert_eq!(find(&moved, "d"), 9);
        assert_eq!(find(&moved, "c"), 3);
        assert_eq!(find(&moved, "b"), 5);
    }

    #[test]
    fn test_move_up_on_first_stop_is_noop() {
        let stops = vec![stop("a", 1), stop("b", 3)];
        assert!(move_adjacent(&stops, "a", MoveDirection::Up).is_none());
    }

    #[test]
    fn test_move_down_on_last_stop_is_noop() {
        let stops = vec![stop("a", 1), stop("b", 3)];
        assert!(move_adjacent(&stops, "b", MoveDirection::Down).is_none());
    }

    #[test]
    fn test_move_unknown_stop_is_noop() {
        let stops = vec![stop("a", 1)];
        assert!(move_adjacent(&stops, "zzz", MoveDirection::Down).is_none());
    }

    #[test]
    fn test_remove_keeps_gaps_without_renumbering() {
        let stops = vec![stop("a", 1), stop("b", 3), stop("c", 5)];
        let remaining = remove(&stops, "b");

        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|s| s.id != "b"));
        let orders: Vec<u32> = remaining.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![1, 5]);
    }

    #[test]
    fn test_remove_unknown_stop_leaves_list_unchanged() {
        let stops = vec![stop("a", 1), stop("b", 3)];
        assert_eq!(remove(&stops, "zzz"), stops);
    }
}
