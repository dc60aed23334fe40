pub mod bus;
pub mod bus_location;
pub mod route;

pub use bus::{Bus, BusStatus, DEFAULT_CAPACITY};
pub use bus_location::BusLocation;
pub use route::{Route, Stop};

/// Nombres de las colecciones del document store
pub mod collections {
    pub const BUSES: &str = "buses";
    pub const ROUTES: &str = "routes";
    pub const BUS_LOCATIONS: &str = "busLocations";
}
