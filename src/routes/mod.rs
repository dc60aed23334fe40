pub mod blob_routes;
pub mod bus_routes;
pub mod dashboard_routes;
pub mod route_routes;
