pub mod bus_controller;
pub mod route_controller;
