pub mod bus_dto;
pub mod common;
pub mod dashboard_dto;
pub mod route_dto;
pub mod stop_dto;

pub use common::ApiResponse;
