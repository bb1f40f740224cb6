//! Routing backend integration: typed request/response handling for the
//! external route-computation service.

pub mod client;
pub mod response;

pub use client::{HttpRoutingBackend, RoutingBackend, ZipRouteQuery};
pub use response::{RouteLeg, RouteResponse};
