pub mod handlers;
pub mod routes;
pub mod services;

pub const ROUTE: &str = "/admin/scan";
