pub mod handlers;
pub mod routes;
pub mod services;

pub const ROUTE: &str = api::form::LIST_ROUTE;
pub const EXPORT_ROUTE: &str = "/admin/participants/export";
pub const CREATE_ROUTE: &str = "/admin/participants/create";
