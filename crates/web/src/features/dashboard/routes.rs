use axum::{Router, routing::get};

use super::handlers::show_dashboard;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route(super::ROUTE, get(show_dashboard))
}
