use axum::{Router, routing::get};

use super::handlers::{show_scan, submit_scan};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route(super::ROUTE, get(show_scan).post(submit_scan))
}
