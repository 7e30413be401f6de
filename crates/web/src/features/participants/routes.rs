use axum::{Router, routing::get};

use super::handlers::{create_participant, export_participants, list_participants, show_create_form};
use super::{CREATE_ROUTE, EXPORT_ROUTE, ROUTE};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(ROUTE, get(list_participants))
        .route(EXPORT_ROUTE, get(export_participants))
        .route(CREATE_ROUTE, get(show_create_form).post(create_participant))
}
