use axum::{Router, response::Redirect, routing::get};

use crate::state::AppState;

pub mod dashboard;
pub mod participants;
pub mod scan;

#[cfg(test)]
pub mod testing;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to(dashboard::ROUTE) }))
        .merge(dashboard::routes::routes())
        .merge(participants::routes::routes())
        .merge(scan::routes::routes())
        .with_state(state)
}
