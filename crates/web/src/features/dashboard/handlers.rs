use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};

use crate::error::WebError;
use crate::state::AppState;

use super::services::{self, DashboardView};

#[utoipa::path(
    get,
    path = "/admin/dashboard",
    responses(
        (status = 200, description = "Attendance counters", body = DashboardView),
        (status = 502, description = "Participant fetch failed, includes a retry link")
    ),
    tag = "dashboard"
)]
pub async fn show_dashboard(State(state): State<AppState>) -> Result<Response, WebError> {
    let view = services::load_dashboard(state.api.as_ref())
        .await
        .map_err(|e| WebError::fetch(e, super::ROUTE))?;

    Ok(Json(view).into_response())
}
