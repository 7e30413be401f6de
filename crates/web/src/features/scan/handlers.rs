use api::dto::checkin::CheckInRequest;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::state::AppState;

use super::services::{self, ScanView};

#[utoipa::path(
    get,
    path = "/admin/scan",
    responses(
        (status = 200, description = "Whether a check-in is in flight, and the last result", body = ScanView)
    ),
    tag = "scan"
)]
pub async fn show_scan(State(state): State<AppState>) -> Json<ScanView> {
    Json(services::scan_view(&state).await)
}

#[utoipa::path(
    post,
    path = "/admin/scan",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Check-in outcome and the notice shown to the operator"),
        (status = 202, description = "Ignored, another check-in is in progress")
    ),
    tag = "scan"
)]
pub async fn submit_scan(
    State(state): State<AppState>,
    Json(request): Json<CheckInRequest>,
) -> Response {
    match services::submit_manual(&state, &request.qr_code).await {
        Some(result) => Json(result).into_response(),
        None => {
            tracing::debug!("Manual check-in dropped, gate is busy");
            (StatusCode::ACCEPTED, Json(json!({ "status": "ignored" }))).into_response()
        }
    }
}
