use api::{
    export::export_filename,
    form::{FormOutcome, LIST_ROUTE, ParticipantForm},
    listing::ListQuery,
};
use axum::{
    Json,
    body::Body,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::error::WebError;
use crate::state::AppState;

use super::services::{self, CreateFormView, CreatedView, ParticipantListView};

#[utoipa::path(
    get,
    path = "/admin/participants",
    params(ListQuery),
    responses(
        (status = 200, description = "Filtered and sorted participant list", body = ParticipantListView),
        (status = 502, description = "Participant fetch failed, includes a retry link")
    ),
    tag = "participants"
)]
pub async fn list_participants(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, WebError> {
    let view = services::load_list(state.api.as_ref(), &query, &state.display_offset)
        .await
        .map_err(|e| WebError::fetch(e, super::ROUTE))?;

    Ok(Json(view).into_response())
}

#[utoipa::path(
    get,
    path = "/admin/participants/export",
    params(ListQuery),
    responses(
        (status = 200, description = "CSV of the rows the list shows for the same query", content_type = "text/csv"),
        (status = 502, description = "Participant fetch failed")
    ),
    tag = "participants"
)]
pub async fn export_participants(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, WebError> {
    let csv = services::export_csv(state.api.as_ref(), &query, &state.display_offset)
        .await
        .map_err(|e| WebError::fetch(e, super::ROUTE))?;

    let today = services::export_date(Utc::now(), &state.display_offset);
    let disposition = format!("attachment; filename=\"{}\"", export_filename(today));

    Response::builder()
        .header(header::CONTENT_TYPE, "text/csv; charset=utf-8")
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from(csv))
        .map_err(|e| WebError::InternalServerError(e.to_string()))
}

#[utoipa::path(
    get,
    path = "/admin/participants/create",
    responses(
        (status = 200, description = "Empty create form", body = CreateFormView)
    ),
    tag = "participants"
)]
pub async fn show_create_form() -> Json<CreateFormView> {
    Json(CreateFormView {
        form: ParticipantForm::default(),
        cancel_to: LIST_ROUTE.to_string(),
    })
}

#[utoipa::path(
    post,
    path = "/admin/participants/create",
    request_body = ParticipantForm,
    responses(
        (status = 201, description = "Participant created, redirect to the list follows", body = CreatedView),
        (status = 400, description = "Form rejected locally or by the backend; resubmission allowed")
    ),
    tag = "participants"
)]
pub async fn create_participant(
    State(state): State<AppState>,
    Json(form): Json<ParticipantForm>,
) -> Result<Response, WebError> {
    match services::create_participant(state.api.as_ref(), &form).await {
        FormOutcome::Created(participant) => {
            Ok((StatusCode::CREATED, Json(CreatedView::from(participant))).into_response())
        }
        FormOutcome::Rejected(error) => Err(WebError::BadRequest(error.to_string())),
        FormOutcome::Failed(text) => Err(WebError::BadRequest(text)),
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use serde_json::json;

    use crate::features::testing::{FakeApi, app, get_json, participant, post_json, send};

    fn roster() -> Vec<api::Participant> {
        vec![
            participant("1", "Budi", Some("budi@example.com"), None),
            participant("2", "ani", None, Some("2025-08-17T01:00:00Z")),
            participant("3", "Citra \"C\"", Some("citra@example.com"), Some("2025-08-17T02:00:00Z")),
        ]
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let (app, _) = app(Arc::new(FakeApi::with_participants(roster())), Duration::ZERO);

        let (status, body) =
            get_json(&app, "/admin/participants?status=checkedIn&sort=name&direction=asc").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["shown"], 2);
        assert_eq!(body["stats"]["total"], 3);
        assert_eq!(body["participants"][0]["name"], "ani");
        assert_eq!(body["participants"][1]["name"], "Citra \"C\"");
        assert_eq!(body["participants"][0]["email"], "-");
        assert_eq!(body["nextSort"]["name"]["direction"], "desc");
        assert!(body["emptyHint"].is_null());
    }

    #[tokio::test]
    async fn test_list_search_matches_email() {
        let (app, _) = app(Arc::new(FakeApi::with_participants(roster())), Duration::ZERO);

        let (_, body) = get_json(&app, "/admin/participants?search=EXAMPLE.COM").await;

        assert_eq!(body["shown"], 2);
    }

    #[tokio::test]
    async fn test_list_fetch_failure() {
        let api = FakeApi {
            fail_list: true,
            ..FakeApi::default()
        };
        let (app, _) = app(Arc::new(api), Duration::ZERO);

        let (status, body) = get_json(&app, "/admin/participants").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["retry"], "/admin/participants");
    }

    #[tokio::test]
    async fn test_export_matches_filtered_view() {
        let (app, _) = app(Arc::new(FakeApi::with_participants(roster())), Duration::ZERO);
        let request = Request::builder()
            .uri("/admin/participants/export?status=checkedIn")
            .body(Body::empty())
            .unwrap();

        let response = tower::ServiceExt::oneshot(app.clone(), request).await.unwrap();
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"peserta-"));
        assert!(disposition.ends_with(".csv\""));

        let request = Request::builder()
            .uri("/admin/participants/export?status=checkedIn")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        let csv = String::from_utf8(body).unwrap();
        let lines: Vec<&str> = csv.split('\n').collect();

        assert_eq!(status, StatusCode::OK);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "\"Nama\",\"Email\",\"Status\",\"Dibuat\",\"Check-in\"");
        assert!(csv.contains("\"Citra \"\"C\"\"\""));
        assert!(!csv.contains("Budi"));
    }

    #[tokio::test]
    async fn test_create_form_is_empty() {
        let (app, _) = app(Arc::new(FakeApi::default()), Duration::ZERO);

        let (status, body) = get_json(&app, "/admin/participants/create").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["form"]["name"], "");
        assert_eq!(body["cancelTo"], "/admin/participants");
    }

    #[tokio::test]
    async fn test_create_success_redirects() {
        let api = Arc::new(FakeApi::default());
        let (app, _) = app(api.clone(), Duration::ZERO);

        let (status, body) = post_json(
            &app,
            "/admin/participants/create",
            json!({"name": " Dewi ", "email": "dewi@example.com"}),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["participant"]["name"], "Dewi");
        assert_eq!(body["redirectTo"], "/admin/participants");
        assert_eq!(body["redirectAfterMs"], 2000);
        assert_eq!(api.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejected_locally() {
        let api = Arc::new(FakeApi::default());
        let (app, _) = app(api.clone(), Duration::ZERO);

        let (status, body) = post_json(
            &app,
            "/admin/participants/create",
            json!({"name": "", "email": "a@b.com"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Nama wajib diisi");

        let (_, body) = post_json(
            &app,
            "/admin/participants/create",
            json!({"name": "Eko", "email": "eko@"}),
        )
        .await;
        assert_eq!(body["error"], "Format email tidak valid");

        assert!(api.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_backend_error_text() {
        let api = FakeApi {
            create_error: Some("Email sudah terdaftar".to_string()),
            ..FakeApi::default()
        };
        let (app, _) = app(Arc::new(api), Duration::ZERO);

        let (status, body) = post_json(
            &app,
            "/admin/participants/create",
            json!({"name": "Fitri", "email": "fitri@example.com"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Email sudah terdaftar");
    }
}
