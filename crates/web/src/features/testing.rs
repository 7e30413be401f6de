//! In-process fakes shared by the handler tests.

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use api::{
    ApiError, Participant, ParticipantApi,
    dto::{checkin::CheckInResponse, participant::CreateParticipantRequest},
};
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::Value;
use tower::ServiceExt;

use crate::state::AppState;

#[derive(Default)]
pub struct FakeApi {
    pub participants: Vec<Participant>,
    pub fail_list: bool,
    pub check_in_status: u16,
    pub create_error: Option<String>,
    pub created: Mutex<Vec<CreateParticipantRequest>>,
    pub check_ins: AtomicUsize,
}

impl FakeApi {
    pub fn with_participants(participants: Vec<Participant>) -> Self {
        Self {
            participants,
            check_in_status: 200,
            ..Self::default()
        }
    }

    pub fn check_in_count(&self) -> usize {
        self.check_ins.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ParticipantApi for FakeApi {
    async fn list_participants(&self) -> api::Result<Vec<Participant>> {
        if self.fail_list {
            return Err(ApiError::Fetch("status 500".to_string()));
        }
        Ok(self.participants.clone())
    }

    async fn register_participant(
        &self,
        request: &CreateParticipantRequest,
    ) -> api::Result<Participant> {
        self.created.lock().unwrap().push(request.clone());
        if let Some(text) = &self.create_error {
            return Err(ApiError::Validation(text.clone()));
        }
        Ok(Participant {
            id: "p-new".to_string(),
            name: request.name.clone(),
            email: request.email.clone(),
            is_checked_in: false,
            created_at: Utc::now(),
            checked_in_at: None,
        })
    }

    async fn check_in(&self, _qr_code: &str) -> api::Result<CheckInResponse> {
        self.check_ins.fetch_add(1, Ordering::SeqCst);
        match self.check_in_status {
            200 => Ok(CheckInResponse {
                name: "Rina".to_string(),
            }),
            404 => Err(ApiError::NotFound),
            409 => Err(ApiError::AlreadyCheckedIn),
            other => Err(ApiError::Server(format!("status {}", other))),
        }
    }
}

pub fn at(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
}

pub fn participant(id: &str, name: &str, email: Option<&str>, checked_in_at: Option<&str>) -> Participant {
    Participant {
        id: id.to_string(),
        name: name.to_string(),
        email: email.map(str::to_string),
        is_checked_in: checked_in_at.is_some(),
        created_at: at("2025-08-16T10:00:00Z"),
        checked_in_at: checked_in_at.map(at),
    }
}

pub fn app(api: Arc<FakeApi>, settle_delay: Duration) -> (Router, AppState) {
    let offset = FixedOffset::east_opt(7 * 3600).unwrap();
    let state = AppState::new(api, settle_delay, offset);
    (super::router(state.clone()), state)
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

pub async fn post_json(app: &Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}
