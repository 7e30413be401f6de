use std::{fmt, str::FromStr, time::Duration};

use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use validator::Validate;

use crate::dto::checkin::{CheckInRequest, CheckInResponse};
use crate::dto::participant::CreateParticipantRequest;
use crate::error::{ApiError, Result};
use crate::models::Participant;

/// Plain-text body some backend versions send with a 400 when the QR code was already used.
pub const ALREADY_CHECKED_IN_SENTINEL: &str = "Peserta sudah check-in";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const CREATE_FALLBACK_MESSAGE: &str = "Gagal menambahkan peserta";

/// How the backend signals that a participant was already checked in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlreadyCheckedInSignal {
    /// HTTP 409
    #[default]
    Conflict,
    /// HTTP 400 with the exact sentinel body
    BadRequest,
    /// Either of the above
    Either,
}

impl AlreadyCheckedInSignal {
    pub fn matches(&self, status: StatusCode, body: &str) -> bool {
        let conflict = status == StatusCode::CONFLICT;
        let sentinel =
            status == StatusCode::BAD_REQUEST && body.trim() == ALREADY_CHECKED_IN_SENTINEL;

        match self {
            Self::Conflict => conflict,
            Self::BadRequest => sentinel,
            Self::Either => conflict || sentinel,
        }
    }
}

impl FromStr for AlreadyCheckedInSignal {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conflict" | "409" => Ok(Self::Conflict),
            "bad-request" | "400" => Ok(Self::BadRequest),
            "either" => Ok(Self::Either),
            other => Err(format!(
                "unknown already-checked-in signal '{}', expected conflict, bad-request or either",
                other
            )),
        }
    }
}

impl fmt::Display for AlreadyCheckedInSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict => write!(f, "conflict"),
            Self::BadRequest => write!(f, "bad-request"),
            Self::Either => write!(f, "either"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub already_checked_in: AlreadyCheckedInSignal,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            already_checked_in: AlreadyCheckedInSignal::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_already_checked_in(mut self, signal: AlreadyCheckedInSignal) -> Self {
        self.already_checked_in = signal;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the participant backend.
///
/// Every call is a single request; failures are mapped to typed [`ApiError`]s and never retried.
pub struct ApiClient {
    base_url: String,
    client: Client,
    already_checked_in: AlreadyCheckedInSignal,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| ApiError::Config(format!("invalid base URL '{}': {}", base_url, e)))?;

        let client = Client::builder()
            .user_agent(concat!("checkin-admin/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_url,
            client,
            already_checked_in: config.already_checked_in,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn already_checked_in_signal(&self) -> AlreadyCheckedInSignal {
        self.already_checked_in
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/Participants`
    pub async fn list_participants(&self) -> Result<Vec<Participant>> {
        let response = self
            .client
            .get(self.url("/api/Participants"))
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| ApiError::Fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Fetch(format!("backend responded with {}", status)));
        }

        let participants: Vec<Participant> = response
            .json()
            .await
            .map_err(|e| ApiError::Fetch(format!("unreadable participant list: {}", e)))?;

        for participant in participants.iter().filter(|p| !p.is_consistent()) {
            warn!(
                "Participant {} has inconsistent check-in state (isCheckedIn={}, checkedInAt={:?})",
                participant.id, participant.is_checked_in, participant.checked_in_at
            );
        }

        debug!("Fetched {} participants", participants.len());
        Ok(participants)
    }

    /// `POST /api/Participants` from raw name and optional email.
    pub async fn create_participant(&self, name: &str, email: Option<&str>) -> Result<Participant> {
        let request = CreateParticipantRequest::new(name, email);
        self.submit_participant(&request).await
    }

    /// Validates the request locally, then sends it. Nothing is sent when validation fails.
    pub async fn submit_participant(
        &self,
        request: &CreateParticipantRequest,
    ) -> Result<Participant> {
        request.validate()?;

        let response = self
            .client
            .post(self.url("/api/Participants"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("Backend refused participant ({}): {}", status, text);

            let message = if text.trim().is_empty() {
                CREATE_FALLBACK_MESSAGE.to_string()
            } else {
                text
            };
            return Err(ApiError::Validation(message));
        }

        Ok(response.json::<Participant>().await?)
    }

    /// `POST /api/checkin`
    pub async fn check_in(&self, qr_code: &str) -> Result<CheckInResponse> {
        let request = CheckInRequest {
            qr_code: qr_code.to_string(),
        };

        let response = self
            .client
            .post(self.url("/api/checkin"))
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::Server(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<CheckInResponse>()
                .await
                .map_err(|e| ApiError::Server(format!("unreadable check-in response: {}", e)));
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_check_in_failure(
            status,
            &body,
            self.already_checked_in,
        ))
    }
}

/// Maps a non-success check-in status to its typed outcome.
pub fn classify_check_in_failure(
    status: StatusCode,
    body: &str,
    signal: AlreadyCheckedInSignal,
) -> ApiError {
    if status == StatusCode::NOT_FOUND {
        ApiError::NotFound
    } else if signal.matches(status, body) {
        ApiError::AlreadyCheckedIn
    } else {
        ApiError::Server(format!("backend responded with {}", status))
    }
}
