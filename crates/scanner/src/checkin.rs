use api::{ApiError, ParticipantApi};
use serde::Serialize;
use tracing::{info, warn};

use crate::notice::ScanNotice;
use crate::payload::{PayloadRejection, QrPayload};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScanOutcome {
    CheckedIn { name: String },
    AlreadyCheckedIn,
    NotFound,
    ServerError,
    /// Rejected locally, no request was sent
    Rejected { reason: PayloadRejection },
}

impl ScanOutcome {
    pub fn notice(&self) -> ScanNotice {
        ScanNotice::from_outcome(self)
    }
}

/// Validates a decoded string and, when it looks like a participant code, checks it in.
pub async fn process_payload(api: &dyn ParticipantApi, raw: &str) -> ScanOutcome {
    let payload = match QrPayload::parse(raw) {
        Ok(payload) => payload,
        Err(reason) => {
            info!("Rejected scanned payload locally: {}", reason);
            return ScanOutcome::Rejected { reason };
        }
    };

    match api.check_in(payload.as_str()).await {
        Ok(response) => {
            info!("Checked in {}", response.name);
            ScanOutcome::CheckedIn {
                name: response.name,
            }
        }
        Err(ApiError::AlreadyCheckedIn) => ScanOutcome::AlreadyCheckedIn,
        Err(ApiError::NotFound) => ScanOutcome::NotFound,
        Err(e) => {
            warn!("Check-in request failed: {}", e);
            ScanOutcome::ServerError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::Participant;
    use api::dto::{checkin::CheckInResponse, participant::CreateParticipantRequest};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StatusApi {
        calls: AtomicUsize,
        status: u16,
    }

    impl StatusApi {
        fn new(status: u16) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                status,
            }
        }
    }

    #[async_trait::async_trait]
    impl ParticipantApi for StatusApi {
        async fn list_participants(&self) -> api::Result<Vec<Participant>> {
            Ok(vec![])
        }

        async fn register_participant(
            &self,
            _request: &CreateParticipantRequest,
        ) -> api::Result<Participant> {
            Err(ApiError::Validation("unused".to_string()))
        }

        async fn check_in(&self, _qr_code: &str) -> api::Result<CheckInResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.status {
                200 => Ok(CheckInResponse {
                    name: "Fajar".to_string(),
                }),
                404 => Err(ApiError::NotFound),
                409 => Err(ApiError::AlreadyCheckedIn),
                other => Err(ApiError::Server(format!("status {}", other))),
            }
        }
    }

    const VALID: &str = "QR-aaaaaaaa-bbbb-cccc-dddd-eeeeeeeeeeee";

    #[tokio::test]
    async fn test_invalid_payloads_never_hit_the_backend() {
        let api = StatusApi::new(200);

        for raw in ["https://evil.example/QR", "hello", "", "QR-1234"] {
            let outcome = process_payload(&api, raw).await;
            assert!(matches!(outcome, ScanOutcome::Rejected { .. }), "{}", raw);
        }
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_conflict_is_not_a_server_error() {
        let api = StatusApi::new(409);

        let outcome = process_payload(&api, VALID).await;

        assert_eq!(outcome, ScanOutcome::AlreadyCheckedIn);
        assert_eq!(outcome.notice().message, "Peserta sudah check-in");
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_outcome_mapping() {
        assert_eq!(
            process_payload(&StatusApi::new(200), VALID).await,
            ScanOutcome::CheckedIn {
                name: "Fajar".to_string()
            }
        );
        assert_eq!(
            process_payload(&StatusApi::new(404), VALID).await,
            ScanOutcome::NotFound
        );
        assert_eq!(
            process_payload(&StatusApi::new(500), VALID).await,
            ScanOutcome::ServerError
        );
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(ScanOutcome::Rejected {
            reason: PayloadRejection::ForeignUrl,
        })
        .unwrap();
        assert_eq!(json["kind"], "rejected");
        assert_eq!(json["reason"], "foreignUrl");
    }
}
