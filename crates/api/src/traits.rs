use crate::Result;
use crate::client::ApiClient;
use crate::dto::checkin::CheckInResponse;
use crate::dto::participant::CreateParticipantRequest;
use crate::models::Participant;

/// The three backend operations the admin views and the scanner depend on.
#[async_trait::async_trait]
pub trait ParticipantApi: Send + Sync {
    async fn list_participants(&self) -> Result<Vec<Participant>>;

    async fn register_participant(&self, request: &CreateParticipantRequest) -> Result<Participant>;

    async fn check_in(&self, qr_code: &str) -> Result<CheckInResponse>;
}

#[async_trait::async_trait]
impl ParticipantApi for ApiClient {
    async fn list_participants(&self) -> Result<Vec<Participant>> {
        ApiClient::list_participants(self).await
    }

    async fn register_participant(&self, request: &CreateParticipantRequest) -> Result<Participant> {
        self.submit_participant(request).await
    }

    async fn check_in(&self, qr_code: &str) -> Result<CheckInResponse> {
        ApiClient::check_in(self, qr_code).await
    }
}
