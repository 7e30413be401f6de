use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::dto::participant::{CreateParticipantRequest, is_valid_email};
use crate::error::{ApiError, first_message};
use crate::models::Participant;
use crate::traits::ParticipantApi;

/// Where the create form sends the operator after a successful submission.
pub const LIST_ROUTE: &str = "/admin/participants";
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

const SUBMIT_FALLBACK_MESSAGE: &str = "Terjadi kesalahan saat menambahkan peserta";

/// Raw input of the create-participant form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ParticipantForm {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Nama wajib diisi")]
    NameRequired,
    #[error("Email wajib diisi")]
    EmailRequired,
    #[error("Format email tidak valid")]
    InvalidEmail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    /// Rejected before any request was sent
    Rejected(FormError),
    /// The backend refused the participant; the text is shown as-is and the form stays editable
    Failed(String),
    Created(Participant),
}

impl ParticipantForm {
    /// Required-field and email-shape checks, in the order the operator sees them.
    pub fn check(&self) -> Result<CreateParticipantRequest, FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::NameRequired);
        }
        if self.email.trim().is_empty() {
            return Err(FormError::EmailRequired);
        }
        if !is_valid_email(self.email.trim()) {
            return Err(FormError::InvalidEmail);
        }

        Ok(CreateParticipantRequest::new(&self.name, Some(&self.email)))
    }

    pub async fn submit(&self, api: &dyn ParticipantApi) -> FormOutcome {
        let request = match self.check() {
            Ok(request) => request,
            Err(error) => return FormOutcome::Rejected(error),
        };

        match api.register_participant(&request).await {
            Ok(participant) => {
                tracing::info!("Registered participant {} ({})", participant.name, participant.id);
                FormOutcome::Created(participant)
            }
            Err(ApiError::Validation(text)) => FormOutcome::Failed(text),
            Err(ApiError::InvalidRequest(errors)) => FormOutcome::Failed(first_message(&errors)),
            Err(e) => {
                tracing::warn!("Failed to register participant: {}", e);
                FormOutcome::Failed(SUBMIT_FALLBACK_MESSAGE.to_string())
            }
        }
    }
}
