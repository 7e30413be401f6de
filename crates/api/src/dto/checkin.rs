use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /api/checkin`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub qr_code: String,
}

/// Successful check-in, carrying the name of the participant that was checked in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CheckInResponse {
    pub name: String,
}
