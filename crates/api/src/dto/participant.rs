use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

lazy_static! {
    static ref EMAIL_SHAPE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Request payload for registering a new participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateParticipantRequest {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_email_shape"))]
    pub email: Option<String>,
}

impl CreateParticipantRequest {
    /// Builds a request from raw form input. Blank emails are sent as absent.
    pub fn new(name: &str, email: Option<&str>) -> Self {
        Self {
            name: name.trim().to_string(),
            email: email
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string),
        }
    }
}

/// `local@domain.tld` shape check. The backend owns real validation.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

fn validate_not_blank(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some(Cow::Borrowed("Nama wajib diisi"));
        return Err(error);
    }
    Ok(())
}

fn validate_email_shape(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(email) {
        Ok(())
    } else {
        let mut error = ValidationError::new("email_shape");
        error.message = Some(Cow::Borrowed("Format email tidak valid"));
        Err(error)
    }
}
