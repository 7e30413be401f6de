use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to fetch participants: {0}")]
    Fetch(String),

    #[error("Invalid request: {}", first_message(.0))]
    InvalidRequest(#[from] ValidationErrors),

    /// Raw error text returned by the backend when it refuses a new participant.
    #[error("{0}")]
    Validation(String),

    #[error("QR code is not registered")]
    NotFound,

    #[error("Participant already checked in")]
    AlreadyCheckedIn,

    #[error("Check-in failed: {0}")]
    Server(String),

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// First human readable message of a validation failure, used as the user facing text.
pub fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: {}", field, e.code))
            })
        })
        .next()
        .unwrap_or_else(|| "invalid input".to_string())
}
