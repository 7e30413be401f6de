pub mod client;
pub mod dto;
pub mod error;
pub mod export;
pub mod form;
pub mod format;
pub mod listing;
pub mod models;
pub mod stats;
pub mod traits;

pub use client::{AlreadyCheckedInSignal, ApiClient, ApiConfig};
pub use error::{ApiError, Result};
pub use models::Participant;
pub use traits::ParticipantApi;
