use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

lazy_static! {
    static ref PARTICIPANT_QR: Regex = Regex::new(
        r"(?i)^QR-[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$"
    )
    .unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PayloadRejection {
    #[error("QR kosong")]
    Empty,
    #[error("QR berisi tautan, bukan QR peserta")]
    ForeignUrl,
    #[error("Format QR tidak dikenali")]
    Malformed,
}

/// A decoded string that has the shape of a participant QR code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload(String);

impl QrPayload {
    pub fn parse(raw: &str) -> Result<Self, PayloadRejection> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(PayloadRejection::Empty);
        }

        let lower = text.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Err(PayloadRejection::ForeignUrl);
        }

        if !PARTICIPANT_QR.is_match(text) {
            return Err(PayloadRejection::Malformed);
        }

        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
