use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Device unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decoder error: {0}")]
    Decoder(String),
}

/// Session-fatal failures. None of them is retried automatically.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("No camera detected")]
    NoCameraDetected,

    #[error("Failed to start camera: {0}")]
    CameraStart(CameraError),

    #[error("Failed to restart camera: {0}")]
    RestartFailed(CameraError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScanFailure {
    NoCameraDetected,
    CameraStart,
    RestartFailed,
}

impl ScanError {
    pub fn failure(&self) -> ScanFailure {
        match self {
            Self::NoCameraDetected => ScanFailure::NoCameraDetected,
            Self::CameraStart(_) => ScanFailure::CameraStart,
            Self::RestartFailed(_) => ScanFailure::RestartFailed,
        }
    }
}
