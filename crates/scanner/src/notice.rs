use serde::Serialize;

use crate::checkin::ScanOutcome;
use crate::error::ScanFailure;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// User-visible result of a scan step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanNotice {
    pub level: NoticeLevel,
    pub message: String,
}

impl ScanNotice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn from_outcome(outcome: &ScanOutcome) -> Self {
        match outcome {
            ScanOutcome::CheckedIn { name } => {
                Self::new(NoticeLevel::Success, format!("Check-in berhasil: {}", name))
            }
            ScanOutcome::AlreadyCheckedIn => Self::new(NoticeLevel::Warning, "Peserta sudah check-in"),
            ScanOutcome::NotFound => Self::new(NoticeLevel::Warning, "QR tidak terdaftar"),
            ScanOutcome::ServerError => Self::new(
                NoticeLevel::Warning,
                "Terjadi kesalahan server, silakan coba lagi",
            ),
            ScanOutcome::Rejected { reason } => Self::new(NoticeLevel::Warning, reason.to_string()),
        }
    }

    pub fn from_failure(failure: ScanFailure) -> Self {
        match failure {
            ScanFailure::NoCameraDetected => Self::new(NoticeLevel::Error, "Kamera tidak terdeteksi"),
            ScanFailure::CameraStart => Self::new(NoticeLevel::Error, "Gagal mengakses kamera"),
            ScanFailure::RestartFailed => Self::new(
                NoticeLevel::Error,
                "Kamera gagal dimulai ulang. Silakan muat ulang halaman.",
            ),
        }
    }
}

impl std::fmt::Display for ScanNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.level {
            NoticeLevel::Success => "OK",
            NoticeLevel::Warning => "!!",
            NoticeLevel::Error => "XX",
        };
        write!(f, "[{}] {}", tag, self.message)
    }
}
