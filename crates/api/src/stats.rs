use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Participant;

/// Attendance counters derived from a participant snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    pub total: usize,
    pub checked_in: usize,
    pub not_checked_in: usize,
}

impl AttendanceStats {
    pub fn from_participants(participants: &[Participant]) -> Self {
        let checked_in = participants.iter().filter(|p| p.is_checked_in).count();

        Self {
            total: participants.len(),
            checked_in,
            not_checked_in: participants.len() - checked_in,
        }
    }

    pub fn checked_in_share(&self) -> String {
        share(self.checked_in, self.total)
    }

    pub fn not_checked_in_share(&self) -> String {
        share(self.not_checked_in, self.total)
    }
}

fn share(part: usize, total: usize) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", part as f64 / total as f64 * 100.0)
}
