use api::{ParticipantApi, Result, stats::AttendanceStats};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub stats: AttendanceStats,
    /// e.g. `66.7%`
    pub checked_in_share: String,
    pub not_checked_in_share: String,
}

impl From<AttendanceStats> for DashboardView {
    fn from(stats: AttendanceStats) -> Self {
        Self {
            checked_in_share: stats.checked_in_share(),
            not_checked_in_share: stats.not_checked_in_share(),
            stats,
        }
    }
}

/// Fetch a fresh snapshot and count attendance
pub async fn load_dashboard(api: &dyn ParticipantApi) -> Result<DashboardView> {
    let participants = api.list_participants().await?;
    Ok(AttendanceStats::from_participants(&participants).into())
}
