use std::{sync::Arc, time::Duration};

use api::ParticipantApi;
use chrono::FixedOffset;
use scanner::{CheckInGate, ScanNotice};
use tokio::sync::Mutex;

/// Shared by every request. The gate is process-wide, so at most one manual
/// check-in is in flight across all operators.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn ParticipantApi>,
    pub gate: CheckInGate,
    pub settle_delay: Duration,
    pub display_offset: FixedOffset,
    pub last_notice: Arc<Mutex<Option<ScanNotice>>>,
}

impl AppState {
    pub fn new(
        api: Arc<dyn ParticipantApi>,
        settle_delay: Duration,
        display_offset: FixedOffset,
    ) -> Self {
        Self {
            api,
            gate: CheckInGate::new(),
            settle_delay,
            display_offset,
            last_notice: Arc::new(Mutex::new(None)),
        }
    }
}
