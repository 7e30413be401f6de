use scanner::{ScanNotice, ScanOutcome, process_payload};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanView {
    /// A check-in is in flight or settling
    pub busy: bool,
    #[schema(value_type = Option<Object>)]
    pub last_notice: Option<ScanNotice>,
}

#[derive(Debug, Serialize)]
pub struct ScanResult {
    pub outcome: ScanOutcome,
    pub notice: ScanNotice,
}

pub async fn scan_view(state: &AppState) -> ScanView {
    ScanView {
        busy: state.gate.is_busy(),
        last_notice: state.last_notice.lock().await.clone(),
    }
}

/// Runs one manual check-in under the shared gate. Returns `None` when
/// another check-in holds the gate; the payload is dropped.
pub async fn submit_manual(state: &AppState, raw: &str) -> Option<ScanResult> {
    let permit = state.gate.try_acquire()?;

    let outcome = process_payload(state.api.as_ref(), raw).await;
    let notice = outcome.notice();
    *state.last_notice.lock().await = Some(notice.clone());

    let settle_delay = state.settle_delay;
    tokio::spawn(async move {
        tokio::time::sleep(settle_delay).await;
        drop(permit);
    });

    Some(ScanResult { outcome, notice })
}
