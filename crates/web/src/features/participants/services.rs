use api::{
    Participant, ParticipantApi, Result,
    export::to_csv,
    form::{FormOutcome, LIST_ROUTE, ParticipantForm, REDIRECT_DELAY},
    format::{PLACEHOLDER, format_date, status_label},
    listing::{ListQuery, SortField, SortState, StatusFilter},
    stats::AttendanceStats,
};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

const HINT_FILTERED: &str = "Coba ubah filter atau kata kunci pencarian";
const HINT_EMPTY: &str = "Belum ada peserta yang terdaftar";
pub const CREATED_MESSAGE: &str = "Peserta berhasil ditambahkan";

/// One table row, with dates already formatted for display
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub status: String,
    pub is_checked_in: bool,
    pub created_at: String,
    pub checked_in_at: String,
}

impl ParticipantRow {
    fn new(participant: &Participant, offset: &FixedOffset) -> Self {
        Self {
            id: participant.id.clone(),
            name: participant.name.clone(),
            email: participant.email().unwrap_or(PLACEHOLDER).to_string(),
            status: status_label(participant.is_checked_in).to_string(),
            is_checked_in: participant.is_checked_in,
            created_at: format_date(Some(&participant.created_at), offset),
            checked_in_at: format_date(participant.checked_in_at.as_ref(), offset),
        }
    }
}

/// Sort state each column header switches to when clicked
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSorts {
    pub name: SortState,
    pub created_at: SortState,
    pub checked_in_at: SortState,
}

impl From<SortState> for ColumnSorts {
    fn from(current: SortState) -> Self {
        Self {
            name: current.select(SortField::Name),
            created_at: current.select(SortField::CreatedAt),
            checked_in_at: current.select(SortField::CheckedInAt),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantListView {
    pub participants: Vec<ParticipantRow>,
    /// Counters over the whole snapshot, ignoring filters
    pub stats: AttendanceStats,
    pub shown: usize,
    pub search: String,
    pub status: StatusFilter,
    pub sort: SortState,
    pub next_sort: ColumnSorts,
    pub empty_hint: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormView {
    pub form: ParticipantForm,
    pub cancel_to: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedView {
    pub participant: Participant,
    pub message: String,
    pub redirect_to: String,
    pub redirect_after_ms: u64,
}

impl From<Participant> for CreatedView {
    fn from(participant: Participant) -> Self {
        Self {
            participant,
            message: CREATED_MESSAGE.to_string(),
            redirect_to: LIST_ROUTE.to_string(),
            redirect_after_ms: REDIRECT_DELAY.as_millis() as u64,
        }
    }
}

pub fn list_view(
    participants: &[Participant],
    query: &ListQuery,
    offset: &FixedOffset,
) -> ParticipantListView {
    let rows: Vec<ParticipantRow> = query
        .apply(participants)
        .into_iter()
        .map(|p| ParticipantRow::new(p, offset))
        .collect();

    let empty_hint = rows.is_empty().then(|| {
        if query.is_filtered() {
            HINT_FILTERED.to_string()
        } else {
            HINT_EMPTY.to_string()
        }
    });

    let sort = query.sort_state();

    ParticipantListView {
        shown: rows.len(),
        participants: rows,
        stats: AttendanceStats::from_participants(participants),
        search: query.search.clone(),
        status: query.status,
        sort,
        next_sort: sort.into(),
        empty_hint,
    }
}

pub async fn load_list(
    api: &dyn ParticipantApi,
    query: &ListQuery,
    offset: &FixedOffset,
) -> Result<ParticipantListView> {
    let participants = api.list_participants().await?;
    Ok(list_view(&participants, query, offset))
}

/// CSV of exactly the rows the list view shows for `query`
pub async fn export_csv(
    api: &dyn ParticipantApi,
    query: &ListQuery,
    offset: &FixedOffset,
) -> Result<String> {
    let participants = api.list_participants().await?;
    let rows = query.apply(&participants);
    tracing::info!("Exporting {} of {} participants", rows.len(), participants.len());
    Ok(to_csv(&rows, offset))
}

/// Date stamped into the export filename: the operator's calendar day in
/// the display offset, so it agrees with the dates inside the file.
pub fn export_date(now: DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    now.with_timezone(offset).date_naive()
}

pub async fn create_participant(api: &dyn ParticipantApi, form: &ParticipantForm) -> FormOutcome {
    form.submit(api).await
}
