//! Filter and sort pipeline over a participant snapshot.
//!
//! Everything here is pure: the list view re-derives its rows from the last
//! fetched snapshot and the current query on every request.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::Participant;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum StatusFilter {
    #[default]
    All,
    CheckedIn,
    NotCheckedIn,
}

impl StatusFilter {
    pub fn matches(&self, participant: &Participant) -> bool {
        match self {
            Self::All => true,
            Self::CheckedIn => participant.is_checked_in,
            Self::NotCheckedIn => !participant.is_checked_in,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    #[default]
    CreatedAt,
    CheckedInAt,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    /// Selecting the active field flips the direction; any other field starts descending.
    pub fn select(self, field: SortField) -> Self {
        if self.field == field {
            Self {
                field,
                direction: self.direction.toggled(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Desc,
            }
        }
    }

    fn compare(&self, a: &Participant, b: &Participant) -> Ordering {
        let ordering = match self.field {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            // `None` orders before every timestamp
            SortField::CheckedInAt => a.checked_in_at.cmp(&b.checked_in_at),
        };

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Query parameters of the participant list and its export
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct ListQuery {
    /// Case-insensitive match on name or email
    pub search: String,
    pub status: StatusFilter,
    pub sort: SortField,
    pub direction: SortDirection,
}

impl ListQuery {
    pub fn sort_state(&self) -> SortState {
        SortState {
            field: self.sort,
            direction: self.direction,
        }
    }

    pub fn is_filtered(&self) -> bool {
        !self.search.trim().is_empty() || self.status != StatusFilter::All
    }

    /// Filtered and sorted view of `participants`.
    pub fn apply<'a>(&self, participants: &'a [Participant]) -> Vec<&'a Participant> {
        let mut rows = filter_participants(participants, &self.search, self.status);
        sort_participants(&mut rows, self.sort_state());
        rows
    }
}

pub fn filter_participants<'a>(
    participants: &'a [Participant],
    search: &str,
    status: StatusFilter,
) -> Vec<&'a Participant> {
    let term = search.trim().to_lowercase();

    participants
        .iter()
        .filter(|p| term.is_empty() || matches_term(p, &term))
        .filter(|p| status.matches(p))
        .collect()
}

fn matches_term(participant: &Participant, term: &str) -> bool {
    participant.name.to_lowercase().contains(term)
        || participant
            .email()
            .is_some_and(|email| email.to_lowercase().contains(term))
}

pub fn sort_participants(rows: &mut [&Participant], sort: SortState) {
    rows.sort_by(|a, b| sort.compare(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn participant(id: &str, name: &str, email: Option<&str>, day: u32, checked_day: Option<u32>) -> Participant {
        Participant {
            id: id.to_string(),
            name: name.to_string(),
            email: email.map(str::to_string),
            is_checked_in: checked_day.is_some(),
            created_at: Utc.with_ymd_and_hms(2025, 1, day, 9, 0, 0).unwrap(),
            checked_in_at: checked_day.map(|d| Utc.with_ymd_and_hms(2025, 2, d, 9, 0, 0).unwrap()),
        }
    }

    fn sample() -> Vec<Participant> {
        vec![
            participant("1", "andi", Some("andi@example.com"), 3, Some(2)),
            participant("2", "Bella", None, 1, None),
            participant("3", "Citra", Some("citra@kampus.ac.id"), 4, Some(5)),
            participant("4", "dodi", Some("DODI@Example.com"), 2, None),
        ]
    }

    fn ids(rows: &[&Participant]) -> Vec<String> {
        rows.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_checked_in_filter_returns_exact_subset() {
        let participants = sample();
        let rows = filter_participants(&participants, "", StatusFilter::CheckedIn);

        assert!(rows.iter().all(|p| p.is_checked_in));
        assert_eq!(
            rows.len(),
            participants.iter().filter(|p| p.is_checked_in).count()
        );
    }

    #[test]
    fn test_not_checked_in_filter() {
        let participants = sample();
        let rows = filter_participants(&participants, "", StatusFilter::NotCheckedIn);
        assert_eq!(ids(&rows), vec!["2", "4"]);
    }

    #[test]
    fn test_search_matches_name_and_email_case_insensitively() {
        let participants = sample();

        let rows = filter_participants(&participants, "EXAMPLE", StatusFilter::All);
        assert_eq!(ids(&rows), vec!["1", "4"]);

        let rows = filter_participants(&participants, "bel", StatusFilter::All);
        assert_eq!(ids(&rows), vec!["2"]);

        let rows = filter_participants(&participants, "kampus", StatusFilter::CheckedIn);
        assert_eq!(ids(&rows), vec!["3"]);
    }

    #[test]
    fn test_search_and_status_combine() {
        let participants = sample();
        let rows = filter_participants(&participants, "example", StatusFilter::NotCheckedIn);
        assert_eq!(ids(&rows), vec!["4"]);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let participants = sample();
        let mut rows: Vec<&Participant> = participants.iter().collect();

        sort_participants(
            &mut rows,
            SortState {
                field: SortField::Name,
                direction: SortDirection::Asc,
            },
        );
        assert_eq!(ids(&rows), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_toggling_created_at_reverses_order() {
        let participants = sample();

        let descending = SortState::default();
        assert_eq!(descending.field, SortField::CreatedAt);
        assert_eq!(descending.direction, SortDirection::Desc);

        let mut desc_rows: Vec<&Participant> = participants.iter().collect();
        sort_participants(&mut desc_rows, descending);
        assert_eq!(ids(&desc_rows), vec!["3", "1", "4", "2"]);

        let ascending = descending.select(SortField::CreatedAt);
        assert_eq!(ascending.direction, SortDirection::Asc);

        let mut asc_rows: Vec<&Participant> = participants.iter().collect();
        sort_participants(&mut asc_rows, ascending);

        let mut reversed = ids(&desc_rows);
        reversed.reverse();
        assert_eq!(ids(&asc_rows), reversed);
    }

    #[test]
    fn test_new_field_defaults_to_descending() {
        let state = SortState {
            field: SortField::CreatedAt,
            direction: SortDirection::Asc,
        };
        let state = state.select(SortField::Name);
        assert_eq!(state.field, SortField::Name);
        assert_eq!(state.direction, SortDirection::Desc);
    }

    #[test]
    fn test_missing_check_in_sorts_earliest() {
        let participants = sample();
        let mut rows: Vec<&Participant> = participants.iter().collect();

        sort_participants(
            &mut rows,
            SortState {
                field: SortField::CheckedInAt,
                direction: SortDirection::Asc,
            },
        );
        assert!(rows[0].checked_in_at.is_none());
        assert!(rows[1].checked_in_at.is_none());
        assert_eq!(ids(&rows[2..]), vec!["1", "3"]);
    }

    #[test]
    fn test_query_deserializes_with_defaults() {
        let query: ListQuery =
            serde_json::from_str(r#"{"status":"notCheckedIn","sort":"checkedInAt"}"#).unwrap();
        assert_eq!(query.status, StatusFilter::NotCheckedIn);
        assert_eq!(query.sort, SortField::CheckedInAt);
        assert_eq!(query.direction, SortDirection::Desc);
        assert!(query.is_filtered());
        assert!(!ListQuery::default().is_filtered());
    }

    #[test]
    fn test_apply_filters_then_sorts() {
        let participants = sample();
        let query = ListQuery {
            search: String::new(),
            status: StatusFilter::CheckedIn,
            sort: SortField::CheckedInAt,
            direction: SortDirection::Desc,
        };
        assert_eq!(ids(&query.apply(&participants)), vec!["3", "1"]);
    }
}
