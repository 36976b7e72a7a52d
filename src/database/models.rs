use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::RequestStatus;

#[derive(Debug, Clone)]
pub struct CycleRow {
    pub id: i64,
    pub name: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct ScheduleRequestRow {
    pub id: i64,
    pub tour_id: i64,
    pub proposed_date: NaiveDate,
    pub proposed_hours: String,
    pub initiator_player_id: i64,
    pub recipient_player_id: i64,
    pub status: RequestStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewScheduleRequest {
    pub tour_id: i64,
    pub proposed_date: NaiveDate,
    pub proposed_hours: String,
    pub initiator_player_id: i64,
    pub recipient_player_id: i64,
    pub created_at: NaiveDateTime,
}

pub(crate) fn invalid_text_column(
    index: usize,
    message: String,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        index,
        rusqlite::types::Type::Text,
        message.into(),
    )
}
