use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{invalid_text_column, NewScheduleRequest, ScheduleRequestRow};
use crate::domain::RequestStatus;

pub fn insert_request(conn: &Connection, request: &NewScheduleRequest) -> Result<ScheduleRequestRow> {
    let sql = "INSERT INTO schedule_requests \
               (tour_id, proposed_date, proposed_hours, initiator_player_id, recipient_player_id, status, created_at) \
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
               RETURNING id, tour_id, proposed_date, proposed_hours, initiator_player_id, recipient_player_id, status, created_at, updated_at";

    conn.query_row(
        sql,
        params![
            request.tour_id,
            request.proposed_date,
            request.proposed_hours,
            request.initiator_player_id,
            request.recipient_player_id,
            RequestStatus::Pending.as_str(),
            request.created_at
        ],
        parse_request_row,
    )
    .context("Failed to insert schedule request")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<ScheduleRequestRow>> {
    let sql = "SELECT id, tour_id, proposed_date, proposed_hours, initiator_player_id, recipient_player_id, status, created_at, updated_at \
               FROM schedule_requests WHERE id = ?1";

    conn.query_row(sql, params![id], parse_request_row)
        .optional()
        .context("Failed to query schedule request by id")
}

pub fn ids_by_tour(conn: &Connection, tour_id: i64) -> Result<Vec<i64>> {
    let sql = "SELECT id FROM schedule_requests WHERE tour_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![tour_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn delete_by_ids(conn: &Connection, request_ids: &[i64]) -> Result<()> {
    let sql = "DELETE FROM schedule_requests WHERE id = ?1";

    for id in request_ids {
        conn.execute(sql, params![id])
            .context("Failed to delete schedule request")?;
    }
    Ok(())
}

pub fn update_status(
    conn: &Connection,
    request_id: i64,
    status: RequestStatus,
    updated_at: NaiveDateTime,
) -> Result<()> {
    let sql = "UPDATE schedule_requests SET status = ?1, updated_at = ?2 WHERE id = ?3";

    conn.execute(sql, params![status.as_str(), updated_at, request_id])
        .context("Failed to update schedule request status")
        .map(|_| ())
}

fn parse_request_row(row: &rusqlite::Row) -> rusqlite::Result<ScheduleRequestRow> {
    let status_text: String = row.get(6)?;
    let status = RequestStatus::parse(&status_text)
        .ok_or_else(|| invalid_text_column(6, format!("unknown request status: {status_text}")))?;

    Ok(ScheduleRequestRow {
        id: row.get(0)?,
        tour_id: row.get(1)?,
        proposed_date: row.get(2)?,
        proposed_hours: row.get(3)?,
        initiator_player_id: row.get(4)?,
        recipient_player_id: row.get(5)?,
        status,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
