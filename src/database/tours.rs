use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::invalid_text_column;
use crate::domain::TourStatus;
use crate::scheduling::stores::{NewTour, TourRecord};

pub fn insert_tour(conn: &Connection, tour: &NewTour) -> Result<i64> {
    let sql = "INSERT INTO tours (template_id, status, responsible_player_id, updated_at) \
               VALUES (?1, ?2, ?3, ?4) RETURNING id";

    conn.query_row(
        sql,
        params![
            tour.template_id,
            tour.status.as_str(),
            tour.responsible_player_id,
            tour.updated_at
        ],
        |row| row.get(0),
    )
    .context("Failed to insert tour")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<TourRecord>> {
    let sql = "SELECT id, template_id, status, scheduled_time, responsible_player_id \
               FROM tours WHERE id = ?1";

    conn.query_row(sql, params![id], parse_tour_row)
        .optional()
        .context("Failed to query tour by id")
}

pub fn list_by_template(conn: &Connection, template_id: i64) -> Result<Vec<TourRecord>> {
    let sql = "SELECT id, template_id, status, scheduled_time, responsible_player_id \
               FROM tours WHERE template_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![template_id], parse_tour_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn delete_by_ids(conn: &Connection, tour_ids: &[i64]) -> Result<()> {
    let sql = "DELETE FROM tours WHERE id = ?1";

    for id in tour_ids {
        conn.execute(sql, params![id])
            .context("Failed to delete tour")?;
    }
    Ok(())
}

pub fn mark_scheduled(
    conn: &Connection,
    tour_id: i64,
    scheduled_time: Option<NaiveDateTime>,
    updated_at: NaiveDateTime,
) -> Result<()> {
    let sql = "UPDATE tours SET status = ?1, scheduled_time = ?2, updated_at = ?3 WHERE id = ?4";

    conn.execute(
        sql,
        params![
            TourStatus::Scheduled.as_str(),
            scheduled_time,
            updated_at,
            tour_id
        ],
    )
    .context("Failed to mark tour as scheduled")
    .map(|_| ())
}

fn parse_tour_row(row: &rusqlite::Row) -> rusqlite::Result<TourRecord> {
    let status_text: String = row.get(2)?;
    let status = TourStatus::parse(&status_text)
        .ok_or_else(|| invalid_text_column(2, format!("unknown tour status: {status_text}")))?;

    Ok(TourRecord {
        id: row.get(0)?,
        template_id: row.get(1)?,
        status,
        scheduled_time: row.get(3)?,
        responsible_player_id: row.get(4)?,
    })
}
