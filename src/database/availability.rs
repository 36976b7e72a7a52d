use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use crate::scheduling::stores::{AvailabilityRecord, NewAvailability};

pub fn insert_declaration(conn: &Connection, declaration: &NewAvailability) -> Result<i64> {
    let sql = "INSERT INTO availability_slots \
               (tour_id, player_id, available_slots, unavailable_slots, created_at, updated_at) \
               VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING id";

    conn.query_row(
        sql,
        params![
            declaration.tour_id,
            declaration.player_id,
            declaration.available_slots,
            declaration.unavailable_slots,
            declaration.created_at,
            declaration.updated_at
        ],
        |row| row.get(0),
    )
    .context("Failed to insert availability declaration")
}

pub fn update_slots(
    conn: &Connection,
    declaration_id: i64,
    available_slots: &str,
    unavailable_slots: &str,
    updated_at: NaiveDateTime,
) -> Result<()> {
    let sql = "UPDATE availability_slots \
               SET available_slots = ?1, unavailable_slots = ?2, updated_at = ?3 WHERE id = ?4";

    conn.execute(
        sql,
        params![available_slots, unavailable_slots, updated_at, declaration_id],
    )
    .context("Failed to update availability declaration")
    .map(|_| ())
}

pub fn find_by_tour(conn: &Connection, tour_id: i64) -> Result<Vec<AvailabilityRecord>> {
    let sql = "SELECT id, tour_id, player_id, available_slots, unavailable_slots, created_at, updated_at \
               FROM availability_slots WHERE tour_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![tour_id], parse_availability_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn find_by_tour_and_player(
    conn: &Connection,
    tour_id: i64,
    player_id: i64,
) -> Result<Option<AvailabilityRecord>> {
    let sql = "SELECT id, tour_id, player_id, available_slots, unavailable_slots, created_at, updated_at \
               FROM availability_slots WHERE tour_id = ?1 AND player_id = ?2";

    conn.query_row(sql, params![tour_id, player_id], parse_availability_row)
        .optional()
        .context("Failed to query availability declaration")
}

pub fn delete_by_tour_and_player(conn: &Connection, tour_id: i64, player_id: i64) -> Result<()> {
    let sql = "DELETE FROM availability_slots WHERE tour_id = ?1 AND player_id = ?2";

    conn.execute(sql, params![tour_id, player_id])
        .context("Failed to delete availability declaration")
        .map(|_| ())
}

fn parse_availability_row(row: &rusqlite::Row) -> rusqlite::Result<AvailabilityRecord> {
    Ok(AvailabilityRecord {
        id: row.get(0)?,
        tour_id: row.get(1)?,
        player_id: row.get(2)?,
        available_slots: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        unavailable_slots: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
