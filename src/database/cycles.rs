use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::CycleRow;
use super::players::parse_player_row;
use crate::domain::Player;

pub fn create_cycle(conn: &Connection, name: &str) -> Result<CycleRow> {
    let sql = "INSERT INTO division_cycles (name) VALUES (?1) RETURNING id, name, created_at";

    conn.query_row(sql, params![name], parse_cycle_row)
        .context("Failed to insert new division cycle")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<CycleRow>> {
    let sql = "SELECT id, name, created_at FROM division_cycles WHERE id = ?1";

    conn.query_row(sql, params![id], parse_cycle_row)
        .optional()
        .context("Failed to query division cycle by id")
}

pub fn assign_player(conn: &Connection, cycle_id: i64, player_id: i64, position: i64) -> Result<()> {
    let sql = "INSERT INTO cycle_players (cycle_id, player_id, position) VALUES (?1, ?2, ?3)";

    conn.execute(sql, params![cycle_id, player_id, position])
        .context("Failed to assign player to cycle")
        .map(|_| ())
}

pub fn remove_player(conn: &Connection, cycle_id: i64, player_id: i64) -> Result<()> {
    let sql = "DELETE FROM cycle_players WHERE cycle_id = ?1 AND player_id = ?2";

    conn.execute(sql, params![cycle_id, player_id])
        .context("Failed to remove player from cycle")
        .map(|_| ())
}

/// Roster in stable order: assignment position first, then player id.
pub fn players_in_cycle(conn: &Connection, cycle_id: i64) -> Result<Vec<Player>> {
    let sql = "SELECT p.id, p.name, p.is_active FROM players p \
               JOIN cycle_players cp ON cp.player_id = p.id \
               WHERE cp.cycle_id = ?1 ORDER BY cp.position, p.id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![cycle_id], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_cycle_row(row: &rusqlite::Row) -> rusqlite::Result<CycleRow> {
    Ok(CycleRow {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}
