use anyhow::{Context, Result};
use rusqlite::{params, Connection};

pub fn link_player(conn: &Connection, tour_id: i64, player_id: i64) -> Result<()> {
    let sql = "INSERT INTO tour_players (tour_id, player_id) VALUES (?1, ?2)";

    conn.execute(sql, params![tour_id, player_id])
        .context("Failed to link player to tour")
        .map(|_| ())
}

pub fn player_ids_by_tour(conn: &Connection, tour_id: i64) -> Result<Vec<i64>> {
    let sql = "SELECT player_id FROM tour_players WHERE tour_id = ?1 ORDER BY player_id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![tour_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn tour_ids_for_player(conn: &Connection, player_id: i64) -> Result<Vec<i64>> {
    let sql = "SELECT tour_id FROM tour_players WHERE player_id = ?1 ORDER BY tour_id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![player_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn delete_by_tour(conn: &Connection, tour_id: i64) -> Result<()> {
    let sql = "DELETE FROM tour_players WHERE tour_id = ?1";

    conn.execute(sql, params![tour_id])
        .context("Failed to delete tour pairing links")
        .map(|_| ())
}
