use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::scheduling::stores::{TemplateWindow, TourTemplateRecord};

pub fn insert_templates(
    conn: &Connection,
    cycle_id: i64,
    windows: &[TemplateWindow],
) -> Result<Vec<TourTemplateRecord>> {
    let sql = "INSERT INTO tour_templates (cycle_id, round_index, start_date, end_date) \
               VALUES (?1, ?2, ?3, ?4) \
               RETURNING id, cycle_id, round_index, start_date, end_date";

    let mut created = Vec::with_capacity(windows.len());
    for window in windows {
        let record = conn
            .query_row(
                sql,
                params![cycle_id, window.round_index, window.start, window.end],
                parse_template_row,
            )
            .context("Failed to insert tour template")?;
        created.push(record);
    }
    Ok(created)
}

pub fn list_by_cycle(conn: &Connection, cycle_id: i64) -> Result<Vec<TourTemplateRecord>> {
    let sql = "SELECT id, cycle_id, round_index, start_date, end_date FROM tour_templates \
               WHERE cycle_id = ?1 ORDER BY start_date, round_index";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![cycle_id], parse_template_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn delete_by_ids(conn: &Connection, template_ids: &[i64]) -> Result<()> {
    let sql = "DELETE FROM tour_templates WHERE id = ?1";

    for id in template_ids {
        conn.execute(sql, params![id])
            .context("Failed to delete tour template")?;
    }
    Ok(())
}

fn parse_template_row(row: &rusqlite::Row) -> rusqlite::Result<TourTemplateRecord> {
    Ok(TourTemplateRecord {
        id: row.get(0)?,
        cycle_id: row.get(1)?,
        round_index: row.get(2)?,
        start: row.get(3)?,
        end: row.get(4)?,
    })
}
