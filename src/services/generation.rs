use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use log::info;

use crate::database::{self, DbPool, SqliteStore};
use crate::errors::SchedulingResult;
use crate::scheduling::locks::CycleLocks;
use crate::scheduling::regenerator::{GenerationReport, ScheduleRegenerator};

/// Atomic schedule (re)generation over the SQLite store: one per-cycle lock,
/// one transaction, commit on success and rollback on any error. A reader
/// sees either the old complete schedule or the new one, never an empty
/// in-between.
pub struct GenerationService {
    pool: DbPool,
    locks: Arc<CycleLocks>,
}

impl GenerationService {
    pub fn new(pool: DbPool, locks: Arc<CycleLocks>) -> Self {
        Self { pool, locks }
    }

    pub fn generate(
        &self,
        cycle_id: i64,
        start: NaiveDateTime,
        tour_duration_days: i64,
        actor: &str,
    ) -> SchedulingResult<GenerationReport> {
        info!("Schedule generation requested cycle={cycle_id} actor={actor}");
        let _guard = self.locks.acquire(cycle_id)?;
        let now = Utc::now().naive_utc();

        self.run_in_transaction(|store| {
            ScheduleRegenerator::new(store).generate(cycle_id, start, tour_duration_days, now)
        })
    }

    pub fn regenerate(&self, cycle_id: i64, actor: &str) -> SchedulingResult<GenerationReport> {
        info!("Schedule regeneration requested cycle={cycle_id} actor={actor}");
        let _guard = self.locks.acquire(cycle_id)?;
        let now = Utc::now().naive_utc();

        self.run_in_transaction(|store| ScheduleRegenerator::new(store).regenerate(cycle_id, now))
    }

    fn run_in_transaction<F>(&self, op: F) -> SchedulingResult<GenerationReport>
    where
        F: for<'a> FnOnce(&mut SqliteStore<'a>) -> SchedulingResult<GenerationReport>,
    {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction().map_err(anyhow::Error::from)?;

        let report = {
            let mut store = SqliteStore::new(&tx);
            op(&mut store)?
        };

        tx.commit().map_err(anyhow::Error::from)?;
        Ok(report)
    }
}

/// Operator-supplied start date, with or without a time of day.
pub fn parse_start_date(date_str: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M") {
        return Ok(dt);
    }

    if let Ok(d) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        if let Some(dt) = d.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }

    anyhow::bail!("Failed to parse start date: {}", date_str)
}

#[cfg(test)]
mod tests {
    use super::parse_start_date;

    #[test]
    fn parses_date_only_and_date_time() {
        assert_eq!(
            parse_start_date("2026-03-02").unwrap(),
            parse_start_date("2026-03-02T00:00:00").unwrap()
        );
        assert!(parse_start_date("2026-03-02 18:30").is_ok());
        assert!(parse_start_date("yesterday").is_err());
    }
}
