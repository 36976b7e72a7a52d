use chrono::Utc;
use log::info;

use crate::availability::intersection::{compute_overlap, OverlapResult, PlayerSlots};
use crate::database::{self, DbPool};
use crate::errors::{SchedulingError, SchedulingResult};
use crate::scheduling::stores::{AvailabilityRecord, NewAvailability};

/// Declared and computed availability for one tour's pairing.
#[derive(Debug)]
pub struct TourOverlap {
    pub tour_id: i64,
    pub player_a_id: i64,
    pub player_b_id: i64,
    pub result: OverlapResult,
}

pub struct AvailabilityService {
    pool: DbPool,
}

impl AvailabilityService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn declaration(
        &self,
        tour_id: i64,
        player_id: i64,
    ) -> SchedulingResult<Option<AvailabilityRecord>> {
        let conn = database::get_connection(&self.pool)?;
        Ok(database::availability::find_by_tour_and_player(
            &conn, tour_id, player_id,
        )?)
    }

    /// Creates or updates the player's declaration for a tour. An update
    /// keeps the original `created_at` and refreshes `updated_at`.
    pub fn save_declaration(
        &self,
        tour_id: i64,
        player_id: i64,
        available_slots: &str,
        unavailable_slots: &str,
    ) -> SchedulingResult<AvailabilityRecord> {
        let conn = database::get_connection(&self.pool)?;
        self.ensure_tour_member(&conn, tour_id, player_id)?;
        let now = Utc::now().naive_utc();

        match database::availability::find_by_tour_and_player(&conn, tour_id, player_id)? {
            Some(existing) => {
                database::availability::update_slots(
                    &conn,
                    existing.id,
                    available_slots,
                    unavailable_slots,
                    now,
                )?;
            }
            None => {
                database::availability::insert_declaration(
                    &conn,
                    &NewAvailability {
                        tour_id,
                        player_id,
                        available_slots: available_slots.to_string(),
                        unavailable_slots: unavailable_slots.to_string(),
                        created_at: now,
                        updated_at: Some(now),
                    },
                )?;
            }
        }

        let saved = database::availability::find_by_tour_and_player(&conn, tour_id, player_id)?
            .ok_or_else(|| {
                SchedulingError::Internal("declaration missing after save".to_string())
            })?;
        info!("Availability saved tour={tour_id} player={player_id}");
        Ok(saved)
    }

    pub fn delete_declaration(&self, tour_id: i64, player_id: i64) -> SchedulingResult<()> {
        let conn = database::get_connection(&self.pool)?;
        database::availability::delete_by_tour_and_player(&conn, tour_id, player_id)?;
        Ok(())
    }

    /// Candidate meeting windows for the two given members of a tour.
    /// Missing declarations surface as empty lists with submission flags,
    /// never as errors.
    pub fn tour_overlap(
        &self,
        tour_id: i64,
        player_a_id: i64,
        player_b_id: i64,
    ) -> SchedulingResult<TourOverlap> {
        let conn = database::get_connection(&self.pool)?;
        self.ensure_tour_member(&conn, tour_id, player_a_id)?;
        self.ensure_tour_member(&conn, tour_id, player_b_id)?;

        let slots_a = self.load_slots(&conn, tour_id, player_a_id)?;
        let slots_b = self.load_slots(&conn, tour_id, player_b_id)?;
        let result = compute_overlap(slots_a.as_ref(), slots_b.as_ref());

        Ok(TourOverlap {
            tour_id,
            player_a_id,
            player_b_id,
            result,
        })
    }

    fn load_slots(
        &self,
        conn: &rusqlite::Connection,
        tour_id: i64,
        player_id: i64,
    ) -> SchedulingResult<Option<PlayerSlots>> {
        let record = database::availability::find_by_tour_and_player(conn, tour_id, player_id)?;
        Ok(record
            .map(|r| PlayerSlots::from_json(&r.available_slots, &r.unavailable_slots)))
    }

    fn ensure_tour_member(
        &self,
        conn: &rusqlite::Connection,
        tour_id: i64,
        player_id: i64,
    ) -> SchedulingResult<()> {
        if database::tours::find_by_id(conn, tour_id)?.is_none() {
            return Err(SchedulingError::NotFound(format!(
                "tour {tour_id} does not exist"
            )));
        }
        let members = database::tour_players::player_ids_by_tour(conn, tour_id)?;
        if !members.contains(&player_id) {
            return Err(SchedulingError::Validation(format!(
                "player {player_id} is not part of tour {tour_id}"
            )));
        }
        Ok(())
    }
}
