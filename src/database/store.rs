use anyhow::Result;
use rusqlite::Connection;

use super::{availability, cycles, schedule_requests, templates, tour_players, tours};
use crate::domain::Player;
use crate::scheduling::stores::{
    AvailabilityRecord, AvailabilityStore, NegotiationStore, NewAvailability, NewTour,
    PairingLinkStore, PlayerLookup, TemplateStore, TemplateWindow, TourRecord, TourStore,
    TourTemplateRecord,
};

/// Collaborator bundle over one SQLite connection. Built on a
/// `rusqlite::Transaction` by the services so a whole generate/regenerate is
/// one atomic unit of work.
pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl PlayerLookup for SqliteStore<'_> {
    fn cycle_exists(&mut self, cycle_id: i64) -> Result<bool> {
        Ok(cycles::find_by_id(self.conn, cycle_id)?.is_some())
    }

    fn players_in_cycle(&mut self, cycle_id: i64) -> Result<Vec<Player>> {
        cycles::players_in_cycle(self.conn, cycle_id)
    }
}

impl TemplateStore for SqliteStore<'_> {
    fn create_templates(
        &mut self,
        cycle_id: i64,
        windows: &[TemplateWindow],
    ) -> Result<Vec<TourTemplateRecord>> {
        templates::insert_templates(self.conn, cycle_id, windows)
    }

    fn templates_in_cycle(&mut self, cycle_id: i64) -> Result<Vec<TourTemplateRecord>> {
        templates::list_by_cycle(self.conn, cycle_id)
    }

    fn delete_templates(&mut self, template_ids: &[i64]) -> Result<()> {
        templates::delete_by_ids(self.conn, template_ids)
    }
}

impl TourStore for SqliteStore<'_> {
    fn create_tour(&mut self, tour: &NewTour) -> Result<i64> {
        tours::insert_tour(self.conn, tour)
    }

    fn tours_by_template(&mut self, template_id: i64) -> Result<Vec<TourRecord>> {
        tours::list_by_template(self.conn, template_id)
    }

    fn delete_tours(&mut self, tour_ids: &[i64]) -> Result<()> {
        tours::delete_by_ids(self.conn, tour_ids)
    }
}

impl PairingLinkStore for SqliteStore<'_> {
    fn link_player(&mut self, tour_id: i64, player_id: i64) -> Result<()> {
        tour_players::link_player(self.conn, tour_id, player_id)
    }

    fn players_by_tour(&mut self, tour_id: i64) -> Result<Vec<i64>> {
        tour_players::player_ids_by_tour(self.conn, tour_id)
    }

    fn delete_links_for_tour(&mut self, tour_id: i64) -> Result<()> {
        tour_players::delete_by_tour(self.conn, tour_id)
    }
}

impl NegotiationStore for SqliteStore<'_> {
    fn request_ids_by_tour(&mut self, tour_id: i64) -> Result<Vec<i64>> {
        schedule_requests::ids_by_tour(self.conn, tour_id)
    }

    fn delete_requests(&mut self, request_ids: &[i64]) -> Result<()> {
        schedule_requests::delete_by_ids(self.conn, request_ids)
    }
}

impl AvailabilityStore for SqliteStore<'_> {
    fn declarations_by_tour(&mut self, tour_id: i64) -> Result<Vec<AvailabilityRecord>> {
        availability::find_by_tour(self.conn, tour_id)
    }

    fn save_declaration(&mut self, declaration: &NewAvailability) -> Result<i64> {
        availability::insert_declaration(self.conn, declaration)
    }
}
