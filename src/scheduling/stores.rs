use anyhow::Result;
use chrono::NaiveDateTime;

use crate::domain::{Player, TourStatus};

/// Template window to materialize: one round's booking period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateWindow {
    pub round_index: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct TourTemplateRecord {
    pub id: i64,
    pub cycle_id: i64,
    pub round_index: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct NewTour {
    pub template_id: i64,
    pub status: TourStatus,
    pub responsible_player_id: i64,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct TourRecord {
    pub id: i64,
    pub template_id: i64,
    pub status: TourStatus,
    pub scheduled_time: Option<NaiveDateTime>,
    pub responsible_player_id: Option<i64>,
}

/// Raw declaration row. Slot payloads stay as JSON text here so preservation
/// clones them byte-for-byte; parsing happens at the intersection edge.
#[derive(Debug, Clone)]
pub struct AvailabilityRecord {
    pub id: i64,
    pub tour_id: i64,
    pub player_id: i64,
    pub available_slots: String,
    pub unavailable_slots: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewAvailability {
    pub tour_id: i64,
    pub player_id: i64,
    pub available_slots: String,
    pub unavailable_slots: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

/// Roster access for one division cycle.
pub trait PlayerLookup {
    fn cycle_exists(&mut self, cycle_id: i64) -> Result<bool>;
    /// Players of the cycle in stable roster order.
    fn players_in_cycle(&mut self, cycle_id: i64) -> Result<Vec<Player>>;
}

pub trait TemplateStore {
    fn create_templates(
        &mut self,
        cycle_id: i64,
        windows: &[TemplateWindow],
    ) -> Result<Vec<TourTemplateRecord>>;
    /// Templates of the cycle ordered by start date.
    fn templates_in_cycle(&mut self, cycle_id: i64) -> Result<Vec<TourTemplateRecord>>;
    fn delete_templates(&mut self, template_ids: &[i64]) -> Result<()>;
}

pub trait TourStore {
    fn create_tour(&mut self, tour: &NewTour) -> Result<i64>;
    fn tours_by_template(&mut self, template_id: i64) -> Result<Vec<TourRecord>>;
    fn delete_tours(&mut self, tour_ids: &[i64]) -> Result<()>;
}

/// (Tour, Player) membership rows.
pub trait PairingLinkStore {
    fn link_player(&mut self, tour_id: i64, player_id: i64) -> Result<()>;
    fn players_by_tour(&mut self, tour_id: i64) -> Result<Vec<i64>>;
    fn delete_links_for_tour(&mut self, tour_id: i64) -> Result<()>;
}

/// Schedule-request cleanup during the cascade delete.
pub trait NegotiationStore {
    fn request_ids_by_tour(&mut self, tour_id: i64) -> Result<Vec<i64>>;
    fn delete_requests(&mut self, request_ids: &[i64]) -> Result<()>;
}

pub trait AvailabilityStore {
    fn declarations_by_tour(&mut self, tour_id: i64) -> Result<Vec<AvailabilityRecord>>;
    fn save_declaration(&mut self, declaration: &NewAvailability) -> Result<i64>;
}

/// Everything the regenerator needs, as one capability bundle. Implemented
/// for free by any type providing the narrow traits.
pub trait LeagueStore:
    PlayerLookup + TemplateStore + TourStore + PairingLinkStore + NegotiationStore + AvailabilityStore
{
}

impl<T> LeagueStore for T where
    T: PlayerLookup
        + TemplateStore
        + TourStore
        + PairingLinkStore
        + NegotiationStore
        + AvailabilityStore
{
}
