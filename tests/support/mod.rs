use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;

use ladder_league::domain::Player;
use ladder_league::errors::SchedulingResult;
use ladder_league::scheduling::stores::{
    AvailabilityRecord, AvailabilityStore, NegotiationStore, NewAvailability, NewTour,
    PairingLinkStore, PlayerLookup, TemplateStore, TemplateWindow, TourRecord, TourStore,
    TourTemplateRecord,
};

/// Everything the in-memory store holds, cloneable so a test harness can
/// snapshot and roll back the way a database transaction would.
#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub players: BTreeMap<i64, Player>,
    pub cycles: BTreeMap<i64, String>,
    pub rosters: BTreeMap<i64, Vec<i64>>,
    pub templates: BTreeMap<i64, TourTemplateRecord>,
    pub tours: BTreeMap<i64, StoredTour>,
    pub links: Vec<(i64, i64)>,
    pub requests: BTreeMap<i64, i64>,
    pub declarations: BTreeMap<i64, AvailabilityRecord>,
    next_id: i64,
}

#[derive(Debug, Clone)]
pub struct StoredTour {
    pub id: i64,
    pub template_id: i64,
    pub responsible_player_id: i64,
    pub updated_at: NaiveDateTime,
}

/// In-memory `LeagueStore` double with an injectable failure point between
/// the destructive and constructive phases of a rebuild.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub state: StoreState,
    pub fail_on_create_templates: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_player(&mut self, name: &str) -> i64 {
        let id = self.state.alloc_id();
        self.state.players.insert(
            id,
            Player {
                id,
                name: name.to_string(),
                is_active: true,
            },
        );
        id
    }

    pub fn add_cycle(&mut self, name: &str) -> i64 {
        let id = self.state.alloc_id();
        self.state.cycles.insert(id, name.to_string());
        self.state.rosters.insert(id, Vec::new());
        id
    }

    pub fn assign(&mut self, cycle_id: i64, player_id: i64) {
        self.state.rosters.entry(cycle_id).or_default().push(player_id);
    }

    pub fn remove_from_roster(&mut self, cycle_id: i64, player_id: i64) {
        if let Some(roster) = self.state.rosters.get_mut(&cycle_id) {
            roster.retain(|id| *id != player_id);
        }
    }

    pub fn add_pending_request(&mut self, tour_id: i64) -> i64 {
        let id = self.state.alloc_id();
        self.state.requests.insert(id, tour_id);
        id
    }

    pub fn add_declaration(
        &mut self,
        tour_id: i64,
        player_id: i64,
        available: &str,
        unavailable: &str,
        created_at: NaiveDateTime,
    ) -> i64 {
        let id = self.state.alloc_id();
        self.state.declarations.insert(
            id,
            AvailabilityRecord {
                id,
                tour_id,
                player_id,
                available_slots: available.to_string(),
                unavailable_slots: unavailable.to_string(),
                created_at,
                updated_at: None,
            },
        );
        id
    }

    pub fn template_ids(&self) -> Vec<i64> {
        self.state.templates.keys().copied().collect()
    }

    pub fn tour_ids(&self) -> Vec<i64> {
        self.state.tours.keys().copied().collect()
    }

    pub fn declaration_ids(&self) -> Vec<i64> {
        self.state.declarations.keys().copied().collect()
    }

    pub fn players_of_tour(&self, tour_id: i64) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .state
            .links
            .iter()
            .filter(|(tour, _)| *tour == tour_id)
            .map(|(_, player)| *player)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Tour whose pairing is exactly {a, b}, if any.
    pub fn tour_for_pair(&self, a: i64, b: i64) -> Option<i64> {
        let mut wanted = vec![a, b];
        wanted.sort_unstable();
        self.state
            .tours
            .keys()
            .copied()
            .find(|tour_id| self.players_of_tour(*tour_id) == wanted)
    }

    /// Tour of the given round (by template index in start order) containing
    /// the player, if any.
    pub fn tour_in_round_for_player(&self, round_index: i64, player_id: i64) -> Option<i64> {
        let template_id = self
            .state
            .templates
            .values()
            .find(|t| t.round_index == round_index)
            .map(|t| t.id)?;
        self.state
            .tours
            .values()
            .filter(|t| t.template_id == template_id)
            .map(|t| t.id)
            .find(|tour_id| self.players_of_tour(*tour_id).contains(&player_id))
    }

    pub fn responsibility_counts(&self) -> BTreeMap<i64, usize> {
        let mut counts = BTreeMap::new();
        for tour in self.state.tours.values() {
            *counts.entry(tour.responsible_player_id).or_insert(0) += 1;
        }
        counts
    }
}

impl StoreState {
    fn alloc_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Snapshot-run-restore, mirroring the production transaction wrapper: on
/// error the store ends up exactly where it started.
pub fn run_atomic<T>(
    store: &mut MemoryStore,
    op: impl FnOnce(&mut MemoryStore) -> SchedulingResult<T>,
) -> SchedulingResult<T> {
    let snapshot = store.state.clone();
    match op(store) {
        Ok(value) => Ok(value),
        Err(e) => {
            store.state = snapshot;
            Err(e)
        }
    }
}

impl PlayerLookup for MemoryStore {
    fn cycle_exists(&mut self, cycle_id: i64) -> Result<bool> {
        Ok(self.state.cycles.contains_key(&cycle_id))
    }

    fn players_in_cycle(&mut self, cycle_id: i64) -> Result<Vec<Player>> {
        let roster = self.state.rosters.get(&cycle_id).cloned().unwrap_or_default();
        roster
            .into_iter()
            .map(|id| {
                self.state
                    .players
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| anyhow!("player {id} missing"))
            })
            .collect()
    }
}

impl TemplateStore for MemoryStore {
    fn create_templates(
        &mut self,
        cycle_id: i64,
        windows: &[TemplateWindow],
    ) -> Result<Vec<TourTemplateRecord>> {
        if self.fail_on_create_templates {
            return Err(anyhow!("injected template store failure"));
        }
        let mut created = Vec::with_capacity(windows.len());
        for window in windows {
            let id = self.state.alloc_id();
            let record = TourTemplateRecord {
                id,
                cycle_id,
                round_index: window.round_index,
                start: window.start,
                end: window.end,
            };
            self.state.templates.insert(id, record.clone());
            created.push(record);
        }
        Ok(created)
    }

    fn templates_in_cycle(&mut self, cycle_id: i64) -> Result<Vec<TourTemplateRecord>> {
        let mut templates: Vec<TourTemplateRecord> = self
            .state
            .templates
            .values()
            .filter(|t| t.cycle_id == cycle_id)
            .cloned()
            .collect();
        templates.sort_by_key(|t| (t.start, t.round_index));
        Ok(templates)
    }

    fn delete_templates(&mut self, template_ids: &[i64]) -> Result<()> {
        for id in template_ids {
            self.state.templates.remove(id);
        }
        Ok(())
    }
}

impl TourStore for MemoryStore {
    fn create_tour(&mut self, tour: &NewTour) -> Result<i64> {
        let id = self.state.alloc_id();
        self.state.tours.insert(
            id,
            StoredTour {
                id,
                template_id: tour.template_id,
                responsible_player_id: tour.responsible_player_id,
                updated_at: tour.updated_at,
            },
        );
        Ok(id)
    }

    fn tours_by_template(&mut self, template_id: i64) -> Result<Vec<TourRecord>> {
        Ok(self
            .state
            .tours
            .values()
            .filter(|t| t.template_id == template_id)
            .map(|t| TourRecord {
                id: t.id,
                template_id: t.template_id,
                status: ladder_league::domain::TourStatus::Active,
                scheduled_time: None,
                responsible_player_id: Some(t.responsible_player_id),
            })
            .collect())
    }

    fn delete_tours(&mut self, tour_ids: &[i64]) -> Result<()> {
        for id in tour_ids {
            self.state.tours.remove(id);
        }
        Ok(())
    }
}

impl PairingLinkStore for MemoryStore {
    fn link_player(&mut self, tour_id: i64, player_id: i64) -> Result<()> {
        self.state.links.push((tour_id, player_id));
        Ok(())
    }

    fn players_by_tour(&mut self, tour_id: i64) -> Result<Vec<i64>> {
        Ok(self.players_of_tour(tour_id))
    }

    fn delete_links_for_tour(&mut self, tour_id: i64) -> Result<()> {
        self.state.links.retain(|(tour, _)| *tour != tour_id);
        Ok(())
    }
}

impl NegotiationStore for MemoryStore {
    fn request_ids_by_tour(&mut self, tour_id: i64) -> Result<Vec<i64>> {
        Ok(self
            .state
            .requests
            .iter()
            .filter(|(_, tour)| **tour == tour_id)
            .map(|(id, _)| *id)
            .collect())
    }

    fn delete_requests(&mut self, request_ids: &[i64]) -> Result<()> {
        for id in request_ids {
            self.state.requests.remove(id);
        }
        Ok(())
    }
}

impl AvailabilityStore for MemoryStore {
    fn declarations_by_tour(&mut self, tour_id: i64) -> Result<Vec<AvailabilityRecord>> {
        Ok(self
            .state
            .declarations
            .values()
            .filter(|d| d.tour_id == tour_id)
            .cloned()
            .collect())
    }

    fn save_declaration(&mut self, declaration: &NewAvailability) -> Result<i64> {
        let id = self.state.alloc_id();
        self.state.declarations.insert(
            id,
            AvailabilityRecord {
                id,
                tour_id: declaration.tour_id,
                player_id: declaration.player_id,
                available_slots: declaration.available_slots.clone(),
                unavailable_slots: declaration.unavailable_slots.clone(),
                created_at: declaration.created_at,
                updated_at: declaration.updated_at,
            },
        );
        Ok(id)
    }
}
