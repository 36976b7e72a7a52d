use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::database::{self, DbPool};
use crate::domain::{Player, TourStatus};
use crate::errors::{SchedulingError, SchedulingResult};
use crate::scheduling::stores::TourTemplateRecord;

/// One template slot from a player's point of view. `tour` is absent when
/// the player drew a bye in that round.
#[derive(Debug)]
pub struct PlayerTourSlot {
    pub template_id: i64,
    pub round_index: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub tour: Option<PlayerTourInfo>,
}

#[derive(Debug, Clone)]
pub struct PlayerTourInfo {
    pub tour_id: i64,
    pub status: TourStatus,
    pub opponent: Option<Player>,
    pub scheduled_time: Option<NaiveDateTime>,
    pub responsible_player_id: Option<i64>,
}

#[derive(Debug)]
pub struct PlayerSchedule {
    pub player: Player,
    pub slots: Vec<PlayerTourSlot>,
}

#[derive(Debug)]
pub struct CycleRoundView {
    pub template: TourTemplateRecord,
    pub tours: Vec<CycleTourView>,
}

#[derive(Debug)]
pub struct CycleTourView {
    pub tour_id: i64,
    pub players: Vec<Player>,
    pub status: TourStatus,
    pub scheduled_time: Option<NaiveDateTime>,
    pub responsible_player_id: Option<i64>,
}

/// Read-only schedule projections for the UI layer.
pub struct ScheduleViewService {
    pool: DbPool,
}

impl ScheduleViewService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn player_schedule(&self, cycle_id: i64, player_id: i64) -> SchedulingResult<PlayerSchedule> {
        let conn = database::get_connection(&self.pool)?;
        self.ensure_cycle(&conn, cycle_id)?;
        let player = database::players::find_by_id(&conn, player_id)?.ok_or_else(|| {
            SchedulingError::NotFound(format!("player {player_id} does not exist"))
        })?;

        let templates = database::templates::list_by_cycle(&conn, cycle_id)?;
        let tours_by_template = self.player_tours_by_template(&conn, &templates, player_id)?;

        let slots = templates
            .into_iter()
            .map(|template| {
                let tour = tours_by_template.get(&template.id);
                PlayerTourSlot {
                    template_id: template.id,
                    round_index: template.round_index,
                    start: template.start,
                    end: template.end,
                    tour: tour.cloned(),
                }
            })
            .collect();

        Ok(PlayerSchedule { player, slots })
    }

    pub fn cycle_schedule(&self, cycle_id: i64) -> SchedulingResult<Vec<CycleRoundView>> {
        let conn = database::get_connection(&self.pool)?;
        self.ensure_cycle(&conn, cycle_id)?;

        let templates = database::templates::list_by_cycle(&conn, cycle_id)?;
        let mut rounds = Vec::with_capacity(templates.len());
        for template in templates {
            let mut tours = Vec::new();
            for record in database::tours::list_by_template(&conn, template.id)? {
                let players = self.tour_players(&conn, record.id)?;
                tours.push(CycleTourView {
                    tour_id: record.id,
                    players,
                    status: record.status,
                    scheduled_time: record.scheduled_time,
                    responsible_player_id: record.responsible_player_id,
                });
            }
            rounds.push(CycleRoundView { template, tours });
        }
        Ok(rounds)
    }

    fn tour_players(
        &self,
        conn: &rusqlite::Connection,
        tour_id: i64,
    ) -> SchedulingResult<Vec<Player>> {
        let mut players = Vec::new();
        for player_id in database::tour_players::player_ids_by_tour(conn, tour_id)? {
            if let Some(player) = database::players::find_by_id(conn, player_id)? {
                players.push(player);
            }
        }
        Ok(players)
    }

    fn ensure_cycle(&self, conn: &rusqlite::Connection, cycle_id: i64) -> SchedulingResult<()> {
        if database::cycles::find_by_id(conn, cycle_id)?.is_none() {
            return Err(SchedulingError::NotFound(format!(
                "division cycle {cycle_id} does not exist"
            )));
        }
        Ok(())
    }

    fn player_tours_by_template(
        &self,
        conn: &rusqlite::Connection,
        templates: &[TourTemplateRecord],
        player_id: i64,
    ) -> SchedulingResult<HashMap<i64, PlayerTourInfo>> {
        let template_ids: HashMap<i64, ()> = templates.iter().map(|t| (t.id, ())).collect();

        let mut by_template = HashMap::new();
        for tour_id in database::tour_players::tour_ids_for_player(conn, player_id)? {
            let Some(tour) = database::tours::find_by_id(conn, tour_id)? else {
                continue;
            };
            if !template_ids.contains_key(&tour.template_id) {
                continue;
            }

            let members = database::tour_players::player_ids_by_tour(conn, tour_id)?;
            let opponent = match members.iter().copied().find(|id| *id != player_id) {
                Some(opponent_id) => database::players::find_by_id(conn, opponent_id)?,
                None => None,
            };

            by_template.insert(
                tour.template_id,
                PlayerTourInfo {
                    tour_id,
                    status: tour.status,
                    opponent,
                    scheduled_time: tour.scheduled_time,
                    responsible_player_id: tour.responsible_player_id,
                },
            );
        }
        Ok(by_template)
    }
}
