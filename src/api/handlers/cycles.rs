use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json};

use super::{error_response, AppState};
use crate::api::models::{
    CycleRoundItem, CycleTourItem, GenerateBody, GenerationResponse, PlayerItem,
    PlayerScheduleResponse, PlayerSlotItem,
};
use crate::domain::Player;
use crate::errors::SchedulingError;
use crate::services::generation::{parse_start_date, GenerationService};
use crate::services::schedule::ScheduleViewService;

const API_ACTOR: &str = "api";

pub async fn generate_schedule(
    State(state): State<Arc<AppState>>,
    Path(cycle_id): Path<i64>,
    Json(body): Json<GenerateBody>,
) -> impl IntoResponse {
    let start = match parse_start_date(&body.start_date) {
        Ok(start) => start,
        Err(e) => {
            return error_response(SchedulingError::Validation(format!("bad startDate: {e}")))
        }
    };
    let duration_days = body
        .tour_duration_days
        .unwrap_or(state.config.scheduling.default_tour_duration_days);

    let service = GenerationService::new(state.pool.clone(), state.locks.clone());
    match service.generate(cycle_id, start, duration_days, API_ACTOR) {
        Ok(report) => Json(GenerationResponse::from(report)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn regenerate_schedule(
    State(state): State<Arc<AppState>>,
    Path(cycle_id): Path<i64>,
) -> impl IntoResponse {
    let service = GenerationService::new(state.pool.clone(), state.locks.clone());
    match service.regenerate(cycle_id, API_ACTOR) {
        Ok(report) => Json(GenerationResponse::from(report)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn get_cycle_schedule(
    State(state): State<Arc<AppState>>,
    Path(cycle_id): Path<i64>,
) -> impl IntoResponse {
    let service = ScheduleViewService::new(state.pool.clone());
    let rounds = match service.cycle_schedule(cycle_id) {
        Ok(rounds) => rounds,
        Err(e) => return error_response(e),
    };

    let items: Vec<CycleRoundItem> = rounds
        .into_iter()
        .map(|round| CycleRoundItem {
            template_id: round.template.id,
            round_index: round.template.round_index,
            start_date: round.template.start,
            end_date: round.template.end,
            tours: round
                .tours
                .into_iter()
                .map(|tour| CycleTourItem {
                    tour_id: tour.tour_id,
                    players: tour.players.iter().map(player_item).collect(),
                    status: tour.status.as_str().to_string(),
                    scheduled_time: tour.scheduled_time,
                    responsible_player_id: tour.responsible_player_id,
                })
                .collect(),
        })
        .collect();

    Json(items).into_response()
}

pub async fn get_player_schedule(
    State(state): State<Arc<AppState>>,
    Path((cycle_id, player_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    let service = ScheduleViewService::new(state.pool.clone());
    let schedule = match service.player_schedule(cycle_id, player_id) {
        Ok(schedule) => schedule,
        Err(e) => return error_response(e),
    };

    let slots: Vec<PlayerSlotItem> = schedule
        .slots
        .into_iter()
        .map(|slot| {
            let tour = slot.tour;
            PlayerSlotItem {
                template_id: slot.template_id,
                round_index: slot.round_index,
                start_date: slot.start,
                end_date: slot.end,
                tour_id: tour.as_ref().map(|t| t.tour_id),
                status: tour.as_ref().map(|t| t.status.as_str().to_string()),
                opponent: tour
                    .as_ref()
                    .and_then(|t| t.opponent.as_ref())
                    .map(player_item),
                scheduled_time: tour.as_ref().and_then(|t| t.scheduled_time),
                responsible_player_id: tour.as_ref().and_then(|t| t.responsible_player_id),
            }
        })
        .collect();

    Json(PlayerScheduleResponse {
        player: player_item(&schedule.player),
        slots,
    })
    .into_response()
}

fn player_item(player: &Player) -> PlayerItem {
    PlayerItem {
        id: player.id,
        name: player.name.clone(),
    }
}
