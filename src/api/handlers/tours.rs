use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json};

use super::{error_response, AppState};
use crate::api::models::{
    AvailabilityBody, AvailabilityResponse, OverlapParams, OverlapResponse, ProposeBody,
    RequestActionBody, ScheduleRequestResponse,
};
use crate::database::models::ScheduleRequestRow;
use crate::scheduling::stores::AvailabilityRecord;
use crate::services::availability::AvailabilityService;
use crate::services::requests::ScheduleRequestService;

pub async fn get_tour_overlap(
    State(state): State<Arc<AppState>>,
    Path(tour_id): Path<i64>,
    Query(params): Query<OverlapParams>,
) -> impl IntoResponse {
    let service = AvailabilityService::new(state.pool.clone());
    match service.tour_overlap(tour_id, params.player_a, params.player_b) {
        Ok(overlap) => {
            let result = overlap.result;
            Json(OverlapResponse {
                tour_id: overlap.tour_id,
                player_a_id: overlap.player_a_id,
                player_b_id: overlap.player_b_id,
                player_a_has_submitted: result.a_submitted,
                player_b_has_submitted: result.b_submitted,
                has_confirmed_matches: result.has_confirmed(),
                has_tentative_matches: result.has_tentative(),
                confirmed_intersections: result.confirmed,
                tentative_intersections: result.tentative,
            })
            .into_response()
        }
        Err(e) => error_response(e),
    }
}

pub async fn put_availability(
    State(state): State<Arc<AppState>>,
    Path((tour_id, player_id)): Path<(i64, i64)>,
    Json(body): Json<AvailabilityBody>,
) -> impl IntoResponse {
    let service = AvailabilityService::new(state.pool.clone());
    let saved = service.save_declaration(
        tour_id,
        player_id,
        &body.available.to_string(),
        &body.unavailable.to_string(),
    );

    match saved {
        Ok(record) => Json(availability_response(record)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn delete_availability(
    State(state): State<Arc<AppState>>,
    Path((tour_id, player_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    let service = AvailabilityService::new(state.pool.clone());
    match service.delete_declaration(tour_id, player_id) {
        Ok(()) => axum::http::StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn propose_request(
    State(state): State<Arc<AppState>>,
    Path(tour_id): Path<i64>,
    Json(body): Json<ProposeBody>,
) -> impl IntoResponse {
    let service = ScheduleRequestService::new(state.pool.clone());
    let created = service.propose(
        tour_id,
        body.initiator_player_id,
        body.proposed_date,
        &body.proposed_hours,
    );

    match created {
        Ok(request) => Json(request_response(request)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn accept_request(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<i64>,
    Json(body): Json<RequestActionBody>,
) -> impl IntoResponse {
    let service = ScheduleRequestService::new(state.pool.clone());
    match service.accept(request_id, body.player_id) {
        Ok(request) => Json(request_response(request)).into_response(),
        Err(e) => error_response(e),
    }
}

pub async fn decline_request(
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<i64>,
    Json(body): Json<RequestActionBody>,
) -> impl IntoResponse {
    let service = ScheduleRequestService::new(state.pool.clone());
    match service.decline(request_id, body.player_id) {
        Ok(request) => Json(request_response(request)).into_response(),
        Err(e) => error_response(e),
    }
}

fn availability_response(record: AvailabilityRecord) -> AvailabilityResponse {
    AvailabilityResponse {
        tour_id: record.tour_id,
        player_id: record.player_id,
        available: parse_or_null(&record.available_slots),
        unavailable: parse_or_null(&record.unavailable_slots),
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

fn request_response(row: ScheduleRequestRow) -> ScheduleRequestResponse {
    let proposed_hours: Vec<u32> = serde_json::from_str(&row.proposed_hours).unwrap_or_default();
    ScheduleRequestResponse {
        id: row.id,
        tour_id: row.tour_id,
        proposed_date: row.proposed_date,
        proposed_hours,
        initiator_player_id: row.initiator_player_id,
        recipient_player_id: row.recipient_player_id,
        status: row.status.as_str().to_string(),
    }
}

fn parse_or_null(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or(serde_json::Value::Null)
}
