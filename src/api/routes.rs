use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;

use crate::api::handlers::cycles::{
    generate_schedule, get_cycle_schedule, get_player_schedule, regenerate_schedule,
};
use crate::api::handlers::tours::{
    accept_request, decline_request, delete_availability, get_tour_overlap, propose_request,
    put_availability,
};
use crate::api::handlers::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/cycles/:cycle_id/generate", post(generate_schedule))
        .route("/api/cycles/:cycle_id/regenerate", post(regenerate_schedule))
        .route("/api/cycles/:cycle_id/schedule", get(get_cycle_schedule))
        .route(
            "/api/cycles/:cycle_id/players/:player_id/schedule",
            get(get_player_schedule),
        )
        .route("/api/tours/:tour_id/overlap", get(get_tour_overlap))
        .route(
            "/api/tours/:tour_id/availability/:player_id",
            put(put_availability).delete(delete_availability),
        )
        .route("/api/tours/:tour_id/requests", post(propose_request))
        .route("/api/requests/:request_id/accept", post(accept_request))
        .route("/api/requests/:request_id/decline", post(decline_request))
        .with_state(state)
}
