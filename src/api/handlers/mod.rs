use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::config::settings::AppConfig;
use crate::database::DbPool;
use crate::errors::SchedulingError;
use crate::scheduling::locks::CycleLocks;

pub mod cycles;
pub mod tours;

pub struct AppState {
    pub pool: DbPool,
    pub locks: Arc<CycleLocks>,
    pub config: AppConfig,
}

pub fn error_response(err: SchedulingError) -> Response {
    let status = match &err {
        SchedulingError::Validation(_) => StatusCode::BAD_REQUEST,
        SchedulingError::NotFound(_) => StatusCode::NOT_FOUND,
        SchedulingError::Conflict(_) => StatusCode::CONFLICT,
        SchedulingError::Internal(_) | SchedulingError::Store(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, err.to_string()).into_response()
}
