use chrono::{NaiveDate, Utc};
use log::{debug, info};

use crate::database::models::{NewScheduleRequest, ScheduleRequestRow};
use crate::database::{self, DbPool};
use crate::domain::RequestStatus;
use crate::errors::{SchedulingError, SchedulingResult};

/// Negotiation of a concrete playing time for one tour: the initiator
/// proposes a date plus candidate hours, the opponent accepts or declines.
/// Accepting stamps the tour as scheduled at the first proposed hour.
pub struct ScheduleRequestService {
    pool: DbPool,
}

impl ScheduleRequestService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn propose(
        &self,
        tour_id: i64,
        initiator_player_id: i64,
        proposed_date: NaiveDate,
        proposed_hours: &[u32],
    ) -> SchedulingResult<ScheduleRequestRow> {
        let conn = database::get_connection(&self.pool)?;

        if database::tours::find_by_id(&conn, tour_id)?.is_none() {
            return Err(SchedulingError::NotFound(format!(
                "tour {tour_id} does not exist"
            )));
        }
        let members = database::tour_players::player_ids_by_tour(&conn, tour_id)?;
        if !members.contains(&initiator_player_id) {
            return Err(SchedulingError::Validation(format!(
                "player {initiator_player_id} is not part of tour {tour_id}"
            )));
        }
        let recipient_player_id = members
            .iter()
            .copied()
            .find(|id| *id != initiator_player_id)
            .ok_or_else(|| {
                SchedulingError::Validation(format!("tour {tour_id} has no opponent to ask"))
            })?;

        if proposed_hours.is_empty() {
            return Err(SchedulingError::validation("at least one hour must be proposed"));
        }
        if proposed_hours.iter().any(|h| *h > 23) {
            return Err(SchedulingError::validation("proposed hours must be within 0-23"));
        }

        let request = database::schedule_requests::insert_request(
            &conn,
            &NewScheduleRequest {
                tour_id,
                proposed_date,
                proposed_hours: serde_json::to_string(proposed_hours)
                    .map_err(anyhow::Error::from)?,
                initiator_player_id,
                recipient_player_id,
                created_at: Utc::now().naive_utc(),
            },
        )?;
        info!(
            "Schedule request created id={} tour={tour_id} initiator={initiator_player_id} recipient={recipient_player_id}",
            request.id
        );
        Ok(request)
    }

    pub fn accept(
        &self,
        request_id: i64,
        acting_player_id: i64,
    ) -> SchedulingResult<ScheduleRequestRow> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction().map_err(anyhow::Error::from)?;
        let now = Utc::now().naive_utc();

        let request = self.load_pending_for_recipient(&tx, request_id, acting_player_id)?;
        database::schedule_requests::update_status(&tx, request_id, RequestStatus::Accepted, now)?;

        let scheduled_time = first_proposed_time(&request);
        if scheduled_time.is_none() {
            debug!("Request {request_id} carries no usable hours, tour scheduled without a time");
        }
        database::tours::mark_scheduled(&tx, request.tour_id, scheduled_time, now)?;

        let updated = database::schedule_requests::find_by_id(&tx, request_id)?
            .ok_or_else(|| SchedulingError::Internal("request missing after update".to_string()))?;
        tx.commit().map_err(anyhow::Error::from)?;

        info!("Schedule request accepted id={request_id} tour={}", request.tour_id);
        Ok(updated)
    }

    pub fn decline(
        &self,
        request_id: i64,
        acting_player_id: i64,
    ) -> SchedulingResult<ScheduleRequestRow> {
        let conn = database::get_connection(&self.pool)?;
        let now = Utc::now().naive_utc();

        let request = self.load_pending_for_recipient(&conn, request_id, acting_player_id)?;
        database::schedule_requests::update_status(&conn, request_id, RequestStatus::Declined, now)?;

        let updated = database::schedule_requests::find_by_id(&conn, request_id)?
            .ok_or_else(|| SchedulingError::Internal("request missing after update".to_string()))?;
        info!("Schedule request declined id={request_id} tour={}", request.tour_id);
        Ok(updated)
    }

    fn load_pending_for_recipient(
        &self,
        conn: &rusqlite::Connection,
        request_id: i64,
        acting_player_id: i64,
    ) -> SchedulingResult<ScheduleRequestRow> {
        let request = database::schedule_requests::find_by_id(conn, request_id)?
            .ok_or_else(|| {
                SchedulingError::NotFound(format!("schedule request {request_id} does not exist"))
            })?;

        if request.recipient_player_id != acting_player_id {
            return Err(SchedulingError::validation(
                "only the recipient can answer a schedule request",
            ));
        }
        if request.status != RequestStatus::Pending {
            return Err(SchedulingError::validation("schedule request is not pending"));
        }
        Ok(request)
    }
}

/// First proposed hour as a concrete time, if the payload yields one.
fn first_proposed_time(request: &ScheduleRequestRow) -> Option<chrono::NaiveDateTime> {
    let hours: Vec<u32> = serde_json::from_str(&request.proposed_hours).unwrap_or_default();
    let first = hours.first().copied()?;
    request.proposed_date.and_hms_opt(first, 0, 0)
}
