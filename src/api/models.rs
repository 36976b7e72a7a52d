use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::availability::TimeInterval;
use crate::scheduling::regenerator::GenerationReport;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    pub start_date: String,
    pub tour_duration_days: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub tours_created: usize,
    pub availability_preserved: usize,
    pub dropped_declarations: Vec<DroppedDeclarationItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedDeclarationItem {
    pub player_id: i64,
    pub reason: &'static str,
}

impl From<GenerationReport> for GenerationResponse {
    fn from(report: GenerationReport) -> Self {
        Self {
            tours_created: report.tours_created,
            availability_preserved: report.availability_preserved,
            dropped_declarations: report
                .drops
                .iter()
                .map(|d| DroppedDeclarationItem {
                    player_id: d.player_id,
                    reason: d.reason.as_str(),
                })
                .collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapParams {
    pub player_a: i64,
    pub player_b: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapResponse {
    pub tour_id: i64,
    pub player_a_id: i64,
    pub player_b_id: i64,
    pub player_a_has_submitted: bool,
    pub player_b_has_submitted: bool,
    pub confirmed_intersections: Vec<TimeInterval>,
    pub tentative_intersections: Vec<TimeInterval>,
    pub has_confirmed_matches: bool,
    pub has_tentative_matches: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityBody {
    #[serde(default)]
    pub available: serde_json::Value,
    #[serde(default)]
    pub unavailable: serde_json::Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub tour_id: i64,
    pub player_id: i64,
    pub available: serde_json::Value,
    pub unavailable: serde_json::Value,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposeBody {
    pub initiator_player_id: i64,
    pub proposed_date: NaiveDate,
    pub proposed_hours: Vec<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestActionBody {
    pub player_id: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequestResponse {
    pub id: i64,
    pub tour_id: i64,
    pub proposed_date: NaiveDate,
    pub proposed_hours: Vec<u32>,
    pub initiator_player_id: i64,
    pub recipient_player_id: i64,
    pub status: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleRoundItem {
    pub template_id: i64,
    pub round_index: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub tours: Vec<CycleTourItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleTourItem {
    pub tour_id: i64,
    pub players: Vec<PlayerItem>,
    pub status: String,
    pub scheduled_time: Option<NaiveDateTime>,
    pub responsible_player_id: Option<i64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerItem {
    pub id: i64,
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerScheduleResponse {
    pub player: PlayerItem,
    pub slots: Vec<PlayerSlotItem>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSlotItem {
    pub template_id: i64,
    pub round_index: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub tour_id: Option<i64>,
    pub status: Option<String>,
    pub opponent: Option<PlayerItem>,
    pub scheduled_time: Option<NaiveDateTime>,
    pub responsible_player_id: Option<i64>,
}
