use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// League player. Immutable as far as scheduling is concerned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
}

/// Unordered pair of distinct players. Equality and hashing ignore order, so
/// {A, B} and {B, A} are the same pair.
#[derive(Debug, Clone, Copy)]
pub struct PlayerPair {
    pub first: i64,
    pub second: i64,
}

impl PlayerPair {
    pub fn new(first: i64, second: i64) -> Self {
        Self { first, second }
    }

    pub fn contains(&self, player_id: i64) -> bool {
        self.first == player_id || self.second == player_id
    }

    pub fn opponent_of(&self, player_id: i64) -> Option<i64> {
        if self.first == player_id {
            Some(self.second)
        } else if self.second == player_id {
            Some(self.first)
        } else {
            None
        }
    }

    /// Order-independent key, usable for map lookups.
    pub fn key(&self) -> (i64, i64) {
        if self.first <= self.second {
            (self.first, self.second)
        } else {
            (self.second, self.first)
        }
    }
}

impl PartialEq for PlayerPair {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for PlayerPair {}

impl Hash for PlayerPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// One round of the plan: non-overlapping pairs played in the same template
/// slot. With an odd roster one player sits the round out.
pub type Round = Vec<PlayerPair>;

/// Tour lifecycle. Transitions past `Active` are owned by the negotiation
/// workflow, not the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TourStatus {
    Active,
    Scheduled,
    Walkover,
    Completed,
    Cancelled,
}

impl TourStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TourStatus::Active => "Active",
            TourStatus::Scheduled => "Scheduled",
            TourStatus::Walkover => "Walkover",
            TourStatus::Completed => "Completed",
            TourStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Active" => Some(TourStatus::Active),
            "Scheduled" => Some(TourStatus::Scheduled),
            "Walkover" => Some(TourStatus::Walkover),
            "Completed" => Some(TourStatus::Completed),
            "Cancelled" => Some(TourStatus::Cancelled),
            _ => None,
        }
    }
}

/// Schedule-request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Accepted,
    Declined,
    Expired,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Accepted => "Accepted",
            RequestStatus::Declined => "Declined",
            RequestStatus::Expired => "Expired",
            RequestStatus::Cancelled => "Cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Pending" => Some(RequestStatus::Pending),
            "Accepted" => Some(RequestStatus::Accepted),
            "Declined" => Some(RequestStatus::Declined),
            "Expired" => Some(RequestStatus::Expired),
            "Cancelled" => Some(RequestStatus::Cancelled),
            _ => None,
        }
    }
}

/// Why a snapshotted availability declaration could not be carried onto the
/// regenerated schedule. Diagnostic only, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DropReason {
    TemplateMismatch,
    PlayerRemoved,
    NoMatchingPair,
}

impl DropReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropReason::TemplateMismatch => "template_mismatch",
            DropReason::PlayerRemoved => "player_removed",
            DropReason::NoMatchingPair => "no_matching_pair",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_equality_ignores_order() {
        assert_eq!(PlayerPair::new(1, 2), PlayerPair::new(2, 1));
        assert_ne!(PlayerPair::new(1, 2), PlayerPair::new(1, 3));
    }

    #[test]
    fn pair_opponent_lookup() {
        let pair = PlayerPair::new(4, 9);
        assert_eq!(pair.opponent_of(4), Some(9));
        assert_eq!(pair.opponent_of(9), Some(4));
        assert_eq!(pair.opponent_of(5), None);
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            TourStatus::Active,
            TourStatus::Scheduled,
            TourStatus::Walkover,
            TourStatus::Completed,
            TourStatus::Cancelled,
        ] {
            assert_eq!(TourStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TourStatus::parse("unknown"), None);
    }
}
