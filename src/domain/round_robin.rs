use crate::domain::models::{PlayerPair, Round};
use crate::errors::{SchedulingError, SchedulingResult};

/// Builds a round-robin plan with the circle method: every unordered pair of
/// players meets in exactly one round, and no player appears twice within a
/// round.
///
/// An odd roster gets a placeholder slot so the rotation works over an even
/// list; pairs involving the placeholder are dropped from the output, which
/// leaves one player idle ("bye") per round. The extra rotation cycle this
/// costs is why an odd roster produces N rounds instead of N-1.
pub fn build_rounds(player_ids: &[i64]) -> SchedulingResult<Vec<Round>> {
    validate_roster(player_ids)?;

    let mut slots: Vec<Option<i64>> = player_ids.iter().copied().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }

    let n = slots.len();
    let mut rounds = Vec::with_capacity(n - 1);
    for _ in 0..n - 1 {
        rounds.push(collect_round(&slots));
        rotate_keeping_first(&mut slots);
    }

    Ok(rounds)
}

/// Number of rounds a roster of `player_count` produces: N-1 when even,
/// N when odd.
pub fn expected_round_count(player_count: usize) -> usize {
    if player_count % 2 == 0 {
        player_count - 1
    } else {
        player_count
    }
}

fn validate_roster(player_ids: &[i64]) -> SchedulingResult<()> {
    if player_ids.len() < 2 {
        return Err(SchedulingError::validation(
            "need at least 2 players to build a round-robin plan",
        ));
    }
    let mut seen = std::collections::HashSet::new();
    for id in player_ids {
        if !seen.insert(*id) {
            return Err(SchedulingError::Validation(format!(
                "duplicate player id {id} in roster"
            )));
        }
    }
    Ok(())
}

fn collect_round(slots: &[Option<i64>]) -> Round {
    let n = slots.len();
    let mut pairs = Vec::with_capacity(n / 2);
    for i in 0..n / 2 {
        if let (Some(first), Some(second)) = (slots[i], slots[n - 1 - i]) {
            pairs.push(PlayerPair::new(first, second));
        }
    }
    pairs
}

/// First slot stays fixed, the rest shift cyclically by one.
fn rotate_keeping_first(slots: &mut [Option<i64>]) {
    slots[1..].rotate_right(1);
}
