use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::availability::merge::{merge_points, IntervalKind, SlotPoint, TimeInterval};
use crate::availability::slots::SlotGrid;

/// One player's declaration for a tour, parsed: hours confirmed free and
/// hours confirmed busy. Hours in neither grid are unknown.
#[derive(Debug, Clone, Default)]
pub struct PlayerSlots {
    pub free: SlotGrid,
    pub busy: SlotGrid,
}

impl PlayerSlots {
    pub fn from_json(available: &str, unavailable: &str) -> Self {
        Self {
            free: SlotGrid::from_json(available),
            busy: SlotGrid::from_json(unavailable),
        }
    }
}

/// Ranked candidate windows for a pairing, plus which sides have answered at
/// all. Empty lists with a `false` flag mean "not answered yet", not
/// "nothing shared".
#[derive(Debug, Clone, Default)]
pub struct OverlapResult {
    pub confirmed: Vec<TimeInterval>,
    pub tentative: Vec<TimeInterval>,
    pub a_submitted: bool,
    pub b_submitted: bool,
}

impl OverlapResult {
    pub fn has_confirmed(&self) -> bool {
        !self.confirmed.is_empty()
    }

    pub fn has_tentative(&self) -> bool {
        !self.tentative.is_empty()
    }
}

/// Intersects two players' declarations.
///
/// Confirmed windows are exact matches of both players' free hours and always
/// win. Only when there is no confirmed overlap at all does the tentative
/// fallback run: an hour qualifies when neither player ruled it out and at
/// least one of them has not confirmed it, so the pairing still sees
/// candidate windows while negotiating. A missing declaration degrades to
/// empty output for that side.
pub fn compute_overlap(a: Option<&PlayerSlots>, b: Option<&PlayerSlots>) -> OverlapResult {
    let mut result = OverlapResult {
        a_submitted: a.is_some(),
        b_submitted: b.is_some(),
        ..OverlapResult::default()
    };

    let (Some(a), Some(b)) = (a, b) else {
        return result;
    };

    result.confirmed = confirmed_pass(a, b);
    if result.confirmed.is_empty() {
        result.tentative = tentative_pass(a, b);
    }
    result
}

fn confirmed_pass(a: &PlayerSlots, b: &PlayerSlots) -> Vec<TimeInterval> {
    let days: BTreeSet<NaiveDate> = a.free.days().chain(b.free.days()).collect();

    let mut points = Vec::new();
    for day in days {
        let hours_a = a.free.hours_on(day);
        let hours_b = b.free.hours_on(day);
        for hour in hours_a.intersection(&hours_b) {
            points.push(SlotPoint::new(day, *hour, IntervalKind::Confirmed));
        }
    }
    merge_points(&points)
}

fn tentative_pass(a: &PlayerSlots, b: &PlayerSlots) -> Vec<TimeInterval> {
    let days: BTreeSet<NaiveDate> = a
        .free
        .days()
        .chain(a.busy.days())
        .chain(b.free.days())
        .chain(b.busy.days())
        .collect();

    let mut points = Vec::new();
    for day in days {
        for hour in 0..24 {
            if a.busy.contains(day, hour) || b.busy.contains(day, hour) {
                continue;
            }
            let both_confirmed = a.free.contains(day, hour) && b.free.contains(day, hour);
            if !both_confirmed {
                points.push(SlotPoint::new(day, hour, IntervalKind::Tentative));
            }
        }
    }
    merge_points(&points)
}
