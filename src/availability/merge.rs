use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Strength of evidence behind a shared window: an explicit overlap of
/// confirmed-free hours, or merely the absence of conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalKind {
    Confirmed,
    Tentative,
}

/// One candidate hour on a specific day.
#[derive(Debug, Clone, Copy)]
pub struct SlotPoint {
    pub day: NaiveDate,
    pub hour: u32,
    pub kind: IntervalKind,
}

impl SlotPoint {
    pub fn new(day: NaiveDate, hour: u32, kind: IntervalKind) -> Self {
        Self { day, hour, kind }
    }
}

/// Half-open merged window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub kind: IntervalKind,
}

impl TimeInterval {
    pub fn covers(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at < self.end
    }
}

/// Merges one-hour points into minimal contiguous runs: sorted by start,
/// non-overlapping, and maximal (adjacent intervals of the same kind are
/// joined). Duplicate points collapse, so merging already-merged input is a
/// no-op.
pub fn merge_points(points: &[SlotPoint]) -> Vec<TimeInterval> {
    let mut intervals: Vec<TimeInterval> = points
        .iter()
        .filter_map(|p| hour_interval(p.day, p.hour, p.kind))
        .collect();
    intervals.sort_by_key(|iv| (iv.start, iv.kind));

    let mut merged: Vec<TimeInterval> = Vec::with_capacity(intervals.len());
    for next in intervals {
        match merged.last_mut() {
            Some(current) if next.start <= current.end && next.kind == current.kind => {
                current.end = current.end.max(next.end);
            }
            _ => merged.push(next),
        }
    }
    merged
}

fn hour_interval(day: NaiveDate, hour: u32, kind: IntervalKind) -> Option<TimeInterval> {
    let start = day.and_hms_opt(hour, 0, 0)?;
    Some(TimeInterval {
        start,
        end: start + Duration::hours(1),
        kind,
    })
}
