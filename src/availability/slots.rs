use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use log::debug;

/// Day keys in declaration payloads, e.g. "28-02-2026".
pub const DAY_FORMAT: &str = "%d-%m-%Y";

/// Set of one-hour slots per calendar day, as declared by one player for one
/// tour. Stored as JSON text (`{"dd-MM-yyyy": [18, 19]}`) and parsed
/// leniently: anything malformed degrades to an empty grid, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotGrid {
    days: BTreeMap<NaiveDate, BTreeSet<u32>>,
}

impl SlotGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::new();
        }
        let parsed: HashMap<String, Vec<u32>> = match serde_json::from_str(raw) {
            Ok(map) => map,
            Err(e) => {
                debug!("Discarding malformed slot payload: {e}");
                return Self::new();
            }
        };

        let mut grid = Self::new();
        for (day_key, hours) in parsed {
            let Ok(day) = NaiveDate::parse_from_str(&day_key, DAY_FORMAT) else {
                debug!("Discarding slot day with bad key: {day_key}");
                continue;
            };
            for hour in hours {
                grid.insert(day, hour);
            }
        }
        grid
    }

    pub fn to_json(&self) -> String {
        let map: BTreeMap<String, Vec<u32>> = self
            .days
            .iter()
            .map(|(day, hours)| {
                (
                    day.format(DAY_FORMAT).to_string(),
                    hours.iter().copied().collect(),
                )
            })
            .collect();
        serde_json::to_string(&map).unwrap_or_else(|_| "{}".to_string())
    }

    /// Hours outside 0-23 are dropped.
    pub fn insert(&mut self, day: NaiveDate, hour: u32) {
        if hour < 24 {
            self.days.entry(day).or_default().insert(hour);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.days.values().all(|hours| hours.is_empty())
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn hours_on(&self, day: NaiveDate) -> BTreeSet<u32> {
        self.days.get(&day).cloned().unwrap_or_default()
    }

    pub fn contains(&self, day: NaiveDate, hour: u32) -> bool {
        self.days
            .get(&day)
            .map(|hours| hours.contains(&hour))
            .unwrap_or(false)
    }
}
