use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Duration, NaiveDateTime};
use log::{info, warn};

use crate::domain::round_robin::{build_rounds, expected_round_count};
use crate::domain::{DropReason, Player, PlayerPair, Round, TourStatus};
use crate::errors::{SchedulingError, SchedulingResult};
use crate::scheduling::stores::{
    AvailabilityRecord, LeagueStore, NewAvailability, NewTour, TemplateWindow,
    TourRecord, TourTemplateRecord,
};

/// Outcome of a generate/regenerate run. `drops` explains which snapshotted
/// declarations could not be re-attributed; it is diagnostic and does not
/// affect success.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub tours_created: usize,
    pub availability_preserved: usize,
    pub drops: Vec<DroppedDeclaration>,
}

#[derive(Debug, Clone, Copy)]
pub struct DroppedDeclaration {
    pub player_id: i64,
    pub reason: DropReason,
}

struct GenerationParams {
    start: NaiveDateTime,
    duration_days: i64,
    old_templates: Vec<TourTemplateRecord>,
    old_tours: Vec<TourRecord>,
    old_availability: BTreeMap<i64, Vec<AvailabilityRecord>>,
    preserve: bool,
}

/// Materializes the derived schedule of one division cycle: tour templates,
/// tours and pairing links, with an optional best-effort carry-over of
/// availability declarations across a regeneration.
///
/// All writes go through the injected store; the caller owns atomicity (one
/// transaction around one call).
pub struct ScheduleRegenerator<'a, S: LeagueStore> {
    store: &'a mut S,
}

impl<'a, S: LeagueStore> ScheduleRegenerator<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Builds the cycle's schedule from scratch. Existing templates are
    /// cascaded away first; no availability is carried over.
    pub fn generate(
        &mut self,
        cycle_id: i64,
        start: NaiveDateTime,
        tour_duration_days: i64,
        now: NaiveDateTime,
    ) -> SchedulingResult<GenerationReport> {
        info!(
            "Generating round-robin schedule cycle={cycle_id} start={start} durationDays={tour_duration_days}"
        );
        if tour_duration_days <= 0 {
            return Err(SchedulingError::validation("tourDurationDays must be > 0"));
        }

        let players = self.load_roster(cycle_id)?;
        let old_templates = self.store.templates_in_cycle(cycle_id)?;
        if !old_templates.is_empty() {
            warn!("Existing templates found cycle={cycle_id}, deleting before creation");
        }
        let old_tours = self.collect_tours(&old_templates)?;

        let params = GenerationParams {
            start,
            duration_days: tour_duration_days,
            old_templates,
            old_tours,
            old_availability: BTreeMap::new(),
            preserve: false,
        };
        self.rebuild(cycle_id, &players, params, now)
    }

    /// Rebuilds an already-generated cycle in place, re-deriving the window
    /// layout from the existing templates and re-attributing declarations
    /// onto the new tours where the new plan still allows it.
    pub fn regenerate(
        &mut self,
        cycle_id: i64,
        now: NaiveDateTime,
    ) -> SchedulingResult<GenerationReport> {
        info!("Regenerating round-robin schedule cycle={cycle_id}");

        let players = self.load_roster(cycle_id)?;
        let old_templates = self.store.templates_in_cycle(cycle_id)?;
        let Some(first) = old_templates.first() else {
            return Err(SchedulingError::validation(
                "no existing tour templates for this cycle; run generate first",
            ));
        };

        let start = first.start;
        let duration_days = (first.end - first.start).num_days();
        let old_tours = self.collect_tours(&old_templates)?;
        let old_availability = self.collect_availability(&old_tours)?;

        let params = GenerationParams {
            start,
            duration_days,
            old_templates,
            old_tours,
            old_availability,
            preserve: true,
        };
        self.rebuild(cycle_id, &players, params, now)
    }

    fn load_roster(&mut self, cycle_id: i64) -> SchedulingResult<Vec<Player>> {
        if !self.store.cycle_exists(cycle_id)? {
            return Err(SchedulingError::NotFound(format!(
                "division cycle {cycle_id} does not exist"
            )));
        }
        let players = self.store.players_in_cycle(cycle_id)?;
        if players.len() < 2 {
            return Err(SchedulingError::validation(
                "need at least 2 players to generate tours",
            ));
        }
        Ok(players)
    }

    fn collect_tours(
        &mut self,
        templates: &[TourTemplateRecord],
    ) -> SchedulingResult<Vec<TourRecord>> {
        let mut tours = Vec::new();
        for template in templates {
            tours.extend(self.store.tours_by_template(template.id)?);
        }
        Ok(tours)
    }

    fn collect_availability(
        &mut self,
        tours: &[TourRecord],
    ) -> SchedulingResult<BTreeMap<i64, Vec<AvailabilityRecord>>> {
        let mut by_tour = BTreeMap::new();
        for tour in tours {
            let declarations = self.store.declarations_by_tour(tour.id)?;
            if !declarations.is_empty() {
                by_tour.insert(tour.id, declarations);
            }
        }
        Ok(by_tour)
    }

    fn rebuild(
        &mut self,
        cycle_id: i64,
        players: &[Player],
        params: GenerationParams,
        now: NaiveDateTime,
    ) -> SchedulingResult<GenerationReport> {
        let player_ids: Vec<i64> = players.iter().map(|p| p.id).collect();
        let round_count = expected_round_count(players.len());
        let windows = build_windows(params.start, params.duration_days, round_count);
        let plan = build_rounds(&player_ids)?;

        // Consistency gate before anything is written: the plan must line up
        // 1:1 with the windows about to be materialized.
        if plan.len() != windows.len() {
            return Err(SchedulingError::Internal(format!(
                "plan/template mismatch rounds={} templates={}",
                plan.len(),
                windows.len()
            )));
        }

        self.cascade_delete(&params.old_templates, &params.old_tours)?;

        let templates = self.store.create_templates(cycle_id, &windows)?;
        let tour_ids = self.persist_tours(&templates, &plan, now)?;

        let mut report = GenerationReport {
            tours_created: tour_ids.len(),
            ..GenerationReport::default()
        };
        if params.preserve {
            self.preserve_availability(&params, &templates, &plan, &tour_ids, &player_ids, now, &mut report)?;
        }

        info!(
            "Round-robin created cycle={cycle_id} templates={} tours={} preservedAvailability={}",
            templates.len(),
            report.tours_created,
            report.availability_preserved
        );
        Ok(report)
    }

    /// Destructive phase, in dependency order: negotiation rows, pairing
    /// links, tours, templates.
    fn cascade_delete(
        &mut self,
        templates: &[TourTemplateRecord],
        tours: &[TourRecord],
    ) -> SchedulingResult<()> {
        for tour in tours {
            let requests = self.store.request_ids_by_tour(tour.id)?;
            self.store.delete_requests(&requests)?;
            self.store.delete_links_for_tour(tour.id)?;
        }
        let tour_ids: Vec<i64> = tours.iter().map(|t| t.id).collect();
        self.store.delete_tours(&tour_ids)?;
        let template_ids: Vec<i64> = templates.iter().map(|t| t.id).collect();
        self.store.delete_templates(&template_ids)?;
        Ok(())
    }

    fn persist_tours(
        &mut self,
        templates: &[TourTemplateRecord],
        plan: &[Round],
        now: NaiveDateTime,
    ) -> SchedulingResult<HashMap<(usize, (i64, i64)), i64>> {
        let mut tour_ids = HashMap::new();
        let mut responsibility: HashMap<i64, u32> = HashMap::new();

        for (round_index, round) in plan.iter().enumerate() {
            let template = &templates[round_index];
            for pair in round {
                let responsible = select_responsible(pair, &mut responsibility);
                let tour_id = self.store.create_tour(&NewTour {
                    template_id: template.id,
                    status: TourStatus::Active,
                    responsible_player_id: responsible,
                    updated_at: now,
                })?;
                self.store.link_player(tour_id, pair.first)?;
                self.store.link_player(tour_id, pair.second)?;
                tour_ids.insert((round_index, pair.key()), tour_id);
            }
        }
        Ok(tour_ids)
    }

    #[allow(clippy::too_many_arguments)]
    fn preserve_availability(
        &mut self,
        params: &GenerationParams,
        new_templates: &[TourTemplateRecord],
        plan: &[Round],
        tour_ids: &HashMap<(usize, (i64, i64)), i64>,
        roster: &[i64],
        now: NaiveDateTime,
        report: &mut GenerationReport,
    ) -> SchedulingResult<()> {
        if params.old_availability.is_empty() {
            return Ok(());
        }

        let roster_ids: HashSet<i64> = roster.iter().copied().collect();
        let window_index: HashMap<(NaiveDateTime, NaiveDateTime), usize> = new_templates
            .iter()
            .enumerate()
            .map(|(idx, t)| ((t.start, t.end), idx))
            .collect();
        let old_tour_by_id: HashMap<i64, &TourRecord> =
            params.old_tours.iter().map(|t| (t.id, t)).collect();
        let old_template_by_id: HashMap<i64, &TourTemplateRecord> =
            params.old_templates.iter().map(|t| (t.id, t)).collect();

        for (old_tour_id, declarations) in &params.old_availability {
            let Some(old_tour) = old_tour_by_id.get(old_tour_id) else {
                continue;
            };
            let Some(old_template) = old_template_by_id.get(&old_tour.template_id) else {
                continue;
            };

            // New templates are matched by window value, not id: a roster
            // change can shrink the round count and leave tail windows with
            // no counterpart.
            let Some(&round_index) = window_index.get(&(old_template.start, old_template.end))
            else {
                for declaration in declarations {
                    drop_declaration(report, declaration.player_id, DropReason::TemplateMismatch);
                }
                continue;
            };

            for declaration in declarations {
                if !roster_ids.contains(&declaration.player_id) {
                    drop_declaration(report, declaration.player_id, DropReason::PlayerRemoved);
                    continue;
                }
                match self.reattach_declaration(declaration, round_index, &plan[round_index], tour_ids, now)? {
                    true => report.availability_preserved += 1,
                    false => {
                        drop_declaration(report, declaration.player_id, DropReason::NoMatchingPair)
                    }
                }
            }
        }
        Ok(())
    }

    fn reattach_declaration(
        &mut self,
        declaration: &AvailabilityRecord,
        round_index: usize,
        round: &[PlayerPair],
        tour_ids: &HashMap<(usize, (i64, i64)), i64>,
        now: NaiveDateTime,
    ) -> SchedulingResult<bool> {
        let Some(pair) = round.iter().find(|p| p.contains(declaration.player_id)) else {
            // The player drew a bye this round.
            return Ok(false);
        };
        let Some(&new_tour_id) = tour_ids.get(&(round_index, pair.key())) else {
            return Ok(false);
        };

        self.store.save_declaration(&NewAvailability {
            tour_id: new_tour_id,
            player_id: declaration.player_id,
            available_slots: declaration.available_slots.clone(),
            unavailable_slots: declaration.unavailable_slots.clone(),
            created_at: declaration.created_at,
            updated_at: Some(now),
        })?;
        Ok(true)
    }
}

fn build_windows(start: NaiveDateTime, duration_days: i64, count: usize) -> Vec<TemplateWindow> {
    let mut windows = Vec::with_capacity(count);
    let mut current = start;
    for round_index in 0..count {
        let end = current + Duration::days(duration_days);
        windows.push(TemplateWindow {
            round_index: round_index as i64,
            start: current,
            end,
        });
        current = end;
    }
    windows
}

/// Greedy booking-responsibility balancer: whoever has organized fewer tours
/// so far takes the next one; on a tie the lower player id wins, which keeps
/// regeneration reproducible.
fn select_responsible(pair: &PlayerPair, responsibility: &mut HashMap<i64, u32>) -> i64 {
    let count_first = responsibility.get(&pair.first).copied().unwrap_or(0);
    let count_second = responsibility.get(&pair.second).copied().unwrap_or(0);

    let responsible = if count_first < count_second {
        pair.first
    } else if count_second < count_first {
        pair.second
    } else {
        pair.first.min(pair.second)
    };

    *responsibility.entry(responsible).or_insert(0) += 1;
    responsible
}

fn drop_declaration(report: &mut GenerationReport, player_id: i64, reason: DropReason) {
    info!(
        "Dropping availability playerId={player_id} reason={}",
        reason.as_str()
    );
    report.drops.push(DroppedDeclaration { player_id, reason });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balancer_prefers_lower_count_then_lower_id() {
        let mut counts = HashMap::new();
        counts.insert(7i64, 2u32);
        counts.insert(3i64, 1u32);

        assert_eq!(select_responsible(&PlayerPair::new(7, 3), &mut counts), 3);
        // Now tied at 2: lower id wins.
        assert_eq!(select_responsible(&PlayerPair::new(7, 3), &mut counts), 3);
        assert_eq!(counts[&3], 3);
    }

    #[test]
    fn windows_are_consecutive() {
        let start = chrono::NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let windows = build_windows(start, 7, 3);

        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0].end, windows[1].start);
        assert_eq!(windows[1].end, windows[2].start);
        assert_eq!(windows[2].end - windows[2].start, Duration::days(7));
    }
}
