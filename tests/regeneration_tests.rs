mod support;

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use ladder_league::domain::DropReason;
use ladder_league::errors::SchedulingError;
use ladder_league::scheduling::regenerator::ScheduleRegenerator;
use support::{run_atomic, MemoryStore};

fn dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
}

fn start() -> NaiveDateTime {
    dt("2026-03-02T00:00:00")
}

fn now() -> NaiveDateTime {
    dt("2026-03-01T12:00:00")
}

fn seeded_store(player_count: usize) -> (MemoryStore, i64, Vec<i64>) {
    let mut store = MemoryStore::new();
    let cycle_id = store.add_cycle("division-1 spring");
    let mut players = Vec::new();
    for i in 0..player_count {
        let player_id = store.add_player(&format!("player-{i}"));
        store.assign(cycle_id, player_id);
        players.push(player_id);
    }
    (store, cycle_id, players)
}

#[test]
fn generate_even_roster_builds_full_round_robin() {
    let (mut store, cycle_id, players) = seeded_store(4);

    let report = ScheduleRegenerator::new(&mut store)
        .generate(cycle_id, start(), 7, now())
        .unwrap();

    assert_eq!(report.tours_created, 6);
    assert_eq!(report.availability_preserved, 0);
    assert_eq!(store.template_ids().len(), 3);
    assert_eq!(store.tour_ids().len(), 6);

    // Every unordered pair of the roster got exactly one tour.
    for (i, a) in players.iter().enumerate() {
        for b in players.iter().skip(i + 1) {
            assert!(
                store.tour_for_pair(*a, *b).is_some(),
                "no tour for pair ({a}, {b})"
            );
        }
    }
}

#[test]
fn generate_builds_consecutive_template_windows() {
    let (mut store, cycle_id, _) = seeded_store(4);

    ScheduleRegenerator::new(&mut store)
        .generate(cycle_id, start(), 7, now())
        .unwrap();

    let mut templates: Vec<_> = store.state.templates.values().cloned().collect();
    templates.sort_by_key(|t| t.round_index);

    assert_eq!(templates[0].start, start());
    for pair in templates.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
        assert_eq!((pair[0].end - pair[0].start).num_days(), 7);
    }
}

#[test]
fn generate_odd_roster_has_one_bye_per_round() {
    let (mut store, cycle_id, players) = seeded_store(5);

    let report = ScheduleRegenerator::new(&mut store)
        .generate(cycle_id, start(), 7, now())
        .unwrap();

    // 5 players: 5 rounds of 2 pairs, C(5,2) = 10 tours in total.
    assert_eq!(store.template_ids().len(), 5);
    assert_eq!(report.tours_created, 10);

    for round_index in 0..5 {
        let playing: Vec<i64> = players
            .iter()
            .copied()
            .filter(|p| store.tour_in_round_for_player(round_index, *p).is_some())
            .collect();
        assert_eq!(playing.len(), 4, "round {round_index} must rest exactly one player");
    }
}

#[test]
fn generate_balances_booking_responsibility() {
    let (mut store, cycle_id, _) = seeded_store(4);

    ScheduleRegenerator::new(&mut store)
        .generate(cycle_id, start(), 7, now())
        .unwrap();

    let counts = store.responsibility_counts();
    let min = counts.values().min().copied().unwrap();
    let max = counts.values().max().copied().unwrap();
    assert_eq!(counts.values().sum::<usize>(), 6);
    assert!(max - min <= 1, "greedy balancer must keep the spread at 1: {counts:?}");
}

#[test]
fn generation_is_deterministic() {
    let build = || {
        let (mut store, cycle_id, _) = seeded_store(6);
        ScheduleRegenerator::new(&mut store)
            .generate(cycle_id, start(), 7, now())
            .unwrap();
        let assignments: BTreeMap<Vec<i64>, i64> = store
            .tour_ids()
            .into_iter()
            .map(|tour_id| {
                (
                    store.players_of_tour(tour_id),
                    store.state.tours[&tour_id].responsible_player_id,
                )
            })
            .collect();
        assignments
    };

    assert_eq!(build(), build());
}

#[test]
fn generate_rejects_missing_cycle_and_thin_roster() {
    let mut store = MemoryStore::new();
    let result = ScheduleRegenerator::new(&mut store).generate(99, start(), 7, now());
    assert!(matches!(result, Err(SchedulingError::NotFound(_))));

    let cycle_id = store.add_cycle("empty division");
    let lonely = store.add_player("lonely");
    store.assign(cycle_id, lonely);
    let result = ScheduleRegenerator::new(&mut store).generate(cycle_id, start(), 7, now());
    assert!(matches!(result, Err(SchedulingError::Validation(_))));
}

#[test]
fn generate_rejects_non_positive_duration() {
    let (mut store, cycle_id, _) = seeded_store(4);
    let result = ScheduleRegenerator::new(&mut store).generate(cycle_id, start(), 0, now());
    assert!(matches!(result, Err(SchedulingError::Validation(_))));
    assert!(store.template_ids().is_empty());
}

#[test]
fn generate_over_existing_schedule_replaces_it() {
    let (mut store, cycle_id, _) = seeded_store(4);

    ScheduleRegenerator::new(&mut store)
        .generate(cycle_id, start(), 7, now())
        .unwrap();
    let first_templates = store.template_ids();
    let first_tours = store.tour_ids();

    ScheduleRegenerator::new(&mut store)
        .generate(cycle_id, start(), 7, now())
        .unwrap();

    assert_eq!(store.template_ids().len(), 3);
    assert_eq!(store.tour_ids().len(), 6);
    for old in first_templates {
        assert!(!store.template_ids().contains(&old));
    }
    for old in first_tours {
        assert!(!store.tour_ids().contains(&old));
    }
}

#[test]
fn regenerate_requires_prior_generation() {
    let (mut store, cycle_id, _) = seeded_store(4);
    let result = ScheduleRegenerator::new(&mut store).regenerate(cycle_id, now());
    assert!(matches!(result, Err(SchedulingError::Validation(_))));
}

#[test]
fn regenerate_preserves_matching_declarations_and_reports_drops() {
    let (mut store, cycle_id, players) = seeded_store(4);
    let (p1, p2, _p3, p4) = (players[0], players[1], players[2], players[3]);

    ScheduleRegenerator::new(&mut store)
        .generate(cycle_id, start(), 7, now())
        .unwrap();

    // Round 0 pairs a seeded roster of four as (p1, p4) and (p2, p3).
    let tour_p1_p4 = store.tour_for_pair(p1, p4).unwrap();
    let tour_p2_p3 = store.tour_in_round_for_player(0, p2).unwrap();
    let declared_at = dt("2026-02-20T10:00:00");
    store.add_declaration(tour_p1_p4, p1, r#"{"02-03-2026": [18]}"#, "", declared_at);
    store.add_declaration(tour_p1_p4, p4, r#"{"02-03-2026": [19]}"#, "", declared_at);
    store.add_declaration(tour_p2_p3, p2, r#"{"03-03-2026": [20, 21]}"#, "", declared_at);

    store.remove_from_roster(cycle_id, p4);
    let regen_time = dt("2026-03-05T09:00:00");
    let report = ScheduleRegenerator::new(&mut store)
        .regenerate(cycle_id, regen_time)
        .unwrap();

    // Three players leave three rounds; (p2, p3) still meet in round 0, so
    // p2's declaration travels to the new tour.
    assert_eq!(report.tours_created, 3);
    assert_eq!(report.availability_preserved, 1);

    let new_tour = store.tour_in_round_for_player(0, p2).unwrap();
    assert_ne!(new_tour, tour_p2_p3);
    let preserved: Vec<_> = store
        .state
        .declarations
        .values()
        .filter(|d| d.tour_id == new_tour)
        .collect();
    assert_eq!(preserved.len(), 1);
    assert_eq!(preserved[0].player_id, p2);
    assert_eq!(preserved[0].available_slots, r#"{"03-03-2026": [20, 21]}"#);
    assert_eq!(preserved[0].created_at, declared_at);
    assert_eq!(preserved[0].updated_at, Some(regen_time));

    // p4 left the league, and p1 now sits out round 0.
    let reasons: Vec<(i64, DropReason)> =
        report.drops.iter().map(|d| (d.player_id, d.reason)).collect();
    assert!(reasons.contains(&(p4, DropReason::PlayerRemoved)));
    assert!(reasons.contains(&(p1, DropReason::NoMatchingPair)));
}

#[test]
fn regenerate_drops_declarations_without_a_matching_window() {
    let (mut store, cycle_id, players) = seeded_store(6);
    let p1 = players[0];

    ScheduleRegenerator::new(&mut store)
        .generate(cycle_id, start(), 7, now())
        .unwrap();

    // A declaration on the last of five rounds. Shrinking the roster to four
    // players leaves only three windows, so that window disappears.
    let late_tour = store.tour_in_round_for_player(4, p1).unwrap();
    store.add_declaration(late_tour, p1, r#"{"30-03-2026": [18]}"#, "", now());

    store.remove_from_roster(cycle_id, players[4]);
    store.remove_from_roster(cycle_id, players[5]);
    let report = ScheduleRegenerator::new(&mut store)
        .regenerate(cycle_id, now())
        .unwrap();

    assert_eq!(store.template_ids().len(), 3);
    assert_eq!(report.availability_preserved, 0);
    let reasons: Vec<(i64, DropReason)> =
        report.drops.iter().map(|d| (d.player_id, d.reason)).collect();
    assert!(reasons.contains(&(p1, DropReason::TemplateMismatch)));
}

#[test]
fn regenerate_keeps_the_window_layout_of_the_old_schedule() {
    let (mut store, cycle_id, _) = seeded_store(4);

    ScheduleRegenerator::new(&mut store)
        .generate(cycle_id, start(), 10, now())
        .unwrap();
    let mut old_windows: Vec<_> = store
        .state
        .templates
        .values()
        .map(|t| (t.start, t.end))
        .collect();
    old_windows.sort();

    ScheduleRegenerator::new(&mut store)
        .regenerate(cycle_id, now())
        .unwrap();
    let mut new_windows: Vec<_> = store
        .state
        .templates
        .values()
        .map(|t| (t.start, t.end))
        .collect();
    new_windows.sort();

    assert_eq!(old_windows, new_windows);
}

#[test]
fn regenerate_clears_pending_negotiation_state() {
    let (mut store, cycle_id, players) = seeded_store(4);

    ScheduleRegenerator::new(&mut store)
        .generate(cycle_id, start(), 7, now())
        .unwrap();
    let tour = store.tour_in_round_for_player(0, players[0]).unwrap();
    store.add_pending_request(tour);

    ScheduleRegenerator::new(&mut store)
        .regenerate(cycle_id, now())
        .unwrap();

    assert!(store.state.requests.is_empty());
}

#[test]
fn failed_regeneration_leaves_the_store_untouched() {
    let (mut store, cycle_id, players) = seeded_store(4);

    ScheduleRegenerator::new(&mut store)
        .generate(cycle_id, start(), 7, now())
        .unwrap();
    let tour = store.tour_in_round_for_player(0, players[0]).unwrap();
    store.add_declaration(tour, players[0], r#"{"02-03-2026": [18]}"#, "", now());

    let templates_before = store.template_ids();
    let tours_before = store.tour_ids();
    let declarations_before = store.declaration_ids();

    // Fail between the destructive and the constructive phase; the unit of
    // work must roll everything back.
    store.fail_on_create_templates = true;
    let result = run_atomic(&mut store, |s| {
        ScheduleRegenerator::new(s).regenerate(cycle_id, now())
    });

    assert!(matches!(result, Err(SchedulingError::Store(_))));
    assert_eq!(store.template_ids(), templates_before);
    assert_eq!(store.tour_ids(), tours_before);
    assert_eq!(store.declaration_ids(), declarations_before);
}
