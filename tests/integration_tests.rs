use std::collections::HashSet;

use match_engine::{
    Formation, FormationSlot, MatchBatchResult, MatchEngine, MatchInput, Phase, Player, Position,
    Side, Tactic, TeamInput, Venue, ATTRIBUTE_COUNT,
};
use uuid::Uuid;

fn player(pos: Position, attrs: [u8; ATTRIBUTE_COUNT], name: &str) -> Player {
    Player::new(Uuid::new_v4(), name, 1, "NA", pos, attrs)
}

fn flat_attrs(value: u8) -> [u8; ATTRIBUTE_COUNT] {
    [value; ATTRIBUTE_COUNT]
}

fn standard_formation() -> Formation {
    let layout = [
        (5.0, 50.0, Position::GK),
        (20.0, 20.0, Position::CB),
        (20.0, 40.0, Position::CB),
        (20.0, 60.0, Position::RB),
        (20.0, 80.0, Position::LB),
        (40.0, 30.0, Position::DM),
        (40.0, 70.0, Position::CM),
        (60.0, 50.0, Position::AM),
        (75.0, 20.0, Position::RW),
        (75.0, 80.0, Position::LW),
        (90.0, 50.0, Position::ST),
    ];
    let slots: Vec<FormationSlot> = layout
        .iter()
        .map(|(x, y, p)| FormationSlot { x: *x, y: *y, position: *p })
        .collect();
    Formation { slots: slots.try_into().unwrap() }
}

fn basic_input(seed: u64, home_tactic: Tactic, away_tactic: Tactic) -> MatchInput {
    let formation = standard_formation();
    let mut home_xi = Vec::new();
    let mut away_xi = Vec::new();
    for i in 0..11 {
        let pos = formation.slots[i].position;
        home_xi.push(player(pos, flat_attrs(12), &format!("Home {i}")));
        away_xi.push(player(pos, flat_attrs(12), &format!("Away {i}")));
    }
    let home_bench: Vec<Player> = (0..5).map(|i| player(Position::CM, flat_attrs(11), &format!("HomeSub {i}"))).collect();
    let away_bench: Vec<Player> = (0..5).map(|i| player(Position::CM, flat_attrs(11), &format!("AwaySub {i}"))).collect();

    MatchInput {
        home_team: TeamInput { id: Uuid::new_v4(), name: "Home FC".into(), short_name: "HFC".into(), primary_color: "red".into() },
        away_team: TeamInput { id: Uuid::new_v4(), name: "Away FC".into(), short_name: "AFC".into(), primary_color: "blue".into() },
        venue: Venue::Home,
        home_starting_xi: home_xi,
        home_bench,
        home_formation: formation.clone(),
        home_tactic: Some(home_tactic),
        away_starting_xi: away_xi,
        away_bench,
        away_formation: formation,
        away_tactic: Some(away_tactic),
        seed: Some(seed),
    }
}

fn sample_input(seed: u64) -> MatchInput {
    basic_input(seed, Tactic::balanced(), Tactic::balanced())
}

fn run(seed: u64) -> MatchBatchResult {
    MatchEngine::new(sample_input(seed)).unwrap().run_to_completion()
}

/// Quantitative bands, averaged over three fixed seeds against default
/// (balanced/balanced) inputs.
#[test]
fn quantitative_bands_hold_over_three_seeds() {
    let seeds = [11u64, 22, 33];
    let mut total_passes = 0u32;
    let mut total_shots = 0u32;
    let mut total_fouls = 0u32;
    let mut total_offsides = 0u32;
    let mut minutes_with_events = 0u32;
    let mut total_minutes = 0u32;

    for seed in seeds {
        let result = run(seed);
        for tick in &result.minutes {
            total_minutes += 1;
            if !tick.events.is_empty() {
                minutes_with_events += 1;
            }
        }
        let stats = result.full_time_stats;
        total_passes += (stats.home.passes + stats.away.passes) as u32;
        total_shots += (stats.home.shots + stats.away.shots) as u32;
        total_fouls += (stats.home.fouls + stats.away.fouls) as u32;
        total_offsides += (stats.home.offsides + stats.away.offsides) as u32;
    }

    let runs = seeds.len() as u32;
    let avg_passes = total_passes / runs;
    let avg_shots = total_shots / runs;
    let avg_fouls = total_fouls / runs;
    let avg_offsides = total_offsides / runs;

    assert!((400..=1500).contains(&avg_passes), "avg passes {avg_passes} outside band");
    assert!((10..=45).contains(&avg_shots), "avg shots {avg_shots} outside band");
    assert!((5..=40).contains(&avg_fouls), "avg fouls {avg_fouls} outside band");
    assert!(avg_offsides <= 15, "avg offsides {avg_offsides} exceeds band");

    let coverage = minutes_with_events as f32 / total_minutes as f32;
    assert!(coverage >= 0.70, "only {:.2} of minutes carried an event", coverage);
}

/// Ultra-attacking vs. ultra-defensive: home should out-shoot away and draw
/// at least as many fouls, matching the tactic-extremity scenario.
#[test]
fn ultra_attacking_outshoots_ultra_defensive() {
    let mut attacking = Tactic::balanced();
    attacking.mentality = match_engine::Mentality::VeryAttacking;
    attacking.pressing = match_engine::Pressing::Always;
    attacking.passing_directness = match_engine::PassingDirectness::Direct;
    attacking.tackle_harder = true;

    let mut defensive = Tactic::balanced();
    defensive.mentality = match_engine::Mentality::VeryDefensive;
    defensive.pressing = match_engine::Pressing::Rarely;
    defensive.passing_directness = match_engine::PassingDirectness::Short;
    defensive.time_wasting = match_engine::TimeWasting::Always;

    let seeds = [5u64, 6, 7];
    let mut home_shots_total = 0u32;
    let mut away_shots_total = 0u32;
    let mut home_fouls_total = 0u32;
    let mut away_fouls_total = 0u32;

    for seed in seeds {
        let input = basic_input(seed, attacking.clone(), defensive.clone());
        let result = MatchEngine::new(input).unwrap().run_to_completion();
        let stats = result.full_time_stats;
        home_shots_total += stats.home.shots as u32;
        away_shots_total += stats.away.shots as u32;
        home_fouls_total += stats.home.fouls as u32;
        away_fouls_total += stats.away.fouls as u32;
    }

    assert!(home_shots_total > away_shots_total, "home {home_shots_total} vs away {away_shots_total}");
    assert!(
        home_fouls_total as f32 >= 0.7 * away_fouls_total as f32,
        "home fouls {home_fouls_total} too far below away fouls {away_fouls_total}"
    );
}

/// Extreme 0-0-10 formation (one keeper, ten strikers) must still complete
/// without surfacing an error, and generate a realistic volume of passes.
#[test]
fn extreme_formation_completes_without_error() {
    let layout = [(5.0, 50.0, Position::GK)]
        .into_iter()
        .chain((0..10).map(|i| (80.0, 10.0 * i as f32, Position::ST)))
        .collect::<Vec<_>>();
    let slots: Vec<FormationSlot> = layout
        .iter()
        .map(|(x, y, p)| FormationSlot { x: *x, y: *y, position: *p })
        .collect();
    let formation = Formation { slots: slots.try_into().unwrap() };

    let mut home_xi = Vec::new();
    let mut away_xi = Vec::new();
    for i in 0..11 {
        let pos = formation.slots[i].position;
        home_xi.push(player(pos, flat_attrs(12), &format!("Home {i}")));
        away_xi.push(player(pos, flat_attrs(12), &format!("Away {i}")));
    }
    assert!(home_xi.iter().skip(1).all(|p| p.primary_position == Position::ST));

    let home_bench: Vec<Player> = (0..5).map(|i| player(Position::ST, flat_attrs(11), &format!("HomeSub {i}"))).collect();
    let away_bench: Vec<Player> = (0..5).map(|i| player(Position::ST, flat_attrs(11), &format!("AwaySub {i}"))).collect();

    let input = MatchInput {
        home_team: TeamInput { id: Uuid::new_v4(), name: "Home FC".into(), short_name: "HFC".into(), primary_color: "red".into() },
        away_team: TeamInput { id: Uuid::new_v4(), name: "Away FC".into(), short_name: "AFC".into(), primary_color: "blue".into() },
        venue: Venue::Neutral,
        home_starting_xi: home_xi,
        home_bench,
        home_formation: formation.clone(),
        home_tactic: Some(Tactic::balanced()),
        away_starting_xi: away_xi,
        away_bench,
        away_formation: formation,
        away_tactic: Some(Tactic::balanced()),
        seed: Some(404),
    };

    let result = MatchEngine::new(input).unwrap().run_to_completion();
    assert_eq!(result.minutes.last().unwrap().phase, Phase::FullTime);
    let total_passes = (result.full_time_stats.home.passes + result.full_time_stats.away.passes) as u32;
    assert!(total_passes > 100, "expected a realistic passing volume, got {total_passes}");
}

/// A match with no tactic supplied on either side falls back to the default
/// balanced profile and still completes cleanly.
#[test]
fn null_tactic_falls_back_to_balanced_and_completes() {
    let formation = standard_formation();
    let mut home_xi = Vec::new();
    let mut away_xi = Vec::new();
    for i in 0..11 {
        let pos = formation.slots[i].position;
        home_xi.push(player(pos, flat_attrs(12), &format!("Home {i}")));
        away_xi.push(player(pos, flat_attrs(12), &format!("Away {i}")));
    }
    let home_bench: Vec<Player> = (0..5).map(|i| player(Position::CM, flat_attrs(11), &format!("HomeSub {i}"))).collect();
    let away_bench: Vec<Player> = (0..5).map(|i| player(Position::CM, flat_attrs(11), &format!("AwaySub {i}"))).collect();

    let input = MatchInput {
        home_team: TeamInput { id: Uuid::new_v4(), name: "Home FC".into(), short_name: "HFC".into(), primary_color: "red".into() },
        away_team: TeamInput { id: Uuid::new_v4(), name: "Away FC".into(), short_name: "AFC".into(), primary_color: "blue".into() },
        venue: Venue::Home,
        home_starting_xi: home_xi,
        home_bench,
        home_formation: formation.clone(),
        home_tactic: None,
        away_starting_xi: away_xi,
        away_bench,
        away_formation: formation,
        away_tactic: None,
        seed: Some(909),
    };

    let result = MatchEngine::new(input).unwrap().run_to_completion();
    assert_eq!(result.minutes.last().unwrap().phase, Phase::FullTime);
}

/// Set-piece takers should stay stable across a match rather than rotating
/// freely: at most two distinct corner takers per side.
#[test]
fn corner_taker_consistency_per_side() {
    let result = run(303);
    let mut home_takers = HashSet::new();
    let mut away_takers = HashSet::new();
    for tick in &result.minutes {
        for event in &tick.events {
            if event.kind == match_engine::EventKind::Corner {
                match event.team {
                    Side::Home => home_takers.insert(event.primary_player_id),
                    Side::Away => away_takers.insert(event.primary_player_id),
                };
            }
        }
    }
    assert!(home_takers.len() <= 2, "home used {} distinct corner takers", home_takers.len());
    assert!(away_takers.len() <= 2, "away used {} distinct corner takers", away_takers.len());
}

/// A player sent off must never appear as an actor again, at any step of
/// any later tick, across several seeds likely to produce a red card.
#[test]
fn red_carded_players_never_reappear() {
    let mut brutal = Tactic::balanced();
    brutal.tackling = match_engine::TacklingStyle::GetStuckIn;
    brutal.tackle_harder = true;

    for seed in [1u64, 2, 3, 4, 5] {
        let input = basic_input(seed, brutal.clone(), brutal.clone());
        let result = MatchEngine::new(input).unwrap().run_to_completion();

        let mut sent_off: HashSet<Uuid> = HashSet::new();
        for tick in &result.minutes {
            for event in &tick.events {
                if event.kind == match_engine::EventKind::Card && event.outcome.as_deref() == Some("red") {
                    sent_off.insert(event.primary_player_id);
                }
                assert!(!sent_off.contains(&event.primary_player_id), "sent-off player reappeared as primary actor");
                if let Some(secondary) = event.secondary_player_id {
                    assert!(!sent_off.contains(&secondary), "sent-off player reappeared as secondary actor");
                }
                for step in &event.sequence {
                    assert!(!sent_off.contains(&step.actor_id), "sent-off player reappeared in a step");
                }
            }
        }
    }
}

/// A centre-back fielded out of position at striker should have a strictly
/// lower position-familiarity multiplier than the same player at centre-back.
#[test]
fn position_mismatch_lowers_compatibility() {
    let at_natural = match_engine::position_compatibility(Position::CB, Position::CB);
    let at_mismatch = match_engine::position_compatibility(Position::CB, Position::ST);
    assert!(at_mismatch < at_natural);
}

/// A goalkeeper fielded at an outfield slot should suffer the catastrophic
/// ≥30% reduction.
#[test]
fn goalkeeper_outfield_catastrophic_reduction() {
    let at_goal = match_engine::position_compatibility(Position::GK, Position::GK);
    let at_outfield = match_engine::position_compatibility(Position::GK, Position::ST);
    assert!(at_outfield <= at_goal * 0.7);
}

/// Deterministic replay: identical seed and inputs must reproduce byte-
/// identical minute counts and final scores.
#[test]
fn identical_seed_reproduces_identical_outcome() {
    let a = run(123);
    let b = run(123);
    assert_eq!(a.final_score.home, b.final_score.home);
    assert_eq!(a.final_score.away, b.final_score.away);
    assert_eq!(a.minutes.len(), b.minutes.len());
    for (ta, tb) in a.minutes.iter().zip(b.minutes.iter()) {
        assert_eq!(ta.minute, tb.minute);
        assert_eq!(ta.events.len(), tb.events.len());
    }
}
