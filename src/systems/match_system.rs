use std::collections::{HashMap, HashSet};

use rand::Rng;
use uuid::Uuid;

use crate::entities::{
    EventKind, MatchInput, PerTeam, Phase, Player, Position, PositionTable, Side, Tick, TickEvent,
};
use crate::error::{MatchError, MatchResult};
use crate::systems::attribute_resolver::AttributeResolver;
use crate::systems::chain::{ChainQueue, PendingEvent, MAX_CHAIN_DEPTH};
use crate::systems::lineup::Lineup;
use crate::systems::match_state::MatchState;
use crate::systems::player_selector::PlayerSelector;
use crate::systems::resolvers::Resolvers;

/// C7 Tick Loop. Advances one minute at a time, lazily: `next()` drains
/// the causal chain, or failing that samples one open-play primary event,
/// then drives fatigue/morale decay and assembles the minute's `Tick`.
/// Restartable only by constructing a new `MatchEngine`; there is no
/// rewind. The only suspension point is "between ticks".
pub struct MatchEngine {
    state: MatchState,
    position_table: PositionTable,
    chain: ChainQueue,
    next_minute: u8,
    finished: bool,
}

const SUBSTITUTION_WINDOW_START: u8 = 45;

impl MatchEngine {
    /// Validates the lineup shape before yielding the first tick.
    /// Only `InvalidLineup`/`FormationMissing` ever escape construction.
    pub fn new(input: MatchInput) -> MatchResult<Self> {
        validate_side(Side::Home, &input.home_starting_xi, &input.home_bench)?;
        validate_side(Side::Away, &input.away_starting_xi, &input.away_bench)?;

        let home_formation = input
            .home_formation
            .clone()
            .validated()
            .ok_or(MatchError::FormationMissing { side: Side::Home })?;
        let away_formation = input
            .away_formation
            .clone()
            .validated()
            .ok_or(MatchError::FormationMissing { side: Side::Away })?;

        let home_lineup = build_lineup(Side::Home, &input.home_starting_xi, &input.home_bench, &home_formation);
        let away_lineup = build_lineup(Side::Away, &input.away_starting_xi, &input.away_bench, &away_formation);

        let mut state = MatchState::new(&input, PerTeam::new(home_lineup, away_lineup));
        let position_table = PositionTable::build();
        {
            let resolver = AttributeResolver::new(&position_table);
            let selector = PlayerSelector::new(&resolver);
            state.reassign_set_piece_takers_if_needed(Side::Home, &selector);
            state.reassign_set_piece_takers_if_needed(Side::Away, &selector);
        }

        Ok(MatchEngine {
            state,
            position_table,
            chain: ChainQueue::new(),
            next_minute: 0,
            finished: false,
        })
    }

    /// Drains the lazy tick sequence into `{lineups, minutes, final_score,
    /// full_time_stats}`.
    pub fn run_to_completion(mut self) -> MatchBatchResult {
        let mut minutes = Vec::new();
        while let Some(tick) = self.next() {
            minutes.push(tick);
        }
        let final_score = self.state.score.clone();
        let full_time_stats = self.state.stats_snapshot();
        MatchBatchResult {
            minutes,
            final_score,
            full_time_stats,
        }
    }

    fn advance(&mut self) -> Option<Tick> {
        if self.finished {
            return None;
        }
        let minute = self.next_minute;
        if minute > 90 {
            self.finished = true;
            return None;
        }

        if minute == SUBSTITUTION_WINDOW_START {
            self.next_minute = minute + 1;
            return Some(self.assemble_tick(minute, Phase::HalfTime, Vec::new()));
        }

        let resolver = AttributeResolver::new(&self.position_table);
        let selector = PlayerSelector::new(&resolver);
        let resolvers = Resolvers::new(&resolver, &selector);

        let mut events = Vec::new();
        let mut drained_any = false;
        let mut depth = 0;
        while let Some(item) = self.chain.pop() {
            drained_any = true;
            depth += 1;
            if depth > MAX_CHAIN_DEPTH {
                break;
            }
            if let Some(event) = self.resolve_pending(&resolvers, item) {
                events.push(event);
            }
        }

        if !drained_any {
            let kind = resolvers.sample_primary_kind(&self.state);
            if let Some(event) = self.resolve_primary(&resolvers, kind) {
                events.push(event);
            }
        }

        if minute > SUBSTITUTION_WINDOW_START {
            if let Some(event) = self.maybe_substitute(&resolvers, Side::Home) {
                events.push(event);
            }
            if let Some(event) = self.maybe_substitute(&resolvers, Side::Away) {
                events.push(event);
            }
        }

        self.state.update_fatigue();
        self.state.decay_morale();

        let home_below = self.state.side_below_threshold(Side::Home);
        let away_below = self.state.side_below_threshold(Side::Away);
        let terminate_early = home_below || away_below;

        let phase = if terminate_early || minute == 90 {
            Phase::FullTime
        } else if minute == 0 {
            Phase::Kickoff
        } else {
            Phase::OpenPlay
        };

        let mut tick = self.assemble_tick(minute, phase, events);

        if let Err(detail) = check_invariants(&tick) {
            log::error!("internal invariant violated at minute {minute}: {detail}");
            tick.phase = Phase::Error;
            tick.commentary = detail;
            self.finished = true;
            return Some(tick);
        }

        if terminate_early || minute == 90 {
            self.finished = true;
        } else {
            self.next_minute = minute + 1;
        }
        Some(tick)
    }

    fn resolve_primary(&mut self, resolvers: &Resolvers, kind: EventKind) -> Option<TickEvent> {
        match kind {
            EventKind::OpenPlay => resolvers.resolve_open_play(&mut self.state),
            EventKind::Pass => resolvers.resolve_pass(&mut self.state, &mut self.chain),
            EventKind::Tackle => resolvers.resolve_tackle(&mut self.state, &mut self.chain),
            EventKind::ShotOnTarget | EventKind::ShotOffTarget | EventKind::ShotBlocked | EventKind::Goal => {
                resolvers.resolve_shot(&mut self.state, &mut self.chain)
            }
            EventKind::Foul => resolvers.resolve_foul_event(&mut self.state, &mut self.chain),
            EventKind::ThrowIn => {
                let (side, origin) = (self.state.possession, self.state.ball);
                resolvers.resolve_throw_in(&mut self.state, side, origin)
            }
            EventKind::Offside => resolvers.resolve_offside(&mut self.state),
            // Never sampled as a primary kind; demoted to open play if it
            // ever is (a resolver failure demotes to a safe alternative).
            _ => resolvers.resolve_open_play(&mut self.state),
        }
    }

    fn resolve_pending(&mut self, resolvers: &Resolvers, item: PendingEvent) -> Option<TickEvent> {
        match item {
            PendingEvent::FreeKick { side, origin } => {
                resolvers.resolve_free_kick(&mut self.state, side, origin, &mut self.chain)
            }
            PendingEvent::Penalty { side } => resolvers.resolve_penalty(&mut self.state, side),
            PendingEvent::Corner { side, origin } => {
                self.state.ball = origin;
                resolvers.resolve_corner(&mut self.state, side, &mut self.chain)
            }
            PendingEvent::CornerFollowUp { side } => resolvers.resolve_corner_follow_up(&mut self.state, side),
            PendingEvent::ThrowIn { side, origin } => resolvers.resolve_throw_in(&mut self.state, side, origin),
            PendingEvent::GoalKick { side } => resolvers.resolve_goal_kick(&mut self.state, side),
            PendingEvent::Card { side, player_id, severe } => {
                resolvers.resolve_card(&mut self.state, side, player_id, severe)
            }
            PendingEvent::Counter { side, origin } => {
                self.state.possession = side;
                self.state.ball = origin;
                resolvers.resolve_open_play(&mut self.state)
            }
        }
    }

    /// Substitution window: minute 45-90, capped at 5/side, a modest
    /// per-minute chance rather than a forced swap every minute.
    fn maybe_substitute(&mut self, resolvers: &Resolvers, side: Side) -> Option<TickEvent> {
        if self.state.lineup(side).subs_used() >= 5 {
            return None;
        }
        if self.state.rng_mut().gen_range(0.0..1.0) > 0.04 {
            return None;
        }
        resolvers.resolve_substitution(&mut self.state, side)
    }

    fn assemble_tick(&self, minute: u8, phase: Phase, events: Vec<TickEvent>) -> Tick {
        let commentary = events
            .last()
            .map(|e| e.description.clone())
            .unwrap_or_else(|| "Play continues.".to_string());
        Tick {
            minute,
            phase,
            possession: self.state.possession,
            zone: self.state.zone,
            events,
            score: (self.state.score.home, self.state.score.away),
            stats: self.state.stats_snapshot(),
            ball: self.state.ball,
            commentary,
        }
    }
}

impl Iterator for MatchEngine {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        self.advance()
    }
}

/// The batch interface: drains the whole tick sequence at once.
pub struct MatchBatchResult {
    pub minutes: Vec<Tick>,
    pub final_score: PerTeam<u8>,
    pub full_time_stats: PerTeam<crate::entities::TeamStats>,
}

/// A lightweight post-tick safety net, not a re-derivation of every
/// resolver's own bookkeeping. The resolvers already clamp coordinates and
/// the lineup manager already enforces the substitution cap and the
/// one-goalkeeper rule; this just catches the case where a future resolver
/// change breaks one of those guarantees, and turns it into an `error`
/// phase/tick instead of a silent bad tick or a panic.
fn check_invariants(tick: &Tick) -> Result<(), String> {
    if !(-1.0..=101.0).contains(&tick.ball.0) || !(-1.0..=101.0).contains(&tick.ball.1) {
        return Err(format!("ball position {:?} outside of pitch tolerance", tick.ball));
    }
    for event in &tick.events {
        for step in &event.sequence {
            if step.duration_ms < 100 || step.duration_ms > 2000 {
                return Err(format!(
                    "step duration {}ms for actor {} outside [100, 2000]",
                    step.duration_ms, step.actor_id
                ));
            }
        }
    }
    Ok(())
}

fn validate_side(side: Side, starting_xi: &[Player], bench: &[Player]) -> MatchResult<()> {
    if starting_xi.len() != 11 {
        return Err(MatchError::invalid_lineup(
            side,
            format!("starting XI has {} players, expected 11", starting_xi.len()),
        ));
    }
    let gk_count = starting_xi.iter().filter(|p| p.primary_position == Position::GK).count();
    if gk_count == 0 {
        return Err(MatchError::invalid_lineup(side, "no goalkeeper named in starting XI"));
    }
    let mut seen = HashSet::new();
    for player in starting_xi.iter().chain(bench.iter()) {
        if !seen.insert(player.id) {
            return Err(MatchError::invalid_lineup(side, format!("duplicate player {}", player.id)));
        }
    }
    if bench.len() > 9 {
        return Err(MatchError::invalid_lineup(side, format!("bench has {} players, max 9", bench.len())));
    }
    Ok(())
}

fn build_lineup(
    side: Side,
    starting_xi: &[Player],
    bench: &[Player],
    formation: &crate::entities::Formation,
) -> Lineup {
    let mut assigned: HashMap<Uuid, Position> = HashMap::new();
    for (player, slot) in starting_xi.iter().zip(formation.slots.iter()) {
        assigned.insert(player.id, slot.position);
    }
    for player in bench {
        assigned.insert(player.id, player.primary_position);
    }
    Lineup::new(side, starting_xi.to_vec(), bench.to_vec(), assigned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Formation, FormationSlot, Tactic, TeamInput, Venue, ATTRIBUTE_COUNT};

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
        Formation {
            slots: slots.try_into().unwrap(),
        }
    }

    fn sample_input(seed: u64) -> MatchInput {
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
            home_tactic: Some(Tactic::balanced()),
            away_starting_xi: away_xi,
            away_bench,
            away_formation: formation,
            away_tactic: Some(Tactic::balanced()),
            seed: Some(seed),
        }
    }

    #[test]
    fn invalid_lineup_rejected_before_first_tick() {
        let mut input = sample_input(1);
        input.home_starting_xi.pop();
        assert!(matches!(MatchEngine::new(input), Err(MatchError::InvalidLineup { .. })));
    }

    #[test]
    fn minutes_strictly_increase_and_terminate_at_full_time() {
        let engine = MatchEngine::new(sample_input(42)).unwrap();
        let result = engine.run_to_completion();
        let mut last = -1i16;
        for tick in &result.minutes {
            assert!((tick.minute as i16) > last);
            last = tick.minute as i16;
        }
        assert_eq!(result.minutes.last().unwrap().phase, Phase::FullTime);
    }

    #[test]
    fn score_is_monotonically_non_decreasing() {
        let engine = MatchEngine::new(sample_input(7)).unwrap();
        let result = engine.run_to_completion();
        let mut prev = (0u8, 0u8);
        for tick in &result.minutes {
            assert!(tick.score.0 >= prev.0);
            assert!(tick.score.1 >= prev.1);
            prev = tick.score;
        }
    }

    #[test]
    fn ball_coordinates_stay_within_tolerance() {
        let engine = MatchEngine::new(sample_input(99)).unwrap();
        let result = engine.run_to_completion();
        for tick in &result.minutes {
            assert!(tick.ball.0 >= -1.0 && tick.ball.0 <= 101.0);
            assert!(tick.ball.1 >= -1.0 && tick.ball.1 <= 101.0);
        }
    }

    #[test]
    fn same_seed_is_deterministic() {
        let a = MatchEngine::new(sample_input(123)).unwrap().run_to_completion();
        let b = MatchEngine::new(sample_input(123)).unwrap().run_to_completion();
        assert_eq!(a.final_score.home, b.final_score.home);
        assert_eq!(a.final_score.away, b.final_score.away);
        assert_eq!(a.minutes.len(), b.minutes.len());
    }

    #[test]
    fn check_invariants_flags_ball_out_of_tolerance() {
        let mut tick = MatchEngine::new(sample_input(1))
            .unwrap()
            .run_to_completion()
            .minutes
            .remove(0);
        tick.ball = (150.0, 50.0);
        assert!(check_invariants(&tick).is_err());
    }

    #[test]
    fn check_invariants_passes_for_well_formed_tick() {
        let result = MatchEngine::new(sample_input(2)).unwrap().run_to_completion();
        for tick in &result.minutes {
            assert!(check_invariants(tick).is_ok());
        }
    }
}
