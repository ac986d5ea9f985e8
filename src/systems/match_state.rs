use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

use crate::entities::{
    Attribute, MatchInput, PerTeam, Phase, Player, PlayerMatchState, SetPieceKind, SetPieceTakers,
    Side, Tactic, TeamStats, Zone,
};
use crate::systems::attribute_resolver::AttributeResolver;
use crate::systems::lineup::Lineup;

/// C6 Match State. The only mutable data in the engine; single-writer,
/// owned exclusively by the tick loop for the lifetime of one match. Read
/// operations are pure snapshots; nothing outside `MatchEngine` mutates it.
pub struct MatchState {
    pub minute: u8,
    pub phase: Phase,
    pub possession: Side,
    pub zone: Zone,
    pub ball: (f32, f32),
    pub score: PerTeam<u8>,
    stats: PerTeam<TeamStats>,
    lineups: PerTeam<Lineup>,
    player_states: HashMap<Uuid, PlayerMatchState>,
    tactics: PerTeam<Tactic>,
    set_piece_takers: PerTeam<SetPieceTakers>,
    rng: StdRng,
}

impl MatchState {
    pub fn new(input: &MatchInput, lineups: PerTeam<Lineup>) -> Self {
        let mut player_states = HashMap::new();
        for side in [Side::Home, Side::Away] {
            let lineup = lineups.get(side);
            for id in lineup.available_players() {
                let position = lineup.assigned_position(id).unwrap_or(lineup.players[&id].primary_position);
                player_states.insert(id, PlayerMatchState::kickoff(position));
            }
            for id in lineup.bench_ids() {
                let pos = lineup.players[&id].primary_position;
                player_states.insert(id, PlayerMatchState::kickoff(pos));
            }
        }
        let rng = match input.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        MatchState {
            minute: 0,
            phase: Phase::Kickoff,
            possession: Side::Home,
            zone: Zone::Middle,
            ball: (50.0, 50.0),
            score: PerTeam::new(0, 0),
            stats: PerTeam::default(),
            lineups,
            player_states,
            tactics: PerTeam::new(
                input.home_tactic.unwrap_or_default(),
                input.away_tactic.unwrap_or_default(),
            ),
            set_piece_takers: PerTeam::default(),
            rng,
        }
    }

    pub fn lineup(&self, side: Side) -> &Lineup {
        self.lineups.get(side)
    }

    pub fn lineup_mut(&mut self, side: Side) -> &mut Lineup {
        self.lineups.get_mut(side)
    }

    pub fn player(&self, side: Side, id: Uuid) -> &Player {
        &self.lineups.get(side).players[&id]
    }

    /// Finds which side a player belongs to. Used by resolvers that only
    /// carry a bare player id (e.g. the defending goalkeeper for a shot).
    pub fn side_of(&self, id: Uuid) -> Option<Side> {
        if self.lineups.home.players.contains_key(&id) {
            Some(Side::Home)
        } else if self.lineups.away.players.contains_key(&id) {
            Some(Side::Away)
        } else {
            None
        }
    }

    pub fn player_states(&self) -> &HashMap<Uuid, PlayerMatchState> {
        &self.player_states
    }

    pub fn player_state(&self, id: Uuid) -> Option<&PlayerMatchState> {
        self.player_states.get(&id)
    }

    pub fn player_state_mut(&mut self, id: Uuid) -> Option<&mut PlayerMatchState> {
        self.player_states.get_mut(&id)
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn tactic(&self, side: Side) -> &Tactic {
        self.tactics.get(side)
    }

    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn set_piece_taker(&self, side: Side, kind: SetPieceKind) -> Option<Uuid> {
        let takers = self.set_piece_takers.get(side);
        match kind {
            SetPieceKind::Corner => takers.corner,
            SetPieceKind::FreeKick => takers.free_kick,
            SetPieceKind::Penalty => takers.penalty,
        }
    }

    pub fn set_set_piece_taker(&mut self, side: Side, kind: SetPieceKind, id: Option<Uuid>) {
        let takers = self.set_piece_takers.get_mut(side);
        match kind {
            SetPieceKind::Corner => takers.corner = id,
            SetPieceKind::FreeKick => takers.free_kick = id,
            SetPieceKind::Penalty => takers.penalty = id,
        }
    }

    pub fn stats(&self, side: Side) -> &TeamStats {
        self.stats.get(side)
    }

    pub fn stats_mut(&mut self, side: Side) -> &mut TeamStats {
        self.stats.get_mut(side)
    }

    pub fn stats_snapshot(&self) -> PerTeam<TeamStats> {
        self.stats.clone()
    }

    /// Effective value of one attribute for one player, folding in
    /// fatigue, position familiarity, tactic, home advantage and morale.
    pub fn effective(&self, resolver: &AttributeResolver, side: Side, id: Uuid, attribute: Attribute) -> f32 {
        let player = &self.lineups.get(side).players[&id];
        let state = &self.player_states[&id];
        resolver.effective(
            player.raw(attribute),
            player.primary_position,
            state,
            side,
            self.minute,
            self.tactics.get(side),
            attribute,
        )
    }

    /// Fixed delta table, clamped to `[1, 10]`.
    pub fn update_morale(&mut self, id: Uuid, reason: MoraleReason) {
        let delta = match reason {
            MoraleReason::GoalScored => 1.5,
            MoraleReason::Assist => 1.0,
            MoraleReason::YellowCard => -0.3,
            MoraleReason::RedCard => -3.0,
            MoraleReason::Conceded => -0.5,
            MoraleReason::Win => 1.0,
            MoraleReason::Loss => -1.0,
        };
        if let Some(state) = self.player_states.get_mut(&id) {
            state.morale = (state.morale + delta).clamp(1.0, 10.0);
        }
    }

    /// Nudges every on-pitch player's morale 5% toward neutral (7.0).
    /// Called once per minute.
    pub fn decay_morale(&mut self) {
        for side in [Side::Home, Side::Away] {
            let ids = self.lineups.get(side).available_players();
            for id in ids {
                if let Some(state) = self.player_states.get_mut(&id) {
                    state.morale += (7.0 - state.morale) * 0.05;
                }
            }
        }
    }

    /// Base 0.01/minute plus a pressing/tempo multiplier, plus 0.005
    /// for `work_rate >= 15`. Reset on substitution (the incoming player's
    /// state starts at the kickoff default, fatigue 0).
    pub fn update_fatigue(&mut self) {
        for side in [Side::Home, Side::Away] {
            let tactic = *self.tactics.get(side);
            let multiplier = tactic_fatigue_multiplier(&tactic);
            let ids = self.lineups.get(side).available_players();
            for id in ids {
                let work_rate = self.lineups.get(side).players[&id].raw(Attribute::WorkRate);
                let mut increment = 0.01 + multiplier;
                if work_rate >= 15 {
                    increment += 0.005;
                }
                if let Some(state) = self.player_states.get_mut(&id) {
                    state.fatigue = (state.fatigue + increment).min(1.0);
                }
            }
        }
    }

    pub fn record_goal(&mut self, scorer_side: Side, scorer: Uuid, assist: Option<Uuid>) {
        *self.score.get_mut(scorer_side) += 1;
        if let Some(state) = self.player_states.get_mut(&scorer) {
            state.goals += 1;
        }
        self.update_morale(scorer, MoraleReason::GoalScored);
        if let Some(assist_id) = assist {
            if let Some(state) = self.player_states.get_mut(&assist_id) {
                state.assists += 1;
            }
            self.update_morale(assist_id, MoraleReason::Assist);
        }
        let conceding_side = scorer_side.opponent();
        let conceding_ids = self.lineups.get(conceding_side).available_players();
        for id in conceding_ids {
            self.update_morale(id, MoraleReason::Conceded);
        }
    }

    pub fn send_off(&mut self, side: Side, id: Uuid) {
        self.lineups.get_mut(side).send_off(id);
        self.update_morale(id, MoraleReason::RedCard);
    }

    pub fn reassign_set_piece_takers_if_needed(&mut self, side: Side, player_selector: &crate::systems::player_selector::PlayerSelector) {
        for kind in [SetPieceKind::Corner, SetPieceKind::FreeKick, SetPieceKind::Penalty] {
            player_selector.select_set_piece_taker(self, side, kind);
        }
    }

    /// The side is considered below the playable threshold once it
    /// drops to 6 or fewer available players (the invariant allows exactly
    /// 7 before the loop terminates).
    pub fn side_below_threshold(&self, side: Side) -> bool {
        self.lineups.get(side).on_pitch_count() < 7
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoraleReason {
    GoalScored,
    Assist,
    YellowCard,
    RedCard,
    Conceded,
    Win,
    Loss,
}

fn tactic_fatigue_multiplier(tactic: &Tactic) -> f32 {
    use crate::entities::{Pressing, Tempo};
    let pressing = match tactic.pressing {
        Pressing::Rarely => 0.0,
        Pressing::Sometimes => 0.0025,
        Pressing::Often => 0.005,
        Pressing::Always => 0.0075,
    };
    let tempo = match tactic.tempo {
        Tempo::VerySlow => 0.0,
        Tempo::Slow => 0.001,
        Tempo::Standard => 0.002,
        Tempo::Fast => 0.0035,
        Tempo::VeryFast => 0.005,
    };
    pressing + tempo
}
