use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::entities::{Player, Position, Side};
use crate::error::MatchError;

/// C3 Lineup Manager. Holds one side's on-pitch/bench/sent-off/subbed-off
/// sets and the assigned-position map, and enforces the substitution cap
/// and one-goalkeeper invariant.
#[derive(Debug, Clone)]
pub struct Lineup {
    pub side: Side,
    pub players: HashMap<Uuid, Player>,
    on_pitch: HashSet<Uuid>,
    bench: Vec<Uuid>,
    sent_off: HashSet<Uuid>,
    subbed_off: HashSet<Uuid>,
    subs_used: u8,
    assigned_position: HashMap<Uuid, Position>,
}

pub const MAX_SUBSTITUTIONS: u8 = 5;

impl Lineup {
    pub fn new(
        side: Side,
        starting_xi: Vec<Player>,
        bench_players: Vec<Player>,
        assigned_position: HashMap<Uuid, Position>,
    ) -> Self {
        let mut players = HashMap::new();
        let mut on_pitch = HashSet::new();
        for p in starting_xi {
            on_pitch.insert(p.id);
            players.insert(p.id, p);
        }
        let mut bench = Vec::new();
        for p in bench_players {
            bench.push(p.id);
            players.insert(p.id, p);
        }
        Lineup {
            side,
            players,
            on_pitch,
            bench,
            sent_off: HashSet::new(),
            subbed_off: HashSet::new(),
            subs_used: 0,
            assigned_position,
        }
    }

    /// On-pitch minus sent-off minus subbed-off.
    pub fn available_players(&self) -> Vec<Uuid> {
        self.on_pitch
            .iter()
            .filter(|id| !self.sent_off.contains(*id) && !self.subbed_off.contains(*id))
            .copied()
            .collect()
    }

    /// `available_players` excluding the current goalkeeper.
    pub fn available_outfield(&self) -> Vec<Uuid> {
        let gk = self.goalkeeper();
        self.available_players()
            .into_iter()
            .filter(|id| Some(*id) != gk)
            .collect()
    }

    /// The unique available player assigned `GK`, or `None` after a red
    /// card with no available replacement.
    pub fn goalkeeper(&self) -> Option<Uuid> {
        self.available_players()
            .into_iter()
            .find(|id| self.assigned_position.get(id) == Some(&Position::GK))
    }

    pub fn assigned_position(&self, id: Uuid) -> Option<Position> {
        self.assigned_position.get(&id).copied()
    }

    pub fn bench_ids(&self) -> Vec<Uuid> {
        self.bench.clone()
    }

    pub fn on_pitch_count(&self) -> usize {
        self.available_players().len()
    }

    pub fn subs_used(&self) -> u8 {
        self.subs_used
    }

    pub fn substitute(&mut self, out_id: Uuid, in_id: Uuid) -> Result<(), MatchError> {
        if self.subs_used >= MAX_SUBSTITUTIONS {
            return Err(MatchError::SubstitutionRefused {
                side: self.side,
                reason: "substitution cap reached".into(),
            });
        }
        if !self.on_pitch.contains(&out_id) || self.sent_off.contains(&out_id) {
            return Err(MatchError::SubstitutionRefused {
                side: self.side,
                reason: "outgoing player is not on the pitch".into(),
            });
        }
        if !self.bench.contains(&in_id) {
            return Err(MatchError::SubstitutionRefused {
                side: self.side,
                reason: "incoming player is not on the bench".into(),
            });
        }
        let position = self
            .assigned_position
            .get(&out_id)
            .copied()
            .unwrap_or(Position::CM);
        self.on_pitch.remove(&out_id);
        self.subbed_off.insert(out_id);
        self.bench.retain(|id| *id != in_id);
        self.on_pitch.insert(in_id);
        self.assigned_position.insert(in_id, position);
        self.subs_used += 1;
        Ok(())
    }

    /// Removes a player permanently. If they were the goalkeeper, forces a
    /// replacement: substitute in a fresh GK from the bench, sacrificing an
    /// outfield player to keep the side at eleven minus the sending-off, if
    /// a sub remains and an outfielder is available; otherwise re-assign an
    /// available outfield player to `GK`.
    pub fn send_off(&mut self, player_id: Uuid) {
        let was_gk = self.assigned_position.get(&player_id) == Some(&Position::GK);
        self.on_pitch.remove(&player_id);
        self.sent_off.insert(player_id);
        if was_gk {
            if self.subs_used < MAX_SUBSTITUTIONS {
                if let Some(replacement) = self.bench.first().copied() {
                    if let Some(sacrificed) = self.available_outfield().first().copied() {
                        self.bench.retain(|id| *id != replacement);
                        self.on_pitch.remove(&sacrificed);
                        self.subbed_off.insert(sacrificed);
                        self.on_pitch.insert(replacement);
                        self.assigned_position.insert(replacement, Position::GK);
                        self.subs_used += 1;
                        return;
                    }
                }
            }
            if let Some(fallback) = self.available_players().first().copied() {
                self.assigned_position.insert(fallback, Position::GK);
            }
        }
    }

    pub fn fresh_bench_option(&self, position: Position) -> Option<Uuid> {
        self.bench
            .iter()
            .find(|id| {
                self.players
                    .get(*id)
                    .map(|p| p.primary_position == position)
                    .unwrap_or(false)
            })
            .copied()
            .or_else(|| self.bench.first().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ATTRIBUTE_COUNT;

    fn dummy_player(pos: Position) -> Player {
        Player::new(Uuid::new_v4(), "P", 1, "NA", pos, [10u8; ATTRIBUTE_COUNT])
    }

    fn sample_lineup() -> Lineup {
        let mut xi = vec![dummy_player(Position::GK)];
        for _ in 0..10 {
            xi.push(dummy_player(Position::CM));
        }
        let bench = vec![dummy_player(Position::ST), dummy_player(Position::GK)];
        let mut assigned = HashMap::new();
        for p in xi.iter().chain(bench.iter()) {
            assigned.insert(p.id, p.primary_position);
        }
        Lineup::new(Side::Home, xi, bench, assigned)
    }

    #[test]
    fn available_players_excludes_sent_off_and_subbed_off() {
        let lineup = sample_lineup();
        assert_eq!(lineup.available_players().len(), 11);
    }

    #[test]
    fn substitution_cap_is_enforced() {
        let mut lineup = sample_lineup();
        let out = lineup.available_outfield()[0];
        let inn = lineup.fresh_bench_option(Position::ST).unwrap();
        assert!(lineup.substitute(out, inn).is_ok());
        let again = lineup.substitute(out, inn);
        assert!(matches!(
            again,
            Err(MatchError::SubstitutionRefused { .. })
        ));
    }

    #[test]
    fn send_off_removes_player_and_replaces_goalkeeper() {
        let mut lineup = sample_lineup();
        let gk = lineup.goalkeeper().unwrap();
        lineup.send_off(gk);
        assert_eq!(lineup.on_pitch_count(), 10);
        assert!(lineup.goalkeeper().is_some());
    }
}
