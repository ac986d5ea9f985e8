use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::formation::Formation;
use super::player::Player;
use super::tactic::Tactic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// Generic per-side container, used throughout the engine instead of a
/// string- or enum-keyed map for the two-sided data that recurs everywhere
/// (stats, lineups, set-piece takers, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerTeam<T> {
    pub home: T,
    pub away: T,
}

impl<T> PerTeam<T> {
    pub fn new(home: T, away: T) -> Self {
        PerTeam { home, away }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn get_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::Home => &mut self.home,
            Side::Away => &mut self.away,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Venue {
    Home,
    Neutral,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamInput {
    pub id: Uuid,
    pub name: String,
    pub short_name: String,
    pub primary_color: String,
}

/// Everything the engine needs at construction time. Read-only for
/// the lifetime of the match; the engine never mutates these.
#[derive(Debug, Clone)]
pub struct MatchInput {
    pub home_team: TeamInput,
    pub away_team: TeamInput,
    pub venue: Venue,
    pub home_starting_xi: Vec<Player>,
    pub home_bench: Vec<Player>,
    pub home_formation: Formation,
    pub home_tactic: Option<Tactic>,
    pub away_starting_xi: Vec<Player>,
    pub away_bench: Vec<Player>,
    pub away_formation: Formation,
    pub away_tactic: Option<Tactic>,
    pub seed: Option<u64>,
}
