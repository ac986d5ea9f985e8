use serde::{Deserialize, Serialize};

use super::event::TickEvent;
use super::team::{PerTeam, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Kickoff,
    OpenPlay,
    HalfTime,
    FullTime,
    /// Emitted as the terminal tick when an `InternalInvariantViolated`
    /// error cuts the stream short.
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Defensive,
    Middle,
    Final,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TeamStats {
    pub possession_pct: f32,
    pub shots: u16,
    pub shots_on_target: u16,
    pub corners: u16,
    pub fouls: u16,
    pub yellow_cards: u16,
    pub red_cards: u16,
    pub saves: u16,
    pub passes: u16,
    pub tackles: u16,
    pub interceptions: u16,
    pub clearances: u16,
    pub offsides: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tick {
    pub minute: u8,
    pub phase: Phase,
    pub possession: Side,
    pub zone: Zone,
    pub events: Vec<TickEvent>,
    pub score: (u8, u8),
    pub stats: PerTeam<TeamStats>,
    pub ball: (f32, f32),
    pub commentary: String,
}
