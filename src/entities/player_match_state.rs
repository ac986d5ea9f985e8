use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::position::Position;

/// Mutable per-player state carried in `Match State`. Default at
/// kickoff: fatigue 0, morale 7, no cards, no flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerMatchState {
    pub fatigue: f32,
    pub yellow_cards: u8,
    pub is_sent_off: bool,
    pub is_subbed_off: bool,
    pub goals: u8,
    pub assists: u8,
    pub morale: f32,
    pub assigned_position: Position,
}

impl PlayerMatchState {
    pub fn kickoff(assigned_position: Position) -> Self {
        PlayerMatchState {
            fatigue: 0.0,
            yellow_cards: 0,
            is_sent_off: false,
            is_subbed_off: false,
            goals: 0,
            assists: 0,
            morale: 7.0,
            assigned_position,
        }
    }
}

/// The memoised designated taker per side for corners, free kicks and
/// penalties. `None` until elected.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SetPieceTakers {
    pub corner: Option<Uuid>,
    pub free_kick: Option<Uuid>,
    pub penalty: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SetPieceKind {
    Corner,
    FreeKick,
    Penalty,
}
