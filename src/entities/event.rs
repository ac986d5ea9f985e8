use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::team::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Pass,
    Shoot,
    Header,
    Cross,
    Dribble,
    SkillMove,
    Run,
    Save,
    Tackle,
    Clearance,
    Foul,
    Interception,
}

/// A sub-second animation atom within an event's `sequence`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub action: Action,
    pub actor_id: Uuid,
    pub actor_name: String,
    pub ball_start: (f32, f32),
    pub ball_end: (f32, f32),
    pub target_id: Option<Uuid>,
    pub duration_ms: u16,
}

impl Step {
    pub fn clamp_duration(duration_ms: u16) -> u16 {
        duration_ms.clamp(100, 2000)
    }
}

/// The tagged-variant dispatch key for event resolvers: a sum type in
/// place of a string-tag dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    OpenPlay,
    ShotOnTarget,
    ShotOffTarget,
    ShotBlocked,
    Goal,
    Pass,
    Interception,
    Tackle,
    Foul,
    FreeKick,
    Penalty,
    Corner,
    Card,
    Substitution,
    Offside,
    ThrowIn,
    GoalKick,
    Save,
}

impl EventKind {
    /// "Shots total" counts every shot-kind event, including blocked
    /// shots, even though `shot_blocked` does not increment
    /// `shots_on_target`.
    pub fn is_shot(self) -> bool {
        matches!(
            self,
            EventKind::ShotOnTarget
                | EventKind::ShotOffTarget
                | EventKind::ShotBlocked
                | EventKind::Goal
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickEvent {
    pub kind: EventKind,
    pub team: Side,
    pub primary_player_id: Uuid,
    pub primary_player_name: String,
    pub secondary_player_id: Option<Uuid>,
    pub outcome: Option<String>,
    pub description: String,
    pub coordinates: (f32, f32),
    pub sequence: Vec<Step>,
}
