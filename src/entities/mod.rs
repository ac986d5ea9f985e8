pub mod event;
pub mod formation;
pub mod player;
pub mod player_match_state;
pub mod position;
pub mod tactic;
pub mod team;
pub mod tick;

pub use event::{Action, EventKind, Step, TickEvent};
pub use formation::{Formation, FormationSlot};
pub use player::{Attribute, AttributeGroup, Player, ATTRIBUTE_COUNT};
pub use player_match_state::{PlayerMatchState, SetPieceKind, SetPieceTakers};
pub use position::{compatibility as position_compatibility, Position, PositionTable};
pub use tactic::{
    CreativeFreedom, Mentality, PassingDirectness, Pressing, Tactic, TacklingStyle, Tempo,
    TimeWasting, Width,
};
pub use team::{MatchInput, PerTeam, Side, TeamInput, Venue};
pub use tick::{Phase, Tick, TeamStats, Zone};
