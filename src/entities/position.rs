use serde::{Deserialize, Serialize};

/// One of the sixteen fixed position tags a player or formation slot can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    GK,
    CB,
    LB,
    RB,
    WB,
    SW,
    DM,
    CM,
    AM,
    LM,
    RM,
    LW,
    RW,
    ST,
    CF,
    F9,
}

impl Position {
    pub const ALL: [Position; 16] = [
        Position::GK,
        Position::CB,
        Position::LB,
        Position::RB,
        Position::WB,
        Position::SW,
        Position::DM,
        Position::CM,
        Position::AM,
        Position::LM,
        Position::RM,
        Position::LW,
        Position::RW,
        Position::ST,
        Position::CF,
        Position::F9,
    ];

    /// Tactical "line" a position sits on, used to derive compatibility.
    /// Not meaningful for `GK`, which is handled separately.
    fn line(self) -> f32 {
        match self {
            Position::GK => f32::NAN,
            Position::CB | Position::SW | Position::LB | Position::RB | Position::WB => 0.0,
            Position::DM | Position::CM => 1.0,
            Position::AM | Position::LM | Position::RM => 2.0,
            Position::LW | Position::RW => 3.0,
            Position::ST | Position::CF | Position::F9 => 4.0,
        }
    }
}

/// Dense 16x16 lookup of the `[0, 1]` multiplier applied to every attribute of
/// a player fielded away from their natural position. Built once per engine
/// instance (see `PositionTable`) and shared read-only for the life of the
/// match.
pub fn compatibility(natural: Position, played: Position) -> f32 {
    if natural == played {
        return 1.0;
    }
    let gk_mismatch = natural == Position::GK || played == Position::GK;
    if gk_mismatch {
        // goalkeeper <-> outfield: catastrophic, >= 30% reduction
        return 0.65;
    }
    let distance = (natural.line() - played.line()).abs();
    if distance < 0.5 {
        0.88 // same row, e.g. ST<->CF, CM<->DM
    } else if distance < 1.5 {
        0.65 // adjacent row, e.g. CB<->DM
    } else {
        0.4 // far mismatch, e.g. ST<->CB
    }
}

/// Precomputed table, built once at engine construction.
pub struct PositionTable {
    table: [[f32; 16]; 16],
}

impl PositionTable {
    pub fn build() -> Self {
        let mut table = [[0.0f32; 16]; 16];
        for (i, &a) in Position::ALL.iter().enumerate() {
            for (j, &b) in Position::ALL.iter().enumerate() {
                table[i][j] = compatibility(a, b);
            }
        }
        PositionTable { table }
    }

    pub fn get(&self, natural: Position, played: Position) -> f32 {
        let i = Position::ALL.iter().position(|&p| p == natural).unwrap();
        let j = Position::ALL.iter().position(|&p| p == played).unwrap();
        self.table[i][j]
    }
}
