use serde::{Deserialize, Serialize};

use super::position::Position;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FormationSlot {
    pub x: f32,
    pub y: f32,
    pub position: Position,
}

/// Eleven pitch slots on a 0-100 x 0-100 grid. Slot order defines
/// assignment priority when matching incoming players to the formation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formation {
    pub slots: [FormationSlot; 11],
}

impl Formation {
    /// `None` if the formation does not carry exactly one `GK` slot.
    pub fn validated(self) -> Option<Self> {
        let gk_count = self.slots.iter().filter(|s| s.position == Position::GK).count();
        if gk_count == 1 {
            Some(self)
        } else {
            None
        }
    }

    pub fn goalkeeper_slot(&self) -> &FormationSlot {
        self.slots
            .iter()
            .find(|s| s.position == Position::GK)
            .expect("formation was validated to have exactly one GK slot")
    }
}
