use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::position::Position;

/// One of the fixed named player skills, each stored on the 1-20 integer
/// scale. Grouped into Technical, Mental, Physical, Goalkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    // Technical
    Finishing,
    Passing,
    Tackling,
    Crossing,
    Corners,
    FreeKickTaking,
    PenaltyTaking,
    Heading,
    LongShots,
    Marking,
    Technique,
    Dribbling,
    FirstTouch,
    LongThrows,
    // Mental
    Aggression,
    Anticipation,
    Bravery,
    Composure,
    Concentration,
    Decisions,
    Determination,
    Flair,
    Leadership,
    OffTheBall,
    Positioning,
    Teamwork,
    Vision,
    WorkRate,
    // Physical
    Acceleration,
    Agility,
    Balance,
    JumpingReach,
    NaturalFitness,
    Pace,
    Stamina,
    Strength,
    // Goalkeeping
    AerialReach,
    CommandOfArea,
    Communication,
    Handling,
    Kicking,
    OneOnOnes,
    Reflexes,
    RushingOut,
    Throwing,
    Eccentricity,
}

pub const ATTRIBUTE_COUNT: usize = 46;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeGroup {
    Technical,
    Mental,
    Physical,
    Goalkeeping,
}

impl Attribute {
    pub const ALL: [Attribute; ATTRIBUTE_COUNT] = [
        Attribute::Finishing,
        Attribute::Passing,
        Attribute::Tackling,
        Attribute::Crossing,
        Attribute::Corners,
        Attribute::FreeKickTaking,
        Attribute::PenaltyTaking,
        Attribute::Heading,
        Attribute::LongShots,
        Attribute::Marking,
        Attribute::Technique,
        Attribute::Dribbling,
        Attribute::FirstTouch,
        Attribute::LongThrows,
        Attribute::Aggression,
        Attribute::Anticipation,
        Attribute::Bravery,
        Attribute::Composure,
        Attribute::Concentration,
        Attribute::Decisions,
        Attribute::Determination,
        Attribute::Flair,
        Attribute::Leadership,
        Attribute::OffTheBall,
        Attribute::Positioning,
        Attribute::Teamwork,
        Attribute::Vision,
        Attribute::WorkRate,
        Attribute::Acceleration,
        Attribute::Agility,
        Attribute::Balance,
        Attribute::JumpingReach,
        Attribute::NaturalFitness,
        Attribute::Pace,
        Attribute::Stamina,
        Attribute::Strength,
        Attribute::AerialReach,
        Attribute::CommandOfArea,
        Attribute::Communication,
        Attribute::Handling,
        Attribute::Kicking,
        Attribute::OneOnOnes,
        Attribute::Reflexes,
        Attribute::RushingOut,
        Attribute::Throwing,
        Attribute::Eccentricity,
    ];

    pub fn group(self) -> AttributeGroup {
        use Attribute::*;
        match self {
            Finishing | Passing | Tackling | Crossing | Corners | FreeKickTaking
            | PenaltyTaking | Heading | LongShots | Marking | Technique | Dribbling
            | FirstTouch | LongThrows => AttributeGroup::Technical,
            Aggression | Anticipation | Bravery | Composure | Concentration | Decisions
            | Determination | Flair | Leadership | OffTheBall | Positioning | Teamwork
            | Vision | WorkRate => AttributeGroup::Mental,
            Acceleration | Agility | Balance | JumpingReach | NaturalFitness | Pace | Stamina
            | Strength => AttributeGroup::Physical,
            AerialReach | CommandOfArea | Communication | Handling | Kicking | OneOnOnes
            | Reflexes | RushingOut | Throwing | Eccentricity => AttributeGroup::Goalkeeping,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A player's identity and raw attribute vector, immutable for the duration
/// of a match. All per-match mutable state (fatigue, morale, cards, on-pitch
/// status) lives in `PlayerMatchState` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: Uuid,
    pub name: String,
    pub shirt_number: u8,
    pub nationality: String,
    pub primary_position: Position,
    attributes: [u8; ATTRIBUTE_COUNT],
}

impl Player {
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        shirt_number: u8,
        nationality: impl Into<String>,
        primary_position: Position,
        attributes: [u8; ATTRIBUTE_COUNT],
    ) -> Self {
        Player {
            id,
            name: name.into(),
            shirt_number,
            nationality: nationality.into(),
            primary_position,
            attributes,
        }
    }

    /// Raw (pre-factor) 1-20 attribute value.
    pub fn raw(&self, attribute: Attribute) -> u8 {
        self.attributes[attribute.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_all_has_expected_len() {
        assert_eq!(Attribute::ALL.len(), ATTRIBUTE_COUNT);
    }

    #[test]
    fn groups_partition_all_attributes() {
        let mut technical = 0;
        let mut mental = 0;
        let mut physical = 0;
        let mut goalkeeping = 0;
        for attr in Attribute::ALL {
            match attr.group() {
                AttributeGroup::Technical => technical += 1,
                AttributeGroup::Mental => mental += 1,
                AttributeGroup::Physical => physical += 1,
                AttributeGroup::Goalkeeping => goalkeeping += 1,
            }
        }
        assert_eq!(technical, 14);
        assert_eq!(mental, 14);
        assert_eq!(physical, 8);
        assert_eq!(goalkeeping, 10);
    }

    #[test]
    fn raw_reads_back_value_at_index() {
        let mut attrs = [10u8; ATTRIBUTE_COUNT];
        attrs[Attribute::Finishing.index()] = 17;
        let player = Player::new(
            Uuid::new_v4(),
            "Test Player",
            9,
            "NA",
            Position::ST,
            attrs,
        );
        assert_eq!(player.raw(Attribute::Finishing), 17);
        assert_eq!(player.raw(Attribute::Passing), 10);
    }
}
