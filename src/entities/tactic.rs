use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mentality {
    VeryDefensive,
    Defensive,
    Balanced,
    Attacking,
    VeryAttacking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pressing {
    Rarely,
    Sometimes,
    Often,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tempo {
    VerySlow,
    Slow,
    Standard,
    Fast,
    VeryFast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Width {
    Narrow,
    Standard,
    Wide,
    VeryWide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassingDirectness {
    Short,
    Standard,
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TacklingStyle {
    StayOnFeet,
    Balanced,
    GetStuckIn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreativeFreedom {
    Low,
    Balanced,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWasting {
    Never,
    Rarely,
    Sometimes,
    Often,
    Always,
}

/// A side's tactical profile. Absence (`None` at the engine boundary) is
/// treated as `Tactic::balanced()`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tactic {
    pub mentality: Mentality,
    pub pressing: Pressing,
    pub tempo: Tempo,
    pub width: Width,
    pub passing_directness: PassingDirectness,
    pub tackling: TacklingStyle,
    pub creative_freedom: CreativeFreedom,
    pub time_wasting: TimeWasting,
    pub tackle_harder: bool,
    pub counter_press: bool,
    pub offside_trap: bool,
}

impl Default for Tactic {
    fn default() -> Self {
        Tactic::balanced()
    }
}

impl Tactic {
    pub fn balanced() -> Self {
        Tactic {
            mentality: Mentality::Balanced,
            pressing: Pressing::Sometimes,
            tempo: Tempo::Standard,
            width: Width::Standard,
            passing_directness: PassingDirectness::Standard,
            tackling: TacklingStyle::Balanced,
            creative_freedom: CreativeFreedom::Balanced,
            time_wasting: TimeWasting::Sometimes,
            tackle_harder: false,
            counter_press: false,
            offside_trap: false,
        }
    }
}
