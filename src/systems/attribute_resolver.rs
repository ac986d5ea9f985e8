use crate::entities::{
    Attribute, AttributeGroup, Mentality, PlayerMatchState, Position, PositionTable, Side, Tactic,
};

/// C1 Attribute Resolver. Computes the effective value of one attribute for
/// one player at the current minute, folding in fatigue, position
/// familiarity, tactic, home advantage and morale, in that fixed order.
/// Never mutates state; deterministic given its inputs.
pub struct AttributeResolver<'a> {
    pub table: &'a PositionTable,
}

impl<'a> AttributeResolver<'a> {
    pub fn new(table: &'a PositionTable) -> Self {
        AttributeResolver { table }
    }

    pub fn effective(
        &self,
        raw: u8,
        natural_position: Position,
        state: &PlayerMatchState,
        side: Side,
        minute: u8,
        tactic: &Tactic,
        attribute: Attribute,
    ) -> f32 {
        let mut value = raw as f32;

        value *= fatigue_factor(minute, state.fatigue);
        // Mental attributes receive the same position-familiarity factor as
        // technical ones; goalkeeping attributes at an outfield slot land on
        // the same catastrophic GK<->outfield entry of the table (<= 0.7).
        value *= self.table.get(natural_position, state.assigned_position);
        value *= tactic_factor(tactic, attribute);
        value *= home_advantage_factor(side, attribute);
        value *= morale_factor(state.morale);

        value
    }
}

/// Applies only after minute 60; before that the factor is always 1.0
/// regardless of accumulated fatigue.
fn fatigue_factor(minute: u8, fatigue: f32) -> f32 {
    if minute > 60 && fatigue > 0.0 {
        1.0 - 0.25 * fatigue
    } else {
        1.0
    }
}

/// Maps mentality to a signed intensity used to scale the attacking and
/// defensive attribute buckets symmetrically around `Balanced`.
fn mentality_intensity(mentality: Mentality) -> f32 {
    match mentality {
        Mentality::VeryDefensive => -2.0,
        Mentality::Defensive => -1.0,
        Mentality::Balanced => 0.0,
        Mentality::Attacking => 1.0,
        Mentality::VeryAttacking => 2.0,
    }
}

fn tactic_factor(tactic: &Tactic, attribute: Attribute) -> f32 {
    let intensity = mentality_intensity(tactic.mentality);
    let mut factor = match attribute {
        Attribute::Finishing | Attribute::LongShots | Attribute::OffTheBall => {
            1.0 + intensity * 0.05
        }
        Attribute::Tackling | Attribute::Marking => 1.0 - intensity * 0.05,
        _ => 1.0,
    };
    if tactic.tackle_harder && matches!(attribute, Attribute::Tackling | Attribute::Aggression) {
        factor *= 1.08;
    }
    factor
}

fn home_advantage_factor(side: Side, attribute: Attribute) -> f32 {
    if side != Side::Home {
        return 1.0;
    }
    match attribute.group() {
        AttributeGroup::Mental => 1.08,
        _ => 1.05,
    }
}

/// Piecewise linear through the four named points, clamped to
/// `[0.75, 1.15]`.
fn morale_factor(morale: f32) -> f32 {
    let raw = if morale <= 1.0 {
        0.80
    } else if morale <= 4.0 {
        lerp(1.0, 4.0, 0.80, 0.90, morale)
    } else if morale <= 7.0 {
        lerp(4.0, 7.0, 0.90, 1.0, morale)
    } else {
        lerp(7.0, 10.0, 1.0, 1.10, morale.min(10.0))
    };
    raw.clamp(0.75, 1.15)
}

fn lerp(x0: f32, x1: f32, y0: f32, y1: f32, x: f32) -> f32 {
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatigue_factor_inactive_before_minute_60() {
        assert_eq!(fatigue_factor(59, 0.8), 1.0);
    }

    #[test]
    fn fatigue_factor_matches_worked_example() {
        let factor = fatigue_factor(75, 0.8);
        assert!((factor - 0.80).abs() < 0.001);
    }

    #[test]
    fn morale_factor_matches_named_points() {
        assert!((morale_factor(7.0) - 1.0).abs() < 0.001);
        assert!((morale_factor(10.0) - 1.10).abs() < 0.001);
        assert!((morale_factor(4.0) - 0.90).abs() < 0.001);
        assert!((morale_factor(1.0) - 0.80).abs() < 0.001);
    }

    #[test]
    fn morale_factor_is_clamped() {
        assert!(morale_factor(0.0) >= 0.75);
        assert!(morale_factor(20.0) <= 1.15);
    }

    #[test]
    fn very_attacking_boosts_finishing_and_suppresses_tackling() {
        let mut tactic = Tactic::balanced();
        tactic.mentality = Mentality::VeryAttacking;
        assert!((tactic_factor(&tactic, Attribute::Finishing) - 1.10).abs() < 0.001);
        assert!((tactic_factor(&tactic, Attribute::Tackling) - 0.90).abs() < 0.001);
    }

    #[test]
    fn tackle_harder_boosts_tackling_and_aggression() {
        let mut tactic = Tactic::balanced();
        tactic.tackle_harder = true;
        assert!((tactic_factor(&tactic, Attribute::Tackling) - 1.08).abs() < 0.001);
        assert!((tactic_factor(&tactic, Attribute::Aggression) - 1.08).abs() < 0.001);
    }

    #[test]
    fn home_advantage_differs_by_group() {
        assert!((home_advantage_factor(Side::Home, Attribute::Vision) - 1.08).abs() < 0.001);
        assert!((home_advantage_factor(Side::Home, Attribute::Pace) - 1.05).abs() < 0.001);
        assert_eq!(home_advantage_factor(Side::Away, Attribute::Vision), 1.0);
    }

    #[test]
    fn position_mismatch_reduces_effective_value() {
        let table = PositionTable::build();
        let resolver = AttributeResolver::new(&table);
        let mut state = PlayerMatchState::kickoff(Position::CB);
        let on_position = resolver.effective(
            15,
            Position::CB,
            &state,
            Side::Away,
            10,
            &Tactic::balanced(),
            Attribute::Finishing,
        );
        state.assigned_position = Position::ST;
        let off_position = resolver.effective(
            15,
            Position::CB,
            &state,
            Side::Away,
            10,
            &Tactic::balanced(),
            Attribute::Finishing,
        );
        assert!(off_position < on_position);
    }

    #[test]
    fn goalkeeper_outfield_drops_reflexes_by_at_least_30_percent() {
        let table = PositionTable::build();
        let resolver = AttributeResolver::new(&table);
        let at_gk = PlayerMatchState::kickoff(Position::GK);
        let value_at_gk = resolver.effective(
            18,
            Position::GK,
            &at_gk,
            Side::Away,
            10,
            &Tactic::balanced(),
            Attribute::Reflexes,
        );
        let mut at_st = at_gk.clone();
        at_st.assigned_position = Position::ST;
        let value_at_st = resolver.effective(
            18,
            Position::GK,
            &at_st,
            Side::Away,
            10,
            &Tactic::balanced(),
            Attribute::Reflexes,
        );
        assert!(value_at_st <= value_at_gk * 0.70 + 0.001);
    }
}
