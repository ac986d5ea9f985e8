use rand::Rng;
use uuid::Uuid;

use crate::entities::{Attribute, SetPieceKind, Side};
use crate::systems::attribute_resolver::AttributeResolver;
use crate::systems::match_state::MatchState;

/// C2 Player Selector. Weighted random draws over effective attributes,
/// adapted from the teacher's `weighted_random_selection` in
/// `match_system.rs`, generalised to take an arbitrary candidate pool and
/// exponent instead of being wired to fixed attribute/position pairs.
pub struct PlayerSelector<'a> {
    pub resolver: &'a AttributeResolver<'a>,
}

impl<'a> PlayerSelector<'a> {
    pub fn new(resolver: &'a AttributeResolver<'a>) -> Self {
        PlayerSelector { resolver }
    }

    /// `k=2` for key attributes (concentrated draw), `k=1` for commodity
    /// attributes (flatter draw). Excludes the goalkeeper unless no
    /// outfield players remain.
    pub fn select_weighted(
        &self,
        state: &mut MatchState,
        side: Side,
        attribute: Attribute,
        k: f32,
        exclude: Option<Uuid>,
    ) -> Option<Uuid> {
        let mut pool = state.lineup(side).available_outfield();
        if pool.is_empty() {
            pool = state.lineup(side).available_players();
        }
        if let Some(excluded) = exclude {
            pool.retain(|id| *id != excluded);
        }
        self.weighted_draw(state, side, &pool, attribute, k)
    }

    pub fn select_goalkeeper(&self, state: &MatchState, side: Side) -> Option<Uuid> {
        state.lineup(side).goalkeeper()
    }

    /// Memoised per side in `MatchState`; re-elects only if the previous
    /// taker is no longer available.
    pub fn select_set_piece_taker(&self, state: &mut MatchState, side: Side, kind: SetPieceKind) -> Option<Uuid> {
        let available = state.lineup(side).available_outfield();
        let current = state.set_piece_taker(side, kind);
        if let Some(id) = current {
            if available.contains(&id) {
                return Some(id);
            }
        }
        let attribute = match kind {
            SetPieceKind::Corner => Attribute::Corners,
            SetPieceKind::FreeKick => Attribute::FreeKickTaking,
            SetPieceKind::Penalty => Attribute::PenaltyTaking,
        };
        let elected = available.into_iter().max_by(|a, b| {
            let va = self.effective_for(state, side, *a, attribute);
            let vb = self.effective_for(state, side, *b, attribute);
            va.partial_cmp(&vb).unwrap_or(std::cmp::Ordering::Equal)
        });
        state.set_set_piece_taker(side, kind, elected);
        elected
    }

    fn effective_for(&self, state: &MatchState, side: Side, id: Uuid, attribute: Attribute) -> f32 {
        state.effective(self.resolver, side, id, attribute)
    }

    fn weighted_draw(
        &self,
        state: &mut MatchState,
        side: Side,
        pool: &[Uuid],
        attribute: Attribute,
        k: f32,
    ) -> Option<Uuid> {
        if pool.is_empty() {
            return None;
        }
        let weights: Vec<f32> = pool
            .iter()
            .map(|id| self.effective_for(state, side, *id, attribute).max(0.1).powf(k))
            .collect();
        let total: f32 = weights.iter().sum();
        if total <= 0.0 {
            return pool.first().copied();
        }
        let draw = state.rng_mut().gen_range(0.0..total);
        let mut cumulative = 0.0;
        for (id, weight) in pool.iter().zip(weights.iter()) {
            cumulative += weight;
            if draw <= cumulative {
                return Some(*id);
            }
        }
        pool.last().copied()
    }
}
