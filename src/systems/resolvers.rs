use rand::Rng;
use uuid::Uuid;

use crate::commentary;
use crate::entities::{
    Action, Attribute, EventKind, Side, Step, TickEvent, Zone,
};
use crate::systems::attribute_resolver::AttributeResolver;
use crate::systems::chain::{ChainQueue, PendingEvent};
use crate::systems::match_state::{MatchState, MoraleReason};
use crate::systems::player_selector::PlayerSelector;

/// C4 Event Resolvers. One function per event kind, sharing the common
/// skeleton: pick actor(s) via the player selector, compute an
/// outcome probability from effective attributes, draw the outcome, and
/// emit a coordinate-consistent animation `sequence`. Resolvers never push
/// more than their own follow-up(s) onto the chain queue; depth is bounded
/// by `ChainQueue` itself.
pub struct Resolvers<'a> {
    resolver: &'a AttributeResolver<'a>,
    selector: &'a PlayerSelector<'a>,
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

fn zone_of(x: f32) -> Zone {
    if x < 33.0 {
        Zone::Defensive
    } else if x > 67.0 {
        Zone::Final
    } else {
        Zone::Middle
    }
}

/// `+1` for home (attacks toward `x = 100`), `-1` for away (toward `x = 0`).
fn direction(side: Side) -> f32 {
    match side {
        Side::Home => 1.0,
        Side::Away => -1.0,
    }
}

fn opponent_goal_x(side: Side) -> f32 {
    match side {
        Side::Home => 100.0,
        Side::Away => 0.0,
    }
}

fn own_goal_x(side: Side) -> f32 {
    opponent_goal_x(side.opponent())
}

/// Probability a given foul draws any card at all, scaled by the
/// defender's aggression and the defending side's tackle-harder setting.
/// Most fouls draw no card.
fn card_probability(aggression: f32, tackle_harder: bool) -> f32 {
    let mut prob = 0.10 + (aggression - 10.0).max(0.0) / 90.0;
    if tackle_harder {
        prob += 0.08;
    }
    prob.clamp(0.05, 0.45)
}

/// Probability a carded foul is a straight red rather than a first
/// yellow, scaled the same way but kept small in absolute terms.
fn straight_red_probability(aggression: f32, tackle_harder: bool) -> f32 {
    let mut prob = 0.02 + (aggression - 14.0).max(0.0) / 220.0;
    if tackle_harder {
        prob += 0.03;
    }
    prob.clamp(0.01, 0.12)
}

impl<'a> Resolvers<'a> {
    pub fn new(resolver: &'a AttributeResolver<'a>, selector: &'a PlayerSelector<'a>) -> Self {
        Resolvers { resolver, selector }
    }

    /// Pushes a follow-up onto the chain queue, logging and dropping it on
    /// overflow rather than surfacing the error to the tick loop.
    fn push_chained(&self, chain: &mut ChainQueue, item: PendingEvent) {
        if let Err(err) = chain.push(item) {
            log::warn!("dropping chained event: {err}");
        }
    }

    /// Weights depend on the aggregate pressing/tempo/mentality of
    /// both sides and the current zone.
    pub fn sample_primary_kind(&self, state: &MatchState) -> EventKind {
        let zone = state.zone;
        let attacker = state.possession;
        let mut weights: Vec<(EventKind, f32)> = vec![
            (EventKind::OpenPlay, 8.0),
            (EventKind::Pass, 6.0),
            (EventKind::Tackle, 3.0),
            (EventKind::Foul, 1.2),
            (EventKind::ThrowIn, 1.0),
            (EventKind::Offside, 0.3),
        ];
        let shot_weight = match zone {
            Zone::Final => 3.5,
            Zone::Middle => 0.6,
            Zone::Defensive => 0.05,
        };
        weights.push((EventKind::ShotOnTarget, shot_weight));

        use crate::entities::{Pressing, TacklingStyle};
        let tactic = state.tactic(attacker.opponent());
        if tactic.tackling == TacklingStyle::GetStuckIn || tactic.tackle_harder {
            for (kind, w) in weights.iter_mut() {
                if *kind == EventKind::Foul || *kind == EventKind::Tackle {
                    *w *= 1.4;
                }
            }
        }
        if tactic.pressing == Pressing::Always || tactic.pressing == Pressing::Often {
            for (kind, w) in weights.iter_mut() {
                if *kind == EventKind::Tackle {
                    *w *= 1.25;
                }
            }
        }

        let total: f32 = weights.iter().map(|(_, w)| w).sum();
        let draw = state.rng_mut().gen_range(0.0..total);
        let mut cumulative = 0.0;
        for (kind, w) in &weights {
            cumulative += w;
            if draw <= cumulative {
                return *kind;
            }
        }
        EventKind::OpenPlay
    }

    // ---- Open play ----

    pub fn resolve_open_play(&self, state: &mut MatchState) -> Option<TickEvent> {
        let side = state.possession;
        let passer = self.selector.select_weighted(state, side, Attribute::Vision, 1.0, None)?;
        let step_count = state.rng_mut().gen_range(2..=6);
        let mut steps = Vec::with_capacity(step_count);
        let mut ball = state.ball;
        let mut actor = passer;
        for i in 0..step_count {
            let drift = state.rng_mut().gen_range(3.0..15.0) * direction(side);
            let jitter: f32 = state.rng_mut().gen_range(-8.0..8.0);
            let start = ball;
            let end = (
                (ball.0 + drift).clamp(-1.0, 101.0),
                (ball.1 + jitter).clamp(-1.0, 101.0),
            );
            let skill_roll: f32 = state.rng_mut().gen_range(0.0..1.0);
            let action = if i + 1 == step_count {
                Action::Pass
            } else if skill_roll < 0.15 {
                Action::SkillMove
            } else if skill_roll < 0.45 {
                Action::Dribble
            } else {
                Action::Pass
            };
            let target = if action == Action::Pass {
                self.selector.select_weighted(state, side, Attribute::OffTheBall, 1.0, Some(actor))
            } else {
                None
            };
            let duration = Step::clamp_duration(state.rng_mut().gen_range(300..1200) as u16);
            let actor_name = state.player(side, actor).name.clone();
            steps.push(Step {
                action,
                actor_id: actor,
                actor_name,
                ball_start: start,
                ball_end: end,
                target_id: target,
                duration_ms: duration,
            });
            ball = end;
            if let Some(next) = target {
                actor = next;
            }
        }
        state.ball = ball;
        state.zone = zone_of(ball.0);
        let description = commentary::describe_open_play(state.player(side, passer));
        Some(TickEvent {
            kind: EventKind::OpenPlay,
            team: side,
            primary_player_id: passer,
            primary_player_name: state.player(side, passer).name.clone(),
            secondary_player_id: None,
            outcome: None,
            description,
            coordinates: ball,
            sequence: steps,
        })
    }

    // ---- Pass ----

    pub fn resolve_pass(&self, state: &mut MatchState, chain: &mut ChainQueue) -> Option<TickEvent> {
        let side = state.possession;
        let passer = self.selector.select_weighted(state, side, Attribute::Vision, 1.0, None)?;
        let receiver = self.selector.select_weighted(state, side, Attribute::OffTheBall, 1.0, Some(passer))?;
        let defender = self.selector.select_weighted(state, side.opponent(), Attribute::Anticipation, 1.0, None);

        let passing = state.effective(self.resolver, side, passer, Attribute::Passing);
        let anticipation = defender
            .map(|d| state.effective(self.resolver, side.opponent(), d, Attribute::Anticipation))
            .unwrap_or(10.0);
        let success_prob = sigmoid((passing - anticipation) / 6.0);
        let succeeded = state.rng_mut().gen_range(0.0..1.0) < success_prob;

        let start = state.ball;
        let drift = state.rng_mut().gen_range(8.0..20.0) * direction(side);
        let end = ((start.0 + drift).clamp(-1.0, 101.0), (start.1 + state.rng_mut().gen_range(-12.0..12.0)).clamp(-1.0, 101.0));
        let duration = Step::clamp_duration(state.rng_mut().gen_range(300..1000) as u16);
        let passer_name = state.player(side, passer).name.clone();
        let step = Step {
            action: Action::Pass,
            actor_id: passer,
            actor_name: passer_name.clone(),
            ball_start: start,
            ball_end: end,
            target_id: Some(receiver),
            duration_ms: duration,
        };
        state.ball = end;
        state.zone = zone_of(end.0);
        state.stats_mut(side).passes += 1;

        if succeeded {
            Some(TickEvent {
                kind: EventKind::Pass,
                team: side,
                primary_player_id: passer,
                primary_player_name: passer_name,
                secondary_player_id: Some(receiver),
                outcome: Some("complete".into()),
                description: commentary::describe_pass(&passer_name, &state.player(side, receiver).name, true),
                coordinates: end,
                sequence: vec![step],
            })
        } else {
            let intercepting_side = side.opponent();
            state.possession = intercepting_side;
            state.stats_mut(intercepting_side).interceptions += 1;
            self.push_chained(chain, PendingEvent::Counter {
                side: intercepting_side,
                origin: end,
            });
            let name = defender.map(|d| state.player(intercepting_side, d).name.clone()).unwrap_or_default();
            Some(TickEvent {
                kind: EventKind::Interception,
                team: intercepting_side,
                primary_player_id: defender.unwrap_or(passer),
                primary_player_name: name,
                secondary_player_id: None,
                outcome: Some("intercepted".into()),
                description: commentary::describe_pass(&passer_name, "nobody", false),
                coordinates: end,
                sequence: vec![step],
            })
        }
    }

    // ---- Tackle ----

    pub fn resolve_tackle(&self, state: &mut MatchState, chain: &mut ChainQueue) -> Option<TickEvent> {
        let attacking = state.possession;
        let defending = attacking.opponent();
        let ball_carrier = self.selector.select_weighted(state, attacking, Attribute::Dribbling, 1.0, None)?;
        let defender = self.selector.select_weighted(state, defending, Attribute::Tackling, 2.0, None)?;

        let tackling = state.effective(self.resolver, defending, defender, Attribute::Tackling);
        let dribbling = state.effective(self.resolver, attacking, ball_carrier, Attribute::Dribbling);
        let aggression = state.effective(self.resolver, defending, defender, Attribute::Aggression);
        let composure = state.effective(self.resolver, defending, defender, Attribute::Composure);

        let tactic = state.tactic(defending);
        let mut foul_prob = 0.08 + (aggression / 400.0) - (composure / 800.0);
        if tactic.tackle_harder {
            foul_prob += 0.07;
        }
        use crate::entities::TacklingStyle;
        if tactic.tackling == TacklingStyle::GetStuckIn {
            foul_prob += 0.05;
        } else if tactic.tackling == TacklingStyle::StayOnFeet {
            foul_prob -= 0.04;
        }
        let foul_prob = foul_prob.clamp(0.02, 0.45);

        let win_prob = sigmoid((tackling - dribbling) / 6.0) * (1.0 - foul_prob);
        let roll: f32 = state.rng_mut().gen_range(0.0..1.0);

        let start = state.ball;
        let duration = Step::clamp_duration(state.rng_mut().gen_range(200..900) as u16);
        let defender_name = state.player(defending, defender).name.clone();
        state.stats_mut(defending).tackles += 1;

        if roll < foul_prob {
            state.stats_mut(defending).fouls += 1;
            let card_roll: f32 = state.rng_mut().gen_range(0.0..1.0);
            if card_roll < card_probability(aggression, tactic.tackle_harder) {
                let severe_roll: f32 = state.rng_mut().gen_range(0.0..1.0);
                self.push_chained(chain, PendingEvent::Card {
                    side: defending,
                    player_id: defender,
                    severe: severe_roll < straight_red_probability(aggression, tactic.tackle_harder),
                });
            }
            self.route_foul_location(defending, start, chain);
            let step = Step {
                action: Action::Foul,
                actor_id: defender,
                actor_name: defender_name.clone(),
                ball_start: start,
                ball_end: start,
                target_id: Some(ball_carrier),
                duration_ms: duration,
            };
            Some(TickEvent {
                kind: EventKind::Foul,
                team: defending,
                primary_player_id: defender,
                primary_player_name: defender_name.clone(),
                secondary_player_id: Some(ball_carrier),
                outcome: Some("foul".into()),
                description: commentary::describe_foul(&defender_name),
                coordinates: start,
                sequence: vec![step],
            })
        } else if roll < foul_prob + win_prob {
            state.possession = defending;
            state.stats_mut(defending).interceptions += 1;
            let step = Step {
                action: Action::Tackle,
                actor_id: defender,
                actor_name: defender_name.clone(),
                ball_start: start,
                ball_end: start,
                target_id: Some(ball_carrier),
                duration_ms: duration,
            };
            Some(TickEvent {
                kind: EventKind::Tackle,
                team: defending,
                primary_player_id: defender,
                primary_player_name: defender_name.clone(),
                secondary_player_id: Some(ball_carrier),
                outcome: Some("won".into()),
                description: commentary::describe_tackle(&defender_name, true),
                coordinates: start,
                sequence: vec![step],
            })
        } else {
            // missed tackle: attacker keeps the ball, play continues
            let step = Step {
                action: Action::Tackle,
                actor_id: defender,
                actor_name: defender_name.clone(),
                ball_start: start,
                ball_end: start,
                target_id: Some(ball_carrier),
                duration_ms: duration,
            };
            Some(TickEvent {
                kind: EventKind::Tackle,
                team: defending,
                primary_player_id: defender,
                primary_player_name: defender_name.clone(),
                secondary_player_id: Some(ball_carrier),
                outcome: Some("missed".into()),
                description: commentary::describe_tackle(&defender_name, false),
                coordinates: start,
                sequence: vec![step],
            })
        }
    }

    // ---- Shot ----

    pub fn resolve_shot(&self, state: &mut MatchState, chain: &mut ChainQueue) -> Option<TickEvent> {
        let side = state.possession;
        let shooter = self.selector.select_weighted(state, side, Attribute::Finishing, 2.0, None)?;
        let gk = self.selector.select_goalkeeper(state, side.opponent());

        let finishing = state.effective(self.resolver, side, shooter, Attribute::Finishing);
        let reflexes = gk
            .map(|g| state.effective(self.resolver, side.opponent(), g, Attribute::Reflexes))
            .unwrap_or(8.0);
        let one_on_ones = gk
            .map(|g| state.effective(self.resolver, side.opponent(), g, Attribute::OneOnOnes))
            .unwrap_or(8.0);
        let long_shots = state.effective(self.resolver, side, shooter, Attribute::LongShots);

        let origin_x = match side {
            Side::Home => state.rng_mut().gen_range(30.0..95.0_f32),
            Side::Away => state.rng_mut().gen_range(5.0..70.0_f32),
        };
        let origin_y = state.rng_mut().gen_range(20.0..80.0);
        let origin = (origin_x, origin_y);

        let distance_to_goal = (opponent_goal_x(side) - origin_x).abs();
        let zone_penalty = (distance_to_goal / 100.0) * 2.5;
        let on_target_prob = sigmoid((finishing + long_shots / 2.0 - reflexes - zone_penalty) / 6.0);
        let goal_prob = sigmoid((finishing - one_on_ones) / 6.0);

        let on_target_roll: f32 = state.rng_mut().gen_range(0.0..1.0);
        let blocked_roll: f32 = state.rng_mut().gen_range(0.0..1.0);
        let shooter_name = state.player(side, shooter).name.clone();

        state.stats_mut(side).shots += 1;
        state.zone = zone_of(origin_x);

        let (kind, ball_end, outcome_str) = if blocked_roll < 0.18 {
            let end = (
                (origin_x + (opponent_goal_x(side) - origin_x) * 0.3).clamp(-1.0, 101.0),
                origin_y,
            );
            if state.rng_mut().gen_range(0.0..1.0) < 0.5 {
                let flag_y = if state.rng_mut().gen_bool(0.5) { 0.0 } else { 100.0 };
                self.push_chained(chain, PendingEvent::Corner {
                    side,
                    origin: (opponent_goal_x(side), flag_y),
                });
            }
            (EventKind::ShotBlocked, end, "blocked")
        } else if on_target_roll < on_target_prob {
            state.stats_mut(side).shots_on_target += 1;
            let goal_roll: f32 = state.rng_mut().gen_range(0.0..1.0);
            if goal_roll < goal_prob {
                state.record_goal(side, shooter, None);
                state.zone = Zone::Middle;
                state.ball = (50.0, 50.0);
                (EventKind::Goal, (opponent_goal_x(side), state.rng_mut().gen_range(35.0..65.0)), "goal")
            } else {
                (
                    EventKind::ShotOnTarget,
                    (opponent_goal_x(side), state.rng_mut().gen_range(35.0..65.0)),
                    "saved",
                )
            }
        } else {
            let wide_y = if state.rng_mut().gen_bool(0.5) { state.rng_mut().gen_range(0.0..15.0) } else { state.rng_mut().gen_range(85.0..100.0) };
            self.push_chained(chain, PendingEvent::GoalKick { side: side.opponent() });
            (EventKind::ShotOffTarget, (opponent_goal_x(side), wide_y), "off_target")
        };

        let duration = Step::clamp_duration(state.rng_mut().gen_range(400..1400) as u16);
        let step = Step {
            action: Action::Shoot,
            actor_id: shooter,
            actor_name: shooter_name.clone(),
            ball_start: origin,
            ball_end,
            target_id: None,
            duration_ms: duration,
        };
        if kind != EventKind::Goal {
            state.ball = ball_end;
        }

        Some(TickEvent {
            kind,
            team: side,
            primary_player_id: shooter,
            primary_player_name: shooter_name.clone(),
            secondary_player_id: gk,
            outcome: Some(outcome_str.into()),
            description: commentary::describe_shot(&shooter_name, kind),
            coordinates: ball_end,
            sequence: vec![step],
        })
    }

    /// A foul sampled directly as the primary open-play event (as opposed
    /// to one produced as the losing branch of `resolve_tackle`).
    pub fn resolve_foul_event(&self, state: &mut MatchState, chain: &mut ChainQueue) -> Option<TickEvent> {
        let attacking = state.possession;
        let defending = attacking.opponent();
        let defender = self.selector.select_weighted(state, defending, Attribute::Aggression, 1.0, None)?;
        let victim = self.selector.select_weighted(state, attacking, Attribute::Dribbling, 1.0, None);

        let aggression = state.effective(self.resolver, defending, defender, Attribute::Aggression);
        let tactic = state.tactic(defending);

        state.stats_mut(defending).fouls += 1;
        let location = state.ball;
        let card_roll: f32 = state.rng_mut().gen_range(0.0..1.0);
        if card_roll < card_probability(aggression, tactic.tackle_harder) {
            let severe_roll: f32 = state.rng_mut().gen_range(0.0..1.0);
            self.push_chained(chain, PendingEvent::Card {
                side: defending,
                player_id: defender,
                severe: severe_roll < straight_red_probability(aggression, tactic.tackle_harder),
            });
        }
        self.route_foul_location(defending, location, chain);

        let name = state.player(defending, defender).name.clone();
        let step = Step {
            action: Action::Foul,
            actor_id: defender,
            actor_name: name.clone(),
            ball_start: location,
            ball_end: location,
            target_id: victim,
            duration_ms: Step::clamp_duration(500),
        };
        Some(TickEvent {
            kind: EventKind::Foul,
            team: defending,
            primary_player_id: defender,
            primary_player_name: name.clone(),
            secondary_player_id: victim,
            outcome: Some("foul".into()),
            description: commentary::describe_foul(&name),
            coordinates: location,
            sequence: vec![step],
        })
    }

    // ---- Foul -> Free kick / Penalty routing ----

    pub fn route_foul_location(&self, side: Side, location: (f32, f32), chain: &mut ChainQueue) {
        let in_box = (location.0 > 83.0 || location.0 < 17.0) && location.1 >= 25.0 && location.1 <= 75.0;
        let fouling_side = side;
        let awarded_side = fouling_side.opponent();
        // The box check is relative to whichever goal the foul happened near;
        // award a penalty only when that box belongs to the fouling side.
        let near_fouling_own_goal = (location.0 - own_goal_x(fouling_side)).abs() < 17.0;
        if in_box && near_fouling_own_goal {
            self.push_chained(chain, PendingEvent::Penalty { side: awarded_side });
        } else {
            self.push_chained(chain, PendingEvent::FreeKick {
                side: awarded_side,
                origin: location,
            });
        }
    }

    pub fn resolve_free_kick(
        &self,
        state: &mut MatchState,
        side: Side,
        origin: (f32, f32),
        chain: &mut ChainQueue,
    ) -> Option<TickEvent> {
        use crate::entities::SetPieceKind;
        let taker = self.selector.select_set_piece_taker(state, side, SetPieceKind::FreeKick)?;
        let taker_name = state.player(side, taker).name.clone();
        let distance = (opponent_goal_x(side) - origin.0).abs();
        let duration = Step::clamp_duration(state.rng_mut().gen_range(400..1200) as u16);

        if distance < 30.0 {
            // shot at goal
            state.ball = origin;
            let outcome = self.resolve_shot(state, chain);
            return outcome.map(|mut ev| {
                ev.kind = EventKind::FreeKick;
                ev
            });
        }

        let end = if distance < 55.0 {
            (
                (origin.0 + (opponent_goal_x(side) - origin.0) * 0.6).clamp(-1.0, 101.0),
                state.rng_mut().gen_range(20.0..80.0),
            )
        } else {
            (
                (origin.0 + (opponent_goal_x(side) - origin.0) * 0.4).clamp(-1.0, 101.0),
                state.rng_mut().gen_range(20.0..80.0),
            )
        };
        let receiver = self.selector.select_weighted(state, side, Attribute::Heading, 1.0, Some(taker));
        let action = if distance < 55.0 { Action::Cross } else { Action::Pass };
        let step = Step {
            action,
            actor_id: taker,
            actor_name: taker_name.clone(),
            ball_start: origin,
            ball_end: end,
            target_id: receiver,
            duration_ms: duration,
        };
        state.ball = end;
        state.zone = zone_of(end.0);
        Some(TickEvent {
            kind: EventKind::FreeKick,
            team: side,
            primary_player_id: taker,
            primary_player_name: taker_name.clone(),
            secondary_player_id: receiver,
            outcome: Some("taken".into()),
            description: commentary::describe_free_kick(&taker_name),
            coordinates: end,
            sequence: vec![step],
        })
    }

    pub fn resolve_penalty(&self, state: &mut MatchState, side: Side) -> Option<TickEvent> {
        use crate::entities::SetPieceKind;
        let taker = self.selector.select_set_piece_taker(state, side, SetPieceKind::Penalty)?;
        let gk = self.selector.select_goalkeeper(state, side.opponent());
        let taker_name = state.player(side, taker).name.clone();
        let spot = (if side == Side::Home { 88.0 } else { 12.0 }, 50.0);

        let run_duration = Step::clamp_duration(state.rng_mut().gen_range(400..900) as u16);
        let run_step = Step {
            action: Action::Run,
            actor_id: taker,
            actor_name: taker_name.clone(),
            ball_start: spot,
            ball_end: spot,
            target_id: None,
            duration_ms: run_duration,
        };

        let penalty_taking = state.effective(self.resolver, side, taker, Attribute::PenaltyTaking);
        let one_on_ones = gk
            .map(|g| state.effective(self.resolver, side.opponent(), g, Attribute::OneOnOnes))
            .unwrap_or(8.0);
        let composure = state.effective(self.resolver, side, taker, Attribute::Composure);
        let score_prob = sigmoid((penalty_taking + composure / 2.0 - one_on_ones) / 5.0).clamp(0.55, 0.93);
        let roll: f32 = state.rng_mut().gen_range(0.0..1.0);
        let goal_line_x = opponent_goal_x(side);
        let shoot_duration = Step::clamp_duration(state.rng_mut().gen_range(300..700) as u16);

        let mut sequence = vec![run_step];
        let (kind, outcome) = if roll < score_prob {
            let target_y = state.rng_mut().gen_range(35.0..65.0);
            sequence.push(Step {
                action: Action::Shoot,
                actor_id: taker,
                actor_name: taker_name.clone(),
                ball_start: spot,
                ball_end: (goal_line_x, target_y),
                target_id: None,
                duration_ms: shoot_duration,
            });
            state.record_goal(side, taker, None);
            state.ball = (50.0, 50.0);
            state.zone = Zone::Middle;
            (EventKind::Goal, "goal")
        } else {
            let target_y = state.rng_mut().gen_range(35.0..65.0);
            sequence.push(Step {
                action: Action::Shoot,
                actor_id: taker,
                actor_name: taker_name.clone(),
                ball_start: spot,
                ball_end: (goal_line_x, target_y),
                target_id: None,
                duration_ms: shoot_duration,
            });
            if let Some(keeper) = gk {
                let keeper_name = state.player(side.opponent(), keeper).name.clone();
                let dive_y = if target_y > 50.0 {
                    target_y - state.rng_mut().gen_range(2.0..10.0)
                } else {
                    target_y + state.rng_mut().gen_range(2.0..10.0)
                };
                sequence.push(Step {
                    action: Action::Save,
                    actor_id: keeper,
                    actor_name: keeper_name,
                    ball_start: (goal_line_x, target_y),
                    ball_end: (goal_line_x, dive_y),
                    target_id: None,
                    duration_ms: Step::clamp_duration(state.rng_mut().gen_range(200..600) as u16),
                });
                state.stats_mut(side.opponent()).saves += 1;
            }
            state.ball = (goal_line_x, target_y);
            state.zone = zone_of(goal_line_x);
            (EventKind::ShotOnTarget, "saved")
        };

        Some(TickEvent {
            kind,
            team: side,
            primary_player_id: taker,
            primary_player_name: taker_name.clone(),
            secondary_player_id: gk,
            outcome: Some(outcome.into()),
            description: commentary::describe_penalty(&taker_name, outcome == "goal"),
            coordinates: state.ball,
            sequence,
        })
    }

    // ---- Corner ----

    pub fn resolve_corner(&self, state: &mut MatchState, side: Side, chain: &mut ChainQueue) -> Option<TickEvent> {
        use crate::entities::SetPieceKind;
        let taker = self.selector.select_set_piece_taker(state, side, SetPieceKind::Corner)?;
        let taker_name = state.player(side, taker).name.clone();
        let flag_x = if side == Side::Home { 100.0 } else { 0.0 };
        let flag_y = if state.rng_mut().gen_bool(0.5) { 0.0 } else { 100.0 };
        let origin = (flag_x, flag_y);
        let target_x = opponent_goal_x(side) - direction(side) * state.rng_mut().gen_range(6.0..14.0);
        let target_y = state.rng_mut().gen_range(35.0..65.0);
        let end = (target_x, target_y);

        let target = self.selector.select_weighted(state, side, Attribute::JumpingReach, 1.0, Some(taker));
        let duration = Step::clamp_duration(state.rng_mut().gen_range(700..2000) as u16);
        let step = Step {
            action: Action::Cross,
            actor_id: taker,
            actor_name: taker_name.clone(),
            ball_start: origin,
            ball_end: end,
            target_id: target,
            duration_ms: duration,
        };
        state.ball = end;
        state.zone = zone_of(end.0);
        state.stats_mut(side).corners += 1;

        if state.rng_mut().gen_range(0.0..1.0) < 0.82 {
            self.push_chained(chain, PendingEvent::CornerFollowUp { side });
        }

        Some(TickEvent {
            kind: EventKind::Corner,
            team: side,
            primary_player_id: taker,
            primary_player_name: taker_name.clone(),
            secondary_player_id: target,
            outcome: Some("taken".into()),
            description: commentary::describe_corner(&taker_name),
            coordinates: end,
            sequence: vec![step],
        })
    }

    pub fn resolve_corner_follow_up(&self, state: &mut MatchState, side: Side) -> Option<TickEvent> {
        let attacker = self.selector.select_weighted(state, side, Attribute::Heading, 2.0, None)?;
        let defender = self.selector.select_weighted(state, side.opponent(), Attribute::Heading, 1.5, None);
        let gk = self.selector.select_goalkeeper(state, side.opponent());

        let heading = state.effective(self.resolver, side, attacker, Attribute::Heading);
        let defending_heading = defender
            .map(|d| state.effective(self.resolver, side.opponent(), d, Attribute::Heading))
            .unwrap_or(10.0);
        let aerial = gk
            .map(|g| state.effective(self.resolver, side.opponent(), g, Attribute::AerialReach))
            .unwrap_or(10.0);

        let goal_prob = sigmoid((heading - defending_heading.max(aerial)) / 7.0) * 0.35;
        let claim_prob = sigmoid((aerial - heading) / 7.0) * 0.4;
        let roll: f32 = state.rng_mut().gen_range(0.0..1.0);
        let start = state.ball;
        let duration = Step::clamp_duration(state.rng_mut().gen_range(300..900) as u16);
        let attacker_name = state.player(side, attacker).name.clone();

        if roll < goal_prob {
            state.record_goal(side, attacker, None);
            state.ball = (50.0, 50.0);
            state.zone = Zone::Middle;
            let step = Step {
                action: Action::Header,
                actor_id: attacker,
                actor_name: attacker_name.clone(),
                ball_start: start,
                ball_end: (opponent_goal_x(side), state.rng_mut().gen_range(35.0..65.0)),
                target_id: None,
                duration_ms: duration,
            };
            Some(TickEvent {
                kind: EventKind::Goal,
                team: side,
                primary_player_id: attacker,
                primary_player_name: attacker_name.clone(),
                secondary_player_id: None,
                outcome: Some("goal".into()),
                description: commentary::describe_header(&attacker_name, true),
                coordinates: step.ball_end,
                sequence: vec![step],
            })
        } else if roll < goal_prob + claim_prob {
            if let Some(keeper) = gk {
                state.stats_mut(side.opponent()).saves += 1;
                let keeper_name = state.player(side.opponent(), keeper).name.clone();
                let end = (own_goal_x(side.opponent()), start.1);
                let step = Step {
                    action: Action::Save,
                    actor_id: keeper,
                    actor_name: keeper_name.clone(),
                    ball_start: start,
                    ball_end: end,
                    target_id: None,
                    duration_ms: duration,
                };
                state.ball = end;
                state.zone = zone_of(end.0);
                return Some(TickEvent {
                    kind: EventKind::Save,
                    team: side.opponent(),
                    primary_player_id: keeper,
                    primary_player_name: keeper_name,
                    secondary_player_id: Some(attacker),
                    outcome: Some("claimed".into()),
                    description: commentary::describe_save(),
                    coordinates: end,
                    sequence: vec![step],
                });
            }
            None
        } else {
            let defender_id = defender.unwrap_or(attacker);
            let defender_name = state.player(side.opponent(), defender_id).name.clone();
            let end = (start.0 - direction(side) * state.rng_mut().gen_range(15.0..35.0), state.rng_mut().gen_range(20.0..80.0));
            state.stats_mut(side.opponent()).clearances += 1;
            let step = Step {
                action: Action::Clearance,
                actor_id: defender_id,
                actor_name: defender_name.clone(),
                ball_start: start,
                ball_end: end.clone(),
                target_id: None,
                duration_ms: duration,
            };
            state.ball = end;
            state.zone = zone_of(end.0);
            state.possession = side.opponent();
            Some(TickEvent {
                kind: EventKind::Tackle,
                team: side.opponent(),
                primary_player_id: defender_id,
                primary_player_name: defender_name,
                secondary_player_id: Some(attacker),
                outcome: Some("cleared".into()),
                description: commentary::describe_clearance(),
                coordinates: end,
                sequence: vec![step],
            })
        }
    }

    // ---- Card ----

    pub fn resolve_card(&self, state: &mut MatchState, side: Side, player_id: Uuid, severe: bool) -> Option<TickEvent> {
        let already_yellow = state.player_state(player_id).map(|s| s.yellow_cards > 0).unwrap_or(false);
        let red = severe || already_yellow;
        let duration = 500u16;
        let player_name = state.player(side, player_id).name.clone();
        let step = Step {
            action: Action::Foul,
            actor_id: player_id,
            actor_name: player_name.clone(),
            ball_start: state.ball,
            ball_end: state.ball,
            target_id: None,
            duration_ms: duration,
        };

        if red {
            state.send_off(side, player_id);
            state.stats_mut(side).red_cards += 1;
            Some(TickEvent {
                kind: EventKind::Card,
                team: side,
                primary_player_id: player_id,
                primary_player_name: player_name.clone(),
                secondary_player_id: None,
                outcome: Some("red".into()),
                description: commentary::describe_card(&player_name, true),
                coordinates: state.ball,
                sequence: vec![step],
            })
        } else {
            if let Some(pstate) = state.player_state_mut(player_id) {
                pstate.yellow_cards += 1;
            }
            state.update_morale(player_id, MoraleReason::YellowCard);
            state.stats_mut(side).yellow_cards += 1;
            Some(TickEvent {
                kind: EventKind::Card,
                team: side,
                primary_player_id: player_id,
                primary_player_name: player_name.clone(),
                secondary_player_id: None,
                outcome: Some("yellow".into()),
                description: commentary::describe_card(&player_name, false),
                coordinates: state.ball,
                sequence: vec![step],
            })
        }
    }

    // ---- Substitution ----

    /// Prefers removing the highest-fatigued available outfielder whose
    /// position has a fresh bench option. Only called inside the 45-90
    /// window, capped at 5 per side, by the tick loop.
    pub fn resolve_substitution(&self, state: &mut MatchState, side: Side) -> Option<TickEvent> {
        let candidates = state.lineup(side).available_outfield();
        let out_id = candidates
            .into_iter()
            .max_by(|a, b| {
                let fa = state.player_state(*a).map(|s| s.fatigue).unwrap_or(0.0);
                let fb = state.player_state(*b).map(|s| s.fatigue).unwrap_or(0.0);
                fa.partial_cmp(&fb).unwrap_or(std::cmp::Ordering::Equal)
            })?;
        let position = state.lineup(side).assigned_position(out_id)?;
        let in_id = state.lineup(side).fresh_bench_option(position)?;

        if let Err(err) = state.lineup_mut(side).substitute(out_id, in_id) {
            log::warn!("substitution refused: {err}");
            return None;
        }
        // A fresh substitute starts with no accumulated fatigue.
        if let Some(pstate) = state.player_state_mut(in_id) {
            pstate.fatigue = 0.0;
            pstate.assigned_position = position;
        }

        let out_name = state.player(side, out_id).name.clone();
        let in_name = state.player(side, in_id).name.clone();
        let step = Step {
            action: Action::Run,
            actor_id: in_id,
            actor_name: in_name.clone(),
            ball_start: state.ball,
            ball_end: state.ball,
            target_id: Some(out_id),
            duration_ms: Step::clamp_duration(800),
        };
        Some(TickEvent {
            kind: EventKind::Substitution,
            team: side,
            primary_player_id: in_id,
            primary_player_name: in_name.clone(),
            secondary_player_id: Some(out_id),
            outcome: Some("substitution".into()),
            description: format!("{in_name} replaces {out_name}."),
            coordinates: state.ball,
            sequence: vec![step],
        })
    }

    // ---- Lightweight stoppages: throw-in, goal kick, offside ----

    pub fn resolve_throw_in(&self, state: &mut MatchState, side: Side, origin: (f32, f32)) -> Option<TickEvent> {
        let thrower = self.selector.select_weighted(state, side, Attribute::LongThrows, 1.0, None)?;
        let thrower_name = state.player(side, thrower).name.clone();
        let end = (origin.0 + state.rng_mut().gen_range(-5.0..5.0), origin.1.clamp(0.0, 100.0));
        let step = Step {
            action: Action::Pass,
            actor_id: thrower,
            actor_name: thrower_name.clone(),
            ball_start: origin,
            ball_end: end,
            target_id: None,
            duration_ms: Step::clamp_duration(600),
        };
        state.ball = end;
        state.zone = zone_of(end.0);
        Some(TickEvent {
            kind: EventKind::ThrowIn,
            team: side,
            primary_player_id: thrower,
            primary_player_name: thrower_name,
            secondary_player_id: None,
            outcome: None,
            description: "Throw-in.".into(),
            coordinates: end,
            sequence: vec![step],
        })
    }

    pub fn resolve_goal_kick(&self, state: &mut MatchState, side: Side) -> Option<TickEvent> {
        let gk = self.selector.select_goalkeeper(state, side)?;
        let gk_name = state.player(side, gk).name.clone();
        let origin = (own_goal_x(side), 50.0);
        let end = (own_goal_x(side) + direction(side) * state.rng_mut().gen_range(25.0..45.0), state.rng_mut().gen_range(20.0..80.0));
        let step = Step {
            action: Action::Pass,
            actor_id: gk,
            actor_name: gk_name.clone(),
            ball_start: origin,
            ball_end: end,
            target_id: None,
            duration_ms: Step::clamp_duration(900),
        };
        state.ball = end;
        state.zone = zone_of(end.0);
        Some(TickEvent {
            kind: EventKind::GoalKick,
            team: side,
            primary_player_id: gk,
            primary_player_name: gk_name,
            secondary_player_id: None,
            outcome: None,
            description: "Goal kick.".into(),
            coordinates: end,
            sequence: vec![step],
        })
    }

    pub fn resolve_offside(&self, state: &mut MatchState) -> Option<TickEvent> {
        let side = state.possession;
        let attacker = self.selector.select_weighted(state, side, Attribute::OffTheBall, 1.0, None)?;
        let name = state.player(side, attacker).name.clone();
        state.stats_mut(side).offsides += 1;
        let step = Step {
            action: Action::Run,
            actor_id: attacker,
            actor_name: name.clone(),
            ball_start: state.ball,
            ball_end: state.ball,
            target_id: None,
            duration_ms: Step::clamp_duration(400),
        };
        state.possession = side.opponent();
        Some(TickEvent {
            kind: EventKind::Offside,
            team: side,
            primary_player_id: attacker,
            primary_player_name: name.clone(),
            secondary_player_id: None,
            outcome: Some("offside".into()),
            description: format!("{name} is caught offside."),
            coordinates: state.ball,
            sequence: vec![step],
        })
    }
}
