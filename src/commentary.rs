//! Pure string-template builder consuming a `TickEvent` and returning a
//! natural-language description: no mutation, isolated here so it can be
//! swapped for a localised builder without touching the simulation.

use crate::entities::{EventKind, Player, TickEvent};

/// Top-level entry point matching the `describe(event) -> String` surface
/// named in SPEC_FULL's supplemental-features section. Individual resolvers
/// call the more specific `describe_*` helpers directly while building a
/// `TickEvent`'s `description` field; this function reconstructs the same
/// text purely from the finished event, for callers (e.g. a commentary
/// replay) that only have the `Tick` stream.
pub fn describe(event: &TickEvent) -> String {
    if !event.description.is_empty() {
        return event.description.clone();
    }
    match event.kind {
        EventKind::Goal => format!("GOAL! {} scores!", event.primary_player_name),
        _ => format!("{} is involved in play.", event.primary_player_name),
    }
}

pub fn describe_open_play(passer: &Player) -> String {
    format!("{} brings the ball forward.", passer.name)
}

pub fn describe_pass(passer: &str, receiver: &str, success: bool) -> String {
    if success {
        format!("{passer} finds {receiver} with a pass.")
    } else {
        format!("{passer}'s pass is cut out.")
    }
}

pub fn describe_tackle(defender: &str, won: bool) -> String {
    if won {
        format!("{defender} wins the ball back cleanly.")
    } else {
        format!("{defender} dives in but misses the tackle.")
    }
}

pub fn describe_foul(offender: &str) -> String {
    format!("Foul given against {offender}.")
}

pub fn describe_shot(shooter: &str, kind: EventKind) -> String {
    match kind {
        EventKind::Goal => format!("GOAL! {shooter} finds the net!"),
        EventKind::ShotOnTarget => format!("{shooter} shoots, well saved!"),
        EventKind::ShotOffTarget => format!("{shooter} shoots, but it goes wide."),
        EventKind::ShotBlocked => format!("{shooter}'s effort is blocked."),
        _ => format!("{shooter} has a shot."),
    }
}

pub fn describe_free_kick(taker: &str) -> String {
    format!("{taker} stands over the free kick.")
}

pub fn describe_penalty(taker: &str, scored: bool) -> String {
    if scored {
        format!("{taker} scores from the spot!")
    } else {
        format!("{taker}'s penalty is saved!")
    }
}

pub fn describe_corner(taker: &str) -> String {
    format!("{taker} swings the corner in.")
}

pub fn describe_header(attacker: &str, scored: bool) -> String {
    if scored {
        format!("{attacker} heads it home!")
    } else {
        format!("{attacker} rises but can't direct it on target.")
    }
}

pub fn describe_save() -> String {
    "The goalkeeper claims it.".to_string()
}

pub fn describe_clearance() -> String {
    "Cleared away by the defence.".to_string()
}

pub fn describe_card(player: &str, red: bool) -> String {
    if red {
        format!("Red card! {player} is sent off.")
    } else {
        format!("Yellow card for {player}.")
    }
}
