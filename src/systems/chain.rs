use std::collections::VecDeque;

use uuid::Uuid;

use crate::entities::Side;
use crate::error::MatchError;

/// C5 Causal Chain Scheduler. A FIFO queue of pending event descriptors
/// attached to the current tick; resolvers push follow-ups, the tick loop
/// drains them before sampling new open play. Queue items carry their own
/// coordinates so replaying a chain never violates the coordinate
/// invariants.
#[derive(Debug, Default)]
pub struct ChainQueue {
    items: VecDeque<PendingEvent>,
}

/// Bounds runaway chains: a parried shot that rebounds into a corner
/// that heads back to a save could in principle recurse forever.
pub const MAX_CHAIN_DEPTH: usize = 5;

#[derive(Debug, Clone)]
pub enum PendingEvent {
    FreeKick {
        side: Side,
        origin: (f32, f32),
    },
    Penalty {
        side: Side,
    },
    Corner {
        side: Side,
        origin: (f32, f32),
    },
    /// Follow-up to a corner cross: header, clearance, or claimed save.
    CornerFollowUp {
        side: Side,
    },
    ThrowIn {
        side: Side,
        origin: (f32, f32),
    },
    GoalKick {
        side: Side,
    },
    Card {
        side: Side,
        player_id: Uuid,
        severe: bool,
    },
    /// A counter-attack opportunity awarded after a clean tackle or
    /// intercepted pass, kept as open play for the intercepting side.
    Counter {
        side: Side,
        origin: (f32, f32),
    },
}

impl ChainQueue {
    pub fn new() -> Self {
        ChainQueue::default()
    }

    /// Returns `Err(ChainOverflow)` (and drops the item) once the queue
    /// already holds `MAX_CHAIN_DEPTH` pending items.
    pub fn push(&mut self, item: PendingEvent) -> Result<(), MatchError> {
        if self.items.len() >= MAX_CHAIN_DEPTH {
            return Err(MatchError::ChainOverflow {
                side: pending_side(&item),
                max: MAX_CHAIN_DEPTH,
            });
        }
        self.items.push_back(item);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<PendingEvent> {
        self.items.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

fn pending_side(item: &PendingEvent) -> Side {
    match item {
        PendingEvent::FreeKick { side, .. }
        | PendingEvent::Penalty { side }
        | PendingEvent::Corner { side, .. }
        | PendingEvent::CornerFollowUp { side }
        | PendingEvent::ThrowIn { side, .. }
        | PendingEvent::GoalKick { side }
        | PendingEvent::Card { side, .. }
        | PendingEvent::Counter { side, .. } => *side,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_is_reported_and_item_dropped() {
        let mut queue = ChainQueue::new();
        for _ in 0..MAX_CHAIN_DEPTH {
            queue.push(PendingEvent::ThrowIn {
                side: Side::Home,
                origin: (50.0, 0.0),
            })
            .unwrap();
        }
        let overflow = queue.push(PendingEvent::ThrowIn {
            side: Side::Home,
            origin: (50.0, 0.0),
        });
        assert!(matches!(overflow, Err(MatchError::ChainOverflow { .. })));
        assert_eq!(queue.items.len(), MAX_CHAIN_DEPTH);
    }

    #[test]
    fn fifo_order_preserved() {
        let mut queue = ChainQueue::new();
        queue.push(PendingEvent::GoalKick { side: Side::Home }).unwrap();
        queue.push(PendingEvent::GoalKick { side: Side::Away }).unwrap();
        match queue.pop() {
            Some(PendingEvent::GoalKick { side }) => assert_eq!(side, Side::Home),
            _ => panic!("expected home goal kick first"),
        }
        match queue.pop() {
            Some(PendingEvent::GoalKick { side }) => assert_eq!(side, Side::Away),
            _ => panic!("expected away goal kick second"),
        }
    }
}
