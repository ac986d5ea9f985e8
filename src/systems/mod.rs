pub mod attribute_resolver;
pub mod chain;
pub mod lineup;
pub mod match_state;
pub mod match_system;
pub mod player_selector;
pub mod resolvers;

pub use attribute_resolver::AttributeResolver;
pub use chain::{ChainQueue, PendingEvent, MAX_CHAIN_DEPTH};
pub use lineup::{Lineup, MAX_SUBSTITUTIONS};
pub use match_state::{MatchState, MoraleReason};
pub use match_system::{MatchBatchResult, MatchEngine};
pub use player_selector::PlayerSelector;
pub use resolvers::Resolvers;
