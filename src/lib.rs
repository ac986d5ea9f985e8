pub mod commentary;
pub mod entities;
pub mod error;
pub mod systems;

pub use commentary::describe;
pub use entities::*;
pub use error::{MatchError, MatchResult};
pub use systems::{MatchBatchResult, MatchEngine};
