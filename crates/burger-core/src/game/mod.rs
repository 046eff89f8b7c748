//! Game state aggregate: the single source of truth for one player's session.

mod scoreboard;
mod snapshot;
mod state;

pub use scoreboard::Scoreboard;
pub use snapshot::{GameSnapshot, SessionSummary};
pub use state::{DrawingResult, GameState};
