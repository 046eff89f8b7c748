//! Core rules of Burger Rush.
//!
//! A player is dealt a random burger order, draws each component to unlock it
//! (an external judge scores the drawing), stacks unlocked components and serves
//! the burger. Accepted burgers add satisfaction to the scoreboard until the
//! session clock runs out.
//!
//! Drivers interact with [`GameState`] only; the other modules hold the pieces it
//! is assembled from.

pub mod config;
pub mod error;
pub mod game;
pub mod oracle;
pub mod order;
pub mod recipe;
pub mod session;

pub use config::GameConfig;
pub use error::{BurgerError, Result};
pub use game::{DrawingResult, GameSnapshot, GameState, Scoreboard, SessionSummary};
pub use oracle::{DrawingArtifact, QualityJudgment, QualityOracle, QualityOracleAdapter};
pub use order::{Order, RejectionReason, UnlockOutcome, ValidationOutcome};
pub use recipe::{BOUNDARY_MARKER, Recipe, RecipeCatalog};
pub use session::{Clock, SessionStatus};
