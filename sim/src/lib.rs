//! Simulator boundary for the decision core.
//!
//! The battle rules engine is an external collaborator. This crate pins
//! down the narrow contract the decision layer relies on and the helpers
//! built on top of it:
//!
//! ```text
//! rotom-protocol ──┐
//! rotom-battle  ───┤
//!                  ▼
//!            rotom-sim ← THIS CRATE
//!                  │
//!                  ├─> rotom-ai (clones battles for search)
//!                  └─> rotom-arena (drives live battles)
//! ```
//!
//! # Main Items
//!
//! - [`Simulator`] - the opaque engine contract (request/choose/ended/winner
//!   plus the export/import pair)
//! - [`SavedBattle`] - an exported battle state, opaque to consumers
//! - [`clone_battle`] - export+import into an independent instance
//! - [`apply_choices`] / [`apply_choice`] - drive choice strings into an engine
//! - [`is_battle_over`] / [`battle_winner`] - outcome reporting
//! - [`LocalBattle`] - a deterministic in-process engine implementing the
//!   contract, used by tests, demos, and search rollouts

mod applicator;
mod cloner;
mod local;
mod outcome;
mod simulator;

pub use applicator::{apply_choice, apply_choices};
pub use cloner::clone_battle;
pub use local::{LocalBattle, MoveSpec, PokemonSpec, SpecStats, TeamSpec};
pub use outcome::{battle_winner, is_battle_over};
pub use simulator::{SavedBattle, Simulator};

use rotom_protocol::Player;

/// Errors surfaced at the simulator boundary
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A choice string the engine refused
    #[error("invalid choice for {side}: {reason}")]
    InvalidChoice { side: Player, reason: String },

    /// A choice arrived when the side had nothing to decide
    #[error("no pending decision for {0}")]
    NoPendingDecision(Player),

    /// The battle has already ended
    #[error("battle already ended")]
    BattleEnded,

    /// A team or format the engine cannot start from
    #[error("invalid battle setup: {0}")]
    InvalidSetup(String),

    /// State export/import failed
    #[error("state transfer failed: {0}")]
    StateTransfer(#[from] serde_json::Error),
}
