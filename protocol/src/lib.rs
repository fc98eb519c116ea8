//! Wire format for the battle simulator boundary.
//!
//! The simulator communicates in two textual shapes: a per-turn JSON
//! *request* describing what a side may legally do, and a *choice string*
//! answering it (`"move 1"`, `"switch 3"`, `"move 2 -1, pass"`). This crate
//! owns both directions plus the small identifier types they share.
//!
//! ```text
//! rotom-protocol (wire format) ← THIS CRATE
//!        │
//!        ▼
//! rotom-battle (domain types) ──> rotom-ai (decisions)
//!        │                              │
//!        └──────> rotom-sim (simulator boundary) <──────┘
//! ```

use thiserror::Error;

mod choice;
mod ids;
mod request;

pub use choice::{Action, MoveCategory, MoveTarget, parse_choice, render_choice};
pub use ids::{GameType, HpStatus, Player, PokemonDetails, Stat, to_id};
pub use request::{ActiveSlot, BattleRequest, MoveSlot, RequestStats, SideInfo, SidePokemon};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Invalid choice format: {0}")]
    InvalidChoice(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Empty choice string")]
    EmptyChoice,
}
