//! Battle state snapshot and domain types for AI decision making.
//!
//! This crate is the shared type system between the wire format and the
//! decision strategies: a lightweight, AI-facing mirror of battle facts
//! that never exposes simulator internals.
//!
//! # Overview
//!
//! `rotom-battle` sits between `rotom-protocol` (wire format) and the
//! higher-level crates:
//!
//! ```text
//! rotom-protocol (wire format)
//!        │
//!        ▼
//! rotom-battle (snapshot + domain types) ← THIS CRATE
//!        │
//!        ├─> rotom-ai (decision strategies)
//!        └─> rotom-arena (session orchestration)
//! ```
//!
//! # Main Types
//!
//! - [`Type`] - Pokemon types with the effectiveness chart
//! - [`Status`] / [`Volatile`] - status conditions
//! - [`StatLine`] / [`Boosts`] - computed stats and stage modifiers
//! - [`Weather`], [`Terrain`], [`SideCondition`], [`FieldState`] - field conditions
//! - [`BattlePokemon`] - one Pokemon's snapshot
//! - [`BattleSide`] - one player's team and active slots
//! - [`BattleState`] - the whole-battle snapshot, re-synced from requests
//!
//! # Example
//!
//! ```ignore
//! use rotom_battle::BattleState;
//! use rotom_protocol::{BattleRequest, GameType};
//!
//! let mut state = BattleState::new(GameType::Singles);
//! if let Some(side) = request.side.as_ref() {
//!     state.sync_side(side);
//! }
//! if let Some(active) = state.p1.first_active() {
//!     println!("{} at {}%", active.name, active.hp_percent());
//! }
//! ```

pub mod matchup;
mod state;
pub mod types;

pub use state::BattleState;
pub use types::{
    BattlePokemon, BattleSide, Boosts, FieldState, SideCondition, StatLine, Status, Terrain, Type,
    Volatile, Weather,
};

// Re-export commonly used protocol types
pub use rotom_protocol::{GameType, Player, Stat};
