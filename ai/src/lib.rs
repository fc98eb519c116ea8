//! Decision layer: from a raw request to a choice string.
//!
//! Every turn flows through the same pipeline regardless of which
//! strategy is driving:
//!
//! ```text
//! rotom-protocol ──┐
//! rotom-battle  ───┤
//! rotom-sim     ───┤
//!                  ▼
//!             rotom-ai ← THIS CRATE
//!                  │
//!                  └─> rotom-arena (runs strategies against engines)
//!
//!   request ─> menu ─> choices ─> strategy ─> choice string
//! ```
//!
//! # Main Items
//!
//! - [`parse_request`] / [`parse_request_for_slot`] - decode a request
//!   into a per-slot [`ActionSet`]
//! - [`legal_choices`] - the complete universe of legal combined choices
//! - [`Strategy`] - the pluggable decision seam, with [`RandomStrategy`],
//!   [`GreedyStrategy`], [`HeuristicStrategy`], and [`MctsStrategy`]
//! - [`Difficulty`] / [`strategy_for`] - preset strength levels

mod choices;
mod greedy;
mod heuristic;
mod mcts;
mod menu;
mod random;
mod score;
mod strategy;

pub use choices::{legal_action_lists, legal_choices, slot_actions};
pub use greedy::GreedyStrategy;
pub use heuristic::HeuristicStrategy;
pub use mcts::{MctsConfig, MctsStrategy};
pub use menu::{parse_request, parse_request_for_slot, ActionSet, MenuMove, MenuSwitch, ParsedRequest};
pub use random::RandomStrategy;
pub use score::{evaluate_state, move_score};
pub use strategy::{strategy_for, DecisionContext, Difficulty, Strategy};
