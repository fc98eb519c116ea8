//! The pluggable decision seam
//!
//! A strategy turns one request into one choice string. Everything it may
//! consult travels in a [`DecisionContext`]; everything it returns goes
//! straight to the engine. Strategies never talk to the simulator
//! themselves except through the optional handle, and then only via
//! clones.

use rotom_battle::BattleState;
use rotom_protocol::{BattleRequest, Player};
use rotom_sim::Simulator;

use crate::greedy::GreedyStrategy;
use crate::heuristic::HeuristicStrategy;
use crate::mcts::{MctsConfig, MctsStrategy};
use crate::random::RandomStrategy;

/// Everything a strategy may consult for one decision
pub struct DecisionContext<'a> {
    /// The side being decided for
    pub side: Player,
    /// The raw (typed) request this decision answers
    pub request: &'a BattleRequest,
    /// The tracked snapshot for this battle
    pub state: &'a BattleState,
    /// Live battle handle for strategies that search by forward
    /// simulation; must only ever be cloned, never mutated
    pub battle: Option<&'a dyn Simulator>,
}

/// A decision policy
///
/// `decide` returns the full choice string for the side. Implementations
/// pick from the legal universe and fall back to `"default"` when
/// nothing else applies; they never panic on a malformed menu.
pub trait Strategy: Send {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Pick the choice string answering `ctx.request`
    fn decide(&mut self, ctx: &DecisionContext<'_>) -> String;
}

/// Preset strength levels mapped to concrete strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Random,
    Greedy,
    Heuristic,
    Expert,
}

impl Difficulty {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Some(Difficulty::Random),
            "greedy" => Some(Difficulty::Greedy),
            "heuristic" => Some(Difficulty::Heuristic),
            "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Random => "random",
            Difficulty::Greedy => "greedy",
            Difficulty::Heuristic => "heuristic",
            Difficulty::Expert => "expert",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Build the strategy for a difficulty; `seed` pins all of its sampling
pub fn strategy_for(difficulty: Difficulty, seed: u64) -> Box<dyn Strategy> {
    match difficulty {
        Difficulty::Random => Box::new(RandomStrategy::seeded(seed)),
        Difficulty::Greedy => Box::new(GreedyStrategy::new()),
        Difficulty::Heuristic => Box::new(HeuristicStrategy::new()),
        Difficulty::Expert => Box::new(MctsStrategy::new(MctsConfig::seeded(seed))),
    }
}
