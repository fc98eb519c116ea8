//! Monte Carlo tree search over cloned battles
//!
//! The expert strategy. Every node in the tree is one of our own decision
//! points on an independent clone of the live battle; the opponent inside
//! the tree is modelled as the stateless greedy policy. Selection walks
//! UCB1, expansion submits one untried choice and fast-forwards the clone
//! to our next decision, rollouts play both sides greedily for a few
//! turns, and the backed-up value is the side's win estimate in [0, 1].
//!
//! The live battle handle is never mutated: search works exclusively on
//! clones made through the export/import pair.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

use rotom_protocol::{BattleRequest, Player};
use rotom_sim::{clone_battle, Simulator};

use crate::choices::legal_choices;
use crate::greedy::GreedyStrategy;
use crate::strategy::{DecisionContext, Strategy};

/// Engine exchanges allowed while fast-forwarding between decision points
const MAX_EXCHANGES: usize = 32;

/// Search budgets and knobs
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Maximum iterations per decision
    pub iterations: usize,
    /// Wall-clock cap per decision; whichever budget runs out first wins
    pub time_budget: Duration,
    /// Rollout length in resolved steps beyond the expanded node
    pub rollout_depth: usize,
    /// UCB1 exploration constant
    pub exploration: f64,
    /// Base seed; mixed with the request ID so turns diverge
    pub seed: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 200,
            time_budget: Duration::from_millis(300),
            rollout_depth: 4,
            exploration: std::f64::consts::SQRT_2,
            seed: 0,
        }
    }
}

impl MctsConfig {
    /// Default budgets with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

/// One tree node: a battle clone parked at one of our decision points
struct Node {
    /// The parked clone; `None` when advancing the clone failed, which
    /// scores as a loss rather than aborting the search
    battle: Option<Box<dyn Simulator>>,
    /// Choice that led here from the parent; `None` at the root
    choice: Option<String>,
    visits: u64,
    total: f64,
    children: Vec<usize>,
    /// Legal choices not yet expanded into children
    untried: Vec<String>,
}

impl Node {
    fn root(battle: Box<dyn Simulator>, untried: Vec<String>) -> Self {
        Self {
            battle: Some(battle),
            choice: None,
            visits: 0,
            total: 0.0,
            children: Vec::new(),
            untried,
        }
    }

    fn terminal(&self) -> bool {
        match &self.battle {
            Some(battle) => battle.ended(),
            None => true,
        }
    }
}

/// Tree search over battle clones with a greedy opponent model
pub struct MctsStrategy {
    config: MctsConfig,
}

impl MctsStrategy {
    pub fn new(config: MctsConfig) -> Self {
        Self { config }
    }

    fn search(&self, live: &dyn Simulator, ctx: &DecisionContext<'_>, legal: &[String]) -> Option<String> {
        let me = ctx.side;
        let my_name = ctx.request.side.as_ref().map(|s| s.name.clone());
        let root_battle = clone_battle(live).ok()?;

        let mut rng = SmallRng::seed_from_u64(mix_seed(
            self.config.seed,
            ctx.request.rqid.unwrap_or(0),
        ));
        let mut nodes = vec![Node::root(root_battle, legal.to_vec())];

        let deadline = Instant::now() + self.config.time_budget;
        let mut spent = 0;
        for _ in 0..self.config.iterations {
            if Instant::now() >= deadline {
                break;
            }
            spent += 1;

            // Selection: walk UCB1 until a node with untried choices
            let mut path = vec![0];
            let mut current = 0;
            while nodes[current].untried.is_empty()
                && !nodes[current].children.is_empty()
                && !nodes[current].terminal()
            {
                current = select_child(&nodes, current, self.config.exploration);
                path.push(current);
            }

            // Expansion: try one untried choice on a fresh clone
            if !nodes[current].terminal() {
                if let Some(choice) = nodes[current].untried.pop() {
                    let child = self.expand(&nodes[current], me, choice);
                    nodes.push(child);
                    let id = nodes.len() - 1;
                    nodes[current].children.push(id);
                    path.push(id);
                    current = id;
                }
            }

            // Evaluation: terminal outcome, or a short greedy rollout
            let value = match &nodes[current].battle {
                None => 0.0,
                Some(battle) if battle.ended() => {
                    outcome_value(battle.as_ref(), my_name.as_deref())
                }
                Some(battle) => self.rollout(battle.as_ref(), me, my_name.as_deref(), &mut rng),
            };

            for &id in &path {
                nodes[id].visits += 1;
                nodes[id].total += value;
            }
        }

        tracing::debug!(
            iterations = spent,
            nodes = nodes.len(),
            "search finished"
        );
        best_root_choice(&nodes)
    }

    /// Clone the parent, submit our choice, and fast-forward to our next
    /// decision point with the opponent answered greedily
    fn expand(&self, parent: &Node, me: Player, choice: String) -> Node {
        let battle = parent
            .battle
            .as_deref()
            .and_then(|b| advance(b, me, &choice));
        let untried = match &battle {
            Some(b) if !b.ended() => my_choices(b.as_ref(), me),
            _ => Vec::new(),
        };
        Node {
            battle,
            choice: Some(choice),
            visits: 0,
            total: 0.0,
            children: Vec::new(),
            untried,
        }
    }

    /// Play both sides greedily for a few steps, then judge the position
    fn rollout(
        &self,
        parent: &dyn Simulator,
        me: Player,
        my_name: Option<&str>,
        rng: &mut SmallRng,
    ) -> f64 {
        let Ok(mut battle) = clone_battle(parent) else {
            return 0.0;
        };

        let opp = me.opponent();
        for _ in 0..self.config.rollout_depth {
            if battle.ended() {
                break;
            }
            let mut acted = false;
            for side in [me, opp] {
                if let Some(req) = typed_request(battle.as_ref(), side) {
                    if req.needs_decision() {
                        let choice = rollout_choice(&req, rng);
                        if battle.choose(side, &choice).is_ok() {
                            acted = true;
                        }
                    }
                }
            }
            if !acted {
                break;
            }
        }

        if battle.ended() {
            return outcome_value(battle.as_ref(), my_name);
        }
        position_value(battle.as_ref(), me)
    }
}

impl Strategy for MctsStrategy {
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> String {
        let legal = legal_choices(ctx.request);
        if legal.is_empty() {
            return "default".to_string();
        }
        if legal.len() == 1 {
            return legal[0].clone();
        }

        let Some(live) = ctx.battle else {
            tracing::warn!("no battle handle to search, deciding greedily");
            return GreedyStrategy::new().decide(ctx);
        };

        match self.search(live, ctx, &legal) {
            Some(choice) => choice,
            None => {
                tracing::warn!("battle clone failed, deciding greedily");
                GreedyStrategy::new().decide(ctx)
            }
        }
    }
}

/// UCB1 over a node's children; unvisited children go first
fn select_child(nodes: &[Node], parent: usize, exploration: f64) -> usize {
    let parent_visits = nodes[parent].visits.max(1) as f64;
    let mut best = nodes[parent].children[0];
    let mut best_score = f64::NEG_INFINITY;
    for &child in &nodes[parent].children {
        let node = &nodes[child];
        let score = if node.visits == 0 {
            f64::INFINITY
        } else {
            node.total / node.visits as f64
                + exploration * (parent_visits.ln() / node.visits as f64).sqrt()
        };
        if score > best_score {
            best_score = score;
            best = child;
        }
    }
    best
}

/// The root's most visited child; total value breaks ties
fn best_root_choice(nodes: &[Node]) -> Option<String> {
    let best = nodes[0]
        .children
        .iter()
        .copied()
        .max_by(|&a, &b| {
            nodes[a]
                .visits
                .cmp(&nodes[b].visits)
                .then_with(|| {
                    nodes[a]
                        .total
                        .partial_cmp(&nodes[b].total)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        })?;
    nodes[best].choice.clone()
}

/// Submit a choice and answer the opponent until our next decision point
///
/// Returns `None` when the engine rejects a submission or a clone fails;
/// the caller scores that branch as lost instead of propagating an error.
fn advance(parent: &dyn Simulator, me: Player, choice: &str) -> Option<Box<dyn Simulator>> {
    let mut battle = clone_battle(parent).ok()?;
    let before = rqid_of(battle.as_ref(), me);
    battle.choose(me, choice).ok()?;

    let opp = me.opponent();
    for _ in 0..MAX_EXCHANGES {
        if battle.ended() {
            return Some(battle);
        }
        // Our own menu is sticky until the engine resolves, so a moved
        // rqid is what marks the next decision point
        if rqid_of(battle.as_ref(), me) != before && pending(battle.as_ref(), me) {
            return Some(battle);
        }
        if let Some(req) = typed_request(battle.as_ref(), opp) {
            if req.needs_decision() {
                let answer = GreedyStrategy::choose_for_request(&req);
                battle.choose(opp, &answer).ok()?;
                continue;
            }
        }
        return Some(battle);
    }
    Some(battle)
}

/// Rollout policy: greedy, with an occasional uniform pick mixed in so
/// repeated rollouts do not all replay one line
fn rollout_choice(req: &BattleRequest, rng: &mut SmallRng) -> String {
    if rng.gen_bool(0.25) {
        let universe = legal_choices(req);
        if !universe.is_empty() {
            let pick = rng.gen_range(0..universe.len());
            return universe[pick].clone();
        }
    }
    GreedyStrategy::choose_for_request(req)
}

fn typed_request(battle: &dyn Simulator, side: Player) -> Option<BattleRequest> {
    battle.request(side).and_then(|v| BattleRequest::parse(&v))
}

fn pending(battle: &dyn Simulator, side: Player) -> bool {
    typed_request(battle, side).is_some_and(|r| r.needs_decision())
}

fn rqid_of(battle: &dyn Simulator, side: Player) -> Option<u64> {
    typed_request(battle, side).and_then(|r| r.rqid)
}

fn my_choices(battle: &dyn Simulator, me: Player) -> Vec<String> {
    match typed_request(battle, me) {
        Some(req) => legal_choices(&req),
        None => Vec::new(),
    }
}

/// Win estimate for a finished battle
fn outcome_value(battle: &dyn Simulator, my_name: Option<&str>) -> f64 {
    match (battle.winner(), my_name) {
        (Some(winner), Some(name)) if winner == name => 1.0,
        (Some(_), _) => 0.0,
        (None, _) => 0.5,
    }
}

/// Win estimate for an unfinished battle from remaining team HP
fn position_value(battle: &dyn Simulator, me: Player) -> f64 {
    let mine = side_hp_fraction(battle, me).unwrap_or(0.5);
    let theirs = side_hp_fraction(battle, me.opponent()).unwrap_or(0.5);
    (0.5 + 0.5 * (mine - theirs)).clamp(0.0, 1.0)
}

fn side_hp_fraction(battle: &dyn Simulator, side: Player) -> Option<f64> {
    let req = typed_request(battle, side)?;
    let info = req.side?;
    if info.pokemon.is_empty() {
        return None;
    }
    let total: f64 = info
        .pokemon
        .iter()
        .map(|p| p.hp_percent() as f64 / 100.0)
        .sum();
    Some(total / info.pokemon.len() as f64)
}

fn mix_seed(seed: u64, salt: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    salt.hash(&mut hasher);
    hasher.finish()
}
