//! Highest-immediate-damage policy
//!
//! Scores every legal choice by the damage its moves would deal this turn
//! and submits the best one. Switches carry a small base value plus a
//! defensive-matchup bonus, so they only win when nothing damages and the
//! safest bench member gets picked. No lookahead and no memory, which
//! makes it cheap enough to double as the opponent model inside tree
//! search.

use rotom_battle::matchup::best_effectiveness;
use rotom_battle::BattleState;
use rotom_protocol::{render_choice, Action, BattleRequest, Player};

use crate::choices::legal_action_lists;
use crate::menu::{slot_action_sets, ActionSet, MenuMove};
use crate::score::move_score;
use crate::strategy::{DecisionContext, Strategy};

/// Base value of a switch, so it only wins when every attack scores lower
const SWITCH_SCORE: f32 = 5.0;

/// Cap of the defensive-matchup bonus that orders bench members
const SWITCH_MATCHUP_BONUS: f32 = 2.0;

/// Spread moves hit every foe at reduced power
const SPREAD_FACTOR: f32 = 0.75;

/// Picks the legal choice with the highest immediate damage estimate
#[derive(Debug, Default)]
pub struct GreedyStrategy;

impl GreedyStrategy {
    pub fn new() -> Self {
        GreedyStrategy
    }

    /// Stateless pick straight off the request
    ///
    /// Without a snapshot the scores fall back to raw base power, which
    /// is what rollouts and opponent modelling want: fast and legal.
    pub fn choose_for_request(request: &BattleRequest) -> String {
        Self::pick(request, Player::P1, None)
    }

    fn pick(request: &BattleRequest, side: Player, state: Option<&BattleState>) -> String {
        let lists = legal_action_lists(request);
        if lists.is_empty() {
            return "default".to_string();
        }

        let sets = slot_action_sets(request);
        let mut best = 0;
        let mut best_score = f32::MIN;
        for (i, actions) in lists.iter().enumerate() {
            let score = score_choice(actions, &sets, side, state);
            if score > best_score {
                best_score = score;
                best = i;
            }
        }

        render_choice(&lists[best])
    }
}

impl Strategy for GreedyStrategy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> String {
        Self::pick(ctx.request, ctx.side, Some(ctx.state))
    }
}

/// Total damage estimate for one full choice (all slots)
pub(crate) fn score_choice(
    actions: &[Action],
    sets: &[ActionSet],
    side: Player,
    state: Option<&BattleState>,
) -> f32 {
    let mut total = 0.0;
    for (slot, action) in actions.iter().enumerate() {
        match action {
            Action::Move { slot: pick, target, .. } => {
                let Some(mv) = sets
                    .get(slot)
                    .and_then(|set| set.moves.iter().find(|m| m.index == *pick))
                else {
                    continue;
                };
                total += attack_score(mv, slot, *target, side, state);
            }
            Action::Switch(n) => total += SWITCH_SCORE + switch_matchup(*n, side, state),
            Action::Pass | Action::Default => {}
        }
    }
    total
}

/// How comfortably bench member `n` takes the current foes' typing
///
/// Bounded by [`SWITCH_MATCHUP_BONUS`], well under any usable attack's
/// score; it only decides between bench members once switching already
/// won. Zero without a snapshot.
fn switch_matchup(n: usize, side: Player, state: Option<&BattleState>) -> f32 {
    let Some(state) = state else {
        return 0.0;
    };
    let Some(candidate) = n
        .checked_sub(1)
        .and_then(|i| state.side(side).team.get(i))
    else {
        return 0.0;
    };
    let cand_types = candidate.current_types();

    let mut total = 0.0;
    let mut foes_seen = 0;
    for foe in state.opponent(side).actives() {
        let incoming = best_effectiveness(&foe.current_types(), &cand_types);
        total += SWITCH_MATCHUP_BONUS * (1.0 - incoming.min(4.0) / 4.0);
        foes_seen += 1;
    }
    if foes_seen == 0 {
        return 0.0;
    }
    total / foes_seen as f32
}

/// Damage estimate for one move pick, resolved against the snapshot
fn attack_score(
    mv: &MenuMove,
    slot: usize,
    target: Option<i8>,
    side: Player,
    state: Option<&BattleState>,
) -> f32 {
    let Some(state) = state else {
        return move_score(mv, None, None);
    };

    let attacker = state.side(side).active(slot);
    let foes = state.opponent(side);

    if mv.target.is_spread() {
        if foes.actives().next().is_none() {
            return move_score(mv, attacker, None);
        }
        let hits: f32 = foes
            .actives()
            .map(|def| move_score(mv, attacker, Some(def)))
            .sum();
        return hits * SPREAD_FACTOR;
    }

    // An explicit negative target names the opposing slot directly
    if let Some(t) = target {
        if t < 0 {
            let foe_slot = (-t - 1) as usize;
            if let Some(def) = foes.active(foe_slot) {
                return move_score(mv, attacker, Some(def));
            }
        }
    }

    foes.actives()
        .map(|def| move_score(mv, attacker, Some(def)))
        .reduce(f32::max)
        .unwrap_or_else(|| move_score(mv, attacker, None))
}
