//! Damage plus position judgement
//!
//! Starts from the greedy damage estimate and layers positional terms on
//! top of it: how each switch candidate matches up into the opposing
//! actives, how much trouble the current active is in, what entry hazards
//! cost on the way in, and whether terastallizing upgrades the chosen
//! move. Still a single-turn evaluation, so it stays fast enough to run
//! every decision without a time budget.

use rotom_battle::matchup::{best_effectiveness, is_weak_to_any};
use rotom_battle::{BattleSide, BattleState, Type};
use rotom_protocol::{render_choice, Action, Player};

use crate::choices::legal_action_lists;
use crate::greedy::score_choice;
use crate::menu::slot_action_sets;
use crate::strategy::{DecisionContext, Strategy};

/// Weight on the type matchup edge of a switch candidate
const MATCHUP_WEIGHT: f32 = 30.0;

/// Cost of bringing a member in over entry hazards
const HAZARD_PENALTY: f32 = 15.0;

/// Bonus to leaving when the active is type-weak to a foe
const ESCAPE_WEAKNESS: f32 = 20.0;

/// Bonus to leaving on critical HP
const ESCAPE_LOW_HP: f32 = 15.0;

/// Bonus to leaving when the active carries a status
const ESCAPE_STATUS: f32 = 5.0;

/// Extra bonus when that status can cost whole turns
const ESCAPE_BLOCKING_STATUS: f32 = 5.0;

/// Bonus to leaving when switching sheds a draining volatile
const ESCAPE_DRAIN: f32 = 10.0;

/// HP fraction below which staying in looks desperate
const LOW_HP: f32 = 0.25;

/// Single-turn evaluation with positional judgement
#[derive(Debug, Default)]
pub struct HeuristicStrategy;

impl HeuristicStrategy {
    pub fn new() -> Self {
        HeuristicStrategy
    }
}

impl Strategy for HeuristicStrategy {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> String {
        let lists = legal_action_lists(ctx.request);
        if lists.is_empty() {
            return "default".to_string();
        }

        let sets = slot_action_sets(ctx.request);
        let mut best = 0;
        let mut best_score = f32::MIN;
        for (i, actions) in lists.iter().enumerate() {
            let score = score_choice(actions, &sets, ctx.side, Some(ctx.state))
                + positional_terms(actions, ctx.side, ctx.state);
            if score > best_score {
                best_score = score;
                best = i;
            }
        }

        let mut chosen = lists[best].clone();
        upgrade_tera(&mut chosen, ctx);
        render_choice(&chosen)
    }
}

/// Score adjustments beyond raw damage, summed over the slots
fn positional_terms(actions: &[Action], side: Player, state: &BattleState) -> f32 {
    let mine = state.side(side);
    let foes = state.opponent(side);

    let mut total = 0.0;
    for (slot, action) in actions.iter().enumerate() {
        if let Action::Switch(n) = action {
            total += switch_value(mine, foes, *n);
            total += escape_pressure(mine, foes, slot);
        }
    }
    total
}

/// How good the incoming member's matchup is, hazards included
fn switch_value(mine: &BattleSide, foes: &BattleSide, n: usize) -> f32 {
    let mut value = 0.0;
    if mine.has_hazards() {
        value -= HAZARD_PENALTY;
    }

    let Some(candidate) = n.checked_sub(1).and_then(|i| mine.team.get(i)) else {
        return value;
    };
    let cand_types = candidate.current_types();

    let mut edge = 0.0;
    let mut foes_seen = 0;
    for foe in foes.actives() {
        let foe_types = foe.current_types();
        edge += best_effectiveness(&cand_types, &foe_types)
            - best_effectiveness(&foe_types, &cand_types);
        foes_seen += 1;
    }
    if foes_seen > 0 {
        value += edge / foes_seen as f32 * MATCHUP_WEIGHT;
    }
    value
}

/// How badly the current occupant of a slot wants out
fn escape_pressure(mine: &BattleSide, foes: &BattleSide, slot: usize) -> f32 {
    let Some(active) = mine.active(slot) else {
        return 0.0;
    };

    let foe_types: Vec<Type> = foes.actives().flat_map(|f| f.current_types()).collect();

    let mut pressure = 0.0;
    if is_weak_to_any(&active.current_types(), &foe_types) {
        pressure += ESCAPE_WEAKNESS;
    }
    if active.hp_fraction() < LOW_HP {
        pressure += ESCAPE_LOW_HP;
    }
    if let Some(status) = active.status {
        pressure += ESCAPE_STATUS;
        if status.blocks_action() {
            pressure += ESCAPE_BLOCKING_STATUS;
        }
    }
    // Status follows through a switch, draining volatiles come off on it
    if active.volatiles.iter().any(|v| v.is_draining()) {
        pressure += ESCAPE_DRAIN;
    }
    pressure
}

/// Flag the first picked move whose type the active would gain STAB on
///
/// Terastallization is spent for the battle once used, so it is only
/// worth flagging when it changes the chosen move's damage.
fn upgrade_tera(actions: &mut [Action], ctx: &DecisionContext<'_>) {
    for (slot, action) in actions.iter_mut().enumerate() {
        let Action::Move { slot: pick, tera, .. } = action else {
            continue;
        };
        if *tera {
            return;
        }

        let Some(active) = ctx.request.active_slot(slot) else {
            continue;
        };
        let Some(tera_type) = active.can_terastallize.as_deref().and_then(Type::from_name)
        else {
            continue;
        };
        let Some(mv) = pick.checked_sub(1).and_then(|i| active.moves.get(i)) else {
            continue;
        };
        let move_type = mv.move_type.as_deref().and_then(Type::from_name);
        if move_type != Some(tera_type) {
            continue;
        }

        let already_stab = ctx
            .state
            .side(ctx.side)
            .active(slot)
            .map(|mon| mon.current_types().contains(&tera_type))
            .unwrap_or(false);
        if !already_stab {
            *tera = true;
            return;
        }
    }
}
