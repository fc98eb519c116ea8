//! Immediate-value scoring
//!
//! The shared arithmetic under Greedy and Heuristic: how hard a menu
//! move hits a known defender, and how good a whole position looks.
//! Everything degrades to neutral factors when the snapshot has not
//! revealed the relevant information yet, so sparse early-game state
//! still ranks sanely.

use rotom_battle::{BattlePokemon, BattleState, Status};
use rotom_protocol::{MoveCategory, Player, Stat};

use crate::menu::MenuMove;

/// Estimated immediate value of throwing a move at one defender
///
/// Unitless: base power folded with STAB, the type chart, the relevant
/// boosted stat ratio, accuracy, and the burn penalty on physical hits.
/// Status moves and unknown base power score zero, which is what pushes
/// Greedy toward a switch when nothing on the menu threatens damage.
pub fn move_score(
    mv: &MenuMove,
    attacker: Option<&BattlePokemon>,
    defender: Option<&BattlePokemon>,
) -> f32 {
    if !mv.category.is_damaging() || mv.base_power == 0 {
        return 0.0;
    }

    let mut score = mv.base_power as f32;

    if let Some(t) = mv.move_type {
        if let Some(att) = attacker {
            if att.current_types().contains(&t) {
                score *= 1.5;
            }
        }
        if let Some(def) = defender {
            score *= t.effectiveness_against(&def.current_types());
        }
    }

    if let (Some(att), Some(def)) = (attacker, defender) {
        let (attack, defense) = match mv.category {
            MoveCategory::Physical => (
                att.boosts.modify(Stat::Atk, att.stats.atk),
                def.boosts.modify(Stat::Def, def.stats.def),
            ),
            MoveCategory::Special => (
                att.boosts.modify(Stat::Spa, att.stats.spa),
                def.boosts.modify(Stat::Spd, def.stats.spd),
            ),
            MoveCategory::Status => (0, 0),
        };
        if attack > 0 && defense > 0 {
            score *= attack as f32 / defense as f32;
        }
        if att.status == Some(Status::Burn) && mv.category == MoveCategory::Physical {
            score *= 0.5;
        }
    }

    if let Some(acc) = mv.accuracy {
        score *= acc as f32 / 100.0;
    }

    score
}

/// Positional evaluation in [0, 1] from both teams' remaining HP
///
/// 0.5 is even, 1.0 is the whole opposing team down with ours untouched.
/// Used as the depth-cutoff value in search and as a coarse progress
/// meter elsewhere.
pub fn evaluate_state(state: &BattleState, side: Player) -> f32 {
    let mine = state.side(side).team_hp_fraction();
    let theirs = state.side(side.opponent()).team_hp_fraction();
    (0.5 + 0.5 * (mine - theirs)).clamp(0.0, 1.0)
}
