//! Legal choice enumeration
//!
//! Builds the complete universe of syntactically valid choices for one
//! side from its decoded menus. Strategies sample or rank what this
//! module emits; nothing above it hand-builds choice strings. The
//! enumerator does not rank, it only enumerates.

use rotom_protocol::{render_choice, Action, BattleRequest, MoveTarget};

use crate::menu::{parse_request_for_slot, ActionSet, ParsedRequest};

/// Legal single-slot picks for one menu
///
/// Target expansion happens here: in doubles an "any"-target move fans
/// out into one action per opposing slot (negative offsets), while
/// normal and spread targets stay bare. An empty result means the slot
/// has nothing legal and the caller substitutes pass or default.
pub fn slot_actions(set: &ActionSet, foe_slots: usize) -> Vec<Action> {
    if set.force_switch {
        return set
            .usable_switches()
            .map(|s| Action::Switch(s.index))
            .collect();
    }

    let mut actions = Vec::new();
    for mv in set.usable_moves() {
        if mv.target == MoveTarget::Any && foe_slots > 1 {
            for foe in 1..=foe_slots {
                actions.push(Action::targeted_move(mv.index, -(foe as i8)));
            }
        } else {
            actions.push(Action::plain_move(mv.index));
        }
    }
    for s in set.usable_switches() {
        actions.push(Action::Switch(s.index));
    }
    actions
}

/// Every legal combined choice for the side, as one action list each
///
/// A waiting side gets an empty universe. A side with no legal picks at
/// all gets the degenerate universe: `default` in singles, `pass, pass`
/// in doubles. In doubles the two slots combine cartesian-style, with
/// slot 0's forced switch claiming its bench member before slot 1 picks.
pub fn legal_action_lists(request: &BattleRequest) -> Vec<Vec<Action>> {
    if request.wait || !request.needs_decision() {
        return Vec::new();
    }
    if request.team_preview {
        return vec![vec![Action::Default]];
    }

    let slots = request.slot_count().max(1);
    let per_slot: Vec<Vec<Action>> = (0..slots)
        .map(|i| match parse_request_for_slot(request, i) {
            ParsedRequest::Menu(set) => slot_actions(&set, slots),
            _ => Vec::new(),
        })
        .collect();

    if slots == 1 {
        let only = per_slot.into_iter().next().unwrap_or_default();
        if only.is_empty() {
            return vec![vec![Action::Default]];
        }
        return only.into_iter().map(|a| vec![a]).collect();
    }

    let first: Vec<Action> = if per_slot[0].is_empty() {
        vec![Action::Pass]
    } else {
        per_slot[0].clone()
    };

    let mut combined = Vec::new();
    for a in first {
        let claimed = match a {
            Action::Switch(n) => Some(n),
            _ => None,
        };
        let second: Vec<Action> = per_slot[1]
            .iter()
            .copied()
            .filter(|b| match b {
                Action::Switch(m) => Some(*m) != claimed,
                _ => true,
            })
            .collect();
        if second.is_empty() {
            combined.push(vec![a, Action::Pass]);
        } else {
            for b in second {
                combined.push(vec![a, b]);
            }
        }
    }

    if combined.is_empty() {
        combined.push(vec![Action::Pass, Action::Pass]);
    }
    combined
}

/// [`legal_action_lists`] rendered to choice strings
pub fn legal_choices(request: &BattleRequest) -> Vec<String> {
    legal_action_lists(request)
        .iter()
        .map(|actions| render_choice(actions))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn singles_menu() -> BattleRequest {
        BattleRequest::parse(&json!({
            "rqid": 7,
            "active": [{
                "moves": [
                    {"move": "Earthquake", "id": "earthquake", "pp": 16, "maxpp": 16,
                     "target": "allAdjacent", "disabled": false},
                    {"move": "Dragon Claw", "id": "dragonclaw", "pp": 24, "maxpp": 24,
                     "target": "normal", "disabled": true},
                ]
            }],
            "side": {
                "name": "BotPlayer",
                "id": "p1",
                "pokemon": [
                    {"ident": "p1: Garchomp", "details": "Garchomp, L50", "condition": "170/170",
                     "active": true, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                    {"ident": "p1: Heatran", "details": "Heatran, L50", "condition": "160/160",
                     "active": false, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_singles_moves_and_bench() {
        // The disabled move is out; the healthy bench member is in
        let choices = legal_choices(&singles_menu());
        assert_eq!(choices, vec!["move 1", "switch 2"]);
    }

    #[test]
    fn test_fainted_bench_member_is_not_a_switch_target() {
        let req = BattleRequest::parse(&json!({
            "rqid": 8,
            "active": [{
                "moves": [
                    {"move": "Tackle", "id": "tackle", "pp": 56, "maxpp": 56,
                     "target": "normal", "disabled": false},
                ]
            }],
            "side": {
                "name": "BotPlayer",
                "id": "p1",
                "pokemon": [
                    {"ident": "p1: Garchomp", "details": "Garchomp, L50", "condition": "170/170",
                     "active": true, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                    {"ident": "p1: Klefki", "details": "Klefki, L50", "condition": "0 fnt",
                     "active": false, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                    {"ident": "p1: Heatran", "details": "Heatran, L50", "condition": "160/160",
                     "active": false, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                ]
            }
        }))
        .unwrap();

        // Klefki is down, so slot 2 never appears; Heatran stays reachable
        assert_eq!(legal_choices(&req), vec!["move 1", "switch 3"]);
    }

    #[test]
    fn test_wait_request_has_empty_universe() {
        let wait = BattleRequest::parse(&json!({"wait": true})).unwrap();
        assert!(legal_choices(&wait).is_empty());
    }

    #[test]
    fn test_singles_forced_switch_with_empty_bench_is_default() {
        let req = BattleRequest::parse(&json!({
            "forceSwitch": [true],
            "side": {
                "name": "BotPlayer",
                "id": "p1",
                "pokemon": [
                    {"ident": "p1: Garchomp", "details": "Garchomp, L50", "condition": "0 fnt",
                     "active": true, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                    {"ident": "p1: Klefki", "details": "Klefki, L50", "condition": "0 fnt",
                     "active": false, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                ]
            }
        }))
        .unwrap();

        assert_eq!(legal_choices(&req), vec!["default"]);
    }

    fn doubles_forced(second_forced: bool) -> BattleRequest {
        BattleRequest::parse(&json!({
            "forceSwitch": [true, second_forced],
            "side": {
                "name": "BotPlayer",
                "id": "p1",
                "pokemon": [
                    {"ident": "p1: Sunkern", "details": "Sunkern, L50", "condition": "0 fnt",
                     "active": true, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                    {"ident": "p1: Seedot", "details": "Seedot, L50",
                     "condition": if second_forced { "0 fnt" } else { "90/90" },
                     "active": true, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                    {"ident": "p1: Squirtle", "details": "Squirtle, L50", "condition": "150/150",
                     "active": false, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                    {"ident": "p1: Totodile", "details": "Totodile, L50", "condition": "150/150",
                     "active": false, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_doubles_single_forced_slot_passes_the_other() {
        // Slot 0 picks either bench member; slot 1 has no decision
        let choices = legal_choices(&doubles_forced(false));
        assert_eq!(choices, vec!["switch 3, pass", "switch 4, pass"]);
    }

    #[test]
    fn test_doubles_forced_switches_never_share_a_member() {
        let choices = legal_choices(&doubles_forced(true));
        assert_eq!(
            choices,
            vec![
                "switch 3, switch 4",
                "switch 4, switch 3",
            ]
        );
    }

    #[test]
    fn test_doubles_both_forced_empty_bench_is_pass_pass() {
        let req = BattleRequest::parse(&json!({
            "forceSwitch": [true, true],
            "side": {
                "name": "BotPlayer",
                "id": "p1",
                "pokemon": [
                    {"ident": "p1: Sunkern", "details": "Sunkern, L50", "condition": "0 fnt",
                     "active": true, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                    {"ident": "p1: Seedot", "details": "Seedot, L50", "condition": "0 fnt",
                     "active": true, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                ]
            }
        }))
        .unwrap();

        assert_eq!(legal_choices(&req), vec!["pass, pass"]);
    }

    #[test]
    fn test_doubles_shared_last_bench_member_goes_to_slot_zero() {
        let req = BattleRequest::parse(&json!({
            "forceSwitch": [true, true],
            "side": {
                "name": "BotPlayer",
                "id": "p1",
                "pokemon": [
                    {"ident": "p1: Sunkern", "details": "Sunkern, L50", "condition": "0 fnt",
                     "active": true, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                    {"ident": "p1: Seedot", "details": "Seedot, L50", "condition": "0 fnt",
                     "active": true, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                    {"ident": "p1: Squirtle", "details": "Squirtle, L50", "condition": "150/150",
                     "active": false, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                ]
            }
        }))
        .unwrap();

        assert_eq!(legal_choices(&req), vec!["switch 3, pass"]);
    }

    fn doubles_menu() -> BattleRequest {
        BattleRequest::parse(&json!({
            "active": [
                {"moves": [
                    {"move": "Shadow Ball", "id": "shadowball", "pp": 24, "maxpp": 24,
                     "target": "any", "disabled": false},
                    {"move": "Heat Wave", "id": "heatwave", "pp": 16, "maxpp": 16,
                     "target": "allAdjacentFoes", "disabled": false},
                ]},
                {"moves": [
                    {"move": "Tackle", "id": "tackle", "pp": 56, "maxpp": 56,
                     "target": "normal", "disabled": false},
                ]}
            ],
            "side": {
                "name": "BotPlayer",
                "id": "p1",
                "pokemon": [
                    {"ident": "p1: Gengar", "details": "Gengar, L50", "condition": "140/140",
                     "active": true, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                    {"ident": "p1: Rattata", "details": "Rattata, L50", "condition": "110/110",
                     "active": true, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_doubles_any_target_fans_out_per_foe_slot() {
        let choices = legal_choices(&doubles_menu());
        assert!(choices.contains(&"move 1 -1, move 1".to_string()));
        assert!(choices.contains(&"move 1 -2, move 1".to_string()));
    }

    #[test]
    fn test_doubles_spread_move_takes_no_suffix() {
        let choices = legal_choices(&doubles_menu());
        assert!(choices.contains(&"move 2, move 1".to_string()));
        assert!(!choices.iter().any(|c| c.starts_with("move 2 -")));
    }

    #[test]
    fn test_doubles_empty_slot_contributes_pass() {
        let req = BattleRequest::parse(&json!({
            "active": [
                {"moves": [
                    {"move": "Tackle", "id": "tackle", "pp": 56, "maxpp": 56,
                     "target": "normal", "disabled": false},
                ]},
                {"moves": []}
            ],
            "side": {
                "name": "BotPlayer",
                "id": "p1",
                "pokemon": [
                    {"ident": "p1: Rattata", "details": "Rattata, L50", "condition": "110/110",
                     "active": true, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                ]
            }
        }))
        .unwrap();

        assert_eq!(legal_choices(&req), vec!["move 1, pass"]);
    }

    #[test]
    fn test_doubles_normal_turn_excludes_same_member_double_switch() {
        let req = BattleRequest::parse(&json!({
            "active": [
                {"moves": [
                    {"move": "Tackle", "id": "tackle", "pp": 56, "maxpp": 56,
                     "target": "normal", "disabled": false},
                ]},
                {"moves": [
                    {"move": "Pound", "id": "pound", "pp": 56, "maxpp": 56,
                     "target": "normal", "disabled": false},
                ]}
            ],
            "side": {
                "name": "BotPlayer",
                "id": "p1",
                "pokemon": [
                    {"ident": "p1: Rattata", "details": "Rattata, L50", "condition": "110/110",
                     "active": true, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                    {"ident": "p1: Meowth", "details": "Meowth, L50", "condition": "120/120",
                     "active": true, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                    {"ident": "p1: Pidgey", "details": "Pidgey, L50", "condition": "100/100",
                     "active": false, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                ]
            }
        }))
        .unwrap();

        let choices = legal_choices(&req);
        assert!(choices.contains(&"switch 3, move 1".to_string()));
        assert!(choices.contains(&"move 1, switch 3".to_string()));
        assert!(!choices.contains(&"switch 3, switch 3".to_string()));
    }
}
