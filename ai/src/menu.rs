//! Request decoding into per-slot decision menus
//!
//! A request describes what one side may legally do this turn, but in the
//! simulator's wire vocabulary. This module boils it down to an
//! [`ActionSet`] per active slot: the moves with their metadata, the
//! roster as switch targets, and the flags the enumerator keys on.
//! Decoding never fails; anything malformed or out of range becomes an
//! empty menu, which enumerates to a bare pass.

use rotom_battle::Type;
use rotom_protocol::{BattleRequest, MoveCategory, MoveSlot, MoveTarget, SidePokemon};

/// One move on the menu, with whatever metadata the request carried
#[derive(Debug, Clone)]
pub struct MenuMove {
    /// 1-indexed move slot, as `"move N"` wants it
    pub index: usize,
    pub id: String,
    pub name: String,
    /// Typing when the request is enriched with it; `None` scores neutral
    pub move_type: Option<Type>,
    pub base_power: u32,
    pub category: MoveCategory,
    /// Percent accuracy; `None` means the move cannot miss
    pub accuracy: Option<u32>,
    pub pp: u32,
    pub max_pp: u32,
    pub target: MoveTarget,
    pub disabled: bool,
}

impl MenuMove {
    fn from_slot(index: usize, slot: &MoveSlot) -> Self {
        let base_power = slot.base_power.unwrap_or(0);
        // Requests without category metadata: anything with base power
        // is treated as physical, the rest as status
        let category = match slot.category.as_deref() {
            Some(c) => MoveCategory::from_name(c),
            None if base_power > 0 => MoveCategory::Physical,
            None => MoveCategory::Status,
        };
        Self {
            index,
            id: slot.id.clone(),
            name: slot.name.clone(),
            move_type: slot.move_type.as_deref().and_then(Type::from_name),
            base_power,
            category,
            accuracy: slot.accuracy,
            pp: slot.pp,
            max_pp: slot.max_pp,
            target: MoveTarget::from_name(&slot.target),
            disabled: slot.disabled,
        }
    }

    /// Whether this move can be picked this turn
    pub fn usable(&self) -> bool {
        !self.disabled && self.pp > 0
    }
}

/// A roster member as a potential switch target
#[derive(Debug, Clone)]
pub struct MenuSwitch {
    /// 1-indexed team position, as `"switch N"` wants it
    pub index: usize,
    pub species: String,
    pub hp_percent: u32,
    pub fainted: bool,
}

impl MenuSwitch {
    fn from_side(index: usize, mon: &SidePokemon) -> Self {
        Self {
            index,
            species: mon.species().to_string(),
            hp_percent: mon.hp_percent(),
            fainted: mon.is_fainted(),
        }
    }

    /// Whether this member can actually come in
    pub fn usable(&self) -> bool {
        !self.fainted
    }
}

/// The decision menu for exactly one active slot
#[derive(Debug, Clone)]
pub struct ActionSet {
    /// Which active slot this menu belongs to (0 or 1)
    pub slot: usize,
    pub moves: Vec<MenuMove>,
    pub switches: Vec<MenuSwitch>,
    pub can_tera: bool,
    pub force_switch: bool,
    /// Switching is off the menu while trapped
    pub trapped: bool,
}

impl ActionSet {
    pub(crate) fn empty(slot: usize) -> Self {
        Self {
            slot,
            moves: Vec::new(),
            switches: Vec::new(),
            can_tera: false,
            force_switch: false,
            trapped: false,
        }
    }

    /// True when nothing on this menu can be picked
    pub fn is_empty(&self) -> bool {
        self.moves.iter().all(|m| !m.usable()) && self.switches.iter().all(|s| !s.usable())
    }

    pub fn usable_moves(&self) -> impl Iterator<Item = &MenuMove> {
        self.moves.iter().filter(|m| m.usable())
    }

    pub fn usable_switches(&self) -> impl Iterator<Item = &MenuSwitch> {
        self.switches.iter().filter(|s| s.usable())
    }
}

/// A request boiled down to what the decision layer cares about
#[derive(Debug, Clone)]
pub enum ParsedRequest {
    /// Nothing to decide; the opponent is still picking
    Wait,
    /// Pick a team order before the battle starts
    TeamPreview { team_size: usize },
    /// A decision menu for one slot
    Menu(ActionSet),
}

impl ParsedRequest {
    /// The menu, if this request carries one
    pub fn action_set(&self) -> Option<&ActionSet> {
        match self {
            ParsedRequest::Menu(set) => Some(set),
            _ => None,
        }
    }
}

/// Decode a request for slot 0, the singles case
pub fn parse_request(request: &BattleRequest) -> ParsedRequest {
    parse_request_for_slot(request, 0)
}

/// Decode a request for one active slot
///
/// In doubles the same request carries both slots; each is extracted
/// independently. An out-of-range slot yields an empty menu rather than
/// an error, as does a request with nothing recognizable in it.
pub fn parse_request_for_slot(request: &BattleRequest, slot: usize) -> ParsedRequest {
    if request.wait {
        return ParsedRequest::Wait;
    }
    if request.team_preview {
        let team_size = request.side.as_ref().map_or(0, |s| s.pokemon.len());
        return ParsedRequest::TeamPreview { team_size };
    }

    let mut set = ActionSet::empty(slot);

    if request.is_force_switch() {
        if request.force_switch_at(slot) {
            set.force_switch = true;
            set.switches = request
                .switch_candidates()
                .into_iter()
                .map(|(i, mon)| MenuSwitch::from_side(i, mon))
                .collect();
        }
        return ParsedRequest::Menu(set);
    }

    let Some(active) = request.active_slot(slot) else {
        return ParsedRequest::Menu(set);
    };

    set.moves = active
        .moves
        .iter()
        .enumerate()
        .map(|(i, m)| MenuMove::from_slot(i + 1, m))
        .collect();
    set.can_tera = active.can_tera();
    set.trapped = !active.can_switch();
    if active.can_switch() {
        set.switches = full_bench(request);
    }
    ParsedRequest::Menu(set)
}

/// Decode every slot's menu at once; scoring wants them side by side
pub(crate) fn slot_action_sets(request: &BattleRequest) -> Vec<ActionSet> {
    (0..request.slot_count().max(1))
        .map(|slot| {
            parse_request_for_slot(request, slot)
                .action_set()
                .cloned()
                .unwrap_or_else(|| ActionSet::empty(slot))
        })
        .collect()
}

/// The whole non-active roster, fainted members included; legality is the
/// enumerator's problem
fn full_bench(request: &BattleRequest) -> Vec<MenuSwitch> {
    let Some(side) = &request.side else {
        return Vec::new();
    };
    side.pokemon
        .iter()
        .enumerate()
        .filter(|(_, mon)| !mon.active)
        .map(|(i, mon)| MenuSwitch::from_side(i + 1, mon))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn menu_request() -> BattleRequest {
        BattleRequest::parse(&json!({
            "rqid": 3,
            "active": [{
                "moves": [
                    {"move": "Earthquake", "id": "earthquake", "pp": 16, "maxpp": 16,
                     "target": "allAdjacent", "disabled": false,
                     "type": "Ground", "basePower": 100, "category": "Physical"},
                    {"move": "Dragon Claw", "id": "dragonclaw", "pp": 24, "maxpp": 24,
                     "target": "normal", "disabled": true,
                     "type": "Dragon", "basePower": 80, "category": "Physical"},
                ],
                "canTerastallize": "Steel"
            }],
            "side": {
                "name": "BotPlayer",
                "id": "p1",
                "pokemon": [
                    {"ident": "p1: Garchomp", "details": "Garchomp, L50", "condition": "170/170",
                     "active": true, "stats": {"atk": 150, "def": 100, "spa": 90, "spd": 95, "spe": 120},
                     "moves": ["earthquake", "dragonclaw"], "baseAbility": "roughskin", "item": ""},
                    {"ident": "p1: Heatran", "details": "Heatran, L50", "condition": "160/160",
                     "active": false, "stats": {"atk": 100, "def": 120, "spa": 140, "spd": 121, "spe": 97},
                     "moves": ["magmastorm"], "baseAbility": "flashfire", "item": "leftovers"},
                    {"ident": "p1: Klefki", "details": "Klefki, L50", "condition": "0 fnt",
                     "active": false, "stats": {"atk": 60, "def": 90, "spa": 60, "spd": 85, "spe": 70},
                     "moves": ["thunderwave"], "baseAbility": "prankster", "item": ""},
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_menu_maps_moves_with_metadata() {
        let parsed = parse_request(&menu_request());
        let set = parsed.action_set().unwrap();

        assert_eq!(set.slot, 0);
        assert_eq!(set.moves.len(), 2);
        assert!(set.can_tera);
        assert!(!set.force_switch);
        assert!(!set.trapped);

        let eq = &set.moves[0];
        assert_eq!(eq.index, 1);
        assert_eq!(eq.id, "earthquake");
        assert_eq!(eq.move_type, Some(Type::Ground));
        assert_eq!(eq.base_power, 100);
        assert_eq!(eq.category, MoveCategory::Physical);
        assert_eq!(eq.target, MoveTarget::AllAdjacent);
        assert!(eq.usable());

        let claw = &set.moves[1];
        assert!(claw.disabled);
        assert!(!claw.usable());
        assert_eq!(set.usable_moves().count(), 1);
    }

    #[test]
    fn test_menu_maps_bench_with_fainted_flag() {
        let parsed = parse_request(&menu_request());
        let set = parsed.action_set().unwrap();

        assert_eq!(set.switches.len(), 2);
        assert_eq!(set.switches[0].index, 2);
        assert_eq!(set.switches[0].species, "Heatran");
        assert!(set.switches[0].usable());
        assert_eq!(set.switches[1].species, "Klefki");
        assert!(set.switches[1].fainted);
        assert_eq!(set.usable_switches().count(), 1);
    }

    #[test]
    fn test_force_switch_menu_has_legal_bench_only() {
        let req = BattleRequest::parse(&json!({
            "forceSwitch": [true],
            "noCancel": true,
            "side": {
                "name": "BotPlayer",
                "id": "p1",
                "pokemon": [
                    {"ident": "p1: Garchomp", "details": "Garchomp, L50", "condition": "0 fnt",
                     "active": true, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                    {"ident": "p1: Heatran", "details": "Heatran, L50", "condition": "160/160",
                     "active": false, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                    {"ident": "p1: Klefki", "details": "Klefki, L50", "condition": "0 fnt",
                     "active": false, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                ]
            }
        }))
        .unwrap();

        let set = parse_request(&req);
        let set = set.action_set().unwrap();
        assert!(set.force_switch);
        assert!(set.moves.is_empty());
        // The fainted Klefki is not a candidate during a forced switch
        assert_eq!(set.switches.len(), 1);
        assert_eq!(set.switches[0].index, 2);
    }

    #[test]
    fn test_wait_and_team_preview() {
        let wait = BattleRequest::parse(&json!({"wait": true})).unwrap();
        assert!(matches!(parse_request(&wait), ParsedRequest::Wait));

        let preview = BattleRequest::parse(&json!({
            "teamPreview": true,
            "side": {"name": "BotPlayer", "id": "p1", "pokemon": [
                {"ident": "p1: Garchomp", "details": "Garchomp, L50", "condition": "170/170",
                 "active": false, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
            ]}
        }))
        .unwrap();
        assert!(matches!(
            parse_request(&preview),
            ParsedRequest::TeamPreview { team_size: 1 }
        ));
    }

    #[test]
    fn test_out_of_range_slot_is_empty_menu() {
        let parsed = parse_request_for_slot(&menu_request(), 5);
        let set = parsed.action_set().unwrap();
        assert!(set.is_empty());
        assert!(set.moves.is_empty());
        assert!(!set.force_switch);
    }

    #[test]
    fn test_empty_request_is_empty_menu() {
        let bare = BattleRequest::parse(&json!({})).unwrap();
        let parsed = parse_request(&bare);
        let set = parsed.action_set().unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_trapped_slot_offers_no_switches() {
        let req = BattleRequest::parse(&json!({
            "active": [{
                "moves": [
                    {"move": "Fire Spin", "id": "firespin", "pp": 24, "maxpp": 24,
                     "target": "normal", "disabled": false}
                ],
                "trapped": true
            }],
            "side": {
                "name": "BotPlayer",
                "id": "p1",
                "pokemon": [
                    {"ident": "p1: Magmar", "details": "Magmar, L50", "condition": "140/140",
                     "active": true, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                    {"ident": "p1: Heatran", "details": "Heatran, L50", "condition": "160/160",
                     "active": false, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                ]
            }
        }))
        .unwrap();

        let parsed = parse_request(&req);
        let set = parsed.action_set().unwrap();
        assert!(set.trapped);
        assert!(set.switches.is_empty());
        assert_eq!(set.usable_moves().count(), 1);
    }
}
