//! Per-Pokemon battle snapshot

use std::collections::HashSet;

use rotom_protocol::{SidePokemon, to_id};

use super::pokemon_type::Type;
use super::stats::{Boosts, StatLine};
use super::status::{Status, Volatile};

/// One Pokemon's view in the battle snapshot
///
/// Identity facts (species, level) are fixed at construction; battle facts
/// (HP, status, boosts) are refreshed by [`BattlePokemon::sync`] whenever
/// the simulator reports a new side block. Typing starts unknown and is
/// filled in as it is revealed; effectiveness math treats unknown typing
/// as neutral.
#[derive(Debug, Clone)]
pub struct BattlePokemon {
    /// Species display name ("Rotom-Wash")
    pub species: String,

    /// Species wire ID ("rotomwash")
    pub species_id: String,

    /// Display name from the ident (nickname or species)
    pub name: String,

    /// Level (1-100)
    pub level: u8,

    /// Known typing; empty until revealed
    pub types: Vec<Type>,

    /// Current HP (raw for own side, percentage for a tracked opponent)
    pub hp_current: u32,

    /// Max HP when known
    pub hp_max: Option<u32>,

    /// Non-volatile status
    pub status: Option<Status>,

    pub fainted: bool,

    /// Whether currently on the field
    pub active: bool,

    /// Held item ID, if known and not consumed
    pub item: Option<String>,

    /// Ability ID, if known
    pub ability: Option<String>,

    /// Tera type, if known
    pub tera_type: Option<Type>,

    /// Whether currently terastallized
    pub terastallized: bool,

    /// Known move IDs
    pub moves: Vec<String>,

    /// Computed stats from the side block
    pub stats: StatLine,

    /// Stage modifiers; cleared on switch
    pub boosts: Boosts,

    /// Volatile conditions; cleared on switch
    pub volatiles: HashSet<Volatile>,
}

impl BattlePokemon {
    /// Create a bare snapshot entry for a species
    pub fn new(species: impl Into<String>, level: u8) -> Self {
        let species = species.into();
        Self {
            species_id: to_id(&species),
            name: species.clone(),
            species,
            level,
            types: Vec::new(),
            hp_current: 100,
            hp_max: None,
            status: None,
            fainted: false,
            active: false,
            item: None,
            ability: None,
            tera_type: None,
            terastallized: false,
            moves: Vec::new(),
            stats: StatLine::default(),
            boosts: Boosts::new(),
            volatiles: HashSet::new(),
        }
    }

    /// Build from a request side block entry
    pub fn from_side_info(wire: &SidePokemon) -> Self {
        let details = wire.parsed_details();
        let mut pokemon = Self::new(&details.species, details.level_or_default());

        // The ident is "p1: Name"; the name can be a nickname
        if let Some((_, nick)) = wire.ident.split_once(": ") {
            pokemon.name = nick.to_string();
        }

        if let Some(tera) = &wire.tera_type {
            pokemon.tera_type = Type::from_name(tera);
        }

        pokemon.sync(wire);
        pokemon
    }

    /// Refresh battle facts from a fresh side block entry
    pub fn sync(&mut self, wire: &SidePokemon) {
        if let Some(hp) = wire.hp_status() {
            self.hp_current = hp.current;
            if hp.max.is_some() {
                self.hp_max = hp.max;
            }
        }
        self.fainted = wire.is_fainted();
        self.status = wire.status().and_then(Status::from_token);
        self.active = wire.active;
        self.terastallized = wire.terastallized.is_some();
        self.stats = StatLine::from_request(&wire.stats);

        if !wire.base_ability.is_empty() {
            self.ability = Some(wire.base_ability.clone());
        }
        self.item = if wire.item.is_empty() {
            None
        } else {
            Some(wire.item.clone())
        };

        for mv in &wire.moves {
            self.record_move(mv);
        }
    }

    /// HP as a percentage (0-100)
    pub fn hp_percent(&self) -> u32 {
        match self.hp_max {
            Some(0) => 0,
            Some(max) => self.hp_current * 100 / max,
            // Tracked opponents report HP as a percentage already
            None => self.hp_current.min(100),
        }
    }

    /// HP as a fraction in [0, 1]
    pub fn hp_fraction(&self) -> f32 {
        if self.fainted {
            return 0.0;
        }
        self.hp_percent() as f32 / 100.0
    }

    pub fn is_alive(&self) -> bool {
        !self.fainted && self.hp_current > 0
    }

    /// Check if this Pokemon is a legal switch-in
    pub fn can_switch_in(&self) -> bool {
        self.is_alive() && !self.active
    }

    /// Active typing: the tera type alone while terastallized
    pub fn current_types(&self) -> Vec<Type> {
        if self.terastallized {
            if let Some(tera) = self.tera_type {
                return vec![tera];
            }
        }
        self.types.clone()
    }

    pub fn has_type(&self, t: Type) -> bool {
        self.current_types().contains(&t)
    }

    /// Set revealed typing
    pub fn set_types(&mut self, types: Vec<Type>) {
        self.types = types;
    }

    /// Record a revealed move, keeping the list deduplicated
    pub fn record_move(&mut self, move_id: &str) {
        let id = to_id(move_id);
        if !self.moves.contains(&id) {
            self.moves.push(id);
        }
    }

    pub fn has_volatile(&self, v: &Volatile) -> bool {
        self.volatiles.contains(v)
    }

    pub fn add_volatile(&mut self, v: Volatile) {
        self.volatiles.insert(v);
    }

    pub fn remove_volatile(&mut self, v: &Volatile) -> bool {
        self.volatiles.remove(v)
    }

    /// Clear switch-scoped state when leaving the field
    pub fn on_switch_out(&mut self) {
        self.active = false;
        self.boosts.clear();
        self.volatiles.clear();
    }

    pub fn on_switch_in(&mut self) {
        self.active = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire_pokemon(condition: &str) -> SidePokemon {
        serde_json::from_value(serde_json::json!({
            "ident": "p1: Chompy",
            "details": "Garchomp, L50, M",
            "condition": condition,
            "active": true,
            "stats": {"atk": 182, "def": 115, "spa": 100, "spd": 105, "spe": 169},
            "moves": ["earthquake", "dragonclaw"],
            "baseAbility": "roughskin",
            "item": "lifeorb",
            "teraType": "Ground"
        }))
        .unwrap()
    }

    #[test]
    fn test_from_side_info() {
        let pokemon = BattlePokemon::from_side_info(&wire_pokemon("170/170"));

        assert_eq!(pokemon.species, "Garchomp");
        assert_eq!(pokemon.species_id, "garchomp");
        assert_eq!(pokemon.name, "Chompy");
        assert_eq!(pokemon.level, 50);
        assert_eq!(pokemon.hp_current, 170);
        assert_eq!(pokemon.hp_max, Some(170));
        assert!(pokemon.active);
        assert_eq!(pokemon.ability.as_deref(), Some("roughskin"));
        assert_eq!(pokemon.item.as_deref(), Some("lifeorb"));
        assert_eq!(pokemon.tera_type, Some(Type::Ground));
        assert_eq!(pokemon.moves, vec!["earthquake", "dragonclaw"]);
        assert_eq!(pokemon.stats.atk, 182);
    }

    #[test]
    fn test_sync_updates_battle_facts() {
        let mut pokemon = BattlePokemon::from_side_info(&wire_pokemon("170/170"));

        pokemon.sync(&wire_pokemon("85/170 brn"));
        assert_eq!(pokemon.hp_current, 85);
        assert_eq!(pokemon.status, Some(Status::Burn));
        assert!(!pokemon.fainted);
        assert_eq!(pokemon.hp_percent(), 50);

        pokemon.sync(&wire_pokemon("0 fnt"));
        assert!(pokemon.fainted);
        assert_eq!(pokemon.status, None);
        assert!(!pokemon.is_alive());
    }

    #[test]
    fn test_hp_fraction() {
        let mut pokemon = BattlePokemon::new("Garchomp", 50);
        pokemon.hp_current = 85;
        pokemon.hp_max = Some(170);
        assert!((pokemon.hp_fraction() - 0.5).abs() < 0.01);

        // Percentage form (no known max)
        pokemon.hp_max = None;
        pokemon.hp_current = 73;
        assert!((pokemon.hp_fraction() - 0.73).abs() < 0.01);
    }

    #[test]
    fn test_can_switch_in() {
        let mut pokemon = BattlePokemon::from_side_info(&wire_pokemon("170/170"));
        assert!(!pokemon.can_switch_in());

        pokemon.active = false;
        assert!(pokemon.can_switch_in());

        pokemon.fainted = true;
        assert!(!pokemon.can_switch_in());
    }

    #[test]
    fn test_tera_typing_overrides() {
        let mut pokemon = BattlePokemon::new("Garchomp", 50);
        pokemon.set_types(vec![Type::Dragon, Type::Ground]);
        pokemon.tera_type = Some(Type::Fire);

        assert_eq!(pokemon.current_types(), vec![Type::Dragon, Type::Ground]);
        assert!(pokemon.has_type(Type::Dragon));

        pokemon.terastallized = true;
        assert_eq!(pokemon.current_types(), vec![Type::Fire]);
        assert!(!pokemon.has_type(Type::Dragon));
        assert!(pokemon.has_type(Type::Fire));
    }

    #[test]
    fn test_record_move_dedups_and_normalizes() {
        let mut pokemon = BattlePokemon::new("Garchomp", 50);
        pokemon.record_move("Dragon Claw");
        pokemon.record_move("dragonclaw");
        pokemon.record_move("earthquake");

        assert_eq!(pokemon.moves, vec!["dragonclaw", "earthquake"]);
    }

    #[test]
    fn test_volatile_tracking() {
        let mut pokemon = BattlePokemon::new("Garchomp", 50);
        pokemon.add_volatile(Volatile::Confusion);
        pokemon.add_volatile(Volatile::LeechSeed);

        assert!(pokemon.has_volatile(&Volatile::Confusion));
        assert!(!pokemon.has_volatile(&Volatile::Taunt));

        assert!(pokemon.remove_volatile(&Volatile::LeechSeed));
        assert!(!pokemon.remove_volatile(&Volatile::LeechSeed));
        assert!(!pokemon.has_volatile(&Volatile::LeechSeed));
    }

    #[test]
    fn test_switch_out_clears_combat_state() {
        let mut pokemon = BattlePokemon::new("Garchomp", 50);
        pokemon.active = true;
        pokemon.boosts.set(rotom_protocol::Stat::Atk, 2);
        pokemon.add_volatile(Volatile::Confusion);

        pokemon.on_switch_out();
        assert!(!pokemon.active);
        assert!(pokemon.boosts.is_clear());
        assert!(pokemon.volatiles.is_empty());
    }

    #[test]
    fn test_stats_default_when_absent() {
        let pokemon = BattlePokemon::new("Unknown", 100);
        assert_eq!(pokemon.stats, StatLine::default());
    }
}
