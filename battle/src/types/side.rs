//! One player's side of the battle snapshot

use std::collections::HashMap;

use rotom_protocol::{Player, SideInfo};

use super::field::SideCondition;
use super::pokemon::BattlePokemon;

/// One side's team, active slots, and side conditions
///
/// The team vector mirrors the simulator's current side ordering, so a
/// member's position plus one is exactly the N in `"switch N"`.
#[derive(Debug, Clone)]
pub struct BattleSide {
    /// Side identifier
    pub player: Player,

    /// The player name registered with the simulator (winner mapping key)
    pub name: String,

    /// Team members in the simulator's switch order
    pub team: Vec<BattlePokemon>,

    /// Team index of each active slot; `None` for an empty slot
    pub active_indices: Vec<Option<usize>>,

    /// Side conditions with their current layer counts
    pub conditions: HashMap<SideCondition, u8>,
}

impl BattleSide {
    /// Create an empty side with one active slot
    pub fn new(player: Player, name: impl Into<String>) -> Self {
        Self {
            player,
            name: name.into(),
            team: Vec::new(),
            active_indices: vec![None],
            conditions: HashMap::new(),
        }
    }

    /// Resize to the format's active slot count (1 singles, 2 doubles)
    pub fn set_active_slots(&mut self, count: usize) {
        self.active_indices.resize(count, None);
    }

    /// Get the active Pokemon at a slot (0-indexed)
    pub fn active(&self, slot: usize) -> Option<&BattlePokemon> {
        self.active_indices
            .get(slot)
            .and_then(|idx| idx.as_ref())
            .and_then(|&idx| self.team.get(idx))
    }

    /// First active Pokemon (the singles convenience accessor)
    pub fn first_active(&self) -> Option<&BattlePokemon> {
        self.active(0)
    }

    /// Iterate over all Pokemon currently on the field
    pub fn actives(&self) -> impl Iterator<Item = &BattlePokemon> {
        self.active_indices
            .iter()
            .filter_map(|idx| idx.as_ref())
            .filter_map(|&idx| self.team.get(idx))
    }

    /// Iterate over healthy bench members with their team indices
    pub fn bench(&self) -> impl Iterator<Item = (usize, &BattlePokemon)> {
        self.team
            .iter()
            .enumerate()
            .filter(|(_, p)| p.can_switch_in())
    }

    pub fn alive_count(&self) -> usize {
        self.team.iter().filter(|p| p.is_alive()).count()
    }

    pub fn fainted_count(&self) -> usize {
        self.team.iter().filter(|p| p.fainted).count()
    }

    /// Check if the whole team is down
    pub fn all_fainted(&self) -> bool {
        !self.team.is_empty() && self.team.iter().all(|p| p.fainted)
    }

    /// Remaining team HP as a fraction of full (0 when the side is empty)
    pub fn team_hp_fraction(&self) -> f32 {
        if self.team.is_empty() {
            return 0.0;
        }
        let total: f32 = self.team.iter().map(|p| p.hp_fraction()).sum();
        total / self.team.len() as f32
    }

    /// Move a team member into an active slot, clearing the outgoing one
    pub fn set_active(&mut self, slot: usize, team_index: Option<usize>) {
        if slot >= self.active_indices.len() {
            return;
        }
        if let Some(old) = self.active_indices[slot] {
            if let Some(outgoing) = self.team.get_mut(old) {
                outgoing.on_switch_out();
            }
        }
        self.active_indices[slot] = team_index;
        if let Some(idx) = team_index {
            if let Some(incoming) = self.team.get_mut(idx) {
                incoming.on_switch_in();
            }
        }
    }

    /// Get a side condition's layer count (0 when absent)
    pub fn condition_layers(&self, cond: SideCondition) -> u8 {
        self.conditions.get(&cond).copied().unwrap_or(0)
    }

    /// Add one layer of a condition; false once the cap is reached
    pub fn add_condition(&mut self, cond: SideCondition) -> bool {
        let layers = self.conditions.entry(cond).or_insert(0);
        if *layers >= cond.max_layers() {
            return false;
        }
        *layers += 1;
        true
    }

    pub fn remove_condition(&mut self, cond: SideCondition) -> bool {
        self.conditions.remove(&cond).is_some()
    }

    /// Check if any entry hazard is up on this side
    pub fn has_hazards(&self) -> bool {
        self.conditions.keys().any(|c| c.is_hazard())
    }

    /// Check if any screen is up on this side
    pub fn has_screens(&self) -> bool {
        self.conditions.keys().any(|c| c.is_screen())
    }

    /// Rebuild this side from a request's side block
    ///
    /// The wire ordering is authoritative (switch numbers refer to it).
    /// Members are matched by name so revealed knowledge and combat state
    /// survive reordering; unmatched wire entries become new members.
    pub fn sync_from(&mut self, info: &SideInfo) {
        if !info.name.is_empty() {
            self.name = info.name.clone();
        }

        let mut old_team = std::mem::take(&mut self.team);
        let mut team = Vec::with_capacity(info.pokemon.len());

        for wire in &info.pokemon {
            let wire_name = wire
                .ident
                .split_once(": ")
                .map(|(_, n)| n)
                .unwrap_or(wire.species());

            let member = old_team
                .iter()
                .position(|m| m.name == wire_name)
                .map(|i| old_team.swap_remove(i));

            let mut member = match member {
                Some(existing) => existing,
                None => BattlePokemon::from_side_info(wire),
            };
            member.sync(wire);
            team.push(member);
        }

        self.team = team;
        self.refresh_active_indices();
    }

    /// Point active slots at the team members flagged active on the wire
    fn refresh_active_indices(&mut self) {
        let slots = self.active_indices.len();
        let mut indices = vec![None; slots];
        let mut next = 0;

        for (i, member) in self.team.iter().enumerate() {
            if member.active && next < slots {
                indices[next] = Some(i);
                next += 1;
            }
        }
        self.active_indices = indices;
    }
}
