//! Computed stat lines and stage modifiers

use rotom_protocol::{RequestStats, Stat};

/// Computed stats as reported by the simulator (HP lives on the Pokemon)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatLine {
    pub atk: u32,
    pub def: u32,
    pub spa: u32,
    pub spd: u32,
    pub spe: u32,
}

impl StatLine {
    /// Build from the request's stats block
    pub fn from_request(stats: &RequestStats) -> Self {
        Self {
            atk: stats.atk,
            def: stats.def,
            spa: stats.spa,
            spd: stats.spd,
            spe: stats.spe,
        }
    }
}

/// Stat stage modifiers, each clamped to -6..=+6
///
/// Backed by one array slot per [`Stat`], accuracy and evasion included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boosts([i8; 7]);

impl Boosts {
    /// All stages at 0
    pub fn new() -> Self {
        Self::default()
    }

    fn index(stat: Stat) -> usize {
        match stat {
            Stat::Atk => 0,
            Stat::Def => 1,
            Stat::Spa => 2,
            Stat::Spd => 3,
            Stat::Spe => 4,
            Stat::Accuracy => 5,
            Stat::Evasion => 6,
        }
    }

    /// Get the stage for a stat
    pub fn get(&self, stat: Stat) -> i8 {
        self.0[Self::index(stat)]
    }

    /// Set the stage for a stat, clamped
    pub fn set(&mut self, stat: Stat, value: i8) {
        self.0[Self::index(stat)] = value.clamp(-6, 6);
    }

    /// Apply a stage change, returning the change actually applied
    pub fn apply(&mut self, stat: Stat, amount: i8) -> i8 {
        let current = self.get(stat);
        let next = (current + amount).clamp(-6, 6);
        self.set(stat, next);
        next - current
    }

    /// Reset all stages to 0
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Check if every stage is 0
    pub fn is_clear(&self) -> bool {
        self.0.iter().all(|&s| s == 0)
    }

    /// Apply this set's stage to a base stat value
    pub fn modify(&self, stat: Stat, base: u32) -> u32 {
        (base as f32 * Self::multiplier(self.get(stat))) as u32
    }

    /// Multiplier for a battle-stat stage: +1 = 1.5x, +6 = 4x, -2 = 0.5x
    pub fn multiplier(stage: i8) -> f32 {
        let stage = stage.clamp(-6, 6);
        if stage >= 0 {
            (2 + stage as i32) as f32 / 2.0
        } else {
            2.0 / (2 - stage as i32) as f32
        }
    }

    /// Multiplier for accuracy/evasion stages: +1 = 1.33x, -1 = 0.75x
    pub fn accuracy_multiplier(stage: i8) -> f32 {
        let stage = stage.clamp(-6, 6);
        if stage >= 0 {
            (3 + stage as i32) as f32 / 3.0
        } else {
            3.0 / (3 - stage as i32) as f32
        }
    }
}
