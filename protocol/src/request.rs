//! Decision request types
//!
//! These types represent the JSON structure of the simulator's per-side
//! request objects. A request is one of four shapes, distinguished by
//! which fields are present: wait (`{"wait": true}`), team preview, forced
//! switch (`forceSwitch` array), or a normal move/switch turn (`active`
//! array). Deserialization is lenient: unknown fields are ignored and
//! optional enrichment (move type, base power) is absent on minimal
//! simulators.

use crate::ids::{HpStatus, Player, PokemonDetails};
use serde::{Deserialize, Deserializer};

/// A per-side request asking the player to make a decision
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleRequest {
    /// Request ID for choice synchronization
    pub rqid: Option<u64>,

    /// Active slots and their move menus (one entry per slot)
    #[serde(default)]
    pub active: Option<Vec<ActiveSlot>>,

    /// The requesting player's side and team
    pub side: Option<SideInfo>,

    /// Which slots must switch out (per-slot flags)
    #[serde(default)]
    pub force_switch: Option<Vec<bool>>,

    /// Whether this is team preview
    #[serde(default)]
    pub team_preview: bool,

    /// Whether the side is waiting on the opponent
    #[serde(default)]
    pub wait: bool,

    /// Whether the pending choice can no longer be cancelled
    #[serde(default)]
    pub no_cancel: bool,
}

impl BattleRequest {
    /// Parse a request from JSON
    pub fn parse(json: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(json.clone()).ok()
    }

    /// Check if this request requires a decision
    pub fn needs_decision(&self) -> bool {
        !self.wait && (self.team_preview || self.force_switch.is_some() || self.active.is_some())
    }

    /// Check if any slot is being forced to switch
    pub fn is_force_switch(&self) -> bool {
        self.force_switch
            .as_ref()
            .map(|fs| fs.iter().any(|&b| b))
            .unwrap_or(false)
    }

    /// Check if a specific slot is being forced to switch
    pub fn force_switch_at(&self, slot: usize) -> bool {
        self.force_switch
            .as_ref()
            .and_then(|fs| fs.get(slot).copied())
            .unwrap_or(false)
    }

    /// Get the move menu for one active slot, if present
    pub fn active_slot(&self, slot: usize) -> Option<&ActiveSlot> {
        self.active.as_ref()?.get(slot)
    }

    /// Number of slots this request covers
    pub fn slot_count(&self) -> usize {
        if let Some(active) = &self.active {
            active.len()
        } else if let Some(fs) = &self.force_switch {
            fs.len()
        } else {
            1
        }
    }

    /// Get eligible switch targets with their 1-indexed team positions
    pub fn switch_candidates(&self) -> Vec<(usize, &SidePokemon)> {
        self.side
            .as_ref()
            .map(|s| {
                s.pokemon
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| !p.active && !p.is_fainted())
                    .map(|(i, p)| (i + 1, p))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// The decision menu for one active slot
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSlot {
    /// Moves available from this slot
    #[serde(default)]
    pub moves: Vec<MoveSlot>,

    /// Whether the Pokemon is trapped and cannot switch
    #[serde(default, deserialize_with = "flexible_bool")]
    pub trapped: bool,

    /// Whether the Pokemon might be trapped (unrevealed trapping ability)
    #[serde(default, deserialize_with = "flexible_bool")]
    pub maybe_trapped: bool,

    /// Tera type available to this slot, if terastallization is still up
    #[serde(default, deserialize_with = "tera_option")]
    pub can_terastallize: Option<String>,
}

impl ActiveSlot {

    /// Check if the Pokemon can switch out voluntarily
    pub fn can_switch(&self) -> bool {
        !self.trapped && !self.maybe_trapped
    }

    /// Check if terastallization can be offered this turn
    pub fn can_tera(&self) -> bool {
        self.can_terastallize.is_some()
    }
}

/// A move slot in an active Pokemon's menu
///
/// The id/pp/target/disabled fields are always present. The type, base
/// power, category and accuracy fields are enrichment some simulators
/// attach; strategies must tolerate their absence.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveSlot {
    /// Display name of the move
    #[serde(rename = "move")]
    pub name: String,

    /// Move ID (lowercase, no spaces)
    pub id: String,

    /// Current PP
    #[serde(default)]
    pub pp: u32,

    /// Maximum PP
    #[serde(rename = "maxpp", default)]
    pub max_pp: u32,

    /// Target spec (normal, any, allAdjacentFoes, ...)
    #[serde(default)]
    pub target: String,

    /// Whether the move is disabled this turn
    #[serde(default, deserialize_with = "flexible_bool")]
    pub disabled: bool,

    /// Move type, when the simulator includes it
    #[serde(default, rename = "type")]
    pub move_type: Option<String>,

    /// Base power, when included
    #[serde(default)]
    pub base_power: Option<u32>,

    /// Damage category (Physical/Special/Status), when included
    #[serde(default)]
    pub category: Option<String>,

    /// Accuracy percentage; `None` means the move cannot miss
    #[serde(default, deserialize_with = "accuracy_option")]
    pub accuracy: Option<u32>,
}

impl MoveSlot {
    /// Check if this move can be picked this turn
    pub fn usable(&self) -> bool {
        !self.disabled && self.pp > 0
    }
}

/// Information about the requesting player's side
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideInfo {
    /// Player's display name
    pub name: String,

    /// Player ID (p1 or p2)
    pub id: String,

    /// Team members in switch order (1-indexed on the wire)
    #[serde(default)]
    pub pokemon: Vec<SidePokemon>,
}

impl SideInfo {
    /// Get the player enum
    pub fn player(&self) -> Option<Player> {
        Player::parse(&self.id)
    }
}

/// A team member as reported in the request's side block
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidePokemon {
    /// Identifier (e.g. "p1: Garchomp")
    pub ident: String,

    /// Details string (species, level, gender)
    pub details: String,

    /// Condition string ("170/170", "85/170 par", "0 fnt")
    pub condition: String,

    /// Whether this Pokemon is currently active
    #[serde(default)]
    pub active: bool,

    /// Computed stats (atk/def/spa/spd/spe)
    #[serde(default)]
    pub stats: RequestStats,

    /// Known move IDs
    #[serde(default)]
    pub moves: Vec<String>,

    /// Base ability ID
    #[serde(default)]
    pub base_ability: String,

    /// Held item ID (empty when none)
    #[serde(default)]
    pub item: String,

    /// Tera type
    #[serde(default)]
    pub tera_type: Option<String>,

    /// Set when already terastallized
    #[serde(default)]
    pub terastallized: Option<String>,
}

impl SidePokemon {
    /// Parse the condition string
    pub fn hp_status(&self) -> Option<HpStatus> {
        HpStatus::parse(&self.condition)
    }

    /// Check if the Pokemon is fainted
    pub fn is_fainted(&self) -> bool {
        self.condition == "0 fnt" || self.condition.ends_with(" fnt")
    }

    /// Get current HP as (current, max)
    pub fn hp(&self) -> Option<(u32, u32)> {
        let status = self.hp_status()?;
        Some((status.current, status.max?))
    }

    /// Get HP as a percentage (0-100)
    pub fn hp_percent(&self) -> u32 {
        self.hp()
            .map(|(cur, max)| if max > 0 { cur * 100 / max } else { 0 })
            .unwrap_or(0)
    }

    /// Get the non-volatile status token, if any
    pub fn status(&self) -> Option<&str> {
        let token = self.condition.split_whitespace().nth(1)?;
        if token == "fnt" { None } else { Some(token) }
    }

    /// Parse the details string
    pub fn parsed_details(&self) -> PokemonDetails {
        PokemonDetails::parse(&self.details)
    }

    /// Get the species name from details
    pub fn species(&self) -> &str {
        self.details.split(',').next().unwrap_or(&self.details).trim()
    }
}

/// Computed stats as reported in the side block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct RequestStats {
    #[serde(default)]
    pub atk: u32,
    #[serde(default)]
    pub def: u32,
    #[serde(default)]
    pub spa: u32,
    #[serde(default)]
    pub spd: u32,
    #[serde(default)]
    pub spe: u32,
}

/// Accept `true`/`false` or a string flag where the wire is inconsistent
fn flexible_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => b,
        Raw::Text(s) => !s.is_empty() && s != "false",
    })
}

/// Accuracy is a number, or `true` for moves that cannot miss
fn accuracy_option<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        // The unread bool body is what matches a JSON `true`
        #[allow(dead_code)]
        Sure(bool),
        Percent(u32),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Percent(p)) => Some(p),
        _ => None,
    })
}

/// canTerastallize is a tera type string, or `false` once spent
fn tera_option<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        // The unread bool body is what matches the spent-tera `false`
        #[allow(dead_code)]
        Flag(bool),
        Type(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Type(t)) if !t.is_empty() => Some(t),
        _ => None,
    })
}
