//! The opaque battle engine contract

use rotom_protocol::Player;
use serde_json::Value;

use crate::SimError;

/// An exported battle state
///
/// Produced by [`Simulator::export_state`] and consumed only by
/// [`Simulator::import_state`] on the same engine type. Callers treat the
/// contents as opaque; the wrapper exists so clones can only be made
/// through the sanctioned export/import pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedBattle {
    data: Value,
}

impl SavedBattle {
    /// Wrap an engine's serialized state
    pub fn new(data: Value) -> Self {
        Self { data }
    }

    /// The serialized form, for the engine that produced it
    pub fn data(&self) -> &Value {
        &self.data
    }
}

/// The decision core's view of a battle rules engine
///
/// The engine resolves moves, damage, and status internally; this contract
/// only covers what deciding a turn needs: per-side pending requests, a
/// side-scoped choice mutator, end-of-battle reporting, and a full-state
/// export/import pair for cloning.
///
/// `import_state` is `&self` so a boxed engine can be duplicated without
/// knowing its concrete type; the receiver only supplies the engine
/// implementation, never state.
pub trait Simulator: Send {
    /// The pending request for a side, or `None` when nothing is pending
    ///
    /// The JSON shape is the request wire format: `{"wait": true}`, a
    /// `forceSwitch` block, or an `active` move menu, plus the `side`
    /// block.
    fn request(&self, side: Player) -> Option<Value>;

    /// Submit one side's choice string for the pending decision
    fn choose(&mut self, side: Player, choice: &str) -> Result<(), SimError>;

    /// Whether the battle has ended
    fn ended(&self) -> bool;

    /// The winning player's registered name; `None` while running or drawn
    fn winner(&self) -> Option<String>;

    /// Serialize the full battle state
    fn export_state(&self) -> Result<SavedBattle, SimError>;

    /// Build a fresh, independent battle from an exported state
    fn import_state(&self, saved: &SavedBattle) -> Result<Box<dyn Simulator>, SimError>;
}
