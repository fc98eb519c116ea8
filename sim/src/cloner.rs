//! Battle cloning via the export/import pair

use crate::simulator::Simulator;
use crate::SimError;

/// Produce a fully independent copy of a battle
///
/// The clone shares no state with the original: mutations on either side
/// are invisible to the other. Export followed by import is the only
/// duplication path; no structural sharing is permitted because search
/// rollouts depend on strict branch isolation.
///
/// This is the most expensive operation at the simulator boundary, so
/// callers budget clones rather than treating them as free.
pub fn clone_battle(battle: &dyn Simulator) -> Result<Box<dyn Simulator>, SimError> {
    let saved = battle.export_state()?;
    battle.import_state(&saved)
}
