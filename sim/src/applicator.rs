//! Choice application

use rotom_protocol::Player;

use crate::simulator::Simulator;
use crate::SimError;

/// Apply one choice string per side and advance the battle one step
///
/// The battle handle may be the live battle or a clone, and the caller
/// keeps track of which. Sides are applied p1 first, then p2; the engine
/// resolves the turn once every pending side has chosen.
pub fn apply_choices(
    battle: &mut dyn Simulator,
    p1_choice: &str,
    p2_choice: &str,
) -> Result<(), SimError> {
    battle.choose(Player::P1, p1_choice)?;
    battle.choose(Player::P2, p2_choice)?;
    Ok(())
}

/// Apply a choice for one side only
///
/// Used when only one side has a pending decision, e.g. replacing a
/// fainted Pokemon while the opponent waits.
pub fn apply_choice(
    battle: &mut dyn Simulator,
    side: Player,
    choice: &str,
) -> Result<(), SimError> {
    battle.choose(side, choice)
}
