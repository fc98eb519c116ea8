//! End-of-battle reporting

use rotom_protocol::Player;

use crate::simulator::Simulator;

/// Whether the engine reports the battle as ended
pub fn is_battle_over(battle: &dyn Simulator) -> bool {
    battle.ended()
}

/// Map the engine's winner name to a side
///
/// The engine records the winner by registered player name. Returns `None`
/// while the battle is running, on a draw, and for a winner name matching
/// neither side. The unrecognized-name case deliberately resolves to a
/// draw instead of an error; a renamed player mid-battle would otherwise
/// poison every consumer downstream.
pub fn battle_winner(battle: &dyn Simulator, p1_name: &str, p2_name: &str) -> Option<Player> {
    if !battle.ended() {
        return None;
    }

    match battle.winner() {
        Some(name) if name == p1_name => Some(Player::P1),
        Some(name) if name == p2_name => Some(Player::P2),
        Some(name) => {
            tracing::warn!(winner = %name, "winner matches neither side, treating as draw");
            None
        }
        None => None,
    }
}
