//! Whole-battle snapshot

use rotom_protocol::{GameType, Player, SideInfo};

use crate::types::{BattleSide, FieldState};

/// The AI-facing mirror of one battle
///
/// Holds both sides plus field conditions. Created once per battle and
/// re-synced from simulator requests as turns resolve; strategies read it,
/// only the session loop writes it.
#[derive(Debug, Clone)]
pub struct BattleState {
    pub game_type: GameType,

    /// Current turn number (0 until the first move menu arrives)
    pub turn: u32,

    pub p1: BattleSide,
    pub p2: BattleSide,

    pub field: FieldState,
}

impl BattleState {
    /// Create an empty snapshot for a format
    pub fn new(game_type: GameType) -> Self {
        let mut p1 = BattleSide::new(Player::P1, "");
        let mut p2 = BattleSide::new(Player::P2, "");
        p1.set_active_slots(game_type.active_slots());
        p2.set_active_slots(game_type.active_slots());

        Self {
            game_type,
            turn: 0,
            p1,
            p2,
            field: FieldState::new(),
        }
    }

    /// Get a side by player
    pub fn side(&self, player: Player) -> &BattleSide {
        match player {
            Player::P1 => &self.p1,
            Player::P2 => &self.p2,
        }
    }

    /// Get a side by player mutably
    pub fn side_mut(&mut self, player: Player) -> &mut BattleSide {
        match player {
            Player::P1 => &mut self.p1,
            Player::P2 => &mut self.p2,
        }
    }

    /// Get a player's opposing side
    pub fn opponent(&self, player: Player) -> &BattleSide {
        self.side(player.opponent())
    }

    /// Sync the side named in a request's side block
    ///
    /// Returns false when the block carries an unknown player id.
    pub fn sync_side(&mut self, info: &SideInfo) -> bool {
        match info.player() {
            Some(player) => {
                self.side_mut(player).sync_from(info);
                true
            }
            None => false,
        }
    }

    pub fn advance_turn(&mut self) {
        self.turn += 1;
    }
}
