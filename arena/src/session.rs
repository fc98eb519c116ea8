//! One battle driven end to end

use anyhow::{bail, Context, Result};
use rotom_ai::{evaluate_state, parse_request, DecisionContext, ParsedRequest, Strategy};
use rotom_battle::BattleState;
use rotom_protocol::{BattleRequest, GameType, Player};
use rotom_sim::{apply_choice, Simulator};

/// Decision ceiling so a misbehaving engine cannot hang a session
const DEFAULT_DECISION_LIMIT: usize = 1000;

/// One side's strategy, snapshot, and bookkeeping
struct SessionSide {
    player: Player,
    strategy: Box<dyn Strategy>,
    state: BattleState,
    /// Registered trainer name, learned from the first side block
    name: Option<String>,
    /// Last answered request ID, so a sticky menu is not answered twice
    answered: Option<u64>,
}

impl SessionSide {
    fn new(player: Player, game_type: GameType, strategy: Box<dyn Strategy>) -> Self {
        Self {
            player,
            strategy,
            state: BattleState::new(game_type),
            name: None,
            answered: None,
        }
    }
}

/// How a finished session came out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    /// Winning side; `None` on a draw
    pub winner: Option<Player>,
    /// The engine's registered name for the winner
    pub winner_name: Option<String>,
    /// Turns the battle ran, as counted by the snapshots
    pub turns: u32,
    /// Total choices submitted across both sides
    pub decisions: usize,
}

/// Drives one battle: request, sync, decide, apply, repeat
///
/// The session owns the engine. Strategies see the live battle only as a
/// read-only handle for cloning; every mutation of the live battle goes
/// through the session's own apply calls.
pub struct BattleSession {
    battle: Box<dyn Simulator>,
    sides: [SessionSide; 2],
    decision_limit: usize,
}

impl BattleSession {
    pub fn new(
        battle: Box<dyn Simulator>,
        game_type: GameType,
        p1: Box<dyn Strategy>,
        p2: Box<dyn Strategy>,
    ) -> Self {
        Self {
            battle,
            sides: [
                SessionSide::new(Player::P1, game_type, p1),
                SessionSide::new(Player::P2, game_type, p2),
            ],
            decision_limit: DEFAULT_DECISION_LIMIT,
        }
    }

    /// Cap the total number of submitted choices
    pub fn with_decision_limit(mut self, limit: usize) -> Self {
        self.decision_limit = limit;
        self
    }

    /// Pump the battle to completion and report the outcome
    pub fn run(mut self) -> Result<SessionOutcome> {
        let mut decisions = 0;

        while !self.battle.ended() {
            let mut acted = false;
            for i in 0..2 {
                if self.battle.ended() {
                    break;
                }
                if self.answer_side(i, &mut decisions)? {
                    acted = true;
                }
            }
            if !acted && !self.battle.ended() {
                bail!("engine stalled with no pending decisions");
            }
        }

        let winner_name = self.battle.winner();
        let winner = self
            .sides
            .iter()
            .find(|s| s.name.is_some() && s.name == winner_name)
            .map(|s| s.player);
        let turns = self.sides.iter().map(|s| s.state.turn).max().unwrap_or(0);
        tracing::info!(
            winner = winner_name.as_deref().unwrap_or("(draw)"),
            turns,
            decisions,
            "battle finished"
        );

        Ok(SessionOutcome {
            winner,
            winner_name,
            turns,
            decisions,
        })
    }

    /// Answer one side's pending request, if it has one
    ///
    /// Returns true when a choice was submitted.
    fn answer_side(&mut self, i: usize, decisions: &mut usize) -> Result<bool> {
        let player = self.sides[i].player;
        let Some(raw) = self.battle.request(player) else {
            return Ok(false);
        };
        let Some(request) = BattleRequest::parse(&raw) else {
            bail!("unparseable request for {player}");
        };
        if !request.needs_decision() {
            return Ok(false);
        }
        if request.rqid.is_some() && request.rqid == self.sides[i].answered {
            return Ok(false);
        }

        let choice = {
            let side = &mut self.sides[i];
            if let Some(info) = &request.side {
                side.state.sync_side(info);
                if side.name.is_none() {
                    side.name = Some(info.name.clone());
                }
            }

            match parse_request(&request) {
                // Team order preferences are not modelled; lead as listed
                ParsedRequest::TeamPreview { .. } => "default".to_string(),
                _ => {
                    // A fresh move menu opens a turn; forced replacements
                    // happen inside the one that just resolved
                    if !request.is_force_switch() {
                        side.state.advance_turn();
                    }
                    side.strategy.decide(&DecisionContext {
                        side: player,
                        request: &request,
                        state: &side.state,
                        battle: Some(self.battle.as_ref()),
                    })
                }
            }
        };

        tracing::debug!(
            side = %player,
            rqid = ?request.rqid,
            strategy = self.sides[i].strategy.name(),
            choice = %choice,
            "submitting choice"
        );
        apply_choice(self.battle.as_mut(), player, &choice)
            .with_context(|| format!("choice {choice:?} rejected for {player}"))?;

        self.sides[i].answered = request.rqid;
        *decisions += 1;
        if *decisions > self.decision_limit {
            bail!("decision limit {} reached", self.decision_limit);
        }

        let estimate = evaluate_state(&self.sides[i].state, player);
        tracing::debug!(side = %player, estimate, "position estimate");
        Ok(true)
    }
}
