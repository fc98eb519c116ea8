//! Uniform sampling over the legal choice universe
//!
//! The baseline opponent. It enumerates every legal choice string for the
//! request and picks one uniformly, so its only virtue is that it never
//! submits an illegal choice.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::choices::legal_choices;
use crate::strategy::{DecisionContext, Strategy};

/// Picks uniformly among legal choices
pub struct RandomStrategy {
    rng: SmallRng,
}

impl RandomStrategy {
    /// Seeded for reproducible games
    pub fn seeded(seed: u64) -> Self {
        RandomStrategy {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Strategy for RandomStrategy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn decide(&mut self, ctx: &DecisionContext<'_>) -> String {
        let universe = legal_choices(ctx.request);
        match universe.choose(&mut self.rng) {
            Some(choice) => choice.clone(),
            None => "default".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotom_battle::{BattleState, GameType};
    use rotom_protocol::{BattleRequest, Player};
    use serde_json::json;

    fn menu_request() -> BattleRequest {
        BattleRequest::parse(&json!({
            "rqid": 3,
            "active": [{
                "moves": [
                    {"move": "Surf", "id": "surf", "pp": 24, "maxpp": 24,
                     "target": "allAdjacent", "disabled": false},
                    {"move": "Ice Beam", "id": "icebeam", "pp": 16, "maxpp": 16,
                     "target": "normal", "disabled": false},
                ]
            }],
            "side": {
                "name": "BotPlayer",
                "id": "p1",
                "pokemon": [
                    {"ident": "p1: Milotic", "details": "Milotic, L50", "condition": "190/190",
                     "active": true, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                    {"ident": "p1: Ferrothorn", "details": "Ferrothorn, L50", "condition": "180/180",
                     "active": false, "stats": {}, "moves": [], "baseAbility": "", "item": ""},
                ]
            }
        }))
        .unwrap()
    }

    fn ctx<'a>(request: &'a BattleRequest, state: &'a BattleState) -> DecisionContext<'a> {
        DecisionContext {
            side: Player::P1,
            request,
            state,
            battle: None,
        }
    }

    #[test]
    fn test_same_seed_same_picks() {
        let request = menu_request();
        let state = BattleState::new(GameType::Singles);

        let mut a = RandomStrategy::seeded(99);
        let mut b = RandomStrategy::seeded(99);
        for _ in 0..8 {
            assert_eq!(a.decide(&ctx(&request, &state)), b.decide(&ctx(&request, &state)));
        }
    }

    #[test]
    fn test_picks_stay_legal() {
        let request = menu_request();
        let state = BattleState::new(GameType::Singles);
        let universe = legal_choices(&request);

        let mut strategy = RandomStrategy::seeded(7);
        for _ in 0..20 {
            let pick = strategy.decide(&ctx(&request, &state));
            assert!(universe.contains(&pick), "illegal pick {pick}");
        }
    }

    #[test]
    fn test_empty_universe_falls_back_to_default() {
        let request = BattleRequest::parse(&json!({"wait": true})).unwrap();
        let state = BattleState::new(GameType::Singles);

        let mut strategy = RandomStrategy::seeded(1);
        assert_eq!(strategy.decide(&ctx(&request, &state)), "default");
    }
}
