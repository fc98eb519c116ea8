//! Many sessions at once, with a win tally

use tokio::task::JoinSet;

use rotom_protocol::Player;

use crate::session::BattleSession;

/// Aggregated results of a batch of sessions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub sessions: usize,
    pub p1_wins: usize,
    pub p2_wins: usize,
    pub draws: usize,
    /// Sessions that errored or panicked instead of finishing
    pub failures: usize,
}

impl BatchSummary {
    /// Win rate for a side over the sessions that finished
    pub fn win_rate(&self, player: Player) -> f64 {
        let finished = self.sessions.saturating_sub(self.failures);
        if finished == 0 {
            return 0.0;
        }
        let wins = match player {
            Player::P1 => self.p1_wins,
            Player::P2 => self.p2_wins,
        };
        wins as f64 / finished as f64
    }
}

/// Run `sessions` battles concurrently and tally the outcomes
///
/// Each session runs on the blocking pool; the factory is cloned per
/// session and receives the session index, which is how callers vary
/// seeds across the batch.
pub async fn run_batch<F>(sessions: usize, build: F) -> BatchSummary
where
    F: Fn(usize) -> BattleSession + Clone + Send + 'static,
{
    let mut tasks = JoinSet::new();
    for i in 0..sessions {
        let build = build.clone();
        tasks.spawn_blocking(move || build(i).run());
    }

    let mut summary = BatchSummary {
        sessions,
        ..BatchSummary::default()
    };
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(outcome)) => match outcome.winner {
                Some(Player::P1) => summary.p1_wins += 1,
                Some(Player::P2) => summary.p2_wins += 1,
                None => summary.draws += 1,
            },
            Ok(Err(error)) => {
                tracing::warn!(%error, "session failed");
                summary.failures += 1;
            }
            Err(error) => {
                tracing::warn!(%error, "session task did not finish");
                summary.failures += 1;
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotom_ai::{GreedyStrategy, RandomStrategy};
    use rotom_protocol::GameType;
    use rotom_sim::{LocalBattle, MoveSpec, PokemonSpec, SpecStats, TeamSpec};

    fn team(trainer: &str, species: &str, power: u32) -> TeamSpec {
        TeamSpec::new(
            trainer,
            vec![PokemonSpec::new(
                species,
                50,
                &["Normal"],
                SpecStats {
                    hp: 150,
                    atk: if power > 50 { 140 } else { 50 },
                    def: 90,
                    spa: 90,
                    spd: 90,
                    spe: if power > 50 { 100 } else { 60 },
                },
            )
            .with_moves(vec![MoveSpec::new("Strike", "Normal", "Physical", power)])],
        )
    }

    fn lopsided(seed: u64) -> BattleSession {
        let battle = LocalBattle::start(
            GameType::Singles,
            team("Champion", "Ursaluna", 100),
            team("Rookie", "Bidoof", 20),
        )
        .unwrap();
        BattleSession::new(
            Box::new(battle),
            GameType::Singles,
            Box::new(GreedyStrategy::new()),
            Box::new(RandomStrategy::seeded(seed)),
        )
    }

    #[tokio::test]
    async fn test_batch_tallies_every_session() {
        let summary = run_batch(4, |i| lopsided(i as u64)).await;

        assert_eq!(summary.sessions, 4);
        assert_eq!(summary.p1_wins, 4);
        assert_eq!(summary.failures, 0);
        assert_eq!(summary.win_rate(Player::P1), 1.0);
        assert_eq!(summary.win_rate(Player::P2), 0.0);
    }

    #[tokio::test]
    async fn test_failed_sessions_count_as_failures() {
        let summary = run_batch(2, |i| lopsided(i as u64).with_decision_limit(1)).await;

        assert_eq!(summary.failures, 2);
        assert_eq!(summary.win_rate(Player::P1), 0.0);
    }
}
