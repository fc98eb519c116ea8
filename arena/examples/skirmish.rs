//! Run a few local battles between strategies and print the tallies.
//!
//! ```sh
//! cargo run -p rotom-arena --example skirmish
//! ```

use anyhow::Result;
use rotom_arena::{run_batch, BattleSession};
use rotom_ai::{strategy_for, Difficulty};
use rotom_protocol::{GameType, Player};
use rotom_sim::{LocalBattle, MoveSpec, PokemonSpec, SpecStats, TeamSpec};

fn balanced_team(trainer: &str) -> TeamSpec {
    TeamSpec::new(
        trainer,
        vec![
            PokemonSpec::new(
                "Garchomp",
                50,
                &["Dragon", "Ground"],
                SpecStats {
                    hp: 170,
                    atk: 150,
                    def: 115,
                    spa: 90,
                    spd: 105,
                    spe: 122,
                },
            )
            .with_moves(vec![
                MoveSpec::new("Earthquake", "Ground", "Physical", 100),
                MoveSpec::new("Dragon Claw", "Dragon", "Physical", 80),
                MoveSpec::new("Fire Fang", "Fire", "Physical", 65),
            ])
            .with_tera("Fire"),
            PokemonSpec::new(
                "Rotom-Wash",
                50,
                &["Electric", "Water"],
                SpecStats {
                    hp: 140,
                    atk: 85,
                    def: 127,
                    spa: 125,
                    spd: 127,
                    spe: 106,
                },
            )
            .with_moves(vec![
                MoveSpec::new("Hydro Pump", "Water", "Special", 110).with_pp(8),
                MoveSpec::new("Thunderbolt", "Electric", "Special", 90),
            ]),
            PokemonSpec::new(
                "Amoonguss",
                50,
                &["Grass", "Poison"],
                SpecStats {
                    hp: 190,
                    atk: 105,
                    def: 90,
                    spa: 105,
                    spd: 100,
                    spe: 50,
                },
            )
            .with_moves(vec![
                MoveSpec::new("Sludge Bomb", "Poison", "Special", 90),
                MoveSpec::new("Giga Drain", "Grass", "Special", 75),
            ]),
        ],
    )
}

fn session(p1: Difficulty, p2: Difficulty, seed: u64) -> BattleSession {
    let battle = LocalBattle::start(
        GameType::Singles,
        balanced_team("Ace"),
        balanced_team("Challenger"),
    )
    .expect("teams are well formed");
    BattleSession::new(
        Box::new(battle),
        GameType::Singles,
        strategy_for(p1, seed),
        strategy_for(p2, seed ^ 0x9e3779b9),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    println!("Single battle: heuristic vs random");
    println!("==================================");
    let outcome = session(Difficulty::Heuristic, Difficulty::Random, 1).run()?;
    println!(
        "Winner: {} after {} decisions\n",
        outcome.winner_name.as_deref().unwrap_or("(draw)"),
        outcome.decisions
    );

    println!("Batch of 10: expert vs greedy");
    println!("=============================");
    let summary = run_batch(10, |i| session(Difficulty::Expert, Difficulty::Greedy, i as u64)).await;
    println!(
        "expert {} / greedy {} / draws {} / failures {}",
        summary.p1_wins, summary.p2_wins, summary.draws, summary.failures
    );
    println!("expert win rate: {:.0}%", summary.win_rate(Player::P1) * 100.0);

    Ok(())
}
