//! Domain types for the battle snapshot

mod field;
mod pokemon;
mod pokemon_type;
mod side;
mod stats;
mod status;

pub use field::{FieldState, SideCondition, Terrain, Weather};
pub use pokemon::BattlePokemon;
pub use pokemon_type::Type;
pub use side::BattleSide;
pub use stats::{Boosts, StatLine};
pub use status::{Status, Volatile};
