//! Session orchestration: strategies driving simulator battles.
//!
//! The top of the stack. A [`BattleSession`] owns one engine and one
//! strategy per side and pumps the request/choose loop until the engine
//! reports a result; [`run_batch`] runs many sessions concurrently and
//! tallies the outcomes.
//!
//! ```text
//! rotom-protocol ──┐
//! rotom-battle  ───┤
//! rotom-sim     ───┤
//! rotom-ai      ───┤
//!                  ▼
//!            rotom-arena ← THIS CRATE
//!
//!   session: request ─> sync snapshot ─> strategy ─> choose ─> repeat
//! ```

mod batch;
mod session;

pub use batch::{run_batch, BatchSummary};
pub use session::{BattleSession, SessionOutcome};
