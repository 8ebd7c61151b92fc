//! Session orchestration: the [`Game`] struct, its phase machine, and
//! the delayed-action queue its timers run on.

mod state;
mod tasks;

pub use state::{Game, GamePhase, PauseSource};
pub use tasks::{DelayQueue, DelayedAction};
