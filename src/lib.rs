//! Brick Breaker - physics and game-state core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, game state)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, input polling, and frame pacing belong to the host: it feeds a
//! [`sim::TickInput`] to [`sim::tick`] once per frame and draws the
//! [`sim::Snapshot`] it reads back.

pub mod sim;
pub mod tuning;

pub use sim::{Command, GamePhase, GameState, Snapshot, TickInput, tick};
pub use tuning::{Tuning, TuningError};
