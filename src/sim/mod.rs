//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-tick displacement, no clock
//! - Seeded RNG only
//! - Stable brick order (generation order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod level;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Axis, Contact, Rect};
pub use level::Level;
pub use snapshot::{BrickView, Snapshot};
pub use state::{Ball, BallState, Brick, GameEvent, GamePhase, GameState, Paddle};
pub use tick::{Command, TickInput, apply_command, tick};
