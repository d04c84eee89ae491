//! Read-only per-frame view for renderers and HUDs

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::state::{GamePhase, GameState};

/// One brick as the renderer sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrickView {
    pub rect: Rect,
    pub strength: u8,
    pub alive: bool,
}

/// Everything needed to draw a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub paddle: Rect,
    pub ball_center: Vec2,
    pub ball_radius: f32,
    pub bricks: Vec<BrickView>,
    pub score: u64,
    pub lives: u8,
    pub level_index: u32,
    pub phase: GamePhase,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            paddle: self.paddle.rect(),
            ball_center: self.ball.pos,
            ball_radius: self.ball.radius,
            bricks: self
                .level
                .bricks
                .iter()
                .map(|b| BrickView {
                    rect: b.rect,
                    strength: b.strength,
                    alive: b.alive,
                })
                .collect(),
            score: self.score,
            lives: self.lives,
            level_index: self.level.index,
            phase: self.phase,
        }
    }
}

impl Snapshot {
    /// Bricks that should be drawn
    pub fn live_bricks(&self) -> impl Iterator<Item = &BrickView> {
        self.bricks.iter().filter(|b| b.alive)
    }
}
