//! Brick layout generation
//!
//! Each level is a regular grid: one more row than the previous level, and
//! bricks that get tougher every two rows and every two levels.

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::state::Brick;
use crate::tuning::Tuning;

/// A level's bricks in generation order (row-major, top row first)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    /// 1-based level number
    pub index: u32,
    pub bricks: Vec<Brick>,
    /// Sum of initial strengths x 10. Informational only.
    pub score_value: u64,
}

impl Level {
    /// Build the brick grid for level `index` (values below 1 are treated as 1)
    pub fn generate(index: u32, tuning: &Tuning) -> Self {
        let index = index.max(1);
        let rows = tuning.brick_base_rows + (index - 1);
        let columns = tuning.brick_columns;
        let brick_w = tuning.brick_width();

        let mut bricks = Vec::with_capacity((rows * columns) as usize);
        for row in 0..rows {
            let strength = strength_for(row, index, tuning.brick_max_strength);
            let y = tuning.brick_top_offset + row as f32 * (tuning.brick_height + tuning.brick_gap);
            for col in 0..columns {
                let x = tuning.brick_side_margin + col as f32 * (brick_w + tuning.brick_gap);
                bricks.push(Brick::new(Rect::new(x, y, brick_w, tuning.brick_height), strength));
            }
        }

        let score_value = bricks.iter().map(|b| b.strength as u64).sum::<u64>() * 10;
        log::debug!(
            "Generated level {}: {} rows x {} columns, score value {}",
            index,
            rows,
            columns,
            score_value
        );

        Self {
            index,
            bricks,
            score_value,
        }
    }

    pub fn alive_bricks(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter().filter(|b| b.alive)
    }

    pub fn alive_count(&self) -> usize {
        self.alive_bricks().count()
    }

    pub fn is_cleared(&self) -> bool {
        !self.bricks.iter().any(|b| b.alive)
    }
}

/// Strength rises every two rows and every two levels, capped
fn strength_for(row: u32, index: u32, max: u8) -> u8 {
    let raw = 1 + row / 2 + index / 2;
    raw.min(max as u32) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brick_counts() {
        let tuning = Tuning::default();
        assert_eq!(Level::generate(1, &tuning).bricks.len(), 50);
        assert_eq!(Level::generate(2, &tuning).bricks.len(), 60);
        assert_eq!(Level::generate(3, &tuning).bricks.len(), 70);
    }

    #[test]
    fn test_level_one_strengths() {
        let level = Level::generate(1, &Tuning::default());
        let row_strength: Vec<u8> = level.bricks.chunks(10).map(|row| row[0].strength).collect();
        assert_eq!(row_strength, vec![1, 1, 2, 2, 3]);
        assert!(level.bricks.iter().all(|b| b.alive));
        // 20*1 + 20*2 + 10*3 = 90
        assert_eq!(level.score_value, 900);
    }

    #[test]
    fn test_level_two_is_tougher() {
        let level = Level::generate(2, &Tuning::default());
        let row_strength: Vec<u8> = level.bricks.chunks(10).map(|row| row[0].strength).collect();
        assert_eq!(row_strength, vec![2, 2, 3, 3, 3, 3]);
    }

    #[test]
    fn test_strength_capped() {
        let level = Level::generate(9, &Tuning::default());
        assert!(level.bricks.iter().all(|b| b.strength == 3));
    }

    #[test]
    fn test_grid_layout() {
        let level = Level::generate(1, &Tuning::default());
        let first = level.bricks[0].rect;
        assert_eq!(first, Rect::new(30.0, 80.0, 70.0, 24.0));
        let second = level.bricks[1].rect;
        assert_eq!(second.x, 104.0);
        let next_row = level.bricks[10].rect;
        assert_eq!(next_row.y, 108.0);
        // Leftover width stays as extra right margin
        let last = level.bricks[9].rect;
        assert_eq!(last.right(), 766.0);
    }

    #[test]
    fn test_cleared_tracking() {
        let mut level = Level::generate(1, &Tuning::default());
        assert_eq!(level.alive_count(), 50);
        assert!(!level.is_cleared());
        for brick in &mut level.bricks {
            while brick.alive {
                brick.hit();
            }
        }
        assert_eq!(level.alive_count(), 0);
        assert!(level.is_cleared());
    }
}
