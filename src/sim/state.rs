//! Game state and core simulation types
//!
//! The whole run lives in [`GameState`]: paddle, ball, current level, score,
//! lives, and phase, plus the seeded RNG that makes serves reproducible.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Axis, Contact, Rect};
use super::level::Level;
use crate::tuning::{Tuning, TuningError};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball attached to paddle, waiting for launch input
    Ready,
    /// Active gameplay
    Playing,
    /// Every brick destroyed, waiting for the advance command
    LevelCleared,
    /// Out of lives, waiting for a restart
    GameOver,
}

impl GamePhase {
    /// Transition table. Restarting into `Ready` is always allowed.
    pub fn can_transition_to(self, next: GamePhase) -> bool {
        use GamePhase::*;
        matches!(
            (self, next),
            (_, Ready) | (Ready, Playing) | (Playing, LevelCleared) | (Playing, GameOver)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Ready => "ready",
            GamePhase::Playing => "playing",
            GamePhase::LevelCleared => "level_cleared",
            GamePhase::GameOver => "game_over",
        }
    }
}

/// Something that happened during the last tick or command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Launched,
    WallBounce,
    PaddleBounce,
    /// Brick at `index` took a hit and has `remaining` strength left
    BrickHit { index: usize, remaining: u8 },
    BrickDestroyed { index: usize },
    LifeLost { lives_left: u8 },
    LevelCleared { level: u32 },
    LevelStarted { level: u32 },
    GameOver { score: u64 },
    Restarted,
}

/// The player's paddle. Moves horizontally only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge x
    pub position: f32,
    /// Top edge y (fixed)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    /// Centered paddle near the bottom of the field
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            position: ((tuning.field_width - tuning.paddle_width) / 2.0).floor(),
            y: tuning.paddle_y(),
            width: tuning.paddle_width,
            height: tuning.paddle_height,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.position + self.width / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.y, self.width, self.height)
    }

    /// Apply one tick of input. A pointer position overrides the keys.
    pub fn update(
        &mut self,
        move_left: bool,
        move_right: bool,
        pointer_x: Option<f32>,
        tuning: &Tuning,
    ) {
        if let Some(x) = pointer_x {
            self.position = x - self.width / 2.0;
        } else if move_right {
            self.position += tuning.paddle_speed;
        } else if move_left {
            self.position -= tuning.paddle_speed;
        }
        self.clamp_to_field(tuning.field_width);
    }

    fn clamp_to_field(&mut self, field_width: f32) {
        let max = (field_width - self.width).max(0.0);
        // NaN pointer input collapses to the left wall
        self.position = if self.position.is_nan() {
            0.0
        } else {
            self.position.clamp(0.0, max)
        };
    }
}

/// Ball state - attached to paddle or free-moving
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Follows the paddle's top center; velocity ignored
    Attached,
    Free,
}

/// The ball. Attachment is a flag; the paddle is passed in, never held.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub state: BallState,
}

impl Ball {
    /// A free ball at the staging point with a random serve direction
    pub fn new(tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: tuning.ball_radius,
            state: BallState::Free,
        };
        ball.reset(tuning, rng);
        ball
    }

    /// Recenter at the staging point and pick a new up-and-sideways direction
    pub fn reset(&mut self, tuning: &Tuning, rng: &mut impl Rng) {
        self.pos = Vec2::new(
            (tuning.field_width / 2.0).floor(),
            (tuning.field_height / 2.0).floor() + 60.0,
        );
        let range = tuning.serve_angle_range;
        let angle: f32 = rng.random_range(-range..=range);
        let speed = tuning.ball_base_speed;
        self.vel = Vec2::new(
            speed * angle.cos(),
            -(speed * angle.sin()).abs() - tuning.serve_upward_bias,
        );
        self.radius = tuning.ball_radius;
        self.state = BallState::Free;
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.state == BallState::Attached
    }

    pub fn attach_to(&mut self, paddle: &Paddle) {
        self.state = BallState::Attached;
        self.follow(paddle);
    }

    fn follow(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(paddle.center_x(), paddle.top() - self.radius - 1.0);
    }

    /// Detach and fire upward. Returns false (and does nothing) if not attached.
    pub fn launch(&mut self, paddle: &Paddle, tuning: &Tuning, rng: &mut impl Rng) -> bool {
        if !self.is_attached() {
            return false;
        }
        self.state = BallState::Free;
        self.follow(paddle);
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        self.vel = Vec2::new(
            sign * tuning.ball_base_speed * tuning.launch_horizontal_factor,
            -tuning.ball_base_speed,
        );
        true
    }

    /// Follow the paddle, or take one Euler step and bounce off the walls.
    /// Returns true if a wall was hit. The bottom edge is open.
    pub fn update(&mut self, paddle: &Paddle, tuning: &Tuning) -> bool {
        if self.is_attached() {
            self.follow(paddle);
            return false;
        }

        self.pos += self.vel;

        let mut bounced = false;
        if self.pos.x - self.radius <= 0.0 {
            self.pos.x = self.radius;
            self.vel.x = -self.vel.x;
            bounced = true;
        }
        if self.pos.x + self.radius >= tuning.field_width {
            self.pos.x = tuning.field_width - self.radius;
            self.vel.x = -self.vel.x;
            bounced = true;
        }
        if self.pos.y - self.radius <= 0.0 {
            self.pos.y = self.radius;
            self.vel.y = -self.vel.y;
            bounced = true;
        }
        bounced
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Raise speed by `increment`, capped at `max`, keeping the heading
    pub fn speed_up(&mut self, increment: f32, max: f32) {
        let speed = (self.speed() + increment).min(max);
        let heading = self.vel.y.atan2(self.vel.x);
        self.vel = Vec2::from_angle(heading) * speed;
    }

    /// Bounce off a box along the axis of least penetration and push the
    /// ball out to exactly one radius from that edge.
    pub fn reflect_from(&mut self, rect: &Rect) -> Axis {
        let contact = Contact::between(self.pos, self.radius, rect);
        let axis = contact.reflection_axis();
        match axis {
            Axis::Horizontal => {
                self.vel.x = -self.vel.x;
                self.pos.x = if contact.offset.x < 0.0 {
                    rect.left() - self.radius
                } else {
                    rect.right() + self.radius
                };
            }
            Axis::Vertical => {
                self.vel.y = -self.vel.y;
                self.pos.y = if contact.offset.y < 0.0 {
                    rect.top() - self.radius
                } else {
                    rect.bottom() + self.radius
                };
            }
        }
        axis
    }

    pub fn bounding_rect(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius)
    }

    /// Top of the ball has passed the bottom of the field
    pub fn out_of_bounds(&self, field_height: f32) -> bool {
        self.pos.y - self.radius > field_height
    }
}

/// A brick. Dead bricks stay in the level but are skipped everywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub strength: u8,
    pub alive: bool,
}

impl Brick {
    pub fn new(rect: Rect, strength: u8) -> Self {
        Self {
            rect,
            strength,
            alive: strength > 0,
        }
    }

    /// Take one hit. Returns true if this hit destroyed the brick.
    pub fn hit(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.strength = self.strength.saturating_sub(1);
        if self.strength == 0 {
            self.alive = false;
            return true;
        }
        false
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub rng: Pcg32,
    pub paddle: Paddle,
    pub ball: Ball,
    pub level: Level,
    pub score: u64,
    pub lives: u8,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events from the most recent tick (and commands issued since)
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// New run with default tuning
    pub fn new(seed: u64) -> Self {
        Self::from_valid_tuning(seed, Tuning::default())
    }

    /// New run with custom tuning. Rejects values the simulation cannot run with.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::from_valid_tuning(seed, tuning))
    }

    fn from_valid_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let paddle = Paddle::new(&tuning);
        let mut ball = Ball::new(&tuning, &mut rng);
        ball.attach_to(&paddle);
        let level = Level::generate(1, &tuning);
        log::info!("Level 1 started with {} bricks", level.bricks.len());

        Self {
            seed,
            lives: tuning.lives_start,
            tuning,
            rng,
            paddle,
            ball,
            level,
            score: 0,
            phase: GamePhase::Ready,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn level_index(&self) -> u32 {
        self.level.index
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Move to `next` if the transition table allows it
    pub fn set_phase(&mut self, next: GamePhase) -> bool {
        if !self.phase.can_transition_to(next) {
            log::warn!(
                "Refused phase transition {} -> {}",
                self.phase.as_str(),
                next.as_str()
            );
            return false;
        }
        self.phase = next;
        true
    }

    /// Level 1, score 0, full lives, fresh paddle and ball
    pub fn hard_reset(&mut self) {
        self.paddle = Paddle::new(&self.tuning);
        self.ball.reset(&self.tuning, &mut self.rng);
        self.ball.attach_to(&self.paddle);
        self.level = Level::generate(1, &self.tuning);
        self.score = 0;
        self.lives = self.tuning.lives_start;
        self.set_phase(GamePhase::Ready);
        self.events.push(GameEvent::Restarted);
        log::info!("Game restarted");
    }

    /// Replace the cleared level with the next one. Ignored in other phases.
    pub fn next_level(&mut self) -> bool {
        if self.phase != GamePhase::LevelCleared {
            return false;
        }
        let index = self.level.index + 1;
        self.level = Level::generate(index, &self.tuning);
        self.ball.reset(&self.tuning, &mut self.rng);
        self.ball.attach_to(&self.paddle);
        self.set_phase(GamePhase::Ready);
        self.events.push(GameEvent::LevelStarted { level: index });
        log::info!("Level {} started with {} bricks", index, self.level.bricks.len());
        true
    }

    /// Take a life; the last one ends the run, otherwise serve again
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::LifeLost { lives_left: self.lives });
        if self.lives == 0 {
            self.set_phase(GamePhase::GameOver);
            self.events.push(GameEvent::GameOver { score: self.score });
            log::info!("Game over on level {} with score {}", self.level.index, self.score);
        } else {
            self.ball.reset(&self.tuning, &mut self.rng);
            self.ball.attach_to(&self.paddle);
            self.set_phase(GamePhase::Ready);
            log::debug!("Life lost, {} remaining", self.lives);
        }
    }

    /// Launch the attached ball. Only acts in `Ready`.
    pub fn launch(&mut self) -> bool {
        if self.phase != GamePhase::Ready {
            return false;
        }
        if !self.ball.launch(&self.paddle, &self.tuning, &mut self.rng) {
            return false;
        }
        self.set_phase(GamePhase::Playing);
        self.events.push(GameEvent::Launched);
        log::debug!("Ball launched with velocity {:?}", self.ball.vel);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_ball(pos: Vec2, vel: Vec2) -> Ball {
        Ball {
            pos,
            vel,
            radius: 9.0,
            state: BallState::Free,
        }
    }

    #[test]
    fn test_phase_transition_table() {
        use GamePhase::*;
        assert!(Ready.can_transition_to(Playing));
        assert!(Playing.can_transition_to(LevelCleared));
        assert!(Playing.can_transition_to(GameOver));
        assert!(LevelCleared.can_transition_to(Ready));
        assert!(GameOver.can_transition_to(Ready));
        assert!(Playing.can_transition_to(Ready));

        assert!(!Ready.can_transition_to(LevelCleared));
        assert!(!GameOver.can_transition_to(Playing));
        assert!(!LevelCleared.can_transition_to(Playing));
        assert!(!LevelCleared.can_transition_to(GameOver));
    }

    #[test]
    fn test_set_phase_refuses_illegal() {
        let mut state = GameState::new(1);
        assert!(!state.set_phase(GamePhase::GameOver));
        assert_eq!(state.phase, GamePhase::Ready);
    }

    #[test]
    fn test_paddle_keyboard_and_clamp() {
        let tuning = Tuning::default();
        let mut paddle = Paddle::new(&tuning);
        let start = paddle.position;
        paddle.update(true, false, None, &tuning);
        assert_eq!(paddle.position, start - tuning.paddle_speed);

        for _ in 0..200 {
            paddle.update(true, false, None, &tuning);
        }
        assert_eq!(paddle.position, 0.0);

        for _ in 0..200 {
            paddle.update(false, true, None, &tuning);
        }
        assert_eq!(paddle.position, tuning.field_width - paddle.width);
    }

    #[test]
    fn test_paddle_pointer_overrides_keys() {
        let tuning = Tuning::default();
        let mut paddle = Paddle::new(&tuning);
        paddle.update(true, false, Some(300.0), &tuning);
        assert_eq!(paddle.center_x(), 300.0);

        paddle.update(false, false, Some(5000.0), &tuning);
        assert_eq!(paddle.position, tuning.field_width - paddle.width);
        paddle.update(false, false, Some(f32::NAN), &tuning);
        assert_eq!(paddle.position, 0.0);
    }

    #[test]
    fn test_ball_reset_serves_upward() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let ball = Ball::new(&tuning, &mut rng);
            assert_eq!(ball.pos, Vec2::new(400.0, 360.0));
            assert!(ball.vel.y <= -tuning.serve_upward_bias);
            assert!(ball.vel.x > 0.0);
            assert!(ball.speed() <= tuning.ball_speed_max);
            assert!(!ball.is_attached());
        }
    }

    #[test]
    fn test_launch_from_paddle() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let paddle = Paddle::new(&tuning);
        let mut ball = Ball::new(&tuning, &mut rng);
        ball.attach_to(&paddle);
        assert!(ball.is_attached());

        assert!(ball.launch(&paddle, &tuning, &mut rng));
        assert!(!ball.is_attached());
        assert!(ball.vel.y < 0.0);
        assert!((ball.vel.x.abs() - 0.8 * tuning.ball_base_speed).abs() < 1e-6);
        assert_eq!(ball.pos, Vec2::new(paddle.center_x(), paddle.top() - ball.radius - 1.0));

        // Second launch is a no-op
        let vel = ball.vel;
        assert!(!ball.launch(&paddle, &tuning, &mut rng));
        assert_eq!(ball.vel, vel);
    }

    #[test]
    fn test_attached_ball_follows_paddle() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut paddle = Paddle::new(&tuning);
        let mut ball = Ball::new(&tuning, &mut rng);
        ball.attach_to(&paddle);
        paddle.update(false, false, Some(200.0), &tuning);
        assert!(!ball.update(&paddle, &tuning));
        assert_eq!(ball.pos.x, 200.0);
        assert_eq!(ball.pos.y, paddle.top() - ball.radius - 1.0);
    }

    #[test]
    fn test_wall_bounces() {
        let tuning = Tuning::default();
        let paddle = Paddle::new(&tuning);

        let mut ball = free_ball(Vec2::new(12.0, 300.0), Vec2::new(-5.0, 1.0));
        assert!(ball.update(&paddle, &tuning));
        assert_eq!(ball.pos.x, 9.0);
        assert_eq!(ball.vel.x, 5.0);

        let mut ball = free_ball(Vec2::new(788.0, 300.0), Vec2::new(5.0, 1.0));
        assert!(ball.update(&paddle, &tuning));
        assert_eq!(ball.pos.x, 791.0);
        assert_eq!(ball.vel.x, -5.0);

        let mut ball = free_ball(Vec2::new(400.0, 10.0), Vec2::new(1.0, -5.0));
        assert!(ball.update(&paddle, &tuning));
        assert_eq!(ball.pos.y, 9.0);
        assert_eq!(ball.vel.y, 5.0);

        // No floor
        let mut ball = free_ball(Vec2::new(400.0, 595.0), Vec2::new(0.0, 5.0));
        assert!(!ball.update(&paddle, &tuning));
        assert_eq!(ball.vel.y, 5.0);
    }

    #[test]
    fn test_speed_up_preserves_heading() {
        let mut ball = free_ball(Vec2::new(400.0, 300.0), Vec2::new(3.0, 4.0));
        ball.speed_up(0.04, 10.0);
        assert!((ball.speed() - 5.04).abs() < 1e-5);
        assert!((ball.vel.x / ball.vel.y - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_speed_up_caps() {
        let mut ball = free_ball(Vec2::new(400.0, 300.0), Vec2::new(-6.0, 8.0));
        ball.speed_up(0.5, 10.0);
        assert!((ball.speed() - 10.0).abs() < 1e-5);
        assert!(ball.vel.x < 0.0 && ball.vel.y > 0.0);
    }

    #[test]
    fn test_reflect_side_hit_inverts_vx() {
        let brick = Rect::new(100.0, 100.0, 70.0, 24.0);
        let mut ball = free_ball(Vec2::new(95.0, 112.0), Vec2::new(4.0, -3.0));
        assert_eq!(ball.reflect_from(&brick), Axis::Horizontal);
        assert_eq!(ball.vel, Vec2::new(-4.0, -3.0));
        assert_eq!(ball.pos.x, 91.0);

        let mut ball = free_ball(Vec2::new(175.0, 112.0), Vec2::new(-4.0, -3.0));
        assert_eq!(ball.reflect_from(&brick), Axis::Horizontal);
        assert_eq!(ball.vel, Vec2::new(4.0, -3.0));
        assert_eq!(ball.pos.x, 179.0);
    }

    #[test]
    fn test_reflect_top_and_bottom_hit_inverts_vy() {
        let brick = Rect::new(100.0, 100.0, 70.0, 24.0);
        let mut ball = free_ball(Vec2::new(130.0, 94.0), Vec2::new(2.0, 5.0));
        assert_eq!(ball.reflect_from(&brick), Axis::Vertical);
        assert_eq!(ball.vel, Vec2::new(2.0, -5.0));
        assert_eq!(ball.pos.y, 91.0);

        let mut ball = free_ball(Vec2::new(130.0, 130.0), Vec2::new(2.0, -5.0));
        assert_eq!(ball.reflect_from(&brick), Axis::Vertical);
        assert_eq!(ball.vel, Vec2::new(2.0, 5.0));
        assert_eq!(ball.pos.y, 133.0);
    }

    #[test]
    fn test_out_of_bounds() {
        let ball = free_ball(Vec2::new(400.0, 609.0), Vec2::ZERO);
        assert!(!ball.out_of_bounds(600.0));
        let ball = free_ball(Vec2::new(400.0, 609.5), Vec2::ZERO);
        assert!(ball.out_of_bounds(600.0));
    }

    #[test]
    fn test_brick_hit_sequence() {
        let mut brick = Brick::new(Rect::new(0.0, 0.0, 10.0, 10.0), 2);
        assert!(!brick.hit());
        assert_eq!(brick.strength, 1);
        assert!(brick.alive);
        assert!(brick.hit());
        assert!(!brick.alive);
        // Dead bricks ignore further hits
        assert!(!brick.hit());
        assert_eq!(brick.strength, 0);
        assert!(!brick.alive);
    }

    #[test]
    fn test_lose_last_life_is_game_over() {
        let mut state = GameState::new(5);
        state.launch();
        state.lives = 1;
        state.lose_life();
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_with_tuning_rejects_invalid_values() {
        let tuning = Tuning {
            serve_angle_range: -0.5,
            ..Default::default()
        };
        assert!(matches!(
            GameState::with_tuning(1, tuning),
            Err(TuningError::Invalid { field: "serve_angle_range", .. })
        ));

        let tuning = Tuning {
            serve_angle_range: f32::NAN,
            ..Default::default()
        };
        assert!(GameState::with_tuning(1, tuning).is_err());
    }

    #[test]
    fn test_next_level_only_when_cleared() {
        let mut state = GameState::new(5);
        assert!(!state.next_level());
        assert_eq!(state.level_index(), 1);
    }
}
