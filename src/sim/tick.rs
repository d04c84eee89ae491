//! Fixed-step simulation tick
//!
//! One call to [`tick`] advances paddle, ball, bricks, and phase by exactly
//! one frame. Motion is a fixed per-tick displacement; there is no clock.

use glam::Vec2;

use super::state::{GameEvent, GamePhase, GameState};

/// Discrete commands issued by the input layer between or with ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Launch the attached ball
    Launch,
    /// Next level after a clear, new run after game over
    AdvanceOrRestart,
    /// Back to level 1 from any phase
    HardRestart,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Pointer x; overrides the movement keys when present
    pub pointer_x: Option<f32>,
    /// Launch ball (click/space held)
    pub launch: bool,
    /// Idle/demo mode - the core steers the paddle and serves by itself
    pub idle_mode: bool,
    /// Edge-triggered commands, applied before physics
    pub commands: Vec<Command>,
}

/// Apply a command. Commands that make no sense in the current phase are ignored.
pub fn apply_command(state: &mut GameState, command: Command) {
    match command {
        Command::Launch => {
            state.launch();
        }
        Command::AdvanceOrRestart => match state.phase {
            GamePhase::LevelCleared => {
                state.next_level();
            }
            GamePhase::GameOver => state.hard_reset(),
            _ => {}
        },
        Command::HardRestart => state.hard_reset(),
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    for &command in &input.commands {
        apply_command(state, command);
    }

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    let input = &input;

    state.time_ticks += 1;

    state
        .paddle
        .update(input.move_left, input.move_right, input.pointer_x, &state.tuning);

    if !matches!(state.phase, GamePhase::Ready | GamePhase::Playing) {
        return;
    }

    if state.ball.update(&state.paddle, &state.tuning) {
        state.events.push(GameEvent::WallBounce);
    }

    if state.phase == GamePhase::Ready && input.launch {
        state.launch();
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    let ball_rect = state.ball.bounding_rect();

    // Paddle is checked before bricks, and only while the ball descends
    if state.ball.vel.y > 0.0 && ball_rect.overlaps(&state.paddle.rect()) {
        bounce_off_paddle(state);
    }

    // At most one brick per tick
    let mut hit_any = false;
    if let Some(index) = state
        .level
        .bricks
        .iter()
        .position(|b| b.alive && ball_rect.overlaps(&b.rect))
    {
        hit_any = true;
        let brick = &mut state.level.bricks[index];
        let destroyed = brick.hit();
        let remaining = brick.strength;
        let rect = brick.rect;

        state.ball.reflect_from(&rect);
        state
            .ball
            .speed_up(state.tuning.ball_speed_increment, state.tuning.ball_speed_max);
        state.score += state.tuning.points_per_hit;

        state.events.push(GameEvent::BrickHit { index, remaining });
        if destroyed {
            state.events.push(GameEvent::BrickDestroyed { index });
            log::trace!("Brick {} destroyed, {} left", index, state.level.alive_count());
        } else {
            log::trace!("Brick {} hit, {} strength left", index, remaining);
        }
    }

    if hit_any && state.level.is_cleared() {
        state.set_phase(GamePhase::LevelCleared);
        state.events.push(GameEvent::LevelCleared {
            level: state.level.index,
        });
        log::info!("Level {} cleared, score {}", state.level.index, state.score);
    }

    if state.phase == GamePhase::Playing && state.ball.out_of_bounds(state.tuning.field_height) {
        state.lose_life();
    }
}

/// Send the ball back up at an angle set by where it struck the paddle
fn bounce_off_paddle(state: &mut GameState) {
    let tuning = &state.tuning;
    let paddle = &state.paddle;
    let ball = &mut state.ball;

    let offset = ((ball.pos.x - paddle.center_x()) / (paddle.width / 2.0)).clamp(-1.0, 1.0);
    let speed = ball
        .speed()
        .min(tuning.ball_speed_max)
        .max(tuning.paddle_min_bounce_speed);
    let angle = -tuning.paddle_max_bounce_angle * offset;

    ball.vel = Vec2::new(speed * angle.sin(), -(speed * angle.cos()).abs());
    // Lift clear of the paddle so the next tick does not re-trigger
    ball.pos.y = paddle.top() - ball.radius - 1.0;

    state.events.push(GameEvent::PaddleBounce);
    log::debug!("Paddle bounce at offset {:.2}, speed {:.2}", offset, speed);
}

/// Demo driver: serve immediately and keep the paddle under the ball
fn autopilot(state: &GameState, input: &mut TickInput) {
    match state.phase {
        GamePhase::Ready => input.launch = true,
        GamePhase::LevelCleared | GamePhase::GameOver => return,
        GamePhase::Playing => {}
    }

    // Vary where the ball lands on the paddle so the rally does not loop
    let time_factor = state.time_ticks as f32 * 0.01;
    let wobble = time_factor.sin() * 0.3 * state.paddle.width / 2.0;

    // Lead the target slightly along the ball's heading
    let target = state.ball.pos.x + state.ball.vel.x * 2.0 + wobble;
    input.pointer_x = Some(target);
}
