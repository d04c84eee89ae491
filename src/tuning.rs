//! Data-driven game balance
//!
//! Every dimension, speed, and scoring constant the simulation uses lives in
//! [`Tuning`]. A `GameState` takes its tuning at construction and never
//! mutates it, so tests can run the core with alternate tunables.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Immutable gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    /// Playfield width in pixels
    pub field_width: f32,
    /// Playfield height in pixels
    pub field_height: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Gap between the paddle's top edge and the bottom of the field
    pub paddle_bottom_offset: f32,
    /// Horizontal displacement per tick under keyboard control
    pub paddle_speed: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Launch and serve speed (pixels per tick)
    pub ball_base_speed: f32,
    /// Speed added on every brick hit
    pub ball_speed_increment: f32,
    /// Hard cap on ball speed
    pub ball_speed_max: f32,
    /// Floor applied to the ball speed when it leaves the paddle
    pub paddle_min_bounce_speed: f32,
    /// Largest deflection off vertical for an edge hit (radians)
    pub paddle_max_bounce_angle: f32,
    /// Extra upward velocity subtracted on serve
    pub serve_upward_bias: f32,
    /// Serve angle is sampled from [-range, range] radians
    pub serve_angle_range: f32,
    /// Horizontal launch velocity as a fraction of base speed
    pub launch_horizontal_factor: f32,

    // === Bricks ===
    /// Rows on level 1; each level adds one
    pub brick_base_rows: u32,
    pub brick_columns: u32,
    pub brick_gap: f32,
    pub brick_top_offset: f32,
    pub brick_height: f32,
    pub brick_side_margin: f32,
    pub brick_max_strength: u8,

    // === Rules ===
    pub lives_start: u8,
    pub points_per_hit: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,

            paddle_width: 110.0,
            paddle_height: 18.0,
            paddle_bottom_offset: 60.0,
            paddle_speed: 7.0,

            ball_radius: 9.0,
            ball_base_speed: 5.0,
            ball_speed_increment: 0.04,
            ball_speed_max: 10.0,
            paddle_min_bounce_speed: 6.0,
            paddle_max_bounce_angle: std::f32::consts::FRAC_PI_3,
            serve_upward_bias: 4.0,
            serve_angle_range: 0.8,
            launch_horizontal_factor: 0.8,

            brick_base_rows: 5,
            brick_columns: 10,
            brick_gap: 4.0,
            brick_top_offset: 80.0,
            brick_height: 24.0,
            brick_side_margin: 30.0,
            brick_max_strength: 3,

            lives_start: 3,
            points_per_hit: 10,
        }
    }
}

/// Why a tuning document was rejected
#[derive(Debug)]
pub enum TuningError {
    /// Could not read the tuning file
    Io(std::io::Error),
    /// The document is not valid tuning JSON
    Parse(serde_json::Error),
    /// A field holds a value the simulation cannot run with
    Invalid { field: &'static str, reason: &'static str },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read tuning: {err}"),
            Self::Parse(err) => write!(f, "failed to parse tuning: {err}"),
            Self::Invalid { field, reason } => {
                write!(f, "invalid tuning field `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for TuningError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

fn invalid(field: &'static str, reason: &'static str) -> TuningError {
    TuningError::Invalid { field, reason }
}

impl Tuning {
    /// Parse and validate a JSON tuning document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Check that the simulation can run with these values
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("paddle_width", self.paddle_width),
            ("paddle_height", self.paddle_height),
            ("ball_radius", self.ball_radius),
            ("ball_base_speed", self.ball_base_speed),
            ("ball_speed_max", self.ball_speed_max),
            ("brick_height", self.brick_height),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, "must be a positive number"));
            }
        }

        let non_negative = [
            ("paddle_bottom_offset", self.paddle_bottom_offset),
            ("paddle_speed", self.paddle_speed),
            ("ball_speed_increment", self.ball_speed_increment),
            ("paddle_min_bounce_speed", self.paddle_min_bounce_speed),
            ("paddle_max_bounce_angle", self.paddle_max_bounce_angle),
            ("serve_upward_bias", self.serve_upward_bias),
            ("serve_angle_range", self.serve_angle_range),
            ("launch_horizontal_factor", self.launch_horizontal_factor),
            ("brick_gap", self.brick_gap),
            ("brick_top_offset", self.brick_top_offset),
            ("brick_side_margin", self.brick_side_margin),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, "must be zero or a positive number"));
            }
        }

        if self.paddle_width > self.field_width {
            return Err(invalid("paddle_width", "wider than the field"));
        }
        if self.paddle_min_bounce_speed > self.ball_speed_max {
            return Err(invalid("paddle_min_bounce_speed", "exceeds ball_speed_max"));
        }
        if self.launch_speed() > self.ball_speed_max {
            return Err(invalid("ball_speed_max", "below the launch speed"));
        }
        if self.brick_columns == 0 {
            return Err(invalid("brick_columns", "must be at least 1"));
        }
        if self.brick_base_rows == 0 {
            return Err(invalid("brick_base_rows", "must be at least 1"));
        }
        if self.brick_max_strength == 0 {
            return Err(invalid("brick_max_strength", "must be at least 1"));
        }
        if self.lives_start == 0 {
            return Err(invalid("lives_start", "must be at least 1"));
        }
        if self.brick_width() < 1.0 {
            return Err(invalid("brick_columns", "bricks do not fit in the field"));
        }
        Ok(())
    }

    /// Brick width: usable row width split evenly, leftover pixels unused
    pub fn brick_width(&self) -> f32 {
        let columns = self.brick_columns.max(1) as f32;
        let total_gap = (columns - 1.0) * self.brick_gap;
        let area = self.field_width - self.brick_side_margin * 2.0 - total_gap;
        (area / columns).floor()
    }

    /// Speed of a freshly launched ball
    pub fn launch_speed(&self) -> f32 {
        self.ball_base_speed * self.launch_horizontal_factor.hypot(1.0)
    }

    /// Top edge of the paddle
    pub fn paddle_y(&self) -> f32 {
        self.field_height - self.paddle_bottom_offset
    }
}
