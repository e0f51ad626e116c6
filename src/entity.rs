/// Playing-field geometry. Built once at startup and immutable afterwards;
/// everything else in the game references it for bounds and sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub width: f64,
    pub height: f64,
    pub paddle_width: f64,
    pub paddle_height: f64,
    pub ball_size: f64,
    pub player_x: f64,
    pub ai_x: f64,
}

// Default metrics match the canvas version of the game.
const PADDLE_WIDTH: f64 = 14.0;
const PADDLE_HEIGHT: f64 = 90.0;
const BALL_SIZE: f64 = 16.0;
const PADDLE_INSET: f64 = 20.0;

impl Field {
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_metrics(width, height, PADDLE_WIDTH, PADDLE_HEIGHT, BALL_SIZE, PADDLE_INSET)
    }

    /// Build a field with custom metrics. The CLI backend uses this to size
    /// paddles and ball in terminal cells instead of canvas pixels.
    pub fn with_metrics(
        width: f64,
        height: f64,
        paddle_width: f64,
        paddle_height: f64,
        ball_size: f64,
        paddle_inset: f64,
    ) -> Self {
        Self {
            width,
            height,
            paddle_width,
            paddle_height,
            ball_size,
            player_x: paddle_inset,
            ai_x: width - paddle_inset - paddle_width,
        }
    }

    /// Largest legal top-edge Y for a paddle.
    pub fn max_paddle_y(&self) -> f64 {
        self.height - self.paddle_height
    }

    /// Top-edge Y that centers a paddle vertically.
    pub fn centered_paddle_y(&self) -> f64 {
        self.height / 2.0 - self.paddle_height / 2.0
    }
}

/// A paddle is just a vertical position; width/height live in `Field`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub y: f64,
}

impl Paddle {
    pub fn centered(field: &Field) -> Self {
        Self {
            y: field.centered_paddle_y(),
        }
    }

    /// Clamp into the legal range. Called after every mutation so the
    /// invariant 0 <= y <= height - paddle_height always holds.
    pub fn clamp_to(&mut self, field: &Field) {
        self.y = self.y.clamp(0.0, field.max_paddle_y());
    }

    pub fn center(&self, field: &Field) -> f64 {
        self.y + field.paddle_height / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl Ball {
    pub fn new(x: f64, y: f64, vx: f64, vy: f64) -> Self {
        Self { x, y, vx, vy }
    }

    pub fn center_x(&self, field: &Field) -> f64 {
        self.x + field.ball_size / 2.0
    }

    pub fn center_y(&self, field: &Field) -> f64 {
        self.y + field.ball_size / 2.0
    }
}
