use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Linear interpolation between `start` and `end`. `t` is not clamped.
pub fn lerp(t: f32, start: f32, end: f32) -> f32 {
    start + t * (end - start)
}

/// Remaps `value` from the `[from_min, from_max]` range into `[to_min, to_max]`.
pub fn remap(value: f32, from_min: f32, from_max: f32, to_min: f32, to_max: f32) -> f32 {
    let percentage = (value - from_min) / (from_max - from_min);
    percentage * (to_max - to_min) + to_min
}

/// Continuous 2D position or scale, in world pixels. Value type: every
/// operation returns a new vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const ONE: Vec2 = Vec2 { x: 1.0, y: 1.0 };
    // Screen convention: y grows downward.
    pub const UP: Vec2 = Vec2 { x: 0.0, y: -1.0 };
    pub const DOWN: Vec2 = Vec2 { x: 0.0, y: 1.0 };
    pub const LEFT: Vec2 = Vec2 { x: -1.0, y: 0.0 };
    pub const RIGHT: Vec2 = Vec2 { x: 1.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        self.square_length().sqrt()
    }

    pub fn square_length(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Returns the zero vector unchanged instead of dividing by zero.
    pub fn normalize(self) -> Self {
        if self.x == 0.0 && self.y == 0.0 {
            return self;
        }
        let inv_length = self.length().recip();
        Self {
            x: self.x * inv_length,
            y: self.y * inv_length,
        }
    }

    /// Component-wise product.
    pub fn scale(self, other: Vec2) -> Self {
        Self {
            x: self.x * other.x,
            y: self.y * other.y,
        }
    }

    /// Interpolates toward `to`. `t` is not clamped; callers interpolating
    /// from an unclamped timer percentage must clamp first.
    pub fn lerp(self, t: f32, to: Vec2) -> Self {
        Self {
            x: lerp(t, self.x, to.x),
            y: lerp(t, self.y, to.y),
        }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, other: Vec2) -> Vec2 {
        Vec2 {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    fn mul(self, factor: f32) -> Vec2 {
        Vec2 {
            x: self.x * factor,
            y: self.y * factor,
        }
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2 {
            x: -self.x,
            y: -self.y,
        }
    }
}

/// Discrete tile address. Distinct from [`Vec2`] so cell occupancy and
/// continuous rendering positions can never be mixed up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Unit step (per-axis signum) from `self` toward `target`. Returns the
    /// zero step when already there.
    pub fn step_toward(self, target: GridPos) -> GridPos {
        GridPos {
            x: (target.x - self.x).signum(),
            y: (target.y - self.y).signum(),
        }
    }
}

impl Add for GridPos {
    type Output = GridPos;

    fn add(self, other: GridPos) -> GridPos {
        GridPos {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for GridPos {
    type Output = GridPos;

    fn sub(self, other: GridPos) -> GridPos {
        GridPos {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}
