//! Components stored for every actor

use super::ActorType;

/// Cell position and rotation of an actor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    /// Column, may leave the world in unbounded worlds
    pub x: i32,
    /// Row
    pub y: i32,
    /// Clockwise degrees in `[0, 360)`; 0 faces right
    rotation: f64,
}

impl Transform {
    #[must_use]
    pub fn new(x: i32, y: i32, rotation: f64) -> Self {
        Self {
            x,
            y,
            rotation: normalize_degrees(rotation),
        }
    }

    #[must_use]
    pub const fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_degrees(degrees);
    }

    /// Rotate clockwise by `degrees`
    pub fn turn(&mut self, degrees: f64) {
        self.set_rotation(self.rotation + degrees);
    }

    /// Cells travelled when moving `distance` along the rotation, rounded
    #[must_use]
    pub fn step(&self, distance: f64) -> (i32, i32) {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        ((distance * cos).round() as i32, (distance * sin).round() as i32)
    }

    /// Rotation that faces the cell (x, y)
    #[must_use]
    pub fn rotation_towards(&self, x: i32, y: i32) -> f64 {
        let dx = f64::from(x - self.x);
        let dy = f64::from(y - self.y);
        normalize_degrees(dy.atan2(dx).to_degrees())
    }
}

/// Wrap degrees into `[0, 360)`
#[must_use]
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Which actor type an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorKind(pub ActorType);

/// Monotonic insertion number; orders actors of the same type
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Spawned(pub u64);
