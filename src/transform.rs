//! 2D rotation and bounds values used throughout the hierarchy.

use std::f32::consts::{PI, TAU};
use std::ops::{Add, Neg, Sub};

use glam::{Affine2, Vec2};
use serde::{Deserialize, Serialize};

/// Rotation in radians, counter-clockwise.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Angle {
    pub theta: f32,
}

impl Angle {
    pub const ZERO: Angle = Angle { theta: 0.0 };

    pub fn new(theta: f32) -> Self {
        Self { theta }
    }

    pub fn from_degrees(degrees: f32) -> Self {
        Self {
            theta: degrees.to_radians(),
        }
    }

    pub fn degrees(&self) -> f32 {
        self.theta.to_degrees()
    }

    /// Same rotation wrapped into `(-PI, PI]`.
    pub fn reduced(&self) -> Angle {
        let mut theta = self.theta % TAU;
        if theta > PI {
            theta -= TAU;
        } else if theta <= -PI {
            theta += TAU;
        }
        Angle { theta }
    }

    /// Compare two rotations modulo a full turn.
    pub fn equal_approx(&self, other: Angle, tolerance: f32) -> bool {
        (*self - other).reduced().theta.abs() <= tolerance
    }

    /// Rotate a vector by this angle.
    pub fn rotate_vec(&self, v: Vec2) -> Vec2 {
        Vec2::from_angle(self.theta).rotate(v)
    }

    pub fn is_finite(&self) -> bool {
        self.theta.is_finite()
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, other: Angle) -> Angle {
        Angle {
            theta: self.theta + other.theta,
        }
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, other: Angle) -> Angle {
        Angle {
            theta: self.theta - other.theta,
        }
    }
}

impl Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle { theta: -self.theta }
    }
}

/// Local matrix for a pose relative to its parent.
pub fn pose_matrix(position: Vec2, rotation: Angle) -> Affine2 {
    Affine2::from_angle_translation(rotation.theta, position)
}

/// Axis-aligned box (closed on every edge).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Box2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Box2 {
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin, origin + size)
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn intersects(&self, other: &Box2) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }
}
