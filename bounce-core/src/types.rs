//! Core types for the bouncing-sphere simulation.
//!
//! Units are scene units, not SI: the box is 12 units on a side and the
//! sphere radius is 1.5. Time is in seconds.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use crate::error::{PhysicsError, Result};

// =============================================================================
// Vec3 - 3D Vector
// =============================================================================

/// A 3D vector used for positions, velocities, accelerations, forces and
/// plane normals.
///
/// Coordinate system: Y is up, the floor of the box lies in the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared magnitude (avoids sqrt for comparisons)
    pub fn magnitude_squared(&self) -> f64 {
        self.dot(self)
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    /// Unit vector in the same direction.
    ///
    /// A zero-length (or non-finite) vector has no direction and is rejected.
    pub fn try_normalized(&self) -> Result<Self> {
        let mag = self.magnitude();
        if !mag.is_finite() || mag < constants::EPSILON {
            return Err(PhysicsError::DegenerateVector);
        }
        Ok(*self / mag)
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Component of this vector along a unit normal.
    pub fn normal_component(&self, unit_normal: &Self) -> Self {
        *unit_normal * self.dot(unit_normal)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

// =============================================================================
// Plane
// =============================================================================

/// An infinite half-space boundary.
///
/// The normal is unit length and points into the interior of the box, so a
/// body inside the box has a positive signed gap to every wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vec3,
    pub point: Vec3,
    /// Set while the body sits on this plane; updated once per step.
    pub resting: bool,
}

impl Plane {
    pub fn new(normal: Vec3, point: Vec3) -> Result<Self> {
        Ok(Self {
            normal: normal.try_normalized()?,
            point,
            resting: false,
        })
    }

    /// Distance from a sphere's surface to the plane along the normal.
    ///
    /// Zero means touching, negative means penetrating.
    pub fn signed_gap(&self, position: Vec3, radius: f64) -> f64 {
        self.normal.dot(&(position - self.point)) - radius
    }
}

// =============================================================================
// Box walls
// =============================================================================

/// Index of each wall in [`BoxWalls::planes`]. Collision and resting
/// passes always visit the walls in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wall {
    Floor = 0,
    Ceiling = 1,
    Left = 2,
    Right = 3,
    Front = 4,
    Back = 5,
}

impl Wall {
    pub const ALL: [Wall; 6] = [
        Wall::Floor,
        Wall::Ceiling,
        Wall::Left,
        Wall::Right,
        Wall::Front,
        Wall::Back,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// The six walls of the cube the sphere bounces in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxWalls {
    planes: [Plane; 6],
}

impl BoxWalls {
    /// 12-unit cube: floor at y = 0, ceiling at y = 12, side walls at ±6.
    pub fn standard() -> Self {
        let h = constants::BOX_HALF_EXTENT;
        let wall = |normal: Vec3, point: Vec3| Plane {
            normal,
            point,
            resting: false,
        };
        Self {
            planes: [
                wall(Vec3::new(0.0, 1.0, 0.0), Vec3::ZERO),
                wall(
                    Vec3::new(0.0, -1.0, 0.0),
                    Vec3::new(0.0, constants::BOX_HEIGHT, 0.0),
                ),
                wall(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(h, 0.0, 0.0)),
                wall(Vec3::new(1.0, 0.0, 0.0), Vec3::new(-h, 0.0, 0.0)),
                wall(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, h)),
                wall(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -h)),
            ],
        }
    }

    pub fn planes(&self) -> &[Plane; 6] {
        &self.planes
    }

    pub fn planes_mut(&mut self) -> &mut [Plane; 6] {
        &mut self.planes
    }

    pub fn wall(&self, wall: Wall) -> &Plane {
        &self.planes[wall.index()]
    }

    /// Clear every resting flag.
    pub fn reset_contacts(&mut self) {
        for plane in &mut self.planes {
            plane.resting = false;
        }
    }

    /// True if `position` keeps a sphere of `radius` fully inside the box.
    pub fn contains(&self, position: Vec3, radius: f64) -> bool {
        self.planes
            .iter()
            .all(|p| p.signed_gap(position, radius) >= -constants::EPSILON)
    }
}

impl Default for BoxWalls {
    fn default() -> Self {
        Self::standard()
    }
}

// =============================================================================
// Body
// =============================================================================

/// Kinematic state of the sphere at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BodyState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: Vec3,
}

impl BodyState {
    pub fn new(position: Vec3, velocity: Vec3, acceleration: Vec3) -> Self {
        Self {
            position,
            velocity,
            acceleration,
        }
    }

    pub fn kinetic_energy(&self, props: &BodyProperties) -> f64 {
        0.5 * props.mass * self.velocity.magnitude_squared()
    }
}

/// Physical coefficients of the sphere. Fixed for a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyProperties {
    pub mass: f64,
    pub radius: f64,
    /// Linear drag coefficient: drag force is `-drag * velocity`.
    pub drag: f64,
    pub restitution: f64,
    /// Fraction of tangential velocity removed at each impact.
    pub friction: f64,
}

impl Default for BodyProperties {
    fn default() -> Self {
        Self {
            mass: 90.0,
            radius: constants::BODY_RADIUS,
            drag: 0.23,
            restitution: 1.0,
            friction: 0.0,
        }
    }
}

// =============================================================================
// Constants
// =============================================================================

pub mod constants {
    use super::Vec3;

    /// Bounding radius of the rendered sphere.
    pub const BODY_RADIUS: f64 = 1.5;

    pub const SPAWN_POSITION: Vec3 = Vec3::new(0.0, 6.0, 0.0);

    pub const BOX_HALF_EXTENT: f64 = 6.0;
    pub const BOX_HEIGHT: f64 = 12.0;

    pub const STANDARD_GRAVITY: f64 = 9.8;

    /// Gap below which the sphere counts as touching a resting plane.
    pub const REST_DISTANCE_TOLERANCE: f64 = 0.1;
    /// Normal speed below which the sphere counts as resting.
    pub const REST_SPEED_TOLERANCE: f64 = 0.1;

    /// Small value for floating-point comparisons
    pub const EPSILON: f64 = 1e-10;
}

// =============================================================================
// Tests
// =============================================================================
