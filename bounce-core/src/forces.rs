//! Forces acting on the sphere.
//!
//! - **Gravity**: constant acceleration, scaled by mass
//! - **Drag**: linear in velocity, `-d * v`
//! - **Contact reaction**: pushes back along the normal of every plane the
//!   sphere is resting on
//!
//! ```text
//! F = m*g - d*v
//! ```

use serde::{Deserialize, Serialize};

use crate::integrator::ForceModel;
use crate::types::{constants, BodyProperties, Plane, Vec3};

/// Gravity plus linear drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityDrag {
    /// Gravitational acceleration (default: -9.8 in Y)
    pub gravity: Vec3,
}

impl Default for GravityDrag {
    fn default() -> Self {
        Self::from_magnitude(-constants::STANDARD_GRAVITY)
    }
}

impl GravityDrag {
    pub fn new(gravity: Vec3) -> Self {
        Self { gravity }
    }

    /// Gravity along Y with a signed magnitude, so `-9.8` pulls down.
    pub fn from_magnitude(g: f64) -> Self {
        Self::new(Vec3::new(0.0, g, 0.0))
    }
}

impl ForceModel for GravityDrag {
    fn net_force(&self, velocity: Vec3, props: &BodyProperties) -> Vec3 {
        self.gravity * props.mass - velocity * props.drag
    }
}

/// Add the reaction of every resting plane to `force`, in plane order.
///
/// Each reaction points along the plane normal with the magnitude of the
/// running force, so a later plane sees the force already corrected by the
/// earlier ones.
pub fn apply_resting_reaction(mut force: Vec3, planes: &[Plane]) -> Vec3 {
    for plane in planes.iter().filter(|p| p.resting) {
        force += plane.normal * force.magnitude();
    }
    force
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn plane(normal: Vec3, resting: bool) -> Plane {
        Plane {
            normal,
            point: Vec3::ZERO,
            resting,
        }
    }

    #[test]
    fn test_gravity_scales_with_mass() {
        let forces = GravityDrag::default();
        let props = BodyProperties {
            mass: 40.0,
            drag: 0.0,
            ..BodyProperties::default()
        };
        let f = forces.net_force(Vec3::new(5.0, 5.0, 5.0), &props);
        assert_relative_eq!(f.y, -392.0, epsilon = 1e-9);
        assert_eq!(f.x, 0.0);
    }

    #[test]
    fn test_drag_opposes_velocity() {
        let forces = GravityDrag::new(Vec3::ZERO);
        let props = BodyProperties {
            drag: 0.5,
            ..BodyProperties::default()
        };
        let f = forces.net_force(Vec3::new(4.0, 0.0, -2.0), &props);
        assert_eq!(f, Vec3::new(-2.0, 0.0, 1.0));
    }

    #[test]
    fn test_no_resting_planes_leaves_force() {
        let f = Vec3::new(1.0, -2.0, 3.0);
        let planes = [plane(Vec3::new(0.0, 1.0, 0.0), false)];
        assert_eq!(apply_resting_reaction(f, &planes), f);
    }

    #[test]
    fn test_reaction_uses_running_magnitude() {
        let planes = [
            plane(Vec3::new(0.0, 1.0, 0.0), true),
            plane(Vec3::new(1.0, 0.0, 0.0), true),
        ];
        // (3, -4, 0) has magnitude 5: the floor adds (0, 5, 0) giving (3, 1, 0),
        // then the side wall adds sqrt(10) along X.
        let f = apply_resting_reaction(Vec3::new(3.0, -4.0, 0.0), &planes);
        assert_relative_eq!(f.x, 3.0 + 10.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(f.y, 1.0, epsilon = 1e-12);
    }
}
