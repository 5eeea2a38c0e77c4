//! Plane penetration tests and time-of-impact within a step.

use crate::types::{constants, Plane, Vec3};

/// True if a sphere of `radius` centered at `position` touches or crosses
/// the plane.
pub fn penetrates(plane: &Plane, position: Vec3, radius: f64) -> bool {
    plane.signed_gap(position, radius) <= 0.0
}

/// Fraction of the step, in `[0, 1]`, elapsed before the sphere moving from
/// `start` to `proposed` first touches the plane.
///
/// ```text
/// f = gap(start) / (n · (start - proposed))
/// ```
///
/// A sphere that is not approaching the plane along its normal (parallel or
/// receding motion) has nothing left to travel, so the contact is taken to be
/// at the start of the step. The same holds when it already penetrated at
/// the start.
pub fn fraction_of_step(plane: &Plane, start: Vec3, proposed: Vec3, radius: f64) -> f64 {
    let approach = plane.normal.dot(&(start - proposed));
    if approach <= constants::EPSILON {
        return 0.0;
    }
    (plane.signed_gap(start, radius) / approach).clamp(0.0, 1.0)
}

/// Fraction of the step at which the move `start -> proposed` hits the
/// plane.
///
/// `None` if the proposed position stays clear of the plane, or if the move
/// does not approach it (a penetrating body already heading out is left to
/// separate on its own).
pub fn detect(plane: &Plane, start: Vec3, proposed: Vec3, radius: f64) -> Option<f64> {
    if !penetrates(plane, proposed, radius) {
        return None;
    }
    if plane.normal.dot(&(start - proposed)) <= constants::EPSILON {
        return None;
    }
    Some(fraction_of_step(plane, start, proposed, radius))
}

// =============================================================================
// Tests
// =============================================================================
