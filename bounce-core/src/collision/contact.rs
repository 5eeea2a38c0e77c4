//! Resting contact classification.
//!
//! A plane is resting while the sphere sits within
//! [`REST_DISTANCE_TOLERANCE`](constants::REST_DISTANCE_TOLERANCE) of it and
//! moves along its normal slower than
//! [`REST_SPEED_TOLERANCE`](constants::REST_SPEED_TOLERANCE). While resting,
//! the normal components of force and velocity are removed.
//!
//! A plane can only hold a body that the static load (gravity) does not pull
//! away from it, so the ceiling never holds the sphere.

use crate::integrator::Proposal;
use crate::types::{constants, Plane, Vec3};

pub struct RestingContactTracker;

impl RestingContactTracker {
    pub fn is_resting(plane: &Plane, position: Vec3, velocity: Vec3, radius: f64) -> bool {
        plane.signed_gap(position, radius) < constants::REST_DISTANCE_TOLERANCE
            && velocity.dot(&plane.normal).abs() < constants::REST_SPEED_TOLERANCE
    }

    /// True unless `load` pulls the body off the plane.
    ///
    /// `load` is the velocity-independent part of the net force.
    pub fn can_hold(plane: &Plane, load: Vec3) -> bool {
        load.dot(&plane.normal) <= constants::EPSILON
    }

    /// Strip the plane-normal components of force and velocity if the plane
    /// is resting, re-deriving acceleration from the stripped force.
    pub fn settle(plane: &Plane, proposal: Proposal, mass: f64) -> Proposal {
        if !plane.resting {
            return proposal;
        }
        let force = proposal.force - proposal.force.normal_component(&plane.normal);
        Proposal {
            force,
            acceleration: force / mass,
            velocity: proposal.velocity - proposal.velocity.normal_component(&plane.normal),
            ..proposal
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
