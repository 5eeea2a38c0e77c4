//! Explicit Euler integration of the sphere.
//!
//! ## Algorithm
//!
//! Given position x, velocity v, acceleration a and the force model F(v):
//!
//! ```text
//! 1. F  = F(v), plus a contact reaction for every resting plane
//! 2. a' = F / m
//! 3. v' = v + a*dt      // previous acceleration, not a'
//! 4. x' = x + v*dt      // previous velocity
//! ```
//!
//! The result is only a proposal: collision handling may still rewrite it
//! before it becomes the next state.

use crate::forces::apply_resting_reaction;
use crate::types::{BodyProperties, BodyState, Plane, Vec3};

/// Naive next state produced by one integration step.
///
/// Carries the net force alongside the acceleration because resting contact
/// strips components from the force and re-derives acceleration from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proposal {
    pub position: Vec3,
    pub velocity: Vec3,
    pub force: Vec3,
    pub acceleration: Vec3,
}

impl Proposal {
    pub fn into_state(self) -> BodyState {
        BodyState {
            position: self.position,
            velocity: self.velocity,
            acceleration: self.acceleration,
        }
    }
}

/// Trait for computing the net force on the sphere.
pub trait ForceModel {
    /// Net force at the given velocity. Position does not enter the model.
    fn net_force(&self, velocity: Vec3, props: &BodyProperties) -> Vec3;
}

/// Explicit (forward) Euler integrator.
pub struct ExplicitEuler;

impl ExplicitEuler {
    /// Propose the state `dt` seconds ahead. Does not touch `state` or `planes`.
    ///
    /// The caller guarantees `props.mass > 0` and a finite `dt >= 0`.
    pub fn propose<F: ForceModel>(
        state: &BodyState,
        props: &BodyProperties,
        forces: &F,
        planes: &[Plane],
        dt: f64,
    ) -> Proposal {
        let force = apply_resting_reaction(forces.net_force(state.velocity, props), planes);

        Proposal {
            position: state.position + state.velocity * dt,
            velocity: state.velocity + state.acceleration * dt,
            force,
            acceleration: force / props.mass,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
