//! Collision response against a single plane.
//!
//! The step is split at the time of impact:
//!
//! ```text
//!   start            contact           end
//!     ●───── f*dt ─────●───── (1-f)*dt ────●
//!                      │ reflect v
//! ═════════════════════╧═════════════ plane
//! ```
//!
//! Both halves are integrated with the acceleration from the start of the
//! step. The force is then re-evaluated at the reflected velocity.

use serde::{Deserialize, Serialize};

use super::detection;
use crate::integrator::{ForceModel, Proposal};
use crate::types::{BodyProperties, BodyState, Plane, Vec3};

/// Record of one impact resolved during a step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    pub plane_index: usize,
    /// Fraction of the step elapsed before contact.
    pub fraction: f64,
    /// Velocity at the contact instant, before reflection.
    pub incoming: Vec3,
    /// Velocity right after reflection.
    pub outgoing: Vec3,
}

/// Reflect `velocity` off a plane with unit `normal`.
///
/// The normal component is reversed and scaled by `restitution`; the
/// tangential component loses the `friction` fraction.
pub fn reflect(velocity: Vec3, normal: &Vec3, restitution: f64, friction: f64) -> Vec3 {
    let vel_normal = velocity.normal_component(normal);
    let vel_tangent = velocity - vel_normal;
    vel_normal * (-restitution) + vel_tangent * (1.0 - friction)
}

pub struct CollisionResolver;

impl CollisionResolver {
    /// Test `proposal` against one plane and correct it on penetration.
    ///
    /// `start` is the state at the beginning of the step. Planes already
    /// flagged resting are skipped. Returns `None` when nothing changed.
    pub fn resolve<F: ForceModel>(
        start: &BodyState,
        proposal: &Proposal,
        plane: &Plane,
        plane_index: usize,
        props: &BodyProperties,
        forces: &F,
        dt: f64,
    ) -> Option<(Proposal, Impact)> {
        if plane.resting {
            return None;
        }
        let fraction =
            detection::detect(plane, start.position, proposal.position, props.radius)?;

        // Sub-step to the contact instant.
        let t_hit = fraction * dt;
        let incoming = start.velocity + start.acceleration * t_hit;
        let contact = start.position + start.velocity * t_hit;

        let outgoing = reflect(incoming, &plane.normal, props.restitution, props.friction);

        // Remainder of the step from the contact instant.
        let remaining = (1.0 - fraction) * dt;
        let force = forces.net_force(outgoing, props);
        let corrected = Proposal {
            position: contact + outgoing * remaining,
            velocity: outgoing + start.acceleration * remaining,
            force,
            acceleration: force / props.mass,
        };

        Some((
            corrected,
            Impact {
                plane_index,
                fraction,
                incoming,
                outgoing,
            },
        ))
    }
}

// =============================================================================
// Tests
// =============================================================================
