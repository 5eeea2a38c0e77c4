//! Collision detection, response and resting contact against fixed planes.
//!
//! One step is a single ordered pass over the planes:
//!
//! ```text
//! propose (Euler) ─► plane 0: resolve ─► settle ─► plane 1: resolve ─► settle ─► ...
//! ```
//!
//! Each plane sees the proposal as corrected by the planes before it, and
//! its resting flag is updated right after its own test. Simultaneous hits
//! on two planes are therefore handled one after the other, not jointly.
//! A final sweep drops resting flags the finished step no longer supports
//! and re-applies the strip of those that remain, since a later impact
//! re-evaluates the force from scratch.

pub mod contact;
pub mod detection;
pub mod resolution;

pub use contact::RestingContactTracker;
pub use detection::{detect, fraction_of_step, penetrates};
pub use resolution::{reflect, CollisionResolver, Impact};

use log::debug;

use crate::integrator::{ExplicitEuler, ForceModel};
use crate::types::{BodyProperties, BodyState, Plane, Vec3};

/// Result of advancing the body by one step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub state: BodyState,
    /// Impacts in the order they were resolved.
    pub impacts: Vec<Impact>,
}

/// Advance `state` by `dt` against `planes`, updating their resting flags.
pub fn step_against_planes<F: ForceModel>(
    state: &BodyState,
    props: &BodyProperties,
    forces: &F,
    planes: &mut [Plane],
    dt: f64,
) -> StepOutcome {
    let mut proposal = ExplicitEuler::propose(state, props, forces, planes, dt);
    let mut impacts = Vec::new();
    let load = forces.net_force(Vec3::ZERO, props);

    for (index, plane) in planes.iter_mut().enumerate() {
        if let Some((corrected, impact)) =
            CollisionResolver::resolve(state, &proposal, plane, index, props, forces, dt)
        {
            debug!(
                "impact on plane {} at f={:.3}: {:?} -> {:?}",
                index, impact.fraction, impact.incoming, impact.outgoing
            );
            proposal = corrected;
            impacts.push(impact);
        }

        let resting = RestingContactTracker::can_hold(plane, load)
            && RestingContactTracker::is_resting(
                plane,
                proposal.position,
                proposal.velocity,
                props.radius,
            );
        if resting != plane.resting {
            debug!("plane {} resting: {}", index, resting);
        }
        plane.resting = resting;
        proposal = RestingContactTracker::settle(plane, proposal, props.mass);
    }

    // A later plane's correction can carry the body off an earlier resting plane.
    for (index, plane) in planes.iter_mut().enumerate().filter(|(_, p)| p.resting) {
        if RestingContactTracker::is_resting(
            plane,
            proposal.position,
            proposal.velocity,
            props.radius,
        ) {
            proposal = RestingContactTracker::settle(plane, proposal, props.mass);
        } else {
            debug!("plane {} resting: false (moved off later in the pass)", index);
            plane.resting = false;
        }
    }

    StepOutcome {
        state: proposal.into_state(),
        impacts,
    }
}

// =============================================================================
// Tests
// =============================================================================
