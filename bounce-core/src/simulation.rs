//! Frame-driven simulation of one sphere in the box.
//!
//! The host calls [`Simulation::tick`] once per rendered frame with the
//! elapsed wall-clock time and reads back [`Simulation::position`].
//! [`Simulation::restart`] and [`Simulation::impulse`] are the only other
//! inputs.

use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::collision::{step_against_planes, Impact};
use crate::error::{PhysicsError, Result};
use crate::forces::GravityDrag;
use crate::parameters::{SimulationConfig, SimulationParameters};
use crate::types::{constants, BodyProperties, BodyState, BoxWalls, Plane, Vec3};

/// Largest component of a random impulse, in units/s.
pub const IMPULSE_RANGE: f64 = 10.0;

/// Serializable view of the simulation after a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub elapsed: f64,
    pub frames: u64,
    pub state: BodyState,
    pub resting: [bool; 6],
}

pub struct Simulation {
    /// Latest parameters; applied on the next restart.
    params: SimulationParameters,
    config: SimulationConfig,
    props: BodyProperties,
    forces: GravityDrag,
    walls: BoxWalls,
    state: BodyState,
    elapsed: f64,
    frames: u64,
    last_impacts: Vec<Impact>,
}

impl Simulation {
    pub fn new(params: SimulationParameters, config: SimulationConfig) -> Result<Self> {
        params.validate()?;
        config.validate()?;

        let mut sim = Self {
            params,
            config,
            props: params.body_properties(),
            forces: params.force_model(),
            walls: BoxWalls::standard(),
            state: BodyState::default(),
            elapsed: 0.0,
            frames: 0,
            last_impacts: Vec::new(),
        };
        sim.restart();
        Ok(sim)
    }

    /// Respawn the sphere with the current parameters.
    ///
    /// The first step integrates with plain gravity as its acceleration.
    pub fn restart(&mut self) {
        self.props = self.params.body_properties();
        self.forces = self.params.force_model();
        self.state = BodyState::new(
            constants::SPAWN_POSITION,
            self.params.initial_velocity,
            self.forces.gravity,
        );
        self.walls.reset_contacts();
        self.elapsed = 0.0;
        self.frames = 0;
        self.last_impacts.clear();
        info!(
            "restart: mass={} gravity={} restitution={} friction={} drag={} v0={:?}",
            self.props.mass,
            self.params.gravity,
            self.props.restitution,
            self.props.friction,
            self.props.drag,
            self.state.velocity
        );
    }

    /// Replace the parameters. The running body is unaffected until [`restart`](Self::restart).
    pub fn set_parameters(&mut self, params: SimulationParameters) -> Result<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    pub fn set_config(&mut self, config: SimulationConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Advance by one frame of `dt` seconds.
    pub fn tick(&mut self, dt: f64) -> Result<&BodyState> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(PhysicsError::InvalidTimeStep(dt));
        }

        let plan = self.config.plan(dt);
        if plan.clamped {
            warn!(
                "frame of {:.3}s exceeds {} sub-steps, simulating {:.3}s",
                dt,
                plan.substeps,
                plan.simulated_time()
            );
        }

        self.last_impacts.clear();
        for _ in 0..plan.substeps {
            let outcome = step_against_planes(
                &self.state,
                &self.props,
                &self.forces,
                self.walls.planes_mut(),
                plan.step,
            );
            self.state = outcome.state;
            self.last_impacts.extend(outcome.impacts);
        }

        if !self.is_inside() {
            debug!(
                "frame {}: sphere overlaps a wall at {:?}",
                self.frames, self.state.position
            );
        }
        self.elapsed += plan.simulated_time();
        self.frames += 1;
        Ok(&self.state)
    }

    /// Add `delta_v` to the current velocity. Takes effect on the next tick.
    pub fn impulse(&mut self, delta_v: Vec3) -> Result<()> {
        if !delta_v.is_finite() {
            return Err(PhysicsError::InvalidParameter(format!(
                "impulse must be finite, got {:?}",
                delta_v
            )));
        }
        self.state.velocity += delta_v;
        Ok(())
    }

    /// Kick the sphere in a random direction, each component in ±[`IMPULSE_RANGE`].
    pub fn random_impulse<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec3 {
        let delta_v = Vec3::new(
            rng.gen_range(-IMPULSE_RANGE..=IMPULSE_RANGE),
            rng.gen_range(-IMPULSE_RANGE..=IMPULSE_RANGE),
            rng.gen_range(-IMPULSE_RANGE..=IMPULSE_RANGE),
        );
        self.state.velocity += delta_v;
        delta_v
    }

    pub fn state(&self) -> &BodyState {
        &self.state
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn body_properties(&self) -> &BodyProperties {
        &self.props
    }

    pub fn planes(&self) -> &[Plane; 6] {
        self.walls.planes()
    }

    /// Simulated seconds since the last restart.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Impacts resolved during the last tick, across all of its sub-steps.
    pub fn last_impacts(&self) -> &[Impact] {
        &self.last_impacts
    }

    /// True while the whole sphere is inside the box.
    pub fn is_inside(&self) -> bool {
        self.walls.contains(self.state.position, self.props.radius)
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.state.kinetic_energy(&self.props)
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        let planes = self.walls.planes();
        SimulationSnapshot {
            elapsed: self.elapsed,
            frames: self.frames,
            state: self.state,
            resting: std::array::from_fn(|i| planes[i].resting),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::MassPreset;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const FRAME: f64 = 1.0 / 60.0;

    fn drop_test_params() -> SimulationParameters {
        SimulationParameters {
            gravity: -9.8,
            initial_velocity: Vec3::ZERO,
            mass: 90.0,
            friction: 0.0,
            restitution: 1.0,
            drag: 0.0,
        }
    }

    #[test]
    fn test_new_spawns_at_start() {
        let sim = Simulation::new(SimulationParameters::default(), SimulationConfig::default())
            .unwrap();

        assert_eq!(sim.position(), Vec3::new(0.0, 6.0, 0.0));
        assert_eq!(sim.state().velocity, Vec3::new(-3.0, 0.0, 0.0));
        assert_eq!(sim.state().acceleration, Vec3::new(0.0, -9.8, 0.0));
        assert_eq!(sim.elapsed(), 0.0);
        assert!(sim.planes().iter().all(|p| !p.resting));
        assert!(sim.is_inside());
    }

    #[test]
    fn test_new_rejects_invalid_parameters() {
        let params = SimulationParameters {
            mass: 0.0,
            ..SimulationParameters::default()
        };
        assert!(Simulation::new(params, SimulationConfig::default()).is_err());
    }

    #[test]
    fn test_restart_is_idempotent() {
        let mut sim =
            Simulation::new(drop_test_params(), SimulationConfig::default()).unwrap();
        let fresh = sim.snapshot();

        for _ in 0..90 {
            sim.tick(FRAME).unwrap();
        }
        sim.impulse(Vec3::new(3.0, 4.0, 0.0)).unwrap();
        sim.tick(FRAME).unwrap();

        sim.restart();
        let first = sim.snapshot();
        sim.restart();
        let second = sim.snapshot();

        assert_eq!(first, fresh);
        assert_eq!(second, fresh);
        assert!(sim.last_impacts().is_empty());
    }

    #[test]
    fn test_free_fall_frames() {
        let mut sim =
            Simulation::new(drop_test_params(), SimulationConfig::default()).unwrap();
        let mut last_y = sim.position().y;

        for _ in 0..6 {
            let state = *sim.tick(FRAME).unwrap();
            assert!(state.position.y < last_y, "y should keep decreasing");
            assert!(state.velocity.y < 0.0);
            assert!(sim.planes().iter().all(|p| !p.resting));
            last_y = state.position.y;
        }
        assert_relative_eq!(sim.elapsed(), 6.0 * FRAME, epsilon = 1e-12);
        assert_eq!(sim.frames(), 6);
    }

    #[test]
    fn test_free_fall_frame_locked() {
        let mut sim =
            Simulation::new(drop_test_params(), SimulationConfig::frame_locked()).unwrap();

        // Position integrates the previous velocity, so the first frame only
        // picks up speed.
        let first = *sim.tick(FRAME).unwrap();
        assert_eq!(first.position.y, 6.0);
        assert_relative_eq!(first.velocity.y, -9.8 * FRAME, epsilon = 1e-12);

        let mut last_y = first.position.y;
        for _ in 0..5 {
            let y = sim.tick(FRAME).unwrap().position.y;
            assert!(y < last_y);
            last_y = y;
        }
    }

    #[test]
    fn test_parameters_apply_on_restart_only() {
        let mut sim =
            Simulation::new(drop_test_params(), SimulationConfig::default()).unwrap();
        let heavy = drop_test_params().with_mass(MassPreset::Heavy);

        sim.set_parameters(heavy).unwrap();
        assert_eq!(sim.body_properties().mass, 90.0);

        sim.restart();
        assert_eq!(sim.body_properties().mass, 200.0);
    }

    #[test]
    fn test_tick_rejects_bad_dt() {
        let mut sim = Simulation::new(drop_test_params(), SimulationConfig::default())
            .unwrap();
        assert!(matches!(
            sim.tick(-0.1),
            Err(PhysicsError::InvalidTimeStep(dt)) if dt == -0.1
        ));
        assert!(sim.tick(f64::NAN).is_err());
        assert!(sim.tick(f64::INFINITY).is_err());
        assert_eq!(sim.frames(), 0);
    }

    #[test]
    fn test_zero_dt_keeps_position() {
        let mut sim = Simulation::new(SimulationParameters::default(), SimulationConfig::default())
            .unwrap();
        let before = *sim.state();
        let after = *sim.tick(0.0).unwrap();

        assert_eq!(after.position, before.position);
        assert_eq!(after.velocity, before.velocity);
        assert_eq!(sim.elapsed(), 0.0);
    }

    #[test]
    fn test_long_frame_is_clamped() {
        let mut sim =
            Simulation::new(drop_test_params(), SimulationConfig::default()).unwrap();
        sim.tick(5.0).unwrap();

        assert_relative_eq!(sim.elapsed(), 32.0 / 240.0, epsilon = 1e-12);
        assert!(sim.position().y > constants::BODY_RADIUS);
    }

    #[test]
    fn test_impulse_adds_velocity() {
        let mut sim =
            Simulation::new(drop_test_params(), SimulationConfig::default()).unwrap();
        sim.impulse(Vec3::new(1.0, 2.0, -3.0)).unwrap();
        assert_eq!(sim.state().velocity, Vec3::new(1.0, 2.0, -3.0));

        assert!(sim.impulse(Vec3::new(f64::NAN, 0.0, 0.0)).is_err());
        assert_eq!(sim.state().velocity, Vec3::new(1.0, 2.0, -3.0));
    }

    #[test]
    fn test_random_impulse_in_range() {
        let mut sim =
            Simulation::new(drop_test_params(), SimulationConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let mut total = Vec3::ZERO;
        for _ in 0..50 {
            let kick = sim.random_impulse(&mut rng);
            for c in [kick.x, kick.y, kick.z] {
                assert!(c.abs() <= IMPULSE_RANGE);
            }
            total += kick;
        }
        let v = sim.state().velocity;
        assert_relative_eq!(v.x, total.x, epsilon = 1e-9);
        assert_relative_eq!(v.y, total.y, epsilon = 1e-9);
        assert_relative_eq!(v.z, total.z, epsilon = 1e-9);
    }

    #[test]
    fn test_first_floor_impact_is_reported() {
        let mut sim =
            Simulation::new(drop_test_params(), SimulationConfig::default()).unwrap();

        // Falling 4.5 units takes just under a second.
        let mut floor_hits = 0;
        for _ in 0..75 {
            sim.tick(FRAME).unwrap();
            floor_hits += sim
                .last_impacts()
                .iter()
                .filter(|i| i.plane_index == 0)
                .count();
        }
        assert_eq!(floor_hits, 1);
        assert!(sim.state().velocity.y > 0.0, "should be on the way back up");
        assert!(sim.is_inside());
    }

    #[test]
    fn test_is_inside_tracks_position() {
        let mut sim =
            Simulation::new(drop_test_params(), SimulationConfig::default()).unwrap();
        assert!(sim.is_inside());

        // Push the sphere halfway through the x = +6 wall.
        sim.state.position = Vec3::new(5.5, 6.0, 0.0);
        assert!(!sim.is_inside());
    }

    #[test]
    fn test_snapshot_serializes() {
        let sim = Simulation::new(SimulationParameters::default(), SimulationConfig::default())
            .unwrap();
        let yaml = serde_yaml::to_string(&sim.snapshot()).unwrap();
        let back: SimulationSnapshot = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, sim.snapshot());
    }
}
