//! Python bindings for the bounce-core sphere simulation.
//!
//! Provides a simple Python API:
//!
//! ```python
//! from bounce_physics import Simulation
//!
//! sim = Simulation(seed=7)
//! sim.set_parameters(restitution=0.6, friction=0.2)
//! sim.restart()
//!
//! for _ in range(600):
//!     pos = sim.tick(1.0 / 60.0)
//!     print(f"Sphere at ({pos.x}, {pos.y}, {pos.z})")
//! ```

use log::{debug, info};
use pyo3::exceptions::{PyFileNotFoundError, PyIOError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use rand::rngs::StdRng;
use rand::SeedableRng;

use bounce_core::fountain::{ParticleFountain as CoreFountain, DEFAULT_PARTICLE_COUNT};
use bounce_core::parameters::{GravityPreset, MassPreset};
use bounce_core::simulation::IMPULSE_RANGE;
use bounce_core::types::Wall;
use bounce_core::{
    ConfigError, ParameterLoader, PhysicsError, Simulation as CoreSimulation, SimulationConfig,
    SimulationParameters, SoftBodyParameters, Vec3 as CoreVec3, VoxelRegistry,
};

fn physics_err(e: PhysicsError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

fn config_err(e: ConfigError) -> PyErr {
    match e {
        ConfigError::NotFound { .. } => PyFileNotFoundError::new_err(e.to_string()),
        ConfigError::Io(_) => PyIOError::new_err(e.to_string()),
        _ => PyValueError::new_err(e.to_string()),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn wall_name(index: usize) -> &'static str {
    match Wall::ALL.get(index) {
        Some(Wall::Floor) => "floor",
        Some(Wall::Ceiling) => "ceiling",
        Some(Wall::Left) => "left",
        Some(Wall::Right) => "right",
        Some(Wall::Front) => "front",
        Some(Wall::Back) => "back",
        None => "unknown",
    }
}

/// 3D vector for positions, velocities, etc.
#[pyclass]
#[derive(Clone, Copy)]
pub struct Vec3 {
    #[pyo3(get, set)]
    pub x: f64,
    #[pyo3(get, set)]
    pub y: f64,
    #[pyo3(get, set)]
    pub z: f64,
}

#[pymethods]
impl Vec3 {
    #[new]
    fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    fn __repr__(&self) -> String {
        format!("Vec3({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }

    fn magnitude(&self) -> f64 {
        CoreVec3::from(*self).magnitude()
    }

    fn to_tuple(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }
}

impl From<CoreVec3> for Vec3 {
    fn from(v: CoreVec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Vec3> for CoreVec3 {
    fn from(v: Vec3) -> Self {
        CoreVec3::new(v.x, v.y, v.z)
    }
}

/// Sphere bouncing inside the box.
///
/// Parameter changes are staged and take effect on `restart()`.
#[pyclass]
pub struct Simulation {
    inner: CoreSimulation,
    rng: StdRng,
}

#[pymethods]
impl Simulation {
    /// Create a simulation with the control panel defaults.
    ///
    /// `seed` fixes the random impulses; without it they come from entropy.
    #[new]
    #[pyo3(signature = (seed=None, frame_locked=false))]
    fn new(seed: Option<u64>, frame_locked: bool) -> PyResult<Self> {
        let config = if frame_locked {
            SimulationConfig::frame_locked()
        } else {
            SimulationConfig::default()
        };
        let inner =
            CoreSimulation::new(SimulationParameters::default(), config).map_err(physics_err)?;
        Ok(Self {
            inner,
            rng: make_rng(seed),
        })
    }

    /// Build a simulation from YAML presets under `base_path`.
    #[staticmethod]
    #[pyo3(signature = (base_path, parameters="default", config="default", seed=None))]
    fn from_presets(
        base_path: &str,
        parameters: &str,
        config: &str,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let loader = ParameterLoader::new(base_path);
        let params = loader.load_parameters(parameters).map_err(config_err)?;
        let config_name = config;
        let config = loader.load_config(config_name).map_err(config_err)?;
        info!(
            "loaded presets '{}' / '{}' from {}",
            parameters, config_name, base_path
        );
        let inner = CoreSimulation::new(params, config).map_err(physics_err)?;
        Ok(Self {
            inner,
            rng: make_rng(seed),
        })
    }

    /// Simulated seconds since the last restart.
    #[getter]
    fn elapsed(&self) -> f64 {
        self.inner.elapsed()
    }

    /// Ticks since the last restart.
    #[getter]
    fn frames(&self) -> u64 {
        self.inner.frames()
    }

    fn position(&self) -> Vec3 {
        self.inner.position().into()
    }

    fn velocity(&self) -> Vec3 {
        self.inner.state().velocity.into()
    }

    fn acceleration(&self) -> Vec3 {
        self.inner.state().acceleration.into()
    }

    fn speed(&self) -> f64 {
        self.inner.state().velocity.magnitude()
    }

    fn kinetic_energy(&self) -> f64 {
        self.inner.kinetic_energy()
    }

    fn radius(&self) -> f64 {
        self.inner.body_properties().radius
    }

    /// Resting flag per wall, in floor, ceiling, left, right, front, back order.
    fn resting(&self) -> Vec<bool> {
        self.inner.planes().iter().map(|p| p.resting).collect()
    }

    /// Walls hit during the last tick as `(wall, fraction)` pairs.
    fn last_impacts(&self) -> Vec<(&'static str, f64)> {
        self.inner
            .last_impacts()
            .iter()
            .map(|i| (wall_name(i.plane_index), i.fraction))
            .collect()
    }

    /// Stage new parameters. Omitted values keep their staged value.
    #[pyo3(signature = (
        gravity=None,
        initial_velocity=None,
        mass=None,
        friction=None,
        restitution=None,
        drag=None,
    ))]
    fn set_parameters(
        &mut self,
        gravity: Option<f64>,
        initial_velocity: Option<(f64, f64, f64)>,
        mass: Option<f64>,
        friction: Option<f64>,
        restitution: Option<f64>,
        drag: Option<f64>,
    ) -> PyResult<()> {
        let staged = *self.inner.parameters();
        let params = SimulationParameters {
            gravity: gravity.unwrap_or(staged.gravity),
            initial_velocity: initial_velocity
                .map(|(x, y, z)| CoreVec3::new(x, y, z))
                .unwrap_or(staged.initial_velocity),
            mass: mass.unwrap_or(staged.mass),
            friction: friction.unwrap_or(staged.friction),
            restitution: restitution.unwrap_or(staged.restitution),
            drag: drag.unwrap_or(staged.drag),
        };
        self.inner.set_parameters(params).map_err(physics_err)
    }

    /// Stage a panel gravity: "half", "regular" or "double".
    fn set_gravity_preset(&mut self, name: &str) -> PyResult<()> {
        let preset = match name {
            "half" => GravityPreset::Half,
            "regular" => GravityPreset::Regular,
            "double" => GravityPreset::Double,
            other => {
                return Err(PyValueError::new_err(format!(
                    "unknown gravity preset '{}'",
                    other
                )))
            }
        };
        let params = self.inner.parameters().with_gravity(preset);
        self.inner.set_parameters(params).map_err(physics_err)
    }

    /// Stage a panel mass: "light", "medium" or "heavy".
    fn set_mass_preset(&mut self, name: &str) -> PyResult<()> {
        let preset = match name {
            "light" => MassPreset::Light,
            "medium" => MassPreset::Medium,
            "heavy" => MassPreset::Heavy,
            other => {
                return Err(PyValueError::new_err(format!(
                    "unknown mass preset '{}'",
                    other
                )))
            }
        };
        let params = self.inner.parameters().with_mass(preset);
        self.inner.set_parameters(params).map_err(physics_err)
    }

    /// Respawn the sphere with the staged parameters.
    fn restart(&mut self) {
        self.inner.restart();
    }

    /// Advance by one frame of `dt` seconds and return the new position.
    fn tick(&mut self, dt: f64) -> PyResult<Vec3> {
        let state = self.inner.tick(dt).map_err(physics_err)?;
        Ok(state.position.into())
    }

    /// Run several frames of equal length.
    fn tick_n(&mut self, dt: f64, frames: usize) -> PyResult<Vec3> {
        for _ in 0..frames {
            self.inner.tick(dt).map_err(physics_err)?;
        }
        Ok(self.inner.position().into())
    }

    /// Add a velocity change, applied from the next tick.
    fn impulse(&mut self, dvx: f64, dvy: f64, dvz: f64) -> PyResult<()> {
        self.inner
            .impulse(CoreVec3::new(dvx, dvy, dvz))
            .map_err(physics_err)
    }

    /// Kick the sphere randomly; returns the velocity change.
    fn random_impulse(&mut self) -> Vec3 {
        let delta_v = self.inner.random_impulse(&mut self.rng);
        debug!("random impulse {:?}", delta_v);
        delta_v.into()
    }

    /// True while the whole sphere is inside the box.
    fn is_inside(&self) -> bool {
        self.inner.is_inside()
    }

    /// Get current state as dict for easy inspection.
    fn state_dict(&self) -> PyResult<PyObject> {
        Python::with_gil(|py| {
            let state = self.inner.state();
            let dict = PyDict::new(py);
            dict.set_item("elapsed", self.inner.elapsed())?;
            dict.set_item("frames", self.inner.frames())?;
            dict.set_item("x", state.position.x)?;
            dict.set_item("y", state.position.y)?;
            dict.set_item("z", state.position.z)?;
            dict.set_item("vx", state.velocity.x)?;
            dict.set_item("vy", state.velocity.y)?;
            dict.set_item("vz", state.velocity.z)?;
            dict.set_item("speed", state.velocity.magnitude())?;
            dict.set_item("kinetic_energy", self.inner.kinetic_energy())?;
            dict.set_item("resting", self.resting())?;
            Ok(dict.into_any().unbind())
        })
    }
}

/// Falling particle field of the soft-body scene.
#[pyclass]
pub struct ParticleFountain {
    inner: CoreFountain,
    rng: StdRng,
}

#[pymethods]
impl ParticleFountain {
    #[new]
    #[pyo3(signature = (count=DEFAULT_PARTICLE_COUNT, seed=None))]
    fn new(count: usize, seed: Option<u64>) -> Self {
        let mut rng = make_rng(seed);
        let inner = CoreFountain::new(count, &mut rng);
        Self { inner, rng }
    }

    /// Advance every particle by one frame.
    fn update(&mut self) {
        self.inner.update(&mut self.rng);
    }

    /// Field rotation about Y, in radians.
    #[getter]
    fn rotation_y(&self) -> f64 {
        self.inner.rotation_y()
    }

    fn positions(&self) -> Vec<(f64, f64, f64)> {
        self.inner
            .particles()
            .iter()
            .map(|p| (p.position.x, p.position.y, p.position.z))
            .collect()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

/// Soft cubes placed on the scene grid, with their shared panel values.
#[pyclass]
#[derive(Default)]
pub struct VoxelScene {
    inner: VoxelRegistry,
}

#[pymethods]
impl VoxelScene {
    #[new]
    fn new() -> Self {
        Self::default()
    }

    /// Drop a cube above the grid cell under the cursor hit; returns its spawn position.
    fn place(&mut self, x: f64, y: f64, z: f64) -> PyResult<Vec3> {
        let voxel = self
            .inner
            .place(CoreVec3::new(x, y, z))
            .map_err(physics_err)?;
        Ok(voxel.position.into())
    }

    /// Remove every cube; returns how many were removed.
    fn clear(&mut self) -> usize {
        self.inner.clear()
    }

    /// Change panel values and push them to every cube. Omitted values are kept.
    #[pyo3(signature = (gravity=None, stiffness=None, damping=None, wind=None, speed=None))]
    fn set_parameters(
        &mut self,
        gravity: Option<f64>,
        stiffness: Option<f64>,
        damping: Option<f64>,
        wind: Option<f64>,
        speed: Option<f64>,
    ) -> PyResult<()> {
        let current = *self.inner.parameters();
        let params = SoftBodyParameters {
            gravity: gravity.unwrap_or(current.gravity),
            stiffness: stiffness.unwrap_or(current.stiffness),
            damping: damping.unwrap_or(current.damping),
            wind: wind.unwrap_or(current.wind),
            speed: speed.unwrap_or(current.speed),
        };
        self.inner.broadcast(params).map_err(physics_err)
    }

    fn positions(&self) -> Vec<(f64, f64, f64)> {
        self.inner
            .voxels()
            .iter()
            .map(|v| (v.position.x, v.position.y, v.position.z))
            .collect()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }
}

/// Python module definition.
#[pymodule]
fn bounce_physics(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Honour RUST_LOG; a host that already installed a logger keeps it.
    let _ = env_logger::try_init();

    m.add_class::<Vec3>()?;
    m.add_class::<Simulation>()?;
    m.add_class::<ParticleFountain>()?;
    m.add_class::<VoxelScene>()?;
    m.add("IMPULSE_RANGE", IMPULSE_RANGE)?;
    Ok(())
}
