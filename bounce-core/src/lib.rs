//! # Bounce Core
//!
//! A sphere bouncing inside a 12-unit box, stepped once per rendered frame.
//!
//! ## Architecture
//!
//! - `types`: Core data structures (Vec3, planes, body state, box walls)
//! - `integrator`: Explicit Euler proposal step and the `ForceModel` trait
//! - `forces`: Gravity, linear drag and the resting-contact reaction
//! - `collision`: Plane penetration, sub-step impact response, resting contact
//! - `parameters`: Start parameters, stepping config and YAML presets
//! - `simulation`: Frame-driven orchestrator (restart, tick, impulse)
//! - `fountain`: Particle fountain of the soft-body scene
//! - `voxels`: Grid placement and shared parameters of the soft cubes
//!
//! ```
//! use bounce_core::{Simulation, SimulationConfig, SimulationParameters};
//!
//! let mut sim = Simulation::new(SimulationParameters::default(), SimulationConfig::default())?;
//! for _ in 0..60 {
//!     sim.tick(1.0 / 60.0)?;
//! }
//! assert!(sim.position().y < 6.0);
//! # Ok::<(), bounce_core::PhysicsError>(())
//! ```

pub mod collision;
pub mod error;
pub mod forces;
pub mod fountain;
pub mod integrator;
pub mod parameters;
pub mod simulation;
pub mod types;
pub mod voxels;

pub use error::{ConfigError, PhysicsError};
pub use parameters::{ParameterLoader, SimulationConfig, SimulationParameters};
pub use simulation::{Simulation, SimulationSnapshot};
pub use types::{BodyProperties, BodyState, BoxWalls, Plane, Vec3};
pub use voxels::{SoftBodyParameters, VoxelRegistry};
