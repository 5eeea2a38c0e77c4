//! Simulation parameters and named YAML presets.
//!
//! Parameters mirror the control panel of the bouncing-ball scene and are
//! read once per restart. Presets live on disk so the panel combinations can
//! be shared without recompiling.
//!
//! ## Directory Structure
//!
//! ```text
//! presets/
//! ├── parameters/
//! │   ├── default.yaml
//! │   ├── heavy_inelastic.yaml
//! │   └── ...
//! └── config/
//!     ├── default.yaml
//!     └── frame_locked.yaml
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult, PhysicsError, Result};
use crate::forces::GravityDrag;
use crate::types::{constants, BodyProperties, Vec3};

/// Range the control panel offers for each initial velocity component.
pub const PANEL_VELOCITY_RANGE: f64 = 10.0;

// =============================================================================
// Parameters
// =============================================================================

/// User-tunable start parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Signed gravity along Y (negative pulls down).
    pub gravity: f64,
    pub initial_velocity: Vec3,
    pub mass: f64,
    pub friction: f64,
    pub restitution: f64,
    pub drag: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            gravity: GravityPreset::Regular.value(),
            initial_velocity: Vec3::new(-3.0, 0.0, 0.0),
            mass: MassPreset::Medium.value(),
            friction: 0.0,
            restitution: 1.0,
            drag: 0.23,
        }
    }
}

impl SimulationParameters {
    pub fn with_gravity(self, preset: GravityPreset) -> Self {
        Self {
            gravity: preset.value(),
            ..self
        }
    }

    pub fn with_mass(self, preset: MassPreset) -> Self {
        Self {
            mass: preset.value(),
            ..self
        }
    }

    /// Reject values the integrator cannot work with.
    ///
    /// Initial velocities outside the panel range are allowed but logged.
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("gravity", self.gravity),
            ("mass", self.mass),
            ("friction", self.friction),
            ("restitution", self.restitution),
            ("drag", self.drag),
        ];
        if let Some((name, value)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(PhysicsError::InvalidParameter(format!(
                "{} must be finite, got {}",
                name, value
            )));
        }
        if !self.initial_velocity.is_finite() {
            return Err(PhysicsError::InvalidParameter(format!(
                "initial velocity must be finite, got {:?}",
                self.initial_velocity
            )));
        }
        if self.mass <= 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "mass must be positive, got {}",
                self.mass
            )));
        }
        for (name, value) in [("friction", self.friction), ("restitution", self.restitution)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PhysicsError::InvalidParameter(format!(
                    "{} must be in [0, 1], got {}",
                    name, value
                )));
            }
        }
        if self.drag < 0.0 {
            return Err(PhysicsError::InvalidParameter(format!(
                "drag must be non-negative, got {}",
                self.drag
            )));
        }

        let v = self.initial_velocity;
        if [v.x, v.y, v.z]
            .iter()
            .any(|c| c.abs() > PANEL_VELOCITY_RANGE)
        {
            warn!(
                "initial velocity {:?} is outside the panel range of ±{}",
                v, PANEL_VELOCITY_RANGE
            );
        }
        Ok(())
    }

    pub fn body_properties(&self) -> BodyProperties {
        BodyProperties {
            mass: self.mass,
            radius: constants::BODY_RADIUS,
            drag: self.drag,
            restitution: self.restitution,
            friction: self.friction,
        }
    }

    pub fn force_model(&self) -> GravityDrag {
        GravityDrag::from_magnitude(self.gravity)
    }
}

/// Gravity choices offered by the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GravityPreset {
    Half,
    Regular,
    Double,
}

impl GravityPreset {
    pub fn value(self) -> f64 {
        match self {
            GravityPreset::Half => -constants::STANDARD_GRAVITY / 2.0,
            GravityPreset::Regular => -constants::STANDARD_GRAVITY,
            GravityPreset::Double => -constants::STANDARD_GRAVITY * 2.0,
        }
    }
}

/// Mass choices offered by the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MassPreset {
    Light,
    Medium,
    Heavy,
}

impl MassPreset {
    pub fn value(self) -> f64 {
        match self {
            MassPreset::Light => 40.0,
            MassPreset::Medium => 90.0,
            MassPreset::Heavy => 200.0,
        }
    }
}

// =============================================================================
// Stepping configuration
// =============================================================================

/// How a frame's elapsed time is cut into integration steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Longest single integration step; `None` integrates each frame in one step.
    pub max_step: Option<f64>,
    /// Upper bound on steps per frame. Longer frames are clamped.
    pub max_substeps: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_step: Some(1.0 / 240.0),
            max_substeps: 32,
        }
    }
}

/// Sub-steps chosen for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPlan {
    pub substeps: u32,
    pub step: f64,
    /// Set when the frame was longer than `max_substeps * max_step`.
    pub clamped: bool,
}

impl StepPlan {
    pub fn simulated_time(&self) -> f64 {
        self.step * f64::from(self.substeps)
    }
}

impl SimulationConfig {
    /// One step per frame, whatever its length.
    pub fn frame_locked() -> Self {
        Self {
            max_step: None,
            max_substeps: 1,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(h) = self.max_step {
            if !h.is_finite() || h <= 0.0 {
                return Err(PhysicsError::InvalidParameter(format!(
                    "max_step must be positive, got {}",
                    h
                )));
            }
        }
        if self.max_substeps == 0 {
            return Err(PhysicsError::InvalidParameter(
                "max_substeps must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Split a validated frame time `dt` into equal sub-steps.
    pub fn plan(&self, dt: f64) -> StepPlan {
        let Some(h) = self.max_step else {
            return StepPlan {
                substeps: 1,
                step: dt,
                clamped: false,
            };
        };

        // Tolerate rounding so a frame of exactly `h` stays a single step.
        let needed = ((dt / h) - 1e-9).ceil().max(1.0);
        if needed > f64::from(self.max_substeps) {
            StepPlan {
                substeps: self.max_substeps,
                step: h,
                clamped: true,
            }
        } else {
            let substeps = needed as u32;
            StepPlan {
                substeps,
                step: dt / f64::from(substeps),
                clamped: false,
            }
        }
    }
}

// =============================================================================
// Loader
// =============================================================================

/// Preset loader with configurable base directory.
pub struct ParameterLoader {
    base_path: PathBuf,
}

impl ParameterLoader {
    /// The base path should contain `parameters/` and `config/` subdirectories.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Load parameters by name (without .yaml extension).
    ///
    /// # Example
    /// ```ignore
    /// let loader = ParameterLoader::new("presets");
    /// let params = loader.load_parameters("heavy_inelastic")?;
    /// ```
    pub fn load_parameters(&self, name: &str) -> ConfigResult<SimulationParameters> {
        let params: SimulationParameters = self.load("parameters", name)?;
        params.validate()?;
        Ok(params)
    }

    pub fn load_config(&self, name: &str) -> ConfigResult<SimulationConfig> {
        let config: SimulationConfig = self.load("config", name)?;
        config.validate()?;
        Ok(config)
    }

    pub fn list_parameters(&self) -> ConfigResult<Vec<String>> {
        self.list("parameters")
    }

    pub fn list_configs(&self) -> ConfigResult<Vec<String>> {
        self.list("config")
    }

    /// Parse and validate parameters from a YAML document.
    pub fn parameters_from_str(yaml: &str) -> ConfigResult<SimulationParameters> {
        let params: SimulationParameters = serde_yaml::from_str(yaml)?;
        params.validate()?;
        Ok(params)
    }

    fn load<T: DeserializeOwned>(&self, subdir: &str, name: &str) -> ConfigResult<T> {
        let dir = self.base_path.join(subdir);
        let path = dir.join(format!("{}.yaml", name));
        if !path.exists() {
            return Err(ConfigError::NotFound {
                name: name.to_string(),
                dir,
            });
        }
        let contents = fs::read_to_string(&path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    fn list(&self, subdir: &str) -> ConfigResult<Vec<String>> {
        let path = self.base_path.join(subdir);
        if !path.exists() {
            return Ok(vec![]);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&path)? {
            let file_name = entry?.file_name();
            if let Some(name) = file_name.to_string_lossy().strip_suffix(".yaml") {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

// =============================================================================
// Tests
// =============================================================================
