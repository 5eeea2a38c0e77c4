//! Voxel placement for the soft-body scene.
//!
//! The scene drops soft cubes onto a unit grid where the cursor points. The
//! cube solver lives outside this crate; this module keeps the list of
//! placed cubes and the panel parameters every cube is driven with.
//!
//! ```text
//! cursor hit (x, y, z) ─► snap (⌊x⌋, 0.5, ⌊z⌋) ─► place (⌊x⌋, 3, ⌊z⌋)
//! ```

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{PhysicsError, Result};
use crate::types::Vec3;

/// Height of the placement cursor above the floor grid.
pub const CURSOR_HEIGHT: f64 = 0.5;
/// Height new cubes are dropped from.
pub const SPAWN_HEIGHT: f64 = 3.0;

/// Panel parameters shared by every soft cube.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftBodyParameters {
    /// Signed gravity along Y.
    pub gravity: f64,
    /// Spring stiffness (Ks).
    pub stiffness: f64,
    /// Spring damping (Kd).
    pub damping: f64,
    /// Wind force along X.
    pub wind: f64,
    /// Simulation speed multiplier.
    pub speed: f64,
}

impl Default for SoftBodyParameters {
    fn default() -> Self {
        Self {
            gravity: -9.8,
            stiffness: 1000.0,
            damping: 0.5,
            wind: -2.8,
            speed: 15.0,
        }
    }
}

impl SoftBodyParameters {
    /// Check every value against the panel's slider range.
    pub fn validate(&self) -> Result<()> {
        let ranges = [
            ("stiffness", self.stiffness, 0.0, 2000.0),
            ("damping", self.damping, 0.0, 10.0),
            ("wind", self.wind, -10.0, 10.0),
            ("speed", self.speed, 0.0, 20.0),
        ];
        if !self.gravity.is_finite() {
            return Err(PhysicsError::InvalidParameter(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        for (name, value, lo, hi) in ranges {
            if !(lo..=hi).contains(&value) {
                return Err(PhysicsError::InvalidParameter(format!(
                    "{} must be in [{}, {}], got {}",
                    name, lo, hi, value
                )));
            }
        }
        Ok(())
    }
}

/// Snap a cursor hit to the cell it falls in.
pub fn snap_to_grid(point: Vec3) -> Vec3 {
    Vec3::new(point.x.floor(), CURSOR_HEIGHT, point.z.floor())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Voxel {
    pub id: u64,
    /// Spawn position of the cube.
    pub position: Vec3,
    pub params: SoftBodyParameters,
}

/// Placed cubes and the parameters they share.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoxelRegistry {
    voxels: Vec<Voxel>,
    params: SoftBodyParameters,
    next_id: u64,
}

impl VoxelRegistry {
    pub fn new(params: SoftBodyParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            voxels: Vec::new(),
            params,
            next_id: 0,
        })
    }

    /// Drop a new cube above the grid cell under `cursor`.
    pub fn place(&mut self, cursor: Vec3) -> Result<&Voxel> {
        if !cursor.is_finite() {
            return Err(PhysicsError::InvalidParameter(format!(
                "cursor must be finite, got {:?}",
                cursor
            )));
        }
        let cell = snap_to_grid(cursor);
        let voxel = Voxel {
            id: self.next_id,
            position: Vec3::new(cell.x, SPAWN_HEIGHT, cell.z),
            params: self.params,
        };
        self.next_id += 1;
        debug!("voxel {} placed at {:?}", voxel.id, voxel.position);

        self.voxels.push(voxel);
        let index = self.voxels.len() - 1;
        Ok(&self.voxels[index])
    }

    /// Remove every cube. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.voxels.len();
        self.voxels.clear();
        info!("cleared {} voxels", removed);
        removed
    }

    /// Replace the shared parameters and push them to every placed cube.
    pub fn broadcast(&mut self, params: SoftBodyParameters) -> Result<()> {
        params.validate()?;
        self.params = params;
        for voxel in &mut self.voxels {
            voxel.params = params;
        }
        info!(
            "soft-body parameters sent to {} voxels: {:?}",
            self.voxels.len(),
            params
        );
        Ok(())
    }

    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    pub fn parameters(&self) -> &SoftBodyParameters {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
