//! Decorative particle fountain from the soft-body scene.
//!
//! Particles start scattered through a cube and fall with a random per-frame
//! pull. Anything that drops below the floor of the field is sent back to
//! the top at rest. Motion is in per-frame units; there is no `dt`.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::Vec3;

pub const DEFAULT_PARTICLE_COUNT: usize = 1800;

/// Particles spawn uniformly in `[-FIELD_HALF_EXTENT, FIELD_HALF_EXTENT]³`.
pub const FIELD_HALF_EXTENT: f64 = 250.0;
pub const RESPAWN_BELOW: f64 = -200.0;
pub const RESPAWN_HEIGHT: f64 = 200.0;
/// Largest downward speed gained in one frame.
pub const MAX_PULL: f64 = 0.01;
/// Rotation of the whole field about Y per frame, in radians.
pub const SPIN_PER_FRAME: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleFountain {
    particles: Vec<Particle>,
    rotation_y: f64,
}

impl ParticleFountain {
    pub fn new<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let mut coord = || rng.gen_range(-FIELD_HALF_EXTENT..FIELD_HALF_EXTENT);
        let particles = (0..count)
            .map(|_| Particle {
                position: Vec3::new(coord(), coord(), coord()),
                velocity: Vec3::ZERO,
            })
            .collect();
        Self {
            particles,
            rotation_y: 0.0,
        }
    }

    /// Advance every particle by one frame.
    pub fn update<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.rotation_y += SPIN_PER_FRAME;
        for p in &mut self.particles {
            if p.position.y < RESPAWN_BELOW {
                p.position.y = RESPAWN_HEIGHT;
                p.velocity.y = 0.0;
            }
            p.velocity.y -= rng.gen_range(0.0..MAX_PULL);
            p.position += p.velocity;
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Accumulated rotation of the field about Y, in radians.
    pub fn rotation_y(&self) -> f64 {
        self.rotation_y
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_spawn_inside_field() {
        let mut rng = StdRng::seed_from_u64(1);
        let fountain = ParticleFountain::new(DEFAULT_PARTICLE_COUNT, &mut rng);

        assert_eq!(fountain.len(), 1800);
        for p in fountain.particles() {
            for c in [p.position.x, p.position.y, p.position.z] {
                assert!(c.abs() <= FIELD_HALF_EXTENT);
            }
            assert_eq!(p.velocity, Vec3::ZERO);
        }
    }

    #[test]
    fn test_update_pulls_down() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut fountain = ParticleFountain::new(100, &mut rng);
        let before: Vec<Particle> = fountain.particles().to_vec();

        fountain.update(&mut rng);

        for (old, new) in before.iter().zip(fountain.particles()) {
            if old.position.y < RESPAWN_BELOW {
                continue;
            }
            assert!(new.velocity.y <= 0.0 && new.velocity.y > -MAX_PULL);
            assert_relative_eq!(new.position.y, old.position.y + new.velocity.y);
            assert_eq!(new.position.x, old.position.x);
        }
        assert_relative_eq!(fountain.rotation_y(), SPIN_PER_FRAME);
    }

    #[test]
    fn test_respawn_at_top() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut fountain = ParticleFountain::new(1, &mut rng);
        fountain.particles[0].position.y = -200.5;
        fountain.particles[0].velocity.y = -3.0;

        fountain.update(&mut rng);

        let p = fountain.particles()[0];
        assert!(p.velocity.y > -MAX_PULL);
        assert!(p.position.y <= RESPAWN_HEIGHT && p.position.y > RESPAWN_HEIGHT - MAX_PULL);
    }

    #[test]
    fn test_same_seed_same_fountain() {
        let run = || {
            let mut rng = StdRng::seed_from_u64(42);
            let mut fountain = ParticleFountain::new(50, &mut rng);
            for _ in 0..10 {
                fountain.update(&mut rng);
            }
            fountain
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_empty_fountain() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut fountain = ParticleFountain::new(0, &mut rng);
        fountain.update(&mut rng);
        assert!(fountain.is_empty());
    }
}
