//! CPU-side point cloud data, ready to upload.

use glam::Vec3;
use rand::Rng;

use crate::config::BackgroundConfig;
use crate::error::{Result, VizError};

/// Paired sphere/text layouts for the morphing cloud.
///
/// All three columns share one length for the lifetime of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleDataset {
    sphere: Vec<Vec3>,
    text: Vec<Vec3>,
    seeds: Vec<f32>,
}

impl ParticleDataset {
    /// Pairs the layouts index by index and draws one seed in `[0, 1)` per point.
    pub fn build<R: Rng + ?Sized>(sphere: Vec<Vec3>, text: Vec<Vec3>, rng: &mut R) -> Result<Self> {
        if sphere.len() != text.len() {
            return Err(VizError::LengthMismatch {
                sphere: sphere.len(),
                text: text.len(),
            });
        }
        let seeds = (0..sphere.len()).map(|_| rng.random::<f32>()).collect();
        Ok(Self { sphere, text, seeds })
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    pub fn sphere(&self) -> &[Vec3] {
        &self.sphere
    }

    pub fn text(&self) -> &[Vec3] {
        &self.text
    }

    pub fn seeds(&self) -> &[f32] {
        &self.seeds
    }

    /// Sphere positions as packed xyz floats.
    pub fn sphere_xyz(&self) -> Vec<f32> {
        flatten(&self.sphere)
    }

    /// Text positions as packed xyz floats.
    pub fn text_xyz(&self) -> Vec<f32> {
        flatten(&self.text)
    }
}

/// Static ambient points, generated once.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundDataset {
    positions: Vec<Vec3>,
    phases: Vec<f32>,
    sizes: Vec<f32>,
}

impl BackgroundDataset {
    pub fn generate<R: Rng + ?Sized>(config: &BackgroundConfig, rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(config.count);
        let mut phases = Vec::with_capacity(config.count);
        let mut sizes = Vec::with_capacity(config.count);

        let extent = config.half_extents;
        for _ in 0..config.count {
            positions.push(Vec3::new(
                (rng.random::<f32>() - 0.5) * 2.0 * extent.x,
                (rng.random::<f32>() - 0.5) * 2.0 * extent.y,
                (rng.random::<f32>() - 0.5) * 2.0 * extent.z,
            ));
            phases.push(rng.random::<f32>());
            sizes.push(config.min_size + rng.random::<f32>() * (config.max_size - config.min_size));
        }

        Self {
            positions,
            phases,
            sizes,
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn phases(&self) -> &[f32] {
        &self.phases
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn positions_xyz(&self) -> Vec<f32> {
        flatten(&self.positions)
    }
}

fn flatten(points: &[Vec3]) -> Vec<f32> {
    points.iter().flat_map(|p| p.to_array()).collect()
}
