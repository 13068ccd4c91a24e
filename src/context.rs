//! Ties layout generation, the active dataset and the animation clock together.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::animation::{AnimationDriver, RenderCommand, Rotation};
use crate::config::VizConfig;
use crate::dataset::ParticleDataset;
use crate::error::Result;
use crate::layout::{fit_to_view, Projection};
use crate::raster::{text_points, GlyphRasterizer};
use crate::sphere::sphere_points;

/// Per-frame scalar inputs of the morph shader.
pub trait ShaderInputs {
    fn set_blend_factor(&mut self, mix: f32);
    fn set_explosion_magnitude(&mut self, magnitude: f32);
    fn set_time_value(&mut self, time: f32);
}

/// The graphics side of the visualization.
pub trait ParticleRenderer: ShaderInputs {
    /// Releases whatever dataset is installed, then uploads `dataset`.
    /// At most one dataset is resident once this returns.
    fn replace_dataset(&mut self, dataset: &ParticleDataset) -> Result<()>;

    fn set_rotation(&mut self, rotation: Rotation);

    fn set_projection(&mut self, projection: &Projection);

    fn draw(&mut self);
}

/// Milliseconds-based clock origin, fed from `performance.now()` in the browser.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    origin_ms: f64,
}

impl FrameClock {
    pub fn starting_at(origin_ms: f64) -> Self {
        Self { origin_ms }
    }

    pub fn elapsed_secs(&self, now_ms: f64) -> f64 {
        (now_ms - self.origin_ms).max(0.0) / 1000.0
    }
}

pub struct VisualizationContext<G, R> {
    config: VizConfig,
    rasterizer: G,
    renderer: R,
    dataset: Option<ParticleDataset>,
    projection: Projection,
    clock: FrameClock,
    driver: AnimationDriver,
    rng: SmallRng,
}

impl<G: GlyphRasterizer, R: ParticleRenderer> VisualizationContext<G, R> {
    pub fn new(
        config: VizConfig,
        rasterizer: G,
        mut renderer: R,
        viewport: (f64, f64),
        clock: FrameClock,
        seed: u64,
    ) -> Self {
        let projection = Projection::new(&config.camera, viewport.0, viewport.1);
        renderer.set_projection(&projection);
        Self {
            config,
            rasterizer,
            renderer,
            dataset: None,
            projection,
            clock,
            driver: AnimationDriver::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn dataset(&self) -> Option<&ParticleDataset> {
        self.dataset.as_ref()
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Rebuilds the morph cloud for `text`. Blank input leaves everything as is.
    pub fn regenerate(&mut self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            log::debug!("ignoring blank text");
            return Ok(());
        }

        let mut text_layout = text_points(&self.rasterizer, text, &self.config.raster)?;
        fit_to_view(
            &mut text_layout,
            &self.projection,
            self.config.camera.safe_fraction,
        );
        let sphere_layout = sphere_points(text_layout.len(), self.config.radius);
        let dataset = ParticleDataset::build(sphere_layout, text_layout, &mut self.rng)?;

        self.dataset = None;
        self.renderer.replace_dataset(&dataset)?;
        log::info!("showing {:?} with {} particles", text, dataset.len());
        self.dataset = Some(dataset);
        Ok(())
    }

    /// New viewport size. Takes effect on the next [`regenerate`](Self::regenerate)
    /// for layout; the projection itself updates immediately.
    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.projection.set_viewport(width, height);
        self.renderer.set_projection(&self.projection);
    }

    /// Runs one frame at `now_ms` and returns what was applied.
    pub fn frame(&mut self, now_ms: f64) -> RenderCommand {
        let command = self.driver.tick(self.clock.elapsed_secs(now_ms));
        self.renderer.set_time_value(command.time);
        self.renderer.set_blend_factor(command.state.mix);
        self.renderer.set_explosion_magnitude(command.state.explosion);
        self.renderer.set_rotation(command.rotation);
        self.renderer.draw();
        command
    }
}
