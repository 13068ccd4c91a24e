//! Text rasterization into point samples.
//!
//! Drawing glyphs is platform work, done behind [`GlyphRasterizer`]. The browser
//! implementation uses an off-screen 2D canvas. Turning the resulting RGBA
//! buffer into coordinates is plain math and lives here.

use glam::Vec3;

use crate::config::RasterConfig;
use crate::error::Result;

/// Tightly packed RGBA8 pixels, row-major, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl PixelBuffer {
    /// A fully transparent black buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Red channel at `(x, y)`. Out-of-range reads are dark.
    #[inline]
    pub fn red(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        let index = (y as usize * self.width as usize + x as usize) * 4;
        self.rgba.get(index).copied().unwrap_or(0)
    }
}

/// Draws a string, centered, into a canvas of `config.width × config.height`.
pub trait GlyphRasterizer {
    fn rasterize(&self, text: &str, config: &RasterConfig) -> Result<PixelBuffer>;
}

/// Samples lit pixels on a `step` grid and maps them into centered world space.
///
/// Y is flipped because pixel rows grow downward. Output is in scan order.
pub fn sample_lit_points(pixels: &PixelBuffer, config: &RasterConfig) -> Vec<Vec3> {
    let step = config.step.max(1) as usize;
    let half_w = pixels.width as f32 / 2.0;
    let half_h = pixels.height as f32 / 2.0;

    let mut points = Vec::new();
    for y in (0..pixels.height).step_by(step) {
        for x in (0..pixels.width).step_by(step) {
            if pixels.red(x, y) > config.threshold {
                points.push(Vec3::new(
                    (x as f32 - half_w) * config.scale,
                    -(y as f32 - half_h) * config.scale,
                    0.0,
                ));
            }
        }
    }
    points
}

/// Rasterizes `text` and samples it in one go.
pub fn text_points<R: GlyphRasterizer + ?Sized>(
    rasterizer: &R,
    text: &str,
    config: &RasterConfig,
) -> Result<Vec<Vec3>> {
    let pixels = rasterizer.rasterize(text, config)?;
    let points = sample_lit_points(&pixels, config);
    log::debug!("rasterized {:?} into {} points", text, points.len());
    Ok(points)
}
