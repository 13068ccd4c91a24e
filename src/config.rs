//! Fixed startup configuration. Nothing here is editable at runtime.

use glam::Vec3;

/// Off-screen text canvas and sampling grid.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterConfig {
    pub width: u32,
    pub height: u32,
    /// Sample every `step`-th pixel along both axes.
    pub step: u32,
    /// Red channel must be strictly above this to count as lit.
    pub threshold: u8,
    /// Pixel to world units.
    pub scale: f32,
    pub font_size: f32,
    pub font_weight: u32,
    pub font_family: String,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            width: 4000,
            height: 400,
            step: 3,
            threshold: 128,
            scale: 0.15,
            font_size: 100.0,
            font_weight: 900,
            font_family: "Verdana, sans-serif".to_string(),
        }
    }
}

impl RasterConfig {
    /// CSS font shorthand for a 2D canvas context.
    pub fn css_font(&self) -> String {
        format!("{} {}px {}", self.font_weight, self.font_size, self.font_family)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub distance: f32,
    pub near: f32,
    pub far: f32,
    /// Fraction of the visible width text may occupy.
    pub safe_fraction: f32,
    pub max_pixel_ratio: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            distance: 140.0,
            near: 0.1,
            far: 1000.0,
            safe_fraction: 0.85,
            max_pixel_ratio: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundConfig {
    pub count: usize,
    /// Points are placed in `[-half_extents, half_extents]` per axis.
    pub half_extents: Vec3,
    pub min_size: f32,
    pub max_size: f32,
    pub color: u32,
    pub opacity: f32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            count: 10_000,
            half_extents: Vec3::new(400.0, 250.0, 250.0),
            min_size: 2.0,
            max_size: 6.0,
            color: 0xFFFFFF,
            opacity: 0.6,
        }
    }
}

/// Top-level visualization settings.
#[derive(Debug, Clone, PartialEq)]
pub struct VizConfig {
    pub initial_text: String,
    /// Sphere-phase particle color, 0xRRGGBB.
    pub color: u32,
    /// Text-phase particle color, 0xRRGGBB.
    pub color_text: u32,
    pub radius: f32,
    pub raster: RasterConfig,
    pub camera: CameraConfig,
    pub background: BackgroundConfig,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            initial_text: "Inside Compilers".to_string(),
            color: 0xE066FF,
            color_text: 0xFFFFFF,
            radius: 40.0,
            raster: RasterConfig::default(),
            camera: CameraConfig::default(),
            background: BackgroundConfig::default(),
        }
    }
}

/// Splits 0xRRGGBB into normalized RGB.
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}
