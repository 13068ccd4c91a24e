//! Particle cloud that morphs between a sphere and a line of text.
//!
//! Layout math and the animation cycle are platform independent and tested on
//! the host. The WebGL2 renderer and DOM wiring only compile for wasm32.

pub mod animation;
pub mod config;
pub mod context;
pub mod dataset;
pub mod error;
pub mod layout;
pub mod raster;
pub mod sphere;

pub use animation::{AnimationDriver, AnimationState, Phase, RenderCommand, Rotation};
pub use config::VizConfig;
pub use context::{FrameClock, ParticleRenderer, ShaderInputs, VisualizationContext};
pub use dataset::{BackgroundDataset, ParticleDataset};
pub use error::VizError;
pub use raster::{GlyphRasterizer, PixelBuffer};

// Only compile wasm-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod canvas_text;
    mod render;
    mod shaders;

    pub use canvas_text::CanvasRasterizer;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas = document
            .get_element_by_id("c")
            .ok_or("canvas not found")?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        render::start(canvas, crate::VizConfig::default())?;
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::CanvasRasterizer;
