use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::config::RasterConfig;
use crate::error::{Result, VizError};
use crate::raster::{GlyphRasterizer, PixelBuffer};

/// Draws text with the browser's own font stack on a detached 2D canvas.
pub struct CanvasRasterizer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRasterizer {
    pub fn new(document: &Document) -> Result<Self> {
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| VizError::Missing("canvas element"))?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or(VizError::ContextUnavailable("2d"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| VizError::ContextUnavailable("2d"))?;
        Ok(Self { canvas, ctx })
    }
}

impl GlyphRasterizer for CanvasRasterizer {
    fn rasterize(&self, text: &str, config: &RasterConfig) -> Result<PixelBuffer> {
        // Resizing also clears the bitmap and resets context state.
        self.canvas.set_width(config.width);
        self.canvas.set_height(config.height);

        let ctx = &self.ctx;
        ctx.set_fill_style_str("white");
        ctx.set_font(&config.css_font());
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.fill_text(text, config.width as f64 / 2.0, config.height as f64 / 2.0)?;

        let image = ctx.get_image_data(0.0, 0.0, config.width as f64, config.height as f64)?;
        Ok(PixelBuffer {
            width: image.width(),
            height: image.height(),
            rgba: image.data().0,
        })
    }
}
