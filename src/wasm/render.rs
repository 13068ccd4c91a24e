use std::cell::RefCell;
use std::rc::Rc;

use glam::{EulerRot, Mat4};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    HtmlCanvasElement, HtmlElement, HtmlInputElement, WebGl2RenderingContext as GL,
    WebGlBuffer, WebGlProgram, WebGlShader, WebGlUniformLocation, WebGlVertexArrayObject, Window,
};

use super::canvas_text::CanvasRasterizer;
use super::shaders;
use crate::animation::Rotation;
use crate::config::{hex_to_rgb, VizConfig};
use crate::context::{FrameClock, ParticleRenderer, ShaderInputs, VisualizationContext};
use crate::dataset::{BackgroundDataset, ParticleDataset};
use crate::error::{Result, VizError};
use crate::layout::Projection;

type Context = VisualizationContext<CanvasRasterizer, GlRenderer>;

/// Build the scene, wire the page and start the render loop.
pub fn start(canvas: HtmlCanvasElement, config: VizConfig) -> std::result::Result<(), JsValue> {
    let window = web_sys::window().ok_or(VizError::Missing("window"))?;
    let document = window.document().ok_or(VizError::Missing("document"))?;

    let gl: GL = canvas
        .get_context("webgl2")?
        .ok_or("WebGL2 not supported")?
        .dyn_into()?;

    let pixel_ratio = window.device_pixel_ratio().min(config.camera.max_pixel_ratio);
    let (width, height) = inner_size(&window)?;
    fit_canvas(&canvas, &gl, width, height, pixel_ratio);

    let mut rng = SmallRng::seed_from_u64(random_seed());
    let background = BackgroundDataset::generate(&config.background, &mut rng);
    let renderer = GlRenderer::new(gl, &config, &background, pixel_ratio as f32)?;
    log::info!("background field ready with {} points", background.len());

    let now = window.performance().ok_or(VizError::Missing("performance"))?.now();
    let initial_text = config.initial_text.clone();
    let rasterizer = CanvasRasterizer::new(&document)?;
    let ctx: Rc<RefCell<Context>> = Rc::new(RefCell::new(VisualizationContext::new(
        config,
        rasterizer,
        renderer,
        (width, height),
        FrameClock::starting_at(now),
        random_seed(),
    )));
    ctx.borrow_mut().regenerate(&initial_text)?;

    if let Some(loading) = document.get_element_by_id("loading") {
        if let Ok(loading) = loading.dyn_into::<HtmlElement>() {
            loading.style().set_property("opacity", "0")?;
        }
    }

    // Update button: regenerate from the text field.
    if let (Some(input), Some(button)) = (
        document.get_element_by_id("textInput"),
        document.get_element_by_id("updateBtn"),
    ) {
        let input = input
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| VizError::ElementNotFound("textInput".into()))?;
        let click_closure = {
            let ctx = ctx.clone();
            Closure::wrap(Box::new(move || {
                if let Err(err) = ctx.borrow_mut().regenerate(&input.value()) {
                    log::error!("regenerate failed: {err}");
                }
            }) as Box<dyn FnMut()>)
        };
        button.add_event_listener_with_callback("click", click_closure.as_ref().unchecked_ref())?;
        click_closure.forget();
    } else {
        log::warn!("no #textInput/#updateBtn on the page, text is fixed");
    }

    // Resize canvas to fit window
    let resize_closure = {
        let canvas = canvas.clone();
        let ctx = ctx.clone();
        Closure::wrap(Box::new(move || {
            let Some(window) = web_sys::window() else { return };
            let (width, height) = match inner_size(&window) {
                Ok(size) => size,
                Err(err) => {
                    log::warn!("resize ignored: {err}");
                    return;
                }
            };
            let mut ctx = ctx.borrow_mut();
            let pixel_ratio = ctx.renderer().pixel_ratio as f64;
            fit_canvas(&canvas, &ctx.renderer().gl, width, height, pixel_ratio);
            ctx.on_resize(width, height);
        }) as Box<dyn FnMut()>)
    };
    window.add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    resize_closure.forget();

    // Animation loop
    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        ctx.borrow_mut().frame(now);

        // schedule next
        let scheduled = web_sys::window()
            .zip(f.borrow().as_ref())
            .map(|(w, cb)| w.request_animation_frame(cb.as_ref().unchecked_ref()));
        if !matches!(scheduled, Some(Ok(_))) {
            log::error!("could not schedule the next frame, animation stopped");
        }
    }) as Box<dyn FnMut(f64)>));

    if let Some(cb) = g.borrow().as_ref() {
        window.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }

    Ok(())
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

fn inner_size(window: &Window) -> Result<(f64, f64)> {
    let width = window.inner_width()?.as_f64().ok_or(VizError::Missing("innerWidth"))?;
    let height = window.inner_height()?.as_f64().ok_or(VizError::Missing("innerHeight"))?;
    Ok((width, height))
}

fn fit_canvas(canvas: &HtmlCanvasElement, gl: &GL, width: f64, height: f64, pixel_ratio: f64) {
    let w = (width * pixel_ratio) as u32;
    let h = (height * pixel_ratio) as u32;
    canvas.set_width(w);
    canvas.set_height(h);
    gl.viewport(0, 0, w as i32, h as i32);
}

fn compile_shader(gl: &GL, kind: u32, source: &str) -> Result<WebGlShader> {
    let shader = gl
        .create_shader(kind)
        .ok_or(VizError::Allocation("shader"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if gl
        .get_shader_parameter(&shader, GL::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(shader)
    } else {
        let info = gl.get_shader_info_log(&shader).unwrap_or_default();
        gl.delete_shader(Some(&shader));
        Err(VizError::ShaderCompile(info))
    }
}

/// Links a program with `attributes` bound to locations 0, 1, 2, ...
fn link_program(
    gl: &GL,
    vertex: &str,
    fragment: &str,
    attributes: &[&str],
) -> Result<WebGlProgram> {
    let vs = compile_shader(gl, GL::VERTEX_SHADER, vertex)?;
    let fs = compile_shader(gl, GL::FRAGMENT_SHADER, fragment)?;
    let program = gl
        .create_program()
        .ok_or(VizError::Allocation("program"))?;
    gl.attach_shader(&program, &vs);
    gl.attach_shader(&program, &fs);
    for (location, name) in attributes.iter().enumerate() {
        gl.bind_attrib_location(&program, location as u32, name);
    }
    gl.link_program(&program);

    // Shaders are owned by the program once linked.
    gl.delete_shader(Some(&vs));
    gl.delete_shader(Some(&fs));

    if gl
        .get_program_parameter(&program, GL::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        Ok(program)
    } else {
        let info = gl.get_program_info_log(&program).unwrap_or_default();
        gl.delete_program(Some(&program));
        Err(VizError::ProgramLink(info))
    }
}

/// Uploads `data` into a new buffer wired to attribute `location`.
fn upload_attribute(gl: &GL, location: u32, components: i32, data: &[f32]) -> Result<WebGlBuffer> {
    let buffer = gl.create_buffer().ok_or(VizError::Allocation("buffer"))?;
    gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
    let array = js_sys::Float32Array::from(data);
    gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &array, GL::STATIC_DRAW);
    gl.enable_vertex_attrib_array(location);
    gl.vertex_attrib_pointer_with_i32(location, components, GL::FLOAT, false, 0, 0);
    Ok(buffer)
}

/// Vertex array plus the buffers it reads from.
struct PointCloud {
    vao: WebGlVertexArrayObject,
    buffers: Vec<WebGlBuffer>,
    count: i32,
}

impl PointCloud {
    fn new(gl: &GL, attributes: &[(i32, &[f32])], count: usize) -> Result<Self> {
        let vao = gl
            .create_vertex_array()
            .ok_or(VizError::Allocation("vertex array"))?;
        gl.bind_vertex_array(Some(&vao));
        let buffers = attributes
            .iter()
            .enumerate()
            .map(|(location, (components, data))| {
                upload_attribute(gl, location as u32, *components, data)
            })
            .collect::<Result<Vec<_>>>();
        gl.bind_vertex_array(None);
        gl.bind_buffer(GL::ARRAY_BUFFER, None);

        match buffers {
            Ok(buffers) => Ok(Self {
                vao,
                buffers,
                count: count as i32,
            }),
            Err(err) => {
                gl.delete_vertex_array(Some(&vao));
                Err(err)
            }
        }
    }

    fn draw(&self, gl: &GL) {
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(GL::POINTS, 0, self.count);
        gl.bind_vertex_array(None);
    }

    fn release(self, gl: &GL) {
        for buffer in &self.buffers {
            gl.delete_buffer(Some(buffer));
        }
        gl.delete_vertex_array(Some(&self.vao));
    }
}

struct Uniforms {
    projection: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    model: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
    mix: Option<WebGlUniformLocation>,
    explosion: Option<WebGlUniformLocation>,
    pixel_ratio: Option<WebGlUniformLocation>,
    color: Option<WebGlUniformLocation>,
    color_text: Option<WebGlUniformLocation>,
    opacity: Option<WebGlUniformLocation>,
}

impl Uniforms {
    // Locations a program does not declare come back as `None`, and GL
    // ignores uploads to them.
    fn locate(gl: &GL, program: &WebGlProgram) -> Self {
        let at = |name: &str| gl.get_uniform_location(program, name);
        Self {
            projection: at("uProjection"),
            view: at("uView"),
            model: at("uModel"),
            time: at("uTime"),
            mix: at("uMix"),
            explosion: at("uExplosion"),
            pixel_ratio: at("uPixelRatio"),
            color: at("uColor"),
            color_text: at("uColorText"),
            opacity: at("uOpacity"),
        }
    }
}

/// WebGL2 point renderer for the morph cloud and the background field.
pub struct GlRenderer {
    gl: GL,
    morph_program: WebGlProgram,
    morph_uniforms: Uniforms,
    morph: Option<PointCloud>,
    background_program: WebGlProgram,
    background_uniforms: Uniforms,
    background: PointCloud,
    projection: Mat4,
    view: Mat4,
    rotation: Rotation,
    time: f32,
    mix: f32,
    explosion: f32,
    pixel_ratio: f32,
}

impl GlRenderer {
    pub fn new(
        gl: GL,
        config: &VizConfig,
        background: &BackgroundDataset,
        pixel_ratio: f32,
    ) -> Result<Self> {
        let morph_program = link_program(
            &gl,
            shaders::MORPH_VERTEX,
            shaders::MORPH_FRAGMENT,
            &["positionSphere", "positionText", "aRandom"],
        )?;
        let background_program = link_program(
            &gl,
            shaders::BACKGROUND_VERTEX,
            shaders::BACKGROUND_FRAGMENT,
            &["position", "aRandom", "aSize"],
        )?;
        let morph_uniforms = Uniforms::locate(&gl, &morph_program);
        let background_uniforms = Uniforms::locate(&gl, &background_program);

        let positions = background.positions_xyz();
        let background = PointCloud::new(
            &gl,
            &[
                (3, positions.as_slice()),
                (1, background.phases()),
                (1, background.sizes()),
            ],
            background.len(),
        )?;

        // Colors are constant for the page's lifetime.
        gl.use_program(Some(&morph_program));
        gl.uniform3fv_with_f32_array(morph_uniforms.color.as_ref(), &hex_to_rgb(config.color));
        gl.uniform3fv_with_f32_array(
            morph_uniforms.color_text.as_ref(),
            &hex_to_rgb(config.color_text),
        );
        gl.use_program(Some(&background_program));
        gl.uniform3fv_with_f32_array(
            background_uniforms.color.as_ref(),
            &hex_to_rgb(config.background.color),
        );
        gl.uniform1f(background_uniforms.opacity.as_ref(), config.background.opacity);
        gl.use_program(None);

        gl.clear_color(0.0, 0.0, 0.0, 0.0);
        gl.disable(GL::DEPTH_TEST);
        gl.depth_mask(false);
        gl.enable(GL::BLEND);
        gl.blend_func(GL::SRC_ALPHA, GL::ONE);

        Ok(Self {
            gl,
            morph_program,
            morph_uniforms,
            morph: None,
            background_program,
            background_uniforms,
            background,
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            rotation: Rotation::ZERO,
            time: 0.0,
            mix: 0.0,
            explosion: 0.0,
            pixel_ratio,
        })
    }

    fn model(&self) -> Mat4 {
        let r = self.rotation;
        Mat4::from_euler(EulerRot::XYZ, r.x, r.y, r.z)
    }

    fn upload_camera(&self, uniforms: &Uniforms) {
        let gl = &self.gl;
        gl.uniform_matrix4fv_with_f32_array(
            uniforms.projection.as_ref(),
            false,
            &self.projection.to_cols_array(),
        );
        gl.uniform_matrix4fv_with_f32_array(uniforms.view.as_ref(), false, &self.view.to_cols_array());
        gl.uniform1f(uniforms.time.as_ref(), self.time);
        gl.uniform1f(uniforms.pixel_ratio.as_ref(), self.pixel_ratio);
    }
}

impl ShaderInputs for GlRenderer {
    fn set_blend_factor(&mut self, mix: f32) {
        self.mix = mix;
    }

    fn set_explosion_magnitude(&mut self, magnitude: f32) {
        self.explosion = magnitude;
    }

    fn set_time_value(&mut self, time: f32) {
        self.time = time;
    }
}

impl ParticleRenderer for GlRenderer {
    fn replace_dataset(&mut self, dataset: &ParticleDataset) -> Result<()> {
        if let Some(old) = self.morph.take() {
            old.release(&self.gl);
        }
        let sphere = dataset.sphere_xyz();
        let text = dataset.text_xyz();
        let cloud = PointCloud::new(
            &self.gl,
            &[(3, sphere.as_slice()), (3, text.as_slice()), (1, dataset.seeds())],
            dataset.len(),
        )?;
        self.morph = Some(cloud);
        Ok(())
    }

    fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    fn set_projection(&mut self, projection: &Projection) {
        self.projection = projection.projection_matrix();
        self.view = projection.view_matrix();
    }

    fn draw(&mut self) {
        let gl = &self.gl;
        gl.clear(GL::COLOR_BUFFER_BIT);

        gl.use_program(Some(&self.background_program));
        self.upload_camera(&self.background_uniforms);
        self.background.draw(gl);

        if let Some(cloud) = &self.morph {
            gl.use_program(Some(&self.morph_program));
            self.upload_camera(&self.morph_uniforms);
            gl.uniform_matrix4fv_with_f32_array(
                self.morph_uniforms.model.as_ref(),
                false,
                &self.model().to_cols_array(),
            );
            gl.uniform1f(self.morph_uniforms.mix.as_ref(), self.mix);
            gl.uniform1f(self.morph_uniforms.explosion.as_ref(), self.explosion);
            cloud.draw(gl);
        }
        gl.use_program(None);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use crate::config::BackgroundConfig;
    use glam::Vec3;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn renderer() -> GlRenderer {
        let document = web_sys::window().unwrap().document().unwrap();
        let canvas = document
            .create_element("canvas")
            .unwrap()
            .dyn_into::<HtmlCanvasElement>()
            .unwrap();
        let gl: GL = canvas
            .get_context("webgl2")
            .unwrap()
            .expect("WebGL2 not supported")
            .dyn_into()
            .unwrap();

        let config = VizConfig {
            background: BackgroundConfig {
                count: 16,
                ..BackgroundConfig::default()
            },
            ..VizConfig::default()
        };
        let mut rng = SmallRng::seed_from_u64(5);
        let background = BackgroundDataset::generate(&config.background, &mut rng);
        GlRenderer::new(gl, &config, &background, 1.0).unwrap()
    }

    fn dataset(count: usize) -> ParticleDataset {
        let mut rng = SmallRng::seed_from_u64(count as u64);
        let sphere = crate::sphere::sphere_points(count, 40.0);
        let text = (0..count).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        ParticleDataset::build(sphere, text, &mut rng).unwrap()
    }

    #[wasm_bindgen_test]
    fn replacing_deletes_the_previous_gpu_buffers() {
        let mut r = renderer();
        r.replace_dataset(&dataset(10)).unwrap();

        let first = r.morph.as_ref().unwrap();
        let (old_vao, old_buffers) = (first.vao.clone(), first.buffers.clone());
        assert_eq!(first.count, 10);
        assert!(r.gl.is_vertex_array(Some(&old_vao)));
        assert!(old_buffers.iter().all(|b| r.gl.is_buffer(Some(b))));

        r.replace_dataset(&dataset(25)).unwrap();

        assert!(!r.gl.is_vertex_array(Some(&old_vao)));
        assert!(old_buffers.iter().all(|b| !r.gl.is_buffer(Some(b))));

        let current = r.morph.as_ref().unwrap();
        assert_eq!(current.count, 25);
        assert_eq!(current.buffers.len(), 3);
        assert!(r.gl.is_vertex_array(Some(&current.vao)));
        assert!(current.buffers.iter().all(|b| r.gl.is_buffer(Some(b))));
    }

    #[wasm_bindgen_test]
    fn background_survives_dataset_swaps() {
        let mut r = renderer();
        r.replace_dataset(&dataset(4)).unwrap();
        r.replace_dataset(&dataset(0)).unwrap();

        assert_eq!(r.background.count, 16);
        assert!(r.gl.is_vertex_array(Some(&r.background.vao)));
        assert_eq!(r.morph.as_ref().map(|c| c.count), Some(0));
        r.draw();
        assert_eq!(r.gl.get_error(), GL::NO_ERROR);
    }
}
