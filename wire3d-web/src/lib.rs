/// wire3d Web - WASM bindings around the software renderer
///
/// The host page owns the sliders, the toggle and the canvas. It forwards
/// parameter changes here, calls `render`, and blits the returned RGBA buffer
/// (e.g. through `ImageData`).
use wasm_bindgen::prelude::*;
use wire3d_core::interaction::{angle_from_slider, scale_from_slider};
use wire3d_core::{DragTracker, FillRule, RenderSurface, Renderer, ViewState};

const BACKGROUND: [u8; 4] = [255, 255, 255, 255];
const INK: [u8; 4] = [0, 0, 0, 255];

/// RGBA8 pixel surface, black edges on white
pub struct RgbaSurface {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl RgbaSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: BACKGROUND.repeat(width * height),
        }
    }

    pub fn clear(&mut self) {
        for pixel in self.pixels.chunks_exact_mut(4) {
            pixel.copy_from_slice(&BACKGROUND);
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// False outside the surface
    pub fn is_inked(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = (y * self.width + x) * 4;
        self.pixels[idx..idx + 4] == INK
    }
}

impl RenderSurface for RgbaSurface {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn draw_point(&mut self, x: f32, y: f32) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&INK);
        }
    }
}

#[wasm_bindgen]
pub struct WebRenderer {
    renderer: Renderer,
    view: ViewState,
    drag: DragTracker,
    surface: RgbaSurface,
}

#[wasm_bindgen]
impl WebRenderer {
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> WebRenderer {
        WebRenderer {
            renderer: Renderer::vehicle(FillRule::default()),
            view: ViewState::default(),
            drag: DragTracker::new(),
            surface: RgbaSurface::new(width as usize, height as usize),
        }
    }

    /// Match the canvas size; the next render reallocates the depth buffers
    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface = RgbaSurface::new(width as usize, height as usize);
    }

    /// Slider position in degrees, 0..360
    pub fn set_rotation_x_slider(&mut self, progress: u32) {
        self.view.set_rotation_x(angle_from_slider(progress));
    }

    pub fn set_rotation_y_slider(&mut self, progress: u32) {
        self.view.set_rotation_y(angle_from_slider(progress));
    }

    pub fn set_scale_slider(&mut self, progress: u32) {
        self.view.set_scale(scale_from_slider(progress));
    }

    pub fn set_occlusion(&mut self, enabled: bool) {
        self.view.set_occlusion(enabled);
    }

    pub fn toggle_occlusion(&mut self) {
        self.view.toggle_occlusion();
    }

    pub fn occlusion(&self) -> bool {
        self.view.occlusion
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.drag.begin(x, y);
    }

    /// Returns true when the pan changed and the canvas needs a new frame
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        match self.drag.drag_to(x, y) {
            Some(delta) => {
                self.view.pan_by(delta);
                true
            }
            None => false,
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag.end();
    }

    /// Render a frame and return it as RGBA bytes
    pub fn render(&mut self) -> Vec<u8> {
        self.surface.clear();
        self.renderer.render(self.view, &mut self.surface);
        self.surface.pixels().to_vec()
    }
}
