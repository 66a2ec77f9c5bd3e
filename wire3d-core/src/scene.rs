/// Frame orchestration: snapshot, transform, rasterize, flush
use tracing::trace;

use crate::interaction::ViewState;
use crate::model::Model;
use crate::raster::{FillRule, FrameBuffers, Rasterizer};
use crate::surface::RenderSurface;
use crate::transform::Pipeline;

/// Counters for one rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub faces: usize,
    pub painted: usize,
}

/// Renders a model as a hidden-line wireframe
#[derive(Debug, Clone)]
pub struct Renderer {
    model: Model,
    rasterizer: Rasterizer,
}

impl Renderer {
    pub fn new(model: Model, fill_rule: FillRule) -> Self {
        Self {
            model,
            rasterizer: Rasterizer::new(fill_rule),
        }
    }

    pub fn vehicle(fill_rule: FillRule) -> Self {
        Self::new(Model::vehicle(), fill_rule)
    }

    pub fn buffers(&self) -> &FrameBuffers {
        self.rasterizer.buffers()
    }

    /// Draw every face into the buffers without touching a surface.
    ///
    /// `view` is taken by value: it is the frame's snapshot and cannot change
    /// underneath the pass.
    pub fn rasterize(&mut self, view: ViewState, width: usize, height: usize) -> FrameStats {
        self.rasterizer.begin_frame(width, height);
        let pipeline = Pipeline::new(&view, width, height);

        let mut faces = 0;
        for named in self.model.build() {
            for face in named.solid.faces() {
                let screen = pipeline.apply_face(face);
                self.rasterizer.draw_face(&screen, view.occlusion);
                faces += 1;
            }
        }

        FrameStats {
            faces,
            painted: self.rasterizer.buffers().painted_count(),
        }
    }

    /// Render a full frame onto `surface`
    pub fn render<S: RenderSurface + ?Sized>(&mut self, view: ViewState, surface: &mut S) -> FrameStats {
        let (width, height) = surface.size();
        let stats = self.rasterize(view, width, height);
        self.rasterizer.flush(surface);
        trace!(
            faces = stats.faces,
            painted = stats.painted,
            occlusion = view.occlusion,
            "frame rendered"
        );
        stats
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::vehicle(FillRule::default())
    }
}
