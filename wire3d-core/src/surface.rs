//! The drawing target a frame is flushed to

/// Receives the visible pixels of a frame in device coordinates.
///
/// Surfaces only ever receive points: edges are rasterized and depth-tested
/// in the core, so there is no line primitive to implement. Implementations
/// decide how a point is shown (a terminal cell, an RGBA pixel, a canvas
/// call). `size` is read once at the start of every frame.
pub trait RenderSurface {
    fn size(&self) -> (usize, usize);

    fn draw_point(&mut self, x: f32, y: f32);
}
