/// Depth-buffered hidden-line rasterizer
///
/// Faces arrive in device space. Each face contributes an optional occluding
/// fill (depth only, never painted) and an outline whose samples are painted
/// wherever they survive the depth test.
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::algebra::{perp_dot, sub2, xy, Point};
use crate::solid::Face;
use crate::surface::RenderSurface;

/// Normal components below this fraction of the normal's length count as zero
const DEGENERATE_EPSILON: f32 = 1e-6;

/// Per-pixel depth and paint state for one frame
#[derive(Debug, Clone)]
pub struct FrameBuffers {
    width: usize,
    height: usize,
    depth: Vec<f32>,
    paint: Vec<bool>,
}

impl FrameBuffers {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth: vec![f32::NEG_INFINITY; size],
            paint: vec![false; size],
        }
    }

    /// Reallocate for new surface dimensions
    pub fn resize(&mut self, width: usize, height: usize) {
        debug!(width, height, "resizing frame buffers");
        *self = Self::new(width, height);
    }

    /// Reset every cell without reallocating
    pub fn clear(&mut self) {
        self.depth.fill(f32::NEG_INFINITY);
        self.paint.fill(false);
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    /// Attempt a depth write.
    ///
    /// Nearer (larger) depths always win. At equal depth only a painted sample
    /// wins, so an edge is never hidden by a coincident fill. Returns whether the
    /// write was accepted; out-of-bounds writes are dropped.
    pub fn write(&mut self, x: i32, y: i32, z: f32, color: bool) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        let current = self.depth[idx];
        if current < z || (current == z && color) {
            self.depth[idx] = z;
            self.paint[idx] = color;
            true
        } else {
            false
        }
    }

    pub fn is_painted(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|idx| self.paint[idx])
    }

    pub fn depth_at(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|idx| self.depth[idx])
    }

    pub fn paint_mask(&self) -> &[bool] {
        &self.paint
    }

    /// Coordinates of every painted pixel, row by row
    pub fn painted(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.paint
            .iter()
            .enumerate()
            .filter(|(_, p)| **p)
            .map(move |(i, _)| (i % width, i / width))
    }

    pub fn painted_count(&self) -> usize {
        self.paint.iter().filter(|&&p| p).count()
    }
}

/// Plane `Ax + By + Cz + D = 0` of a face in device space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
}

impl Plane {
    /// Normal `(p2 - p0) x (p2 - p1)`, offset through `p2`
    pub fn through(p0: &Point, p1: &Point, p2: &Point) -> Self {
        let u = Vector3::new(p2[0] - p0[0], p2[1] - p0[1], p2[2] - p0[2]);
        let v = Vector3::new(p2[0] - p1[0], p2[1] - p1[1], p2[2] - p1[2]);
        let n = u.cross(&v);
        let d = -(n.x * p2[0] + n.y * p2[1] + n.z * p2[2]);
        Self {
            a: n.x,
            b: n.y,
            c: n.z,
            d,
        }
    }

    /// Plane through the first two distinct points of a face loop and the first
    /// later point off their line. `None` when every point is collinear.
    pub fn from_face(face: &Face) -> Option<Self> {
        let mut points = face.points.iter();
        let p0 = points.next()?;
        let p1 = points.by_ref().find(|p| *p != p0)?;
        let p2 = points.find(|p| !collinear(p0, p1, p))?;
        Some(Self::through(p0, p1, p2))
    }

    /// True when the face is seen edge-on and carries no usable depth
    pub fn is_degenerate(&self) -> bool {
        let (a, b, c) = (f64::from(self.a), f64::from(self.b), f64::from(self.c));
        let norm = (a * a + b * b + c * c).sqrt();
        c.abs() <= f64::from(DEGENERATE_EPSILON) * norm
    }

    pub fn depth_at(&self, x: f32, y: f32) -> f32 {
        (x * self.a + y * self.b + self.d) / -self.c
    }
}

fn collinear(p0: &Point, p1: &Point, p2: &Point) -> bool {
    let offset = |p: &Point| {
        Vector3::new(
            f64::from(p[0]) - f64::from(p0[0]),
            f64::from(p[1]) - f64::from(p0[1]),
            f64::from(p[2]) - f64::from(p0[2]),
        )
    };
    let (u, v) = (offset(p1), offset(p2));
    u.cross(&v).norm() <= f64::from(DEGENERATE_EPSILON) * u.norm() * v.norm()
}

/// Interior test used by the fill pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillRule {
    /// Same-sign edge test; only exact for convex faces
    Convex,
    /// Winding-number test; handles concave profiles
    #[default]
    NonZero,
}

impl FillRule {
    /// `polygon` is a closed loop; points on an edge count as inside
    pub fn contains(self, polygon: &[Vector2<f32>], p: &Vector2<f32>) -> bool {
        match self {
            FillRule::Convex => contains_convex(polygon, p),
            FillRule::NonZero => contains_nonzero(polygon, p),
        }
    }
}

/// Inside when every non-zero edge cross product shares one sign
pub fn contains_convex(polygon: &[Vector2<f32>], p: &Vector2<f32>) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut sign = 0.0f64;
    for edge in polygon.windows(2) {
        let cross = perp_dot(&sub2(&edge[1], p), &sub2(&edge[1], &edge[0]));
        if cross == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if sign * cross < 0.0 {
            return false;
        }
    }
    true
}

/// Inside when the winding number around `p` is non-zero
pub fn contains_nonzero(polygon: &[Vector2<f32>], p: &Vector2<f32>) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let mut winding = 0i32;
    for edge in polygon.windows(2) {
        let (a, b) = (&edge[0], &edge[1]);
        let side = perp_dot(&sub2(b, a), &sub2(p, a));
        if side == 0.0 && within_bounds(a, b, p) {
            return true;
        }
        if a.y <= p.y {
            if b.y > p.y && side > 0.0 {
                winding += 1;
            }
        } else if b.y <= p.y && side < 0.0 {
            winding -= 1;
        }
    }
    winding != 0
}

fn within_bounds(a: &Vector2<f32>, b: &Vector2<f32>, p: &Vector2<f32>) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Liang-Barsky clip of `a -> b` to the box `[min, max]`.
///
/// Returns the clipped endpoints with their parameters along the original
/// segment, or `None` when nothing of it lies inside (or it is not finite).
pub fn clip_segment(
    a: &Vector2<f32>,
    b: &Vector2<f32>,
    min: Vector2<f32>,
    max: Vector2<f32>,
) -> Option<(Vector2<f32>, Vector2<f32>, f32, f32)> {
    if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
        return None;
    }
    let (ax, ay) = (f64::from(a.x), f64::from(a.y));
    let (dx, dy) = (f64::from(b.x) - ax, f64::from(b.y) - ay);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);

    for (p, q) in [
        (-dx, ax - f64::from(min.x)),
        (dx, f64::from(max.x) - ax),
        (-dy, ay - f64::from(min.y)),
        (dy, f64::from(max.y) - ay),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| Vector2::new((ax + dx * t) as f32, (ay + dy * t) as f32);
    let start = if t0 == 0.0 { *a } else { at(t0) };
    let end = if t1 == 1.0 { *b } else { at(t1) };
    Some((start, end, t0 as f32, t1 as f32))
}

/// Walk the integer pixels of a segment with an all-octant Bresenham.
///
/// Endpoints are rounded away from each other and held to the `i32` range.
/// `plot` receives each pixel and its fraction of the way along the segment.
/// Every pixel between the endpoints is visited, so callers clip long
/// segments with [`clip_segment`] first.
pub fn rasterize_line(a: &Vector2<f32>, b: &Vector2<f32>, mut plot: impl FnMut(i32, i32, f32)) {
    let snap = |v: f32| i64::from(v.clamp(i32::MIN as f32, i32::MAX as f32) as i32);
    let x1 = snap(if a.x < b.x { a.x.floor() } else { a.x.ceil() });
    let y1 = snap(if a.y < b.y { a.y.floor() } else { a.y.ceil() });
    let x2 = snap(if b.x < a.x { b.x.floor() } else { b.x.ceil() });
    let y2 = snap(if b.y < a.y { b.y.floor() } else { b.y.ceil() });

    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let sx = if x2 >= x1 { 1 } else { -1 };
    let sy = if y2 >= y1 { 1 } else { -1 };
    let steps = dx.max(dy);
    let fraction = |i: i64| if steps == 0 { 0.0 } else { (i as f64 / steps as f64) as f32 };

    // Walked coordinates stay between the endpoints, so they fit in i32
    plot(x1 as i32, y1 as i32, 0.0);

    if dy <= dx {
        let mut d = dy * 2 - dx;
        let (d1, d2) = (dy * 2, (dy - dx) * 2);
        let (mut x, mut y) = (x1 + sx, y1);
        for i in 1..=dx {
            if d > 0 {
                d += d2;
                y += sy;
            } else {
                d += d1;
            }
            plot(x as i32, y as i32, fraction(i));
            x += sx;
        }
    } else {
        let mut d = dx * 2 - dy;
        let (d1, d2) = (dx * 2, (dx - dy) * 2);
        let (mut x, mut y) = (x1, y1 + sy);
        for i in 1..=dy {
            if d > 0 {
                d += d2;
                x += sx;
            } else {
                d += d1;
            }
            plot(x as i32, y as i32, fraction(i));
            y += sy;
        }
    }
}

/// Owns the frame buffers and draws device-space faces into them
#[derive(Debug, Clone)]
pub struct Rasterizer {
    buffers: FrameBuffers,
    fill_rule: FillRule,
}

impl Rasterizer {
    pub fn new(fill_rule: FillRule) -> Self {
        Self {
            buffers: FrameBuffers::new(0, 0),
            fill_rule,
        }
    }

    pub fn buffers(&self) -> &FrameBuffers {
        &self.buffers
    }

    /// Start a frame: reallocate only if the surface size changed, else clear
    pub fn begin_frame(&mut self, width: usize, height: usize) {
        if self.buffers.size() == (width, height) {
            self.buffers.clear();
        } else {
            self.buffers.resize(width, height);
        }
    }

    /// Fill (when occluding) and outline one device-space face.
    ///
    /// Faces without a plane (fewer than three distinct or only collinear
    /// points) draw nothing.
    pub fn draw_face(&mut self, face: &Face, occlusion: bool) {
        let Some(plane) = Plane::from_face(face) else {
            return;
        };
        let plane = (!plane.is_degenerate()).then_some(plane);

        if occlusion {
            if let Some(plane) = &plane {
                self.fill(face, plane);
            }
        }

        for (a, b) in face.edges() {
            if a == b {
                continue;
            }
            self.draw_edge(a, b, plane.as_ref());
        }
    }

    fn fill(&mut self, face: &Face, plane: &Plane) {
        let (width, height) = self.buffers.size();
        if width == 0 || height == 0 {
            return;
        }
        let polygon: Vec<Vector2<f32>> = face.points.iter().map(xy).collect();

        let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
        let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for v in &polygon {
            min_x = min_x.min(v.x);
            min_y = min_y.min(v.y);
            max_x = max_x.max(v.x);
            max_y = max_y.max(v.y);
        }
        let x_start = (min_x.floor() as i64).max(0);
        let x_end = (max_x.ceil() as i64).min(width as i64 - 1);
        let y_start = (min_y.floor() as i64).max(0);
        let y_end = (max_y.ceil() as i64).min(height as i64 - 1);

        for y in y_start..=y_end {
            for x in x_start..=x_end {
                let pixel = Vector2::new(x as f32, y as f32);
                if self.fill_rule.contains(&polygon, &pixel) {
                    let z = plane.depth_at(pixel.x, pixel.y);
                    self.buffers.write(x as i32, y as i32, z, false);
                }
            }
        }
    }

    fn draw_edge(&mut self, a: &Point, b: &Point, plane: Option<&Plane>) {
        let (width, height) = self.buffers.size();
        if width == 0 || height == 0 {
            return;
        }
        // One pixel of margin keeps the outward rounding at the border unchanged
        let Some((start, end, t0, t1)) = clip_segment(
            &xy(a),
            &xy(b),
            Vector2::new(-1.0, -1.0),
            Vector2::new(width as f32, height as f32),
        ) else {
            return;
        };

        let buffers = &mut self.buffers;
        let (za, zb) = (a[2], b[2]);
        rasterize_line(&start, &end, |x, y, t| {
            let z = match plane {
                Some(plane) => plane.depth_at(x as f32, y as f32),
                None => za + (zb - za) * (t0 + (t1 - t0) * t),
            };
            buffers.write(x, y, z, true);
        });
    }

    /// Emit one point per painted pixel; returns the number emitted
    pub fn flush<S: RenderSurface + ?Sized>(&self, surface: &mut S) -> usize {
        let mut count = 0;
        for (x, y) in self.buffers.painted() {
            surface.draw_point(x as f32, y as f32);
            count += 1;
        }
        count
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new(FillRule::default())
    }
}
