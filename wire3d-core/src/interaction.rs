/// View parameters set by the host and the drag gesture that accumulates panning
use std::f32::consts::PI;
use std::sync::{Arc, Mutex, PoisonError};

use nalgebra::Vector2;

/// Everything a frame needs from the outside world.
///
/// Setters only record the value; callers render afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Rotation about the horizontal axis, in [-pi, pi)
    pub rotation_x: f32,
    /// Rotation about the vertical axis, in [-pi, pi)
    pub rotation_y: f32,
    pub scale: u32,
    /// Screen-space offset accumulated from drags
    pub pan: Vector2<f32>,
    pub occlusion: bool,
}

impl ViewState {
    pub fn new(rotation_x: f32, rotation_y: f32, scale: u32) -> Self {
        Self {
            rotation_x: wrap_angle(rotation_x),
            rotation_y: wrap_angle(rotation_y),
            scale: scale.max(1),
            pan: Vector2::zeros(),
            occlusion: false,
        }
    }

    pub fn set_rotation_x(&mut self, angle: f32) {
        self.rotation_x = wrap_angle(angle);
    }

    pub fn set_rotation_y(&mut self, angle: f32) {
        self.rotation_y = wrap_angle(angle);
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.set_rotation_x(self.rotation_x + dx);
        self.set_rotation_y(self.rotation_y + dy);
    }

    /// Scale is a positive integer; zero is raised to one
    pub fn set_scale(&mut self, scale: u32) {
        self.scale = scale.max(1);
    }

    pub fn set_occlusion(&mut self, enabled: bool) {
        self.occlusion = enabled;
    }

    pub fn toggle_occlusion(&mut self) {
        self.occlusion = !self.occlusion;
    }

    pub fn pan_by(&mut self, delta: Vector2<f32>) {
        self.pan += delta;
    }
}

impl Default for ViewState {
    fn default() -> Self {
        let initial = angle_from_slider(160);
        Self::new(initial, initial, 15)
    }
}

/// Wrap an angle into [-pi, pi)
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(2.0 * PI) - PI;
    // rem_euclid can round up to exactly 2*pi
    if wrapped >= PI {
        -PI
    } else {
        wrapped
    }
}

/// Map a 0..360 degree slider position to an angle in [-pi, pi)
pub fn angle_from_slider(progress: u32) -> f32 {
    wrap_angle((progress as f64 / 180.0 * std::f64::consts::PI - std::f64::consts::PI) as f32)
}

/// Map a 0-based slider position to a scale factor
pub fn scale_from_slider(progress: u32) -> u32 {
    progress.saturating_add(1)
}

/// Turns a stream of pointer positions into pan deltas
#[derive(Debug, Clone, Copy, Default)]
pub struct DragTracker {
    previous: Option<Vector2<f32>>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a gesture; the first sample only sets the baseline
    pub fn begin(&mut self, x: f32, y: f32) {
        self.previous = Some(Vector2::new(x, y));
    }

    /// Feed a pointer sample, returning the delta since the previous one
    pub fn drag_to(&mut self, x: f32, y: f32) -> Option<Vector2<f32>> {
        let current = Vector2::new(x, y);
        let delta = self.previous.map(|prev| current - prev);
        self.previous = Some(current);
        delta
    }

    pub fn end(&mut self) {
        self.previous = None;
    }

    pub fn is_active(&self) -> bool {
        self.previous.is_some()
    }
}

/// View state shared with input threads.
///
/// Renderers call [`SharedViewState::snapshot`] once per frame so a frame never
/// observes a half-applied update.
#[derive(Debug, Clone, Default)]
pub struct SharedViewState {
    inner: Arc<Mutex<ViewState>>,
}

impl SharedViewState {
    pub fn new(view: ViewState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(view)),
        }
    }

    pub fn snapshot(&self) -> ViewState {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_angle_range() {
        for angle in [-10.0, -PI, -1.0, 0.0, 1.0, PI, 3.5, 10.0] {
            let w = wrap_angle(angle);
            assert!((-PI..PI).contains(&w), "{angle} -> {w}");
        }
        assert!((wrap_angle(PI) + PI).abs() < 1e-6);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(wrap_angle(f32::NAN), 0.0);
    }

    #[test]
    fn test_slider_mapping() {
        assert!((angle_from_slider(0) + PI).abs() < 1e-6);
        assert!(angle_from_slider(180).abs() < 1e-6);
        assert!((angle_from_slider(160) + 20f32.to_radians()).abs() < 1e-5);
        assert_eq!(scale_from_slider(0), 1);
        assert_eq!(scale_from_slider(14), 15);
    }

    #[test]
    fn test_scale_stays_positive() {
        let mut view = ViewState::default();
        view.set_scale(0);
        assert_eq!(view.scale, 1);
    }

    #[test]
    fn test_drag_baseline() {
        let mut drag = DragTracker::new();
        assert_eq!(drag.drag_to(5.0, 5.0), None);

        drag.end();
        drag.begin(10.0, 10.0);
        assert_eq!(drag.drag_to(13.0, 8.0), Some(Vector2::new(3.0, -2.0)));
        assert_eq!(drag.drag_to(14.0, 8.0), Some(Vector2::new(1.0, 0.0)));
        drag.end();
        assert!(!drag.is_active());
    }

    #[test]
    fn test_pan_accumulates() {
        let mut view = ViewState::default();
        view.pan_by(Vector2::new(3.0, -2.0));
        view.pan_by(Vector2::new(1.0, 0.0));
        assert_eq!(view.pan, Vector2::new(4.0, -2.0));
    }

    #[test]
    fn test_shared_snapshot_is_a_copy() {
        let shared = SharedViewState::new(ViewState::default());
        let before = shared.snapshot();
        shared.update(|view| view.toggle_occlusion());
        assert!(!before.occlusion);
        assert!(shared.snapshot().occlusion);
    }
}
