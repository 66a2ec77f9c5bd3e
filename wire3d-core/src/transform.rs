/// Row-vector transform matrices and the per-frame view pipeline
use nalgebra::Matrix4;

use crate::algebra::{transform_points, Point};
use crate::interaction::ViewState;
use crate::solid::Face;

/// Transform builder for row-vector (`p * M`) matrices
pub struct Transform;

impl Transform {
    /// Rotation about the vertical axis
    pub fn rotation_y(angle: f32) -> Matrix4<f32> {
        let (s, c) = angle.sin_cos();
        Matrix4::new(
            c, s, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            -s, 0.0, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Rotation about the horizontal axis
    pub fn rotation_x(angle: f32) -> Matrix4<f32> {
        let (s, c) = angle.sin_cos();
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0, //
            0.0, c, s, 0.0, //
            0.0, -s, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        )
    }

    /// Y rotation followed by X rotation
    pub fn rotation_matrix(view: &ViewState) -> Matrix4<f32> {
        Self::rotation_y(view.rotation_y) * Self::rotation_x(view.rotation_x)
    }

    /// Scale, flip y to the top-down device convention and center on the surface
    pub fn screen_matrix(scale: f32, width: usize, height: usize) -> Matrix4<f32> {
        Matrix4::new(
            scale, 0.0, 0.0, 0.0, //
            0.0, -scale, 0.0, 0.0, //
            0.0, 0.0, scale, 0.0, //
            width as f32 / 2.0, height as f32 / 2.0, 0.0, 1.0,
        )
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new(
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            x, y, z, 1.0,
        )
    }
}

/// The composed model-to-device transform for one frame
#[derive(Debug, Clone, Copy)]
pub struct Pipeline {
    rotate: Matrix4<f32>,
    screen: Matrix4<f32>,
    pan: Matrix4<f32>,
    combined: Matrix4<f32>,
}

impl Pipeline {
    pub fn new(view: &ViewState, width: usize, height: usize) -> Self {
        let rotate = Transform::rotation_matrix(view);
        let screen = Transform::screen_matrix(view.scale as f32, width, height);
        let pan = Transform::translation_matrix(view.pan.x, view.pan.y, 0.0);
        Self {
            rotate,
            screen,
            pan,
            combined: rotate * screen * pan,
        }
    }

    pub fn rotate(&self, points: &[Point]) -> Vec<Point> {
        transform_points(points, &self.rotate)
    }

    pub fn project_to_screen(&self, points: &[Point]) -> Vec<Point> {
        transform_points(points, &self.screen)
    }

    pub fn pan(&self, points: &[Point]) -> Vec<Point> {
        transform_points(points, &self.pan)
    }

    /// `pan(project_to_screen(rotate(points)))` as a single product
    pub fn apply(&self, points: &[Point]) -> Vec<Point> {
        transform_points(points, &self.combined)
    }

    pub fn apply_face(&self, face: &Face) -> Face {
        face.transformed(&self.combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::point;
    use nalgebra::Vector2;

    fn assert_close(a: &Point, b: &Point) {
        assert!((a - b).norm() < 1e-4, "{a} != {b}");
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_matrix(&ViewState::new(0.0, 0.0, 1));
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_screen_centers_and_flips() {
        let view = ViewState::new(0.0, 0.0, 2);
        let pipeline = Pipeline::new(&view, 100, 60);
        let out = pipeline.apply(&[point(0.0, 0.0, 0.0), point(1.0, 1.0, 1.0)]);
        assert_close(&out[0], &point(50.0, 30.0, 0.0));
        assert_close(&out[1], &point(52.0, 28.0, 2.0));
    }

    #[test]
    fn test_pan_is_not_scaled() {
        let mut view = ViewState::new(0.0, 0.0, 10);
        view.pan = Vector2::new(3.0, -4.0);
        let out = Pipeline::new(&view, 0, 0).apply(&[point(0.0, 0.0, 0.0)]);
        assert_close(&out[0], &point(3.0, -4.0, 0.0));
    }

    #[test]
    fn test_combined_matches_staged() {
        let mut view = ViewState::new(0.4, -1.1, 7);
        view.pan = Vector2::new(12.0, 5.0);
        let pipeline = Pipeline::new(&view, 320, 200);
        let pts = [point(1.0, 2.0, 3.0), point(-4.0, 0.5, -2.0)];
        let staged = pipeline.pan(&pipeline.project_to_screen(&pipeline.rotate(&pts)));
        for (a, b) in staged.iter().zip(pipeline.apply(&pts)) {
            assert_close(a, &b);
        }
    }

    #[test]
    fn test_rotation_order_y_then_x() {
        let half_pi = std::f32::consts::FRAC_PI_2;
        let view = ViewState::new(half_pi, half_pi, 1);
        let pipeline = Pipeline::new(&view, 0, 0);
        // y-rotation sends x onto y's slot, then x-rotation sends y onto z
        let out = pipeline.rotate(&[point(1.0, 0.0, 0.0)]);
        assert_close(&out[0], &point(0.0, 0.0, 1.0));
    }
}
