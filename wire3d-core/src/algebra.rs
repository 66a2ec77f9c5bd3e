/// Homogeneous points and the small amount of vector math the rasterizer needs
use nalgebra::{Matrix4, RowVector4, Vector2};

/// A homogeneous model- or screen-space point, used as a row vector (`p' = p * M`)
pub type Point = RowVector4<f32>;

/// Build a homogeneous point with `w = 1`
pub fn point(x: f32, y: f32, z: f32) -> Point {
    Point::new(x, y, z, 1.0)
}

/// Apply a row-major transform to a single point
pub fn transform_point(p: &Point, m: &Matrix4<f32>) -> Point {
    p * m
}

/// Apply a row-major transform to every point of a loop
pub fn transform_points(points: &[Point], m: &Matrix4<f32>) -> Vec<Point> {
    points.iter().map(|p| transform_point(p, m)).collect()
}

/// The x/y part of a point, for screen-space tests
pub fn xy(p: &Point) -> Vector2<f32> {
    Vector2::new(p[0], p[1])
}

/// 2D difference `a - b`
pub fn sub2(a: &Vector2<f32>, b: &Vector2<f32>) -> Vector2<f32> {
    a - b
}

/// Signed area term `a.x * b.y - b.x * a.y`, evaluated in f64
pub fn perp_dot(a: &Vector2<f32>, b: &Vector2<f32>) -> f64 {
    a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_vector_multiply() {
        let m = Matrix4::new(
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            5.0, -3.0, 2.0, 1.0,
        );
        let p = transform_point(&point(1.0, 2.0, 3.0), &m);
        assert!((p[0] - 6.0).abs() < 1e-6);
        assert!((p[1] + 1.0).abs() < 1e-6);
        assert!((p[2] - 5.0).abs() < 1e-6);
        assert!((p[3] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_perp_dot_sign() {
        let a = Vector2::new(1.0, 0.0);
        let b = Vector2::new(0.0, 1.0);
        assert_eq!(perp_dot(&a, &b), 1.0);
        assert_eq!(perp_dot(&b, &a), -1.0);
        assert_eq!(perp_dot(&a, &a), 0.0);
    }

    #[test]
    fn test_sub2() {
        let d = sub2(&Vector2::new(3.0, 5.0), &Vector2::new(1.0, 7.0));
        assert_eq!(d, Vector2::new(2.0, -2.0));
    }
}
