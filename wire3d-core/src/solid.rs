/// Faces, solids and the extrusion that builds them from flat profiles
use nalgebra::Matrix4;

use crate::algebra::{transform_points, Point};

/// A closed loop of points; the first point is repeated at the end
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub points: Vec<Point>,
}

impl Face {
    /// Close an open loop of vertices into a drawable face
    pub fn from_loop(vertices: &[Point]) -> Self {
        let mut points = Vec::with_capacity(vertices.len() + 1);
        points.extend_from_slice(vertices);
        if let Some(first) = vertices.first() {
            if vertices.len() > 1 && vertices.last() != Some(first) {
                points.push(*first);
            }
        }
        Self { points }
    }

    /// Consecutive point pairs forming the face outline
    pub fn edges(&self) -> impl Iterator<Item = (&Point, &Point)> {
        self.points.windows(2).map(|w| (&w[0], &w[1]))
    }

    pub fn transformed(&self, m: &Matrix4<f32>) -> Self {
        Self {
            points: transform_points(&self.points, m),
        }
    }
}

/// A prism produced by [`extrude`]
#[derive(Debug, Clone)]
pub struct Solid {
    pub front: Face,
    pub back: Face,
    pub sides: Vec<Face>,
}

impl Solid {
    /// Front cap, back cap, then the side quads in profile order
    pub fn faces(&self) -> impl Iterator<Item = &Face> {
        std::iter::once(&self.front)
            .chain(std::iter::once(&self.back))
            .chain(self.sides.iter())
    }

    pub fn face_count(&self) -> usize {
        self.sides.len() + 2
    }
}

/// Extrude a planar loop by `depth` along z.
///
/// A repeated closing vertex in `profile` is ignored, so both open and closed
/// loops yield one side quad per edge, including the wrap-around edge.
pub fn extrude(profile: &[Point], depth: f32) -> Solid {
    let vertices = open_loop(profile);
    let shifted: Vec<Point> = vertices
        .iter()
        .map(|p| Point::new(p[0], p[1], p[2] + depth, p[3]))
        .collect();

    let n = vertices.len();
    let sides = (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            Face::from_loop(&[vertices[i], vertices[j], shifted[j], shifted[i]])
        })
        .collect();

    Solid {
        front: Face::from_loop(vertices),
        back: Face::from_loop(&shifted),
        sides,
    }
}

fn open_loop(profile: &[Point]) -> &[Point] {
    match profile {
        [first, .., last] if first == last => &profile[..profile.len() - 1],
        _ => profile,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::point;

    fn square() -> Vec<Point> {
        vec![
            point(0.0, 0.0, 0.0),
            point(1.0, 0.0, 0.0),
            point(1.0, 1.0, 0.0),
            point(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_extrude_face_count() {
        let solid = extrude(&square(), 1.0);
        assert_eq!(solid.face_count(), 6);
        assert_eq!(solid.faces().count(), 6);
    }

    #[test]
    fn test_back_face_shifted_in_z_only() {
        let solid = extrude(&square(), -2.5);
        for (f, b) in solid.front.points.iter().zip(&solid.back.points) {
            assert_eq!(f[0], b[0]);
            assert_eq!(f[1], b[1]);
            assert!((b[2] - (f[2] - 2.5)).abs() < 1e-6);
            assert_eq!(f[3], b[3]);
        }
    }

    #[test]
    fn test_closed_profile_matches_open_profile() {
        let mut closed = square();
        closed.push(closed[0]);
        let a = extrude(&square(), 1.0);
        let b = extrude(&closed, 1.0);
        assert_eq!(a.face_count(), b.face_count());
        assert_eq!(a.front, b.front);
    }

    #[test]
    fn test_side_quad_wraps_around() {
        let solid = extrude(&square(), 1.0);
        let last = &solid.sides[3];
        assert_eq!(last.points.len(), 5);
        assert_eq!(last.points[0], point(0.0, 1.0, 0.0));
        assert_eq!(last.points[1], point(0.0, 0.0, 0.0));
        assert_eq!(last.points[2], point(0.0, 0.0, 1.0));
        assert_eq!(last.points[3], point(0.0, 1.0, 1.0));
        assert_eq!(last.points[4], last.points[0]);
    }

    #[test]
    fn test_face_is_closed() {
        let face = Face::from_loop(&square());
        assert_eq!(face.points.first(), face.points.last());
        assert_eq!(face.edges().count(), 4);
    }
}
