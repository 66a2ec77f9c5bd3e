/// The vehicle model: named profiles and the solids extruded from them
use crate::algebra::{point, Point};
use crate::solid::{extrude, Solid};

/// Shared vertex table for the side silhouette of the car, in model units
const VERTICES: [(f32, f32); 28] = [
    // Body outline
    (28.0, 0.0),
    (28.0, -8.0),
    (18.0, -8.0),
    (14.0, 0.0),
    (6.0, 0.0),
    (2.0, -8.0),
    (-2.0, -8.0),
    (-6.0, 0.0),
    (-14.0, 0.0),
    (-18.0, -8.0),
    (-24.0, -8.0),
    (-24.0, 0.0),
    (-20.0, 0.0),
    (-16.0, 14.0),
    (10.0, 14.0),
    (24.0, 0.0),
    // Front wheel hexagon
    (18.0, -10.0),
    (14.0, -2.0),
    (6.0, -2.0),
    (2.0, -10.0),
    (6.0, -18.0),
    (14.0, -18.0),
    // Rear wheel hexagon
    (-2.0, -10.0),
    (-6.0, -2.0),
    (-14.0, -2.0),
    (-18.0, -10.0),
    (-14.0, -18.0),
    (-6.0, -18.0),
];

const BODY: [usize; 16] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];
const FRONT_WHEEL: [usize; 6] = [16, 17, 18, 19, 20, 21];
const REAR_WHEEL: [usize; 6] = [22, 23, 24, 25, 26, 27];

/// Extrusion depth of the car body
pub const BODY_DEPTH: f32 = -40.0;
/// Thickness of each wheel
pub const WHEEL_THICKNESS: f32 = 5.0;

/// A flat vertex loop placed at some z
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub points: Vec<Point>,
}

impl Profile {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    fn from_indices(indices: &[usize]) -> Self {
        let points = indices
            .iter()
            .map(|&i| {
                let (x, y) = VERTICES[i];
                point(x, y, 0.0)
            })
            .collect();
        Self { points }
    }

    /// The same loop moved along z
    pub fn offset_z(&self, dz: f32) -> Self {
        let points = self
            .points
            .iter()
            .map(|p| Point::new(p[0], p[1], p[2] + dz, p[3]))
            .collect();
        Self { points }
    }
}

/// A profile together with the depth it is extruded by
#[derive(Debug, Clone)]
pub struct SolidSpec {
    pub name: String,
    pub profile: Profile,
    pub depth: f32,
}

/// A solid built for one frame, addressed by name
#[derive(Debug, Clone)]
pub struct NamedSolid {
    pub name: String,
    pub solid: Solid,
}

/// An ordered set of extrusions; order fixes the draw order
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub specs: Vec<SolidSpec>,
}

impl Model {
    pub fn new() -> Self {
        Self { specs: Vec::new() }
    }

    pub fn with_solid(mut self, name: &str, profile: Profile, depth: f32) -> Self {
        self.specs.push(SolidSpec {
            name: name.to_string(),
            profile,
            depth,
        });
        self
    }

    /// The car body plus near and far wheel pairs
    pub fn vehicle() -> Self {
        let body = Profile::from_indices(&BODY);
        let front_wheel = Profile::from_indices(&FRONT_WHEEL);
        let rear_wheel = Profile::from_indices(&REAR_WHEEL);

        Self::new()
            .with_solid("body", body, BODY_DEPTH)
            .with_solid("front-wheel-near", front_wheel.clone(), -WHEEL_THICKNESS)
            .with_solid("rear-wheel-near", rear_wheel.clone(), -WHEEL_THICKNESS)
            .with_solid(
                "front-wheel-far",
                front_wheel.offset_z(BODY_DEPTH),
                WHEEL_THICKNESS,
            )
            .with_solid(
                "rear-wheel-far",
                rear_wheel.offset_z(BODY_DEPTH),
                WHEEL_THICKNESS,
            )
    }

    /// Extrude every profile; solids are rebuilt each frame
    pub fn build(&self) -> Vec<NamedSolid> {
        self.specs
            .iter()
            .map(|spec| NamedSolid {
                name: spec.name.clone(),
                solid: extrude(&spec.profile.points, spec.depth),
            })
            .collect()
    }

    pub fn solid(&self, name: &str) -> Option<Solid> {
        self.specs
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| extrude(&spec.profile.points, spec.depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_solids() {
        let solids = Model::vehicle().build();
        let names: Vec<&str> = solids.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "body",
                "front-wheel-near",
                "rear-wheel-near",
                "front-wheel-far",
                "rear-wheel-far"
            ]
        );
        assert_eq!(solids[0].solid.face_count(), 18);
        assert_eq!(solids[1].solid.face_count(), 8);
    }

    #[test]
    fn test_far_wheel_sits_behind_body() {
        let model = Model::vehicle();
        let far = model.solid("front-wheel-far").unwrap();
        assert!(far.front.points.iter().all(|p| (p[2] + 40.0).abs() < 1e-6));
        assert!(far.back.points.iter().all(|p| (p[2] + 35.0).abs() < 1e-6));

        let near = model.solid("front-wheel-near").unwrap();
        assert!(near.back.points.iter().all(|p| (p[2] + 5.0).abs() < 1e-6));
    }

    #[test]
    fn test_unknown_solid() {
        assert!(Model::vehicle().solid("spoiler").is_none());
    }
}
