// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::*;
use crate::error::{Error, Result};
use crate::kernel::{BoundingBox, GeometryKernel, PolyhedralKernel, SurfaceFrame};
use crate::mesh::Mesh;
use crate::profile::Profile2D;
use crate::solid::{Face, PatchFace, Polyhedron, Triangle};
use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};

/// Delegates to [`PolyhedralKernel`] but every union fails
struct NoUnionKernel(PolyhedralKernel);

impl GeometryKernel for NoUnionKernel {
    type Solid = Polyhedron;
    type Surface = Face;

    fn tolerance(&self) -> f64 {
        self.0.tolerance()
    }

    fn surfaces(&self, solid: &Polyhedron) -> Vec<Face> {
        self.0.surfaces(solid)
    }

    fn is_planar(&self, surface: &Face) -> bool {
        self.0.is_planar(surface)
    }

    fn frame_at_domain_center(&self, surface: &Face) -> Option<SurfaceFrame> {
        self.0.frame_at_domain_center(surface)
    }

    fn area_centroid(&self, surface: &Face) -> Option<Point3<f64>> {
        self.0.area_centroid(surface)
    }

    fn frame_at_closest_point(&self, surface: &Face, target: &Point3<f64>) -> Option<SurfaceFrame> {
        self.0.frame_at_closest_point(surface, target)
    }

    fn surface_area(&self, surface: &Face) -> f64 {
        self.0.surface_area(surface)
    }

    fn project_surface_to_ground(&self, surface: &Face) -> Vec<Profile2D> {
        self.0.project_surface_to_ground(surface)
    }

    fn is_closed(&self, solid: &Polyhedron) -> bool {
        self.0.is_closed(solid)
    }

    fn tessellate(&self, solid: &Polyhedron) -> Result<Mesh> {
        self.0.tessellate(solid)
    }

    fn bounding_box(&self, solid: &Polyhedron) -> Option<BoundingBox> {
        self.0.bounding_box(solid)
    }

    fn union(&self, _a: &Polyhedron, _b: &Polyhedron) -> Option<Vec<Polyhedron>> {
        None
    }
}

fn unit_box_at(x: f64) -> Polyhedron {
    Polyhedron::cuboid(Point3::new(x, 0.0, 0.0), Point3::new(x + 1.0, 1.0, 1.0))
}

/// Unit box whose flat top is replaced by a shallow pyramid patch
fn tent() -> Polyhedron {
    let cuboid = Polyhedron::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
    let corners = [
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(0.0, 1.0, 1.0),
    ];
    let apex = Point3::new(0.5, 0.5, 1.2);
    let roof = PatchFace::new(
        (0..4)
            .map(|i| Triangle::new(corners[i], corners[(i + 1) % 4], apex))
            .collect(),
    );

    let mut faces = vec![cuboid.faces()[0].clone()];
    faces.extend(cuboid.faces()[2..].iter().cloned());
    faces.push(roof.into());
    Polyhedron::new(faces)
}

#[test]
fn test_patch_roof_uses_closest_point_frame() {
    let kernel = PolyhedralKernel::new();
    let solid = tent();
    assert!(kernel.is_closed(&solid));

    let classes = classify_surfaces(&kernel, &solid, AngleThresholds::default()).unwrap();
    assert_eq!(classes.roofs.len(), 1);
    assert_eq!(classes.floors.len(), 1);
    assert_eq!(classes.walls.len(), 4);

    let roof = &classes.roofs[0];
    let expected = (0.2f64 / 0.5).atan().to_degrees();
    assert_relative_eq!(roof.angle_to_up, expected, epsilon = 1e-9);
    assert_relative_eq!(roof.frame.normal.norm(), 1.0, epsilon = 1e-12);
}

#[test]
fn test_strict_roof_threshold_turns_pitched_roof_into_wall() {
    let kernel = PolyhedralKernel::new();
    let classes = classify_surfaces(&kernel, &tent(), AngleThresholds::new(10.0, 60.0)).unwrap();
    assert!(classes.roofs.is_empty());
    assert_eq!(classes.walls.len(), 5);
    assert_eq!(classes.len(), 6);
}

#[test]
fn test_patch_roof_footprint_and_height() {
    let kernel = PolyhedralKernel::new();
    let solid = tent();

    let footprint = compute_footprint(&kernel, &solid, DEFAULT_MAX_FLOOR_ANGLE).unwrap();
    assert!(!footprint.self_intersecting);
    assert_relative_eq!(footprint.area, 1.0, epsilon = 1e-9);
    assert_relative_eq!(extract_height(&kernel, &solid), 1.2, epsilon = 1e-12);
}

#[test]
fn test_degenerate_face_fails_classification() {
    let kernel = PolyhedralKernel::new();
    let sliver = crate::solid::PlanarFace::new(vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
    ]);
    let solid = Polyhedron::new(vec![sliver.into()]);

    let err = classify_surfaces(&kernel, &solid, AngleThresholds::default()).unwrap_err();
    assert!(matches!(err, Error::DegenerateGeometry(_)));
}

#[test]
fn test_failed_union_keeps_pair() {
    let kernel = NoUnionKernel(PolyhedralKernel::new());
    let solids = vec![unit_box_at(0.0), unit_box_at(0.5), unit_box_at(4.0)];

    let merged = union_solids(&kernel, &solids);
    assert_eq!(merged, solids);
}

#[test]
fn test_self_intersection_ignores_own_floor() {
    let kernel = PolyhedralKernel::new();
    let solid = unit_box_at(0.0);
    let classes = classify_surfaces(&kernel, &solid, AngleThresholds::default()).unwrap();
    let mesh = kernel.tessellate(&solid).unwrap();

    assert!(!detect_self_intersection(&mesh, &classes.floors, kernel.tolerance()));

    // A floor lifted above the box looks down onto its roof
    let mut floors = classes.floors.clone();
    floors[0].frame = SurfaceFrame::new(Point3::new(0.5, 0.5, 3.0), -Vector3::z());
    assert!(detect_self_intersection(&mesh, &floors, kernel.tolerance()));
}

#[test]
fn test_flat_solid_has_zero_height() {
    let kernel = PolyhedralKernel::new();
    let flat = Polyhedron::cuboid(Point3::new(0.0, 0.0, 2.0), Point3::new(1.0, 1.0, 2.0));
    assert_eq!(extract_height(&kernel, &flat), 0.0);
    assert_eq!(extract_height(&kernel, &Polyhedron::default()), 0.0);
}
