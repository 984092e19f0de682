// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CSG (Constructive Solid Geometry) union of building masses
//!
//! Backed by the csgrs BSP implementation. The result is a polygon soup: each
//! output polygon becomes one planar face, which is all the facade analysis
//! needs (shared interior walls disappear, exterior walls survive).

use crate::solid::{Face, PlanarFace, Polyhedron};
use csgrs::mesh::{polygon::Polygon, vertex::Vertex, Mesh as CSGMesh};
use csgrs::traits::CSG;
use nalgebra::Point3;

/// Boolean union of two polyhedra
///
/// Returns `None` when either operand cannot be tessellated or the result is
/// empty or contains non-finite coordinates.
pub fn union(a: &Polyhedron, b: &Polyhedron) -> Option<Polyhedron> {
    let a_csg = polyhedron_to_csgrs(a)?;
    let b_csg = polyhedron_to_csgrs(b)?;

    let merged = a_csg.union(&b_csg);
    let result = csgrs_to_polyhedron(&merged)?;

    tracing::debug!(
        faces_a = a.faces().len(),
        faces_b = b.faces().len(),
        faces_out = result.faces().len(),
        "CSG union"
    );

    Some(result)
}

/// Convert a polyhedron to csgrs format, one polygon per triangle
fn polyhedron_to_csgrs(solid: &Polyhedron) -> Option<CSGMesh<()>> {
    let mut polygons = Vec::new();

    for face in solid.faces() {
        let triangles = face.triangulate().ok()?;
        for tri in triangles {
            // Skip degenerate triangles to avoid NaN propagation
            let Some(normal) = tri.normal() else {
                continue;
            };
            let vertices = vec![
                Vertex::new(tri.v0, normal),
                Vertex::new(tri.v1, normal),
                Vertex::new(tri.v2, normal),
            ];
            polygons.push(Polygon::new(vertices, None));
        }
    }

    if polygons.is_empty() {
        return None;
    }

    Some(CSGMesh::from_polygons(&polygons, None))
}

/// Convert csgrs output back to a polyhedron
fn csgrs_to_polyhedron(csg_mesh: &CSGMesh<()>) -> Option<Polyhedron> {
    let mut faces = Vec::with_capacity(csg_mesh.polygons.len());

    for polygon in &csg_mesh.polygons {
        if polygon.vertices.len() < 3 {
            continue;
        }

        let points: Vec<Point3<f64>> = polygon
            .vertices
            .iter()
            .map(|v| Point3::new(v.pos[0], v.pos[1], v.pos[2]))
            .collect();

        if points
            .iter()
            .any(|p| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return None;
        }

        let face = PlanarFace::new(points);
        // BSP splitting can leave slivers with no usable normal
        if face.normal().is_some() {
            faces.push(Face::Planar(face));
        }
    }

    if faces.is_empty() {
        return None;
    }

    Some(Polyhedron::new(faces))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn surface_area(solid: &Polyhedron) -> f64 {
        solid.faces().iter().map(Face::area).sum()
    }

    #[test]
    fn test_union_of_overlapping_boxes_removes_interior_area() {
        let a = Polyhedron::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 2.0, 2.0));
        let b = Polyhedron::cuboid(Point3::new(1.0, 1.0, 0.5), Point3::new(3.0, 3.0, 2.5));

        let merged = union(&a, &b).unwrap();

        // Each box has area 24; the union hides a 1x1 cap and two 1x1.5
        // wall strips of each box inside the other.
        let expected = 24.0 + 24.0 - 2.0 * (1.0 + 1.5 + 1.5);
        assert_relative_eq!(surface_area(&merged), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_union_of_touching_boxes_removes_shared_wall() {
        let a = Polyhedron::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Polyhedron::cuboid(Point3::new(1.0, 0.0, 0.0), Point3::new(2.0, 1.0, 1.0));

        let merged = union(&a, &b).unwrap();
        assert_relative_eq!(surface_area(&merged), 10.0, epsilon = 1e-6);
    }

    #[test]
    fn test_union_of_empty_solid_fails() {
        let a = Polyhedron::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        assert!(union(&a, &Polyhedron::default()).is_none());
    }
}
