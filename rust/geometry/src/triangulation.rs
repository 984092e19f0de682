// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon triangulation utilities
//!
//! Wrapper around earcutr for 2D polygon triangulation, plus the plane
//! projection helpers needed to triangulate 3D faces in their own plane.

use crate::{Error, Point2, Point3, Result, Vector3};

/// Normals shorter than this are considered degenerate
const NORMAL_EPSILON: f64 = 1e-12;

/// Check if a polygon is convex: all cross products share a sign and the
/// boundary turns exactly once (a pentagram turns twice)
#[inline]
fn is_convex(points: &[Point2<f64>]) -> bool {
    if points.len() < 3 {
        return false;
    }

    let n = points.len();
    let mut sign = 0i8;
    let mut turning = 0.0_f64;

    for i in 0..n {
        let p0 = &points[i];
        let p1 = &points[(i + 1) % n];
        let p2 = &points[(i + 2) % n];

        let (e0, e1) = (p1 - p0, p2 - p1);
        let cross = e0.x * e1.y - e0.y * e1.x;
        turning += cross.atan2(e0.dot(&e1));

        if cross.abs() > 1e-10 {
            let current_sign = if cross > 0.0 { 1i8 } else { -1i8 };
            if sign == 0 {
                sign = current_sign;
            } else if sign != current_sign {
                return false;
            }
        }
    }

    (turning.abs() - std::f64::consts::TAU).abs() < 1e-6
}

/// Simple fan triangulation for convex polygons
#[inline]
fn fan_triangulate(n: usize) -> Vec<usize> {
    let mut indices = Vec::with_capacity((n - 2) * 3);
    for i in 1..n - 1 {
        indices.push(0);
        indices.push(i);
        indices.push(i + 1);
    }
    indices
}

/// Triangulate a simple polygon (no holes)
/// Returns triangle indices into the input points
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<usize>> {
    let n = points.len();

    if n < 3 {
        return Err(Error::TriangulationError(
            "Need at least 3 points to triangulate".to_string(),
        ));
    }

    if n == 3 {
        return Ok(vec![0, 1, 2]);
    }

    if n <= 8 && is_convex(points) {
        return Ok(fan_triangulate(n));
    }

    let mut vertices = Vec::with_capacity(n * 2);
    for p in points {
        vertices.push(p.x);
        vertices.push(p.y);
    }

    earcutr::earcut(&vertices, &[], 2).map_err(|e| Error::TriangulationError(format!("{:?}", e)))
}

/// Triangulate a polygon with holes
/// Returns triangle indices into the combined vertex array (outer + all holes)
pub fn triangulate_polygon_with_holes(
    outer: &[Point2<f64>],
    holes: &[Vec<Point2<f64>>],
) -> Result<Vec<usize>> {
    if outer.len() < 3 {
        return Err(Error::TriangulationError(
            "Need at least 3 points in outer boundary".to_string(),
        ));
    }

    if holes.is_empty() {
        return triangulate_polygon(outer);
    }

    if let Some(bad) = holes.iter().position(|h| h.len() < 3) {
        return Err(Error::TriangulationError(format!(
            "Hole {} has fewer than 3 points",
            bad
        )));
    }

    let total_points: usize = outer.len() + holes.iter().map(|h| h.len()).sum::<usize>();
    let mut vertices = Vec::with_capacity(total_points * 2);

    for p in outer {
        vertices.push(p.x);
        vertices.push(p.y);
    }

    let mut hole_indices = Vec::with_capacity(holes.len());
    for hole in holes {
        hole_indices.push(vertices.len() / 2);
        for p in hole {
            vertices.push(p.x);
            vertices.push(p.y);
        }
    }

    earcutr::earcut(&vertices, &hole_indices, 2)
        .map_err(|e| Error::TriangulationError(format!("{:?}", e)))
}

/// In-plane coordinate system of a planar polygon
#[derive(Debug, Clone, Copy)]
pub struct PlaneBasis {
    pub origin: Point3<f64>,
    pub u_axis: Vector3<f64>,
    pub v_axis: Vector3<f64>,
}

impl PlaneBasis {
    /// Build a basis on the plane through `origin` with unit `normal`
    pub fn new(origin: Point3<f64>, normal: &Vector3<f64>) -> Self {
        // Use the axis least parallel to the normal for a stable cross product
        let abs_x = normal.x.abs();
        let abs_y = normal.y.abs();
        let abs_z = normal.z.abs();

        let reference = if abs_x <= abs_y && abs_x <= abs_z {
            Vector3::new(1.0, 0.0, 0.0)
        } else if abs_y <= abs_z {
            Vector3::new(0.0, 1.0, 0.0)
        } else {
            Vector3::new(0.0, 0.0, 1.0)
        };

        let u_axis = normal.cross(&reference).normalize();
        let v_axis = normal.cross(&u_axis).normalize();

        Self {
            origin,
            u_axis,
            v_axis,
        }
    }

    /// Project a 3D point into plane coordinates
    #[inline]
    pub fn project(&self, point: &Point3<f64>) -> Point2<f64> {
        let v = point - self.origin;
        Point2::new(v.dot(&self.u_axis), v.dot(&self.v_axis))
    }

    /// Map plane coordinates back to 3D
    #[inline]
    pub fn unproject(&self, point: &Point2<f64>) -> Point3<f64> {
        self.origin + self.u_axis * point.x + self.v_axis * point.y
    }

    /// Project a list of points
    pub fn project_all(&self, points: &[Point3<f64>]) -> Vec<Point2<f64>> {
        points.iter().map(|p| self.project(p)).collect()
    }
}

/// Calculate the normal of a polygon with Newell's method
///
/// Works for convex and concave planar polygons. The direction follows the
/// right-hand rule relative to the vertex order. Returns `None` for
/// degenerate (collinear or zero-area) input.
pub fn calculate_polygon_normal(points: &[Point3<f64>]) -> Option<Vector3<f64>> {
    let n = points.len();
    if n < 3 {
        return None;
    }

    let mut normal = Vector3::<f64>::zeros();

    for i in 0..n {
        let current = &points[i];
        let next = &points[(i + 1) % n];

        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }

    normal.try_normalize(NORMAL_EPSILON)
}
