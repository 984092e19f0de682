// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polyhedral building solids
//!
//! A [`Polyhedron`] is a boundary representation made of planar polygon faces
//! (with optional holes) and non-planar tessellated patches. It is the solid
//! type of the reference [`PolyhedralKernel`](crate::kernel::PolyhedralKernel).

use crate::error::{Error, Result};
use crate::kernel::BoundingBox;
use crate::mesh::Mesh;
use crate::profile::Profile2D;
use crate::triangulation::{calculate_polygon_normal, triangulate_polygon_with_holes, PlaneBasis};
use nalgebra::{Point2, Point3, Vector3};
use rustc_hash::FxHashMap;

/// Triangle definition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Point3<f64>,
    pub v1: Point3<f64>,
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Unit normal following the vertex winding, `None` if degenerate
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).try_normalize(1e-12)
    }

    /// Calculate triangle area
    pub fn area(&self) -> f64 {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        edge1.cross(&edge2).norm() * 0.5
    }

    /// Vertex average
    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.v0.coords + self.v1.coords + self.v2.coords) / 3.0)
    }

    /// Closest point on the triangle to `p` (Ericson, Real-Time Collision Detection 5.1.5)
    pub fn closest_point(&self, p: &Point3<f64>) -> Point3<f64> {
        let (a, b, c) = (self.v0, self.v1, self.v2);
        let ab = b - a;
        let ac = c - a;

        let ap = p - a;
        let d1 = ab.dot(&ap);
        let d2 = ac.dot(&ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return a;
        }

        let bp = p - b;
        let d3 = ab.dot(&bp);
        let d4 = ac.dot(&bp);
        if d3 >= 0.0 && d4 <= d3 {
            return b;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return a + ab * v;
        }

        let cp = p - c;
        let d5 = ab.dot(&cp);
        let d6 = ac.dot(&cp);
        if d6 >= 0.0 && d5 <= d6 {
            return c;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return a + ac * w;
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return b + (c - b) * w;
        }

        let denom = 1.0 / (va + vb + vc);
        let v = vb * denom;
        let w = vc * denom;
        a + ab * v + ac * w
    }

    fn ground_profile(&self) -> Profile2D {
        Profile2D::new(vec![ground(&self.v0), ground(&self.v1), ground(&self.v2)])
    }
}

/// Planar polygon face with optional holes
///
/// The outer loop winds counter-clockwise seen from outside the solid, so its
/// Newell normal points outward. Holes wind the opposite way.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarFace {
    outer: Vec<Point3<f64>>,
    holes: Vec<Vec<Point3<f64>>>,
}

impl PlanarFace {
    /// Create a face from its outer loop
    pub fn new(outer: Vec<Point3<f64>>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Create a face with holes
    pub fn with_holes(outer: Vec<Point3<f64>>, holes: Vec<Vec<Point3<f64>>>) -> Self {
        Self { outer, holes }
    }

    pub fn outer(&self) -> &[Point3<f64>] {
        &self.outer
    }

    pub fn holes(&self) -> &[Vec<Point3<f64>>] {
        &self.holes
    }

    /// Outward unit normal, `None` for a degenerate loop
    pub fn normal(&self) -> Option<Vector3<f64>> {
        calculate_polygon_normal(&self.outer)
    }

    fn basis(&self) -> Option<PlaneBasis> {
        let normal = self.normal()?;
        Some(PlaneBasis::new(*self.outer.first()?, &normal))
    }

    /// In-plane profile of the face
    fn plane_profile(&self, basis: &PlaneBasis) -> Profile2D {
        Profile2D::with_holes(
            basis.project_all(&self.outer),
            self.holes.iter().map(|h| basis.project_all(h)).collect(),
        )
    }

    /// Face area (holes subtracted)
    pub fn area(&self) -> f64 {
        match self.basis() {
            Some(basis) => self.plane_profile(&basis).area(),
            None => 0.0,
        }
    }

    /// Centre of the face's parametric domain: the midpoint of the in-plane
    /// bounding rectangle of the outer loop. May lie outside a concave face.
    pub fn domain_center(&self) -> Option<Point3<f64>> {
        let basis = self.basis()?;
        let (min, max) = self.plane_profile(&basis).bounds()?;
        let mid = Point2::new((min.x + max.x) * 0.5, (min.y + max.y) * 0.5);
        Some(basis.unproject(&mid))
    }

    /// Split the face into triangles in its own plane
    pub fn triangulate(&self) -> Result<Vec<Triangle>> {
        let basis = self
            .basis()
            .ok_or_else(|| Error::degenerate("planar face has no normal"))?;
        let profile = self.plane_profile(&basis);
        let indices = triangulate_polygon_with_holes(&profile.outer, &profile.holes)?;

        let points: Vec<Point3<f64>> = self
            .outer
            .iter()
            .chain(self.holes.iter().flatten())
            .cloned()
            .collect();

        let normal = basis.u_axis.cross(&basis.v_axis);
        let triangles = indices
            .chunks_exact(3)
            .map(|tri| {
                let t = Triangle::new(points[tri[0]], points[tri[1]], points[tri[2]]);
                // earcut output winding depends on the projection; keep it outward
                match t.normal() {
                    Some(n) if n.dot(&normal) < 0.0 => Triangle::new(t.v0, t.v2, t.v1),
                    _ => t,
                }
            })
            .collect();

        Ok(triangles)
    }

    /// Orthogonal projection onto the ground (XY) plane
    pub fn ground_profile(&self) -> Profile2D {
        Profile2D::with_holes(
            self.outer.iter().map(ground).collect(),
            self.holes
                .iter()
                .map(|h| h.iter().map(ground).collect())
                .collect(),
        )
    }

    fn loops(&self) -> impl Iterator<Item = &[Point3<f64>]> {
        std::iter::once(self.outer.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }
}

/// Non-planar surface patch given as outward-wound triangles
#[derive(Debug, Clone, PartialEq)]
pub struct PatchFace {
    triangles: Vec<Triangle>,
}

impl PatchFace {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn area(&self) -> f64 {
        self.triangles.iter().map(Triangle::area).sum()
    }

    /// Area-weighted centroid
    pub fn area_centroid(&self) -> Option<Point3<f64>> {
        area_weighted_centroid(&self.triangles)
    }

    /// Closest point on the patch to `target` and the normal of the triangle it lies on
    pub fn closest_frame(&self, target: &Point3<f64>) -> Option<(Point3<f64>, Vector3<f64>)> {
        let mut best: Option<(f64, Point3<f64>, Vector3<f64>)> = None;

        for tri in &self.triangles {
            let Some(normal) = tri.normal() else {
                continue;
            };
            let p = tri.closest_point(target);
            let d = (p - target).norm_squared();
            if best.as_ref().map_or(true, |(bd, _, _)| d < *bd) {
                best = Some((d, p, normal));
            }
        }

        best.map(|(_, p, n)| (p, n))
    }

    /// Ground projection, one profile per triangle
    pub fn ground_profiles(&self) -> Vec<Profile2D> {
        self.triangles.iter().map(Triangle::ground_profile).collect()
    }
}

/// Bounding surface of a [`Polyhedron`]
#[derive(Debug, Clone, PartialEq)]
pub enum Face {
    Planar(PlanarFace),
    Patch(PatchFace),
}

impl Face {
    pub fn is_planar(&self) -> bool {
        matches!(self, Face::Planar(_))
    }

    pub fn area(&self) -> f64 {
        match self {
            Face::Planar(f) => f.area(),
            Face::Patch(p) => p.area(),
        }
    }

    /// Area-weighted centroid
    pub fn area_centroid(&self) -> Option<Point3<f64>> {
        match self {
            Face::Planar(f) => area_weighted_centroid(&f.triangulate().ok()?),
            Face::Patch(p) => p.area_centroid(),
        }
    }

    pub fn triangulate(&self) -> Result<Vec<Triangle>> {
        match self {
            Face::Planar(f) => f.triangulate(),
            Face::Patch(p) => Ok(p.triangles.clone()),
        }
    }

    pub fn ground_profiles(&self) -> Vec<Profile2D> {
        match self {
            Face::Planar(f) => vec![f.ground_profile()],
            Face::Patch(p) => p.ground_profiles(),
        }
    }

    fn points(&self) -> Box<dyn Iterator<Item = &Point3<f64>> + '_> {
        match self {
            Face::Planar(f) => Box::new(f.loops().flatten()),
            Face::Patch(p) => Box::new(p.triangles.iter().flat_map(|t| [&t.v0, &t.v1, &t.v2])),
        }
    }

    fn for_each_edge(&self, mut visit: impl FnMut(&Point3<f64>, &Point3<f64>)) {
        match self {
            Face::Planar(f) => {
                for lp in f.loops() {
                    for i in 0..lp.len() {
                        visit(&lp[i], &lp[(i + 1) % lp.len()]);
                    }
                }
            }
            Face::Patch(p) => {
                for t in &p.triangles {
                    visit(&t.v0, &t.v1);
                    visit(&t.v1, &t.v2);
                    visit(&t.v2, &t.v0);
                }
            }
        }
    }
}

impl From<PlanarFace> for Face {
    fn from(face: PlanarFace) -> Self {
        Face::Planar(face)
    }
}

impl From<PatchFace> for Face {
    fn from(face: PatchFace) -> Self {
        Face::Patch(face)
    }
}

/// Boundary representation of a building mass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyhedron {
    faces: Vec<Face>,
}

impl Polyhedron {
    pub fn new(faces: Vec<Face>) -> Self {
        Self { faces }
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Axis-aligned box with outward-facing faces
    pub fn cuboid(min: Point3<f64>, max: Point3<f64>) -> Self {
        let base = vec![
            Point3::new(min.x, min.y, min.z),
            Point3::new(max.x, min.y, min.z),
            Point3::new(max.x, max.y, min.z),
            Point3::new(min.x, max.y, min.z),
        ];
        Self::prism_unchecked(&base, Vector3::new(0.0, 0.0, max.z - min.z))
    }

    /// Extrude a planar profile along `extrusion`
    ///
    /// The profile may wind either way; faces come out oriented outward.
    pub fn prism(profile: &[Point3<f64>], extrusion: Vector3<f64>) -> Result<Self> {
        let normal = calculate_polygon_normal(profile)
            .ok_or_else(|| Error::InvalidProfile("prism profile is degenerate".to_string()))?;
        if normal.dot(&extrusion).abs() < 1e-12 {
            return Err(Error::InvalidProfile(
                "extrusion direction lies in the profile plane".to_string(),
            ));
        }

        if normal.dot(&extrusion) > 0.0 {
            Ok(Self::prism_unchecked(profile, extrusion))
        } else {
            let reversed: Vec<_> = profile.iter().rev().cloned().collect();
            Ok(Self::prism_unchecked(&reversed, extrusion))
        }
    }

    /// Prism for a profile whose normal already points along `extrusion`
    fn prism_unchecked(profile: &[Point3<f64>], extrusion: Vector3<f64>) -> Self {
        let n = profile.len();
        let top: Vec<Point3<f64>> = profile.iter().map(|p| p + extrusion).collect();
        let bottom: Vec<Point3<f64>> = profile.iter().rev().cloned().collect();

        let mut faces = Vec::with_capacity(n + 2);
        faces.push(PlanarFace::new(bottom).into());
        faces.push(PlanarFace::new(top.clone()).into());

        for i in 0..n {
            let j = (i + 1) % n;
            faces.push(PlanarFace::new(vec![profile[i], profile[j], top[j], top[i]]).into());
        }

        Self { faces }
    }

    /// Copy moved by `offset`
    pub fn translated(&self, offset: Vector3<f64>) -> Self {
        let shift = |p: &Point3<f64>| p + offset;
        let faces = self
            .faces
            .iter()
            .map(|face| match face {
                Face::Planar(f) => Face::Planar(PlanarFace::with_holes(
                    f.outer.iter().map(shift).collect(),
                    f.holes.iter().map(|h| h.iter().map(shift).collect()).collect(),
                )),
                Face::Patch(p) => Face::Patch(PatchFace::new(
                    p.triangles
                        .iter()
                        .map(|t| Triangle::new(shift(&t.v0), shift(&t.v1), shift(&t.v2)))
                        .collect(),
                )),
            })
            .collect();
        Self { faces }
    }

    /// Axis-aligned bounding box, `None` for an empty polyhedron
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut points = self.faces.iter().flat_map(Face::points);
        let first = *points.next()?;
        Some(points.fold(BoundingBox::new(first, first), |mut bbox, p| {
            bbox.include(p);
            bbox
        }))
    }

    /// Closed when every edge (vertices snapped to `tolerance`) is shared by exactly two face loops
    ///
    /// Edges are first split at any vertex of the solid lying on them, so a
    /// long edge meeting several shorter ones (a T-junction) still pairs up.
    pub fn is_closed(&self, tolerance: f64) -> bool {
        if self.faces.is_empty() {
            return false;
        }

        let grid = tolerance.max(f64::EPSILON);
        let key = |p: &Point3<f64>| {
            [
                (p.x / grid).round() as i64,
                (p.y / grid).round() as i64,
                (p.z / grid).round() as i64,
            ]
        };

        let mut distinct: FxHashMap<[i64; 3], Point3<f64>> = FxHashMap::default();
        for p in self.faces.iter().flat_map(Face::points) {
            distinct.entry(key(p)).or_insert(*p);
        }
        let vertices: Vec<([i64; 3], Point3<f64>)> = distinct.into_iter().collect();

        let mut edges: FxHashMap<([i64; 3], [i64; 3]), u32> = FxHashMap::default();
        for face in &self.faces {
            face.for_each_edge(|a, b| {
                let (ka, kb) = (key(a), key(b));
                if ka == kb {
                    return;
                }

                let mut chain = vec![ka];
                chain.extend(vertices_on_segment(a, b, &vertices, grid, [ka, kb]));
                chain.push(kb);

                for pair in chain.windows(2) {
                    let (k0, k1) = (pair[0], pair[1]);
                    if k0 == k1 {
                        continue;
                    }
                    let edge = if k0 < k1 { (k0, k1) } else { (k1, k0) };
                    *edges.entry(edge).or_insert(0) += 1;
                }
            });
        }

        !edges.is_empty() && edges.values().all(|&count| count == 2)
    }

    /// Triangle mesh of every face
    pub fn tessellate(&self) -> Result<Mesh> {
        let mut mesh = Mesh::new();
        for face in &self.faces {
            for tri in face.triangulate()? {
                let a = mesh.add_vertex(tri.v0);
                let b = mesh.add_vertex(tri.v1);
                let c = mesh.add_vertex(tri.v2);
                mesh.add_triangle(a, b, c);
            }
        }

        if mesh.is_empty() {
            return Err(Error::EmptyMesh("polyhedron has no faces".to_string()));
        }
        Ok(mesh)
    }
}

#[inline]
fn ground(p: &Point3<f64>) -> Point2<f64> {
    Point2::new(p.x, p.y)
}

fn area_weighted_centroid(triangles: &[Triangle]) -> Option<Point3<f64>> {
    let mut total = 0.0;
    let mut sum = Vector3::zeros();
    for tri in triangles {
        let a = tri.area();
        total += a;
        sum += tri.centroid().coords * a;
    }

    if total <= 0.0 {
        return None;
    }
    Some(Point3::from(sum / total))
}

/// Keys of `vertices` strictly inside segment `a`-`b`, ordered from `a`
fn vertices_on_segment(
    a: &Point3<f64>,
    b: &Point3<f64>,
    vertices: &[([i64; 3], Point3<f64>)],
    tolerance: f64,
    ends: [[i64; 3]; 2],
) -> Vec<[i64; 3]> {
    let dir = b - a;
    let len2 = dir.norm_squared();
    if len2 <= f64::EPSILON {
        return Vec::new();
    }

    let mut hits: Vec<(f64, [i64; 3])> = vertices
        .iter()
        .filter(|(k, _)| !ends.contains(k))
        .filter_map(|(k, v)| {
            let t = (v - a).dot(&dir) / len2;
            if t <= 0.0 || t >= 1.0 {
                return None;
            }
            let off = (a + dir * t - v).norm();
            (off <= tolerance).then_some((t, *k))
        })
        .collect();

    hits.sort_by(|x, y| x.0.total_cmp(&y.0));
    hits.into_iter().map(|(_, k)| k).collect()
}
