// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host geometry capability
//!
//! The analysis functions in [`crate::analysis`] never touch a concrete B-rep
//! type. They ask a [`GeometryKernel`] to enumerate surfaces, evaluate normals,
//! tessellate, project and union. Any CAD kernel or mesh library that can
//! answer these questions can drive the pipeline; [`PolyhedralKernel`] is the
//! built-in implementation over [`Polyhedron`].

use crate::csg;
use crate::error::Result;
use crate::mesh::Mesh;
use crate::profile::Profile2D;
use crate::solid::{Face, Polyhedron};
use nalgebra::{Point3, Vector3};

/// Default modeling tolerance (model units, typically metres)
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// Point on a surface together with its outward unit normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceFrame {
    pub point: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl SurfaceFrame {
    pub fn new(point: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { point, normal }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Grow the box to contain `p`
    pub fn include(&mut self, p: &Point3<f64>) {
        self.min = self.min.inf(p);
        self.max = self.max.sup(p);
    }

    /// Vector from min to max corner
    pub fn diagonal(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// True if the boxes overlap or are closer than `tolerance`
    pub fn overlaps(&self, other: &BoundingBox, tolerance: f64) -> bool {
        self.min.x <= other.max.x + tolerance
            && self.max.x >= other.min.x - tolerance
            && self.min.y <= other.max.y + tolerance
            && self.max.y >= other.min.y - tolerance
            && self.min.z <= other.max.z + tolerance
            && self.max.z >= other.min.z - tolerance
    }
}

/// Geometry operations the building analysis needs from its host
///
/// The up axis is world +Z and the ground plane is world XY.
pub trait GeometryKernel {
    /// Closed 3D shape representing one building mass
    type Solid: Clone;
    /// One bounding surface of a solid
    type Surface: Clone;

    /// Modeling tolerance used for tolerance-sensitive comparisons
    fn tolerance(&self) -> f64;

    /// Bounding surfaces of the solid, in a stable order
    fn surfaces(&self, solid: &Self::Solid) -> Vec<Self::Surface>;

    /// Whether the surface is planar
    fn is_planar(&self, surface: &Self::Surface) -> bool;

    /// Frame at the midpoint of the surface's parametric domain
    fn frame_at_domain_center(&self, surface: &Self::Surface) -> Option<SurfaceFrame>;

    /// Area centroid of the surface (may lie off a curved surface)
    fn area_centroid(&self, surface: &Self::Surface) -> Option<Point3<f64>>;

    /// Frame at the surface point closest to `target`
    fn frame_at_closest_point(
        &self,
        surface: &Self::Surface,
        target: &Point3<f64>,
    ) -> Option<SurfaceFrame>;

    /// Surface area
    fn surface_area(&self, surface: &Self::Surface) -> f64;

    /// Orthogonal projection of the surface onto the ground plane
    fn project_surface_to_ground(&self, surface: &Self::Surface) -> Vec<Profile2D>;

    /// Orthogonal projection of every surface of the solid onto the ground plane
    fn project_to_ground(&self, solid: &Self::Solid) -> Vec<Profile2D> {
        self.surfaces(solid)
            .iter()
            .flat_map(|s| self.project_surface_to_ground(s))
            .collect()
    }

    /// Whether the solid is closed (watertight)
    fn is_closed(&self, solid: &Self::Solid) -> bool;

    /// Triangle mesh of the solid
    fn tessellate(&self, solid: &Self::Solid) -> Result<Mesh>;

    /// Axis-aligned bounding box, `None` for an empty solid
    fn bounding_box(&self, solid: &Self::Solid) -> Option<BoundingBox>;

    /// Boolean union of two solids
    ///
    /// Returns the resulting solids (one when merged, two when the inputs do
    /// not touch), or `None` when the operation fails.
    fn union(&self, a: &Self::Solid, b: &Self::Solid) -> Option<Vec<Self::Solid>>;
}

/// Reference kernel over [`Polyhedron`] solids
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolyhedralKernel {
    tolerance: f64,
}

impl PolyhedralKernel {
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_TOLERANCE)
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl Default for PolyhedralKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryKernel for PolyhedralKernel {
    type Solid = Polyhedron;
    type Surface = Face;

    fn tolerance(&self) -> f64 {
        self.tolerance
    }

    fn surfaces(&self, solid: &Polyhedron) -> Vec<Face> {
        solid.faces().to_vec()
    }

    fn is_planar(&self, surface: &Face) -> bool {
        surface.is_planar()
    }

    fn frame_at_domain_center(&self, surface: &Face) -> Option<SurfaceFrame> {
        match surface {
            Face::Planar(f) => Some(SurfaceFrame::new(f.domain_center()?, f.normal()?)),
            // Tessellated patches carry no parametric domain
            Face::Patch(_) => None,
        }
    }

    fn area_centroid(&self, surface: &Face) -> Option<Point3<f64>> {
        surface.area_centroid()
    }

    fn frame_at_closest_point(&self, surface: &Face, target: &Point3<f64>) -> Option<SurfaceFrame> {
        match surface {
            Face::Planar(f) => {
                let normal = f.normal()?;
                let origin = f.outer().first()?;
                // Drop the target onto the face plane
                let offset = (target - origin).dot(&normal);
                Some(SurfaceFrame::new(target - normal * offset, normal))
            }
            Face::Patch(p) => {
                let (point, normal) = p.closest_frame(target)?;
                Some(SurfaceFrame::new(point, normal))
            }
        }
    }

    fn surface_area(&self, surface: &Face) -> f64 {
        surface.area()
    }

    fn project_surface_to_ground(&self, surface: &Face) -> Vec<Profile2D> {
        surface.ground_profiles()
    }

    fn is_closed(&self, solid: &Polyhedron) -> bool {
        solid.is_closed(self.tolerance)
    }

    fn tessellate(&self, solid: &Polyhedron) -> Result<Mesh> {
        solid.tessellate()
    }

    fn bounding_box(&self, solid: &Polyhedron) -> Option<BoundingBox> {
        solid.bounding_box()
    }

    fn union(&self, a: &Polyhedron, b: &Polyhedron) -> Option<Vec<Polyhedron>> {
        let (box_a, box_b) = (a.bounding_box()?, b.bounding_box()?);
        if !box_a.overlaps(&box_b, self.tolerance) {
            return Some(vec![a.clone(), b.clone()]);
        }

        csg::union(a, b).map(|merged| vec![merged])
    }
}
