// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! UWG Geometry
//!
//! Building-mass analysis for urban typologies: roof/floor/wall
//! classification, overhang-aware footprints, heights and facade areas,
//! computed against an abstract [`GeometryKernel`]. Ships a polyhedral
//! reference kernel using earcutr triangulation, i_overlay 2D booleans,
//! csgrs solid union and nalgebra math.

pub mod analysis;
pub mod bool2d;
pub mod csg;
pub mod error;
pub mod kernel;
pub mod mesh;
pub mod profile;
pub mod ray;
pub mod solid;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use analysis::{
    classify_surfaces, compute_footprint, extract_facades, extract_height, union_solids,
    AngleThresholds, ClassifiedSurface, Facades, Footprint, SurfaceClassification, SurfaceGroup,
    DEFAULT_MAX_FLOOR_ANGLE, DEFAULT_MAX_ROOF_ANGLE,
};
pub use error::{Error, Result};
pub use kernel::{BoundingBox, GeometryKernel, PolyhedralKernel, SurfaceFrame, DEFAULT_TOLERANCE};
pub use mesh::Mesh;
pub use profile::Profile2D;
pub use solid::{Face, PatchFace, PlanarFace, Polyhedron, Triangle};
