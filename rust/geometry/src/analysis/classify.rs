// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roof / floor / wall classification by normal direction

use crate::error::{Error, Result};
use crate::kernel::{GeometryKernel, SurfaceFrame};
use nalgebra::{Point3, Vector3};

/// Default roof threshold: normals within this many degrees of +Z are roofs
pub const DEFAULT_MAX_ROOF_ANGLE: f64 = 45.0;

/// Default floor threshold: normals within this many degrees of -Z are floors
pub const DEFAULT_MAX_FLOOR_ANGLE: f64 = 60.0;

/// Angle thresholds (degrees) separating roofs, floors and walls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleThresholds {
    /// Normal angle from +Z beyond which a surface stops being a roof
    pub max_roof_angle: f64,
    /// Normal angle from -Z beyond which a surface stops being a floor
    pub max_floor_angle: f64,
}

impl AngleThresholds {
    pub fn new(max_roof_angle: f64, max_floor_angle: f64) -> Self {
        Self {
            max_roof_angle,
            max_floor_angle,
        }
    }

    /// Group for a surface whose normal makes `angle` degrees with +Z
    pub fn group_for(&self, angle: f64) -> SurfaceGroup {
        if angle < self.max_roof_angle || angle > 360.0 - self.max_roof_angle {
            SurfaceGroup::Roof
        } else if 180.0 - self.max_floor_angle < angle && angle < 180.0 + self.max_floor_angle {
            SurfaceGroup::Floor
        } else {
            SurfaceGroup::Wall
        }
    }
}

impl Default for AngleThresholds {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ROOF_ANGLE, DEFAULT_MAX_FLOOR_ANGLE)
    }
}

/// Which way a surface faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceGroup {
    Roof,
    Floor,
    Wall,
}

/// A surface with its evaluated frame and angle to the up axis
#[derive(Debug, Clone)]
pub struct ClassifiedSurface<S> {
    /// Position of the surface in the solid's surface list
    pub index: usize,
    pub surface: S,
    /// Evaluation point and outward normal
    pub frame: SurfaceFrame,
    /// Angle between the normal and +Z, in degrees
    pub angle_to_up: f64,
}

impl<S> ClassifiedSurface<S> {
    /// Normalized steepness score `(90 - angle) / 90`:
    /// 1 facing straight up, 0 vertical, -1 facing straight down
    pub fn steepness(&self) -> f64 {
        (90.0 - self.angle_to_up) / 90.0
    }
}

/// Surfaces of one solid split into three disjoint groups
#[derive(Debug, Clone)]
pub struct SurfaceClassification<S> {
    pub roofs: Vec<ClassifiedSurface<S>>,
    pub floors: Vec<ClassifiedSurface<S>>,
    pub walls: Vec<ClassifiedSurface<S>>,
}

impl<S> SurfaceClassification<S> {
    fn new() -> Self {
        Self {
            roofs: Vec::new(),
            floors: Vec::new(),
            walls: Vec::new(),
        }
    }

    /// Total number of classified surfaces
    pub fn len(&self) -> usize {
        self.roofs.len() + self.floors.len() + self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn group(&self, group: SurfaceGroup) -> &[ClassifiedSurface<S>] {
        match group {
            SurfaceGroup::Roof => &self.roofs,
            SurfaceGroup::Floor => &self.floors,
            SurfaceGroup::Wall => &self.walls,
        }
    }

    pub fn roof_steepness(&self) -> Vec<f64> {
        self.roofs.iter().map(ClassifiedSurface::steepness).collect()
    }

    pub fn wall_steepness(&self) -> Vec<f64> {
        self.walls.iter().map(ClassifiedSurface::steepness).collect()
    }

    pub fn floor_normals(&self) -> Vec<Vector3<f64>> {
        self.floors.iter().map(|s| s.frame.normal).collect()
    }

    pub fn floor_centroids(&self) -> Vec<Point3<f64>> {
        self.floors.iter().map(|s| s.frame.point).collect()
    }
}

/// Evaluate a surface's centre point and outward unit normal
///
/// Planar surfaces are evaluated at the midpoint of their parametric domain,
/// curved surfaces at the surface point closest to their area centroid.
pub fn surface_frame<K: GeometryKernel>(kernel: &K, surface: &K::Surface) -> Option<SurfaceFrame> {
    let frame = if kernel.is_planar(surface) {
        kernel.frame_at_domain_center(surface)?
    } else {
        let centroid = kernel.area_centroid(surface)?;
        kernel.frame_at_closest_point(surface, &centroid)?
    };

    let normal = frame.normal.try_normalize(1e-12)?;
    if !(normal.x.is_finite() && normal.y.is_finite() && normal.z.is_finite()) {
        return None;
    }
    Some(SurfaceFrame::new(frame.point, normal))
}

/// Angle in degrees between `normal` and world +Z
pub fn angle_to_up(normal: &Vector3<f64>) -> f64 {
    normal.angle(&Vector3::z()).to_degrees()
}

/// Partition every bounding surface of `solid` into roofs, floors and walls
///
/// Every surface lands in exactly one group. A surface whose normal cannot
/// be evaluated is an error rather than a silent default.
pub fn classify_surfaces<K: GeometryKernel>(
    kernel: &K,
    solid: &K::Solid,
    thresholds: AngleThresholds,
) -> Result<SurfaceClassification<K::Surface>> {
    let mut classification = SurfaceClassification::new();

    for (index, surface) in kernel.surfaces(solid).into_iter().enumerate() {
        let frame = surface_frame(kernel, &surface).ok_or_else(|| {
            Error::degenerate(format!("failed to compute the normal of surface {}", index))
        })?;
        let angle = angle_to_up(&frame.normal);

        let entry = ClassifiedSurface {
            index,
            surface,
            frame,
            angle_to_up: angle,
        };

        match thresholds.group_for(angle) {
            SurfaceGroup::Roof => classification.roofs.push(entry),
            SurfaceGroup::Floor => classification.floors.push(entry),
            SurfaceGroup::Wall => classification.walls.push(entry),
        }
    }

    Ok(classification)
}
