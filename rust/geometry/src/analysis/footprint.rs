// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Footprint extraction with overhang detection

use super::classify::{classify_surfaces, AngleThresholds, ClassifiedSurface};
use crate::bool2d::{total_area, union_profiles};
use crate::error::{Error, Result};
use crate::kernel::GeometryKernel;
use crate::mesh::Mesh;
use crate::profile::Profile2D;
use crate::ray::Ray;

/// Ground footprint of one solid
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    /// Occupied ground area (square model units)
    pub area: f64,
    /// Ground outline after union
    pub outline: Vec<Profile2D>,
    /// The solid overhangs part of itself
    pub self_intersecting: bool,
}

/// True when a ray cast from any floor along its downward normal hits the
/// mesh further away than `tolerance`
///
/// Hits closer than the tolerance come from the floor's own triangles and
/// are ignored.
pub fn detect_self_intersection<S>(
    mesh: &Mesh,
    floors: &[ClassifiedSurface<S>],
    tolerance: f64,
) -> bool {
    let mut overhangs = 0usize;
    for floor in floors {
        let ray = Ray::new(floor.frame.point, floor.frame.normal);
        if let Some(distance) = mesh.ray_hit_distance(&ray, tolerance) {
            tracing::trace!(surface = floor.index, distance, "floor ray hit");
            overhangs += 1;
        }
    }
    overhangs > 0
}

/// Compute the footprint of a closed solid
///
/// When no floor overhangs another part of the solid, the whole solid is
/// projected onto the ground and half the projected area is taken (every
/// ground point is covered once from above and once from below). Otherwise
/// only the downward-facing surfaces are projected and unioned, so area under
/// a cantilever is credited once.
pub fn compute_footprint<K: GeometryKernel>(
    kernel: &K,
    solid: &K::Solid,
    max_floor_angle: f64,
) -> Result<Footprint> {
    if !kernel.is_closed(solid) {
        return Err(Error::degenerate("footprint requires a closed solid"));
    }

    let tolerance = kernel.tolerance();
    let thresholds = AngleThresholds {
        max_floor_angle,
        ..AngleThresholds::default()
    };
    let classification = classify_surfaces(kernel, solid, thresholds)?;
    let mesh = kernel.tessellate(solid)?;

    let self_intersecting = detect_self_intersection(&mesh, &classification.floors, tolerance);

    let footprint = if self_intersecting {
        let projected: Vec<Profile2D> = classification
            .floors
            .iter()
            .flat_map(|floor| kernel.project_surface_to_ground(&floor.surface))
            .collect();
        let outline = union_profiles(&projected, tolerance);
        Footprint {
            area: total_area(&outline),
            outline,
            self_intersecting,
        }
    } else {
        let projected = kernel.project_to_ground(solid);
        let area = projected.iter().map(Profile2D::area).sum::<f64>() * 0.5;
        Footprint {
            area,
            outline: union_profiles(&projected, tolerance),
            self_intersecting,
        }
    };

    if !(footprint.area.is_finite() && footprint.area > 0.0) {
        return Err(Error::degenerate(format!(
            "solid has no footprint (area {})",
            footprint.area
        )));
    }

    tracing::debug!(
        area = footprint.area,
        floors = classification.floors.len(),
        self_intersecting,
        "footprint"
    );

    Ok(footprint)
}
