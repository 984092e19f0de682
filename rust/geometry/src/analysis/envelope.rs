// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Height, facade and solid-merging helpers

use super::classify::{classify_surfaces, AngleThresholds, ClassifiedSurface};
use crate::error::Result;
use crate::kernel::GeometryKernel;

/// Vertical extent of the solid's bounding box
///
/// Flat or empty solids give 0; callers treat that as malformed input.
pub fn extract_height<K: GeometryKernel>(kernel: &K, solid: &K::Solid) -> f64 {
    kernel
        .bounding_box(solid)
        .map(|bbox| bbox.diagonal().z.max(0.0))
        .unwrap_or(0.0)
}

/// Wall surfaces of a group of solids and their summed area
#[derive(Debug, Clone)]
pub struct Facades<S> {
    pub area: f64,
    pub surfaces: Vec<ClassifiedSurface<S>>,
}

/// Collect and sum the wall surfaces of every solid
pub fn extract_facades<K: GeometryKernel>(
    kernel: &K,
    solids: &[K::Solid],
    thresholds: AngleThresholds,
) -> Result<Facades<K::Surface>> {
    let mut area = 0.0;
    let mut surfaces = Vec::new();

    for solid in solids {
        let classification = classify_surfaces(kernel, solid, thresholds)?;
        for wall in classification.walls {
            area += kernel.surface_area(&wall.surface);
            surfaces.push(wall);
        }
    }

    Ok(Facades { area, surfaces })
}

/// Union adjacent pairs of solids (0 with 1, 2 with 3, ...)
///
/// A pair whose union fails is kept unmerged. An odd trailing solid passes
/// through untouched.
pub fn union_solids<K: GeometryKernel>(kernel: &K, solids: &[K::Solid]) -> Vec<K::Solid> {
    let mut merged = Vec::with_capacity(solids.len());

    for pair in solids.chunks(2) {
        match pair {
            [a, b] => match kernel.union(a, b) {
                Some(result) if !result.is_empty() => merged.extend(result),
                _ => {
                    tracing::warn!("solid union failed, keeping the pair unmerged");
                    merged.push(a.clone());
                    merged.push(b.clone());
                }
            },
            [single] => merged.push(single.clone()),
            _ => {}
        }
    }

    tracing::debug!(input = solids.len(), output = merged.len(), "union_solids");
    merged
}
