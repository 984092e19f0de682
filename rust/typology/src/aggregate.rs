// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Area-weighted aggregation over a group of building masses

use crate::error::{Error, Result};
use uwg_geometry::{
    compute_footprint, extract_facades, extract_height, union_solids, AngleThresholds,
    ClassifiedSurface, Footprint, GeometryKernel,
};

/// Per-building contribution to the aggregate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingMetrics {
    pub height: f64,
    pub footprint_area: f64,
    /// Share of the total footprint area
    pub weight: f64,
}

/// Geometry summary of a typology
#[derive(Debug, Clone)]
pub struct TypologyGeometry<S> {
    /// Footprint-weighted average height
    pub average_height: f64,
    pub footprint_area: f64,
    /// Wall area of the unioned masses
    pub facade_area: f64,
    /// One entry per input solid, in input order
    pub buildings: Vec<BuildingMetrics>,
    pub footprints: Vec<Footprint>,
    pub facade_surfaces: Vec<ClassifiedSurface<S>>,
}

/// Combines building masses that share a typology
pub struct TypologyAggregator<'k, K: GeometryKernel> {
    kernel: &'k K,
    thresholds: AngleThresholds,
}

impl<'k, K: GeometryKernel> TypologyAggregator<'k, K> {
    pub fn new(kernel: &'k K) -> Self {
        Self::with_thresholds(kernel, AngleThresholds::default())
    }

    pub fn with_thresholds(kernel: &'k K, thresholds: AngleThresholds) -> Self {
        Self { kernel, thresholds }
    }

    pub fn kernel(&self) -> &K {
        self.kernel
    }

    pub fn thresholds(&self) -> AngleThresholds {
        self.thresholds
    }

    /// Heights weighted by footprint share, total footprint, and facade area
    /// of the pairwise-unioned masses
    pub fn aggregate(&self, solids: &[K::Solid]) -> Result<TypologyGeometry<K::Surface>> {
        let mut heights = Vec::with_capacity(solids.len());
        let mut footprints = Vec::with_capacity(solids.len());

        for solid in solids {
            heights.push(extract_height(self.kernel, solid));
            footprints.push(compute_footprint(
                self.kernel,
                solid,
                self.thresholds.max_floor_angle,
            )?);
        }

        let footprint_area: f64 = footprints.iter().map(|f| f.area).sum();
        if !(footprint_area.is_finite() && footprint_area > 0.0) {
            return Err(Error::DegenerateGeometry(format!(
                "total footprint area of {} solids is {}",
                solids.len(),
                footprint_area
            )));
        }

        let buildings: Vec<BuildingMetrics> = heights
            .iter()
            .zip(&footprints)
            .map(|(&height, footprint)| BuildingMetrics {
                height,
                footprint_area: footprint.area,
                weight: footprint.area / footprint_area,
            })
            .collect();
        let average_height: f64 = buildings.iter().map(|b| b.height * b.weight).sum();

        let merged = union_solids(self.kernel, solids);
        let facades = extract_facades(self.kernel, &merged, self.thresholds)?;

        tracing::info!(
            buildings = solids.len(),
            merged = merged.len(),
            average_height,
            footprint_area,
            facade_area = facades.area,
            "aggregated typology geometry"
        );

        Ok(TypologyGeometry {
            average_height,
            footprint_area,
            facade_area: facades.area,
            buildings,
            footprints,
            facade_surfaces: facades.surfaces,
        })
    }
}
