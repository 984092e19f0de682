// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building-mass analysis
//!
//! Per-solid extraction of the geometric inputs an urban canopy model needs:
//! surface classification by normal direction, footprint (robust to
//! overhangs), height, and facade area. Every function takes the host
//! [`GeometryKernel`](crate::kernel::GeometryKernel) and its thresholds
//! explicitly; nothing reads global state.

mod classify;
mod envelope;
mod footprint;

#[cfg(test)]
mod tests;

pub use classify::{
    angle_to_up, classify_surfaces, surface_frame, AngleThresholds, ClassifiedSurface,
    SurfaceClassification, SurfaceGroup, DEFAULT_MAX_FLOOR_ANGLE, DEFAULT_MAX_ROOF_ANGLE,
};
pub use envelope::{extract_facades, extract_height, union_solids, Facades};
pub use footprint::{compute_footprint, detect_self_intersection, Footprint};
