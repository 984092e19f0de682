// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Boolean Operations for Ground-Plane Footprints
//!
//! Floor surfaces projected onto the ground plane are merged with the i_overlay
//! crate into a single combined shape. Inputs are snapped to the modeling
//! tolerance grid first so that edges shared within tolerance fuse instead of
//! leaving slivers.

use crate::profile::Profile2D;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

/// Minimum area threshold - polygons smaller than this are considered degenerate
const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// Union a set of 2D profiles into non-overlapping profiles
///
/// Outer boundaries are forced counter-clockwise and holes clockwise so the
/// NonZero fill rule credits every covered point exactly once, including a
/// hole in one profile that another profile covers. Degenerate contours
/// (e.g. walls projected edge-on) are dropped before the overlay.
///
/// # Arguments
/// * `profiles` - Profiles to merge
/// * `tolerance` - Snapping grid size; `0.0` disables snapping
pub fn union_profiles(profiles: &[Profile2D], tolerance: f64) -> Vec<Profile2D> {
    let mut paths_per_profile: Vec<Vec<Vec<[f64; 2]>>> = profiles
        .iter()
        .filter_map(|p| profile_to_paths(p, tolerance))
        .collect();

    if paths_per_profile.is_empty() {
        return Vec::new();
    }

    let subject = paths_per_profile.remove(0);
    let clip: Vec<Vec<[f64; 2]>> = paths_per_profile.into_iter().flatten().collect();

    let result = subject.overlay(&clip, OverlayRule::Union, FillRule::NonZero);

    shapes_to_profiles(&result)
}

/// Total area of a set of non-overlapping profiles
pub fn total_area(profiles: &[Profile2D]) -> f64 {
    profiles.iter().map(Profile2D::area).sum()
}

/// Check if a contour is valid (has area, not degenerate)
pub fn is_valid_contour(contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    compute_signed_area(contour).abs() > MIN_AREA_THRESHOLD
}

/// Compute the signed area of a 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn compute_signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }

    area * 0.5
}

/// Ensure contour has counter-clockwise winding (positive area)
pub fn ensure_ccw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if compute_signed_area(contour) < 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Ensure contour has clockwise winding (for holes)
pub fn ensure_cw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if compute_signed_area(contour) > 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Snap a point to a grid of the given size
#[inline]
pub fn snap_point(point: &Point2<f64>, grid: f64) -> Point2<f64> {
    if grid <= 0.0 {
        return *point;
    }
    Point2::new((point.x / grid).round() * grid, (point.y / grid).round() * grid)
}

/// Compute bounding box of a contour
pub fn contour_bounds(contour: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    let first = contour.first()?;

    let mut min = *first;
    let mut max = *first;

    for p in contour.iter().skip(1) {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    Some((min, max))
}

// ============================================================================
// Internal Helper Functions
// ============================================================================

/// Convert a profile to oriented i_overlay paths, or `None` if its outer
/// boundary is degenerate
fn profile_to_paths(profile: &Profile2D, tolerance: f64) -> Option<Vec<Vec<[f64; 2]>>> {
    let outer = snap_contour(&profile.outer, tolerance);
    if !is_valid_contour(&outer) {
        return None;
    }

    let mut paths = Vec::with_capacity(1 + profile.holes.len());
    paths.push(contour_to_path(&ensure_ccw(&outer)));

    for hole in &profile.holes {
        let hole = snap_contour(hole, tolerance);
        if is_valid_contour(&hole) {
            paths.push(contour_to_path(&ensure_cw(&hole)));
        }
    }

    Some(paths)
}

fn snap_contour(contour: &[Point2<f64>], tolerance: f64) -> Vec<Point2<f64>> {
    let mut snapped: Vec<Point2<f64>> = Vec::with_capacity(contour.len());
    for p in contour {
        let q = snap_point(p, tolerance);
        if snapped.last() != Some(&q) {
            snapped.push(q);
        }
    }
    // Closing duplicate
    if snapped.len() > 1 && snapped.first() == snapped.last() {
        snapped.pop();
    }
    snapped
}

/// Convert a Point2 contour to i_overlay path format
fn contour_to_path(contour: &[Point2<f64>]) -> Vec<[f64; 2]> {
    contour.iter().map(|p| [p.x, p.y]).collect()
}

fn path_to_contour(path: &[[f64; 2]]) -> Vec<Point2<f64>> {
    path.iter().map(|p| Point2::new(p[0], p[1])).collect()
}

/// Convert i_overlay result shapes back to profiles
///
/// i_overlay returns Vec<Vec<Vec<[f64; 2]>>> where:
/// - Outer Vec: list of shapes
/// - Middle Vec: list of contours per shape (first is outer, rest are holes)
/// - Inner Vec: list of points per contour
fn shapes_to_profiles(shapes: &[Vec<Vec<[f64; 2]>>]) -> Vec<Profile2D> {
    let mut profiles = Vec::with_capacity(shapes.len());

    for shape in shapes {
        let Some((outer, holes)) = shape.split_first() else {
            continue;
        };

        let outer = path_to_contour(outer);
        if !is_valid_contour(&outer) {
            continue;
        }

        let holes = holes
            .iter()
            .map(|h| path_to_contour(h))
            .filter(|h| is_valid_contour(h))
            .map(|h| ensure_cw(&h))
            .collect();

        profiles.push(Profile2D::with_holes(ensure_ccw(&outer), holes));
    }

    profiles
}
