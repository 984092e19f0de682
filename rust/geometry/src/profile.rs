// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D profiles: planar regions with optional holes

use crate::bool2d::{compute_signed_area, contour_bounds};
use nalgebra::Point2;

/// 2D Profile with optional holes
#[derive(Debug, Clone, PartialEq)]
pub struct Profile2D {
    /// Outer boundary
    pub outer: Vec<Point2<f64>>,
    /// Holes
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl Profile2D {
    /// Create a new profile
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Create a profile with holes
    pub fn with_holes(outer: Vec<Point2<f64>>, holes: Vec<Vec<Point2<f64>>>) -> Self {
        Self { outer, holes }
    }

    /// Add a hole to the profile
    pub fn add_hole(&mut self, hole: Vec<Point2<f64>>) {
        self.holes.push(hole);
    }

    /// Enclosed area: outer area minus hole areas, regardless of winding
    pub fn area(&self) -> f64 {
        let outer = compute_signed_area(&self.outer).abs();
        let holes: f64 = self
            .holes
            .iter()
            .map(|h| compute_signed_area(h).abs())
            .sum();
        (outer - holes).max(0.0)
    }

    /// Bounding box of the outer boundary
    pub fn bounds(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        contour_bounds(&self.outer)
    }
}
