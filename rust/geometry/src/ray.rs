// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rays and ray/triangle intersection

use nalgebra::{Point3, Vector3};

/// Below this the ray is treated as parallel to the triangle plane
const PARALLEL_EPSILON: f64 = 1e-12;

/// Half-line starting at `origin` going along unit `direction`
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Create a ray; the direction is normalized
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Point at distance `t` along the ray
    #[inline]
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
}

/// Möller–Trumbore ray-triangle intersection.
///
/// Returns the signed distance along the ray to the hit point. Hits behind
/// the origin are discarded; a hit exactly at the origin returns ~0.
pub fn ray_triangle_distance(
    ray: &Ray,
    v0: &Point3<f64>,
    v1: &Point3<f64>,
    v2: &Point3<f64>,
) -> Option<f64> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(&edge2);
    let a = edge1.dot(&h);

    if a.abs() < PARALLEL_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(&h);

    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * ray.direction.dot(&q);

    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    if t < -PARALLEL_EPSILON {
        return None;
    }

    Some(t.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hit_in_front() {
        let ray = Ray::new(Point3::new(0.25, 0.25, 5.0), Vector3::new(0.0, 0.0, -2.0));
        let t = ray_triangle_distance(
            &ray,
            &Point3::new(0.0, 0.0, 1.0),
            &Point3::new(1.0, 0.0, 1.0),
            &Point3::new(0.0, 1.0, 1.0),
        )
        .unwrap();

        assert_relative_eq!(t, 4.0, epsilon = 1e-12);
        assert_relative_eq!(ray.at(t).z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_behind_origin_is_ignored() {
        let ray = Ray::new(Point3::new(0.25, 0.25, 0.0), Vector3::new(0.0, 0.0, -1.0));
        let hit = ray_triangle_distance(
            &ray,
            &Point3::new(0.0, 0.0, 1.0),
            &Point3::new(1.0, 0.0, 1.0),
            &Point3::new(0.0, 1.0, 1.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 1.0), Vector3::new(1.0, 0.0, 0.0));
        let hit = ray_triangle_distance(
            &ray,
            &Point3::new(0.0, 0.0, 1.0),
            &Point3::new(1.0, 0.0, 1.0),
            &Point3::new(0.0, 1.0, 1.0),
        );
        assert!(hit.is_none());
    }
}
