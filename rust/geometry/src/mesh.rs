// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures

use crate::ray::{ray_triangle_distance, Ray};
use nalgebra::Point3;

/// Triangle mesh produced by tessellating a solid (f64 positions)
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f64>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Add a vertex, returning its index
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>) -> u32 {
        let index = self.vertex_count() as u32;
        self.positions.push(position.x);
        self.positions.push(position.y);
        self.positions.push(position.z);
        index
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Merge another mesh into this one
    pub fn merge(&mut self, other: &Mesh) {
        if other.is_empty() {
            return;
        }

        let offset = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Position of a vertex
    #[inline]
    pub fn vertex(&self, index: u32) -> Point3<f64> {
        let i = index as usize * 3;
        Point3::new(self.positions[i], self.positions[i + 1], self.positions[i + 2])
    }

    /// Iterate over the triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [self.vertex(tri[0]), self.vertex(tri[1]), self.vertex(tri[2])])
    }

    /// Calculate bounds (min, max)
    pub fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        if self.positions.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f64::MAX, f64::MAX, f64::MAX);
        let mut max = Point3::new(f64::MIN, f64::MIN, f64::MIN);

        for chunk in self.positions.chunks_exact(3) {
            min.x = min.x.min(chunk[0]);
            min.y = min.y.min(chunk[1]);
            min.z = min.z.min(chunk[2]);
            max.x = max.x.max(chunk[0]);
            max.y = max.y.max(chunk[1]);
            max.z = max.z.max(chunk[2]);
        }

        (min, max)
    }

    /// Distance along `ray` to the nearest triangle hit farther than `min_distance`.
    ///
    /// Hits at or below `min_distance` are ignored so a ray cast from a point
    /// on the mesh surface does not report the face it starts on.
    pub fn ray_hit_distance(&self, ray: &Ray, min_distance: f64) -> Option<f64> {
        let mut nearest: Option<f64> = None;

        // Plain scan over all triangles; building envelopes are small.
        for [v0, v1, v2] in self.triangles() {
            if let Some(t) = ray_triangle_distance(ray, &v0, &v1, &v2) {
                if t > min_distance && nearest.map_or(true, |n| t < n) {
                    nearest = Some(t);
                }
            }
        }

        nearest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn unit_square_at(z: f64) -> Mesh {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(Point3::new(0.0, 0.0, z));
        let b = mesh.add_vertex(Point3::new(1.0, 0.0, z));
        let c = mesh.add_vertex(Point3::new(1.0, 1.0, z));
        let d = mesh.add_vertex(Point3::new(0.0, 1.0, z));
        mesh.add_triangle(a, b, c);
        mesh.add_triangle(a, c, d);
        mesh
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut mesh = unit_square_at(0.0);
        mesh.merge(&unit_square_at(2.0));

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(&mesh.indices[6..9], &[4, 5, 6]);

        let (min, max) = mesh.bounds();
        assert_relative_eq!(min.z, 0.0);
        assert_relative_eq!(max.z, 2.0);
    }

    #[test]
    fn test_ray_hit_nearest_beyond_min_distance() {
        let mut mesh = unit_square_at(0.0);
        mesh.merge(&unit_square_at(-3.0));

        // Start on the upper square and shoot down
        let ray = Ray::new(Point3::new(0.5, 0.5, 0.0), Vector3::new(0.0, 0.0, -1.0));
        let hit = mesh.ray_hit_distance(&ray, 1e-6).unwrap();
        assert_relative_eq!(hit, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ray_miss() {
        let mesh = unit_square_at(0.0);
        let ray = Ray::new(Point3::new(5.0, 5.0, 1.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(mesh.ray_hit_distance(&ray, 1e-6).is_none());
    }
}
