// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use uwg_geometry::{
    classify_surfaces, compute_footprint, extract_facades, extract_height, union_solids,
    AngleThresholds, Error, Face, GeometryKernel, PlanarFace, PolyhedralKernel, Polyhedron,
    DEFAULT_MAX_FLOOR_ANGLE,
};
use uwg_geometry::{Point3, Vector3};

fn block(min: [f64; 3], max: [f64; 3]) -> Polyhedron {
    Polyhedron::cuboid(
        Point3::new(min[0], min[1], min[2]),
        Point3::new(max[0], max[1], max[2]),
    )
}

/// Profile in the XZ plane extruded `depth` along +Y
fn section(points: &[(f64, f64)], depth: f64) -> Polyhedron {
    let profile: Vec<Point3<f64>> = points
        .iter()
        .map(|&(x, z)| Point3::new(x, 0.0, z))
        .collect();
    Polyhedron::prism(&profile, Vector3::new(0.0, depth, 0.0)).unwrap()
}

#[test]
fn test_box_classification() {
    let kernel = PolyhedralKernel::new();
    let solid = block([0.0, 0.0, 0.0], [10.0, 20.0, 7.5]);

    let classes = classify_surfaces(&kernel, &solid, AngleThresholds::default()).unwrap();
    assert_eq!(classes.roofs.len(), 1);
    assert_eq!(classes.floors.len(), 1);
    assert_eq!(classes.walls.len(), 4);

    assert_relative_eq!(classes.roof_steepness()[0], 1.0, epsilon = 1e-12);
    for s in classes.wall_steepness() {
        assert_relative_eq!(s, 0.0, epsilon = 1e-12);
    }
    assert_relative_eq!(classes.floor_normals()[0].z, -1.0, epsilon = 1e-12);

    let centroid = classes.floor_centroids()[0];
    assert_relative_eq!(centroid.x, 5.0, epsilon = 1e-12);
    assert_relative_eq!(centroid.y, 10.0, epsilon = 1e-12);
    assert_relative_eq!(centroid.z, 0.0, epsilon = 1e-12);
}

#[test]
fn test_box_height_and_footprint() {
    let kernel = PolyhedralKernel::new();
    let solid = block([2.0, 3.0, 1.0], [7.0, 11.0, 13.0]);

    assert_relative_eq!(extract_height(&kernel, &solid), 12.0, epsilon = 1e-12);

    let footprint = compute_footprint(&kernel, &solid, DEFAULT_MAX_FLOOR_ANGLE).unwrap();
    assert!(!footprint.self_intersecting);
    // Projection counts the box once from above and once from below
    assert_relative_eq!(footprint.area, 40.0, epsilon = 1e-9);
    assert_eq!(footprint.outline.len(), 1);
    assert_relative_eq!(footprint.outline[0].area(), 40.0, epsilon = 1e-6);
}

#[test]
fn test_cantilever_without_lower_mass_is_not_self_intersecting() {
    let kernel = PolyhedralKernel::new();
    // Ground block 2 wide, upper floor cantilevers 2 further out
    let solid = section(
        &[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (4.0, 2.0), (4.0, 3.0), (0.0, 3.0)],
        2.0,
    );

    let footprint = compute_footprint(&kernel, &solid, DEFAULT_MAX_FLOOR_ANGLE).unwrap();
    assert!(!footprint.self_intersecting);
    assert_relative_eq!(footprint.area, 8.0, epsilon = 1e-9);
}

#[test]
fn test_overhang_over_own_mass_uses_floor_union() {
    let kernel = PolyhedralKernel::new();
    // C-shaped section: the upper arm's underside looks down onto the lower arm
    let solid = section(
        &[
            (0.0, 0.0),
            (4.0, 0.0),
            (4.0, 1.0),
            (1.0, 1.0),
            (1.0, 3.0),
            (4.0, 3.0),
            (4.0, 4.0),
            (0.0, 4.0),
        ],
        2.0,
    );
    assert!(kernel.is_closed(&solid));

    let classes = classify_surfaces(&kernel, &solid, AngleThresholds::default()).unwrap();
    assert_eq!(classes.floors.len(), 2);
    assert_eq!(classes.roofs.len(), 2);

    let footprint = compute_footprint(&kernel, &solid, DEFAULT_MAX_FLOOR_ANGLE).unwrap();
    assert!(footprint.self_intersecting);
    // Halving the full projection would give (8 + 6 + 8 + 6) / 2 = 14
    assert_relative_eq!(footprint.area, 8.0, epsilon = 1e-6);
}

#[test]
fn test_open_solid_has_no_footprint() {
    let kernel = PolyhedralKernel::new();
    let closed = block([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    let open = Polyhedron::new(closed.faces()[1..].to_vec());

    let err = compute_footprint(&kernel, &open, DEFAULT_MAX_FLOOR_ANGLE).unwrap_err();
    assert!(matches!(err, Error::DegenerateGeometry(_)));
}

#[test]
fn test_footprint_of_split_wall_block() {
    let kernel = PolyhedralKernel::new();
    let cuboid = block([0.0, 0.0, 0.0], [2.0, 1.0, 1.0]);
    let mut faces: Vec<Face> = cuboid.faces().to_vec();
    faces.remove(2);
    for x in [0.0, 1.0] {
        faces.push(
            PlanarFace::new(vec![
                Point3::new(x, 0.0, 0.0),
                Point3::new(x + 1.0, 0.0, 0.0),
                Point3::new(x + 1.0, 0.0, 1.0),
                Point3::new(x, 0.0, 1.0),
            ])
            .into(),
        );
    }
    let solid = Polyhedron::new(faces);

    assert!(kernel.is_closed(&solid));
    let footprint = compute_footprint(&kernel, &solid, DEFAULT_MAX_FLOOR_ANGLE).unwrap();
    assert!(!footprint.self_intersecting);
    assert_relative_eq!(footprint.area, 2.0, epsilon = 1e-9);
}

#[test]
fn test_facades_sum_walls_of_every_solid() {
    let kernel = PolyhedralKernel::new();
    let solids = vec![
        block([0.0, 0.0, 0.0], [2.0, 3.0, 4.0]),
        block([10.0, 0.0, 0.0], [11.0, 1.0, 1.0]),
    ];

    let facades = extract_facades(&kernel, &solids, AngleThresholds::default()).unwrap();
    assert_eq!(facades.surfaces.len(), 8);
    assert_relative_eq!(facades.area, 40.0 + 4.0, epsilon = 1e-9);
}

#[test]
fn test_shallow_threshold_counts_steep_roof_as_facade() {
    let kernel = PolyhedralKernel::new();
    // Gable section: roof planes pitched 50 degrees from horizontal
    let rise = 50f64.to_radians().tan();
    let solid = section(
        &[(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0 + rise), (0.0, 1.0)],
        3.0,
    );

    let default = classify_surfaces(&kernel, &solid, AngleThresholds::default()).unwrap();
    assert_eq!(default.roofs.len(), 0);
    assert_eq!(default.walls.len(), 6);

    let lenient = classify_surfaces(&kernel, &solid, AngleThresholds::new(55.0, 60.0)).unwrap();
    assert_eq!(lenient.roofs.len(), 2);
    assert_eq!(lenient.walls.len(), 4);
}

#[test]
fn test_union_solids_pairs_and_passes_odd_tail() {
    let kernel = PolyhedralKernel::new();
    let solids = vec![
        block([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
        block([5.0, 0.0, 0.0], [6.0, 1.0, 1.0]),
        block([10.0, 0.0, 0.0], [11.0, 1.0, 1.0]),
    ];

    let merged = union_solids(&kernel, &solids);
    assert_eq!(merged.len(), 3);
    assert_eq!(merged[2], solids[2]);
}

#[test]
fn test_union_solids_merges_overlapping_pair() {
    let kernel = PolyhedralKernel::new();
    let solids = vec![
        block([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]),
        block([1.0, 1.0, 0.5], [3.0, 3.0, 2.5]),
    ];

    let merged = union_solids(&kernel, &solids);
    assert_eq!(merged.len(), 1);

    let separate = extract_facades(&kernel, &solids, AngleThresholds::default()).unwrap();
    let combined = extract_facades(&kernel, &merged, AngleThresholds::default()).unwrap();
    assert_relative_eq!(separate.area, 32.0, epsilon = 1e-9);
    // Each box hides two 1 x 1.5 wall strips inside the other
    assert_relative_eq!(combined.area, 26.0, epsilon = 1e-6);
}

#[test]
fn test_union_solids_drops_shared_wall_of_touching_pair() {
    let kernel = PolyhedralKernel::new();
    let solids = vec![
        block([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
        block([1.0, 0.0, 0.0], [2.0, 1.0, 1.0]),
    ];

    let merged = union_solids(&kernel, &solids);
    assert_eq!(merged.len(), 1);

    let separate = extract_facades(&kernel, &solids, AngleThresholds::default()).unwrap();
    let combined = extract_facades(&kernel, &merged, AngleThresholds::default()).unwrap();
    assert_relative_eq!(separate.area, 8.0, epsilon = 1e-9);
    assert_relative_eq!(combined.area, 6.0, epsilon = 1e-6);
}
