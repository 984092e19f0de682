// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use serde_json::json;
use uwg_geometry::{AngleThresholds, PolyhedralKernel, Polyhedron, Point3};
use uwg_typology::{
    BuildingAge, BuildingProgram, BuildingTypology, Error, TypologyAggregator, TypologyOptions,
};

fn block(x: f64, width: f64, height: f64) -> Polyhedron {
    Polyhedron::cuboid(
        Point3::new(x, 0.0, 0.0),
        Point3::new(x + width, 1.0, height),
    )
}

#[test]
fn test_equal_footprints_average_height() {
    let kernel = PolyhedralKernel::new();
    let aggregator = TypologyAggregator::new(&kernel);
    let solids = vec![block(0.0, 1.0, 2.0), block(5.0, 1.0, 4.0)];

    let geometry = aggregator.aggregate(&solids).unwrap();
    assert_relative_eq!(geometry.average_height, 3.0, epsilon = 1e-9);
    assert_relative_eq!(geometry.footprint_area, 2.0, epsilon = 1e-9);
    assert_relative_eq!(geometry.buildings[0].weight, 0.5, epsilon = 1e-9);
    assert_relative_eq!(geometry.buildings[1].weight, 0.5, epsilon = 1e-9);
}

#[test]
fn test_area_weighted_average_height() {
    let kernel = PolyhedralKernel::new();
    let aggregator = TypologyAggregator::new(&kernel);
    let solids = vec![block(0.0, 1.0, 2.0), block(5.0, 3.0, 6.0)];

    let geometry = aggregator.aggregate(&solids).unwrap();
    // 2 x 0.25 + 6 x 0.75
    assert_relative_eq!(geometry.average_height, 5.0, epsilon = 1e-9);
    assert_relative_eq!(geometry.footprint_area, 4.0, epsilon = 1e-9);
    assert_eq!(geometry.footprints.len(), 2);
}

#[test]
fn test_facade_area_of_separate_masses() {
    let kernel = PolyhedralKernel::new();
    let aggregator = TypologyAggregator::new(&kernel);
    let solids = vec![block(0.0, 1.0, 2.0), block(5.0, 3.0, 6.0), block(20.0, 1.0, 1.0)];

    let geometry = aggregator.aggregate(&solids).unwrap();
    // Perimeters 4, 8, 4 times heights 2, 6, 1
    assert_relative_eq!(geometry.facade_area, 8.0 + 48.0 + 4.0, epsilon = 1e-9);
    assert_eq!(geometry.facade_surfaces.len(), 12);
}

#[test]
fn test_shared_wall_counted_once() {
    let kernel = PolyhedralKernel::new();
    let aggregator = TypologyAggregator::new(&kernel);
    let solids = vec![block(0.0, 1.0, 1.0), block(1.0, 1.0, 1.0)];

    let geometry = aggregator.aggregate(&solids).unwrap();
    assert_relative_eq!(geometry.footprint_area, 2.0, epsilon = 1e-9);
    assert_relative_eq!(geometry.average_height, 1.0, epsilon = 1e-9);
    assert_relative_eq!(geometry.facade_area, 6.0, epsilon = 1e-6);
}

#[test]
fn test_zero_footprint_is_degenerate() {
    let kernel = PolyhedralKernel::new();
    let aggregator = TypologyAggregator::new(&kernel);

    let err = aggregator.aggregate(&[]).unwrap_err();
    assert!(matches!(err, Error::DegenerateGeometry(_)));

    let flat = Polyhedron::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0));
    let err = aggregator.aggregate(&[flat]).unwrap_err();
    assert!(matches!(err, Error::DegenerateGeometry(_)));
}

#[test]
fn test_from_geometry() {
    let kernel = PolyhedralKernel::new();
    let aggregator = TypologyAggregator::with_thresholds(&kernel, AngleThresholds::new(45.0, 60.0));
    let solids = vec![block(0.0, 1.0, 2.0), block(5.0, 1.0, 4.0)];

    let typology = BuildingTypology::from_geometry(
        &aggregator,
        &solids,
        "office",
        "Pre-1980's",
        TypologyOptions::default().roof_albedo(0.2),
    )
    .unwrap();

    assert_eq!(typology.bldg_program(), BuildingProgram::LargeOffice);
    assert_eq!(typology.bldg_age(), BuildingAge::Pre1980s);
    assert_relative_eq!(typology.average_height(), 3.0, epsilon = 1e-9);
    assert_relative_eq!(typology.footprint_area(), 2.0, epsilon = 1e-9);
    assert_relative_eq!(typology.facade_area(), 8.0 + 16.0, epsilon = 1e-9);
    assert_eq!(typology.roof_albedo(), 0.2);
}

#[test]
fn test_from_geometry_propagates_category_errors() {
    let kernel = PolyhedralKernel::new();
    let aggregator = TypologyAggregator::new(&kernel);
    let solids = vec![block(0.0, 1.0, 2.0)];

    let err = BuildingTypology::from_geometry(&aggregator, &solids, "Castle", "0", Default::default())
        .unwrap_err();
    assert!(matches!(err, Error::UnrecognizedCategory { kind: "bldg_program", .. }));
}

#[test]
fn test_roof_albedo_out_of_range() {
    let err = BuildingTypology::new(
        10.0,
        100.0,
        400.0,
        "LargeOffice",
        "Pre1980s",
        TypologyOptions::default().roof_albedo(1.5),
    )
    .unwrap_err();

    match err {
        Error::Range { field, value, .. } => {
            assert_eq!(field, "roof_albedo");
            assert_eq!(value, 1.5);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_office_alias_resolves_to_large_office() {
    let typology =
        BuildingTypology::new(10.0, 100.0, 400.0, "office", "1", TypologyOptions::default())
            .unwrap();
    assert_eq!(typology.bldg_program(), BuildingProgram::LargeOffice);
    assert_eq!(typology.bldg_age(), BuildingAge::Post1980s);
}

#[test]
fn test_explicit_values_round_trip() {
    let options = TypologyOptions::default()
        .glz_ratio(0.25)
        .roof_albedo(0.7)
        .roof_veg_fraction(0.1);
    let typology =
        BuildingTypology::new(14.2, 512.5, 1830.75, "Strip Mall", "NewConstruction", options)
            .unwrap();

    assert_eq!(typology.average_height(), 14.2);
    assert_eq!(typology.footprint_area(), 512.5);
    assert_eq!(typology.facade_area(), 1830.75);
    assert_eq!(typology.bldg_program(), BuildingProgram::StripMall);
    assert_eq!(typology.bldg_age(), BuildingAge::NewConstruction);
    assert_eq!(typology.glz_ratio(), 0.25);
    assert_eq!(typology.roof_albedo(), 0.7);
    assert_eq!(typology.roof_veg_fraction(), 0.1);
}

#[test]
fn test_serde_round_trip_uses_canonical_names() {
    let typology = BuildingTypology::new(6.0, 80.0, 250.0, "14", "2", Default::default()).unwrap();

    let value = serde_json::to_value(&typology).unwrap();
    assert_eq!(value["bldg_program"], json!("SmallOffice"));
    assert_eq!(value["bldg_age"], json!("NewConstruction"));
    assert_eq!(value["glz_ratio"], json!(0.4));

    let back: BuildingTypology = serde_json::from_value(value).unwrap();
    assert_eq!(back, typology);
}

#[test]
fn test_deserialize_validates() {
    let result = serde_json::from_value::<BuildingTypology>(json!({
        "average_height": 6.0,
        "footprint_area": 80.0,
        "facade_area": 250.0,
        "bldg_program": "Warehouse",
        "bldg_age": "0",
        "glz_ratio": 2.0
    }));
    assert!(result.is_err());
}
