// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # UWG Typology
//!
//! Turns groups of building masses into validated [`BuildingTypology`]
//! records for the Urban Weather Generator.
//!
//! ## Quick Start
//!
//! ```rust
//! use uwg_geometry::{PolyhedralKernel, Polyhedron, Point3};
//! use uwg_typology::{BuildingTypology, TypologyAggregator, TypologyOptions};
//!
//! let kernel = PolyhedralKernel::new();
//! let aggregator = TypologyAggregator::new(&kernel);
//! let masses = vec![
//!     Polyhedron::cuboid(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 12.0)),
//!     Polyhedron::cuboid(Point3::new(20.0, 0.0, 0.0), Point3::new(30.0, 10.0, 24.0)),
//! ];
//!
//! let typology = BuildingTypology::from_geometry(
//!     &aggregator,
//!     &masses,
//!     "Medium Office",
//!     "New Construction",
//!     TypologyOptions::default().glz_ratio(0.6),
//! )
//! .unwrap();
//! assert_eq!(typology.average_height(), 18.0);
//! ```

pub mod aggregate;
pub mod config;
pub mod error;
pub mod program;
pub mod typology;

pub use aggregate::{BuildingMetrics, TypologyAggregator, TypologyGeometry};
pub use config::Settings;
pub use error::{Error, Result};
pub use program::{BuildingAge, BuildingProgram};
pub use typology::{
    BuildingTypology, TypologyOptions, TypologyRecord, DEFAULT_GLZ_RATIO, DEFAULT_ROOF_ALBEDO,
    DEFAULT_ROOF_VEG_FRACTION,
};
