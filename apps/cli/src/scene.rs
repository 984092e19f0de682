// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON scene format: one typology and the building masses it covers.

use serde::Deserialize;
use serde_json::Value;
use uwg_geometry::{Face, PatchFace, PlanarFace, Point3, Polyhedron, Triangle, Vector3};
use uwg_typology::TypologyRecord;

/// Scene file contents.
#[derive(Debug, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub bldg_program: Value,
    #[serde(default)]
    pub bldg_age: Value,
    #[serde(default)]
    pub glz_ratio: Option<Value>,
    #[serde(default)]
    pub roof_albedo: Option<Value>,
    #[serde(default)]
    pub roof_veg_fraction: Option<Value>,
    pub buildings: Vec<Mass>,
}

/// One building mass.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mass {
    /// Axis-aligned box
    Box { min: [f64; 3], max: [f64; 3] },
    /// Planar profile swept along a vector
    Prism {
        profile: Vec<[f64; 3]>,
        extrusion: [f64; 3],
    },
    /// Explicit boundary: planar loops and triangulated patches
    Faces { faces: Vec<FaceSpec> },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum FaceSpec {
    Planar {
        outer: Vec<[f64; 3]>,
        #[serde(default)]
        holes: Vec<Vec<[f64; 3]>>,
    },
    Patch { triangles: Vec<[[f64; 3]; 3]> },
}

impl Mass {
    pub fn to_solid(&self) -> uwg_geometry::Result<Polyhedron> {
        match self {
            Mass::Box { min, max } => Ok(Polyhedron::cuboid(point(min), point(max))),
            Mass::Prism { profile, extrusion } => {
                let profile: Vec<Point3<f64>> = profile.iter().map(point).collect();
                Polyhedron::prism(&profile, Vector3::from(*extrusion))
            }
            Mass::Faces { faces } => Ok(Polyhedron::new(
                faces.iter().map(FaceSpec::to_face).collect(),
            )),
        }
    }
}

impl FaceSpec {
    fn to_face(&self) -> Face {
        match self {
            FaceSpec::Planar { outer, holes } => PlanarFace::with_holes(
                outer.iter().map(point).collect(),
                holes.iter().map(|h| h.iter().map(point).collect()).collect(),
            )
            .into(),
            FaceSpec::Patch { triangles } => PatchFace::new(
                triangles
                    .iter()
                    .map(|[a, b, c]| Triangle::new(point(a), point(b), point(c)))
                    .collect(),
            )
            .into(),
        }
    }
}

impl Scene {
    /// Typology fields with geometry filled in from the analysis
    pub fn record(
        &self,
        average_height: f64,
        footprint_area: f64,
        facade_area: f64,
    ) -> TypologyRecord {
        TypologyRecord {
            average_height: average_height.into(),
            footprint_area: footprint_area.into(),
            facade_area: facade_area.into(),
            bldg_program: self.bldg_program.clone(),
            bldg_age: self.bldg_age.clone(),
            glz_ratio: self.glz_ratio.clone(),
            roof_albedo: self.roof_albedo.clone(),
            roof_veg_fraction: self.roof_veg_fraction.clone(),
        }
    }
}

fn point(p: &[f64; 3]) -> Point3<f64> {
    Point3::new(p[0], p[1], p[2])
}
