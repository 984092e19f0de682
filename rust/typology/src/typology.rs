// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The validated building typology record

use crate::aggregate::TypologyAggregator;
use crate::error::{Error, Result};
use crate::program::{BuildingAge, BuildingProgram};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uwg_geometry::GeometryKernel;

/// Fraction of wall area glazed when none is given
pub const DEFAULT_GLZ_RATIO: f64 = 0.4;
/// Roof albedo when none is given
pub const DEFAULT_ROOF_ALBEDO: f64 = 0.5;
/// Vegetated roof fraction when none is given
pub const DEFAULT_ROOF_VEG_FRACTION: f64 = 0.0;

/// Optional surface ratios; `None` picks the default
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TypologyOptions {
    pub glz_ratio: Option<f64>,
    pub roof_albedo: Option<f64>,
    pub roof_veg_fraction: Option<f64>,
}

impl TypologyOptions {
    pub fn glz_ratio(mut self, value: f64) -> Self {
        self.glz_ratio = Some(value);
        self
    }

    pub fn roof_albedo(mut self, value: f64) -> Self {
        self.roof_albedo = Some(value);
        self
    }

    pub fn roof_veg_fraction(mut self, value: f64) -> Self {
        self.roof_veg_fraction = Some(value);
        self
    }
}

/// A group of buildings sharing a program and a construction age
///
/// Every field is validated at construction and the value never changes
/// afterwards. Deserialization goes through [`TypologyRecord`], so JSON input
/// gets the same coercion and checks as [`BuildingTypology::from_record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TypologyRecord")]
pub struct BuildingTypology {
    average_height: f64,
    footprint_area: f64,
    facade_area: f64,
    bldg_program: BuildingProgram,
    bldg_age: BuildingAge,
    glz_ratio: f64,
    roof_albedo: f64,
    roof_veg_fraction: f64,
}

impl BuildingTypology {
    /// Build from geometry values and category names or aliases
    pub fn new(
        average_height: f64,
        footprint_area: f64,
        facade_area: f64,
        bldg_program: &str,
        bldg_age: &str,
        options: TypologyOptions,
    ) -> Result<Self> {
        let geometry = check_geometry(average_height, footprint_area, facade_area)?;
        let ratios = check_ratios(&options)?;
        let bldg_age = BuildingAge::resolve(bldg_age)?;
        let bldg_program = BuildingProgram::resolve(bldg_program)?;
        Ok(Self::assemble(geometry, bldg_program, bldg_age, ratios))
    }

    /// Build from already-resolved categories
    pub fn with_categories(
        average_height: f64,
        footprint_area: f64,
        facade_area: f64,
        bldg_program: BuildingProgram,
        bldg_age: BuildingAge,
        options: TypologyOptions,
    ) -> Result<Self> {
        let geometry = check_geometry(average_height, footprint_area, facade_area)?;
        let ratios = check_ratios(&options)?;
        Ok(Self::assemble(geometry, bldg_program, bldg_age, ratios))
    }

    /// Build from loosely typed input, coercing numeric strings
    pub fn from_record(record: TypologyRecord) -> Result<Self> {
        let average_height = coerce_number("average_height", &record.average_height)?;
        let footprint_area = coerce_number("footprint_area", &record.footprint_area)?;
        let facade_area = coerce_number("facade_area", &record.facade_area)?;

        let options = TypologyOptions {
            glz_ratio: coerce_optional("glz_ratio", &record.glz_ratio)?,
            roof_albedo: coerce_optional("roof_albedo", &record.roof_albedo)?,
            roof_veg_fraction: coerce_optional("roof_veg_fraction", &record.roof_veg_fraction)?,
        };

        Self::new(
            average_height,
            footprint_area,
            facade_area,
            &category_text(&record.bldg_program),
            &category_text(&record.bldg_age),
            options,
        )
    }

    /// Derive the geometry values from building masses, then validate
    pub fn from_geometry<K: GeometryKernel>(
        aggregator: &TypologyAggregator<'_, K>,
        solids: &[K::Solid],
        bldg_program: &str,
        bldg_age: &str,
        options: TypologyOptions,
    ) -> Result<Self> {
        let geometry = aggregator.aggregate(solids)?;
        Self::new(
            geometry.average_height,
            geometry.footprint_area,
            geometry.facade_area,
            bldg_program,
            bldg_age,
            options,
        )
    }

    fn assemble(
        (average_height, footprint_area, facade_area): (f64, f64, f64),
        bldg_program: BuildingProgram,
        bldg_age: BuildingAge,
        (glz_ratio, roof_albedo, roof_veg_fraction): (f64, f64, f64),
    ) -> Self {
        Self {
            average_height,
            footprint_area,
            facade_area,
            bldg_program,
            bldg_age,
            glz_ratio,
            roof_albedo,
            roof_veg_fraction,
        }
    }

    /// Area-weighted average building height (m)
    pub fn average_height(&self) -> f64 {
        self.average_height
    }

    /// Total footprint area (m²)
    pub fn footprint_area(&self) -> f64 {
        self.footprint_area
    }

    /// Total facade area (m²)
    pub fn facade_area(&self) -> f64 {
        self.facade_area
    }

    pub fn bldg_program(&self) -> BuildingProgram {
        self.bldg_program
    }

    pub fn bldg_age(&self) -> BuildingAge {
        self.bldg_age
    }

    pub fn glz_ratio(&self) -> f64 {
        self.glz_ratio
    }

    pub fn roof_albedo(&self) -> f64 {
        self.roof_albedo
    }

    pub fn roof_veg_fraction(&self) -> f64 {
        self.roof_veg_fraction
    }
}

impl fmt::Display for BuildingTypology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Building Typology: {}", self.bldg_program)?;
        writeln!(f, "Average Height: {} m", self.average_height)?;
        writeln!(f, "Footprint Area: {} m2", self.footprint_area)?;
        writeln!(f, "Facade Area: {} m2", self.facade_area)?;
        write!(f, "-------------------------------------")
    }
}

/// Unvalidated typology input as it arrives from users or files
///
/// Geometry and ratio fields accept JSON numbers or numeric strings;
/// categories accept names, aliases or numeric codes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypologyRecord {
    pub average_height: Value,
    pub footprint_area: Value,
    pub facade_area: Value,
    pub bldg_program: Value,
    pub bldg_age: Value,
    pub glz_ratio: Option<Value>,
    pub roof_albedo: Option<Value>,
    pub roof_veg_fraction: Option<Value>,
}

impl TryFrom<TypologyRecord> for BuildingTypology {
    type Error = Error;

    fn try_from(record: TypologyRecord) -> Result<Self> {
        Self::from_record(record)
    }
}

fn check_geometry(
    average_height: f64,
    footprint_area: f64,
    facade_area: f64,
) -> Result<(f64, f64, f64)> {
    check("average_height", average_height, "a positive number", |v| v > 0.0)?;
    check("footprint_area", footprint_area, "a positive number", |v| v > 0.0)?;
    check("facade_area", facade_area, "a non-negative number", |v| v >= 0.0)?;
    Ok((average_height, footprint_area, facade_area))
}

fn check_ratios(options: &TypologyOptions) -> Result<(f64, f64, f64)> {
    let ratio = |field, value: Option<f64>, default| match value {
        Some(v) => check(field, v, "between 0 and 1", |v| (0.0..=1.0).contains(&v)),
        None => Ok(default),
    };
    Ok((
        ratio("glz_ratio", options.glz_ratio, DEFAULT_GLZ_RATIO)?,
        ratio("roof_albedo", options.roof_albedo, DEFAULT_ROOF_ALBEDO)?,
        ratio(
            "roof_veg_fraction",
            options.roof_veg_fraction,
            DEFAULT_ROOF_VEG_FRACTION,
        )?,
    ))
}

fn check(
    field: &'static str,
    value: f64,
    expected: &'static str,
    valid: impl Fn(f64) -> bool,
) -> Result<f64> {
    if value.is_finite() && valid(value) {
        Ok(value)
    } else {
        Err(Error::Range {
            field,
            value,
            expected,
        })
    }
}

fn coerce_number(field: &'static str, value: &Value) -> Result<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.ok_or_else(|| Error::TypeMismatch {
        field,
        value: value.to_string(),
    })
}

fn coerce_optional(field: &'static str, value: &Option<Value>) -> Result<Option<f64>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => coerce_number(field, v).map(Some),
    }
}

/// Text used for category lookup; integral numbers become their code
fn category_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e6 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}
