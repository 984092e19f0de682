// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building program and construction-age categories
//!
//! Both enumerations parse leniently: lookup is case-insensitive, ignores
//! whitespace and punctuation (so `"Large Office"`, `"large-office"` and
//! `"LARGEOFFICE"` agree), and accepts the legacy numeric codes.

use crate::error::{Error, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// DOE reference building program used as the typology template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum BuildingProgram {
    FullServiceRestaurant,
    Hospital,
    LargeHotel,
    LargeOffice,
    MediumOffice,
    MidRiseApartment,
    OutPatient,
    PrimarySchool,
    QuickServiceRestaurant,
    SecondarySchool,
    SmallHotel,
    SmallOffice,
    StandAloneRetail,
    StripMall,
    SuperMarket,
    Warehouse,
}

impl BuildingProgram {
    pub const ALL: [BuildingProgram; 16] = [
        BuildingProgram::FullServiceRestaurant,
        BuildingProgram::Hospital,
        BuildingProgram::LargeHotel,
        BuildingProgram::LargeOffice,
        BuildingProgram::MediumOffice,
        BuildingProgram::MidRiseApartment,
        BuildingProgram::OutPatient,
        BuildingProgram::PrimarySchool,
        BuildingProgram::QuickServiceRestaurant,
        BuildingProgram::SecondarySchool,
        BuildingProgram::SmallHotel,
        BuildingProgram::SmallOffice,
        BuildingProgram::StandAloneRetail,
        BuildingProgram::StripMall,
        BuildingProgram::SuperMarket,
        BuildingProgram::Warehouse,
    ];

    /// Canonical name
    pub fn name(self) -> &'static str {
        match self {
            BuildingProgram::FullServiceRestaurant => "FullServiceRestaurant",
            BuildingProgram::Hospital => "Hospital",
            BuildingProgram::LargeHotel => "LargeHotel",
            BuildingProgram::LargeOffice => "LargeOffice",
            BuildingProgram::MediumOffice => "MediumOffice",
            BuildingProgram::MidRiseApartment => "MidRiseApartment",
            BuildingProgram::OutPatient => "OutPatient",
            BuildingProgram::PrimarySchool => "PrimarySchool",
            BuildingProgram::QuickServiceRestaurant => "QuickServiceRestaurant",
            BuildingProgram::SecondarySchool => "SecondarySchool",
            BuildingProgram::SmallHotel => "SmallHotel",
            BuildingProgram::SmallOffice => "SmallOffice",
            BuildingProgram::StandAloneRetail => "StandAloneRetail",
            BuildingProgram::StripMall => "StripMall",
            BuildingProgram::SuperMarket => "SuperMarket",
            BuildingProgram::Warehouse => "Warehouse",
        }
    }

    /// Legacy numeric code
    pub fn code(self) -> u8 {
        match self {
            BuildingProgram::LargeOffice => 0,
            BuildingProgram::StandAloneRetail => 1,
            BuildingProgram::MidRiseApartment => 2,
            BuildingProgram::PrimarySchool => 3,
            BuildingProgram::SecondarySchool => 4,
            BuildingProgram::SmallHotel => 5,
            BuildingProgram::LargeHotel => 6,
            BuildingProgram::Hospital => 7,
            BuildingProgram::OutPatient => 8,
            BuildingProgram::Warehouse => 9,
            BuildingProgram::SuperMarket => 10,
            BuildingProgram::FullServiceRestaurant => 11,
            BuildingProgram::QuickServiceRestaurant => 12,
            BuildingProgram::MediumOffice => 13,
            BuildingProgram::SmallOffice => 14,
            BuildingProgram::StripMall => 15,
        }
    }

    /// Resolve a user-supplied name, alias or numeric code
    pub fn resolve(text: &str) -> Result<Self> {
        static ALIASES: OnceLock<FxHashMap<String, BuildingProgram>> = OnceLock::new();
        let aliases = ALIASES.get_or_init(|| {
            let mut map = FxHashMap::default();
            for program in Self::ALL {
                map.insert(canonicalize(program.name()), program);
                map.insert(program.code().to_string(), program);
            }
            map.insert(canonicalize("Office"), BuildingProgram::LargeOffice);
            map.insert(canonicalize("Retail"), BuildingProgram::StandAloneRetail);
            map
        });

        aliases
            .get(&canonicalize(text))
            .copied()
            .ok_or_else(|| Error::UnrecognizedCategory {
                kind: "bldg_program",
                value: text.to_string(),
            })
    }
}

/// Construction-age band selecting wall, roof and window constructions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum BuildingAge {
    #[serde(rename = "Pre1980s")]
    Pre1980s,
    #[serde(rename = "1980sPresent")]
    Post1980s,
    #[serde(rename = "NewConstruction")]
    NewConstruction,
}

impl BuildingAge {
    pub const ALL: [BuildingAge; 3] = [
        BuildingAge::Pre1980s,
        BuildingAge::Post1980s,
        BuildingAge::NewConstruction,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuildingAge::Pre1980s => "Pre1980s",
            BuildingAge::Post1980s => "1980sPresent",
            BuildingAge::NewConstruction => "NewConstruction",
        }
    }

    pub fn code(self) -> u8 {
        match self {
            BuildingAge::Pre1980s => 0,
            BuildingAge::Post1980s => 1,
            BuildingAge::NewConstruction => 2,
        }
    }

    pub fn resolve(text: &str) -> Result<Self> {
        static ALIASES: OnceLock<FxHashMap<String, BuildingAge>> = OnceLock::new();
        let aliases = ALIASES.get_or_init(|| {
            let mut map = FxHashMap::default();
            for age in Self::ALL {
                map.insert(canonicalize(age.name()), age);
                map.insert(age.code().to_string(), age);
            }
            map
        });

        aliases
            .get(&canonicalize(text))
            .copied()
            .ok_or_else(|| Error::UnrecognizedCategory {
                kind: "bldg_age",
                value: text.to_string(),
            })
    }
}

/// Uppercase and drop whitespace and punctuation; `.` is kept so a
/// fractional code such as `1.5` never collapses onto `15`
fn canonicalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace() && (*c == '.' || !c.is_ascii_punctuation()))
        .flat_map(char::to_uppercase)
        .collect()
}

macro_rules! category_traits {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::resolve(s)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = Error;

            fn try_from(s: String) -> Result<Self> {
                Self::resolve(&s)
            }
        }
    };
}

category_traits!(BuildingProgram);
category_traits!(BuildingAge);
