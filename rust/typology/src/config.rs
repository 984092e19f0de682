// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Settings loaded from environment variables.

use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use uwg_geometry::{
    AngleThresholds, PolyhedralKernel, DEFAULT_MAX_FLOOR_ANGLE, DEFAULT_MAX_ROOF_ANGLE,
    DEFAULT_TOLERANCE,
};

/// Engine executable names searched on `PATH`
const ENGINE_NAMES: [&str; 2] = ["UWGEngine", "UWGEngine.exe"];

/// Analysis and tooling settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Modeling tolerance for ray hits and boolean unions.
    pub tolerance: f64,
    /// Roof / floor classification thresholds in degrees.
    pub thresholds: AngleThresholds,
    /// Working folder for simulation files.
    pub default_folder: PathBuf,
    /// Discovered simulation engine, if any.
    pub engine_path: Option<PathBuf>,
}

impl Settings {
    /// Load settings from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let number = |key: &str, default: f64| -> Result<f64> {
            match lookup(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .ok_or_else(|| Error::Config(format!("{key} is not a valid number: {raw}"))),
                None => Ok(default),
            }
        };

        let tolerance = number("UWG_MODEL_TOLERANCE", DEFAULT_TOLERANCE)?;
        let thresholds = AngleThresholds::new(
            number("UWG_MAX_ROOF_ANGLE", DEFAULT_MAX_ROOF_ANGLE)?,
            number("UWG_MAX_FLOOR_ANGLE", DEFAULT_MAX_FLOOR_ANGLE)?,
        );

        let default_folder = lookup("UWG_DEFAULT_FOLDER")
            .map(PathBuf::from)
            .unwrap_or_else(|| home_folder(&lookup));
        validate_default_folder(&default_folder)?;

        let engine_path = match lookup("UWG_ENGINE_PATH") {
            Some(path) => Some(PathBuf::from(path)),
            None => {
                let search = lookup("PATH");
                discover_engine(search.as_deref().map(OsStr::new), &default_folder)
            }
        };

        tracing::debug!(
            tolerance,
            folder = %default_folder.display(),
            engine = ?engine_path,
            "settings loaded"
        );

        Ok(Self {
            tolerance,
            thresholds,
            default_folder,
            engine_path,
        })
    }

    /// Reference kernel at the configured tolerance.
    pub fn kernel(&self) -> PolyhedralKernel {
        PolyhedralKernel::with_tolerance(self.tolerance)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            thresholds: AngleThresholds::default(),
            default_folder: PathBuf::from("ladybug"),
            engine_path: None,
        }
    }
}

/// The engine's file paths cannot contain whitespace
pub fn validate_default_folder(path: &Path) -> Result<()> {
    if path.to_string_lossy().chars().any(char::is_whitespace) {
        return Err(Error::Config(format!(
            "default folder can't have white space: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Find the engine executable on the search path, else under `<default_folder>/UWG`
pub fn discover_engine(search_path: Option<&OsStr>, default_folder: &Path) -> Option<PathBuf> {
    if let Some(search_path) = search_path {
        for dir in std::env::split_paths(search_path) {
            for name in ENGINE_NAMES {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
    }

    let bundled = default_folder.join("UWG");
    bundled.is_dir().then_some(bundled)
}

fn home_folder(lookup: &impl Fn(&str) -> Option<String>) -> PathBuf {
    lookup("HOME")
        .or_else(|| lookup("USERPROFILE"))
        .map(|home| PathBuf::from(home).join("ladybug"))
        .unwrap_or_else(|| PathBuf::from("ladybug"))
}
