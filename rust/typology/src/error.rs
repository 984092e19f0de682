// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for typology operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a typology
#[derive(Error, Debug)]
pub enum Error {
    #[error("{field} must be {expected}. Current value is {value}")]
    Range {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("{kind} {value} not recognized")]
    UnrecognizedCategory { kind: &'static str, value: String },

    #[error("{field} must be a number. Current value is {value}")]
    TypeMismatch { field: &'static str, value: String },

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Geometry error: {0}")]
    Geometry(uwg_geometry::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<uwg_geometry::Error> for Error {
    fn from(err: uwg_geometry::Error) -> Self {
        match err {
            uwg_geometry::Error::DegenerateGeometry(msg) => Error::DegenerateGeometry(msg),
            other => Error::Geometry(other),
        }
    }
}
