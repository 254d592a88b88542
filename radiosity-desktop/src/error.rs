// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! The driver's own error type: wraps every failure mode between the core
//! solver and the PNG sink into one enum with a stable exit-code mapping.

use std::path::PathBuf;

use radiosity::error::RadiosityError;
use thiserror::Error;

/// Errors fatal to one driver run.
#[derive(Debug, Error)]
pub enum DriverError {
    /// A core solver error; see [`radiosity::error::RadiosityError`] for the
    /// individual variants.
    #[error(transparent)]
    Core(#[from] RadiosityError),

    /// The PNG sink could not encode the output image.
    #[error("failed to write {path:?}: {source}")]
    Png {
        path: PathBuf,
        #[source]
        source: png::EncodingError,
    },

    /// The output file or its parent directory could not be created.
    #[error("failed to open {path:?} for writing: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DriverError {
    /// The process exit code this error should produce. `NotConverged` and
    /// `RenderContextFailure` each get their own code per the CLI contract;
    /// everything else (including I/O and PNG encoding failures, which the
    /// contract does not single out) falls back to a generic failure code.
    pub fn exit_code(&self) -> u8 {
        match self {
            DriverError::Core(RadiosityError::NotConverged { .. }) => 2,
            DriverError::Core(RadiosityError::RenderContextFailure { .. }) => 3,
            _ => 1,
        }
    }
}
