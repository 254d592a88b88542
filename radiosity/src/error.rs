// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! The error type shared by every fallible operation in this crate.

use thiserror::Error;

/// Errors that can occur while building or solving a scene.
///
/// Numerical anomalies (NaN or infinite transfer-matrix entries) are
/// deliberately not represented here: per the iterator's failure semantics
/// they are clamped to zero and logged at the call site rather than
/// propagated, so there is no variant for them.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum RadiosityError {
    /// Attempted to normalise a vector of zero length.
    #[error("cannot normalize a zero-length vector")]
    DegenerateVector,

    /// A patch's four vertices do not form a non-degenerate parallelogram
    /// (`paraCross` has zero length), or a subdivision grid dimension was
    /// zero.
    #[error("degenerate quad: patch has zero area")]
    DegenerateQuad,

    /// A camera's look direction has zero length.
    #[error("degenerate camera: look direction has zero length")]
    DegenerateCamera,

    /// The off-screen rendering context could not be created or configured.
    #[error("failed to set up the render context at resolution {resolution}")]
    RenderContextFailure {
        /// The requested hemicube face resolution.
        resolution: u32,
    },

    /// The Jacobi relaxation loop exceeded its iteration cap before the
    /// relative change in scene luminance fell below the convergence target.
    #[error("radiosity solution did not converge within {iterations} iterations (last relative change {last_relative_change:e})")]
    NotConverged {
        /// The iteration cap that was exceeded.
        iterations: u32,
        /// The relative change observed on the final iteration.
        last_relative_change: f64,
    },
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, RadiosityError>;
