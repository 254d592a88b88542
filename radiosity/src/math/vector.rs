// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! 3-vector primitives used throughout scene construction, form factors, and
//! the iterator. This module is private but reexported by its parent.

use cgmath::{InnerSpace as _, Vector3};

use crate::error::{RadiosityError, Result};

/// Coordinates and vector components are `f64` rather than `f32`: the Jacobi
/// solve and the analytic/raster cross-check both
/// accumulate many small terms, and `f32` rounding error is large enough to
/// threaten the 0.1%-relative-error tolerance that check requires.
pub type FreeCoordinate = f64;

/// A point or displacement in ℝ³.
pub type Vec3 = Vector3<FreeCoordinate>;

/// Linear interpolation: `lerp(a, b, 0) = a`, `lerp(a, b, 1) = b`.
#[inline]
pub fn lerp(a: Vec3, b: Vec3, t: FreeCoordinate) -> Vec3 {
    a * (1.0 - t) + b * t
}

/// Linear interpolation between two scalars.
#[inline]
pub fn lerp_scalar(a: FreeCoordinate, b: FreeCoordinate, t: FreeCoordinate) -> FreeCoordinate {
    a * (1.0 - t) + b * t
}

/// Returns `v` normalised to unit length.
///
/// # Errors
///
/// Returns [`RadiosityError::DegenerateVector`] if `v` has zero length.
#[inline]
pub fn normalize(v: Vec3) -> Result<Vec3> {
    let len = v.magnitude();
    if len == 0.0 {
        Err(RadiosityError::DegenerateVector)
    } else {
        Ok(v / len)
    }
}

/// Gram-Schmidt orthogonalisation of `v1` against `v2`:
/// `v1 - v2 * (v1·v2)/(v2·v2)`.
#[inline]
pub fn orthog(v1: Vec3, v2: Vec3) -> Vec3 {
    v1 - v2 * (v1.dot(v2) / v2.dot(v2))
}

/// Returns an arbitrary unit vector perpendicular to `v`.
///
/// Picks whichever of the three axis vectors has the smallest component
/// magnitude in `v` (so it is least parallel to `v`) and orthogonalises it
/// against `v`, which keeps the result numerically well-conditioned for any
/// input direction.
///
/// # Errors
///
/// Returns [`RadiosityError::DegenerateVector`] if `v` has zero length.
pub fn perp(v: Vec3) -> Result<Vec3> {
    let axis = if v.x.abs() <= v.y.abs() && v.x.abs() <= v.z.abs() {
        Vec3::new(1.0, 0.0, 0.0)
    } else if v.y.abs() <= v.z.abs() {
        Vec3::new(0.0, 1.0, 0.0)
    } else {
        Vec3::new(0.0, 0.0, 1.0)
    };
    normalize(orthog(axis, v))
}
