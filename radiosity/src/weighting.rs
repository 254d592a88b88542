// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Per-pixel weighting tables for the hemicube raster oracle.
//!
//! Each table is a function of `resolution` alone, so every table is
//! memoised behind a [`Lazy`] cache keyed by resolution: every patch's
//! raster pass over a shared resolution reuses the identical array.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use cgmath::InnerSpace as _;
use once_cell::sync::Lazy;

use crate::math::{FreeCoordinate, Vec3};

fn pixel_centre(resolution: u32, x: u32, y: u32) -> (FreeCoordinate, FreeCoordinate, FreeCoordinate) {
    let conv = 2.0 / resolution as FreeCoordinate;
    let px = (x as FreeCoordinate + 0.5) * conv - 1.0;
    let py = (y as FreeCoordinate + 0.5) * conv - 1.0;
    (conv, px, py)
}

/// Solid-angle coverage on the unit sphere. Sums to `1/6` over one cube
/// face (i.e. `1.0` summed over all six faces of a cube map).
pub fn calc_subtend_weights(resolution: u32) -> Vec<FreeCoordinate> {
    let weight = 3.0 / (2.0 * std::f64::consts::PI);
    let mut out = Vec::with_capacity((resolution * resolution) as usize);
    for y in 0..resolution {
        for x in 0..resolution {
            let (conv, px, py) = pixel_centre(resolution, x, y);
            let dist_sq = px * px + py * py;
            let x_factor = 1.0 / (1.0 + dist_sq);
            let y_factor = x_factor.sqrt();
            out.push(weight * conv * conv * x_factor * y_factor);
        }
    }
    out
}

/// Cosine-weighted front hemisphere (Lambertian receiver facing `+Z`).
/// Sums to `1.0` over the front cube face.
pub fn calc_forward_light_weights(resolution: u32) -> Vec<FreeCoordinate> {
    let weight = 1.0 / std::f64::consts::PI;
    let mut out = Vec::with_capacity((resolution * resolution) as usize);
    for y in 0..resolution {
        for x in 0..resolution {
            let (conv, px, py) = pixel_centre(resolution, x, y);
            let dist_sq = px * px + py * py;
            let x_factor = 1.0 / (1.0 + dist_sq);
            let _ = py;
            out.push(weight * conv * conv * x_factor * x_factor);
        }
    }
    out
}

/// Cosine-weighted contribution from a side face of a hemicube; only the
/// rows with `py < 0` (the half of the face nearer the front face)
/// contribute, so this table has `resolution * resolution/2` entries laid
/// out in the same row-major order restricted to those rows.
pub fn calc_side_light_weights(resolution: u32) -> Vec<FreeCoordinate> {
    let weight = 1.0 / std::f64::consts::PI;
    let mut out = Vec::with_capacity((resolution * resolution / 2) as usize);
    for y in 0..resolution {
        let (conv, _, py) = pixel_centre(resolution, 0, y);
        if py >= 0.0 {
            continue;
        }
        for x in 0..resolution {
            let (_, px, py) = pixel_centre(resolution, x, y);
            let dist_sq = px * px + py * py;
            let x_factor = 1.0 / (1.0 + dist_sq);
            out.push(weight * conv * conv * x_factor * x_factor * (-py));
        }
    }
    out
}

/// Finite-difference cross-check for [`calc_subtend_weights`]: projects
/// each pixel's three corner vertices onto the unit
/// sphere and takes the planar-triangle area between them, which
/// approximates the true spherical-triangle area to `O(1/resolution)`.
pub fn proj_subtend_weights(resolution: u32) -> Vec<FreeCoordinate> {
    let conv = 2.0 / resolution as FreeCoordinate;
    let weight = 3.0 / (2.0 * std::f64::consts::PI);
    let corner = |x: u32, y: u32| -> Vec3 {
        let raw = Vec3::new(
            x as FreeCoordinate * conv - 1.0,
            y as FreeCoordinate * conv - 1.0,
            1.0,
        );
        crate::math::normalize(raw).expect("cube-face corner rays are never zero-length")
    };
    let mut out = Vec::with_capacity((resolution * resolution) as usize);
    for y in 0..resolution {
        for x in 0..resolution {
            let v1 = corner(x, y);
            let v2 = corner(x + 1, y);
            let v3 = corner(x, y + 1);
            out.push(weight * (v3 - v1).cross(v2 - v1).magnitude());
        }
    }
    out
}

#[derive(Eq, PartialEq, Hash, Clone, Copy)]
enum Table {
    Subtend,
    ForwardLight,
    SideLight,
    ProjSubtend,
}

static CACHE: Lazy<Mutex<HashMap<(Table, u32), &'static [FreeCoordinate]>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn cached(table: Table, resolution: u32, build: impl FnOnce(u32) -> Vec<FreeCoordinate>) -> &'static [FreeCoordinate] {
    let mut guard: MutexGuard<_> = CACHE.lock().unwrap();
    *guard
        .entry((table, resolution))
        .or_insert_with(|| Vec::leak(build(resolution)))
}

/// Memoised [`calc_subtend_weights`].
pub fn subtend_weights(resolution: u32) -> &'static [FreeCoordinate] {
    cached(Table::Subtend, resolution, calc_subtend_weights)
}

/// Memoised [`calc_forward_light_weights`].
pub fn forward_light_weights(resolution: u32) -> &'static [FreeCoordinate] {
    cached(Table::ForwardLight, resolution, calc_forward_light_weights)
}

/// Memoised [`calc_side_light_weights`].
pub fn side_light_weights(resolution: u32) -> &'static [FreeCoordinate] {
    cached(Table::SideLight, resolution, calc_side_light_weights)
}

/// Memoised [`proj_subtend_weights`].
pub fn proj_subtend_weights_cached(resolution: u32) -> &'static [FreeCoordinate] {
    cached(Table::ProjSubtend, resolution, proj_subtend_weights)
}
