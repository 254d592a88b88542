// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Linear algebra and colour primitives.

mod color;
mod vector;

pub use color::Rgb;
pub use vector::{lerp, lerp_scalar, normalize, orthog, perp, FreeCoordinate, Vec3};
