// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! The two form-factor oracles: an exact analytic solution for
//! parallelogram-to-point transfers, and an approximate hemicube rasteriser
//! that scales to occluded, non-convex scenes.

pub mod analytic;
pub mod raster;
