// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! `radiosity` computes a classical diffuse radiosity solution for a closed
//! scene of planar parallelogram patches: it builds an n×n transfer matrix
//! between patches (via either a closed-form analytic oracle or a
//! hemicube-rasterising oracle), relaxes it to convergence with Jacobi
//! iteration, and reconstructs smoothly shaded display geometry from the
//! result.
//!
//! For a command-line driver that builds the reference scene, runs it, and
//! writes a PNG, see the `radiosity-desktop` crate.

#![warn(clippy::cast_lossless)]

pub mod error;
pub mod formfactor;
pub mod gouraud;
pub mod iteration;
pub mod math;
pub mod normalize;
pub mod options;
pub mod scene;
pub mod weighting;
