// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! The Jacobi radiosity iterator: drives a scene's per-patch `screen_colour`
//! to convergence given a precomputed transfer matrix.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::error::{RadiosityError, Result};
use crate::math::Rgb;
use crate::scene::{Patch, VertexPool};

/// The outcome of a successful [`solve`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IterationReport {
    /// The number of Jacobi steps performed.
    pub iterations: u32,
    /// The relative change in scene luminance on the final step.
    pub last_relative_change: f64,
}

/// Drives `patches`' `screen_colour` to convergence under `transfer` (an
/// `n*n` row-major matrix from [`crate::formfactor`]).
///
/// Emitters are reset to `material_colour` before the first step, re-asserting
/// the `isEmitter ⇒ screenColour = materialColour` invariant regardless of
/// whatever state `patches` arrived in. Every step is logged at `debug`;
/// the terminal outcome (converged, or exhausted `iteration_cap`) is logged
/// at `info` or `warn` respectively.
///
/// # Errors
///
/// Returns [`RadiosityError::NotConverged`] if `iteration_cap` steps pass
/// without the relative change in scene luminance falling to
/// `convergence_target` or below.
pub fn solve(
    patches: &mut [Patch],
    vs: &VertexPool,
    transfer: &[f64],
    convergence_target: f64,
    iteration_cap: u32,
) -> Result<IterationReport> {
    for p in patches.iter_mut() {
        if p.is_emitter {
            p.screen_colour = p.material_colour;
        }
    }

    let mut light_prev = 0.0f64;
    let mut last_relative_change = f64::INFINITY;

    for iteration in 1..=iteration_cap {
        let old: Vec<Rgb> = patches.iter().map(|p| p.screen_colour).collect();
        let new = jacobi_step(patches, &old, transfer);
        for (p, c) in patches.iter_mut().zip(new.iter()) {
            p.screen_colour = *c;
        }

        let light_new = scene_luminance(patches, vs);
        if light_new == 0.0 {
            log::info!("iteration {}: scene luminance is zero, nothing to converge toward", iteration);
            return Ok(IterationReport { iterations: iteration, last_relative_change: 0.0 });
        }

        last_relative_change = if light_prev == 0.0 { f64::INFINITY } else { (light_prev / light_new - 1.0).abs() };
        log::debug!(
            "iteration {}: scene luminance {:.6}, relative change {:e}",
            iteration,
            light_new,
            last_relative_change
        );
        light_prev = light_new;

        if last_relative_change <= convergence_target {
            log::info!("converged after {} iterations (relative change {:e})", iteration, last_relative_change);
            return Ok(IterationReport { iterations: iteration, last_relative_change });
        }
    }

    log::warn!(
        "did not converge within {} iterations (last relative change {:e})",
        iteration_cap,
        last_relative_change
    );
    Err(RadiosityError::NotConverged { iterations: iteration_cap, last_relative_change })
}

#[cfg(feature = "rayon")]
fn jacobi_step(patches: &[Patch], old: &[Rgb], transfer: &[f64]) -> Vec<Rgb> {
    let n = patches.len();
    (0..n).into_par_iter().map(|i| jacobi_target(i, patches, old, transfer, n)).collect()
}

#[cfg(not(feature = "rayon"))]
fn jacobi_step(patches: &[Patch], old: &[Rgb], transfer: &[f64]) -> Vec<Rgb> {
    let n = patches.len();
    (0..n).map(|i| jacobi_target(i, patches, old, transfer, n)).collect()
}

/// `screenColour_new[i]`: a fixed `(1,1,1)` forcing term for emitters, or
/// `Σⱼ T[i][j]·old[j]` modulated by `materialColour[i]` otherwise. NaN or
/// infinite transfer entries are clamped to zero and logged, rather than
/// propagated.
fn jacobi_target(i: usize, patches: &[Patch], old: &[Rgb], transfer: &[f64], n: usize) -> Rgb {
    let patch = &patches[i];
    if patch.is_emitter {
        return patch.material_colour;
    }
    let mut incoming = Rgb::ZERO;
    for (j, &t) in transfer[i * n..i * n + n].iter().enumerate() {
        if t == 0.0 {
            continue;
        }
        if !t.is_finite() {
            log::warn!("transfer[{}][{}] is {}, clamping to zero", i, j, t);
            continue;
        }
        incoming += old[j] * t;
    }
    incoming * patch.material_colour
}

/// `Σᵢ asGrey(screenColour_i) · area_i`. A degenerate patch (zero area)
/// contributes nothing rather than aborting the whole metric; such patches
/// should have been rejected at scene-construction time already.
fn scene_luminance(patches: &[Patch], vs: &VertexPool) -> f64 {
    patches.iter().map(|p| p.screen_colour.as_grey() * p.area(vs).unwrap_or(0.0)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    fn unit_square(vs: &mut VertexPool, material: Rgb) -> Patch {
        let i0 = vs.push(Vec3::new(-1.0, -1.0, 1.0));
        let i1 = vs.push(Vec3::new(1.0, -1.0, 1.0));
        let i2 = vs.push(Vec3::new(1.0, 1.0, 1.0));
        let i3 = vs.push(Vec3::new(-1.0, 1.0, 1.0));
        Patch::new([i0, i1, i2, i3], material)
    }

    #[test]
    fn two_patch_scene_converges_to_closed_form() {
        let mut vs = VertexPool::new();
        let emitter = unit_square(&mut vs, Rgb::new(2.0, 2.0, 2.0)).into_emitter();
        let receiver = unit_square(&mut vs, Rgb::new(0.5, 0.5, 0.5));
        let mut patches = vec![emitter, receiver];
        // T[0][*] = 0 (the emitter ignores incoming light); T[1][0] = 0.5.
        let transfer = vec![0.0, 0.0, 0.5, 0.0];

        let report = solve(&mut patches, &vs, &transfer, 0.001, 50).unwrap();
        assert!(report.iterations <= 5);
        assert_eq!(patches[0].screen_colour, Rgb::new(2.0, 2.0, 2.0));
        let got = patches[1].screen_colour;
        assert!((got.red() - 0.5).abs() < 1e-9, "expected 0.5, got {:?}", got);
    }

    #[test]
    fn exhausting_the_cap_reports_not_converged() {
        let mut vs = VertexPool::new();
        let emitter = unit_square(&mut vs, Rgb::new(2.0, 2.0, 2.0)).into_emitter();
        let receiver = unit_square(&mut vs, Rgb::new(0.5, 0.5, 0.5));
        let mut patches = vec![emitter, receiver];
        let transfer = vec![0.0, 0.0, 0.5, 0.0];

        let err = solve(&mut patches, &vs, &transfer, 1e-12, 1).unwrap_err();
        assert!(matches!(err, RadiosityError::NotConverged { iterations: 1, .. }));
    }

    #[test]
    fn lightless_scene_terminates_without_error() {
        let mut vs = VertexPool::new();
        let a = unit_square(&mut vs, Rgb::ZERO);
        let b = unit_square(&mut vs, Rgb::ZERO);
        let mut patches = vec![a, b];
        let transfer = vec![0.0, 0.0, 0.0, 0.0];

        let report = solve(&mut patches, &vs, &transfer, 0.001, 50).unwrap();
        assert_eq!(report.iterations, 1);
    }

    #[test]
    fn emitters_are_reasserted_before_solving() {
        let mut vs = VertexPool::new();
        let mut emitter = unit_square(&mut vs, Rgb::new(2.0, 2.0, 2.0)).into_emitter();
        emitter.screen_colour = Rgb::ZERO; // as if left in a stale state
        let receiver = unit_square(&mut vs, Rgb::new(0.5, 0.5, 0.5));
        let mut patches = vec![emitter, receiver];
        let transfer = vec![0.0, 0.0, 0.5, 0.0];

        solve(&mut patches, &vs, &transfer, 0.001, 50).unwrap();
        assert_eq!(patches[0].screen_colour, Rgb::new(2.0, 2.0, 2.0));
    }
}
