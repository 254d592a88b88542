// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! The analytic point-to-patch form-factor oracle.

use cgmath::InnerSpace as _;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::math::Vec3;
use crate::scene::{Patch, VertexPool};

/// Per-face normalising constant: a camera at the centre of the unit cube
/// sees each of the six faces subtend exactly `1.0` of this unit, since the
/// six faces together cover the full solid angle and their combined surface
/// area is `6`.
const SUBTEND_NORMALIZATION: f64 = 1.5;

/// The projected area of `q` onto the ray from `eye` toward its centre, or
/// `0.0` if `q` faces away from `eye`. Returns `(area, len, dir)` so callers
/// needing more than one derived quantity (subtended vs. light) don't repeat
/// the centre/distance computation.
fn projected(eye: Vec3, q: &Patch, vs: &VertexPool) -> (f64, f64, Vec3) {
    let d = q.centre(vs) - eye;
    let len = d.magnitude();
    if len == 0.0 {
        return (0.0, 0.0, Vec3::new(0.0, 0.0, 0.0));
    }
    let dir = d / len;
    let area = q.area_normal(vs).dot(dir).max(0.0);
    (area, len, dir)
}

/// The single-face subtended form factor of `q` as seen from `eye`: the
/// fraction of the unit hemisphere's solid angle, in the per-face units
/// where one cube face subtends `1.0`, that `q` covers.
pub fn subtended(eye: Vec3, q: &Patch, vs: &VertexPool) -> f64 {
    let (area, len, _dir) = projected(eye, q, vs);
    if len == 0.0 {
        return 0.0;
    }
    SUBTEND_NORMALIZATION * area / (std::f64::consts::PI * len * len)
}

/// The incoming-light form factor of `q` as seen by a camera at `eye`
/// looking along `look_dir` (need not be normalised; zero length yields
/// `0.0` rather than a [`crate::error::RadiosityError::DegenerateCamera`],
/// since this is an inner helper called once per source patch — the camera
/// itself is validated once by the caller).
pub fn light(eye: Vec3, look_dir: Vec3, q: &Patch, vs: &VertexPool) -> f64 {
    let (area, len, dir) = projected(eye, q, vs);
    if len == 0.0 {
        return 0.0;
    }
    let look_len = look_dir.magnitude();
    if look_len == 0.0 {
        return 0.0;
    }
    let cos_cam = (look_dir / look_len).dot(dir).max(0.0);
    cos_cam * area / (std::f64::consts::PI * len * len)
}

/// Builds the full n×n transfer matrix (row-major, `n = patches.len()`) by
/// placing a camera at the centre of each target patch `i`, facing inward
/// along `-area_normal(i)`, and evaluating [`light`] against every source
/// patch `j != i`.
///
/// `T[i][i]` is always `0.0`: self-transfer is excluded explicitly rather
/// than left to fall out of `light`'s distance-zero case, since a patch's
/// own centre has zero distance to itself and would otherwise require
/// `light` to special-case it anyway.
pub fn calc_all_lights(patches: &[Patch], vs: &VertexPool) -> Vec<f64> {
    let n = patches.len();

    #[cfg(feature = "rayon")]
    let rows: Vec<Vec<f64>> = (0..n).into_par_iter().map(|i| calc_all_lights_row(i, patches, vs)).collect();
    #[cfg(not(feature = "rayon"))]
    let rows: Vec<Vec<f64>> = (0..n).map(|i| calc_all_lights_row(i, patches, vs)).collect();

    let mut matrix = Vec::with_capacity(n * n);
    for row in rows {
        matrix.extend(row);
    }
    matrix
}

fn calc_all_lights_row(i: usize, patches: &[Patch], vs: &VertexPool) -> Vec<f64> {
    let target = &patches[i];
    let eye = target.centre(vs);
    let look_dir = -target.area_normal(vs);
    let mut row = vec![0.0; patches.len()];
    for (j, source) in patches.iter().enumerate() {
        if j == i {
            continue;
        }
        row[j] = light(eye, look_dir, source, vs);
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Rgb;
    use crate::scene::{build_cube_scene, top_centre_emitter};

    #[test]
    fn subtended_from_centre_sums_to_one_per_face() {
        let (scene, infos) = build_cube_scene(Rgb::new(0.9, 0.9, 0.9), Rgb::new(2.0, 2.0, 2.0), 32, |_| false);
        let eye = Vec3::new(0.0, 0.0, 0.0);
        for info in &infos {
            let mut total = 0.0;
            for u in 0..info.u_count {
                for v in 0..info.v_count {
                    let p = &scene.patches[info.patch_at(u, v)];
                    total += subtended(eye, p, &scene.vertices);
                }
            }
            assert!((total - 1.0).abs() < 1e-6, "face subtended sum was {}", total);
        }
    }

    #[test]
    fn back_facing_patch_contributes_nothing() {
        let mut vs = VertexPool::new();
        // Front face, +Z outward.
        let i0 = vs.push(Vec3::new(-1.0, -1.0, 1.0));
        let i1 = vs.push(Vec3::new(1.0, -1.0, 1.0));
        let i2 = vs.push(Vec3::new(1.0, 1.0, 1.0));
        let i3 = vs.push(Vec3::new(-1.0, 1.0, 1.0));
        let q = Patch::new([i0, i1, i2, i3], Rgb::new(0.9, 0.9, 0.9));
        // Eye behind the face, looking at it from outside the cube: the
        // patch faces away from this eye.
        let eye = Vec3::new(0.0, 0.0, 2.0);
        assert_eq!(subtended(eye, &q, &vs), 0.0);
    }

    #[test]
    fn transfer_matrix_diagonal_is_zero() {
        let (scene, _) = build_cube_scene(Rgb::new(0.9, 0.9, 0.9), Rgb::new(2.0, 2.0, 2.0), 4, top_centre_emitter);
        let n = scene.patches.len();
        let t = calc_all_lights(&scene.patches, &scene.vertices);
        for i in 0..n {
            assert_eq!(t[i * n + i], 0.0);
        }
    }

    #[test]
    fn energy_conservation_on_closed_scene() {
        let (scene, _) = build_cube_scene(Rgb::new(0.9, 0.9, 0.9), Rgb::new(2.0, 2.0, 2.0), 4, top_centre_emitter);
        let n = scene.patches.len();
        let t = calc_all_lights(&scene.patches, &scene.vertices);
        for i in 0..n {
            let sum: f64 = t[i * n..i * n + n].iter().sum();
            assert!(sum <= 1.0 + 1e-3, "row {} summed to {}", i, sum);
        }
    }
}
