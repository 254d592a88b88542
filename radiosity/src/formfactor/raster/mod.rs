// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! The hemicube raster form-factor oracle: renders every other patch into
//! an index-colour buffer from each target patch's point of view and sums
//! per-pixel weights for whichever patch is visible at each pixel.
//!
//! This is the expensive, approximate oracle — its accuracy improves with
//! `resolution` and is cross-checked against [`crate::formfactor::analytic`].
//! [`camera`] supplies the view frames; [`rasterizer`] supplies the software
//! renderer that draws into them.

pub mod camera;
pub mod rasterizer;

pub use camera::{Camera, CubeFace};
pub use rasterizer::{rgb_to_index, CpuRasterizer};

#[cfg(feature = "rayon")]
use rayon::prelude::*;
use strum::IntoEnumIterator as _;

use crate::error::Result;
use crate::math::Vec3;
use crate::scene::{Patch, VertexPool};
use crate::weighting;

/// Builds a camera at `target`'s centre, looking inward along its negated
/// area normal. `approx_up` is an arbitrary global direction; [`Camera::new`]
/// falls back to an arbitrary perpendicular if it happens to be parallel to
/// the look direction.
fn target_camera(target: &Patch, vs: &VertexPool) -> Result<Camera> {
    let eye = target.centre(vs);
    let look_dir = -target.area_normal(vs);
    Camera::new(eye, look_dir, Vec3::new(0.0, 1.0, 0.0))
}

fn quad_of(patch: &Patch, vs: &VertexPool) -> [Vec3; 4] {
    patch.vertices.map(|vi| vs[vi])
}

/// Renders the five hemicube faces for patch `i` and sums, per source patch,
/// the incoming-light weight of every pixel where it is the nearest visible
/// surface.
fn calc_light_row(
    renderer: &mut CpuRasterizer,
    resolution: u32,
    patches: &[Patch],
    vs: &VertexPool,
    i: usize,
) -> Result<Vec<f64>> {
    renderer.setup_transfer_render(resolution)?;
    let base_camera = target_camera(&patches[i], vs)?;
    let mut row = vec![0.0; patches.len()];

    for face in CubeFace::hemicube_faces() {
        renderer.clear();
        renderer.set_model_view(base_camera.for_face(face));
        for (j, source) in patches.iter().enumerate() {
            if j == i {
                continue;
            }
            renderer.draw_flat_quad(quad_of(source, vs), j as u32);
        }
        let pixels = renderer.read_pixels();

        if face.is_front() {
            let weights = weighting::forward_light_weights(resolution);
            for (p, w) in weights.iter().enumerate() {
                if let Some(j) = pixel_index(pixels, p) {
                    row[j as usize] += w;
                }
            }
        } else {
            let weights = weighting::side_light_weights(resolution);
            let half_rows = (resolution / 2) as usize;
            let mut w_iter = weights.iter();
            for y in 0..half_rows {
                for x in 0..resolution as usize {
                    let p = y * resolution as usize + x;
                    let w = w_iter.next().expect("side weight table covers exactly the upper half of rows");
                    if let Some(j) = pixel_index(pixels, p) {
                        row[j as usize] += w;
                    }
                }
            }
        }
    }
    Ok(row)
}

/// Renders all six cube-map faces around `base_camera`'s eye and sums, per
/// other patch, the raw solid-angle weight of every pixel where it is the
/// nearest visible surface. `exclude` skips one patch index (its own
/// target, when the eye sits at that patch's centre); pass `None` when the
/// eye is an arbitrary point not identified with any one patch.
///
/// Unlike [`calc_light_row`], this is not restricted to the five hemicube
/// faces in front of the eye: [`crate::formfactor::analytic::subtended`] has
/// no forward-hemisphere restriction of its own (it is a function of eye
/// position and a source patch's own orientation alone, not of any viewing
/// direction), so matching it requires covering the full sphere — all six
/// `CubeFace` orientations, including `Back` — each with the same unhalved
/// weight table, since each of the six is a genuine, non-overlapping 90°
/// square of the surrounding sphere.
fn subtended_row_from_camera(
    renderer: &mut CpuRasterizer,
    resolution: u32,
    base_camera: Camera,
    patches: &[Patch],
    vs: &VertexPool,
    exclude: Option<usize>,
) -> Result<Vec<f64>> {
    renderer.setup_transfer_render(resolution)?;
    let mut row = vec![0.0; patches.len()];
    let weights = weighting::subtend_weights(resolution);

    for face in CubeFace::iter() {
        renderer.clear();
        renderer.set_model_view(base_camera.for_face(face));
        for (j, source) in patches.iter().enumerate() {
            if Some(j) == exclude {
                continue;
            }
            renderer.draw_flat_quad(quad_of(source, vs), j as u32);
        }
        let pixels = renderer.read_pixels();
        for (p, w) in weights.iter().enumerate() {
            if let Some(j) = pixel_index(pixels, p) {
                row[j as usize] += w;
            }
        }
    }
    Ok(row)
}

fn calc_subtended_row(
    renderer: &mut CpuRasterizer,
    resolution: u32,
    patches: &[Patch],
    vs: &VertexPool,
    i: usize,
) -> Result<Vec<f64>> {
    let base_camera = target_camera(&patches[i], vs)?;
    subtended_row_from_camera(renderer, resolution, base_camera, patches, vs, Some(i))
}

fn pixel_index(pixels: &[u8], p: usize) -> Option<u32> {
    rgb_to_index([pixels[p * 4], pixels[p * 4 + 1], pixels[p * 4 + 2]])
}

/// Builds the full n×n incoming-light transfer matrix by raster rendering,
/// row-major (`n = patches.len()`), as the raster counterpart to
/// [`crate::formfactor::analytic::calc_all_lights`].
#[cfg(feature = "rayon")]
pub fn calc_all_lights(resolution: u32, patches: &[Patch], vs: &VertexPool) -> Result<Vec<f64>> {
    let n = patches.len();
    let rows: Result<Vec<Vec<f64>>> = (0..n)
        .into_par_iter()
        .map(|i| {
            let mut renderer = CpuRasterizer::new();
            calc_light_row(&mut renderer, resolution, patches, vs, i)
        })
        .collect();
    let mut matrix = Vec::with_capacity(n * n);
    for row in rows? {
        matrix.extend(row);
    }
    Ok(matrix)
}

/// Builds the full n×n incoming-light transfer matrix by raster rendering,
/// row-major (`n = patches.len()`), as the raster counterpart to
/// [`crate::formfactor::analytic::calc_all_lights`].
#[cfg(not(feature = "rayon"))]
pub fn calc_all_lights(resolution: u32, patches: &[Patch], vs: &VertexPool) -> Result<Vec<f64>> {
    let n = patches.len();
    let mut renderer = CpuRasterizer::new();
    let mut matrix = Vec::with_capacity(n * n);
    for i in 0..n {
        matrix.extend(calc_light_row(&mut renderer, resolution, patches, vs, i)?);
    }
    Ok(matrix)
}

/// Builds the full n×n solid-angle subtend matrix by raster rendering, the
/// raster-side half of the analytic/raster cross-check.
pub fn calc_all_subtended(resolution: u32, patches: &[Patch], vs: &VertexPool) -> Result<Vec<f64>> {
    let n = patches.len();
    let mut renderer = CpuRasterizer::new();
    let mut matrix = Vec::with_capacity(n * n);
    for i in 0..n {
        matrix.extend(calc_subtended_row(&mut renderer, resolution, patches, vs, i)?);
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Rgb;
    use crate::scene::{build_cube_scene, top_centre_emitter};

    #[test]
    fn transfer_matrix_diagonal_is_zero() {
        let (scene, _) = build_cube_scene(Rgb::new(0.9, 0.9, 0.9), Rgb::new(2.0, 2.0, 2.0), 2, top_centre_emitter);
        let n = scene.patches.len();
        let t = calc_all_lights(16, &scene.patches, &scene.vertices).unwrap();
        for i in 0..n {
            assert_eq!(t[i * n + i], 0.0);
        }
    }

    #[test]
    fn transfer_matrix_rows_are_non_negative_and_bounded() {
        let (scene, _) = build_cube_scene(Rgb::new(0.9, 0.9, 0.9), Rgb::new(2.0, 2.0, 2.0), 2, top_centre_emitter);
        let n = scene.patches.len();
        let t = calc_all_lights(16, &scene.patches, &scene.vertices).unwrap();
        for i in 0..n {
            let sum: f64 = t[i * n..i * n + n].iter().sum();
            assert!(sum >= 0.0);
            assert!(sum <= 1.0 + 0.05, "row {} summed to {}", i, sum);
        }
    }

    #[test]
    fn subtended_from_cube_centre_covers_each_face_exactly_once() {
        let (scene, _) = build_cube_scene(Rgb::new(0.9, 0.9, 0.9), Rgb::new(2.0, 2.0, 2.0), 1, |_| false);
        let mut renderer = CpuRasterizer::new();
        let camera = Camera::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0)).unwrap();
        let row = subtended_row_from_camera(&mut renderer, 128, camera, &scene.patches, &scene.vertices, None).unwrap();
        assert_eq!(row.len(), 6);
        for (i, v) in row.iter().enumerate() {
            assert!((v - 1.0).abs() < 1e-2, "face {} subtended {} (expected ~1.0)", i, v);
        }
    }

    #[test]
    fn raster_subtended_agrees_with_analytic_within_tolerance() {
        let (scene, _) = build_cube_scene(Rgb::new(0.9, 0.9, 0.9), Rgb::new(2.0, 2.0, 2.0), 2, top_centre_emitter);
        let n = scene.patches.len();
        let raster = calc_all_subtended(96, &scene.patches, &scene.vertices).unwrap();
        let mut max_abs_err = 0.0f64;
        for i in 0..n {
            let eye = scene.patches[i].centre(&scene.vertices);
            for (j, source) in scene.patches.iter().enumerate() {
                if j == i {
                    continue;
                }
                let analytic = crate::formfactor::analytic::subtended(eye, source, &scene.vertices);
                max_abs_err = max_abs_err.max((raster[i * n + j] - analytic).abs());
            }
        }
        assert!(max_abs_err < 0.1, "max abs error {}", max_abs_err);
    }

    #[test]
    fn raster_agrees_with_analytic_within_tolerance() {
        let (scene, _) = build_cube_scene(Rgb::new(0.9, 0.9, 0.9), Rgb::new(2.0, 2.0, 2.0), 2, top_centre_emitter);
        let n = scene.patches.len();
        let raster = calc_all_lights(96, &scene.patches, &scene.vertices).unwrap();
        let analytic = crate::formfactor::analytic::calc_all_lights(&scene.patches, &scene.vertices);
        let mut max_abs_err = 0.0f64;
        for i in 0..n * n {
            max_abs_err = max_abs_err.max((raster[i] - analytic[i]).abs());
        }
        // A coarse resolution and only two subdivisions per face keeps this
        // test fast; the bound is loose accordingly.
        assert!(max_abs_err < 0.1, "max abs error {}", max_abs_err);
    }
}
