// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Brightness normalisation: rescales solved colours so the
//! brightest viewer-facing, non-emitter patch reaches a target brightness.

use cgmath::InnerSpace as _;

use crate::math::{Rgb, Vec3};
use crate::scene::{Patch, VertexPool};

/// The fixed viewpoint normalisation is evaluated against, matching the
/// reference scene's camera placement (`gluLookAt` eye position).
pub const EYE_POS: Vec3 = Vec3::new(0.0, 0.0, -3.0);

/// Whether `patch` faces `EYE_POS`: `EYE_POS` lies on the outward side of
/// the patch's own plane, i.e. the eye-from-centre direction has a positive
/// component along the patch's outward area normal.
///
/// Written as `(EYE_POS - centre) · normal`, not `(centre - EYE_POS) ·
/// normal`: on the canonical cube (`scene::cube`), the face at `z = -1`
/// (centre `(0,0,-1)`, normal `(0,0,-4)`) is the one that actually faces
/// `EYE_POS` at `(0,0,-3)`, and only the former ordering gives it a positive
/// sign (`(0,0,-2)·(0,0,-4) = 8`); the latter gives `-8` to that face and
/// `+16` to the opposite, occluded face at `z = +1`.
fn faces_viewer(patch: &Patch, vs: &VertexPool) -> bool {
    (EYE_POS - patch.centre(vs)).dot(patch.area_normal(vs)) > 0.0
}

/// Rescales every non-emitter's `screen_colour` so the brightest RGB
/// component among non-emitter patches facing `EYE_POS` reaches
/// `target_brightness`, leaving emitters untouched.
///
/// If no non-emitter patch faces the viewer, there is nothing to rescale
/// against and this is a no-op rather than fabricating a scale factor.
pub fn normalize(patches: &mut [Patch], vs: &VertexPool, target_brightness: f64) {
    let max_component = patches
        .iter()
        .filter(|p| !p.is_emitter && faces_viewer(p, vs))
        .map(|p| p.screen_colour.max_component())
        .fold(0.0f64, f64::max);

    if max_component <= 0.0 || max_component >= target_brightness {
        return;
    }

    let scale = target_brightness / max_component;
    log::debug!("normalizing by {:.4} (brightest viewer-facing patch was {:.4})", scale, max_component);
    for p in patches.iter_mut() {
        if !p.is_emitter {
            p.screen_colour = p.screen_colour * scale;
        }
    }
}
