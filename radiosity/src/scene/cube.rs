// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Canonical scene construction: the unit cube plus an optional
//! transformed inner occluder.

use crate::math::{Rgb, Vec3};
use crate::scene::patch::{Patch, VertexPool};
use crate::scene::subdivide::{subdivide, SubdivInfo};
use crate::scene::transform::Transform;

/// The eight canonical cube vertices, `[-1, +1]^3`, in the fixed reference
/// order.
pub const CANONICAL_VERTICES: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, 1.0),
];

/// The six canonical cube faces, as indices into [`CANONICAL_VERTICES`],
/// wound so each face's outward normal points away from the cube's
/// interior.
pub const CANONICAL_FACES: [[usize; 4]; 6] = [
    [1, 0, 2, 3],
    [3, 2, 6, 7],
    [7, 6, 4, 5],
    [5, 4, 0, 1],
    [4, 6, 2, 0],
    [7, 5, 1, 3],
];

/// A fully built scene: the shared vertex pool plus the (possibly
/// subdivided) patch list.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub vertices: VertexPool,
    pub patches: Vec<Patch>,
}

/// Builds the canonical unit-cube scene with a uniform `material_colour` on
/// every face, subdivides each face into `subdivision x subdivision`
/// sub-patches, and marks emitters using `is_emitter`, which is evaluated
/// once per sub-patch against its centre.
///
/// This is the only place the emitter predicate is evaluated, deliberately:
/// it is a property of how this particular scene is built, not of the
/// iterator.
pub fn build_cube_scene(
    material_colour: Rgb,
    emitter_material: Rgb,
    subdivision: u32,
    is_emitter: impl Fn(Vec3) -> bool,
) -> (Scene, Vec<SubdivInfo>) {
    let mut vertices = VertexPool::new();
    let base_indices: Vec<[usize; 4]> = CANONICAL_FACES
        .iter()
        .map(|face| face.map(|i| vertices.push(CANONICAL_VERTICES[i])))
        .collect();

    let mut patches = Vec::new();
    let mut infos = Vec::new();
    for face in &base_indices {
        let base = Patch::new(*face, material_colour);
        let info = subdivide(&base, &mut vertices, &mut patches, subdivision, subdivision)
            .expect("canonical cube faces are never degenerate");
        for i in info.face_start..info.face_start + (subdivision * subdivision) as usize {
            if is_emitter(patches[i].centre(&vertices)) {
                patches[i].material_colour = emitter_material;
                patches[i].is_emitter = true;
                patches[i].screen_colour = emitter_material;
            }
        }
        infos.push(info);
    }

    (Scene { vertices, patches }, infos)
}

/// The default emitter predicate from the original reference scene: a patch
/// is an emitter if its centre lies in the top-centre region of the
/// bounding cube (`y > 0.9`).
pub fn top_centre_emitter(centre: Vec3) -> bool {
    centre.y > 0.9
}

/// Inserts a second cube into `scene`, built at the unit size and then
/// transformed in sequence by `transforms` (e.g. scale down, rotate,
/// translate toward a corner), as an occluder for raster-vs-analytic
/// cross-checks and end-to-end occluder scenarios.
/// Returns the range of newly appended patch indices.
pub fn insert_transformed_cube(
    scene: &mut Scene,
    material_colour: Rgb,
    transforms: &[Transform],
) -> crate::error::Result<std::ops::Range<usize>> {
    let start_patch = scene.patches.len();
    for face in &CANONICAL_FACES {
        let vertices = face.map(|i| scene.vertices.push(CANONICAL_VERTICES[i]));
        scene.patches.push(Patch::new(vertices, material_colour));
    }
    let mut new_patches: Vec<Patch> = scene.patches[start_patch..].to_vec();
    for t in transforms {
        t.apply(&mut scene.vertices, &mut new_patches)?;
    }
    scene.patches[start_patch..].copy_from_slice(&new_patches);
    Ok(start_patch..scene.patches.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace as _;

    #[test]
    fn canonical_faces_have_area_four_and_outward_normal() {
        let mut vs = VertexPool::new();
        let indices: Vec<usize> = CANONICAL_VERTICES.iter().map(|&v| vs.push(v)).collect();
        for face in &CANONICAL_FACES {
            let vertices = face.map(|i| indices[i]);
            let patch = Patch::new(vertices, Rgb::ZERO);
            assert!((patch.area(&vs).unwrap() - 4.0).abs() < 1e-9);
            let corner = vs.get(vertices[0]);
            assert!(patch.area_normal(&vs).dot(corner) > 0.0);
        }
    }

    #[test]
    fn build_cube_scene_marks_top_centre_emitters() {
        let (scene, infos) = build_cube_scene(
            Rgb::new(0.9, 0.9, 0.9),
            Rgb::new(2.0, 2.0, 2.0),
            4,
            top_centre_emitter,
        );
        assert_eq!(infos.len(), 6);
        assert_eq!(scene.patches.len(), 6 * 4 * 4);
        assert!(scene.patches.iter().any(|p| p.is_emitter));
        for p in &scene.patches {
            if p.is_emitter {
                assert_eq!(p.screen_colour, Rgb::new(2.0, 2.0, 2.0));
            } else {
                assert_eq!(p.screen_colour, Rgb::ZERO);
            }
        }
    }

    #[test]
    fn insert_transformed_cube_appends_and_moves() {
        let (mut scene, _) = build_cube_scene(Rgb::new(0.9, 0.9, 0.9), Rgb::new(2.0, 2.0, 2.0), 1, |_| false);
        let before = scene.patches.len();
        let range = insert_transformed_cube(
            &mut scene,
            Rgb::new(0.5, 0.5, 0.5),
            &[Transform::Scale(0.3), Transform::Translate(Vec3::new(0.0, 0.0, 0.5))],
        )
        .unwrap();
        assert_eq!(range, before..before + 6);
        assert_eq!(scene.patches.len(), before + 6);
    }
}
