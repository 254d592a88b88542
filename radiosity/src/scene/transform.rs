// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Affine mesh transforms with vertex-sharing preserved.
//!
//! The original source models each transform as a distinct polymorphic
//! object; this crate instead uses one enum dispatched from a single `apply`
//! method, since none of the four kinds needs to be independently
//! extensible.

use std::collections::HashMap;

use cgmath::InnerSpace as _;

use crate::error::Result;
use crate::math::{FreeCoordinate, Vec3};
use crate::scene::patch::{Patch, VertexIndex, VertexPool};

/// One of the four affine operations a mesh can be put through.
#[derive(Clone, Copy, Debug)]
pub enum Transform {
    /// Adds a fixed displacement to every vertex.
    Translate(Vec3),
    /// Scales every vertex about the origin.
    Scale(FreeCoordinate),
    /// Rotates every vertex about an axis through the origin, by radians.
    Rotate { axis: Vec3, angle: FreeCoordinate },
    /// Reverses winding (swaps `i1` and `i3`), inverting the outward normal.
    Flip,
}

impl Transform {
    /// Applies this transform in place to `patches`, appending any newly
    /// transformed vertices to `vs`.
    ///
    /// Vertex sharing is preserved: a vertex referenced by more than one of
    /// `patches` is transformed exactly once per call, via a cache mapping
    /// original index to new index; `Flip` never touches `vs` at all.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RadiosityError::DegenerateVector`] if this is
    /// a `Rotate` around a zero-length axis.
    pub fn apply(&self, vs: &mut VertexPool, patches: &mut [Patch]) -> Result<()> {
        match self {
            Transform::Flip => {
                for p in patches.iter_mut() {
                    p.vertices.swap(1, 3);
                }
                Ok(())
            }
            Transform::Translate(delta) => {
                self.apply_per_vertex(vs, patches, |v| Ok(v + *delta))
            }
            Transform::Scale(factor) => self.apply_per_vertex(vs, patches, |v| Ok(v * *factor)),
            Transform::Rotate { axis, angle } => {
                let basis = RotationBasis::new(*axis)?;
                let (c, s) = (angle.cos(), angle.sin());
                self.apply_per_vertex(vs, patches, |v| Ok(basis.rotate(v, c, s)))
            }
        }
    }

    fn apply_per_vertex(
        &self,
        vs: &mut VertexPool,
        patches: &mut [Patch],
        mut f: impl FnMut(Vec3) -> Result<Vec3>,
    ) -> Result<()> {
        let mut cache: HashMap<VertexIndex, VertexIndex> = HashMap::new();
        for p in patches.iter_mut() {
            for slot in p.vertices.iter_mut() {
                let original = *slot;
                let new_index = match cache.get(&original) {
                    Some(&cached) => cached,
                    None => {
                        let transformed = f(vs.get(original))?;
                        let new_index = vs.push(transformed);
                        cache.insert(original, new_index);
                        new_index
                    }
                };
                *slot = new_index;
            }
        }
        Ok(())
    }
}

/// An orthonormal basis built from a rotation axis, used to decompose a
/// vector into in-plane and axis components.
struct RotationBasis {
    plane1: Vec3,
    plane2: Vec3,
    axis_hat: Vec3,
}

impl RotationBasis {
    fn new(axis: Vec3) -> Result<Self> {
        let axis_hat = crate::math::normalize(axis)?;
        let plane1 = crate::math::perp(axis_hat)?;
        let plane2 = axis_hat.cross(plane1);
        Ok(Self {
            plane1,
            plane2,
            axis_hat,
        })
    }

    fn rotate(&self, v: Vec3, c: FreeCoordinate, s: FreeCoordinate) -> Vec3 {
        let x = v.dot(self.plane1);
        let y = v.dot(self.plane2);
        let z = v.dot(self.axis_hat);
        let (rx, ry) = (c * x + s * y, -s * x + c * y);
        self.plane1 * rx + self.plane2 * ry + self.axis_hat * z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Rgb;
    use cgmath::InnerSpace as _;

    fn one_patch() -> (VertexPool, Vec<Patch>) {
        let mut vs = VertexPool::new();
        let i0 = vs.push(Vec3::new(-1.0, -1.0, 1.0));
        let i1 = vs.push(Vec3::new(1.0, -1.0, 1.0));
        let i2 = vs.push(Vec3::new(1.0, 1.0, 1.0));
        let i3 = vs.push(Vec3::new(-1.0, 1.0, 1.0));
        (vs, vec![Patch::new([i0, i1, i2, i3], Rgb::new(0.5, 0.5, 0.5))])
    }

    #[test]
    fn translate_moves_every_vertex() {
        let (mut vs, mut patches) = one_patch();
        Transform::Translate(Vec3::new(1.0, 0.0, 0.0))
            .apply(&mut vs, &mut patches)
            .unwrap();
        assert_eq!(vs.get(patches[0].vertices[0]), Vec3::new(0.0, -1.0, 1.0));
    }

    #[test]
    fn translate_shares_vertices_across_patches() {
        let (mut vs, mut patches) = one_patch();
        // Duplicate the patch so both reference the same original vertices.
        patches.push(patches[0]);
        let before_len = vs.len();
        Transform::Translate(Vec3::new(2.0, 0.0, 0.0))
            .apply(&mut vs, &mut patches)
            .unwrap();
        // Only 4 new vertices should have been appended, not 8.
        assert_eq!(vs.len(), before_len + 4);
        assert_eq!(patches[0].vertices, patches[1].vertices);
    }

    #[test]
    fn flip_swaps_i1_and_i3_and_inverts_normal() {
        let (vs, mut patches) = one_patch();
        let before = patches[0].area_normal(&vs);
        Transform::Flip.apply(&mut vs.clone(), &mut patches).unwrap();
        let after = patches[0].area_normal(&vs);
        assert_eq!(before, -after);
    }

    #[test]
    fn double_flip_restores_normal() {
        let (vs, mut patches) = one_patch();
        let before = patches[0].area_normal(&vs);
        Transform::Flip.apply(&mut vs.clone(), &mut patches).unwrap();
        Transform::Flip.apply(&mut vs.clone(), &mut patches).unwrap();
        let after = patches[0].area_normal(&vs);
        assert_eq!(before, after);
    }

    #[test]
    fn rotate_then_inverse_restores_vertices() {
        let (mut vs, mut patches) = one_patch();
        let original: Vec<Vec3> = patches[0].vertices.iter().map(|&i| vs.get(i)).collect();
        let axis = Vec3::new(1.0, 1.0, 0.0);
        Transform::Rotate {
            axis,
            angle: std::f64::consts::FRAC_PI_3,
        }
        .apply(&mut vs, &mut patches)
        .unwrap();
        Transform::Rotate {
            axis,
            angle: -std::f64::consts::FRAC_PI_3,
        }
        .apply(&mut vs, &mut patches)
        .unwrap();
        for (i, &expected) in patches[0].vertices.iter().zip(original.iter()) {
            let got = vs.get(*i);
            assert!((got - expected).magnitude() < 1e-9);
        }
    }

    #[test]
    fn rotate_around_zero_axis_is_degenerate() {
        let (mut vs, mut patches) = one_patch();
        let err = Transform::Rotate {
            axis: Vec3::new(0.0, 0.0, 0.0),
            angle: 1.0,
        }
        .apply(&mut vs, &mut patches);
        assert!(err.is_err());
    }
}
