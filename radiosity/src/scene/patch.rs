// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! The patch model: a shared vertex pool and parallelogram patches indexed
//! into it.

use crate::error::{RadiosityError, Result};
use crate::math::{lerp, Rgb, Vec3};

/// An index into a [`VertexPool`].
pub type VertexIndex = usize;

/// An index into a patch list (e.g. a row/column of the transfer matrix).
pub type PatchIndex = usize;

/// A growing pool of vertices shared by every patch in a scene.
///
/// Patches never own their vertices; they refer to them by index, so that
/// subdivision and transforms can de-duplicate shared corners instead of
/// duplicating geometry.
#[derive(Clone, Debug, Default)]
pub struct VertexPool {
    vertices: Vec<Vec3>,
}

impl VertexPool {
    /// An empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a vertex and returns its index.
    pub fn push(&mut self, v: Vec3) -> VertexIndex {
        self.vertices.push(v);
        self.vertices.len() - 1
    }

    /// The number of vertices currently in the pool.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Looks up a vertex by index.
    #[inline]
    pub fn get(&self, i: VertexIndex) -> Vec3 {
        self.vertices[i]
    }
}

impl std::ops::Index<VertexIndex> for VertexPool {
    type Output = Vec3;
    #[inline]
    fn index(&self, i: VertexIndex) -> &Vec3 {
        &self.vertices[i]
    }
}

/// A parallelogram patch: four vertex indices plus material state.
///
/// The vertex order `(i0, i1, i2, i3)` must wind so that
/// `(v3 - v0) × (v1 - v0)` (this patch's [`Patch::area_normal`]) points
/// outward from the enclosed region; nothing in this type enforces that by
/// construction, since it depends on the surrounding scene's convention.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Patch {
    /// Vertex indices `(i0, i1, i2, i3)`.
    pub vertices: [VertexIndex; 4],
    /// Reflectance: how much of incoming light this patch re-emits.
    pub material_colour: Rgb,
    /// Current radiosity, mutated in place by the Jacobi iterator.
    pub screen_colour: Rgb,
    /// Whether this patch is a fixed-emission light source.
    pub is_emitter: bool,
}

impl Patch {
    /// Constructs a non-emitter patch with zero initial radiosity.
    pub fn new(vertices: [VertexIndex; 4], material_colour: Rgb) -> Self {
        Self {
            vertices,
            material_colour,
            screen_colour: Rgb::ZERO,
            is_emitter: false,
        }
    }

    /// Marks this patch as an emitter, initialising `screen_colour` to
    /// `material_colour` so the invariant `isEmitter ⇒ screenColour =
    /// materialColour` holds immediately.
    pub fn into_emitter(mut self) -> Self {
        self.is_emitter = true;
        self.screen_colour = self.material_colour;
        self
    }

    /// The midpoint of the diagonal `i0↔i2`.
    pub fn centre(&self, vs: &VertexPool) -> Vec3 {
        lerp(vs[self.vertices[0]], vs[self.vertices[2]], 0.5)
    }

    /// `(v3 - v0) × (v1 - v0)`: outward area-weighted normal. Its length is
    /// the parallelogram's area.
    pub fn area_normal(&self, vs: &VertexPool) -> Vec3 {
        let v0 = vs[self.vertices[0]];
        let v1 = vs[self.vertices[1]];
        let v3 = vs[self.vertices[3]];
        (v3 - v0).cross(v1 - v0)
    }

    /// The area of this patch. Never negative.
    ///
    /// # Errors
    ///
    /// Returns [`RadiosityError::DegenerateQuad`] if the four vertices do
    /// not form a non-degenerate parallelogram.
    pub fn area(&self, vs: &VertexPool) -> Result<f64> {
        use cgmath::InnerSpace as _;
        let len = self.area_normal(vs).magnitude();
        if len == 0.0 {
            Err(RadiosityError::DegenerateQuad)
        } else {
            Ok(len)
        }
    }

    /// The unit outward normal.
    ///
    /// # Errors
    ///
    /// Returns [`RadiosityError::DegenerateQuad`] if the patch is degenerate.
    pub fn unit_normal(&self, vs: &VertexPool) -> Result<Vec3> {
        crate::math::normalize(self.area_normal(vs)).map_err(|_| RadiosityError::DegenerateQuad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(vs: &mut VertexPool) -> Patch {
        // Front cube face, outward normal +Z, matching the canonical winding
        // used for scene construction.
        let i0 = vs.push(Vec3::new(-1.0, -1.0, 1.0));
        let i1 = vs.push(Vec3::new(1.0, -1.0, 1.0));
        let i2 = vs.push(Vec3::new(1.0, 1.0, 1.0));
        let i3 = vs.push(Vec3::new(-1.0, 1.0, 1.0));
        Patch::new([i0, i1, i2, i3], Rgb::new(0.8, 0.8, 0.8))
    }

    #[test]
    fn area_of_canonical_face_is_four() {
        let mut vs = VertexPool::new();
        let q = square(&mut vs);
        assert!((q.area(&vs).unwrap() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn area_normal_points_outward() {
        let mut vs = VertexPool::new();
        let q = square(&mut vs);
        assert!(q.area_normal(&vs).z > 0.0);
    }

    #[test]
    fn degenerate_quad_detected() {
        let mut vs = VertexPool::new();
        let i = vs.push(Vec3::new(0.0, 0.0, 0.0));
        let q = Patch::new([i, i, i, i], Rgb::ZERO);
        assert_eq!(q.area(&vs), Err(RadiosityError::DegenerateQuad));
    }

    #[test]
    fn emitter_initialises_screen_colour() {
        let mat = Rgb::new(2.0, 2.0, 2.0);
        let mut vs = VertexPool::new();
        let q = Patch::new(square(&mut vs).vertices, mat).into_emitter();
        assert!(q.is_emitter);
        assert_eq!(q.screen_colour, mat);
    }
}
