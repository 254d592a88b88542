// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Regular subdivision of a base quad into a u×v grid.

use crate::error::{RadiosityError, Result};
use crate::math::lerp;
use crate::scene::patch::{Patch, PatchIndex, VertexIndex, VertexPool};

/// Bookkeeping record returned by [`subdivide`], recording where its output
/// landed in the shared pools so later passes (Gouraud reconstruction)
/// can look up sub-patches by `(u, v)` grid cell.
#[derive(Clone, Copy, Debug)]
pub struct SubdivInfo {
    /// The base quad's own four vertex indices, before subdivision.
    pub base: [VertexIndex; 4],
    /// Grid width in cells.
    pub u_count: u32,
    /// Grid height in cells.
    pub v_count: u32,
    /// Index of the first vertex this call appended to the pool.
    pub vertex_start: VertexIndex,
    /// Index of the first patch this call appended to the patch list.
    pub face_start: PatchIndex,
}

impl SubdivInfo {
    /// The vertex index at grid position `(u, v)`, `0 <= u <= u_count`,
    /// `0 <= v <= v_count`.
    #[inline]
    pub fn vertex_at(&self, u: u32, v: u32) -> VertexIndex {
        self.vertex_start + (v * (self.u_count + 1) + u) as usize
    }

    /// The patch index of the sub-patch at cell `(u, v)`,
    /// `0 <= u < u_count`, `0 <= v < v_count`.
    #[inline]
    pub fn patch_at(&self, u: u32, v: u32) -> PatchIndex {
        self.face_start + (v * self.u_count + u) as usize
    }
}

/// Tessellates the quad `base` into `u_count * v_count` parallelograms
/// arranged in a `(u_count+1) x (v_count+1)` vertex grid, appending the new
/// vertices and patches to `vs` and `qs` respectively.
///
/// Every sub-patch inherits `base`'s `material_colour` and `is_emitter`.
///
/// # Errors
///
/// Returns [`RadiosityError::DegenerateQuad`] if `u_count` or `v_count` is
/// zero; a zero grid dimension would otherwise silently produce no
/// sub-patches at all and a `SubdivInfo` indistinguishable from a caller's
/// off-by-one bug.
pub fn subdivide(
    base: &Patch,
    vs: &mut VertexPool,
    qs: &mut Vec<Patch>,
    u_count: u32,
    v_count: u32,
) -> Result<SubdivInfo> {
    if u_count == 0 || v_count == 0 {
        return Err(RadiosityError::DegenerateQuad);
    }

    let [v0, v1, v2, v3] = base.vertices.map(|i| vs.get(i));
    let vertex_start = vs.len();
    for v in 0..=v_count {
        let fv = v as f64 / v_count as f64;
        for u in 0..=u_count {
            let fu = u as f64 / u_count as f64;
            let vertex = lerp(lerp(v0, v1, fu), lerp(v3, v2, fu), fv);
            vs.push(vertex);
        }
    }

    let face_start = qs.len();
    for v in 0..v_count {
        for u in 0..u_count {
            let row_stride = u_count + 1;
            let corner = vertex_start + (v * row_stride + u) as usize;
            let vertices = [
                corner,
                corner + 1,
                corner + row_stride as usize + 1,
                corner + row_stride as usize,
            ];
            let mut patch = Patch::new(vertices, base.material_colour);
            patch.is_emitter = base.is_emitter;
            if base.is_emitter {
                patch.screen_colour = base.material_colour;
            }
            qs.push(patch);
        }
    }

    Ok(SubdivInfo {
        base: base.vertices,
        u_count,
        v_count,
        vertex_start,
        face_start,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Rgb, Vec3};

    fn front_face() -> (VertexPool, Patch) {
        let mut vs = VertexPool::new();
        let i0 = vs.push(Vec3::new(-1.0, -1.0, 1.0));
        let i1 = vs.push(Vec3::new(1.0, -1.0, 1.0));
        let i2 = vs.push(Vec3::new(1.0, 1.0, 1.0));
        let i3 = vs.push(Vec3::new(-1.0, 1.0, 1.0));
        (vs, Patch::new([i0, i1, i2, i3], Rgb::new(0.8, 0.8, 0.8)))
    }

    #[test]
    fn one_by_one_grid_reproduces_the_base_quad() {
        let (mut vs, base) = front_face();
        let mut qs = Vec::new();
        let before_vertex_count = vs.len();
        let info = subdivide(&base, &mut vs, &mut qs, 1, 1).unwrap();
        assert_eq!(qs.len(), 1);
        assert_eq!(vs.len() - before_vertex_count, 4);
        assert!((qs[0].area(&vs).unwrap() - 4.0).abs() < 1e-9);
        assert_eq!(info.u_count, 1);
    }

    #[test]
    fn sub_patch_areas_sum_to_the_base_area_and_inherit_its_material() {
        let (mut vs, base) = front_face();
        let mut qs = Vec::new();
        subdivide(&base, &mut vs, &mut qs, 10, 20).unwrap();
        assert_eq!(qs.len(), 200);
        let mut total = 0.0;
        for q in &qs {
            total += q.area(&vs).unwrap();
            assert_eq!(q.material_colour, base.material_colour);
        }
        assert!((total - 4.0).abs() < 1e-9);
    }

    #[test]
    fn zero_grid_dimension_is_degenerate() {
        let (mut vs, base) = front_face();
        let mut qs = Vec::new();
        assert_eq!(
            subdivide(&base, &mut vs, &mut qs, 0, 4),
            Err(RadiosityError::DegenerateQuad)
        );
        assert!(qs.is_empty());
    }

    #[test]
    fn emitter_propagates_screen_colour() {
        let (mut vs, base) = front_face();
        let base = base.into_emitter();
        let mut qs = Vec::new();
        subdivide(&base, &mut vs, &mut qs, 2, 2).unwrap();
        for q in &qs {
            assert!(q.is_emitter);
            assert_eq!(q.screen_colour, base.material_colour);
        }
    }
}
