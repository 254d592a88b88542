// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! Gouraud reconstruction: turns flat-shaded sub-patches into a
//! smoothly-shaded quad mesh at twice the subdivision resolution, without
//! blurring away the sharp silhouette of an emitter against its neighbours.

use crate::math::{lerp, Rgb, Vec3};
use crate::scene::{Patch, SubdivInfo, VertexPool};

/// A single quad with its own per-vertex colour, ready for flat display
/// rasterisation (vertices wound the same way as the [`Patch`] it derives
/// from).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GouraudQuad {
    pub vertices: [Vec3; 4],
    pub colours: [Rgb; 4],
}

fn avg(a: Rgb, b: Rgb) -> Rgb {
    (a + b) * 0.5
}

fn clamp_cell(u: i64, v: i64, u_count: u32, v_count: u32) -> (u32, u32) {
    (
        u.clamp(0, u_count as i64 - 1) as u32,
        v.clamp(0, v_count as i64 - 1) as u32,
    )
}

/// The colour a neighbour at `(off_u, off_v)` from `(u, v)` contributes,
/// after clamping the offset to stay inside the grid and resolving an
/// emitter/non-emitter mismatch per the rule below.
///
/// A mismatched neighbour is blended only when it can be, without crossing
/// the emitter boundary itself: if both of the straight (non-diagonal)
/// neighbours along this offset's axes already match `(u, v)`'s emitter
/// flag, their average stands in for the mismatched one; if only one does,
/// that one stands in alone; otherwise `(u, v)`'s own colour is used,
/// keeping the boundary sharp rather than bleeding the wrong side's colour
/// across it.
fn colour_at(info: &SubdivInfo, patches: &[Patch], u: u32, v: u32, off_u: i32, off_v: i32) -> Rgb {
    let center = &patches[info.patch_at(u, v)];
    let (tu, tv) = clamp_cell(u as i64 + off_u as i64, v as i64 + off_v as i64, info.u_count, info.v_count);
    let target = &patches[info.patch_at(tu, tv)];
    if target.is_emitter == center.is_emitter {
        return target.screen_colour;
    }

    let (uu, uv) = clamp_cell(u as i64 + off_u as i64, v as i64, info.u_count, info.v_count);
    let along_u = &patches[info.patch_at(uu, uv)];
    let (vu, vv) = clamp_cell(u as i64, v as i64 + off_v as i64, info.u_count, info.v_count);
    let along_v = &patches[info.patch_at(vu, vv)];

    let u_matches = along_u.is_emitter == center.is_emitter;
    let v_matches = along_v.is_emitter == center.is_emitter;
    match (u_matches, v_matches) {
        (true, true) => avg(along_u.screen_colour, along_v.screen_colour),
        (true, false) => along_u.screen_colour,
        (false, true) => along_v.screen_colour,
        (false, false) => center.screen_colour,
    }
}

/// The nine raw neighbourhood samples for `(u, v)`, indexed `[du][dv]` with
/// `du, dv in 0..3` standing for offsets `-1, 0, 1`.
fn neighbourhood(info: &SubdivInfo, patches: &[Patch], u: u32, v: u32) -> [[Rgb; 3]; 3] {
    let mut samples = [[Rgb::ZERO; 3]; 3];
    for (du, row) in samples.iter_mut().enumerate() {
        for (dv, sample) in row.iter_mut().enumerate() {
            *sample = colour_at(info, patches, u, v, du as i32 - 1, dv as i32 - 1);
        }
    }
    samples
}

/// Derives the `3x3` grid of fine-mesh vertex colours covering one
/// sub-patch's `2x2` output tile from its raw `3x3` neighbourhood: the
/// centre is the sub-patch's own colour, unblended; each edge midpoint
/// averages the centre with the one straight neighbour it sits between;
/// each outer corner averages the two straight neighbours either side of
/// it with the diagonal neighbour beyond them, softening the corner
/// without erasing it.
fn fine_node_colours(samples: [[Rgb; 3]; 3]) -> [[Rgb; 3]; 3] {
    let center = samples[1][1];
    let mut fine = [[Rgb::ZERO; 3]; 3];
    for du in 0..3 {
        for dv in 0..3 {
            fine[du][dv] = match (du, dv) {
                (1, 1) => center,
                (1, _) => avg(samples[1][dv], center),
                (_, 1) => avg(samples[du][1], center),
                _ => avg(avg(samples[du][dv], samples[1][dv]), avg(samples[du][1], center)),
            };
        }
    }
    fine
}

fn fine_vertex(base: [Vec3; 4], total_u: u32, total_v: u32, i: u32, j: u32) -> Vec3 {
    let fu = i as f64 / total_u as f64;
    let fv = j as f64 / total_v as f64;
    lerp(lerp(base[0], base[1], fu), lerp(base[3], base[2], fu), fv)
}

/// Rebuilds one base quad's worth of geometry: four [`GouraudQuad`]s per
/// solved sub-patch, laid out on a `(2u_count+1) x (2v_count+1)` vertex
/// grid.
pub fn reconstruct(info: &SubdivInfo, patches: &[Patch], vs: &VertexPool) -> Vec<GouraudQuad> {
    let base = info.base.map(|i| vs[i]);
    let total_u = 2 * info.u_count;
    let total_v = 2 * info.v_count;
    let mut out = Vec::with_capacity((info.u_count * info.v_count * 4) as usize);

    for v in 0..info.v_count {
        for u in 0..info.u_count {
            let samples = neighbourhood(info, patches, u, v);
            let fine = fine_node_colours(samples);

            for dv in 0..2u32 {
                for du in 0..2u32 {
                    let corners = [(du, dv), (du + 1, dv), (du + 1, dv + 1), (du, dv + 1)];
                    let mut vertices = [Vec3::new(0.0, 0.0, 0.0); 4];
                    let mut colours = [Rgb::ZERO; 4];
                    for (k, &(cu, cv)) in corners.iter().enumerate() {
                        vertices[k] = fine_vertex(base, total_u, total_v, 2 * u + cu, 2 * v + cv);
                        colours[k] = fine[cu as usize][cv as usize];
                    }
                    out.push(GouraudQuad { vertices, colours });
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{subdivide, Patch};

    fn uniform_face(material: Rgb, u_count: u32, v_count: u32) -> (VertexPool, Vec<Patch>, SubdivInfo) {
        let mut vs = VertexPool::new();
        let i0 = vs.push(Vec3::new(-1.0, -1.0, 1.0));
        let i1 = vs.push(Vec3::new(1.0, -1.0, 1.0));
        let i2 = vs.push(Vec3::new(1.0, 1.0, 1.0));
        let i3 = vs.push(Vec3::new(-1.0, 1.0, 1.0));
        let base = Patch::new([i0, i1, i2, i3], material);
        let mut patches = Vec::new();
        let info = subdivide(&base, &mut vs, &mut patches, u_count, v_count).unwrap();
        for p in &mut patches {
            p.screen_colour = material;
        }
        (vs, patches, info)
    }

    #[test]
    fn uniform_patch_reconstructs_to_uniform_colour() {
        let colour = Rgb::new(0.4, 0.5, 0.6);
        let (vs, patches, info) = uniform_face(colour, 3, 3);
        let quads = reconstruct(&info, &patches, &vs);
        assert_eq!(quads.len(), 3 * 3 * 4);
        for q in &quads {
            for c in q.colours {
                assert_eq!(c, colour);
            }
        }
    }

    #[test]
    fn tile_count_matches_subdivision_grid() {
        let (vs, patches, info) = uniform_face(Rgb::new(0.1, 0.1, 0.1), 4, 2);
        let quads = reconstruct(&info, &patches, &vs);
        assert_eq!(quads.len(), 4 * 2 * 4);
    }

    #[test]
    fn emitter_boundary_is_not_erased() {
        let mut vs = VertexPool::new();
        let i0 = vs.push(Vec3::new(-1.0, -1.0, 1.0));
        let i1 = vs.push(Vec3::new(1.0, -1.0, 1.0));
        let i2 = vs.push(Vec3::new(1.0, 1.0, 1.0));
        let i3 = vs.push(Vec3::new(-1.0, 1.0, 1.0));
        let base = Patch::new([i0, i1, i2, i3], Rgb::new(0.5, 0.5, 0.5));
        let mut patches = Vec::new();
        let info = subdivide(&base, &mut vs, &mut patches, 4, 1).unwrap();
        for p in &mut patches {
            p.screen_colour = p.material_colour;
        }
        // Mark the right half of the strip as an emitter.
        for u in 2..4 {
            let idx = info.patch_at(u, 0);
            patches[idx].is_emitter = true;
            patches[idx].material_colour = Rgb::new(3.0, 3.0, 3.0);
            patches[idx].screen_colour = Rgb::new(3.0, 3.0, 3.0);
        }

        let quads = reconstruct(&info, &patches, &vs);
        // Every quad's own sub-patch centre colour must survive exactly,
        // regardless of how its edges were blended against neighbours.
        let cell_index = |u: u32| (u * 4) as usize; // 4 quads per cell
        let centre_colour = |quads: &[GouraudQuad], u: u32| {
            // The centre vertex of each of the 4 tiles in a cell is the
            // corner nearest (1,1) in local fine-grid coordinates; all four
            // tiles share it, so just check the first.
            quads[cell_index(u)].colours[2]
        };
        assert_eq!(centre_colour(&quads, 0), Rgb::new(0.5, 0.5, 0.5));
        assert_eq!(centre_colour(&quads, 3), Rgb::new(3.0, 3.0, 3.0));
    }
}
