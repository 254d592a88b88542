// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! A software z-buffer rasteriser: implements the Renderer contract
//! without any dependency on a GPU or windowing system, used both by the
//! hemicube oracle's index-colour passes and, via
//! [`CpuRasterizer::draw_flat_quad_rgb`], by the display driver's final
//! Gouraud-shaded pass.

use cgmath::InnerSpace as _;

use crate::error::{RadiosityError, Result};
use crate::formfactor::raster::camera::Camera;
use crate::math::Vec3;

/// The colour that decodes to "no patch visible at this pixel" (index `0`
/// means background). `clear()` fills the whole buffer with this. Alpha
/// is always opaque; nothing in this renderer ever blends.
pub const BACKGROUND: [u8; 4] = [0, 0, 0, 0xFF];

const NEAR: f64 = 0.001;

/// The off-screen render target and its rasterisation state: an RGBA8
/// colour buffer, a depth buffer, and the active camera. Reused across
/// every hemicube face render so the buffers are allocated once per
/// resolution.
pub struct CpuRasterizer {
    resolution: u32,
    color: Vec<u8>,
    depth: Vec<f64>,
    camera: Option<Camera>,
}

impl CpuRasterizer {
    /// An empty rasteriser; call [`Self::setup_transfer_render`] before use.
    pub fn new() -> Self {
        Self { resolution: 0, color: Vec::new(), depth: Vec::new(), camera: None }
    }

    /// Allocates (or reallocates, if `resolution` changed) the colour and
    /// depth buffers.
    ///
    /// # Errors
    ///
    /// Returns [`RadiosityError::RenderContextFailure`] if `resolution` is
    /// zero.
    pub fn setup_transfer_render(&mut self, resolution: u32) -> Result<()> {
        if resolution == 0 {
            return Err(RadiosityError::RenderContextFailure { resolution });
        }
        let pixels = (resolution * resolution) as usize;
        self.resolution = resolution;
        self.color = vec![0; pixels * 4];
        self.depth = vec![0.0; pixels];
        Ok(())
    }

    /// Clears the colour buffer to [`BACKGROUND`] and the depth buffer to
    /// "nothing drawn yet".
    pub fn clear(&mut self) {
        for px in self.color.chunks_exact_mut(4) {
            px.copy_from_slice(&BACKGROUND);
        }
        self.depth.fill(0.0);
    }

    /// Sets the camera that subsequent `draw_flat_quad*` calls project
    /// through.
    pub fn set_model_view(&mut self, camera: Camera) {
        self.camera = Some(camera);
    }

    /// Draws `quad` (vertex order `v0..v3` matching
    /// [`crate::scene::Patch::vertices`]) flat-shaded with `index` packed
    /// into its colour, after back-face
    /// culling and a per-pixel depth test against whatever is already in the
    /// buffer. This is the form-factor oracle's own use of the Renderer
    /// contract's `drawFlatQuad`; for an arbitrary display colour see
    /// [`Self::draw_flat_quad_rgb`].
    ///
    /// A no-op if [`Self::set_model_view`] has not been called, or if any
    /// triangle of the quad has a vertex behind the near plane (this
    /// rasteriser does not clip; scenes are expected to keep patches well
    /// clear of the hemicube's eye point).
    pub fn draw_flat_quad(&mut self, quad: [Vec3; 4], index: u32) {
        self.draw_flat_quad_rgb(quad, index_to_rgb(index));
    }

    /// The Renderer contract's `drawFlatQuad(v0, v1, v2, v3, rgb_byte)`
    /// in full generality: flat-fills `quad` with an arbitrary opaque
    /// `rgb` colour rather than an index encoding. The display driver uses
    /// this directly to rasterise already-shaded
    /// [`crate::gouraud::GouraudQuad`]s; [`Self::draw_flat_quad`] is a thin
    /// index-colour wrapper around it.
    pub fn draw_flat_quad_rgb(&mut self, quad: [Vec3; 4], rgb: [u8; 3]) {
        let camera = match self.camera {
            Some(c) => c,
            None => return,
        };

        let area_normal = (quad[3] - quad[0]).cross(quad[1] - quad[0]);
        let centre = (quad[0] + quad[2]) * 0.5;
        let normal_cam = camera.to_camera_vector(area_normal);
        let centre_cam = camera.to_camera_point(centre);
        if normal_cam.dot(centre_cam) <= 0.0 {
            return;
        }

        let color = [rgb[0], rgb[1], rgb[2], 0xFF];
        let cam_points: Vec<Vec3> = quad.iter().map(|&v| camera.to_camera_point(v)).collect();
        self.rasterize_triangle([cam_points[0], cam_points[1], cam_points[2]], color);
        self.rasterize_triangle([cam_points[0], cam_points[2], cam_points[3]], color);
    }

    fn rasterize_triangle(&mut self, tri_cam: [Vec3; 3], color: [u8; 4]) {
        let resolution = self.resolution;
        let projected: Option<Vec<(f64, f64, f64)>> =
            tri_cam.iter().map(|&v| project(v, resolution)).collect();
        let projected = match projected {
            Some(p) => p,
            None => return,
        };
        let (p0, p1, p2) = (projected[0], projected[1], projected[2]);

        let area = edge(p0, p1, p2);
        if area == 0.0 {
            return;
        }

        let min_x = p0.0.min(p1.0).min(p2.0).floor().max(0.0) as u32;
        let max_x = p0.0.max(p1.0).max(p2.0).ceil().min(resolution as f64) as u32;
        let min_y = p0.1.min(p1.1).min(p2.1).floor().max(0.0) as u32;
        let max_y = p0.1.max(p1.1).max(p2.1).ceil().min(resolution as f64) as u32;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let p = (x as f64 + 0.5, y as f64 + 0.5, 0.0);
                let w0 = edge(p1, p2, p);
                let w1 = edge(p2, p0, p);
                let w2 = edge(p0, p1, p);
                let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0) || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
                if !inside {
                    continue;
                }
                let (l0, l1, l2) = (w0 / area, w1 / area, w2 / area);
                let inv_z = l0 * p0.2 + l1 * p1.2 + l2 * p2.2;
                let pixel = (y * resolution + x) as usize;
                if inv_z > self.depth[pixel] {
                    self.depth[pixel] = inv_z;
                    self.color[pixel * 4..pixel * 4 + 4].copy_from_slice(&color);
                }
            }
        }
    }

    /// The colour buffer, as `resolution * resolution` RGBA8 pixels in
    /// row-major order with row `0` at the top of the rendered view.
    pub fn read_pixels(&self) -> &[u8] {
        &self.color
    }

    /// Releases the buffers, returning this rasteriser to its initial state.
    pub fn destroy(&mut self) {
        self.resolution = 0;
        self.color = Vec::new();
        self.depth = Vec::new();
        self.camera = None;
    }

    /// The resolution this rasteriser was last set up with.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }
}

impl Default for CpuRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Projects a camera-space point to `(screen_x, screen_y, 1/z)`, or `None`
/// if it lies at or behind the near plane. The 90° field of view means
/// `tan(45°) == 1`, so the perspective divide needs no extra scale factor.
fn project(v_cam: Vec3, resolution: u32) -> Option<(f64, f64, f64)> {
    if v_cam.z <= NEAR {
        return None;
    }
    let ndc_x = v_cam.x / v_cam.z;
    let ndc_y = v_cam.y / v_cam.z;
    let res = resolution as f64;
    let screen_x = (ndc_x + 1.0) * 0.5 * res;
    let screen_y = (1.0 - (ndc_y + 1.0) * 0.5) * res;
    Some((screen_x, screen_y, 1.0 / v_cam.z))
}

#[inline]
fn edge(a: (f64, f64, f64), b: (f64, f64, f64), c: (f64, f64, f64)) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

/// Packs a zero-based patch `index` into an RGB triple using only the top 6
/// bits of each channel, tolerant of display quantisation: internally
/// this works on the 1-based `n = index + 1` (`0` is reserved for
/// background), via `R = (n << 2) & 0xFC`, `G = (n >> 4) & 0xFC`,
/// `B = (n >> 10) & 0xFC`. Supports patch indices up to `2^18 - 2`.
fn index_to_rgb(index: u32) -> [u8; 3] {
    let n = index + 1;
    [((n << 2) & 0xFC) as u8, ((n >> 4) & 0xFC) as u8, ((n >> 10) & 0xFC) as u8]
}

/// Decodes an RGB pixel written by [`CpuRasterizer::draw_flat_quad`] back
/// into a zero-based patch index, or `None` for [`BACKGROUND`] (or anything
/// else that decodes to `0`). Ignores any alpha component the caller passes
/// alongside the RGB triple.
pub fn rgb_to_index(rgb: [u8; 3]) -> Option<u32> {
    let (r, g, b) = (rgb[0] as u32, rgb[1] as u32, rgb[2] as u32);
    let n = (r + (g << 6) + (b << 12)) >> 2;
    if n == 0 {
        None
    } else {
        Some(n - 1)
    }
}
