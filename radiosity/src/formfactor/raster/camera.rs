// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! The hemicube camera model: a camera at a point, plus the six cube-face
//! view directions used to cover the full sphere around it.

use cgmath::InnerSpace as _;
use strum::EnumIter;

use crate::error::{RadiosityError, Result};
use crate::math::{perp, Vec3};

/// An orthonormal view frame: `eye` plus a right-handed `(right, up,
/// forward)` triple, matching the convention that a base camera starts at
/// `(origin, +Z, +Y)` (forward is `+Z` in the frame's own local
/// coordinates).
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    pub right: Vec3,
}

impl Camera {
    /// Builds a camera looking along `look_dir` from `eye`, with `approx_up`
    /// used only to resolve the remaining rotational degree of freedom
    /// (it need not be perpendicular to `look_dir`, or even non-zero: a
    /// degenerate or parallel `approx_up` falls back to an arbitrary
    /// perpendicular, matching the analytic oracle's own tolerance of a
    /// degenerate up vector for its inward-facing cameras).
    ///
    /// # Errors
    ///
    /// Returns [`RadiosityError::DegenerateCamera`] if `look_dir` has zero
    /// length.
    pub fn new(eye: Vec3, look_dir: Vec3, approx_up: Vec3) -> Result<Self> {
        let forward = crate::math::normalize(look_dir).map_err(|_| RadiosityError::DegenerateCamera)?;
        let right = {
            let candidate = forward.cross(approx_up);
            if candidate.magnitude() > 1e-9 {
                candidate.normalize()
            } else {
                perp(forward).map_err(|_| RadiosityError::DegenerateCamera)?
            }
        };
        let up = right.cross(forward);
        Ok(Self {
            eye,
            forward,
            up,
            right,
        })
    }

    /// Transforms a world-space point into this camera's local frame
    /// (`+Z` forward, `+Y` up, `+X` right, origin at `eye`).
    #[inline]
    pub fn to_camera_point(&self, p: Vec3) -> Vec3 {
        let rel = p - self.eye;
        Vec3::new(rel.dot(self.right), rel.dot(self.up), rel.dot(self.forward))
    }

    /// Transforms a world-space direction (e.g. a patch's area normal) into
    /// this camera's local frame, without translation.
    #[inline]
    pub fn to_camera_vector(&self, v: Vec3) -> Vec3 {
        Vec3::new(v.dot(self.right), v.dot(self.up), v.dot(self.forward))
    }

    /// Re-derives a camera for one of the six hemicube faces, composing
    /// that face's local rotation with this camera's own frame.
    pub fn for_face(&self, face: CubeFace) -> Self {
        let (local_forward, local_up, local_right) = face.local_basis();
        let compose = |local: Vec3| self.right * local.x + self.up * local.y + self.forward * local.z;
        Self {
            eye: self.eye,
            forward: compose(local_forward),
            up: compose(local_up),
            right: compose(local_right),
        }
    }
}

/// The six faces of a hemicube surrounding a camera.
#[derive(Clone, Copy, Debug, EnumIter, PartialEq, Eq)]
pub enum CubeFace {
    Front,
    Back,
    Right,
    Left,
    Up,
    Down,
}

impl CubeFace {
    /// This face's `(forward, up, right)` triple in the owning camera's own
    /// local coordinates (i.e. before composing with the camera's world
    /// orientation). `Front` is the identity.
    ///
    /// Every side face's `up` is the base camera's `+Z` (its own forward):
    /// [`crate::formfactor::raster::rasterizer::CpuRasterizer`] places `+up`
    /// at pixel row `0`, so this orientation puts each side face's edge
    /// shared with the front face at row `0` — exactly the half that
    /// [`crate::weighting::side_light_weights`] computes weights for.
    pub fn local_basis(self) -> (Vec3, Vec3, Vec3) {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        let z = Vec3::new(0.0, 0.0, 1.0);
        match self {
            CubeFace::Front => (z, y, x),
            CubeFace::Back => (-z, y, -x),
            CubeFace::Right => (x, z, y),
            CubeFace::Left => (-x, z, -y),
            CubeFace::Up => (y, z, -x),
            CubeFace::Down => (-y, z, x),
        }
    }

    /// Whether this face contributes to [`crate::weighting::forward_light_weights`]
    /// (the `Front` face) or to [`crate::weighting::side_light_weights`]
    /// (the other four).
    pub fn is_front(self) -> bool {
        matches!(self, CubeFace::Front)
    }

    /// The five faces a hemicube actually renders: the sixth, `Back`, faces
    /// away from the surface being evaluated and never contributes.
    pub fn hemicube_faces() -> [CubeFace; 5] {
        [CubeFace::Front, CubeFace::Right, CubeFace::Left, CubeFace::Up, CubeFace::Down]
    }
}
