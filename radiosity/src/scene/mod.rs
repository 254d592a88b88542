// Copyright 2020 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <http://opensource.org/licenses/MIT>.

//! The patch model, mesh transforms, subdivision, and canonical scene
//! construction.

mod cube;
mod patch;
mod subdivide;
mod transform;

pub use cube::{
    build_cube_scene, insert_transformed_cube, top_centre_emitter, Scene, CANONICAL_FACES,
    CANONICAL_VERTICES,
};
pub use patch::{Patch, PatchIndex, VertexIndex, VertexPool};
pub use subdivide::{subdivide, SubdivInfo};
pub use transform::Transform;
