/*!
occlumesh
=========

**occlumesh** generates *conservative occluder meshes* from closed
triangle meshes. The occluder is a union of axis-aligned boxes that
lies strictly inside the input surface, so rasterizing it for
occlusion culling can never hide anything the input mesh would not
have hidden.

The pipeline has three stages:

1. rasterize the input triangles into a uniform voxel grid using a
   separating-axis triangle/box test ([`voxelization`]);
2. classify interior voxels and build a per-voxel field of distances
   to the next shell voxel along `+x`, `+y` and `+z` ([`interior`]);
3. greedily extract the inner-voxel-aligned box of largest volume
   until a target fill fraction of the interior is reached
   ([`extraction`]).

The top-level entry point is [`generate_occluder`]. Inputs that do not
voxelize into a closed shell at the requested resolution are rejected
with [`OccluderError::NotWatertight`]; retrying with a smaller voxel
size usually resolves this.
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod extraction;
pub mod interior;
pub mod occluder;
pub mod query;
pub mod shape;
pub mod voxelization;

/// Aliases for the mathematical types used throughout this crate.
pub mod math {
    /// The scalar type used throughout this crate.
    pub use f32 as Real;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use crate::na::Point3 as Point;

    /// The vector type.
    pub use crate::na::Vector3 as Vector;
}

pub use crate::extraction::MaxExtent;
pub use crate::occluder::{
    generate_occluder, OccluderBoxFlags, OccluderError, OccluderMesh, OccluderParameters,
};
