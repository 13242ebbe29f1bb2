//! Geometric queries used by the voxelizer.

pub use self::triangle_aabb::intersection_test_aabb_triangle;

mod triangle_aabb;
