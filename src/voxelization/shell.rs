//! Rasterization of a triangle mesh into the set of shell voxels.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::query;
use crate::shape::Triangle;
use crate::voxelization::VoxelGrid;
use na::{Point3, Vector3};

/// Marker stored in the dense table for cells that are not shell voxels.
const NO_VOXEL: u32 = u32::MAX;

/// The set of grid cells intersected by at least one input triangle.
///
/// Voxels are stored in insertion order; a dense cell-indexed table maps every
/// grid cell back to its position in that list, if any.
pub struct VoxelShell {
    voxels: Vec<Point3<u32>>,
    cell_to_voxel: Vec<u32>,
}

impl VoxelShell {
    /// Rasterizes `indices` triangles over `grid`, marking every cell whose
    /// box intersects a triangle.
    ///
    /// Degenerate (zero-area) triangles are processed like any other; the
    /// separating-axis test handles them. Every index must be in bounds of
    /// `vertices`.
    pub fn voxelize(grid: &VoxelGrid, vertices: &[Point<Real>], indices: &[[u32; 3]]) -> Self {
        let mut result = VoxelShell {
            voxels: Vec::new(),
            cell_to_voxel: vec![NO_VOXEL; grid.len()],
        };

        let dims = grid.dimensions();
        let half_extents = grid.half_extents();

        for idx in indices {
            let triangle = Triangle::new(
                vertices[idx[0] as usize],
                vertices[idx[1] as usize],
                vertices[idx[2] as usize],
            );

            // Find the range of cells potentially intersecting the triangle:
            // the cells of its corners, expanded by one so cells merely
            // touched across a boundary are still considered.
            let mut lo = grid.cell_containing(&triangle.a).coords;
            let mut hi = lo;
            for pt in &triangle.vertices()[1..] {
                let cell = grid.cell_containing(pt).coords;
                lo = lo.inf(&cell);
                hi = hi.sup(&cell);
            }
            lo.apply(|e| *e = e.saturating_sub(1));
            hi = hi.map(|e| e + 1).inf(&(dims - Vector3::repeat(1)));

            for z in lo.z..=hi.z {
                for y in lo.y..=hi.y {
                    for x in lo.x..=hi.x {
                        let cell = Point3::new(x, y, z);
                        let flat = grid.flatten(&cell) as usize;
                        if result.cell_to_voxel[flat] != NO_VOXEL {
                            continue;
                        }

                        let aabb = Aabb::from_half_extents(grid.cell_center(&cell), half_extents);
                        if query::intersection_test_aabb_triangle(&aabb, &triangle) {
                            result.cell_to_voxel[flat] = result.voxels.len() as u32;
                            result.voxels.push(cell);
                        }
                    }
                }
            }
        }

        result
    }

    /// The number of shell voxels.
    #[inline]
    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    /// Is the shell empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// The position of the given cell in the shell voxel list, if the cell is
    /// a shell voxel.
    #[inline]
    pub fn voxel_index(&self, flat_cell: u32) -> Option<u32> {
        let index = self.cell_to_voxel[flat_cell as usize];
        (index != NO_VOXEL).then_some(index)
    }
}
