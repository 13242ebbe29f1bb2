//! Per-line indices of the shell voxel set.

use crate::voxelization::{VoxelGrid, VoxelShell};
use na::{Point3, Vector3};

/// For every grid line parallel to an axis, the shell voxels it contains.
///
/// A bucket stores only the coordinate of each shell voxel along the line's
/// axis. Buckets are filled by walking the grid in lexicographic order, so
/// they are sorted ascending; the field builder and the extent search rely on
/// this ordering.
pub struct PlaneSet {
    x: Vec<Vec<u32>>,
    y: Vec<Vec<u32>>,
    z: Vec<Vec<u32>>,
    dims: Vector3<u32>,
}

impl PlaneSet {
    /// Builds the three bucket arrays from the shell voxel set.
    pub fn new(grid: &VoxelGrid, shell: &VoxelShell) -> Self {
        let dims = grid.dimensions();

        // Worst case for a single line is a full row of shell voxels.
        let line_buckets = |count: u32, capacity: u32| -> Vec<Vec<u32>> {
            (0..count)
                .map(|_| Vec::with_capacity(capacity as usize))
                .collect()
        };

        let mut result = PlaneSet {
            x: line_buckets(dims.y * dims.z, dims.x),
            y: line_buckets(dims.x * dims.z, dims.y),
            z: line_buckets(dims.x * dims.y, dims.z),
            dims,
        };

        for x in 0..dims.x {
            for y in 0..dims.y {
                for z in 0..dims.z {
                    let flat = grid.flatten(&Point3::new(x, y, z));
                    if shell.voxel_index(flat).is_some() {
                        result.x[(y + dims.y * z) as usize].push(x);
                        result.y[(x + dims.x * z) as usize].push(y);
                        result.z[(x + dims.x * y) as usize].push(z);
                    }
                }
            }
        }

        result
    }

    /// The sorted x coordinates of the shell voxels on the line `(·, y, z)`.
    #[inline]
    pub fn x_line(&self, y: u32, z: u32) -> &[u32] {
        &self.x[(y + self.dims.y * z) as usize]
    }

    /// The sorted y coordinates of the shell voxels on the line `(x, ·, z)`.
    #[inline]
    pub fn y_line(&self, x: u32, z: u32) -> &[u32] {
        &self.y[(x + self.dims.x * z) as usize]
    }

    /// The sorted z coordinates of the shell voxels on the line `(x, y, ·)`.
    #[inline]
    pub fn z_line(&self, x: u32, y: u32) -> &[u32] {
        &self.z[(x + self.dims.x * y) as usize]
    }
}
