//! Voxel grid geometry: origin, dimensions and cell indexing.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use na::{Point3, Vector3};

/// A uniform cubic voxel lattice covering a mesh-space AABB.
///
/// The covered AABB is snapped outward to the voxel lattice and padded by one
/// voxel on each face, so every input triangle falls strictly inside the grid.
/// The cell at integer coordinates `(x, y, z)` spans
/// `[origin + s·(x, y, z), origin + s·(x + 1, y + 1, z + 1)]` where `s` is the
/// voxel size.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    origin: Point<Real>,
    voxel_size: Real,
    dimensions: Vector3<u32>,
}

impl VoxelGrid {
    /// Builds the grid covering `aabb` with cubic voxels of size `voxel_size`.
    pub fn from_aabb(aabb: &Aabb, voxel_size: Real) -> Self {
        let padding = Vector::repeat(voxel_size);
        let mins = snap_to_lower_bound(&aabb.mins, voxel_size) - padding;
        let maxs = snap_to_upper_bound(&aabb.maxs, voxel_size) + padding;

        // The quotient is integral by construction; rounding guards against a
        // one-ulp-low division dropping a padding layer.
        let dimensions = ((maxs - mins) / voxel_size).map(|e| e.round() as u32);

        VoxelGrid {
            origin: mins,
            voxel_size,
            dimensions,
        }
    }

    /// The world-space position of the grid's minimal corner.
    #[inline]
    pub fn origin(&self) -> Point<Real> {
        self.origin
    }

    /// The edge length of every voxel.
    #[inline]
    pub fn voxel_size(&self) -> Real {
        self.voxel_size
    }

    /// The half extents of a single voxel.
    #[inline]
    pub fn half_extents(&self) -> Vector<Real> {
        Vector::repeat(self.voxel_size * 0.5)
    }

    /// The number of cells along each axis.
    #[inline]
    pub fn dimensions(&self) -> Vector3<u32> {
        self.dimensions
    }

    /// The total number of cells of this grid.
    #[inline]
    pub fn len(&self) -> usize {
        self.dimensions.x as usize * self.dimensions.y as usize * self.dimensions.z as usize
    }

    /// Does this grid contain no cell at all?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The world-space center of the given cell.
    #[inline]
    pub fn cell_center(&self, cell: &Point3<u32>) -> Point<Real> {
        self.origin + (cell.coords.cast::<Real>() + Vector::repeat(0.5)) * self.voxel_size
    }

    /// The world-space AABB covered by `extent` cells starting at `cell`.
    #[inline]
    pub fn cell_range_aabb(&self, cell: &Point3<u32>, extent: &Vector3<u32>) -> Aabb {
        let mins = self.origin + cell.coords.cast::<Real>() * self.voxel_size;
        let maxs = mins + extent.cast::<Real>() * self.voxel_size;
        Aabb::new(mins, maxs)
    }

    /// The cell containing the given point, clamped to the grid bounds.
    #[inline]
    pub fn cell_containing(&self, point: &Point<Real>) -> Point3<u32> {
        let v = (point - self.origin) / self.voxel_size;
        Point3::new(
            clamp_coord(v.x, self.dimensions.x),
            clamp_coord(v.y, self.dimensions.y),
            clamp_coord(v.z, self.dimensions.z),
        )
    }

    /// Maps cell coordinates to a linear cell index.
    ///
    /// Together with [`Self::unflatten`] this is a bijection on
    /// `[0, Dx·Dy·Dz)`.
    #[inline]
    pub fn flatten(&self, cell: &Point3<u32>) -> u32 {
        let index =
            cell.x + self.dimensions.x * cell.y + self.dimensions.x * self.dimensions.y * cell.z;
        debug_assert!((index as usize) < self.len());
        index
    }

    /// Maps a linear cell index back to cell coordinates.
    #[inline]
    pub fn unflatten(&self, index: u32) -> Point3<u32> {
        let dim_xy = self.dimensions.x * self.dimensions.y;
        let z = index / dim_xy;
        let rem = index - z * dim_xy;
        let cell = Point3::new(rem % self.dimensions.x, rem / self.dimensions.x, z);

        debug_assert!(cell.x < self.dimensions.x);
        debug_assert!(cell.y < self.dimensions.y);
        debug_assert!(cell.z < self.dimensions.z);

        cell
    }
}

fn snap_to_lower_bound(position: &Point<Real>, voxel_size: Real) -> Point<Real> {
    position.map(|e| {
        let shifted = e + e.signum() * voxel_size * 0.5;
        (shifted / voxel_size).floor() * voxel_size
    })
}

fn snap_to_upper_bound(position: &Point<Real>, voxel_size: Real) -> Point<Real> {
    position.map(|e| {
        let shifted = e + e.signum() * voxel_size * 0.5;
        (shifted / voxel_size).ceil() * voxel_size
    })
}

#[inline]
fn clamp_coord(value: Real, dim: u32) -> u32 {
    (value.floor().max(0.0) as u32).min(dim - 1)
}
