//! Interior classification and the per-cell min-distance field.

use crate::voxelization::{PlaneSet, VoxelGrid};
use na::{Point3, Vector3};

/// Distance value of a cell that cannot see a shell voxel along the axis.
pub(crate) const UNREACHABLE: u32 = u32::MAX;

/// Flags identifying the signed axis directions along which a cell can see
/// at least one shell voxel.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct AxisVisibility(u8);

bitflags::bitflags! {
    impl AxisVisibility: u8 {
        /// Some shell voxel lies along the `+x` direction.
        const X_POS = 1 << 0;
        /// Some shell voxel lies along the `-x` direction.
        const X_NEG = 1 << 1;
        /// Some shell voxel lies along the `+y` direction.
        const Y_POS = 1 << 2;
        /// Some shell voxel lies along the `-y` direction.
        const Y_NEG = 1 << 3;
        /// Some shell voxel lies along the `+z` direction.
        const Z_POS = 1 << 4;
        /// Some shell voxel lies along the `-z` direction.
        const Z_NEG = 1 << 5;
    }
}

/// The classification of a single grid cell.
#[derive(Copy, Clone, Debug, Default)]
pub struct CellStatus {
    /// The directions along which this cell sees the shell.
    pub visibility: AxisVisibility,
    /// Is this cell strictly enclosed by the shell?
    pub inner: bool,
    /// Has this cell been consumed by an extracted extent?
    ///
    /// Once set, this flag never reverts.
    pub clipped: bool,
}

impl CellStatus {
    /// An *active* cell is an inner cell not yet consumed by extraction.
    #[inline]
    pub fn is_active(self) -> bool {
        self.inner && !self.clipped
    }
}

/// Per-cell status and distances to the next shell voxel along `+x`, `+y`
/// and `+z`.
///
/// For an active cell, a distance component is the positive offset of the
/// closest shell voxel along that axis; it is `0` only for cells that are
/// themselves shell voxels, and unreachable lines are tracked separately from
/// the visibility flags. Neither marker escapes this module: only active
/// cells carry meaningful distances, and all of their components are finite
/// and positive.
pub struct InteriorField {
    pub(crate) status: Vec<CellStatus>,
    pub(crate) distances: Vec<Vector3<u32>>,
}

impl InteriorField {
    /// Computes visibility, interior flags and min-distances for every cell
    /// of the grid.
    pub fn build(grid: &VoxelGrid, planes: &PlaneSet) -> Self {
        let len = grid.len();
        let mut status = Vec::with_capacity(len);
        let mut distances = Vec::with_capacity(len);

        for i in 0..len as u32 {
            let cell = grid.unflatten(i);
            let (cell_status, dist) = compute_cell(planes, &cell);
            status.push(cell_status);
            distances.push(dist);
        }

        InteriorField { status, distances }
    }

    /// The status of the cell with the given linear index.
    #[inline]
    pub fn status(&self, flat_cell: u32) -> CellStatus {
        self.status[flat_cell as usize]
    }

    /// The number of active cells.
    pub fn num_active(&self) -> u32 {
        self.status.iter().filter(|s| s.is_active()).count() as u32
    }

    /// Verifies that for every active cell, the three positive-axis runs up
    /// to the next shell voxel contain only active cells.
    ///
    /// The extent search assumes those runs are solid; if the shell has a
    /// hole, a run can overshoot a genuine exterior gap and the extracted
    /// boxes would protrude outside the mesh. A `false` result means the mesh
    /// is not watertight at the grid's resolution.
    pub fn is_watertight(&self, grid: &VoxelGrid) -> bool {
        for i in 0..self.status.len() as u32 {
            if !self.status[i as usize].is_active() {
                continue;
            }

            let cell = grid.unflatten(i);
            let dist = self.distances[i as usize];

            for x in cell.x..cell.x + dist.x {
                let flat = grid.flatten(&Point3::new(x, cell.y, cell.z));
                if !self.status[flat as usize].is_active() {
                    return false;
                }
            }
            for y in cell.y..cell.y + dist.y {
                let flat = grid.flatten(&Point3::new(cell.x, y, cell.z));
                if !self.status[flat as usize].is_active() {
                    return false;
                }
            }
            for z in cell.z..cell.z + dist.z {
                let flat = grid.flatten(&Point3::new(cell.x, cell.y, z));
                if !self.status[flat as usize].is_active() {
                    return false;
                }
            }
        }

        true
    }
}

/// Walks the three line buckets through `cell` to classify it.
fn compute_cell(planes: &PlaneSet, cell: &Point3<u32>) -> (CellStatus, Vector3<u32>) {
    let mut visibility = AxisVisibility::empty();
    let mut dist = Vector3::repeat(UNREACHABLE);

    for &sx in planes.x_line(cell.y, cell.z) {
        let delta = sx as i64 - cell.x as i64;
        if delta > 0 {
            visibility |= AxisVisibility::X_POS;
            dist.x = dist.x.min(delta as u32);
        } else if delta < 0 {
            visibility |= AxisVisibility::X_NEG;
        } else {
            dist.x = 0;
        }
    }

    for &sy in planes.y_line(cell.x, cell.z) {
        let delta = sy as i64 - cell.y as i64;
        if delta > 0 {
            visibility |= AxisVisibility::Y_POS;
            dist.y = dist.y.min(delta as u32);
        } else if delta < 0 {
            visibility |= AxisVisibility::Y_NEG;
        } else {
            dist.y = 0;
        }
    }

    for &sz in planes.z_line(cell.x, cell.y) {
        let delta = sz as i64 - cell.z as i64;
        if delta > 0 {
            visibility |= AxisVisibility::Z_POS;
            dist.z = dist.z.min(delta as u32);
        } else if delta < 0 {
            visibility |= AxisVisibility::Z_NEG;
        } else {
            dist.z = 0;
        }
    }

    // A cell coinciding with a shell voxel has a zero distance component and
    // is disqualified even when it sees the shell in all six directions.
    let inner = visibility == AxisVisibility::all()
        && dist.iter().all(|&d| d != 0 && d != UNREACHABLE);

    let status = CellStatus {
        visibility,
        inner,
        clipped: false,
    };

    (status, dist)
}
