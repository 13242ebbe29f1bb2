//! Parameters controlling occluder generation.

use crate::math::Real;
use crate::occluder::{OccluderBoxFlags, OccluderError};

/// Parameters of the occluder generation pipeline.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OccluderParameters {
    /// Edge length of the cubic voxels the mesh is rasterized into.
    ///
    /// Must be strictly positive. Smaller voxels resolve finer features but
    /// grow the grid cubically.
    pub voxel_size: Real,
    /// Target fraction of the interior volume to cover with boxes, in
    /// `(0, 1]`. Extraction stops as soon as the cumulative fill reaches
    /// this value.
    pub fill_fraction: Real,
    /// Which faces of each emitted box are tessellated.
    pub box_flags: OccluderBoxFlags,
}

impl Default for OccluderParameters {
    fn default() -> Self {
        Self {
            voxel_size: 1.0,
            fill_fraction: 1.0,
            box_flags: OccluderBoxFlags::REGULAR,
        }
    }
}

impl OccluderParameters {
    pub(crate) fn validate(&self) -> Result<(), OccluderError> {
        if !(self.voxel_size.is_finite() && self.voxel_size > 0.0) {
            return Err(OccluderError::InvalidVoxelSize);
        }

        if !(self.fill_fraction > 0.0 && self.fill_fraction <= 1.0) {
            return Err(OccluderError::InvalidFillFraction);
        }

        if self.box_flags.is_empty()
            || (self.box_flags.contains(OccluderBoxFlags::DIAGONALS)
                && self.box_flags != OccluderBoxFlags::DIAGONALS)
        {
            return Err(OccluderError::InvalidBoxFlags);
        }

        Ok(())
    }
}
