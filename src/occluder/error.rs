//! Errors raised by the occluder generation pipeline.

/// The reasons occluder generation can fail.
#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum OccluderError {
    /// The mesh did not voxelize into a closed shell at the requested voxel
    /// size: some interior cell's run to the next shell voxel escapes the
    /// interior. Retrying with a smaller `voxel_size` usually resolves this.
    #[error("the mesh is not watertight at this voxel size; retry with a smaller `voxel_size`")]
    NotWatertight,

    /// `voxel_size` was zero, negative, or not finite.
    #[error("`voxel_size` must be strictly positive and finite")]
    InvalidVoxelSize,

    /// `fill_fraction` was outside of `(0, 1]`.
    #[error("`fill_fraction` must lie in (0, 1]")]
    InvalidFillFraction,

    /// `box_flags` selected nothing, or combined `DIAGONALS` with face flags.
    #[error("`box_flags` must select at least one box style; diagonals cannot be combined with box faces")]
    InvalidBoxFlags,

    /// An index of the input index buffer does not address any input vertex.
    #[error("triangle index {index} is out of bounds of the {num_vertices} mesh vertices")]
    TriangleIndexOutOfBounds {
        /// The offending index value.
        index: u32,
        /// The size of the input vertex buffer.
        num_vertices: usize,
    },
}
