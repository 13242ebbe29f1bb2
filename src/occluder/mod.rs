//! Top-level conservative occluder generation.

pub use self::cube_mesh::OccluderBoxFlags;
pub use self::error::OccluderError;
pub use self::params::OccluderParameters;

mod cube_mesh;
mod error;
mod params;

use crate::bounding_volume::Aabb;
use crate::extraction::{self, MaxExtent};
use crate::interior::InteriorField;
use crate::math::{Point, Real};
use crate::voxelization::{PlaneSet, VoxelGrid, VoxelShell};

/// Largest supported grid dimension along any axis. This keeps cell counts
/// and box volumes within `u32`.
const MAX_GRID_DIM: u32 = 1 << 10;

/// The occluder produced by [`generate_occluder`]: a triangle mesh made of
/// one tessellated box per extracted extent, plus the extents themselves.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OccluderMesh {
    /// The vertex buffer: 8 corners per extracted extent, in a fixed local
    /// order.
    pub vertices: Vec<Point<Real>>,
    /// The index buffer: the box templates selected by
    /// [`OccluderParameters::box_flags`], one instance per extent.
    pub indices: Vec<[u32; 3]>,
    /// The extracted extents, in extraction order, in grid coordinates.
    pub extents: Vec<MaxExtent>,
}

/// Generates a conservative occluder mesh for the given closed triangle mesh.
///
/// The mesh is rasterized into a uniform grid of `params.voxel_size` cubes;
/// interior voxels are classified against the resulting shell; boxes of
/// interior voxels are then greedily extracted by decreasing volume until
/// `params.fill_fraction` of the interior is covered. The union of the
/// emitted boxes lies strictly inside the input surface from any viewpoint.
///
/// Given identical inputs, the output is byte-identical.
///
/// # Errors
///
/// Fails with [`OccluderError::NotWatertight`] when the voxelized shell does
/// not enclose its interior at this resolution (typically: the mesh has
/// holes, or `voxel_size` is too large to resolve the surface). Parameter
/// and index-buffer violations are reported by the other variants.
pub fn generate_occluder(
    params: &OccluderParameters,
    vertices: &[Point<Real>],
    indices: &[[u32; 3]],
) -> Result<OccluderMesh, OccluderError> {
    params.validate()?;

    for idx in indices {
        for &i in idx {
            if i as usize >= vertices.len() {
                return Err(OccluderError::TriangleIndexOutOfBounds {
                    index: i,
                    num_vertices: vertices.len(),
                });
            }
        }
    }

    if indices.is_empty() {
        return Ok(OccluderMesh::default());
    }

    let aabb = Aabb::from_points(indices.iter().flatten().map(|&i| &vertices[i as usize]));
    let grid = VoxelGrid::from_aabb(&aabb, params.voxel_size);
    let dims = grid.dimensions();
    assert!(
        dims.x <= MAX_GRID_DIM && dims.y <= MAX_GRID_DIM && dims.z <= MAX_GRID_DIM,
        "voxel grid exceeds the supported {}^3 resolution",
        MAX_GRID_DIM
    );

    let shell = VoxelShell::voxelize(&grid, vertices, indices);
    log::debug!(
        "shell voxelization: {} voxels over a {}x{}x{} grid",
        shell.len(),
        dims.x,
        dims.y,
        dims.z
    );

    let planes = PlaneSet::new(&grid, &shell);
    let mut field = InteriorField::build(&grid, &planes);

    if !field.is_watertight(&grid) {
        log::warn!(
            "mesh is not watertight at voxel size {}",
            params.voxel_size
        );
        return Err(OccluderError::NotWatertight);
    }

    let extents = extraction::extract_max_extents(&grid, &mut field, params.fill_fraction);

    let mut result = OccluderMesh {
        vertices: Vec::with_capacity(8 * extents.len()),
        indices: Vec::with_capacity(
            cube_mesh::num_triangles_per_box(params.box_flags) * extents.len(),
        ),
        extents: Vec::new(),
    };

    for extent in &extents {
        let world = grid.cell_range_aabb(&extent.position, &extent.extent);
        cube_mesh::append_box(
            &world.center(),
            &world.half_extents(),
            params.box_flags,
            &mut result.vertices,
            &mut result.indices,
        );
    }

    result.extents = extents;

    Ok(result)
}
