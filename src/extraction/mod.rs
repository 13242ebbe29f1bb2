//! Greedy extraction of maximum-volume boxes from the interior field.

use crate::interior::InteriorField;
use crate::math::Real;
use crate::voxelization::VoxelGrid;
use na::{Point3, Vector2, Vector3};
use smallvec::SmallVec;

/// Per-anchor scratch for the slab extents; inline storage covers typical
/// grid depths without touching the heap.
type SlabExtents = SmallVec<[Vector2<u32>; 64]>;

/// An axis-aligned box of interior cells, anchored at its minimal corner.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MaxExtent {
    /// Grid coordinates of the box's minimal corner cell.
    pub position: Point3<u32>,
    /// Size of the box, in cells, along each axis.
    pub extent: Vector3<u32>,
    /// The number of cells covered by the box.
    pub volume: u32,
}

/// Repeatedly extracts the globally maximum-volume box of active cells until
/// `fill_fraction` of the interior volume is consumed, the interior is
/// exhausted, or no box can be found.
///
/// Returns the extracted extents in extraction order; their volumes are
/// non-increasing and the extents are pairwise disjoint.
pub(crate) fn extract_max_extents(
    grid: &VoxelGrid,
    field: &mut InteriorField,
    fill_fraction: Real,
) -> Vec<MaxExtent> {
    let total_volume = field.num_active();
    let mut extents = Vec::new();

    if total_volume == 0 {
        return extents;
    }

    let mut consumed = 0u32;
    let mut fill = 0.0;

    while fill < fill_fraction && consumed != total_volume {
        let best = find_global_max_extent(grid, field);
        if best.volume == 0 {
            break;
        }

        clip_extent(grid, field, &best);
        update_min_distances(grid, field, &best);

        fill += best.volume as Real / total_volume as Real;
        consumed += best.volume;
        extents.push(best);
    }

    log::debug!(
        "extracted {} extents covering {}/{} interior voxels",
        extents.len(),
        consumed,
        total_volume
    );

    extents
}

/// Scans every active cell in linear (lexicographic) order and keeps the
/// first anchor reaching the maximal volume; this ordering is part of the
/// determinism contract.
fn find_global_max_extent(grid: &VoxelGrid, field: &InteriorField) -> MaxExtent {
    let mut best = MaxExtent {
        position: Point3::origin(),
        extent: Vector3::zeros(),
        volume: 0,
    };
    let mut scratch = SlabExtents::new();

    for i in 0..field.status.len() as u32 {
        if !field.status[i as usize].is_active() {
            continue;
        }

        let candidate = max_extent_from(grid, field, &grid.unflatten(i), &mut scratch);
        if candidate.volume > best.volume {
            best = candidate;
        }
    }

    best
}

/// Finds the largest box of active cells whose minimal corner is `anchor`.
///
/// For each z-slab covered by the anchor's `+z` run, a diagonal walk bounds
/// the largest xy-rectangle anchored at the slab cell; the slabs are then
/// combined under a running componentwise minimum, keeping the depth that
/// maximizes the total volume (first maximum wins).
fn max_extent_from(
    grid: &VoxelGrid,
    field: &InteriorField,
    anchor: &Point3<u32>,
    scratch: &mut SlabExtents,
) -> MaxExtent {
    let anchor_dist = field.distances[grid.flatten(anchor) as usize];
    scratch.clear();

    for z in anchor.z..anchor.z + anchor_dist.z {
        let slab_flat = grid.flatten(&Point3::new(anchor.x, anchor.y, z));
        debug_assert!(field.status[slab_flat as usize].inner);

        if field.status[slab_flat as usize].clipped {
            continue;
        }

        let slab_dist = field.distances[slab_flat as usize];
        let mut extent = Vector2::new(slab_dist.x, slab_dist.y);

        let mut x = anchor.x + 1;
        let mut y = anchor.y + 1;
        let mut i = 1;
        while x < anchor.x + slab_dist.x && y < anchor.y + slab_dist.y {
            let flat = grid.flatten(&Point3::new(x, y, z));
            if field.status[flat as usize].is_active() {
                let dist = field.distances[flat as usize];
                extent.x = extent.x.min(dist.x + i);
                extent.y = extent.y.min(dist.y + i);
            } else {
                extent = Vector2::new(i, i);
                break;
            }
            x += 1;
            y += 1;
            i += 1;
        }

        scratch.push(extent);
    }

    debug_assert!(!scratch.is_empty());

    let mut running = Vector2::repeat(u32::MAX);
    let mut best_extent = Vector3::zeros();
    let mut best_volume = 0;

    for (k, slab_extent) in scratch.iter().enumerate() {
        running = running.inf(slab_extent);
        let depth = k as u32 + 1;
        let volume = running.x * running.y * depth;
        if volume > best_volume {
            best_extent = Vector3::new(running.x, running.y, depth);
            best_volume = volume;
        }
    }

    MaxExtent {
        position: *anchor,
        extent: best_extent,
        volume: best_volume,
    }
}

/// Marks every cell of the extent as consumed.
fn clip_extent(grid: &VoxelGrid, field: &mut InteriorField, extent: &MaxExtent) {
    for x in extent.position.x..extent.position.x + extent.extent.x {
        for y in extent.position.y..extent.position.y + extent.extent.y {
            for z in extent.position.z..extent.position.z + extent.extent.z {
                let flat = grid.flatten(&Point3::new(x, y, z)) as usize;
                debug_assert!(!field.status[flat].clipped, "extent overlaps a clipped cell");
                field.status[flat].clipped = true;
            }
        }
    }
}

/// Caps the distances of the active cells whose positive-axis runs would
/// enter the freshly clipped extent.
///
/// Only the three negative-direction shadows of the box need visiting: a run
/// can only enter the box from a cell behind one of its min faces.
fn update_min_distances(grid: &VoxelGrid, field: &mut InteriorField, extent: &MaxExtent) {
    let pos = extent.position;
    let size = extent.extent;

    for x in (0..pos.x).rev() {
        for y in pos.y..pos.y + size.y {
            for z in pos.z..pos.z + size.z {
                let flat = grid.flatten(&Point3::new(x, y, z)) as usize;
                if field.status[flat].is_active() {
                    let dist = &mut field.distances[flat];
                    dist.x = dist.x.min(pos.x - x);
                }
            }
        }
    }
    for x in pos.x..pos.x + size.x {
        for y in (0..pos.y).rev() {
            for z in pos.z..pos.z + size.z {
                let flat = grid.flatten(&Point3::new(x, y, z)) as usize;
                if field.status[flat].is_active() {
                    let dist = &mut field.distances[flat];
                    dist.y = dist.y.min(pos.y - y);
                }
            }
        }
    }
    for x in pos.x..pos.x + size.x {
        for y in pos.y..pos.y + size.y {
            for z in (0..pos.z).rev() {
                let flat = grid.flatten(&Point3::new(x, y, z)) as usize;
                if field.status[flat].is_active() {
                    let dist = &mut field.distances[flat];
                    dist.z = dist.z.min(pos.z - z);
                }
            }
        }
    }
}
