//! Box tessellation templates for the emitted occluder mesh.

use crate::math::{Point, Real, Vector};

/// Selects which faces of each emitted box are tessellated.
///
/// The union of [`Self::SIDES`], [`Self::TOP`] and [`Self::BOTTOM`] is the
/// full closed box. [`Self::DIAGONALS`] is an alternative cheap proxy shape
/// (two crossed quads) and cannot be combined with the face flags.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct OccluderBoxFlags(u8);

bitflags::bitflags! {
    impl OccluderBoxFlags: u8 {
        /// Two crossed quads spanning the box's diagonals.
        const DIAGONALS = 1 << 0;
        /// The `+y` face.
        const TOP = 1 << 1;
        /// The `-y` face.
        const BOTTOM = 1 << 2;
        /// The four lateral faces.
        const SIDES = 1 << 3;
        /// The full closed box.
        const REGULAR = Self::SIDES.bits() | Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

impl Default for OccluderBoxFlags {
    fn default() -> Self {
        OccluderBoxFlags::REGULAR
    }
}

/// Local corner positions of a box, in the fixed emission order shared by all
/// the index templates below.
const BOX_VERTICES: [[Real; 3]; 8] = [
    [-1.0, 1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
];

const REGULAR_TRIANGLES: [[u32; 3]; 12] = [
    [0, 1, 2],
    [0, 2, 3],
    [3, 2, 6],
    [3, 6, 7],
    [0, 7, 4],
    [0, 3, 7],
    [4, 7, 5],
    [7, 6, 5],
    [0, 4, 5],
    [0, 5, 1],
    [1, 5, 6],
    [1, 6, 2],
];

const SIDES_TRIANGLES: [[u32; 3]; 8] = [
    [0, 1, 2],
    [0, 2, 3],
    [3, 2, 6],
    [3, 6, 7],
    [4, 7, 5],
    [7, 6, 5],
    [0, 4, 5],
    [0, 5, 1],
];

const DIAGONALS_TRIANGLES: [[u32; 3]; 4] = [[0, 1, 6], [0, 6, 7], [4, 5, 2], [4, 2, 3]];

const BOTTOM_TRIANGLES: [[u32; 3]; 2] = [[1, 5, 6], [1, 6, 2]];

const TOP_TRIANGLES: [[u32; 3]; 2] = [[0, 7, 4], [0, 3, 7]];

/// The template covering the highest-priority subset of `flags`, together
/// with that subset.
fn select_template(flags: OccluderBoxFlags) -> Option<(OccluderBoxFlags, &'static [[u32; 3]])> {
    if flags.contains(OccluderBoxFlags::REGULAR) {
        Some((OccluderBoxFlags::REGULAR, &REGULAR_TRIANGLES))
    } else if flags.contains(OccluderBoxFlags::SIDES) {
        Some((OccluderBoxFlags::SIDES, &SIDES_TRIANGLES))
    } else if flags.contains(OccluderBoxFlags::BOTTOM) {
        Some((OccluderBoxFlags::BOTTOM, &BOTTOM_TRIANGLES))
    } else if flags.contains(OccluderBoxFlags::TOP) {
        Some((OccluderBoxFlags::TOP, &TOP_TRIANGLES))
    } else if flags.contains(OccluderBoxFlags::DIAGONALS) {
        Some((OccluderBoxFlags::DIAGONALS, &DIAGONALS_TRIANGLES))
    } else {
        None
    }
}

/// The number of triangles emitted per box for the given flags.
pub(crate) fn num_triangles_per_box(flags: OccluderBoxFlags) -> usize {
    let mut remaining = flags;
    let mut count = 0;

    while let Some((selected, template)) = select_template(remaining) {
        count += template.len();
        remaining &= !selected;
    }

    count
}

/// Appends one tessellated box to the output buffers: 8 corner vertices in
/// the fixed local order, scaled by `half_extents` and translated to
/// `center`, followed by the index templates selected by `flags`.
pub(crate) fn append_box(
    center: &Point<Real>,
    half_extents: &Vector<Real>,
    flags: OccluderBoxFlags,
    vertices: &mut Vec<Point<Real>>,
    indices: &mut Vec<[u32; 3]>,
) {
    let base = vertices.len() as u32;

    for corner in &BOX_VERTICES {
        let local = Vector::new(corner[0], corner[1], corner[2]);
        vertices.push(center + half_extents.component_mul(&local));
    }

    let mut remaining = flags;
    while let Some((selected, template)) = select_template(remaining) {
        for tri in template {
            indices.push([tri[0] + base, tri[1] + base, tri[2] + base]);
        }
        remaining &= !selected;
    }
}
