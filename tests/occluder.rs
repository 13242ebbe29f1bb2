use std::collections::HashSet;

use approx::relative_eq;
use occlumesh::math::{Point, Real};
use occlumesh::na::{Point3, Vector3};
use occlumesh::{generate_occluder, OccluderBoxFlags, OccluderError, OccluderMesh, OccluderParameters};

type TriMesh = (Vec<Point<Real>>, Vec<[u32; 3]>);

fn params(voxel_size: Real, fill_fraction: Real) -> OccluderParameters {
    OccluderParameters {
        voxel_size,
        fill_fraction,
        ..OccluderParameters::default()
    }
}

/// The 12-triangle surface of the box `[mins, maxs]`.
fn box_mesh(mins: Point<Real>, maxs: Point<Real>) -> TriMesh {
    let (vertices, mut indices) = open_box_mesh(mins, maxs);
    // The `+y` face left out by `open_box_mesh`.
    indices.push([3, 2, 6]);
    indices.push([3, 6, 7]);
    (vertices, indices)
}

/// The same box without its `+y` face.
fn open_box_mesh(mins: Point<Real>, maxs: Point<Real>) -> TriMesh {
    let vertices = vec![
        Point::new(mins.x, mins.y, mins.z),
        Point::new(maxs.x, mins.y, mins.z),
        Point::new(maxs.x, maxs.y, mins.z),
        Point::new(mins.x, maxs.y, mins.z),
        Point::new(mins.x, mins.y, maxs.z),
        Point::new(maxs.x, mins.y, maxs.z),
        Point::new(maxs.x, maxs.y, maxs.z),
        Point::new(mins.x, maxs.y, maxs.z),
    ];
    let indices = vec![
        [0, 1, 2],
        [0, 2, 3],
        [4, 5, 6],
        [4, 6, 7],
        [0, 1, 5],
        [0, 5, 4],
        [0, 3, 7],
        [0, 7, 4],
        [1, 2, 6],
        [1, 6, 5],
    ];
    (vertices, indices)
}

fn merge(a: TriMesh, b: TriMesh) -> TriMesh {
    let (mut vertices, mut indices) = a;
    let base = vertices.len() as u32;
    vertices.extend(b.0);
    indices.extend(b.1.iter().map(|tri| tri.map(|i| i + base)));
    (vertices, indices)
}

fn cells_of(mesh: &OccluderMesh) -> Vec<HashSet<(u32, u32, u32)>> {
    mesh.extents
        .iter()
        .map(|e| {
            let mut cells = HashSet::new();
            for x in e.position.x..e.position.x + e.extent.x {
                for y in e.position.y..e.position.y + e.extent.y {
                    for z in e.position.z..e.position.z + e.extent.z {
                        assert!(cells.insert((x, y, z)));
                    }
                }
            }
            cells
        })
        .collect()
}

fn assert_extents_disjoint(mesh: &OccluderMesh) {
    let cells = cells_of(mesh);
    for i in 0..cells.len() {
        for j in i + 1..cells.len() {
            assert!(cells[i].is_disjoint(&cells[j]));
        }
    }
}

fn assert_volumes_non_increasing(mesh: &OccluderMesh) {
    for extent in &mesh.extents {
        assert!(extent.volume > 0);
    }
    for pair in mesh.extents.windows(2) {
        assert!(pair[0].volume >= pair[1].volume);
    }
}

#[test]
fn unit_cube_fills_interior_with_one_box() {
    let (vertices, indices) = box_mesh(Point::origin(), Point::new(1.0, 1.0, 1.0));
    let result = generate_occluder(&params(0.25, 1.0), &vertices, &indices).unwrap();

    assert_eq!(result.extents.len(), 1);
    let extent = result.extents[0];
    assert_eq!(extent.position, Point3::new(2, 2, 2));
    assert_eq!(extent.extent, Vector3::new(2, 2, 2));
    assert_eq!(extent.volume, 8);

    // One regular box: 8 corners, 12 triangles.
    assert_eq!(result.vertices.len(), 8);
    assert_eq!(result.indices.len(), 12);

    // The box must lie strictly inside the input cube.
    let mut box_mins = result.vertices[0];
    let mut box_maxs = result.vertices[0];
    for v in &result.vertices {
        box_mins = box_mins.coords.inf(&v.coords).into();
        box_maxs = box_maxs.coords.sup(&v.coords).into();
        for i in 0..3 {
            assert!(v[i] > 0.0 && v[i] < 1.0);
        }
    }
    assert!(relative_eq!(box_mins, Point::new(0.25, 0.25, 0.25), epsilon = 1.0e-6));
    assert!(relative_eq!(box_maxs, Point::new(0.75, 0.75, 0.75), epsilon = 1.0e-6));
}

#[test]
fn finer_voxels_still_extract_a_single_box() {
    let (vertices, indices) = box_mesh(Point::origin(), Point::new(1.0, 1.0, 1.0));
    let result = generate_occluder(&params(0.125, 1.0), &vertices, &indices).unwrap();

    // The whole interior is a single box picked in one greedy iteration.
    assert_eq!(result.extents.len(), 1);
    assert_eq!(result.extents[0].position, Point3::new(2, 2, 2));
    assert_eq!(result.extents[0].extent, Vector3::new(6, 6, 6));
    assert_eq!(result.extents[0].volume, 216);
}

#[test]
fn separated_cubes_yield_two_boxes_in_scan_order() {
    let mesh = merge(
        box_mesh(Point::origin(), Point::new(1.0, 1.0, 1.0)),
        box_mesh(Point::new(2.0, 0.0, 0.0), Point::new(3.0, 1.0, 1.0)),
    );
    let result = generate_occluder(&params(0.25, 1.0), &mesh.0, &mesh.1).unwrap();

    assert_eq!(result.extents.len(), 2);
    assert_eq!(result.extents[0].position, Point3::new(2, 2, 2));
    assert_eq!(result.extents[1].position, Point3::new(10, 2, 2));
    assert_eq!(result.extents[0].extent, Vector3::new(2, 2, 2));
    assert_eq!(result.extents[1].extent, Vector3::new(2, 2, 2));

    assert_extents_disjoint(&result);
    assert_volumes_non_increasing(&result);
}

#[test]
fn fill_target_stops_extraction_early() {
    // Two unit cubes sharing the `x = 1` wall: 16 interior voxels in total.
    let mesh = merge(
        box_mesh(Point::origin(), Point::new(1.0, 1.0, 1.0)),
        box_mesh(Point::new(1.0, 0.0, 0.0), Point::new(2.0, 1.0, 1.0)),
    );

    let half = generate_occluder(&params(0.25, 0.5), &mesh.0, &mesh.1).unwrap();
    assert_eq!(half.extents.len(), 1);
    assert_eq!(half.extents[0].volume, 8);

    let full = generate_occluder(&params(0.25, 1.0), &mesh.0, &mesh.1).unwrap();
    assert_eq!(full.extents.len(), 2);
    assert_eq!(full.extents[0].position, Point3::new(2, 2, 2));
    assert_eq!(full.extents[1].position, Point3::new(6, 2, 2));
    assert_eq!(full.extents.iter().map(|e| e.volume).sum::<u32>(), 16);
    assert_extents_disjoint(&full);
}

#[test]
fn open_cube_has_no_interior() {
    // Without its top face the cube encloses nothing: no cell sees the shell
    // in all six directions, so the occluder is empty but generation succeeds.
    let (vertices, indices) = open_box_mesh(Point::origin(), Point::new(1.0, 1.0, 1.0));
    let result = generate_occluder(&params(0.25, 1.0), &vertices, &indices).unwrap();

    assert!(result.extents.is_empty());
    assert!(result.vertices.is_empty());
    assert!(result.indices.is_empty());
}

#[test]
fn hidden_gap_fails_the_watertight_check() {
    // An open-topped cube below a closed cube. Cells inside the lower cube
    // see shell in all six directions (the upper cube's bottom face closes
    // the view upward), but their `+y` runs cross the uncovered gap, which
    // the watertightness gate must reject.
    let mesh = merge(
        open_box_mesh(Point::origin(), Point::new(1.0, 1.0, 1.0)),
        box_mesh(Point::new(0.0, 2.0, 0.0), Point::new(1.0, 3.0, 1.0)),
    );

    assert_eq!(
        generate_occluder(&params(0.25, 1.0), &mesh.0, &mesh.1),
        Err(OccluderError::NotWatertight)
    );
}

#[test]
fn rod_extends_along_its_long_axis() {
    let (vertices, indices) = box_mesh(Point::origin(), Point::new(2.0, 0.5, 0.5));
    let result = generate_occluder(&params(0.125, 1.0), &vertices, &indices).unwrap();

    assert_eq!(result.extents.len(), 1);
    let extent = result.extents[0];
    assert_eq!(extent.position, Point3::new(2, 2, 2));
    assert_eq!(extent.extent, Vector3::new(14, 2, 2));
    assert_eq!(extent.volume, 56);
    assert!(extent.extent.x > 4 * extent.extent.y);
}

fn tetrahedron() -> TriMesh {
    let vertices = vec![
        Point::origin(),
        Point::new(2.0, 0.0, 0.0),
        Point::new(0.0, 2.0, 0.0),
        Point::new(0.0, 0.0, 2.0),
    ];
    let indices = vec![[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
    (vertices, indices)
}

#[test]
fn tetrahedron_occluder_stays_inside_the_surface() {
    let (vertices, indices) = tetrahedron();
    let result = generate_occluder(&params(0.25, 1.0), &vertices, &indices).unwrap();

    assert!(!result.extents.is_empty());
    assert_extents_disjoint(&result);
    assert_volumes_non_increasing(&result);

    // Every emitted corner must satisfy the tetrahedron's four half-spaces.
    for v in &result.vertices {
        assert!(v.x > 0.0 && v.y > 0.0 && v.z > 0.0);
        assert!(v.x + v.y + v.z <= 2.0 + 1.0e-4);
    }
}

#[test]
fn generation_is_deterministic() {
    let (vertices, indices) = tetrahedron();
    let p = params(0.25, 1.0);

    let first = generate_occluder(&p, &vertices, &indices).unwrap();
    let second = generate_occluder(&p, &vertices, &indices).unwrap();

    assert_eq!(first, second);
}

#[test]
fn degenerate_triangles_are_harmless() {
    let (vertices, indices) = box_mesh(Point::origin(), Point::new(1.0, 1.0, 1.0));
    let reference = generate_occluder(&params(0.25, 1.0), &vertices, &indices).unwrap();

    // A zero-area triangle collapsed onto a surface corner.
    let mut degenerate = indices.clone();
    degenerate.push([0, 0, 0]);
    let result = generate_occluder(&params(0.25, 1.0), &vertices, &degenerate).unwrap();

    assert_eq!(result.extents, reference.extents);
}

#[test]
fn box_flags_select_the_tessellation() {
    let (vertices, indices) = box_mesh(Point::origin(), Point::new(1.0, 1.0, 1.0));

    let triangles_for = |flags: OccluderBoxFlags| {
        let p = OccluderParameters {
            voxel_size: 0.25,
            fill_fraction: 1.0,
            box_flags: flags,
        };
        let result = generate_occluder(&p, &vertices, &indices).unwrap();
        assert_eq!(result.vertices.len(), 8);
        result.indices.len()
    };

    assert_eq!(triangles_for(OccluderBoxFlags::REGULAR), 12);
    assert_eq!(triangles_for(OccluderBoxFlags::SIDES), 8);
    assert_eq!(triangles_for(OccluderBoxFlags::DIAGONALS), 4);
    assert_eq!(
        triangles_for(OccluderBoxFlags::TOP | OccluderBoxFlags::BOTTOM),
        4
    );
    assert_eq!(
        triangles_for(OccluderBoxFlags::SIDES | OccluderBoxFlags::TOP),
        10
    );
}

#[test]
fn parameters_are_validated_at_the_boundary() {
    let (vertices, indices) = box_mesh(Point::origin(), Point::new(1.0, 1.0, 1.0));

    let bad_voxel = params(0.0, 1.0);
    assert_eq!(
        generate_occluder(&bad_voxel, &vertices, &indices),
        Err(OccluderError::InvalidVoxelSize)
    );

    let nan_voxel = params(Real::NAN, 1.0);
    assert_eq!(
        generate_occluder(&nan_voxel, &vertices, &indices),
        Err(OccluderError::InvalidVoxelSize)
    );

    let bad_fill = params(0.25, 0.0);
    assert_eq!(
        generate_occluder(&bad_fill, &vertices, &indices),
        Err(OccluderError::InvalidFillFraction)
    );

    let over_fill = params(0.25, 1.5);
    assert_eq!(
        generate_occluder(&over_fill, &vertices, &indices),
        Err(OccluderError::InvalidFillFraction)
    );

    let mixed_flags = OccluderParameters {
        voxel_size: 0.25,
        fill_fraction: 1.0,
        box_flags: OccluderBoxFlags::DIAGONALS | OccluderBoxFlags::SIDES,
    };
    assert_eq!(
        generate_occluder(&mixed_flags, &vertices, &indices),
        Err(OccluderError::InvalidBoxFlags)
    );

    let no_flags = OccluderParameters {
        voxel_size: 0.25,
        fill_fraction: 1.0,
        box_flags: OccluderBoxFlags::empty(),
    };
    assert_eq!(
        generate_occluder(&no_flags, &vertices, &indices),
        Err(OccluderError::InvalidBoxFlags)
    );
}

#[test]
fn index_buffer_is_validated() {
    let vertices = vec![
        Point::origin(),
        Point::new(1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
    ];

    assert_eq!(
        generate_occluder(&params(0.25, 1.0), &vertices, &[[0, 1, 7]]),
        Err(OccluderError::TriangleIndexOutOfBounds {
            index: 7,
            num_vertices: 3
        })
    );
}

#[test]
fn empty_mesh_yields_empty_occluder() {
    let result = generate_occluder(&params(0.25, 1.0), &[], &[]).unwrap();
    assert!(result.vertices.is_empty());
    assert!(result.indices.is_empty());
    assert!(result.extents.is_empty());
}
