// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tessera::{BuildOptions, Mesh, Point2, Pslg, VoronoiBuilder, VoronoiDiagram};

fn build(pslg: &Pslg) -> Mesh {
    let mesh = Mesh::triangulate(pslg, &BuildOptions::default()).expect("triangulation failed");
    mesh.validate().expect("invalid mesh");
    mesh
}

fn signed_area(points: &[Point2]) -> f64 {
    let mut sum = 0.0;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    0.5 * sum
}

/// Indices of points lying on the mesh boundary, read off the raw output.
fn boundary_points(mesh: &Mesh) -> Vec<usize> {
    let raw = mesh.to_raw();
    let mut on_boundary = vec![false; raw.points.len()];
    for t in &raw.triangles {
        for i in 0..3 {
            if t.neighbors[i].is_none() {
                on_boundary[t.vertices[(i + 1) % 3]] = true;
                on_boundary[t.vertices[(i + 2) % 3]] = true;
            }
        }
    }
    (0..raw.points.len()).filter(|&v| on_boundary[v]).collect()
}

fn assert_twins_involute(diagram: &VoronoiDiagram) {
    for h in 0..diagram.half_edges.len() {
        let t = diagram.half_edges[h].twin;
        assert_ne!(t, h, "half-edge {h} is its own twin");
        assert_eq!(diagram.half_edges[t].twin, h, "twin of {h} does not point back");
    }
}

/// Every half-edge must appear in exactly one face ring, and each ring
/// entry must carry its face's id.
fn assert_rings_cover(diagram: &VoronoiDiagram) {
    let mut seen = vec![false; diagram.half_edges.len()];
    for f in 0..diagram.faces.len() {
        for h in diagram.cell_walk(f) {
            assert_eq!(diagram.half_edges[h].face, f, "half-edge {h} walked in the wrong face");
            assert!(!seen[h], "half-edge {h} appears in two rings");
            seen[h] = true;
        }
    }
    assert!(seen.iter().all(|&s| s), "some half-edge is unreachable from any face");
}

#[test]
fn test_fan_dual_of_square_with_center() {
    let pslg = Pslg::from_points(vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
        Point2::new(0.5, 0.5),
    ]);
    let mesh = build(&pslg);
    assert_eq!(mesh.triangle_count(), 4);

    let diagram = mesh.voronoi().expect("voronoi failed");
    assert_eq!(diagram.vertices.len(), 4);
    assert_eq!(diagram.faces.len(), 6);
    assert_eq!(diagram.half_edges.len(), 16);

    assert_eq!(diagram.faces[0].generator, None);
    assert!(!diagram.faces[0].bounded);
    assert_eq!(diagram.cell_walk(0).len(), 4);

    // The center's cell is the diamond of edge midpoints.
    let center = diagram.face_of(4).expect("center has no cell");
    assert!(diagram.faces[center].bounded);
    assert_eq!(diagram.faces[center].generator, Some(4));
    let cell = diagram.cell_points(center);
    assert_eq!(cell.len(), 4);
    assert_relative_eq!(signed_area(&cell).abs(), 0.5, max_relative = 1e-12);

    for corner in 0..4 {
        let f = diagram.face_of(corner).expect("corner has no cell");
        assert!(!diagram.faces[f].bounded);
        assert_eq!(diagram.faces[f].generator, Some(corner));
        assert_eq!(diagram.cell_walk(f).len(), 2);
    }

    assert_twins_involute(&diagram);
    assert_rings_cover(&diagram);
}

#[test]
fn test_dual_invariants_on_a_cloud() {
    let mut rng = StdRng::seed_from_u64(11);
    let points = (0..40)
        .map(|_| Point2::new(rng.random_range(0.0..10.0), rng.random_range(0.0..10.0)))
        .collect();
    let mesh = build(&Pslg::from_points(points));
    let diagram = mesh.voronoi().expect("voronoi failed");

    assert_eq!(diagram.vertices.len(), mesh.triangle_count());
    assert_eq!(diagram.faces.len(), mesh.live_vertex_count() + 1);
    assert_twins_involute(&diagram);
    assert_rings_cover(&diagram);

    // Hull generators get open cells, interior generators closed ones.
    // Nothing was carved, so raw indices coincide with vertex ids.
    let hull = boundary_points(&mesh);
    for v in 0..40 {
        let f = diagram.face_of(v).expect("generator has no cell");
        assert_eq!(diagram.faces[f].bounded, !hull.contains(&v));
        if diagram.faces[f].bounded {
            assert!(diagram.cell_points(f).len() >= 3);
        }
    }
    assert_eq!(diagram.cell_walk(0).len(), hull.len());
}

#[test]
fn test_repeated_builds_agree() {
    let mut rng = StdRng::seed_from_u64(23);
    let points = (0..25)
        .map(|_| Point2::new(rng.random_range(0.0..4.0), rng.random_range(0.0..4.0)))
        .collect();
    let mesh = build(&Pslg::from_points(points));

    let mut builder = VoronoiBuilder::new();
    let first = builder.build(&mesh).expect("voronoi failed");
    let second = builder.build(&mesh).expect("voronoi failed");
    assert_eq!(first, second);
    assert_eq!(first, mesh.voronoi().expect("voronoi failed"));
}

#[test]
fn test_hole_makes_two_outer_contours() {
    let mut pslg = Pslg::from_points(vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
        Point2::new(0.25, 0.25),
        Point2::new(0.75, 0.25),
        Point2::new(0.75, 0.75),
        Point2::new(0.25, 0.75),
    ]);
    pslg.segments = vec![
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (4, 5),
        (5, 6),
        (6, 7),
        (7, 4),
    ];
    pslg.holes = vec![Point2::new(0.5, 0.5)];

    let mesh = build(&pslg);
    let diagram = mesh.voronoi().expect("voronoi failed");

    assert_eq!(diagram.vertices.len(), 8);
    assert_twins_involute(&diagram);

    // Every generator sits on a boundary, so every cell is open and
    // contributes one outer half-edge.
    let open_cells = diagram.faces.iter().skip(1).filter(|f| !f.bounded).count();
    assert_eq!(open_cells, 8);
    let outer: Vec<usize> = (0..diagram.half_edges.len())
        .filter(|&h| diagram.half_edges[h].face == 0)
        .collect();
    assert_eq!(outer.len(), 8);

    // The outer face edges close into two rings: the hull contour and
    // the hole contour.
    let mut seen = vec![false; diagram.half_edges.len()];
    let mut rings = 0;
    for &start in &outer {
        if seen[start] {
            continue;
        }
        rings += 1;
        let mut h = start;
        for _ in 0..diagram.half_edges.len() {
            assert_eq!(diagram.half_edges[h].face, 0);
            assert!(!seen[h], "outer contours intersect");
            seen[h] = true;
            h = diagram.half_edges[h].next;
            if h == start {
                break;
            }
        }
        assert_eq!(h, start, "outer contour never closed");
    }
    assert_eq!(rings, 2);
}

#[test]
fn test_concave_carved_outline_chains() {
    let mut pslg = Pslg::from_points(vec![
        Point2::new(0.0, 0.0),
        Point2::new(4.0, 0.0),
        Point2::new(4.0, 3.0),
        Point2::new(2.0, 1.0),
        Point2::new(0.0, 3.0),
    ]);
    pslg.segments = vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)];

    let mesh = build(&pslg);
    let diagram = mesh.voronoi().expect("voronoi failed");

    assert_eq!(diagram.faces.len(), 6);
    assert_twins_involute(&diagram);
    assert_rings_cover(&diagram);
    // All five vertices lie on the carved outline; the reflex one too.
    assert_eq!(diagram.cell_walk(0).len(), 5);
}
