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

use tessera::{BuildOptions, LogLevel, MemoryLog, Mesh, Point2, Pslg, RefineOptions, Region};

fn build(pslg: &Pslg) -> Mesh {
    let mesh = Mesh::triangulate(pslg, &BuildOptions::default()).expect("triangulation failed");
    mesh.validate().expect("invalid mesh");
    mesh
}

/// Unit square outline with a quarter-size square hole outline inside it.
fn square_with_hole() -> Pslg {
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
    pslg
}

#[test]
fn test_hole_is_carved() {
    let mut pslg = square_with_hole();
    pslg.holes = vec![Point2::new(0.5, 0.5)];

    let mesh = build(&pslg);
    assert!(mesh.triangle_count() > 0);
    assert_relative_eq!(mesh.total_area(), 0.75, max_relative = 1e-12);

    // Nothing may remain inside the hole outline.
    let raw = mesh.to_raw();
    for t in 0..raw.triangles.len() {
        let [a, b, c] = raw.corners(t);
        let cx = (a.x + b.x + c.x) / 3.0;
        let cy = (a.y + b.y + c.y) / 3.0;
        assert!(
            !(0.25..0.75).contains(&cx) || !(0.25..0.75).contains(&cy),
            "triangle {t} survived inside the hole"
        );
    }
}

#[test]
fn test_unseeded_inner_outline_stays_filled() {
    // Same outline, no hole seed: the inner square is just constrained
    // edges and keeps its triangles.
    let mesh = build(&square_with_hole());
    assert_relative_eq!(mesh.total_area(), 1.0, max_relative = 1e-12);
}

#[test]
fn test_concave_outline_respects_keep_hull() {
    // A dart: concave at vertex 3. Carving removes the notch, keeping
    // the hull retains it.
    let mut pslg = Pslg::from_points(vec![
        Point2::new(0.0, 0.0),
        Point2::new(4.0, 0.0),
        Point2::new(4.0, 3.0),
        Point2::new(2.0, 1.0),
        Point2::new(0.0, 3.0),
    ]);
    pslg.segments = vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)];

    let carved = build(&pslg);
    assert_relative_eq!(carved.total_area(), 8.0, max_relative = 1e-12);

    let options = BuildOptions {
        keep_convex_hull: true,
    };
    let full = Mesh::triangulate(&pslg, &options).expect("triangulation failed");
    full.validate().expect("invalid mesh");
    assert_relative_eq!(full.total_area(), 12.0, max_relative = 1e-12);
}

#[test]
fn test_region_labels_partition_the_mesh() {
    let mut pslg = Pslg::from_points(vec![
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(2.0, 1.0),
        Point2::new(0.0, 1.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
    ]);
    pslg.segments = vec![(0, 4), (4, 1), (1, 2), (2, 5), (5, 3), (3, 0), (4, 5)];
    pslg.regions = vec![
        Region::new(Point2::new(0.5, 0.5), 1),
        Region::new(Point2::new(1.5, 0.5), 2),
    ];

    let mesh = build(&pslg);
    let raw = mesh.to_raw();

    let mut area = [0.0f64; 3];
    for t in 0..raw.triangles.len() {
        let [a, b, c] = raw.corners(t);
        let tri_area = 0.5 * ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)).abs();
        let label = raw.triangles[t].region;
        assert!(label == 1 || label == 2, "triangle {t} has label {label}");
        area[label as usize] += tri_area;
    }
    assert_relative_eq!(area[1], 1.0, max_relative = 1e-12);
    assert_relative_eq!(area[2], 1.0, max_relative = 1e-12);
}

#[test]
fn test_hole_and_region_together() {
    // Hole floods the left half, the region label lands on the right.
    let mut pslg = Pslg::from_points(vec![
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(2.0, 1.0),
        Point2::new(0.0, 1.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
    ]);
    pslg.segments = vec![(0, 4), (4, 1), (1, 2), (2, 5), (5, 3), (3, 0), (4, 5)];
    pslg.holes = vec![Point2::new(0.5, 0.5)];
    pslg.regions = vec![Region::new(Point2::new(1.5, 0.5), 5)];

    let mesh = build(&pslg);
    assert_relative_eq!(mesh.total_area(), 1.0, max_relative = 1e-12);

    let raw = mesh.to_raw();
    // The left corners died with their triangles.
    assert_eq!(raw.points.len(), 4);
    for t in &raw.triangles {
        assert_eq!(t.region, 5);
        for &v in &t.vertices {
            assert!(raw.points[v].x >= 1.0);
        }
    }
}

#[test]
fn test_stray_seeds_are_reported_not_fatal() {
    let mut pslg = square_with_hole();
    pslg.holes = vec![Point2::new(5.0, 5.0)];
    pslg.regions = vec![Region::new(Point2::new(-3.0, 0.5), 9)];

    let mut log = MemoryLog::default();
    let mesh = Mesh::triangulate_with_log(&pslg, &BuildOptions::default(), &mut log)
        .expect("triangulation failed");
    mesh.validate().expect("invalid mesh");

    assert_relative_eq!(mesh.total_area(), 1.0, max_relative = 1e-12);
    assert!(log.contains(LogLevel::Warn, "hole seed 0 lies outside the hull"));
    assert!(log.contains(LogLevel::Warn, "region seed 0 lies outside the hull"));
}

#[test]
fn test_carved_mesh_refines_cleanly() {
    let mut pslg = square_with_hole();
    pslg.holes = vec![Point2::new(0.5, 0.5)];

    let mut mesh = build(&pslg);
    let options = RefineOptions {
        min_angle_deg: 25.0,
        max_area: Some(0.01),
        max_steiner_points: Some(2000),
    };
    let report = mesh.refine(&options).expect("refinement failed");
    mesh.validate().expect("invalid mesh");

    assert!(report.complete);
    assert_relative_eq!(mesh.total_area(), 0.75, max_relative = 1e-9);
    assert!(mesh.min_angle() >= 25.0 - 1e-9);
}
