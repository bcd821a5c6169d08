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

fn frame(width: f64, height: f64) -> Pslg {
    let mut pslg = Pslg::from_points(vec![
        Point2::new(0.0, 0.0),
        Point2::new(width, 0.0),
        Point2::new(width, height),
        Point2::new(0.0, height),
    ]);
    pslg.segments = vec![(0, 1), (1, 2), (2, 3), (3, 0)];
    pslg
}

fn build(pslg: &Pslg) -> Mesh {
    let mesh = Mesh::triangulate(pslg, &BuildOptions::default()).expect("triangulation failed");
    mesh.validate().expect("invalid mesh");
    mesh
}

#[test]
fn test_good_mesh_needs_no_steiner_points() {
    let mut pslg = frame(1.0, 1.0);
    pslg.points.push(Point2::new(0.5, 0.5));

    let mut mesh = build(&pslg);
    let report = mesh.refine(&RefineOptions::default()).expect("refinement failed");

    // Four right isosceles triangles around the center: min angle 45.
    assert!(report.complete);
    assert_eq!(report.steiner_points, 0);
    assert_eq!(mesh.triangle_count(), 4);
    mesh.validate().expect("invalid mesh");
}

#[test]
fn test_min_angle_is_reached() {
    let mut mesh = build(&frame(4.0, 1.0));
    assert!(mesh.min_angle() < 15.0);

    let options = RefineOptions {
        min_angle_deg: 25.0,
        max_area: None,
        max_steiner_points: Some(1000),
    };
    let report = mesh.refine(&options).expect("refinement failed");
    mesh.validate().expect("invalid mesh");

    assert!(report.complete);
    assert!(report.steiner_points > 0);
    assert_eq!(report.remaining_bad_triangles, 0);
    assert_eq!(report.remaining_encroached, 0);
    assert!(mesh.min_angle() >= 25.0 - 1e-9);
    assert_relative_eq!(mesh.total_area(), 4.0, max_relative = 1e-9);
}

#[test]
fn test_global_area_cap() {
    let mut mesh = build(&frame(1.0, 1.0));
    let options = RefineOptions {
        min_angle_deg: 20.0,
        max_area: Some(0.05),
        max_steiner_points: Some(1000),
    };
    let report = mesh.refine(&options).expect("refinement failed");
    mesh.validate().expect("invalid mesh");

    assert!(report.complete);
    assert!(report.steiner_points > 0);
    assert!(mesh.triangle_count() >= 20);
    let raw = mesh.to_raw();
    for t in 0..raw.triangles.len() {
        let [a, b, c] = raw.corners(t);
        let area = 0.5 * ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)).abs();
        assert!(area <= 0.05 * (1.0 + 1e-9), "triangle {t} has area {area}");
    }
    assert_relative_eq!(mesh.total_area(), 1.0, max_relative = 1e-9);
}

#[test]
fn test_region_area_cap_applies_only_inside() {
    // A 2x1 rectangle split down the middle; only the left half carries
    // an area bound.
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
        Region::with_max_area(Point2::new(0.5, 0.5), 1, 0.02),
        Region::new(Point2::new(1.5, 0.5), 2),
    ];

    let mut mesh = build(&pslg);
    let options = RefineOptions {
        min_angle_deg: 20.0,
        max_area: None,
        max_steiner_points: Some(2000),
    };
    let report = mesh.refine(&options).expect("refinement failed");
    mesh.validate().expect("invalid mesh");
    assert!(report.complete);

    let raw = mesh.to_raw();
    let mut left = 0usize;
    let mut right_max_area = 0.0f64;
    for t in 0..raw.triangles.len() {
        let [a, b, c] = raw.corners(t);
        let area = 0.5 * ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)).abs();
        match raw.triangles[t].region {
            1 => {
                left += 1;
                assert!(area <= 0.02 * (1.0 + 1e-9), "left triangle {t} has area {area}");
            }
            2 => right_max_area = right_max_area.max(area),
            other => panic!("triangle {t} carries unexpected region label {other}"),
        }
    }
    // The bound forced real subdivision on the left; the right half was
    // refined for shape only and keeps coarser triangles.
    assert!(left >= 50);
    assert!(right_max_area > 0.02);
}

#[test]
fn test_steiner_ceiling_stops_the_run() {
    let mut mesh = build(&frame(8.0, 1.0));
    let options = RefineOptions {
        min_angle_deg: 34.0,
        max_area: None,
        max_steiner_points: Some(3),
    };
    let mut log = MemoryLog::default();
    let report = mesh
        .refine_with_log(&options, &mut log)
        .expect("refinement failed");
    mesh.validate().expect("invalid mesh");

    assert!(!report.complete);
    assert!(report.steiner_points <= 3);
    assert!(report.remaining_bad_triangles > 0);
    assert!(log.contains(LogLevel::Warn, "above 33 degrees"));
    assert!(log.contains(LogLevel::Warn, "refinement stopped"));
}

#[test]
fn test_refined_boundary_stays_on_the_input_outline() {
    let mut mesh = build(&frame(4.0, 1.0));
    let options = RefineOptions {
        min_angle_deg: 28.0,
        max_area: Some(0.1),
        max_steiner_points: Some(2000),
    };
    let report = mesh.refine(&options).expect("refinement failed");
    mesh.validate().expect("invalid mesh");
    assert!(report.complete);

    // Boundary Steiner points may only appear on the four input segments.
    let raw = mesh.to_raw();
    let on_outline = |p: &Point2| {
        let on_x = (p.y == 0.0 || p.y == 1.0) && (0.0..=4.0).contains(&p.x);
        let on_y = (p.x == 0.0 || p.x == 4.0) && (0.0..=1.0).contains(&p.y);
        on_x || on_y
    };
    for t in 0..raw.triangles.len() {
        let tri = &raw.triangles[t];
        for i in 0..3 {
            if tri.neighbors[i].is_none() {
                let u = tri.vertices[(i + 1) % 3];
                let v = tri.vertices[(i + 2) % 3];
                assert!(on_outline(&raw.points[u]), "boundary vertex {u} drifted");
                assert!(on_outline(&raw.points[v]), "boundary vertex {v} drifted");
            }
        }
    }
}

#[test]
fn test_small_input_angle_terminates() {
    // A 7 degree wedge; splitting cascades must settle on concentric
    // shells instead of running to the ceiling.
    let mut pslg = Pslg::from_points(vec![
        Point2::new(0.0, 0.0),
        Point2::new(4.0, 0.0),
        Point2::new(4.0, 0.5),
    ]);
    pslg.segments = vec![(0, 1), (1, 2), (2, 0)];

    let mut mesh = build(&pslg);
    let options = RefineOptions {
        min_angle_deg: 30.0,
        max_area: None,
        max_steiner_points: Some(1000),
    };
    let report = mesh.refine(&options).expect("refinement failed");
    mesh.validate().expect("invalid mesh");

    assert!(report.steiner_points < 1000, "refinement ran away");
    assert!(mesh.min_angle() > 0.0);
}
