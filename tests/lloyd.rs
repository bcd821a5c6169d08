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

use tessera::voronoi::lloyd::{relax, LloydOptions};
use tessera::{BuildOptions, Mesh, Point2, Pslg, RefineOptions};

fn build(pslg: &Pslg) -> Mesh {
    let mesh = Mesh::triangulate(pslg, &BuildOptions::default()).expect("triangulation failed");
    mesh.validate().expect("invalid mesh");
    mesh
}

/// Unit square outline plus one interior point.
fn square_with(interior: Point2) -> Pslg {
    let mut pslg = Pslg::from_points(vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.0, 1.0),
        interior,
    ]);
    pslg.segments = vec![(0, 1), (1, 2), (2, 3), (3, 0)];
    pslg
}

#[test]
fn test_centered_point_is_a_fixed_point() {
    let mesh = build(&square_with(Point2::new(0.5, 0.5)));
    let options = LloydOptions {
        max_iterations: 5,
        convergence_threshold: 1e-9,
    };

    let (smoothed, report) = relax(&mesh, &options, None).expect("smoothing failed");
    smoothed.validate().expect("invalid mesh");

    // The center's cell is a symmetric diamond, so the centroid is the
    // center itself and the first iteration already converges.
    assert!(report.converged);
    assert_eq!(report.iterations, 1);
    assert!(report.max_displacement <= 1e-12);
    assert_eq!(mesh.to_raw(), smoothed.to_raw());
}

#[test]
fn test_interior_point_drifts_inward() {
    let mesh = build(&square_with(Point2::new(0.3, 0.4)));
    let options = LloydOptions {
        max_iterations: 1,
        convergence_threshold: 0.0,
    };

    let (smoothed, report) = relax(&mesh, &options, None).expect("smoothing failed");
    smoothed.validate().expect("invalid mesh");

    assert_eq!(report.iterations, 1);
    assert!(!report.converged);
    assert!(report.max_displacement > 0.01);

    let before = mesh.to_raw();
    let after = smoothed.to_raw();
    assert_eq!(after.points.len(), 5);
    assert_eq!(after.triangles.len(), before.triangles.len());
    assert_relative_eq!(smoothed.total_area(), 1.0, max_relative = 1e-9);

    // Corners are segment endpoints and must not move at all.
    for corner in 0..4 {
        assert_eq!(after.points[corner], before.points[corner]);
    }
    // The free point is pulled toward the middle of the square.
    assert!(after.points[4].x > 0.3);
    assert!(after.points[4].y > 0.4);
}

#[test]
fn test_displacement_contracts_across_iterations() {
    let one = LloydOptions {
        max_iterations: 1,
        convergence_threshold: 0.0,
    };
    let mesh = build(&square_with(Point2::new(0.3, 0.4)));

    let (step1, first) = relax(&mesh, &one, None).expect("smoothing failed");
    let (_, second) = relax(&step1, &one, None).expect("smoothing failed");
    assert!(second.max_displacement < first.max_displacement);
}

#[test]
fn test_iteration_budget_and_threshold() {
    let mesh = build(&square_with(Point2::new(0.3, 0.4)));

    let exhaust = LloydOptions {
        max_iterations: 4,
        convergence_threshold: 0.0,
    };
    let (_, report) = relax(&mesh, &exhaust, None).expect("smoothing failed");
    assert_eq!(report.iterations, 4);
    assert!(!report.converged);

    // A coarse threshold already holds after the first iteration.
    let coarse = LloydOptions {
        max_iterations: 4,
        convergence_threshold: 0.5,
    };
    let (_, report) = relax(&mesh, &coarse, None).expect("smoothing failed");
    assert_eq!(report.iterations, 1);
    assert!(report.converged);
}

#[test]
fn test_relax_preserves_refinement_guarantees() {
    let mut mesh = build(&square_with(Point2::new(0.5, 0.5)));
    let quality = RefineOptions {
        min_angle_deg: 25.0,
        max_area: Some(0.05),
        max_steiner_points: None,
    };
    let report = mesh.refine(&quality).expect("refinement failed");
    assert!(report.complete);

    let options = LloydOptions {
        max_iterations: 3,
        convergence_threshold: 0.0,
    };
    let (smoothed, _) = relax(&mesh, &options, Some(&quality)).expect("smoothing failed");
    smoothed.validate().expect("invalid mesh");

    assert_relative_eq!(smoothed.total_area(), 1.0, max_relative = 1e-9);
    assert!(smoothed.min_angle() >= 25.0 - 1e-9);
    let raw = smoothed.to_raw();
    for t in 0..raw.triangles.len() {
        let [a, b, c] = raw.corners(t);
        let area = 0.5 * ((b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)).abs();
        assert!(area <= 0.05 * (1.0 + 1e-9), "triangle {t} exceeds the area cap");
    }
}

#[test]
fn test_segment_vertices_stay_pinned() {
    let mut pslg = Pslg::from_points(vec![
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(2.0, 1.0),
        Point2::new(0.0, 1.0),
        Point2::new(1.0, 0.0),
        Point2::new(1.0, 1.0),
        Point2::new(0.4, 0.6),
        Point2::new(1.6, 0.4),
    ]);
    pslg.segments = vec![(0, 4), (4, 1), (1, 2), (2, 5), (5, 3), (3, 0), (4, 5)];

    let mesh = build(&pslg);
    let options = LloydOptions {
        max_iterations: 2,
        convergence_threshold: 0.0,
    };
    let (smoothed, report) = relax(&mesh, &options, None).expect("smoothing failed");
    smoothed.validate().expect("invalid mesh");
    assert!(report.max_displacement > 0.0);

    let before = mesh.to_raw();
    let after = smoothed.to_raw();
    assert_eq!(after.points.len(), 8);
    for pinned in 0..6 {
        assert_eq!(after.points[pinned], before.points[pinned]);
    }
    for free in 6..8 {
        assert_ne!(after.points[free], before.points[free]);
    }
    // The divider keeps both halves constrained through the rebuilds.
    assert_relative_eq!(smoothed.total_area(), 2.0, max_relative = 1e-9);
}
