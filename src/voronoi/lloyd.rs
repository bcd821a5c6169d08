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

//! Lloyd smoothing: move free vertices to their Voronoi cell centroids.
//!
//! Each iteration extracts the dual, relocates every unpinned generator to
//! the centroid of its bounded cell, then rebuilds the triangulation from
//! scratch with the relocated points and the surviving constraints. The
//! rebuild keeps every structural guarantee of construction; no incremental
//! repair of a smoothed mesh is ever attempted.

use ahash::AHashSet;

use crate::diagnostics::{MeshLog, NullLog};
use crate::error::Result;
use crate::geometry::util;
use crate::mesh::Mesh;
use crate::mesh::basic_types::VertexKind;
use crate::mesh::core::EdgeRing;
use crate::mesh::handles::NO_SUBSEG;
use crate::operations::refinement::RefineOptions;
use crate::operations::triangulation::BuildOptions;
use crate::pslg::Pslg;
use crate::voronoi::VoronoiBuilder;
use crate::voronoi::VoronoiDiagram;

/// Iteration controls for [`relax`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LloydOptions {
    pub max_iterations: usize,
    /// Stop early once no generator moved farther than this. Zero keeps
    /// iterating to `max_iterations`.
    pub convergence_threshold: f64,
}

impl Default for LloydOptions {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            convergence_threshold: 0.0,
        }
    }
}

/// What a smoothing run did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LloydReport {
    pub iterations: usize,
    /// Largest generator displacement of the final iteration.
    pub max_displacement: f64,
    /// True when the threshold stopped the run before `max_iterations`.
    pub converged: bool,
}

/// Smooth `mesh` by Lloyd iteration and return the smoothed mesh. The
/// input mesh is left untouched. When `quality` is given, each rebuilt
/// mesh is refined with it, so Steiner vertices keep their guarantees
/// while drifting toward centroidal placement.
pub fn relax(
    mesh: &Mesh,
    options: &LloydOptions,
    quality: Option<&RefineOptions>,
) -> Result<(Mesh, LloydReport)> {
    relax_with_log(mesh, options, quality, &mut NullLog)
}

/// Same as [`relax`], reporting progress to the given sink.
pub fn relax_with_log(
    mesh: &Mesh,
    options: &LloydOptions,
    quality: Option<&RefineOptions>,
    log: &mut dyn MeshLog,
) -> Result<(Mesh, LloydReport)> {
    let mut current = mesh.clone();
    let mut builder = VoronoiBuilder::new();
    let build = BuildOptions {
        keep_convex_hull: mesh.keep_hull,
    };
    let mut report = LloydReport::default();

    for _ in 0..options.max_iterations {
        let diagram = builder.build(&current)?;
        let (pslg, moved) = relocated_input(&current, &diagram);

        let mut next = Mesh::triangulate_with_log(&pslg, &build, log)?;
        if let Some(quality) = quality {
            next.refine_with_log(quality, log)?;
        }
        current = next;

        report.iterations += 1;
        report.max_displacement = moved;
        log.debug(format_args!(
            "lloyd iteration {}: max displacement {:.3e}",
            report.iterations, moved
        ));
        if options.convergence_threshold > 0.0 && moved <= options.convergence_threshold {
            report.converged = true;
            break;
        }
    }

    log.info(format_args!(
        "lloyd smoothing ran {} iterations, final displacement {:.3e}",
        report.iterations, report.max_displacement
    ));
    Ok((current, report))
}

/// Live points with every movable generator relocated to its cell
/// centroid, packaged with the surviving constraints, hole seeds and
/// region seeds as input for a fresh build. Returns the largest
/// displacement applied.
fn relocated_input(mesh: &Mesh, diagram: &VoronoiDiagram) -> (Pslg, f64) {
    let mut remap = vec![usize::MAX; mesh.vertex_slots()];
    let mut pslg = Pslg::default();
    let mut moved = 0.0f64;

    let mut ring = EdgeRing::new();
    for v in 0..mesh.vertex_slots() {
        let vertex = mesh.vertex(v);
        if vertex.is_dead() {
            continue;
        }
        let mut point = vertex.point;
        if movable(mesh, v, &mut ring) {
            if let Some(face) = diagram.face_of(v) {
                if diagram.faces[face].bounded {
                    if let Some(centroid) = util::polygon_centroid(&diagram.cell_points(face)) {
                        moved = moved.max(point.distance(&centroid));
                        point = centroid;
                    }
                }
            }
        }
        remap[v] = pslg.points.len();
        pslg.points.push(point);
        pslg.point_markers.push(vertex.marker);
    }

    // One rebuilt segment per original input segment, recovered from the
    // subsegment origin records; splits re-thread themselves through the
    // collinear Segment vertices. When carving ate an original endpoint
    // the surviving pieces stand in for themselves.
    let mut seen: AHashSet<(usize, usize)> = AHashSet::new();
    for (s, data) in mesh.subsegs.iter() {
        if s == NO_SUBSEG {
            continue;
        }
        let [a, b] = data.orig;
        if remap[a] != usize::MAX && remap[b] != usize::MAX {
            let key = (a.min(b), a.max(b));
            if seen.insert(key) {
                pslg.segments.push((remap[a], remap[b]));
                pslg.segment_markers.push(data.marker);
            }
        } else {
            let [pa, pb] = data.vertices;
            pslg.segments.push((remap[pa], remap[pb]));
            pslg.segment_markers.push(data.marker);
        }
    }

    pslg.holes = mesh.holes.clone();
    pslg.regions = mesh.regions.clone();
    (pslg, moved)
}

/// A generator may move only when nothing pins it down: unmarked, not on
/// any constrained segment, and not a boundary vertex. Both spoke sides
/// of every fan triangle are tested because a boundary-arc subsegment can
/// survive on its far flank alone.
fn movable(mesh: &Mesh, v: usize, ring: &mut EdgeRing) -> bool {
    let vertex = mesh.vertex(v);
    if vertex.marker != 0 {
        return false;
    }
    if !matches!(vertex.kind, VertexKind::Input | VertexKind::Free) {
        return false;
    }
    mesh.edges_around(v, ring);
    ring.iter()
        .all(|&e| mesh.tspivot(e).is_none() && mesh.tspivot(e.lprev()).is_none())
}
