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

//! Constrained Delaunay construction.
//!
//! The pipeline runs in a fixed order: validate the input, insert every
//! point, force every segment in, then carve away the exterior, holes and
//! labeled regions. Identical input always yields the identical mesh.

use crate::diagnostics::{MeshLog, NullLog};
use crate::error::Result;
use crate::mesh::Mesh;
use crate::mesh::basic_types::VertexKind;
use crate::pslg::Pslg;

pub(crate) mod constraints;
pub(crate) mod incremental;
pub(crate) mod locate;

/// Knobs for the construction pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildOptions {
    /// Keep every triangle of the convex hull instead of carving the mesh
    /// back to the outermost constrained segments. Hole and region seeds
    /// still apply.
    pub keep_convex_hull: bool,
}

impl Mesh {
    /// Constrained Delaunay triangulation of a planar straight-line graph.
    pub fn triangulate(pslg: &Pslg, options: &BuildOptions) -> Result<Mesh> {
        Self::triangulate_with_log(pslg, options, &mut NullLog)
    }

    /// Same as [`Mesh::triangulate`], reporting progress and warnings to
    /// the given sink.
    pub fn triangulate_with_log(
        pslg: &Pslg,
        options: &BuildOptions,
        log: &mut dyn MeshLog,
    ) -> Result<Mesh> {
        pslg.validate()?;

        let mut mesh = Mesh::with_capacity(pslg.points.len());
        mesh.keep_hull = options.keep_convex_hull;
        mesh.holes = pslg.holes.clone();
        mesh.regions = pslg.regions.clone();

        for (i, &point) in pslg.points.iter().enumerate() {
            mesh.add_vertex(point, pslg.point_marker(i), VertexKind::Input);
        }
        mesh.insert_input_points()?;

        for (i, &(u, w)) in pslg.segments.iter().enumerate() {
            mesh.insert_segment(u, w, pslg.segment_marker(i))?;
        }
        log.debug(format_args!(
            "cdt ready: {} vertices, {} triangles, {} subsegments",
            mesh.live_vertex_count(),
            mesh.triangle_count(),
            mesh.subseg_count()
        ));

        mesh.carve_and_label(log)?;
        mesh.mark_boundary_vertices();

        log.info(format_args!(
            "triangulated {} points into {} triangles",
            pslg.points.len(),
            mesh.triangle_count()
        ));
        Ok(mesh)
    }
}
