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

//! Flat caller-facing view of a finished mesh.
//!
//! Arena slots and dead vertices are implementation detail; [`Mesh::to_raw`]
//! compacts everything into dense arrays a renderer or physics layer can
//! index directly.

use crate::geometry::Point2;
use crate::mesh::core::Mesh;
use crate::mesh::handles::Otri;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawTriangle {
    /// Corner indices into [`RawMesh::points`], counter-clockwise.
    pub vertices: [usize; 3],
    /// Triangle across the edge opposite each corner; `None` on the mesh
    /// boundary.
    pub neighbors: [Option<usize>; 3],
    /// Boundary marker of the edge opposite each corner: the constrained
    /// segment's marker, 1 on unconstrained boundary edges, 0 elsewhere.
    pub markers: [i32; 3],
    pub region: i32,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawMesh {
    pub points: Vec<Point2>,
    pub point_markers: Vec<i32>,
    pub triangles: Vec<RawTriangle>,
}

impl RawMesh {
    /// Corner coordinates of a triangle, counter-clockwise.
    pub fn corners(&self, t: usize) -> [Point2; 3] {
        let [a, b, c] = self.triangles[t].vertices;
        [self.points[a], self.points[b], self.points[c]]
    }
}

impl Mesh {
    /// Compact the live mesh into dense output arrays. Dead vertices and
    /// recycled arena slots disappear; ghosts become `None` neighbors.
    pub fn to_raw(&self) -> RawMesh {
        // Dense renumbering of live vertices, in id order.
        let mut vertex_index = vec![usize::MAX; self.vertices.len()];
        let mut points = Vec::with_capacity(self.vertices.len());
        let mut point_markers = Vec::with_capacity(self.vertices.len());
        for (v, vertex) in self.vertices.iter().enumerate() {
            if vertex.is_dead() {
                continue;
            }
            vertex_index[v] = points.len();
            points.push(vertex.point);
            point_markers.push(vertex.marker);
        }

        let mut triangle_index = vec![usize::MAX; self.triangles.slot_bound()];
        for (output, (t, _)) in self.real_triangles().enumerate() {
            triangle_index[t] = output;
        }

        let mut triangles = Vec::with_capacity(self.triangle_count());
        for (t, data) in self.real_triangles() {
            let vertices = data.vertices.map(|v| vertex_index[v]);

            let mut neighbors = [None; 3];
            let mut markers = [0i32; 3];
            for orient in 0..3u8 {
                let e = Otri::new(t, orient);
                let mate = self.sym(e);
                let exterior = self.is_exterior(mate.tri);
                if !exterior {
                    neighbors[orient as usize] = Some(triangle_index[mate.tri]);
                }

                let s = self.tspivot(e);
                markers[orient as usize] = if !s.is_none() {
                    self.subsegs[s.seg].marker
                } else if exterior {
                    1
                } else {
                    0
                };
            }

            triangles.push(RawTriangle {
                vertices,
                neighbors,
                markers,
                region: data.region,
            });
        }

        RawMesh {
            points,
            point_markers,
            triangles,
        }
    }
}
