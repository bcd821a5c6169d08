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

//! The Voronoi dual of a triangulation, as a doubly connected edge list.
//!
//! Every real triangle contributes one Voronoi vertex (its circumcenter)
//! and every live generator one face. Cells of generators on the mesh
//! boundary are open; each is closed off by a straight chord between its
//! two extreme circumcenters so that every face is a walkable ring, and
//! the chord's twin joins the outer face. A diagram is a value: it copies
//! what it needs out of the mesh and never looks back at it.

use ahash::AHashMap;

use crate::error::{MeshError, Result};
use crate::geometry::{Point2, util};
use crate::mesh::Mesh;
use crate::mesh::core::EdgeRing;
use crate::mesh::handles::Otri;

pub mod lloyd;

/// One directed edge of the diagram. `twin` runs the same edge the other
/// way in the adjoining face; `next` continues the ring of `face`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VorHalfEdge {
    /// Voronoi vertex this edge leaves from.
    pub origin: usize,
    pub twin: usize,
    pub next: usize,
    pub face: usize,
}

/// One face of the diagram: the cell of `generator`, or the outer face
/// when `generator` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VorFace {
    /// Delaunay vertex id whose cell this is; `None` for the outer face.
    pub generator: Option<usize>,
    /// One half-edge of the face's ring. Meaningless for the outer face
    /// of a diagram with no half-edges at all.
    pub half_edge: usize,
    /// False for cells clipped by a chord and for the outer face.
    pub bounded: bool,
}

/// Voronoi diagram of a mesh. Face 0 is always the outer face.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoronoiDiagram {
    /// Circumcenters, one per real triangle of the source mesh.
    pub vertices: Vec<Point2>,
    pub half_edges: Vec<VorHalfEdge>,
    pub faces: Vec<VorFace>,
    face_by_generator: Vec<Option<usize>>,
}

impl VoronoiDiagram {
    /// Face id of the cell belonging to a Delaunay vertex, if that vertex
    /// is a live generator.
    pub fn face_of(&self, generator: usize) -> Option<usize> {
        self.face_by_generator.get(generator).copied().flatten()
    }

    /// Half-edge ids around `face`, in ring order starting from the
    /// face's stored half-edge.
    pub fn cell_walk(&self, face: usize) -> Vec<usize> {
        let mut out = Vec::new();
        if self.half_edges.is_empty() {
            return out;
        }
        let start = self.faces[face].half_edge;
        let mut h = start;
        for _ in 0..self.half_edges.len() {
            out.push(h);
            h = self.half_edges[h].next;
            if h == start {
                break;
            }
        }
        out
    }

    /// The cell polygon of `face`: one point per ring half-edge origin.
    pub fn cell_points(&self, face: usize) -> Vec<Point2> {
        self.cell_walk(face)
            .into_iter()
            .map(|h| self.vertices[self.half_edges[h].origin])
            .collect()
    }
}

/// Builds diagrams from meshes, keeping its scratch arenas between runs so
/// repeated extraction (smoothing iterates) does not churn the allocator.
pub struct VoronoiBuilder {
    /// Triangle slot to Voronoi vertex id.
    center_of: AHashMap<usize, usize>,
    /// Directed Delaunay edge to the half-edge dual to it, until its twin
    /// turns up from the cell on the other side.
    twin_map: AHashMap<(usize, usize), usize>,
    /// Boundary generator to its outer-face half-edge.
    gen_outer: AHashMap<usize, usize>,
    /// Outer-face half-edges with the boundary generator that follows.
    boundary: Vec<(usize, usize)>,
    ring: EdgeRing,
    reals: Vec<Otri>,
}

impl VoronoiBuilder {
    pub fn new() -> Self {
        Self {
            center_of: AHashMap::new(),
            twin_map: AHashMap::new(),
            gen_outer: AHashMap::new(),
            boundary: Vec::new(),
            ring: EdgeRing::new(),
            reals: Vec::new(),
        }
    }

    /// Extract the dual of `mesh`. Generators are visited in vertex id
    /// order, so the same mesh always yields the same diagram.
    pub fn build(&mut self, mesh: &Mesh) -> Result<VoronoiDiagram> {
        self.center_of.clear();
        self.twin_map.clear();
        self.gen_outer.clear();
        self.boundary.clear();

        let mut vertices = Vec::with_capacity(mesh.triangle_count());
        for (t, data) in mesh.real_triangles() {
            let [a, b, c] = data.vertices;
            let center = util::circumcenter(&mesh.point(a), &mesh.point(b), &mesh.point(c))
                .ok_or_else(|| {
                    MeshError::inconsistent(format!("triangle {t} has no finite circumcenter"))
                })?;
            self.center_of.insert(t, vertices.len());
            vertices.push(center);
        }

        let mut half_edges: Vec<VorHalfEdge> = Vec::new();
        let mut faces = vec![VorFace {
            generator: None,
            half_edge: 0,
            bounded: false,
        }];
        let mut face_by_generator = vec![None; mesh.vertex_slots()];

        for v in 0..mesh.vertex_slots() {
            if mesh.vertex(v).is_dead() {
                continue;
            }
            mesh.edges_around(v, &mut self.ring);
            let n = self.ring.len();
            if n == 0 {
                return Err(MeshError::inconsistent(format!(
                    "vertex {v} borders no triangle"
                )));
            }
            // A fan around an uncarved hull vertex is a full cycle with an
            // arbitrary anchor, so the real flanks may wrap around the
            // ring's ends. Count their runs and rotate one contiguous run
            // into fan order; an interior fan has no run boundary at all.
            let full_cycle = mesh.onext(self.ring[n - 1]) == self.ring[0];
            let mut runs = 0usize;
            let mut start = 0usize;
            for i in 0..n {
                if mesh.is_exterior(self.ring[i].tri) {
                    continue;
                }
                let prev_real = if i > 0 {
                    !mesh.is_exterior(self.ring[i - 1].tri)
                } else {
                    full_cycle && !mesh.is_exterior(self.ring[n - 1].tri)
                };
                if !prev_real {
                    runs += 1;
                    start = i;
                }
            }

            self.reals.clear();
            match runs {
                0 => {
                    for &e in self.ring.iter() {
                        if !mesh.is_exterior(e.tri) {
                            self.reals.push(e);
                        }
                    }
                    if self.reals.is_empty() {
                        return Err(MeshError::inconsistent(format!(
                            "vertex {v} borders no real triangle"
                        )));
                    }
                }
                1 => {
                    for d in 0..n {
                        let e = self.ring[(start + d) % n];
                        if mesh.is_exterior(e.tri) {
                            break;
                        }
                        self.reals.push(e);
                    }
                }
                _ => {
                    return Err(MeshError::inconsistent(format!(
                        "voronoi cell of vertex {v} is pinched"
                    )));
                }
            }
            let closed = runs == 0;

            let face = faces.len();
            let k = self.reals.len();
            let base = half_edges.len();

            if closed {
                for i in 0..k {
                    let e = self.reals[i];
                    let id = half_edges.len();
                    let next = if i + 1 == k { base } else { id + 1 };
                    half_edges.push(VorHalfEdge {
                        origin: self.center_of[&e.tri],
                        twin: usize::MAX,
                        next,
                        face,
                    });
                    self.pair(v, mesh.apex(e), id, &mut half_edges);
                }
            } else {
                for i in 0..k - 1 {
                    let e = self.reals[i];
                    let id = half_edges.len();
                    half_edges.push(VorHalfEdge {
                        origin: self.center_of[&e.tri],
                        twin: usize::MAX,
                        next: id + 1,
                        face,
                    });
                    self.pair(v, mesh.apex(e), id, &mut half_edges);
                }

                // Chord closing the open side; its twin walks the outer
                // face once the whole boundary is known.
                let chord = half_edges.len();
                let first_vv = self.center_of[&self.reals[0].tri];
                let last_vv = self.center_of[&self.reals[k - 1].tri];
                half_edges.push(VorHalfEdge {
                    origin: last_vv,
                    twin: chord + 1,
                    next: base,
                    face,
                });
                half_edges.push(VorHalfEdge {
                    origin: first_vv,
                    twin: chord,
                    next: usize::MAX,
                    face: 0,
                });

                // The boundary edge past the fan's last real triangle
                // leads to the generator whose cell follows on the outer
                // contour.
                let next_gen = mesh.apex(self.reals[k - 1]);
                self.gen_outer.insert(v, chord + 1);
                self.boundary.push((chord + 1, next_gen));
            }

            faces.push(VorFace {
                generator: Some(v),
                half_edge: base,
                bounded: closed,
            });
            face_by_generator[v] = Some(face);
        }

        self.chain_outer(&mut half_edges, &mut faces)?;

        if !self.twin_map.is_empty() {
            return Err(MeshError::inconsistent(
                "interior voronoi half-edge never met its twin",
            ));
        }
        debug_assert!(half_edges.iter().all(|h| h.twin != usize::MAX));
        debug_assert!(half_edges.iter().all(|h| h.next != usize::MAX));

        Ok(VoronoiDiagram {
            vertices,
            half_edges,
            faces,
            face_by_generator,
        })
    }

    /// Mate the half-edge dual to the directed Delaunay edge `from -> to`
    /// with its reverse from the neighboring cell, or park it until that
    /// cell is walked.
    fn pair(&mut self, from: usize, to: usize, id: usize, half_edges: &mut [VorHalfEdge]) {
        match self.twin_map.remove(&(to, from)) {
            Some(other) => {
                half_edges[id].twin = other;
                half_edges[other].twin = id;
            }
            None => {
                self.twin_map.insert((from, to), id);
            }
        }
    }

    /// Link the outer-face half-edges head-to-tail around each boundary
    /// contour. Chaining follows generator adjacency along the boundary;
    /// the ids must then agree where consecutive edges meet, which catches
    /// pinched and non-manifold boundaries.
    fn chain_outer(&self, half_edges: &mut [VorHalfEdge], faces: &mut [VorFace]) -> Result<()> {
        for &(id, next_gen) in &self.boundary {
            let Some(&next) = self.gen_outer.get(&next_gen) else {
                return Err(MeshError::inconsistent(format!(
                    "voronoi outer contour breaks at generator {next_gen}"
                )));
            };
            let dest = half_edges[half_edges[id].twin].origin;
            if half_edges[next].origin != dest {
                return Err(MeshError::inconsistent(format!(
                    "voronoi outer contour is pinched at generator {next_gen}"
                )));
            }
            half_edges[id].next = next;
        }
        if let Some(&(id, _)) = self.boundary.first() {
            faces[0].half_edge = id;
        }
        Ok(())
    }
}

impl Default for VoronoiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Mesh {
    /// Voronoi dual of the current triangulation.
    pub fn voronoi(&self) -> Result<VoronoiDiagram> {
        VoronoiBuilder::new().build(self)
    }
}
