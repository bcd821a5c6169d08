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

//! The mesh container and its topological primitives.
//!
//! Higher-level algorithms (point location, insertion, constraint
//! enforcement, carving, refinement) are `impl Mesh` blocks in
//! [`crate::operations`]; this module owns the arenas and the low-level
//! moves whose invariants everything else leans on:
//!
//! * corners are counter-clockwise and `neighbors[i]` sits across the edge
//!   opposite corner `i`;
//! * `sym(sym(e)) == e` for every bond between two live triangles;
//! * the exterior past the convex hull is tiled by ghost triangles sharing
//!   the [`GHOST`] apex, while links severed by carving point one-way at the
//!   [`OUTER`](crate::mesh::handles::OUTER) sentinel.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use smallvec::SmallVec;

use crate::error::{MeshError, Result};
use crate::geometry::{Point2, util};
use crate::kernel::{Sign, orient2d};
use crate::mesh::basic_types::{GHOST, SubSegData, TriangleData, Vertex, VertexKind};
use crate::mesh::handles::{OUTER, Osub, Otri};
use crate::mesh::pool::Pool;
use crate::pslg::Region;

/// Fixed walk seed so identical input always produces an identical mesh.
const WALK_SEED: u64 = 0x5eed_2d71;

/// Ring walks collect on the stack up to this many entries before spilling.
pub(crate) type EdgeRing = SmallVec<[Otri; 16]>;

#[derive(Debug, Clone)]
pub struct Mesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) triangles: Pool<TriangleData>,
    pub(crate) subsegs: Pool<SubSegData>,
    /// Last triangle touched by location; the next walk starts here.
    pub(crate) recent: Otri,
    pub(crate) rng: StdRng,
    /// Hole and region seeds retained from construction so smoothing can
    /// rebuild the mesh from its own state.
    pub(crate) holes: Vec<Point2>,
    pub(crate) regions: Vec<Region>,
    /// Whether construction kept the full convex hull instead of carving
    /// back to the outermost constrained segments.
    pub(crate) keep_hull: bool,
    pub(crate) steiner_count: usize,
}

impl Mesh {
    /// Empty mesh with both arena sentinels in slot 0.
    pub(crate) fn with_capacity(vertices: usize) -> Self {
        let mut triangles = Pool::with_capacity(2 * vertices + 8);
        let outer = triangles.insert(TriangleData::new(GHOST, GHOST, GHOST));
        debug_assert_eq!(outer, OUTER);

        let mut subsegs = Pool::new();
        let none = subsegs.insert(SubSegData::new(GHOST, GHOST, [GHOST; 2], 0));
        debug_assert_eq!(none, crate::mesh::handles::NO_SUBSEG);

        Self {
            vertices: Vec::with_capacity(vertices),
            triangles,
            subsegs,
            recent: Otri::OUTER,
            rng: StdRng::seed_from_u64(WALK_SEED),
            holes: Vec::new(),
            regions: Vec::new(),
            keep_hull: false,
            steiner_count: 0,
        }
    }

    // ---- vertices ----------------------------------------------------

    pub(crate) fn add_vertex(&mut self, point: Point2, marker: i32, kind: VertexKind) -> usize {
        self.vertices.push(Vertex::new(point, marker, kind));
        self.vertices.len() - 1
    }

    pub fn vertex(&self, v: usize) -> &Vertex {
        &self.vertices[v]
    }

    pub fn point(&self, v: usize) -> Point2 {
        self.vertices[v].point
    }

    /// Total vertex slots, dead included; slot index is vertex id.
    pub fn vertex_slots(&self) -> usize {
        self.vertices.len()
    }

    pub fn live_vertex_count(&self) -> usize {
        self.vertices.iter().filter(|v| !v.is_dead()).count()
    }

    pub fn steiner_points(&self) -> usize {
        self.steiner_count
    }

    // ---- corners of an oriented edge ---------------------------------

    pub(crate) fn org(&self, e: Otri) -> usize {
        self.triangles[e.tri].vertices[(e.orient as usize + 1) % 3]
    }

    pub(crate) fn dest(&self, e: Otri) -> usize {
        self.triangles[e.tri].vertices[(e.orient as usize + 2) % 3]
    }

    pub(crate) fn apex(&self, e: Otri) -> usize {
        self.triangles[e.tri].vertices[e.orient as usize]
    }

    // ---- triangle navigation -----------------------------------------

    /// Mated edge in the adjoining triangle. `sym(sym(e)) == e` whenever
    /// the bond is two-way; edges cut loose by carving return
    /// [`Otri::OUTER`].
    pub(crate) fn sym(&self, e: Otri) -> Otri {
        self.triangles[e.tri].neighbors[e.orient as usize]
    }

    /// Next edge counter-clockwise around this edge's origin.
    pub(crate) fn onext(&self, e: Otri) -> Otri {
        self.sym(e.lprev())
    }

    /// Next edge clockwise around this edge's origin.
    pub(crate) fn oprev(&self, e: Otri) -> Otri {
        self.sym(e).lnext()
    }

    pub(crate) fn is_ghost(&self, t: usize) -> bool {
        t != OUTER && self.triangles[t].is_ghost()
    }

    /// Outer sentinel or a ghost triangle: nothing real lives there.
    pub(crate) fn is_exterior(&self, t: usize) -> bool {
        t == OUTER || self.triangles[t].is_ghost()
    }

    // ---- structural edits --------------------------------------------

    pub(crate) fn make_triangle(&mut self, a: usize, b: usize, c: usize) -> usize {
        self.triangles.insert(TriangleData::new(a, b, c))
    }

    pub(crate) fn kill_triangle(&mut self, t: usize) {
        debug_assert_ne!(t, OUTER);
        self.triangles.remove(t);
    }

    pub(crate) fn make_subseg(
        &mut self,
        a: usize,
        b: usize,
        orig: [usize; 2],
        marker: i32,
    ) -> usize {
        self.subsegs.insert(SubSegData::new(a, b, orig, marker))
    }

    pub(crate) fn kill_subseg(&mut self, s: usize) {
        debug_assert_ne!(s, crate::mesh::handles::NO_SUBSEG);
        self.subsegs.remove(s);
    }

    /// Two-way bond between a pair of mated edges.
    pub(crate) fn bond(&mut self, a: Otri, b: Otri) {
        debug_assert_ne!(a.tri, OUTER);
        debug_assert_ne!(b.tri, OUTER);
        self.triangles[a.tri].neighbors[a.orient as usize] = b;
        self.triangles[b.tri].neighbors[b.orient as usize] = a;
    }

    /// One-way cut: the edge now faces outer space. The sentinel is never
    /// updated, so this link is deliberately asymmetric.
    pub(crate) fn dissolve(&mut self, e: Otri) {
        self.triangles[e.tri].neighbors[e.orient as usize] = Otri::OUTER;
    }

    /// Re-point an edge at a mate another operation recorded earlier, or cut
    /// it loose when that side was already carved away.
    pub(crate) fn rebond(&mut self, e: Otri, mate: Otri) {
        if mate.is_outer() {
            self.dissolve(e);
        } else {
            self.bond(e, mate);
        }
    }

    // ---- triangle <-> subsegment bonds -------------------------------

    pub(crate) fn tspivot(&self, e: Otri) -> Osub {
        self.triangles[e.tri].subsegs[e.orient as usize]
    }

    /// Bond a triangle edge to a subsegment, oriented so the subsegment's
    /// origin matches the edge's origin.
    pub(crate) fn tsbond(&mut self, e: Otri, s: Osub) {
        debug_assert_eq!(self.org(e), self.sorg(s));
        debug_assert_eq!(self.dest(e), self.sdest(s));
        self.triangles[e.tri].subsegs[e.orient as usize] = s;
        self.subsegs[s.seg].triangles[s.orient as usize] = e;
    }

    pub(crate) fn tsdissolve(&mut self, e: Otri) {
        self.triangles[e.tri].subsegs[e.orient as usize] = Osub::NONE;
    }

    /// Triangle edge bonded on this side of the subsegment.
    pub(crate) fn stpivot(&self, s: Osub) -> Otri {
        self.subsegs[s.seg].triangles[s.orient as usize]
    }

    pub(crate) fn sorg(&self, s: Osub) -> usize {
        self.subsegs[s.seg].vertices[s.orient as usize]
    }

    pub(crate) fn sdest(&self, s: Osub) -> usize {
        self.subsegs[s.seg].vertices[(s.orient ^ 1) as usize]
    }

    // ---- incidence maintenance ---------------------------------------

    /// Record `t` as the incident triangle of each of its real corners.
    pub(crate) fn note_corners(&mut self, t: usize) {
        for i in 0..3 {
            let v = self.triangles[t].vertices[i];
            if v != GHOST {
                self.vertices[v].tri = t;
            }
        }
    }

    /// Oriented edge of the vertex's incident triangle whose origin is `v`.
    pub(crate) fn edge_from(&self, v: usize) -> Option<Otri> {
        let t = self.vertices[v].tri;
        if t == OUTER || !self.triangles.contains(t) {
            return None;
        }
        let corner = self.triangles[t].vertices.iter().position(|&w| w == v)?;
        Some(Otri::new(t, ((corner + 2) % 3) as u8))
    }

    /// All oriented edges leaving `v`, counter-clockwise, ghosts included.
    /// At a carved boundary the fan stops at the sentinel on both sides.
    pub(crate) fn edges_around(&self, v: usize, out: &mut EdgeRing) {
        out.clear();
        let Some(start) = self.edge_from(v) else {
            return;
        };

        // Rewind clockwise to the fan's boundary, if any.
        let cap = self.triangles.slot_bound() + 1;
        let mut first = start;
        for _ in 0..cap {
            let prev = self.oprev(first);
            if prev.is_outer() || prev == start {
                break;
            }
            first = prev;
        }

        // Sweep counter-clockwise across the whole fan.
        let mut cur = first;
        for _ in 0..cap {
            out.push(cur);
            let next = self.onext(cur);
            if next.is_outer() || next == first {
                break;
            }
            cur = next;
        }
    }

    /// Directed edge from `a` to `b` if one exists in the current mesh.
    pub(crate) fn find_edge(&self, a: usize, b: usize) -> Option<Otri> {
        let mut ring = EdgeRing::new();
        self.edges_around(a, &mut ring);
        ring.into_iter().find(|&e| self.dest(e) == b)
    }

    pub(crate) fn random_below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        self.rng.random_range(0..bound)
    }

    // ---- iteration and statistics ------------------------------------

    /// Live non-ghost triangles with their slot indices, in index order.
    pub fn real_triangles(&self) -> impl Iterator<Item = (usize, &TriangleData)> {
        self.triangles
            .iter()
            .filter(|&(t, data)| t != OUTER && !data.is_ghost())
    }

    pub fn triangle_count(&self) -> usize {
        self.real_triangles().count()
    }

    pub fn subseg_count(&self) -> usize {
        // Slot 0 is the sentinel.
        self.subsegs.len() - 1
    }

    /// Smallest interior angle over all real triangles, in degrees.
    pub fn min_angle(&self) -> f64 {
        let mut min = 180.0f64;
        for (_, data) in self.real_triangles() {
            let [a, b, c] = data.vertices;
            let angle = util::min_angle_deg(
                &self.vertices[a].point,
                &self.vertices[b].point,
                &self.vertices[c].point,
            );
            min = min.min(angle);
        }
        min
    }

    /// Sum of the areas of all real triangles.
    pub fn total_area(&self) -> f64 {
        self.real_triangles()
            .map(|(_, data)| {
                let [a, b, c] = data.vertices;
                util::triangle_area(
                    &self.vertices[a].point,
                    &self.vertices[b].point,
                    &self.vertices[c].point,
                )
            })
            .sum()
    }

    // ---- integrity ----------------------------------------------------

    /// Full structural audit. Cheap enough for tests and debug builds;
    /// algorithms rely on these invariants instead of re-checking them.
    pub fn validate(&self) -> Result<()> {
        for (t, data) in self.triangles.iter() {
            if t == OUTER {
                continue;
            }

            for (i, &v) in data.vertices.iter().enumerate() {
                if v == GHOST {
                    if i != 2 {
                        return Err(MeshError::inconsistent(format!(
                            "triangle {t} holds the ghost vertex in corner {i}"
                        )));
                    }
                    continue;
                }
                if v >= self.vertices.len() || self.vertices[v].is_dead() {
                    return Err(MeshError::inconsistent(format!(
                        "triangle {t} references dead or missing vertex {v}"
                    )));
                }
            }

            for orient in 0..3u8 {
                let e = Otri::new(t, orient);
                let mate = self.sym(e);
                if mate.is_outer() {
                    continue;
                }
                if !self.triangles.contains(mate.tri) {
                    return Err(MeshError::inconsistent(format!(
                        "triangle {t} edge {orient} points at vacant slot {}",
                        mate.tri
                    )));
                }
                if self.sym(mate) != e {
                    return Err(MeshError::inconsistent(format!(
                        "asymmetric bond between triangle {t} edge {orient} and triangle {} edge {}",
                        mate.tri, mate.orient
                    )));
                }
                if self.org(e) != self.dest(mate) || self.dest(e) != self.org(mate) {
                    return Err(MeshError::inconsistent(format!(
                        "mated edges disagree on endpoints at triangle {t} edge {orient}"
                    )));
                }

                let s = self.tspivot(e);
                if !s.is_none() {
                    if !self.subsegs.contains(s.seg) {
                        return Err(MeshError::inconsistent(format!(
                            "triangle {t} edge {orient} bonded to vacant subsegment {}",
                            s.seg
                        )));
                    }
                    if self.sorg(s) != self.org(e) || self.sdest(s) != self.dest(e) {
                        return Err(MeshError::inconsistent(format!(
                            "subsegment {} misaligned with triangle {t} edge {orient}",
                            s.seg
                        )));
                    }
                }
            }

            if !data.is_ghost() {
                let [a, b, c] = data.vertices;
                let sign = orient2d(
                    &self.vertices[a].point,
                    &self.vertices[b].point,
                    &self.vertices[c].point,
                );
                if sign != Sign::Positive {
                    return Err(MeshError::inconsistent(format!(
                        "triangle {t} is not counter-clockwise"
                    )));
                }
            }

            if data.infected {
                return Err(MeshError::inconsistent(format!(
                    "triangle {t} left infected outside a flood"
                )));
            }
        }

        for (v, vertex) in self.vertices.iter().enumerate() {
            if vertex.is_dead() {
                continue;
            }
            let t = vertex.tri;
            if t == OUTER || !self.triangles.contains(t) {
                return Err(MeshError::inconsistent(format!(
                    "vertex {v} has no incident triangle"
                )));
            }
            if !self.triangles[t].vertices.contains(&v) {
                return Err(MeshError::inconsistent(format!(
                    "vertex {v} points at triangle {t} which does not contain it"
                )));
            }
        }

        Ok(())
    }
}
