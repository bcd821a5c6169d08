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

//! Incremental vertex insertion with flip-based Delaunay repair.
//!
//! Every path through here preserves the structural invariants
//! [`Mesh::validate`] checks: a vertex lands strictly inside a triangle,
//! in the interior of an edge, or beyond the hull, and each case performs
//! its local surgery before a shared legalization pass flips the mesh back
//! to the Delaunay criterion. Cocircular configurations are left alone, so
//! legalization never oscillates between equally legal diagonals.

use crate::error::{MeshError, Result};
use crate::kernel::{Sign, incircle, orient2d};
use crate::mesh::Mesh;
use crate::mesh::basic_types::GHOST;
use crate::mesh::handles::{Osub, Otri};
use crate::operations::triangulation::locate::Location;

/// Outcome of a guided insertion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Insertion {
    Done,
    /// The point coincides with this existing vertex; nothing changed.
    Duplicate(usize),
    /// A constrained edge shields the target point; nothing changed.
    Blocked(Otri),
}

impl Mesh {
    /// Seed the triangulation and insert every input vertex in order.
    pub(crate) fn insert_input_points(&mut self) -> Result<()> {
        let n = self.vertices.len();
        if n < 3 {
            return Err(MeshError::degenerate(
                "at least three input points are required",
            ));
        }
        if self.vertices[1].point == self.vertices[0].point {
            return Err(MeshError::DuplicateVertex {
                index: 1,
                existing: 0,
            });
        }

        // First vertex that breaks the starting collinear run closes the
        // seed triangle; the run itself is inserted right after.
        let p0 = self.vertices[0].point;
        let p1 = self.vertices[1].point;
        let mut third = None;
        for i in 2..n {
            match orient2d(&p0, &p1, &self.vertices[i].point) {
                Sign::Zero => continue,
                sign => {
                    third = Some((i, sign));
                    break;
                }
            }
        }
        let Some((i2, sign)) = third else {
            return Err(MeshError::degenerate("input points are all collinear"));
        };

        if sign == Sign::Positive {
            self.bootstrap_triangle(0, 1, i2);
        } else {
            self.bootstrap_triangle(0, i2, 1);
        }

        for v in (2..i2).chain(i2 + 1..n) {
            self.insert_vertex(v)?;
        }
        Ok(())
    }

    /// First real triangle plus its three-ghost ring around the hull.
    pub(crate) fn bootstrap_triangle(&mut self, a: usize, b: usize, c: usize) {
        debug_assert_eq!(
            orient2d(
                &self.vertices[a].point,
                &self.vertices[b].point,
                &self.vertices[c].point
            ),
            Sign::Positive
        );

        let t = self.make_triangle(a, b, c);
        let g_ab = self.make_triangle(b, a, GHOST);
        let g_ca = self.make_triangle(a, c, GHOST);
        let g_bc = self.make_triangle(c, b, GHOST);

        self.bond(Otri::new(t, 2), Otri::new(g_ab, 2));
        self.bond(Otri::new(t, 0), Otri::new(g_bc, 2));
        self.bond(Otri::new(t, 1), Otri::new(g_ca, 2));

        // Ghosts chain around the hull through their shared apex.
        self.bond(Otri::new(g_ab, 0), Otri::new(g_ca, 1));
        self.bond(Otri::new(g_ca, 0), Otri::new(g_bc, 1));
        self.bond(Otri::new(g_bc, 0), Otri::new(g_ab, 1));

        for slot in [t, g_ab, g_ca, g_bc] {
            self.note_corners(slot);
        }
        self.recent = Otri::new(t, 0);
    }

    /// Insert vertex `v`; a coincident existing vertex is an input error.
    pub(crate) fn insert_vertex(&mut self, v: usize) -> Result<()> {
        match self.insert_vertex_guided(v, None, false)? {
            Insertion::Done => Ok(()),
            Insertion::Duplicate(existing) => Err(MeshError::DuplicateVertex { index: v, existing }),
            Insertion::Blocked(_) => Err(MeshError::inconsistent(
                "unguarded insertion reported a blocking constraint",
            )),
        }
    }

    /// Insert vertex `v`, optionally walking from a known triangle and
    /// refusing to cross constrained edges. Duplicates and blocked walks
    /// are reported, not raised, so refinement can react to both.
    pub(crate) fn insert_vertex_guided(
        &mut self,
        v: usize,
        start: Option<Otri>,
        barrier: bool,
    ) -> Result<Insertion> {
        let p = self.point(v);
        let location = match start {
            Some(s) => self.locate_from(s, p, barrier)?,
            None => self.locate(p)?,
        };

        let mut suspects = Vec::new();
        match location {
            Location::OnVertex(u) => return Ok(Insertion::Duplicate(u)),
            Location::Blocked(e) => return Ok(Insertion::Blocked(e)),
            Location::OnEdge(e) => {
                if barrier && !self.tspivot(e).is_none() {
                    return Ok(Insertion::Blocked(e));
                }
                self.split_edge(e, v, &mut suspects);
            }
            Location::InTriangle(e) => self.split_triangle(e, v, &mut suspects),
            Location::OutsideHull(g) => {
                if barrier {
                    return Err(MeshError::inconsistent(
                        "guarded insertion escaped the mesh boundary",
                    ));
                }
                self.grow_hull(g, v, &mut suspects);
            }
        }

        self.legalize(&mut suspects);
        Ok(Insertion::Done)
    }

    /// Replace the triangle under `e` by three triangles meeting at `v`,
    /// which lies strictly inside it.
    fn split_triangle(&mut self, e: Otri, v: usize, suspects: &mut Vec<Otri>) {
        debug_assert!(!self.is_exterior(e.tri));
        let t = e.tri;
        let o = self.org(e);
        let d = self.dest(e);
        let x = self.apex(e);
        let region = self.triangles[t].region;
        let max_area = self.triangles[t].max_area;

        let n1 = self.sym(e.lnext());
        let s1 = self.tspivot(e.lnext());
        let n2 = self.sym(e.lprev());
        let s2 = self.tspivot(e.lprev());

        // The kept slot keeps edge o->d and its bonds; the apex becomes v.
        self.triangles[t].vertices[e.orient as usize] = v;
        let t1 = self.make_triangle(d, x, v);
        let t2 = self.make_triangle(x, o, v);
        for slot in [t1, t2] {
            self.triangles[slot].region = region;
            self.triangles[slot].max_area = max_area;
        }

        self.bond(e.lnext(), Otri::new(t1, 1));
        self.bond(e.lprev(), Otri::new(t2, 0));
        self.bond(Otri::new(t1, 0), Otri::new(t2, 1));
        self.tsdissolve(e.lnext());
        self.tsdissolve(e.lprev());

        self.rebond(Otri::new(t1, 2), n1);
        if !s1.is_none() {
            self.tsbond(Otri::new(t1, 2), s1);
        }
        self.rebond(Otri::new(t2, 2), n2);
        if !s2.is_none() {
            self.tsbond(Otri::new(t2, 2), s2);
        }

        self.note_corners(t);
        self.note_corners(t1);
        self.note_corners(t2);
        self.recent = e;

        suspects.push(e);
        suspects.push(Otri::new(t1, 2));
        suspects.push(Otri::new(t2, 2));
    }

    /// Split the edge under `e` at `v`, which lies strictly inside it. Both
    /// adjoining triangles split in two; a ghost on the far side splits into
    /// two ghosts, and a subsegment on the edge splits with it.
    pub(crate) fn split_edge(&mut self, e: Otri, v: usize, suspects: &mut Vec<Otri>) {
        debug_assert!(!self.is_exterior(e.tri));
        let t = e.tri;
        let o = self.org(e);
        let d = self.dest(e);
        let x = self.apex(e);
        let region = self.triangles[t].region;
        let max_area = self.triangles[t].max_area;

        let s = self.tspivot(e);
        let m = self.sym(e);
        let n1 = self.sym(e.lnext());
        let s1 = self.tspivot(e.lnext());

        // Left side: the kept slot shrinks to the o->v half.
        self.triangles[t].vertices[(e.orient as usize + 2) % 3] = v;
        let tn = self.make_triangle(v, d, x);
        self.triangles[tn].region = region;
        self.triangles[tn].max_area = max_area;

        self.bond(Otri::new(tn, 1), e.lnext());
        self.tsdissolve(e.lnext());
        self.rebond(Otri::new(tn, 0), n1);
        if !s1.is_none() {
            self.tsbond(Otri::new(tn, 0), s1);
        }

        suspects.push(Otri::new(tn, 0));
        suspects.push(e.lprev());

        let mut right_near: Option<(Otri, Otri)> = None;
        if m.is_outer() {
            self.dissolve(e);
            self.dissolve(Otri::new(tn, 2));
        } else if self.is_ghost(m.tri) {
            // Hull edge: the ghost over it splits into two ghosts.
            debug_assert_eq!(m.orient, 2);
            let g = m.tri;
            let ring_next = self.sym(Otri::new(g, 0));
            self.triangles[g].vertices[1] = v;
            let gn = self.make_triangle(v, o, GHOST);
            self.bond(Otri::new(g, 2), Otri::new(tn, 2));
            self.bond(Otri::new(gn, 1), Otri::new(g, 0));
            self.bond(Otri::new(gn, 0), ring_next);
            self.bond(Otri::new(gn, 2), e);
            self.note_corners(g);
            self.note_corners(gn);
        } else {
            // Right side mirrors the left.
            let u = m.tri;
            let y = self.apex(m);
            let m_region = self.triangles[u].region;
            let m_max_area = self.triangles[u].max_area;
            let mn1 = self.sym(m.lnext());
            let ms1 = self.tspivot(m.lnext());

            self.triangles[u].vertices[(m.orient as usize + 2) % 3] = v;
            let un = self.make_triangle(v, o, y);
            self.triangles[un].region = m_region;
            self.triangles[un].max_area = m_max_area;

            self.bond(Otri::new(un, 1), m.lnext());
            self.tsdissolve(m.lnext());
            self.rebond(Otri::new(un, 0), mn1);
            if !ms1.is_none() {
                self.tsbond(Otri::new(un, 0), ms1);
            }

            self.bond(m, Otri::new(tn, 2));
            self.bond(Otri::new(un, 2), e);
            self.note_corners(u);
            self.note_corners(un);

            suspects.push(Otri::new(un, 0));
            suspects.push(m.lprev());
            right_near = Some((m, Otri::new(un, 2)));
        }

        if !s.is_none() {
            self.split_subseg(s, v, e, Otri::new(tn, 2), right_near);
        }

        self.note_corners(t);
        self.note_corners(tn);
        self.recent = e;
    }

    /// Split subsegment `s` at `v` alongside its edge. `left_near` is the
    /// o->v edge, `left_far` the v->d edge; `right` carries the mirrored
    /// pair when the far side is a real triangle.
    fn split_subseg(
        &mut self,
        s: Osub,
        v: usize,
        left_near: Otri,
        left_far: Otri,
        right: Option<(Otri, Otri)>,
    ) {
        let d_index = (s.orient ^ 1) as usize;
        let d = self.subsegs[s.seg].vertices[d_index];
        let orig = self.subsegs[s.seg].orig;
        let marker = self.subsegs[s.seg].marker;
        self.subsegs[s.seg].vertices[d_index] = v;

        let s2 = self.make_subseg(v, d, orig, marker);
        let s2_near = Osub::new(s2, 0);

        self.tsbond(left_near, s);
        self.tsbond(left_far, s2_near);
        match right {
            Some((right_near, right_far)) => {
                self.tsbond(right_near, s2_near.sym());
                self.tsbond(right_far, s.sym());
            }
            None => {
                self.subsegs[s.seg].triangles[(s.orient ^ 1) as usize] = Otri::OUTER;
            }
        }

        if self.vertices[v].marker == 0 {
            self.vertices[v].marker = marker;
        }
    }

    /// Connect `v`, which lies strictly beyond the hull, to every hull edge
    /// it can see. Visible ghosts become real triangles and two fresh ghosts
    /// close the ring over the new hull edges.
    fn grow_hull(&mut self, ghost: Otri, v: usize, suspects: &mut Vec<Otri>) {
        debug_assert!(self.is_ghost(ghost.tri));
        debug_assert_eq!(ghost.orient, 2);
        let p = self.point(v);

        let visible = |mesh: &Mesh, g: usize| {
            let a = mesh.vertices[mesh.triangles[g].vertices[0]].point;
            let b = mesh.vertices[mesh.triangles[g].vertices[1]].point;
            orient2d(&a, &b, &p).is_positive()
        };
        debug_assert!(visible(self, ghost.tri));

        // The visible stretch of the ring is contiguous; extend both ways.
        let cap = self.triangles.len();
        let mut first = ghost.tri;
        for _ in 0..cap {
            let prev = self.sym(Otri::new(first, 1)).tri;
            if !visible(self, prev) {
                break;
            }
            first = prev;
        }
        let mut chain = vec![first];
        for _ in 0..cap {
            let next = self.sym(Otri::new(*chain.last().unwrap(), 0)).tri;
            if !visible(self, next) {
                break;
            }
            chain.push(next);
        }

        let ring_prev = self.sym(Otri::new(first, 1));
        let ring_next = self.sym(Otri::new(*chain.last().unwrap(), 0));

        for &g in &chain {
            self.triangles[g].vertices[2] = v;
            // A constrained hull edge keeps its subsegment on both sides.
            let interior = self.sym(Otri::new(g, 2));
            let seg = self.tspivot(interior);
            if !seg.is_none() {
                self.tsbond(Otri::new(g, 2), seg.sym());
            }
            suspects.push(Otri::new(g, 2));
        }
        for pair in chain.windows(2) {
            self.bond(Otri::new(pair[0], 0), Otri::new(pair[1], 1));
        }

        let first_tri = chain[0];
        let last_tri = *chain.last().unwrap();
        let a_first = self.triangles[first_tri].vertices[0];
        let b_last = self.triangles[last_tri].vertices[1];

        let g1 = self.make_triangle(a_first, v, GHOST);
        let g2 = self.make_triangle(v, b_last, GHOST);
        self.bond(Otri::new(g1, 2), Otri::new(first_tri, 1));
        self.bond(Otri::new(g2, 2), Otri::new(last_tri, 0));
        self.bond(ring_prev, Otri::new(g1, 1));
        self.bond(Otri::new(g1, 0), Otri::new(g2, 1));
        self.bond(Otri::new(g2, 0), ring_next);

        for &g in &chain {
            self.note_corners(g);
        }
        self.note_corners(g1);
        self.note_corners(g2);
        self.recent = Otri::new(first_tri, 2);
    }

    /// Rotate the diagonal of the quadrilateral around `e`. Both sides must
    /// be real and the edge unconstrained; the caller guarantees the quad is
    /// strictly convex, which every incircle-driven flip is.
    pub(crate) fn flip(&mut self, e: Otri) {
        let m = self.sym(e);
        debug_assert!(!self.is_exterior(e.tri));
        debug_assert!(!self.is_exterior(m.tri));
        debug_assert!(self.tspivot(e).is_none());

        let o = self.org(e);
        let d = self.dest(e);
        let a = self.apex(e);
        let b = self.apex(m);

        let n_da = self.sym(e.lnext());
        let s_da = self.tspivot(e.lnext());
        let n_ao = self.sym(e.lprev());
        let s_ao = self.tspivot(e.lprev());
        let n_ob = self.sym(m.lnext());
        let s_ob = self.tspivot(m.lnext());
        let n_bd = self.sym(m.lprev());
        let s_bd = self.tspivot(m.lprev());

        let t = e.tri;
        let u = m.tri;
        self.triangles[t].vertices = [o, b, a];
        self.triangles[u].vertices = [d, a, b];
        self.triangles[t].subsegs = [Osub::NONE; 3];
        self.triangles[u].subsegs = [Osub::NONE; 3];

        self.bond(Otri::new(t, 0), Otri::new(u, 0));
        self.rebond(Otri::new(t, 1), n_ao);
        self.rebond(Otri::new(t, 2), n_ob);
        self.rebond(Otri::new(u, 1), n_bd);
        self.rebond(Otri::new(u, 2), n_da);

        if !s_ao.is_none() {
            self.tsbond(Otri::new(t, 1), s_ao);
        }
        if !s_ob.is_none() {
            self.tsbond(Otri::new(t, 2), s_ob);
        }
        if !s_bd.is_none() {
            self.tsbond(Otri::new(u, 1), s_bd);
        }
        if !s_da.is_none() {
            self.tsbond(Otri::new(u, 2), s_da);
        }

        self.note_corners(t);
        self.note_corners(u);
    }

    /// Flip until every suspect edge satisfies the incircle criterion.
    /// Constrained and hull edges are immovable; cocircular quads count as
    /// legal. Each flip re-suspects the four surrounding edges, so the pass
    /// is safe to seed with any edge set, not just a fresh vertex star.
    pub(crate) fn legalize(&mut self, suspects: &mut Vec<Otri>) {
        let mut dbg_flips: u64 = 0;
        while let Some(e) = suspects.pop() {
            dbg_flips += 1;
            if dbg_flips % 1_000_000 == 0 {
                eprintln!("[dbg] legalize pops={}", dbg_flips);
            }
            if !self.triangles.contains(e.tri) || self.is_exterior(e.tri) {
                continue;
            }
            let m = self.sym(e);
            if m.is_outer() || self.is_ghost(m.tri) {
                continue;
            }
            if !self.tspivot(e).is_none() {
                continue;
            }

            let o = self.point(self.org(e));
            let d = self.point(self.dest(e));
            let a = self.point(self.apex(e));
            let b = self.point(self.apex(m));
            if incircle(&o, &d, &a, &b) != Sign::Positive {
                continue;
            }

            self.flip(e);
            suspects.push(Otri::new(e.tri, 1));
            suspects.push(Otri::new(e.tri, 2));
            suspects.push(Otri::new(m.tri, 1));
            suspects.push(Otri::new(m.tri, 2));
        }
    }
}
