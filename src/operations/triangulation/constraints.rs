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

//! Constraint enforcement: force each input segment into the mesh.
//!
//! A segment is recovered leg by leg. A vertex lying exactly on the
//! segment splits it into two legs through that vertex. Within one leg,
//! every triangulation edge crossing the segment is removed by flipping;
//! an edge that cannot flip yet because its quadrilateral is not convex is
//! deferred and retried, which always clears since at least one crossing
//! is flippable at any time. Crossing a constrained edge of an earlier
//! segment is an input error, reported with both offenders.

use std::collections::VecDeque;

use crate::error::{MeshError, Result};
use crate::geometry::Point2;
use crate::kernel::orient2d;
use crate::mesh::Mesh;
use crate::mesh::basic_types::GHOST;
use crate::mesh::core::EdgeRing;
use crate::mesh::handles::{Osub, Otri};

/// Strict proper crossing of open segments a-b and c-d.
fn proper_cross(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> bool {
    let ab_c = orient2d(a, b, c);
    let ab_d = orient2d(a, b, d);
    if !(ab_c.is_positive() && ab_d.is_negative() || ab_c.is_negative() && ab_d.is_positive()) {
        return false;
    }
    let cd_a = orient2d(c, d, a);
    let cd_b = orient2d(c, d, b);
    cd_a.is_positive() && cd_b.is_negative() || cd_a.is_negative() && cd_b.is_positive()
}

/// Lexicographic betweenness for exactly collinear points.
fn collinear_between(a: Point2, mid: Point2, b: Point2) -> bool {
    (a < mid && mid < b) || (b < mid && mid < a)
}

impl Mesh {
    /// Make the segment from `u` to `w` an unbroken chain of constrained
    /// edges, flipping away any free edges in its path.
    pub(crate) fn insert_segment(&mut self, u: usize, w: usize, marker: i32) -> Result<()> {
        let orig = [u, w];
        let mut from = u;
        while from != w {
            let (to, diagonals) = self.next_leg(from, w, orig)?;

            let mut edge = self.find_edge(from, to).ok_or_else(|| {
                MeshError::inconsistent(format!(
                    "edge {from}-{to} missing after constraint recovery"
                ))
            })?;
            if self.is_ghost(edge.tri) {
                edge = self.sym(edge);
            }
            self.attach_subseg(edge, marker, orig);
            for endpoint in [from, to] {
                if self.vertices[endpoint].marker == 0 {
                    self.vertices[endpoint].marker = marker;
                }
            }

            // Repair the Delaunay criterion around the freed corridor now
            // that the recovered edge is pinned down.
            let mut suspects: Vec<Otri> = diagonals
                .into_iter()
                .filter_map(|(a, b)| self.find_edge(a, b))
                .collect();
            self.legalize(&mut suspects);

            from = to;
        }
        Ok(())
    }

    /// Mark the edge under `e` as constrained; both real sides bond to the
    /// subsegment. Re-marking an already constrained edge keeps the first
    /// marker.
    pub(crate) fn attach_subseg(&mut self, e: Otri, marker: i32, orig: [usize; 2]) -> Osub {
        debug_assert!(!self.is_exterior(e.tri));
        let existing = self.tspivot(e);
        if !existing.is_none() {
            return existing;
        }
        let o = self.org(e);
        let d = self.dest(e);
        let s = self.make_subseg(o, d, orig, marker);
        let handle = Osub::new(s, 0);
        self.tsbond(e, handle);
        let m = self.sym(e);
        if !m.is_outer() && !self.is_ghost(m.tri) {
            self.tsbond(m, handle.sym());
        }
        handle
    }

    /// Find the far end of the next leg out of `from` and make the edge to
    /// it exist: either it is already adjacent, or a collinear vertex caps
    /// the leg, or crossings get flipped away. Returns the leg target and
    /// the freed diagonals to re-legalize once the leg is constrained.
    fn next_leg(&mut self, from: usize, goal: usize, orig: [usize; 2]) -> Result<(usize, Vec<(usize, usize)>)> {
        let pf = self.point(from);
        let pg = self.point(goal);

        let mut ring = EdgeRing::new();
        self.edges_around(from, &mut ring);

        let mut entry = None;
        for &e in &ring {
            let x = self.dest(e);
            if x == GHOST {
                continue;
            }
            if x == goal {
                return Ok((goal, Vec::new()));
            }
            let px = self.point(x);
            if orient2d(&pf, &pg, &px).is_zero() && collinear_between(pf, px, pg) {
                return Ok((x, Vec::new()));
            }
            let z = self.apex(e);
            if z == GHOST {
                continue;
            }
            let pz = self.point(z);
            if orient2d(&pf, &px, &pg).is_positive() && orient2d(&pf, &pz, &pg).is_negative() {
                entry = Some(e.lnext());
                break;
            }
        }
        let Some(entry) = entry else {
            return Err(MeshError::inconsistent(format!(
                "no path toward vertex {goal} out of vertex {from}"
            )));
        };

        self.clear_crossings(entry, from, goal, orig)
    }

    /// Walk the corridor of triangles the open leg passes through, then
    /// flip every crossing away. The leg ends at `goal` or at the first
    /// vertex sitting exactly on the segment.
    fn clear_crossings(
        &mut self,
        entry: Otri,
        from: usize,
        goal: usize,
        orig: [usize; 2],
    ) -> Result<(usize, Vec<(usize, usize)>)> {
        let pf = self.point(from);
        let pg = self.point(goal);

        // Gather the crossings; the handle always runs right-to-left
        // across the leg.
        let mut crossed: VecDeque<(usize, usize)> = VecDeque::new();
        let mut target = goal;
        let mut e = entry;
        let cap = self.triangles.slot_bound() + 1;
        for step in 0..=cap {
            if step == cap {
                return Err(MeshError::inconsistent(
                    "constraint corridor failed to close",
                ));
            }
            let seg = self.tspivot(e);
            if !seg.is_none() {
                let ob = self.subsegs[seg.seg].orig;
                return Err(MeshError::SegmentIntersection {
                    segment: (orig[0], orig[1]),
                    obstacle: (ob[0], ob[1]),
                });
            }
            crossed.push_back((self.org(e), self.dest(e)));

            let m = self.sym(e);
            if m.is_outer() || self.is_ghost(m.tri) {
                return Err(MeshError::inconsistent(
                    "constraint corridor ran off the hull",
                ));
            }
            let c = self.apex(m);
            if c == goal {
                break;
            }
            let pc = self.point(c);
            let side = orient2d(&pf, &pg, &pc);
            if side.is_zero() {
                target = c;
                break;
            }
            e = if side.is_positive() { m.lnext() } else { m.lprev() };
        }

        let pt = self.point(target);
        let mut diagonals = Vec::new();
        let mut budget = (crossed.len() + 4) * (crossed.len() + 4) * 8;
        while let Some((a, b)) = crossed.pop_front() {
            if budget == 0 {
                return Err(MeshError::inconsistent(
                    "constraint recovery stalled on a crossing edge",
                ));
            }
            budget -= 1;

            let edge = self.find_edge(a, b).ok_or_else(|| {
                MeshError::inconsistent(format!("crossing edge {a}-{b} vanished mid-recovery"))
            })?;
            let mate = self.sym(edge);
            let c1 = self.apex(edge);
            let c2 = self.apex(mate);
            let p1 = self.point(c1);
            let p2 = self.point(c2);
            let pa = self.point(a);
            let pb = self.point(b);

            // Only a strictly convex quadrilateral may rotate its diagonal.
            let s1 = orient2d(&p1, &p2, &pa);
            let s2 = orient2d(&p1, &p2, &pb);
            let convex =
                s1.is_positive() && s2.is_negative() || s1.is_negative() && s2.is_positive();
            if !convex {
                crossed.push_back((a, b));
                continue;
            }

            self.flip(edge);
            if proper_cross(&p1, &p2, &pf, &pt) {
                crossed.push_back((c1, c2));
            } else {
                diagonals.push((c1, c2));
            }
        }

        Ok((target, diagonals))
    }
}
