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

//! Ruppert-style quality refinement.
//!
//! Encroached subsegments always split before bad triangles, and a
//! circumcenter whose insertion would have to cross or land on a
//! constrained edge is withheld in favor of splitting that edge. Between
//! the two rules, Steiner points go onto constrained boundaries exactly
//! when needed and the interior fills with well-shaped triangles.
//! Exhausting the Steiner ceiling is a reported outcome, not an error:
//! the mesh stays valid and fully constrained at every step.

mod queues;

use ahash::AHashSet;

use crate::diagnostics::{MeshLog, NullLog};
use crate::error::Result;
use crate::geometry::util;
use crate::mesh::Mesh;
use crate::mesh::basic_types::VertexKind;
use crate::mesh::core::EdgeRing;
use crate::mesh::handles::{NO_SUBSEG, OUTER, Osub, Otri};
use crate::operations::refinement::queues::{BadSubseg, BadSubsegQueue, BadTri, BadTriQueue};
use crate::operations::triangulation::incremental::Insertion;

/// Quality targets for [`Mesh::refine`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RefineOptions {
    /// Triangles with a smaller minimum angle are split. The default of 20
    /// degrees sits comfortably inside Ruppert's always-terminating regime;
    /// anything above 33 is best effort.
    pub min_angle_deg: f64,
    /// Global area cap. Per-region caps still apply where tighter.
    pub max_area: Option<f64>,
    /// Ceiling on Steiner points added by one refinement run. Absent, ten
    /// times the input vertex count.
    pub max_steiner_points: Option<usize>,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            min_angle_deg: 20.0,
            max_area: None,
            max_steiner_points: None,
        }
    }
}

/// What a refinement run did and what it left behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RefineReport {
    /// Steiner points added by this run.
    pub steiner_points: usize,
    pub remaining_bad_triangles: usize,
    pub remaining_encroached: usize,
    /// False when the Steiner ceiling cut the run short.
    pub complete: bool,
}

/// A triangle's reason for being split.
struct Flaw {
    /// Squared shortest edge; the queue priority.
    key: f64,
    /// Endpoints of that shortest edge.
    edge: (usize, usize),
    by_area: bool,
}

impl Mesh {
    /// Refine in place until every triangle meets the quality targets or
    /// the Steiner ceiling is reached.
    pub fn refine(&mut self, options: &RefineOptions) -> Result<RefineReport> {
        self.refine_with_log(options, &mut NullLog)
    }

    pub fn refine_with_log(
        &mut self,
        options: &RefineOptions,
        log: &mut dyn MeshLog,
    ) -> Result<RefineReport> {
        // B = 1/(2 sin theta): a triangle is skinny when its squared
        // circumradius exceeds B^2 times its squared shortest edge.
        let bound2 = if options.min_angle_deg > 0.0 {
            let sin = options.min_angle_deg.to_radians().sin();
            1.0 / (4.0 * sin * sin)
        } else {
            f64::INFINITY
        };
        if options.min_angle_deg > 33.0 {
            log.warn(format_args!(
                "minimum angle {:.1} is above 33 degrees; refinement may only stop at its ceiling",
                options.min_angle_deg
            ));
        }
        let global_area = options.max_area.unwrap_or(f64::INFINITY);
        let input_count = self
            .vertices
            .iter()
            .filter(|v| v.kind == VertexKind::Input)
            .count();
        let ceiling = options.max_steiner_points.unwrap_or(10 * input_count);
        let before = self.steiner_count;

        self.ensure_boundary_subsegs();

        let mut subq = BadSubsegQueue::new();
        let mut triq = BadTriQueue::new();
        let seg_ids: Vec<usize> = self
            .subsegs
            .iter()
            .map(|(s, _)| s)
            .filter(|&s| s != NO_SUBSEG)
            .collect();
        for s in seg_ids {
            if self.subseg_encroached(s) {
                self.enqueue_subseg(&mut subq, s);
            }
        }
        let tri_ids: Vec<usize> = self.real_triangles().map(|(t, _)| t).collect();
        for t in tri_ids {
            self.enqueue_tri_if_bad(&mut triq, t, bound2, global_area);
        }
        log.debug(format_args!(
            "refinement start: {} encroached subsegments, {} bad triangles",
            subq.len(),
            triq.len()
        ));

        let mut hit_ceiling = false;
        let mut dbg_iters: u64 = 0;
        loop {
            dbg_iters += 1;
            if dbg_iters % 1_000_000 == 0 {
                eprintln!(
                    "[dbg] refine loop iter={} steiner={} subq={} triq={}",
                    dbg_iters,
                    self.steiner_count - before,
                    subq.len(),
                    triq.len()
                );
            }
            if subq.is_empty() && triq.is_empty() {
                break;
            }
            if self.steiner_count - before >= ceiling {
                hit_ceiling = true;
                break;
            }
            if let Some(bad) = self.pop_live_subseg(&mut subq) {
                if self.subseg_encroached(bad.seg) {
                    self.split_encroached(&bad, bound2, global_area, &mut triq, &mut subq, log);
                }
                continue;
            }
            if let Some(bad) = self.pop_live_tri(&mut triq) {
                if self.quality_flaw(bad.tri, bound2, global_area).is_some() {
                    self.split_bad_triangle(&bad, bound2, global_area, &mut triq, &mut subq)?;
                }
                continue;
            }
            // Only stale entries remained.
            break;
        }

        // Queues may hold stale or duplicate entries; count what is really
        // left before reporting.
        let mut live_tris: AHashSet<usize> = AHashSet::new();
        while let Some(bad) = self.pop_live_tri(&mut triq) {
            if self.quality_flaw(bad.tri, bound2, global_area).is_some() {
                live_tris.insert(bad.tri);
            }
        }
        let mut live_subs: AHashSet<usize> = AHashSet::new();
        while let Some(bad) = self.pop_live_subseg(&mut subq) {
            if self.subseg_encroached(bad.seg) {
                live_subs.insert(bad.seg);
            }
        }

        let report = RefineReport {
            steiner_points: self.steiner_count - before,
            remaining_bad_triangles: live_tris.len(),
            remaining_encroached: live_subs.len(),
            complete: !hit_ceiling && live_tris.is_empty() && live_subs.is_empty(),
        };
        if report.complete {
            log.info(format_args!(
                "refinement complete: {} Steiner points, minimum angle {:.2} degrees",
                report.steiner_points,
                self.min_angle()
            ));
        } else {
            log.warn(format_args!(
                "refinement stopped after {} Steiner points with {} bad triangles and {} encroached subsegments left",
                report.steiner_points, report.remaining_bad_triangles, report.remaining_encroached
            ));
        }
        Ok(report)
    }

    /// Put a subsegment on every boundary edge that lacks one, so barrier
    /// walks and encroachment checks treat the boundary like any other
    /// constraint. Only does work on meshes built without segments or with
    /// the hull kept.
    fn ensure_boundary_subsegs(&mut self) {
        let mut bare = Vec::new();
        for (t, data) in self.triangles.iter() {
            if t == OUTER || data.is_ghost() {
                continue;
            }
            for orient in 0..3u8 {
                let e = Otri::new(t, orient);
                if self.is_exterior(self.sym(e).tri) && self.tspivot(e).is_none() {
                    bare.push(e);
                }
            }
        }
        for e in bare {
            let o = self.org(e);
            let d = self.dest(e);
            self.attach_subseg(e, 1, [o, d]);
        }
    }

    /// A subsegment is encroached when the apex of a bonded triangle sits
    /// strictly inside its diametral circle. In a constrained Delaunay mesh
    /// the apex subtends the widest angle over the edge, so testing the two
    /// apexes covers every vertex.
    fn subseg_encroached(&self, seg: usize) -> bool {
        let [a, b] = self.subsegs[seg].vertices;
        let pa = self.vertices[a].point;
        let pb = self.vertices[b].point;
        for orient in 0..2u8 {
            let e = self.stpivot(Osub::new(seg, orient));
            if e.is_outer() {
                continue;
            }
            debug_assert!(!self.is_ghost(e.tri));
            let apex = self.apex(e);
            if util::in_diametral_circle(&pa, &pb, &self.vertices[apex].point) {
                return true;
            }
        }
        false
    }

    /// Measure triangle `t` against the angle and area targets.
    fn quality_flaw(&self, t: usize, bound2: f64, global_area: f64) -> Option<Flaw> {
        let [a, b, c] = self.triangles[t].vertices;
        let pa = self.vertices[a].point;
        let pb = self.vertices[b].point;
        let pc = self.vertices[c].point;

        let mut key = pb.distance2(&pc);
        let mut edge = (b, c);
        let d2_ca = pc.distance2(&pa);
        if d2_ca < key {
            key = d2_ca;
            edge = (c, a);
        }
        let d2_ab = pa.distance2(&pb);
        if d2_ab < key {
            key = d2_ab;
            edge = (a, b);
        }

        let cap = self.triangles[t].max_area.min(global_area);
        if cap.is_finite() && util::triangle_area(&pa, &pb, &pc) > cap {
            return Some(Flaw {
                key,
                edge,
                by_area: true,
            });
        }
        if util::circumradius2(&pa, &pb, &pc) > bound2 * key {
            return Some(Flaw {
                key,
                edge,
                by_area: false,
            });
        }
        None
    }

    /// Whether the edge `u`-`w` spans two concentric shells around a shared
    /// input vertex. Such edges come from a small angle in the input itself;
    /// splitting them any further only cascades.
    fn shell_cluster(&self, u: usize, w: usize) -> bool {
        if self.vertices[u].kind != VertexKind::Segment
            || self.vertices[w].kind != VertexKind::Segment
        {
            return false;
        }
        let (Some(su), Some(sw)) = (self.segment_origin_at(u), self.segment_origin_at(w)) else {
            return false;
        };
        su != sw && (su.0 == sw.0 || su.0 == sw.1 || su.1 == sw.0 || su.1 == sw.1)
    }

    /// Original input segment a `Segment`-kind vertex lies on.
    fn segment_origin_at(&self, v: usize) -> Option<(usize, usize)> {
        let mut ring = EdgeRing::new();
        self.edges_around(v, &mut ring);
        for &e in &ring {
            if self.is_exterior(e.tri) {
                continue;
            }
            // Both spoke sides: at a carved boundary the fan's last
            // subsegment survives only on the lprev side of its flank.
            for side in [e, e.lprev()] {
                let s = self.tspivot(side);
                if !s.is_none() {
                    let [a, b] = self.subsegs[s.seg].orig;
                    return Some((a, b));
                }
            }
        }
        None
    }

    fn enqueue_subseg(&self, queue: &mut BadSubsegQueue, seg: usize) {
        queue.push(BadSubseg {
            seg,
            vertices: self.subsegs[seg].vertices,
        });
    }

    fn enqueue_tri_if_bad(&self, queue: &mut BadTriQueue, t: usize, bound2: f64, global_area: f64) {
        if let Some(flaw) = self.quality_flaw(t, bound2, global_area) {
            if flaw.by_area || !self.shell_cluster(flaw.edge.0, flaw.edge.1) {
                queue.push(BadTri {
                    tri: t,
                    vertices: self.triangles[t].vertices,
                    key: flaw.key,
                });
            }
        }
    }

    /// Pop entries until one still matches a live subsegment.
    fn pop_live_subseg(&self, queue: &mut BadSubsegQueue) -> Option<BadSubseg> {
        while let Some(bad) = queue.pop() {
            if self.subsegs.contains(bad.seg) && self.subsegs[bad.seg].vertices == bad.vertices {
                return Some(bad);
            }
        }
        None
    }

    /// Pop entries until one still matches a live triangle.
    fn pop_live_tri(&self, queue: &mut BadTriQueue) -> Option<BadTri> {
        while let Some(bad) = queue.pop() {
            if self.triangles.contains(bad.tri) && self.triangles[bad.tri].vertices == bad.vertices
            {
                return Some(bad);
            }
        }
        None
    }

    /// Split an encroached subsegment and re-examine the neighborhood.
    fn split_encroached(
        &mut self,
        bad: &BadSubseg,
        bound2: f64,
        global_area: f64,
        triq: &mut BadTriQueue,
        subq: &mut BadSubsegQueue,
        log: &mut dyn MeshLog,
    ) {
        let seg = bad.seg;
        let [a, b] = self.subsegs[seg].vertices;
        let pa = self.vertices[a].point;
        let pb = self.vertices[b].point;

        // Concentric shells: a piece still touching an input vertex splits
        // at a power-of-two distance from it, so cascades around a small
        // input angle land on shared shell radii instead of creeping.
        let shell_a = self.vertices[a].kind == VertexKind::Input;
        let shell_b = self.vertices[b].kind == VertexKind::Input;
        let t = if shell_a == shell_b {
            0.5
        } else {
            let length = pa.distance(&pb);
            let fraction = util::nearest_power_of_two(0.5 * length) / length;
            if shell_a { fraction } else { 1.0 - fraction }
        };
        let point = pa.lerp(&pb, t);
        if point == pa || point == pb {
            log.warn(format_args!(
                "subsegment {a}-{b} is too short to split; leaving it encroached"
            ));
            return;
        }

        let marker = self.subsegs[seg].marker;
        let v = self.add_vertex(point, marker, VertexKind::Segment);
        let mut e = self.stpivot(Osub::new(seg, 0));
        if e.is_outer() {
            e = self.stpivot(Osub::new(seg, 1));
        }
        debug_assert!(!e.is_outer());

        let mut suspects = Vec::new();
        self.split_edge(e, v, &mut suspects);
        self.legalize(&mut suspects);
        self.steiner_count += 1;
        self.touch_star(v, bound2, global_area, triq, subq);
    }

    /// Try to place the circumcenter of a bad triangle. A constrained edge
    /// in the way converts the attempt into a subsegment split, with the
    /// triangle requeued behind it.
    fn split_bad_triangle(
        &mut self,
        bad: &BadTri,
        bound2: f64,
        global_area: f64,
        triq: &mut BadTriQueue,
        subq: &mut BadSubsegQueue,
    ) -> Result<()> {
        let [a, b, c] = self.triangles[bad.tri].vertices;
        let Some(center) = util::circumcenter(
            &self.vertices[a].point,
            &self.vertices[b].point,
            &self.vertices[c].point,
        ) else {
            // Numerically degenerate; nothing useful to insert.
            return Ok(());
        };

        let v = self.add_vertex(center, 0, VertexKind::Free);
        match self.insert_vertex_guided(v, Some(Otri::new(bad.tri, 0)), true)? {
            Insertion::Done => {
                self.steiner_count += 1;
                self.touch_star(v, bound2, global_area, triq, subq);
            }
            Insertion::Duplicate(_) => {
                self.vertices.pop();
            }
            Insertion::Blocked(e) => {
                self.vertices.pop();
                let s = self.tspivot(e);
                debug_assert!(!s.is_none());
                self.enqueue_subseg(subq, s.seg);
                triq.push(*bad);
            }
        }
        Ok(())
    }

    /// Re-examine everything a fresh vertex touches: its incident
    /// triangles, the subsegments it lies on, and the constrained edges
    /// across from it.
    fn touch_star(
        &self,
        v: usize,
        bound2: f64,
        global_area: f64,
        triq: &mut BadTriQueue,
        subq: &mut BadSubsegQueue,
    ) {
        let mut ring = EdgeRing::new();
        self.edges_around(v, &mut ring);
        for &e in &ring {
            if self.is_exterior(e.tri) {
                continue;
            }
            // All three sides of each fan triangle, so boundary-arc
            // subsegments held only on an lprev side are not missed.
            for side in [e, e.lnext(), e.lprev()] {
                let s = self.tspivot(side);
                if !s.is_none() && self.subseg_encroached(s.seg) {
                    self.enqueue_subseg(subq, s.seg);
                }
            }
            self.enqueue_tri_if_bad(triq, e.tri, bound2, global_area);
        }
    }
}
