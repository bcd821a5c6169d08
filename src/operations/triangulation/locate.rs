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

//! Point location: jump-and-walk with a sampled start.
//!
//! A handful of random pool slots plus the most recently touched triangle
//! seed the walk; the nearest seed wins and the walk crosses one edge per
//! step, choosing randomly when two edges both separate the query from the
//! triangle. Exact orientation tests make every step decision reliable, so
//! a step cap only guards against pathological cycling in heavily
//! constrained meshes; past the cap, location falls back to scanning every
//! live triangle.

use smallvec::SmallVec;

use crate::error::{MeshError, Result};
use crate::geometry::Point2;
use crate::kernel::{Sign, orient2d};
use crate::mesh::Mesh;
use crate::mesh::handles::{OUTER, Otri};

/// Where a query point landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Location {
    /// Coincides exactly with an existing vertex.
    OnVertex(usize),
    /// Interior of this directed edge of a real triangle.
    OnEdge(Otri),
    /// Strict interior of this real triangle.
    InTriangle(Otri),
    /// Beyond the hull; the handle is the boundary edge of a ghost triangle
    /// the point is strictly visible from.
    OutsideHull(Otri),
    /// A constrained edge stands between the start triangle and the point.
    /// Only reported when the walk runs with the barrier flag.
    Blocked(Otri),
}

impl Mesh {
    /// Locate `p` anywhere in the mesh, starting from a sampled seed.
    pub(crate) fn locate(&mut self, p: Point2) -> Result<Location> {
        let Some(start) = self.sample_start(p) else {
            return Err(MeshError::inconsistent("no live triangle to locate from"));
        };
        match self.walk(start, p, false)? {
            Some(location) => Ok(location),
            None => self.exhaustive_locate(p),
        }
    }

    /// Walk toward `p` from a known triangle. With `barrier` set the walk
    /// refuses to cross constrained edges and reports the one in the way.
    pub(crate) fn locate_from(&mut self, start: Otri, p: Point2, barrier: bool) -> Result<Location> {
        match self.walk(start, p, barrier)? {
            Some(location) => Ok(location),
            None => Err(MeshError::inconsistent("directed walk failed to terminate")),
        }
    }

    /// One straight walk. `Ok(None)` means the step cap ran out.
    fn walk(&mut self, start: Otri, p: Point2, barrier: bool) -> Result<Option<Location>> {
        debug_assert!(!self.is_exterior(start.tri));
        let cap = 4 * self.triangles.slot_bound() + 64;
        let mut t = start.tri;

        for _ in 0..cap {
            let signs = self.corner_signs(t, p);
            let mut separating: SmallVec<[u8; 3]> = SmallVec::new();
            for (k, sign) in signs.iter().enumerate() {
                if sign.is_negative() {
                    separating.push(k as u8);
                }
            }

            let k = match separating.len() {
                0 => {
                    self.recent = Otri::new(t, 0);
                    return self.classify(t, signs).map(Some);
                }
                1 => separating[0],
                _ => separating[self.random_below(separating.len())],
            };

            let edge = Otri::new(t, k);
            if barrier && !self.tspivot(edge).is_none() {
                self.recent = edge;
                return Ok(Some(Location::Blocked(edge)));
            }
            let mate = self.sym(edge);
            if mate.is_outer() {
                return Err(MeshError::inconsistent(
                    "walk fell off a carved boundary with no constraint on it",
                ));
            }
            if self.is_ghost(mate.tri) {
                self.recent = edge;
                return Ok(Some(Location::OutsideHull(mate)));
            }
            t = mate.tri;
        }

        Ok(None)
    }

    /// Orientation of `p` against each directed edge of triangle `t`.
    fn corner_signs(&self, t: usize, p: Point2) -> [Sign; 3] {
        let [a, b, c] = self.triangles[t].vertices;
        let pa = self.vertices[a].point;
        let pb = self.vertices[b].point;
        let pc = self.vertices[c].point;
        [
            orient2d(&pb, &pc, &p),
            orient2d(&pc, &pa, &p),
            orient2d(&pa, &pb, &p),
        ]
    }

    /// Terminal classification once no edge separates `p` from triangle `t`.
    fn classify(&self, t: usize, signs: [Sign; 3]) -> Result<Location> {
        let mut zeros: SmallVec<[usize; 2]> = SmallVec::new();
        for (k, sign) in signs.iter().enumerate() {
            if sign.is_zero() {
                zeros.push(k);
            }
        }
        match zeros.len() {
            0 => Ok(Location::InTriangle(Otri::new(t, 0))),
            1 => Ok(Location::OnEdge(Otri::new(t, zeros[0] as u8))),
            2 => {
                // The corner shared by the two grazed edges.
                let corner = 3 - zeros[0] - zeros[1];
                Ok(Location::OnVertex(self.triangles[t].vertices[corner]))
            }
            _ => Err(MeshError::inconsistent(format!(
                "triangle {t} is degenerate"
            ))),
        }
    }

    /// Pick the walk seed: the last touched triangle plus about
    /// cube-root-of-n random pool slots, keeping whichever corner sits
    /// closest to `p`.
    fn sample_start(&mut self, p: Point2) -> Option<Otri> {
        let mut best: Option<(f64, Otri)> = None;

        let recent = self.recent;
        if self.triangles.contains(recent.tri) && !self.is_exterior(recent.tri) {
            let d = self.corner_distance2(recent.tri, p);
            best = Some((d, Otri::new(recent.tri, 0)));
        }

        let bound = self.triangles.slot_bound();
        if bound > 0 {
            let samples = (self.triangles.len() as f64).cbrt().ceil() as usize;
            for _ in 0..(2 * samples + 2) {
                let slot = self.random_below(bound);
                if !self.triangles.contains(slot) || self.is_exterior(slot) {
                    continue;
                }
                let d = self.corner_distance2(slot, p);
                if best.map_or(true, |(bd, _)| d < bd) {
                    best = Some((d, Otri::new(slot, 0)));
                }
            }
        }

        if let Some((_, seed)) = best {
            return Some(seed);
        }
        self.real_triangles().next().map(|(t, _)| Otri::new(t, 0))
    }

    fn corner_distance2(&self, t: usize, p: Point2) -> f64 {
        self.vertices[self.triangles[t].vertices[0]].point.distance2(&p)
    }

    /// Last resort: test every live triangle, then every ghost.
    fn exhaustive_locate(&mut self, p: Point2) -> Result<Location> {
        let mut contained: Option<(usize, [Sign; 3])> = None;
        for (t, data) in self.triangles.iter() {
            if t == OUTER || data.is_ghost() {
                continue;
            }
            let signs = self.corner_signs(t, p);
            if signs.iter().all(|s| !s.is_negative()) {
                contained = Some((t, signs));
                break;
            }
        }
        if let Some((t, signs)) = contained {
            self.recent = Otri::new(t, 0);
            return self.classify(t, signs);
        }

        let mut visible = None;
        for (t, data) in self.triangles.iter() {
            if t == OUTER || !data.is_ghost() {
                continue;
            }
            let a = self.vertices[data.vertices[0]].point;
            let b = self.vertices[data.vertices[1]].point;
            if orient2d(&a, &b, &p).is_positive() {
                visible = Some(t);
                break;
            }
        }
        match visible {
            Some(t) => Ok(Location::OutsideHull(Otri::new(t, 2))),
            None => Err(MeshError::inconsistent(
                "query point is in no triangle and sees no hull edge",
            )),
        }
    }
}
