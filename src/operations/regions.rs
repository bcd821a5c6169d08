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

//! Carving and region labeling by flood fill.
//!
//! Floods spread triangle to triangle and stop only at constrained edges,
//! so every compartment of the mesh is bounded by segments. Exterior and
//! hole floods consume their compartments outright; region floods just
//! stamp a label and an area bound. Seeds are located up front while the
//! mesh is still whole, and the infection flag is always cleared or killed
//! with its record before any flood returns.

use crate::diagnostics::MeshLog;
use crate::error::Result;
use crate::mesh::Mesh;
use crate::mesh::basic_types::VertexKind;
use crate::mesh::handles::{NO_SUBSEG, OUTER, Otri};
use crate::operations::triangulation::locate::Location;

impl Mesh {
    /// Remove the exterior and hole compartments, then stamp region labels.
    /// Runs once, right after constraint insertion.
    pub(crate) fn carve_and_label(&mut self, log: &mut dyn MeshLog) -> Result<()> {
        let carve_exterior = !self.keep_hull && self.subseg_count() > 0;
        if !carve_exterior && self.holes.is_empty() && self.regions.is_empty() {
            return Ok(());
        }

        let holes = self.holes.clone();
        let mut hole_seeds = Vec::new();
        for (i, hole) in holes.iter().enumerate() {
            match self.locate(*hole)? {
                Location::InTriangle(e) | Location::OnEdge(e) => hole_seeds.push(e.tri),
                Location::OnVertex(_) => {
                    log.warn(format_args!("hole seed {i} sits on a vertex; ignored"));
                }
                Location::OutsideHull(_) | Location::Blocked(_) => {
                    log.warn(format_args!("hole seed {i} lies outside the hull; ignored"));
                }
            }
        }

        let regions = self.regions.clone();
        let mut region_seeds = Vec::new();
        for (i, region) in regions.iter().enumerate() {
            match self.locate(region.seed)? {
                Location::InTriangle(e) | Location::OnEdge(e) => {
                    let bound = region.max_area.unwrap_or(f64::INFINITY);
                    region_seeds.push((e.tri, region.label, bound));
                }
                Location::OnVertex(_) => {
                    log.warn(format_args!("region seed {i} sits on a vertex; ignored"));
                }
                Location::OutsideHull(_) | Location::Blocked(_) => {
                    log.warn(format_args!("region seed {i} lies outside the hull; ignored"));
                }
            }
        }

        let mut seeds = Vec::new();
        if carve_exterior {
            seeds.extend(self.seed_exterior());
        }
        seeds.extend(hole_seeds);
        if !seeds.is_empty() {
            let doomed = self.flood(seeds);
            log.debug(format_args!("carving {} triangles", doomed.len()));
            self.carve(doomed);
            self.sweep_dead_vertices();
        }
        if self.triangle_count() == 0 {
            log.warn(format_args!("carving consumed every triangle"));
        }

        for (slot, label, bound) in region_seeds {
            if self.triangles.contains(slot) {
                self.flood_label(slot, label, bound);
            } else {
                log.warn(format_args!(
                    "region seed for label {label} fell in carved space; ignored"
                ));
            }
        }
        Ok(())
    }

    /// Hull triangles reachable from outer space: every ghost's interior
    /// mate whose hull edge carries no constraint.
    fn seed_exterior(&self) -> Vec<usize> {
        let mut seeds = Vec::new();
        for (t, data) in self.triangles.iter() {
            if t == OUTER || !data.is_ghost() {
                continue;
            }
            let interior = self.sym(Otri::new(t, 2));
            debug_assert!(!interior.is_outer());
            if self.tspivot(interior).is_none() {
                seeds.push(interior.tri);
            }
        }
        seeds
    }

    /// Infect from the seeds across every unconstrained edge between real
    /// triangles; returns everything infected.
    fn flood(&mut self, mut queue: Vec<usize>) -> Vec<usize> {
        let mut infected = Vec::new();
        while let Some(t) = queue.pop() {
            if self.triangles[t].infected {
                continue;
            }
            self.triangles[t].infected = true;
            infected.push(t);
            for orient in 0..3u8 {
                let e = Otri::new(t, orient);
                if !self.tspivot(e).is_none() {
                    continue;
                }
                let m = self.sym(e);
                if m.is_outer() || self.is_ghost(m.tri) {
                    continue;
                }
                if !self.triangles[m.tri].infected {
                    queue.push(m.tri);
                }
            }
        }
        infected
    }

    /// Kill the infected set. Ghosts whose interior mate dies die with it,
    /// surviving edges facing the carved space dissolve to the sentinel,
    /// and subsegments stranded with no triangle on either side are
    /// dropped.
    fn carve(&mut self, mut doomed: Vec<usize>) {
        let mut ghosts = Vec::new();
        for &t in &doomed {
            for orient in 0..3u8 {
                let m = self.sym(Otri::new(t, orient));
                if !m.is_outer() && self.is_ghost(m.tri) && !self.triangles[m.tri].infected {
                    self.triangles[m.tri].infected = true;
                    ghosts.push(m.tri);
                }
            }
        }
        doomed.extend(ghosts);

        for &t in &doomed {
            for orient in 0..3u8 {
                let e = Otri::new(t, orient);
                let m = self.sym(e);
                if !m.is_outer() && !self.triangles[m.tri].infected {
                    self.dissolve(m);
                }
                let s = self.tspivot(e);
                if !s.is_none() {
                    self.subsegs[s.seg].triangles[s.orient as usize] = Otri::OUTER;
                }
            }
        }
        for t in doomed {
            self.kill_triangle(t);
        }

        let stranded: Vec<usize> = self
            .subsegs
            .iter()
            .filter(|&(s, data)| {
                s != NO_SUBSEG
                    && data.triangles[0].is_outer()
                    && data.triangles[1].is_outer()
            })
            .map(|(s, _)| s)
            .collect();
        for s in stranded {
            self.kill_subseg(s);
        }
    }

    /// Rebuild every vertex's incident-triangle pointer by scanning the
    /// surviving pool; vertices no triangle claims are dead.
    fn sweep_dead_vertices(&mut self) {
        for vertex in self.vertices.iter_mut() {
            if !vertex.is_dead() {
                vertex.tri = OUTER;
            }
        }
        let slots: Vec<usize> = self
            .triangles
            .iter()
            .map(|(t, _)| t)
            .filter(|&t| t != OUTER)
            .collect();
        for t in slots {
            self.note_corners(t);
        }
        for vertex in self.vertices.iter_mut() {
            if !vertex.is_dead() && vertex.tri == OUTER {
                vertex.kind = VertexKind::Dead;
            }
        }
    }

    /// Stamp `label` and an area bound across one compartment. The
    /// infection flag is borrowed for the visit set and cleared before
    /// returning.
    fn flood_label(&mut self, seed: usize, label: i32, max_area: f64) {
        let mut queue = vec![seed];
        let mut touched = Vec::new();
        while let Some(t) = queue.pop() {
            if self.triangles[t].infected {
                continue;
            }
            self.triangles[t].infected = true;
            touched.push(t);
            self.triangles[t].region = label;
            self.triangles[t].max_area = max_area;
            for orient in 0..3u8 {
                let e = Otri::new(t, orient);
                if !self.tspivot(e).is_none() {
                    continue;
                }
                let m = self.sym(e);
                if m.is_outer() || self.is_ghost(m.tri) {
                    continue;
                }
                if !self.triangles[m.tri].infected {
                    queue.push(m.tri);
                }
            }
        }
        for t in touched {
            self.triangles[t].infected = false;
        }
    }

    /// Give boundary vertices the conventional marker 1 when the input
    /// left them unmarked.
    pub(crate) fn mark_boundary_vertices(&mut self) {
        let mut to_mark = Vec::new();
        for (t, data) in self.triangles.iter() {
            if t == OUTER || data.is_ghost() {
                continue;
            }
            for orient in 0..3u8 {
                let e = Otri::new(t, orient);
                let m = self.sym(e);
                if m.is_outer() || self.is_ghost(m.tri) {
                    to_mark.push(self.org(e));
                    to_mark.push(self.dest(e));
                }
            }
        }
        for v in to_mark {
            if self.vertices[v].marker == 0 {
                self.vertices[v].marker = 1;
            }
        }
    }
}
