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

//! Arena records for vertices, triangles and subsegments.

use crate::geometry::Point2;
use crate::mesh::handles::{Osub, Otri};

/// Reserved vertex id for the point at infinity. Ghost triangles carry it as
/// their apex; it has no record in the vertex arena.
pub const GHOST: usize = usize::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexKind {
    /// Came in through the caller's point list.
    Input,
    /// Steiner point placed on a constrained segment.
    Segment,
    /// Steiner point placed in the interior (circumcenter, Lloyd target).
    Free,
    /// Logically removed; slot kept so ids stay stable.
    Dead,
}

#[derive(Debug, Clone)]
pub struct Vertex {
    pub point: Point2,
    pub marker: i32,
    pub kind: VertexKind,
    /// Some live triangle having this vertex as a corner; walk starting
    /// point for ring traversal and point location.
    pub tri: usize,
}

impl Vertex {
    pub fn new(point: Point2, marker: i32, kind: VertexKind) -> Self {
        Self {
            point,
            marker,
            kind,
            tri: crate::mesh::handles::OUTER,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.kind == VertexKind::Dead
    }
}

/// One triangle record. Corners are counter-clockwise; `neighbors[i]` is the
/// oriented edge of the triangle across the edge opposite corner `i`, and
/// `subsegs[i]` the subsegment bonded to that same edge.
#[derive(Debug, Clone)]
pub struct TriangleData {
    pub vertices: [usize; 3],
    pub neighbors: [Otri; 3],
    pub subsegs: [Osub; 3],
    /// Region label propagated by flood fill; 0 until assigned.
    pub region: i32,
    /// Area bound from the region that owns this triangle; `INFINITY` when
    /// unconstrained.
    pub max_area: f64,
    /// Scratch bit for flood fills. Always false outside a running flood.
    pub infected: bool,
}

impl TriangleData {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self {
            vertices: [a, b, c],
            neighbors: [Otri::OUTER; 3],
            subsegs: [Osub::NONE; 3],
            region: 0,
            max_area: f64::INFINITY,
            infected: false,
        }
    }

    /// Ghosts close the mesh off toward the exterior; exactly one corner is
    /// the [`GHOST`] vertex, always in slot 2.
    pub fn is_ghost(&self) -> bool {
        self.vertices[2] == GHOST
    }
}

/// One subsegment record: a piece of a constrained input segment.
#[derive(Debug, Clone)]
pub struct SubSegData {
    /// Current endpoints of this piece.
    pub vertices: [usize; 2],
    /// Endpoints of the original input segment this piece descends from;
    /// stable across any number of splits.
    pub orig: [usize; 2],
    /// Bonded triangle edge on each side; `triangles[k]` has its origin at
    /// `vertices[k]`. A side facing carved-away space stays at the sentinel.
    pub triangles: [Otri; 2],
    pub marker: i32,
}

impl SubSegData {
    pub fn new(a: usize, b: usize, orig: [usize; 2], marker: i32) -> Self {
        Self {
            vertices: [a, b],
            orig,
            triangles: [Otri::OUTER; 2],
            marker,
        }
    }
}
