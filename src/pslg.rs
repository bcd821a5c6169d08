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

//! Planar straight-line graph: the caller's input description.

use crate::error::{MeshError, Result};
use crate::geometry::Point2;

/// A labeled region: everything reachable from `seed` without crossing a
/// constrained segment receives `label` and, optionally, a per-triangle
/// area bound that quality refinement enforces inside the region.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub seed: Point2,
    pub label: i32,
    pub max_area: Option<f64>,
}

impl Region {
    pub fn new(seed: Point2, label: i32) -> Self {
        Self {
            seed,
            label,
            max_area: None,
        }
    }

    pub fn with_max_area(seed: Point2, label: i32, max_area: f64) -> Self {
        Self {
            seed,
            label,
            max_area: Some(max_area),
        }
    }
}

/// Input to triangulation: points, constrained segments between them by
/// index, hole seeds, and region seeds.
///
/// `point_markers` and `segment_markers` may be left empty; points then
/// carry marker 0 and segments marker 1. When present they must run
/// parallel to their arrays.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pslg {
    pub points: Vec<Point2>,
    pub point_markers: Vec<i32>,
    pub segments: Vec<(usize, usize)>,
    pub segment_markers: Vec<i32>,
    pub holes: Vec<Point2>,
    pub regions: Vec<Region>,
}

impl Pslg {
    pub fn from_points(points: Vec<Point2>) -> Self {
        Self {
            points,
            ..Default::default()
        }
    }

    /// Marker for point `i`, defaulting to 0.
    pub fn point_marker(&self, i: usize) -> i32 {
        self.point_markers.get(i).copied().unwrap_or(0)
    }

    /// Marker for segment `i`, defaulting to 1 so constrained edges are
    /// distinguishable from interior edges in the output.
    pub fn segment_marker(&self, i: usize) -> i32 {
        self.segment_markers.get(i).copied().unwrap_or(1)
    }

    /// Reject inputs no triangulation can be built from. Segment crossings
    /// are not checked here; they surface during constraint insertion,
    /// where both offenders are known.
    pub fn validate(&self) -> Result<()> {
        for (i, p) in self.points.iter().enumerate() {
            if !p.is_finite() {
                return Err(MeshError::degenerate(format!(
                    "point {i} has a non-finite coordinate"
                )));
            }
        }

        if !self.point_markers.is_empty() && self.point_markers.len() != self.points.len() {
            return Err(MeshError::degenerate(
                "point_markers must be empty or match points in length",
            ));
        }
        if !self.segment_markers.is_empty() && self.segment_markers.len() != self.segments.len() {
            return Err(MeshError::degenerate(
                "segment_markers must be empty or match segments in length",
            ));
        }

        for (i, &(a, b)) in self.segments.iter().enumerate() {
            if a >= self.points.len() || b >= self.points.len() {
                return Err(MeshError::degenerate(format!(
                    "segment {i} references point {} but only {} points exist",
                    a.max(b),
                    self.points.len()
                )));
            }
            if a == b {
                return Err(MeshError::degenerate(format!(
                    "segment {i} is a loop on point {a}"
                )));
            }
            if self.points[a] == self.points[b] {
                return Err(MeshError::degenerate(format!(
                    "segment {i} has zero length: points {a} and {b} coincide"
                )));
            }
        }

        for (i, h) in self.holes.iter().enumerate() {
            if !h.is_finite() {
                return Err(MeshError::degenerate(format!(
                    "hole seed {i} has a non-finite coordinate"
                )));
            }
        }

        for (i, region) in self.regions.iter().enumerate() {
            if !region.seed.is_finite() {
                return Err(MeshError::degenerate(format!(
                    "region seed {i} has a non-finite coordinate"
                )));
            }
            if let Some(max_area) = region.max_area {
                if !(max_area > 0.0) {
                    return Err(MeshError::degenerate(format!(
                        "region {i} area bound must be positive"
                    )));
                }
            }
        }

        Ok(())
    }
}
