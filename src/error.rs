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

//! Errors reported by mesh construction and query operations.
//!
//! Every variant names the offending entities by vertex id so a caller can
//! point back into its own input arrays. A refinement pass that stops at its
//! Steiner ceiling is not an error; see
//! [`RefineReport`](crate::operations::refinement::RefineReport).

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MeshError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// An input point coincides exactly with a vertex already in the mesh.
    #[error("input point {index} duplicates vertex {existing}")]
    DuplicateVertex { index: usize, existing: usize },

    /// Two constrained segments properly cross somewhere other than a shared
    /// endpoint. Both are identified by their endpoint vertex ids.
    #[error(
        "segment ({}, {}) crosses constrained segment ({}, {})",
        segment.0, segment.1, obstacle.0, obstacle.1
    )]
    SegmentIntersection {
        segment: (usize, usize),
        obstacle: (usize, usize),
    },

    /// The input cannot support a triangulation: fewer than three points,
    /// all points collinear, a zero-length or out-of-range segment, or a
    /// non-finite coordinate.
    #[error("degenerate input: {detail}")]
    DegenerateInput { detail: String },

    /// A structural invariant failed. With exact predicates this indicates
    /// a bug or corrupted input, so the operation aborts instead of
    /// attempting repair.
    #[error("inconsistent topology: {detail}")]
    InconsistentTopology { detail: String },
}

impl MeshError {
    pub(crate) fn degenerate(detail: impl Into<String>) -> Self {
        MeshError::DegenerateInput {
            detail: detail.into(),
        }
    }

    pub(crate) fn inconsistent(detail: impl Into<String>) -> Self {
        MeshError::InconsistentTopology {
            detail: detail.into(),
        }
    }
}
