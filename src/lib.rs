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

//! Constrained Delaunay triangulation for planar straight-line graphs,
//! with hole and region carving, Ruppert-style quality refinement,
//! Voronoi dual extraction and Lloyd smoothing.
//!
//! The same input always produces the same mesh: orientation and incircle
//! decisions go through filtered exact predicates, and every walk is
//! seeded deterministically.
//!
//! ```
//! use tessera::{BuildOptions, Mesh, Point2, Pslg};
//!
//! let mut pslg = Pslg::from_points(vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(0.0, 1.0),
//! ]);
//! pslg.segments = vec![(0, 1), (1, 2), (2, 3), (3, 0)];
//!
//! let mesh = Mesh::triangulate(&pslg, &BuildOptions::default())?;
//! assert_eq!(mesh.triangle_count(), 2);
//! # Ok::<(), tessera::MeshError>(())
//! ```

pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod kernel;
pub mod mesh;
pub mod operations;
pub mod pslg;
pub mod voronoi;

pub use crate::diagnostics::{LogLevel, MemoryLog, MeshLog, NullLog, StderrLog};
pub use crate::error::{MeshError, Result};
pub use crate::geometry::Point2;
pub use crate::mesh::{Mesh, RawMesh, RawTriangle, Vertex, VertexKind};
pub use crate::operations::{BuildOptions, RefineOptions, RefineReport};
pub use crate::pslg::{Pslg, Region};
pub use crate::voronoi::lloyd::{LloydOptions, LloydReport};
pub use crate::voronoi::{VorFace, VorHalfEdge, VoronoiBuilder, VoronoiDiagram};

#[cfg(feature = "log")]
pub use crate::diagnostics::LogFacade;
