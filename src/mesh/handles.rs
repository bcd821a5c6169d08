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

//! Oriented handles into the triangle and subsegment arenas.
//!
//! An [`Otri`] selects one directed edge of a triangle: orientation `i`
//! names the edge opposite vertex `i`, running counter-clockwise. An
//! [`Osub`] selects a subsegment together with a direction along it. Both
//! are two-word values passed by copy; the purely combinatorial moves live
//! here, while anything that must consult the arenas (`sym`, `org`,
//! pivoting between triangles and subsegments) is a
//! [`Mesh`](crate::mesh::core::Mesh) method.

/// Arena slot of the permanent "outer space" triangle. Links that point
/// nowhere point here; it is never navigated through.
pub const OUTER: usize = 0;

/// Arena slot of the "no subsegment" sentinel.
pub const NO_SUBSEG: usize = 0;

/// Oriented triangle edge: the edge opposite `vertices[orient]`, directed
/// from `vertices[(orient + 1) % 3]` to `vertices[(orient + 2) % 3]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Otri {
    pub tri: usize,
    pub orient: u8,
}

impl Otri {
    pub const OUTER: Otri = Otri { tri: OUTER, orient: 0 };

    pub fn new(tri: usize, orient: u8) -> Self {
        debug_assert!(orient < 3);
        Self { tri, orient }
    }

    /// Next edge counter-clockwise around the same triangle; its origin is
    /// this edge's destination.
    pub fn lnext(self) -> Otri {
        Otri {
            tri: self.tri,
            orient: (self.orient + 1) % 3,
        }
    }

    /// Previous edge counter-clockwise around the same triangle; its
    /// destination is this edge's origin.
    pub fn lprev(self) -> Otri {
        Otri {
            tri: self.tri,
            orient: (self.orient + 2) % 3,
        }
    }

    pub fn is_outer(self) -> bool {
        self.tri == OUTER
    }
}

/// Oriented subsegment: orientation 0 runs from `vertices[0]` to
/// `vertices[1]`, orientation 1 the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Osub {
    pub seg: usize,
    pub orient: u8,
}

impl Osub {
    pub const NONE: Osub = Osub {
        seg: NO_SUBSEG,
        orient: 0,
    };

    pub fn new(seg: usize, orient: u8) -> Self {
        debug_assert!(orient < 2);
        Self { seg, orient }
    }

    /// Same subsegment, opposite direction.
    pub fn sym(self) -> Osub {
        Osub {
            seg: self.seg,
            orient: self.orient ^ 1,
        }
    }

    pub fn is_none(self) -> bool {
        self.seg == NO_SUBSEG
    }
}
