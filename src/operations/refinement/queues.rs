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

//! Work queues for the refiner.
//!
//! Bad triangles are bucketed by the base-sqrt(2) exponent of their squared
//! shortest edge, read straight off the f64 bit pattern. Short edges land
//! in high buckets and are served first; order inside a bucket is FIFO.
//! Most triangles of a mesh cluster in a handful of adjacent buckets, which
//! is why this beats a comparison heap here. Entries snapshot their vertex
//! ids, and the refiner discards any entry whose element has since been
//! consumed by another split.

use std::collections::VecDeque;

use num_traits::float::FloatCore;

const BUCKETS: usize = 4096;
const CENTER: i32 = 2048;

/// `2^52 * sqrt(2)`: splits each power-of-two octave of 53-bit mantissas
/// in half.
const SQRT2_MANTISSA: u64 = 6_369_051_672_525_773;

/// A triangle queued for splitting, with the vertex snapshot that detects
/// staleness and the squared shortest edge that ranked it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BadTri {
    pub tri: usize,
    pub vertices: [usize; 3],
    pub key: f64,
}

/// A subsegment queued for splitting, with its vertex snapshot.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BadSubseg {
    pub seg: usize,
    pub vertices: [usize; 2],
}

/// Bucket index for a squared-shortest-edge key. Smaller keys map higher.
fn bucket_of(key: f64) -> usize {
    if !(key > 0.0) || !key.is_finite() {
        return BUCKETS - 1;
    }
    let (mantissa, exponent, _sign) = key.integer_decode();
    // Normal mantissas are 53 bits, so this is floor(log2(key)); subnormal
    // keys drift low and clamp into the top bucket with the rest of the
    // pathologically short edges.
    let log2 = exponent as i32 + 52;
    let upper_half = (mantissa >= SQRT2_MANTISSA) as i32;
    let e = 2 * log2 + upper_half;
    (CENTER - e).clamp(0, BUCKETS as i32 - 1) as usize
}

/// Priority queue over 4096 FIFO buckets. `first_nonempty` names the
/// highest occupied bucket and `next_nonempty` chains the occupied buckets
/// downward, so both ends of every operation are O(1) amortized.
pub(crate) struct BadTriQueue {
    buckets: Vec<VecDeque<BadTri>>,
    next_nonempty: Vec<i32>,
    first_nonempty: i32,
    len: usize,
}

impl BadTriQueue {
    pub fn new() -> Self {
        Self {
            buckets: (0..BUCKETS).map(|_| VecDeque::new()).collect(),
            next_nonempty: vec![-1; BUCKETS],
            first_nonempty: -1,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push(&mut self, bad: BadTri) {
        let b = bucket_of(bad.key);
        if self.buckets[b].is_empty() {
            if b as i32 > self.first_nonempty {
                self.next_nonempty[b] = self.first_nonempty;
                self.first_nonempty = b as i32;
            } else {
                // Splice below the nearest occupied bucket above b; the
                // probe stops at first_nonempty at the latest.
                let mut above = b + 1;
                while self.buckets[above].is_empty() {
                    above += 1;
                }
                self.next_nonempty[b] = self.next_nonempty[above];
                self.next_nonempty[above] = b as i32;
            }
        }
        self.buckets[b].push_back(bad);
        self.len += 1;
    }

    pub fn pop(&mut self) -> Option<BadTri> {
        if self.first_nonempty < 0 {
            return None;
        }
        let b = self.first_nonempty as usize;
        let bad = self.buckets[b].pop_front();
        debug_assert!(bad.is_some());
        if self.buckets[b].is_empty() {
            self.first_nonempty = self.next_nonempty[b];
        }
        self.len -= 1;
        bad
    }
}

/// Encroached subsegments in arrival order.
pub(crate) struct BadSubsegQueue {
    queue: VecDeque<BadSubseg>,
}

impl BadSubsegQueue {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn push(&mut self, bad: BadSubseg) {
        self.queue.push_back(bad);
    }

    pub fn pop(&mut self) -> Option<BadSubseg> {
        self.queue.pop_front()
    }
}
