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

//! Slotted arena with a free list.
//!
//! Triangles and subsegments are created and destroyed constantly during
//! flipping, carving and refinement; slots of killed records are recycled so
//! indices stay dense and allocations amortize away. Indices of live records
//! are stable for their whole lifetime, which is what lets handles be plain
//! `usize`.

use std::ops::{Index, IndexMut};

#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<Option<T>>,
    free: Vec<usize>,
    live: usize,
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// One past the highest slot ever used; the bound for index iteration.
    pub fn slot_bound(&self) -> usize {
        self.slots.len()
    }

    pub fn insert(&mut self, item: T) -> usize {
        self.live += 1;
        match self.free.pop() {
            Some(index) => {
                debug_assert!(self.slots[index].is_none());
                self.slots[index] = Some(item);
                index
            }
            None => {
                self.slots.push(Some(item));
                self.slots.len() - 1
            }
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        let item = self.slots.get_mut(index)?.take()?;
        self.free.push(index);
        self.live -= 1;
        Some(item)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(|slot| slot.is_some())
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)?.as_ref()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)?.as_mut()
    }

    /// Live records with their slot indices, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|item| (i, item)))
    }

    /// Drops every record but keeps the allocations.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.live = 0;
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for Pool<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        self.slots[index]
            .as_ref()
            .unwrap_or_else(|| panic!("pool slot {index} is vacant"))
    }
}

impl<T> IndexMut<usize> for Pool<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        self.slots[index]
            .as_mut()
            .unwrap_or_else(|| panic!("pool slot {index} is vacant"))
    }
}

#[cfg(test)]
mod tests {
    use super::Pool;

    #[test]
    fn insert_remove_recycles_slots() {
        let mut pool = Pool::new();
        let a = pool.insert("a");
        let b = pool.insert("b");
        assert_eq!(pool.len(), 2);

        assert_eq!(pool.remove(a), Some("a"));
        assert_eq!(pool.len(), 1);
        assert!(!pool.contains(a));

        // The freed slot is reused before the vector grows.
        let c = pool.insert("c");
        assert_eq!(c, a);
        assert_eq!(pool.slot_bound(), 2);
        assert_eq!(pool[b], "b");
        assert_eq!(pool[c], "c");
    }

    #[test]
    fn iter_skips_vacant_slots() {
        let mut pool = Pool::new();
        let a = pool.insert(1);
        let b = pool.insert(2);
        let c = pool.insert(3);
        pool.remove(b);

        let collected: Vec<_> = pool.iter().collect();
        assert_eq!(collected, vec![(a, &1), (c, &3)]);
    }

    #[test]
    fn double_remove_is_none() {
        let mut pool = Pool::new();
        let a = pool.insert(5);
        assert_eq!(pool.remove(a), Some(5));
        assert_eq!(pool.remove(a), None);
        assert_eq!(pool.len(), 0);
    }
}
