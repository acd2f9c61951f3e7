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

use std::ops::{Index, IndexMut};

use rand::Rng;

use crate::geometry::osub::{OSub, SubRef, SubSegment};
use crate::geometry::otri::{OTri, TriRef, Triangle};
use crate::geometry::point::VId;

const BLOCK_SIZE: usize = 1024;

/// Block-allocated arena of triangle records with O(1) recycling.
///
/// A released record keeps its slot; its hash is negated (`-hash - 1`) so
/// iteration and `contains` skip it, and reuse restores the hash and clears
/// every geometry/topology field. Slot `TriRef::DUMMY` addresses the shared
/// sentinel triangle.
#[derive(Debug)]
pub struct TrianglePool {
    blocks: Vec<Vec<Triangle>>,
    // slots ever handed out; released slots keep their place and recycle
    // through the stack, so this only grows
    count: usize,
    stack: Vec<TriRef>,
    dummy: Triangle,
}

impl Default for TrianglePool {
    fn default() -> Self {
        TrianglePool::new()
    }
}

impl TrianglePool {
    pub fn new() -> Self {
        let mut dummy = Triangle::default();
        dummy.hash = -1;
        dummy.id = -1;
        TrianglePool {
            blocks: Vec::new(),
            count: 0,
            stack: Vec::new(),
            dummy,
        }
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.count - self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hand out a record, recycling a released slot when one is available.
    pub fn get(&mut self) -> TriRef {
        if let Some(r) = self.stack.pop() {
            let tri = &mut self.blocks[r.index() / BLOCK_SIZE][r.index() % BLOCK_SIZE];
            tri.hash = -tri.hash - 1;
            Self::cleanup(tri);
            r
        } else {
            let i = self.count;
            let mut tri = Triangle::default();
            tri.hash = i as i32;
            tri.id = tri.hash;
            if i / BLOCK_SIZE == self.blocks.len() {
                self.blocks.push(Vec::with_capacity(BLOCK_SIZE));
            }
            self.blocks[i / BLOCK_SIZE].push(tri);
            self.count += 1;
            TriRef(i as i32)
        }
    }

    pub fn release(&mut self, r: TriRef) {
        debug_assert!(!r.is_dummy());
        self.stack.push(r);
        let tri = &mut self[r];
        tri.hash = -tri.hash - 1;
    }

    pub fn contains(&self, r: TriRef) -> bool {
        if r.is_dummy() || r.index() >= self.count {
            return false;
        }
        self.blocks[r.index() / BLOCK_SIZE][r.index() % BLOCK_SIZE].hash >= 0
    }

    /// Up to `k` live records drawn uniformly at random (with replacement)
    /// from the slot region.
    pub fn sample<R: Rng>(&self, k: usize, rng: &mut R, out: &mut Vec<TriRef>) {
        out.clear();
        if self.len() == 0 {
            return;
        }
        let mut remaining = k.min(self.count);
        while remaining > 0 {
            let i = rng.random_range(0..self.count);
            if self.blocks[i / BLOCK_SIZE][i % BLOCK_SIZE].hash >= 0 {
                out.push(TriRef(i as i32));
                remaining -= 1;
            }
        }
    }

    /// Iterate live records in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (TriRef, &Triangle)> {
        (0..self.count)
            .map(move |i| {
                (
                    TriRef(i as i32),
                    &self.blocks[i / BLOCK_SIZE][i % BLOCK_SIZE],
                )
            })
            .filter(|(_, t)| t.hash >= 0)
    }

    pub fn refs(&self) -> impl Iterator<Item = TriRef> + '_ {
        self.iter().map(|(r, _)| r)
    }

    fn cleanup(tri: &mut Triangle) {
        tri.label = 0;
        tri.area = 0.0;
        tri.infected = false;
        for i in 0..3 {
            tri.vertices[i] = VId::NONE;
            tri.neighbors[i] = OTri::none();
            tri.subsegs[i] = OSub::none();
        }
    }
}

impl Index<TriRef> for TrianglePool {
    type Output = Triangle;

    #[inline]
    fn index(&self, r: TriRef) -> &Triangle {
        if r.is_dummy() {
            &self.dummy
        } else {
            &self.blocks[r.index() / BLOCK_SIZE][r.index() % BLOCK_SIZE]
        }
    }
}

impl IndexMut<TriRef> for TrianglePool {
    #[inline]
    fn index_mut(&mut self, r: TriRef) -> &mut Triangle {
        if r.is_dummy() {
            &mut self.dummy
        } else {
            &mut self.blocks[r.index() / BLOCK_SIZE][r.index() % BLOCK_SIZE]
        }
    }
}

/// Arena of subsegment records, same recycling discipline as the triangle
/// pool without the block structure (constraint counts stay small).
#[derive(Debug)]
pub struct SubSegPool {
    items: Vec<SubSegment>,
    stack: Vec<SubRef>,
    dummy: SubSegment,
}

impl Default for SubSegPool {
    fn default() -> Self {
        SubSegPool::new()
    }
}

impl SubSegPool {
    pub fn new() -> Self {
        let mut dummy = SubSegment::default();
        dummy.hash = -1;
        SubSegPool {
            items: Vec::new(),
            stack: Vec::new(),
            dummy,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len() - self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&mut self) -> SubRef {
        if let Some(r) = self.stack.pop() {
            let seg = &mut self.items[r.index()];
            seg.hash = -seg.hash - 1;
            seg.label = 0;
            for i in 0..4 {
                seg.vertices[i] = VId::NONE;
            }
            for i in 0..2 {
                seg.subsegs[i] = OSub::none();
                seg.triangles[i] = OTri::none();
            }
            r
        } else {
            let mut seg = SubSegment::default();
            seg.hash = self.items.len() as i32;
            self.items.push(seg);
            SubRef(self.items.len() as i32 - 1)
        }
    }

    pub fn release(&mut self, r: SubRef) {
        debug_assert!(!r.is_dummy());
        self.stack.push(r);
        let seg = &mut self.items[r.index()];
        seg.hash = -seg.hash - 1;
    }

    pub fn iter(&self) -> impl Iterator<Item = (SubRef, &SubSegment)> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, s)| s.hash >= 0)
            .map(|(i, s)| (SubRef(i as i32), s))
    }

    pub fn refs(&self) -> impl Iterator<Item = SubRef> + '_ {
        self.iter().map(|(r, _)| r)
    }
}

impl Index<SubRef> for SubSegPool {
    type Output = SubSegment;

    #[inline]
    fn index(&self, r: SubRef) -> &SubSegment {
        if r.is_dummy() {
            &self.dummy
        } else {
            &self.items[r.index()]
        }
    }
}

impl IndexMut<SubRef> for SubSegPool {
    #[inline]
    fn index_mut(&mut self, r: SubRef) -> &mut SubSegment {
        if r.is_dummy() {
            &mut self.dummy
        } else {
            &mut self.items[r.index()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_and_reuse_recycles_the_slot() {
        let mut pool = TrianglePool::new();
        let a = pool.get();
        let b = pool.get();
        assert_eq!(pool.len(), 2);

        pool[b].label = 7;
        pool.release(b);
        assert_eq!(pool.len(), 1);
        assert!(pool[b].is_dead());
        assert!(!pool.contains(b));
        assert!(pool.contains(a));

        let c = pool.get();
        assert_eq!(c, b);
        assert_eq!(pool[c].label, 0);
        assert_eq!(pool[c].hash, b.0);
        assert!(pool.contains(c));
    }

    #[test]
    fn growth_resumes_after_the_free_stack_drains() {
        let mut pool = TrianglePool::new();
        let refs: Vec<_> = (0..3).map(|_| pool.get()).collect();
        pool.release(refs[1]);
        assert_eq!(pool.get(), refs[1]);
        let fresh = pool.get();
        assert_eq!(fresh.index(), 3);
        assert_eq!(pool.len(), 4);
    }

    #[test]
    fn iteration_skips_dead_slots() {
        let mut pool = TrianglePool::new();
        let refs: Vec<_> = (0..5).map(|_| pool.get()).collect();
        pool.release(refs[1]);
        pool.release(refs[3]);
        let live: Vec<_> = pool.refs().collect();
        assert_eq!(live, vec![refs[0], refs[2], refs[4]]);
    }

    #[test]
    fn dummy_slot_is_self_referencing() {
        let pool = TrianglePool::new();
        let ot = OTri::none();
        let back = ot.sym(&pool);
        assert!(back.tri.is_dummy());
        assert_eq!(back.orient, 0);
    }

    #[test]
    fn sample_returns_only_live_records() {
        let mut pool = TrianglePool::new();
        let refs: Vec<_> = (0..20).map(|_| pool.get()).collect();
        for r in refs.iter().skip(10) {
            pool.release(*r);
        }
        use rand::SeedableRng;
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let mut out = Vec::new();
        pool.sample(8, &mut rng, &mut out);
        assert_eq!(out.len(), 8);
        for r in out {
            assert!(pool.contains(r));
        }
    }

    #[test]
    fn subseg_pool_recycles() {
        let mut subs = SubSegPool::new();
        let a = subs.get();
        subs[a].label = 3;
        subs.release(a);
        assert_eq!(subs.len(), 0);
        let b = subs.get();
        assert_eq!(a, b);
        assert_eq!(subs[b].label, 0);
    }
}
