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

//! Approximate priority queue of skinny triangles.
//!
//! Triangles are bucketed by the binary logarithm of their quality measure
//! (squared shortest edge over squared circumradius, roughly), two buckets per
//! power of two. Worst triangles come out first; within a bucket order is
//! FIFO. This is O(1) per operation and accurate enough that refinement
//! terminates with the same guarantees as a true heap.

use std::collections::VecDeque;

use crate::geometry::osub::OSub;
use crate::geometry::otri::OTri;
use crate::geometry::point::VId;

/// A triangle queued for splitting, with the corner ids captured at enqueue
/// time so staleness can be detected after surgery elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct BadTriangle {
    pub poortri: OTri,
    pub key: f64,
    pub org: VId,
    pub dest: VId,
    pub apex: VId,
}

/// An encroached subsegment awaiting a split, with endpoints captured at
/// enqueue time.
#[derive(Debug, Clone, Copy)]
pub struct BadSubsegment {
    pub subseg: OSub,
    pub org: VId,
    pub dest: VId,
}

const BUCKET_COUNT: usize = 4096;
const SQRT_2: f64 = 1.414_213_562_373_095_1;

pub struct BadTriQueue {
    queues: Vec<VecDeque<BadTriangle>>,
    // for each non-empty bucket, the index of the next non-empty one below
    next_nonempty: Vec<i32>,
    first_nonempty: i32,
    size: usize,
}

impl Default for BadTriQueue {
    fn default() -> Self {
        BadTriQueue::new()
    }
}

impl BadTriQueue {
    pub fn new() -> Self {
        BadTriQueue {
            queues: (0..BUCKET_COUNT).map(|_| VecDeque::new()).collect(),
            next_nonempty: vec![0; BUCKET_COUNT],
            first_nonempty: -1,
            size: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn enqueue(&mut self, bad: BadTriangle) {
        let queue_number = Self::bucket(bad.key);
        let was_empty = self.queues[queue_number].is_empty();
        self.queues[queue_number].push_back(bad);
        self.size += 1;
        if !was_empty {
            return;
        }
        // splice the freshly non-empty bucket into the skip chain
        if self.first_nonempty < 0 || (queue_number as i32) > self.first_nonempty {
            self.next_nonempty[queue_number] = self.first_nonempty;
            self.first_nonempty = queue_number as i32;
        } else {
            let mut i = queue_number + 1;
            while self.queues[i].is_empty() {
                i += 1;
            }
            self.next_nonempty[queue_number] = self.next_nonempty[i];
            self.next_nonempty[i] = queue_number as i32;
        }
    }

    pub fn dequeue(&mut self) -> Option<BadTriangle> {
        if self.first_nonempty < 0 {
            return None;
        }
        let q = self.first_nonempty as usize;
        let bad = self.queues[q].pop_front();
        debug_assert!(bad.is_some());
        self.size -= 1;
        if self.queues[q].is_empty() {
            self.first_nonempty = self.next_nonempty[q];
        }
        bad
    }

    pub fn clear(&mut self) {
        for q in self.queues.iter_mut() {
            q.clear();
        }
        self.first_nonempty = -1;
        self.size = 0;
    }

    /// Map a quality key onto a bucket. Keys near zero are the worst
    /// triangles and land in the highest-priority (largest-index) buckets.
    fn bucket(key: f64) -> usize {
        if key <= 0.0 {
            return BUCKET_COUNT - 1;
        }
        let pos_exponent = key >= 1.0;
        // keys below one are inverted so one doubling search covers both sides
        let mut length = if pos_exponent { key } else { 1.0 / key };
        let mut exponent = 0i32;
        while length > 2.0 {
            // repeated squaring finds the exponent in log(log) steps
            let mut exp_increment = 1i32;
            let mut multiplier = 0.5f64;
            while length * multiplier * multiplier > 1.0 {
                exp_increment *= 2;
                multiplier *= multiplier;
            }
            exponent += exp_increment;
            length *= multiplier;
        }
        // two buckets per power of two, split at sqrt(2)
        let exponent = 2 * exponent + if length > SQRT_2 { 1 } else { 0 };
        if pos_exponent {
            (2047 - exponent) as usize
        } else {
            (2048 + exponent) as usize
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bad(key: f64) -> BadTriangle {
        BadTriangle {
            poortri: OTri::none(),
            key,
            org: VId(0),
            dest: VId(1),
            apex: VId(2),
        }
    }

    #[test]
    fn worst_key_comes_out_first() {
        let mut q = BadTriQueue::new();
        q.enqueue(bad(4.0));
        q.enqueue(bad(0.01));
        q.enqueue(bad(1.5));
        let first = q.dequeue().map(|b| b.key);
        assert_eq!(first, Some(0.01));
        assert_eq!(q.len(), 2);
    }

    #[test]
    fn same_bucket_is_fifo() {
        let mut q = BadTriQueue::new();
        let mut a = bad(0.5);
        a.org = VId(10);
        let mut b = bad(0.5);
        b.org = VId(11);
        q.enqueue(a);
        q.enqueue(b);
        assert_eq!(q.dequeue().map(|t| t.org), Some(VId(10)));
        assert_eq!(q.dequeue().map(|t| t.org), Some(VId(11)));
        assert!(q.dequeue().is_none());
    }

    #[test]
    fn zero_key_is_highest_priority() {
        let mut q = BadTriQueue::new();
        q.enqueue(bad(1e-300));
        q.enqueue(bad(0.0));
        assert_eq!(q.dequeue().map(|b| b.key), Some(0.0));
    }

    #[test]
    fn interleaved_buckets_drain_in_order() {
        let mut q = BadTriQueue::new();
        for &k in &[8.0, 0.125, 2.0, 0.5, 32.0] {
            q.enqueue(bad(k));
        }
        let mut out = Vec::new();
        while let Some(b) = q.dequeue() {
            out.push(b.key);
        }
        assert_eq!(out, vec![0.125, 0.5, 2.0, 8.0, 32.0]);
    }
}
