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

use crate::geometry::otri::OTri;
use crate::geometry::point::VId;
use crate::mesh::pool::SubSegPool;

/// Index of a subsegment record. `DUMMY` is the shared "no constraint"
/// sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubRef(pub i32);

impl SubRef {
    pub const DUMMY: SubRef = SubRef(-1);

    #[inline]
    pub fn is_dummy(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub fn index(self) -> usize {
        debug_assert!(self.0 >= 0);
        self.0 as usize
    }
}

/// A constraint edge. Vertex slots 0..2 are the current endpoints; slots 2..4
/// remember the endpoints of the original input segment, which stay fixed
/// while boundary splitting inserts vertices along it.
#[derive(Debug, Clone)]
pub struct SubSegment {
    pub vertices: [VId; 4],
    pub subsegs: [OSub; 2],
    pub triangles: [OTri; 2],
    pub hash: i32,
    pub label: i32,
}

impl Default for SubSegment {
    fn default() -> Self {
        SubSegment {
            vertices: [VId::NONE; 4],
            subsegs: [OSub::none(); 2],
            triangles: [OTri::none(); 2],
            hash: 0,
            label: 0,
        }
    }
}

impl SubSegment {
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.hash < 0
    }
}

/// Oriented subsegment cursor, the two orientations being the two directions
/// the segment can be traversed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OSub {
    pub seg: SubRef,
    pub orient: usize,
}

impl Default for OSub {
    fn default() -> Self {
        OSub::none()
    }
}

impl OSub {
    #[inline]
    pub const fn new(seg: SubRef, orient: usize) -> Self {
        OSub { seg, orient }
    }

    #[inline]
    pub const fn none() -> Self {
        OSub {
            seg: SubRef::DUMMY,
            orient: 0,
        }
    }

    /// Same subsegment, opposite direction.
    #[inline]
    pub fn sym(self) -> OSub {
        OSub::new(self.seg, 1 - self.orient)
    }

    /// Adjoining subsegment at the origin end.
    #[inline]
    pub fn pivot(self, subs: &SubSegPool) -> OSub {
        subs[self.seg].subsegs[self.orient]
    }

    /// Triangle lying to the left of this directed subsegment.
    #[inline]
    pub fn tri_pivot(self, subs: &SubSegPool) -> OTri {
        subs[self.seg].triangles[self.orient]
    }

    /// Adjoining subsegment at the destination end.
    #[inline]
    pub fn next(self, subs: &SubSegPool) -> OSub {
        subs[self.seg].subsegs[1 - self.orient]
    }

    #[inline]
    pub fn org(self, subs: &SubSegPool) -> VId {
        subs[self.seg].vertices[self.orient]
    }

    #[inline]
    pub fn dest(self, subs: &SubSegPool) -> VId {
        subs[self.seg].vertices[1 - self.orient]
    }

    #[inline]
    pub fn set_org(self, subs: &mut SubSegPool, v: VId) {
        subs[self.seg].vertices[self.orient] = v;
    }

    #[inline]
    pub fn set_dest(self, subs: &mut SubSegPool, v: VId) {
        subs[self.seg].vertices[1 - self.orient] = v;
    }

    #[inline]
    pub fn seg_org(self, subs: &SubSegPool) -> VId {
        subs[self.seg].vertices[2 + self.orient]
    }

    #[inline]
    pub fn seg_dest(self, subs: &SubSegPool) -> VId {
        subs[self.seg].vertices[3 - self.orient]
    }

    #[inline]
    pub fn set_seg_org(self, subs: &mut SubSegPool, v: VId) {
        subs[self.seg].vertices[2 + self.orient] = v;
    }

    #[inline]
    pub fn set_seg_dest(self, subs: &mut SubSegPool, v: VId) {
        subs[self.seg].vertices[3 - self.orient] = v;
    }

    /// Link this subsegment end and `other` as neighbors along a segment.
    #[inline]
    pub fn bond(self, subs: &mut SubSegPool, other: OSub) {
        subs[self.seg].subsegs[self.orient] = other;
        subs[other.seg].subsegs[other.orient] = self;
    }

    #[inline]
    pub fn dissolve(self, subs: &mut SubSegPool) {
        subs[self.seg].subsegs[self.orient] = OSub::none();
    }
}
