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

use crate::geometry::osub::OSub;
use crate::geometry::point::VId;
use crate::mesh::pool::{SubSegPool, TrianglePool};

/// The edge of a triangle the handle currently faces is `orient`; the corner
/// opposite that edge is `vertices[orient]`, the edge runs from
/// `vertices[plus1mod3]` (org) to `vertices[minus1mod3]` (dest).
pub(crate) const PLUS1_MOD3: [usize; 3] = [1, 2, 0];
pub(crate) const MINUS1_MOD3: [usize; 3] = [2, 0, 1];

/// Index of a triangle record in the pool. `DUMMY` addresses the shared
/// sentinel that stands in for "no neighbor" on the hull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriRef(pub i32);

impl TriRef {
    pub const DUMMY: TriRef = TriRef(-1);

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

/// A triangle record. Slots are never `Option`: missing neighbors point at
/// the dummy triangle and missing constraints at the dummy subsegment, so
/// navigation stays branch-free.
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [VId; 3],
    pub neighbors: [OTri; 3],
    pub subsegs: [OSub; 3],
    pub infected: bool,
    pub hash: i32,
    pub id: i32,
    pub label: i32,
    pub area: f64,
}

impl Default for Triangle {
    fn default() -> Self {
        Triangle {
            vertices: [VId::NONE; 3],
            neighbors: [OTri::none(); 3],
            subsegs: [OSub::none(); 3],
            infected: false,
            hash: 0,
            id: 0,
            label: 0,
            area: 0.0,
        }
    }
}

impl Triangle {
    /// Released records carry a negated hash until the pool hands them out
    /// again.
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.hash < 0
    }
}

/// Oriented triangle-edge cursor: a copyable `(triangle, edge)` view into the
/// pool. All navigation operators are table lookups, no search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OTri {
    pub tri: TriRef,
    pub orient: usize,
}

impl Default for OTri {
    fn default() -> Self {
        OTri::none()
    }
}

impl OTri {
    #[inline]
    pub const fn new(tri: TriRef, orient: usize) -> Self {
        OTri { tri, orient }
    }

    #[inline]
    pub const fn none() -> Self {
        OTri {
            tri: TriRef::DUMMY,
            orient: 0,
        }
    }

    /// Same edge seen from the adjacent triangle.
    #[inline]
    pub fn sym(self, pool: &TrianglePool) -> OTri {
        pool[self.tri].neighbors[self.orient]
    }

    /// Next edge counterclockwise within the same triangle.
    #[inline]
    pub fn lnext(self) -> OTri {
        OTri::new(self.tri, PLUS1_MOD3[self.orient])
    }

    /// Previous edge counterclockwise within the same triangle.
    #[inline]
    pub fn lprev(self) -> OTri {
        OTri::new(self.tri, MINUS1_MOD3[self.orient])
    }

    /// Next edge counterclockwise around the origin vertex.
    #[inline]
    pub fn onext(self, pool: &TrianglePool) -> OTri {
        self.lprev().sym(pool)
    }

    /// Previous edge counterclockwise around the origin vertex.
    #[inline]
    pub fn oprev(self, pool: &TrianglePool) -> OTri {
        self.sym(pool).lnext()
    }

    /// Next edge counterclockwise around the destination vertex.
    #[inline]
    pub fn dnext(self, pool: &TrianglePool) -> OTri {
        self.sym(pool).lprev()
    }

    /// Previous edge counterclockwise around the destination vertex.
    #[inline]
    pub fn dprev(self, pool: &TrianglePool) -> OTri {
        self.lnext().sym(pool)
    }

    /// Next edge along the boundary of the mesh region to the right.
    #[inline]
    pub fn rnext(self, pool: &TrianglePool) -> OTri {
        self.sym(pool).lnext().sym(pool)
    }

    /// Previous edge along the boundary of the mesh region to the right.
    #[inline]
    pub fn rprev(self, pool: &TrianglePool) -> OTri {
        self.sym(pool).lprev().sym(pool)
    }

    #[inline]
    pub fn org(self, pool: &TrianglePool) -> VId {
        pool[self.tri].vertices[PLUS1_MOD3[self.orient]]
    }

    #[inline]
    pub fn dest(self, pool: &TrianglePool) -> VId {
        pool[self.tri].vertices[MINUS1_MOD3[self.orient]]
    }

    #[inline]
    pub fn apex(self, pool: &TrianglePool) -> VId {
        pool[self.tri].vertices[self.orient]
    }

    #[inline]
    pub fn set_org(self, pool: &mut TrianglePool, v: VId) {
        pool[self.tri].vertices[PLUS1_MOD3[self.orient]] = v;
    }

    #[inline]
    pub fn set_dest(self, pool: &mut TrianglePool, v: VId) {
        pool[self.tri].vertices[MINUS1_MOD3[self.orient]] = v;
    }

    #[inline]
    pub fn set_apex(self, pool: &mut TrianglePool, v: VId) {
        pool[self.tri].vertices[self.orient] = v;
    }

    /// Glue this edge and `other` together as mutual neighbors.
    #[inline]
    pub fn bond(self, pool: &mut TrianglePool, other: OTri) {
        pool[self.tri].neighbors[self.orient] = other;
        pool[other.tri].neighbors[other.orient] = self;
    }

    /// Detach this edge from its neighbor, leaving the dummy in its place.
    /// The neighbor keeps its (now stale) back-pointer, as on the hull.
    #[inline]
    pub fn dissolve(self, pool: &mut TrianglePool) {
        pool[self.tri].neighbors[self.orient] = OTri::none();
    }

    #[inline]
    pub fn infect(self, pool: &mut TrianglePool) {
        pool[self.tri].infected = true;
    }

    #[inline]
    pub fn uninfect(self, pool: &mut TrianglePool) {
        pool[self.tri].infected = false;
    }

    #[inline]
    pub fn is_infected(self, pool: &TrianglePool) -> bool {
        pool[self.tri].infected
    }

    /// The subsegment lying along this edge (dummy if unconstrained).
    #[inline]
    pub fn pivot(self, pool: &TrianglePool) -> OSub {
        pool[self.tri].subsegs[self.orient]
    }

    /// Bond this edge and the subsegment `os` to each other.
    #[inline]
    pub fn seg_bond(self, pool: &mut TrianglePool, subs: &mut SubSegPool, os: OSub) {
        pool[self.tri].subsegs[self.orient] = os;
        subs[os.seg].triangles[os.orient] = self;
    }

    #[inline]
    pub fn seg_dissolve(self, pool: &mut TrianglePool) {
        pool[self.tri].subsegs[self.orient] = OSub::none();
    }
}
