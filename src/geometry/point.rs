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

use std::cmp::Ordering;

use num_traits::Float;

use crate::geometry::otri::OTri;

/// A plain 2D location with an optional boundary marker and output index.
#[derive(Debug, Clone, Copy, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub label: i32,
    pub id: i32,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point {
            x,
            y,
            label: 0,
            id: 0,
        }
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.x == other.x && self.y == other.y {
            return Some(Ordering::Equal);
        }
        if self.x < other.x || (self.x == other.x && self.y < other.y) {
            Some(Ordering::Less)
        } else {
            Some(Ordering::Greater)
        }
    }
}

/// Index of a vertex in the mesh's vertex arena. `NONE` marks an empty slot
/// (uninitialized triangle corners, the sentinel records).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VId(pub i32);

impl VId {
    pub const NONE: VId = VId(-1);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub fn index(self) -> usize {
        debug_assert!(self.0 >= 0);
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexKind {
    Input,
    Segment,
    Free,
    Dead,
    Undead,
}

/// A mesh vertex. `hash` is the stable arena key, `id` the renumbered output
/// index. `tri` points at one incident triangle edge whose origin is this
/// vertex, giving O(1) entry into the star.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub label: i32,
    pub id: i32,
    pub hash: i32,
    pub kind: VertexKind,
    pub tri: OTri,
}

impl Vertex {
    pub fn new(x: f64, y: f64, label: i32) -> Self {
        Vertex {
            x,
            y,
            label,
            id: 0,
            hash: 0,
            kind: VertexKind::Input,
            tri: OTri::none(),
        }
    }

    #[inline]
    pub fn point(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
            label: self.label,
            id: self.id,
        }
    }
}

/// Squared Euclidean distance, generic so callers can keep intermediate
/// precision decisions local.
#[inline]
pub fn squared_distance<T: Float>(ax: T, ay: T, bx: T, by: T) -> T {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_ordering_is_lexicographic() {
        let a = Point::new(0.0, 1.0);
        let b = Point::new(0.0, 2.0);
        let c = Point::new(1.0, 0.0);
        assert!(a < b);
        assert!(b < c);
        assert_eq!(a, Point::new(0.0, 1.0));
    }

    #[test]
    fn squared_distance_matches_hand_value() {
        assert_eq!(squared_distance(0.0, 0.0, 3.0, 4.0), 25.0);
        assert_eq!(squared_distance(1.0f32, 1.0, 1.0, 1.0), 0.0);
    }
}
