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

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use trigon::behavior::Behavior;
use trigon::geometry::Point;
use trigon::mesh::NodeNumbering;
use trigon::meshing::triangulate;

fn random_points(n: usize, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| Point::new(rng.random_range(0.0..10.0), rng.random_range(0.0..10.0)))
        .collect()
}

#[test]
fn test_random_triangulation_is_consistent_and_delaunay() {
    let points = random_points(300, 42);
    let mut mesh = triangulate(&points, Behavior::default()).unwrap();
    assert!(mesh.is_consistent());
    assert!(mesh.is_delaunay());
}

#[test]
fn test_euler_relation_holds() {
    for seed in [1u64, 2, 3] {
        let points = random_points(150, seed);
        let mesh = triangulate(&points, Behavior::default()).unwrap();
        let v = mesh.num_vertices();
        let e = mesh.num_edges();
        let t = mesh.num_triangles();
        let h = mesh.hullsize();
        // V - E + T = 1 for a triangulated disk, and each interior edge is
        // shared by two triangles
        assert_eq!(v + t, e + 1, "seed {seed}");
        assert_eq!(2 * e, 3 * t + h, "seed {seed}");
    }
}

#[test]
fn test_triangle_list_has_no_degenerates() {
    let points = random_points(100, 9);
    let mesh = triangulate(&points, Behavior::default()).unwrap();
    let mut seen = HashSet::new();
    for tri in mesh.triangle_list() {
        assert!(tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2]);
        let mut key = tri;
        key.sort_by_key(|v| v.0);
        assert!(seen.insert(key), "duplicate triangle {key:?}");
    }
}

#[test]
fn test_all_edges_reported_once() {
    let points = random_points(80, 5);
    let mesh = triangulate(&points, Behavior::default()).unwrap();
    let edges = mesh.edges();
    let mut seen = HashSet::new();
    for (a, b) in &edges {
        let key = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        assert!(seen.insert(key), "edge {key:?} listed twice");
    }
    assert_eq!(edges.len(), mesh.num_edges());
}

#[test]
fn test_linear_renumbering_is_a_permutation() {
    let points = random_points(60, 17);
    let mut mesh = triangulate(&points, Behavior::default()).unwrap();
    mesh.renumber(NodeNumbering::Linear);
    let mut ids: Vec<i32> = mesh.live_vertices().map(|(_, v)| v.id).collect();
    ids.sort_unstable();
    let expected: Vec<i32> = (0..ids.len() as i32).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_cuthill_mckee_renumbering_is_a_permutation() {
    let points = random_points(60, 23);
    let mut mesh = triangulate(&points, Behavior::default()).unwrap();
    mesh.renumber(NodeNumbering::CuthillMcKee);
    let mut ids: Vec<i32> = mesh.live_vertices().map(|(_, v)| v.id).collect();
    ids.sort_unstable();
    let expected: Vec<i32> = (0..ids.len() as i32).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_grid_input_with_many_cocircular_points() {
    // a regular grid makes every quad cocircular, stressing the exact
    // in-circle path and the symbolic tie-breaking
    let mut points = Vec::new();
    for i in 0..8 {
        for j in 0..8 {
            points.push(Point::new(i as f64, j as f64));
        }
    }
    let mut mesh = triangulate(&points, Behavior::default()).unwrap();
    assert!(mesh.is_consistent());
    assert_eq!(mesh.num_vertices(), 64);
    assert_eq!(mesh.hullsize(), 28);
    // 2 * (n - 1)^2 triangles for an n x n grid
    assert_eq!(mesh.num_triangles(), 98);
}

#[test]
fn test_the_hull_is_wrapped_in_segments() {
    let points = random_points(80, 11);
    let mesh = triangulate(&points, Behavior::default()).unwrap();
    // one subsegment per hull edge, none in the interior
    assert_eq!(mesh.num_segments(), mesh.hullsize());
}

#[test]
fn test_bounds_cover_all_input() {
    let points = random_points(40, 3);
    let mesh = triangulate(&points, Behavior::default()).unwrap();
    let bounds = mesh.bounds();
    for p in &points {
        assert!(bounds.contains(p.x, p.y));
    }
}

#[test]
fn test_user_ids_survive_when_distinct() {
    let mut points = vec![
        Point::new(0.0, 0.0),
        Point::new(3.0, 0.0),
        Point::new(3.0, 3.0),
        Point::new(0.0, 3.0),
    ];
    for (i, p) in points.iter_mut().enumerate() {
        p.id = 10 + i as i32;
    }
    let mesh = triangulate(&points, Behavior::default()).unwrap();
    let ids: HashSet<i32> = mesh.live_vertices().map(|(_, v)| v.id).collect();
    assert_eq!(ids, HashSet::from([10, 11, 12, 13]));
}
