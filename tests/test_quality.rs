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

use trigon::behavior::Behavior;
use trigon::geometry::Point;
use trigon::mesh::Mesh;
use trigon::meshing::{QualityOptions, triangulate};

fn unit_square() -> Mesh {
    let points = vec![
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(0.0, 1.0),
    ];
    triangulate(&points, Behavior::default()).unwrap()
}

fn triangle_areas(mesh: &Mesh) -> Vec<f64> {
    mesh.triangle_list()
        .iter()
        .map(|tri| {
            let a = mesh.vertex(tri[0]);
            let b = mesh.vertex(tri[1]);
            let c = mesh.vertex(tri[2]);
            0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs()
        })
        .collect()
}

#[test]
fn test_refine_meets_a_minimum_angle_bound() {
    let mut mesh = unit_square();
    let quality = QualityOptions {
        minimum_angle: 20.0,
        maximum_area: 0.05,
        ..Default::default()
    };
    mesh.refine(&quality, false).unwrap();
    assert!(mesh.is_consistent());
    // splits on boundary segments need only the constrained property
    assert!(mesh.is_constrained_delaunay());
    let (min_angle, _) = mesh.quality_statistics();
    assert!(min_angle >= 20.0 - 1e-9, "smallest angle {min_angle}");
}

#[test]
fn test_refine_respects_the_area_constraint() {
    let mut mesh = unit_square();
    let before = mesh.num_triangles();
    let quality = QualityOptions {
        minimum_angle: 20.0,
        maximum_area: 0.02,
        ..Default::default()
    };
    mesh.refine(&quality, false).unwrap();
    assert!(mesh.num_triangles() > before);
    for area in triangle_areas(&mesh) {
        assert!(area <= 0.02 + 1e-12, "area {area}");
    }
}

#[test]
fn test_refine_with_a_maximum_angle_bound() {
    let mut mesh = unit_square();
    let quality = QualityOptions {
        minimum_angle: 20.0,
        maximum_angle: 140.0,
        maximum_area: 0.05,
        ..Default::default()
    };
    mesh.refine(&quality, false).unwrap();
    assert!(mesh.is_consistent());
    let (min_angle, max_angle) = mesh.quality_statistics();
    assert!(min_angle >= 20.0 - 1e-9, "smallest angle {min_angle}");
    assert!(max_angle <= 140.0 + 1e-9, "largest angle {max_angle}");
}

#[test]
fn test_steiner_point_budget_is_honored() {
    let mut mesh = unit_square();
    let before = mesh.num_vertices();
    let quality = QualityOptions {
        minimum_angle: 30.0,
        maximum_area: 0.001,
        steiner_points: 5,
        ..Default::default()
    };
    mesh.refine(&quality, false).unwrap();
    assert!(mesh.num_vertices() <= before + 5);
}

#[test]
fn test_user_test_drives_splitting() {
    fn split_big(tri: &trigon::geometry::Triangle, area: f64) -> bool {
        let _ = tri;
        area > 0.1
    }
    let mut mesh = unit_square();
    let quality = QualityOptions {
        user_test: Some(split_big),
        ..Default::default()
    };
    mesh.refine(&quality, false).unwrap();
    assert!(mesh.is_consistent());
    for area in triangle_areas(&mesh) {
        assert!(area <= 0.1 + 1e-12, "area {area}");
    }
}

#[test]
fn test_conforming_refinement_stays_delaunay() {
    let mut mesh = unit_square();
    let quality = QualityOptions {
        minimum_angle: 25.0,
        maximum_area: 0.05,
        ..Default::default()
    };
    mesh.refine(&quality, true).unwrap();
    assert!(mesh.is_consistent());
    assert!(mesh.is_delaunay());
}

#[test]
fn test_refinement_never_leaves_the_hull() {
    let mut mesh = unit_square();
    let bounds = mesh.bounds();
    let quality = QualityOptions {
        minimum_angle: 25.0,
        maximum_area: 0.02,
        ..Default::default()
    };
    mesh.refine(&quality, false).unwrap();
    assert!(mesh.num_segments() >= mesh.hullsize());
    for (_, v) in mesh.live_vertices() {
        assert!(bounds.contains(v.x, v.y), "vertex ({}, {}) escaped", v.x, v.y);
    }
}

#[test]
fn test_refinement_of_a_skewed_point_set() {
    // a thin wedge of points produces very bad initial angles, and the
    // sharp hull corner is an input angle no refinement can open up
    let mut points = vec![Point::new(0.0, 0.0), Point::new(8.0, 0.0)];
    for i in 1..8 {
        points.push(Point::new(i as f64, 0.02 * i as f64));
    }
    let mut mesh = triangulate(&points, Behavior::default()).unwrap();
    let bounds = mesh.bounds();
    let quality = QualityOptions {
        minimum_angle: 15.0,
        ..Default::default()
    };
    mesh.refine(&quality, false).unwrap();
    assert!(mesh.is_consistent());
    assert!(mesh.num_segments() >= mesh.hullsize());
    // the boundary segments pin every Steiner point inside the wedge
    for (_, v) in mesh.live_vertices() {
        assert!(bounds.contains(v.x, v.y), "vertex ({}, {}) escaped", v.x, v.y);
    }
    let (min_angle, _) = mesh.quality_statistics();
    assert!(min_angle > 0.0);
}
