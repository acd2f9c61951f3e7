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

//! Incremental Delaunay triangulation.
//!
//! The input is first enclosed in a huge triangle whose corners dominate
//! every input point, so each insertion lands inside the existing
//! triangulation and no special hull-growing cases arise. After all points
//! are in, the enclosing triangle is peeled away, leaving the convex hull.

use crate::behavior::Behavior;
use crate::geometry::otri::{OTri, TriRef};
use crate::geometry::point::{Point, VId, VertexKind};
use crate::mesh::mesh::{InsertVertexResult, Mesh};

/// Delaunay-triangulate `points`. Duplicate locations are kept in the vertex
/// arena but excluded from the triangulation.
pub fn triangulate(points: &[Point], behavior: Behavior) -> Result<Mesh, &'static str> {
    let mut mesh = Mesh::new(behavior);
    mesh.transfer_nodes(points)?;
    let n_input = mesh.vertices.len();
    get_bounding_box(&mut mesh);
    let no_exact = mesh.behavior.disable_exact_math;
    for i in 0..n_input {
        let mut start_tri = OTri::none();
        let result = mesh.insert_vertex(
            VId(i as i32),
            &mut start_tri,
            None,
            false,
            false,
            no_exact,
            None,
        );
        if result == InsertVertexResult::Duplicate {
            mesh.vertices[i].kind = VertexKind::Undead;
            mesh.undeads += 1;
        }
    }
    mesh.hullsize = remove_box(&mut mesh);
    mesh.vertex_dealloc(mesh.infvertex1);
    mesh.vertex_dealloc(mesh.infvertex2);
    mesh.vertex_dealloc(mesh.infvertex3);
    if mesh.behavior.use_segments {
        mesh.checksegments = true;
        // with no input segments the skeleton is just the hull
        if mesh.behavior.convex || !mesh.behavior.planar_straight_line_graph {
            mesh.mark_hull();
        }
    }
    Ok(mesh)
}

/// Create the enclosing triangle. Its corners are placed far enough out that
/// no input point's circumcircle can reach them.
fn get_bounding_box(mesh: &mut Mesh) {
    let bounds = mesh.bounds();
    let mut width = bounds.width();
    if bounds.height() > width {
        width = bounds.height();
    }
    if width == 0.0 {
        width = 1.0;
    }
    mesh.infvertex1 = mesh.add_vertex(
        bounds.left - 50.0 * width,
        bounds.bottom - 40.0 * width,
        0,
        VertexKind::Input,
    );
    mesh.infvertex2 = mesh.add_vertex(
        bounds.right + 50.0 * width,
        bounds.bottom - 40.0 * width,
        0,
        VertexKind::Input,
    );
    mesh.infvertex3 = mesh.add_vertex(
        0.5 * (bounds.left + bounds.right),
        bounds.top + 60.0 * width,
        0,
        VertexKind::Input,
    );
    let infinity_tri = mesh.make_triangle();
    infinity_tri.set_org(&mut mesh.triangles, mesh.infvertex1);
    infinity_tri.set_dest(&mut mesh.triangles, mesh.infvertex2);
    infinity_tri.set_apex(&mut mesh.triangles, mesh.infvertex3);
    // the dummy's first neighbor doubles as the entry point onto the hull
    mesh.triangles[TriRef::DUMMY].neighbors[0] = infinity_tri;
}

/// Remove the enclosing triangle's corners and every triangle incident to
/// them, walking the hull once. Returns the number of hull edges left.
fn remove_box(mesh: &mut Mesh) -> i32 {
    let no_poly = !mesh.behavior.planar_straight_line_graph;
    // find the two hull edges flanking an enclosing-triangle corner, one to
    // start the walk and one to stop at
    let mut next_edge = OTri::none().sym(&mesh.triangles);
    let final_edge = next_edge.lprev();
    next_edge = next_edge.lnext();
    next_edge = next_edge.sym(&mesh.triangles);
    let mut search_edge = next_edge.lprev();
    search_edge = search_edge.sym(&mesh.triangles);
    let mut check_edge = next_edge.lnext();
    check_edge = check_edge.sym(&mesh.triangles);
    if check_edge.tri.is_dummy() {
        search_edge = search_edge.lprev();
        search_edge = search_edge.sym(&mesh.triangles);
    }
    mesh.triangles[TriRef::DUMMY].neighbors[0] = search_edge;
    let mut hull_size = -2;
    while next_edge != final_edge {
        hull_size += 1;
        let mut dissolve_edge = next_edge.lprev();
        dissolve_edge = dissolve_edge.sym(&mesh.triangles);
        // vertices freshly exposed on the hull get the boundary marker
        if no_poly && !dissolve_edge.tri.is_dummy() {
            let mark_org = dissolve_edge.org(&mesh.triangles);
            if mesh.vertices[mark_org.index()].label == 0 {
                mesh.vertices[mark_org.index()].label = 1;
            }
        }
        dissolve_edge.dissolve(&mut mesh.triangles);
        let dead_triangle = next_edge.lnext();
        next_edge = dead_triangle.sym(&mesh.triangles);
        mesh.triangle_dealloc(dead_triangle.tri);
        if next_edge.tri.is_dummy() {
            next_edge = dissolve_edge;
        }
    }
    mesh.triangle_dealloc(final_edge.tri);
    hull_size
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]
    }

    #[test]
    fn square_triangulates_into_two_triangles() {
        let mesh = triangulate(&square(), Behavior::default()).unwrap();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_triangles(), 2);
        assert_eq!(mesh.hullsize(), 4);
        assert_eq!(mesh.num_edges(), 5);
    }

    #[test]
    fn triangulation_is_consistent_and_delaunay() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.1),
            Point::new(1.3, 1.7),
            Point::new(0.2, 1.1),
            Point::new(1.0, 0.6),
            Point::new(1.8, 1.2),
        ];
        let mut mesh = triangulate(&points, Behavior::default()).unwrap();
        assert!(mesh.is_consistent());
        assert!(mesh.is_delaunay());
    }

    #[test]
    fn duplicate_points_are_ignored() {
        let mut points = square();
        points.push(Point::new(1.0, 0.0));
        let mut mesh = triangulate(&points, Behavior::default()).unwrap();
        assert_eq!(mesh.num_triangles(), 2);
        assert_eq!(mesh.num_vertices(), 5);
        mesh.cleanup();
        assert_eq!(mesh.num_vertices(), 4);
    }

    #[test]
    fn fewer_than_three_points_is_an_error() {
        let points = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)];
        assert!(triangulate(&points, Behavior::default()).is_err());
    }

    #[test]
    fn collinear_input_still_has_a_hull() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(1.5, 2.0),
        ];
        let mut mesh = triangulate(&points, Behavior::default()).unwrap();
        assert!(mesh.is_consistent());
        assert_eq!(mesh.num_triangles(), 3);
    }
}
