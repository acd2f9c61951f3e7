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
use crate::geometry::point::{Point, Vertex, squared_distance};
use crate::kernel::predicates::Predicates;
use crate::mesh::pool::TrianglePool;
use crate::mesh::sampler::TriangleSampler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateResult {
    InTriangle,
    OnEdge,
    OnVertex,
    Outside,
}

/// Jump-and-walk point location: pick the best of the most recently touched
/// triangle and a handful of sampled ones, then walk by orientation tests.
#[derive(Debug, Default)]
pub struct TriangleLocator {
    pub recent_tri: OTri,
    sampler: TriangleSampler,
}

impl TriangleLocator {
    pub fn new() -> Self {
        TriangleLocator {
            recent_tri: OTri::none(),
            sampler: TriangleSampler::new(),
        }
    }

    /// Remember `otri` as the walk seed for the next query.
    pub fn update(&mut self, otri: OTri) {
        self.recent_tri = otri;
    }

    pub fn reset(&mut self) {
        self.sampler.reset();
        self.recent_tri = OTri::none();
    }

    /// Walk from `search_tri` towards `search_point`, leaving `search_tri` on
    /// the triangle (or edge, or vertex) that contains it. The starting
    /// triangle's origin-destination edge must have the point on its left.
    pub fn precise_locate(
        &self,
        pool: &TrianglePool,
        vertices: &[Vertex],
        predicates: &Predicates,
        checksegments: bool,
        search_point: &Point,
        search_tri: &mut OTri,
        stop_at_subsegment: bool,
        no_exact: bool,
    ) -> LocateResult {
        let mut f_org = &vertices[search_tri.org(pool).index()];
        let mut f_dest = &vertices[search_tri.dest(pool).index()];
        let mut f_apex = &vertices[search_tri.apex(pool).index()];
        loop {
            if f_apex.x == search_point.x && f_apex.y == search_point.y {
                *search_tri = search_tri.lprev();
                return LocateResult::OnVertex;
            }
            // which of the edges org->apex, apex->dest does the walk exit by?
            let dest_orient =
                predicates.counter_clockwise(&f_org.point(), &f_apex.point(), search_point, no_exact);
            let org_orient =
                predicates.counter_clockwise(&f_apex.point(), &f_dest.point(), search_point, no_exact);
            let move_left;
            if dest_orient > 0.0 {
                if org_orient > 0.0 {
                    move_left = (f_apex.x - search_point.x) * (f_dest.x - f_org.x)
                        + (f_apex.y - search_point.y) * (f_dest.y - f_org.y)
                        > 0.0;
                } else {
                    move_left = true;
                }
            } else if org_orient > 0.0 {
                move_left = false;
            } else {
                if dest_orient == 0.0 {
                    *search_tri = search_tri.lprev();
                    return LocateResult::OnEdge;
                }
                if org_orient == 0.0 {
                    *search_tri = search_tri.lnext();
                    return LocateResult::OnEdge;
                }
                return LocateResult::InTriangle;
            }
            let back_track_tri;
            if move_left {
                back_track_tri = search_tri.lprev();
                f_dest = f_apex;
            } else {
                back_track_tri = search_tri.lnext();
                f_org = f_apex;
            }
            *search_tri = back_track_tri.sym(pool);
            if checksegments && stop_at_subsegment {
                let check_edge = back_track_tri.pivot(pool);
                if !check_edge.seg.is_dummy() {
                    *search_tri = back_track_tri;
                    return LocateResult::Outside;
                }
            }
            if search_tri.tri.is_dummy() {
                *search_tri = back_track_tri;
                return LocateResult::Outside;
            }
            f_apex = &vertices[search_tri.apex(pool).index()];
        }
    }

    /// Locate `search_point` starting from scratch: seed from the recent
    /// triangle and a random sample, orient, and walk.
    pub fn locate(
        &mut self,
        pool: &TrianglePool,
        vertices: &[Vertex],
        predicates: &Predicates,
        checksegments: bool,
        search_point: &Point,
        search_tri: &mut OTri,
        no_exact: bool,
    ) -> LocateResult {
        let mut t_org = &vertices[search_tri.org(pool).index()];
        let mut search_dist = squared_distance(search_point.x, search_point.y, t_org.x, t_org.y);

        if !self.recent_tri.tri.is_dummy() && !pool[self.recent_tri.tri].is_dead() {
            t_org = &vertices[self.recent_tri.org(pool).index()];
            if t_org.x == search_point.x && t_org.y == search_point.y {
                *search_tri = self.recent_tri;
                return LocateResult::OnVertex;
            }
            let dist = squared_distance(search_point.x, search_point.y, t_org.x, t_org.y);
            if dist < search_dist {
                *search_tri = self.recent_tri;
                search_dist = dist;
            }
        }

        self.sampler.update(pool);
        for &t in self.sampler.sample(pool) {
            let sample_tri = OTri::new(t, 0);
            if !pool[t].is_dead() {
                t_org = &vertices[sample_tri.org(pool).index()];
                let dist = squared_distance(search_point.x, search_point.y, t_org.x, t_org.y);
                if dist < search_dist {
                    *search_tri = sample_tri;
                    search_dist = dist;
                }
            }
        }

        let t_org = &vertices[search_tri.org(pool).index()];
        let t_dest = &vertices[search_tri.dest(pool).index()];
        if t_org.x == search_point.x && t_org.y == search_point.y {
            return LocateResult::OnVertex;
        }
        if t_dest.x == search_point.x && t_dest.y == search_point.y {
            *search_tri = search_tri.lnext();
            return LocateResult::OnVertex;
        }

        let ahead =
            predicates.counter_clockwise(&t_org.point(), &t_dest.point(), search_point, no_exact);
        if ahead < 0.0 {
            // point is to the right of the seed edge, start from the mirror
            *search_tri = search_tri.sym(pool);
        } else if ahead == 0.0
            && ((t_org.x < search_point.x) == (search_point.x < t_dest.x))
            && ((t_org.y < search_point.y) == (search_point.y < t_dest.y))
        {
            return LocateResult::OnEdge;
        }
        self.precise_locate(
            pool,
            vertices,
            predicates,
            checksegments,
            search_point,
            search_tri,
            false,
            no_exact,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::Behavior;
    use crate::mesh::mesh::Mesh;
    use crate::meshing::triangulate;

    fn grid_mesh() -> Mesh {
        let mut points = Vec::new();
        for i in 0..4 {
            for j in 0..4 {
                points.push(Point::new(i as f64, j as f64));
            }
        }
        triangulate(&points, Behavior::default()).unwrap()
    }

    fn centroid(mesh: &Mesh, t: OTri) -> Point {
        let a = &mesh.vertices[t.org(&mesh.triangles).index()];
        let b = &mesh.vertices[t.dest(&mesh.triangles).index()];
        let c = &mesh.vertices[t.apex(&mesh.triangles).index()];
        Point::new((a.x + b.x + c.x) / 3.0, (a.y + b.y + c.y) / 3.0)
    }

    #[test]
    fn centroids_locate_inside_their_own_triangle() {
        let mut mesh = grid_mesh();
        let refs: Vec<_> = mesh.triangles.refs().collect();
        let seed = OTri::new(refs[0], 0);
        for r in refs {
            let target = OTri::new(r, 0);
            let point = centroid(&mesh, target);
            let mut found = seed;
            let result = mesh.locator.locate(
                &mesh.triangles,
                &mesh.vertices,
                &mesh.predicates,
                false,
                &point,
                &mut found,
                false,
            );
            assert_eq!(result, LocateResult::InTriangle);
            assert_eq!(found.tri, r);
        }
    }

    #[test]
    fn a_corner_locates_on_the_vertex() {
        let mut mesh = grid_mesh();
        let seed = OTri::new(mesh.triangles.refs().next().unwrap(), 0);
        let corner = mesh.vertices[seed.org(&mesh.triangles).index()].point();
        let mut found = seed;
        let result = mesh.locator.locate(
            &mesh.triangles,
            &mesh.vertices,
            &mesh.predicates,
            false,
            &corner,
            &mut found,
            false,
        );
        assert_eq!(result, LocateResult::OnVertex);
    }

    #[test]
    fn an_edge_midpoint_locates_on_the_edge() {
        let mut mesh = grid_mesh();
        let seed = OTri::new(mesh.triangles.refs().next().unwrap(), 0);
        let a = mesh.vertices[seed.org(&mesh.triangles).index()].point();
        let b = mesh.vertices[seed.dest(&mesh.triangles).index()].point();
        let mid = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        let mut found = seed;
        let result = mesh.locator.locate(
            &mesh.triangles,
            &mesh.vertices,
            &mesh.predicates,
            false,
            &mid,
            &mut found,
            false,
        );
        assert_eq!(result, LocateResult::OnEdge);
    }

    #[test]
    fn a_point_beyond_the_hull_is_outside() {
        let mut mesh = grid_mesh();
        let seed = OTri::new(mesh.triangles.refs().next().unwrap(), 0);
        let mut found = seed;
        let result = mesh.locator.locate(
            &mesh.triangles,
            &mesh.vertices,
            &mesh.predicates,
            false,
            &Point::new(100.0, 100.0),
            &mut found,
            false,
        );
        assert_eq!(result, LocateResult::Outside);
    }

    #[test]
    fn the_recent_triangle_seeds_the_next_walk() {
        let mut mesh = grid_mesh();
        let refs: Vec<_> = mesh.triangles.refs().collect();
        let target = OTri::new(*refs.last().unwrap(), 0);
        mesh.locator.update(target);
        let point = centroid(&mesh, target);
        let mut found = OTri::new(refs[0], 0);
        let result = mesh.locator.locate(
            &mesh.triangles,
            &mesh.vertices,
            &mesh.predicates,
            false,
            &point,
            &mut found,
            false,
        );
        assert_eq!(result, LocateResult::InTriangle);
        assert_eq!(found.tri, target.tri);
    }
}
