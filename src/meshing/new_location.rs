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

//! Steiner point placement for quality refinement, after Erten and Üngör.
//!
//! Instead of always inserting the circumcenter of a skinny triangle, the
//! placer first tries the off-center, then tries to *relocate* one of the
//! triangle's free corners inside the intersection of the petals and wedges
//! of its star polygon, and only falls back to a perturbed petal/Voronoi
//! intersection point. Fewer Steiner points survive to the final mesh this
//! way, at the cost of a fair amount of plane geometry below.

use std::f64::consts::PI;

use crate::behavior::Behavior;
use crate::geometry::otri::OTri;
use crate::geometry::point::{Point, VertexKind, squared_distance};
use crate::mesh::locator::LocateResult;
use crate::mesh::mesh::Mesh;

// Coordinate comparisons in the star walk treat anything closer than this as
// the same point.
const EPS: f64 = 1e-50;
// How far a rejected intersection point is nudged back towards the
// circumcenter, in units of the shortest edge length.
const PERT_CONST: f64 = 0.06;
const LENGTH_CONST: f64 = 1.0;
const JUST_ACUTE: f64 = 1.0;

/// Scratch buffers for the wedge intersection are kept across calls; the
/// refinement loop asks for thousands of locations per run.
pub(crate) struct NewLocation {
    petalx: Vec<f64>,
    petaly: Vec<f64>,
    petalr: Vec<f64>,
    wedges: Vec<f64>,
    initial_convex_poly: [f64; 500],
    points_p: Vec<f64>,
    points_q: Vec<f64>,
    points_r: Vec<f64>,
    poly1: [f64; 100],
    poly2: [f64; 100],
}

impl NewLocation {
    pub(crate) fn new() -> Self {
        NewLocation {
            petalx: vec![0.0; 20],
            petaly: vec![0.0; 20],
            petalr: vec![0.0; 20],
            wedges: vec![0.0; 500],
            initial_convex_poly: [0.0; 500],
            points_p: Vec::new(),
            points_q: Vec::new(),
            points_r: Vec::new(),
            poly1: [0.0; 100],
            poly2: [0.0; 100],
        }
    }

    /// Pick the point at which `badotri` should be split. `org`, `dest` and
    /// `apex` are the corners of `badotri`; `xi` and `eta` receive the
    /// location in the triangle's barycentric-like frame so the caller can
    /// steer its walk. May delete a free vertex of the mesh when relocation
    /// succeeds.
    pub(crate) fn find_location(
        &mut self,
        mesh: &mut Mesh,
        org: &Point,
        dest: &Point,
        apex: &Point,
        xi: &mut f64,
        eta: &mut f64,
        badotri: OTri,
        no_exact: bool,
    ) -> Point {
        if mesh.behavior.max_angle() == 0.0 {
            self.find_new_location_without_max_angle(
                mesh, org, dest, apex, xi, eta, true, badotri, no_exact,
            )
        } else {
            self.find_new_location(mesh, org, dest, apex, xi, eta, true, badotri, no_exact)
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn find_new_location_without_max_angle(
        &mut self,
        mesh: &mut Mesh,
        torg: &Point,
        tdest: &Point,
        tapex: &Point,
        xi: &mut f64,
        eta: &mut f64,
        offcenter: bool,
        badotri: OTri,
        no_exact: bool,
    ) -> Point {
        let offconstant = mesh.behavior.off_constant;
        mesh.predicates
            .circumcenter_count
            .set(mesh.predicates.circumcenter_count.get() + 1);

        let xdo = tdest.x - torg.x;
        let ydo = tdest.y - torg.y;
        let xao = tapex.x - torg.x;
        let yao = tapex.y - torg.y;
        let xda = tapex.x - tdest.x;
        let yda = tapex.y - tdest.y;
        let dodist = xdo * xdo + ydo * ydo;
        let aodist = xao * xao + yao * yao;
        let dadist = squared_distance(tdest.x, tdest.y, tapex.x, tapex.y);
        let denominator = if no_exact {
            0.5 / (xdo * yao - xao * ydo)
        } else {
            // the tally already counts one circumcenter computation, so the
            // orientation test inside it is not billed separately
            let d = 0.5 / mesh.predicates.counter_clockwise(tdest, tapex, torg, no_exact);
            mesh.predicates
                .counter_clockwise_count
                .set(mesh.predicates.counter_clockwise_count.get() - 1);
            d
        };
        let mut dx = (yao * dodist - ydo * aodist) * denominator;
        let mut dy = (xdo * aodist - xao * dodist) * denominator;
        let my_circumcenter = Point::new(torg.x + dx, torg.y + dy);
        let delotri = badotri;

        let orientation = longest_shortest_edge(aodist, dadist, dodist);
        let (
            x_shortest_edge,
            y_shortest_edge,
            shortest_edge_dist,
            middle_edge_dist,
            longest_edge_dist,
            smallest_angle_corner,
            middle_angle_corner,
            largest_angle_corner,
        ) = match orientation {
            123 => (xao, yao, aodist, dadist, dodist, tdest, torg, tapex),
            132 => (xao, yao, aodist, dodist, dadist, tdest, tapex, torg),
            213 => (xda, yda, dadist, aodist, dodist, torg, tdest, tapex),
            231 => (xda, yda, dadist, dodist, aodist, torg, tapex, tdest),
            312 => (xdo, ydo, dodist, aodist, dadist, tapex, tdest, torg),
            _ => (xdo, ydo, dodist, dadist, aodist, tapex, torg, tdest),
        };

        let mut almost_good = false;
        if offcenter && offconstant > 0.0 {
            if orientation == 213 || orientation == 231 {
                let dxoff = 0.5 * x_shortest_edge - offconstant * y_shortest_edge;
                let dyoff = 0.5 * y_shortest_edge + offconstant * x_shortest_edge;
                // the shortest edge hangs off org; compare against the
                // circumcenter as seen from dest
                if dxoff * dxoff + dyoff * dyoff
                    < (dx - xdo) * (dx - xdo) + (dy - ydo) * (dy - ydo)
                {
                    dx = xdo + dxoff;
                    dy = ydo + dyoff;
                } else {
                    almost_good = true;
                }
            } else if orientation == 123 || orientation == 132 {
                let dxoff = 0.5 * x_shortest_edge + offconstant * y_shortest_edge;
                let dyoff = 0.5 * y_shortest_edge - offconstant * x_shortest_edge;
                if dxoff * dxoff + dyoff * dyoff < dx * dx + dy * dy {
                    dx = dxoff;
                    dy = dyoff;
                } else {
                    almost_good = true;
                }
            } else {
                let dxoff = 0.5 * x_shortest_edge - offconstant * y_shortest_edge;
                let dyoff = 0.5 * y_shortest_edge + offconstant * x_shortest_edge;
                if dxoff * dxoff + dyoff * dyoff < dx * dx + dy * dy {
                    dx = dxoff;
                    dy = dyoff;
                } else {
                    almost_good = true;
                }
            }
        }

        let mut relocated = 0;
        let mut origin_x = 0.0;
        let mut origin_y = 0.0;
        if almost_good {
            let cos_max_angle = (middle_edge_dist + shortest_edge_dist - longest_edge_dist)
                / (2.0 * middle_edge_dist.sqrt() * shortest_edge_dist.sqrt());
            let is_obtuse = cos_max_angle < 0.0 || cos_max_angle.abs() <= EPS;
            let mut newloc = [0.0f64; 2];
            relocated = self.do_smoothing(mesh, delotri, torg, tdest, tapex, &mut newloc);
            if relocated > 0 {
                dx = newloc[0] - torg.x;
                dy = newloc[1] - torg.y;
                origin_x = torg.x;
                origin_y = torg.y;
                match relocated {
                    1 => mesh.delete_vertex(delotri, no_exact, None),
                    2 => mesh.delete_vertex(delotri.lnext(), no_exact, None),
                    3 => mesh.delete_vertex(delotri.lprev(), no_exact, None),
                    _ => {}
                }
            } else {
                let behavior = &mesh.behavior;
                let petal_radius = shortest_edge_dist.sqrt()
                    / (2.0 * (behavior.min_angle() * PI / 180.0).sin());
                let x_mid_of_shortest_edge =
                    (middle_angle_corner.x + largest_angle_corner.x) / 2.0;
                let y_mid_of_shortest_edge =
                    (middle_angle_corner.y + largest_angle_corner.y) / 2.0;
                let half_chord =
                    (petal_radius * petal_radius - shortest_edge_dist / 4.0).sqrt();
                let x_petal_ctr_1 = x_mid_of_shortest_edge
                    + half_chord * (middle_angle_corner.y - largest_angle_corner.y)
                        / shortest_edge_dist.sqrt();
                let y_petal_ctr_1 = y_mid_of_shortest_edge
                    + half_chord * (largest_angle_corner.x - middle_angle_corner.x)
                        / shortest_edge_dist.sqrt();
                let x_petal_ctr_2 = x_mid_of_shortest_edge
                    - half_chord * (middle_angle_corner.y - largest_angle_corner.y)
                        / shortest_edge_dist.sqrt();
                let y_petal_ctr_2 = y_mid_of_shortest_edge
                    - half_chord * (largest_angle_corner.x - middle_angle_corner.x)
                        / shortest_edge_dist.sqrt();
                // of the two candidate petal centers, take the one on the
                // smallest-angle corner's side
                let (x_petal_ctr, y_petal_ctr) = if squared_distance(
                    x_petal_ctr_1,
                    y_petal_ctr_1,
                    smallest_angle_corner.x,
                    smallest_angle_corner.y,
                ) <= squared_distance(
                    x_petal_ctr_2,
                    y_petal_ctr_2,
                    smallest_angle_corner.x,
                    smallest_angle_corner.y,
                ) {
                    (x_petal_ctr_1, y_petal_ctr_1)
                } else {
                    (x_petal_ctr_2, y_petal_ctr_2)
                };

                let mut third_point = [0.0f64; 2];
                let mut neighborotri = OTri::none();
                let mut p = [0.0f64; 5];
                let mut voronoi_or_inter = [0.0f64; 4];

                // first suggestion: walk across the longest edge
                let neighbor_not_found = Self::get_neighbors_vertex(
                    mesh,
                    badotri,
                    middle_angle_corner.x,
                    middle_angle_corner.y,
                    smallest_angle_corner.x,
                    smallest_angle_corner.y,
                    &mut third_point,
                    &mut neighborotri,
                );
                let mut dx_first_suggestion = dx;
                let mut dy_first_suggestion = dy;
                if !neighbor_not_found {
                    let nv1 = mesh.vertices
                        [neighborotri.org(&mesh.triangles).index()]
                    .point();
                    let nv2 = mesh.vertices
                        [neighborotri.dest(&mesh.triangles).index()]
                    .point();
                    let nv3 = mesh.vertices
                        [neighborotri.apex(&mesh.triangles).index()]
                    .point();
                    let neighbor_circumcenter = mesh
                        .predicates
                        .find_circumcenter(&nv1, &nv2, &nv3, xi, eta, no_exact);
                    let vector_x =
                        middle_angle_corner.y - smallest_angle_corner.y + my_circumcenter.x;
                    let vector_y =
                        smallest_angle_corner.x - middle_angle_corner.x + my_circumcenter.y;
                    circle_line_intersection(
                        my_circumcenter.x,
                        my_circumcenter.y,
                        vector_x,
                        vector_y,
                        x_petal_ctr,
                        y_petal_ctr,
                        petal_radius,
                        &mut p,
                    );
                    let x_mid_of_longest_edge =
                        (middle_angle_corner.x + smallest_angle_corner.x) / 2.0;
                    let y_mid_of_longest_edge =
                        (middle_angle_corner.y + smallest_angle_corner.y) / 2.0;
                    let is_correct = choose_correct_point(
                        x_mid_of_longest_edge,
                        y_mid_of_longest_edge,
                        p[3],
                        p[4],
                        my_circumcenter.x,
                        my_circumcenter.y,
                        is_obtuse,
                    );
                    let (mut inter_x, mut inter_y) = if is_correct {
                        (p[3], p[4])
                    } else {
                        (p[1], p[2])
                    };
                    point_between_points(
                        inter_x,
                        inter_y,
                        my_circumcenter.x,
                        my_circumcenter.y,
                        neighbor_circumcenter.x,
                        neighbor_circumcenter.y,
                        &mut voronoi_or_inter,
                    );
                    if p[0] > 0.0 {
                        if (voronoi_or_inter[0] - 1.0).abs() <= EPS {
                            // the Voronoi vertex lies between; take it unless
                            // the neighbor's circumcenter would again make a
                            // bad triangle with the longest edge
                            if is_bad_triangle_angle(
                                behavior,
                                middle_angle_corner.x,
                                middle_angle_corner.y,
                                largest_angle_corner.x,
                                largest_angle_corner.y,
                                neighbor_circumcenter.x,
                                neighbor_circumcenter.y,
                            ) {
                                dx_first_suggestion = dx;
                                dy_first_suggestion = dy;
                            } else {
                                dx_first_suggestion = voronoi_or_inter[2] - torg.x;
                                dy_first_suggestion = voronoi_or_inter[3] - torg.y;
                            }
                        } else if is_bad_triangle_angle(
                            behavior,
                            largest_angle_corner.x,
                            largest_angle_corner.y,
                            middle_angle_corner.x,
                            middle_angle_corner.y,
                            inter_x,
                            inter_y,
                        ) {
                            let d = squared_distance(
                                inter_x,
                                inter_y,
                                my_circumcenter.x,
                                my_circumcenter.y,
                            )
                            .sqrt();
                            let ax = (my_circumcenter.x - inter_x) / d;
                            let ay = (my_circumcenter.y - inter_y) / d;
                            inter_x += ax * PERT_CONST * shortest_edge_dist.sqrt();
                            inter_y += ay * PERT_CONST * shortest_edge_dist.sqrt();
                            if is_bad_triangle_angle(
                                behavior,
                                middle_angle_corner.x,
                                middle_angle_corner.y,
                                largest_angle_corner.x,
                                largest_angle_corner.y,
                                inter_x,
                                inter_y,
                            ) {
                                dx_first_suggestion = dx;
                                dy_first_suggestion = dy;
                            } else {
                                dx_first_suggestion = inter_x - torg.x;
                                dy_first_suggestion = inter_y - torg.y;
                            }
                        } else {
                            dx_first_suggestion = inter_x - torg.x;
                            dy_first_suggestion = inter_y - torg.y;
                        }
                        // never move the point closer to the smallest-angle
                        // corner than the circumcenter was
                        if squared_distance(
                            smallest_angle_corner.x,
                            smallest_angle_corner.y,
                            my_circumcenter.x,
                            my_circumcenter.y,
                        ) > LENGTH_CONST
                            * squared_distance(
                                smallest_angle_corner.x,
                                smallest_angle_corner.y,
                                dx_first_suggestion + torg.x,
                                dy_first_suggestion + torg.y,
                            )
                        {
                            dx_first_suggestion = dx;
                            dy_first_suggestion = dy;
                        }
                    }
                }

                // second suggestion: walk across the middle edge
                let neighbor_not_found = Self::get_neighbors_vertex(
                    mesh,
                    badotri,
                    largest_angle_corner.x,
                    largest_angle_corner.y,
                    smallest_angle_corner.x,
                    smallest_angle_corner.y,
                    &mut third_point,
                    &mut neighborotri,
                );
                let mut dx_second_suggestion = dx;
                let mut dy_second_suggestion = dy;
                if !neighbor_not_found {
                    let nv1 = mesh.vertices
                        [neighborotri.org(&mesh.triangles).index()]
                    .point();
                    let nv2 = mesh.vertices
                        [neighborotri.dest(&mesh.triangles).index()]
                    .point();
                    let nv3 = mesh.vertices
                        [neighborotri.apex(&mesh.triangles).index()]
                    .point();
                    let mut xi_tmp = 0.0;
                    let mut eta_tmp = 0.0;
                    let neighbor_circumcenter = mesh.predicates.find_circumcenter(
                        &nv1,
                        &nv2,
                        &nv3,
                        &mut xi_tmp,
                        &mut eta_tmp,
                        no_exact,
                    );
                    let vector_x =
                        largest_angle_corner.y - smallest_angle_corner.y + my_circumcenter.x;
                    let vector_y =
                        smallest_angle_corner.x - largest_angle_corner.x + my_circumcenter.y;
                    circle_line_intersection(
                        my_circumcenter.x,
                        my_circumcenter.y,
                        vector_x,
                        vector_y,
                        x_petal_ctr,
                        y_petal_ctr,
                        petal_radius,
                        &mut p,
                    );
                    let x_mid_of_middle_edge =
                        (largest_angle_corner.x + smallest_angle_corner.x) / 2.0;
                    let y_mid_of_middle_edge =
                        (largest_angle_corner.y + smallest_angle_corner.y) / 2.0;
                    let is_correct = choose_correct_point(
                        x_mid_of_middle_edge,
                        y_mid_of_middle_edge,
                        p[3],
                        p[4],
                        my_circumcenter.x,
                        my_circumcenter.y,
                        false,
                    );
                    let (mut inter_x, mut inter_y) = if is_correct {
                        (p[3], p[4])
                    } else {
                        (p[1], p[2])
                    };
                    point_between_points(
                        inter_x,
                        inter_y,
                        my_circumcenter.x,
                        my_circumcenter.y,
                        neighbor_circumcenter.x,
                        neighbor_circumcenter.y,
                        &mut voronoi_or_inter,
                    );
                    if p[0] > 0.0 {
                        if (voronoi_or_inter[0] - 1.0).abs() <= EPS {
                            if is_bad_triangle_angle(
                                behavior,
                                middle_angle_corner.x,
                                middle_angle_corner.y,
                                largest_angle_corner.x,
                                largest_angle_corner.y,
                                neighbor_circumcenter.x,
                                neighbor_circumcenter.y,
                            ) {
                                dx_second_suggestion = dx;
                                dy_second_suggestion = dy;
                            } else {
                                dx_second_suggestion = voronoi_or_inter[2] - torg.x;
                                dy_second_suggestion = voronoi_or_inter[3] - torg.y;
                            }
                        } else if is_bad_triangle_angle(
                            behavior,
                            middle_angle_corner.x,
                            middle_angle_corner.y,
                            largest_angle_corner.x,
                            largest_angle_corner.y,
                            inter_x,
                            inter_y,
                        ) {
                            let d = squared_distance(
                                inter_x,
                                inter_y,
                                my_circumcenter.x,
                                my_circumcenter.y,
                            )
                            .sqrt();
                            let ax = (my_circumcenter.x - inter_x) / d;
                            let ay = (my_circumcenter.y - inter_y) / d;
                            inter_x += ax * PERT_CONST * shortest_edge_dist.sqrt();
                            inter_y += ay * PERT_CONST * shortest_edge_dist.sqrt();
                            if is_bad_triangle_angle(
                                behavior,
                                middle_angle_corner.x,
                                middle_angle_corner.y,
                                largest_angle_corner.x,
                                largest_angle_corner.y,
                                inter_x,
                                inter_y,
                            ) {
                                dx_second_suggestion = dx;
                                dy_second_suggestion = dy;
                            } else {
                                dx_second_suggestion = inter_x - torg.x;
                                dy_second_suggestion = inter_y - torg.y;
                            }
                        } else {
                            dx_second_suggestion = inter_x - torg.x;
                            dy_second_suggestion = inter_y - torg.y;
                        }
                        if squared_distance(
                            smallest_angle_corner.x,
                            smallest_angle_corner.y,
                            my_circumcenter.x,
                            my_circumcenter.y,
                        ) > LENGTH_CONST
                            * squared_distance(
                                smallest_angle_corner.x,
                                smallest_angle_corner.y,
                                dx_second_suggestion + torg.x,
                                dy_second_suggestion + torg.y,
                            )
                        {
                            dx_second_suggestion = dx;
                            dy_second_suggestion = dy;
                        }
                    }
                }

                if is_obtuse {
                    dx = dx_first_suggestion;
                    dy = dy_first_suggestion;
                } else if JUST_ACUTE
                    * squared_distance(
                        smallest_angle_corner.x,
                        smallest_angle_corner.y,
                        dx_second_suggestion + torg.x,
                        dy_second_suggestion + torg.y,
                    )
                    > squared_distance(
                        smallest_angle_corner.x,
                        smallest_angle_corner.y,
                        dx_first_suggestion + torg.x,
                        dy_first_suggestion + torg.y,
                    )
                {
                    dx = dx_second_suggestion;
                    dy = dy_second_suggestion;
                } else {
                    dx = dx_first_suggestion;
                    dy = dy_first_suggestion;
                }
            }
        }

        let circumcenter = if relocated <= 0 {
            Point::new(torg.x + dx, torg.y + dy)
        } else {
            Point::new(origin_x + dx, origin_y + dy)
        };
        *xi = (yao * dx - xao * dy) * (2.0 * denominator);
        *eta = (xdo * dy - ydo * dx) * (2.0 * denominator);
        circumcenter
    }

    /// Same as above, but every candidate is additionally clipped against the
    /// petal slab that keeps the new triangles below the maximum angle bound.
    #[allow(clippy::too_many_arguments)]
    fn find_new_location(
        &mut self,
        mesh: &mut Mesh,
        torg: &Point,
        tdest: &Point,
        tapex: &Point,
        xi: &mut f64,
        eta: &mut f64,
        offcenter: bool,
        badotri: OTri,
        no_exact: bool,
    ) -> Point {
        let offconstant = mesh.behavior.off_constant;
        mesh.predicates
            .circumcenter_count
            .set(mesh.predicates.circumcenter_count.get() + 1);

        let xdo = tdest.x - torg.x;
        let ydo = tdest.y - torg.y;
        let xao = tapex.x - torg.x;
        let yao = tapex.y - torg.y;
        let xda = tapex.x - tdest.x;
        let yda = tapex.y - tdest.y;
        let dodist = xdo * xdo + ydo * ydo;
        let aodist = xao * xao + yao * yao;
        let dadist = squared_distance(tdest.x, tdest.y, tapex.x, tapex.y);
        let denominator = if no_exact {
            0.5 / (xdo * yao - xao * ydo)
        } else {
            let d = 0.5 / mesh.predicates.counter_clockwise(tdest, tapex, torg, no_exact);
            mesh.predicates
                .counter_clockwise_count
                .set(mesh.predicates.counter_clockwise_count.get() - 1);
            d
        };
        let mut dx = (yao * dodist - ydo * aodist) * denominator;
        let mut dy = (xdo * aodist - xao * dodist) * denominator;
        let my_circumcenter = Point::new(torg.x + dx, torg.y + dy);
        let delotri = badotri;

        let orientation = longest_shortest_edge(aodist, dadist, dodist);
        let (
            x_shortest_edge,
            y_shortest_edge,
            shortest_edge_dist,
            middle_edge_dist,
            longest_edge_dist,
            smallest_angle_corner,
            middle_angle_corner,
            largest_angle_corner,
        ) = match orientation {
            123 => (xao, yao, aodist, dadist, dodist, tdest, torg, tapex),
            132 => (xao, yao, aodist, dodist, dadist, tdest, tapex, torg),
            213 => (xda, yda, dadist, aodist, dodist, torg, tdest, tapex),
            231 => (xda, yda, dadist, dodist, aodist, torg, tapex, tdest),
            312 => (xdo, ydo, dodist, aodist, dadist, tapex, tdest, torg),
            _ => (xdo, ydo, dodist, dadist, aodist, tapex, torg, tdest),
        };

        let mut almost_good = false;
        if offcenter && offconstant > 0.0 {
            if orientation == 213 || orientation == 231 {
                let dxoff = 0.5 * x_shortest_edge - offconstant * y_shortest_edge;
                let dyoff = 0.5 * y_shortest_edge + offconstant * x_shortest_edge;
                if dxoff * dxoff + dyoff * dyoff
                    < (dx - xdo) * (dx - xdo) + (dy - ydo) * (dy - ydo)
                {
                    dx = xdo + dxoff;
                    dy = ydo + dyoff;
                } else {
                    almost_good = true;
                }
            } else if orientation == 123 || orientation == 132 {
                let dxoff = 0.5 * x_shortest_edge + offconstant * y_shortest_edge;
                let dyoff = 0.5 * y_shortest_edge - offconstant * x_shortest_edge;
                if dxoff * dxoff + dyoff * dyoff < dx * dx + dy * dy {
                    dx = dxoff;
                    dy = dyoff;
                } else {
                    almost_good = true;
                }
            } else {
                let dxoff = 0.5 * x_shortest_edge - offconstant * y_shortest_edge;
                let dyoff = 0.5 * y_shortest_edge + offconstant * x_shortest_edge;
                if dxoff * dxoff + dyoff * dyoff < dx * dx + dy * dy {
                    dx = dxoff;
                    dy = dyoff;
                } else {
                    almost_good = true;
                }
            }
        }

        let mut relocated = 0;
        let mut origin_x = 0.0;
        let mut origin_y = 0.0;
        if almost_good {
            let cos_max_angle = (middle_edge_dist + shortest_edge_dist - longest_edge_dist)
                / (2.0 * middle_edge_dist.sqrt() * shortest_edge_dist.sqrt());
            let is_obtuse = cos_max_angle < 0.0 || cos_max_angle.abs() <= EPS;
            let mut newloc = [0.0f64; 2];
            relocated = self.do_smoothing(mesh, delotri, torg, tdest, tapex, &mut newloc);
            if relocated > 0 {
                dx = newloc[0] - torg.x;
                dy = newloc[1] - torg.y;
                origin_x = torg.x;
                origin_y = torg.y;
                match relocated {
                    1 => mesh.delete_vertex(delotri, no_exact, None),
                    2 => mesh.delete_vertex(delotri.lnext(), no_exact, None),
                    3 => mesh.delete_vertex(delotri.lprev(), no_exact, None),
                    _ => {}
                }
            } else {
                let behavior = &mesh.behavior;
                // petals grow with the triangle's own smallest angle once it
                // exceeds the constraint, so neighboring petals stay disjoint
                let mut minangle = ((middle_edge_dist + longest_edge_dist - shortest_edge_dist)
                    / (2.0 * middle_edge_dist.sqrt() * longest_edge_dist.sqrt()))
                .acos()
                    * 180.0
                    / PI;
                if behavior.min_angle() > minangle {
                    minangle = behavior.min_angle();
                } else {
                    minangle += 0.5;
                }
                let petal_radius =
                    shortest_edge_dist.sqrt() / (2.0 * (minangle * PI / 180.0).sin());
                let x_mid_of_shortest_edge =
                    (middle_angle_corner.x + largest_angle_corner.x) / 2.0;
                let y_mid_of_shortest_edge =
                    (middle_angle_corner.y + largest_angle_corner.y) / 2.0;
                let half_chord =
                    (petal_radius * petal_radius - shortest_edge_dist / 4.0).sqrt();
                let x_petal_ctr_1 = x_mid_of_shortest_edge
                    + half_chord * (middle_angle_corner.y - largest_angle_corner.y)
                        / shortest_edge_dist.sqrt();
                let y_petal_ctr_1 = y_mid_of_shortest_edge
                    + half_chord * (largest_angle_corner.x - middle_angle_corner.x)
                        / shortest_edge_dist.sqrt();
                let x_petal_ctr_2 = x_mid_of_shortest_edge
                    - half_chord * (middle_angle_corner.y - largest_angle_corner.y)
                        / shortest_edge_dist.sqrt();
                let y_petal_ctr_2 = y_mid_of_shortest_edge
                    - half_chord * (largest_angle_corner.x - middle_angle_corner.x)
                        / shortest_edge_dist.sqrt();
                let (x_petal_ctr, y_petal_ctr) = if squared_distance(
                    x_petal_ctr_1,
                    y_petal_ctr_1,
                    smallest_angle_corner.x,
                    smallest_angle_corner.y,
                ) <= squared_distance(
                    x_petal_ctr_2,
                    y_petal_ctr_2,
                    smallest_angle_corner.x,
                    smallest_angle_corner.y,
                ) {
                    (x_petal_ctr_1, y_petal_ctr_1)
                } else {
                    (x_petal_ctr_2, y_petal_ctr_2)
                };

                let mut third_point = [0.0f64; 2];
                let mut neighborotri = OTri::none();
                let mut p = [0.0f64; 5];
                let mut voronoi_or_inter = [0.0f64; 4];
                let mut line_p = [0.0f64; 3];
                let mut line_result = [0.0f64; 4];
                let mut line_inter_x = 0.0;
                let mut line_inter_y = 0.0;

                let neighbor_not_found_first = Self::get_neighbors_vertex(
                    mesh,
                    badotri,
                    middle_angle_corner.x,
                    middle_angle_corner.y,
                    smallest_angle_corner.x,
                    smallest_angle_corner.y,
                    &mut third_point,
                    &mut neighborotri,
                );
                let mut dx_first_suggestion = dx;
                let mut dy_first_suggestion = dy;

                // where the petal bisector pierces the petal, rotated by the
                // slab angle both ways; these bound the max-angle region
                let dist = squared_distance(
                    x_petal_ctr,
                    y_petal_ctr,
                    x_mid_of_shortest_edge,
                    y_mid_of_shortest_edge,
                )
                .sqrt();
                let line_vector_x = (x_petal_ctr - x_mid_of_shortest_edge) / dist;
                let line_vector_y = (y_petal_ctr - y_mid_of_shortest_edge) / dist;
                let petal_bisector_x = x_petal_ctr + line_vector_x * petal_radius;
                let petal_bisector_y = y_petal_ctr + line_vector_y * petal_radius;
                let alpha = (2.0 * behavior.max_angle() + minangle - 180.0) * PI / 180.0;
                let (x_1, y_1) = rotate(
                    petal_bisector_x,
                    petal_bisector_y,
                    x_petal_ctr,
                    y_petal_ctr,
                    -alpha.sin(),
                    alpha.cos(),
                );
                let (x_2, y_2) = rotate(
                    petal_bisector_x,
                    petal_bisector_y,
                    x_petal_ctr,
                    y_petal_ctr,
                    alpha.sin(),
                    alpha.cos(),
                );
                let is_correct = choose_correct_point(
                    x_2,
                    y_2,
                    middle_angle_corner.x,
                    middle_angle_corner.y,
                    x_1,
                    y_1,
                    true,
                );
                let (
                    petal_slab_inter_x_first,
                    petal_slab_inter_y_first,
                    petal_slab_inter_x_second,
                    petal_slab_inter_y_second,
                ) = if is_correct {
                    (x_1, y_1, x_2, y_2)
                } else {
                    (x_2, y_2, x_1, y_1)
                };
                let x_mid_of_longest_edge =
                    (middle_angle_corner.x + smallest_angle_corner.x) / 2.0;
                let y_mid_of_longest_edge =
                    (middle_angle_corner.y + smallest_angle_corner.y) / 2.0;

                if !neighbor_not_found_first {
                    let nv1 = mesh.vertices
                        [neighborotri.org(&mesh.triangles).index()]
                    .point();
                    let nv2 = mesh.vertices
                        [neighborotri.dest(&mesh.triangles).index()]
                    .point();
                    let nv3 = mesh.vertices
                        [neighborotri.apex(&mesh.triangles).index()]
                    .point();
                    let mut xi_tmp = 0.0;
                    let mut eta_tmp = 0.0;
                    let neighbor_circumcenter = mesh.predicates.find_circumcenter(
                        &nv1,
                        &nv2,
                        &nv3,
                        &mut xi_tmp,
                        &mut eta_tmp,
                        no_exact,
                    );
                    let vector_x =
                        middle_angle_corner.y - smallest_angle_corner.y + my_circumcenter.x;
                    let vector_y =
                        smallest_angle_corner.x - middle_angle_corner.x + my_circumcenter.y;
                    circle_line_intersection(
                        my_circumcenter.x,
                        my_circumcenter.y,
                        vector_x,
                        vector_y,
                        x_petal_ctr,
                        y_petal_ctr,
                        petal_radius,
                        &mut p,
                    );
                    let is_correct = choose_correct_point(
                        x_mid_of_longest_edge,
                        y_mid_of_longest_edge,
                        p[3],
                        p[4],
                        my_circumcenter.x,
                        my_circumcenter.y,
                        is_obtuse,
                    );
                    let (mut inter_x, mut inter_y) = if is_correct {
                        (p[3], p[4])
                    } else {
                        (p[1], p[2])
                    };
                    line_line_intersection(
                        my_circumcenter.x,
                        my_circumcenter.y,
                        vector_x,
                        vector_y,
                        middle_angle_corner.x,
                        middle_angle_corner.y,
                        petal_slab_inter_x_first,
                        petal_slab_inter_y_first,
                        &mut line_p,
                    );
                    if line_p[0] > 0.0 {
                        line_inter_x = line_p[1];
                        line_inter_y = line_p[2];
                    }
                    point_between_points(
                        inter_x,
                        inter_y,
                        my_circumcenter.x,
                        my_circumcenter.y,
                        neighbor_circumcenter.x,
                        neighbor_circumcenter.y,
                        &mut voronoi_or_inter,
                    );
                    if p[0] > 0.0 {
                        if (voronoi_or_inter[0] - 1.0).abs() <= EPS {
                            point_between_points(
                                voronoi_or_inter[2],
                                voronoi_or_inter[3],
                                my_circumcenter.x,
                                my_circumcenter.y,
                                line_inter_x,
                                line_inter_y,
                                &mut line_result,
                            );
                            if (line_result[0] - 1.0).abs() <= EPS && line_p[0] > 0.0 {
                                let take_slab = squared_distance(
                                    smallest_angle_corner.x,
                                    smallest_angle_corner.y,
                                    petal_slab_inter_x_first,
                                    petal_slab_inter_y_first,
                                ) > LENGTH_CONST
                                    * squared_distance(
                                        smallest_angle_corner.x,
                                        smallest_angle_corner.y,
                                        line_inter_x,
                                        line_inter_y,
                                    )
                                    && is_bad_triangle_angle(
                                        behavior,
                                        middle_angle_corner.x,
                                        middle_angle_corner.y,
                                        largest_angle_corner.x,
                                        largest_angle_corner.y,
                                        petal_slab_inter_x_first,
                                        petal_slab_inter_y_first,
                                    )
                                    && Self::min_distance_to_neighbor(
                                        mesh,
                                        petal_slab_inter_x_first,
                                        petal_slab_inter_y_first,
                                        &mut neighborotri,
                                        no_exact,
                                    ) > Self::min_distance_to_neighbor(
                                        mesh,
                                        line_inter_x,
                                        line_inter_y,
                                        &mut neighborotri,
                                        no_exact,
                                    );
                                if take_slab {
                                    dx_first_suggestion =
                                        petal_slab_inter_x_first - torg.x;
                                    dy_first_suggestion =
                                        petal_slab_inter_y_first - torg.y;
                                } else if is_bad_triangle_angle(
                                    behavior,
                                    middle_angle_corner.x,
                                    middle_angle_corner.y,
                                    largest_angle_corner.x,
                                    largest_angle_corner.y,
                                    line_inter_x,
                                    line_inter_y,
                                ) {
                                    let d = squared_distance(
                                        line_inter_x,
                                        line_inter_y,
                                        my_circumcenter.x,
                                        my_circumcenter.y,
                                    )
                                    .sqrt();
                                    let ax = (my_circumcenter.x - line_inter_x) / d;
                                    let ay = (my_circumcenter.y - line_inter_y) / d;
                                    line_inter_x +=
                                        ax * PERT_CONST * shortest_edge_dist.sqrt();
                                    line_inter_y +=
                                        ay * PERT_CONST * shortest_edge_dist.sqrt();
                                    if is_bad_triangle_angle(
                                        behavior,
                                        middle_angle_corner.x,
                                        middle_angle_corner.y,
                                        largest_angle_corner.x,
                                        largest_angle_corner.y,
                                        line_inter_x,
                                        line_inter_y,
                                    ) {
                                        dx_first_suggestion = dx;
                                        dy_first_suggestion = dy;
                                    } else {
                                        dx_first_suggestion = line_inter_x - torg.x;
                                        dy_first_suggestion = line_inter_y - torg.y;
                                    }
                                } else {
                                    dx_first_suggestion = line_result[2] - torg.x;
                                    dy_first_suggestion = line_result[3] - torg.y;
                                }
                            } else if is_bad_triangle_angle(
                                behavior,
                                middle_angle_corner.x,
                                middle_angle_corner.y,
                                largest_angle_corner.x,
                                largest_angle_corner.y,
                                neighbor_circumcenter.x,
                                neighbor_circumcenter.y,
                            ) {
                                dx_first_suggestion = dx;
                                dy_first_suggestion = dy;
                            } else {
                                dx_first_suggestion = voronoi_or_inter[2] - torg.x;
                                dy_first_suggestion = voronoi_or_inter[3] - torg.y;
                            }
                        } else {
                            point_between_points(
                                inter_x,
                                inter_y,
                                my_circumcenter.x,
                                my_circumcenter.y,
                                line_inter_x,
                                line_inter_y,
                                &mut line_result,
                            );
                            if (line_result[0] - 1.0).abs() <= EPS && line_p[0] > 0.0 {
                                let take_slab = squared_distance(
                                    smallest_angle_corner.x,
                                    smallest_angle_corner.y,
                                    petal_slab_inter_x_first,
                                    petal_slab_inter_y_first,
                                ) > LENGTH_CONST
                                    * squared_distance(
                                        smallest_angle_corner.x,
                                        smallest_angle_corner.y,
                                        line_inter_x,
                                        line_inter_y,
                                    )
                                    && is_bad_triangle_angle(
                                        behavior,
                                        middle_angle_corner.x,
                                        middle_angle_corner.y,
                                        largest_angle_corner.x,
                                        largest_angle_corner.y,
                                        petal_slab_inter_x_first,
                                        petal_slab_inter_y_first,
                                    )
                                    && Self::min_distance_to_neighbor(
                                        mesh,
                                        petal_slab_inter_x_first,
                                        petal_slab_inter_y_first,
                                        &mut neighborotri,
                                        no_exact,
                                    ) > Self::min_distance_to_neighbor(
                                        mesh,
                                        line_inter_x,
                                        line_inter_y,
                                        &mut neighborotri,
                                        no_exact,
                                    );
                                if take_slab {
                                    dx_first_suggestion =
                                        petal_slab_inter_x_first - torg.x;
                                    dy_first_suggestion =
                                        petal_slab_inter_y_first - torg.y;
                                } else if is_bad_triangle_angle(
                                    behavior,
                                    largest_angle_corner.x,
                                    largest_angle_corner.y,
                                    middle_angle_corner.x,
                                    middle_angle_corner.y,
                                    line_inter_x,
                                    line_inter_y,
                                ) {
                                    let d = squared_distance(
                                        line_inter_x,
                                        line_inter_y,
                                        my_circumcenter.x,
                                        my_circumcenter.y,
                                    )
                                    .sqrt();
                                    let ax = (my_circumcenter.x - line_inter_x) / d;
                                    let ay = (my_circumcenter.y - line_inter_y) / d;
                                    line_inter_x +=
                                        ax * PERT_CONST * shortest_edge_dist.sqrt();
                                    line_inter_y +=
                                        ay * PERT_CONST * shortest_edge_dist.sqrt();
                                    if is_bad_triangle_angle(
                                        behavior,
                                        middle_angle_corner.x,
                                        middle_angle_corner.y,
                                        largest_angle_corner.x,
                                        largest_angle_corner.y,
                                        line_inter_x,
                                        line_inter_y,
                                    ) {
                                        dx_first_suggestion = dx;
                                        dy_first_suggestion = dy;
                                    } else {
                                        dx_first_suggestion = line_inter_x - torg.x;
                                        dy_first_suggestion = line_inter_y - torg.y;
                                    }
                                } else {
                                    dx_first_suggestion = line_result[2] - torg.x;
                                    dy_first_suggestion = line_result[3] - torg.y;
                                }
                            } else if is_bad_triangle_angle(
                                behavior,
                                largest_angle_corner.x,
                                largest_angle_corner.y,
                                middle_angle_corner.x,
                                middle_angle_corner.y,
                                inter_x,
                                inter_y,
                            ) {
                                let d = squared_distance(
                                    inter_x,
                                    inter_y,
                                    my_circumcenter.x,
                                    my_circumcenter.y,
                                )
                                .sqrt();
                                let ax = (my_circumcenter.x - inter_x) / d;
                                let ay = (my_circumcenter.y - inter_y) / d;
                                inter_x += ax * PERT_CONST * shortest_edge_dist.sqrt();
                                inter_y += ay * PERT_CONST * shortest_edge_dist.sqrt();
                                if is_bad_triangle_angle(
                                    behavior,
                                    middle_angle_corner.x,
                                    middle_angle_corner.y,
                                    largest_angle_corner.x,
                                    largest_angle_corner.y,
                                    inter_x,
                                    inter_y,
                                ) {
                                    dx_first_suggestion = dx;
                                    dy_first_suggestion = dy;
                                } else {
                                    dx_first_suggestion = inter_x - torg.x;
                                    dy_first_suggestion = inter_y - torg.y;
                                }
                            } else {
                                dx_first_suggestion = inter_x - torg.x;
                                dy_first_suggestion = inter_y - torg.y;
                            }
                        }
                        if squared_distance(
                            smallest_angle_corner.x,
                            smallest_angle_corner.y,
                            my_circumcenter.x,
                            my_circumcenter.y,
                        ) > LENGTH_CONST
                            * squared_distance(
                                smallest_angle_corner.x,
                                smallest_angle_corner.y,
                                dx_first_suggestion + torg.x,
                                dy_first_suggestion + torg.y,
                            )
                        {
                            dx_first_suggestion = dx;
                            dy_first_suggestion = dy;
                        }
                    }
                }

                let neighbor_not_found_second = Self::get_neighbors_vertex(
                    mesh,
                    badotri,
                    largest_angle_corner.x,
                    largest_angle_corner.y,
                    smallest_angle_corner.x,
                    smallest_angle_corner.y,
                    &mut third_point,
                    &mut neighborotri,
                );
                let mut dx_second_suggestion = dx;
                let mut dy_second_suggestion = dy;
                let x_mid_of_middle_edge =
                    (largest_angle_corner.x + smallest_angle_corner.x) / 2.0;
                let y_mid_of_middle_edge =
                    (largest_angle_corner.y + smallest_angle_corner.y) / 2.0;
                if !neighbor_not_found_second {
                    let nv1 = mesh.vertices
                        [neighborotri.org(&mesh.triangles).index()]
                    .point();
                    let nv2 = mesh.vertices
                        [neighborotri.dest(&mesh.triangles).index()]
                    .point();
                    let nv3 = mesh.vertices
                        [neighborotri.apex(&mesh.triangles).index()]
                    .point();
                    let mut xi_tmp = 0.0;
                    let mut eta_tmp = 0.0;
                    let neighbor_circumcenter = mesh.predicates.find_circumcenter(
                        &nv1,
                        &nv2,
                        &nv3,
                        &mut xi_tmp,
                        &mut eta_tmp,
                        no_exact,
                    );
                    let vector_x =
                        largest_angle_corner.y - smallest_angle_corner.y + my_circumcenter.x;
                    let vector_y =
                        smallest_angle_corner.x - largest_angle_corner.x + my_circumcenter.y;
                    circle_line_intersection(
                        my_circumcenter.x,
                        my_circumcenter.y,
                        vector_x,
                        vector_y,
                        x_petal_ctr,
                        y_petal_ctr,
                        petal_radius,
                        &mut p,
                    );
                    let is_correct = choose_correct_point(
                        x_mid_of_middle_edge,
                        y_mid_of_middle_edge,
                        p[3],
                        p[4],
                        my_circumcenter.x,
                        my_circumcenter.y,
                        false,
                    );
                    let (mut inter_x, mut inter_y) = if is_correct {
                        (p[3], p[4])
                    } else {
                        (p[1], p[2])
                    };
                    line_line_intersection(
                        my_circumcenter.x,
                        my_circumcenter.y,
                        vector_x,
                        vector_y,
                        largest_angle_corner.x,
                        largest_angle_corner.y,
                        petal_slab_inter_x_second,
                        petal_slab_inter_y_second,
                        &mut line_p,
                    );
                    if line_p[0] > 0.0 {
                        line_inter_x = line_p[1];
                        line_inter_y = line_p[2];
                    }
                    point_between_points(
                        inter_x,
                        inter_y,
                        my_circumcenter.x,
                        my_circumcenter.y,
                        neighbor_circumcenter.x,
                        neighbor_circumcenter.y,
                        &mut voronoi_or_inter,
                    );
                    if p[0] > 0.0 {
                        if (voronoi_or_inter[0] - 1.0).abs() <= EPS {
                            point_between_points(
                                voronoi_or_inter[2],
                                voronoi_or_inter[3],
                                my_circumcenter.x,
                                my_circumcenter.y,
                                line_inter_x,
                                line_inter_y,
                                &mut line_result,
                            );
                            if (line_result[0] - 1.0).abs() <= EPS && line_p[0] > 0.0 {
                                let take_slab = squared_distance(
                                    smallest_angle_corner.x,
                                    smallest_angle_corner.y,
                                    petal_slab_inter_x_second,
                                    petal_slab_inter_y_second,
                                ) > LENGTH_CONST
                                    * squared_distance(
                                        smallest_angle_corner.x,
                                        smallest_angle_corner.y,
                                        line_inter_x,
                                        line_inter_y,
                                    )
                                    && is_bad_triangle_angle(
                                        behavior,
                                        middle_angle_corner.x,
                                        middle_angle_corner.y,
                                        largest_angle_corner.x,
                                        largest_angle_corner.y,
                                        petal_slab_inter_x_second,
                                        petal_slab_inter_y_second,
                                    )
                                    && Self::min_distance_to_neighbor(
                                        mesh,
                                        petal_slab_inter_x_second,
                                        petal_slab_inter_y_second,
                                        &mut neighborotri,
                                        no_exact,
                                    ) > Self::min_distance_to_neighbor(
                                        mesh,
                                        line_inter_x,
                                        line_inter_y,
                                        &mut neighborotri,
                                        no_exact,
                                    );
                                if take_slab {
                                    dx_second_suggestion =
                                        petal_slab_inter_x_second - torg.x;
                                    dy_second_suggestion =
                                        petal_slab_inter_y_second - torg.y;
                                } else if is_bad_triangle_angle(
                                    behavior,
                                    middle_angle_corner.x,
                                    middle_angle_corner.y,
                                    largest_angle_corner.x,
                                    largest_angle_corner.y,
                                    line_inter_x,
                                    line_inter_y,
                                ) {
                                    let d = squared_distance(
                                        line_inter_x,
                                        line_inter_y,
                                        my_circumcenter.x,
                                        my_circumcenter.y,
                                    )
                                    .sqrt();
                                    let ax = (my_circumcenter.x - line_inter_x) / d;
                                    let ay = (my_circumcenter.y - line_inter_y) / d;
                                    line_inter_x +=
                                        ax * PERT_CONST * shortest_edge_dist.sqrt();
                                    line_inter_y +=
                                        ay * PERT_CONST * shortest_edge_dist.sqrt();
                                    if is_bad_triangle_angle(
                                        behavior,
                                        middle_angle_corner.x,
                                        middle_angle_corner.y,
                                        largest_angle_corner.x,
                                        largest_angle_corner.y,
                                        line_inter_x,
                                        line_inter_y,
                                    ) {
                                        dx_second_suggestion = dx;
                                        dy_second_suggestion = dy;
                                    } else {
                                        dx_second_suggestion = line_inter_x - torg.x;
                                        dy_second_suggestion = line_inter_y - torg.y;
                                    }
                                } else {
                                    dx_second_suggestion = line_result[2] - torg.x;
                                    dy_second_suggestion = line_result[3] - torg.y;
                                }
                            } else if is_bad_triangle_angle(
                                behavior,
                                middle_angle_corner.x,
                                middle_angle_corner.y,
                                largest_angle_corner.x,
                                largest_angle_corner.y,
                                neighbor_circumcenter.x,
                                neighbor_circumcenter.y,
                            ) {
                                dx_second_suggestion = dx;
                                dy_second_suggestion = dy;
                            } else {
                                dx_second_suggestion = voronoi_or_inter[2] - torg.x;
                                dy_second_suggestion = voronoi_or_inter[3] - torg.y;
                            }
                        } else {
                            point_between_points(
                                inter_x,
                                inter_y,
                                my_circumcenter.x,
                                my_circumcenter.y,
                                line_inter_x,
                                line_inter_y,
                                &mut line_result,
                            );
                            if (line_result[0] - 1.0).abs() <= EPS && line_p[0] > 0.0 {
                                let take_slab = squared_distance(
                                    smallest_angle_corner.x,
                                    smallest_angle_corner.y,
                                    petal_slab_inter_x_second,
                                    petal_slab_inter_y_second,
                                ) > LENGTH_CONST
                                    * squared_distance(
                                        smallest_angle_corner.x,
                                        smallest_angle_corner.y,
                                        line_inter_x,
                                        line_inter_y,
                                    )
                                    && is_bad_triangle_angle(
                                        behavior,
                                        middle_angle_corner.x,
                                        middle_angle_corner.y,
                                        largest_angle_corner.x,
                                        largest_angle_corner.y,
                                        petal_slab_inter_x_second,
                                        petal_slab_inter_y_second,
                                    )
                                    && Self::min_distance_to_neighbor(
                                        mesh,
                                        petal_slab_inter_x_second,
                                        petal_slab_inter_y_second,
                                        &mut neighborotri,
                                        no_exact,
                                    ) > Self::min_distance_to_neighbor(
                                        mesh,
                                        line_inter_x,
                                        line_inter_y,
                                        &mut neighborotri,
                                        no_exact,
                                    );
                                if take_slab {
                                    dx_second_suggestion =
                                        petal_slab_inter_x_second - torg.x;
                                    dy_second_suggestion =
                                        petal_slab_inter_y_second - torg.y;
                                } else if is_bad_triangle_angle(
                                    behavior,
                                    largest_angle_corner.x,
                                    largest_angle_corner.y,
                                    middle_angle_corner.x,
                                    middle_angle_corner.y,
                                    line_inter_x,
                                    line_inter_y,
                                ) {
                                    let d = squared_distance(
                                        line_inter_x,
                                        line_inter_y,
                                        my_circumcenter.x,
                                        my_circumcenter.y,
                                    )
                                    .sqrt();
                                    let ax = (my_circumcenter.x - line_inter_x) / d;
                                    let ay = (my_circumcenter.y - line_inter_y) / d;
                                    line_inter_x +=
                                        ax * PERT_CONST * shortest_edge_dist.sqrt();
                                    line_inter_y +=
                                        ay * PERT_CONST * shortest_edge_dist.sqrt();
                                    if is_bad_triangle_angle(
                                        behavior,
                                        middle_angle_corner.x,
                                        middle_angle_corner.y,
                                        largest_angle_corner.x,
                                        largest_angle_corner.y,
                                        line_inter_x,
                                        line_inter_y,
                                    ) {
                                        dx_second_suggestion = dx;
                                        dy_second_suggestion = dy;
                                    } else {
                                        dx_second_suggestion = line_inter_x - torg.x;
                                        dy_second_suggestion = line_inter_y - torg.y;
                                    }
                                } else {
                                    dx_second_suggestion = line_result[2] - torg.x;
                                    dy_second_suggestion = line_result[3] - torg.y;
                                }
                            } else if is_bad_triangle_angle(
                                behavior,
                                middle_angle_corner.x,
                                middle_angle_corner.y,
                                largest_angle_corner.x,
                                largest_angle_corner.y,
                                inter_x,
                                inter_y,
                            ) {
                                let d = squared_distance(
                                    inter_x,
                                    inter_y,
                                    my_circumcenter.x,
                                    my_circumcenter.y,
                                )
                                .sqrt();
                                let ax = (my_circumcenter.x - inter_x) / d;
                                let ay = (my_circumcenter.y - inter_y) / d;
                                inter_x += ax * PERT_CONST * shortest_edge_dist.sqrt();
                                inter_y += ay * PERT_CONST * shortest_edge_dist.sqrt();
                                if is_bad_triangle_angle(
                                    behavior,
                                    middle_angle_corner.x,
                                    middle_angle_corner.y,
                                    largest_angle_corner.x,
                                    largest_angle_corner.y,
                                    inter_x,
                                    inter_y,
                                ) {
                                    dx_second_suggestion = dx;
                                    dy_second_suggestion = dy;
                                } else {
                                    dx_second_suggestion = inter_x - torg.x;
                                    dy_second_suggestion = inter_y - torg.y;
                                }
                            } else {
                                dx_second_suggestion = inter_x - torg.x;
                                dy_second_suggestion = inter_y - torg.y;
                            }
                        }
                        if squared_distance(
                            smallest_angle_corner.x,
                            smallest_angle_corner.y,
                            my_circumcenter.x,
                            my_circumcenter.y,
                        ) > LENGTH_CONST
                            * squared_distance(
                                smallest_angle_corner.x,
                                smallest_angle_corner.y,
                                dx_second_suggestion + torg.x,
                                dy_second_suggestion + torg.y,
                            )
                        {
                            dx_second_suggestion = dx;
                            dy_second_suggestion = dy;
                        }
                    }
                }

                // pick the suggestion farther from the smallest-angle corner;
                // a midpoint stands in for a missing suggestion
                let first_dist = squared_distance(
                    smallest_angle_corner.x,
                    smallest_angle_corner.y,
                    dx_first_suggestion + torg.x,
                    dy_first_suggestion + torg.y,
                );
                let second_dist = squared_distance(
                    smallest_angle_corner.x,
                    smallest_angle_corner.y,
                    dx_second_suggestion + torg.x,
                    dy_second_suggestion + torg.y,
                );
                let mid_longest_dist = squared_distance(
                    smallest_angle_corner.x,
                    smallest_angle_corner.y,
                    x_mid_of_longest_edge,
                    y_mid_of_longest_edge,
                );
                let mid_middle_dist = squared_distance(
                    smallest_angle_corner.x,
                    smallest_angle_corner.y,
                    x_mid_of_middle_edge,
                    y_mid_of_middle_edge,
                );
                let (second_score, first_score) =
                    match (neighbor_not_found_first, neighbor_not_found_second) {
                        (true, true) => (mid_middle_dist, mid_longest_dist),
                        (true, false) => (second_dist, mid_longest_dist),
                        (false, true) => (mid_middle_dist, first_dist),
                        (false, false) => (second_dist, first_dist),
                    };
                if JUST_ACUTE * second_score > first_score {
                    dx = dx_second_suggestion;
                    dy = dy_second_suggestion;
                } else {
                    dx = dx_first_suggestion;
                    dy = dy_first_suggestion;
                }
            }
        }

        let circumcenter = if relocated <= 0 {
            Point::new(torg.x + dx, torg.y + dy)
        } else {
            Point::new(origin_x + dx, origin_y + dy)
        };
        *xi = (yao * dx - xao * dy) * (2.0 * denominator);
        *eta = (xdo * dy - ydo * dx) * (2.0 * denominator);
        circumcenter
    }

    /// Try to relocate one of the triangle's free corners into a spot where
    /// every triangle of its star satisfies the angle bounds. Returns which
    /// corner (1 = org, 2 = dest, 3 = apex) moved to `newloc`, or 0.
    fn do_smoothing(
        &mut self,
        mesh: &Mesh,
        badotri: OTri,
        torg: &Point,
        tdest: &Point,
        tapex: &Point,
        newloc: &mut [f64; 2],
    ) -> i32 {
        let org_kind = mesh.vertices[badotri.org(&mesh.triangles).index()].kind;
        let dest_kind = mesh.vertices[badotri.dest(&mesh.triangles).index()].kind;
        let apex_kind = mesh.vertices[badotri.apex(&mesh.triangles).index()].kind;

        let mut possibilities = [0.0f64; 6];
        let mut num_pos = 0;
        let (mut flag1, mut flag2, mut flag3) = (0, 0, 0);

        let mut points = std::mem::take(&mut self.points_p);
        let numpoints_p = Self::get_star_points(mesh, badotri, torg, tdest, tapex, 1, &mut points);
        if org_kind == VertexKind::Free
            && numpoints_p != 0
            && valid_polygon_angles(&mesh.behavior, numpoints_p, &points)
        {
            let found = if mesh.behavior.max_angle() == 0.0 {
                self.get_wedge_intersection_without_max_angle(
                    &mesh.behavior,
                    numpoints_p,
                    &points,
                    newloc,
                )
            } else {
                self.get_wedge_intersection(&mesh.behavior, numpoints_p, &points, newloc)
            };
            if found {
                possibilities[0] = newloc[0];
                possibilities[1] = newloc[1];
                num_pos += 1;
                flag1 = 1;
            }
        }
        self.points_p = points;

        let mut points = std::mem::take(&mut self.points_q);
        let numpoints_q = Self::get_star_points(mesh, badotri, torg, tdest, tapex, 2, &mut points);
        if dest_kind == VertexKind::Free
            && numpoints_q != 0
            && valid_polygon_angles(&mesh.behavior, numpoints_q, &points)
        {
            let found = if mesh.behavior.max_angle() == 0.0 {
                self.get_wedge_intersection_without_max_angle(
                    &mesh.behavior,
                    numpoints_q,
                    &points,
                    newloc,
                )
            } else {
                self.get_wedge_intersection(&mesh.behavior, numpoints_q, &points, newloc)
            };
            if found {
                possibilities[2] = newloc[0];
                possibilities[3] = newloc[1];
                num_pos += 1;
                flag2 = 2;
            }
        }
        self.points_q = points;

        let mut points = std::mem::take(&mut self.points_r);
        let numpoints_r = Self::get_star_points(mesh, badotri, torg, tdest, tapex, 3, &mut points);
        if apex_kind == VertexKind::Free
            && numpoints_r != 0
            && valid_polygon_angles(&mesh.behavior, numpoints_r, &points)
        {
            let found = if mesh.behavior.max_angle() == 0.0 {
                self.get_wedge_intersection_without_max_angle(
                    &mesh.behavior,
                    numpoints_r,
                    &points,
                    newloc,
                )
            } else {
                self.get_wedge_intersection(&mesh.behavior, numpoints_r, &points, newloc)
            };
            if found {
                possibilities[4] = newloc[0];
                possibilities[5] = newloc[1];
                num_pos += 1;
                flag3 = 3;
            }
        }
        self.points_r = points;

        if num_pos > 0 {
            if flag1 > 0 {
                newloc[0] = possibilities[0];
                newloc[1] = possibilities[1];
                return flag1;
            }
            if flag2 > 0 {
                newloc[0] = possibilities[2];
                newloc[1] = possibilities[3];
                return flag2;
            }
            if flag3 > 0 {
                newloc[0] = possibilities[4];
                newloc[1] = possibilities[5];
                return flag3;
            }
        }
        0
    }

    /// Collect the link polygon of one corner of `badotri` by walking around
    /// it neighbor by neighbor. Returns the number of polygon vertices, or 0
    /// if the walk hit the hull before closing.
    fn get_star_points(
        mesh: &Mesh,
        badotri: OTri,
        p: &Point,
        q: &Point,
        r: &Point,
        which_point: i32,
        points: &mut Vec<f64>,
    ) -> usize {
        points.clear();
        let (first, second, third) = match which_point {
            1 => (p, r, q),
            2 => (q, p, r),
            _ => (r, q, p),
        };
        let first_x = first.x;
        let first_y = first.y;
        let mut second_x = second.x;
        let mut second_y = second.y;
        let third_x = third.x;
        let third_y = third.y;

        let mut tempotri = badotri;
        let mut neighotri = OTri::none();
        let mut return_point = [second_x, second_y];
        points.push(second_x);
        points.push(second_y);
        loop {
            if Self::get_neighbors_vertex(
                mesh,
                tempotri,
                first_x,
                first_y,
                second_x,
                second_y,
                &mut return_point,
                &mut neighotri,
            ) {
                points.clear();
                break;
            }
            tempotri = neighotri;
            second_x = return_point[0];
            second_y = return_point[1];
            points.push(return_point[0]);
            points.push(return_point[1]);
            if (return_point[0] - third_x).abs() <= EPS
                && (return_point[1] - third_y).abs() <= EPS
            {
                break;
            }
        }
        points.len() / 2
    }

    /// Find the neighbor of `badotri` sharing the edge whose endpoints sit at
    /// `first` and `second`; its remaining corner goes to `thirdpoint` and the
    /// handle to `neighotri`. Returns true when no such neighbor exists.
    fn get_neighbors_vertex(
        mesh: &Mesh,
        badotri: OTri,
        first_x: f64,
        first_y: f64,
        second_x: f64,
        second_y: f64,
        thirdpoint: &mut [f64; 2],
        neighotri: &mut OTri,
    ) -> bool {
        let mut notfound = false;
        let mut neighbor = OTri::none();
        let mut nv1 = Point::new(0.0, 0.0);
        let mut nv2 = Point::new(0.0, 0.0);
        let mut nv3 = Point::new(0.0, 0.0);
        let mut first_vertex_matched = 0;
        let mut second_vertex_matched = 0;
        let mut probe = badotri;
        probe.orient = 0;
        while probe.orient < 3 {
            neighbor = probe.sym(&mesh.triangles);
            if !neighbor.tri.is_dummy() {
                nv1 = mesh.vertices[neighbor.org(&mesh.triangles).index()].point();
                nv2 = mesh.vertices[neighbor.dest(&mesh.triangles).index()].point();
                nv3 = mesh.vertices[neighbor.apex(&mesh.triangles).index()].point();
                let degenerate = (nv1.x == nv2.x && nv1.y == nv2.y)
                    || (nv2.x == nv3.x && nv2.y == nv3.y)
                    || (nv1.x == nv3.x && nv1.y == nv3.y);
                if !degenerate {
                    first_vertex_matched = 0;
                    if (first_x - nv1.x).abs() < EPS && (first_y - nv1.y).abs() < EPS {
                        first_vertex_matched = 11;
                    } else if (first_x - nv2.x).abs() < EPS && (first_y - nv2.y).abs() < EPS {
                        first_vertex_matched = 12;
                    } else if (first_x - nv3.x).abs() < EPS && (first_y - nv3.y).abs() < EPS {
                        first_vertex_matched = 13;
                    }
                    second_vertex_matched = 0;
                    if (second_x - nv1.x).abs() < EPS && (second_y - nv1.y).abs() < EPS {
                        second_vertex_matched = 21;
                    } else if (second_x - nv2.x).abs() < EPS && (second_y - nv2.y).abs() < EPS {
                        second_vertex_matched = 22;
                    } else if (second_x - nv3.x).abs() < EPS && (second_y - nv3.y).abs() < EPS {
                        second_vertex_matched = 23;
                    }
                }
            }
            if (first_vertex_matched == 11
                && (second_vertex_matched == 22 || second_vertex_matched == 23))
                || (first_vertex_matched == 12
                    && (second_vertex_matched == 21 || second_vertex_matched == 23))
                || (first_vertex_matched == 13
                    && (second_vertex_matched == 21 || second_vertex_matched == 22))
            {
                break;
            }
            probe.orient += 1;
        }
        match first_vertex_matched {
            0 => notfound = true,
            11 => {
                if second_vertex_matched == 22 {
                    thirdpoint[0] = nv3.x;
                    thirdpoint[1] = nv3.y;
                } else if second_vertex_matched == 23 {
                    thirdpoint[0] = nv2.x;
                    thirdpoint[1] = nv2.y;
                } else {
                    notfound = true;
                }
            }
            12 => {
                if second_vertex_matched == 21 {
                    thirdpoint[0] = nv3.x;
                    thirdpoint[1] = nv3.y;
                } else if second_vertex_matched == 23 {
                    thirdpoint[0] = nv1.x;
                    thirdpoint[1] = nv1.y;
                } else {
                    notfound = true;
                }
            }
            13 => {
                if second_vertex_matched == 21 {
                    thirdpoint[0] = nv2.x;
                    thirdpoint[1] = nv2.y;
                } else if second_vertex_matched == 22 {
                    thirdpoint[0] = nv1.x;
                    thirdpoint[1] = nv1.y;
                } else {
                    notfound = true;
                }
            }
            _ => {
                if second_vertex_matched == 0 {
                    notfound = true;
                }
            }
        }
        *neighotri = neighbor;
        notfound
    }

    /// Intersect the petals and min-angle wedges of the star polygon and put
    /// its centroid in `newloc`. Returns false when the intersection is empty.
    fn get_wedge_intersection_without_max_angle(
        &mut self,
        behavior: &Behavior,
        numpoints: usize,
        points: &[f64],
        newloc: &mut [f64; 2],
    ) -> bool {
        if 2 * numpoints > self.petalx.len() {
            self.petalx = vec![0.0; 2 * numpoints];
            self.petaly = vec![0.0; 2 * numpoints];
            self.petalr = vec![0.0; 2 * numpoints];
            self.wedges = vec![0.0; 2 * numpoints * 16 + 36];
        }
        let mut x0 = points[2 * numpoints - 4];
        let mut y0 = points[2 * numpoints - 3];
        let mut x1 = points[2 * numpoints - 2];
        let mut y1 = points[2 * numpoints - 1];
        let alpha = behavior.min_angle() * PI / 180.0;
        let (petal_center_constant, petal_radius_constant) = if behavior.good_angle == 1.0 {
            (0.0, 0.0)
        } else {
            (0.5 / alpha.tan(), 0.5 / alpha.sin())
        };
        let mut p1 = [0.0f64; 3];
        let mut i = 0;
        while i < numpoints * 2 {
            let x2 = points[i];
            let y2 = points[i + 1];
            let x01 = x1 - x0;
            let y01 = y1 - y0;
            let d01 = (x01 * x01 + y01 * y01).sqrt();
            let px = x0 + 0.5 * x01 - petal_center_constant * y01;
            let py = y0 + 0.5 * y01 + petal_center_constant * x01;
            let pr = petal_radius_constant * d01;
            self.petalx[i / 2] = px;
            self.petaly[i / 2] = py;
            self.petalr[i / 2] = pr;
            self.petalx[numpoints + i / 2] = px;
            self.petaly[numpoints + i / 2] = py;
            self.petalr[numpoints + i / 2] = pr;
            let xmid = (x0 + x1) / 2.0;
            let ymid = (y0 + y1) / 2.0;
            let dist = squared_distance(px, py, xmid, ymid).sqrt();
            let ux = (px - xmid) / dist;
            let uy = (py - ymid) / dist;
            // where the petal bisector pierces the petal circle
            let x3 = px + ux * pr;
            let y3 = py + uy * pr;
            let (x_1, y_1) = rotate(x1, y1, x0, y0, alpha.sin(), alpha.cos());
            self.wedges[i * 16] = x0;
            self.wedges[i * 16 + 1] = y0;
            self.wedges[i * 16 + 2] = x_1;
            self.wedges[i * 16 + 3] = y_1;
            let (x_2, y_2) = rotate(x0, y0, x1, y1, -alpha.sin(), alpha.cos());
            self.wedges[i * 16 + 4] = x_2;
            self.wedges[i * 16 + 5] = y_2;
            self.wedges[i * 16 + 6] = x1;
            self.wedges[i * 16 + 7] = y1;
            // approximate each petal arc by three chords per side
            let mut tempx = x3;
            let mut tempy = y3;
            for j in 1..4usize {
                let theta = (PI / 3.0 - alpha) * j as f64;
                let (x_3, y_3) = rotate(x3, y3, px, py, -theta.sin(), theta.cos());
                self.wedges[i * 16 + 8 + 4 * (j - 1)] = x_3;
                self.wedges[i * 16 + 9 + 4 * (j - 1)] = y_3;
                self.wedges[i * 16 + 10 + 4 * (j - 1)] = tempx;
                self.wedges[i * 16 + 11 + 4 * (j - 1)] = tempy;
                tempx = x_3;
                tempy = y_3;
            }
            tempx = x3;
            tempy = y3;
            for j in 1..4usize {
                let theta = (PI / 3.0 - alpha) * j as f64;
                let (x_4, y_4) = rotate(x3, y3, px, py, theta.sin(), theta.cos());
                self.wedges[i * 16 + 20 + 4 * (j - 1)] = tempx;
                self.wedges[i * 16 + 21 + 4 * (j - 1)] = tempy;
                self.wedges[i * 16 + 22 + 4 * (j - 1)] = x_4;
                self.wedges[i * 16 + 23 + 4 * (j - 1)] = y_4;
                tempx = x_4;
                tempy = y_4;
            }
            if i == 0 {
                line_line_intersection(x0, y0, x_1, y_1, x1, y1, x_2, y_2, &mut p1);
                if p1[0] == 1.0 {
                    self.initial_convex_poly[0] = p1[1];
                    self.initial_convex_poly[1] = p1[2];
                    self.initial_convex_poly[2] = self.wedges[i * 16 + 16];
                    self.initial_convex_poly[3] = self.wedges[i * 16 + 17];
                    self.initial_convex_poly[4] = self.wedges[i * 16 + 12];
                    self.initial_convex_poly[5] = self.wedges[i * 16 + 13];
                    self.initial_convex_poly[6] = self.wedges[i * 16 + 8];
                    self.initial_convex_poly[7] = self.wedges[i * 16 + 9];
                    self.initial_convex_poly[8] = x3;
                    self.initial_convex_poly[9] = y3;
                    self.initial_convex_poly[10] = self.wedges[i * 16 + 22];
                    self.initial_convex_poly[11] = self.wedges[i * 16 + 23];
                    self.initial_convex_poly[12] = self.wedges[i * 16 + 26];
                    self.initial_convex_poly[13] = self.wedges[i * 16 + 27];
                    self.initial_convex_poly[14] = self.wedges[i * 16 + 30];
                    self.initial_convex_poly[15] = self.wedges[i * 16 + 31];
                }
            }
            x0 = x1;
            y0 = y1;
            x1 = x2;
            y1 = y2;
            i += 2;
        }
        if numpoints != 0 {
            // clip the initial polygon against every other wedge, alternating
            // sides so the polygon shrinks evenly
            let s = (numpoints - 1) / 2 + 1;
            let mut flag = 0usize;
            let mut count = 0usize;
            let mut i = 1usize;
            let mut num = 8usize;
            let mut j = 0usize;
            while j < 32 {
                let (hx1, hy1, hx2, hy2) = (
                    self.wedges[32 * s + j],
                    self.wedges[32 * s + 1 + j],
                    self.wedges[32 * s + 2 + j],
                    self.wedges[32 * s + 3 + j],
                );
                let numpolypoints = self.half_plane_intersection(num, hx1, hy1, hx2, hy2);
                if numpolypoints == 0 {
                    return false;
                }
                num = numpolypoints;
                j += 4;
            }
            count += 1;
            while count < numpoints - 1 {
                j = 0;
                while j < 32 {
                    let base = 32 * (i + s * flag);
                    let (hx1, hy1, hx2, hy2) = (
                        self.wedges[base + j],
                        self.wedges[base + 1 + j],
                        self.wedges[base + 2 + j],
                        self.wedges[base + 3 + j],
                    );
                    let numpolypoints = self.half_plane_intersection(num, hx1, hy1, hx2, hy2);
                    if numpolypoints == 0 {
                        return false;
                    }
                    num = numpolypoints;
                    j += 4;
                }
                i += flag;
                flag = (flag + 1) % 2;
                count += 1;
            }
            find_poly_centroid(num, &self.initial_convex_poly, newloc);
            if !behavior.fixed_area {
                return true;
            }
        }
        false
    }

    /// Like the min-angle-only version, but the wedges also carry the
    /// max-angle slab, and a failed centroid is followed by a weighted-average
    /// search over the star's vertices.
    fn get_wedge_intersection(
        &mut self,
        behavior: &Behavior,
        numpoints: usize,
        points: &[f64],
        newloc: &mut [f64; 2],
    ) -> bool {
        if 2 * numpoints > self.petalx.len() {
            self.petalx = vec![0.0; 2 * numpoints];
            self.petaly = vec![0.0; 2 * numpoints];
            self.petalr = vec![0.0; 2 * numpoints];
            self.wedges = vec![0.0; 2 * numpoints * 20 + 40];
        }
        let mut x0 = points[2 * numpoints - 4];
        let mut y0 = points[2 * numpoints - 3];
        let mut x1 = points[2 * numpoints - 2];
        let mut y1 = points[2 * numpoints - 1];
        let alpha = behavior.min_angle() * PI / 180.0;
        let sin_alpha = alpha.sin();
        let cos_alpha = alpha.cos();
        let beta = behavior.max_angle() * PI / 180.0;
        let sin_beta = beta.sin();
        let cos_beta = beta.cos();
        let (petal_center_constant, petal_radius_constant) = if behavior.good_angle == 1.0 {
            (0.0, 0.0)
        } else {
            (0.5 / alpha.tan(), 0.5 / alpha.sin())
        };
        // the slab angle decides how finely the petal arc is subdivided
        let slab_degrees = 2.0 * behavior.max_angle() + behavior.min_angle() - 180.0;
        let (how_many_points, chords) = if slab_degrees <= 0.0 {
            (4usize, 1usize)
        } else if slab_degrees <= 5.0 {
            (6, 2)
        } else if slab_degrees <= 10.0 {
            (8, 3)
        } else {
            (10, 4)
        };
        let slab = slab_degrees * PI / 180.0;
        let mut p1 = [0.0f64; 3];
        let mut p2 = [0.0f64; 3];
        let mut p3 = [0.0f64; 3];
        let mut p4 = [0.0f64; 3];
        let mut i = 0;
        while i < numpoints * 2 {
            let x2 = points[i];
            let y2 = points[i + 1];
            let x01 = x1 - x0;
            let y01 = y1 - y0;
            let d01 = (x01 * x01 + y01 * y01).sqrt();
            let px = x0 + 0.5 * x01 - petal_center_constant * y01;
            let py = y0 + 0.5 * y01 + petal_center_constant * x01;
            let pr = petal_radius_constant * d01;
            self.petalx[i / 2] = px;
            self.petaly[i / 2] = py;
            self.petalr[i / 2] = pr;
            self.petalx[numpoints + i / 2] = px;
            self.petaly[numpoints + i / 2] = py;
            self.petalr[numpoints + i / 2] = pr;
            let xmid = (x0 + x1) / 2.0;
            let ymid = (y0 + y1) / 2.0;
            let dist = squared_distance(px, py, xmid, ymid).sqrt();
            let ux = (px - xmid) / dist;
            let uy = (py - ymid) / dist;
            let x3 = px + ux * pr;
            let y3 = py + uy * pr;
            let (x_1, y_1) = rotate(x1, y1, x0, y0, sin_alpha, cos_alpha);
            self.wedges[i * 20] = x0;
            self.wedges[i * 20 + 1] = y0;
            self.wedges[i * 20 + 2] = x_1;
            self.wedges[i * 20 + 3] = y_1;
            let (x_2, y_2) = rotate(x0, y0, x1, y1, -sin_alpha, cos_alpha);
            self.wedges[i * 20 + 4] = x_2;
            self.wedges[i * 20 + 5] = y_2;
            self.wedges[i * 20 + 6] = x1;
            self.wedges[i * 20 + 7] = y1;
            let mut tempx = x3;
            let mut tempy = y3;
            for j in 1..chords {
                let theta = slab / (chords as f64 - 1.0) * j as f64;
                let (x_3, y_3) = rotate(x3, y3, px, py, -theta.sin(), theta.cos());
                self.wedges[i * 20 + 8 + 4 * (j - 1)] = x_3;
                self.wedges[i * 20 + 9 + 4 * (j - 1)] = y_3;
                self.wedges[i * 20 + 10 + 4 * (j - 1)] = tempx;
                self.wedges[i * 20 + 11 + 4 * (j - 1)] = tempy;
                tempx = x_3;
                tempy = y_3;
            }
            let (x_5, y_5) = rotate(x0, y0, x1, y1, -sin_beta, cos_beta);
            self.wedges[i * 20 + 20] = x1;
            self.wedges[i * 20 + 21] = y1;
            self.wedges[i * 20 + 22] = x_5;
            self.wedges[i * 20 + 23] = y_5;
            tempx = x3;
            tempy = y3;
            for j in 1..chords {
                let theta = slab / (chords as f64 - 1.0) * j as f64;
                let (x_4, y_4) = rotate(x3, y3, px, py, theta.sin(), theta.cos());
                self.wedges[i * 20 + 24 + 4 * (j - 1)] = tempx;
                self.wedges[i * 20 + 25 + 4 * (j - 1)] = tempy;
                self.wedges[i * 20 + 26 + 4 * (j - 1)] = x_4;
                self.wedges[i * 20 + 27 + 4 * (j - 1)] = y_4;
                tempx = x_4;
                tempy = y_4;
            }
            let (x_6, y_6) = rotate(x1, y1, x0, y0, sin_beta, cos_beta);
            self.wedges[i * 20 + 36] = x_6;
            self.wedges[i * 20 + 37] = y_6;
            self.wedges[i * 20 + 38] = x0;
            self.wedges[i * 20 + 39] = y0;
            if i == 0 {
                match how_many_points {
                    4 => {
                        line_line_intersection(x0, y0, x_1, y_1, x1, y1, x_2, y_2, &mut p1);
                        line_line_intersection(x0, y0, x_1, y_1, x1, y1, x_5, y_5, &mut p2);
                        line_line_intersection(x0, y0, x_6, y_6, x1, y1, x_5, y_5, &mut p3);
                        line_line_intersection(x0, y0, x_6, y_6, x1, y1, x_2, y_2, &mut p4);
                        if p1[0] == 1.0 && p2[0] == 1.0 && p3[0] == 1.0 && p4[0] == 1.0 {
                            self.initial_convex_poly[0] = p1[1];
                            self.initial_convex_poly[1] = p1[2];
                            self.initial_convex_poly[2] = p2[1];
                            self.initial_convex_poly[3] = p2[2];
                            self.initial_convex_poly[4] = p3[1];
                            self.initial_convex_poly[5] = p3[2];
                            self.initial_convex_poly[6] = p4[1];
                            self.initial_convex_poly[7] = p4[2];
                        }
                    }
                    6 => {
                        line_line_intersection(x0, y0, x_1, y_1, x1, y1, x_2, y_2, &mut p1);
                        line_line_intersection(x0, y0, x_1, y_1, x1, y1, x_5, y_5, &mut p2);
                        line_line_intersection(x0, y0, x_6, y_6, x1, y1, x_2, y_2, &mut p3);
                        if p1[0] == 1.0 && p2[0] == 1.0 && p3[0] == 1.0 {
                            self.initial_convex_poly[0] = p1[1];
                            self.initial_convex_poly[1] = p1[2];
                            self.initial_convex_poly[2] = p2[1];
                            self.initial_convex_poly[3] = p2[2];
                            self.initial_convex_poly[4] = self.wedges[i * 20 + 8];
                            self.initial_convex_poly[5] = self.wedges[i * 20 + 9];
                            self.initial_convex_poly[6] = x3;
                            self.initial_convex_poly[7] = y3;
                            self.initial_convex_poly[8] = self.wedges[i * 20 + 26];
                            self.initial_convex_poly[9] = self.wedges[i * 20 + 27];
                            self.initial_convex_poly[10] = p3[1];
                            self.initial_convex_poly[11] = p3[2];
                        }
                    }
                    8 => {
                        line_line_intersection(x0, y0, x_1, y_1, x1, y1, x_2, y_2, &mut p1);
                        line_line_intersection(x0, y0, x_1, y_1, x1, y1, x_5, y_5, &mut p2);
                        line_line_intersection(x0, y0, x_6, y_6, x1, y1, x_2, y_2, &mut p3);
                        if p1[0] == 1.0 && p2[0] == 1.0 && p3[0] == 1.0 {
                            self.initial_convex_poly[0] = p1[1];
                            self.initial_convex_poly[1] = p1[2];
                            self.initial_convex_poly[2] = p2[1];
                            self.initial_convex_poly[3] = p2[2];
                            self.initial_convex_poly[4] = self.wedges[i * 20 + 12];
                            self.initial_convex_poly[5] = self.wedges[i * 20 + 13];
                            self.initial_convex_poly[6] = self.wedges[i * 20 + 8];
                            self.initial_convex_poly[7] = self.wedges[i * 20 + 9];
                            self.initial_convex_poly[8] = x3;
                            self.initial_convex_poly[9] = y3;
                            self.initial_convex_poly[10] = self.wedges[i * 20 + 26];
                            self.initial_convex_poly[11] = self.wedges[i * 20 + 27];
                            self.initial_convex_poly[12] = self.wedges[i * 20 + 30];
                            self.initial_convex_poly[13] = self.wedges[i * 20 + 31];
                            self.initial_convex_poly[14] = p3[1];
                            self.initial_convex_poly[15] = p3[2];
                        }
                    }
                    _ => {
                        line_line_intersection(x0, y0, x_1, y_1, x1, y1, x_2, y_2, &mut p1);
                        line_line_intersection(x0, y0, x_1, y_1, x1, y1, x_5, y_5, &mut p2);
                        line_line_intersection(x0, y0, x_6, y_6, x1, y1, x_2, y_2, &mut p3);
                        if p1[0] == 1.0 && p2[0] == 1.0 && p3[0] == 1.0 {
                            self.initial_convex_poly[0] = p1[1];
                            self.initial_convex_poly[1] = p1[2];
                            self.initial_convex_poly[2] = p2[1];
                            self.initial_convex_poly[3] = p2[2];
                            self.initial_convex_poly[4] = self.wedges[i * 20 + 16];
                            self.initial_convex_poly[5] = self.wedges[i * 20 + 17];
                            self.initial_convex_poly[6] = self.wedges[i * 20 + 12];
                            self.initial_convex_poly[7] = self.wedges[i * 20 + 13];
                            self.initial_convex_poly[8] = self.wedges[i * 20 + 8];
                            self.initial_convex_poly[9] = self.wedges[i * 20 + 9];
                            self.initial_convex_poly[10] = x3;
                            self.initial_convex_poly[11] = y3;
                            self.initial_convex_poly[12] = self.wedges[i * 20 + 28];
                            self.initial_convex_poly[13] = self.wedges[i * 20 + 29];
                            self.initial_convex_poly[14] = self.wedges[i * 20 + 32];
                            self.initial_convex_poly[15] = self.wedges[i * 20 + 33];
                            self.initial_convex_poly[16] = self.wedges[i * 20 + 34];
                            self.initial_convex_poly[17] = self.wedges[i * 20 + 35];
                            self.initial_convex_poly[18] = p3[1];
                            self.initial_convex_poly[19] = p3[2];
                        }
                    }
                }
            }
            x0 = x1;
            y0 = y1;
            x1 = x2;
            y1 = y2;
            i += 2;
        }
        if numpoints != 0 {
            let skip = |j: usize| match how_many_points {
                4 => matches!(j, 8 | 12 | 16 | 24 | 28 | 32),
                6 => matches!(j, 12 | 16 | 28 | 32),
                8 => matches!(j, 16 | 32),
                _ => false,
            };
            let s = (numpoints - 1) / 2 + 1;
            let mut flag = 0usize;
            let mut count = 0usize;
            let mut i = 1usize;
            let mut num = how_many_points;
            let mut j = 0usize;
            while j < 40 {
                if !skip(j) {
                    let (hx1, hy1, hx2, hy2) = (
                        self.wedges[40 * s + j],
                        self.wedges[40 * s + 1 + j],
                        self.wedges[40 * s + 2 + j],
                        self.wedges[40 * s + 3 + j],
                    );
                    let numpolypoints = self.half_plane_intersection(num, hx1, hy1, hx2, hy2);
                    if numpolypoints == 0 {
                        return false;
                    }
                    num = numpolypoints;
                }
                j += 4;
            }
            count += 1;
            while count < numpoints - 1 {
                j = 0;
                while j < 40 {
                    if !skip(j) {
                        let base = 40 * (i + s * flag);
                        let (hx1, hy1, hx2, hy2) = (
                            self.wedges[base + j],
                            self.wedges[base + 1 + j],
                            self.wedges[base + 2 + j],
                            self.wedges[base + 3 + j],
                        );
                        let numpolypoints =
                            self.half_plane_intersection(num, hx1, hy1, hx2, hy2);
                        if numpolypoints == 0 {
                            return false;
                        }
                        num = numpolypoints;
                    }
                    j += 4;
                }
                i += flag;
                flag = (flag + 1) % 2;
                count += 1;
            }
            find_poly_centroid(num, &self.initial_convex_poly, newloc);
            if behavior.max_angle() != 0.0 {
                let count_bad = |x: f64, y: f64| {
                    let mut bad = 0;
                    let mut j = 0;
                    while j < numpoints * 2 - 2 {
                        if is_bad_triangle_angle(
                            behavior,
                            x,
                            y,
                            points[j],
                            points[j + 1],
                            points[j + 2],
                            points[j + 3],
                        ) {
                            bad += 1;
                        }
                        j += 2;
                    }
                    if is_bad_triangle_angle(
                        behavior,
                        x,
                        y,
                        points[0],
                        points[1],
                        points[numpoints * 2 - 2],
                        points[numpoints * 2 - 1],
                    ) {
                        bad += 1;
                    }
                    bad
                };
                if count_bad(newloc[0], newloc[1]) == 0 {
                    return true;
                }
                // centroid failed; sweep weighted averages biased towards
                // each star vertex in turn
                let n = if numpoints <= 2 { 20 } else { 30 };
                let mut k = 0;
                while k < 2 * numpoints {
                    for e in 1..n {
                        newloc[0] = 0.0;
                        newloc[1] = 0.0;
                        let mut i = 0;
                        while i < 2 * numpoints {
                            let mut weight = 1.0 / numpoints as f64;
                            if i == k {
                                newloc[0] += 0.1 * e as f64 * weight * points[i];
                                newloc[1] += 0.1 * e as f64 * weight * points[i + 1];
                            } else {
                                weight =
                                    (1.0 - 0.1 * e as f64 * weight) / (numpoints as f64 - 1.0);
                                newloc[0] += weight * points[i];
                                newloc[1] += weight * points[i + 1];
                            }
                            i += 2;
                        }
                        if count_bad(newloc[0], newloc[1]) == 0 {
                            return true;
                        }
                    }
                    k += 2;
                }
            } else {
                return true;
            }
        }
        false
    }

    /// Clip the working polygon against the half plane left of the directed
    /// line `(x1,y1)->(x2,y2)`. Returns the new vertex count, 0 when nothing
    /// survives.
    fn half_plane_intersection(
        &mut self,
        numvertices: usize,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    ) -> usize {
        let dx = x2 - x1;
        let dy = y2 - y1;
        let numpolys = split_convex_polygon(
            numvertices,
            &self.initial_convex_poly,
            x1,
            y1,
            x2,
            y2,
            &mut self.poly1,
            &mut self.poly2,
        );
        let mut count = 0usize;
        if numpolys == 3 {
            // degenerate split; keep the polygon as is
            count = numvertices;
        } else {
            let mut winner = None;
            for i in 0..numpolys {
                let poly: &[f64; 100] = if i == 0 { &self.poly1 } else { &self.poly2 };
                let mut min = f64::MAX;
                let mut max = f64::MIN_POSITIVE;
                let c = poly[0] as usize;
                for k in 0..c {
                    let j = 1 + 2 * k;
                    let z = dx * (poly[j + 1] - y1) - dy * (poly[j] - x1);
                    if z < min {
                        min = z;
                    }
                    if z > max {
                        max = z;
                    }
                }
                let z = if min.abs() > max.abs() { min } else { max };
                if z > 0.0 {
                    winner = Some(i);
                    break;
                }
            }
            if let Some(i) = winner {
                let poly: &[f64; 100] = if i == 0 { &self.poly1 } else { &self.poly2 };
                let c = poly[0] as usize;
                while count < c {
                    self.initial_convex_poly[2 * count] = poly[2 * count + 1];
                    self.initial_convex_poly[2 * count + 1] = poly[2 * count + 2];
                    count += 1;
                }
            }
        }
        count
    }

    /// Squared distance from a candidate location to the nearest corner of
    /// the triangle that contains it. Zero when the point lands on a vertex
    /// or outside the triangulation.
    fn min_distance_to_neighbor(
        mesh: &Mesh,
        newloc_x: f64,
        newloc_y: f64,
        searchtri: &mut OTri,
        no_exact: bool,
    ) -> f64 {
        let mut horiz = OTri::none();
        let mut intersect = LocateResult::Outside;
        let newvertex = Point::new(newloc_x, newloc_y);
        let torg = mesh.vertices[searchtri.org(&mesh.triangles).index()].point();
        let tdest = mesh.vertices[searchtri.dest(&mesh.triangles).index()].point();
        if torg.x == newvertex.x && torg.y == newvertex.y {
            intersect = LocateResult::OnVertex;
            horiz = *searchtri;
        } else if tdest.x == newvertex.x && tdest.y == newvertex.y {
            *searchtri = searchtri.lnext();
            intersect = LocateResult::OnVertex;
            horiz = *searchtri;
        } else {
            let ahead = mesh
                .predicates
                .counter_clockwise(&torg, &tdest, &newvertex, no_exact);
            if ahead < 0.0 {
                *searchtri = searchtri.sym(&mesh.triangles);
                horiz = *searchtri;
                intersect = mesh.locator.precise_locate(
                    &mesh.triangles,
                    &mesh.vertices,
                    &mesh.predicates,
                    mesh.checksegments,
                    &newvertex,
                    &mut horiz,
                    false,
                    no_exact,
                );
            } else if ahead == 0.0 {
                if ((torg.x < newvertex.x) == (newvertex.x < tdest.x))
                    && ((torg.y < newvertex.y) == (newvertex.y < tdest.y))
                {
                    intersect = LocateResult::OnEdge;
                    horiz = *searchtri;
                }
            } else {
                horiz = *searchtri;
                intersect = mesh.locator.precise_locate(
                    &mesh.triangles,
                    &mesh.vertices,
                    &mesh.predicates,
                    mesh.checksegments,
                    &newvertex,
                    &mut horiz,
                    false,
                    no_exact,
                );
            }
        }
        if intersect == LocateResult::OnVertex || intersect == LocateResult::Outside {
            0.0
        } else {
            let v1 = mesh.vertices[horiz.org(&mesh.triangles).index()].point();
            let v2 = mesh.vertices[horiz.dest(&mesh.triangles).index()].point();
            let v3 = mesh.vertices[horiz.apex(&mesh.triangles).index()].point();
            let d1 = squared_distance(v1.x, v1.y, newvertex.x, newvertex.y);
            let d2 = squared_distance(v2.x, v2.y, newvertex.x, newvertex.y);
            let d3 = squared_distance(v3.x, v3.y, newvertex.x, newvertex.y);
            if d1 <= d2 && d1 <= d3 {
                d1
            } else if d2 <= d3 {
                d2
            } else {
                d3
            }
        }
    }
}

/// Order the squared edge lengths; the return value packs the ranks as a
/// three-digit code, e.g. 123 when apex-org is shortest and dest-org longest.
fn longest_shortest_edge(aodist: f64, dadist: f64, dodist: f64) -> i32 {
    let (min, mid, max);
    if dodist < aodist && dodist < dadist {
        min = 3;
        if aodist < dadist {
            max = 2;
            mid = 1;
        } else {
            max = 1;
            mid = 2;
        }
    } else if aodist < dadist {
        min = 1;
        if dodist < dadist {
            max = 2;
            mid = 3;
        } else {
            max = 3;
            mid = 2;
        }
    } else {
        min = 2;
        if aodist < dodist {
            max = 3;
            mid = 1;
        } else {
            max = 1;
            mid = 3;
        }
    }
    min * 100 + mid * 10 + max
}

/// Rotate `(x, y)` around `(cx, cy)`; flip the sign of `sin_a` to flip the
/// direction.
fn rotate(x: f64, y: f64, cx: f64, cy: f64, sin_a: f64, cos_a: f64) -> (f64, f64) {
    (
        x * cos_a - y * sin_a + cx - cx * cos_a + cy * sin_a,
        x * sin_a + y * cos_a + cy - cx * sin_a - cy * cos_a,
    )
}

/// True when every interior angle of the polygon clears twice the minimum
/// angle constraint, the precondition for a relocation attempt.
fn valid_polygon_angles(behavior: &Behavior, numpoints: usize, points: &[f64]) -> bool {
    for i in 0..numpoints {
        if i == numpoints - 1 {
            if is_bad_polygon_angle(
                behavior,
                points[i * 2],
                points[i * 2 + 1],
                points[0],
                points[1],
                points[2],
                points[3],
            ) {
                return false;
            }
        } else if i == numpoints - 2 {
            if is_bad_polygon_angle(
                behavior,
                points[i * 2],
                points[i * 2 + 1],
                points[(i + 1) * 2],
                points[(i + 1) * 2 + 1],
                points[0],
                points[1],
            ) {
                return false;
            }
        } else if is_bad_polygon_angle(
            behavior,
            points[i * 2],
            points[i * 2 + 1],
            points[(i + 1) * 2],
            points[(i + 1) * 2 + 1],
            points[(i + 2) * 2],
            points[(i + 2) * 2 + 1],
        ) {
            return false;
        }
    }
    true
}

fn is_bad_polygon_angle(
    behavior: &Behavior,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
) -> bool {
    let dist12 = squared_distance(x1, y1, x2, y2);
    let dist23 = squared_distance(x2, y2, x3, y3);
    let dist31 = squared_distance(x3, y3, x1, y1);
    let cos_angle = (dist12 + dist23 - dist31) / (2.0 * dist12.sqrt() * dist23.sqrt());
    cos_angle.acos() < 2.0 * behavior.good_angle.sqrt().acos()
}

/// Intersection of two infinite lines given by two points each. `p[0]` is 1
/// on success with the point in `p[1..3]`, 0 for parallel or coincident lines.
fn line_line_intersection(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
    x4: f64,
    y4: f64,
    p: &mut [f64; 3],
) {
    let denom = (y4 - y3) * (x2 - x1) - (x4 - x3) * (y2 - y1);
    let u_a = (x4 - x3) * (y1 - y3) - (y4 - y3) * (x1 - x3);
    let u_b = (x2 - x1) * (y1 - y3) - (y2 - y1) * (x1 - x3);
    if denom.abs() < EPS && u_b.abs() < EPS && u_a.abs() < EPS {
        p[0] = 0.0;
    } else if denom.abs() < EPS {
        p[0] = 0.0;
    } else {
        p[0] = 1.0;
        let u_a = u_a / denom;
        p[1] = x1 + u_a * (x2 - x1);
        p[2] = y1 + u_a * (y2 - y1);
    }
}

/// Split the convex polygon along the infinite line `(x1,y1)-(x2,y2)` into
/// `poly1`/`poly2`, vertex counts in slot 0. Returns the number of pieces;
/// 3 flags a degenerate cut the caller should ignore.
#[allow(clippy::too_many_arguments)]
fn split_convex_polygon(
    numvertices: usize,
    convex_poly: &[f64],
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    poly1: &mut [f64; 100],
    poly2: &mut [f64; 100],
) -> usize {
    const COMP_CONST: f64 = 0.000_000_000_001;
    let mut state = 0usize;
    let mut p = [0.0f64; 3];
    let mut poly1counter = 0usize;
    let mut poly2counter = 0usize;
    let mut i = 0usize;
    while i < 2 * numvertices {
        let j = if i + 2 >= 2 * numvertices { 0 } else { i + 2 };
        line_line_segment_intersection(
            x1,
            y1,
            x2,
            y2,
            convex_poly[i],
            convex_poly[i + 1],
            convex_poly[j],
            convex_poly[j + 1],
            &mut p,
        );
        if p[0].abs() <= COMP_CONST {
            // no intersection with this edge
            if state == 1 {
                poly2counter += 1;
                poly2[2 * poly2counter - 1] = convex_poly[j];
                poly2[2 * poly2counter] = convex_poly[j + 1];
            } else {
                poly1counter += 1;
                poly1[2 * poly1counter - 1] = convex_poly[j];
                poly1[2 * poly1counter] = convex_poly[j + 1];
            }
        } else if (p[0] - 2.0).abs() <= COMP_CONST {
            // the edge lies on the line
            poly1counter += 1;
            poly1[2 * poly1counter - 1] = convex_poly[j];
            poly1[2 * poly1counter] = convex_poly[j + 1];
        } else if (p[1] - convex_poly[j]).abs() <= COMP_CONST
            && (p[2] - convex_poly[j + 1]).abs() <= COMP_CONST
        {
            // intersection at the far endpoint
            if state == 1 {
                poly2counter += 1;
                poly2[2 * poly2counter - 1] = convex_poly[j];
                poly2[2 * poly2counter] = convex_poly[j + 1];
                poly1counter += 1;
                poly1[2 * poly1counter - 1] = convex_poly[j];
                poly1[2 * poly1counter] = convex_poly[j + 1];
                state += 1;
            } else if state == 0 {
                poly1counter += 1;
                poly1[2 * poly1counter - 1] = convex_poly[j];
                poly1[2 * poly1counter] = convex_poly[j + 1];
                if i + 4 < 2 * numvertices {
                    let s1 = line_point_location(x1, y1, x2, y2, convex_poly[i], convex_poly[i + 1]);
                    let s2 =
                        line_point_location(x1, y1, x2, y2, convex_poly[i + 4], convex_poly[i + 5]);
                    // the line really crosses here only if the flanking
                    // vertices sit on opposite sides
                    if s1 != s2 && s1 != 0 && s2 != 0 {
                        poly2counter += 1;
                        poly2[2 * poly2counter - 1] = convex_poly[j];
                        poly2[2 * poly2counter] = convex_poly[j + 1];
                        state += 1;
                    }
                }
            }
        } else if !((p[1] - convex_poly[i]).abs() <= COMP_CONST
            && (p[2] - convex_poly[i + 1]).abs() <= COMP_CONST)
        {
            // proper crossing; both pieces get the intersection point
            poly1counter += 1;
            poly1[2 * poly1counter - 1] = p[1];
            poly1[2 * poly1counter] = p[2];
            poly2counter += 1;
            poly2[2 * poly2counter - 1] = p[1];
            poly2[2 * poly2counter] = p[2];
            if state == 1 {
                poly1counter += 1;
                poly1[2 * poly1counter - 1] = convex_poly[j];
                poly1[2 * poly1counter] = convex_poly[j + 1];
            } else if state == 0 {
                poly2counter += 1;
                poly2[2 * poly2counter - 1] = convex_poly[j];
                poly2[2 * poly2counter] = convex_poly[j + 1];
            }
            state += 1;
        } else {
            // intersection at the near endpoint, already handled there
            if state == 1 {
                poly2counter += 1;
                poly2[2 * poly2counter - 1] = convex_poly[j];
                poly2[2 * poly2counter] = convex_poly[j + 1];
            } else {
                poly1counter += 1;
                poly1[2 * poly1counter - 1] = convex_poly[j];
                poly1[2 * poly1counter] = convex_poly[j + 1];
            }
        }
        i += 2;
    }
    if state != 0 && state != 2 {
        3
    } else {
        poly1[0] = poly1counter as f64;
        poly2[0] = poly2counter as f64;
        if state == 0 { 1 } else { 2 }
    }
}

/// Which side of the directed line the point is on: 0 on the line, 1 left,
/// 2 right.
fn line_point_location(x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> i32 {
    if ((y2 - y1) / (x2 - x1)).atan() * 180.0 / PI == 90.0 {
        if (x1 - x).abs() <= 0.000_000_000_01 {
            return 0;
        }
    } else if (y1 + (y2 - y1) * (x - x1) / (x2 - x1) - y).abs() <= EPS {
        return 0;
    }
    let z = (x2 - x1) * (y - y1) - (y2 - y1) * (x - x1);
    if z.abs() <= 0.000_000_000_01 {
        0
    } else if z > 0.0 {
        1
    } else {
        2
    }
}

/// Intersection of the infinite line `1-2` with the segment `3-4`. `p[0]` is
/// 1 on a proper hit, 2 when they are collinear, 0 otherwise.
fn line_line_segment_intersection(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
    x4: f64,
    y4: f64,
    p: &mut [f64; 3],
) {
    const COMP_CONST: f64 = 0.000_000_000_000_1;
    let denom = (y4 - y3) * (x2 - x1) - (x4 - x3) * (y2 - y1);
    let u_a = (x4 - x3) * (y1 - y3) - (y4 - y3) * (x1 - x3);
    let u_b = (x2 - x1) * (y1 - y3) - (y2 - y1) * (x1 - x3);
    if denom.abs() < COMP_CONST {
        if u_b.abs() < COMP_CONST && u_a.abs() < COMP_CONST {
            p[0] = 2.0;
        } else {
            p[0] = 0.0;
        }
    } else {
        let u_b = u_b / denom;
        let u_a = u_a / denom;
        if !(-COMP_CONST..=1.0 + COMP_CONST).contains(&u_b) {
            p[0] = 0.0;
        } else {
            p[0] = 1.0;
            p[1] = x1 + u_a * (x2 - x1);
            p[2] = y1 + u_a * (y2 - y1);
        }
    }
}

fn find_poly_centroid(numpoints: usize, points: &[f64], centroid: &mut [f64; 2]) {
    centroid[0] = 0.0;
    centroid[1] = 0.0;
    let mut i = 0;
    while i < 2 * numpoints {
        centroid[0] += points[i];
        centroid[1] += points[i + 1];
        i += 2;
    }
    centroid[0] /= numpoints as f64;
    centroid[1] /= numpoints as f64;
}

/// Intersect the line through `(x1,y1)` and `(x2,y2)` with the circle at
/// `(x3,y3)` of radius `r`. `p[0]` counts the hits, the points follow.
#[allow(clippy::too_many_arguments)]
fn circle_line_intersection(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
    r: f64,
    p: &mut [f64; 5],
) {
    let a = (x2 - x1) * (x2 - x1) + (y2 - y1) * (y2 - y1);
    let b = 2.0 * ((x2 - x1) * (x1 - x3) + (y2 - y1) * (y1 - y3));
    let c = x3 * x3 + y3 * y3 + x1 * x1 + y1 * y1 - 2.0 * (x3 * x1 + y3 * y1) - r * r;
    let i = b * b - 4.0 * a * c;
    if i < 0.0 {
        p[0] = 0.0;
    } else if i.abs() < EPS {
        p[0] = 1.0;
        let mu = -b / (2.0 * a);
        p[1] = x1 + mu * (x2 - x1);
        p[2] = y1 + mu * (y2 - y1);
    } else if i > 0.0 && a.abs() >= EPS {
        p[0] = 2.0;
        let mut mu = (-b + i.sqrt()) / (2.0 * a);
        p[1] = x1 + mu * (x2 - x1);
        p[2] = y1 + mu * (y2 - y1);
        mu = (-b - i.sqrt()) / (2.0 * a);
        p[3] = x1 + mu * (x2 - x1);
        p[4] = y1 + mu * (y2 - y1);
    } else {
        p[0] = 0.0;
    }
}

/// Pick between the two circle intersections: for an obtuse triangle the one
/// farther from the reference point `(x1,y1)`, otherwise the nearer one.
/// True means `(x3,y3)` is the one to keep.
fn choose_correct_point(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
    is_obtuse: bool,
) -> bool {
    let d1 = squared_distance(x2, y2, x3, y3);
    let d2 = squared_distance(x2, y2, x1, y1);
    if is_obtuse { d2 >= d1 } else { d2 < d1 }
}

/// If `(x, y)` lies nearer to `(x2,y2)` than `(x1,y1)` does, report it in
/// `p` together with its squared distance.
fn point_between_points(x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64, p: &mut [f64; 4]) {
    if squared_distance(x2, y2, x, y) < squared_distance(x2, y2, x1, y1) {
        p[0] = 1.0;
        p[1] = squared_distance(x, y, x2, y2);
        p[2] = x;
        p[3] = y;
    } else {
        p[0] = 0.0;
        p[1] = 0.0;
        p[2] = 0.0;
        p[3] = 0.0;
    }
}

/// Does the triangle `1-2-3` violate the minimum or maximum angle bound?
fn is_bad_triangle_angle(
    behavior: &Behavior,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
) -> bool {
    let dxod = x1 - x2;
    let dyod = y1 - y2;
    let dxda = x2 - x3;
    let dyda = y2 - y3;
    let dxao = x3 - x1;
    let dyao = y3 - y1;
    let apexlen = dxod * dxod + dyod * dyod;
    let orglen = dxda * dxda + dyda * dyda;
    let destlen = dxao * dxao + dyao * dyao;
    let angle = if apexlen < orglen && apexlen < destlen {
        let dot = dxda * dxao + dyda * dyao;
        dot * dot / (orglen * destlen)
    } else if orglen < destlen {
        let dot = dxod * dxao + dyod * dyao;
        dot * dot / (apexlen * destlen)
    } else {
        let dot = dxod * dxda + dyod * dyda;
        dot * dot / (apexlen * orglen)
    };
    let max_angle = if apexlen > orglen && apexlen > destlen {
        (orglen + destlen - apexlen) / (2.0 * (orglen * destlen).sqrt())
    } else if orglen > destlen {
        (apexlen + destlen - orglen) / (2.0 * (apexlen * destlen).sqrt())
    } else {
        (apexlen + orglen - destlen) / (2.0 * (apexlen * orglen).sqrt())
    };
    angle > behavior.good_angle
        || (behavior.max_angle() != 0.0 && max_angle < behavior.max_good_angle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_ranking_covers_all_orders() {
        // aodist, dadist, dodist
        assert_eq!(longest_shortest_edge(1.0, 2.0, 3.0), 123);
        assert_eq!(longest_shortest_edge(1.0, 3.0, 2.0), 132);
        assert_eq!(longest_shortest_edge(2.0, 1.0, 3.0), 213);
        assert_eq!(longest_shortest_edge(3.0, 1.0, 2.0), 231);
        assert_eq!(longest_shortest_edge(2.0, 3.0, 1.0), 312);
        assert_eq!(longest_shortest_edge(3.0, 2.0, 1.0), 321);
    }

    #[test]
    fn parallel_lines_do_not_intersect() {
        let mut p = [0.0f64; 3];
        line_line_intersection(0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, &mut p);
        assert_eq!(p[0], 0.0);
    }

    #[test]
    fn crossing_lines_meet_where_expected() {
        let mut p = [0.0f64; 3];
        line_line_intersection(0.0, 0.0, 2.0, 2.0, 0.0, 2.0, 2.0, 0.0, &mut p);
        assert_eq!(p[0], 1.0);
        assert!((p[1] - 1.0).abs() < 1e-12);
        assert!((p[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn secant_line_hits_circle_twice() {
        let mut p = [0.0f64; 5];
        circle_line_intersection(-2.0, 0.0, 2.0, 0.0, 0.0, 0.0, 1.0, &mut p);
        assert_eq!(p[0], 2.0);
        assert!((p[1] - 1.0).abs() < 1e-12);
        assert!((p[3] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn missing_line_misses_circle() {
        let mut p = [0.0f64; 5];
        circle_line_intersection(-2.0, 5.0, 2.0, 5.0, 0.0, 0.0, 1.0, &mut p);
        assert_eq!(p[0], 0.0);
    }

    #[test]
    fn centroid_of_unit_square() {
        let square = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
        let mut c = [0.0f64; 2];
        find_poly_centroid(4, &square, &mut c);
        assert!((c[0] - 0.5).abs() < 1e-12);
        assert!((c[1] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn point_between_reports_squared_distance() {
        let mut p = [0.0f64; 4];
        point_between_points(0.0, 0.0, 4.0, 0.0, 3.0, 0.0, &mut p);
        assert_eq!(p[0], 1.0);
        assert_eq!(p[1], 1.0);
        point_between_points(3.0, 0.0, 4.0, 0.0, 0.0, 0.0, &mut p);
        assert_eq!(p[0], 0.0);
    }

    #[test]
    fn obtuse_choice_prefers_the_far_intersection() {
        // reference at origin, intersection candidate at (3,0), circumcenter
        // at (1,0): obtuse keeps the far point, acute the near one
        assert!(choose_correct_point(3.0, 0.0, 1.0, 0.0, 0.0, 0.0, true));
        assert!(!choose_correct_point(3.0, 0.0, 1.0, 0.0, 0.0, 0.0, false));
    }

    #[test]
    fn equilateral_triangle_passes_a_20_degree_bound() {
        let b = Behavior::new(true, 20.0);
        let h = 3.0f64.sqrt() / 2.0;
        assert!(!is_bad_triangle_angle(&b, 0.0, 0.0, 1.0, 0.0, 0.5, h));
        // a needle triangle fails it
        assert!(is_bad_triangle_angle(&b, 0.0, 0.0, 1.0, 0.0, 0.5, 0.01));
    }

    #[test]
    fn splitting_a_square_yields_two_pieces() {
        let mut square = [0.0f64; 500];
        square[..8].copy_from_slice(&[0.0, 0.0, 2.0, 0.0, 2.0, 2.0, 0.0, 2.0]);
        let mut poly1 = [0.0f64; 100];
        let mut poly2 = [0.0f64; 100];
        // vertical cut through the middle
        let n = split_convex_polygon(4, &square, 1.0, -1.0, 1.0, 3.0, &mut poly1, &mut poly2);
        assert_eq!(n, 2);
        assert_eq!(poly1[0] as usize + poly2[0] as usize, 8);
    }
}
