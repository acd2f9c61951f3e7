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

//! Ruppert-style Delaunay refinement.
//!
//! The driver alternates between two repair loops until no flaw remains (or
//! the Steiner point budget runs out): encroached subsegments are split at a
//! point chosen so repeated splits stay off degenerate length ratios, and
//! skinny or oversized triangles are split at their circumcenter (or an
//! off-center location that avoids over-refinement). A circumcenter insertion
//! that would encroach a subsegment is rolled back and the subsegment split
//! instead, which is what guarantees termination.

use std::collections::VecDeque;

use crate::behavior::{Behavior, BoundarySplitMode, TriangleTest};
use crate::geometry::osub::OSub;
use crate::geometry::otri::OTri;
use crate::geometry::point::{Point, VId, Vertex, VertexKind};
use crate::mesh::mesh::{InsertVertexResult, Mesh};
use crate::mesh::pool::{SubSegPool, TrianglePool};
use crate::meshing::bad_tri_queue::{BadSubsegment, BadTriQueue, BadTriangle};
use crate::meshing::new_location::NewLocation;

/// Constraints handed to [`Mesh::refine`].
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityOptions {
    /// Minimum interior angle, degrees. Zero disables the angle bound.
    pub minimum_angle: f64,
    /// Maximum interior angle, degrees. Zero disables the bound.
    pub maximum_angle: f64,
    /// Global maximum triangle area. Non-positive disables the bound.
    pub maximum_area: f64,
    /// Arbitrary per-triangle test; `true` means "split this one".
    pub user_test: Option<TriangleTest>,
    /// Honor per-triangle area constraints set on the records.
    pub constrain_area: bool,
    /// Maximum number of Steiner points, zero meaning unlimited.
    pub steiner_points: i32,
}

pub struct QualityMesher {
    badsubsegs: VecDeque<BadSubsegment>,
    queue: BadTriQueue,
    new_location: NewLocation,
}

impl Default for QualityMesher {
    fn default() -> Self {
        QualityMesher::new()
    }
}

impl QualityMesher {
    pub fn new() -> Self {
        QualityMesher {
            badsubsegs: VecDeque::new(),
            queue: BadTriQueue::new(),
            new_location: NewLocation::new(),
        }
    }

    pub(crate) fn add_bad_subseg(&mut self, badseg: BadSubsegment) {
        self.badsubsegs.push_back(badseg);
    }

    /// Apply the constraints in `quality` to `mesh` and run refinement.
    pub fn apply(
        &mut self,
        mesh: &mut Mesh,
        quality: Option<&QualityOptions>,
        conforming_delaunay: bool,
    ) -> Result<(), &'static str> {
        if let Some(quality) = quality {
            mesh.behavior.set_quality(true);
            mesh.behavior.set_min_angle(quality.minimum_angle);
            mesh.behavior.set_max_angle(quality.maximum_angle);
            mesh.behavior.set_max_area(quality.maximum_area);
            mesh.behavior.usertest = quality.user_test;
            mesh.behavior.var_area = quality.constrain_area;
            mesh.behavior.conforming_delaunay =
                mesh.behavior.conforming_delaunay || conforming_delaunay;
            mesh.steiner_left = if quality.steiner_points == 0 {
                -1
            } else {
                quality.steiner_points
            };
        }
        if !mesh.behavior.planar_straight_line_graph {
            mesh.behavior.var_area = false;
        }
        mesh.infvertex1 = VId::NONE;
        mesh.infvertex2 = VId::NONE;
        mesh.infvertex3 = VId::NONE;
        if mesh.behavior.use_segments {
            mesh.checksegments = true;
        }
        if mesh.behavior.quality() && mesh.num_triangles() > 0 {
            let no_exact = mesh.behavior.disable_exact_math;
            self.enforce_quality(mesh, no_exact)?;
        }
        Ok(())
    }

    /// Test whether `testsubseg` is encroached (a vertex lies inside its
    /// diametral lens), queueing it for splitting if so. Returns 0 if not
    /// encroached, 1 or 2 naming the encroached side, 3 for both.
    pub(crate) fn check_seg4_encroach(
        &mut self,
        pool: &TrianglePool,
        subs: &SubSegPool,
        vertices: &[Vertex],
        behavior: &Behavior,
        testsubseg: OSub,
    ) -> i32 {
        let mut encroached = 0;
        let mut sides = 0;
        let eorg = &vertices[testsubseg.org(subs).index()];
        let edest = &vertices[testsubseg.dest(subs).index()];

        // the diametral lens angle is derived from the minimum-angle bound;
        // conforming mode falls back to the full diametral circle
        let lens = (2.0 * behavior.good_angle - 1.0) * (2.0 * behavior.good_angle - 1.0);
        let mut check_side = |neighbortri: OTri| -> bool {
            if neighbortri.tri.is_dummy() {
                return false;
            }
            sides += 1;
            let eapex = &vertices[neighbortri.apex(pool).index()];
            let dotproduct = (eorg.x - eapex.x) * (edest.x - eapex.x)
                + (eorg.y - eapex.y) * (edest.y - eapex.y);
            if dotproduct < 0.0 {
                behavior.conforming_delaunay
                    || dotproduct * dotproduct
                        >= lens
                            * ((eorg.x - eapex.x) * (eorg.x - eapex.x)
                                + (eorg.y - eapex.y) * (eorg.y - eapex.y))
                            * ((edest.x - eapex.x) * (edest.x - eapex.x)
                                + (edest.y - eapex.y) * (edest.y - eapex.y))
            } else {
                false
            }
        };
        if check_side(testsubseg.tri_pivot(subs)) {
            encroached = 1;
        }
        let testsym = testsubseg.sym();
        if check_side(testsym.tri_pivot(subs)) {
            encroached += 2;
        }

        if encroached > 0
            && (behavior.boundary_split_mode == BoundarySplitMode::Split
                || (behavior.boundary_split_mode == BoundarySplitMode::SplitInternalOnly
                    && sides == 2))
        {
            let bad = if encroached == 1 {
                BadSubsegment {
                    subseg: testsubseg,
                    org: testsubseg.org(subs),
                    dest: testsubseg.dest(subs),
                }
            } else {
                BadSubsegment {
                    subseg: testsym,
                    org: testsym.org(subs),
                    dest: testsym.dest(subs),
                }
            };
            self.badsubsegs.push_back(bad);
        }
        encroached
    }

    /// Test `testtri` against the angle, area, and user constraints, queueing
    /// it for splitting if it fails any.
    pub(crate) fn test_triangle(
        &mut self,
        pool: &TrianglePool,
        subs: &SubSegPool,
        vertices: &[Vertex],
        behavior: &Behavior,
        testtri: OTri,
    ) {
        let torg_id = testtri.org(pool);
        let tdest_id = testtri.dest(pool);
        let tapex_id = testtri.apex(pool);
        let torg = &vertices[torg_id.index()];
        let tdest = &vertices[tdest_id.index()];
        let tapex = &vertices[tapex_id.index()];
        let dxod = torg.x - tdest.x;
        let dyod = torg.y - tdest.y;
        let dxda = tdest.x - tapex.x;
        let dyda = tdest.y - tapex.y;
        let dxao = tapex.x - torg.x;
        let dyao = tapex.y - torg.y;
        let apexlen = dxod * dxod + dyod * dyod;
        let orglen = dxda * dxda + dyda * dyda;
        let destlen = dxao * dxao + dyao * dyao;

        // shortest edge, its squared-cosine apex angle, and its endpoints
        let (minedge, angle, base1, base2, tri1);
        if apexlen < orglen && apexlen < destlen {
            minedge = apexlen;
            let a = dxda * dxao + dyda * dyao;
            angle = a * a / (orglen * destlen);
            base1 = torg;
            base2 = tdest;
            tri1 = testtri;
        } else if orglen < destlen {
            minedge = orglen;
            let a = dxod * dxao + dyod * dyao;
            angle = a * a / (apexlen * destlen);
            base1 = tdest;
            base2 = tapex;
            tri1 = testtri.lnext();
        } else {
            minedge = destlen;
            let a = dxod * dxda + dyod * dyda;
            angle = a * a / (apexlen * orglen);
            base1 = tapex;
            base2 = torg;
            tri1 = testtri.lprev();
        }

        let enqueue = |q: &mut BadTriQueue| {
            q.enqueue(BadTriangle {
                poortri: testtri,
                key: minedge,
                org: torg_id,
                dest: tdest_id,
                apex: tapex_id,
            });
        };

        if behavior.var_area || behavior.fixed_area || behavior.usertest.is_some() {
            let area = 0.5 * (dxod * dyda - dyod * dxda);
            if behavior.fixed_area && area > behavior.max_area() {
                enqueue(&mut self.queue);
                return;
            }
            let record = &pool[testtri.tri];
            if behavior.var_area && area > record.area && record.area > 0.0 {
                enqueue(&mut self.queue);
                return;
            }
            if let Some(usertest) = behavior.usertest {
                if usertest(record, area) {
                    enqueue(&mut self.queue);
                    return;
                }
            }
        }

        let maxangle = if apexlen > orglen && apexlen > destlen {
            (orglen + destlen - apexlen) / (2.0 * (orglen * destlen).sqrt())
        } else if orglen > destlen {
            (apexlen + destlen - orglen) / (2.0 * (apexlen * destlen).sqrt())
        } else {
            (apexlen + orglen - destlen) / (2.0 * (apexlen * orglen).sqrt())
        };

        if angle > behavior.good_angle
            || (maxangle < behavior.max_good_angle && behavior.max_angle() != 0.0)
        {
            // a skinny triangle between two segments meeting at a small input
            // angle cannot be improved; skip it when the shortest edge splits
            // the seam evenly
            if base1.kind == VertexKind::Segment && base2.kind == VertexKind::Segment {
                let testsub = tri1.pivot(pool);
                if testsub.seg.is_dummy() {
                    let mut walk1 = tri1;
                    let sub1 = loop {
                        walk1 = walk1.oprev(pool);
                        let ts = walk1.pivot(pool);
                        if !ts.seg.is_dummy() {
                            break ts;
                        }
                    };
                    let org1 = &vertices[sub1.seg_org(subs).index()];
                    let dest1 = &vertices[sub1.seg_dest(subs).index()];
                    let mut walk2 = tri1;
                    let sub2 = loop {
                        walk2 = walk2.dnext(pool);
                        let ts = walk2.pivot(pool);
                        if !ts.seg.is_dummy() {
                            break ts;
                        }
                    };
                    let org2 = &vertices[sub2.seg_org(subs).index()];
                    let dest2 = &vertices[sub2.seg_dest(subs).index()];
                    let joinvertex = if dest1.x == org2.x && dest1.y == org2.y {
                        Some(dest1)
                    } else if org1.x == dest2.x && org1.y == dest2.y {
                        Some(org1)
                    } else {
                        None
                    };
                    if let Some(joinvertex) = joinvertex {
                        let dist1 = (base1.x - joinvertex.x) * (base1.x - joinvertex.x)
                            + (base1.y - joinvertex.y) * (base1.y - joinvertex.y);
                        let dist2 = (base2.x - joinvertex.x) * (base2.x - joinvertex.x)
                            + (base2.y - joinvertex.y) * (base2.y - joinvertex.y);
                        if dist1 < 1.001 * dist2 && dist1 > 0.999 * dist2 {
                            return;
                        }
                    }
                }
            }
            enqueue(&mut self.queue);
        }
    }

    fn tally_encs(&mut self, mesh: &Mesh) {
        for r in mesh.subsegs.refs().collect::<Vec<_>>() {
            self.check_seg4_encroach(
                &mesh.triangles,
                &mesh.subsegs,
                &mesh.vertices,
                &mesh.behavior,
                OSub::new(r, 0),
            );
        }
    }

    fn tally_faces(&mut self, mesh: &Mesh) {
        for r in mesh.triangles.refs().collect::<Vec<_>>() {
            self.test_triangle(
                &mesh.triangles,
                &mesh.subsegs,
                &mesh.vertices,
                &mesh.behavior,
                OTri::new(r, 0),
            );
        }
    }

    /// Split every queued encroached subsegment, possibly recursively.
    /// Free vertices crowding a segment are deleted first, so a segment is
    /// never split because of a Steiner point that is about to move anyway.
    fn split_enc_segs(
        &mut self,
        mesh: &mut Mesh,
        triflaws: bool,
        no_exact: bool,
    ) -> Result<(), &'static str> {
        while let Some(seg) = {
            if mesh.steiner_left == 0 {
                None
            } else {
                self.badsubsegs.pop_front()
            }
        } {
            let currentenc = seg.subseg;
            let eorg_id = currentenc.org(&mesh.subsegs);
            let edest_id = currentenc.dest(&mesh.subsegs);
            // the subsegment may have been split or its triangle surgered
            // since it was queued
            if mesh.subsegs[currentenc.seg].is_dead()
                || eorg_id != seg.org
                || edest_id != seg.dest
            {
                continue;
            }
            let mut enctri = currentenc.tri_pivot(&mesh.subsegs);
            let mut testtri = enctri.lnext();
            let testsh = testtri.pivot(&mesh.triangles);
            let mut acuteorg = !testsh.seg.is_dummy();
            testtri = testtri.lnext();
            let testsh = testtri.pivot(&mesh.triangles);
            let mut acutedest = !testsh.seg.is_dummy();

            if !mesh.behavior.conforming_delaunay && !acuteorg && !acutedest {
                let mut eapex_id = enctri.apex(&mesh.triangles);
                loop {
                    let eorg = &mesh.vertices[eorg_id.index()];
                    let edest = &mesh.vertices[edest_id.index()];
                    let eapex = &mesh.vertices[eapex_id.index()];
                    if eapex.kind != VertexKind::Free
                        || (eorg.x - eapex.x) * (edest.x - eapex.x)
                            + (eorg.y - eapex.y) * (edest.y - eapex.y)
                            >= 0.0
                    {
                        break;
                    }
                    mesh.delete_vertex(testtri, no_exact, Some(&mut *self));
                    enctri = currentenc.tri_pivot(&mesh.subsegs);
                    eapex_id = enctri.apex(&mesh.triangles);
                    testtri = enctri.lprev();
                }
            }

            let mut testtri = enctri.sym(&mesh.triangles);
            if !testtri.tri.is_dummy() {
                testtri = testtri.lnext();
                let testsh = testtri.pivot(&mesh.triangles);
                let acutedest2 = !testsh.seg.is_dummy();
                acutedest = acutedest || acutedest2;
                testtri = testtri.lnext();
                let testsh = testtri.pivot(&mesh.triangles);
                let acuteorg2 = !testsh.seg.is_dummy();
                acuteorg = acuteorg || acuteorg2;
                if !mesh.behavior.conforming_delaunay && !acuteorg2 && !acutedest2 {
                    let mut eapex_id = testtri.org(&mesh.triangles);
                    loop {
                        let eorg = &mesh.vertices[eorg_id.index()];
                        let edest = &mesh.vertices[edest_id.index()];
                        let eapex = &mesh.vertices[eapex_id.index()];
                        if eapex.kind != VertexKind::Free
                            || (eorg.x - eapex.x) * (edest.x - eapex.x)
                                + (eorg.y - eapex.y) * (edest.y - eapex.y)
                                >= 0.0
                        {
                            break;
                        }
                        mesh.delete_vertex(testtri, no_exact, Some(&mut *self));
                        testtri = enctri.sym(&mesh.triangles);
                        eapex_id = testtri.apex(&mesh.triangles);
                        testtri = testtri.lprev();
                    }
                }
            }

            let eorg = mesh.vertices[eorg_id.index()].point();
            let edest = mesh.vertices[edest_id.index()].point();
            // split near a power-of-two fraction so cascading splits of the
            // same segment produce matching lengths instead of slivers
            let split = if acuteorg || acutedest {
                let segmentlength = ((edest.x - eorg.x) * (edest.x - eorg.x)
                    + (edest.y - eorg.y) * (edest.y - eorg.y))
                    .sqrt();
                let mut nearestpoweroftwo = 1.0;
                while segmentlength > 3.0 * nearestpoweroftwo {
                    nearestpoweroftwo *= 2.0;
                }
                while segmentlength < 1.5 * nearestpoweroftwo {
                    nearestpoweroftwo *= 0.5;
                }
                let split = nearestpoweroftwo / segmentlength;
                if acutedest { 1.0 - split } else { split }
            } else {
                0.5
            };

            let label = mesh.subsegs[currentenc.seg].label;
            let mut x = eorg.x + split * (edest.x - eorg.x);
            let mut y = eorg.y + split * (edest.y - eorg.y);
            if !no_exact {
                // project the rounded split point back onto the segment
                let candidate = Point::new(x, y);
                let mut multiplier =
                    mesh.predicates.counter_clockwise(&eorg, &edest, &candidate, no_exact);
                let divisor = (eorg.x - edest.x) * (eorg.x - edest.x)
                    + (eorg.y - edest.y) * (eorg.y - edest.y);
                if multiplier != 0.0 && divisor != 0.0 {
                    multiplier /= divisor;
                    if !multiplier.is_nan() {
                        x += multiplier * (edest.y - eorg.y);
                        y += multiplier * (eorg.x - edest.x);
                    }
                }
            }
            if (x == eorg.x && y == eorg.y) || (x == edest.x && y == edest.y) {
                return Err(
                    "ran out of precision: a segment cannot be split smaller than the \
                     floating point spacing of its endpoints",
                );
            }
            let newvertex = mesh.add_vertex(x, y, label, VertexKind::Segment);

            let success = mesh.insert_vertex(
                newvertex,
                &mut enctri,
                Some(currentenc),
                true,
                triflaws,
                no_exact,
                Some(&mut *self),
            );
            if success != InsertVertexResult::Successful
                && success != InsertVertexResult::Encroaching
            {
                return Err("failure to split a segment");
            }
            if mesh.steiner_left > 0 {
                mesh.steiner_left -= 1;
            }
            // both halves may still be encroached
            self.check_seg4_encroach(
                &mesh.triangles,
                &mesh.subsegs,
                &mesh.vertices,
                &mesh.behavior,
                currentenc,
            );
            let nextenc = currentenc.next(&mesh.subsegs);
            self.check_seg4_encroach(
                &mesh.triangles,
                &mesh.subsegs,
                &mesh.vertices,
                &mesh.behavior,
                nextenc,
            );
        }
        Ok(())
    }

    /// Split a queued skinny or oversized triangle at its circumcenter (or
    /// the off-center location that avoids over-refinement).
    fn split_triangle(
        &mut self,
        mesh: &mut Mesh,
        badtri: &BadTriangle,
        no_exact: bool,
    ) -> Result<(), &'static str> {
        let mut badotri = badtri.poortri;
        let borg_id = badotri.org(&mesh.triangles);
        let bdest_id = badotri.dest(&mesh.triangles);
        let bapex_id = badotri.apex(&mesh.triangles);
        // surgery elsewhere may have killed or reshaped the triangle
        if mesh.triangles[badotri.tri].is_dead()
            || borg_id != badtri.org
            || bdest_id != badtri.dest
            || bapex_id != badtri.apex
        {
            return Ok(());
        }
        let borg = mesh.vertices[borg_id.index()].point();
        let bdest = mesh.vertices[bdest_id.index()].point();
        let bapex = mesh.vertices[bapex_id.index()].point();

        let mut xi = 0.0;
        let mut eta = 0.0;
        let newloc = if mesh.behavior.fixed_area || mesh.behavior.var_area {
            mesh.predicates.find_circumcenter_off_center(
                &borg,
                &bdest,
                &bapex,
                &mut xi,
                &mut eta,
                mesh.behavior.off_constant,
                no_exact,
            )
        } else {
            self.new_location
                .find_location(mesh, &borg, &bdest, &bapex, &mut xi, &mut eta, badotri, no_exact)
        };

        if (newloc.x == borg.x && newloc.y == borg.y)
            || (newloc.x == bdest.x && newloc.y == bdest.y)
            || (newloc.x == bapex.x && newloc.y == bapex.y)
        {
            return Err(
                "the new vertex falls on an existing vertex: the triangle cannot be \
                 refined smaller than the floating point precision allows",
            );
        }

        // off-center past the halfway mark means the origin edge is the one
        // being encroached, enter through it
        if eta < xi {
            badotri = badotri.lprev();
        }
        let newvertex = mesh.add_vertex(newloc.x, newloc.y, 0, VertexKind::Free);
        let success = mesh.insert_vertex(
            newvertex,
            &mut badotri,
            None,
            true,
            true,
            no_exact,
            Some(&mut *self),
        );
        match success {
            InsertVertexResult::Successful => {
                if mesh.steiner_left > 0 {
                    mesh.steiner_left -= 1;
                }
                Ok(())
            }
            InsertVertexResult::Encroaching => {
                // rejecting the circumcenter: the encroached subsegment got
                // queued, splitting it is the productive move
                mesh.undo_vertex();
                mesh.vertex_dealloc(newvertex);
                Ok(())
            }
            InsertVertexResult::Violating => {
                mesh.vertex_dealloc(newvertex);
                Ok(())
            }
            InsertVertexResult::Duplicate => Err(
                "the new vertex falls on an existing vertex: the triangle cannot be \
                 refined smaller than the floating point precision allows",
            ),
        }
    }

    fn enforce_quality(&mut self, mesh: &mut Mesh, no_exact: bool) -> Result<(), &'static str> {
        self.tally_encs(mesh);
        self.split_enc_segs(mesh, false, no_exact)?;
        if mesh.behavior.min_angle() > 0.0
            || mesh.behavior.var_area
            || mesh.behavior.fixed_area
            || mesh.behavior.usertest.is_some()
        {
            self.tally_faces(mesh);
            mesh.checkquality = true;
            while !self.queue.is_empty() && mesh.steiner_left != 0 {
                let badtri = match self.queue.dequeue() {
                    Some(b) => b,
                    None => break,
                };
                self.split_triangle(mesh, &badtri, no_exact)?;
                if !self.badsubsegs.is_empty() {
                    // the split got rolled back; requeue it and clear the
                    // encroached subsegments before trying again
                    self.queue.enqueue(badtri);
                    self.split_enc_segs(mesh, true, no_exact)?;
                }
            }
        }
        Ok(())
    }
}

impl Mesh {
    /// Refine the triangulation in place until every triangle satisfies
    /// `quality`. With `conforming_delaunay` the result is truly Delaunay
    /// (encroachment uses full diametral circles).
    pub fn refine(
        &mut self,
        quality: &QualityOptions,
        conforming_delaunay: bool,
    ) -> Result<(), &'static str> {
        self.reset();
        let mut mesher = QualityMesher::new();
        mesher.apply(self, Some(quality), conforming_delaunay)?;
        self.cleanup();
        Ok(())
    }
}
