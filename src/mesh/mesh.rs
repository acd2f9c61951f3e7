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

//! The triangulation data structure and its local surgery operations.
//!
//! The mesh is a triangle-based structure: every triangle record knows its
//! three corners, three neighbors, and up to three constraint subsegments.
//! All mutation goes through a handful of operations (vertex insertion with
//! Lawson flip propagation, vertex deletion with star re-triangulation, edge
//! flips and their inverses) that maintain the Delaunay property and the
//! subsegment bookkeeping together.

use std::collections::VecDeque;

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::behavior::{Behavior, BoundarySplitMode};
use crate::geometry::osub::OSub;
use crate::geometry::otri::{MINUS1_MOD3, OTri, PLUS1_MOD3, TriRef};
use crate::geometry::point::{Point, VId, Vertex, VertexKind};
use crate::geometry::rectangle::Rectangle;
use crate::kernel::predicates::Predicates;
use crate::mesh::locator::{LocateResult, TriangleLocator};
use crate::mesh::pool::{SubSegPool, TrianglePool};
use crate::meshing::bad_tri_queue::BadSubsegment;
use crate::meshing::quality::QualityMesher;

/// Outcome of a vertex insertion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertVertexResult {
    Successful,
    Encroaching,
    Violating,
    Duplicate,
}

/// Vertex id assignment scheme for output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeNumbering {
    None,
    Linear,
    CuthillMcKee,
}

pub struct Mesh {
    pub(crate) triangles: TrianglePool,
    pub(crate) subsegs: SubSegPool,
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) bounds: Rectangle,
    pub(crate) predicates: Predicates,
    pub(crate) locator: TriangleLocator,
    pub behavior: Behavior,
    pub(crate) flipstack: Vec<OTri>,
    pub(crate) current_numbering: NodeNumbering,
    pub(crate) undeads: usize,
    pub(crate) hullsize: i32,
    pub(crate) steiner_left: i32,
    pub(crate) checksegments: bool,
    pub(crate) checkquality: bool,
    pub(crate) infvertex1: VId,
    pub(crate) infvertex2: VId,
    pub(crate) infvertex3: VId,
}

impl Mesh {
    pub fn new(behavior: Behavior) -> Self {
        Mesh {
            triangles: TrianglePool::new(),
            subsegs: SubSegPool::new(),
            vertices: Vec::new(),
            bounds: Rectangle::default(),
            predicates: Predicates::new(),
            locator: TriangleLocator::new(),
            behavior,
            flipstack: Vec::new(),
            current_numbering: NodeNumbering::None,
            undeads: 0,
            hullsize: 0,
            steiner_left: -1,
            checksegments: false,
            checkquality: false,
            infvertex1: VId::NONE,
            infvertex2: VId::NONE,
            infvertex3: VId::NONE,
        }
    }

    pub fn bounds(&self) -> Rectangle {
        self.bounds
    }

    pub fn predicates(&self) -> &Predicates {
        &self.predicates
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices
            .iter()
            .filter(|v| v.kind != VertexKind::Dead)
            .count()
    }

    pub fn num_segments(&self) -> usize {
        self.subsegs.len()
    }

    pub fn num_edges(&self) -> usize {
        (3 * self.triangles.len() + self.hullsize as usize) / 2
    }

    pub fn hullsize(&self) -> usize {
        self.hullsize as usize
    }

    pub fn vertex(&self, v: VId) -> &Vertex {
        &self.vertices[v.index()]
    }

    pub fn live_vertices(&self) -> impl Iterator<Item = (VId, &Vertex)> {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.kind != VertexKind::Dead)
            .map(|(i, v)| (VId(i as i32), v))
    }

    /// Triangle corner ids in counterclockwise order, one entry per live
    /// triangle.
    pub fn triangle_list(&self) -> Vec<[VId; 3]> {
        self.triangles
            .iter()
            .map(|(_, t)| [t.vertices[0], t.vertices[1], t.vertices[2]])
            .collect()
    }

    /// Undirected edges, each reported once.
    pub fn edges(&self) -> Vec<(VId, VId)> {
        let mut out = Vec::new();
        for r in self.triangles.refs() {
            for orient in 0..3 {
                let ot = OTri::new(r, orient);
                let nb = ot.sym(&self.triangles);
                if nb.tri.is_dummy() || r.0 < nb.tri.0 {
                    out.push((ot.org(&self.triangles), ot.dest(&self.triangles)));
                }
            }
        }
        out
    }

    /// Smallest and largest interior angle over all live triangles, degrees.
    pub fn quality_statistics(&self) -> (f64, f64) {
        let mut min = 180.0f64;
        let mut max = 0.0f64;
        for (_, t) in self.triangles.iter() {
            if t.vertices.iter().any(|v| v.is_none()) {
                continue;
            }
            let p: Vec<&Vertex> = t.vertices.iter().map(|v| &self.vertices[v.index()]).collect();
            let mut len2 = [0.0f64; 3];
            for i in 0..3 {
                let a = p[PLUS1_MOD3[i]];
                let b = p[MINUS1_MOD3[i]];
                let dx = a.x - b.x;
                let dy = a.y - b.y;
                len2[i] = dx * dx + dy * dy;
            }
            for i in 0..3 {
                let opposite = len2[i];
                let u = len2[PLUS1_MOD3[i]];
                let v = len2[MINUS1_MOD3[i]];
                let denom = 2.0 * (u * v).sqrt();
                if denom == 0.0 {
                    continue;
                }
                let cosine = ((u + v - opposite) / denom).clamp(-1.0, 1.0);
                let angle = cosine.acos().to_degrees();
                min = min.min(angle);
                max = max.max(angle);
            }
        }
        (min, max)
    }

    /// Seed the vertex arena from input points and grow the bounding box.
    /// User-supplied ids are kept when they are distinct; otherwise vertices
    /// are numbered in input order.
    pub fn transfer_nodes(&mut self, points: &[Point]) -> Result<(), &'static str> {
        if points.len() < 3 {
            return Err("input must have at least three vertices");
        }
        self.bounds = Rectangle::default();
        let mut user_ids = points[0].id != points[1].id;
        if user_ids {
            let mut seen: AHashMap<i32, usize> = AHashMap::with_capacity(points.len());
            for (i, p) in points.iter().enumerate() {
                if seen.insert(p.id, i).is_some() {
                    user_ids = false;
                    break;
                }
            }
        }
        for p in points {
            let hash = self.vertices.len() as i32;
            let id = if user_ids { p.id } else { hash };
            let mut v = Vertex::new(p.x, p.y, p.label);
            v.hash = hash;
            v.id = id;
            self.vertices.push(v);
            self.bounds.expand(p.x, p.y);
        }
        Ok(())
    }

    pub(crate) fn add_vertex(&mut self, x: f64, y: f64, label: i32, kind: VertexKind) -> VId {
        let hash = self.vertices.len() as i32;
        let mut v = Vertex::new(x, y, label);
        v.hash = hash;
        v.id = hash;
        v.kind = kind;
        self.vertices.push(v);
        VId(hash)
    }

    /// Point every vertex at one of its incident triangle edges.
    pub(crate) fn make_vertex_map(&mut self) {
        let refs: Vec<TriRef> = self.triangles.refs().collect();
        for r in refs {
            for orient in 0..3 {
                let ot = OTri::new(r, orient);
                let org = ot.org(&self.triangles);
                if !org.is_none() {
                    self.vertices[org.index()].tri = ot;
                }
            }
        }
    }

    pub(crate) fn make_triangle(&mut self) -> OTri {
        let r = self.triangles.get();
        OTri::new(r, 0)
    }

    pub(crate) fn make_segment(&mut self) -> OSub {
        let r = self.subsegs.get();
        OSub::new(r, 0)
    }

    pub(crate) fn triangle_dealloc(&mut self, r: TriRef) {
        self.triangles.release(r);
    }

    pub(crate) fn vertex_dealloc(&mut self, v: VId) {
        self.vertices[v.index()].kind = VertexKind::Dead;
    }

    /// Insert `newvertex` into the triangulation. `search_tri` seeds the point
    /// location (the dummy handle means "locate from scratch") and on return
    /// points at a triangle whose origin is the new vertex. When `split_seg`
    /// names a subsegment the vertex is inserted on it, splitting it in two.
    ///
    /// The insertion splits the containing triangle (or edge), then restores
    /// the Delaunay property by Lawson flips fanning out around the new
    /// vertex. Constraint edges are never flipped; with `segmentflaws` their
    /// encroachment is recorded instead, and with `triflaws` each triangle
    /// left behind is quality-tested.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn insert_vertex(
        &mut self,
        newvertex: VId,
        search_tri: &mut OTri,
        split_seg: Option<OSub>,
        segmentflaws: bool,
        triflaws: bool,
        no_exact: bool,
        mut quality: Option<&mut QualityMesher>,
    ) -> InsertVertexResult {
        let new_point = self.vertices[newvertex.index()].point();
        let mut horiz;
        let intersect;
        if split_seg.is_none() {
            if search_tri.tri.is_dummy() {
                // start at the most recent hull triangle, tracked by the dummy
                horiz = OTri::none().sym(&self.triangles);
                intersect = self.locator.locate(
                    &self.triangles,
                    &self.vertices,
                    &self.predicates,
                    self.checksegments,
                    &new_point,
                    &mut horiz,
                    no_exact,
                );
            } else {
                horiz = *search_tri;
                intersect = self.locator.precise_locate(
                    &self.triangles,
                    &self.vertices,
                    &self.predicates,
                    self.checksegments,
                    &new_point,
                    &mut horiz,
                    true,
                    no_exact,
                );
            }
        } else {
            horiz = *search_tri;
            intersect = LocateResult::OnEdge;
        }
        if intersect == LocateResult::OnVertex {
            *search_tri = horiz;
            self.locator.update(horiz);
            return InsertVertexResult::Duplicate;
        }

        let rightvertex;
        let leftvertex;
        let botvertex;
        if intersect == LocateResult::OnEdge || intersect == LocateResult::Outside {
            if self.checksegments && split_seg.is_none() {
                let brokensubseg = horiz.pivot(&self.triangles);
                if !brokensubseg.seg.is_dummy() {
                    if segmentflaws {
                        let mut enq =
                            self.behavior.boundary_split_mode != BoundarySplitMode::NoSplit;
                        if enq
                            && self.behavior.boundary_split_mode
                                == BoundarySplitMode::SplitInternalOnly
                        {
                            let testtri = horiz.sym(&self.triangles);
                            enq = !testtri.tri.is_dummy();
                        }
                        if enq {
                            if let Some(q) = quality.as_deref_mut() {
                                q.add_bad_subseg(BadSubsegment {
                                    subseg: brokensubseg,
                                    org: brokensubseg.org(&self.subsegs),
                                    dest: brokensubseg.dest(&self.subsegs),
                                });
                            }
                        }
                    }
                    *search_tri = horiz;
                    self.locator.update(horiz);
                    return InsertVertexResult::Violating;
                }
            }

            // split the edge: two triangles become four (or one becomes two
            // on the hull)
            let botright = horiz.lprev();
            let botrcasing = botright.sym(&self.triangles);
            let mut topright = horiz.sym(&self.triangles);
            let mirrorflag = !topright.tri.is_dummy();
            let mut toprcasing = OTri::none();
            let mut newtopright = OTri::none();
            if mirrorflag {
                topright = topright.lnext();
                toprcasing = topright.sym(&self.triangles);
                newtopright = self.make_triangle();
            } else {
                self.hullsize += 1;
            }
            let mut newbotright = self.make_triangle();

            rightvertex = horiz.org(&self.triangles);
            leftvertex = horiz.dest(&self.triangles);
            botvertex = horiz.apex(&self.triangles);
            newbotright.set_org(&mut self.triangles, botvertex);
            newbotright.set_dest(&mut self.triangles, rightvertex);
            newbotright.set_apex(&mut self.triangles, newvertex);
            horiz.set_org(&mut self.triangles, newvertex);
            self.triangles[newbotright.tri].label = self.triangles[botright.tri].label;
            if self.behavior.var_area {
                self.triangles[newbotright.tri].area = self.triangles[botright.tri].area;
            }
            if mirrorflag {
                let topvertex = topright.dest(&self.triangles);
                newtopright.set_org(&mut self.triangles, rightvertex);
                newtopright.set_dest(&mut self.triangles, topvertex);
                newtopright.set_apex(&mut self.triangles, newvertex);
                topright.set_org(&mut self.triangles, newvertex);
                self.triangles[newtopright.tri].label = self.triangles[topright.tri].label;
                if self.behavior.var_area {
                    self.triangles[newtopright.tri].area = self.triangles[topright.tri].area;
                }
            }
            if self.checksegments {
                let botrsubseg = botright.pivot(&self.triangles);
                if !botrsubseg.seg.is_dummy() {
                    botright.seg_dissolve(&mut self.triangles);
                    newbotright.seg_bond(&mut self.triangles, &mut self.subsegs, botrsubseg);
                }
                if mirrorflag {
                    let toprsubseg = topright.pivot(&self.triangles);
                    if !toprsubseg.seg.is_dummy() {
                        topright.seg_dissolve(&mut self.triangles);
                        newtopright.seg_bond(&mut self.triangles, &mut self.subsegs, toprsubseg);
                    }
                }
            }
            newbotright.bond(&mut self.triangles, botrcasing);
            newbotright = newbotright.lprev();
            newbotright.bond(&mut self.triangles, botright);
            newbotright = newbotright.lprev();
            if mirrorflag {
                newtopright.bond(&mut self.triangles, toprcasing);
                newtopright = newtopright.lnext();
                newtopright.bond(&mut self.triangles, topright);
                newtopright = newtopright.lnext();
                newtopright.bond(&mut self.triangles, newbotright);
            }

            if let Some(splitseg) = split_seg {
                let mut splitseg = splitseg;
                splitseg.set_dest(&mut self.subsegs, newvertex);
                let segmentorg = splitseg.seg_org(&self.subsegs);
                let segmentdest = splitseg.seg_dest(&self.subsegs);
                splitseg = splitseg.sym();
                let rightsubseg = splitseg.pivot(&self.subsegs);
                let label = self.subsegs[splitseg.seg].label;
                self.insert_subseg(newbotright, label);
                let mut newsubseg = newbotright.pivot(&self.triangles);
                newsubseg.set_seg_org(&mut self.subsegs, segmentorg);
                newsubseg.set_seg_dest(&mut self.subsegs, segmentdest);
                splitseg.bond(&mut self.subsegs, newsubseg);
                newsubseg = newsubseg.sym();
                newsubseg.bond(&mut self.subsegs, rightsubseg);
                splitseg = splitseg.sym();
                if self.vertices[newvertex.index()].label == 0 {
                    self.vertices[newvertex.index()].label = self.subsegs[splitseg.seg].label;
                }
            }

            if self.checkquality {
                self.flipstack.clear();
                // the dummy marks a four-triangle (on-edge) insertion
                self.flipstack.push(OTri::none());
                self.flipstack.push(horiz);
            }
            horiz = horiz.lnext();
        } else {
            // split the triangle: one becomes three
            let botleft = horiz.lnext();
            let botright = horiz.lprev();
            let botlcasing = botleft.sym(&self.triangles);
            let botrcasing = botright.sym(&self.triangles);
            let mut newbotleft = self.make_triangle();
            let mut newbotright = self.make_triangle();

            rightvertex = horiz.org(&self.triangles);
            leftvertex = horiz.dest(&self.triangles);
            botvertex = horiz.apex(&self.triangles);
            newbotleft.set_org(&mut self.triangles, leftvertex);
            newbotleft.set_dest(&mut self.triangles, botvertex);
            newbotleft.set_apex(&mut self.triangles, newvertex);
            newbotright.set_org(&mut self.triangles, botvertex);
            newbotright.set_dest(&mut self.triangles, rightvertex);
            newbotright.set_apex(&mut self.triangles, newvertex);
            horiz.set_apex(&mut self.triangles, newvertex);
            let label = self.triangles[horiz.tri].label;
            self.triangles[newbotleft.tri].label = label;
            self.triangles[newbotright.tri].label = label;
            if self.behavior.var_area {
                let area = self.triangles[horiz.tri].area;
                self.triangles[newbotleft.tri].area = area;
                self.triangles[newbotright.tri].area = area;
            }
            if self.checksegments {
                let botlsubseg = botleft.pivot(&self.triangles);
                if !botlsubseg.seg.is_dummy() {
                    botleft.seg_dissolve(&mut self.triangles);
                    newbotleft.seg_bond(&mut self.triangles, &mut self.subsegs, botlsubseg);
                }
                let botrsubseg = botright.pivot(&self.triangles);
                if !botrsubseg.seg.is_dummy() {
                    botright.seg_dissolve(&mut self.triangles);
                    newbotright.seg_bond(&mut self.triangles, &mut self.subsegs, botrsubseg);
                }
            }
            newbotleft.bond(&mut self.triangles, botlcasing);
            newbotright.bond(&mut self.triangles, botrcasing);
            newbotleft = newbotleft.lnext();
            newbotright = newbotright.lprev();
            newbotleft.bond(&mut self.triangles, newbotright);
            newbotleft = newbotleft.lnext();
            botleft.bond(&mut self.triangles, newbotleft);
            newbotright = newbotright.lprev();
            botright.bond(&mut self.triangles, newbotright);
            if self.checkquality {
                self.flipstack.clear();
                self.flipstack.push(horiz);
            }
        }

        let mut success = InsertVertexResult::Successful;
        if !self.vertices[newvertex.index()].tri.tri.is_dummy() {
            let t = self.vertices[newvertex.index()].tri;
            t.set_org(&mut self.triangles, rightvertex);
            t.set_dest(&mut self.triangles, leftvertex);
            t.set_apex(&mut self.triangles, botvertex);
        }

        // Lawson flip propagation around the new vertex
        let first = horiz.org(&self.triangles);
        let mut rightvertex = first;
        let mut leftvertex = horiz.dest(&self.triangles);
        loop {
            let mut doflip = true;
            if self.checksegments {
                let checksubseg = horiz.pivot(&self.triangles);
                if !checksubseg.seg.is_dummy() {
                    doflip = false;
                    if segmentflaws {
                        if let Some(q) = quality.as_deref_mut() {
                            if q.check_seg4_encroach(
                                &self.triangles,
                                &self.subsegs,
                                &self.vertices,
                                &self.behavior,
                                checksubseg,
                            ) > 0
                            {
                                success = InsertVertexResult::Encroaching;
                            }
                        }
                    }
                }
            }
            if doflip {
                let top = horiz.sym(&self.triangles);
                if top.tri.is_dummy() {
                    doflip = false;
                } else {
                    let farvertex = top.apex(&self.triangles);
                    // edges reaching a bounding-box corner flip on visibility,
                    // not on the in-circle test
                    doflip = if leftvertex == self.infvertex1
                        || leftvertex == self.infvertex2
                        || leftvertex == self.infvertex3
                    {
                        self.predicates.counter_clockwise(
                            &new_point,
                            &self.vertices[rightvertex.index()].point(),
                            &self.vertices[farvertex.index()].point(),
                            no_exact,
                        ) > 0.0
                    } else if rightvertex == self.infvertex1
                        || rightvertex == self.infvertex2
                        || rightvertex == self.infvertex3
                    {
                        self.predicates.counter_clockwise(
                            &self.vertices[farvertex.index()].point(),
                            &self.vertices[leftvertex.index()].point(),
                            &new_point,
                            no_exact,
                        ) > 0.0
                    } else if farvertex == self.infvertex1
                        || farvertex == self.infvertex2
                        || farvertex == self.infvertex3
                    {
                        false
                    } else {
                        self.predicates.in_circle(
                            &self.vertices[leftvertex.index()].point(),
                            &new_point,
                            &self.vertices[rightvertex.index()].point(),
                            &self.vertices[farvertex.index()].point(),
                            no_exact,
                        ) > 0.0
                    };
                    if doflip {
                        let topleft = top.lprev();
                        let toplcasing = topleft.sym(&self.triangles);
                        let topright = top.lnext();
                        let toprcasing = topright.sym(&self.triangles);
                        let botleft = horiz.lnext();
                        let botlcasing = botleft.sym(&self.triangles);
                        let botright = horiz.lprev();
                        let botrcasing = botright.sym(&self.triangles);
                        topleft.bond(&mut self.triangles, botlcasing);
                        botleft.bond(&mut self.triangles, botrcasing);
                        botright.bond(&mut self.triangles, toprcasing);
                        topright.bond(&mut self.triangles, toplcasing);
                        if self.checksegments {
                            let toplsubseg = topleft.pivot(&self.triangles);
                            let botlsubseg = botleft.pivot(&self.triangles);
                            let botrsubseg = botright.pivot(&self.triangles);
                            let toprsubseg = topright.pivot(&self.triangles);
                            if toplsubseg.seg.is_dummy() {
                                topright.seg_dissolve(&mut self.triangles);
                            } else {
                                topright.seg_bond(
                                    &mut self.triangles,
                                    &mut self.subsegs,
                                    toplsubseg,
                                );
                            }
                            if botlsubseg.seg.is_dummy() {
                                topleft.seg_dissolve(&mut self.triangles);
                            } else {
                                topleft.seg_bond(
                                    &mut self.triangles,
                                    &mut self.subsegs,
                                    botlsubseg,
                                );
                            }
                            if botrsubseg.seg.is_dummy() {
                                botleft.seg_dissolve(&mut self.triangles);
                            } else {
                                botleft.seg_bond(
                                    &mut self.triangles,
                                    &mut self.subsegs,
                                    botrsubseg,
                                );
                            }
                            if toprsubseg.seg.is_dummy() {
                                botright.seg_dissolve(&mut self.triangles);
                            } else {
                                botright.seg_bond(
                                    &mut self.triangles,
                                    &mut self.subsegs,
                                    toprsubseg,
                                );
                            }
                        }
                        horiz.set_org(&mut self.triangles, farvertex);
                        horiz.set_dest(&mut self.triangles, newvertex);
                        horiz.set_apex(&mut self.triangles, rightvertex);
                        top.set_org(&mut self.triangles, newvertex);
                        top.set_dest(&mut self.triangles, farvertex);
                        top.set_apex(&mut self.triangles, leftvertex);
                        let region = self.triangles[top.tri]
                            .label
                            .min(self.triangles[horiz.tri].label);
                        self.triangles[top.tri].label = region;
                        self.triangles[horiz.tri].label = region;
                        if self.behavior.var_area {
                            let top_area = self.triangles[top.tri].area;
                            let horiz_area = self.triangles[horiz.tri].area;
                            let area = if top_area <= 0.0 || horiz_area <= 0.0 {
                                -1.0
                            } else {
                                0.5 * (top_area + horiz_area)
                            };
                            self.triangles[top.tri].area = area;
                            self.triangles[horiz.tri].area = area;
                        }
                        if self.checkquality {
                            self.flipstack.push(horiz);
                        }
                        horiz = horiz.lprev();
                        leftvertex = farvertex;
                    }
                }
            }
            if !doflip {
                if triflaws {
                    if let Some(q) = quality.as_deref_mut() {
                        q.test_triangle(
                            &self.triangles,
                            &self.subsegs,
                            &self.vertices,
                            &self.behavior,
                            horiz,
                        );
                    }
                }
                horiz = horiz.lnext();
                let testtri = horiz.sym(&self.triangles);
                if leftvertex == first || testtri.tri.is_dummy() {
                    let finished = horiz.lnext();
                    *search_tri = finished;
                    self.locator.update(finished);
                    return success;
                }
                horiz = testtri.lnext();
                rightvertex = leftvertex;
                leftvertex = horiz.dest(&self.triangles);
            }
        }
    }

    /// Constrain the edge `tri` currently faces, creating the subsegment if
    /// it does not exist yet.
    pub(crate) fn insert_subseg(&mut self, tri: OTri, label: i32) {
        let triorg = tri.org(&self.triangles);
        let tridest = tri.dest(&self.triangles);
        if self.vertices[triorg.index()].label == 0 {
            self.vertices[triorg.index()].label = label;
        }
        if self.vertices[tridest.index()].label == 0 {
            self.vertices[tridest.index()].label = label;
        }
        let existing = tri.pivot(&self.triangles);
        if existing.seg.is_dummy() {
            let newsubseg = self.make_segment();
            newsubseg.set_org(&mut self.subsegs, tridest);
            newsubseg.set_dest(&mut self.subsegs, triorg);
            newsubseg.set_seg_org(&mut self.subsegs, tridest);
            newsubseg.set_seg_dest(&mut self.subsegs, triorg);
            tri.seg_bond(&mut self.triangles, &mut self.subsegs, newsubseg);
            let oppotri = tri.sym(&self.triangles);
            oppotri.seg_bond(&mut self.triangles, &mut self.subsegs, newsubseg.sym());
            self.subsegs[newsubseg.seg].label = label;
        } else if self.subsegs[existing.seg].label == 0 {
            self.subsegs[existing.seg].label = label;
        }
    }

    /// Walk the convex hull once, wrapping every hull edge in a subsegment.
    /// Refinement needs these to detect encroachment at the boundary;
    /// without them Steiner points could land outside the hull.
    pub(crate) fn mark_hull(&mut self) {
        // the dummy's first neighbor is the standing entry point onto the hull
        let mut hulltri = OTri::none().sym(&self.triangles);
        let starttri = hulltri;
        loop {
            self.insert_subseg(hulltri, 1);
            hulltri = hulltri.lnext();
            let mut nexttri = hulltri.oprev(&self.triangles);
            while !nexttri.tri.is_dummy() {
                hulltri = nexttri;
                nexttri = hulltri.oprev(&self.triangles);
            }
            if hulltri == starttri {
                break;
            }
        }
    }

    /// Rotate the edge `flipedge` within its surrounding quadrilateral.
    /// The quadrilateral must be convex and the edge unconstrained.
    pub(crate) fn flip(&mut self, flipedge: OTri) {
        let rightvertex = flipedge.org(&self.triangles);
        let leftvertex = flipedge.dest(&self.triangles);
        let botvertex = flipedge.apex(&self.triangles);
        let top = flipedge.sym(&self.triangles);
        let farvertex = top.apex(&self.triangles);
        let topleft = top.lprev();
        let toplcasing = topleft.sym(&self.triangles);
        let topright = top.lnext();
        let toprcasing = topright.sym(&self.triangles);
        let botleft = flipedge.lnext();
        let botlcasing = botleft.sym(&self.triangles);
        let botright = flipedge.lprev();
        let botrcasing = botright.sym(&self.triangles);
        topleft.bond(&mut self.triangles, botlcasing);
        botleft.bond(&mut self.triangles, botrcasing);
        botright.bond(&mut self.triangles, toprcasing);
        topright.bond(&mut self.triangles, toplcasing);
        if self.checksegments {
            let toplsubseg = topleft.pivot(&self.triangles);
            let botlsubseg = botleft.pivot(&self.triangles);
            let botrsubseg = botright.pivot(&self.triangles);
            let toprsubseg = topright.pivot(&self.triangles);
            if toplsubseg.seg.is_dummy() {
                topright.seg_dissolve(&mut self.triangles);
            } else {
                topright.seg_bond(&mut self.triangles, &mut self.subsegs, toplsubseg);
            }
            if botlsubseg.seg.is_dummy() {
                topleft.seg_dissolve(&mut self.triangles);
            } else {
                topleft.seg_bond(&mut self.triangles, &mut self.subsegs, botlsubseg);
            }
            if botrsubseg.seg.is_dummy() {
                botleft.seg_dissolve(&mut self.triangles);
            } else {
                botleft.seg_bond(&mut self.triangles, &mut self.subsegs, botrsubseg);
            }
            if toprsubseg.seg.is_dummy() {
                botright.seg_dissolve(&mut self.triangles);
            } else {
                botright.seg_bond(&mut self.triangles, &mut self.subsegs, toprsubseg);
            }
        }
        flipedge.set_org(&mut self.triangles, farvertex);
        flipedge.set_dest(&mut self.triangles, botvertex);
        flipedge.set_apex(&mut self.triangles, rightvertex);
        top.set_org(&mut self.triangles, botvertex);
        top.set_dest(&mut self.triangles, farvertex);
        top.set_apex(&mut self.triangles, leftvertex);
    }

    /// Exact inverse of `flip`, rotating the edge the other way.
    pub(crate) fn unflip(&mut self, flipedge: OTri) {
        let rightvertex = flipedge.org(&self.triangles);
        let leftvertex = flipedge.dest(&self.triangles);
        let botvertex = flipedge.apex(&self.triangles);
        let top = flipedge.sym(&self.triangles);
        let farvertex = top.apex(&self.triangles);
        let topleft = top.lprev();
        let toplcasing = topleft.sym(&self.triangles);
        let topright = top.lnext();
        let toprcasing = topright.sym(&self.triangles);
        let botleft = flipedge.lnext();
        let botlcasing = botleft.sym(&self.triangles);
        let botright = flipedge.lprev();
        let botrcasing = botright.sym(&self.triangles);
        topleft.bond(&mut self.triangles, toprcasing);
        botleft.bond(&mut self.triangles, toplcasing);
        botright.bond(&mut self.triangles, botlcasing);
        topright.bond(&mut self.triangles, botrcasing);
        if self.checksegments {
            let toplsubseg = topleft.pivot(&self.triangles);
            let botlsubseg = botleft.pivot(&self.triangles);
            let botrsubseg = botright.pivot(&self.triangles);
            let toprsubseg = topright.pivot(&self.triangles);
            if toplsubseg.seg.is_dummy() {
                botleft.seg_dissolve(&mut self.triangles);
            } else {
                botleft.seg_bond(&mut self.triangles, &mut self.subsegs, toplsubseg);
            }
            if botlsubseg.seg.is_dummy() {
                botright.seg_dissolve(&mut self.triangles);
            } else {
                botright.seg_bond(&mut self.triangles, &mut self.subsegs, botlsubseg);
            }
            if botrsubseg.seg.is_dummy() {
                topright.seg_dissolve(&mut self.triangles);
            } else {
                topright.seg_bond(&mut self.triangles, &mut self.subsegs, botrsubseg);
            }
            if toprsubseg.seg.is_dummy() {
                topleft.seg_dissolve(&mut self.triangles);
            } else {
                topleft.seg_bond(&mut self.triangles, &mut self.subsegs, toprsubseg);
            }
        }
        flipedge.set_org(&mut self.triangles, botvertex);
        flipedge.set_dest(&mut self.triangles, farvertex);
        flipedge.set_apex(&mut self.triangles, leftvertex);
        top.set_org(&mut self.triangles, farvertex);
        top.set_dest(&mut self.triangles, botvertex);
        top.set_apex(&mut self.triangles, rightvertex);
    }

    /// Remove the origin of `deltri` from the mesh, re-triangulating its star.
    /// The vertex must be interior with no incident subsegments.
    pub(crate) fn delete_vertex(
        &mut self,
        deltri: OTri,
        no_exact: bool,
        mut quality: Option<&mut QualityMesher>,
    ) {
        let delvertex = deltri.org(&self.triangles);
        self.vertex_dealloc(delvertex);

        let mut countingtri = deltri.onext(&self.triangles);
        let mut edgecount = 1;
        while deltri != countingtri {
            edgecount += 1;
            countingtri = countingtri.onext(&self.triangles);
        }
        if edgecount > 3 {
            let firstedge = deltri.onext(&self.triangles);
            let mut lastedge = deltri.oprev(&self.triangles);
            self.triangulate_polygon(
                firstedge,
                &mut lastedge,
                edgecount,
                false,
                self.behavior.boundary_split_mode == BoundarySplitMode::Split,
                no_exact,
                &mut quality,
            );
        }
        let deltriright = deltri.lprev();
        let lefttri = deltri.dnext(&self.triangles);
        let leftcasing = lefttri.sym(&self.triangles);
        let righttri = deltriright.oprev(&self.triangles);
        let rightcasing = righttri.sym(&self.triangles);
        deltri.bond(&mut self.triangles, leftcasing);
        deltriright.bond(&mut self.triangles, rightcasing);
        let leftsubseg = lefttri.pivot(&self.triangles);
        if !leftsubseg.seg.is_dummy() {
            deltri.seg_bond(&mut self.triangles, &mut self.subsegs, leftsubseg);
        }
        let rightsubseg = righttri.pivot(&self.triangles);
        if !rightsubseg.seg.is_dummy() {
            deltriright.seg_bond(&mut self.triangles, &mut self.subsegs, rightsubseg);
        }
        let neworg = lefttri.org(&self.triangles);
        deltri.set_org(&mut self.triangles, neworg);
        if self.behavior.boundary_split_mode == BoundarySplitMode::Split {
            if let Some(q) = quality.as_deref_mut() {
                q.test_triangle(
                    &self.triangles,
                    &self.subsegs,
                    &self.vertices,
                    &self.behavior,
                    deltri,
                );
            }
        }
        self.triangle_dealloc(lefttri.tri);
        self.triangle_dealloc(righttri.tri);
    }

    /// Fill the fan between `firstedge` and `lastedge` with triangles, always
    /// connecting the base to the vertex whose circumcircle contains no other
    /// candidate.
    #[allow(clippy::too_many_arguments)]
    fn triangulate_polygon(
        &mut self,
        firstedge: OTri,
        lastedge: &mut OTri,
        edgecount: usize,
        doflip: bool,
        triflaws: bool,
        no_exact: bool,
        quality: &mut Option<&mut QualityMesher>,
    ) {
        let leftbasevertex = lastedge.apex(&self.triangles);
        let rightbasevertex = firstedge.dest(&self.triangles);
        let mut besttri = firstedge.onext(&self.triangles);
        let mut bestvertex = besttri.dest(&self.triangles);
        let mut testtri = besttri;
        let mut bestnumber = 1;
        for i in 2..=edgecount.saturating_sub(2) {
            testtri = testtri.onext(&self.triangles);
            let testvertex = testtri.dest(&self.triangles);
            if self.predicates.in_circle(
                &self.vertices[leftbasevertex.index()].point(),
                &self.vertices[rightbasevertex.index()].point(),
                &self.vertices[bestvertex.index()].point(),
                &self.vertices[testvertex.index()].point(),
                no_exact,
            ) > 0.0
            {
                besttri = testtri;
                bestvertex = testvertex;
                bestnumber = i;
            }
        }
        if bestnumber > 1 {
            let mut tempedge = besttri.oprev(&self.triangles);
            self.triangulate_polygon(
                firstedge,
                &mut tempedge,
                bestnumber + 1,
                true,
                triflaws,
                no_exact,
                quality,
            );
        }
        if bestnumber < edgecount - 2 {
            let tempedge = besttri.sym(&self.triangles);
            self.triangulate_polygon(
                besttri,
                lastedge,
                edgecount - bestnumber,
                true,
                triflaws,
                no_exact,
                quality,
            );
            // the recursion may have flipped the shared edge away
            besttri = tempedge.sym(&self.triangles);
        }
        if doflip {
            self.flip(besttri);
            if triflaws {
                if let Some(q) = quality.as_deref_mut() {
                    let testtri = besttri.sym(&self.triangles);
                    q.test_triangle(
                        &self.triangles,
                        &self.subsegs,
                        &self.vertices,
                        &self.behavior,
                        testtri,
                    );
                }
            }
        }
        *lastedge = besttri;
    }

    /// Roll back the most recent vertex insertion by replaying the flip stack
    /// in reverse. The bottom entry encodes whether the insertion split a
    /// triangle or an edge.
    pub(crate) fn undo_vertex(&mut self) {
        while let Some(fliptri) = self.flipstack.pop() {
            if self.flipstack.is_empty() {
                // restore the triangle split 1 -> 3
                let botleft = fliptri.dprev(&self.triangles).lnext();
                let botright = fliptri.onext(&self.triangles).lprev();
                let botlcasing = botleft.sym(&self.triangles);
                let botrcasing = botright.sym(&self.triangles);
                let botvertex = botleft.dest(&self.triangles);
                fliptri.set_apex(&mut self.triangles, botvertex);
                let side1 = fliptri.lnext();
                side1.bond(&mut self.triangles, botlcasing);
                let botlsubseg = botleft.pivot(&self.triangles);
                side1.seg_bond(&mut self.triangles, &mut self.subsegs, botlsubseg);
                let side2 = side1.lnext();
                side2.bond(&mut self.triangles, botrcasing);
                let botrsubseg = botright.pivot(&self.triangles);
                side2.seg_bond(&mut self.triangles, &mut self.subsegs, botrsubseg);
                self.triangle_dealloc(botleft.tri);
                self.triangle_dealloc(botright.tri);
            } else if matches!(self.flipstack.last(), Some(t) if t.tri.is_dummy()) {
                // restore the edge split 2 -> 4
                let gluetri = fliptri.lprev();
                let botright = gluetri.sym(&self.triangles).lnext();
                let botrcasing = botright.sym(&self.triangles);
                let rightvertex = botright.dest(&self.triangles);
                fliptri.set_org(&mut self.triangles, rightvertex);
                gluetri.bond(&mut self.triangles, botrcasing);
                let botrsubseg = botright.pivot(&self.triangles);
                gluetri.seg_bond(&mut self.triangles, &mut self.subsegs, botrsubseg);
                self.triangle_dealloc(botright.tri);
                let mirror = fliptri.sym(&self.triangles);
                if !mirror.tri.is_dummy() {
                    let gluetri = mirror.lnext();
                    let topright = gluetri.dnext(&self.triangles);
                    let toprcasing = topright.sym(&self.triangles);
                    gluetri.set_org(&mut self.triangles, rightvertex);
                    gluetri.bond(&mut self.triangles, toprcasing);
                    let toprsubseg = topright.pivot(&self.triangles);
                    gluetri.seg_bond(&mut self.triangles, &mut self.subsegs, toprsubseg);
                    self.triangle_dealloc(topright.tri);
                }
                self.flipstack.clear();
            } else {
                self.unflip(fliptri);
            }
        }
    }

    /// Verify neighbor symmetry, matching shared edges, and positive
    /// orientation of every triangle.
    pub fn is_consistent(&mut self) -> bool {
        let mut horrors = 0usize;
        for r in self.triangles.refs().collect::<Vec<_>>() {
            for orient in 0..3 {
                let tri = OTri::new(r, orient);
                let org = tri.org(&self.triangles);
                let dest = tri.dest(&self.triangles);
                if orient == 0 {
                    let apex = tri.apex(&self.triangles);
                    if self.predicates.counter_clockwise(
                        &self.vertices[org.index()].point(),
                        &self.vertices[dest.index()].point(),
                        &self.vertices[apex.index()].point(),
                        false,
                    ) <= 0.0
                    {
                        horrors += 1;
                    }
                }
                let oppotri = tri.sym(&self.triangles);
                if !oppotri.tri.is_dummy() {
                    let oppooppotri = oppotri.sym(&self.triangles);
                    if tri != oppooppotri {
                        horrors += 1;
                    }
                    let oppoorg = oppotri.org(&self.triangles);
                    let oppodest = oppotri.dest(&self.triangles);
                    if org != oppodest || dest != oppoorg {
                        horrors += 1;
                    }
                }
            }
        }
        self.make_vertex_map();
        horrors == 0
    }

    /// Verify the Delaunay property over every interior edge.
    pub fn is_delaunay(&self) -> bool {
        self.is_delaunay_inner(false)
    }

    /// Like `is_delaunay`, but constrained edges are exempt.
    pub fn is_constrained_delaunay(&self) -> bool {
        self.is_delaunay_inner(true)
    }

    fn is_delaunay_inner(&self, constrained: bool) -> bool {
        let mut horrors = 0usize;
        for (r, _) in self.triangles.iter() {
            for orient in 0..3 {
                let tri = OTri::new(r, orient);
                let org = tri.org(&self.triangles);
                let dest = tri.dest(&self.triangles);
                let apex = tri.apex(&self.triangles);
                let oppotri = tri.sym(&self.triangles);
                let oppoapex = oppotri.apex(&self.triangles);
                let ghost = |v: VId| {
                    v == self.infvertex1 || v == self.infvertex2 || v == self.infvertex3
                };
                let mut should_be_delaunay = !oppotri.tri.is_dummy()
                    && !self.triangles[oppotri.tri].is_dead()
                    && self.triangles[tri.tri].id < self.triangles[oppotri.tri].id
                    && !ghost(org)
                    && !ghost(dest)
                    && !ghost(apex)
                    && !ghost(oppoapex);
                if constrained && self.checksegments && should_be_delaunay {
                    let opposubseg = tri.pivot(&self.triangles);
                    if !opposubseg.seg.is_dummy() {
                        should_be_delaunay = false;
                    }
                }
                if should_be_delaunay
                    && self.predicates.non_regular(
                        &self.vertices[org.index()].point(),
                        &self.vertices[dest.index()].point(),
                        &self.vertices[apex.index()].point(),
                        &self.vertices[oppoapex.index()].point(),
                    ) > 0.0
                {
                    horrors += 1;
                }
            }
        }
        horrors == 0
    }

    /// Reassign vertex and triangle ids for output.
    pub fn renumber(&mut self, numbering: NodeNumbering) {
        if numbering == self.current_numbering {
            return;
        }
        match numbering {
            NodeNumbering::None => {}
            NodeNumbering::Linear => {
                let mut id = 0;
                for v in self.vertices.iter_mut() {
                    if v.kind != VertexKind::Dead {
                        v.id = id;
                        id += 1;
                    }
                }
            }
            NodeNumbering::CuthillMcKee => {
                let iperm = self.cuthill_mckee_permutation();
                for v in self.vertices.iter_mut() {
                    if v.kind != VertexKind::Dead {
                        v.id = iperm[v.id as usize];
                    }
                }
            }
        }
        self.current_numbering = numbering;
        let refs: Vec<TriRef> = self.triangles.refs().collect();
        for (i, r) in refs.into_iter().enumerate() {
            self.triangles[r].id = i as i32;
        }
    }

    /// Reverse Cuthill-McKee ordering over the vertex adjacency graph,
    /// reducing the output bandwidth for downstream solvers.
    fn cuthill_mckee_permutation(&mut self) -> Vec<i32> {
        let mut id = 0;
        for v in self.vertices.iter_mut() {
            if v.kind != VertexKind::Dead {
                v.id = id;
                id += 1;
            }
        }
        let n = id as usize;
        // average vertex degree in a planar triangulation is below six
        let mut adjacency: Vec<SmallVec<[usize; 8]>> = vec![SmallVec::new(); n];
        for (_, t) in self.triangles.iter() {
            for orient in 0..3 {
                let a = t.vertices[PLUS1_MOD3[orient]];
                let b = t.vertices[MINUS1_MOD3[orient]];
                if a.is_none() || b.is_none() {
                    continue;
                }
                let ai = self.vertices[a.index()].id as usize;
                let bi = self.vertices[b.index()].id as usize;
                if ai < bi {
                    adjacency[ai].push(bi);
                    adjacency[bi].push(ai);
                }
            }
        }
        for list in adjacency.iter_mut() {
            list.sort_unstable();
            list.dedup();
        }
        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);
        loop {
            let start = (0..n)
                .filter(|&i| !visited[i])
                .min_by_key(|&i| adjacency[i].len());
            let Some(start) = start else { break };
            visited[start] = true;
            let mut queue = VecDeque::from([start]);
            while let Some(u) = queue.pop_front() {
                order.push(u);
                let mut next: Vec<usize> = adjacency[u]
                    .iter()
                    .copied()
                    .filter(|&v| !visited[v])
                    .collect();
                next.sort_by_key(|&v| adjacency[v].len());
                for v in next {
                    visited[v] = true;
                    queue.push_back(v);
                }
            }
        }
        order.reverse();
        let mut iperm = vec![0i32; n];
        for (new_id, &old_id) in order.iter().enumerate() {
            iperm[old_id] = new_id as i32;
        }
        iperm
    }

    /// Sweep vertices orphaned as duplicates and renumber.
    pub fn cleanup(&mut self) {
        if self.undeads == 0 {
            return;
        }
        let mut removed = false;
        for v in self.vertices.iter_mut() {
            if v.kind == VertexKind::Undead {
                v.kind = VertexKind::Dead;
                removed = true;
            }
        }
        if removed {
            self.undeads = 0;
            self.current_numbering = NodeNumbering::None;
            self.renumber(NodeNumbering::Linear);
        }
    }

    pub(crate) fn reset(&mut self) {
        self.current_numbering = NodeNumbering::None;
        self.undeads = 0;
        self.checksegments = false;
        self.checkquality = false;
        self.predicates.reset_counters();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meshing::triangulate;

    fn square_mesh() -> Mesh {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ];
        triangulate(&points, Behavior::default()).unwrap()
    }

    fn interior_edge(mesh: &Mesh) -> OTri {
        let refs: Vec<TriRef> = mesh.triangles.refs().collect();
        for r in refs {
            for orient in 0..3 {
                let ot = OTri::new(r, orient);
                if !ot.sym(&mesh.triangles).tri.is_dummy() {
                    return ot;
                }
            }
        }
        OTri::none()
    }

    #[test]
    fn insert_on_the_diagonal_then_delete_restores_the_square() {
        let mut mesh = square_mesh();
        let center = mesh.add_vertex(0.5, 0.5, 0, VertexKind::Free);
        let mut search = OTri::none();
        let result = mesh.insert_vertex(center, &mut search, None, false, false, false, None);
        assert_eq!(result, InsertVertexResult::Successful);
        assert_eq!(mesh.num_triangles(), 4);
        assert!(mesh.is_consistent());
        assert!(mesh.is_delaunay());
        assert_eq!(search.org(&mesh.triangles), center);

        mesh.delete_vertex(search, false, None);
        assert_eq!(mesh.num_triangles(), 2);
        assert!(mesh.is_consistent());
        assert!(mesh.is_delaunay());
    }

    #[test]
    fn inserting_an_existing_location_reports_a_duplicate() {
        let mut mesh = square_mesh();
        let dup = mesh.add_vertex(1.0, 0.0, 0, VertexKind::Free);
        let mut search = OTri::none();
        let result = mesh.insert_vertex(dup, &mut search, None, false, false, false, None);
        assert_eq!(result, InsertVertexResult::Duplicate);
        assert_eq!(mesh.num_triangles(), 2);
    }

    #[test]
    fn undo_rolls_back_a_triangle_split() {
        let mut mesh = square_mesh();
        mesh.checkquality = true;
        let v = mesh.add_vertex(0.25, 0.3, 0, VertexKind::Free);
        let mut search = OTri::none();
        let result = mesh.insert_vertex(v, &mut search, None, false, false, false, None);
        assert_eq!(result, InsertVertexResult::Successful);
        assert_eq!(mesh.num_triangles(), 4);

        mesh.undo_vertex();
        mesh.vertex_dealloc(v);
        assert_eq!(mesh.num_triangles(), 2);
        assert!(mesh.is_consistent());
    }

    #[test]
    fn flip_and_unflip_swap_the_diagonal_back() {
        let mut mesh = square_mesh();
        let diag = interior_edge(&mesh);
        let org = diag.org(&mesh.triangles);
        let dest = diag.dest(&mesh.triangles);

        mesh.flip(diag);
        assert_eq!(mesh.num_triangles(), 2);
        assert!(mesh.is_consistent());
        // the square is cocircular, so both diagonals are Delaunay
        assert!(mesh.is_delaunay());
        assert_ne!(diag.org(&mesh.triangles), org);

        mesh.unflip(diag);
        assert!(mesh.is_consistent());
        assert_eq!(diag.org(&mesh.triangles), org);
        assert_eq!(diag.dest(&mesh.triangles), dest);
    }

    #[test]
    fn boundary_rotations_step_to_the_adjacent_edges() {
        let mut points = Vec::new();
        for i in 0..3 {
            for j in 0..3 {
                points.push(Point::new(i as f64, j as f64));
            }
        }
        let mesh = triangulate(&points, Behavior::default()).unwrap();
        let pool = &mesh.triangles;
        let mut checked = 0;
        for r in pool.refs() {
            for orient in 0..3 {
                let e = OTri::new(r, orient);
                if e.sym(pool).tri.is_dummy() {
                    continue;
                }
                let rn = e.rnext(pool);
                if !rn.tri.is_dummy() {
                    assert_eq!(rn.dest(pool), e.org(pool));
                    checked += 1;
                }
                let rp = e.rprev(pool);
                if !rp.tri.is_dummy() {
                    assert_eq!(rp.org(pool), e.dest(pool));
                }
            }
        }
        assert!(checked > 0);
    }

    #[test]
    fn the_infection_flag_belongs_to_the_triangle_not_the_edge() {
        let mut mesh = square_mesh();
        let e = interior_edge(&mesh);
        e.infect(&mut mesh.triangles);
        assert!(e.lnext().is_infected(&mesh.triangles));
        assert!(e.lprev().is_infected(&mesh.triangles));
        assert!(!e.sym(&mesh.triangles).is_infected(&mesh.triangles));
        e.uninfect(&mut mesh.triangles);
        assert!(!e.is_infected(&mesh.triangles));
    }

    #[test]
    fn quality_statistics_of_the_square_are_45_and_90() {
        let mesh = square_mesh();
        let (min, max) = mesh.quality_statistics();
        assert!((min - 45.0).abs() < 1e-9);
        assert!((max - 90.0).abs() < 1e-9);
    }

    #[test]
    fn cleanup_compacts_away_undead_vertices() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
            Point::new(0.0, 0.0),
        ];
        let mut mesh = triangulate(&points, Behavior::default()).unwrap();
        assert_eq!(mesh.num_vertices(), 5);
        mesh.cleanup();
        assert_eq!(mesh.num_vertices(), 4);
        let ids: Vec<i32> = mesh.live_vertices().map(|(_, v)| v.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
    }
}
