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

//! Adaptive-precision geometric predicates after Shewchuk.
//!
//! Each test first computes a floating-point estimate together with a
//! conservative error bound; only when the estimate is smaller than its bound
//! does the computation fall through to exact expansion arithmetic, one stage
//! at a time. Degenerate input yields an exact `0.0`, never an error.

use std::cell::Cell;

use crate::geometry::point::Point;

// Machine epsilon here is 2^-53, half of `f64::EPSILON`: the largest power of
// two such that 1.0 + epsilon rounds to 1.0.
const EPSILON: f64 = f64::EPSILON * 0.5;
// 2^27 + 1, splits a 53-bit significand into two 26-bit halves.
const SPLITTER: f64 = 134_217_729.0;

const RESULT_ERR_BOUND: f64 = (3.0 + 8.0 * EPSILON) * EPSILON;
const CC_ERR_BOUND_A: f64 = (3.0 + 16.0 * EPSILON) * EPSILON;
const CC_ERR_BOUND_B: f64 = (2.0 + 12.0 * EPSILON) * EPSILON;
const CC_ERR_BOUND_C: f64 = (9.0 + 64.0 * EPSILON) * EPSILON * EPSILON;
const ICC_ERR_BOUND_A: f64 = (10.0 + 96.0 * EPSILON) * EPSILON;
const ICC_ERR_BOUND_B: f64 = (4.0 + 48.0 * EPSILON) * EPSILON;
const ICC_ERR_BOUND_C: f64 = (44.0 + 576.0 * EPSILON) * EPSILON * EPSILON;

/// Predicate evaluator with per-instance call counters, so several meshes in
/// one process keep independent statistics.
#[derive(Debug, Default)]
pub struct Predicates {
    pub counter_clockwise_count: Cell<u64>,
    pub counter_clockwise_adapt_count: Cell<u64>,
    pub in_circle_count: Cell<u64>,
    pub in_circle_adapt_count: Cell<u64>,
    pub circumcenter_count: Cell<u64>,
}

impl Predicates {
    pub fn new() -> Self {
        Predicates::default()
    }

    /// Positive if `pa`, `pb`, `pc` occur in counterclockwise order, negative
    /// if clockwise, and exactly zero if collinear. Only the sign is
    /// meaningful to callers.
    pub fn counter_clockwise(&self, pa: &Point, pb: &Point, pc: &Point, no_exact: bool) -> f64 {
        self.counter_clockwise_count
            .set(self.counter_clockwise_count.get() + 1);
        let det_left = (pa.x - pc.x) * (pb.y - pc.y);
        let det_right = (pa.y - pc.y) * (pb.x - pc.x);
        let det = det_left - det_right;
        if no_exact {
            return det;
        }
        let det_sum;
        if det_left > 0.0 {
            if det_right <= 0.0 {
                return det;
            }
            det_sum = det_left + det_right;
        } else if det_left < 0.0 {
            if det_right >= 0.0 {
                return det;
            }
            det_sum = -det_left - det_right;
        } else {
            return det;
        }
        let err_bound = CC_ERR_BOUND_A * det_sum;
        if det >= err_bound || -det >= err_bound {
            return det;
        }
        self.counter_clockwise_adapt_count
            .set(self.counter_clockwise_adapt_count.get() + 1);
        counter_clockwise_adapt(pa, pb, pc, det_sum)
    }

    /// Positive if `pd` lies inside the circle through `pa`, `pb`, `pc`
    /// (which must occur in counterclockwise order), negative outside, zero
    /// on the circle.
    pub fn in_circle(&self, pa: &Point, pb: &Point, pc: &Point, pd: &Point, no_exact: bool) -> f64 {
        self.in_circle_count.set(self.in_circle_count.get() + 1);
        let adx = pa.x - pd.x;
        let bdx = pb.x - pd.x;
        let cdx = pc.x - pd.x;
        let ady = pa.y - pd.y;
        let bdy = pb.y - pd.y;
        let cdy = pc.y - pd.y;
        let bdxcdy = bdx * cdy;
        let cdxbdy = cdx * bdy;
        let alift = adx * adx + ady * ady;
        let cdxady = cdx * ady;
        let adxcdy = adx * cdy;
        let blift = bdx * bdx + bdy * bdy;
        let adxbdy = adx * bdy;
        let bdxady = bdx * ady;
        let clift = cdx * cdx + cdy * cdy;
        let det =
            alift * (bdxcdy - cdxbdy) + blift * (cdxady - adxcdy) + clift * (adxbdy - bdxady);
        if no_exact {
            return det;
        }
        let permanent = (bdxcdy.abs() + cdxbdy.abs()) * alift
            + (cdxady.abs() + adxcdy.abs()) * blift
            + (adxbdy.abs() + bdxady.abs()) * clift;
        let err_bound = ICC_ERR_BOUND_A * permanent;
        if det > err_bound || -det > err_bound {
            return det;
        }
        self.in_circle_adapt_count
            .set(self.in_circle_adapt_count.get() + 1);
        in_circle_adapt(pa, pb, pc, pd, permanent)
    }

    /// Regularity test used by the Delaunay checker; for unweighted points it
    /// is the in-circle test.
    pub fn non_regular(&self, pa: &Point, pb: &Point, pc: &Point, pd: &Point) -> f64 {
        self.in_circle(pa, pb, pc, pd, false)
    }

    pub fn reset_counters(&self) {
        self.counter_clockwise_count.set(0);
        self.counter_clockwise_adapt_count.set(0);
        self.in_circle_count.set(0);
        self.in_circle_adapt_count.set(0);
        self.circumcenter_count.set(0);
    }

    /// Circumcenter of the triangle `org`, `dest`, `apex`, with the offset
    /// from `org` also reported in the triangle's own coordinate frame
    /// through `xi` and `eta`.
    pub fn find_circumcenter(
        &self,
        org: &Point,
        dest: &Point,
        apex: &Point,
        xi: &mut f64,
        eta: &mut f64,
        no_exact: bool,
    ) -> Point {
        self.circumcenter_count
            .set(self.circumcenter_count.get() + 1);
        let xdo = dest.x - org.x;
        let ydo = dest.y - org.y;
        let xao = apex.x - org.x;
        let yao = apex.y - org.y;
        let do_dist = xdo * xdo + ydo * ydo;
        let ao_dist = xao * xao + yao * yao;
        let denominator = if no_exact {
            0.5 / (xdo * yao - xao * ydo)
        } else {
            let d = 0.5 / self.counter_clockwise(dest, apex, org, false);
            // the nested orientation test is bookkeeping, not a real query
            self.counter_clockwise_count
                .set(self.counter_clockwise_count.get() - 1);
            d
        };
        let dx = (yao * do_dist - ydo * ao_dist) * denominator;
        let dy = (xdo * ao_dist - xao * do_dist) * denominator;
        *xi = (yao * dx - xao * dy) * (2.0 * denominator);
        *eta = (xdo * dy - ydo * dx) * (2.0 * denominator);
        Point::new(org.x + dx, org.y + dy)
    }

    /// Circumcenter with the off-center heuristic: when an offset point
    /// toward the shortest edge's midpoint is closer than the true
    /// circumcenter, prefer it. Splitting there produces better minimum
    /// angles than the raw circumcenter would.
    pub fn find_circumcenter_off_center(
        &self,
        org: &Point,
        dest: &Point,
        apex: &Point,
        xi: &mut f64,
        eta: &mut f64,
        off_constant: f64,
        no_exact: bool,
    ) -> Point {
        self.circumcenter_count
            .set(self.circumcenter_count.get() + 1);
        let xdo = dest.x - org.x;
        let ydo = dest.y - org.y;
        let xao = apex.x - org.x;
        let yao = apex.y - org.y;
        let do_dist = xdo * xdo + ydo * ydo;
        let ao_dist = xao * xao + yao * yao;
        let da_dist = (dest.x - apex.x) * (dest.x - apex.x)
            + (dest.y - apex.y) * (dest.y - apex.y);
        let denominator = if no_exact {
            0.5 / (xdo * yao - xao * ydo)
        } else {
            let d = 0.5 / self.counter_clockwise(dest, apex, org, false);
            self.counter_clockwise_count
                .set(self.counter_clockwise_count.get() - 1);
            d
        };
        let mut dx = (yao * do_dist - ydo * ao_dist) * denominator;
        let mut dy = (xdo * ao_dist - xao * do_dist) * denominator;
        if do_dist < ao_dist && do_dist < da_dist {
            if off_constant > 0.0 {
                let dx_off = 0.5 * xdo - off_constant * ydo;
                let dy_off = 0.5 * ydo + off_constant * xdo;
                if dx_off * dx_off + dy_off * dy_off < dx * dx + dy * dy {
                    dx = dx_off;
                    dy = dy_off;
                }
            }
        } else if ao_dist < da_dist {
            if off_constant > 0.0 {
                let dx_off = 0.5 * xao + off_constant * yao;
                let dy_off = 0.5 * yao - off_constant * xao;
                if dx_off * dx_off + dy_off * dy_off < dx * dx + dy * dy {
                    dx = dx_off;
                    dy = dy_off;
                }
            }
        } else if off_constant > 0.0 {
            let dx_off = 0.5 * (apex.x - dest.x) - off_constant * (apex.y - dest.y);
            let dy_off = 0.5 * (apex.y - dest.y) + off_constant * (apex.x - dest.x);
            if dx_off * dx_off + dy_off * dy_off
                < (dx - xdo) * (dx - xdo) + (dy - ydo) * (dy - ydo)
            {
                dx = xdo + dx_off;
                dy = ydo + dy_off;
            }
        }
        *xi = (yao * dx - xao * dy) * (2.0 * denominator);
        *eta = (xdo * dy - ydo * dx) * (2.0 * denominator);
        Point::new(org.x + dx, org.y + dy)
    }
}

// ---------------------------------------------------------------------------
// expansion arithmetic primitives
//
// Every helper below encodes one of Shewchuk's exact-rounding identities; the
// floating-point operation sequences must not be reassociated.

#[inline(always)]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let x = a + b;
    let bvirt = x - a;
    let avirt = x - bvirt;
    let bround = b - bvirt;
    let around = a - avirt;
    (x, around + bround)
}

#[inline(always)]
fn two_diff(a: f64, b: f64) -> (f64, f64) {
    let x = a - b;
    let bvirt = a - x;
    let avirt = x + bvirt;
    let bround = bvirt - b;
    let around = a - avirt;
    (x, around + bround)
}

/// Roundoff of `x = a - b` when `x` was already computed.
#[inline(always)]
fn two_diff_tail(a: f64, b: f64, x: f64) -> f64 {
    let bvirt = a - x;
    let avirt = x + bvirt;
    let bround = bvirt - b;
    let around = a - avirt;
    around + bround
}

#[inline(always)]
fn split(a: f64) -> (f64, f64) {
    let c = SPLITTER * a;
    let abig = c - a;
    let hi = c - abig;
    (hi, a - hi)
}

#[inline(always)]
fn two_product(a: f64, b: f64) -> (f64, f64) {
    let x = a * b;
    let (ahi, alo) = split(a);
    let (bhi, blo) = split(b);
    let err1 = x - ahi * bhi;
    let err2 = err1 - alo * bhi;
    let err3 = err2 - ahi * blo;
    (x, alo * blo - err3)
}

#[inline(always)]
fn square(a: f64) -> (f64, f64) {
    let x = a * a;
    let (ahi, alo) = split(a);
    let err1 = x - ahi * ahi;
    let err3 = err1 - (ahi + ahi) * alo;
    (x, alo * alo - err3)
}

/// (a1, a0) - (b1, b0) as a four-component expansion, least significant first.
#[inline(always)]
fn two_two_diff(a1: f64, a0: f64, b1: f64, b0: f64) -> [f64; 4] {
    let (i, x0) = two_diff(a0, b0);
    let (j, r0) = two_sum(a1, i);
    let (i, x1) = two_diff(r0, b1);
    let (x3, x2) = two_sum(j, i);
    [x0, x1, x2, x3]
}

/// (a1, a0) + (b1, b0) as a four-component expansion, least significant first.
#[inline(always)]
fn two_two_sum(a1: f64, a0: f64, b1: f64, b0: f64) -> [f64; 4] {
    let (i, x0) = two_sum(a0, b0);
    let (j, r0) = two_sum(a1, i);
    let (i, x1) = two_sum(r0, b1);
    let (x3, x2) = two_sum(j, i);
    [x0, x1, x2, x3]
}

/// Sum of expansions `e` and `f` into `h`, eliminating zero components.
/// Returns the number of components written (at least one).
fn fast_expansion_sum_zero_elim(e: &[f64], f: &[f64], h: &mut [f64]) -> usize {
    let elen = e.len();
    let flen = f.len();
    let mut enow = e[0];
    let mut fnow = f[0];
    let mut eindex = 0;
    let mut findex = 0;
    let mut q;
    if (fnow > enow) == (fnow > -enow) {
        q = enow;
        eindex += 1;
        if eindex < elen {
            enow = e[eindex];
        }
    } else {
        q = fnow;
        findex += 1;
        if findex < flen {
            fnow = f[findex];
        }
    }
    let mut hindex = 0;
    if eindex < elen && findex < flen {
        let qnew;
        let hh;
        if (fnow > enow) == (fnow > -enow) {
            qnew = enow + q;
            let bvirt = qnew - enow;
            hh = q - bvirt;
            eindex += 1;
            if eindex < elen {
                enow = e[eindex];
            }
        } else {
            qnew = fnow + q;
            let bvirt = qnew - fnow;
            hh = q - bvirt;
            findex += 1;
            if findex < flen {
                fnow = f[findex];
            }
        }
        q = qnew;
        if hh != 0.0 {
            h[hindex] = hh;
            hindex += 1;
        }
        while eindex < elen && findex < flen {
            let (qnew, hh) = if (fnow > enow) == (fnow > -enow) {
                let r = two_sum(q, enow);
                eindex += 1;
                if eindex < elen {
                    enow = e[eindex];
                }
                r
            } else {
                let r = two_sum(q, fnow);
                findex += 1;
                if findex < flen {
                    fnow = f[findex];
                }
                r
            };
            q = qnew;
            if hh != 0.0 {
                h[hindex] = hh;
                hindex += 1;
            }
        }
    }
    while eindex < elen {
        let (qnew, hh) = two_sum(q, enow);
        eindex += 1;
        if eindex < elen {
            enow = e[eindex];
        }
        q = qnew;
        if hh != 0.0 {
            h[hindex] = hh;
            hindex += 1;
        }
    }
    while findex < flen {
        let (qnew, hh) = two_sum(q, fnow);
        findex += 1;
        if findex < flen {
            fnow = f[findex];
        }
        q = qnew;
        if hh != 0.0 {
            h[hindex] = hh;
            hindex += 1;
        }
    }
    if q != 0.0 || hindex == 0 {
        h[hindex] = q;
        hindex += 1;
    }
    hindex
}

/// Product of expansion `e` and scalar `b` into `h`, eliminating zeros.
fn scale_expansion_zero_elim(e: &[f64], b: f64, h: &mut [f64]) -> usize {
    let (bhi, blo) = split(b);
    let mut q = e[0] * b;
    let (ahi, alo) = split(e[0]);
    let err1 = q - ahi * bhi;
    let err2 = err1 - alo * bhi;
    let err3 = err2 - ahi * blo;
    let hh = alo * blo - err3;
    let mut hindex = 0;
    if hh != 0.0 {
        h[hindex] = hh;
        hindex += 1;
    }
    for &enow in &e[1..] {
        let product1 = enow * b;
        let (ahi, alo) = split(enow);
        let err1 = product1 - ahi * bhi;
        let err2 = err1 - alo * bhi;
        let err3 = err2 - ahi * blo;
        let product0 = alo * blo - err3;
        let (sum, hh) = two_sum(q, product0);
        if hh != 0.0 {
            h[hindex] = hh;
            hindex += 1;
        }
        // product1 dominates, so the fast path suffices
        q = product1 + sum;
        let bvirt = q - product1;
        let hh = sum - bvirt;
        if hh != 0.0 {
            h[hindex] = hh;
            hindex += 1;
        }
    }
    if q != 0.0 || hindex == 0 {
        h[hindex] = q;
        hindex += 1;
    }
    hindex
}

fn estimate(e: &[f64]) -> f64 {
    let mut q = e[0];
    for &v in &e[1..] {
        q += v;
    }
    q
}

fn counter_clockwise_adapt(pa: &Point, pb: &Point, pc: &Point, det_sum: f64) -> f64 {
    let acx = pa.x - pc.x;
    let bcx = pb.x - pc.x;
    let acy = pa.y - pc.y;
    let bcy = pb.y - pc.y;

    let (det_left, det_left_tail) = two_product(acx, bcy);
    let (det_right, det_right_tail) = two_product(acy, bcx);
    let b = two_two_diff(det_left, det_left_tail, det_right, det_right_tail);

    let mut det = estimate(&b);
    let mut err_bound = CC_ERR_BOUND_B * det_sum;
    if det >= err_bound || -det >= err_bound {
        return det;
    }

    let acx_tail = two_diff_tail(pa.x, pc.x, acx);
    let bcx_tail = two_diff_tail(pb.x, pc.x, bcx);
    let acy_tail = two_diff_tail(pa.y, pc.y, acy);
    let bcy_tail = two_diff_tail(pb.y, pc.y, bcy);
    if acx_tail == 0.0 && acy_tail == 0.0 && bcx_tail == 0.0 && bcy_tail == 0.0 {
        return det;
    }

    err_bound = CC_ERR_BOUND_C * det_sum + RESULT_ERR_BOUND * det.abs();
    det += acx * bcy_tail + bcy * acx_tail - (acy * bcx_tail + bcx * acy_tail);
    if det >= err_bound || -det >= err_bound {
        return det;
    }

    let mut c1 = [0.0; 8];
    let mut c2 = [0.0; 12];
    let mut d = [0.0; 16];

    let (s1, s0) = two_product(acx_tail, bcy);
    let (t1, t0) = two_product(acy_tail, bcx);
    let u = two_two_diff(s1, s0, t1, t0);
    let c1len = fast_expansion_sum_zero_elim(&b, &u, &mut c1);

    let (s1, s0) = two_product(acx, bcy_tail);
    let (t1, t0) = two_product(acy, bcx_tail);
    let u = two_two_diff(s1, s0, t1, t0);
    let c2len = fast_expansion_sum_zero_elim(&c1[..c1len], &u, &mut c2);

    let (s1, s0) = two_product(acx_tail, bcy_tail);
    let (t1, t0) = two_product(acy_tail, bcx_tail);
    let u = two_two_diff(s1, s0, t1, t0);
    let dlen = fast_expansion_sum_zero_elim(&c2[..c2len], &u, &mut d);

    d[dlen - 1]
}

fn in_circle_adapt(pa: &Point, pb: &Point, pc: &Point, pd: &Point, permanent: f64) -> f64 {
    let adx = pa.x - pd.x;
    let bdx = pb.x - pd.x;
    let cdx = pc.x - pd.x;
    let ady = pa.y - pd.y;
    let bdy = pb.y - pd.y;
    let cdy = pc.y - pd.y;

    // stage B: exact lift terms over the rounded coordinate differences
    let (bdxcdy1, bdxcdy0) = two_product(bdx, cdy);
    let (cdxbdy1, cdxbdy0) = two_product(cdx, bdy);
    let bc = two_two_diff(bdxcdy1, bdxcdy0, cdxbdy1, cdxbdy0);
    let mut axbc = [0.0; 8];
    let mut axxbc = [0.0; 16];
    let mut aybc = [0.0; 8];
    let mut ayybc = [0.0; 16];
    let mut adet = [0.0; 32];
    let axbclen = scale_expansion_zero_elim(&bc, adx, &mut axbc);
    let axxbclen = scale_expansion_zero_elim(&axbc[..axbclen], adx, &mut axxbc);
    let aybclen = scale_expansion_zero_elim(&bc, ady, &mut aybc);
    let ayybclen = scale_expansion_zero_elim(&aybc[..aybclen], ady, &mut ayybc);
    let alen =
        fast_expansion_sum_zero_elim(&axxbc[..axxbclen], &ayybc[..ayybclen], &mut adet);

    let (cdxady1, cdxady0) = two_product(cdx, ady);
    let (adxcdy1, adxcdy0) = two_product(adx, cdy);
    let ca = two_two_diff(cdxady1, cdxady0, adxcdy1, adxcdy0);
    let mut bxca = [0.0; 8];
    let mut bxxca = [0.0; 16];
    let mut byca = [0.0; 8];
    let mut byyca = [0.0; 16];
    let mut bdet = [0.0; 32];
    let bxcalen = scale_expansion_zero_elim(&ca, bdx, &mut bxca);
    let bxxcalen = scale_expansion_zero_elim(&bxca[..bxcalen], bdx, &mut bxxca);
    let bycalen = scale_expansion_zero_elim(&ca, bdy, &mut byca);
    let byycalen = scale_expansion_zero_elim(&byca[..bycalen], bdy, &mut byyca);
    let blen =
        fast_expansion_sum_zero_elim(&bxxca[..bxxcalen], &byyca[..byycalen], &mut bdet);

    let (adxbdy1, adxbdy0) = two_product(adx, bdy);
    let (bdxady1, bdxady0) = two_product(bdx, ady);
    let ab = two_two_diff(adxbdy1, adxbdy0, bdxady1, bdxady0);
    let mut cxab = [0.0; 8];
    let mut cxxab = [0.0; 16];
    let mut cyab = [0.0; 8];
    let mut cyyab = [0.0; 16];
    let mut cdet = [0.0; 32];
    let cxablen = scale_expansion_zero_elim(&ab, cdx, &mut cxab);
    let cxxablen = scale_expansion_zero_elim(&cxab[..cxablen], cdx, &mut cxxab);
    let cyablen = scale_expansion_zero_elim(&ab, cdy, &mut cyab);
    let cyyablen = scale_expansion_zero_elim(&cyab[..cyablen], cdy, &mut cyyab);
    let clen =
        fast_expansion_sum_zero_elim(&cxxab[..cxxablen], &cyyab[..cyyablen], &mut cdet);

    let mut abdet = [0.0; 64];
    let mut fin1 = [0.0; 1152];
    let mut fin2 = [0.0; 1152];
    let ablen = fast_expansion_sum_zero_elim(&adet[..alen], &bdet[..blen], &mut abdet);
    let mut finlength =
        fast_expansion_sum_zero_elim(&abdet[..ablen], &cdet[..clen], &mut fin1);

    let mut det = estimate(&fin1[..finlength]);
    let mut err_bound = ICC_ERR_BOUND_B * permanent;
    if det >= err_bound || -det >= err_bound {
        return det;
    }

    let adxtail = two_diff_tail(pa.x, pd.x, adx);
    let adytail = two_diff_tail(pa.y, pd.y, ady);
    let bdxtail = two_diff_tail(pb.x, pd.x, bdx);
    let bdytail = two_diff_tail(pb.y, pd.y, bdy);
    let cdxtail = two_diff_tail(pc.x, pd.x, cdx);
    let cdytail = two_diff_tail(pc.y, pd.y, cdy);
    if adxtail == 0.0
        && bdxtail == 0.0
        && cdxtail == 0.0
        && adytail == 0.0
        && bdytail == 0.0
        && cdytail == 0.0
    {
        return det;
    }

    // stage C: first-order correction in the coordinate tails
    err_bound = ICC_ERR_BOUND_C * permanent + RESULT_ERR_BOUND * det.abs();
    det += (adx * adx + ady * ady)
        * (bdx * cdytail + cdy * bdxtail - (bdy * cdxtail + cdx * bdytail))
        + 2.0 * (adx * adxtail + ady * adytail) * (bdx * cdy - bdy * cdx)
        + ((bdx * bdx + bdy * bdy)
            * (cdx * adytail + ady * cdxtail - (cdy * adxtail + adx * cdytail))
            + 2.0 * (bdx * bdxtail + bdy * bdytail) * (cdx * ady - cdy * adx))
        + ((cdx * cdx + cdy * cdy)
            * (adx * bdytail + bdy * adxtail - (ady * bdxtail + bdx * adytail))
            + 2.0 * (cdx * cdxtail + cdy * cdytail) * (adx * bdy - ady * bdx));
    if det >= err_bound || -det >= err_bound {
        return det;
    }

    // stage D: the full expansion, folding in one tail product at a time
    let mut finnow: &mut [f64] = &mut fin1;
    let mut finother: &mut [f64] = &mut fin2;

    let mut aa = [0.0; 4];
    let mut bb = [0.0; 4];
    let mut cc = [0.0; 4];
    if bdxtail != 0.0 || bdytail != 0.0 || cdxtail != 0.0 || cdytail != 0.0 {
        let (adxadx1, adxadx0) = square(adx);
        let (adyady1, adyady0) = square(ady);
        aa = two_two_sum(adxadx1, adxadx0, adyady1, adyady0);
    }
    if cdxtail != 0.0 || cdytail != 0.0 || adxtail != 0.0 || adytail != 0.0 {
        let (bdxbdx1, bdxbdx0) = square(bdx);
        let (bdybdy1, bdybdy0) = square(bdy);
        bb = two_two_sum(bdxbdx1, bdxbdx0, bdybdy1, bdybdy0);
    }
    if adxtail != 0.0 || adytail != 0.0 || bdxtail != 0.0 || bdytail != 0.0 {
        let (cdxcdx1, cdxcdx0) = square(cdx);
        let (cdycdy1, cdycdy0) = square(cdy);
        cc = two_two_sum(cdxcdx1, cdxcdx0, cdycdy1, cdycdy0);
    }

    let mut temp8 = [0.0; 8];
    let mut temp16a = [0.0; 16];
    let mut temp16b = [0.0; 16];
    let mut temp16c = [0.0; 16];
    let mut temp32a = [0.0; 32];
    let mut temp32b = [0.0; 32];
    let mut temp48 = [0.0; 48];
    let mut temp64 = [0.0; 64];

    let mut axtbc = [0.0; 8];
    let mut aytbc = [0.0; 8];
    let mut bxtca = [0.0; 8];
    let mut bytca = [0.0; 8];
    let mut cxtab = [0.0; 8];
    let mut cytab = [0.0; 8];
    let mut axtbclen = 0;
    let mut aytbclen = 0;
    let mut bxtcalen = 0;
    let mut bytcalen = 0;
    let mut cxtablen = 0;
    let mut cytablen = 0;

    if adxtail != 0.0 {
        axtbclen = scale_expansion_zero_elim(&bc, adxtail, &mut axtbc);
        let t16a = scale_expansion_zero_elim(&axtbc[..axtbclen], 2.0 * adx, &mut temp16a);
        let mut axtcc = [0.0; 8];
        let axtcclen = scale_expansion_zero_elim(&cc, adxtail, &mut axtcc);
        let t16b = scale_expansion_zero_elim(&axtcc[..axtcclen], bdy, &mut temp16b);
        let mut axtbb = [0.0; 8];
        let axtbblen = scale_expansion_zero_elim(&bb, adxtail, &mut axtbb);
        let t16c = scale_expansion_zero_elim(&axtbb[..axtbblen], -cdy, &mut temp16c);
        let t32a =
            fast_expansion_sum_zero_elim(&temp16a[..t16a], &temp16b[..t16b], &mut temp32a);
        let t48 =
            fast_expansion_sum_zero_elim(&temp16c[..t16c], &temp32a[..t32a], &mut temp48);
        finlength =
            fast_expansion_sum_zero_elim(&finnow[..finlength], &temp48[..t48], finother);
        std::mem::swap(&mut finnow, &mut finother);
    }
    if adytail != 0.0 {
        aytbclen = scale_expansion_zero_elim(&bc, adytail, &mut aytbc);
        let t16a = scale_expansion_zero_elim(&aytbc[..aytbclen], 2.0 * ady, &mut temp16a);
        let mut aytbb = [0.0; 8];
        let aytbblen = scale_expansion_zero_elim(&bb, adytail, &mut aytbb);
        let t16b = scale_expansion_zero_elim(&aytbb[..aytbblen], cdx, &mut temp16b);
        let mut aytcc = [0.0; 8];
        let aytcclen = scale_expansion_zero_elim(&cc, adytail, &mut aytcc);
        let t16c = scale_expansion_zero_elim(&aytcc[..aytcclen], -bdx, &mut temp16c);
        let t32a =
            fast_expansion_sum_zero_elim(&temp16a[..t16a], &temp16b[..t16b], &mut temp32a);
        let t48 =
            fast_expansion_sum_zero_elim(&temp16c[..t16c], &temp32a[..t32a], &mut temp48);
        finlength =
            fast_expansion_sum_zero_elim(&finnow[..finlength], &temp48[..t48], finother);
        std::mem::swap(&mut finnow, &mut finother);
    }
    if bdxtail != 0.0 {
        bxtcalen = scale_expansion_zero_elim(&ca, bdxtail, &mut bxtca);
        let t16a = scale_expansion_zero_elim(&bxtca[..bxtcalen], 2.0 * bdx, &mut temp16a);
        let mut bxtaa = [0.0; 8];
        let bxtaalen = scale_expansion_zero_elim(&aa, bdxtail, &mut bxtaa);
        let t16b = scale_expansion_zero_elim(&bxtaa[..bxtaalen], cdy, &mut temp16b);
        let mut bxtcc = [0.0; 8];
        let bxtcclen = scale_expansion_zero_elim(&cc, bdxtail, &mut bxtcc);
        let t16c = scale_expansion_zero_elim(&bxtcc[..bxtcclen], -ady, &mut temp16c);
        let t32a =
            fast_expansion_sum_zero_elim(&temp16a[..t16a], &temp16b[..t16b], &mut temp32a);
        let t48 =
            fast_expansion_sum_zero_elim(&temp16c[..t16c], &temp32a[..t32a], &mut temp48);
        finlength =
            fast_expansion_sum_zero_elim(&finnow[..finlength], &temp48[..t48], finother);
        std::mem::swap(&mut finnow, &mut finother);
    }
    if bdytail != 0.0 {
        bytcalen = scale_expansion_zero_elim(&ca, bdytail, &mut bytca);
        let t16a = scale_expansion_zero_elim(&bytca[..bytcalen], 2.0 * bdy, &mut temp16a);
        let mut bytcc = [0.0; 8];
        let bytcclen = scale_expansion_zero_elim(&cc, bdytail, &mut bytcc);
        let t16b = scale_expansion_zero_elim(&bytcc[..bytcclen], adx, &mut temp16b);
        let mut bytaa = [0.0; 8];
        let bytaalen = scale_expansion_zero_elim(&aa, bdytail, &mut bytaa);
        let t16c = scale_expansion_zero_elim(&bytaa[..bytaalen], -cdx, &mut temp16c);
        let t32a =
            fast_expansion_sum_zero_elim(&temp16a[..t16a], &temp16b[..t16b], &mut temp32a);
        let t48 =
            fast_expansion_sum_zero_elim(&temp16c[..t16c], &temp32a[..t32a], &mut temp48);
        finlength =
            fast_expansion_sum_zero_elim(&finnow[..finlength], &temp48[..t48], finother);
        std::mem::swap(&mut finnow, &mut finother);
    }
    if cdxtail != 0.0 {
        cxtablen = scale_expansion_zero_elim(&ab, cdxtail, &mut cxtab);
        let t16a = scale_expansion_zero_elim(&cxtab[..cxtablen], 2.0 * cdx, &mut temp16a);
        let mut cxtbb = [0.0; 8];
        let cxtbblen = scale_expansion_zero_elim(&bb, cdxtail, &mut cxtbb);
        let t16b = scale_expansion_zero_elim(&cxtbb[..cxtbblen], ady, &mut temp16b);
        let mut cxtaa = [0.0; 8];
        let cxtaalen = scale_expansion_zero_elim(&aa, cdxtail, &mut cxtaa);
        let t16c = scale_expansion_zero_elim(&cxtaa[..cxtaalen], -bdy, &mut temp16c);
        let t32a =
            fast_expansion_sum_zero_elim(&temp16a[..t16a], &temp16b[..t16b], &mut temp32a);
        let t48 =
            fast_expansion_sum_zero_elim(&temp16c[..t16c], &temp32a[..t32a], &mut temp48);
        finlength =
            fast_expansion_sum_zero_elim(&finnow[..finlength], &temp48[..t48], finother);
        std::mem::swap(&mut finnow, &mut finother);
    }
    if cdytail != 0.0 {
        cytablen = scale_expansion_zero_elim(&ab, cdytail, &mut cytab);
        let t16a = scale_expansion_zero_elim(&cytab[..cytablen], 2.0 * cdy, &mut temp16a);
        let mut cytaa = [0.0; 8];
        let cytaalen = scale_expansion_zero_elim(&aa, cdytail, &mut cytaa);
        let t16b = scale_expansion_zero_elim(&cytaa[..cytaalen], bdx, &mut temp16b);
        let mut cytbb = [0.0; 8];
        let cytbblen = scale_expansion_zero_elim(&bb, cdytail, &mut cytbb);
        let t16c = scale_expansion_zero_elim(&cytbb[..cytbblen], -adx, &mut temp16c);
        let t32a =
            fast_expansion_sum_zero_elim(&temp16a[..t16a], &temp16b[..t16b], &mut temp32a);
        let t48 =
            fast_expansion_sum_zero_elim(&temp16c[..t16c], &temp32a[..t32a], &mut temp48);
        finlength =
            fast_expansion_sum_zero_elim(&finnow[..finlength], &temp48[..t48], finother);
        std::mem::swap(&mut finnow, &mut finother);
    }

    if adxtail != 0.0 || adytail != 0.0 {
        let mut bct = [0.0; 8];
        let mut bctt = [0.0; 4];
        let bctlen;
        let bcttlen;
        if bdxtail != 0.0 || bdytail != 0.0 || cdxtail != 0.0 || cdytail != 0.0 {
            let (ti1, ti0) = two_product(bdxtail, cdy);
            let (tj1, tj0) = two_product(bdx, cdytail);
            let u = two_two_sum(ti1, ti0, tj1, tj0);
            let (ti1, ti0) = two_product(cdxtail, -bdy);
            let (tj1, tj0) = two_product(cdx, -bdytail);
            let v = two_two_sum(ti1, ti0, tj1, tj0);
            bctlen = fast_expansion_sum_zero_elim(&u, &v, &mut bct);
            let (ti1, ti0) = two_product(bdxtail, cdytail);
            let (tj1, tj0) = two_product(cdxtail, bdytail);
            bctt = two_two_diff(ti1, ti0, tj1, tj0);
            bcttlen = 4;
        } else {
            bct[0] = 0.0;
            bctlen = 1;
            bctt[0] = 0.0;
            bcttlen = 1;
        }
        if adxtail != 0.0 {
            let t16a = scale_expansion_zero_elim(&axtbc[..axtbclen], adxtail, &mut temp16a);
            let mut axtbct = [0.0; 16];
            let axtbctlen = scale_expansion_zero_elim(&bct[..bctlen], adxtail, &mut axtbct);
            let t32a =
                scale_expansion_zero_elim(&axtbct[..axtbctlen], 2.0 * adx, &mut temp32a);
            let t48 =
                fast_expansion_sum_zero_elim(&temp16a[..t16a], &temp32a[..t32a], &mut temp48);
            finlength =
                fast_expansion_sum_zero_elim(&finnow[..finlength], &temp48[..t48], finother);
            std::mem::swap(&mut finnow, &mut finother);
            if bdytail != 0.0 {
                let t8 = scale_expansion_zero_elim(&cc, adxtail, &mut temp8);
                let t16a = scale_expansion_zero_elim(&temp8[..t8], bdytail, &mut temp16a);
                finlength = fast_expansion_sum_zero_elim(
                    &finnow[..finlength],
                    &temp16a[..t16a],
                    finother,
                );
                std::mem::swap(&mut finnow, &mut finother);
            }
            if cdytail != 0.0 {
                let t8 = scale_expansion_zero_elim(&bb, -adxtail, &mut temp8);
                let t16a = scale_expansion_zero_elim(&temp8[..t8], cdytail, &mut temp16a);
                finlength = fast_expansion_sum_zero_elim(
                    &finnow[..finlength],
                    &temp16a[..t16a],
                    finother,
                );
                std::mem::swap(&mut finnow, &mut finother);
            }
            let t32a = scale_expansion_zero_elim(&axtbct[..axtbctlen], adxtail, &mut temp32a);
            let mut axtbctt = [0.0; 8];
            let axtbcttlen =
                scale_expansion_zero_elim(&bctt[..bcttlen], adxtail, &mut axtbctt);
            let t16a =
                scale_expansion_zero_elim(&axtbctt[..axtbcttlen], 2.0 * adx, &mut temp16a);
            let t16b =
                scale_expansion_zero_elim(&axtbctt[..axtbcttlen], adxtail, &mut temp16b);
            let t32b =
                fast_expansion_sum_zero_elim(&temp16a[..t16a], &temp16b[..t16b], &mut temp32b);
            let t64 =
                fast_expansion_sum_zero_elim(&temp32a[..t32a], &temp32b[..t32b], &mut temp64);
            finlength =
                fast_expansion_sum_zero_elim(&finnow[..finlength], &temp64[..t64], finother);
            std::mem::swap(&mut finnow, &mut finother);
        }
        if adytail != 0.0 {
            let t16a = scale_expansion_zero_elim(&aytbc[..aytbclen], adytail, &mut temp16a);
            let mut aytbct = [0.0; 16];
            let aytbctlen = scale_expansion_zero_elim(&bct[..bctlen], adytail, &mut aytbct);
            let t32a =
                scale_expansion_zero_elim(&aytbct[..aytbctlen], 2.0 * ady, &mut temp32a);
            let t48 =
                fast_expansion_sum_zero_elim(&temp16a[..t16a], &temp32a[..t32a], &mut temp48);
            finlength =
                fast_expansion_sum_zero_elim(&finnow[..finlength], &temp48[..t48], finother);
            std::mem::swap(&mut finnow, &mut finother);
            let t32a = scale_expansion_zero_elim(&aytbct[..aytbctlen], adytail, &mut temp32a);
            let mut aytbctt = [0.0; 8];
            let aytbcttlen =
                scale_expansion_zero_elim(&bctt[..bcttlen], adytail, &mut aytbctt);
            let t16a =
                scale_expansion_zero_elim(&aytbctt[..aytbcttlen], 2.0 * ady, &mut temp16a);
            let t16b =
                scale_expansion_zero_elim(&aytbctt[..aytbcttlen], adytail, &mut temp16b);
            let t32b =
                fast_expansion_sum_zero_elim(&temp16a[..t16a], &temp16b[..t16b], &mut temp32b);
            let t64 =
                fast_expansion_sum_zero_elim(&temp32a[..t32a], &temp32b[..t32b], &mut temp64);
            finlength =
                fast_expansion_sum_zero_elim(&finnow[..finlength], &temp64[..t64], finother);
            std::mem::swap(&mut finnow, &mut finother);
        }
    }

    if bdxtail != 0.0 || bdytail != 0.0 {
        let mut cat = [0.0; 8];
        let mut catt = [0.0; 4];
        let catlen;
        let cattlen;
        if cdxtail != 0.0 || cdytail != 0.0 || adxtail != 0.0 || adytail != 0.0 {
            let (ti1, ti0) = two_product(cdxtail, ady);
            let (tj1, tj0) = two_product(cdx, adytail);
            let u = two_two_sum(ti1, ti0, tj1, tj0);
            let (ti1, ti0) = two_product(adxtail, -cdy);
            let (tj1, tj0) = two_product(adx, -cdytail);
            let v = two_two_sum(ti1, ti0, tj1, tj0);
            catlen = fast_expansion_sum_zero_elim(&u, &v, &mut cat);
            let (ti1, ti0) = two_product(cdxtail, adytail);
            let (tj1, tj0) = two_product(adxtail, cdytail);
            catt = two_two_diff(ti1, ti0, tj1, tj0);
            cattlen = 4;
        } else {
            cat[0] = 0.0;
            catlen = 1;
            catt[0] = 0.0;
            cattlen = 1;
        }
        if bdxtail != 0.0 {
            let t16a = scale_expansion_zero_elim(&bxtca[..bxtcalen], bdxtail, &mut temp16a);
            let mut bxtcat = [0.0; 16];
            let bxtcatlen = scale_expansion_zero_elim(&cat[..catlen], bdxtail, &mut bxtcat);
            let t32a =
                scale_expansion_zero_elim(&bxtcat[..bxtcatlen], 2.0 * bdx, &mut temp32a);
            let t48 =
                fast_expansion_sum_zero_elim(&temp16a[..t16a], &temp32a[..t32a], &mut temp48);
            finlength =
                fast_expansion_sum_zero_elim(&finnow[..finlength], &temp48[..t48], finother);
            std::mem::swap(&mut finnow, &mut finother);
            if cdytail != 0.0 {
                let t8 = scale_expansion_zero_elim(&aa, bdxtail, &mut temp8);
                let t16a = scale_expansion_zero_elim(&temp8[..t8], cdytail, &mut temp16a);
                finlength = fast_expansion_sum_zero_elim(
                    &finnow[..finlength],
                    &temp16a[..t16a],
                    finother,
                );
                std::mem::swap(&mut finnow, &mut finother);
            }
            if adytail != 0.0 {
                let t8 = scale_expansion_zero_elim(&cc, -bdxtail, &mut temp8);
                let t16a = scale_expansion_zero_elim(&temp8[..t8], adytail, &mut temp16a);
                finlength = fast_expansion_sum_zero_elim(
                    &finnow[..finlength],
                    &temp16a[..t16a],
                    finother,
                );
                std::mem::swap(&mut finnow, &mut finother);
            }
            let t32a = scale_expansion_zero_elim(&bxtcat[..bxtcatlen], bdxtail, &mut temp32a);
            let mut bxtcatt = [0.0; 8];
            let bxtcattlen =
                scale_expansion_zero_elim(&catt[..cattlen], bdxtail, &mut bxtcatt);
            let t16a =
                scale_expansion_zero_elim(&bxtcatt[..bxtcattlen], 2.0 * bdx, &mut temp16a);
            let t16b =
                scale_expansion_zero_elim(&bxtcatt[..bxtcattlen], bdxtail, &mut temp16b);
            let t32b =
                fast_expansion_sum_zero_elim(&temp16a[..t16a], &temp16b[..t16b], &mut temp32b);
            let t64 =
                fast_expansion_sum_zero_elim(&temp32a[..t32a], &temp32b[..t32b], &mut temp64);
            finlength =
                fast_expansion_sum_zero_elim(&finnow[..finlength], &temp64[..t64], finother);
            std::mem::swap(&mut finnow, &mut finother);
        }
        if bdytail != 0.0 {
            let t16a = scale_expansion_zero_elim(&bytca[..bytcalen], bdytail, &mut temp16a);
            let mut bytcat = [0.0; 16];
            let bytcatlen = scale_expansion_zero_elim(&cat[..catlen], bdytail, &mut bytcat);
            let t32a =
                scale_expansion_zero_elim(&bytcat[..bytcatlen], 2.0 * bdy, &mut temp32a);
            let t48 =
                fast_expansion_sum_zero_elim(&temp16a[..t16a], &temp32a[..t32a], &mut temp48);
            finlength =
                fast_expansion_sum_zero_elim(&finnow[..finlength], &temp48[..t48], finother);
            std::mem::swap(&mut finnow, &mut finother);
            let t32a = scale_expansion_zero_elim(&bytcat[..bytcatlen], bdytail, &mut temp32a);
            let mut bytcatt = [0.0; 8];
            let bytcattlen =
                scale_expansion_zero_elim(&catt[..cattlen], bdytail, &mut bytcatt);
            let t16a =
                scale_expansion_zero_elim(&bytcatt[..bytcattlen], 2.0 * bdy, &mut temp16a);
            let t16b =
                scale_expansion_zero_elim(&bytcatt[..bytcattlen], bdytail, &mut temp16b);
            let t32b =
                fast_expansion_sum_zero_elim(&temp16a[..t16a], &temp16b[..t16b], &mut temp32b);
            let t64 =
                fast_expansion_sum_zero_elim(&temp32a[..t32a], &temp32b[..t32b], &mut temp64);
            finlength =
                fast_expansion_sum_zero_elim(&finnow[..finlength], &temp64[..t64], finother);
            std::mem::swap(&mut finnow, &mut finother);
        }
    }

    if cdxtail != 0.0 || cdytail != 0.0 {
        let mut abt = [0.0; 8];
        let mut abtt = [0.0; 4];
        let abtlen;
        let abttlen;
        if adxtail != 0.0 || adytail != 0.0 || bdxtail != 0.0 || bdytail != 0.0 {
            let (ti1, ti0) = two_product(adxtail, bdy);
            let (tj1, tj0) = two_product(adx, bdytail);
            let u = two_two_sum(ti1, ti0, tj1, tj0);
            let (ti1, ti0) = two_product(bdxtail, -ady);
            let (tj1, tj0) = two_product(bdx, -adytail);
            let v = two_two_sum(ti1, ti0, tj1, tj0);
            abtlen = fast_expansion_sum_zero_elim(&u, &v, &mut abt);
            let (ti1, ti0) = two_product(adxtail, bdytail);
            let (tj1, tj0) = two_product(bdxtail, adytail);
            abtt = two_two_diff(ti1, ti0, tj1, tj0);
            abttlen = 4;
        } else {
            abt[0] = 0.0;
            abtlen = 1;
            abtt[0] = 0.0;
            abttlen = 1;
        }
        if cdxtail != 0.0 {
            let t16a = scale_expansion_zero_elim(&cxtab[..cxtablen], cdxtail, &mut temp16a);
            let mut cxtabt = [0.0; 16];
            let cxtabtlen = scale_expansion_zero_elim(&abt[..abtlen], cdxtail, &mut cxtabt);
            let t32a =
                scale_expansion_zero_elim(&cxtabt[..cxtabtlen], 2.0 * cdx, &mut temp32a);
            let t48 =
                fast_expansion_sum_zero_elim(&temp16a[..t16a], &temp32a[..t32a], &mut temp48);
            finlength =
                fast_expansion_sum_zero_elim(&finnow[..finlength], &temp48[..t48], finother);
            std::mem::swap(&mut finnow, &mut finother);
            if adytail != 0.0 {
                let t8 = scale_expansion_zero_elim(&bb, cdxtail, &mut temp8);
                let t16a = scale_expansion_zero_elim(&temp8[..t8], adytail, &mut temp16a);
                finlength = fast_expansion_sum_zero_elim(
                    &finnow[..finlength],
                    &temp16a[..t16a],
                    finother,
                );
                std::mem::swap(&mut finnow, &mut finother);
            }
            if bdytail != 0.0 {
                let t8 = scale_expansion_zero_elim(&aa, -cdxtail, &mut temp8);
                let t16a = scale_expansion_zero_elim(&temp8[..t8], bdytail, &mut temp16a);
                finlength = fast_expansion_sum_zero_elim(
                    &finnow[..finlength],
                    &temp16a[..t16a],
                    finother,
                );
                std::mem::swap(&mut finnow, &mut finother);
            }
            let t32a = scale_expansion_zero_elim(&cxtabt[..cxtabtlen], cdxtail, &mut temp32a);
            let mut cxtabtt = [0.0; 8];
            let cxtabttlen =
                scale_expansion_zero_elim(&abtt[..abttlen], cdxtail, &mut cxtabtt);
            let t16a =
                scale_expansion_zero_elim(&cxtabtt[..cxtabttlen], 2.0 * cdx, &mut temp16a);
            let t16b =
                scale_expansion_zero_elim(&cxtabtt[..cxtabttlen], cdxtail, &mut temp16b);
            let t32b =
                fast_expansion_sum_zero_elim(&temp16a[..t16a], &temp16b[..t16b], &mut temp32b);
            let t64 =
                fast_expansion_sum_zero_elim(&temp32a[..t32a], &temp32b[..t32b], &mut temp64);
            finlength =
                fast_expansion_sum_zero_elim(&finnow[..finlength], &temp64[..t64], finother);
            std::mem::swap(&mut finnow, &mut finother);
        }
        if cdytail != 0.0 {
            let t16a = scale_expansion_zero_elim(&cytab[..cytablen], cdytail, &mut temp16a);
            let mut cytabt = [0.0; 16];
            let cytabtlen = scale_expansion_zero_elim(&abt[..abtlen], cdytail, &mut cytabt);
            let t32a =
                scale_expansion_zero_elim(&cytabt[..cytabtlen], 2.0 * cdy, &mut temp32a);
            let t48 =
                fast_expansion_sum_zero_elim(&temp16a[..t16a], &temp32a[..t32a], &mut temp48);
            finlength =
                fast_expansion_sum_zero_elim(&finnow[..finlength], &temp48[..t48], finother);
            std::mem::swap(&mut finnow, &mut finother);
            let t32a = scale_expansion_zero_elim(&cytabt[..cytabtlen], cdytail, &mut temp32a);
            let mut cytabtt = [0.0; 8];
            let cytabttlen =
                scale_expansion_zero_elim(&abtt[..abttlen], cdytail, &mut cytabtt);
            let t16a =
                scale_expansion_zero_elim(&cytabtt[..cytabttlen], 2.0 * cdy, &mut temp16a);
            let t16b =
                scale_expansion_zero_elim(&cytabtt[..cytabttlen], cdytail, &mut temp16b);
            let t32b =
                fast_expansion_sum_zero_elim(&temp16a[..t16a], &temp16b[..t16b], &mut temp32b);
            let t64 =
                fast_expansion_sum_zero_elim(&temp32a[..t32a], &temp32b[..t32b], &mut temp64);
            finlength =
                fast_expansion_sum_zero_elim(&finnow[..finlength], &temp64[..t64], finother);
            std::mem::swap(&mut finnow, &mut finother);
        }
    }

    finnow[finlength - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn derived_error_bounds_match_the_iterated_values() {
        // reproduce the classic probe loop and compare against the consts
        let mut every_other = true;
        let mut epsilon = 1.0f64;
        let mut splitter = 1.0f64;
        let mut check = 1.0f64;
        loop {
            let last_check = check;
            epsilon *= 0.5;
            if every_other {
                splitter *= 2.0;
            }
            every_other = !every_other;
            check = 1.0 + epsilon;
            if check == 1.0 || check == last_check {
                break;
            }
        }
        splitter += 1.0;
        assert_eq!(epsilon, EPSILON);
        assert_eq!(splitter, SPLITTER);
    }

    #[test]
    fn orientation_sign_and_antisymmetry() {
        let preds = Predicates::new();
        let a = p(0.0, 0.0);
        let b = p(1.0, 0.0);
        let c = p(0.0, 1.0);
        assert!(preds.counter_clockwise(&a, &b, &c, false) > 0.0);
        assert!(preds.counter_clockwise(&b, &a, &c, false) < 0.0);
        assert_eq!(
            preds.counter_clockwise(&a, &b, &c, false),
            -preds.counter_clockwise(&b, &a, &c, false)
        );
    }

    #[test]
    fn orientation_exact_zero_on_collinear_input() {
        let preds = Predicates::new();
        assert_eq!(
            preds.counter_clockwise(&p(0.0, 0.0), &p(1.0, 1.0), &p(2.0, 2.0), false),
            0.0
        );
        // collinear but with coordinates whose naive determinant rounds
        let a = p(0.5, 0.5);
        let b = p(12.0, 12.0);
        let c = p(24.0, 24.0);
        assert_eq!(preds.counter_clockwise(&a, &b, &c, false), 0.0);
    }

    #[test]
    fn in_circle_sign() {
        let preds = Predicates::new();
        let a = p(0.0, 0.0);
        let b = p(1.0, 0.0);
        let c = p(0.0, 1.0);
        assert!(preds.in_circle(&a, &b, &c, &p(0.3, 0.3), false) > 0.0);
        assert!(preds.in_circle(&a, &b, &c, &p(5.0, 5.0), false) < 0.0);
        // (1,1) lies exactly on the circumcircle of the unit right triangle
        assert_eq!(preds.in_circle(&a, &b, &c, &p(1.0, 1.0), false), 0.0);
    }

    #[test]
    fn adaptive_path_is_exercised_by_near_degenerate_input() {
        let preds = Predicates::new();
        let a = p(0.0, 0.0);
        let b = p(1e-30, 1e-30);
        let c = p(2e-30, 2e-30);
        assert_eq!(preds.counter_clockwise(&a, &b, &c, false), 0.0);
        assert!(preds.counter_clockwise_adapt_count.get() > 0);
    }

    #[test]
    fn circumcenter_of_right_triangle() {
        let preds = Predicates::new();
        let mut xi = 0.0;
        let mut eta = 0.0;
        let cc = preds.find_circumcenter(
            &p(0.0, 0.0),
            &p(2.0, 0.0),
            &p(0.0, 2.0),
            &mut xi,
            &mut eta,
            false,
        );
        assert_eq!(cc.x, 1.0);
        assert_eq!(cc.y, 1.0);
    }

    #[test]
    fn no_exact_skips_the_filter() {
        let preds = Predicates::new();
        let a = p(0.0, 0.0);
        let b = p(1e-30, 1e-30);
        let c = p(2e-30, 2e-30);
        preds.counter_clockwise(&a, &b, &c, true);
        assert_eq!(preds.counter_clockwise_adapt_count.get(), 0);
    }
}
