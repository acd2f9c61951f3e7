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

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rug::Rational;
use trigon::geometry::Point;
use trigon::kernel::Predicates;

fn rat(x: f64) -> Rational {
    Rational::from_f64(x).unwrap()
}

/// Exact sign of the 2x2 orientation determinant, via rationals.
fn orient_sign_exact(pa: &Point, pb: &Point, pc: &Point) -> i32 {
    let det = (rat(pa.x) - rat(pc.x)) * (rat(pb.y) - rat(pc.y))
        - (rat(pa.y) - rat(pc.y)) * (rat(pb.x) - rat(pc.x));
    det.cmp0() as i32
}

/// Exact sign of the incircle determinant, via rationals.
fn incircle_sign_exact(pa: &Point, pb: &Point, pc: &Point, pd: &Point) -> i32 {
    let adx = rat(pa.x) - rat(pd.x);
    let ady = rat(pa.y) - rat(pd.y);
    let bdx = rat(pb.x) - rat(pd.x);
    let bdy = rat(pb.y) - rat(pd.y);
    let cdx = rat(pc.x) - rat(pd.x);
    let cdy = rat(pc.y) - rat(pd.y);
    let alift = adx.clone() * adx.clone() + ady.clone() * ady.clone();
    let blift = bdx.clone() * bdx.clone() + bdy.clone() * bdy.clone();
    let clift = cdx.clone() * cdx.clone() + cdy.clone() * cdy.clone();
    let det = alift * (bdx.clone() * cdy.clone() - cdx.clone() * bdy.clone())
        + blift * (cdx.clone() * ady.clone() - adx.clone() * cdy)
        + clift * (adx * bdy - bdx * ady);
    det.cmp0() as i32
}

#[test]
fn test_counter_clockwise_sign() {
    let predicates = Predicates::new();
    let a = Point::new(0.0, 0.0);
    let b = Point::new(1.0, 0.0);
    let c = Point::new(0.0, 1.0);
    assert!(predicates.counter_clockwise(&a, &b, &c, false) > 0.0);
    assert!(predicates.counter_clockwise(&a, &c, &b, false) < 0.0);
    let mid = Point::new(0.5, 0.0);
    assert_eq!(predicates.counter_clockwise(&a, &b, &mid, false), 0.0);
}

#[test]
fn test_in_circle_sign() {
    let predicates = Predicates::new();
    let a = Point::new(0.0, 0.0);
    let b = Point::new(1.0, 0.0);
    let c = Point::new(0.0, 1.0);
    let inside = Point::new(0.4, 0.4);
    let outside = Point::new(2.0, 2.0);
    assert!(predicates.in_circle(&a, &b, &c, &inside, false) > 0.0);
    assert!(predicates.in_circle(&a, &b, &c, &outside, false) < 0.0);
    // cocircular: the fourth corner of the square through a, b, c
    let on = Point::new(1.0, 1.0);
    assert_eq!(predicates.in_circle(&a, &b, &c, &on, false), 0.0);
}

#[test]
fn test_orientation_agrees_with_rational_oracle_near_collinear() {
    let predicates = Predicates::new();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..2000 {
        let a = Point::new(rng.random_range(0.0..1.0), rng.random_range(0.0..1.0));
        let b = Point::new(rng.random_range(0.0..1.0), rng.random_range(0.0..1.0));
        // c is a perturbed point on the line a-b, stressing the adaptive path
        let t: f64 = rng.random_range(-1.0..2.0);
        let mut c = Point::new(a.x + t * (b.x - a.x), a.y + t * (b.y - a.y));
        c.x += f64::EPSILON * rng.random_range(-4.0..4.0_f64).round();
        let got = predicates.counter_clockwise(&a, &b, &c, false);
        let want = orient_sign_exact(&a, &b, &c);
        assert_eq!(
            got.partial_cmp(&0.0).unwrap() as i32,
            want,
            "a=({},{}) b=({},{}) c=({},{})",
            a.x,
            a.y,
            b.x,
            b.y,
            c.x,
            c.y
        );
    }
}

#[test]
fn test_in_circle_agrees_with_rational_oracle_near_cocircular() {
    let predicates = Predicates::new();
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..2000 {
        let r: f64 = rng.random_range(0.5..2.0);
        let mut pts = [Point::new(0.0, 0.0); 4];
        for p in pts.iter_mut() {
            let theta: f64 = rng.random_range(0.0..std::f64::consts::TAU);
            *p = Point::new(r * theta.cos(), r * theta.sin());
            p.x += f64::EPSILON * rng.random_range(-4.0..4.0_f64).round();
        }
        let [a, b, c, d] = pts;
        if orient_sign_exact(&a, &b, &c) <= 0 {
            continue;
        }
        let got = predicates.in_circle(&a, &b, &c, &d, false);
        let want = incircle_sign_exact(&a, &b, &c, &d);
        assert_eq!(got.partial_cmp(&0.0).unwrap() as i32, want);
    }
}

#[test]
fn test_circumcenter_is_equidistant() {
    let predicates = Predicates::new();
    let org = Point::new(0.0, 0.0);
    let dest = Point::new(4.0, 0.0);
    let apex = Point::new(1.0, 3.0);
    let mut xi = 0.0;
    let mut eta = 0.0;
    let cc = predicates.find_circumcenter(&org, &dest, &apex, &mut xi, &mut eta, false);
    let d = |p: &Point| (p.x - cc.x).hypot(p.y - cc.y);
    assert!((d(&org) - d(&dest)).abs() < 1e-12);
    assert!((d(&org) - d(&apex)).abs() < 1e-12);
}

#[test]
fn test_predicate_counters_accumulate() {
    let predicates = Predicates::new();
    let a = Point::new(0.0, 0.0);
    let b = Point::new(1.0, 0.0);
    let c = Point::new(0.0, 1.0);
    for _ in 0..5 {
        predicates.counter_clockwise(&a, &b, &c, false);
    }
    predicates.in_circle(&a, &b, &c, &Point::new(0.4, 0.4), false);
    assert_eq!(predicates.counter_clockwise_count.get(), 5);
    assert_eq!(predicates.in_circle_count.get(), 1);
    predicates.reset_counters();
    assert_eq!(predicates.counter_clockwise_count.get(), 0);
}
