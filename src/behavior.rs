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

//! Triangulation options and the derived constants the refinement loop keeps
//! consulting.

use std::f64::consts::PI;

use crate::geometry::otri::Triangle;

/// User-supplied triangle test: given a triangle and its signed area, return
/// `true` if it should be split further.
pub type TriangleTest = fn(&Triangle, f64) -> bool;

/// Whether boundary segments may receive Steiner points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundarySplitMode {
    #[default]
    Split,
    SplitInternalOnly,
    NoSplit,
}

/// Triangulation behavior. Angle and area constraints go through setters so
/// the derived quantities (`good_angle`, `off_constant`, ...) stay in sync
/// and out-of-range values are coerced back to "no constraint".
#[derive(Debug, Clone)]
pub struct Behavior {
    /// Skip the exact-arithmetic fallback of the predicates.
    pub disable_exact_math: bool,
    pub planar_straight_line_graph: bool,
    quality: bool,
    pub var_area: bool,
    pub convex: bool,
    pub conforming_delaunay: bool,
    pub boundary_split_mode: BoundarySplitMode,
    min_angle: f64,
    max_angle: f64,
    max_area: f64,
    pub usertest: Option<TriangleTest>,
    pub fixed_area: bool,
    pub use_segments: bool,
    pub good_angle: f64,
    pub max_good_angle: f64,
    pub off_constant: f64,
    warnings: Vec<String>,
}

impl Default for Behavior {
    fn default() -> Self {
        Behavior::new(false, 20.0)
    }
}

impl Behavior {
    pub fn new(quality: bool, min_angle: f64) -> Self {
        let mut b = Behavior {
            disable_exact_math: false,
            planar_straight_line_graph: false,
            quality: false,
            var_area: false,
            convex: false,
            conforming_delaunay: false,
            boundary_split_mode: BoundarySplitMode::Split,
            min_angle: 0.0,
            max_angle: 0.0,
            max_area: -1.0,
            usertest: None,
            fixed_area: false,
            use_segments: true,
            good_angle: 0.0,
            max_good_angle: 0.0,
            off_constant: 0.0,
            warnings: Vec::new(),
        };
        if quality {
            b.set_min_angle(min_angle);
        }
        b
    }

    pub fn quality(&self) -> bool {
        self.quality
    }

    pub fn set_quality(&mut self, value: bool) {
        self.quality = value;
        if self.quality {
            self.update();
        }
    }

    pub fn min_angle(&self) -> f64 {
        self.min_angle
    }

    pub fn set_min_angle(&mut self, value: f64) {
        self.min_angle = value;
        self.update();
    }

    pub fn max_angle(&self) -> f64 {
        self.max_angle
    }

    pub fn set_max_angle(&mut self, value: f64) {
        self.max_angle = value;
        self.update();
    }

    pub fn max_area(&self) -> f64 {
        self.max_area
    }

    pub fn set_max_area(&mut self, value: f64) {
        self.max_area = value;
        self.fixed_area = value > 0.0;
    }

    /// Warnings emitted while coercing invalid constraints.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    fn update(&mut self) {
        self.quality = true;
        if self.min_angle < 0.0 || self.min_angle > 60.0 {
            self.min_angle = 0.0;
            self.quality = false;
            self.warnings
                .push("Invalid quality option (minimum angle).".to_string());
        }
        if self.max_angle != 0.0 && (self.max_angle < 60.0 || self.max_angle > 180.0) {
            self.max_angle = 0.0;
            self.quality = false;
            self.warnings
                .push("Invalid quality option (maximum angle).".to_string());
        }
        self.use_segments = self.planar_straight_line_graph || self.quality || self.convex;
        self.good_angle = (self.min_angle * PI / 180.0).cos();
        self.max_good_angle = (self.max_angle * PI / 180.0).cos();
        if self.good_angle == 1.0 {
            self.off_constant = 0.0;
        } else {
            self.off_constant =
                0.475 * ((1.0 + self.good_angle) / (1.0 - self.good_angle)).sqrt();
        }
        self.good_angle *= self.good_angle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_defaults_derive_the_split_constants() {
        let b = Behavior::new(true, 20.0);
        assert!(b.quality());
        let good = (20.0f64 * PI / 180.0).cos();
        assert_eq!(b.good_angle, good * good);
        assert!(b.off_constant > 0.0);
        assert!(b.use_segments);
    }

    #[test]
    fn out_of_range_min_angle_disables_quality() {
        let mut b = Behavior::default();
        b.set_min_angle(75.0);
        assert!(!b.quality());
        assert_eq!(b.min_angle(), 0.0);
        assert_eq!(b.warnings().len(), 1);
    }

    #[test]
    fn out_of_range_max_angle_disables_quality() {
        let mut b = Behavior::new(true, 20.0);
        b.set_max_angle(30.0);
        assert!(!b.quality());
        assert_eq!(b.max_angle(), 0.0);
    }

    #[test]
    fn zero_min_angle_means_no_off_center() {
        let mut b = Behavior::default();
        b.set_min_angle(0.0);
        assert_eq!(b.off_constant, 0.0);
        assert_eq!(b.good_angle, 1.0);
    }

    #[test]
    fn max_area_toggles_fixed_area() {
        let mut b = Behavior::default();
        b.set_max_area(0.25);
        assert!(b.fixed_area);
        b.set_max_area(-1.0);
        assert!(!b.fixed_area);
    }
}
