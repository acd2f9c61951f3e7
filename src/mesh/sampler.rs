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

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::geometry::otri::TriRef;
use crate::mesh::pool::TrianglePool;

const RANDOM_SEED: u64 = 110503;
const SAMPLE_FACTOR: usize = 11;

/// Draws O(n^(1/3)) random live triangles as candidate starting points for
/// point location, which bounds the expected walk length of the subsequent
/// jump-and-walk independent of insertion history.
#[derive(Debug)]
pub struct TriangleSampler {
    rng: StdRng,
    samples: usize,
    triangle_count: usize,
    scratch: Vec<TriRef>,
}

impl Default for TriangleSampler {
    fn default() -> Self {
        TriangleSampler::new()
    }
}

impl TriangleSampler {
    pub fn new() -> Self {
        TriangleSampler {
            rng: StdRng::seed_from_u64(RANDOM_SEED),
            samples: 1,
            triangle_count: 0,
            scratch: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.samples = 1;
        self.triangle_count = 0;
    }

    pub fn update(&mut self, pool: &TrianglePool) {
        let count = pool.len();
        if self.triangle_count != count {
            self.triangle_count = count;
            while SAMPLE_FACTOR * self.samples * self.samples * self.samples < count {
                self.samples += 1;
            }
        }
    }

    pub fn sample<'a>(&'a mut self, pool: &TrianglePool) -> &'a [TriRef] {
        pool.sample(self.samples, &mut self.rng, &mut self.scratch);
        &self.scratch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_size_grows_with_the_cube_root() {
        let mut pool = TrianglePool::new();
        let mut sampler = TriangleSampler::new();
        for _ in 0..100 {
            pool.get();
        }
        sampler.update(&pool);
        // smallest s with 11 s^3 >= 100
        assert_eq!(sampler.samples, 3);
        for _ in 0..10_900 {
            pool.get();
        }
        sampler.update(&pool);
        assert_eq!(sampler.samples, 10);
    }

    #[test]
    fn sampling_is_deterministic_per_seed() {
        let mut pool = TrianglePool::new();
        for _ in 0..50 {
            pool.get();
        }
        let mut a = TriangleSampler::new();
        let mut b = TriangleSampler::new();
        a.update(&pool);
        b.update(&pool);
        assert_eq!(a.sample(&pool), b.sample(&pool));
    }
}
