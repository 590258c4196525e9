// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time sampler.  Takes a point `c` on the complex plane and
//! repeatedly squares-and-adds, `z = z * z + c`, counting how many
//! steps it takes for `z` to leave the circle of radius 2.  Points
//! that never leave within the iteration cap are treated as members
//! of the Mandelbrot set.

use num::Complex;
use std::f64::consts::{LN_2, PI};

/// Squared escape radius.
pub const ESCAPE_RADIUS_SQR: f64 = 4.0;

/// Iteration cap for full renders.
pub const RENDER_MAX_ITERATIONS: usize = 1000;

/// Iteration cap for the scorer's low-resolution preview.
pub const PREVIEW_MAX_ITERATIONS: usize = 200;

/// What the sampler learned about one pixel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    /// Iterations performed, at most the cap.
    pub iter: usize,
    /// Continuous escape count, or `-1.0` if the point never escaped.
    pub smooth: f64,
    /// Angle of `z` at escape, normalized to `[0, 1]`.
    pub angle: f64,
}

impl Default for Sample {
    fn default() -> Self {
        Sample {
            iter: 0,
            smooth: -1.0,
            angle: 0.0,
        }
    }
}

impl Sample {
    /// True when the point left the escape radius before the cap.
    #[inline]
    pub fn escaped(&self, max_iter: usize) -> bool {
        self.iter < max_iter && self.smooth >= 0.0
    }
}

const D4: f64 = 1.0 / 4.0;
const D16: f64 = D4 / 4.0;

/// False if the point is certainly inside the main cardioid or the
/// period-2 bulb, the two largest bodies of the set.  True does *not*
/// mean the point escapes, only that it has to be iterated to find
/// out.
#[inline]
pub fn maybe_outside(c: Complex<f64>) -> bool {
    let y = c.im * c.im;
    let q = y + (c.re - D4) * (c.re - D4);
    q * (q + c.re - D4) > (y * D4) && (c.re + 1.0) * (c.re + 1.0) + y > D16
}

#[inline]
fn iterate(c: Complex<f64>, max_iter: usize) -> (usize, Complex<f64>) {
    let mut z = Complex::new(0.0_f64, 0.0_f64);
    if !maybe_outside(c) {
        return (max_iter, z);
    }
    let mut n = 0;
    while z.norm_sqr() <= ESCAPE_RADIUS_SQR && n < max_iter {
        z = z * z + c;
        n += 1;
    }
    (n, z)
}

/// Sample a single point, producing the smoothed escape value and
/// escape angle alongside the raw count.
pub fn sample_point(c: Complex<f64>, max_iter: usize) -> Sample {
    let (n, z) = iterate(c, max_iter);
    if n >= max_iter {
        return Sample {
            iter: n,
            smooth: -1.0,
            angle: 0.0,
        };
    }

    let log_zn = z.norm_sqr().ln() / 2.0;
    let nu = (log_zn / LN_2).ln() / LN_2;
    Sample {
        iter: n,
        smooth: (n as f64) + 1.0 - nu,
        angle: (z.im.atan2(z.re) + PI) / (2.0 * PI),
    }
}

/// The bare iteration count.  The scorer only needs this.
pub fn escape_count(c: Complex<f64>, max_iter: usize) -> usize {
    iterate(c, max_iter).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardioid_center_never_escapes() {
        let s = sample_point(Complex::new(-0.5, 0.0), 50);
        assert_eq!(s.iter, 50);
        assert_eq!(s.smooth, -1.0);
        assert_eq!(s.angle, 0.0);
        assert!(!s.escaped(50));
    }

    #[test]
    fn far_points_escape_in_one_step() {
        let s = sample_point(Complex::new(2.0, 2.0), 50);
        assert_eq!(s.iter, 1);
        assert!(s.escaped(50));
        assert!(s.smooth > 1.0 && s.smooth < 2.0);
        // atan2(2, 2) is pi/4, so (pi/4 + pi) / 2pi.
        assert!((s.angle - 0.625).abs() < 1e-12);
    }

    #[test]
    fn smooth_stays_below_the_next_integer() {
        for &(re, im) in &[(0.3, 0.5), (-0.75, 0.1), (0.26, 0.0), (-2.0, 0.5)] {
            let s = sample_point(Complex::new(re, im), 1000);
            if s.escaped(1000) {
                assert!(s.smooth < (s.iter + 1) as f64);
                assert!(s.angle >= 0.0 && s.angle <= 1.0);
            }
        }
    }

    #[test]
    fn escape_count_agrees_with_sample_point() {
        for &(re, im) in &[(0.3, 0.5), (-0.5, 0.0), (0.26, 0.0), (1.0, 1.0)] {
            let c = Complex::new(re, im);
            assert_eq!(escape_count(c, 200), sample_point(c, 200).iter);
        }
    }

    #[test]
    fn main_bodies_are_recognised() {
        assert!(!maybe_outside(Complex::new(-0.5, 0.0)));
        assert!(!maybe_outside(Complex::new(0.2, 0.1)));
        assert!(!maybe_outside(Complex::new(-1.0, 0.0)));
        assert!(!maybe_outside(Complex::new(-1.2, 0.1)));
        assert!(maybe_outside(Complex::new(0.3, 0.0)));
        assert!(maybe_outside(Complex::new(-0.75, 0.2)));
        assert!(maybe_outside(Complex::new(2.0, 2.0)));
    }

    #[test]
    fn shortcut_agrees_with_iterating() {
        for i in 0..40 {
            for j in 0..40 {
                let c = Complex::new(-2.0 + (i as f64) * 0.0625, -1.2 + (j as f64) * 0.06);
                if !maybe_outside(c) {
                    let mut z = Complex::new(0.0, 0.0);
                    for _ in 0..100 {
                        z = z * z + c;
                    }
                    assert!(z.norm_sqr() <= ESCAPE_RADIUS_SQR, "{} escaped", c);
                }
            }
        }
    }

    #[test]
    fn every_point_takes_at_least_one_step() {
        // |0|^2 <= 4 always, so even the farthest point takes one step.
        assert_eq!(escape_count(Complex::new(100.0, 0.0), 10), 1);
        assert_eq!(escape_count(Complex::new(0.0, 0.0), 0), 0);
    }
}
