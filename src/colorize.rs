// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns samples into colors.  There are five strategies; four of them
//! look at one sample at a time, but histogram equalization needs the
//! distribution of escape counts across the whole image, so a
//! Colorizer is built only after sampling has finished.

use image::Rgba;
use num::clamp;
use std::fmt;
use std::str::FromStr;

use crate::escape::Sample;
use crate::gradient::{lerp_color, Gradient};

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

const LONG_GRADIENT_RATE: f64 = 0.02;
const PERIOD: f64 = 40.0;
const ANGLE_WEIGHT: f64 = 0.6;
const ESCAPE_WEIGHT: f64 = 0.4;
const ANGLE_ESCAPE_RATE: f64 = 0.03;

/// The color strategies, in their fixed external order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// Cycle the HSV wheel by smoothed escape count.
    SmoothHsv = 0,
    /// Walk slowly along the gradient.
    LongGradient = 1,
    /// Repeat the gradient every 40 iterations.
    Periodic = 2,
    /// Mix escape angle with escape count.
    Angle = 3,
    /// Histogram-equalized escape count.
    Histogram = 4,
}

impl ColorMode {
    /// Every mode, in index order.
    pub const ALL: [ColorMode; 5] = [
        ColorMode::SmoothHsv,
        ColorMode::LongGradient,
        ColorMode::Periodic,
        ColorMode::Angle,
        ColorMode::Histogram,
    ];

    /// The mode with this external index, if there is one.
    pub fn from_index(index: i64) -> Option<ColorMode> {
        if index < 0 {
            return None;
        }
        ColorMode::ALL.get(index as usize).cloned()
    }

    /// For request layers: anything out of range becomes `Histogram`.
    pub fn from_index_or_default(index: i64) -> ColorMode {
        ColorMode::from_index(index).unwrap_or_default()
    }

    /// Short name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            ColorMode::SmoothHsv => "smooth-hsv",
            ColorMode::LongGradient => "long-gradient",
            ColorMode::Periodic => "periodic",
            ColorMode::Angle => "angle",
            ColorMode::Histogram => "histogram",
        }
    }
}

impl Default for ColorMode {
    fn default() -> Self {
        ColorMode::Histogram
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorMode {
    type Err = String;

    /// Accepts either the index or the short name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(index) = i64::from_str(s) {
            return ColorMode::from_index(index)
                .ok_or_else(|| format!("color mode must be between 0 and 4, got {}", index));
        }
        ColorMode::ALL
            .iter()
            .find(|mode| mode.name() == s)
            .cloned()
            .ok_or_else(|| format!("unknown color mode '{}'", s))
    }
}

/// Cumulative distribution of escape counts over the escaped samples,
/// one bucket per iteration count from 0 to `max_iter`.  All zeros
/// when nothing escaped.
pub fn histogram_cdf(samples: &[Sample], max_iter: usize) -> Vec<f64> {
    let mut hist = vec![0_usize; max_iter + 1];
    let mut total_escaped = 0_usize;
    for sample in samples.iter().filter(|s| s.escaped(max_iter)) {
        hist[sample.iter] += 1;
        total_escaped += 1;
    }

    let mut running = 0_usize;
    hist.iter()
        .map(|&count| {
            running += count;
            if total_escaped > 0 {
                (running as f64) / (total_escaped as f64)
            } else {
                0.0
            }
        })
        .collect()
}

enum Strategy {
    SmoothHsv,
    LongGradient,
    Periodic,
    Angle,
    Histogram(Vec<f64>),
    Black,
}

/// Colors the samples of one render pass.  Borrows the sample buffer;
/// read-only, so it can be shared across workers.
pub struct Colorizer<'a> {
    strategy: Strategy,
    samples: &'a [Sample],
    max_iter: usize,
    hsv_palette: &'a [Rgba<u8>],
    gradient: &'a Gradient,
}

impl<'a> Colorizer<'a> {
    /// Build the colorizer for a finished sample buffer.  A mode of
    /// `None` stands for a mode the caller did not recognize and
    /// paints everything black.  Histogram mode makes its pass over
    /// the samples here.
    pub fn new(
        mode: Option<ColorMode>,
        samples: &'a [Sample],
        max_iter: usize,
        hsv_palette: &'a [Rgba<u8>],
        gradient: &'a Gradient,
    ) -> Self {
        let strategy = match mode {
            Some(ColorMode::SmoothHsv) if !hsv_palette.is_empty() => Strategy::SmoothHsv,
            Some(ColorMode::SmoothHsv) => Strategy::Black,
            Some(ColorMode::LongGradient) => Strategy::LongGradient,
            Some(ColorMode::Periodic) => Strategy::Periodic,
            Some(ColorMode::Angle) => Strategy::Angle,
            Some(ColorMode::Histogram) => Strategy::Histogram(histogram_cdf(samples, max_iter)),
            None => Strategy::Black,
        };
        Colorizer {
            strategy,
            samples,
            max_iter,
            hsv_palette,
            gradient,
        }
    }

    /// The color of the sample at `index`.
    pub fn color(&self, index: usize) -> Rgba<u8> {
        let s = &self.samples[index];
        if s.iter >= self.max_iter || s.smooth < 0.0 {
            return BLACK;
        }

        match self.strategy {
            Strategy::SmoothHsv => {
                let base = s.smooth.floor();
                let idx = base as usize;
                let len = self.hsv_palette.len();
                lerp_color(
                    self.hsv_palette[idx % len],
                    self.hsv_palette[(idx + 1) % len],
                    s.smooth - base,
                )
            }
            Strategy::LongGradient => self
                .gradient
                .evaluate((s.smooth * LONG_GRADIENT_RATE) % 1.0),
            Strategy::Periodic => self.gradient.evaluate((s.smooth % PERIOD) / PERIOD),
            Strategy::Angle => {
                let escape_t = (s.smooth * ANGLE_ESCAPE_RATE) % 1.0;
                self.gradient
                    .evaluate(ANGLE_WEIGHT * s.angle + ESCAPE_WEIGHT * escape_t)
            }
            Strategy::Histogram(ref cdf) => {
                let base = s.smooth.floor();
                let frac = s.smooth - base;
                let k = (base.max(0.0) as usize).min(self.max_iter - 1);
                let t = cdf[k] + frac * (cdf[k + 1] - cdf[k]);
                self.gradient.evaluate(clamp(t, 0.0, 1.0))
            }
            Strategy::Black => BLACK,
        }
    }
}
