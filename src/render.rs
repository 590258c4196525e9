// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The render orchestrator.  A render is two passes over the image,
//! each split across a pool of scoped threads: first every pixel is
//! sampled, then, once all workers have joined, every pixel is
//! colored.  The barrier between them matters because histogram
//! coloring needs the finished sample buffer.
//!
//! Rows are dealt out round-robin: worker `w` of `n` takes rows `w`,
//! `w + n`, `w + 2n` and so on.  Rows through the set's interior cost
//! far more than rows outside it, and interleaving spreads them out.
//! Each worker holds its own rows as disjoint mutable slices, so the
//! hot loops need no locks.

use image::{Rgba, RgbaImage};
use num::Complex;
use std::time::Instant;
use tracing::{debug, trace};

use crate::colorize::{ColorMode, Colorizer};
use crate::config::RenderConfig;
use crate::escape::{sample_point, Sample};
use crate::gradient::Gradient;
use crate::palette::{hsv_wheel, HSV_PALETTE_SIZE};
use crate::viewport::{PlaneMapper, View};

type Lane<'a, T> = Vec<(usize, &'a mut [T])>;

/// Cut `buffer` into rows of `row_len` and deal them to `lanes` workers.
fn interleave<T>(buffer: &mut [T], row_len: usize, lanes: usize) -> Vec<Lane<'_, T>> {
    let mut dealt: Vec<Lane<'_, T>> = (0..lanes).map(|_| Vec::new()).collect();
    for (row, slice) in buffer.chunks_mut(row_len).enumerate() {
        dealt[row % lanes].push((row, slice));
    }
    dealt
}

/// Run `work` over every row of every lane, one scoped thread per
/// lane, and return once all of them have finished.  A panic in a
/// worker is re-raised here.
fn run_lanes<T, F>(lanes: Vec<Lane<'_, T>>, work: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    let work = &work;
    let joined = crossbeam::scope(|spawner| {
        for (worker, lane) in lanes.into_iter().enumerate() {
            spawner.spawn(move |_| {
                trace!(worker, rows = lane.len(), "worker started");
                for (row, slice) in lane {
                    work(row, slice);
                }
            });
        }
    });
    if let Err(panic) = joined {
        std::panic::resume_unwind(panic);
    }
}

/// Renders views into RGBA images.  Holds its configuration and the
/// HSV wheel, both of which are reused across renders.
#[derive(Debug)]
pub struct Renderer {
    config: RenderConfig,
    hsv_palette: Vec<Rgba<u8>>,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new(RenderConfig::default())
    }
}

impl Renderer {
    /// A renderer with the given configuration.
    pub fn new(config: RenderConfig) -> Self {
        Renderer {
            config,
            hsv_palette: hsv_wheel(HSV_PALETTE_SIZE),
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn lanes(&self, height: usize) -> usize {
        self.config.threads.min(height).max(1)
    }

    /// The sampling pass on its own: one Sample per pixel, row-major,
    /// top to bottom.
    pub fn sample(&self, width: usize, height: usize, view: &View) -> Vec<Sample> {
        let mapper = PlaneMapper::for_view(view, width, height);
        let mut samples = vec![Sample::default(); mapper.len()];
        if mapper.is_empty() {
            return samples;
        }

        let max_iter = self.config.max_iterations;
        let mapper = &mapper;
        run_lanes(
            interleave(&mut samples, width, self.lanes(height)),
            |py, row| {
                let y0 = mapper.row_to_im(py);
                for (px, sample) in row.iter_mut().enumerate() {
                    *sample = sample_point(Complex::new(mapper.column_to_re(px), y0), max_iter);
                }
            },
        );
        samples
    }

    /// Render `view` into a `width` by `height` image.  Without a
    /// gradient, the first built-in one is used.
    pub fn render(
        &self,
        width: usize,
        height: usize,
        view: &View,
        mode: ColorMode,
        gradient: Option<&Gradient>,
    ) -> RgbaImage {
        self.render_with(width, height, view, Some(mode), gradient)
    }

    /// As `render`, for callers holding an unchecked mode index.
    /// Indices outside the known modes produce a black image.
    pub fn render_mode_index(
        &self,
        width: usize,
        height: usize,
        view: &View,
        mode: i64,
        gradient: Option<&Gradient>,
    ) -> RgbaImage {
        self.render_with(width, height, view, ColorMode::from_index(mode), gradient)
    }

    fn render_with(
        &self,
        width: usize,
        height: usize,
        view: &View,
        mode: Option<ColorMode>,
        gradient: Option<&Gradient>,
    ) -> RgbaImage {
        let mut image = RgbaImage::new(width as u32, height as u32);
        if width == 0 || height == 0 {
            return image;
        }

        let started = Instant::now();
        let lanes = self.lanes(height);
        debug!(width, height, lanes, mode = ?mode, ?view, "render started");

        let samples = self.sample(width, height, view);

        let fallback;
        let gradient = match gradient {
            Some(gradient) => gradient,
            None => {
                fallback = Gradient::default();
                &fallback
            }
        };
        let colorizer = Colorizer::new(
            mode,
            &samples,
            self.config.max_iterations,
            &self.hsv_palette,
            gradient,
        );
        let colorizer = &colorizer;

        let pixels: &mut [u8] = &mut image;
        run_lanes(interleave(pixels, width * 4, lanes), |py, row| {
            let offset = py * width;
            for (px, pixel) in row.chunks_exact_mut(4).enumerate() {
                pixel.copy_from_slice(&colorizer.color(offset + px).0);
            }
        });

        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "render finished"
        );
        image
    }
}

/// Render with the default configuration.
pub fn generate(
    width: usize,
    height: usize,
    view: &View,
    mode: ColorMode,
    gradient: Option<&Gradient>,
) -> RgbaImage {
    Renderer::default().render(width, height, view, mode, gradient)
}
