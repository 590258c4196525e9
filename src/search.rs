// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Finds "interesting" views.  Most of the complex plane is either
//! flat interior or flat exterior; the pictures worth rendering sit
//! on the boundary, where escape counts vary a lot over short
//! distances.  The search throws random views at the plane, renders a
//! tiny, shallow preview of each, and keeps the ones whose previews
//! show the most variety.

use crossbeam::thread::ScopedJoinHandle;
use itertools::iproduct;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::panic::resume_unwind;
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::escape::escape_count;
use crate::viewport::{Pixel, PlaneMapper, View};

const HISTOGRAM_BINS: usize = 32;
const TARGET_INSIDE_RATIO: f64 = 0.4;
const EDGE_THRESHOLD: usize = 2;

/// A view and how much the scorer liked it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewScore {
    /// The candidate.
    pub view: View,
    /// Its score, in `[0, 1]`.
    pub score: f64,
}

/// The components of a view's score.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewMetrics {
    /// Fraction of preview pixels that never escaped.
    pub inside_ratio: f64,
    /// Peaks at 1 when 40% of the preview is interior.
    pub escape_score: f64,
    /// Normalized Shannon entropy of the escape-count histogram.
    pub entropy_score: f64,
    /// Fraction of neighbouring pixel pairs with differing counts.
    pub edge_score: f64,
}

impl ViewMetrics {
    /// The weighted total.
    pub fn score(&self) -> f64 {
        0.5 * self.entropy_score + 0.3 * self.edge_score + 0.2 * self.escape_score
    }
}

/// Render escape counts for a `width` by `height` preview of `view`
/// and measure them.
pub fn measure_view(view: &View, width: usize, height: usize, max_iter: usize) -> ViewMetrics {
    let mapper = PlaneMapper::for_view(view, width, height);
    let total = mapper.len();
    if total == 0 {
        return ViewMetrics {
            inside_ratio: 0.0,
            escape_score: 0.0,
            entropy_score: 0.0,
            edge_score: 0.0,
        };
    }

    let iters: Vec<usize> = iproduct!(0..height, 0..width)
        .map(|(py, px)| escape_count(mapper.pixel_to_point(&Pixel(px, py)), max_iter))
        .collect();

    let inside = iters.iter().filter(|&&n| n == max_iter).count();
    let inside_ratio = (inside as f64) / (total as f64);
    let escape_score =
        (1.0 - (inside_ratio - TARGET_INSIDE_RATIO).abs() / TARGET_INSIDE_RATIO).max(0.0);

    let mut hist = [0_usize; HISTOGRAM_BINS];
    for &n in &iters {
        hist[(n * HISTOGRAM_BINS / max_iter.max(1)).min(HISTOGRAM_BINS - 1)] += 1;
    }
    let entropy: f64 = hist
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = (count as f64) / (total as f64);
            -p * p.ln()
        })
        .sum();
    let entropy_score = entropy / (HISTOGRAM_BINS as f64).ln();

    let differs = |a: usize, b: usize| {
        let (a, b) = (iters[a], iters[b]);
        (if a > b { a - b } else { b - a }) > EDGE_THRESHOLD
    };
    let edges = iproduct!(0..height, 0..width)
        .map(|(py, px)| {
            let idx = py * width + px;
            let right = px + 1 < width && differs(idx, idx + 1);
            let down = py + 1 < height && differs(idx, idx + width);
            (right as usize) + (down as usize)
        })
        .sum::<usize>();
    let edge_score = (edges as f64) / ((2 * total) as f64);

    ViewMetrics {
        inside_ratio,
        escape_score,
        entropy_score,
        edge_score,
    }
}

/// Score a view from a low-resolution, low-iteration preview.  Pure;
/// safe to call from any number of threads.
pub fn score_view(view: &View, width: usize, height: usize, max_iter: usize) -> f64 {
    measure_view(view, width, height, max_iter).score()
}

/// Draw a random candidate.  The scale is drawn as the square of a
/// uniform variable, which leans the search toward deep zooms.
pub fn random_view<R: Rng + ?Sized>(rng: &mut R, config: &SearchConfig) -> View {
    let cx = Uniform::new(config.re_range.0, config.re_range.1).sample(rng);
    let cy = Uniform::new(config.im_range.0, config.im_range.1).sample(rng);
    let r: f64 = rng.gen();
    let scale = config.min_scale + r * r * (config.max_scale - config.min_scale);
    View { cx, cy, scale }
}

/// Insert `candidate` into a list kept sorted best-first, then drop
/// whatever falls past `max` entries.  Equal scores keep arrival order.
pub fn insert_best(list: &mut Vec<ViewScore>, candidate: ViewScore, max: usize) {
    list.push(candidate);
    let mut i = list.len() - 1;
    while i > 0 && list[i].score > list[i - 1].score {
        list.swap(i, i - 1);
        i -= 1;
    }
    list.truncate(max);
}

/// A random search for good views.  Seed it for repeatable results.
pub struct ViewSearch {
    config: SearchConfig,
    rng: StdRng,
}

impl ViewSearch {
    /// A search seeded from the operating system.
    pub fn new(config: SearchConfig) -> Self {
        ViewSearch {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// A search with a fixed seed.
    pub fn with_seed(config: SearchConfig, seed: u64) -> Self {
        ViewSearch {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    // Candidates are independent, so they are split into contiguous
    // chunks, one per worker, and the scores reassembled in draw order.
    fn score_all(&self, candidates: &[View]) -> Vec<f64> {
        let (width, height, max_iter) = (
            self.config.preview_width,
            self.config.preview_height,
            self.config.max_iterations,
        );
        let threads = self.config.threads.max(1);
        let chunk = ((candidates.len() + threads - 1) / threads).max(1);

        crossbeam::scope(|spawner| {
            let handles: Vec<ScopedJoinHandle<Vec<f64>>> = candidates
                .chunks(chunk)
                .map(|views| {
                    spawner.spawn(move |_| {
                        views
                            .iter()
                            .map(|view| score_view(view, width, height, max_iter))
                            .collect()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap_or_else(|panic| resume_unwind(panic)))
                .collect()
        })
        .unwrap_or_else(|panic| resume_unwind(panic))
    }

    /// Draw and score `config.candidates` random views and return the
    /// best `n`, best first.
    pub fn run(&mut self, n: usize) -> Vec<ViewScore> {
        let config = self.config;
        let candidates: Vec<View> = (0..config.candidates)
            .map(|_| random_view(&mut self.rng, &config))
            .collect();
        debug!(
            candidates = candidates.len(),
            threads = config.threads,
            "scoring candidate views"
        );

        let scores = self.score_all(&candidates);
        let mut best = Vec::with_capacity(n + 1);
        for (view, score) in candidates.into_iter().zip(scores) {
            insert_best(&mut best, ViewScore { view, score }, n);
        }

        if let Some(top) = best.first() {
            info!(
                cx = top.view.cx,
                cy = top.view.cy,
                scale = top.view.scale,
                score = top.score,
                "best view"
            );
        }
        best
    }
}

/// Search with the default configuration and a fresh random seed.
pub fn generate_views(n: usize) -> Vec<ViewScore> {
    ViewSearch::new(SearchConfig::default()).run(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> SearchConfig {
        SearchConfig::default().candidates(60)
    }

    #[test]
    fn interior_views_score_low() {
        let view = View {
            cx: -0.5,
            cy: 0.0,
            scale: 0.001,
        };
        let metrics = measure_view(&view, 96, 54, 200);
        assert!((metrics.inside_ratio - 1.0).abs() < 1e-12);
        assert_eq!(metrics.escape_score, 0.0);
        assert_eq!(metrics.entropy_score, 0.0);
        assert_eq!(metrics.edge_score, 0.0);
        assert!(score_view(&view, 96, 54, 200) < 0.05);
    }

    #[test]
    fn boundary_views_beat_interior_views() {
        let boundary = View {
            cx: -0.745,
            cy: 0.11,
            scale: 0.05,
        };
        let interior = View {
            cx: -0.5,
            cy: 0.0,
            scale: 0.001,
        };
        let b = score_view(&boundary, 96, 54, 200);
        assert!(b > score_view(&interior, 96, 54, 200));
        assert!(b > 0.0 && b <= 1.0);
    }

    #[test]
    fn insert_best_stays_sorted_and_bounded() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut best = Vec::new();
        for _ in 0..200 {
            let score = rng.gen::<f64>();
            insert_best(&mut best, ViewScore { view: View::default(), score }, 5);
            assert!(best.len() <= 5);
            assert!(best.windows(2).all(|w| w[0].score >= w[1].score));
        }
        assert_eq!(best.len(), 5);
    }

    #[test]
    fn insert_best_keeps_arrival_order_on_ties() {
        let first = View { cx: 1.0, ..View::default() };
        let second = View { cx: 2.0, ..View::default() };
        let mut best = Vec::new();
        insert_best(&mut best, ViewScore { view: first, score: 0.5 }, 2);
        insert_best(&mut best, ViewScore { view: second, score: 0.5 }, 2);
        assert_eq!(best[0].view, first);
        assert_eq!(best[1].view, second);
    }

    #[test]
    fn random_views_stay_in_range() {
        let config = SearchConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1000 {
            let v = random_view(&mut rng, &config);
            assert!(v.cx >= -2.5 && v.cx < 1.0);
            assert!(v.cy >= -1.5 && v.cy < 1.5);
            assert!(v.scale >= config.min_scale && v.scale <= config.max_scale);
        }
    }

    #[test]
    fn seeded_search_ignores_worker_count() {
        let one = ViewSearch::with_seed(quick().threads(1), 42).run(3);
        let many = ViewSearch::with_seed(quick().threads(6), 42).run(3);
        assert_eq!(one, many);
        assert_eq!(one.len(), 3);
        assert!(one.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn search_returns_at_most_n() {
        let views = ViewSearch::with_seed(quick(), 1).run(1);
        assert_eq!(views.len(), 1);
        let views = ViewSearch::with_seed(quick().candidates(2), 1).run(10);
        assert_eq!(views.len(), 2);
    }
}
