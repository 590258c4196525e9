// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Knobs for the renderer and the viewport search.  Once handed to a
//! `Renderer` or `ViewSearch`, a config is not mutated.

use crate::escape::{PREVIEW_MAX_ITERATIONS, RENDER_MAX_ITERATIONS};

/// Parameters for a full render pass.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Iteration cap per pixel.
    pub max_iterations: usize,
    /// Size of the worker pool for each of the two passes.
    pub threads: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            max_iterations: RENDER_MAX_ITERATIONS,
            threads: num_cpus::get(),
        }
    }
}

impl RenderConfig {
    /// Override the iteration cap.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    /// Override the worker count.  Zero is treated as one.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }
}

/// Parameters for the random viewport search.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// How many random views to draw and score per search.
    pub candidates: usize,
    /// Preview resolution used when scoring.
    pub preview_width: usize,
    /// Preview resolution used when scoring.
    pub preview_height: usize,
    /// Iteration cap for the preview.
    pub max_iterations: usize,
    /// Range the center's real part is drawn from.
    pub re_range: (f64, f64),
    /// Range the center's imaginary part is drawn from.
    pub im_range: (f64, f64),
    /// Smallest scale a candidate may have.
    pub min_scale: f64,
    /// Largest scale a candidate may have.
    pub max_scale: f64,
    /// Scoring workers.
    pub threads: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            candidates: 2000,
            preview_width: 96,
            preview_height: 54,
            max_iterations: PREVIEW_MAX_ITERATIONS,
            re_range: (-2.5, 1.0),
            im_range: (-1.5, 1.5),
            min_scale: 0.000_000_5,
            max_scale: 3.5,
            threads: num_cpus::get(),
        }
    }
}

impl SearchConfig {
    /// Override the number of candidates scored per search.
    pub fn candidates(mut self, candidates: usize) -> Self {
        self.candidates = candidates;
        self
    }

    /// Override the worker count.  Zero is treated as one.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_constants() {
        let render = RenderConfig::default();
        assert_eq!(render.max_iterations, 1000);
        assert!(render.threads >= 1);

        let search = SearchConfig::default();
        assert_eq!(search.candidates, 2000);
        assert_eq!((search.preview_width, search.preview_height), (96, 54));
        assert_eq!(search.max_iterations, 200);
    }

    #[test]
    fn zero_threads_means_one() {
        assert_eq!(RenderConfig::default().threads(0).threads, 1);
        assert_eq!(SearchConfig::default().threads(0).threads, 1);
    }
}
