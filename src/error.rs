// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The crate's error type.  Rendering and scoring are total, so the
//! only failures are at the edges: rejecting bad input before it
//! reaches the core, and writing images out.

use thiserror::Error;

/// Everything that can go wrong outside the hot loops.
#[derive(Debug, Error)]
pub enum Error {
    /// A view must cover a positive, finite width of the complex plane.
    #[error("view scale must be positive and finite, got {0}")]
    InvalidScale(f64),

    /// Gradient stops must be sorted ascending by position.
    #[error("gradient stop {index} at t={t} comes before the stop preceding it")]
    UnsortedStops {
        /// Position of the offending stop in the list.
        index: usize,
        /// Its `t` value.
        t: f64,
    },

    /// A gradient stop with a NaN or infinite position.
    #[error("gradient stop {index} has a non-finite position")]
    NonFiniteStop {
        /// Position of the offending stop in the list.
        index: usize,
    },

    /// No gradient at this registry index.
    #[error("no palette at index {0}")]
    PaletteNotFound(usize),

    /// Encoding or writing an image failed.
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
