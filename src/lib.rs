#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer and view finder
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring-and-adding, `z = z * z + c` starting
//! from zero, never runs off to infinity.  Points outside the set do
//! run off, and how quickly they do so (the escape "velocity") is
//! what gets turned into color.
//!
//! Rendering happens in two passes.  The first samples every pixel,
//! recording its escape count, a smoothed (continuous) escape count
//! that hides the banding between integer counts, and the angle at
//! which it escaped.  The second pass colors the samples using one of
//! five strategies; one of them, histogram equalization, spreads the
//! gradient over the image according to how common each escape count
//! is, so it cannot begin until the first pass is complete.
//!
//! Most of the plane is dull.  The `search` module finds views worth
//! rendering by scoring small previews of random views on how varied
//! and detailed they are.

extern crate crossbeam;
extern crate image;
extern crate itertools;
extern crate num;
extern crate num_cpus;
extern crate rand;

pub mod colorize;
pub mod config;
pub mod error;
pub mod escape;
pub mod gradient;
pub mod palette;
pub mod registry;
pub mod render;
pub mod search;
pub mod viewport;

pub use colorize::{ColorMode, Colorizer};
pub use config::{RenderConfig, SearchConfig};
pub use error::{Error, Result};
pub use escape::Sample;
pub use gradient::{Gradient, GradientDef, Stop};
pub use registry::GradientRegistry;
pub use render::{generate, Renderer};
pub use search::{generate_views, score_view, ViewScore, ViewSearch};
pub use viewport::{Bounds, View};
