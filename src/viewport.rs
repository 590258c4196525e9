// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the View, which names a region of the complex plane by
//! its center and its width, and the PlaneMapper, which relates a
//! rectangle on the integral plane (the image, origin at 0,0) to the
//! rectangle of the complex plane a View covers at a given aspect
//! ratio.
use num::Complex;

use crate::error::{Error, Result};

/// Linear remap of `value` from `[old_lo, old_hi]` onto `[new_lo, new_hi]`.
#[inline]
pub fn map(value: f64, old_lo: f64, old_hi: f64, new_lo: f64, new_hi: f64) -> f64 {
    (value - old_lo) * (new_hi - new_lo) / (old_hi - old_lo) + new_lo
}

/// A logical viewport: a center on the complex plane and the width of
/// the plane shown.  The height follows from the image's aspect ratio.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct View {
    /// Real part of the center.
    pub cx: f64,
    /// Imaginary part of the center.
    pub cy: f64,
    /// Width of the viewport in the complex plane.  Must be positive.
    pub scale: f64,
}

impl Default for View {
    /// The whole set, centered.
    fn default() -> Self {
        View {
            cx: -0.5,
            cy: 0.0,
            scale: 3.5,
        }
    }
}

impl View {
    /// Constructor for callers holding unchecked input.  The renderer
    /// itself never validates a View; this is where bad ones get
    /// turned away.
    pub fn new(cx: f64, cy: f64, scale: f64) -> Result<View> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(Error::InvalidScale(scale));
        }
        Ok(View { cx, cy, scale })
    }

    /// The center as a complex number.
    pub fn center(&self) -> Complex<f64> {
        Complex::new(self.cx, self.cy)
    }

    /// The rectangle of the complex plane this view covers when drawn
    /// into an image of `width` by `height` pixels.
    pub fn bounds(&self, width: usize, height: usize) -> Bounds {
        let aspect = (height as f64) / (width as f64);
        let half_w = self.scale / 2.0;
        let half_h = (self.scale * aspect) / 2.0;
        Bounds {
            x_lo: self.cx - half_w,
            x_hi: self.cx + half_w,
            y_lo: self.cy - half_h,
            y_hi: self.cy + half_h,
        }
    }
}

/// An axis-aligned rectangle on the complex plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds {
    /// Left edge (real axis).
    pub x_lo: f64,
    /// Right edge (real axis).
    pub x_hi: f64,
    /// Top edge of the image (imaginary axis).
    pub y_lo: f64,
    /// Bottom edge of the image (imaginary axis).
    pub y_hi: f64,
}

/// Describes the x, y of a pixel in an image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels of a `width` by `height` image onto a rectangle of the
/// complex plane.
#[derive(Debug)]
pub struct PlaneMapper {
    /// Width and height of the integral plane.
    pub size: (usize, usize),
    /// The complex rectangle the image covers.
    pub bounds: Bounds,
}

impl PlaneMapper {
    /// Map an image of the given size onto `bounds`.
    pub fn new(width: usize, height: usize, bounds: Bounds) -> PlaneMapper {
        PlaneMapper {
            size: (width, height),
            bounds,
        }
    }

    /// Shorthand for mapping an image onto what a View covers at that
    /// image's aspect ratio.
    pub fn for_view(view: &View, width: usize, height: usize) -> PlaneMapper {
        PlaneMapper::new(width, height, view.bounds(width, height))
    }

    /// The total number of pixels.  Used to size sample buffers.
    pub fn len(&self) -> usize {
        self.size.0 * self.size.1
    }

    /// Describes that the integral plane has no area.
    pub fn is_empty(&self) -> bool {
        self.size.0 == 0 || self.size.1 == 0
    }

    /// Real coordinate of a pixel column.
    #[inline]
    pub fn column_to_re(&self, column: usize) -> f64 {
        map(
            column as f64,
            0.0,
            self.size.0 as f64,
            self.bounds.x_lo,
            self.bounds.x_hi,
        )
    }

    /// Imaginary coordinate of a pixel row.
    #[inline]
    pub fn row_to_im(&self, row: usize) -> f64 {
        map(
            row as f64,
            0.0,
            self.size.1 as f64,
            self.bounds.y_lo,
            self.bounds.y_hi,
        )
    }

    /// Given a pixel on the integral plane, return the complex number
    /// it samples.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(self.column_to_re(pixel.0), self.row_to_im(pixel.1))
    }
}
