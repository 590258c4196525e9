// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Color-space helpers: the HSV wheel that the smooth-HSV mode cycles
//! through, and the HSL-based generator for random gradients.

use image::Rgba;
use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::gradient::{GradientDef, Stop};

/// Entries in the HSV wheel used by the smooth-HSV color mode.
pub const HSV_PALETTE_SIZE: usize = 1024;

#[inline]
fn channels(r: f64, g: f64, b: f64, m: f64) -> Rgba<u8> {
    Rgba([
        ((r + m) * 255.0) as u8,
        ((g + m) * 255.0) as u8,
        ((b + m) * 255.0) as u8,
        255,
    ])
}

// Which of the six 60-degree sectors the hue falls in decides which
// channel carries the chroma and which the second-largest component.
#[inline]
fn sector(hp: f64, c: f64, x: f64) -> (f64, f64, f64) {
    if hp < 1.0 {
        (c, x, 0.0)
    } else if hp < 2.0 {
        (x, c, 0.0)
    } else if hp < 3.0 {
        (0.0, c, x)
    } else if hp < 4.0 {
        (0.0, x, c)
    } else if hp < 5.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    }
}

/// Hue in degrees, saturation and value in `[0, 1]`.  Channels are
/// truncated, not rounded.
pub fn hsv_to_rgba(h: f64, s: f64, v: f64) -> Rgba<u8> {
    let h = h % 360.0;
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let (r, g, b) = sector(h / 60.0, c, x);
    channels(r, g, b, v - c)
}

/// Hue in degrees, saturation and lightness in `[0, 1]`.
pub fn hsl_to_rgba(h: f64, s: f64, l: f64) -> Rgba<u8> {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = h / 60.0;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = sector(hp, c, x);
    channels(r, g, b, l - c / 2.0)
}

/// Fold any hue into `[0, 360)`.
pub fn wrap_hue(h: f64) -> f64 {
    let h = h % 360.0;
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

/// A full-saturation, full-value trip around the hue circle.
pub fn hsv_wheel(size: usize) -> Vec<Rgba<u8>> {
    (0..size)
        .map(|i| hsv_to_rgba((i as f64) / (size as f64) * 360.0, 1.0, 1.0))
        .collect()
}

/// Build a five-stop gradient from a random base hue: three hues a
/// fixed spread apart, the complement, and a slight variation on the
/// complement.  Saturation and lightness are held in a band that
/// avoids grey and muddy results.
pub fn random_gradient_def<R: Rng + ?Sized>(rng: &mut R) -> GradientDef {
    const STOPS: usize = 5;

    let base = Uniform::new(0.0_f64, 360.0).sample(rng);
    let spread = Uniform::new(45.0_f64, 85.0).sample(rng);
    let hues = [
        base,
        base + spread,
        base + 2.0 * spread,
        base + 180.0,
        base + 180.0 + spread / 2.0,
    ];

    let saturation = Uniform::new(0.55_f64, 0.90).sample(rng);
    let lightness = Uniform::new(0.40_f64, 0.60).sample(rng);

    let stops = hues
        .iter()
        .enumerate()
        .map(|(i, &hue)| Stop {
            t: (i as f64) / ((STOPS - 1) as f64),
            color: hsl_to_rgba(wrap_hue(hue), saturation, lightness),
        })
        .collect();

    GradientDef {
        name: format!("Random {:04}", rng.gen_range(0..10_000)),
        stops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn primaries_on_the_wheel() {
        assert_eq!(hsv_to_rgba(0.0, 1.0, 1.0), Rgba([255, 0, 0, 255]));
        assert_eq!(hsv_to_rgba(120.0, 1.0, 1.0), Rgba([0, 255, 0, 255]));
        assert_eq!(hsv_to_rgba(240.0, 1.0, 1.0), Rgba([0, 0, 255, 255]));
        assert_eq!(hsv_to_rgba(360.0, 1.0, 1.0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn hsl_extremes() {
        assert_eq!(hsl_to_rgba(0.0, 1.0, 0.5), Rgba([255, 0, 0, 255]));
        assert_eq!(hsl_to_rgba(200.0, 0.7, 1.0), Rgba([255, 255, 255, 255]));
        assert_eq!(hsl_to_rgba(200.0, 0.7, 0.0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn wheel_is_opaque_and_starts_at_red() {
        let wheel = hsv_wheel(HSV_PALETTE_SIZE);
        assert_eq!(wheel.len(), HSV_PALETTE_SIZE);
        assert_eq!(wheel[0], Rgba([255, 0, 0, 255]));
        assert!(wheel.iter().all(|c| c.0[3] == 255));
    }

    #[test]
    fn wrap_hue_folds_into_range() {
        assert_eq!(wrap_hue(370.0), 10.0);
        assert_eq!(wrap_hue(-10.0), 350.0);
        assert_eq!(wrap_hue(0.0), 0.0);
    }

    #[test]
    fn random_gradients_have_five_even_stops() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let def = random_gradient_def(&mut rng);
            let ts: Vec<f64> = def.stops.iter().map(|s| s.t).collect();
            assert_eq!(ts, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
            assert!(def.stops.iter().all(|s| s.color.0[3] == 255));
            assert!(def.name.starts_with("Random "));
        }
    }
}
