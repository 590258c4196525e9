// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Piecewise-linear gradients.  A gradient is an ordered list of
//! stops, each pinning a color to a position in `[0, 1]`; colors
//! between two stops are blended channel by channel.

use image::Rgba;

use crate::error::{Error, Result};

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// A color pinned to a position on the gradient.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Stop {
    /// Position, nominally in `[0, 1]`.
    pub t: f64,
    /// Color at that position.
    pub color: Rgba<u8>,
}

impl Stop {
    /// An opaque stop from its position and RGB channels.
    pub fn rgb(t: f64, r: u8, g: u8, b: u8) -> Stop {
        Stop {
            t,
            color: Rgba([r, g, b, 255]),
        }
    }
}

/// A named list of stops, the form in which gradients are stored and
/// listed.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientDef {
    /// Display name.
    pub name: String,
    /// Stops, ascending by position.
    pub stops: Vec<Stop>,
}

impl GradientDef {
    /// Build an evaluator for this definition.
    pub fn to_gradient(&self) -> Result<Gradient> {
        Gradient::new(self.stops.clone())
    }

    /// The five gradients every registry starts with, in order.
    pub fn builtins() -> Vec<GradientDef> {
        vec![
            GradientDef {
                name: "Deep Ocean".to_string(),
                stops: vec![
                    Stop::rgb(0.00, 0, 7, 100),
                    Stop::rgb(0.25, 32, 107, 203),
                    Stop::rgb(0.50, 237, 255, 255),
                    Stop::rgb(0.75, 255, 170, 0),
                    Stop::rgb(1.00, 0, 2, 0),
                ],
            },
            GradientDef {
                name: "Inferno Ember".to_string(),
                stops: vec![
                    Stop::rgb(0.00, 5, 0, 10),
                    Stop::rgb(0.20, 120, 12, 40),
                    Stop::rgb(0.45, 240, 60, 10),
                    Stop::rgb(0.70, 255, 200, 50),
                    Stop::rgb(1.00, 20, 2, 0),
                ],
            },
            GradientDef {
                name: "Magenta Storm".to_string(),
                stops: vec![
                    Stop::rgb(0.00, 15, 0, 40),
                    Stop::rgb(0.30, 130, 0, 155),
                    Stop::rgb(0.60, 255, 100, 180),
                    Stop::rgb(1.00, 255, 230, 150),
                ],
            },
            GradientDef {
                name: "Frostfire".to_string(),
                stops: vec![
                    Stop::rgb(0.00, 0, 30, 50),
                    Stop::rgb(0.35, 60, 190, 210),
                    Stop::rgb(0.65, 255, 255, 255),
                    Stop::rgb(0.90, 255, 140, 40),
                    Stop::rgb(1.00, 20, 5, 0),
                ],
            },
            GradientDef {
                name: "Verdant".to_string(),
                stops: vec![
                    Stop::rgb(0.00, 0, 0, 0),
                    Stop::rgb(0.35, 0, 90, 40),
                    Stop::rgb(0.65, 160, 220, 40),
                    Stop::rgb(1.00, 250, 255, 220),
                ],
            },
        ]
    }
}

/// Blend one 8-bit channel.  Truncates toward zero.
#[inline]
pub fn lerp(a: u8, b: u8, u: f64) -> u8 {
    (f64::from(a) + u * (f64::from(b) - f64::from(a))) as u8
}

/// Blend two colors; the result is always opaque.
#[inline]
pub fn lerp_color(a: Rgba<u8>, b: Rgba<u8>, u: f64) -> Rgba<u8> {
    Rgba([
        lerp(a.0[0], b.0[0], u),
        lerp(a.0[1], b.0[1], u),
        lerp(a.0[2], b.0[2], u),
        255,
    ])
}

/// An evaluator over an immutable, sorted list of stops.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    stops: Vec<Stop>,
}

impl Gradient {
    /// Takes ownership of the stops.  Stops must be sorted ascending by
    /// position; unsorted or NaN positions are rejected rather than
    /// guessed at.  Equal neighbouring positions are allowed.
    pub fn new(stops: Vec<Stop>) -> Result<Gradient> {
        for (index, stop) in stops.iter().enumerate() {
            if !stop.t.is_finite() {
                return Err(Error::NonFiniteStop { index });
            }
            if index > 0 && stop.t < stops[index - 1].t {
                return Err(Error::UnsortedStops { index, t: stop.t });
            }
        }
        Ok(Gradient { stops })
    }

    /// The stops, in order.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// The color at position `t`.  Positions before the first stop or
    /// after the last take that stop's color.
    pub fn evaluate(&self, t: f64) -> Rgba<u8> {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return BLACK,
        };
        if self.stops.len() == 1 {
            return first.color;
        }
        if t <= first.t {
            return first.color;
        }
        if t >= last.t {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t >= a.t && t <= b.t {
                let span = b.t - a.t;
                let u = if span > 0.0 { (t - a.t) / span } else { 0.0 };
                return lerp_color(a.color, b.color, u);
            }
        }
        last.color
    }
}

impl Default for Gradient {
    /// The first built-in gradient.
    fn default() -> Self {
        let mut builtins = GradientDef::builtins();
        Gradient {
            stops: builtins.swap_remove(0).stops,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn red_to_blue() -> Gradient {
        Gradient::new(vec![Stop { t: 0.0, color: RED }, Stop { t: 1.0, color: BLUE }]).unwrap()
    }

    #[test]
    fn empty_gradient_is_black() {
        let g = Gradient::new(vec![]).unwrap();
        assert_eq!(g.evaluate(0.0), BLACK);
        assert_eq!(g.evaluate(0.7), BLACK);
    }

    #[test]
    fn single_stop_is_constant() {
        let g = Gradient::new(vec![Stop { t: 0.4, color: RED }]).unwrap();
        assert_eq!(g.evaluate(-3.0), RED);
        assert_eq!(g.evaluate(0.4), RED);
        assert_eq!(g.evaluate(9.0), RED);
    }

    #[test]
    fn outside_the_unit_interval_clamps_to_the_ends() {
        let g = red_to_blue();
        assert_eq!(g.evaluate(-0.5), RED);
        assert_eq!(g.evaluate(1.5), BLUE);
    }

    #[test]
    fn midpoint_truncates() {
        assert_eq!(red_to_blue().evaluate(0.5), Rgba([127, 0, 127, 255]));
    }

    #[test]
    fn exact_stop_positions_return_the_stop_color() {
        for def in GradientDef::builtins() {
            let g = def.to_gradient().unwrap();
            for stop in def.stops.iter() {
                assert_eq!(g.evaluate(stop.t), stop.color, "{} at {}", def.name, stop.t);
            }
        }
    }

    #[test]
    fn zero_width_span_takes_the_lower_color() {
        let g = Gradient::new(vec![
            Stop::rgb(0.0, 0, 0, 0),
            Stop::rgb(0.5, 10, 20, 30),
            Stop::rgb(0.5, 200, 200, 200),
            Stop::rgb(1.0, 255, 255, 255),
        ])
        .unwrap();
        assert_eq!(g.evaluate(0.5), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn alpha_is_forced_opaque() {
        let g = Gradient::new(vec![
            Stop { t: 0.0, color: Rgba([0, 0, 0, 0]) },
            Stop { t: 1.0, color: Rgba([100, 100, 100, 10]) },
        ])
        .unwrap();
        assert_eq!(g.evaluate(0.5).0[3], 255);
    }

    #[test]
    fn unsorted_stops_are_rejected() {
        let err = Gradient::new(vec![Stop::rgb(0.6, 0, 0, 0), Stop::rgb(0.2, 0, 0, 0)]);
        match err {
            Err(Error::UnsortedStops { index: 1, .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert!(Gradient::new(vec![Stop::rgb(std::f64::NAN, 0, 0, 0)]).is_err());
    }

    #[test]
    fn default_is_deep_ocean() {
        let g = Gradient::default();
        assert_eq!(g.evaluate(0.0), Rgba([0, 7, 100, 255]));
        assert_eq!(g.stops().len(), 5);
    }
}
